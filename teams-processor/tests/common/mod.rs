//! Shared fixtures for teams-processor integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;
use teams_core::{
    Activity, ActivitySender, ActivityType, ChannelAccount, ConversationAccount,
    ResourceResponse, TurnContext, TurnHandler,
};

/// Records every activity the processor sends.
#[derive(Default)]
pub struct RecordingSender {
    pub sent: Mutex<Vec<Activity>>,
}

impl RecordingSender {
    pub fn sent(&self) -> Vec<Activity> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl ActivitySender for RecordingSender {
    async fn send_activities(
        &self,
        activities: Vec<Activity>,
    ) -> teams_core::Result<Vec<ResourceResponse>> {
        let mut sent = self.sent.lock().unwrap();
        let responses = activities
            .iter()
            .enumerate()
            .map(|(i, _)| ResourceResponse {
                id: format!("out-{}", sent.len() + i),
            })
            .collect();
        sent.extend(activities);
        Ok(responses)
    }
}

/// Ordered log of handler invocations.
#[derive(Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
    pub fn push(&self, entry: impl Into<String>) {
        self.0.lock().unwrap().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

/// Turn handler that appends its label to a [`CallLog`].
pub struct Record {
    pub log: CallLog,
    pub label: &'static str,
}

impl Record {
    pub fn new(log: &CallLog, label: &'static str) -> Self {
        Self {
            log: log.clone(),
            label,
        }
    }
}

#[async_trait]
impl TurnHandler for Record {
    async fn on_turn(&self, _ctx: &TurnContext) -> teams_core::Result<()> {
        self.log.push(self.label);
        Ok(())
    }
}

pub fn incoming(activity_type: ActivityType) -> Activity {
    Activity {
        id: Some("activity-1".to_string()),
        channel_id: Some("msteams".to_string()),
        service_url: Some("https://smba.example.com/".to_string()),
        from: Some(ChannelAccount::new("29:user", "User")),
        recipient: Some(ChannelAccount::new("28:bot", "Bot")),
        conversation: Some(ConversationAccount {
            id: "19:conversation".to_string(),
            ..Default::default()
        }),
        ..Activity::new(activity_type)
    }
}

pub fn invoke(name: &str, value: Value) -> Activity {
    Activity {
        name: Some(name.to_string()),
        value: Some(value),
        ..incoming(ActivityType::Invoke)
    }
}

pub fn conversation_update(channel_data: Value) -> Activity {
    Activity {
        channel_data: Some(channel_data),
        ..incoming(ActivityType::ConversationUpdate)
    }
}

pub fn turn(activity: Activity) -> (TurnContext, Arc<RecordingSender>) {
    let sender = Arc::new(RecordingSender::default());
    (TurnContext::new(activity, sender.clone()), sender)
}
