//! Per-turn context: the incoming activity plus the host's outbound send primitive.
//!
//! [`ActivitySender`] is transport-agnostic; the host framework implements it. [`TurnContext`] is cheap to clone
//! so handlers and events can hold it without borrowing.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::activity::{Activity, ActivityType, ResourceResponse};
use crate::error::Result;

/// Outbound side of the host: delivers activities to the channel.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ActivitySender: Send + Sync {
    /// Sends the activities in order and returns one resource response per activity.
    async fn send_activities(&self, activities: Vec<Activity>) -> Result<Vec<ResourceResponse>>;
}

struct TurnState {
    activity: Activity,
    sender: Arc<dyn ActivitySender>,
    responded: AtomicBool,
}

#[derive(Clone)]
pub struct TurnContext {
    state: Arc<TurnState>,
}

impl TurnContext {
    pub fn new(activity: Activity, sender: Arc<dyn ActivitySender>) -> Self {
        Self {
            state: Arc::new(TurnState {
                activity,
                sender,
                responded: AtomicBool::new(false),
            }),
        }
    }

    /// The incoming activity for this turn.
    pub fn activity(&self) -> &Activity {
        &self.state.activity
    }

    /// True once a non-trace activity was sent during this turn.
    pub fn responded(&self) -> bool {
        self.state.responded.load(Ordering::SeqCst)
    }

    pub async fn send_text(&self, text: impl Into<String>) -> Result<Option<ResourceResponse>> {
        self.send_activity(Activity::message(text)).await
    }

    pub async fn send_activity(&self, activity: Activity) -> Result<Option<ResourceResponse>> {
        let responses = self.send_activities(vec![activity]).await?;
        Ok(responses.into_iter().next())
    }

    /// Addresses each activity from the incoming conversation reference, then hands them to the sender.
    pub async fn send_activities(&self, activities: Vec<Activity>) -> Result<Vec<ResourceResponse>> {
        let reference = self.state.activity.conversation_reference();
        let mut sent_non_trace = false;
        let output: Vec<Activity> = activities
            .into_iter()
            .map(|a| {
                let o = reference.apply(a);
                if o.activity_type != ActivityType::Trace {
                    sent_non_trace = true;
                }
                o
            })
            .collect();

        debug!(count = output.len(), "sending activities");
        let responses = self.state.sender.send_activities(output).await?;
        if sent_non_trace {
            self.state.responded.store(true, Ordering::SeqCst);
        }
        Ok(responses)
    }
}

impl fmt::Debug for TurnContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TurnContext")
            .field("activity_type", &self.state.activity.activity_type)
            .field("activity_id", &self.state.activity.id)
            .field("responded", &self.responded())
            .finish()
    }
}
