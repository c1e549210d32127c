//! Handler-independent classification of an activity, as the router would see it.

use serde::Serialize;

use teams_core::{Activity, ActivityKind, TeamsChannelData};

use crate::registry::definition_by_name;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityClassification {
    pub id: Option<String>,
    /// Wire activity type.
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_event_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoke_name: Option<String>,
    /// Registry handler key for the invoke name; `None` means only `onInvoke` could handle it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoke_handler: Option<&'static str>,
    pub file_download: bool,
}

pub fn classify_activity(activity: &Activity) -> ActivityClassification {
    let mut classification = ActivityClassification {
        id: activity.id.clone(),
        kind: activity.activity_type.to_string(),
        team_event_type: None,
        invoke_name: None,
        invoke_handler: None,
        file_download: false,
    };

    match activity.kind() {
        ActivityKind::Message(message) => {
            classification.file_download = message.file_download_attachment().is_some();
        }
        ActivityKind::ConversationUpdate(update) => {
            classification.team_event_type = update
                .channel_data
                .and_then(TeamsChannelData::from_value)
                .and_then(|d| d.team_event_type())
                .map(|t| t.as_str());
        }
        ActivityKind::Invoke(invoke) => {
            classification.invoke_name = invoke.name.map(str::to_string);
            classification.invoke_handler = invoke
                .name
                .and_then(definition_by_name)
                .map(|d| d.key.as_str());
        }
        ActivityKind::MessageReaction(_) | ActivityKind::Other(_) => {}
    }
    classification
}
