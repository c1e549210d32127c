//! Teams payload shapes: channel data, file attachments and the request/response bodies of invoke activities.

use std::fmt;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::activity::{Activity, Attachment};
use crate::error::Result;

/// Attachment content types used by Teams.
pub mod content_types {
    pub const FILE_DOWNLOAD_INFO: &str = "application/vnd.microsoft.teams.file.download.info";
    pub const FILE_CONSENT_CARD: &str = "application/vnd.microsoft.teams.card.file.consent";
    pub const FILE_INFO_CARD: &str = "application/vnd.microsoft.teams.card.file.info";
    pub const O365_CONNECTOR_CARD: &str = "application/vnd.microsoft.teams.card.o365connector";
}

/// Decodes an optional JSON payload into `T`. A missing or `null` payload decodes as `{}`.
pub fn decode_payload<T: DeserializeOwned>(value: Option<&Value>) -> Result<T> {
    match value {
        None | Some(Value::Null) => Ok(serde_json::from_value(Value::Object(Map::new()))?),
        Some(v) => Ok(T::deserialize(v)?),
    }
}

/// A payload handed to a handler as it arrived on the wire.
///
/// Nothing is validated before the handler runs; [`Payload::decode`] reads the typed shape on demand
/// and [`Payload::raw`] keeps the original JSON reachable when it does not fit.
pub struct Payload<T> {
    raw: Option<Value>,
    _shape: PhantomData<fn() -> T>,
}

impl<T> Payload<T> {
    pub fn new(raw: Option<Value>) -> Self {
        Self {
            raw,
            _shape: PhantomData,
        }
    }

    pub fn raw(&self) -> Option<&Value> {
        self.raw.as_ref()
    }

    pub fn into_raw(self) -> Option<Value> {
        self.raw
    }
}

impl<T: DeserializeOwned> Payload<T> {
    /// Same rules as [`decode_payload`].
    pub fn decode(&self) -> Result<T> {
        decode_payload(self.raw.as_ref())
    }
}

impl<T> Clone for Payload<T> {
    fn clone(&self) -> Self {
        Self::new(self.raw.clone())
    }
}

impl<T> fmt::Debug for Payload<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Payload")
            .field("shape", &std::any::type_name::<T>())
            .field("raw", &self.raw)
            .finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alert: Option<bool>,
}

/// Teams-specific `channelData` of an activity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamsChannelData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<ChannelInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<TeamInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notification: Option<NotificationInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant: Option<TenantInfo>,
}

impl TeamsChannelData {
    /// Reads each property on its own; one that fails to decode is left `None` without
    /// hiding the others. `None` only when the blob is not an object.
    pub fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        Some(Self {
            channel: field(object, "channel"),
            event_type: object
                .get("eventType")
                .and_then(Value::as_str)
                .map(str::to_string),
            team: field(object, "team"),
            notification: field(object, "notification"),
            tenant: field(object, "tenant"),
        })
    }

    /// Classified `eventType`; unknown literals yield `None`.
    pub fn team_event_type(&self) -> Option<TeamEventType> {
        self.event_type.as_deref().and_then(TeamEventType::from_wire)
    }
}

fn field<T: DeserializeOwned>(object: &Map<String, Value>, key: &str) -> Option<T> {
    object.get(key).and_then(|v| T::deserialize(v).ok())
}

/// The six conversation-update event literals Teams puts in `channelData.eventType`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TeamEventType {
    TeamMembersAdded,
    TeamMembersRemoved,
    ChannelCreated,
    ChannelDeleted,
    ChannelRenamed,
    TeamRenamed,
}

impl TeamEventType {
    pub const ALL: [TeamEventType; 6] = [
        TeamEventType::TeamMembersAdded,
        TeamEventType::TeamMembersRemoved,
        TeamEventType::ChannelCreated,
        TeamEventType::ChannelDeleted,
        TeamEventType::ChannelRenamed,
        TeamEventType::TeamRenamed,
    ];

    pub fn from_wire(s: &str) -> Option<Self> {
        match s {
            "teamMembersAdded" => Some(TeamEventType::TeamMembersAdded),
            "teamMembersRemoved" => Some(TeamEventType::TeamMembersRemoved),
            "channelCreated" => Some(TeamEventType::ChannelCreated),
            "channelDeleted" => Some(TeamEventType::ChannelDeleted),
            "channelRenamed" => Some(TeamEventType::ChannelRenamed),
            "teamRenamed" => Some(TeamEventType::TeamRenamed),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TeamEventType::TeamMembersAdded => "teamMembersAdded",
            TeamEventType::TeamMembersRemoved => "teamMembersRemoved",
            TeamEventType::ChannelCreated => "channelCreated",
            TeamEventType::ChannelDeleted => "channelDeleted",
            TeamEventType::ChannelRenamed => "channelRenamed",
            TeamEventType::TeamRenamed => "teamRenamed",
        }
    }
}

/// Content of a file download info attachment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDownloadInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unique_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etag: Option<Value>,
}

// --- invoke request shapes ---

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct O365ConnectorCardActionQuery {
    /// Form values posted by the card, as a JSON string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SigninStateVerificationQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileConsentAction {
    Accept,
    Decline,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileUploadInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unique_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileConsentCardResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<FileConsentAction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload_info: Option<FileUploadInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessagingExtensionParameter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessagingExtensionQueryOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagingExtensionQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<MessagingExtensionParameter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_options: Option<MessagingExtensionQueryOptions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

impl MessagingExtensionQuery {
    /// Value of the named query parameter, if sent.
    pub fn parameter(&self, name: &str) -> Option<&Value> {
        self.parameters
            .iter()
            .find(|p| p.name.as_deref() == Some(name))
            .and_then(|p| p.value.as_ref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppBasedLinkQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskModuleRequestContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskModuleRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<TaskModuleRequestContext>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagingExtensionAction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command_id: Option<String>,
    /// `message`, `compose` or `commandbox`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command_context: Option<String>,
    /// `edit` or `send`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bot_message_preview_action: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bot_activity_preview: Vec<Activity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_payload: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<TaskModuleRequestContext>,
}

// --- invoke response shapes ---

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CardAction {
    #[serde(rename = "type")]
    pub action_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessagingExtensionSuggestedAction {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<CardAction>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessagingExtensionAttachment {
    #[serde(flatten)]
    pub attachment: Attachment,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview: Option<Attachment>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttachmentLayout {
    List,
    Grid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessagingExtensionResultType {
    Result,
    Auth,
    Config,
    Message,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagingExtensionResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment_layout: Option<AttachmentLayout>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub result_type: Option<MessagingExtensionResultType>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<MessagingExtensionAttachment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_actions: Option<MessagingExtensionSuggestedAction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagingExtensionResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compose_extension: Option<MessagingExtensionResult>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskModuleTaskInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Pixels or one of `small` / `medium` / `large`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card: Option<Attachment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_bot_id: Option<String>,
}

/// What the client should do with the task module: show a message, or continue with another task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum TaskModuleResponseBase {
    Message(String),
    Continue(TaskModuleTaskInfo),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskModuleResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task: Option<TaskModuleResponseBase>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagingExtensionActionResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task: Option<TaskModuleResponseBase>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compose_extension: Option<MessagingExtensionResult>,
}

/// Untyped invoke response as carried in the `value` of an `invokeResponse` activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvokeResponse {
    pub status: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

impl InvokeResponse {
    pub fn status(status: u16) -> Self {
        Self { status, body: None }
    }

    pub fn ok(body: Value) -> Self {
        Self {
            status: 200,
            body: Some(body),
        }
    }
}

/// Invoke response with a typed body.
#[derive(Debug, Clone, PartialEq)]
pub struct InvokeResponseTyped<T> {
    pub status: u16,
    pub body: Option<T>,
}

impl<T> InvokeResponseTyped<T> {
    pub fn ok(body: T) -> Self {
        Self {
            status: 200,
            body: Some(body),
        }
    }

    pub fn status(status: u16) -> Self {
        Self { status, body: None }
    }
}

impl<T: Serialize> InvokeResponseTyped<T> {
    pub fn into_untyped(self) -> Result<InvokeResponse> {
        let body = match self.body {
            Some(body) => Some(serde_json::to_value(body)?),
            None => None,
        };
        Ok(InvokeResponse {
            status: self.status,
            body,
        })
    }
}
