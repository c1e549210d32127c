//! Activity envelope as exchanged with the bot-framework host, plus a typed view over the routed categories.
//!
//! [`Activity`] mirrors the Bot Framework JSON (camelCase). Every payload field is optional on the wire;
//! [`Activity::kind`] narrows it to the category the Teams processor cares about.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::schema::{content_types, TeamsChannelData};

/// Activity type tag. Unknown tags are kept verbatim in [`ActivityType::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ActivityType {
    #[default]
    Message,
    ConversationUpdate,
    Invoke,
    MessageReaction,
    /// Pseudo-type used for the reply synthesized after an invoke handler returns.
    InvokeResponse,
    Trace,
    Other(String),
}

impl ActivityType {
    pub fn as_str(&self) -> &str {
        match self {
            ActivityType::Message => "message",
            ActivityType::ConversationUpdate => "conversationUpdate",
            ActivityType::Invoke => "invoke",
            ActivityType::MessageReaction => "messageReaction",
            ActivityType::InvokeResponse => "invokeResponse",
            ActivityType::Trace => "trace",
            ActivityType::Other(s) => s,
        }
    }
}

impl From<String> for ActivityType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "message" => ActivityType::Message,
            "conversationUpdate" => ActivityType::ConversationUpdate,
            "invoke" => ActivityType::Invoke,
            "messageReaction" => ActivityType::MessageReaction,
            "invokeResponse" => ActivityType::InvokeResponse,
            "trace" => ActivityType::Trace,
            _ => ActivityType::Other(s),
        }
    }
}

impl From<ActivityType> for String {
    fn from(t: ActivityType) -> Self {
        match t {
            ActivityType::Other(s) => s,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User or bot account. Teams-specific profile fields are carried when the channel sends them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelAccount {
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aad_object_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub given_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_principal_name: Option<String>,
}

impl ChannelAccount {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: Some(name.into()),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationAccount {
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// `personal`, `groupChat` or `channel` on Teams.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_group: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    #[serde(default)]
    pub content_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
}

impl Attachment {
    /// True when the attachment announces a downloadable file (Teams file download info).
    pub fn is_file_download_info(&self) -> bool {
        self.content_type == content_types::FILE_DOWNLOAD_INFO
    }
}

/// Activity entity. Mentions use `type = "mention"` with `mentioned` and `text`; other fields are kept as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    #[serde(rename = "type", default)]
    pub entity_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mentioned: Option<ChannelAccount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(flatten)]
    pub properties: Map<String, Value>,
}

impl Entity {
    pub const MENTION: &'static str = "mention";

    pub fn mention(mentioned: ChannelAccount, text: impl Into<String>) -> Self {
        Self {
            entity_type: Self::MENTION.to_string(),
            mentioned: Some(mentioned),
            text: Some(text.into()),
            properties: Map::new(),
        }
    }

    pub fn is_mention(&self) -> bool {
        self.entity_type == Self::MENTION
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageReaction {
    #[serde(rename = "type")]
    pub reaction_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceResponse {
    pub id: String,
}

/// Addressing data copied from an incoming activity onto the replies sent during the turn.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationReference {
    pub activity_id: Option<String>,
    pub user: Option<ChannelAccount>,
    pub bot: Option<ChannelAccount>,
    pub conversation: Option<ConversationAccount>,
    pub channel_id: Option<String>,
    pub service_url: Option<String>,
}

impl ConversationReference {
    /// Addresses an outgoing activity: bot as sender, user as recipient, reply threaded to the incoming id.
    pub fn apply(&self, mut activity: Activity) -> Activity {
        if self.channel_id.is_some() {
            activity.channel_id = self.channel_id.clone();
        }
        if self.service_url.is_some() {
            activity.service_url = self.service_url.clone();
        }
        if self.conversation.is_some() {
            activity.conversation = self.conversation.clone();
        }
        if self.bot.is_some() {
            activity.from = self.bot.clone();
        }
        if self.user.is_some() {
            activity.recipient = self.user.clone();
        }
        if self.activity_id.is_some() {
            activity.reply_to_id = self.activity_id.clone();
        }
        activity
    }
}

/// Parameters for creating a 1:1 conversation with a member.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationParameters {
    pub bot: Option<ChannelAccount>,
    #[serde(default)]
    pub members: Vec<ChannelAccount>,
    pub channel_data: TeamsChannelData,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    #[serde(rename = "type", default)]
    pub activity_type: ActivityType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<ChannelAccount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient: Option<ChannelAccount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation: Option<ConversationAccount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_to_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_format: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entities: Vec<Entity>,
    /// Channel-specific blob; on Teams it decodes as [`TeamsChannelData`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_data: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members_added: Vec<ChannelAccount>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members_removed: Vec<ChannelAccount>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reactions_added: Vec<MessageReaction>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reactions_removed: Vec<MessageReaction>,
    /// Invoke operation name, e.g. `composeExtension/query`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl Activity {
    pub fn new(activity_type: ActivityType) -> Self {
        Self {
            activity_type,
            ..Default::default()
        }
    }

    pub fn message(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::new(ActivityType::Message)
        }
    }

    /// The reply carrying an invoke handler's response back to the channel.
    pub fn invoke_response(value: Value) -> Self {
        Self {
            value: Some(value),
            ..Self::new(ActivityType::InvokeResponse)
        }
    }

    pub fn conversation_reference(&self) -> ConversationReference {
        ConversationReference {
            activity_id: self.id.clone(),
            user: self.from.clone(),
            bot: self.recipient.clone(),
            conversation: self.conversation.clone(),
            channel_id: self.channel_id.clone(),
            service_url: self.service_url.clone(),
        }
    }

    /// Decodes `channelData` as Teams channel data; `None` when absent or not Teams-shaped.
    pub fn teams_channel_data(&self) -> Option<TeamsChannelData> {
        self.channel_data.as_ref().and_then(TeamsChannelData::from_value)
    }

    pub fn kind(&self) -> ActivityKind<'_> {
        match &self.activity_type {
            ActivityType::Message => ActivityKind::Message(MessageActivity {
                text: self.text.as_deref(),
                attachments: &self.attachments,
            }),
            ActivityType::ConversationUpdate => {
                ActivityKind::ConversationUpdate(ConversationUpdateActivity {
                    channel_data: self.channel_data.as_ref(),
                    members_added: &self.members_added,
                    members_removed: &self.members_removed,
                })
            }
            ActivityType::Invoke => ActivityKind::Invoke(InvokeActivity {
                name: self.name.as_deref(),
                value: self.value.as_ref(),
            }),
            ActivityType::MessageReaction => {
                ActivityKind::MessageReaction(MessageReactionActivity {
                    reactions_added: &self.reactions_added,
                    reactions_removed: &self.reactions_removed,
                })
            }
            other => ActivityKind::Other(other),
        }
    }
}

/// Borrowed, category-specific view of an [`Activity`].
#[derive(Debug, Clone, Copy)]
pub enum ActivityKind<'a> {
    Message(MessageActivity<'a>),
    ConversationUpdate(ConversationUpdateActivity<'a>),
    Invoke(InvokeActivity<'a>),
    MessageReaction(MessageReactionActivity<'a>),
    /// Not routed by the processor (typing, event, invokeResponse, ...).
    Other(&'a ActivityType),
}

#[derive(Debug, Clone, Copy)]
pub struct MessageActivity<'a> {
    pub text: Option<&'a str>,
    pub attachments: &'a [Attachment],
}

impl<'a> MessageActivity<'a> {
    /// First attachment announcing a file download, in list order.
    pub fn file_download_attachment(&self) -> Option<&'a Attachment> {
        self.attachments.iter().find(|a| a.is_file_download_info())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ConversationUpdateActivity<'a> {
    pub channel_data: Option<&'a Value>,
    pub members_added: &'a [ChannelAccount],
    pub members_removed: &'a [ChannelAccount],
}

#[derive(Debug, Clone, Copy)]
pub struct InvokeActivity<'a> {
    pub name: Option<&'a str>,
    pub value: Option<&'a Value>,
}

#[derive(Debug, Clone, Copy)]
pub struct MessageReactionActivity<'a> {
    pub reactions_added: &'a [MessageReaction],
    pub reactions_removed: &'a [MessageReaction],
}
