//! Typed conversation-update events built from Teams channel data.

use teams_core::{
    ChannelAccount, ChannelInfo, ConversationUpdateActivity, TeamEventType, TeamInfo,
    TeamsChannelData, TenantInfo, TurnContext,
};

/// Members joined the team.
#[derive(Debug, Clone)]
pub struct MembersAddedEvent {
    pub turn_context: TurnContext,
    pub team: Option<TeamInfo>,
    pub tenant: Option<TenantInfo>,
    pub members_added: Vec<ChannelAccount>,
}

/// Members left or were removed from the team.
#[derive(Debug, Clone)]
pub struct MembersRemovedEvent {
    pub turn_context: TurnContext,
    pub team: Option<TeamInfo>,
    pub tenant: Option<TenantInfo>,
    pub members_removed: Vec<ChannelAccount>,
}

/// Channel lifecycle event; `event_type` is one of created / deleted / renamed.
#[derive(Debug, Clone)]
pub struct ChannelEvent {
    pub event_type: TeamEventType,
    pub turn_context: TurnContext,
    pub team: Option<TeamInfo>,
    pub tenant: Option<TenantInfo>,
    pub channel: Option<ChannelInfo>,
}

pub type ChannelCreatedEvent = ChannelEvent;
pub type ChannelDeletedEvent = ChannelEvent;
pub type ChannelRenamedEvent = ChannelEvent;

#[derive(Debug, Clone)]
pub struct TeamRenamedEvent {
    pub turn_context: TurnContext,
    pub team: Option<TeamInfo>,
    pub tenant: Option<TenantInfo>,
}

#[derive(Debug, Clone)]
pub enum TeamEvent {
    MembersAdded(MembersAddedEvent),
    MembersRemoved(MembersRemovedEvent),
    ChannelCreated(ChannelCreatedEvent),
    ChannelDeleted(ChannelDeletedEvent),
    ChannelRenamed(ChannelRenamedEvent),
    TeamRenamed(TeamRenamedEvent),
}

impl TeamEvent {
    /// Builds the event named by `channelData.eventType`.
    ///
    /// Returns `None` when channel data is absent or not an object, has no string event type,
    /// or carries a literal outside the six known ones. `team`, `tenant` and `channel` that fail
    /// to decode are passed on as `None`.
    pub fn classify(turn_context: &TurnContext, update: &ConversationUpdateActivity<'_>) -> Option<Self> {
        let data = update.channel_data.and_then(TeamsChannelData::from_value)?;
        let event_type = data.team_event_type()?;
        let TeamsChannelData {
            team,
            tenant,
            channel,
            ..
        } = data;
        let turn_context = turn_context.clone();

        let event = match event_type {
            TeamEventType::TeamMembersAdded => TeamEvent::MembersAdded(MembersAddedEvent {
                turn_context,
                team,
                tenant,
                members_added: update.members_added.to_vec(),
            }),
            TeamEventType::TeamMembersRemoved => TeamEvent::MembersRemoved(MembersRemovedEvent {
                turn_context,
                team,
                tenant,
                members_removed: update.members_removed.to_vec(),
            }),
            TeamEventType::ChannelCreated
            | TeamEventType::ChannelDeleted
            | TeamEventType::ChannelRenamed => {
                let event = ChannelEvent {
                    event_type,
                    turn_context,
                    team,
                    tenant,
                    channel,
                };
                match event_type {
                    TeamEventType::ChannelCreated => TeamEvent::ChannelCreated(event),
                    TeamEventType::ChannelDeleted => TeamEvent::ChannelDeleted(event),
                    _ => TeamEvent::ChannelRenamed(event),
                }
            }
            TeamEventType::TeamRenamed => TeamEvent::TeamRenamed(TeamRenamedEvent {
                turn_context,
                team,
                tenant,
            }),
        };
        Some(event)
    }

    pub fn event_type(&self) -> TeamEventType {
        match self {
            TeamEvent::MembersAdded(_) => TeamEventType::TeamMembersAdded,
            TeamEvent::MembersRemoved(_) => TeamEventType::TeamMembersRemoved,
            TeamEvent::ChannelCreated(_) => TeamEventType::ChannelCreated,
            TeamEvent::ChannelDeleted(_) => TeamEventType::ChannelDeleted,
            TeamEvent::ChannelRenamed(_) => TeamEventType::ChannelRenamed,
            TeamEvent::TeamRenamed(_) => TeamEventType::TeamRenamed,
        }
    }

    pub fn turn_context(&self) -> &TurnContext {
        match self {
            TeamEvent::MembersAdded(e) => &e.turn_context,
            TeamEvent::MembersRemoved(e) => &e.turn_context,
            TeamEvent::ChannelCreated(e)
            | TeamEvent::ChannelDeleted(e)
            | TeamEvent::ChannelRenamed(e) => &e.turn_context,
            TeamEvent::TeamRenamed(e) => &e.turn_context,
        }
    }

    pub fn team(&self) -> Option<&TeamInfo> {
        match self {
            TeamEvent::MembersAdded(e) => e.team.as_ref(),
            TeamEvent::MembersRemoved(e) => e.team.as_ref(),
            TeamEvent::ChannelCreated(e)
            | TeamEvent::ChannelDeleted(e)
            | TeamEvent::ChannelRenamed(e) => e.team.as_ref(),
            TeamEvent::TeamRenamed(e) => e.team.as_ref(),
        }
    }

    pub fn tenant(&self) -> Option<&TenantInfo> {
        match self {
            TeamEvent::MembersAdded(e) => e.tenant.as_ref(),
            TeamEvent::MembersRemoved(e) => e.tenant.as_ref(),
            TeamEvent::ChannelCreated(e)
            | TeamEvent::ChannelDeleted(e)
            | TeamEvent::ChannelRenamed(e) => e.tenant.as_ref(),
            TeamEvent::TeamRenamed(e) => e.tenant.as_ref(),
        }
    }
}
