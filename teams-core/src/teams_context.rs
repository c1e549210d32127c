//! Teams helpers over a turn: channel-data accessors, mention handling, notification flag, account checks.

use serde_json::{json, Map, Value};

use crate::activity::{Activity, ChannelAccount, ConversationParameters, Entity};
use crate::context::TurnContext;
use crate::error::{HandlerError, Result};
use crate::schema::{ChannelInfo, TeamInfo, TeamsChannelData, TenantInfo};

/// Read-only Teams view of a [`TurnContext`].
#[derive(Debug, Clone, Copy)]
pub struct TeamsContext<'a> {
    turn_context: &'a TurnContext,
}

impl<'a> From<&'a TurnContext> for TeamsContext<'a> {
    fn from(turn_context: &'a TurnContext) -> Self {
        Self::new(turn_context)
    }
}

impl<'a> TeamsContext<'a> {
    pub fn new(turn_context: &'a TurnContext) -> Self {
        Self { turn_context }
    }

    pub fn turn_context(&self) -> &'a TurnContext {
        self.turn_context
    }

    /// Teams channel data of the activity; errors when the activity carries none.
    pub fn get_teams_channel_data(&self) -> Result<TeamsChannelData> {
        let value = self
            .turn_context
            .activity()
            .channel_data
            .as_ref()
            .ok_or(HandlerError::MissingChannelData)?;
        Ok(serde_json::from_value(value.clone())?)
    }

    pub fn event_type(&self) -> Option<String> {
        self.channel_data().and_then(|d| d.event_type)
    }

    pub fn team(&self) -> Option<TeamInfo> {
        self.channel_data().and_then(|d| d.team)
    }

    pub fn channel(&self) -> Option<ChannelInfo> {
        self.channel_data().and_then(|d| d.channel)
    }

    pub fn tenant(&self) -> Option<TenantInfo> {
        self.channel_data().and_then(|d| d.tenant)
    }

    /// The team's General channel shares the team id.
    pub fn get_general_channel(&self) -> Result<ChannelInfo> {
        let team = self
            .get_teams_channel_data()?
            .team
            .ok_or(HandlerError::MissingTeam)?;
        Ok(ChannelInfo {
            id: team.id,
            name: None,
        })
    }

    /// Activity text with every mention of the receiving bot removed and the result trimmed.
    pub fn get_activity_text_without_mentions(&self) -> String {
        let activity = self.turn_context.activity();
        let text = activity.text.clone().unwrap_or_default();
        if activity.entities.is_empty() {
            return text;
        }

        let bot_id = activity.recipient.as_ref().map(|r| r.id.as_str());
        let bot_mentions: Vec<&Entity> = activity
            .entities
            .iter()
            .filter(|e| e.is_mention() && e.mentioned.as_ref().map(|m| m.id.as_str()) == bot_id)
            .collect();

        if bot_mentions.is_empty() {
            return text;
        }

        let mut stripped = text;
        for mention in bot_mentions {
            if let Some(mention_text) = mention.text.as_deref().filter(|t| !t.is_empty()) {
                stripped = stripped.replacen(mention_text, "", 1);
            }
        }
        stripped.trim().to_string()
    }

    /// Parameters for a 1:1 conversation between the bot and `user`, scoped to this tenant.
    pub fn conversation_parameters_for_direct(&self, user: ChannelAccount) -> ConversationParameters {
        let tenant = self
            .tenant()
            .and_then(|t| t.id)
            .map(|id| TenantInfo { id: Some(id) });
        ConversationParameters {
            bot: self.turn_context.activity().recipient.clone(),
            members: vec![user],
            channel_data: TeamsChannelData {
                tenant,
                ..Default::default()
            },
        }
    }

    fn channel_data(&self) -> Option<TeamsChannelData> {
        self.turn_context.activity().teams_channel_data()
    }
}

/// Appends `<at>name</at>` to the activity text and records the matching mention entity.
///
/// `mention_text`, when given, replaces the account name in both places.
pub fn add_mention_to_text(
    mut activity: Activity,
    mut mentioned: ChannelAccount,
    mention_text: Option<&str>,
) -> Result<Activity> {
    if mentioned.id.is_empty() {
        return Err(HandlerError::InvalidMention.into());
    }
    if let Some(text) = mention_text.filter(|t| !t.is_empty()) {
        mentioned.name = Some(text.to_string());
    }
    let name = mentioned
        .name
        .clone()
        .filter(|n| !n.is_empty())
        .ok_or(HandlerError::MissingMentionName)?;

    let mention_entity_text = format!("<at>{}</at>", name);
    let text = activity.text.take().unwrap_or_default();
    activity.text = Some(format!("{} {}", text, mention_entity_text));
    activity
        .entities
        .push(Entity::mention(mentioned, mention_entity_text));
    Ok(activity)
}

/// Sets `channelData.notification.alert = true`, keeping any other channel data fields.
pub fn notify_user(mut activity: Activity) -> Activity {
    let mut channel_data = match activity.channel_data.take() {
        Some(Value::Object(map)) => map,
        _ => Map::new(),
    };
    channel_data.insert("notification".to_string(), json!({ "alert": true }));
    activity.channel_data = Some(Value::Object(channel_data));
    activity
}

/// An account is a Teams account when it has id and name plus at least one AAD/profile field.
pub fn is_teams_channel_account(account: &ChannelAccount) -> bool {
    let has_name = account.name.as_deref().is_some_and(|n| !n.is_empty());
    let has_profile = [
        &account.aad_object_id,
        &account.email,
        &account.given_name,
        &account.surname,
        &account.user_principal_name,
    ]
    .iter()
    .any(|f| f.as_deref().is_some_and(|v| !v.is_empty()));
    !account.id.is_empty() && has_name && has_profile
}

pub fn is_teams_channel_accounts(accounts: &[ChannelAccount]) -> bool {
    accounts.iter().all(is_teams_channel_account)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::ResourceResponse;
    use crate::context::ActivitySender;
    use async_trait::async_trait;
    use std::sync::Arc;

    struct NullSender;

    #[async_trait]
    impl ActivitySender for NullSender {
        async fn send_activities(&self, _activities: Vec<Activity>) -> Result<Vec<ResourceResponse>> {
            Ok(vec![])
        }
    }

    fn ctx(activity: Activity) -> TurnContext {
        TurnContext::new(activity, Arc::new(NullSender))
    }

    fn mention(id: &str, text: &str) -> Entity {
        Entity::mention(ChannelAccount::new(id, "Someone"), text)
    }

    #[test]
    fn test_text_without_mentions_strips_bot_mention() {
        let activity = Activity {
            recipient: Some(ChannelAccount::new("bot-1", "Bot")),
            entities: vec![mention("bot-1", "<at>Bot</at>"), mention("user-2", "<at>Ann</at>")],
            ..Activity::message("<at>Bot</at> ping <at>Ann</at> ")
        };
        let ctx = ctx(activity);
        assert_eq!(
            TeamsContext::from(&ctx).get_activity_text_without_mentions(),
            "ping <at>Ann</at>"
        );
    }

    #[test]
    fn test_teams_context_from_turn_context() {
        let ctx = ctx(Activity::message("hi"));
        let teams: TeamsContext<'_> = (&ctx).into();
        assert!(std::ptr::eq(teams.turn_context(), &ctx));
        assert!(std::ptr::eq(TeamsContext::new(&ctx).turn_context(), &ctx));
    }

    #[test]
    fn test_text_without_mentions_no_entities_returns_text() {
        let ctx = ctx(Activity::message("  plain  "));
        assert_eq!(
            TeamsContext::from(&ctx).get_activity_text_without_mentions(),
            "  plain  "
        );
    }

    #[test]
    fn test_general_channel_requires_team() {
        let with_team = ctx(Activity {
            channel_data: Some(json!({"team": {"id": "19:team"}})),
            ..Activity::message("x")
        });
        let general = TeamsContext::from(&with_team).get_general_channel().unwrap();
        assert_eq!(general.id.as_deref(), Some("19:team"));

        let without_team = ctx(Activity {
            channel_data: Some(json!({"tenant": {"id": "t1"}})),
            ..Activity::message("x")
        });
        let err = TeamsContext::from(&without_team)
            .get_general_channel()
            .unwrap_err();
        assert!(matches!(err, crate::TeamsError::Handler(HandlerError::MissingTeam)));

        let no_data = ctx(Activity::message("x"));
        let err = TeamsContext::from(&no_data).get_teams_channel_data().unwrap_err();
        assert!(matches!(
            err,
            crate::TeamsError::Handler(HandlerError::MissingChannelData)
        ));
    }

    #[test]
    fn test_conversation_parameters_copy_tenant_and_bot() {
        let ctx = ctx(Activity {
            recipient: Some(ChannelAccount::new("bot-1", "Bot")),
            channel_data: Some(json!({"tenant": {"id": "tenant-1"}, "team": {"id": "team-1"}})),
            ..Activity::message("x")
        });
        let params =
            TeamsContext::from(&ctx).conversation_parameters_for_direct(ChannelAccount::new("u1", "U"));
        assert_eq!(params.bot.unwrap().id, "bot-1");
        assert_eq!(params.members.len(), 1);
        assert_eq!(
            params.channel_data.tenant.and_then(|t| t.id).as_deref(),
            Some("tenant-1")
        );
        assert!(params.channel_data.team.is_none());
    }

    #[test]
    fn test_add_mention_to_text() {
        let activity = add_mention_to_text(
            Activity::message("Hello"),
            ChannelAccount::new("user-1", "Ann"),
            None,
        )
        .unwrap();
        assert_eq!(activity.text.as_deref(), Some("Hello <at>Ann</at>"));
        assert_eq!(activity.entities.len(), 1);
        assert_eq!(activity.entities[0].text.as_deref(), Some("<at>Ann</at>"));

        let renamed = add_mention_to_text(
            Activity::message("Hi"),
            ChannelAccount::new("user-1", "Ann"),
            Some("Annie"),
        )
        .unwrap();
        assert_eq!(renamed.text.as_deref(), Some("Hi <at>Annie</at>"));
        assert_eq!(
            renamed.entities[0].mentioned.as_ref().unwrap().name.as_deref(),
            Some("Annie")
        );
    }

    #[test]
    fn test_add_mention_to_text_validation() {
        let no_id = add_mention_to_text(Activity::message("x"), ChannelAccount::default(), Some("a"));
        assert!(matches!(
            no_id,
            Err(crate::TeamsError::Handler(HandlerError::InvalidMention))
        ));

        let no_name = ChannelAccount {
            id: "u1".to_string(),
            ..Default::default()
        };
        let result = add_mention_to_text(Activity::message("x"), no_name, None);
        assert!(matches!(
            result,
            Err(crate::TeamsError::Handler(HandlerError::MissingMentionName))
        ));
    }

    #[test]
    fn test_notify_user_preserves_channel_data() {
        let activity = Activity {
            channel_data: Some(json!({"tenant": {"id": "t1"}})),
            ..Activity::message("x")
        };
        let notified = notify_user(activity);
        let data = notified.channel_data.unwrap();
        assert_eq!(data["notification"]["alert"], true);
        assert_eq!(data["tenant"]["id"], "t1");

        let fresh = notify_user(Activity::message("y"));
        assert_eq!(fresh.channel_data.unwrap(), json!({"notification": {"alert": true}}));
    }

    #[test]
    fn test_is_teams_channel_account() {
        let plain = ChannelAccount::new("u1", "User");
        assert!(!is_teams_channel_account(&plain));

        let teams = ChannelAccount {
            aad_object_id: Some("aad".to_string()),
            ..ChannelAccount::new("u1", "User")
        };
        assert!(is_teams_channel_account(&teams));
        assert!(is_teams_channel_accounts(&[teams.clone(), teams.clone()]));
        assert!(!is_teams_channel_accounts(&[teams, plain]));
    }
}
