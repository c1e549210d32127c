//! Integration tests for conversation-update classification and dispatch.
//!
//! Covers: each team event reaching its handler with channel-data fields, the generic hook always running
//! after the specific handler, unknown or missing event types, and error propagation.

mod common;

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use teams_core::{
    Activity, ActivityType, ChannelAccount, HandlerError, TeamEventType, TeamsError,
};
use teams_processor::{
    ChannelEvent, ConversationUpdateHandlers, MembersAddedEvent, MembersRemovedEvent,
    TeamRenamedEvent, TeamsActivityProcessor,
};

use common::{conversation_update, incoming, turn, CallLog, Record};

fn processor(handlers: ConversationUpdateHandlers) -> TeamsActivityProcessor {
    TeamsActivityProcessor::new().with_conversation_update_handlers(handlers)
}

fn channel_logger(log: &CallLog, label: &'static str) -> impl Fn(ChannelEvent) -> std::future::Ready<teams_core::Result<()>> + Send + Sync + 'static {
    let log = log.clone();
    move |event: ChannelEvent| {
        log.push(format!(
            "{}:{}",
            label,
            event.channel.and_then(|c| c.name).unwrap_or_default()
        ));
        std::future::ready(Ok(()))
    }
}

/// **Test: channelRenamed reaches its handler with channel data fields, then the generic hook.**
///
/// **Setup:** channel-renamed handler that sleeps before recording, plus the generic handler.
/// **Action:** Process a conversation update with `eventType = channelRenamed`.
/// **Expected:** Event channel/team/tenant equal the channel data; generic runs once, after the specific one finished.
#[tokio::test]
async fn test_channel_renamed_then_generic() {
    let log = CallLog::default();
    let seen: Arc<std::sync::Mutex<Option<ChannelEvent>>> = Arc::default();
    let specific_log = log.clone();
    let seen_in_handler = seen.clone();

    let handlers = ConversationUpdateHandlers::new()
        .on_channel_renamed(move |event: ChannelEvent| {
            let log = specific_log.clone();
            let seen = seen_in_handler.clone();
            async move {
                tokio::time::sleep(Duration::from_millis(20)).await;
                log.push("channelRenamed");
                *seen.lock().unwrap() = Some(event);
                Ok::<_, TeamsError>(())
            }
        })
        .on_conversation_update_activity(Record::new(&log, "conversationUpdate"));

    let (ctx, _) = turn(conversation_update(json!({
        "eventType": "channelRenamed",
        "channel": {"id": "19:channel", "name": "Renamed"},
        "team": {"id": "19:team", "name": "Team"},
        "tenant": {"id": "tenant-1"}
    })));
    processor(handlers).process_incoming_activity(&ctx).await.unwrap();

    assert_eq!(log.entries(), vec!["channelRenamed", "conversationUpdate"]);
    let event = seen.lock().unwrap().take().unwrap();
    assert_eq!(event.event_type, TeamEventType::ChannelRenamed);
    let channel = event.channel.unwrap();
    assert_eq!(channel.id.as_deref(), Some("19:channel"));
    assert_eq!(channel.name.as_deref(), Some("Renamed"));
    let team = event.team.unwrap();
    assert_eq!(team.id.as_deref(), Some("19:team"));
    assert_eq!(team.name.as_deref(), Some("Team"));
    assert_eq!(event.tenant.unwrap().id.as_deref(), Some("tenant-1"));
    assert_eq!(event.turn_context.activity().id.as_deref(), Some("activity-1"));
}

/// **Test: Unknown event type runs only the generic hook.**
#[tokio::test]
async fn test_bogus_event_type_runs_generic_only() {
    let log = CallLog::default();
    let handlers = ConversationUpdateHandlers::new()
        .on_channel_created(channel_logger(&log, "created"))
        .on_channel_deleted(channel_logger(&log, "deleted"))
        .on_channel_renamed(channel_logger(&log, "renamed"))
        .on_conversation_update_activity(Record::new(&log, "conversationUpdate"));

    let (ctx, _) = turn(conversation_update(json!({"eventType": "bogusValue"})));
    processor(handlers).process_incoming_activity(&ctx).await.unwrap();

    assert_eq!(log.entries(), vec!["conversationUpdate"]);
}

/// **Test: Missing channel data or event type runs only the generic hook.**
#[tokio::test]
async fn test_missing_channel_data_runs_generic_only() {
    let log = CallLog::default();
    let handlers = ConversationUpdateHandlers::new()
        .on_channel_created(channel_logger(&log, "created"))
        .on_conversation_update_activity(Record::new(&log, "conversationUpdate"));
    let processor = processor(handlers);

    let (ctx, _) = turn(incoming(ActivityType::ConversationUpdate));
    processor.process_incoming_activity(&ctx).await.unwrap();
    let (ctx, _) = turn(conversation_update(json!({"team": {"id": "19:team"}})));
    processor.process_incoming_activity(&ctx).await.unwrap();
    let (ctx, _) = turn(conversation_update(json!("not-an-object")));
    processor.process_incoming_activity(&ctx).await.unwrap();

    assert_eq!(
        log.entries(),
        vec!["conversationUpdate", "conversationUpdate", "conversationUpdate"]
    );
}

/// **Test: Each channel event goes to its own slot only.**
#[tokio::test]
async fn test_channel_events_route_to_matching_slot() {
    let log = CallLog::default();
    let processor = processor(
        ConversationUpdateHandlers::new()
            .on_channel_created(channel_logger(&log, "created"))
            .on_channel_deleted(channel_logger(&log, "deleted"))
            .on_channel_renamed(channel_logger(&log, "renamed")),
    );

    for event_type in ["channelDeleted", "channelCreated", "channelRenamed"] {
        let (ctx, _) = turn(conversation_update(json!({
            "eventType": event_type,
            "channel": {"id": "19:c", "name": event_type}
        })));
        processor.process_incoming_activity(&ctx).await.unwrap();
    }

    assert_eq!(
        log.entries(),
        vec![
            "deleted:channelDeleted",
            "created:channelCreated",
            "renamed:channelRenamed"
        ]
    );
}

/// **Test: Member events carry the activity's member lists.**
///
/// **Setup:** members-added and members-removed handlers.
/// **Action:** Process `teamMembersAdded` and `teamMembersRemoved` updates.
/// **Expected:** Each handler sees the matching list from the activity.
#[tokio::test]
async fn test_member_events_carry_member_lists() {
    let log = CallLog::default();
    let added_log = log.clone();
    let removed_log = log.clone();
    let processor = processor(
        ConversationUpdateHandlers::new()
            .on_team_members_added(move |event: MembersAddedEvent| {
                let log = added_log.clone();
                async move {
                    for member in &event.members_added {
                        log.push(format!("added:{}", member.id));
                    }
                    Ok::<_, TeamsError>(())
                }
            })
            .on_team_members_removed(move |event: MembersRemovedEvent| {
                let log = removed_log.clone();
                async move {
                    for member in &event.members_removed {
                        log.push(format!("removed:{}", member.id));
                    }
                    Ok::<_, TeamsError>(())
                }
            }),
    );

    let added = Activity {
        members_added: vec![
            ChannelAccount::new("29:a", "A"),
            ChannelAccount::new("29:b", "B"),
        ],
        ..conversation_update(json!({"eventType": "teamMembersAdded", "team": {"id": "t"}}))
    };
    let removed = Activity {
        members_removed: vec![ChannelAccount::new("29:c", "C")],
        ..conversation_update(json!({"eventType": "teamMembersRemoved"}))
    };
    for activity in [added, removed] {
        let (ctx, _) = turn(activity);
        processor.process_incoming_activity(&ctx).await.unwrap();
    }

    assert_eq!(log.entries(), vec!["added:29:a", "added:29:b", "removed:29:c"]);
}

/// **Test: teamRenamed carries team and tenant.**
#[tokio::test]
async fn test_team_renamed() {
    let log = CallLog::default();
    let renamed_log = log.clone();
    let processor = processor(ConversationUpdateHandlers::new().on_team_renamed(
        move |event: TeamRenamedEvent| {
            let log = renamed_log.clone();
            async move {
                log.push(format!(
                    "{}@{}",
                    event.team.and_then(|t| t.name).unwrap_or_default(),
                    event.tenant.and_then(|t| t.id).unwrap_or_default()
                ));
                Ok::<_, TeamsError>(())
            }
        },
    ));

    let (ctx, _) = turn(conversation_update(json!({
        "eventType": "teamRenamed",
        "team": {"id": "19:team", "name": "New Name"},
        "tenant": {"id": "tenant-1"}
    })));
    processor.process_incoming_activity(&ctx).await.unwrap();
    assert_eq!(log.entries(), vec!["New Name@tenant-1"]);
}

/// **Test: A failing specific handler stops the turn before the generic hook.**
#[tokio::test]
async fn test_specific_handler_error_propagates() {
    let log = CallLog::default();
    let processor = processor(
        ConversationUpdateHandlers::new()
            .on_team_renamed(|_event: TeamRenamedEvent| async move {
                Err::<(), _>(TeamsError::Handler(HandlerError::MissingTeam))
            })
            .on_conversation_update_activity(Record::new(&log, "conversationUpdate")),
    );

    let (ctx, _) = turn(conversation_update(json!({"eventType": "teamRenamed"})));
    let err = processor.process_incoming_activity(&ctx).await.unwrap_err();
    assert!(matches!(err, TeamsError::Handler(HandlerError::MissingTeam)));
    assert!(log.entries().is_empty());
}

/// **Test: A malformed unrelated channel-data field does not hide the event type.**
///
/// **Setup:** channel-renamed handler and the generic hook.
/// **Action:** Process `channelRenamed` whose `notification.alert` is a string.
/// **Expected:** The renamed handler still runs with channel, team and tenant; then the generic hook.
#[tokio::test]
async fn test_malformed_notification_still_routes_event() {
    let log = CallLog::default();
    let handlers = ConversationUpdateHandlers::new()
        .on_channel_renamed(channel_logger(&log, "renamed"))
        .on_conversation_update_activity(Record::new(&log, "conversationUpdate"));

    let (ctx, _) = turn(conversation_update(json!({
        "eventType": "channelRenamed",
        "channel": {"id": "19:channel", "name": "Renamed"},
        "team": {"id": "19:team"},
        "tenant": {"id": "tenant-1"},
        "notification": {"alert": "true"}
    })));
    processor(handlers).process_incoming_activity(&ctx).await.unwrap();

    assert_eq!(log.entries(), vec!["renamed:Renamed", "conversationUpdate"]);
}

/// **Test: A channel-data field of the wrong type is dropped on its own.**
#[tokio::test]
async fn test_malformed_team_field_leaves_team_empty() {
    let seen: Arc<std::sync::Mutex<Vec<(Option<String>, Option<String>)>>> = Arc::default();
    let seen_in_handler = seen.clone();
    let handlers = ConversationUpdateHandlers::new().on_team_renamed(move |event: TeamRenamedEvent| {
        let seen = seen_in_handler.clone();
        async move {
            seen.lock().unwrap().push((
                event.team.and_then(|t| t.id),
                event.tenant.and_then(|t| t.id),
            ));
            Ok::<_, TeamsError>(())
        }
    });

    let (ctx, _) = turn(conversation_update(json!({
        "eventType": "teamRenamed",
        "team": "19:team",
        "tenant": {"id": "tenant-1"}
    })));
    processor(handlers).process_incoming_activity(&ctx).await.unwrap();

    assert_eq!(
        *seen.lock().unwrap(),
        vec![(None, Some("tenant-1".to_string()))]
    );
}
