//! Messaging dataset: one connected Gmail account of Tim Apple with a
//! channel, two threads and their messages and participants.
//!
//! The steps run in order without a surrounding transaction; each one
//! references rows written by the steps before it.

use super::people::person_id;
use crate::seeds::{execute_insert, insert_into, seed_record_id, TIM};
use crate::steps::SeedContext;
use chrono::{Duration, Utc};
use devseed_orm::metadata::standard::{
    CONNECTED_ACCOUNT, MESSAGE, MESSAGE_CHANNEL, MESSAGE_CHANNEL_MESSAGE_ASSOCIATION,
    MESSAGE_PARTICIPANT, MESSAGE_THREAD,
};
use devseed_orm::OrmResult;
use sqlx::PgConnection;
use uuid::Uuid;

pub const SEED_MESSAGE_THREADS: &[&str] = &["thread-1", "thread-2"];

#[derive(Debug, Clone, Copy)]
pub struct SeedMessage {
    pub key: &'static str,
    pub thread: &'static str,
    pub subject: &'static str,
    pub text: &'static str,
    pub received_hours_ago: i64,
    pub direction: &'static str,
}

pub const SEED_MESSAGES: &[SeedMessage] = &[
    SeedMessage {
        key: "message-1",
        thread: "thread-1",
        subject: "Meeting Request",
        text: "Hello, I would like to schedule a meeting with you regarding the enterprise plan.",
        received_hours_ago: 48,
        direction: "outgoing",
    },
    SeedMessage {
        key: "message-2",
        thread: "thread-1",
        subject: "Re: Meeting Request",
        text: "Sure, tomorrow at 10am works for me.",
        received_hours_ago: 30,
        direction: "incoming",
    },
    SeedMessage {
        key: "message-3",
        thread: "thread-2",
        subject: "Onboarding",
        text: "Thanks for signing up. Here is everything you need to get started.",
        received_hours_ago: 6,
        direction: "outgoing",
    },
];

#[derive(Debug, Clone, Copy)]
pub struct SeedParticipant {
    pub message: &'static str,
    pub role: &'static str,
    pub handle: &'static str,
    pub display_name: &'static str,
    /// Key of a seeded person, when the handle belongs to one
    pub person: Option<&'static str>,
    /// True when the handle is the workspace member owning the account
    pub is_member: bool,
}

pub const SEED_MESSAGE_PARTICIPANTS: &[SeedParticipant] = &[
    SeedParticipant {
        message: "message-1",
        role: "from",
        handle: TIM.email,
        display_name: "Tim Apple",
        person: None,
        is_member: true,
    },
    SeedParticipant {
        message: "message-1",
        role: "to",
        handle: "christoph.calisto@linkedin.com",
        display_name: "Christoph Callisto",
        person: Some("christoph"),
        is_member: false,
    },
    SeedParticipant {
        message: "message-2",
        role: "from",
        handle: "christoph.calisto@linkedin.com",
        display_name: "Christoph Callisto",
        person: Some("christoph"),
        is_member: false,
    },
    SeedParticipant {
        message: "message-2",
        role: "to",
        handle: TIM.email,
        display_name: "Tim Apple",
        person: None,
        is_member: true,
    },
    SeedParticipant {
        message: "message-3",
        role: "from",
        handle: TIM.email,
        display_name: "Tim Apple",
        person: None,
        is_member: true,
    },
    SeedParticipant {
        message: "message-3",
        role: "to",
        handle: "ashley.parker@qonto.com",
        display_name: "Ashley Parker",
        person: Some("ashley"),
        is_member: false,
    },
];

pub fn message_thread_id(key: &str) -> Uuid {
    seed_record_id("messageThread", key)
}

pub fn message_id(key: &str) -> Uuid {
    seed_record_id("message", key)
}

pub fn connected_account_id() -> Uuid {
    seed_record_id("connectedAccount", TIM.key)
}

pub fn message_channel_id() -> Uuid {
    seed_record_id("messageChannel", TIM.key)
}

pub async fn seed_message_threads(conn: &mut PgConnection, ctx: &SeedContext<'_>) -> OrmResult<u64> {
    let mut builder = insert_into(ctx.schema, &MESSAGE_THREAD, &["id"]);
    builder.push_values(SEED_MESSAGE_THREADS, |mut row, key| {
        row.push_bind(message_thread_id(key));
    });
    execute_insert(conn, builder).await
}

pub async fn seed_connected_accounts(conn: &mut PgConnection, ctx: &SeedContext<'_>) -> OrmResult<u64> {
    let mut builder = insert_into(
        ctx.schema,
        &CONNECTED_ACCOUNT,
        &["id", "handle", "provider", "accessToken", "refreshToken", "accountOwnerId"],
    );
    builder.push_values([TIM], |mut row, user| {
        row.push_bind(connected_account_id())
            .push_bind(user.email)
            .push_bind("google")
            .push_bind("exampleAccessToken")
            .push_bind("exampleRefreshToken")
            .push_bind(user.workspace_member_id());
    });
    execute_insert(conn, builder).await
}

pub async fn seed_messages(conn: &mut PgConnection, ctx: &SeedContext<'_>) -> OrmResult<u64> {
    let now = Utc::now();
    let mut builder = insert_into(
        ctx.schema,
        &MESSAGE,
        &["id", "headerMessageId", "subject", "text", "receivedAt", "direction", "messageThreadId"],
    );
    builder.push_values(SEED_MESSAGES, |mut row, message| {
        row.push_bind(message_id(message.key))
            .push_bind(format!("<{}@devseed.mail>", message.key))
            .push_bind(message.subject)
            .push_bind(message.text)
            .push_bind(now - Duration::hours(message.received_hours_ago))
            .push_bind(message.direction)
            .push_bind(message_thread_id(message.thread));
    });
    execute_insert(conn, builder).await
}

pub async fn seed_message_channels(conn: &mut PgConnection, ctx: &SeedContext<'_>) -> OrmResult<u64> {
    let mut builder = insert_into(
        ctx.schema,
        &MESSAGE_CHANNEL,
        &[
            "id",
            "handle",
            "type",
            "visibility",
            "isContactAutoCreationEnabled",
            "connectedAccountId",
        ],
    );
    builder.push_values([TIM], |mut row, user| {
        row.push_bind(message_channel_id())
            .push_bind(user.email)
            .push_bind("email")
            .push_bind("share_everything")
            .push_bind(true)
            .push_bind(connected_account_id());
    });
    execute_insert(conn, builder).await
}

pub async fn seed_message_channel_message_associations(
    conn: &mut PgConnection,
    ctx: &SeedContext<'_>,
) -> OrmResult<u64> {
    let mut builder = insert_into(
        ctx.schema,
        &MESSAGE_CHANNEL_MESSAGE_ASSOCIATION,
        &[
            "id",
            "messageChannelId",
            "messageId",
            "messageExternalId",
            "messageThreadId",
            "messageThreadExternalId",
        ],
    );
    builder.push_values(SEED_MESSAGES, |mut row, message| {
        row.push_bind(seed_record_id("messageChannelMessageAssociation", message.key))
            .push_bind(message_channel_id())
            .push_bind(message_id(message.key))
            .push_bind(format!("external-{}", message.key))
            .push_bind(message_thread_id(message.thread))
            .push_bind(format!("external-{}", message.thread));
    });
    execute_insert(conn, builder).await
}

pub async fn seed_message_participants(conn: &mut PgConnection, ctx: &SeedContext<'_>) -> OrmResult<u64> {
    let mut builder = insert_into(
        ctx.schema,
        &MESSAGE_PARTICIPANT,
        &["id", "messageId", "role", "handle", "displayName", "personId", "workspaceMemberId"],
    );
    builder.push_values(SEED_MESSAGE_PARTICIPANTS, |mut row, participant| {
        let key = format!("{}:{}:{}", participant.message, participant.role, participant.handle);
        row.push_bind(seed_record_id("messageParticipant", &key))
            .push_bind(message_id(participant.message))
            .push_bind(participant.role)
            .push_bind(participant.handle)
            .push_bind(participant.display_name)
            .push_bind(participant.person.map(person_id))
            .push_bind(participant.is_member.then(|| TIM.workspace_member_id()));
    });
    execute_insert(conn, builder).await
}
