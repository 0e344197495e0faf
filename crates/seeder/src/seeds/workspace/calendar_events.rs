use crate::seeds::{execute_insert, insert_into, seed_record_id};
use crate::steps::SeedContext;
use chrono::{DateTime, Duration, DurationRound, Utc};
use devseed_orm::metadata::standard::CALENDAR_EVENT;
use devseed_orm::OrmResult;
use sqlx::PgConnection;

#[derive(Debug, Clone, Copy)]
pub struct SeedCalendarEvent {
    pub key: &'static str,
    pub title: &'static str,
    /// Hours from the start of the current hour
    pub starts_in_hours: i64,
    pub duration_hours: i64,
    pub is_full_day: bool,
    pub description: &'static str,
    pub location: &'static str,
    pub conference_solution: &'static str,
    pub conference_link: &'static str,
}

pub const SEED_CALENDAR_EVENTS: &[SeedCalendarEvent] = &[
    SeedCalendarEvent {
        key: "meeting-with-christoph",
        title: "Meeting with Christoph",
        starts_in_hours: 24,
        duration_hours: 1,
        is_full_day: false,
        description: "Discuss the enterprise plan",
        location: "Seattle",
        conference_solution: "GOOGLE_MEET",
        conference_link: "https://meet.google.com/xxx-xxxx-xxx",
    },
    SeedCalendarEvent {
        key: "qonto-onboarding",
        title: "Qonto onboarding",
        starts_in_hours: 72,
        duration_hours: 2,
        is_full_day: false,
        description: "Onboarding session for the new seats",
        location: "Paris",
        conference_solution: "ZOOM",
        conference_link: "https://zoom.us/j/1234567890",
    },
];

fn current_hour(now: DateTime<Utc>) -> DateTime<Utc> {
    now.duration_trunc(Duration::hours(1)).unwrap_or(now)
}

pub async fn seed_calendar_events(conn: &mut PgConnection, ctx: &SeedContext<'_>) -> OrmResult<u64> {
    let now = Utc::now();
    let base = current_hour(now);
    let mut builder = insert_into(
        ctx.schema,
        &CALENDAR_EVENT,
        &[
            "id",
            "title",
            "isCanceled",
            "isFullDay",
            "startsAt",
            "endsAt",
            "externalCreatedAt",
            "externalUpdatedAt",
            "description",
            "location",
            "iCalUID",
            "conferenceSolution",
            "conferenceLinkUrl",
        ],
    );
    builder.push_values(SEED_CALENDAR_EVENTS, |mut row, event| {
        let starts_at = base + Duration::hours(event.starts_in_hours);
        row.push_bind(seed_record_id("calendarEvent", event.key))
            .push_bind(event.title)
            .push_bind(false)
            .push_bind(event.is_full_day)
            .push_bind(starts_at)
            .push_bind(starts_at + Duration::hours(event.duration_hours))
            .push_bind(now)
            .push_bind(now)
            .push_bind(event.description)
            .push_bind(event.location)
            .push_bind(format!("event-{}@devseed", event.key))
            .push_bind(event.conference_solution)
            .push_bind(event.conference_link);
    });
    execute_insert(conn, builder).await
}
