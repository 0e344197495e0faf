//! Seeds that write into one workspace schema.

pub mod calendar_events;
pub mod companies;
pub mod messaging;
pub mod opportunities;
pub mod people;
pub mod views;
pub mod workspace_members;

use crate::steps::{SeedContext, SeedStep};
use devseed_orm::OrmResult;
use sqlx::PgConnection;

/// Run one seed step on `conn`, which may be a plain connection or a transaction
pub async fn run_step(
    conn: &mut PgConnection,
    step: SeedStep,
    ctx: &SeedContext<'_>,
) -> OrmResult<()> {
    let inserted = match step {
        SeedStep::Companies => companies::seed_companies(conn, ctx).await?,
        SeedStep::People => people::seed_people(conn, ctx).await?,
        SeedStep::Opportunities => opportunities::seed_opportunities(conn, ctx).await?,
        SeedStep::CalendarEvents => calendar_events::seed_calendar_events(conn, ctx).await?,
        SeedStep::WorkspaceMember => workspace_members::seed_workspace_members(conn, ctx).await?,
        SeedStep::ViewPrefill => views::seed_views_with_data(conn, ctx).await?,
        SeedStep::MessageThreads => messaging::seed_message_threads(conn, ctx).await?,
        SeedStep::ConnectedAccounts => messaging::seed_connected_accounts(conn, ctx).await?,
        SeedStep::Messages => messaging::seed_messages(conn, ctx).await?,
        SeedStep::MessageChannels => messaging::seed_message_channels(conn, ctx).await?,
        SeedStep::MessageChannelMessageAssociations => {
            messaging::seed_message_channel_message_associations(conn, ctx).await?
        }
        SeedStep::MessageParticipants => messaging::seed_message_participants(conn, ctx).await?,
    };

    tracing::debug!(
        workspace_id = %ctx.workspace_id,
        schema = ctx.schema,
        %step,
        inserted,
        "seed step done"
    );
    Ok(())
}
