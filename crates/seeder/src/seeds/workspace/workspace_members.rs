use crate::seeds::{execute_insert, insert_into, workspace_users};
use crate::steps::SeedContext;
use devseed_orm::metadata::standard::WORKSPACE_MEMBER;
use devseed_orm::OrmResult;
use sqlx::PgConnection;

/// One member row per core user of the workspace
pub async fn seed_workspace_members(conn: &mut PgConnection, ctx: &SeedContext<'_>) -> OrmResult<u64> {
    let mut builder = insert_into(
        ctx.schema,
        &WORKSPACE_MEMBER,
        &[
            "id",
            "nameFirstName",
            "nameLastName",
            "locale",
            "colorScheme",
            "userEmail",
            "userId",
        ],
    );
    builder.push_values(workspace_users(&ctx.workspace_id), |mut row, user| {
        row.push_bind(user.workspace_member_id())
            .push_bind(user.first_name)
            .push_bind(user.last_name)
            .push_bind("en")
            .push_bind("Light")
            .push_bind(user.email)
            .push_bind(user.id());
    });
    execute_insert(conn, builder).await
}
