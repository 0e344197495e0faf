//! Rows of the shared `core` schema for one workspace.

use super::{seed_record_id, workspace_users, SEED_USERS};
use devseed_core::{SEED_APPLE_WORKSPACE_ID, SEED_TWENTY_WORKSPACE_ID};
use devseed_orm::{qualified_table, OrmResult};
use sqlx::{PgConnection, Postgres, QueryBuilder};
use uuid::Uuid;

/// Feature flags switched on for every seed workspace
pub const SEED_FEATURE_FLAGS: &[&str] = &[
    "IS_BLOCKLIST_ENABLED",
    "IS_CALENDAR_ENABLED",
    "IS_EVENT_OBJECT_ENABLED",
    "IS_MESSAGING_ENABLED",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedWorkspace {
    pub id: Uuid,
    pub display_name: &'static str,
    pub domain_name: Option<&'static str>,
    pub logo: Option<&'static str>,
}

pub fn seed_workspace(workspace_id: &Uuid) -> SeedWorkspace {
    match *workspace_id {
        id if id == SEED_APPLE_WORKSPACE_ID => SeedWorkspace {
            id,
            display_name: "Apple",
            domain_name: Some("apple.dev"),
            logo: Some("https://twentyhq.github.io/placeholder-images/workspaces/apple-logo.png"),
        },
        id if id == SEED_TWENTY_WORKSPACE_ID => SeedWorkspace {
            id,
            display_name: "Twenty",
            domain_name: Some("twenty.com"),
            logo: Some("https://twentyhq.github.io/placeholder-images/workspaces/twenty-logo.png"),
        },
        id => SeedWorkspace {
            id,
            display_name: "Development workspace",
            domain_name: None,
            logo: None,
        },
    }
}

/// Insert the workspace row, the seed users, their memberships and the
/// feature flags. Existing rows are left untouched.
pub async fn seed_core_schema(
    conn: &mut PgConnection,
    core_schema: &str,
    workspace_id: &Uuid,
) -> OrmResult<()> {
    let workspace = seed_workspace(workspace_id);

    sqlx::query(&format!(
        r#"INSERT INTO {} ("id", "displayName", "domainName", "inviteHash", "logo")
           VALUES ($1, $2, $3, $4, $5)
           ON CONFLICT ("id") DO NOTHING"#,
        qualified_table(core_schema, "workspace")
    ))
    .bind(workspace.id)
    .bind(workspace.display_name)
    .bind(workspace.domain_name)
    .bind(format!("{}-invite", workspace.id.simple()))
    .bind(workspace.logo)
    .execute(&mut *conn)
    .await?;

    // Users are shared across workspaces; the first workspace seeded becomes their default
    let mut users: QueryBuilder<Postgres> = QueryBuilder::new(format!(
        r#"INSERT INTO {} ("id", "firstName", "lastName", "email", "passwordHash", "canImpersonate", "defaultWorkspaceId") "#,
        qualified_table(core_schema, "user")
    ));
    users.push_values(SEED_USERS, |mut row, user| {
        row.push_bind(user.id())
            .push_bind(user.first_name)
            .push_bind(user.last_name)
            .push_bind(user.email)
            .push_bind(DEV_PASSWORD_HASH)
            .push_bind(user.can_impersonate)
            .push_bind(workspace.id);
    });
    users.push(r#" ON CONFLICT ("id") DO NOTHING"#);
    users.build().execute(&mut *conn).await?;

    let mut memberships: QueryBuilder<Postgres> = QueryBuilder::new(format!(
        r#"INSERT INTO {} ("id", "userId", "workspaceId") "#,
        qualified_table(core_schema, "userWorkspace")
    ));
    memberships.push_values(workspace_users(workspace_id), |mut row, user| {
        row.push_bind(user_workspace_id(user.key, &workspace.id))
            .push_bind(user.id())
            .push_bind(workspace.id);
    });
    memberships.push(r#" ON CONFLICT ("id") DO NOTHING"#);
    memberships.build().execute(&mut *conn).await?;

    let mut flags: QueryBuilder<Postgres> = QueryBuilder::new(format!(
        r#"INSERT INTO {} ("id", "key", "workspaceId", "value") "#,
        qualified_table(core_schema, "featureFlag")
    ));
    flags.push_values(SEED_FEATURE_FLAGS, |mut row, key| {
        row.push_bind(seed_record_id("featureFlag", &format!("{}:{}", workspace.id, key)))
            .push_bind(*key)
            .push_bind(workspace.id)
            .push_bind(true);
    });
    flags.push(r#" ON CONFLICT ("id") DO NOTHING"#);
    flags.build().execute(&mut *conn).await?;

    tracing::debug!(
        %workspace_id,
        workspace = workspace.display_name,
        "core schema seeded"
    );
    Ok(())
}

/// Password hash shared by every seed user
pub const DEV_PASSWORD_HASH: &str = "$2b$10$66d.6DuQExxnrfI9rMqOg.U1XIYpagr6Lv05uoWLYbYmtK0HDIvS6";

pub fn user_workspace_id(user_key: &str, workspace_id: &Uuid) -> Uuid {
    seed_record_id("userWorkspace", &format!("{}:{}", user_key, workspace_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_workspaces_have_domains() {
        assert_eq!(
            seed_workspace(&SEED_APPLE_WORKSPACE_ID).domain_name,
            Some("apple.dev")
        );
        assert_eq!(
            seed_workspace(&SEED_TWENTY_WORKSPACE_ID).domain_name,
            Some("twenty.com")
        );
        let custom = seed_workspace(&Uuid::nil());
        assert_eq!(custom.domain_name, None);
        assert_eq!(custom.id, Uuid::nil());
    }

    #[test]
    fn memberships_differ_per_workspace() {
        assert_ne!(
            user_workspace_id("tim", &SEED_APPLE_WORKSPACE_ID),
            user_workspace_id("tim", &SEED_TWENTY_WORKSPACE_ID)
        );
    }
}
