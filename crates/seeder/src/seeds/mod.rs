//! The development dataset.
//!
//! [`core_schema`] writes the shared rows of the `core` schema (workspace,
//! users, memberships, feature flags); [`workspace`] fills one workspace
//! schema. Record ids are uuid v5 values derived from a kind and a key, so
//! every run writes the same ids and `ON CONFLICT DO NOTHING` keeps reruns
//! harmless.

pub mod core_schema;
pub mod workspace;

pub use workspace::run_step;

use devseed_orm::metadata::standard::StandardObject;
use devseed_orm::{qualified_table, quote_ident, OrmResult};
use sqlx::{PgConnection, Postgres, QueryBuilder};
use uuid::{uuid, Uuid};

pub const SEED_RECORD_NAMESPACE: Uuid = uuid!("20202020-5eed-4000-8000-646576736565");

/// Deterministic id of a seeded record
pub fn seed_record_id(kind: &str, key: &str) -> Uuid {
    let name = format!("{}:{}", kind, key);
    Uuid::new_v5(&SEED_RECORD_NAMESPACE, name.as_bytes())
}

/// A user of the `core` schema, member of one or more seed workspaces
#[derive(Debug, Clone, Copy)]
pub struct SeedUser {
    pub key: &'static str,
    pub first_name: &'static str,
    pub last_name: &'static str,
    pub email: &'static str,
    pub can_impersonate: bool,
}

impl SeedUser {
    pub fn id(&self) -> Uuid {
        seed_record_id("user", self.key)
    }

    pub fn workspace_member_id(&self) -> Uuid {
        seed_record_id("workspaceMember", self.key)
    }
}

pub const TIM: SeedUser = SeedUser {
    key: "tim",
    first_name: "Tim",
    last_name: "Apple",
    email: "tim@apple.dev",
    can_impersonate: true,
};

pub const JONY: SeedUser = SeedUser {
    key: "jony",
    first_name: "Jony",
    last_name: "Ive",
    email: "jony.ive@apple.dev",
    can_impersonate: true,
};

pub const PHIL: SeedUser = SeedUser {
    key: "phil",
    first_name: "Phil",
    last_name: "Schiler",
    email: "phil.schiler@apple.dev",
    can_impersonate: true,
};

pub const SEED_USERS: &[SeedUser] = &[TIM, JONY, PHIL];

/// Users that belong to a workspace: every seed user in the Apple
/// workspace, Tim alone everywhere else
pub fn workspace_users(workspace_id: &Uuid) -> &'static [SeedUser] {
    if *workspace_id == devseed_core::SEED_APPLE_WORKSPACE_ID {
        SEED_USERS
    } else {
        &SEED_USERS[..1]
    }
}

/// `INSERT INTO <schema>.<object> (<columns>) ` ready for `push_values`
pub(crate) fn insert_into<'args>(
    schema: &str,
    object: &StandardObject,
    columns: &[&str],
) -> QueryBuilder<'args, Postgres> {
    let columns = columns
        .iter()
        .map(|column| quote_ident(column))
        .collect::<Vec<_>>()
        .join(", ");
    QueryBuilder::new(format!(
        "INSERT INTO {} ({}) ",
        qualified_table(schema, object.name_singular),
        columns
    ))
}

/// Finish an insert with `ON CONFLICT ("id") DO NOTHING` and run it
pub(crate) async fn execute_insert(
    conn: &mut PgConnection,
    mut builder: QueryBuilder<'_, Postgres>,
) -> OrmResult<u64> {
    builder.push(r#" ON CONFLICT ("id") DO NOTHING"#);
    let result = builder.build().execute(&mut *conn).await?;
    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;
    use devseed_core::{SEED_APPLE_WORKSPACE_ID, SEED_TWENTY_WORKSPACE_ID};
    use devseed_orm::metadata::standard::COMPANY;

    #[test]
    fn record_ids_are_stable_and_scoped_by_kind() {
        assert_eq!(seed_record_id("company", "qonto"), seed_record_id("company", "qonto"));
        assert_ne!(seed_record_id("company", "qonto"), seed_record_id("person", "qonto"));
        assert_eq!(seed_record_id("company", "qonto").get_version_num(), 5);
    }

    #[test]
    fn apple_has_every_user() {
        assert_eq!(workspace_users(&SEED_APPLE_WORKSPACE_ID).len(), 3);
        let twenty: Vec<_> = workspace_users(&SEED_TWENTY_WORKSPACE_ID)
            .iter()
            .map(|u| u.key)
            .collect();
        assert_eq!(twenty, ["tim"]);
    }

    #[test]
    fn insert_statement_quotes_columns() {
        let builder = insert_into("workspace_abc", &COMPANY, &["id", "domainName"]);
        assert_eq!(
            builder.sql(),
            r#"INSERT INTO "workspace_abc"."company" ("id", "domainName") "#
        );
    }
}
