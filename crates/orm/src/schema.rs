//! Workspace schema provisioning.

use crate::error::{ModelError, OrmResult};
use crate::identifiers::quote_ident;
use sqlx::PgPool;
use uuid::Uuid;

const SCHEMA_PREFIX: &str = "workspace_";

/// Lowercase base-36 rendering of the 128-bit uuid value
pub fn uuid_to_base36(id: &Uuid) -> String {
    let mut value = id.as_u128();
    if value == 0 {
        return "0".to_string();
    }

    let mut digits = Vec::with_capacity(25);
    while value > 0 {
        let digit = (value % 36) as u32;
        digits.push(std::char::from_digit(digit, 36).unwrap_or('0'));
        value /= 36;
    }
    digits.iter().rev().collect()
}

/// Name of the dedicated schema for a workspace: `workspace_<base36 id>`
pub fn workspace_schema_name(workspace_id: &Uuid) -> String {
    format!("{}{}", SCHEMA_PREFIX, uuid_to_base36(workspace_id))
}

/// Creates per-workspace schemas on the administrative connection
#[derive(Debug, Clone)]
pub struct SchemaProvisioner {
    pool: PgPool,
}

impl SchemaProvisioner {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the workspace schema if missing and return its name
    pub async fn create_workspace_schema(&self, workspace_id: &Uuid) -> OrmResult<String> {
        let schema = workspace_schema_name(workspace_id);
        let sql = format!("CREATE SCHEMA IF NOT EXISTS {}", quote_ident(&schema));

        sqlx::query(&sql)
            .execute(&self.pool)
            .await
            .map_err(|e| ModelError::Schema(format!("Failed to create schema {}: {}", schema, e)))?;

        tracing::info!(%workspace_id, schema = %schema, "workspace schema ready");
        Ok(schema)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base36_matches_known_values() {
        assert_eq!(uuid_to_base36(&Uuid::nil()), "0");
        assert_eq!(uuid_to_base36(&Uuid::from_u128(35)), "z");
        assert_eq!(uuid_to_base36(&Uuid::from_u128(36)), "10");
        assert_eq!(uuid_to_base36(&Uuid::from_u128(u128::MAX)), "f5lxx1zz5pnorynqglhzmsp33");
    }

    #[test]
    fn schema_names_are_prefixed_and_distinct() {
        let apple = Uuid::parse_str("20202020-1c25-4d02-bf25-6aeccf7ea419").unwrap();
        let twenty = Uuid::parse_str("20202020-1c25-4d02-bf25-6aeccf7ea420").unwrap();

        let apple_schema = workspace_schema_name(&apple);
        assert!(apple_schema.starts_with("workspace_"));
        assert!(apple_schema[SCHEMA_PREFIX.len()..]
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
        assert_ne!(apple_schema, workspace_schema_name(&twenty));
        assert_eq!(apple_schema, workspace_schema_name(&apple));
    }
}
