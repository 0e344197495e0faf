//! Data-source registry in the metadata schema.
//!
//! A data source records which physical schema holds a workspace's data. The
//! seed command registers one per workspace per run and reads the latest one
//! back when it connects.

use crate::error::{ModelError, OrmResult};
use crate::identifiers::qualified_table;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

const DATA_SOURCE_TABLE: &str = "dataSource";

/// Identifies the physical schema of a workspace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSourceDescriptor {
    pub id: Uuid,
    pub workspace_id: Uuid,
    pub schema: String,
}

impl DataSourceDescriptor {
    fn from_row(row: &PgRow) -> OrmResult<Self> {
        Ok(Self {
            id: row.try_get("id")?,
            workspace_id: row.try_get("workspaceId")?,
            schema: row.try_get("schema")?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct DataSourceRepository {
    pool: PgPool,
    table: String,
}

impl DataSourceRepository {
    pub fn new(pool: PgPool, metadata_schema: &str) -> Self {
        Self {
            pool,
            table: qualified_table(metadata_schema, DATA_SOURCE_TABLE),
        }
    }

    /// Record `schema` as a data source of `workspace_id`
    pub async fn create_data_source_metadata(
        &self,
        workspace_id: &Uuid,
        schema: &str,
    ) -> OrmResult<DataSourceDescriptor> {
        let sql = format!(
            r#"INSERT INTO {} ("id", "workspaceId", "schema", "type")
               VALUES ($1, $2, $3, 'postgres')
               RETURNING "id", "workspaceId", "schema""#,
            self.table
        );

        let row = sqlx::query(&sql)
            .bind(Uuid::new_v4())
            .bind(workspace_id)
            .bind(schema)
            .fetch_one(&self.pool)
            .await?;

        let descriptor = DataSourceDescriptor::from_row(&row)?;
        tracing::debug!(
            data_source_id = %descriptor.id,
            %workspace_id,
            schema,
            "registered data source"
        );
        Ok(descriptor)
    }

    /// Most recently created data source of a workspace; `NotFound` if none
    pub async fn last_data_source_for_workspace(
        &self,
        workspace_id: &Uuid,
    ) -> OrmResult<DataSourceDescriptor> {
        let sql = format!(
            r#"SELECT "id", "workspaceId", "schema" FROM {}
               WHERE "workspaceId" = $1
               ORDER BY "createdAt" DESC
               LIMIT 1"#,
            self.table
        );

        let row = sqlx::query(&sql)
            .bind(workspace_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| {
                ModelError::NotFound(format!("data source for workspace {}", workspace_id))
            })?;

        DataSourceDescriptor::from_row(&row)
    }

    pub async fn find_by_id(&self, data_source_id: &Uuid) -> OrmResult<DataSourceDescriptor> {
        let sql = format!(
            r#"SELECT "id", "workspaceId", "schema" FROM {} WHERE "id" = $1"#,
            self.table
        );

        let row = sqlx::query(&sql)
            .bind(data_source_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ModelError::NotFound(format!("data source {}", data_source_id)))?;

        DataSourceDescriptor::from_row(&row)
    }
}
