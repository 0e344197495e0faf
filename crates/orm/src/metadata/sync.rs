//! Minimal standard-object synchronizer.
//!
//! Creates the standard tables inside a workspace schema and registers one
//! object metadata row per standard object and one field metadata row per
//! column. Existing rows (matched on workspace and standard id) are reused,
//! so a second run only fills in what is missing.

use super::standard::{StandardField, StandardObject, STANDARD_OBJECTS};
use crate::data_source::{DataSourceDescriptor, DataSourceRepository};
use crate::error::{ModelError, OrmResult};
use crate::identifiers::qualified_table;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

/// Rows inserted by one synchronization
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncSummary {
    pub objects_created: usize,
    pub fields_created: usize,
}

#[derive(Debug, Clone)]
pub struct MetadataSynchronizer {
    pool: PgPool,
    data_sources: DataSourceRepository,
    objects_table: String,
    fields_table: String,
}

impl MetadataSynchronizer {
    pub fn new(pool: PgPool, metadata_schema: &str) -> Self {
        Self {
            data_sources: DataSourceRepository::new(pool.clone(), metadata_schema),
            pool,
            objects_table: qualified_table(metadata_schema, "objectMetadata"),
            fields_table: qualified_table(metadata_schema, "fieldMetadata"),
        }
    }

    pub async fn synchronize(
        &self,
        workspace_id: &Uuid,
        data_source_id: &Uuid,
    ) -> OrmResult<SyncSummary> {
        let data_source = self.data_sources.find_by_id(data_source_id).await?;
        if data_source.workspace_id != *workspace_id {
            return Err(ModelError::Configuration(format!(
                "data source {} belongs to workspace {}, not {}",
                data_source_id, data_source.workspace_id, workspace_id
            )));
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| ModelError::Transaction(format!("Failed to begin sync: {}", e)))?;

        let mut summary = SyncSummary::default();
        for object in STANDARD_OBJECTS {
            sqlx::query(&object.create_table_sql(&data_source.schema))
                .execute(&mut *tx)
                .await?;

            let (object_id, created) = self
                .ensure_object(&mut tx, &data_source, object)
                .await?;
            if created {
                summary.objects_created += 1;
            }

            for field in object.all_fields() {
                if self
                    .ensure_field(&mut tx, workspace_id, object, object_id, field)
                    .await?
                {
                    summary.fields_created += 1;
                }
            }
        }

        tx.commit()
            .await
            .map_err(|e| ModelError::Transaction(format!("Failed to commit sync: {}", e)))?;

        tracing::info!(
            %workspace_id,
            schema = %data_source.schema,
            objects_created = summary.objects_created,
            fields_created = summary.fields_created,
            "metadata synchronized"
        );
        Ok(summary)
    }

    async fn ensure_object(
        &self,
        conn: &mut PgConnection,
        data_source: &DataSourceDescriptor,
        object: &StandardObject,
    ) -> OrmResult<(Uuid, bool)> {
        let existing: Option<Uuid> = sqlx::query_scalar(&format!(
            r#"SELECT "id" FROM {} WHERE "workspaceId" = $1 AND "standardId" = $2"#,
            self.objects_table
        ))
        .bind(data_source.workspace_id)
        .bind(object.standard_id())
        .fetch_optional(&mut *conn)
        .await?;

        if let Some(id) = existing {
            return Ok((id, false));
        }

        let id = Uuid::new_v4();
        sqlx::query(&format!(
            r#"INSERT INTO {} ("id", "standardId", "dataSourceId", "workspaceId",
                 "nameSingular", "namePlural", "labelSingular", "labelPlural",
                 "targetTableName", "isCustom", "isActive", "isSystem")
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $5, false, true, $9)"#,
            self.objects_table
        ))
        .bind(id)
        .bind(object.standard_id())
        .bind(data_source.id)
        .bind(data_source.workspace_id)
        .bind(object.name_singular)
        .bind(object.name_plural)
        .bind(object.label_singular)
        .bind(object.label_plural)
        .bind(object.is_system)
        .execute(&mut *conn)
        .await?;

        Ok((id, true))
    }

    async fn ensure_field(
        &self,
        conn: &mut PgConnection,
        workspace_id: &Uuid,
        object: &StandardObject,
        object_id: Uuid,
        field: &StandardField,
    ) -> OrmResult<bool> {
        let standard_id = object.field_standard_id(field.name);
        let existing: Option<Uuid> = sqlx::query_scalar(&format!(
            r#"SELECT "id" FROM {} WHERE "objectMetadataId" = $1 AND "standardId" = $2"#,
            self.fields_table
        ))
        .bind(object_id)
        .bind(standard_id)
        .fetch_optional(&mut *conn)
        .await?;

        if existing.is_some() {
            return Ok(false);
        }

        sqlx::query(&format!(
            r#"INSERT INTO {} ("id", "standardId", "objectMetadataId", "workspaceId",
                 "type", "name", "label", "isCustom", "isActive", "isNullable")
               VALUES ($1, $2, $3, $4, $5, $6, $7, false, true, $8)"#,
            self.fields_table
        ))
        .bind(Uuid::new_v4())
        .bind(standard_id)
        .bind(object_id)
        .bind(workspace_id)
        .bind(field.field_type.metadata_type())
        .bind(field.name)
        .bind(field.label)
        .bind(field.name != "id")
        .execute(&mut *conn)
        .await?;

        Ok(true)
    }
}
