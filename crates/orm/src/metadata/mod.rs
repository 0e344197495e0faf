//! Object metadata: what objects and fields a workspace has.
//!
//! Seed steps that reference metadata (view prefill) look ids up by the
//! stable *standard id* of an object or field, through an
//! [`ObjectMetadataMap`] built once per workspace.

pub mod standard;
pub mod sync;

pub use sync::MetadataSynchronizer;

use crate::error::OrmResult;
use crate::identifiers::qualified_table;
use sqlx::{PgPool, Row};
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMetadata {
    pub id: String,
    pub standard_id: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectMetadata {
    pub id: String,
    pub standard_id: Option<String>,
    pub name_singular: String,
    pub fields: Vec<FieldMetadata>,
}

/// Object id plus its field ids keyed by field standard id
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectMetadataEntry {
    pub id: String,
    pub fields: HashMap<String, String>,
}

/// Object standard id -> [`ObjectMetadataEntry`]
pub type ObjectMetadataMap = HashMap<String, ObjectMetadataEntry>;

/// Index object metadata by standard id.
///
/// Objects or fields without a standard id (custom ones) are filed under the
/// empty-string key. When two entries share a key the later one wins, so at
/// most one custom object survives; seeds only look up standard ids.
pub fn build_object_metadata_map(objects: &[ObjectMetadata]) -> ObjectMetadataMap {
    objects
        .iter()
        .fold(ObjectMetadataMap::new(), |mut map, object| {
            let fields = object
                .fields
                .iter()
                .fold(HashMap::new(), |mut fields, field| {
                    fields.insert(
                        field.standard_id.clone().unwrap_or_default(),
                        field.id.clone(),
                    );
                    fields
                });

            map.insert(
                object.standard_id.clone().unwrap_or_default(),
                ObjectMetadataEntry {
                    id: object.id.clone(),
                    fields,
                },
            );
            map
        })
}

/// Reads object and field metadata rows of a workspace
#[derive(Debug, Clone)]
pub struct ObjectMetadataRepository {
    pool: PgPool,
    objects_table: String,
    fields_table: String,
}

impl ObjectMetadataRepository {
    pub fn new(pool: PgPool, metadata_schema: &str) -> Self {
        Self {
            pool,
            objects_table: qualified_table(metadata_schema, "objectMetadata"),
            fields_table: qualified_table(metadata_schema, "fieldMetadata"),
        }
    }

    /// All objects of a workspace with their fields, ordered by object name
    pub async fn find_many_within_workspace(
        &self,
        workspace_id: &Uuid,
    ) -> OrmResult<Vec<ObjectMetadata>> {
        let objects_sql = format!(
            r#"SELECT "id", "standardId", "nameSingular" FROM {}
               WHERE "workspaceId" = $1
               ORDER BY "nameSingular""#,
            self.objects_table
        );
        let fields_sql = format!(
            r#"SELECT "id", "standardId", "name", "objectMetadataId" FROM {}
               WHERE "workspaceId" = $1
               ORDER BY "name""#,
            self.fields_table
        );

        let object_rows = sqlx::query(&objects_sql)
            .bind(workspace_id)
            .fetch_all(&self.pool)
            .await?;
        let field_rows = sqlx::query(&fields_sql)
            .bind(workspace_id)
            .fetch_all(&self.pool)
            .await?;

        let mut fields_by_object: HashMap<Uuid, Vec<FieldMetadata>> = HashMap::new();
        for row in &field_rows {
            let id: Uuid = row.try_get("id")?;
            let standard_id: Option<Uuid> = row.try_get("standardId")?;
            let object_id: Uuid = row.try_get("objectMetadataId")?;
            fields_by_object
                .entry(object_id)
                .or_default()
                .push(FieldMetadata {
                    id: id.to_string(),
                    standard_id: standard_id.map(|s| s.to_string()),
                    name: row.try_get("name")?,
                });
        }

        let mut objects = Vec::with_capacity(object_rows.len());
        for row in &object_rows {
            let id: Uuid = row.try_get("id")?;
            let standard_id: Option<Uuid> = row.try_get("standardId")?;
            objects.push(ObjectMetadata {
                id: id.to_string(),
                standard_id: standard_id.map(|s| s.to_string()),
                name_singular: row.try_get("nameSingular")?,
                fields: fields_by_object.remove(&id).unwrap_or_default(),
            });
        }

        tracing::debug!(%workspace_id, objects = objects.len(), "loaded object metadata");
        Ok(objects)
    }
}
