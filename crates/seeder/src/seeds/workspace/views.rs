//! Default index views, built from the workspace's object metadata map.

use crate::seeds::{execute_insert, insert_into, seed_record_id};
use crate::steps::SeedContext;
use devseed_orm::metadata::standard::{StandardObject, COMPANY, OPPORTUNITY, PERSON, VIEW, VIEW_FIELD};
use devseed_orm::{ModelError, ObjectMetadataEntry, ObjectMetadataMap, OrmResult};
use sqlx::PgConnection;
use uuid::Uuid;

#[derive(Debug, Clone, Copy)]
pub struct SeedView {
    pub key: &'static str,
    pub name: &'static str,
    pub icon: &'static str,
    pub object: &'static StandardObject,
    /// Visible columns with their width, in display order
    pub fields: &'static [(&'static str, i32)],
}

pub const SEED_VIEWS: &[SeedView] = &[
    SeedView {
        key: "companies-all",
        name: "All Companies",
        icon: "IconBuildingSkyscraper",
        object: &COMPANY,
        fields: &[
            ("name", 180),
            ("domainName", 100),
            ("employees", 150),
            ("address", 150),
            ("linkedinLinkUrl", 170),
            ("idealCustomerProfile", 150),
            ("createdAt", 150),
        ],
    },
    SeedView {
        key: "people-all",
        name: "All People",
        icon: "IconUser",
        object: &PERSON,
        fields: &[
            ("nameFirstName", 210),
            ("nameLastName", 210),
            ("email", 150),
            ("companyId", 150),
            ("phone", 150),
            ("jobTitle", 150),
            ("city", 150),
            ("createdAt", 150),
        ],
    },
    SeedView {
        key: "opportunities-all",
        name: "All Opportunities",
        icon: "IconTargetArrow",
        object: &OPPORTUNITY,
        fields: &[
            ("name", 150),
            ("amountAmountMicros", 150),
            ("closeDate", 150),
            ("probability", 150),
            ("companyId", 150),
            ("pointOfContactId", 150),
            ("stage", 150),
        ],
    },
];

/// Resolved view: metadata ids looked up in the workspace map
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedView {
    pub id: Uuid,
    pub name: &'static str,
    pub icon: &'static str,
    pub object_metadata_id: Uuid,
    pub position: f64,
    pub fields: Vec<ResolvedViewField>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedViewField {
    pub id: Uuid,
    pub field_metadata_id: Uuid,
    pub size: i32,
    pub position: f64,
}

fn parse_metadata_id(raw: &str, what: &str) -> OrmResult<Uuid> {
    Uuid::parse_str(raw)
        .map_err(|e| ModelError::Query(format!("invalid {} metadata id '{}': {}", what, raw, e)))
}

fn object_entry<'m>(map: &'m ObjectMetadataMap, object: &StandardObject) -> OrmResult<&'m ObjectMetadataEntry> {
    map.get(&object.standard_id().to_string()).ok_or_else(|| {
        ModelError::NotFound(format!(
            "object metadata for '{}' is missing from the workspace",
            object.name_singular
        ))
    })
}

/// Look every view and column up in `map`. A missing object or field fails
/// the whole prefill.
pub fn resolve_views(map: &ObjectMetadataMap) -> OrmResult<Vec<ResolvedView>> {
    SEED_VIEWS
        .iter()
        .enumerate()
        .map(|(view_position, view)| -> OrmResult<ResolvedView> {
            let entry = object_entry(map, view.object)?;
            let view_id = seed_record_id("view", view.key);

            let fields = view
                .fields
                .iter()
                .enumerate()
                .map(|(position, (name, size))| -> OrmResult<ResolvedViewField> {
                    let standard_id = view.object.field_standard_id(name).to_string();
                    let field_id = entry.fields.get(&standard_id).ok_or_else(|| {
                        ModelError::NotFound(format!(
                            "field metadata for '{}.{}' is missing from the workspace",
                            view.object.name_singular, name
                        ))
                    })?;
                    Ok(ResolvedViewField {
                        id: seed_record_id("viewField", &format!("{}:{}", view.key, name)),
                        field_metadata_id: parse_metadata_id(field_id, "field")?,
                        size: *size,
                        position: position as f64,
                    })
                })
                .collect::<OrmResult<Vec<_>>>()?;

            Ok(ResolvedView {
                id: view_id,
                name: view.name,
                icon: view.icon,
                object_metadata_id: parse_metadata_id(&entry.id, "object")?,
                position: view_position as f64,
                fields,
            })
        })
        .collect()
}

pub async fn seed_views_with_data(conn: &mut PgConnection, ctx: &SeedContext<'_>) -> OrmResult<u64> {
    let views = resolve_views(ctx.object_metadata)?;

    let mut builder = insert_into(
        ctx.schema,
        &VIEW,
        &["id", "name", "objectMetadataId", "type", "key", "icon", "position"],
    );
    builder.push_values(&views, |mut row, view| {
        row.push_bind(view.id)
            .push_bind(view.name)
            .push_bind(view.object_metadata_id)
            .push_bind("table")
            .push_bind("INDEX")
            .push_bind(view.icon)
            .push_bind(view.position);
    });
    let mut inserted = execute_insert(&mut *conn, builder).await?;

    let fields: Vec<(Uuid, &ResolvedViewField)> = views
        .iter()
        .flat_map(|view| view.fields.iter().map(move |field| (view.id, field)))
        .collect();
    if fields.is_empty() {
        return Ok(inserted);
    }

    let mut builder = insert_into(
        ctx.schema,
        &VIEW_FIELD,
        &["id", "fieldMetadataId", "viewId", "isVisible", "size", "position"],
    );
    builder.push_values(fields, |mut row, (view_id, field)| {
        row.push_bind(field.id)
            .push_bind(field.field_metadata_id)
            .push_bind(view_id)
            .push_bind(true)
            .push_bind(field.size)
            .push_bind(field.position);
    });
    inserted += execute_insert(conn, builder).await?;
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use devseed_orm::metadata::standard::STANDARD_OBJECTS;
    use devseed_orm::{build_object_metadata_map, FieldMetadata, ObjectMetadata};

    fn synced_map() -> ObjectMetadataMap {
        let objects: Vec<ObjectMetadata> = STANDARD_OBJECTS
            .iter()
            .map(|object| ObjectMetadata {
                id: seed_record_id("objectMetadata", object.name_singular).to_string(),
                standard_id: Some(object.standard_id().to_string()),
                name_singular: object.name_singular.to_string(),
                fields: object
                    .all_fields()
                    .map(|field| FieldMetadata {
                        id: seed_record_id("fieldMetadata", field.name).to_string(),
                        standard_id: Some(object.field_standard_id(field.name).to_string()),
                        name: field.name.to_string(),
                    })
                    .collect(),
            })
            .collect();
        build_object_metadata_map(&objects)
    }

    #[test]
    fn views_resolve_against_a_synced_workspace() {
        let views = resolve_views(&synced_map()).unwrap();
        assert_eq!(views.len(), SEED_VIEWS.len());

        let companies = &views[0];
        assert_eq!(companies.name, "All Companies");
        assert_eq!(
            companies.object_metadata_id,
            seed_record_id("objectMetadata", "company")
        );
        assert_eq!(companies.fields.len(), 7);
        assert_eq!(
            companies.fields[0].field_metadata_id,
            seed_record_id("fieldMetadata", "name")
        );
        assert_eq!(companies.fields[6].position, 6.0);
    }

    #[test]
    fn missing_object_fails_the_prefill() {
        let mut map = synced_map();
        map.remove(&PERSON.standard_id().to_string());
        let err = resolve_views(&map).unwrap_err();
        assert!(matches!(err, ModelError::NotFound(ref msg) if msg.contains("person")));
    }

    #[test]
    fn non_uuid_metadata_id_is_rejected() {
        let mut map = synced_map();
        if let Some(entry) = map.get_mut(&COMPANY.standard_id().to_string()) {
            entry.id = "om_1".to_string();
        }
        assert!(matches!(resolve_views(&map), Err(ModelError::Query(_))));
    }
}
