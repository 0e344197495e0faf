//! Catalog of the standard objects the seed dataset writes to.
//!
//! Standard ids are uuid v5 values derived from object and field names, so
//! they are identical in every workspace and every run.

use crate::identifiers::{qualified_table, quote_ident};
use uuid::{uuid, Uuid};

pub const STANDARD_ID_NAMESPACE: Uuid = uuid!("20202020-0000-4000-8000-5354414e4441");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Text,
    Number,
    BigNumber,
    Boolean,
    DateTime,
    Identifier,
    Position,
}

impl FieldType {
    pub fn sql_type(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Number => "integer",
            FieldType::BigNumber => "bigint",
            FieldType::Boolean => "boolean",
            FieldType::DateTime => "timestamptz",
            FieldType::Identifier => "uuid",
            FieldType::Position => "double precision",
        }
    }

    /// Type name stored in field metadata
    pub fn metadata_type(&self) -> &'static str {
        match self {
            FieldType::Text => "TEXT",
            FieldType::Number => "NUMBER",
            FieldType::BigNumber => "NUMERIC",
            FieldType::Boolean => "BOOLEAN",
            FieldType::DateTime => "DATE_TIME",
            FieldType::Identifier => "UUID",
            FieldType::Position => "POSITION",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StandardField {
    pub name: &'static str,
    pub label: &'static str,
    pub field_type: FieldType,
}

const fn field(name: &'static str, label: &'static str, field_type: FieldType) -> StandardField {
    StandardField {
        name,
        label,
        field_type,
    }
}

/// Columns every standard table has
pub const BASE_FIELDS: &[StandardField] = &[
    field("id", "Id", FieldType::Identifier),
    field("createdAt", "Creation date", FieldType::DateTime),
    field("updatedAt", "Last update", FieldType::DateTime),
    field("deletedAt", "Deleted at", FieldType::DateTime),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StandardObject {
    pub name_singular: &'static str,
    pub name_plural: &'static str,
    pub label_singular: &'static str,
    pub label_plural: &'static str,
    /// Hidden from the default navigation
    pub is_system: bool,
    pub fields: &'static [StandardField],
}

impl StandardObject {
    pub fn standard_id(&self) -> Uuid {
        Uuid::new_v5(&STANDARD_ID_NAMESPACE, self.name_singular.as_bytes())
    }

    pub fn field_standard_id(&self, field_name: &str) -> Uuid {
        let key = format!("{}.{}", self.name_singular, field_name);
        Uuid::new_v5(&STANDARD_ID_NAMESPACE, key.as_bytes())
    }

    /// Base columns followed by the object's own fields
    pub fn all_fields(&self) -> impl Iterator<Item = &'static StandardField> {
        BASE_FIELDS.iter().chain(self.fields.iter())
    }

    pub fn create_table_sql(&self, schema: &str) -> String {
        let mut columns = vec![
            format!("{} uuid PRIMARY KEY DEFAULT gen_random_uuid()", quote_ident("id")),
            format!("{} timestamptz NOT NULL DEFAULT now()", quote_ident("createdAt")),
            format!("{} timestamptz NOT NULL DEFAULT now()", quote_ident("updatedAt")),
            format!("{} timestamptz", quote_ident("deletedAt")),
        ];
        columns.extend(
            self.fields
                .iter()
                .map(|f| format!("{} {}", quote_ident(f.name), f.field_type.sql_type())),
        );

        format!(
            "CREATE TABLE IF NOT EXISTS {} ({})",
            qualified_table(schema, self.name_singular),
            columns.join(", ")
        )
    }
}

use FieldType::*;

pub const COMPANY: StandardObject = StandardObject {
    name_singular: "company",
    name_plural: "companies",
    label_singular: "Company",
    label_plural: "Companies",
    is_system: false,
    fields: &[
        field("name", "Name", Text),
        field("domainName", "Domain Name", Text),
        field("address", "Address", Text),
        field("employees", "Employees", Number),
        field("linkedinLinkUrl", "Linkedin", Text),
        field("idealCustomerProfile", "ICP", Boolean),
        field("position", "Position", Position),
    ],
};

pub const PERSON: StandardObject = StandardObject {
    name_singular: "person",
    name_plural: "people",
    label_singular: "Person",
    label_plural: "People",
    is_system: false,
    fields: &[
        field("nameFirstName", "First name", Text),
        field("nameLastName", "Last name", Text),
        field("email", "Email", Text),
        field("phone", "Phone", Text),
        field("city", "City", Text),
        field("jobTitle", "Job Title", Text),
        field("companyId", "Company", Identifier),
        field("position", "Position", Position),
    ],
};

pub const OPPORTUNITY: StandardObject = StandardObject {
    name_singular: "opportunity",
    name_plural: "opportunities",
    label_singular: "Opportunity",
    label_plural: "Opportunities",
    is_system: false,
    fields: &[
        field("name", "Name", Text),
        field("amountAmountMicros", "Amount", BigNumber),
        field("amountCurrencyCode", "Currency", Text),
        field("closeDate", "Close date", DateTime),
        field("probability", "Probability", Text),
        field("stage", "Stage", Text),
        field("pointOfContactId", "Point of Contact", Identifier),
        field("companyId", "Company", Identifier),
        field("position", "Position", Position),
    ],
};

pub const CALENDAR_EVENT: StandardObject = StandardObject {
    name_singular: "calendarEvent",
    name_plural: "calendarEvents",
    label_singular: "Calendar event",
    label_plural: "Calendar events",
    is_system: true,
    fields: &[
        field("title", "Title", Text),
        field("isCanceled", "Is canceled", Boolean),
        field("isFullDay", "Is Full Day", Boolean),
        field("startsAt", "Start Date", DateTime),
        field("endsAt", "End Date", DateTime),
        field("externalCreatedAt", "Creation DateTime", DateTime),
        field("externalUpdatedAt", "Update DateTime", DateTime),
        field("description", "Description", Text),
        field("location", "Location", Text),
        field("iCalUID", "iCal UID", Text),
        field("conferenceSolution", "Conference Solution", Text),
        field("conferenceLinkUrl", "Meet Link", Text),
    ],
};

pub const WORKSPACE_MEMBER: StandardObject = StandardObject {
    name_singular: "workspaceMember",
    name_plural: "workspaceMembers",
    label_singular: "Workspace Member",
    label_plural: "Workspace Members",
    is_system: true,
    fields: &[
        field("nameFirstName", "First name", Text),
        field("nameLastName", "Last name", Text),
        field("locale", "Language", Text),
        field("colorScheme", "Color Scheme", Text),
        field("userEmail", "User Email", Text),
        field("userId", "User Id", Identifier),
    ],
};

pub const VIEW: StandardObject = StandardObject {
    name_singular: "view",
    name_plural: "views",
    label_singular: "View",
    label_plural: "Views",
    is_system: true,
    fields: &[
        field("name", "Name", Text),
        field("objectMetadataId", "Object Metadata Id", Identifier),
        field("type", "Type", Text),
        field("key", "Key", Text),
        field("icon", "Icon", Text),
        field("position", "Position", Position),
    ],
};

pub const VIEW_FIELD: StandardObject = StandardObject {
    name_singular: "viewField",
    name_plural: "viewFields",
    label_singular: "View Field",
    label_plural: "View Fields",
    is_system: true,
    fields: &[
        field("fieldMetadataId", "Field Metadata Id", Identifier),
        field("viewId", "View Id", Identifier),
        field("isVisible", "Visible", Boolean),
        field("size", "Size", Number),
        field("position", "Position", Position),
    ],
};

pub const MESSAGE_THREAD: StandardObject = StandardObject {
    name_singular: "messageThread",
    name_plural: "messageThreads",
    label_singular: "Message Thread",
    label_plural: "Message Threads",
    is_system: true,
    fields: &[],
};

pub const CONNECTED_ACCOUNT: StandardObject = StandardObject {
    name_singular: "connectedAccount",
    name_plural: "connectedAccounts",
    label_singular: "Connected Account",
    label_plural: "Connected Accounts",
    is_system: true,
    fields: &[
        field("handle", "Handle", Text),
        field("provider", "Provider", Text),
        field("accessToken", "Access Token", Text),
        field("refreshToken", "Refresh Token", Text),
        field("accountOwnerId", "Account Owner", Identifier),
    ],
};

pub const MESSAGE: StandardObject = StandardObject {
    name_singular: "message",
    name_plural: "messages",
    label_singular: "Message",
    label_plural: "Messages",
    is_system: true,
    fields: &[
        field("headerMessageId", "Header message Id", Text),
        field("subject", "Subject", Text),
        field("text", "Text", Text),
        field("receivedAt", "Received At", DateTime),
        field("direction", "Direction", Text),
        field("messageThreadId", "Message Thread Id", Identifier),
    ],
};

pub const MESSAGE_CHANNEL: StandardObject = StandardObject {
    name_singular: "messageChannel",
    name_plural: "messageChannels",
    label_singular: "Message Channel",
    label_plural: "Message Channels",
    is_system: true,
    fields: &[
        field("handle", "Handle", Text),
        field("type", "Type", Text),
        field("visibility", "Visibility", Text),
        field("isContactAutoCreationEnabled", "Is Contact Auto Creation Enabled", Boolean),
        field("connectedAccountId", "Connected Account", Identifier),
    ],
};

pub const MESSAGE_CHANNEL_MESSAGE_ASSOCIATION: StandardObject = StandardObject {
    name_singular: "messageChannelMessageAssociation",
    name_plural: "messageChannelMessageAssociations",
    label_singular: "Message Channel Message Association",
    label_plural: "Message Channel Message Associations",
    is_system: true,
    fields: &[
        field("messageChannelId", "Message Channel Id", Identifier),
        field("messageId", "Message Id", Identifier),
        field("messageExternalId", "Message External Id", Text),
        field("messageThreadId", "Message Thread Id", Identifier),
        field("messageThreadExternalId", "Thread External Id", Text),
    ],
};

pub const MESSAGE_PARTICIPANT: StandardObject = StandardObject {
    name_singular: "messageParticipant",
    name_plural: "messageParticipants",
    label_singular: "Message Participant",
    label_plural: "Message Participants",
    is_system: true,
    fields: &[
        field("messageId", "Message", Identifier),
        field("role", "Role", Text),
        field("handle", "Handle", Text),
        field("displayName", "Display Name", Text),
        field("personId", "Person", Identifier),
        field("workspaceMemberId", "Workspace Member", Identifier),
    ],
};

/// Every standard object, in table creation order
pub const STANDARD_OBJECTS: &[StandardObject] = &[
    COMPANY,
    PERSON,
    OPPORTUNITY,
    CALENDAR_EVENT,
    WORKSPACE_MEMBER,
    VIEW,
    VIEW_FIELD,
    MESSAGE_THREAD,
    CONNECTED_ACCOUNT,
    MESSAGE,
    MESSAGE_CHANNEL,
    MESSAGE_CHANNEL_MESSAGE_ASSOCIATION,
    MESSAGE_PARTICIPANT,
];

pub fn standard_object(name_singular: &str) -> Option<&'static StandardObject> {
    STANDARD_OBJECTS
        .iter()
        .find(|object| object.name_singular == name_singular)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn standard_ids_are_unique_and_stable() {
        let mut ids = HashSet::new();
        for object in STANDARD_OBJECTS {
            assert!(ids.insert(object.standard_id()), "{}", object.name_singular);
            for f in object.all_fields() {
                assert!(
                    ids.insert(object.field_standard_id(f.name)),
                    "{}.{}",
                    object.name_singular,
                    f.name
                );
            }
        }
        assert_eq!(COMPANY.standard_id(), COMPANY.standard_id());
        assert_ne!(COMPANY.field_standard_id("name"), OPPORTUNITY.field_standard_id("name"));
    }

    #[test]
    fn field_names_are_unique_per_object() {
        for object in STANDARD_OBJECTS {
            let mut names = HashSet::new();
            for f in object.all_fields() {
                assert!(names.insert(f.name), "{}.{}", object.name_singular, f.name);
            }
        }
    }

    #[test]
    fn create_table_quotes_camel_case() {
        let sql = CALENDAR_EVENT.create_table_sql("workspace_x");
        assert!(sql.starts_with("CREATE TABLE IF NOT EXISTS \"workspace_x\".\"calendarEvent\""));
        assert!(sql.contains("\"iCalUID\" text"));
        assert!(sql.contains("\"id\" uuid PRIMARY KEY"));
    }

    #[test]
    fn lookup_by_name() {
        assert_eq!(standard_object("person"), Some(&PERSON));
        assert!(standard_object("pet").is_none());
    }
}
