//! Literary works (`literary_works`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ids::{Id, IdMarker, UserId};
use super::kind::{Draft, Patch, ResourceKind, Row, null_as_default, nullable_text, present_nullable};
use super::status::{PublicationStatus, WorkType};
use crate::config::TableNames;

/// Resource kind marker for literary works.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Work {}

impl IdMarker for Work {
    fn label() -> &'static str {
        "work"
    }
}

/// Identifier of a literary work.
pub type WorkId = Id<Work>;

/// A literary work row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiteraryWork {
    pub id: WorkId,
    pub title: String,
    #[serde(rename = "type", default)]
    pub kind: WorkType,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub status: PublicationStatus,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    pub author_id: UserId,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Work columns accepted on create.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkFields {
    #[serde(rename = "type")]
    pub kind: Option<WorkType>,
    pub description: Option<String>,
    pub content: Option<String>,
    pub cover_image: Option<String>,
}

/// Work columns accepted on update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkPatchFields {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<WorkType>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present_nullable"
    )]
    pub description: Option<Option<String>>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present_nullable"
    )]
    pub content: Option<Option<String>>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present_nullable"
    )]
    pub cover_image: Option<Option<String>>,
}

pub type WorkDraft = Draft<WorkFields>;
pub type WorkPatch = Patch<WorkPatchFields>;

impl ResourceKind for Work {
    type Record = LiteraryWork;
    type Fields = WorkFields;
    type PatchFields = WorkPatchFields;

    const DEFAULT_TABLE: &'static str = "literary_works";

    fn table(tables: &TableNames) -> &str {
        &tables.works
    }

    fn id(record: &LiteraryWork) -> &WorkId {
        &record.id
    }

    fn insert_columns(_title: &str, fields: WorkFields, row: &mut Row) {
        row.insert(
            "type".into(),
            Value::String(fields.kind.unwrap_or_default().as_str().into()),
        );
        row.insert("description".into(), nullable_text(fields.description));
        row.insert("content".into(), nullable_text(fields.content));
        row.insert("cover_image".into(), nullable_text(fields.cover_image));
    }
}
