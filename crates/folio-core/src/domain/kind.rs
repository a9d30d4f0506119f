//! Resource kinds and the generic write payloads (`Draft`, `Patch`).
//!
//! A resource kind bundles everything that differs between blog posts and
//! literary works. The synchronization logic in `app` is written once against
//! this trait.

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::ids::{Id, IdMarker, UserId};
use super::status::PublicationStatus;
use crate::config::TableNames;

/// One row as exchanged with the Remote Store: column name -> JSON value.
pub type Row = Map<String, Value>;

/// A record family stored in its own table.
///
/// Implemented by uninhabited marker enums (`Post`, `Work`), so the kind is a
/// pure type-level parameter.
pub trait ResourceKind: IdMarker + Sized {
    /// The full record as returned by the store.
    type Record: Clone + fmt::Debug + Serialize + DeserializeOwned + Send + Sync + 'static;

    /// Kind-specific columns accepted on create.
    type Fields: Clone + fmt::Debug + Default + Send + Sync + 'static;

    /// Kind-specific columns accepted on update.
    type PatchFields: Clone + fmt::Debug + Default + Serialize + Send + Sync + 'static;

    /// Table used when no configuration overrides it.
    const DEFAULT_TABLE: &'static str;

    fn table(tables: &TableNames) -> &str;

    fn id(record: &Self::Record) -> &Id<Self>;

    /// Write the kind-specific columns of an insert row.
    ///
    /// `title` is the already normalized title, for columns derived from it.
    fn insert_columns(title: &str, fields: Self::Fields, row: &mut Row);
}

/// Input of `create`: every column optional.
///
/// There is no author field: the acting identity is injected at
/// call time. An `author_id` key in a JSON draft is ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Draft<F> {
    pub title: Option<String>,
    pub status: Option<PublicationStatus>,
    pub tags: Option<Vec<String>>,
    pub published_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub fields: F,
}

impl<F: Default> Draft<F> {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }
}

impl<F> Draft<F> {
    pub fn with_status(mut self, status: PublicationStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_published_at(mut self, at: DateTime<Utc>) -> Self {
        self.published_at = Some(at);
        self
    }

    pub fn with_fields(mut self, fields: F) -> Self {
        self.fields = fields;
        self
    }

    /// Normalize into the row sent to the store.
    ///
    /// - title defaults to `""`, status to draft, tags to `[]`
    /// - `author_id` is always the acting identity
    /// - `published_at` is the explicit value or `now` when published, otherwise null
    pub fn into_insert_row<K>(self, author: &UserId, now: DateTime<Utc>) -> Row
    where
        K: ResourceKind<Fields = F>,
    {
        let title = self.title.unwrap_or_default();
        let status = self.status.unwrap_or_default();
        let tags = self.tags.unwrap_or_default();
        let published_at = if status.is_published() {
            Some(self.published_at.unwrap_or(now))
        } else {
            None
        };

        let mut row = Row::new();
        row.insert("title".into(), Value::String(title.clone()));
        row.insert("status".into(), Value::String(status.as_str().into()));
        row.insert(
            "tags".into(),
            Value::Array(tags.into_iter().map(Value::String).collect()),
        );
        row.insert("author_id".into(), Value::String(author.as_str().into()));
        row.insert("published_at".into(), timestamp_value(published_at));
        K::insert_columns(&title, self.fields, &mut row);
        row
    }
}

/// Input of `update`: only the present columns are sent.
///
/// `published_at` is tri-state: absent (no change), `Some(None)` (clear),
/// `Some(Some(t))` (set).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Patch<F> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PublicationStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present_nullable"
    )]
    pub published_at: Option<Option<DateTime<Utc>>>,
    #[serde(flatten)]
    pub fields: F,
}

impl<F> Patch<F> {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_status(mut self, status: PublicationStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_published_at(mut self, at: Option<DateTime<Utc>>) -> Self {
        self.published_at = Some(at);
        self
    }

    pub fn with_fields(mut self, fields: F) -> Self {
        self.fields = fields;
        self
    }

    /// Stamp `published_at` when the patch publishes without an explicit time.
    ///
    /// An explicit `null` alongside `published` is treated as "no time given".
    pub fn stamp_publication(&mut self, now: DateTime<Utc>) {
        if self.status == Some(PublicationStatus::Published)
            && matches!(self.published_at, None | Some(None))
        {
            self.published_at = Some(Some(now));
        }
    }
}

/// Store timestamps as RFC 3339 with a fixed precision.
pub fn timestamp_value(at: Option<DateTime<Utc>>) -> Value {
    match at {
        Some(at) => Value::String(at.to_rfc3339_opts(SecondsFormat::Micros, true)),
        None => Value::Null,
    }
}

/// `Option<String>` column value; `None` becomes JSON null.
pub(crate) fn nullable_text(value: Option<String>) -> Value {
    value.map(Value::String).unwrap_or(Value::Null)
}

/// Serialize any payload into a row.
pub fn to_row<T: Serialize>(value: &T) -> Result<Row, serde_json::Error> {
    match serde_json::to_value(value)? {
        Value::Object(row) => Ok(row),
        _ => Ok(Row::new()),
    }
}

/// Distinguish an explicit `null` from an absent key.
pub(crate) fn present_nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Treat a JSON `null` like a missing value.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}
