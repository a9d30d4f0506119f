//! Publication status and literary work type.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle of a post or work.
///
/// Serialized as the lower-case column values (`draft`, `published`, `archived`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PublicationStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

impl PublicationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PublicationStatus::Draft => "draft",
            PublicationStatus::Published => "published",
            PublicationStatus::Archived => "archived",
        }
    }

    pub fn is_published(self) -> bool {
        matches!(self, PublicationStatus::Published)
    }
}

impl fmt::Display for PublicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The `type` column of `literary_works`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkType {
    Novel,
    ShortStory,
    Poem,
    Essay,
    #[default]
    Article,
}

impl WorkType {
    pub fn as_str(self) -> &'static str {
        match self {
            WorkType::Novel => "novel",
            WorkType::ShortStory => "short_story",
            WorkType::Poem => "poem",
            WorkType::Essay => "essay",
            WorkType::Article => "article",
        }
    }
}

impl fmt::Display for WorkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
