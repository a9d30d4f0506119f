//! Blog posts (`blog_posts`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ids::{Id, IdMarker, UserId};
use super::kind::{Draft, Patch, ResourceKind, Row, null_as_default, nullable_text, present_nullable};
use super::slug::slugify_title;
use super::status::PublicationStatus;
use crate::config::TableNames;

/// Resource kind marker for blog posts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Post {}

impl IdMarker for Post {
    fn label() -> &'static str {
        "post"
    }
}

/// Identifier of a blog post.
pub type PostId = Id<Post>;

/// A blog post row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogPost {
    pub id: PostId,
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub slug: String,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    #[serde(default)]
    pub featured_image: Option<String>,
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

/// Post columns accepted on create. The slug is always derived from the title.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostFields {
    pub excerpt: Option<String>,
    pub content: Option<String>,
    pub featured_image: Option<String>,
}

/// Post columns accepted on update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostPatchFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present_nullable"
    )]
    pub excerpt: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present_nullable"
    )]
    pub featured_image: Option<Option<String>>,
}

pub type PostDraft = Draft<PostFields>;
pub type PostPatch = Patch<PostPatchFields>;

impl ResourceKind for Post {
    type Record = BlogPost;
    type Fields = PostFields;
    type PatchFields = PostPatchFields;

    const DEFAULT_TABLE: &'static str = "blog_posts";

    fn table(tables: &TableNames) -> &str {
        &tables.posts
    }

    fn id(record: &BlogPost) -> &PostId {
        &record.id
    }

    fn insert_columns(title: &str, fields: PostFields, row: &mut Row) {
        row.insert("slug".into(), Value::String(slugify_title(title)));
        row.insert(
            "content".into(),
            Value::String(fields.content.unwrap_or_default()),
        );
        row.insert("excerpt".into(), nullable_text(fields.excerpt));
        row.insert("featured_image".into(), nullable_text(fields.featured_image));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn decodes_a_store_row_with_null_tags() {
        let row = r#"{
            "id": "1",
            "title": "X",
            "slug": "x",
            "excerpt": null,
            "content": "body",
            "featured_image": null,
            "status": "draft",
            "tags": null,
            "author_id": "u1",
            "published_at": null,
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        }"#;

        let post: BlogPost = serde_json::from_str(row).unwrap();
        assert_eq!(post.id, PostId::new("1"));
        assert!(post.tags.is_empty());
        assert_eq!(post.status, PublicationStatus::Draft);
        assert_eq!(
            post.created_at,
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn insert_row_carries_a_derived_slug() {
        let draft = PostDraft::titled("Hello, World! 2024").with_fields(PostFields {
            excerpt: Some("short".into()),
            ..PostFields::default()
        });
        let row = draft.into_insert_row::<Post>(&UserId::new("u1"), Utc::now());

        assert_eq!(row["slug"], "hello-world-2024");
        assert_eq!(row["content"], "");
        assert_eq!(row["excerpt"], "short");
        assert_eq!(row["featured_image"], Value::Null);
    }

    #[test]
    fn draft_json_cannot_override_the_slug() {
        let draft: PostDraft = serde_json::from_str(r#"{"title":"Real Title","slug":"fake"}"#).unwrap();
        let row = draft.into_insert_row::<Post>(&UserId::new("u1"), Utc::now());
        assert_eq!(row["slug"], "real-title");
    }
}
