//! Listing - 取得済みリストの絞り込み・並べ替え
//!
//! Remote Store には問い合わせません。コレクションの `items()` に対して
//! 検索・カテゴリ（タグ）・並び順を適用します。

pub mod format;

use std::cmp::Reverse;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::domain::{BlogPost, LiteraryWork};

pub use self::format::{ReadTime, format_long_date, reading_time};

/// The tag value that stands for "every category".
pub const ALL_CATEGORIES: &str = "all";

/// Anything that can be shown in a listing.
pub trait Listable {
    fn title(&self) -> &str;

    /// Short text searched alongside the title.
    fn summary(&self) -> Option<&str>;

    fn tags(&self) -> &[String];

    fn published_at(&self) -> Option<DateTime<Utc>>;

    fn created_at(&self) -> DateTime<Utc>;

    /// Publication time, or creation time for never-published records.
    fn listing_date(&self) -> DateTime<Utc> {
        self.published_at().unwrap_or_else(|| self.created_at())
    }
}

impl Listable for BlogPost {
    fn title(&self) -> &str {
        &self.title
    }

    fn summary(&self) -> Option<&str> {
        self.excerpt.as_deref()
    }

    fn tags(&self) -> &[String] {
        &self.tags
    }

    fn published_at(&self) -> Option<DateTime<Utc>> {
        self.published_at
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Listable for LiteraryWork {
    fn title(&self) -> &str {
        &self.title
    }

    fn summary(&self) -> Option<&str> {
        self.description.as_deref()
    }

    fn tags(&self) -> &[String] {
        &self.tags
    }

    fn published_at(&self) -> Option<DateTime<Utc>> {
        self.published_at
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Category filter: everything, or records carrying one tag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Category {
    #[default]
    All,
    Tag(String),
}

impl Category {
    pub fn as_str(&self) -> &str {
        match self {
            Category::All => ALL_CATEGORIES,
            Category::Tag(tag) => tag,
        }
    }

    fn matches<T: Listable + ?Sized>(&self, item: &T) -> bool {
        match self {
            Category::All => true,
            Category::Tag(tag) => item.tags().iter().any(|t| t == tag),
        }
    }
}

impl From<&str> for Category {
    fn from(value: &str) -> Self {
        if value == ALL_CATEGORIES {
            Category::All
        } else {
            Category::Tag(value.to_string())
        }
    }
}

impl From<String> for Category {
    fn from(value: String) -> Self {
        Category::from(value.as_str())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Latest listing date first.
    #[default]
    Newest,
    Oldest,
    /// Keep the fetched order.
    AsFetched,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sort order `{0}` (expected newest, oldest or fetched)")]
pub struct ParseSortOrderError(String);

impl FromStr for SortOrder {
    type Err = ParseSortOrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "newest" => Ok(SortOrder::Newest),
            "oldest" => Ok(SortOrder::Oldest),
            "fetched" | "as_fetched" | "as-fetched" => Ok(SortOrder::AsFetched),
            _ => Err(ParseSortOrderError(s.to_string())),
        }
    }
}

/// Search, category and sort applied together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingQuery {
    pub search: String,
    pub category: Category,
    pub sort: SortOrder,
}

impl ListingQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = term.into();
        self
    }

    pub fn category(mut self, category: impl Into<Category>) -> Self {
        self.category = category.into();
        self
    }

    pub fn sort(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }

    /// Case-insensitive substring match on the title or summary.
    pub fn matches<T: Listable + ?Sized>(&self, item: &T) -> bool {
        let term = self.search.to_lowercase();
        let found = term.is_empty()
            || item.title().to_lowercase().contains(&term)
            || item
                .summary()
                .is_some_and(|summary| summary.to_lowercase().contains(&term));
        found && self.category.matches(item)
    }

    /// Filter then sort. The sort is stable.
    pub fn apply<'a, T: Listable>(&self, items: &'a [T]) -> Vec<&'a T> {
        let mut selected: Vec<&T> = items.iter().filter(|item| self.matches(*item)).collect();
        match self.sort {
            SortOrder::Newest => selected.sort_by_key(|item| Reverse(item.listing_date())),
            SortOrder::Oldest => selected.sort_by_key(|item| item.listing_date()),
            SortOrder::AsFetched => {}
        }
        selected
    }
}

/// `"all"` followed by every tag in first-seen order.
pub fn categories<T: Listable>(items: &[T]) -> Vec<String> {
    let mut out = vec![ALL_CATEGORIES.to_string()];
    for tag in items.iter().flat_map(|item| item.tags()) {
        if !out.contains(tag) {
            out.push(tag.clone());
        }
    }
    out
}

/// The first fetched item, before any filtering.
pub fn featured<T>(items: &[T]) -> Option<&T> {
    items.first()
}
