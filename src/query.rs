//! Search, filter and sort over record collections.
//!
//! Every list screen in the three trackers goes through [`apply`]: archive
//! scope and favorites first, then free text, then category, then a
//! stable sort. Nothing is cached; callers re-run the query after each
//! mutation.

use std::cmp::Ordering;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::category::Category;

/// A record that can be listed through the query facade.
pub trait Listable: Clone {
    type Category: Category;

    /// Fields consulted by free-text search; any match keeps the record.
    fn search_fields(&self) -> Vec<&str>;

    fn primary_name(&self) -> &str;

    fn category(&self) -> Self::Category;

    /// Date used by [`SortMode::Date`]. `None` sorts after every date.
    fn sort_date(&self) -> Option<DateTime<Utc>> {
        None
    }

    /// Field used by [`SortMode::Secondary`] (brand, species, …).
    fn secondary(&self) -> &str {
        ""
    }

    fn is_archived(&self) -> bool {
        false
    }

    fn is_favorite(&self) -> bool {
        false
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    #[default]
    Name,
    Category,
    Date,
    Secondary,
}

impl SortMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortMode::Name => "name",
            SortMode::Category => "category",
            SortMode::Date => "date",
            SortMode::Secondary => "secondary",
        }
    }
}

impl FromStr for SortMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" | "title" => Ok(SortMode::Name),
            "category" | "type" => Ok(SortMode::Category),
            "date" => Ok(SortMode::Date),
            "secondary" | "brand" | "species" | "unit" | "source" => Ok(SortMode::Secondary),
            _ => Err(format!("Unknown sort mode: {s}")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ArchiveFilter {
    #[default]
    Active,
    Archived,
    All,
}

impl ArchiveFilter {
    fn admits(&self, archived: bool) -> bool {
        match self {
            ArchiveFilter::Active => !archived,
            ArchiveFilter::Archived => archived,
            ArchiveFilter::All => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery<C> {
    pub text: String,
    pub category: Option<C>,
    pub sort: SortMode,
    pub archive: ArchiveFilter,
    pub favorites_only: bool,
}

impl<C> Default for ListQuery<C> {
    fn default() -> Self {
        Self {
            text: String::new(),
            category: None,
            sort: SortMode::default(),
            archive: ArchiveFilter::default(),
            favorites_only: false,
        }
    }
}

impl<C> ListQuery<C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn category(mut self, category: C) -> Self {
        self.category = Some(category);
        self
    }

    pub fn sort(mut self, sort: SortMode) -> Self {
        self.sort = sort;
        self
    }

    pub fn archive(mut self, archive: ArchiveFilter) -> Self {
        self.archive = archive;
        self
    }

    pub fn favorites_only(mut self) -> Self {
        self.favorites_only = true;
        self
    }
}

/// Filter and sort `records` according to `query`.
pub fn apply<T: Listable>(records: &[T], query: &ListQuery<T::Category>) -> Vec<T> {
    let needle = fold(query.text.trim());

    let mut out: Vec<T> = records
        .iter()
        .filter(|r| query.archive.admits(r.is_archived()))
        .filter(|r| !query.favorites_only || r.is_favorite())
        .filter(|r| needle.is_empty() || matches_text(*r, &needle))
        .filter(|r| query.category.is_none_or(|c| r.category() == c))
        .cloned()
        .collect();

    sort_records(&mut out, query.sort);
    out
}

/// Stable in-place sort by `mode`.
pub fn sort_records<T: Listable>(records: &mut [T], mode: SortMode) {
    match mode {
        SortMode::Name => records.sort_by_cached_key(|r| fold(r.primary_name())),
        SortMode::Category => {
            records.sort_by_cached_key(|r| fold(r.category().display_name()))
        }
        SortMode::Date => {
            records.sort_by(|a, b| compare_dates_missing_last(a.sort_date(), b.sort_date()))
        }
        SortMode::Secondary => records.sort_by_cached_key(|r| fold(r.secondary())),
    }
}

/// Ascending date order where an absent date is greater than any date.
pub fn compare_dates_missing_last(a: Option<DateTime<Utc>>, b: Option<DateTime<Utc>>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn matches_text<T: Listable>(record: &T, folded_needle: &str) -> bool {
    let category = record.category().display_name();
    record
        .search_fields()
        .into_iter()
        .chain(std::iter::once(category))
        .any(|field| fold(field).contains(folded_needle))
}

/// Case- and accent-insensitive form of `s`: canonical decomposition with
/// combining marks dropped, then lowercased.
pub fn fold(s: &str) -> String {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// `haystack` contains `needle` ignoring case and accents. An empty
/// needle matches everything.
pub fn contains_folded(haystack: &str, needle: &str) -> bool {
    let needle = fold(needle.trim());
    needle.is_empty() || fold(haystack).contains(&needle)
}
