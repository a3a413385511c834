//! The Book entity and its sparse update patch

use serde::{Deserialize, Serialize};

use super::price::Price;

/// Title language used when none is given
pub const DEFAULT_TITLE_LANG: &str = "en";

fn default_title_lang() -> String {
    DEFAULT_TITLE_LANG.to_string()
}

/// A book record keyed by ISBN-13.
///
/// This is the wire shape used at the service boundary (camelCase JSON).
/// The on-disk representation is produced by `storage::codec`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub isbn: String,
    pub title: String,
    #[serde(default = "default_title_lang")]
    pub title_lang: String,
    #[serde(default)]
    pub authors: Vec<String>,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
    pub year: i32,
    pub price: Price,
}

impl Book {
    /// Creates a book with no authors, no cover and the default title language.
    pub fn new(
        isbn: impl Into<String>,
        title: impl Into<String>,
        category: impl Into<String>,
        year: i32,
        price: Price,
    ) -> Self {
        Self {
            isbn: isbn.into(),
            title: title.into(),
            title_lang: default_title_lang(),
            authors: Vec::new(),
            category: category.into(),
            cover: None,
            year,
            price,
        }
    }

    /// Sets the author list
    pub fn with_authors<I, S>(mut self, authors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.authors = authors.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the cover reference
    pub fn with_cover(mut self, cover: impl Into<String>) -> Self {
        self.cover = Some(cover.into());
        self
    }

    /// Sets the title language tag
    pub fn with_title_lang(mut self, lang: impl Into<String>) -> Self {
        self.title_lang = lang.into();
        self
    }

    /// First author, or the empty string when there is none.
    pub fn first_author(&self) -> &str {
        self.authors.first().map(String::as_str).unwrap_or("")
    }

    /// Returns the book in its stored form.
    ///
    /// Title, title language, category, cover and authors are trimmed. An
    /// empty title language becomes [`DEFAULT_TITLE_LANG`], a blank cover
    /// becomes absent and blank authors are dropped. The ISBN is untouched.
    pub fn normalized(self) -> Book {
        let title_lang = match self.title_lang.trim() {
            "" => default_title_lang(),
            lang => lang.to_string(),
        };
        Book {
            title: self.title.trim().to_string(),
            title_lang,
            authors: normalize_authors(self.authors),
            category: self.category.trim().to_string(),
            cover: self
                .cover
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string),
            ..self
        }
    }

    /// Returns a new book with every field present in `patch` overridden.
    ///
    /// The ISBN is never changed. The merged book is [`normalized`](Self::normalized).
    /// `self` is left untouched.
    pub fn with_patch(&self, patch: &BookPatch) -> Book {
        Book {
            isbn: self.isbn.clone(),
            title: patch.title.clone().unwrap_or_else(|| self.title.clone()),
            title_lang: patch
                .title_lang
                .clone()
                .unwrap_or_else(|| self.title_lang.clone()),
            authors: patch
                .authors
                .clone()
                .unwrap_or_else(|| self.authors.clone()),
            category: patch
                .category
                .clone()
                .unwrap_or_else(|| self.category.clone()),
            cover: patch.cover.clone().or_else(|| self.cover.clone()),
            year: patch.year.unwrap_or(self.year),
            price: patch.price.unwrap_or(self.price),
        }
        .normalized()
    }
}

/// Sparse set of field overrides for an update.
///
/// `None` keeps the existing value. A cover cannot be cleared through a patch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BookPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub title_lang: Option<String>,
    #[serde(default)]
    pub authors: Option<Vec<String>>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub cover: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub price: Option<Price>,
}

impl BookPatch {
    /// Returns true if the patch overrides nothing.
    pub fn is_empty(&self) -> bool {
        *self == BookPatch::default()
    }
}

/// Trims author entries and drops blank ones, keeping order.
pub fn normalize_authors(authors: Vec<String>) -> Vec<String> {
    authors
        .into_iter()
        .map(|a| a.trim().to_string())
        .filter(|a| !a.is_empty())
        .collect()
}
