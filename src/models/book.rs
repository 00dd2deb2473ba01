//! Book models and related types

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Loan status of a book as reported by the search endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Availability {
    #[serde(rename = "IN")]
    In,
    #[serde(rename = "OUT")]
    Out,
}

impl Availability {
    /// Return the wire code for this status
    pub fn as_code(&self) -> &'static str {
        match self {
            Availability::In => "IN",
            Availability::Out => "OUT",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Availability::In => "Available",
            Availability::Out => "Checked out",
        }
    }
}

impl std::fmt::Display for Availability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One row of a search result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookSearchResult {
    pub isbn: String,
    pub title: String,
    /// Comma-separated author names, absent for books without authors
    #[serde(default)]
    pub authors: Option<String>,
    pub available: Availability,
}

/// A page of search results (`BooksSearchPublic` on the wire)
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BooksPage {
    pub data: Vec<BookSearchResult>,
    /// Total number of matches before pagination
    pub count: i64,
}

impl BooksPage {
    /// Whether the page holds fewer rows than the server matched
    pub fn is_truncated(&self) -> bool {
        (self.data.len() as i64) < self.count
    }

    pub fn contains(&self, isbn: &str) -> bool {
        self.data.iter().any(|book| book.isbn == isbn)
    }
}

/// Book as returned by create and delete
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookPublic {
    pub isbn: String,
    pub title: String,
}

/// Row identity used by per-row controls
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BookRef {
    pub isbn: String,
    pub title: String,
}

impl From<&BookSearchResult> for BookRef {
    fn from(book: &BookSearchResult) -> Self {
        Self {
            isbn: book.isbn.clone(),
            title: book.title.clone(),
        }
    }
}

impl From<&BookPublic> for BookRef {
    fn from(book: &BookPublic) -> Self {
        Self {
            isbn: book.isbn.clone(),
            title: book.title.clone(),
        }
    }
}

/// Create book request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct CreateBook {
    #[validate(length(min = 1, message = "ISBN is required"))]
    pub isbn: String,
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Author name is required"))]
    pub author_name: String,
}

/// Search query parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    pub skip: i64,
    pub limit: i64,
}

impl SearchParams {
    /// First page for an active query; an empty query searches everything
    pub fn first_page(active_query: &str, limit: i64) -> Self {
        Self {
            query: (!active_query.is_empty()).then(|| active_query.to_string()),
            skip: 0,
            limit,
        }
    }
}
