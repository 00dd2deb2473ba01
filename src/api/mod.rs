//! Catalog API access
//!
//! Everything the front end knows about the remote catalog goes through the
//! [`CatalogService`] trait. [`client::HttpCatalogClient`] is the real
//! implementation; tests substitute mocks or a local fake server.

pub mod client;

use async_trait::async_trait;

use crate::{
    error::AppResult,
    models::{BookPublic, BooksPage, CreateBook, SearchParams, User},
};

pub use client::HttpCatalogClient;

/// Operations offered by the catalog API
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Search books by title, ISBN or author name
    async fn search_books(&self, params: &SearchParams) -> AppResult<BooksPage>;

    /// Create a book with a single author (the author is created server-side if needed)
    async fn create_book(&self, book: &CreateBook) -> AppResult<BookPublic>;

    /// Delete a book by ISBN
    async fn delete_book(&self, isbn: &str) -> AppResult<BookPublic>;

    /// Fetch the user the configured token belongs to
    async fn read_user_me(&self) -> AppResult<User>;
}
