//! Data models exchanged with the catalog API

pub mod book;
pub mod user;

// Re-export commonly used types
pub use book::{
    Availability, BookPublic, BookRef, BookSearchResult, BooksPage, CreateBook, SearchParams,
};
pub use user::User;
