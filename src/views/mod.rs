//! Headless page state for the catalog front end

pub mod add_book;
pub mod books_list;
pub mod delete_book;
pub mod router;

pub use add_book::{AddBookPage, BookField, SubmitOutcome};
pub use books_list::{load_books, BooksListView, FetchTicket, ListState, SearchState};
pub use delete_book::{DeleteBookControl, DeleteOutcome, DialogState};
pub use router::{navigate, Navigation, Route, Screen};
