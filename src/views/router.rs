//! Route table and screen switching

use std::fmt;

use crate::AppContext;

use super::{add_book::AddBookPage, books_list::BooksListView};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Books,
    AddBook,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Books => "/books",
            Route::AddBook => "/books/add",
        }
    }

    /// Resolve a path; the root path lands on the book list
    pub fn from_path(path: &str) -> Option<Self> {
        let trimmed = path.trim();
        let trimmed = if trimmed.len() > 1 {
            trimmed.trim_end_matches('/')
        } else {
            trimmed
        };
        match trimmed {
            "/" | "" | "/books" => Some(Route::Books),
            "/books/add" => Some(Route::AddBook),
            _ => None,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// The page currently on screen
pub enum Screen {
    Books(BooksListView),
    AddBook(AddBookPage),
}

impl Screen {
    pub fn route(&self) -> Route {
        match self {
            Screen::Books(_) => Route::Books,
            Screen::AddBook(_) => Route::AddBook,
        }
    }
}

/// Result of a navigation: the screen shown and, when a guard refused the
/// requested route, which route that was
pub struct Navigation {
    pub screen: Screen,
    pub redirected_from: Option<Route>,
}

/// Enter a route, running its guard and initial fetch
pub async fn navigate(ctx: &AppContext, route: Route) -> Navigation {
    match route {
        Route::Books => Navigation {
            screen: books_screen(ctx).await,
            redirected_from: None,
        },
        Route::AddBook => match AddBookPage::enter(ctx).await {
            Ok(page) => Navigation {
                screen: Screen::AddBook(page),
                redirected_from: None,
            },
            Err(target) => {
                tracing::info!("Route {} refused, showing {}", route, target);
                // Guards only ever redirect to the list
                Navigation {
                    screen: books_screen(ctx).await,
                    redirected_from: Some(route),
                }
            }
        },
    }
}

async fn books_screen(ctx: &AppContext) -> Screen {
    let mut view = BooksListView::new();
    view.refresh(ctx).await;
    Screen::Books(view)
}
