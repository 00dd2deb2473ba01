//! Books list page: search form plus the results table
//!
//! Typing only edits the live input. The active query, which drives the
//! fetch and the cache key, changes on submit or clear. Each fetch carries a
//! sequence number and only the newest one may update the page, so a slow
//! response for an abandoned query never replaces a newer result.

use crate::{
    error::AppResult,
    models::{BookRef, BookSearchResult, BooksPage, SearchParams},
    services::{QueryKey, Session},
    AppContext,
};

use super::delete_book::DeleteBookControl;

/// Live input and committed query of the search form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchState {
    input: String,
    active: String,
}

impl SearchState {
    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn active(&self) -> &str {
        &self.active
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Commit the live input as typed. Returns whether the active query changed.
    pub fn submit(&mut self) -> bool {
        let changed = self.active != self.input;
        self.active = self.input.clone();
        changed
    }

    /// Reset both values. Returns whether the active query changed.
    pub fn clear(&mut self) -> bool {
        let changed = !self.active.is_empty();
        self.input.clear();
        self.active.clear();
        changed
    }
}

/// What the table area shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListState {
    /// Fetch in flight: render the skeleton placeholder
    Loading,
    Ready(BooksPage),
    /// Fetch failed; holds the message to show in place of the table
    Failed(String),
}

/// Handle for one fetch, returned by [`BooksListView::begin_fetch`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    seq: u64,
    query: String,
}

impl FetchTicket {
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn key(&self) -> QueryKey {
        QueryKey::books(&self.query)
    }
}

pub struct BooksListView {
    search: SearchState,
    state: ListState,
    latest_seq: u64,
}

impl BooksListView {
    pub fn new() -> Self {
        Self {
            search: SearchState::default(),
            state: ListState::Loading,
            latest_seq: 0,
        }
    }

    pub fn search(&self) -> &SearchState {
        &self.search
    }

    pub fn state(&self) -> &ListState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, ListState::Loading)
    }

    /// Rows of the last successful fetch for the active query
    pub fn rows(&self) -> &[BookSearchResult] {
        match &self.state {
            ListState::Ready(page) => &page.data,
            _ => &[],
        }
    }

    pub fn query_key(&self) -> QueryKey {
        QueryKey::books(self.search.active())
    }

    /// Edit the live input; never fetches
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.search.set_input(text);
    }

    /// Commit the live input as the active query without fetching
    pub fn commit_search(&mut self) -> bool {
        let changed = self.search.submit();
        if changed {
            tracing::debug!("Active query is now {:?}", self.search.active());
        }
        changed
    }

    /// Reset input and active query without fetching
    pub fn reset_search(&mut self) -> bool {
        self.search.clear()
    }

    pub async fn submit_search(&mut self, ctx: &AppContext) -> &ListState {
        self.commit_search();
        self.refresh(ctx).await
    }

    pub async fn clear_search(&mut self, ctx: &AppContext) -> &ListState {
        self.reset_search();
        self.refresh(ctx).await
    }

    /// Fetch the active query through the cache and show the result
    pub async fn refresh(&mut self, ctx: &AppContext) -> &ListState {
        let ticket = self.begin_fetch();
        let result = load_books(ctx, ticket.query()).await;
        self.complete_fetch(ticket, result);
        &self.state
    }

    /// Start a fetch for the active query and switch to the loading state
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.latest_seq += 1;
        self.state = ListState::Loading;
        FetchTicket {
            seq: self.latest_seq,
            query: self.search.active().to_string(),
        }
    }

    /// Apply a fetch result. Returns `false` when a newer fetch superseded it.
    pub fn complete_fetch(&mut self, ticket: FetchTicket, result: AppResult<BooksPage>) -> bool {
        if ticket.seq != self.latest_seq {
            tracing::debug!(
                "Discarding superseded result for {:?} (fetch {} < {})",
                ticket.query,
                ticket.seq,
                self.latest_seq
            );
            return false;
        }

        self.state = match result {
            Ok(page) => ListState::Ready(page),
            Err(e) => {
                tracing::warn!("Book search for {:?} failed: {}", ticket.query, e);
                ListState::Failed(e.user_message())
            }
        };
        true
    }

    /// The "Add Book" affordance is only rendered for superusers
    pub fn shows_add_book(&self, session: &Session) -> bool {
        session.is_superuser()
    }

    /// Delete control for a displayed row, if the session may delete
    pub fn delete_control(&self, session: &Session, isbn: &str) -> Option<DeleteBookControl> {
        if !session.is_superuser() {
            return None;
        }
        self.rows()
            .iter()
            .find(|book| book.isbn == isbn)
            .map(|book| DeleteBookControl::new(BookRef::from(book)))
    }

    /// "Showing N of M books" when the page size cut the result short
    pub fn truncation_notice(&self) -> Option<String> {
        match &self.state {
            ListState::Ready(page) if page.is_truncated() => Some(format!(
                "Showing {} of {} books, refine the search to see the rest",
                page.data.len(),
                page.count
            )),
            _ => None,
        }
    }
}

impl Default for BooksListView {
    fn default() -> Self {
        Self::new()
    }
}

/// Search books for an active query, reusing a fresh cached page when present
pub async fn load_books(ctx: &AppContext, active_query: &str) -> AppResult<BooksPage> {
    let key = QueryKey::books(active_query);
    let params = SearchParams::first_page(active_query, ctx.page_size());
    let catalog = ctx.catalog.clone();

    ctx.books_cache
        .fetch_or_reuse(&key, || async move { catalog.search_books(&params).await })
        .await
}
