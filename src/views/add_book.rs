//! Add book page: guarded, validated creation form

use std::collections::HashMap;
use validator::Validate;

use crate::{
    error::AppResult,
    models::{BookPublic, CreateBook},
    services::{QueryKey, Session},
    AppContext,
};

use super::router::Route;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BookField {
    Isbn,
    Title,
    AuthorName,
}

impl BookField {
    pub const ALL: [BookField; 3] = [BookField::Isbn, BookField::Title, BookField::AuthorName];

    pub fn label(&self) -> &'static str {
        match self {
            BookField::Isbn => "ISBN",
            BookField::Title => "Title",
            BookField::AuthorName => "Author",
        }
    }

    fn from_key(key: &str) -> Option<Self> {
        match key {
            "isbn" => Some(BookField::Isbn),
            "title" => Some(BookField::Title),
            "author_name" => Some(BookField::AuthorName),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Field errors block the request
    Invalid,
    /// The session lost its rights; leave for the list page
    Redirect(Route),
    /// Request failed; the form keeps its values
    Failed,
    Created(BookPublic),
    /// A submission is already in flight
    Ignored,
}

impl SubmitOutcome {
    /// Route to show after this outcome, if the page should be left
    pub fn next_route(&self) -> Option<Route> {
        match self {
            SubmitOutcome::Created(_) => Some(Route::Books),
            SubmitOutcome::Redirect(route) => Some(*route),
            _ => None,
        }
    }
}

pub struct AddBookPage {
    form: CreateBook,
    errors: HashMap<BookField, String>,
    submitting: bool,
}

impl AddBookPage {
    /// Route guard: ask the server who we are before any form state exists.
    ///
    /// Anything but a confirmed superuser yields the route to redirect to.
    pub async fn enter(ctx: &AppContext) -> Result<Self, Route> {
        match ctx.session.refresh(ctx.catalog.as_ref()).await {
            Ok(user) => match user.require_catalog_manager() {
                Ok(()) => Ok(Self {
                    form: CreateBook::default(),
                    errors: HashMap::new(),
                    submitting: false,
                }),
                Err(e) => {
                    tracing::info!("{} cannot add books ({}), redirecting", user.email, e);
                    Err(Route::Books)
                }
            },
            Err(e) => {
                tracing::warn!("Could not confirm the session user, redirecting: {}", e);
                Err(Route::Books)
            }
        }
    }

    pub fn field(&self, field: BookField) -> &str {
        match field {
            BookField::Isbn => &self.form.isbn,
            BookField::Title => &self.form.title,
            BookField::AuthorName => &self.form.author_name,
        }
    }

    /// Edit a field; its previous error is cleared until the next validation
    pub fn set_field(&mut self, field: BookField, value: impl Into<String>) {
        let value = value.into();
        match field {
            BookField::Isbn => self.form.isbn = value,
            BookField::Title => self.form.title = value,
            BookField::AuthorName => self.form.author_name = value,
        }
        self.errors.remove(&field);
    }

    pub fn field_error(&self, field: BookField) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn submit_label(&self) -> &'static str {
        if self.submitting {
            "Saving..."
        } else {
            "Save"
        }
    }

    /// Run field validation, recording an error per failing field
    pub fn validate(&mut self) -> bool {
        self.errors.clear();
        if let Err(errors) = self.form.validate() {
            for (key, field_errors) in errors.field_errors() {
                let Some(field) = BookField::from_key(&key.to_string()) else {
                    continue;
                };
                let message = field_errors
                    .iter()
                    .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
                    .unwrap_or_else(|| format!("{} is invalid", field.label()));
                self.errors.insert(field, message);
            }
        }
        self.errors.is_empty()
    }

    /// Validate, re-check the session and move to the submitting state.
    ///
    /// Returns the payload to send, or the outcome that stops the submission.
    pub fn begin_submit(&mut self, session: &Session) -> Result<CreateBook, SubmitOutcome> {
        if self.submitting {
            return Err(SubmitOutcome::Ignored);
        }
        if !self.validate() {
            return Err(SubmitOutcome::Invalid);
        }
        if !session.is_superuser() {
            tracing::warn!("Session is no longer a superuser, dropping the add form");
            return Err(SubmitOutcome::Redirect(Route::Books));
        }
        self.submitting = true;
        Ok(self.form.clone())
    }

    /// Report the outcome of the request started by [`Self::begin_submit`]
    pub async fn finish_submit(&mut self, ctx: &AppContext, result: AppResult<BookPublic>) -> SubmitOutcome {
        self.submitting = false;
        match result {
            Ok(book) => {
                ctx.notifier
                    .success(format!("Book \"{}\" added successfully", book.title));
                ctx.books_cache.invalidate_prefix(&QueryKey::all_books()).await;
                SubmitOutcome::Created(book)
            }
            Err(e) => {
                tracing::warn!("Creating book {} failed: {}", self.form.isbn, e);
                ctx.notifier.error(e.user_message());
                SubmitOutcome::Failed
            }
        }
    }

    pub async fn submit(&mut self, ctx: &AppContext) -> SubmitOutcome {
        let payload = match self.begin_submit(&ctx.session) {
            Ok(payload) => payload,
            Err(outcome) => return outcome,
        };
        let result = ctx.catalog.create_book(&payload).await;
        self.finish_submit(ctx, result).await
    }
}
