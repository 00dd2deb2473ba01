//! Per-row delete control with a confirmation dialog

use crate::{
    error::AppResult,
    models::{BookPublic, BookRef},
    services::{QueryKey, Session},
    AppContext,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogState {
    Closed,
    /// Waiting for the user to confirm or cancel
    Open,
    /// Delete request in flight; the control is disabled
    Pending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// Request failed; the dialog is open again for retry or cancel
    Failed,
    /// Nothing was sent (dialog not open, or a delete already pending)
    Ignored,
}

pub struct DeleteBookControl {
    book: BookRef,
    dialog: DialogState,
}

impl DeleteBookControl {
    pub fn new(book: BookRef) -> Self {
        Self {
            book,
            dialog: DialogState::Closed,
        }
    }

    pub fn book(&self) -> &BookRef {
        &self.book
    }

    pub fn dialog(&self) -> DialogState {
        self.dialog
    }

    pub fn is_pending(&self) -> bool {
        self.dialog == DialogState::Pending
    }

    pub fn button_label(&self) -> &'static str {
        if self.is_pending() {
            "Deleting..."
        } else {
            "Delete"
        }
    }

    pub fn prompt(&self) -> String {
        format!(
            "Are you sure you want to delete \"{}\" ({})? This action cannot be undone.",
            self.book.title, self.book.isbn
        )
    }

    /// Open the confirmation dialog. Only superusers get a dialog.
    pub fn open(&mut self, session: &Session) -> bool {
        if !session.is_superuser() {
            tracing::warn!("Delete of {} refused: not a superuser", self.book.isbn);
            return false;
        }
        if self.dialog == DialogState::Closed {
            self.dialog = DialogState::Open;
        }
        true
    }

    /// Cancel or dismiss the dialog. Has no effect while a delete is pending.
    pub fn cancel(&mut self) -> bool {
        match self.dialog {
            DialogState::Open => {
                self.dialog = DialogState::Closed;
                true
            }
            DialogState::Closed | DialogState::Pending => false,
        }
    }

    /// Move to the pending state and return the ISBN to delete
    pub fn begin(&mut self) -> Option<String> {
        if self.dialog != DialogState::Open {
            return None;
        }
        self.dialog = DialogState::Pending;
        Some(self.book.isbn.clone())
    }

    /// Report the outcome of the request started by [`Self::begin`]
    pub async fn finish(&mut self, ctx: &AppContext, result: AppResult<BookPublic>) -> DeleteOutcome {
        if self.dialog != DialogState::Pending {
            return DeleteOutcome::Ignored;
        }

        match result {
            Ok(_) => {
                ctx.notifier
                    .success(format!("Book \"{}\" deleted successfully", self.book.title));
                ctx.books_cache.invalidate_prefix(&QueryKey::all_books()).await;
                self.dialog = DialogState::Closed;
                DeleteOutcome::Deleted
            }
            Err(e) => {
                tracing::warn!("Delete of {} failed: {}", self.book.isbn, e);
                ctx.notifier.error(e.user_message());
                self.dialog = DialogState::Open;
                DeleteOutcome::Failed
            }
        }
    }

    /// Confirm the dialog: send the delete and report its outcome
    pub async fn confirm(&mut self, ctx: &AppContext) -> DeleteOutcome {
        let Some(isbn) = self.begin() else {
            return DeleteOutcome::Ignored;
        };
        let result = ctx.catalog.delete_book(&isbn).await;
        self.finish(ctx, result).await
    }
}
