//! Line-oriented console front end
//!
//! Reads commands from any async line source and drives the views, printing
//! tables, prompts and notifications to any async writer.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Cell, ContentArrangement, Table};
use std::io;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, Lines};

use crate::{
    models::User,
    services::{Notification, NotificationFeed, NotificationLevel, Session},
    views::{
        load_books, navigate, AddBookPage, BookField, BooksListView, DeleteBookControl,
        DeleteOutcome, ListState, Route, Screen, SubmitOutcome,
    },
    AppContext,
};

const SKELETON_ROWS: usize = 3;
const SKELETON_CELL: &str = "░░░░░░░░";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Set the input and submit it in one go
    Search(String),
    /// Edit the live input without fetching
    Type(String),
    Submit,
    Clear,
    Refresh,
    Add,
    Delete(String),
    WhoAmI,
    Help,
    Quit,
}

impl Command {
    /// Parse one input line. Blank lines yield `Ok(None)`.
    ///
    /// Search text is kept as typed after the command word.
    pub fn parse(line: &str) -> Result<Option<Self>, String> {
        let line = line.trim_end_matches(['\r', '\n']).trim_start();
        if line.trim().is_empty() {
            return Ok(None);
        }
        let (word, rest) = line.split_once(' ').unwrap_or((line, ""));

        let command = match word.to_lowercase().as_str() {
            "search" | "s" => Command::Search(rest.to_string()),
            "type" => Command::Type(rest.to_string()),
            "submit" => Command::Submit,
            "clear" => Command::Clear,
            "refresh" | "r" => Command::Refresh,
            "add" => Command::Add,
            "delete" | "rm" => {
                let isbn = rest.trim();
                if isbn.is_empty() {
                    return Err("Usage: delete <isbn>".to_string());
                }
                Command::Delete(isbn.to_string())
            }
            "whoami" => Command::WhoAmI,
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            other => return Err(format!("Unknown command: {}. Type `help` for a list.", other)),
        };
        Ok(Some(command))
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

/// Render the table area of the list page
pub fn render_books(view: &BooksListView, session: &Session) -> String {
    let manage = session.is_superuser();
    let mut header = vec!["ISBN", "Title", "Authors", "Availability"];
    if manage {
        header.push("Actions");
    }

    match view.state() {
        ListState::Loading => {
            let mut table = Table::new();
            table.set_header(header.clone());
            apply_table_style(&mut table);
            for _ in 0..SKELETON_ROWS {
                table.add_row(vec![SKELETON_CELL; header.len()]);
            }
            table.to_string()
        }
        ListState::Failed(message) => format!("Could not load books: {}", message),
        ListState::Ready(page) if page.data.is_empty() => {
            if view.search().active().is_empty() {
                "No books in the catalog.".to_string()
            } else {
                format!("No books match \"{}\".", view.search().active())
            }
        }
        ListState::Ready(page) => {
            let mut table = Table::new();
            table.set_header(header);
            apply_table_style(&mut table);
            for book in &page.data {
                let mut row = vec![
                    Cell::new(&book.isbn),
                    Cell::new(&book.title),
                    Cell::new(book.authors.as_deref().unwrap_or("-")),
                    Cell::new(book.available.label()),
                ];
                if manage {
                    row.push(Cell::new("Delete"));
                }
                table.add_row(row);
            }
            let mut out = table.to_string();
            if let Some(notice) = view.truncation_notice() {
                out.push('\n');
                out.push_str(&notice);
            }
            out
        }
    }
}

pub fn render_notification(notification: &Notification) -> String {
    let tag = match notification.level {
        NotificationLevel::Success => "ok",
        NotificationLevel::Error => "error",
    };
    format!("[{}] {}", tag, notification.message)
}

fn render_user(user: &User) -> String {
    let role = if user.can_manage_catalog() {
        "superuser"
    } else {
        "reader"
    };
    format!("Signed in as {} <{}> ({})", user.display_name(), user.email, role)
}

fn help_text(session: &Session) -> String {
    let mut lines = vec![
        "search <text>   search the catalog (empty text lists everything)",
        "type <text>     edit the search input without running it",
        "submit          run the search input",
        "clear           clear the search and list every book",
        "refresh         reload the current list",
    ];
    if session.is_superuser() {
        lines.push("add             add a book");
        lines.push("delete <isbn>   delete a listed book");
    }
    lines.push("whoami          show the signed-in user");
    lines.push("quit            leave");
    lines.join("\n")
}

pub struct Console<R, W> {
    ctx: AppContext,
    feed: NotificationFeed,
    list: BooksListView,
    lines: Lines<R>,
    out: W,
}

impl<R, W> Console<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    /// Open the console on the book list. The first fetch runs in [`Self::run`].
    pub fn new(ctx: AppContext, feed: NotificationFeed, input: R, out: W) -> Self {
        Self {
            ctx,
            feed,
            list: BooksListView::new(),
            lines: input.lines(),
            out,
        }
    }

    pub fn list(&self) -> &BooksListView {
        &self.list
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Process commands until `quit` or end of input
    pub async fn run(&mut self) -> io::Result<()> {
        self.reload_list().await?;
        self.flush_notifications().await?;

        loop {
            let Some(line) = self.read_line("> ").await? else {
                break;
            };
            let command = match Command::parse(&line) {
                Ok(Some(command)) => command,
                Ok(None) => continue,
                Err(message) => {
                    self.write_line(&message).await?;
                    continue;
                }
            };
            tracing::debug!("Command: {:?}", command);
            if command == Command::Quit {
                break;
            }
            self.execute(command).await?;
            self.flush_notifications().await?;
        }
        self.out.flush().await
    }

    async fn execute(&mut self, command: Command) -> io::Result<()> {
        match command {
            Command::Search(text) => {
                self.list.set_input(text);
                self.list.commit_search();
                self.reload_list().await
            }
            Command::Type(text) => {
                self.list.set_input(text);
                let echo = format!("Search input: \"{}\"", self.list.search().input());
                self.write_line(&echo).await
            }
            Command::Submit => {
                self.list.commit_search();
                self.reload_list().await
            }
            Command::Clear => {
                self.list.reset_search();
                self.reload_list().await
            }
            Command::Refresh => self.reload_list().await,
            Command::Add => self.add_book().await,
            Command::Delete(isbn) => self.delete_book(&isbn).await,
            Command::WhoAmI => {
                let text = match self.ctx.session.refresh(self.ctx.catalog.as_ref()).await {
                    Ok(user) => render_user(&user),
                    Err(e) => format!("Not signed in: {}", e.user_message()),
                };
                self.write_line(&text).await
            }
            Command::Help => {
                let text = help_text(&self.ctx.session);
                self.write_line(&text).await
            }
            Command::Quit => Ok(()),
        }
    }

    async fn show_list(&mut self) -> io::Result<()> {
        let mut text = String::new();
        if !self.list.search().active().is_empty() {
            text.push_str(&format!("Results for \"{}\"\n", self.list.search().active()));
        }
        text.push_str(&render_books(&self.list, &self.ctx.session));
        if self.list.shows_add_book(&self.ctx.session) {
            text.push_str("\nType `add` to add a book.");
        }
        self.write_line(&text).await
    }

    /// Fetch the active query, showing the skeleton until the result lands
    async fn reload_list(&mut self) -> io::Result<()> {
        let ticket = self.list.begin_fetch();
        self.show_list().await?;
        let result = load_books(&self.ctx, ticket.query()).await;
        self.list.complete_fetch(ticket, result);
        self.show_list().await
    }

    async fn go_to_list(&mut self) -> io::Result<()> {
        self.list = BooksListView::new();
        self.reload_list().await
    }

    async fn add_book(&mut self) -> io::Result<()> {
        let nav = navigate(&self.ctx, Route::AddBook).await;
        let mut page = match nav.screen {
            Screen::AddBook(page) => page,
            Screen::Books(view) => {
                self.list = view;
                return self.show_list().await;
            }
        };

        let mut pending: Vec<BookField> = BookField::ALL.to_vec();
        loop {
            for field in pending.drain(..) {
                if !self.prompt_field(&mut page, field).await? {
                    self.write_line("Add cancelled.").await?;
                    return self.show_list().await;
                }
            }

            let outcome = match page.begin_submit(&self.ctx.session) {
                Ok(payload) => {
                    self.write_line(page.submit_label()).await?;
                    let result = self.ctx.catalog.create_book(&payload).await;
                    page.finish_submit(&self.ctx, result).await
                }
                Err(outcome) => outcome,
            };
            match outcome {
                SubmitOutcome::Invalid => {
                    for field in BookField::ALL {
                        if let Some(error) = page.field_error(field) {
                            let text = format!("{}: {}", field.label(), error);
                            self.write_line(&text).await?;
                            pending.push(field);
                        }
                    }
                }
                SubmitOutcome::Failed => {
                    self.flush_notifications().await?;
                    let retry = self.read_line("Edit and retry? [y/N] ").await?;
                    if !matches!(retry.as_deref().map(str::trim), Some("y" | "Y")) {
                        return self.show_list().await;
                    }
                    pending.extend(BookField::ALL);
                }
                SubmitOutcome::Ignored => {}
                outcome @ (SubmitOutcome::Created(_) | SubmitOutcome::Redirect(_)) => {
                    tracing::debug!("Add flow finished with {:?}", outcome);
                    self.flush_notifications().await?;
                    return self.go_to_list().await;
                }
            }
        }
    }

    /// Ask for one field, keeping the current value on blank input when there
    /// is one. Returns `false` when input ended.
    async fn prompt_field(&mut self, page: &mut AddBookPage, field: BookField) -> io::Result<bool> {
        let current = page.field(field).to_string();
        let prompt = if current.is_empty() {
            format!("{}: ", field.label())
        } else {
            format!("{} [{}]: ", field.label(), current)
        };
        let Some(value) = self.read_line(&prompt).await? else {
            return Ok(false);
        };
        let value = value.trim();
        if !(value.is_empty() && !current.is_empty()) {
            page.set_field(field, value);
        }
        Ok(true)
    }

    async fn delete_book(&mut self, isbn: &str) -> io::Result<()> {
        if !self.ctx.session.is_superuser() {
            return self.write_line("Deleting books requires a superuser.").await;
        }
        let Some(mut control) = self.list.delete_control(&self.ctx.session, isbn) else {
            let text = format!("No book with ISBN {} in the current list.", isbn);
            return self.write_line(&text).await;
        };
        if !control.open(&self.ctx.session) {
            return Ok(());
        }

        // The dialog stays open after a failure until confirmed again or cancelled
        loop {
            let prompt = format!("{} [y/N] ", control.prompt());
            let answer = self.read_line(&prompt).await?;
            if !matches!(answer.as_deref().map(str::trim), Some("y" | "Y")) {
                control.cancel();
                return self.write_line("Cancelled.").await;
            }

            match self.send_delete(&mut control).await? {
                DeleteOutcome::Deleted => {
                    self.flush_notifications().await?;
                    return self.reload_list().await;
                }
                DeleteOutcome::Failed => self.flush_notifications().await?,
                DeleteOutcome::Ignored => return Ok(()),
            }
        }
    }

    async fn send_delete(&mut self, control: &mut DeleteBookControl) -> io::Result<DeleteOutcome> {
        let Some(isbn) = control.begin() else {
            return Ok(DeleteOutcome::Ignored);
        };
        self.write_line(control.button_label()).await?;
        let result = self.ctx.catalog.delete_book(&isbn).await;
        Ok(control.finish(&self.ctx, result).await)
    }

    async fn flush_notifications(&mut self) -> io::Result<()> {
        for notification in self.feed.drain() {
            let text = render_notification(&notification);
            self.write_line(&text).await?;
        }
        Ok(())
    }

    async fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        self.out.write_all(prompt.as_bytes()).await?;
        self.out.flush().await?;
        self.lines.next_line().await
    }

    async fn write_line(&mut self, text: &str) -> io::Result<()> {
        self.out.write_all(text.as_bytes()).await?;
        self.out.write_all(b"\n").await
    }
}
