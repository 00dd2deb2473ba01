//! End-to-end view flows over HTTP

use std::sync::Arc;

use catalog_ui::{
    api::HttpCatalogClient,
    config::{ApiConfig, AppConfig},
    services::{notifications, NotificationFeed, NotificationLevel},
    views::{
        navigate, AddBookPage, BookField, BooksListView, DeleteOutcome, ListState, Route, Screen,
        SubmitOutcome,
    },
    AppContext,
};

use crate::fake_backend::{FakeBackend, ADMIN_TOKEN, READER_TOKEN};

fn context(backend: &FakeBackend, token: &str) -> (AppContext, NotificationFeed) {
    let config = AppConfig {
        api: ApiConfig {
            base_url: backend.base_url.clone(),
            token: Some(token.to_string()),
            timeout_secs: 5,
        },
        ..AppConfig::default()
    };
    let client = HttpCatalogClient::new(&config.api).unwrap();
    let (notifier, feed) = notifications::channel();
    (AppContext::new(config, Arc::new(client), notifier), feed)
}

async fn list_view(ctx: &AppContext, query: &str) -> BooksListView {
    let mut view = BooksListView::new();
    view.set_input(query);
    view.submit_search(ctx).await;
    view
}

#[tokio::test]
async fn test_added_book_shows_up_in_search() {
    let backend = FakeBackend::start().await;
    let (ctx, mut feed) = context(&backend, ADMIN_TOKEN);

    let mut view = list_view(&ctx, "Dune").await;
    assert!(!view.rows().iter().any(|b| b.isbn == "111"));

    let mut page = AddBookPage::enter(&ctx).await.unwrap();
    page.set_field(BookField::Isbn, "111");
    page.set_field(BookField::Title, "Dune");
    page.set_field(BookField::AuthorName, "Frank Herbert");
    let outcome = page.submit(&ctx).await;
    assert!(matches!(outcome, SubmitOutcome::Created(_)));
    assert_eq!(outcome.next_route(), Some(Route::Books));
    assert_eq!(feed.drain()[0].level, NotificationLevel::Success);

    view.refresh(&ctx).await;
    assert!(view.rows().iter().any(|b| b.isbn == "111"));
}

#[tokio::test]
async fn test_delete_removes_book_from_every_list() {
    let backend = FakeBackend::start().await;
    let (ctx, mut feed) = context(&backend, ADMIN_TOKEN);
    ctx.session.refresh(ctx.catalog.as_ref()).await.unwrap();

    let mut everything = list_view(&ctx, "").await;
    let mut by_title = list_view(&ctx, "Dune").await;
    let mut by_author = list_view(&ctx, "herbert").await;
    let calls_before = backend.search_calls();

    let mut control = by_title.delete_control(&ctx.session, "978-0").unwrap();
    assert!(control.open(&ctx.session));
    assert_eq!(control.confirm(&ctx).await, DeleteOutcome::Deleted);
    assert!(!backend.has_book("978-0"));
    assert_eq!(
        feed.drain()[0].message,
        "Book \"Dune\" deleted successfully"
    );

    for view in [&mut everything, &mut by_title, &mut by_author] {
        view.refresh(&ctx).await;
        assert!(!view.rows().iter().any(|b| b.isbn == "978-0"));
    }
    assert_eq!(backend.search_calls(), calls_before + 3);
}

#[tokio::test]
async fn test_cached_query_is_not_refetched() {
    let backend = FakeBackend::start().await;
    let (ctx, _feed) = context(&backend, READER_TOKEN);

    let mut view = list_view(&ctx, "Emma").await;
    view.refresh(&ctx).await;
    let _other = list_view(&ctx, "Emma").await;

    assert_eq!(backend.search_calls(), 1);
    assert!(matches!(view.state(), ListState::Ready(page) if page.count == 1));
}

#[tokio::test]
async fn test_reader_is_redirected_from_add_route() {
    let backend = FakeBackend::start().await;
    let (ctx, mut feed) = context(&backend, READER_TOKEN);

    let nav = navigate(&ctx, Route::AddBook).await;
    assert_eq!(nav.redirected_from, Some(Route::AddBook));
    match nav.screen {
        Screen::Books(view) => {
            assert_eq!(view.rows().len(), 3);
            assert!(!view.shows_add_book(&ctx.session));
            assert!(view.delete_control(&ctx.session, "978-0").is_none());
        }
        Screen::AddBook(_) => panic!("reader reached the add form"),
    }
    assert!(feed.drain().is_empty());
}

#[tokio::test]
async fn test_deleting_twice_reports_not_found() {
    let backend = FakeBackend::start().await;
    let (ctx, mut feed) = context(&backend, ADMIN_TOKEN);
    ctx.session.refresh(ctx.catalog.as_ref()).await.unwrap();

    let view = list_view(&ctx, "").await;
    let mut first = view.delete_control(&ctx.session, "978-1").unwrap();
    let mut second = view.delete_control(&ctx.session, "978-1").unwrap();

    first.open(&ctx.session);
    assert_eq!(first.confirm(&ctx).await, DeleteOutcome::Deleted);
    second.open(&ctx.session);
    assert_eq!(second.confirm(&ctx).await, DeleteOutcome::Failed);

    let messages: Vec<String> = feed.drain().into_iter().map(|n| n.message).collect();
    assert_eq!(messages[1], "Book not found");
}
