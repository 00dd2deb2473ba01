//! HTTP client against the fake backend

use catalog_ui::{
    api::{CatalogService, HttpCatalogClient},
    config::ApiConfig,
    models::{Availability, CreateBook, SearchParams},
    AppError,
};
use tokio_test::{assert_err, assert_ok};

use crate::fake_backend::{FakeBackend, ADMIN_TOKEN, READER_TOKEN};

fn client(backend: &FakeBackend, token: Option<&str>) -> HttpCatalogClient {
    HttpCatalogClient::new(&ApiConfig {
        base_url: backend.base_url.clone(),
        token: token.map(str::to_string),
        timeout_secs: 5,
    })
    .unwrap()
}

fn new_book(isbn: &str, title: &str) -> CreateBook {
    CreateBook {
        isbn: isbn.to_string(),
        title: title.to_string(),
        author_name: "Frank Herbert".to_string(),
    }
}

#[tokio::test]
async fn test_search_without_query_lists_everything() {
    let backend = FakeBackend::start().await;
    let client = client(&backend, None);

    let page = assert_ok!(client.search_books(&SearchParams::first_page("", 100)).await);
    assert_eq!(page.count, 3);
    let titles: Vec<&str> = page.data.iter().map(|b| b.title.as_str()).collect();
    assert_eq!(titles, vec!["Beowulf", "Dune", "Emma"]);
    assert_eq!(page.data[0].authors, None);
    assert_eq!(page.data[2].available, Availability::Out);
}

#[tokio::test]
async fn test_search_is_sent_literally() {
    let backend = FakeBackend::start().await;
    let client = client(&backend, None);

    let page = assert_ok!(client.search_books(&SearchParams::first_page("herbert", 100)).await);
    assert_eq!(page.count, 1);
    assert_eq!(page.data[0].isbn, "978-0");

    let page = assert_ok!(client.search_books(&SearchParams::first_page(" dune", 100)).await);
    assert_eq!(page.count, 0);
}

#[tokio::test]
async fn test_oversized_page_reports_field_message() {
    let backend = FakeBackend::start().await;
    let client = client(&backend, None);

    let err = assert_err!(client.search_books(&SearchParams::first_page("", 101)).await);
    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(err.user_message(), "Input should be less than or equal to 100");
}

#[tokio::test]
async fn test_create_then_duplicate() {
    let backend = FakeBackend::start().await;
    let client = client(&backend, Some(ADMIN_TOKEN));

    let created = assert_ok!(client.create_book(&new_book("111", "Dune Messiah")).await);
    assert_eq!(created.isbn, "111");
    assert!(backend.has_book("111"));

    let err = assert_err!(client.create_book(&new_book("111", "Dune Messiah")).await);
    assert!(matches!(err, AppError::BadRequest(_)));
    assert_eq!(err.user_message(), "Book with this ISBN already exists");
}

#[tokio::test]
async fn test_mutations_require_superuser() {
    let backend = FakeBackend::start().await;

    let reader = client(&backend, Some(READER_TOKEN));
    let err = assert_err!(reader.delete_book("978-0").await);
    assert!(matches!(err, AppError::Forbidden(_)));

    let anonymous = client(&backend, None);
    let err = assert_err!(anonymous.create_book(&new_book("222", "Emma")).await);
    assert!(matches!(err, AppError::Unauthorized(_)));
    assert!(backend.has_book("978-0"));
}

#[tokio::test]
async fn test_delete_missing_book() {
    let backend = FakeBackend::start().await;
    let client = client(&backend, Some(ADMIN_TOKEN));

    let deleted = assert_ok!(client.delete_book("978-0").await);
    assert_eq!(deleted.title, "Dune");

    let err = assert_err!(client.delete_book("978-0").await);
    assert!(matches!(err, AppError::NotFound(_)));
    assert_eq!(err.user_message(), "Book not found");
}

#[tokio::test]
async fn test_read_user_me() {
    let backend = FakeBackend::start().await;

    let admin = assert_ok!(client(&backend, Some(ADMIN_TOKEN)).read_user_me().await);
    assert!(admin.can_manage_catalog());

    let reader = assert_ok!(client(&backend, Some(READER_TOKEN)).read_user_me().await);
    assert!(!reader.can_manage_catalog());

    let err = assert_err!(client(&backend, Some("bogus")).read_user_me().await);
    assert!(err.is_auth());
}

#[tokio::test]
async fn test_unreachable_server_uses_fallback_message() {
    let client = HttpCatalogClient::new(&ApiConfig {
        base_url: "http://127.0.0.1:9".to_string(),
        token: None,
        timeout_secs: 2,
    })
    .unwrap();

    let err = assert_err!(client.search_books(&SearchParams::first_page("", 100)).await);
    assert!(matches!(err, AppError::Network(_)));
    assert_eq!(err.user_message(), "Something went wrong.");
}
