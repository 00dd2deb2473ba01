//! Minimal in-memory catalog API with the same routes and error bodies as
//! the real backend

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

pub const ADMIN_TOKEN: &str = "admin-token";
pub const READER_TOKEN: &str = "reader-token";

#[derive(Debug, Clone)]
pub struct StoredBook {
    pub isbn: String,
    pub title: String,
    pub author: Option<String>,
    pub checked_out: bool,
}

#[derive(Default)]
pub struct Store {
    pub books: Vec<StoredBook>,
    pub search_calls: usize,
}

type Shared = Arc<Mutex<Store>>;

pub struct FakeBackend {
    pub base_url: String,
    pub store: Shared,
}

impl FakeBackend {
    /// Start a server on an ephemeral port seeded with a few books
    pub async fn start() -> Self {
        let store: Shared = Arc::new(Mutex::new(Store {
            books: vec![
                book("978-0", "Dune", Some("Frank Herbert"), false),
                book("978-1", "Emma", Some("Jane Austen"), true),
                book("978-2", "Beowulf", None, false),
            ],
            search_calls: 0,
        }));

        let app = Router::new()
            .route("/api/v1/books/search", get(search_books))
            .route("/api/v1/books/", post(create_book))
            .route("/api/v1/books/:isbn", delete(delete_book))
            .route("/api/v1/users/me", get(read_user_me))
            .with_state(store.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            store,
        }
    }

    pub fn search_calls(&self) -> usize {
        self.store.lock().unwrap().search_calls
    }

    pub fn has_book(&self, isbn: &str) -> bool {
        self.store.lock().unwrap().books.iter().any(|b| b.isbn == isbn)
    }
}

fn book(isbn: &str, title: &str, author: Option<&str>, checked_out: bool) -> StoredBook {
    StoredBook {
        isbn: isbn.to_string(),
        title: title.to_string(),
        author: author.map(str::to_string),
        checked_out,
    }
}

fn detail(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "detail": message }))).into_response()
}

struct Caller {
    is_superuser: bool,
}

fn authenticate(headers: &HeaderMap) -> Result<Caller, Response> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));
    match token {
        None => Err(detail(StatusCode::UNAUTHORIZED, "Not authenticated")),
        Some(ADMIN_TOKEN) => Ok(Caller { is_superuser: true }),
        Some(READER_TOKEN) => Ok(Caller {
            is_superuser: false,
        }),
        Some(_) => Err(detail(StatusCode::FORBIDDEN, "Could not validate credentials")),
    }
}

fn require_superuser(headers: &HeaderMap) -> Result<(), Response> {
    let caller = authenticate(headers)?;
    if !caller.is_superuser {
        return Err(detail(
            StatusCode::FORBIDDEN,
            "The user doesn't have enough privileges",
        ));
    }
    Ok(())
}

#[derive(Deserialize)]
struct SearchQuery {
    query: Option<String>,
    skip: Option<usize>,
    limit: Option<usize>,
}

async fn search_books(State(store): State<Shared>, Query(q): Query<SearchQuery>) -> Response {
    let limit = q.limit.unwrap_or(100);
    if limit > 100 {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "detail": [{
                "loc": ["query", "limit"],
                "msg": "Input should be less than or equal to 100",
                "type": "less_than_equal"
            }]})),
        )
            .into_response();
    }

    let mut store = store.lock().unwrap();
    store.search_calls += 1;

    let needle = q.query.unwrap_or_default().to_lowercase();
    let mut matches: Vec<&StoredBook> = store
        .books
        .iter()
        .filter(|b| {
            needle.is_empty()
                || b.isbn.to_lowercase().contains(&needle)
                || b.title.to_lowercase().contains(&needle)
                || b
                    .author
                    .as_deref()
                    .is_some_and(|a| a.to_lowercase().contains(&needle))
        })
        .collect();
    matches.sort_by(|a, b| a.title.cmp(&b.title));

    let count = matches.len();
    let data: Vec<Value> = matches
        .into_iter()
        .skip(q.skip.unwrap_or(0))
        .take(limit)
        .map(|b| {
            json!({
                "isbn": b.isbn,
                "title": b.title,
                "authors": b.author,
                "available": if b.checked_out { "OUT" } else { "IN" },
            })
        })
        .collect();

    Json(json!({ "data": data, "count": count })).into_response()
}

#[derive(Deserialize)]
struct CreateQuery {
    isbn: String,
    title: String,
    author_name: String,
}

async fn create_book(
    State(store): State<Shared>,
    headers: HeaderMap,
    Query(q): Query<CreateQuery>,
) -> Response {
    if let Err(response) = require_superuser(&headers) {
        return response;
    }
    let mut store = store.lock().unwrap();
    if store.books.iter().any(|b| b.isbn == q.isbn) {
        return detail(StatusCode::BAD_REQUEST, "Book with this ISBN already exists");
    }
    store
        .books
        .push(book(&q.isbn, &q.title, Some(&q.author_name), false));
    (
        StatusCode::CREATED,
        Json(json!({ "isbn": q.isbn, "title": q.title })),
    )
        .into_response()
}

async fn delete_book(
    State(store): State<Shared>,
    headers: HeaderMap,
    Path(isbn): Path<String>,
) -> Response {
    if let Err(response) = require_superuser(&headers) {
        return response;
    }
    let mut store = store.lock().unwrap();
    match store.books.iter().position(|b| b.isbn == isbn) {
        Some(index) => {
            let removed = store.books.remove(index);
            Json(json!({ "isbn": removed.isbn, "title": removed.title })).into_response()
        }
        None => detail(StatusCode::NOT_FOUND, "Book not found"),
    }
}

async fn read_user_me(headers: HeaderMap) -> Response {
    match authenticate(&headers) {
        Ok(caller) => {
            let (id, email) = if caller.is_superuser {
                ("a1", "admin@example.com")
            } else {
                ("r1", "reader@example.com")
            };
            Json(json!({
                "id": id,
                "email": email,
                "full_name": null,
                "is_active": true,
                "is_superuser": caller.is_superuser,
            }))
            .into_response()
        }
        Err(response) => response,
    }
}
