//! HTTP implementation of the catalog service

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::{
    config::ApiConfig,
    error::{AppError, AppResult},
    models::{BookPublic, BooksPage, CreateBook, SearchParams, User},
};

use super::CatalogService;

/// Catalog API client over HTTP with bearer authentication
#[derive(Clone)]
pub struct HttpCatalogClient {
    http: Client,
    base_url: Url,
    token: Option<String>,
}

impl HttpCatalogClient {
    /// Create a client from the API configuration
    pub fn new(config: &ApiConfig) -> AppResult<Self> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| AppError::Internal(format!("Invalid API base URL '{}': {}", config.base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(AppError::Internal(format!(
                "API base URL '{}' cannot carry a path",
                config.base_url
            )));
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("catalog-ui/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url,
            token: config.token.clone().filter(|t| !t.is_empty()),
        })
    }

    /// Build `<base>/api/v1/<segments...>`, percent-encoding each segment
    fn endpoint(&self, segments: &[&str]) -> AppResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| AppError::Internal("API base URL cannot carry a path".to_string()))?
            .pop_if_empty()
            .extend(["api", "v1"])
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.http.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> AppResult<T> {
        let response = builder.send().await?;
        let status = response.status();
        let url = response.url().clone();

        if status.is_success() {
            let body = response.bytes().await?;
            tracing::debug!("{} answered {} ({} bytes)", url.path(), status, body.len());
            return Ok(serde_json::from_slice(&body)?);
        }

        let body = response.text().await.unwrap_or_default();
        let error = AppError::from_response(status, &body);
        tracing::warn!("{} answered {}: {}", url.path(), status, error.user_message());
        Err(error)
    }
}

#[async_trait]
impl CatalogService for HttpCatalogClient {
    async fn search_books(&self, params: &SearchParams) -> AppResult<BooksPage> {
        tracing::debug!(
            "Searching books - query: {:?}, skip: {}, limit: {}",
            params.query,
            params.skip,
            params.limit
        );
        let url = self.endpoint(&["books", "search"])?;
        self.send(self.request(Method::GET, url).query(params)).await
    }

    async fn create_book(&self, book: &CreateBook) -> AppResult<BookPublic> {
        tracing::info!("Creating book {}", book.isbn);
        // Trailing empty segment keeps the collection path as `/books/`
        let url = self.endpoint(&["books", ""])?;
        let builder = self.request(Method::POST, url).query(&[
            ("isbn", book.isbn.as_str()),
            ("title", book.title.as_str()),
            ("author_name", book.author_name.as_str()),
        ]);
        self.send(builder).await
    }

    async fn delete_book(&self, isbn: &str) -> AppResult<BookPublic> {
        tracing::info!("Deleting book {}", isbn);
        let url = self.endpoint(&["books", isbn])?;
        self.send(self.request(Method::DELETE, url)).await
    }

    async fn read_user_me(&self) -> AppResult<User> {
        let url = self.endpoint(&["users", "me"])?;
        self.send(self.request(Method::GET, url)).await
    }
}
