//! Bookshelf catalog service
//!
//! An in-memory book catalog exposed over HTTP, hosted as a module on the
//! bookshelf kernel.

pub mod modules;

use anyhow::Context;
use bookshelf_kernel::{settings::Settings, InitCtx, ModuleRegistry};

/// Re-export commonly used types
pub use modules::books::{BookCatalog, BooksModule};

/// Registry with every module of this application registered
pub fn build_registry() -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry);
    registry
}

/// Initialize and start all modules, serve HTTP until shutdown, then stop
/// the modules again.
pub async fn run(settings: Settings) -> anyhow::Result<()> {
    let registry = build_registry();
    let ctx = InitCtx {
        settings: &settings,
    };

    registry.init_modules(&ctx).await?;
    registry.start_modules(&ctx).await?;

    let served = bookshelf_http::start_server(&registry, &settings)
        .await
        .context("bookshelf server terminated with an error");

    registry.stop_modules().await?;
    served
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
    };
    use tower::ServiceExt;

    #[test]
    fn registry_contains_books_module() {
        let registry = build_registry();
        assert_eq!(registry.module_count(), 1);
        assert!(registry.get_module("books").is_some());
    }

    #[tokio::test]
    async fn full_router_serves_books_and_docs() {
        let registry = build_registry();
        let settings = Settings::default();

        let create = Request::builder()
            .method(Method::POST)
            .uri("/books")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"name":"A","pageCount":100,"readPage":100}"#))
            .unwrap();
        let response = bookshelf_http::build_router(&registry, &settings)
            .oneshot(create)
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert!(response.headers().contains_key("x-request-id"));

        let list = Request::builder()
            .uri("/books")
            .body(Body::empty())
            .unwrap();
        let response = bookshelf_http::build_router(&registry, &settings)
            .oneshot(list)
            .await
            .unwrap();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        // Routers built from one registry share the module's catalog.
        assert_eq!(body["data"]["books"][0]["name"], "A");

        let docs = Request::builder()
            .uri("/docs/openapi.json")
            .body(Body::empty())
            .unwrap();
        let response = bookshelf_http::build_router(&registry, &settings)
            .oneshot(docs)
            .await
            .unwrap();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let spec: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert!(spec["paths"].get("/books/{book_id}").is_some());
    }
}
