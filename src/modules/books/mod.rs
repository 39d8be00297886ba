pub mod catalog;
pub mod clock;
pub mod error;
pub mod id;
pub mod models;
pub mod routes;
pub mod store;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use bookshelf_kernel::{InitCtx, Module};

pub use catalog::BookCatalog;
pub use error::BookError;
pub use models::{Book, BookFilter, BookPayload, BookSummary};

/// Books module: the catalog and its HTTP surface
pub struct BooksModule {
    catalog: Arc<BookCatalog>,
}

impl BooksModule {
    pub fn new(catalog: Arc<BookCatalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &Arc<BookCatalog> {
        &self.catalog
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.catalog.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(openapi_fragment())
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        // The store is process-scoped; whatever is left is dropped with it.
        let books = self.catalog.len().await;
        tracing::info!(module = self.name(), books, "books module stopped");
        Ok(())
    }
}

/// Create a new instance of the books module with an empty catalog
pub fn create_module() -> Arc<dyn Module> {
    Arc::new(BooksModule::new(Arc::new(BookCatalog::default())))
}

fn openapi_fragment() -> serde_json::Value {
    let fail = |description: &str| {
        serde_json::json!({
            "description": description,
            "content": {
                "application/json": {
                    "schema": { "$ref": "#/components/schemas/FailResponse" }
                }
            }
        })
    };
    let book_id_param = serde_json::json!({
        "name": "book_id",
        "in": "path",
        "required": true,
        "schema": { "type": "string" }
    });
    let flag_param = |name: &str| {
        serde_json::json!({
            "name": name,
            "in": "query",
            "required": false,
            "description": "\"1\" selects true, any other value false",
            "schema": { "type": "string" }
        })
    };
    let payload_body = serde_json::json!({
        "required": true,
        "content": {
            "application/json": {
                "schema": { "$ref": "#/components/schemas/BookPayload" }
            }
        }
    });
    let success = |description: &str, data: serde_json::Value| {
        let mut properties = serde_json::json!({
            "status": { "type": "string", "enum": ["success"] },
            "message": { "type": "string" }
        });
        if !data.is_null() {
            properties["data"] = data;
        }
        serde_json::json!({
            "description": description,
            "content": {
                "application/json": {
                    "schema": { "type": "object", "properties": properties }
                }
            }
        })
    };

    serde_json::json!({
        "paths": {
            "/books": {
                "post": {
                    "summary": "Add a book",
                    "tags": ["Books"],
                    "requestBody": payload_body,
                    "responses": {
                        "201": success("Book added", serde_json::json!({
                            "type": "object",
                            "properties": { "bookId": { "type": "string" } }
                        })),
                        "400": fail("Missing name, readPage over pageCount, or malformed body")
                    }
                },
                "get": {
                    "summary": "List books",
                    "tags": ["Books"],
                    "parameters": [
                        {
                            "name": "name",
                            "in": "query",
                            "required": false,
                            "description": "Case-insensitive substring of the name",
                            "schema": { "type": "string" }
                        },
                        flag_param("reading"),
                        flag_param("finished")
                    ],
                    "responses": {
                        "200": success("Matching books", serde_json::json!({
                            "type": "object",
                            "properties": {
                                "books": {
                                    "type": "array",
                                    "items": { "$ref": "#/components/schemas/BookSummary" }
                                }
                            }
                        }))
                    }
                }
            },
            "/books/{book_id}": {
                "get": {
                    "summary": "Get a book",
                    "tags": ["Books"],
                    "parameters": [book_id_param.clone()],
                    "responses": {
                        "200": success("The book", serde_json::json!({
                            "type": "object",
                            "properties": { "book": { "$ref": "#/components/schemas/Book" } }
                        })),
                        "404": fail("Unknown id")
                    }
                },
                "put": {
                    "summary": "Replace a book",
                    "tags": ["Books"],
                    "parameters": [book_id_param.clone()],
                    "requestBody": payload_body,
                    "responses": {
                        "200": success("Book updated", serde_json::Value::Null),
                        "400": fail("Missing name, readPage over pageCount, or malformed body"),
                        "404": fail("Unknown id")
                    }
                },
                "delete": {
                    "summary": "Delete a book",
                    "tags": ["Books"],
                    "parameters": [book_id_param],
                    "responses": {
                        "200": success("Book deleted", serde_json::Value::Null),
                        "404": fail("Unknown id")
                    }
                }
            }
        },
        "components": {
            "schemas": {
                "Book": {
                    "type": "object",
                    "properties": {
                        "id": { "type": "string" },
                        "name": { "type": "string" },
                        "year": { "type": "integer" },
                        "author": { "type": "string" },
                        "summary": { "type": "string" },
                        "publisher": { "type": "string" },
                        "pageCount": { "type": "integer", "minimum": 0 },
                        "readPage": { "type": "integer", "minimum": 0 },
                        "reading": { "type": "boolean" },
                        "finished": { "type": "boolean" },
                        "insertedAt": { "type": "string", "format": "date-time" },
                        "updatedAt": { "type": "string", "format": "date-time" }
                    },
                    "required": [
                        "id", "name", "pageCount", "readPage", "reading",
                        "finished", "insertedAt", "updatedAt"
                    ]
                },
                "BookPayload": {
                    "type": "object",
                    "properties": {
                        "name": { "type": "string" },
                        "year": { "type": "integer" },
                        "author": { "type": "string" },
                        "summary": { "type": "string" },
                        "publisher": { "type": "string" },
                        "pageCount": { "type": "integer", "minimum": 0 },
                        "readPage": { "type": "integer", "minimum": 0 },
                        "reading": { "type": "boolean" }
                    },
                    "required": ["pageCount", "readPage"]
                },
                "BookSummary": {
                    "type": "object",
                    "properties": {
                        "id": { "type": "string" },
                        "name": { "type": "string" },
                        "publisher": { "type": "string" }
                    },
                    "required": ["id", "name"]
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookshelf_kernel::{settings::Settings, ModuleRegistry};

    #[tokio::test]
    async fn books_module_runs_full_lifecycle() {
        let mut registry = ModuleRegistry::new();
        registry.register(create_module());

        let settings = Settings::default();
        let ctx = InitCtx {
            settings: &settings,
        };

        assert!(registry.init_modules(&ctx).await.is_ok());
        assert!(registry.start_modules(&ctx).await.is_ok());
        assert!(registry.stop_modules().await.is_ok());
    }

    #[tokio::test]
    async fn books_module_stops_on_another_task() {
        let module = create_module();
        let stopped = tokio::spawn(async move { module.stop().await })
            .await
            .unwrap();
        assert!(stopped.is_ok());
    }

    #[test]
    fn openapi_fragment_documents_every_operation() {
        let spec = openapi_fragment();
        let books = &spec["paths"]["/books"];
        assert!(books.get("post").is_some());
        assert!(books.get("get").is_some());

        let by_id = &spec["paths"]["/books/{book_id}"];
        for method in ["get", "put", "delete"] {
            assert!(by_id.get(method).is_some(), "missing {method}");
        }
        assert!(spec["components"]["schemas"].get("Book").is_some());
    }
}
