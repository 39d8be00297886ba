use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

use bookshelf_http::{error::AppError, response::ApiResponse};

use super::catalog::BookCatalog;
use super::error::BookError;
use super::models::{Book, BookFilter, BookPayload, BookSummary, ListQuery};

/// Routes for `/books` and `/books/{bookId}`.
pub fn router(catalog: Arc<BookCatalog>) -> Router {
    Router::new()
        .route("/books", post(create_book).get(list_books))
        .route(
            "/books/{book_id}",
            get(get_book).put(update_book).delete(delete_book),
        )
        .with_state(catalog)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BookCreated {
    book_id: String,
}

#[derive(Debug, Serialize)]
struct BookList {
    books: Vec<BookSummary>,
}

#[derive(Debug, Serialize)]
struct BookDetail {
    book: Book,
}

/// Write operation that failed; selects the verb of the failure message.
#[derive(Debug, Clone, Copy)]
enum WriteAction {
    Add,
    Update,
}

impl WriteAction {
    fn verb(self) -> &'static str {
        match self {
            WriteAction::Add => "menambahkan",
            WriteAction::Update => "memperbarui",
        }
    }

    fn fail(self, err: BookError) -> AppError {
        let reason = match err {
            BookError::NotFound(_) => {
                return AppError::not_found(format!(
                    "Gagal {} buku. Id tidak ditemukan",
                    self.verb()
                ))
            }
            BookError::MissingName => "Mohon isi nama buku",
            BookError::ReadPageExceedsPageCount { .. } => {
                "readPage tidak boleh lebih besar dari pageCount"
            }
        };
        AppError::validation(format!("Gagal {} buku. {}", self.verb(), reason))
    }

    fn malformed(self, rejection: JsonRejection) -> AppError {
        AppError::bad_request(format!(
            "Gagal {} buku. {}",
            self.verb(),
            rejection.body_text()
        ))
    }
}

/// Lookups by id can only miss; anything else is a server fault.
fn lookup_failed(err: BookError, message: &'static str) -> AppError {
    match err {
        BookError::NotFound(_) => AppError::not_found(message),
        other => AppError::Internal(other.into()),
    }
}

async fn create_book(
    State(catalog): State<Arc<BookCatalog>>,
    payload: Result<Json<BookPayload>, JsonRejection>,
) -> Result<(StatusCode, ApiResponse<BookCreated>), AppError> {
    let Json(payload) = payload.map_err(|rejection| WriteAction::Add.malformed(rejection))?;

    let book_id = catalog
        .create(payload)
        .await
        .map_err(|err| WriteAction::Add.fail(err))?;

    Ok((
        StatusCode::CREATED,
        ApiResponse::success(BookCreated { book_id }).with_message("Buku berhasil ditambahkan"),
    ))
}

async fn list_books(
    State(catalog): State<Arc<BookCatalog>>,
    Query(query): Query<ListQuery>,
) -> ApiResponse<BookList> {
    let filter = BookFilter::from(query);
    let books = catalog.list(&filter).await;
    tracing::debug!(matched = books.len(), ?filter, "listing books");
    ApiResponse::success(BookList { books })
}

async fn get_book(
    State(catalog): State<Arc<BookCatalog>>,
    Path(book_id): Path<String>,
) -> Result<ApiResponse<BookDetail>, AppError> {
    let book = catalog
        .get(&book_id)
        .await
        .map_err(|err| lookup_failed(err, "Buku tidak ditemukan"))?;

    Ok(ApiResponse::success(BookDetail { book }))
}

async fn update_book(
    State(catalog): State<Arc<BookCatalog>>,
    Path(book_id): Path<String>,
    payload: Result<Json<BookPayload>, JsonRejection>,
) -> Result<ApiResponse<()>, AppError> {
    let payload = match payload {
        Ok(Json(payload)) => payload,
        Err(rejection) => {
            // An unknown id outranks a malformed body.
            if !catalog.contains(&book_id).await {
                return Err(WriteAction::Update.fail(BookError::NotFound(book_id)));
            }
            return Err(WriteAction::Update.malformed(rejection));
        }
    };

    catalog
        .update(&book_id, payload)
        .await
        .map_err(|err| WriteAction::Update.fail(err))?;

    Ok(ApiResponse::ok("Buku berhasil diperbarui"))
}

async fn delete_book(
    State(catalog): State<Arc<BookCatalog>>,
    Path(book_id): Path<String>,
) -> Result<ApiResponse<()>, AppError> {
    catalog
        .delete(&book_id)
        .await
        .map_err(|err| lookup_failed(err, "Buku gagal dihapus. Id tidak ditemukan"))?;

    Ok(ApiResponse::ok("Buku berhasil dihapus"))
}
