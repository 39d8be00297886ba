use std::sync::Arc;

use super::clock::{Clock, SystemClock};
use super::error::BookError;
use super::id::{IdGenerator, NanoIdGenerator};
use super::models::{Book, BookFilter, BookPayload, BookSummary};
use super::store::BookStore;

/// The five catalog operations over one owned [`BookStore`].
pub struct BookCatalog {
    store: BookStore,
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
}

impl BookCatalog {
    pub fn new(ids: Arc<dyn IdGenerator>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store: BookStore::new(),
            ids,
            clock,
        }
    }

    /// Validate and append a new book, returning its id.
    pub async fn create(&self, payload: BookPayload) -> Result<String, BookError> {
        let fields = payload.validate()?;

        let id = self.ids.generate();
        let book = Book::create(id.clone(), fields, self.clock.now());
        tracing::debug!(book_id = %id, finished = book.finished, "adding book");

        self.store.write().await.append(book);
        tracing::info!(book_id = %id, "book added");
        Ok(id)
    }

    /// Summaries of the books matching every present filter, in insertion order.
    pub async fn list(&self, filter: &BookFilter) -> Vec<BookSummary> {
        let books = self.store.read().await;
        let mut selected: Vec<&Book> = books.list().iter().collect();

        if let Some(needle) = &filter.name {
            selected.retain(|book| book.name.to_lowercase().contains(needle.as_str()));
        }
        if let Some(reading) = filter.reading {
            selected.retain(|book| book.reading == reading);
        }
        if let Some(finished) = filter.finished {
            selected.retain(|book| book.finished == finished);
        }

        selected.into_iter().map(Book::summary).collect()
    }

    pub async fn get(&self, id: &str) -> Result<Book, BookError> {
        let books = self.store.read().await;
        books
            .find_index_by_id(id)
            .and_then(|index| books.get(index))
            .cloned()
            .ok_or_else(|| BookError::NotFound(id.to_string()))
    }

    /// Replace every writable field of `id`.
    ///
    /// Existence is checked before the payload is validated.
    pub async fn update(&self, id: &str, payload: BookPayload) -> Result<(), BookError> {
        let mut books = self.store.write().await;

        let (index, current) = books
            .find_index_by_id(id)
            .and_then(|index| books.get(index).map(|book| (index, book)))
            .ok_or_else(|| BookError::NotFound(id.to_string()))?;

        let fields = payload.validate()?;
        let revised = current.revise(fields, self.clock.now());

        books
            .replace_at(index, revised)
            .ok_or_else(|| BookError::NotFound(id.to_string()))?;
        tracing::info!(book_id = %id, "book updated");
        Ok(())
    }

    pub async fn delete(&self, id: &str) -> Result<(), BookError> {
        let mut books = self.store.write().await;

        let removed = books
            .find_index_by_id(id)
            .and_then(|index| books.remove_at(index))
            .ok_or_else(|| BookError::NotFound(id.to_string()))?;

        tracing::info!(book_id = %removed.id, "book deleted");
        Ok(())
    }

    pub async fn contains(&self, id: &str) -> bool {
        self.store.read().await.find_index_by_id(id).is_some()
    }

    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.store.read().await.is_empty()
    }
}

impl Default for BookCatalog {
    fn default() -> Self {
        Self::new(Arc::new(NanoIdGenerator), Arc::new(SystemClock))
    }
}
