use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::models::Book;

/// Ordered collection of books, unique by id, in insertion order.
#[derive(Debug, Default)]
pub struct Books {
    books: Vec<Book>,
}

impl Books {
    pub fn append(&mut self, book: Book) {
        self.books.push(book);
    }

    /// All books in insertion order.
    pub fn list(&self) -> &[Book] {
        &self.books
    }

    /// Position of the first book with `id`, by linear scan.
    pub fn find_index_by_id(&self, id: &str) -> Option<usize> {
        self.books.iter().position(|book| book.id == id)
    }

    pub fn get(&self, index: usize) -> Option<&Book> {
        self.books.get(index)
    }

    /// Swap in `book` at `index`, returning the previous record.
    pub fn replace_at(&mut self, index: usize, book: Book) -> Option<Book> {
        self.books
            .get_mut(index)
            .map(|slot| std::mem::replace(slot, book))
    }

    /// Remove the book at `index`; the remaining order is preserved.
    pub fn remove_at(&mut self, index: usize) -> Option<Book> {
        (index < self.books.len()).then(|| self.books.remove(index))
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }
}

/// Process-wide book store.
///
/// Writers hold one guard across lookup and mutation so a found index is
/// still valid when it is used.
#[derive(Debug, Default)]
pub struct BookStore {
    inner: RwLock<Books>,
}

impl BookStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn read(&self) -> RwLockReadGuard<'_, Books> {
        self.inner.read().await
    }

    pub async fn write(&self) -> RwLockWriteGuard<'_, Books> {
        self.inner.write().await
    }
}
