use rand::Rng;

/// Length of generated book identifiers.
pub const ID_LENGTH: usize = 16;

/// URL-safe alphabet, 64 symbols.
const ALPHABET: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789_-";

/// Source of book identifiers.
pub trait IdGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Random 16-character ids. Collisions are negligible, so there is no retry.
#[derive(Debug, Clone, Copy, Default)]
pub struct NanoIdGenerator;

impl IdGenerator for NanoIdGenerator {
    fn generate(&self) -> String {
        let mut rng = rand::thread_rng();
        (0..ID_LENGTH)
            .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
            .collect()
    }
}

#[cfg(test)]
pub(crate) use sequential::SequentialIds;

#[cfg(test)]
mod sequential {
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Deterministic ids: `book-1`, `book-2`, ...
    #[derive(Debug, Default)]
    pub(crate) struct SequentialIds {
        next: AtomicUsize,
    }

    impl super::IdGenerator for SequentialIds {
        fn generate(&self) -> String {
            let n = self.next.fetch_add(1, Ordering::Relaxed) + 1;
            format!("book-{n}")
        }
    }
}
