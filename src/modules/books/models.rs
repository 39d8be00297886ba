use serde::{Deserialize, Deserializer, Serialize};
use time::OffsetDateTime;

use super::error::BookError;

/// A catalog record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// Opaque identifier assigned at creation
    pub id: String,
    pub name: String,
    pub year: Option<i32>,
    pub author: Option<String>,
    pub summary: Option<String>,
    pub publisher: Option<String>,
    pub page_count: u32,
    pub read_page: u32,
    pub reading: bool,
    /// Derived: `read_page == page_count` at the last write
    pub finished: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub inserted_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Book {
    /// Build a new record; both timestamps start at `now`.
    pub fn create(id: String, fields: BookFields, now: OffsetDateTime) -> Self {
        let finished = fields.is_finished();
        Self {
            id,
            name: fields.name,
            year: fields.year,
            author: fields.author,
            summary: fields.summary,
            publisher: fields.publisher,
            page_count: fields.page_count,
            read_page: fields.read_page,
            reading: fields.reading,
            finished,
            inserted_at: now,
            updated_at: now,
        }
    }

    /// Replacement record for this book, keeping `id` and `inserted_at`.
    pub fn revise(&self, fields: BookFields, now: OffsetDateTime) -> Self {
        Self {
            inserted_at: self.inserted_at,
            ..Self::create(self.id.clone(), fields, now)
        }
    }

    pub fn summary(&self) -> BookSummary {
        BookSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            publisher: self.publisher.clone(),
        }
    }
}

/// Projection returned by the list view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookSummary {
    pub id: String,
    pub name: String,
    pub publisher: Option<String>,
}

/// Request body for create and update.
///
/// `name` is optional here so that its absence surfaces as a business
/// validation failure rather than a parse failure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookPayload {
    pub name: Option<String>,
    pub year: Option<i32>,
    pub author: Option<String>,
    pub summary: Option<String>,
    pub publisher: Option<String>,
    pub page_count: u32,
    pub read_page: u32,
    #[serde(default, deserialize_with = "null_as_false")]
    pub reading: bool,
}

/// `null` reads the same as an absent flag.
fn null_as_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}

impl BookPayload {
    /// Apply the business rules, in order: name first, then page counts.
    pub fn validate(self) -> Result<BookFields, BookError> {
        let name = match self.name {
            Some(name) if !name.is_empty() => name,
            _ => return Err(BookError::MissingName),
        };

        if self.read_page > self.page_count {
            return Err(BookError::ReadPageExceedsPageCount {
                read_page: self.read_page,
                page_count: self.page_count,
            });
        }

        Ok(BookFields {
            name,
            year: self.year,
            author: self.author,
            summary: self.summary,
            publisher: self.publisher,
            page_count: self.page_count,
            read_page: self.read_page,
            reading: self.reading,
        })
    }
}

/// Validated, writable fields of a book.
#[derive(Debug, Clone, PartialEq)]
pub struct BookFields {
    pub name: String,
    pub year: Option<i32>,
    pub author: Option<String>,
    pub summary: Option<String>,
    pub publisher: Option<String>,
    pub page_count: u32,
    pub read_page: u32,
    pub reading: bool,
}

impl BookFields {
    pub fn is_finished(&self) -> bool {
        self.read_page == self.page_count
    }
}

/// Raw query string of the list endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    pub name: Option<String>,
    pub reading: Option<String>,
    pub finished: Option<String>,
}

/// Normalized list filters; `None` means "no constraint".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookFilter {
    /// Lowercased substring to look for in `name`
    pub name: Option<String>,
    pub reading: Option<bool>,
    pub finished: Option<bool>,
}

impl BookFilter {
    pub fn name_contains(mut self, needle: &str) -> Self {
        self.name = Some(needle.to_lowercase());
        self
    }

    pub fn reading(mut self, reading: bool) -> Self {
        self.reading = Some(reading);
        self
    }

    pub fn finished(mut self, finished: bool) -> Self {
        self.finished = Some(finished);
        self
    }
}

impl From<ListQuery> for BookFilter {
    fn from(query: ListQuery) -> Self {
        // Empty values count as absent; "1" is the only truthy flag.
        fn present(value: Option<String>) -> Option<String> {
            value.filter(|v| !v.is_empty())
        }

        Self {
            name: present(query.name).map(|n| n.to_lowercase()),
            reading: present(query.reading).map(|v| v == "1"),
            finished: present(query.finished).map(|v| v == "1"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(name: Option<&str>, page_count: u32, read_page: u32) -> BookPayload {
        BookPayload {
            name: name.map(str::to_string),
            page_count,
            read_page,
            ..BookPayload::default()
        }
    }

    #[test]
    fn missing_or_empty_name_is_rejected() {
        assert_eq!(
            payload(None, 10, 1).validate().unwrap_err(),
            BookError::MissingName
        );
        assert_eq!(
            payload(Some(""), 10, 1).validate().unwrap_err(),
            BookError::MissingName
        );
    }

    #[test]
    fn name_is_checked_before_page_counts() {
        assert_eq!(
            payload(None, 10, 20).validate().unwrap_err(),
            BookError::MissingName
        );
    }

    #[test]
    fn read_page_over_page_count_is_rejected() {
        assert_eq!(
            payload(Some("B"), 50, 100).validate().unwrap_err(),
            BookError::ReadPageExceedsPageCount {
                read_page: 100,
                page_count: 50
            }
        );
    }

    #[test]
    fn finished_follows_page_counts() {
        assert!(payload(Some("A"), 100, 100).validate().unwrap().is_finished());
        assert!(!payload(Some("A"), 100, 99).validate().unwrap().is_finished());
    }

    #[test]
    fn payload_requires_page_counts() {
        let err = serde_json::from_str::<BookPayload>(r#"{"name":"A","readPage":1}"#).unwrap_err();
        assert!(err.to_string().contains("pageCount"));

        let negative = serde_json::from_str::<BookPayload>(
            r#"{"name":"A","pageCount":-1,"readPage":0}"#,
        );
        assert!(negative.is_err());
    }

    #[test]
    fn payload_reads_camel_case_fields() {
        let parsed: BookPayload = serde_json::from_str(
            r#"{"name":"Dune","year":1965,"author":"Frank Herbert","publisher":"Chilton",
                "pageCount":412,"readPage":10,"reading":true}"#,
        )
        .unwrap();
        assert_eq!(parsed.year, Some(1965));
        assert_eq!(parsed.page_count, 412);
        assert_eq!(parsed.read_page, 10);
        assert!(parsed.reading);
        assert!(parsed.summary.is_none());
    }

    #[test]
    fn null_reading_defaults_to_false() {
        let parsed: BookPayload =
            serde_json::from_str(r#"{"name":"A","pageCount":3,"readPage":1,"reading":null}"#)
                .unwrap();
        assert!(!parsed.reading);

        let absent: BookPayload =
            serde_json::from_str(r#"{"name":"A","pageCount":3,"readPage":1}"#).unwrap();
        assert!(!absent.reading);
    }

    #[test]
    fn query_flags_normalize_to_tri_state() {
        let filter = BookFilter::from(ListQuery {
            name: Some("HaRRy".to_string()),
            reading: Some("1".to_string()),
            finished: Some("0".to_string()),
        });
        assert_eq!(
            filter,
            BookFilter::default()
                .name_contains("harry")
                .reading(true)
                .finished(false)
        );

        let other = BookFilter::from(ListQuery {
            name: Some(String::new()),
            reading: Some("yes".to_string()),
            finished: Some(String::new()),
        });
        assert_eq!(other, BookFilter::default().reading(false));
    }

    #[test]
    fn revise_keeps_identity_and_insertion_time() {
        let inserted = OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap();
        let later = OffsetDateTime::from_unix_timestamp(1_700_000_600).unwrap();
        let book = Book::create(
            "abc".to_string(),
            payload(Some("A"), 10, 2).validate().unwrap(),
            inserted,
        );

        let revised = book.revise(payload(Some("A2"), 10, 10).validate().unwrap(), later);
        assert_eq!(revised.id, "abc");
        assert_eq!(revised.name, "A2");
        assert_eq!(revised.inserted_at, inserted);
        assert_eq!(revised.updated_at, later);
        assert!(revised.finished);
    }

    #[test]
    fn book_serializes_with_wire_names() {
        let now = OffsetDateTime::from_unix_timestamp(0).unwrap();
        let book = Book::create(
            "id-1".to_string(),
            payload(Some("A"), 5, 5).validate().unwrap(),
            now,
        );
        let value = serde_json::to_value(&book).unwrap();
        assert_eq!(value["pageCount"], 5);
        assert_eq!(value["readPage"], 5);
        assert_eq!(value["finished"], true);
        assert_eq!(value["insertedAt"], "1970-01-01T00:00:00Z");
        assert_eq!(value["updatedAt"], "1970-01-01T00:00:00Z");
        assert!(value["publisher"].is_null());
    }
}
