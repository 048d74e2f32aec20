//! Shared documents and their identifiers

use std::fmt;
use std::str::FromStr;

use rand::distributions::Alphanumeric;
use rand::Rng;
use thiserror::Error;

use super::editing;

/// Content shown when the store has nothing for an identifier
pub const WELCOME_TEXT: &str = "Welcome to the text editor!\n\nStart typing here...";

/// Opaque key of a document in the store
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentId(String);

/// Rejected identifier input
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid document id: {0:?}")]
pub struct InvalidDocumentId(pub String);

impl DocumentId {
    /// Length of generated identifiers
    pub const GENERATED_LEN: usize = 8;
    /// Longest identifier accepted from user input
    pub const MAX_LEN: usize = 64;

    /// Generate a fresh random identifier
    pub fn generate() -> Self {
        let token: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(Self::GENERATED_LEN)
            .map(char::from)
            .collect();
        Self(token)
    }

    /// Parse a bare token or a share link ending in one
    pub fn parse(input: &str) -> Result<Self, InvalidDocumentId> {
        let trimmed = input.trim().trim_end_matches('/');
        let token = trimmed.rsplit('/').next().unwrap_or(trimmed);

        let valid = !token.is_empty()
            && token.len() <= Self::MAX_LEN
            && token
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

        if valid {
            Ok(Self(token.to_string()))
        } else {
            Err(InvalidDocumentId(input.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for DocumentId {
    type Err = InvalidDocumentId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A shared text document
#[derive(Debug, Clone)]
pub struct Document {
    /// Store key
    pub id: DocumentId,
    /// Raw text content
    pub content: String,
    /// Whether the store knows about this document
    pub exists: bool,
}

impl Document {
    /// Document that has not been stored yet
    pub fn placeholder(id: DocumentId) -> Self {
        Self {
            id,
            content: WELCOME_TEXT.to_string(),
            exists: false,
        }
    }

    /// Build from a store lookup result
    pub fn from_store(id: DocumentId, data: Option<String>) -> Self {
        match data {
            Some(data) => Self {
                id,
                content: if data.is_empty() {
                    WELCOME_TEXT.to_string()
                } else {
                    data
                },
                exists: true,
            },
            None => Self::placeholder(id),
        }
    }

    pub fn line_count(&self) -> usize {
        editing::line_count(&self.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_is_alphanumeric() {
        let id = DocumentId::generate();
        assert_eq!(id.as_str().len(), DocumentId::GENERATED_LEN);
        assert!(id.as_str().chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_generate_differs() {
        assert_ne!(DocumentId::generate(), DocumentId::generate());
    }

    #[test]
    fn test_parse_share_link() {
        let id = DocumentId::parse("https://share.example.com/aB3dE9xZ/").unwrap();
        assert_eq!(id.as_str(), "aB3dE9xZ");

        let id: DocumentId = "  k2Lm0pQr ".parse().unwrap();
        assert_eq!(id.to_string(), "k2Lm0pQr");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(DocumentId::parse("").is_err());
        assert!(DocumentId::parse("///").is_err());
        assert!(DocumentId::parse("has space").is_err());
        assert!(DocumentId::parse(&"a".repeat(65)).is_err());
    }

    #[test]
    fn test_from_store() {
        let id = DocumentId::parse("abcd1234").unwrap();

        let missing = Document::from_store(id.clone(), None);
        assert!(!missing.exists);
        assert_eq!(missing.content, WELCOME_TEXT);
        assert_eq!(missing.line_count(), 3);

        let empty = Document::from_store(id.clone(), Some(String::new()));
        assert!(empty.exists);
        assert_eq!(empty.content, WELCOME_TEXT);

        let stored = Document::from_store(id, Some("fn main() {}".into()));
        assert!(stored.exists);
        assert_eq!(stored.content, "fn main() {}");
    }
}
