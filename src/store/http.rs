//! HTTP client for the document store API

use std::time::Duration;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use super::{DocumentStore, StoreError};
use crate::core::document::DocumentId;

/// Document store reached over HTTP
#[derive(Debug, Clone)]
pub struct HttpStore {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SaveBody<'a> {
    text_id: &'a str,
    data: &'a str,
}

#[derive(Deserialize)]
struct FetchBody {
    document: Option<StoredDocument>,
}

#[derive(Deserialize)]
struct StoredDocument {
    #[serde(default)]
    data: Option<String>,
}

impl HttpStore {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// `GET` target for a single document
    pub fn document_url(&self, id: &DocumentId) -> String {
        format!("{}/api/documents/{}", self.base_url, id)
    }

    /// `POST` target for saves
    pub fn collection_url(&self) -> String {
        format!("{}/api/documents", self.base_url)
    }
}

/// Extract the document text from a `GET` response body
fn parse_fetch_body(body: &str) -> Result<Option<String>, StoreError> {
    let body: FetchBody = serde_json::from_str(body)?;
    Ok(body.document.map(|doc| doc.data.unwrap_or_default()))
}

fn save_body(id: &DocumentId, content: &str) -> Result<String, StoreError> {
    Ok(serde_json::to_string(&SaveBody {
        text_id: id.as_str(),
        data: content,
    })?)
}

impl DocumentStore for HttpStore {
    async fn fetch(&self, id: &DocumentId) -> Result<Option<String>, StoreError> {
        let url = self.document_url(id);
        tracing::debug!("GET {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(StoreError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        parse_fetch_body(&body)
    }

    async fn save(&self, id: &DocumentId, content: &str) -> Result<(), StoreError> {
        let url = self.collection_url();
        tracing::debug!("POST {} ({} bytes)", url, content.len());

        let response = self
            .client
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(save_body(id, content)?)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        tracing::debug!("Document {} saved: {}", id, body);
        Ok(())
    }
}
