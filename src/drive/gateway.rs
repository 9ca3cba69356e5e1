//! Read-only access to files in a Google Drive folder

use crate::auth::AccessToken;
use crate::config::DriveConfig;
use crate::drive::reference::DriveReference;
use crate::error::{RankerError, Result};
use async_trait::async_trait;
use log::debug;
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One candidate document in a folder listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDescriptor {
    pub id: String,
    pub name: String,
    #[serde(rename = "mimeType", default)]
    pub mime_type: String,
}

#[derive(Debug, Deserialize)]
struct FileListResponse {
    #[serde(default)]
    files: Vec<FileDescriptor>,
    #[serde(rename = "nextPageToken")]
    next_page_token: Option<String>,
}

#[async_trait]
pub trait StorageGateway: Send + Sync {
    /// Non-trashed files directly inside the folder
    async fn list_files(&self, folder: &DriveReference) -> Result<Vec<FileDescriptor>>;

    async fn download_file(&self, file_id: &str) -> Result<Vec<u8>>;
}

pub struct DriveGateway {
    http_client: Client,
    base_url: String,
    token: AccessToken,
    mime_filter: Vec<String>,
    timeout: Duration,
}

impl DriveGateway {
    pub fn new(
        http_client: Client,
        base_url: impl Into<String>,
        token: AccessToken,
        mime_filter: Vec<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
            mime_filter,
            timeout,
        }
    }

    pub fn from_config(config: &DriveConfig, token: AccessToken) -> Result<Self> {
        let timeout = config.request_timeout();
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RankerError::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self::new(
            http_client,
            config.api_base_url.clone(),
            token,
            config.mime_filter.clone(),
            timeout,
        ))
    }

    fn files_url(&self) -> String {
        format!("{}/drive/v3/files", self.base_url)
    }

    async fn fetch_page(&self, query: &str, page_token: Option<&str>) -> Result<FileListResponse> {
        let mut params = vec![
            ("q", query),
            ("fields", "nextPageToken, files(id, name, mimeType)"),
        ];
        if let Some(token) = page_token {
            params.push(("pageToken", token));
        }

        let response = self
            .http_client
            .get(self.files_url())
            .bearer_auth(self.token.secret())
            .query(&params)
            .timeout(self.timeout)
            .send()
            .await?;

        let response = check_status(response, "listing folder").await?;
        response
            .json::<FileListResponse>()
            .await
            .map_err(|e| RankerError::Gateway(format!("Invalid listing response: {}", e)))
    }
}

/// Drive search query for the children of `folder`
pub fn build_list_query(folder: &DriveReference, mime_filter: &[String]) -> String {
    let mut query = format!("'{}' in parents and trashed = false", folder);
    match mime_filter {
        [] => {}
        [single] => query.push_str(&format!(" and mimeType = '{}'", single)),
        many => {
            let clauses: Vec<String> = many
                .iter()
                .map(|mime| format!("mimeType = '{}'", mime))
                .collect();
            query.push_str(&format!(" and ({})", clauses.join(" or ")));
        }
    }
    query
}

async fn check_status(response: Response, action: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let detail = match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            format!("authentication failed while {} (HTTP {})", action, status.as_u16())
        }
        StatusCode::NOT_FOUND => format!("not found while {} (HTTP 404)", action),
        _ => format!("HTTP {} while {}", status.as_u16(), action),
    };

    if body.trim().is_empty() {
        Err(RankerError::Gateway(detail))
    } else {
        Err(RankerError::Gateway(format!("{}: {}", detail, body.trim())))
    }
}

#[async_trait]
impl StorageGateway for DriveGateway {
    async fn list_files(&self, folder: &DriveReference) -> Result<Vec<FileDescriptor>> {
        let query = build_list_query(folder, &self.mime_filter);
        debug!("Listing Drive folder with query: {}", query);

        let mut files = Vec::new();
        let mut page_token: Option<String> = None;
        loop {
            let page = self.fetch_page(&query, page_token.as_deref()).await?;
            files.extend(page.files);
            match page.next_page_token {
                Some(next) if !next.is_empty() => page_token = Some(next),
                _ => break,
            }
        }

        debug!("Folder {} contains {} matching files", folder, files.len());
        Ok(files)
    }

    async fn download_file(&self, file_id: &str) -> Result<Vec<u8>> {
        let url = format!("{}/{}", self.files_url(), file_id);
        let response = self
            .http_client
            .get(url)
            .bearer_auth(self.token.secret())
            .query(&[("alt", "media")])
            .timeout(self.timeout)
            .send()
            .await?;

        let mut response = check_status(response, "downloading file").await?;

        let mut buffer = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            buffer.extend_from_slice(&chunk);
        }

        debug!("Downloaded {} bytes for file {}", buffer.len(), file_id);
        Ok(buffer)
    }
}
