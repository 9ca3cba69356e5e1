//! Access tokens for the Drive API
//!
//! The OAuth consent flow lives outside this crate; we only consume the
//! bearer token it produces.

use crate::config::{DriveConfig, DRIVE_TOKEN_ENV};
use crate::error::{RankerError, Result};
use std::fmt;

#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

pub trait TokenSource {
    fn access_token(&self) -> Result<AccessToken>;
}

/// Token obtained ahead of time and supplied through configuration
pub struct StaticTokenSource {
    token: Option<String>,
}

impl StaticTokenSource {
    pub fn from_config(config: &DriveConfig) -> Self {
        Self {
            token: config.access_token.clone(),
        }
    }
}

impl TokenSource for StaticTokenSource {
    fn access_token(&self) -> Result<AccessToken> {
        match self.token.as_deref().map(str::trim) {
            Some(token) if !token.is_empty() => Ok(AccessToken::new(token)),
            _ => Err(RankerError::Configuration(format!(
                "no Drive access token: set drive.access_token or {}",
                DRIVE_TOKEN_ENV
            ))),
        }
    }
}
