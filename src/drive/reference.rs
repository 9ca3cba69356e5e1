//! Google Drive share URL parsing

use crate::error::{RankerError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

/// Tried in order; file-style patterns come before the folder pattern.
static REFERENCE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"/d/([a-zA-Z0-9_-]+)",
        r"id=([a-zA-Z0-9_-]+)",
        r"/folders/([a-zA-Z0-9_-]+)",
    ]
    .iter()
    .filter_map(|pattern| Regex::new(pattern).ok())
    .collect()
});

/// File or folder identifier taken from a share URL
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DriveReference(String);

impl DriveReference {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DriveReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Returns the first identifier matched by the share URL patterns.
pub fn extract_reference(url: &str) -> Option<DriveReference> {
    REFERENCE_PATTERNS.iter().find_map(|pattern| {
        pattern
            .captures(url)
            .and_then(|caps| caps.get(1))
            .map(|m| DriveReference(m.as_str().to_string()))
    })
}

/// Public viewer link for a Drive file
pub fn share_link(file_id: &str) -> String {
    format!("https://drive.google.com/file/d/{}/view?usp=sharing", file_id)
}

pub fn parse_reference(url: &str) -> Result<DriveReference> {
    let trimmed = url.trim();
    extract_reference(trimmed).ok_or_else(|| {
        RankerError::InvalidReference(format!(
            "could not find a file or folder id in '{}'",
            trimmed
        ))
    })
}
