//! Google Drive integration: share URL parsing and folder access

pub mod gateway;
pub mod reference;

pub use gateway::{DriveGateway, FileDescriptor, StorageGateway};
pub use reference::{extract_reference, parse_reference, share_link, DriveReference};
