//! Resume ranker library

pub mod auth;
pub mod cli;
pub mod config;
pub mod drive;
pub mod error;
pub mod export;
pub mod input;
pub mod output;
pub mod processing;
pub mod session;

pub use config::Config;
pub use error::{RankerError, Result};
pub use session::Session;
