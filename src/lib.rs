pub mod client;
pub mod config;
pub mod error;
pub mod export;
pub mod models;
pub mod quote;
pub mod reports;
pub mod resource;
pub mod search;
pub mod session;
pub mod stats;
pub mod ui;
pub mod validation;

pub use error::{AppError, Result};
