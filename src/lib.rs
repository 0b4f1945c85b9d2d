pub mod commands;
pub mod config;
pub mod error;
pub mod models;
pub mod services;

pub use commands::*;
pub use error::{Result, VvpError};
pub use models::*;
pub use services::*;
