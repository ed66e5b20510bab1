//! HTTP inbound adapter.

pub mod auth;
pub mod error;
pub mod health;
pub mod registration;
pub mod state;

pub use error::ApiResult;
