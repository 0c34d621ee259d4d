//! Google Calendar provider for moments.
//!
//! Credentials and sessions are stored in:
//!   ~/.config/moments/providers/google/app_config.toml
//!   ~/.config/moments/providers/google/session/{account}.toml

pub mod app_config;
pub mod auth;
pub mod convert;
pub mod session;
pub mod source;

pub use auth::GoogleAuth;
pub use source::GoogleEventSource;
