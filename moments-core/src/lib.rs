//! Core types for moments.
//!
//! This crate holds everything that doesn't talk to the network:
//! - calendar events, event windows, the month grid and day bucketing
//! - the conflict checker and the scheduling form
//! - the document store for desires, appreciations and scheduled moments
//! - weekly priorities and the wellbeing email
//! - the collaborator traits (`EventSource`, `AuthProvider`, `Notifier`)

pub mod bucket;
pub mod config;
pub mod conflict;
pub mod constants;
pub mod error;
pub mod event;
pub mod grid;
pub mod notify;
pub mod priorities;
pub mod records;
pub mod refresh;
pub mod scheduler;
pub mod source;
pub mod store;
pub mod view;
pub mod window;

pub use error::{MomentsError, MomentsResult};
pub use event::*;
