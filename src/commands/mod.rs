pub mod appreciations;
pub mod auth;
pub mod browse;
pub mod config;
pub mod delete;
pub mod desires;
pub mod moments;
pub mod month;
pub mod priorities;
pub mod schedule;
pub mod upcoming;
