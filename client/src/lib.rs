//! Discovery search client: API calls, stores and persisted state.

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod guards;
pub mod http_utils;
pub mod persistence;
pub mod stores;
