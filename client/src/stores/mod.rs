//! Client-side stores. Each is constructed once by [`crate::app::App`] and
//! shared by reference.

pub mod search;
pub mod user;
