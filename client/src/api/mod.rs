//! Discovery API calls.

pub mod search;
pub mod session;
