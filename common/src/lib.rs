//! Common library exports shared by the discovery client and its front ends.

extern crate serde;


pub mod query_string;
pub mod route_query;
pub mod filter;
pub mod search_query;
pub mod search_result;
pub mod search_results;
pub mod search_facets;
pub mod search_history;
pub mod text_highlight;
pub mod search_const;
