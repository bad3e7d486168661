//! Search API calls and module exports.

mod search_for_results;
pub use search_for_results::search_for_results;

mod typeahead;
pub use typeahead::{TypeaheadScope, typeahead};

mod content_types;
pub use content_types::fetch_content_types;
