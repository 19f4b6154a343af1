pub mod query;
pub mod search;

pub use query::parse_query_string;
pub use search::tokenize_search;
