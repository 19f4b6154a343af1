pub mod builder;
pub mod condition;

pub use builder::{ColumnLabel, CompiledQuery, QueryCompiler, VectorSearch};
pub use condition::{build_column_condition, build_condition, like_pattern, Condition};
