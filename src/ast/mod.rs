pub mod params;
pub mod relation;
pub mod schema;
pub mod token;

pub use params::QueryParams;
pub use relation::{ManyToManyKey, ManyToManyRelation, OneToManyKey, OneToManyRelation};
pub use schema::{is_text_type, ColumnDescriptor, ForeignKeyRef, TableSchema};
pub use token::SearchToken;
