//! Query refinement, record stores, and relation resolution.

pub mod query;
pub mod relation;
pub mod store;

// re-exports
pub use query::{FetchRequest, QueryCustomizer, QueryError, Refinement};
pub use relation::{
    KeySet, OneToOne, ResolveOptions, ResultMap, resolve, resolve_for, resolve_one,
};
pub use store::{MemoryStore, RecordStore};
