//! ## Crate layout
//! - `core`: values, entity traits, query refinement, record stores, the
//!   one-to-one relation resolver, and observability.
//!
//! The `prelude` module carries the vocabulary needed to declare an entity
//! and resolve a relation against a store.

pub use stream_query_core as core;

/// re-exports
///
/// entity declarations can use these without listing every dependency in
/// their own Cargo.toml
pub mod __reexports {
    pub use derive_more;
    pub use serde;
}

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//
// Errors
//

pub use core::error::{ErrorClass, InternalError, ResolveError as Error};

///
/// Prelude
/// using _ brings traits into scope and avoids name conflicts
///

pub mod prelude {
    pub use crate::core::{
        db::{
            query::{QueryCustomizer as _, Refinement},
            relation::{KeySet, OneToOne, ResolveOptions, ResultMap, resolve, resolve_one},
            store::{MemoryStore, RecordStore},
        },
        func,
        model::field::Field,
        traits::{Entity, FieldValue as _, FieldValues, Path},
        value::Value,
    };
    pub use serde::{Deserialize, Serialize};
}
