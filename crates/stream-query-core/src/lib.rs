//! Core runtime for stream-query: values, entity traits, query refinement,
//! record stores, the one-to-one relation resolver, and observability.
#![warn(unreachable_pub)]

// public exports are one module level down
pub mod db;
pub mod error;
pub mod func;
pub mod model;
pub mod obs;
pub mod traits;
pub mod value;

// test
#[cfg(test)]
pub(crate) mod test_support;

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No errors, stores, or sinks are re-exported here.
///

pub mod prelude {
    pub use crate::{
        db::{
            query::{QueryCustomizer, Refinement},
            relation::{KeySet, OneToOne, ResolveOptions, ResultMap},
        },
        model::field::Field,
        traits::{Entity, FieldValue, FieldValues},
        value::Value,
    };
}
