//! Record store boundary.

mod memory;


use crate::{db::query::FetchRequest, error::InternalError};

// re-exports
pub use memory::MemoryStore;

///
/// RecordStore
///
/// Batch read capability the resolver depends on.
///
/// CONTRACT:
/// - `fetch` is called at most once per resolve call and never with an
///   empty key list.
/// - Records come back in store-defined order; the resolver folds them in
///   that order.
/// - Failures are reported as `InternalError` and reach the caller as-is.
///   Retry and timeout policy belong to the store.
///

pub trait RecordStore {
    type Record;

    /// Entity name used for metrics and in the fetch request.
    fn entity_path(&self) -> &'static str {
        std::any::type_name::<Self::Record>()
    }

    fn fetch(&self, request: &FetchRequest) -> Result<Vec<Self::Record>, InternalError>;
}

impl<S: RecordStore + ?Sized> RecordStore for &S {
    type Record = S::Record;

    fn entity_path(&self) -> &'static str {
        (**self).entity_path()
    }

    fn fetch(&self, request: &FetchRequest) -> Result<Vec<Self::Record>, InternalError> {
        (**self).fetch(request)
    }
}
