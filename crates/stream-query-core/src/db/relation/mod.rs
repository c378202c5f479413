//! One-to-one relation resolution: turn a batch of keys into a key -> value
//! map with a single store fetch.

mod keys;
mod map;
mod one_to_one;
mod options;
mod resolve;

#[cfg(test)]
mod tests;

// re-exports
pub use keys::KeySet;
pub use map::ResultMap;
pub use one_to_one::OneToOne;
pub use options::ResolveOptions;
pub use resolve::{resolve, resolve_for, resolve_one};
