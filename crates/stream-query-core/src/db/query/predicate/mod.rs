mod ast;
mod eval;
mod validate;


pub use ast::{CompareOp, ComparePredicate, Predicate};
pub use eval::{eval, eval_compare_values};
pub use validate::validate;
pub(crate) use validate::validate_field_name;
