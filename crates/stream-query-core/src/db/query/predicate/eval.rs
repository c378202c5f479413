use crate::{
    db::query::predicate::{CompareOp, ComparePredicate, Predicate},
    traits::FieldValues,
    value::{Value, strict_order_cmp, value_eq},
};
use std::cmp::Ordering;

// Evaluate a field predicate only when the field is present.
fn on_present<R: FieldValues + ?Sized>(
    row: &R,
    field: &str,
    f: impl FnOnce(&Value) -> bool,
) -> bool {
    row.get_value(field).is_some_and(|value| f(&value))
}

///
/// Evaluate a predicate against a single row.
///
/// Pure runtime evaluation: no schema access and no validation.
/// Missing fields and unorderable comparisons evaluate to `false`.
///
#[must_use]
pub fn eval<R: FieldValues + ?Sized>(row: &R, predicate: &Predicate) -> bool {
    match predicate {
        Predicate::True => true,
        Predicate::False => false,

        Predicate::And(children) => children.iter().all(|child| eval(row, child)),
        Predicate::Or(children) => children.iter().any(|child| eval(row, child)),
        Predicate::Not(inner) => !eval(row, inner),

        Predicate::Compare(cmp) => eval_compare(row, cmp),

        Predicate::IsNull { field } => on_present(row, field, Value::is_null),
        Predicate::IsNotNull { field } => on_present(row, field, |value| !value.is_null()),
        Predicate::TextContains { field, value } => {
            on_present(row, field, |actual| actual.text_contains(value))
        }
    }
}

fn eval_compare<R: FieldValues + ?Sized>(row: &R, cmp: &ComparePredicate) -> bool {
    let ComparePredicate { field, op, value } = cmp;

    on_present(row, field, |actual| eval_compare_values(actual, *op, value))
}

/// Compare a field value against a predicate operand.
#[must_use]
pub fn eval_compare_values(actual: &Value, op: CompareOp, operand: &Value) -> bool {
    match op {
        CompareOp::Eq => value_eq(actual, operand),
        CompareOp::Ne => !actual.is_null() && !value_eq(actual, operand),
        CompareOp::Lt => ordered(actual, operand, Ordering::is_lt),
        CompareOp::Lte => ordered(actual, operand, Ordering::is_le),
        CompareOp::Gt => ordered(actual, operand, Ordering::is_gt),
        CompareOp::Gte => ordered(actual, operand, Ordering::is_ge),
        CompareOp::In => operand.as_list().is_some_and(|list| actual.in_list(list)),
        CompareOp::NotIn => operand
            .as_list()
            .is_some_and(|list| !actual.is_null() && !actual.in_list(list)),
    }
}

fn ordered(actual: &Value, operand: &Value, accept: fn(Ordering) -> bool) -> bool {
    strict_order_cmp(actual, operand).is_some_and(accept)
}
