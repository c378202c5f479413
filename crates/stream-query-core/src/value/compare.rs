use crate::value::Value;
use std::cmp::Ordering;

/// Strict comparator for orderable values of the same family.
///
/// Returns `None` for mismatched or non-orderable variants.
#[must_use]
pub fn strict_order_cmp(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
        (Value::Uint(a), Value::Uint(b)) => Some(a.cmp(b)),
        (Value::Int(a), Value::Uint(b)) => Some(cmp_int_uint(*a, *b)),
        (Value::Uint(a), Value::Int(b)) => Some(cmp_int_uint(*b, *a).reverse()),
        (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

/// Equality across the numeric family; structural equality otherwise.
#[must_use]
pub fn value_eq(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Int(_), Value::Uint(_)) | (Value::Uint(_), Value::Int(_)) => {
            strict_order_cmp(left, right) == Some(Ordering::Equal)
        }
        (Value::List(a), Value::List(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| value_eq(x, y))
        }
        _ => left == right,
    }
}

fn cmp_int_uint(int: i64, uint: u64) -> Ordering {
    u64::try_from(int).map_or(Ordering::Less, |int| int.cmp(&uint))
}
