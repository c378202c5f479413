//! Function-value helpers.
//!
//! Small factories for the unary and binary functions the resolver and its
//! callers pass around as plain values.

use std::cmp::Ordering;

/// Returns a function that always returns its input argument.
#[must_use]
pub fn identity<T>() -> impl Fn(T) -> T + Copy {
    |value| value
}

/// Returns an identity that converts its input through `Into`.
#[must_use]
pub fn casting_identity<T, R>() -> impl Fn(T) -> R + Copy
where
    T: Into<R>,
{
    |value: T| value.into()
}

/// Returns a binary operator yielding the lesser operand according to `cmp`.
/// Ties keep the left operand.
pub fn min_by<T, C>(cmp: C) -> impl Fn(T, T) -> T
where
    C: Fn(&T, &T) -> Ordering,
{
    move |left, right| {
        if cmp(&left, &right) == Ordering::Greater {
            right
        } else {
            left
        }
    }
}

/// Returns a binary operator yielding the greater operand according to `cmp`.
/// Ties keep the left operand.
pub fn max_by<T, C>(cmp: C) -> impl Fn(T, T) -> T
where
    C: Fn(&T, &T) -> Ordering,
{
    move |left, right| {
        if cmp(&left, &right) == Ordering::Less {
            right
        } else {
            left
        }
    }
}

/// Binary operator that keeps the earlier operand.
#[must_use]
pub fn just_before<T>() -> impl Fn(T, T) -> T + Copy {
    |before, _| before
}

/// Binary operator that keeps the later operand (last-wins).
#[must_use]
pub fn just_after<T>() -> impl Fn(T, T) -> T + Copy {
    |_, after| after
}

///
/// TESTS
///
