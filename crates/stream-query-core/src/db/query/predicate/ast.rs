use crate::value::Value;
use std::{
    fmt,
    ops::{BitAnd, BitOr, Not},
};

///
/// Predicate AST
///
/// Pure, schema-agnostic representation of fetch filters.
/// Structural checks live in `validate`; runtime evaluation lives in `eval`.
/// Stores that push filters down to a query language translate this tree.
///

///
/// CompareOp
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Lte,
    Gt,
    Gte,
    In,
    NotIn,
}

impl CompareOp {
    /// Operators whose operand must be a `Value::List`.
    #[must_use]
    pub const fn takes_list(self) -> bool {
        matches!(self, Self::In | Self::NotIn)
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Eq => "=",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Lte => "<=",
            Self::Gt => ">",
            Self::Gte => ">=",
            Self::In => "in",
            Self::NotIn => "not in",
        };
        write!(f, "{label}")
    }
}

///
/// ComparePredicate
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ComparePredicate {
    pub field: String,
    pub op: CompareOp,
    pub value: Value,
}

impl ComparePredicate {
    #[must_use]
    pub fn new(field: impl Into<String>, op: CompareOp, value: Value) -> Self {
        Self {
            field: field.into(),
            op,
            value,
        }
    }
}

///
/// Predicate
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Predicate {
    True,
    False,
    And(Vec<Self>),
    Or(Vec<Self>),
    Not(Box<Self>),
    Compare(ComparePredicate),
    IsNull { field: String },
    IsNotNull { field: String },
    TextContains { field: String, value: String },
}

impl Predicate {
    #[must_use]
    pub const fn and(preds: Vec<Self>) -> Self {
        Self::And(preds)
    }

    #[must_use]
    pub const fn or(preds: Vec<Self>) -> Self {
        Self::Or(preds)
    }

    #[must_use]
    pub fn compare(field: impl Into<String>, op: CompareOp, value: Value) -> Self {
        Self::Compare(ComparePredicate::new(field, op, value))
    }

    /// AND `other` onto `self`, flattening nested conjunctions.
    #[must_use]
    pub fn and_also(self, other: Self) -> Self {
        match (self, other) {
            (Self::True, other) | (other, Self::True) => other,
            (Self::And(mut left), Self::And(right)) => {
                left.extend(right);
                Self::And(left)
            }
            (Self::And(mut left), other) => {
                left.push(other);
                Self::And(left)
            }
            (this, Self::And(mut right)) => {
                right.insert(0, this);
                Self::And(right)
            }
            (this, other) => Self::And(vec![this, other]),
        }
    }

    /// Visit every field name referenced by this predicate.
    pub fn visit_fields<'a>(&'a self, f: &mut impl FnMut(&'a str)) {
        match self {
            Self::True | Self::False => {}
            Self::And(children) | Self::Or(children) => {
                for child in children {
                    child.visit_fields(f);
                }
            }
            Self::Not(inner) => inner.visit_fields(f),
            Self::Compare(cmp) => f(&cmp.field),
            Self::IsNull { field }
            | Self::IsNotNull { field }
            | Self::TextContains { field, .. } => f(field),
        }
    }
}

impl BitAnd for Predicate {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        self.and_also(rhs)
    }
}

impl BitOr for Predicate {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self::Or(vec![self, rhs])
    }
}

impl Not for Predicate {
    type Output = Self;

    fn not(self) -> Self::Output {
        Self::Not(Box::new(self))
    }
}
