//! Fetch requests and the refinement surface exposed to query customizers.

pub mod predicate;


use crate::{
    db::query::predicate::{CompareOp, Predicate, validate_field_name},
    model::field::FieldRef,
    traits::FieldValue,
    value::Value,
};
use thiserror::Error as ThisError;

///
/// QueryError
///
/// Structural problems in a fetch request detected before dispatch.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum QueryError {
    #[error("field name must not be empty")]
    EmptyFieldName,

    #[error("operator '{op}' on field '{field}' requires a list operand, found {value}")]
    ListOperandRequired {
        field: String,
        op: CompareOp,
        value: Value,
    },

    #[error("'in' list for field '{field}' must not be empty")]
    EmptyInList { field: String },

    #[error("field selection must not be empty")]
    EmptySelection,

    #[error("field selection must include key field '{field}'")]
    SelectionMissingKey { field: String },

    #[error("too many lookup keys: {count} distinct keys exceed the limit of {limit}")]
    TooManyKeys { count: usize, limit: usize },
}

///
/// QueryCustomizer
///
/// Optional hook that narrows or shapes a fetch.
/// The resolver hands it a fresh `Refinement` and forwards the result to
/// the store untouched; it never interprets the refinement itself.
///

pub trait QueryCustomizer {
    fn customize(&self, query: &mut Refinement);
}

impl<F> QueryCustomizer for F
where
    F: Fn(&mut Refinement),
{
    fn customize(&self, query: &mut Refinement) {
        self(query);
    }
}

///
/// Refinement
///
/// Extra filtering and field selection merged into one fetch.
/// All filters are AND-ed together.
///

#[derive(Clone, Debug, Default)]
pub struct Refinement {
    predicate: Option<Predicate>,
    selection: Option<Vec<&'static str>>,
}

impl Refinement {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            predicate: None,
            selection: None,
        }
    }

    // ------------------------------------------------------------------
    // Filters
    // ------------------------------------------------------------------

    /// AND an arbitrary predicate onto the refinement.
    pub fn filter(&mut self, predicate: Predicate) -> &mut Self {
        self.predicate = Some(match self.predicate.take() {
            Some(current) => current.and_also(predicate),
            None => predicate,
        });
        self
    }

    fn compare(&mut self, field: &impl FieldRef, op: CompareOp, value: Value) -> &mut Self {
        self.filter(Predicate::compare(field.field_name(), op, value))
    }

    pub fn eq(&mut self, field: impl FieldRef, value: impl FieldValue) -> &mut Self {
        self.compare(&field, CompareOp::Eq, value.to_value())
    }

    pub fn ne(&mut self, field: impl FieldRef, value: impl FieldValue) -> &mut Self {
        self.compare(&field, CompareOp::Ne, value.to_value())
    }

    pub fn lt(&mut self, field: impl FieldRef, value: impl FieldValue) -> &mut Self {
        self.compare(&field, CompareOp::Lt, value.to_value())
    }

    pub fn lte(&mut self, field: impl FieldRef, value: impl FieldValue) -> &mut Self {
        self.compare(&field, CompareOp::Lte, value.to_value())
    }

    pub fn gt(&mut self, field: impl FieldRef, value: impl FieldValue) -> &mut Self {
        self.compare(&field, CompareOp::Gt, value.to_value())
    }

    pub fn gte(&mut self, field: impl FieldRef, value: impl FieldValue) -> &mut Self {
        self.compare(&field, CompareOp::Gte, value.to_value())
    }

    pub fn in_<V, I>(&mut self, field: impl FieldRef, values: I) -> &mut Self
    where
        V: FieldValue,
        I: IntoIterator<Item = V>,
    {
        let list = values.into_iter().map(|v| v.to_value()).collect();
        self.compare(&field, CompareOp::In, Value::List(list))
    }

    pub fn not_in<V, I>(&mut self, field: impl FieldRef, values: I) -> &mut Self
    where
        V: FieldValue,
        I: IntoIterator<Item = V>,
    {
        let list = values.into_iter().map(|v| v.to_value()).collect();
        self.compare(&field, CompareOp::NotIn, Value::List(list))
    }

    pub fn is_null(&mut self, field: impl FieldRef) -> &mut Self {
        self.filter(Predicate::IsNull {
            field: field.field_name().to_string(),
        })
    }

    pub fn is_not_null(&mut self, field: impl FieldRef) -> &mut Self {
        self.filter(Predicate::IsNotNull {
            field: field.field_name().to_string(),
        })
    }

    pub fn text_contains(&mut self, field: impl FieldRef, needle: impl Into<String>) -> &mut Self {
        self.filter(Predicate::TextContains {
            field: field.field_name().to_string(),
            value: needle.into(),
        })
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    /// Add one field to the selection. Unselected fields come back empty.
    pub fn select(&mut self, field: impl FieldRef) -> &mut Self {
        let name = field.field_name();
        let selection = self.selection.get_or_insert_with(Vec::new);
        if !selection.contains(&name) {
            selection.push(name);
        }
        self
    }

    /// Replace the selection with an explicit list of field names.
    pub fn select_fields<I>(&mut self, fields: I) -> &mut Self
    where
        I: IntoIterator<Item = &'static str>,
    {
        let mut selection: Vec<&'static str> = Vec::new();
        for name in fields {
            if !selection.contains(&name) {
                selection.push(name);
            }
        }
        self.selection = Some(selection);
        self
    }

    // ------------------------------------------------------------------
    // Inspection
    // ------------------------------------------------------------------

    #[must_use]
    pub const fn predicate(&self) -> Option<&Predicate> {
        self.predicate.as_ref()
    }

    #[must_use]
    pub fn selection(&self) -> Option<&[&'static str]> {
        self.selection.as_deref()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.predicate.is_none() && self.selection.is_none()
    }

    /// Structural validation against the key field the fetch will match on.
    pub fn validate(&self, key_field: &str) -> Result<(), QueryError> {
        if let Some(predicate) = &self.predicate {
            predicate::validate(predicate)?;
        }

        if let Some(selection) = &self.selection {
            if selection.is_empty() {
                return Err(QueryError::EmptySelection);
            }
            for name in selection {
                validate_field_name(name)?;
            }
            if !selection.iter().any(|name| *name == key_field) {
                return Err(QueryError::SelectionMissingKey {
                    field: key_field.to_string(),
                });
            }
        }

        Ok(())
    }
}

///
/// FetchRequest
///
/// The single batch read the resolver issues: every record of `entity`
/// whose `key_field` equals one of `keys`, narrowed by `refinement`.
/// `keys` is never empty and holds no duplicates.
///

#[derive(Clone, Debug)]
pub struct FetchRequest {
    pub entity: &'static str,
    pub key_field: &'static str,
    pub keys: Vec<Value>,
    pub refinement: Refinement,
}

impl FetchRequest {
    #[must_use]
    pub const fn new(
        entity: &'static str,
        key_field: &'static str,
        keys: Vec<Value>,
        refinement: Refinement,
    ) -> Self {
        Self {
            entity,
            key_field,
            keys,
            refinement,
        }
    }

    /// Every field name the request references, key field first.
    #[must_use]
    pub fn referenced_fields(&self) -> Vec<&str> {
        let mut fields: Vec<&str> = vec![self.key_field];
        let mut push = |field| {
            if !fields.contains(&field) {
                fields.push(field);
            }
        };

        if let Some(predicate) = self.refinement.predicate() {
            predicate.visit_fields(&mut push);
        }
        if let Some(selection) = self.refinement.selection() {
            selection.iter().copied().for_each(push);
        }

        fields
    }
}
