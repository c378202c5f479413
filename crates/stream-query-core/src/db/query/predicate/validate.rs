use crate::db::query::{
    QueryError,
    predicate::{CompareOp, ComparePredicate, Predicate},
};

/// Structural validation of a predicate tree.
///
/// Checks only what can be decided without a schema: non-empty field
/// names and list-shaped operands for membership operators. Field
/// existence is the store's concern.
pub fn validate(predicate: &Predicate) -> Result<(), QueryError> {
    match predicate {
        Predicate::True | Predicate::False => Ok(()),
        Predicate::And(children) | Predicate::Or(children) => {
            children.iter().try_for_each(validate)
        }
        Predicate::Not(inner) => validate(inner),
        Predicate::Compare(cmp) => validate_compare(cmp),
        Predicate::IsNull { field }
        | Predicate::IsNotNull { field }
        | Predicate::TextContains { field, .. } => validate_field_name(field),
    }
}

fn validate_compare(cmp: &ComparePredicate) -> Result<(), QueryError> {
    validate_field_name(&cmp.field)?;

    if !cmp.op.takes_list() {
        return Ok(());
    }

    match cmp.value.as_list() {
        None => Err(QueryError::ListOperandRequired {
            field: cmp.field.clone(),
            op: cmp.op,
            value: cmp.value.clone(),
        }),
        Some([]) if cmp.op == CompareOp::In => {
            Err(QueryError::EmptyInList {
                field: cmp.field.clone(),
            })
        }
        Some(_) => Ok(()),
    }
}

pub(crate) fn validate_field_name(field: &str) -> Result<(), QueryError> {
    if field.trim().is_empty() {
        return Err(QueryError::EmptyFieldName);
    }

    Ok(())
}
