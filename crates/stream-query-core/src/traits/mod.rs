use crate::value::Value;

// ============================================================================
// ENTITY CONTRACTS
// ============================================================================

///
/// Path
/// Fully-qualified name used in metrics and error messages.
///

pub trait Path {
    const PATH: &'static str;
}

///
/// Entity
///
/// A record type a store can serve by field name.
///
/// `FIELDS` lists every addressable field; stores reject requests that
/// reference anything else. `clear_field` resets one field to its empty
/// state and is how field selection is applied to returned records.
///

pub trait Entity: Path + FieldValues + Sized {
    const FIELDS: &'static [&'static str];

    fn clear_field(&mut self, field: &str);

    #[must_use]
    fn has_field(field: &str) -> bool {
        Self::FIELDS.contains(&field)
    }
}

// ============================================================================
// FIELD VALUES
// ============================================================================

///
/// FieldValues
/// Dynamic read access to a record's fields.
/// Returns `None` when the record has no field by that name.
///

pub trait FieldValues {
    fn get_value(&self, field: &str) -> Option<Value>;
}

///
/// FieldValue
///
/// Conversion of a typed field value (or lookup key) into a `Value`.
///

pub trait FieldValue {
    fn to_value(&self) -> Value;
}

macro_rules! impl_field_value {
    ( $( $type:ty ),* $(,)? ) => {
        $(
            impl FieldValue for $type {
                fn to_value(&self) -> Value {
                    Value::from(*self)
                }
            }
        )*
    };
}

impl_field_value!(bool, i8, i16, i32, i64, u8, u16, u32, u64);

impl FieldValue for &str {
    fn to_value(&self) -> Value {
        Value::Text((*self).to_string())
    }
}

impl FieldValue for String {
    fn to_value(&self) -> Value {
        Value::Text(self.clone())
    }
}

impl FieldValue for Value {
    fn to_value(&self) -> Value {
        self.clone()
    }
}

impl<T: FieldValue> FieldValue for Option<T> {
    fn to_value(&self) -> Value {
        self.as_ref().map_or(Value::Null, FieldValue::to_value)
    }
}

impl<T: FieldValue> FieldValue for Vec<T> {
    fn to_value(&self) -> Value {
        Value::List(self.iter().map(FieldValue::to_value).collect())
    }
}
