use crate::{
    model::field::Field,
    traits::{Entity, FieldValues, Path},
    value::Value,
};

///
/// UserInfo
///
/// Shared test-only entity for core tests.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct UserInfo {
    pub id: u64,
    pub name: Option<String>,
    pub age: Option<u32>,
    pub email: Option<String>,
}

impl UserInfo {
    pub const ID: Field<Self, u64> = Field::new("id", |u: &Self| u.id);
    pub const NAME: Field<Self, Option<String>> = Field::new("name", |u: &Self| u.name.clone());
    pub const AGE: Field<Self, Option<u32>> = Field::new("age", |u: &Self| u.age);

    pub fn new(id: u64, name: &str, age: u32, email: &str) -> Self {
        Self {
            id,
            name: Some(name.to_string()),
            age: Some(age),
            email: Some(email.to_string()),
        }
    }
}

impl Path for UserInfo {
    const PATH: &'static str = "stream_query_core::test_support::UserInfo";
}

impl FieldValues for UserInfo {
    fn get_value(&self, field: &str) -> Option<Value> {
        match field {
            "id" => Some(Value::from(self.id)),
            "name" => Some(Value::from(self.name.clone())),
            "age" => Some(Value::from(self.age)),
            "email" => Some(Value::from(self.email.clone())),
            _ => None,
        }
    }
}

impl Entity for UserInfo {
    const FIELDS: &'static [&'static str] = &["id", "name", "age", "email"];

    fn clear_field(&mut self, field: &str) {
        match field {
            "id" => self.id = 0,
            "name" => self.name = None,
            "age" => self.age = None,
            "email" => self.email = None,
            _ => {}
        }
    }
}
