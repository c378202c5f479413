use std::fmt;

///
/// Field
///
/// Typed field descriptor: the name a store matches on, plus the accessor
/// that reads the same field from an in-memory record.
///
/// Descriptors are plain `fn` pointers so they can live in associated
/// constants (`UserInfo::ID`, `UserInfo::NAME`, ...).
///

pub struct Field<E, V> {
    name: &'static str,
    get: fn(&E) -> V,
}

impl<E, V> Field<E, V> {
    #[must_use]
    pub const fn new(name: &'static str, get: fn(&E) -> V) -> Self {
        Self { name, get }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Read this field from a record.
    pub fn get(&self, entity: &E) -> V {
        (self.get)(entity)
    }

    /// Turn the accessor into an owning projector for the resolver.
    pub fn projector(self) -> impl Fn(E) -> V + Copy {
        let get = self.get;
        move |entity| get(&entity)
    }
}

impl<E, V> Clone for Field<E, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E, V> Copy for Field<E, V> {}

impl<E, V> fmt::Debug for Field<E, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Field").field(&self.name).finish()
    }
}

///
/// FieldRef
/// Anything that names a field in a query refinement.
///

pub trait FieldRef {
    fn field_name(&self) -> &'static str;
}

impl FieldRef for &'static str {
    fn field_name(&self) -> &'static str {
        *self
    }
}

impl<E, V> FieldRef for Field<E, V> {
    fn field_name(&self) -> &'static str {
        self.name
    }
}

///
/// TESTS
///
