use crate::{
    db::{query::FetchRequest, store::RecordStore},
    error::InternalError,
};
use std::cell::{Cell, RefCell};

///
/// ScriptedStore
///
/// Returns a fixed row list for every fetch, ignoring the request.
/// Records each request so tests can assert on what was dispatched.
///

pub struct ScriptedStore<R> {
    rows: Vec<R>,
    fetches: Cell<u32>,
    requests: RefCell<Vec<FetchRequest>>,
}

impl<R: Clone> ScriptedStore<R> {
    pub fn new(rows: Vec<R>) -> Self {
        Self {
            rows,
            fetches: Cell::new(0),
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn fetch_count(&self) -> u32 {
        self.fetches.get()
    }

    pub fn last_request(&self) -> Option<FetchRequest> {
        self.requests.borrow().last().cloned()
    }
}

impl<R: Clone> RecordStore for ScriptedStore<R> {
    type Record = R;

    fn entity_path(&self) -> &'static str {
        "scripted"
    }

    fn fetch(&self, request: &FetchRequest) -> Result<Vec<R>, InternalError> {
        self.fetches.set(self.fetches.get() + 1);
        self.requests.borrow_mut().push(request.clone());

        Ok(self.rows.clone())
    }
}

///
/// FailingStore
/// Fails every fetch with the configured error.
///

pub struct FailingStore<R> {
    error: InternalError,
    fetches: Cell<u32>,
    _marker: std::marker::PhantomData<R>,
}

impl<R> FailingStore<R> {
    pub const fn new(error: InternalError) -> Self {
        Self {
            error,
            fetches: Cell::new(0),
            _marker: std::marker::PhantomData,
        }
    }

    pub fn fetch_count(&self) -> u32 {
        self.fetches.get()
    }
}

impl<R> RecordStore for FailingStore<R> {
    type Record = R;

    fn entity_path(&self) -> &'static str {
        "failing"
    }

    fn fetch(&self, _request: &FetchRequest) -> Result<Vec<R>, InternalError> {
        self.fetches.set(self.fetches.get() + 1);

        Err(self.error.clone())
    }
}
