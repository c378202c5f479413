use crate::{db::query::QueryCustomizer, func};

type Projector<'a, R, V> = Box<dyn Fn(R) -> V + 'a>;

///
/// ResolveOptions
///
/// Named, defaultable knobs for one resolve call.
///
/// - `customizer`: optional refinement hook, none by default.
/// - `projector`: record -> value, identity by default.
/// - `max_keys`: optional upper bound on distinct keys, unlimited by default.
///

pub struct ResolveOptions<'a, R, V = R> {
    customizer: Option<Box<dyn QueryCustomizer + 'a>>,
    projector: Projector<'a, R, V>,
    max_keys: Option<usize>,
}

impl<'a, R: 'a> ResolveOptions<'a, R> {
    /// Identity projection, no customizer, no key limit.
    #[must_use]
    pub fn new() -> Self {
        Self {
            customizer: None,
            projector: Box::new(func::identity()),
            max_keys: None,
        }
    }
}

impl<'a, R: 'a> Default for ResolveOptions<'a, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, R, V> ResolveOptions<'a, R, V> {
    /// Replace the projector, changing the output value type.
    #[must_use]
    pub fn project<W>(self, projector: impl Fn(R) -> W + 'a) -> ResolveOptions<'a, R, W> {
        ResolveOptions {
            customizer: self.customizer,
            projector: Box::new(projector),
            max_keys: self.max_keys,
        }
    }

    /// Attach a query customizer.
    #[must_use]
    pub fn customize(mut self, customizer: impl QueryCustomizer + 'a) -> Self {
        self.customizer = Some(Box::new(customizer));
        self
    }

    /// Reject calls with more than `limit` distinct keys.
    #[must_use]
    pub fn max_keys(mut self, limit: usize) -> Self {
        self.max_keys = Some(limit);
        self
    }

    pub(crate) fn customizer(&self) -> Option<&(dyn QueryCustomizer + 'a)> {
        self.customizer.as_deref()
    }

    pub(crate) const fn key_limit(&self) -> Option<usize> {
        self.max_keys
    }

    pub(crate) fn apply(&self, record: R) -> V {
        (self.projector)(record)
    }
}
