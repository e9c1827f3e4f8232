// -------------------------------------------------------------------
// Versioned
// -------------------------------------------------------------------

/// Value paired with a change counter. Every mutable access bumps the
/// counter, which drives cache invalidation and the unsaved-changes
/// marker.
#[derive(Clone, Debug)]
pub struct Versioned<T> {
    version: u64,
    clean_at: u64,
    data: T,
}

impl<T> Versioned<T> {
    pub fn new(data: T) -> Self {
        Self {
            version: 0,
            clean_at: 0,
            data,
        }
    }

    pub fn get(&self) -> &T {
        &self.data
    }

    pub fn get_mut(&mut self) -> &mut T {
        self.version = self.version.wrapping_add(1);
        &mut self.data
    }

    pub fn set(&mut self, data: T) {
        self.data = data;
        self.version = self.version.wrapping_add(1);
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Record the current version as persisted.
    pub fn mark_clean(&mut self) {
        self.clean_at = self.version;
    }

    pub fn is_dirty(&self) -> bool {
        self.version != self.clean_at
    }
}

// -------------------------------------------------------------------
// Memoized
// -------------------------------------------------------------------

/// Value derived from `S`, recomputed only when its key changes.
pub struct Memoized<S, K, V> {
    version: u64,
    cached: Option<(K, V)>,
    get_key: Box<dyn Fn(&S) -> K>,
    calc: Box<dyn Fn(&S) -> V>,
}

impl<S, K, V> Memoized<S, K, V>
where
    K: PartialEq,
{
    pub fn new(
        get_key: impl Fn(&S) -> K + 'static,
        calc: impl Fn(&S) -> V + 'static,
    ) -> Self {
        Self {
            version: 0,
            cached: None,
            get_key: Box::new(get_key),
            calc: Box::new(calc),
        }
    }

    /// Recompute only if the key changed; return a reference to the cached value.
    pub fn get<'a>(&'a mut self, source: &S) -> &'a V {
        let key = (self.get_key)(source);
        let fresh = matches!(&self.cached, Some((k, _)) if *k == key);
        if !fresh {
            self.cached = None;
            self.version = self.version.wrapping_add(1);
        }
        let calc = &self.calc;
        let (_, value) = self
            .cached
            .get_or_insert_with(|| (key, calc(source)));
        value
    }

    /// Number of recomputations so far.
    pub fn version(&self) -> u64 {
        self.version
    }
}
