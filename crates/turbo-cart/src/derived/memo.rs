//! Single-entry memo cell.

/// Caches the value computed for the most recent key.
///
/// Recomputes only when asked for a key different from the cached one.
#[derive(Debug, Clone)]
pub struct Memo<K, V> {
    entry: Option<(K, V)>,
    recomputations: u64,
}

impl<K: PartialEq, V: Clone> Memo<K, V> {
    /// Create an empty memo.
    pub fn new() -> Self {
        Self {
            entry: None,
            recomputations: 0,
        }
    }

    /// Return the cached value for `key`, or compute and cache it.
    pub fn get_or_compute(&mut self, key: K, compute: impl FnOnce() -> V) -> V {
        if let Some((cached, value)) = &self.entry {
            if *cached == key {
                return value.clone();
            }
        }

        let value = compute();
        self.recomputations += 1;
        self.entry = Some((key, value.clone()));
        value
    }

    /// How many times the value has been computed.
    pub fn recomputations(&self) -> u64 {
        self.recomputations
    }
}

impl<K: PartialEq, V: Clone> Default for Memo<K, V> {
    fn default() -> Self {
        Self::new()
    }
}
