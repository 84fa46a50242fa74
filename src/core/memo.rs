// Single-entry memoization keyed by a version token

/// Keeps the last computed value and recomputes only when the key changes.
#[derive(Debug, Clone)]
pub struct Memo<K, V> {
    entry: Option<(K, V)>,
    computations: u64,
}

impl<K: PartialEq, V> Memo<K, V> {
    pub fn new() -> Self {
        Self {
            entry: None,
            computations: 0,
        }
    }

    pub fn get_or_compute(&mut self, key: K, compute: impl FnOnce() -> V) -> &V {
        if !matches!(&self.entry, Some((cached, _)) if *cached == key) {
            self.entry = None;
            self.computations += 1;
        }
        &self.entry.get_or_insert_with(|| (key, compute())).1
    }

    /// Number of times a value was (re)computed.
    pub fn computations(&self) -> u64 {
        self.computations
    }
}

impl<K: PartialEq, V> Default for Memo<K, V> {
    fn default() -> Self {
        Self::new()
    }
}
