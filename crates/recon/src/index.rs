use std::collections::HashMap;

use tracing::debug;
use trainbridge_table::Table;

/// Hash index from match key to row position, built once over the reference
/// table so each compare row resolves in constant time.
#[derive(Debug)]
pub struct KeyIndex {
    by_key: HashMap<String, usize>,
}

impl KeyIndex {
    /// Index `table` on `key_field`. Blank keys are skipped. A duplicated key
    /// keeps the later row, mirroring what a top-down scan would find last.
    pub fn build(table: &Table, key_field: &str) -> Self {
        let mut by_key = HashMap::with_capacity(table.len());
        for pos in 0..table.len() {
            let key = table.value(pos, key_field).unwrap_or("").trim();
            if key.is_empty() {
                continue;
            }
            if let Some(prev) = by_key.insert(key.to_string(), pos) {
                debug!(key, prev, row = pos, "duplicate reference key, later row wins");
            }
        }
        Self { by_key }
    }

    pub fn lookup(&self, key: &str) -> Option<usize> {
        self.by_key.get(key.trim()).copied()
    }

    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
