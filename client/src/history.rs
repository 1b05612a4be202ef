pub const HISTORY_LIMIT: usize = 20;

/// Bounded stack of encoded raster snapshots, oldest first. Local to the
/// client that recorded them; peers only ever see one as an `image`
/// payload when undo republishes it.
pub struct History {
    entries: Vec<String>,
}

impl History {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Appends a snapshot, evicting the oldest entries past the bound.
    pub fn record(&mut self, snapshot: String) {
        self.entries.push(snapshot);
        let overflow = self.entries.len().saturating_sub(HISTORY_LIMIT);
        if overflow > 0 {
            self.entries.drain(0..overflow);
        }
    }

    /// Drops the newest snapshot and returns a copy of the one beneath
    /// it. The last remaining entry is the floor: with fewer than two
    /// entries there is no earlier state to roll back to, so nothing
    /// changes.
    pub fn undo(&mut self) -> Option<String> {
        if self.entries.len() < 2 {
            return None;
        }
        self.entries.pop();
        self.entries.last().cloned()
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}
