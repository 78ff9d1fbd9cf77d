//! Local, append-only log of moves made in this session.

use derive_getters::Getters;
use tracing::{debug, instrument};

use crate::chess::Square;

/// One logged move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Getters)]
pub struct MoveRecord {
    /// 1-based position in the log at the time of the append.
    index: usize,
    /// Origin square.
    from: Square,
    /// Destination square.
    to: Square,
}

impl std::fmt::Display for MoveRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}. {}-{}", self.index, self.from, self.to)
    }
}

/// Move history panel contents.
///
/// Entries are never edited or reordered. The log is only ever cleared as a
/// whole, after which numbering starts again at 1.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoveHistory {
    entries: Vec<MoveRecord>,
}

impl MoveHistory {
    /// Appends a move numbered `len + 1` and returns it.
    #[instrument(skip(self), fields(from = %from, to = %to))]
    pub fn append(&mut self, from: Square, to: Square) -> MoveRecord {
        let record = MoveRecord {
            index: self.entries.len() + 1,
            from,
            to,
        };
        debug!(entry = %record, "History entry appended");
        self.entries.push(record);
        record
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Entries, oldest first.
    pub fn entries(&self) -> &[MoveRecord] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the log is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Display lines, e.g. `1. e2-e4`.
    pub fn lines(&self) -> Vec<String> {
        self.entries.iter().map(ToString::to_string).collect()
    }
}
