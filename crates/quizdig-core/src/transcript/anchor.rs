use regex::Regex;
use std::sync::LazyLock;

static LEADING_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\.").expect("leading id pattern"));

/// Role of one transcript line under the anchor rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineRole {
    /// The line opens the block for this id.
    BlockStart(u32),
    Continuation,
}

/// Running "next expected id" for the anchor rule.
///
/// A line opens a new block only when its leading `<n>.` equals the
/// expected id; numbered sub-lists and stray numbers never match, so they
/// stay inside the current block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnchorCursor {
    next_id: u32,
}

impl Default for AnchorCursor {
    fn default() -> Self {
        Self::new()
    }
}

impl AnchorCursor {
    pub fn new() -> Self {
        AnchorCursor { next_id: 1 }
    }

    pub fn starting_at(next_id: u32) -> Self {
        AnchorCursor { next_id }
    }

    pub fn next_id(self) -> u32 {
        self.next_id
    }

    pub fn advance(self, line: &str) -> (AnchorCursor, LineRole) {
        match leading_id(line) {
            Some(id) if id == self.next_id => (
                AnchorCursor {
                    next_id: self.next_id + 1,
                },
                LineRole::BlockStart(id),
            ),
            _ => (self, LineRole::Continuation),
        }
    }
}

/// Integer before the first `.` at the very start of the line, if any.
pub fn leading_id(line: &str) -> Option<u32> {
    LEADING_ID.captures(line)?[1].parse().ok()
}
