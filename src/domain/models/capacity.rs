use serde::{Deserialize, Serialize};

/// Seat capacity of a venue or event.
///
/// `Uninitialized` only ever appears in mutation payloads and means
/// "inherit the venue's capacity"; it is never persisted. A persisted
/// capacity is either `Infinite` or a concrete count no smaller than the
/// current reservation count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capacity {
    Infinite,
    Uninitialized,
    Finite(u32),
}

impl Capacity {
    pub fn is_uninitialized(self) -> bool {
        matches!(self, Capacity::Uninitialized)
    }

    /// Database encoding: -1 = infinite, n >= 0 = finite.
    /// `Uninitialized` is never persisted; it is normalized away before any
    /// entity reaches a repository.
    pub fn to_db(self) -> i64 {
        match self {
            Capacity::Infinite | Capacity::Uninitialized => -1,
            Capacity::Finite(n) => n as i64,
        }
    }

    pub fn from_db(raw: i64) -> Self {
        if raw < 0 {
            Capacity::Infinite
        } else {
            Capacity::Finite(raw as u32)
        }
    }

    /// True when `count` more reservations still fit.
    pub fn admits(self, count: u32) -> bool {
        match self {
            Capacity::Infinite => true,
            Capacity::Uninitialized => false,
            Capacity::Finite(n) => count < n,
        }
    }
}
