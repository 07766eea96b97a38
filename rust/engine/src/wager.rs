//! The Davi ladder: named wager rungs, each worth a fixed number of match points.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Name and match-point value of every rung, indexed by level.
/// Level 0 is the unraised stake.
const LADDER: [(&str, u32); 6] = [
    ("None", 1),
    ("Davi", 2),
    ("Se", 3),
    ("Chari", 4),
    ("Panji", 5),
    ("Shashi", 6),
];

/// Position on the wager ladder. Only ever moves up, one rung per accepted proposal.
#[derive(
    Debug, Copy, Clone, Default, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize,
)]
pub struct WagerLevel(u8);

impl WagerLevel {
    pub const NONE: WagerLevel = WagerLevel(0);
    pub const MAX: WagerLevel = WagerLevel((LADDER.len() - 1) as u8);

    pub fn new(level: u8) -> Option<Self> {
        (usize::from(level) < LADDER.len()).then_some(WagerLevel(level))
    }

    pub fn level(self) -> u8 {
        self.0
    }

    pub fn name(self) -> &'static str {
        LADDER[usize::from(self.0)].0
    }

    /// Match points a round is worth at this level.
    pub fn points(self) -> u32 {
        LADDER[usize::from(self.0)].1
    }

    /// The next rung, or `None` at the top of the ladder.
    pub fn next(self) -> Option<Self> {
        Self::new(self.0 + 1)
    }

    pub fn is_max(self) -> bool {
        self == Self::MAX
    }
}

impl fmt::Display for WagerLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} pts)", self.name(), self.points())
    }
}
