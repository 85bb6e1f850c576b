//! Achievement tracking
//!
//! Achievements are re-evaluated every time a snapshot is taken. Each one
//! unlocks at most once per match: the unlocked set is the only guard, no
//! counter is compared against itself.

use std::collections::BTreeSet;
use std::time::Duration;

use tracing::debug;

use crate::types::{Achievement, MAX_LEVEL, SPEED_DEMON_LIMIT_SECS};

/// Four-line clears needed for `tetris_master`
pub const TETRIS_MASTER_CLEARS: u32 = 5;

/// Max combo needed for `combo_king`
pub const COMBO_KING_COMBO: u32 = 5;

/// Perfect clears needed for `perfectionist`
pub const PERFECTIONIST_CLEARS: u32 = 1;

/// Lines needed for `century`
pub const CENTURY_LINES: u32 = 100;

/// Sprint progress as seen by the achievement check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SprintProgress {
    pub target_lines: u32,
    /// None until the first piece has been placed
    pub elapsed: Option<Duration>,
}

/// Counters the thresholds are checked against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AchievementInputs {
    pub lines_cleared: u32,
    pub level: u32,
    pub max_combo: u32,
    pub perfect_clears: u32,
    /// Only set in sprint mode
    pub sprint: Option<SprintProgress>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AchievementTracker {
    tetris_clears: u32,
    unlocked: BTreeSet<Achievement>,
}

impl AchievementTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of a lock; only four-line clears are counted.
    pub fn record_clear(&mut self, lines: u32) {
        if lines == 4 {
            self.tetris_clears += 1;
        }
    }

    pub fn tetris_clears(&self) -> u32 {
        self.tetris_clears
    }

    pub fn is_unlocked(&self, achievement: Achievement) -> bool {
        self.unlocked.contains(&achievement)
    }

    /// Return achievements that newly qualify and mark them unlocked.
    pub fn evaluate(&mut self, inputs: &AchievementInputs) -> Vec<Achievement> {
        let mut fresh = Vec::new();
        for achievement in Achievement::ALL {
            if self.unlocked.contains(&achievement) {
                continue;
            }
            if self.qualifies(achievement, inputs) {
                debug!(achievement = achievement.id(), "achievement unlocked");
                self.unlocked.insert(achievement);
                fresh.push(achievement);
            }
        }
        fresh
    }

    fn qualifies(&self, achievement: Achievement, inputs: &AchievementInputs) -> bool {
        match achievement {
            Achievement::FirstLine => inputs.lines_cleared >= 1,
            Achievement::TetrisMaster => self.tetris_clears >= TETRIS_MASTER_CLEARS,
            Achievement::ComboKing => inputs.max_combo >= COMBO_KING_COMBO,
            Achievement::Perfectionist => inputs.perfect_clears >= PERFECTIONIST_CLEARS,
            Achievement::Century => inputs.lines_cleared >= CENTURY_LINES,
            Achievement::Survivor => inputs.level >= MAX_LEVEL,
            Achievement::SpeedDemon => match inputs.sprint {
                Some(SprintProgress {
                    target_lines,
                    elapsed: Some(elapsed),
                }) => {
                    inputs.lines_cleared >= target_lines
                        && elapsed < Duration::from_secs(SPEED_DEMON_LIMIT_SECS)
                }
                _ => false,
            },
        }
    }
}
