//! Scoring module - line clear, combo, perfect clear and drop rewards
//!
//! Every line-clear component is multiplied by the level in effect *before*
//! the clear is applied:
//! - base: `LINE_SCORES[min(lines, 4)] * level`
//! - combo: `COMBO_BASE * combo * level` (combo already includes this clear)
//! - perfect clear: `PERFECT_CLEAR_BASE * level` when the board ends up empty

use crate::types::{
    COMBO_BASE, HARD_DROP_POINTS_PER_CELL, LINES_PER_LEVEL, LINE_SCORES, MAX_LEVEL,
    PERFECT_CLEAR_BASE, START_LEVEL,
};

/// Score calculation result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreResult {
    pub line_clear_score: u32,
    pub combo_bonus: u32,
    pub perfect_clear_bonus: u32,
    pub total: u32,
}

/// Base points for clearing `lines` rows at `level`
pub fn calculate_line_score(lines: usize, level: u32) -> u32 {
    LINE_SCORES[lines.min(4)].saturating_mul(level)
}

/// Combo bonus for the running combo counter
pub fn calculate_combo_bonus(combo: u32, level: u32) -> u32 {
    COMBO_BASE.saturating_mul(combo).saturating_mul(level)
}

pub fn calculate_perfect_clear_bonus(perfect_clear: bool, level: u32) -> u32 {
    if perfect_clear {
        PERFECT_CLEAR_BASE.saturating_mul(level)
    } else {
        0
    }
}

/// Calculate the complete score for a clearing lock.
///
/// Returns all zeros when `lines == 0`.
pub fn calculate_score(lines: usize, level: u32, combo: u32, perfect_clear: bool) -> ScoreResult {
    if lines == 0 {
        return ScoreResult::default();
    }

    let line_clear_score = calculate_line_score(lines, level);
    let combo_bonus = calculate_combo_bonus(combo, level);
    let perfect_clear_bonus = calculate_perfect_clear_bonus(perfect_clear, level);

    ScoreResult {
        line_clear_score,
        combo_bonus,
        perfect_clear_bonus,
        total: line_clear_score
            .saturating_add(combo_bonus)
            .saturating_add(perfect_clear_bonus),
    }
}

/// Hard drop reward: two points per cell descended
pub fn calculate_drop_score(cells: u32) -> u32 {
    cells.saturating_mul(HARD_DROP_POINTS_PER_CELL)
}

/// Level for a cumulative line count: one level per ten lines, capped at 10
pub fn calculate_level(total_lines: u32) -> u32 {
    (START_LEVEL + total_lines / LINES_PER_LEVEL).min(MAX_LEVEL)
}
