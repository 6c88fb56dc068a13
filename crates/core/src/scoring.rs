//! Scoring module - line scores, levels and gravity speed
//!
//! Classic scoring: 1/2/3/4 lines are worth 100/300/500/800 points times the
//! level the clear happened on. Levels start at 1 and advance every
//! `lines_per_level` cleared lines with no upper bound.

use crate::types::{SpeedStep, LINE_SCORES};

/// Points for clearing `lines` rows at once on `level`.
///
/// Anything other than 1..=4 lines scores nothing.
pub fn line_score(lines: usize, level: u32) -> u32 {
    if lines == 0 || lines >= LINE_SCORES.len() {
        return 0;
    }
    LINE_SCORES[lines].saturating_mul(level)
}

/// Level reached after clearing `total_lines` lines.
pub fn level_for_lines(total_lines: u32, lines_per_level: u32) -> u32 {
    total_lines / lines_per_level.max(1) + 1
}

/// Gravity interval for `level`, in milliseconds.
///
/// Uses the entry for the level itself; a level past the table (or between
/// entries) uses the closest entry below it, so beyond the end of the table the
/// fastest interval applies. A level below the first entry uses the first.
pub fn drop_interval_ms(speed_table: &[SpeedStep], level: u32) -> u32 {
    speed_table
        .iter()
        .rev()
        .find(|step| step.level <= level)
        .or_else(|| speed_table.first())
        .map_or(0, |step| step.interval_ms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DEFAULT_SPEED_TABLE;

    #[test]
    fn test_line_scores_at_level_one() {
        assert_eq!(line_score(0, 1), 0);
        assert_eq!(line_score(1, 1), 100);
        assert_eq!(line_score(2, 1), 300);
        assert_eq!(line_score(3, 1), 500);
        assert_eq!(line_score(4, 1), 800);
        assert_eq!(line_score(5, 1), 0);
    }

    #[test]
    fn test_line_score_is_linear_in_level() {
        for lines in 1..=4 {
            for level in 1..=12 {
                assert_eq!(line_score(lines, level), line_score(lines, 1) * level);
            }
        }
        assert_eq!(line_score(0, 7), 0);
    }

    #[test]
    fn test_level_calculation() {
        assert_eq!(level_for_lines(0, 5), 1);
        assert_eq!(level_for_lines(4, 5), 1);
        assert_eq!(level_for_lines(5, 5), 2);
        assert_eq!(level_for_lines(49, 5), 10);
        assert_eq!(level_for_lines(10_000, 5), 2001);
    }

    #[test]
    fn test_drop_intervals() {
        assert_eq!(drop_interval_ms(&DEFAULT_SPEED_TABLE, 1), 800);
        assert_eq!(drop_interval_ms(&DEFAULT_SPEED_TABLE, 5), 430);
        assert_eq!(drop_interval_ms(&DEFAULT_SPEED_TABLE, 20), 70);
        assert_eq!(drop_interval_ms(&DEFAULT_SPEED_TABLE, 21), 70);
        assert_eq!(drop_interval_ms(&DEFAULT_SPEED_TABLE, 500), 70);
    }

    #[test]
    fn test_sparse_speed_table() {
        let table = [SpeedStep::new(2, 600), SpeedStep::new(5, 300)];
        assert_eq!(drop_interval_ms(&table, 1), 600);
        assert_eq!(drop_interval_ms(&table, 4), 600);
        assert_eq!(drop_interval_ms(&table, 5), 300);
        assert_eq!(drop_interval_ms(&table, 9), 300);
        assert_eq!(drop_interval_ms(&[], 3), 0);
    }
}
