//! Grid visibility oracle.
//!
//! A player perceives their own section plus the Moore neighborhood (up to 8
//! surrounding sections), clipped at the grid boundary with no wraparound.
//! The same window gates both perception and legal action targets.

use std::collections::BTreeSet;

use crate::state::SectionId;

/// Returns the visibility window for a player standing at `section`.
///
/// Always contains `section` itself; size ranges from 4 (corner) to 9
/// (interior) on grids of at least 2x2. Pure and deterministic.
pub fn visible_sections(section: SectionId, rows: u16, cols: u16) -> BTreeSet<SectionId> {
    let row = (section.0 / cols) as i32;
    let col = (section.0 % cols) as i32;

    let mut visible = BTreeSet::new();
    visible.insert(section);

    for dr in -1..=1i32 {
        for dc in -1..=1i32 {
            if dr == 0 && dc == 0 {
                continue;
            }
            let (nr, nc) = (row + dr, col + dc);
            if nr >= 0 && nr < rows as i32 && nc >= 0 && nc < cols as i32 {
                visible.insert(SectionId(nr as u16 * cols + nc as u16));
            }
        }
    }

    visible
}

/// Whether `target` lies inside the visibility window anchored at `from`.
pub fn is_visible(from: SectionId, target: SectionId, rows: u16, cols: u16) -> bool {
    visible_sections(from, rows, cols).contains(&target)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[u16]) -> BTreeSet<SectionId> {
        raw.iter().copied().map(SectionId).collect()
    }

    #[test]
    fn corner_window_clips_at_boundary() {
        let visible = visible_sections(SectionId(0), 8, 8);
        assert_eq!(visible, ids(&[0, 1, 8, 9]));
    }

    #[test]
    fn interior_window_has_nine_sections() {
        let visible = visible_sections(SectionId(27), 8, 8);
        assert_eq!(visible.len(), 9);
        assert_eq!(visible, ids(&[18, 19, 20, 26, 27, 28, 34, 35, 36]));
    }

    #[test]
    fn no_wraparound_on_row_edges() {
        // Section 7 sits on the right edge; section 8 starts the next row and
        // must not be visible from it.
        let visible = visible_sections(SectionId(7), 8, 8);
        assert!(!visible.contains(&SectionId(8)));
        assert_eq!(visible, ids(&[6, 7, 14, 15]));
    }

    #[test]
    fn every_window_contains_self_and_stays_in_bounds() {
        let (rows, cols) = (5, 7);
        for raw in 0..rows * cols {
            let section = SectionId(raw);
            let visible = visible_sections(section, rows, cols);
            assert!(visible.contains(&section));
            assert!((1..=9).contains(&visible.len()));
            assert!(visible.iter().all(|s| s.0 < rows * cols));
        }
    }

    #[test]
    fn single_cell_grid_sees_only_itself() {
        let visible = visible_sections(SectionId(0), 1, 1);
        assert_eq!(visible, ids(&[0]));
    }
}
