//! Static game configuration.

use serde::{Deserialize, Serialize};

use crate::state::SectionId;

/// Tunable parameters fixed for the lifetime of a session.
///
/// The grid is `rows x cols` sections addressed row-major. All players share
/// the same starting section (the center of the grid by default).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub rows: u16,
    pub cols: u16,
    /// Number of players assigned the imposter role at initialization.
    pub imposter_count: u8,
    /// Number of collectible items scattered at initialization.
    pub item_count: u16,
    /// Seed for deterministic role assignment and item placement.
    pub game_seed: u64,
    pub start_section: SectionId,
}

impl GameConfig {
    pub fn section_count(&self) -> u16 {
        self.rows * self.cols
    }

    /// Row-major index of the grid's center section.
    pub fn center_section(rows: u16, cols: u16) -> SectionId {
        SectionId((rows / 2) * cols + cols / 2)
    }

    pub fn contains(&self, section: SectionId) -> bool {
        section.0 < self.section_count()
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        let (rows, cols) = (8, 8);
        Self {
            rows,
            cols,
            imposter_count: 2,
            item_count: 10,
            game_seed: 0,
            start_section: Self::center_section(rows, cols),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_start_is_grid_center() {
        let config = GameConfig::default();
        assert_eq!(config.start_section, SectionId(36));
        assert_eq!(config.section_count(), 64);
    }

    #[test]
    fn contains_rejects_out_of_range_sections() {
        let config = GameConfig::default();
        assert!(config.contains(SectionId(63)));
        assert!(!config.contains(SectionId(64)));
    }
}
