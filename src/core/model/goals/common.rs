// src/core/model/goals/common.rs

//! Shared objectives with a first-come scoring ladder.

use crate::core::model::bookshelf::Bookshelf;

use super::layout::Layout;

/// A shared goal: a layout plus its remaining scoring ladder. Ladder state is
/// owned by the session that drew the goal, never shared across sessions.
#[derive(Debug, Clone)]
pub struct CommonGoal {
    layout: Layout,
    scoring: Vec<u32>,
}

impl CommonGoal {
    /// `scoring` is the full ladder for the session's player count, highest
    /// award first.
    pub fn new(layout: Layout, scoring: Vec<u32>) -> Self {
        Self { layout, scoring }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// The award the next player to satisfy this goal would receive.
    pub fn top_score(&self) -> Option<u32> {
        self.scoring.first().copied()
    }

    /// Pops and returns the highest remaining award.
    pub fn claim(&mut self) -> Option<u32> {
        if self.scoring.is_empty() {
            None
        } else {
            Some(self.scoring.remove(0))
        }
    }

    pub fn check(&self, shelf: &Bookshelf) -> bool {
        self.layout.check(shelf)
    }
}

/// The twelve-card deck a session draws its shared goals from.
pub fn layout_deck() -> Vec<Layout> {
    vec![
        Layout::Group {
            occurrences: 6,
            size: 2,
        },
        Layout::Group {
            occurrences: 4,
            size: 4,
        },
        Layout::Corners {
            min_different: 1,
            max_different: 3,
        },
        Layout::Square {
            occurrences: 2,
            size: 2,
        },
        Layout::FullLine {
            min_different: 1,
            max_different: 3,
            occurrences: 3,
            horizontal: false,
        },
        Layout::FullLine {
            min_different: 5,
            max_different: 5,
            occurrences: 2,
            horizontal: true,
        },
        Layout::FullLine {
            min_different: 1,
            max_different: 3,
            occurrences: 4,
            horizontal: true,
        },
        Layout::FullLine {
            min_different: 6,
            max_different: 6,
            occurrences: 2,
            horizontal: false,
        },
        Layout::ItemsPerColor { count: 8 },
        Layout::XShape,
        Layout::Diagonal,
        Layout::Stair,
    ]
}
