use crate::app::MenuItem;
use bracket_engine::MatchupKey;

// ---------------------------------------------------------------------------
// Animation state
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct AnimationState {
    /// Monotonic tick counter. Drives the shuffle frames and bobbing suits.
    pub tick: u64,
}

impl AnimationState {
    pub fn advance(&mut self) {
        self.tick = self.tick.wrapping_add(1);
    }
}

// ---------------------------------------------------------------------------
// Bracket viewport
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Rows scrolled off the top of the card area.
    pub scroll_offset: u16,
    /// Columns scrolled off the left edge.
    pub h_scroll: u16,
}

impl Viewport {
    /// Smallest scroll change that brings `start..end` inside a window of
    /// `size` starting at `offset`. Spans larger than the window pin to
    /// their start.
    pub fn reveal(offset: u16, start: u16, end: u16, size: u16) -> u16 {
        if size == 0 {
            return offset;
        }
        if start < offset {
            start
        } else if end > offset.saturating_add(size) {
            end.saturating_sub(size).min(start)
        } else {
            offset
        }
    }
}

// ---------------------------------------------------------------------------
// Selection cursor helpers
// ---------------------------------------------------------------------------

/// Matchup in the next round that `matchup` feeds.
pub fn parent_index(matchup: usize) -> usize {
    matchup / 2
}

/// Upper of the two matchups in the previous round that feed `matchup`,
/// clamped to that round's size.
pub fn child_index(matchup: usize, prev_round_len: usize) -> usize {
    (matchup * 2).min(prev_round_len.saturating_sub(1))
}

#[derive(Debug, Default)]
pub struct AppState {
    pub active_tab: MenuItem,
    pub previous_tab: MenuItem,
    pub selected: MatchupKey,
    pub viewport: Viewport,
    pub animation: AnimationState,
    pub show_logs: bool,
    /// Last user-facing notice (e.g. why a deal did not start).
    pub last_notice: Option<String>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reveal_keeps_visible_span() {
        assert_eq!(Viewport::reveal(4, 6, 9, 10), 4);
    }

    #[test]
    fn reveal_scrolls_up_to_span_start() {
        assert_eq!(Viewport::reveal(10, 2, 5, 10), 2);
    }

    #[test]
    fn reveal_scrolls_down_just_enough() {
        assert_eq!(Viewport::reveal(0, 12, 15, 10), 5);
    }

    #[test]
    fn reveal_pins_oversized_span_to_start() {
        assert_eq!(Viewport::reveal(0, 12, 40, 10), 12);
        assert_eq!(Viewport::reveal(3, 0, 4, 0), 3);
    }

    #[test]
    fn cursor_moves_between_parent_and_children() {
        assert_eq!(parent_index(0), 0);
        assert_eq!(parent_index(3), 1);
        assert_eq!(child_index(1, 4), 2);
        assert_eq!(child_index(1, 3), 2);
        assert_eq!(child_index(2, 3), 2);
        assert_eq!(child_index(0, 0), 0);
    }

    #[test]
    fn animation_tick_wraps() {
        let mut anim = AnimationState { tick: u64::MAX };
        anim.advance();
        assert_eq!(anim.tick, 0);
    }
}
