//! Bracket geometry.
//!
//! Rounds are columns laid out left to right. Round 0 stacks its cards at a
//! uniform pitch; every later card is vertically centered on the two cards
//! that feed it, which produces the classic bracket staircase:
//!
//! ```text
//!  r0  ┐
//!      ├─ r1 ┐
//!  r0  ┘     │
//!            ├─ r2
//!  r0  ┐     │
//!      ├─ r1 ┘
//!  r0  ┘
//! ```
//!
//! Units are whatever the renderer uses: pixels for [`LayoutConfig::pixels`],
//! terminal cells for [`LayoutConfig::terminal`].

/// Top-left corner of a card.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Offset {
    pub x: f64,
    pub y: f64,
}

/// Cosmetic per-round downward nudge: `0, second, third, step * (r - 2)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundNudge {
    pub second: f64,
    pub third: f64,
    pub step: f64,
}

impl RoundNudge {
    pub const NONE: RoundNudge = RoundNudge { second: 0.0, third: 0.0, step: 0.0 };
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConfig {
    pub card_height: f64,
    pub vertical_spacing: f64,
    pub column_width: f64,
    pub column_gap: f64,
    pub nudge: RoundNudge,
}

impl LayoutConfig {
    /// Web-style geometry in pixels.
    pub const fn pixels() -> Self {
        Self {
            card_height: 60.0,
            vertical_spacing: 40.0,
            column_width: 208.0,
            column_gap: 80.0,
            nudge: RoundNudge { second: 40.0, third: 100.0, step: 160.0 },
        }
    }

    /// Terminal geometry: 3-row cards one row apart. With an even pitch every
    /// card center lands on a whole row.
    pub const fn terminal() -> Self {
        Self {
            card_height: 3.0,
            vertical_spacing: 1.0,
            column_width: 22.0,
            column_gap: 3.0,
            nudge: RoundNudge::NONE,
        }
    }

    pub fn pitch(&self) -> f64 {
        self.card_height + self.vertical_spacing
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self::terminal()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LayoutEngine {
    pub config: LayoutConfig,
}

impl LayoutEngine {
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    pub fn column_x(&self, round: usize) -> f64 {
        round as f64 * (self.config.column_width + self.config.column_gap)
    }

    /// Closed-form card position.
    ///
    /// Round `r` matchup `i` is centered on the `2^r` round-0 slots starting
    /// at slot `i * 2^r`:
    ///   y = pitch * (i * 2^r) + pitch * (2^r - 1) / 2
    pub fn offset(&self, round: usize, matchup: usize) -> Offset {
        let pitch = self.config.pitch();
        let span = 2f64.powi(round.min(1023) as i32);
        let y = pitch * (matchup as f64 * span) + pitch * (span - 1.0) / 2.0;
        Offset { x: self.column_x(round), y }
    }

    /// Vertical center of a card.
    pub fn center(&self, round: usize, matchup: usize) -> f64 {
        self.offset(round, matchup).y + self.config.card_height / 2.0
    }

    /// Cosmetic nudge for a whole round. Carries no layout guarantee.
    pub fn round_offset(&self, round: usize) -> f64 {
        let nudge = self.config.nudge;
        match round {
            0 => 0.0,
            1 => nudge.second,
            2 => nudge.third,
            r => nudge.step * (r - 2) as f64,
        }
    }

    /// Positions for every card, built round by round from the previous
    /// round: a parent's center is the mean of its children's centers. A lone
    /// child (odd round size) passes its center through unchanged.
    pub fn round_positions(&self, sizes: &[usize]) -> Vec<Vec<Offset>> {
        let half = self.config.card_height / 2.0;
        let mut rounds: Vec<Vec<Offset>> = Vec::with_capacity(sizes.len());

        for (r, &size) in sizes.iter().enumerate() {
            let x = self.column_x(r);
            let column = match rounds.last() {
                None => (0..size)
                    .map(|i| Offset { x, y: i as f64 * self.config.pitch() })
                    .collect(),
                Some(children) => (0..size)
                    .map(|j| {
                        let centers: Vec<f64> = children
                            .iter()
                            .skip(2 * j)
                            .take(2)
                            .map(|c| c.y + half)
                            .collect();
                        if centers.is_empty() {
                            // More parents than child pairs: fall back to the closed form.
                            return Offset { x, y: self.offset(r, j).y };
                        }
                        let center = centers.iter().sum::<f64>() / centers.len() as f64;
                        Offset { x, y: center - half }
                    })
                    .collect(),
            };
            rounds.push(column);
        }
        rounds
    }

    /// Total (width, height) covered by a bracket with the given round sizes.
    pub fn extent(&self, sizes: &[usize]) -> (f64, f64) {
        if sizes.is_empty() {
            return (0.0, 0.0);
        }
        let width = self.column_x(sizes.len() - 1) + self.config.column_width;
        let height = self
            .round_positions(sizes)
            .iter()
            .flat_map(|column| column.iter())
            .map(|o| o.y + self.config.card_height)
            .fold(0.0, f64::max);
        (width, height)
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
