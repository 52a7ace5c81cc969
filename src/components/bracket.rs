use bracket_engine::layout::LayoutEngine;
use bracket_engine::progression::{MatchupPhase, ProgressionEngine};
use bracket_engine::{Matchup, MatchupKey, Side, Team};
use tui::buffer::Buffer;
use tui::layout::Rect;
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::Widget;

use crate::components::shuffle::{DealColor, Palette, dealing_label, resolve, shuffle_frame, suit_style};

// ---------------------------------------------------------------------------
// Layout constants
// ---------------------------------------------------------------------------

/// Rows per card: team1 line, status line, team2 line.
pub const CARD_HEIGHT: u16 = 3;

/// Rows above the cards: round label plus one spacer.
pub const HEADER_ROWS: u16 = 2;

/// Width of the money column on a team line, `♦` included.
const MONEY_W: usize = 7;

// ---------------------------------------------------------------------------
// CardCell: pre-computed position for one matchup
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct CardCell {
    pub key: MatchupKey,
    /// Row of the team1 line, relative to the top of the card area.
    pub top_row: u16,
    /// Starting x-column of the card (origin-relative, not scrolled).
    pub col: u16,
    pub cell_width: u16,
}

impl CardCell {
    /// Row of the status line. Loaded brackets always fit `u16` rows, the
    /// saturation only guards grids built from arbitrary sizes.
    pub fn center_row(&self) -> u16 {
        self.top_row.saturating_add(1)
    }
}

// ---------------------------------------------------------------------------
// BracketGrid: terminal placement of every card
// ---------------------------------------------------------------------------

/// Card positions for a whole bracket, built from the layout engine in
/// terminal units. Only depends on the round sizes, so it is computed once.
#[derive(Debug, Clone, Default)]
pub struct BracketGrid {
    /// All cells in round-major order.
    pub cells: Vec<CardCell>,
    /// Starting x-column of each round column.
    pub round_cols: Vec<u16>,
    /// Offsets into `cells` per round; one longer than `round_cols`.
    round_starts: Vec<usize>,
    pub cell_width: u16,
    pub connector_width: u16,
    pub total_width: u16,
    pub total_height: u16,
}

impl BracketGrid {
    pub fn compute(sizes: &[usize], layout: &LayoutEngine) -> Self {
        let cell_width = layout.config.column_width.round() as u16;
        let connector_width = layout.config.column_gap.round() as u16;

        let mut cells = Vec::with_capacity(sizes.iter().sum());
        let mut round_cols = Vec::with_capacity(sizes.len());
        let mut round_starts = vec![0usize];

        for (r, column) in layout.round_positions(sizes).iter().enumerate() {
            round_cols.push(layout.column_x(r).round() as u16);
            for (m, pos) in column.iter().enumerate() {
                cells.push(CardCell {
                    key: MatchupKey::new(r, m),
                    top_row: pos.y.round() as u16,
                    col: pos.x.round() as u16,
                    cell_width,
                });
            }
            round_starts.push(cells.len());
        }

        let (width, height) = layout.extent(sizes);
        Self {
            cells,
            round_cols,
            round_starts,
            cell_width,
            connector_width,
            total_width: width.ceil() as u16,
            total_height: height.ceil() as u16,
        }
    }

    pub fn round_count(&self) -> usize {
        self.round_cols.len()
    }

    pub fn cells_for_round(&self, round: usize) -> &[CardCell] {
        match (self.round_starts.get(round), self.round_starts.get(round + 1)) {
            (Some(&start), Some(&end)) => &self.cells[start..end],
            _ => &[],
        }
    }

    pub fn cell(&self, key: MatchupKey) -> Option<&CardCell> {
        self.cells_for_round(key.round).get(key.matchup)
    }
}

// ---------------------------------------------------------------------------
// BracketView widget
// ---------------------------------------------------------------------------

/// Renders every visible round as a column of cards, joined by box-drawing
/// connectors. Hidden rounds only show their label.
pub struct BracketView<'a> {
    pub engine: &'a ProgressionEngine,
    pub grid: &'a BracketGrid,
    pub selected: Option<MatchupKey>,
    /// Vertical scroll in card-area rows.
    pub scroll_offset: u16,
    /// Horizontal scroll in columns.
    pub h_scroll: u16,
    /// Animation tick, drives the shuffle.
    pub tick: u64,
    pub palette: Palette,
}

impl<'a> Widget for BracketView<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 10 || area.height < HEADER_ROWS + CARD_HEIGHT {
            return;
        }
        let body = Rect::new(area.x, area.y + HEADER_ROWS, area.width, area.height - HEADER_ROWS);

        // Pass 1: round labels, pinned above the scrolled cards
        for round in 0..self.grid.round_count() {
            self.draw_round_label(round, area, buf);
        }

        // Pass 2: cards of visible rounds
        let bracket = self.engine.bracket();
        for cell in &self.grid.cells {
            if !self.engine.is_round_visible(cell.key.round) {
                continue;
            }
            let Some(matchup) = bracket.matchup(cell.key) else {
                continue;
            };
            draw_card(
                matchup,
                cell,
                self.engine.phase(cell.key),
                self.selected == Some(cell.key),
                body,
                (self.h_scroll, self.scroll_offset),
                self.tick,
                self.palette,
                buf,
            );
        }

        // Pass 3: connectors into every visible round after the first.
        for round in 0..self.grid.round_count().saturating_sub(1) {
            if !self.engine.is_round_visible(round + 1) {
                continue;
            }
            let children = self.grid.cells_for_round(round);
            let parents = self.grid.cells_for_round(round + 1);
            let conn_x = self.grid.round_cols[round].saturating_add(self.grid.cell_width);

            for (j, parent) in parents.iter().enumerate() {
                match (children.get(2 * j), children.get(2 * j + 1)) {
                    (Some(a), Some(b)) => {
                        let (top, bot) = if a.center_row() <= b.center_row() { (a, b) } else { (b, a) };
                        draw_connector(
                            top.center_row(),
                            parent.center_row(),
                            bot.center_row(),
                            conn_x,
                            body,
                            (self.h_scroll, self.scroll_offset),
                            self.palette,
                            buf,
                        );
                    }
                    (Some(only), None) => draw_passthrough(
                        only.center_row(),
                        conn_x,
                        self.grid.connector_width,
                        body,
                        (self.h_scroll, self.scroll_offset),
                        self.palette,
                        buf,
                    ),
                    _ => {}
                }
            }
        }
    }
}

impl BracketView<'_> {
    fn draw_round_label(&self, round: usize, area: Rect, buf: &mut Buffer) {
        let Some(x) = screen_x(self.grid.round_cols[round], self.h_scroll, area) else {
            return;
        };
        let width = self.grid.cell_width as usize;
        let avail = (area.x + area.width).saturating_sub(x) as usize;
        let visible = self.engine.is_round_visible(round);

        let label = self.engine.bracket().round_label(round).to_uppercase();
        let text: String = format!("{label:^width$}").chars().take(avail).collect();
        let style = if visible {
            resolve(DealColor::Gold, self.palette).add_modifier(Modifier::BOLD)
        } else {
            resolve(DealColor::Dim, self.palette)
        };
        buf.set_string(x, area.y, &text, style);

        if !visible && area.height > HEADER_ROWS {
            let hint: String = format!("{:^width$}", "locked").chars().take(avail).collect();
            buf.set_string(x, area.y + 1, &hint, resolve(DealColor::Dim, self.palette));
        }
    }
}

// ---------------------------------------------------------------------------
// Shared drawing helpers
// ---------------------------------------------------------------------------

/// Convert a grid row to an absolute screen y, applying scroll + area bounds.
/// Returns `None` if the row is off-screen.
fn screen_y(row: u16, scroll: u16, area: Rect) -> Option<u16> {
    if row < scroll {
        return None;
    }
    let rel = row - scroll;
    if rel >= area.height {
        return None;
    }
    Some(area.y + rel)
}

fn screen_x(col: u16, scroll: u16, area: Rect) -> Option<u16> {
    if col < scroll {
        return None;
    }
    let rel = col - scroll;
    if rel >= area.width {
        return None;
    }
    Some(area.x + rel)
}

#[derive(Clone, Copy)]
enum CardRow {
    Team(Side),
    Status,
}

/// Draw one card (3 rows) into the buffer, with scroll + clip handling.
#[allow(clippy::too_many_arguments)]
fn draw_card(
    matchup: &Matchup,
    cell: &CardCell,
    phase: MatchupPhase,
    selected: bool,
    area: Rect,
    (h_scroll, scroll): (u16, u16),
    tick: u64,
    palette: Palette,
    buf: &mut Buffer,
) {
    let Some(x) = screen_x(cell.col, h_scroll, area) else {
        return;
    };
    let avail = (area.x + area.width).saturating_sub(x).min(cell.cell_width);

    let rows = [
        (cell.top_row, CardRow::Team(Side::Team1)),
        (cell.center_row(), CardRow::Status),
        (cell.top_row.saturating_add(2), CardRow::Team(Side::Team2)),
    ];
    for (row, kind) in rows {
        let Some(y) = screen_y(row, scroll, area) else {
            continue;
        };
        let line = match kind {
            CardRow::Team(side) => {
                team_line(matchup, side, phase, selected, cell.cell_width as usize, palette)
            }
            CardRow::Status => status_line(cell.key.matchup, phase, selected, tick, palette),
        };
        buf.set_line(x, y, &line, avail);
    }
}

fn team_line(
    matchup: &Matchup,
    side: Side,
    phase: MatchupPhase,
    selected: bool,
    width: usize,
    palette: Palette,
) -> Line<'static> {
    let revealed = phase.is_played();
    let is_winner = revealed && matchup.winner == side;
    let name_style = if is_winner {
        resolve(DealColor::Winner, palette)
    } else if revealed {
        resolve(DealColor::Dim, palette)
    } else if selected {
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };
    let seed_style = resolve(DealColor::Red, palette).add_modifier(Modifier::BOLD);

    let (seed, name, money) = team_parts(matchup.team(side), is_winner, width);
    Line::from(vec![
        Span::styled(seed, seed_style),
        Span::styled(name, name_style),
        Span::styled(money, resolve(DealColor::Gold, palette)),
    ])
}

/// Split a team line into `(seed, name, money)` columns:
/// `"[seed] [name       ] [money]"`, exactly `width` chars for 1–2 digit seeds.
/// Money is only shown for a revealed winner.
fn team_parts(team: Option<&Team>, show_money: bool, width: usize) -> (String, String, String) {
    let seed = match team {
        Some(t) if t.seed > 0 => format!("{:>2} ", t.seed),
        _ => "   ".to_string(),
    };
    let name = team.map(|t| t.name.as_str()).unwrap_or("TBD");
    let money = match team.and_then(|t| t.money.as_ref()) {
        Some(m) if show_money => format!("{m}♦"),
        _ => String::new(),
    };

    // width = seed(2) + sp + name_w + sp + money(MONEY_W)
    let name_w = width.saturating_sub(2 + 1 + 1 + MONEY_W);
    let name_trunc: String = name.chars().take(name_w).collect();
    let money_trunc: String = money.chars().take(MONEY_W).collect();
    (
        seed,
        format!("{:<name_w$} ", name_trunc),
        format!("{:>width$}", money_trunc, width = MONEY_W),
    )
}

/// Center row of a card: matchup badge plus the deal control, the shuffle
/// while dealing, or a tick once revealed.
fn status_line(
    index: usize,
    phase: MatchupPhase,
    selected: bool,
    tick: u64,
    palette: Palette,
) -> Line<'static> {
    let mut badge_style = resolve(DealColor::Red, palette).add_modifier(Modifier::BOLD);
    if selected {
        badge_style = badge_style.add_modifier(Modifier::REVERSED);
    }
    let mut spans = vec![Span::styled(format!(" #{:<2}", index + 1), badge_style), Span::raw(" ")];

    match phase {
        MatchupPhase::Idle => {
            let style = if selected {
                Style::default()
                    .fg(Color::White)
                    .bg(Color::Rgb(185, 28, 28))
                    .add_modifier(Modifier::BOLD)
            } else {
                resolve(DealColor::Red, palette)
            };
            spans.push(Span::styled("▶ Deal", style));
        }
        MatchupPhase::Animating => {
            for (i, suit) in shuffle_frame(tick).iter().enumerate() {
                spans.push(Span::styled(suit.to_string(), suit_style(i, palette)));
            }
            spans.push(Span::raw(" "));
            spans.push(Span::styled(dealing_label(tick), resolve(DealColor::Accent, palette)));
        }
        MatchupPhase::Played => {
            spans.push(Span::styled("✓ dealt", resolve(DealColor::Dim, palette)));
        }
    }
    Line::from(spans)
}

/// Draw box-drawing connectors between one parent and its two children.
///
/// ```text
///  child_top  ──┐         (col_a='─'  col_b='┐')
///               │         (col_b='│')
///  parent     ──├──       (col_a='─'  col_b='├'  col_c='─')
///               │         (col_b='│')
///  child_bot  ──┘         (col_a='─'  col_b='┘')
/// ```
#[allow(clippy::too_many_arguments)]
fn draw_connector(
    r_top: u16,
    r_mid: u16,
    r_bot: u16,
    conn_base_x: u16, // grid x of connector column 0
    area: Rect,
    (h_scroll, scroll): (u16, u16),
    palette: Palette,
    buf: &mut Buffer,
) {
    let style = resolve(DealColor::Dim, palette);
    let col_a = conn_base_x;
    let col_b = conn_base_x + 1;
    let col_c = conn_base_x + 2;

    macro_rules! put {
        ($col:expr, $row:expr, $ch:expr) => {
            if let (Some(sx), Some(sy)) = (screen_x($col, h_scroll, area), screen_y($row, scroll, area)) {
                put_char(buf, sx, sy, $ch, style);
            }
        };
    }

    put!(col_a, r_top, '─');
    put!(col_b, r_top, '┐');
    for row in (r_top + 1)..r_mid {
        put!(col_b, row, '│');
    }
    put!(col_a, r_mid, '─');
    put!(col_b, r_mid, '├');
    put!(col_c, r_mid, '─');
    for row in (r_mid + 1)..r_bot {
        put!(col_b, row, '│');
    }
    put!(col_a, r_bot, '─');
    put!(col_b, r_bot, '┘');
}

/// A parent fed by a single child sits on the child's row: a straight line.
fn draw_passthrough(
    row: u16,
    conn_base_x: u16,
    width: u16,
    area: Rect,
    (h_scroll, scroll): (u16, u16),
    palette: Palette,
    buf: &mut Buffer,
) {
    let style = resolve(DealColor::Dim, palette);
    let Some(sy) = screen_y(row, scroll, area) else {
        return;
    };
    for col in conn_base_x..conn_base_x + width {
        if let Some(sx) = screen_x(col, h_scroll, area) {
            put_char(buf, sx, sy, '─', style);
        }
    }
}

fn put_char(buf: &mut Buffer, x: u16, y: u16, ch: char, style: Style) {
    if let Some(cell) = buf.cell_mut((x, y)) {
        cell.set_char(ch);
        cell.set_style(style);
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
