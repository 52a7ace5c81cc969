use tui::style::{Color, Modifier, Style};

pub const SUITS: [char; 4] = ['♠', '♥', '♦', '♣'];

/// Animation ticks per full shuffle cycle.
pub const FRAME_COUNT: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DealColor {
    Felt,
    Gold,
    Red,
    Accent,
    Dim,
    Winner,
    Card,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum Palette {
    #[default]
    Felt,
}

pub fn resolve(color: DealColor, _palette: Palette) -> Style {
    match color {
        DealColor::Felt => Style::default().fg(Color::Rgb(16, 85, 60)),
        DealColor::Gold => Style::default().fg(Color::Rgb(250, 204, 21)),
        DealColor::Red => Style::default().fg(Color::Rgb(220, 38, 38)),
        DealColor::Accent => Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        DealColor::Dim => Style::default().fg(Color::Indexed(240)),
        DealColor::Winner => Style::default()
            .fg(Color::Rgb(250, 204, 21))
            .add_modifier(Modifier::BOLD),
        DealColor::Card => Style::default().fg(Color::White),
    }
}

/// Red suits get the red style, black suits the card style.
pub fn suit_style(index: usize, palette: Palette) -> Style {
    if index % 2 == 0 {
        resolve(DealColor::Card, palette)
    } else {
        resolve(DealColor::Red, palette)
    }
}

/// Triangle wave in `0..height`, used to bob suits up and down.
pub fn suit_lift(tick: u64, height: u16) -> u16 {
    if height == 0 {
        return 0;
    }
    let h = u64::from(height.saturating_sub(1));
    if h == 0 {
        return 0;
    }
    let period = 2 * h;
    let t = tick % period;
    (h.abs_diff(t)) as u16
}

/// Four suits rotated by the current frame, shown while a matchup is dealing.
pub fn shuffle_frame(tick: u64) -> [char; 4] {
    let shift = (tick as usize) % FRAME_COUNT;
    let mut out = SUITS;
    out.rotate_left(shift);
    out
}

/// "Dealing" followed by a pulsing run of up to three dots.
pub fn dealing_label(tick: u64) -> String {
    let dots = ((tick / 3) % 4) as usize;
    format!("Dealing{:<3}", ".".repeat(dots))
}
