use bracket_engine::Team;
use tui::buffer::Buffer;
use tui::layout::{Alignment, Rect};
use tui::style::Modifier;
use tui::text::{Line, Span};
use tui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget};

use crate::components::shuffle::{DealColor, Palette, SUITS, resolve, suit_lift, suit_style};

pub const POPUP_WIDTH: u16 = 44;
pub const POPUP_HEIGHT: u16 = 15;

/// Champion overlay shown once the final has been dealt.
pub struct WinnerPopup<'a> {
    pub champion: &'a Team,
    pub tick: u64,
    pub palette: Palette,
}

/// Centered rect of at most `width` x `height` inside `area`.
pub fn popup_area(area: Rect, width: u16, height: u16) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    Rect::new(
        area.x + (area.width - w) / 2,
        area.y + (area.height - h) / 2,
        w,
        h,
    )
}

impl<'a> Widget for WinnerPopup<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let popup = popup_area(area, POPUP_WIDTH, POPUP_HEIGHT);
        Clear.render(popup, buf);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Double)
            .border_style(resolve(DealColor::Gold, self.palette))
            .title(Span::styled(" ♠ ", suit_style(0, self.palette)))
            .title(
                Line::from(Span::styled(" ♣ ", suit_style(0, self.palette)))
                    .alignment(Alignment::Right),
            );
        let inner = block.inner(popup);
        block.render(popup, buf);
        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let gold = resolve(DealColor::Gold, self.palette);
        let mut lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "WINNER!",
                resolve(DealColor::Red, self.palette).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled("CHAMPION", gold)),
            Line::from(vec![
                Span::styled(format!("{} ", self.champion.seed), gold.add_modifier(Modifier::BOLD)),
                Span::styled(
                    self.champion.name.clone(),
                    resolve(DealColor::Card, self.palette).add_modifier(Modifier::BOLD),
                ),
            ]),
        ];
        if let Some(money) = &self.champion.money {
            lines.push(Line::from(Span::styled(format!("{money} ♦"), gold)));
        }
        lines.push(Line::from(Span::styled("Takes the pot!", gold)));

        let text_height = lines.len() as u16;
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .render(inner, buf);

        // Bobbing suits under the text.
        let suits_y = inner.y + text_height + 1;
        if suits_y + 2 < inner.y + inner.height {
            let start_x = inner.x + inner.width.saturating_sub(7) / 2;
            for (i, suit) in SUITS.iter().enumerate() {
                let lift = suit_lift(self.tick + i as u64 * 2, 2);
                let x = start_x + i as u16 * 2;
                if x < inner.x + inner.width {
                    buf.set_string(x, suits_y + 1 - lift, suit.to_string(), suit_style(i, self.palette));
                }
            }
        }

        let hint_y = inner.y + inner.height - 1;
        if hint_y > suits_y {
            Paragraph::new(Line::from(vec![
                Span::styled("Enter", resolve(DealColor::Accent, self.palette)),
                Span::styled(" / ", resolve(DealColor::Dim, self.palette)),
                Span::styled("Esc", resolve(DealColor::Accent, self.palette)),
                Span::styled(" Close", resolve(DealColor::Dim, self.palette)),
            ]))
            .alignment(Alignment::Center)
            .render(Rect::new(inner.x, hint_y, inner.width, 1), buf);
        }
    }
}
