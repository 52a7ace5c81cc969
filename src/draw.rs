use log::error;
use tui::backend::Backend;
use tui::layout::{Alignment, Constraint, Layout, Rect};
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::{Block, BorderType, Borders, Paragraph};
use tui::{Frame, Terminal};
use tui_logger::TuiLoggerWidget;

use crate::app::{App, MenuItem};
use crate::components::announcement::WinnerPopup;
use crate::components::bracket::{BracketView, HEADER_ROWS};
use crate::components::shuffle::{DealColor, Palette, resolve};
use crate::ui::layout::LayoutAreas;

const PALETTE: Palette = Palette::Felt;

static HELP_ROWS: &[(&str, &str)] = &[
    ("←/→  h/l", "previous / next round"),
    ("↑/↓  j/k", "move between matchups"),
    ("Enter  Space  d", "deal the selected matchup"),
    ("Esc  x  Enter", "close the winner popup"),
    ("f", "toggle full screen"),
    ("\"", "toggle the log panel"),
    ("?", "this help (Esc to go back)"),
    ("q  Ctrl-c", "quit"),
];

pub fn draw<B>(terminal: &mut Terminal<B>, app: &mut App)
where
    B: Backend,
{
    let current_size = terminal.size().unwrap_or_default();
    if current_size.width <= 10 || current_size.height <= 10 {
        return;
    }

    let mut layout = LayoutAreas::new(current_size);

    let result = terminal.draw(|f| {
        layout.update(f.area(), app.settings.full_screen, app.state.show_logs);

        if !app.settings.full_screen {
            draw_header(f, layout.header, app);
        }

        match app.state.active_tab {
            MenuItem::Bracket => draw_bracket(f, layout.main, app),
            MenuItem::Help => draw_help(f, layout.main, app),
        }

        if let Some(logs) = layout.logs {
            draw_logs(f, logs);
        }

        if let Some(champion) = app.announcement() {
            f.render_widget(
                WinnerPopup { champion, tick: app.state.animation.tick, palette: PALETTE },
                f.area(),
            );
        }
    });

    if let Err(e) = result {
        error!("failed to draw frame: {e}");
    }
}

pub fn default_border<'a>(color: Color) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
}

fn draw_header(f: &mut Frame, header: [Rect; 2], app: &App) {
    let style = Style::default().fg(Color::White);
    let border_type = BorderType::Rounded;
    let (played, total) = app.progress();

    let mut spans = vec![
        Span::styled(
            format!(" {} ", app.engine.bracket().title()),
            resolve(DealColor::Gold, PALETTE).add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!(" dealt {played}/{total}"), resolve(DealColor::Dim, PALETTE)),
    ];
    if app.engine.is_complete() {
        spans.push(Span::styled("  ♠ all dealt", resolve(DealColor::Gold, PALETTE)));
    }
    if let Some(notice) = app.state.last_notice.as_deref() {
        spans.push(Span::styled(format!("  {notice}"), resolve(DealColor::Red, PALETTE)));
    }

    let title = Paragraph::new(Line::from(spans))
        .block(
            Block::default()
                .borders(Borders::LEFT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .style(style);
    f.render_widget(title, header[0]);

    let help = Paragraph::new("Help: ? ")
        .alignment(Alignment::Right)
        .block(
            Block::default()
                .borders(Borders::RIGHT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .style(style);
    f.render_widget(help, header[1]);
}

fn draw_bracket(f: &mut Frame, area: Rect, app: &mut App) {
    let block = default_border(Color::White)
        .border_style(resolve(DealColor::Felt, PALETTE))
        .title(" Bracket ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let [key_legend, content] =
        Layout::vertical([Constraint::Length(1), Constraint::Fill(1)]).areas(inner);
    f.render_widget(
        Paragraph::new("Keys: h/l=round  j/k=move  Enter=deal  \"=logs  ?=help  q=quit")
            .style(Style::default().fg(Color::DarkGray)),
        key_legend,
    );

    app.scroll_to_selection(content.width, content.height.saturating_sub(HEADER_ROWS));

    f.render_widget(
        BracketView {
            engine: &app.engine,
            grid: &app.grid,
            selected: Some(app.state.selected),
            scroll_offset: app.state.viewport.scroll_offset,
            h_scroll: app.state.viewport.h_scroll,
            tick: app.state.animation.tick,
            palette: PALETTE,
        },
        content,
    );
}

fn draw_help(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::DarkGray).title(" Help ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let key_style = resolve(DealColor::Accent, PALETTE);
    let mut lines: Vec<Line> = HELP_ROWS
        .iter()
        .map(|(keys, action)| {
            Line::from(vec![
                Span::styled(format!("{keys:>18}  "), key_style),
                Span::raw(*action),
            ])
        })
        .collect();
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("Each deal reveals its winner after {} ms.", app.deal_delay().as_millis()),
        resolve(DealColor::Dim, PALETTE),
    )));
    f.render_widget(Paragraph::new(lines), inner);
}

fn draw_logs(f: &mut Frame, area: Rect) {
    let widget = TuiLoggerWidget::default()
        .block(default_border(Color::DarkGray).title(" Logs "))
        .style_error(Style::default().fg(Color::Red))
        .style_warn(Style::default().fg(Color::Yellow))
        .style_info(Style::default().fg(Color::Gray))
        .style_debug(Style::default().fg(Color::DarkGray));
    f.render_widget(widget, area);
}
