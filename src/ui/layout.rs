use tui::layout::{Constraint, Layout, Rect, Size};

pub const HEADER_HEIGHT: u16 = 3;
pub const LOG_PANEL_HEIGHT: u16 = 8;

/// Pre-computed layout areas for the main draw loop.
pub struct LayoutAreas {
    pub header: [Rect; 2],
    pub main: Rect,
    pub logs: Option<Rect>,
}

impl LayoutAreas {
    pub fn new(size: Size) -> Self {
        let rect = Rect::new(0, 0, size.width, size.height);
        Self::from_rect(rect, false, false)
    }

    pub fn update(&mut self, area: Rect, full_screen: bool, show_logs: bool) {
        *self = Self::from_rect(area, full_screen, show_logs);
    }

    fn from_rect(area: Rect, full_screen: bool, show_logs: bool) -> Self {
        let (body, logs) = Self::split_logs(area, show_logs);

        if full_screen {
            return LayoutAreas {
                header: [Rect::ZERO, Rect::ZERO],
                main: body,
                logs,
            };
        }

        let [header, main] =
            Layout::vertical([Constraint::Length(HEADER_HEIGHT), Constraint::Fill(1)]).areas(body);

        LayoutAreas {
            header: Self::split_header(header),
            main,
            logs,
        }
    }

    /// Carve the log panel off the bottom when it is open and there is room
    /// left for the bracket.
    fn split_logs(area: Rect, show_logs: bool) -> (Rect, Option<Rect>) {
        if !show_logs || area.height < LOG_PANEL_HEIGHT + HEADER_HEIGHT + 6 {
            return (area, None);
        }
        let [body, logs] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(LOG_PANEL_HEIGHT)]).areas(area);
        (body, Some(logs))
    }

    fn split_header(area: Rect) -> [Rect; 2] {
        Layout::horizontal([Constraint::Percentage(80), Constraint::Percentage(20)]).areas(area)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_sits_above_main() {
        let layout = LayoutAreas::new(Size::new(100, 40));
        assert_eq!(layout.header[0].height, HEADER_HEIGHT);
        assert_eq!(layout.main.y, HEADER_HEIGHT);
        assert_eq!(layout.main.height, 40 - HEADER_HEIGHT);
        assert!(layout.logs.is_none());
    }

    #[test]
    fn full_screen_drops_header() {
        let mut layout = LayoutAreas::new(Size::new(100, 40));
        layout.update(Rect::new(0, 0, 100, 40), true, false);
        assert_eq!(layout.header, [Rect::ZERO, Rect::ZERO]);
        assert_eq!(layout.main, Rect::new(0, 0, 100, 40));
    }

    #[test]
    fn log_panel_only_when_it_fits() {
        let mut layout = LayoutAreas::new(Size::new(100, 40));
        layout.update(Rect::new(0, 0, 100, 40), false, true);
        let logs = layout.logs.expect("log panel");
        assert_eq!(logs.height, LOG_PANEL_HEIGHT);
        assert_eq!(layout.main.y + layout.main.height, logs.y);

        layout.update(Rect::new(0, 0, 100, 12), false, true);
        assert!(layout.logs.is_none());
    }
}
