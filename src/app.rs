use crate::components::bracket::{BracketGrid, CARD_HEIGHT};
use crate::state::app_settings::AppSettings;
use crate::state::app_state::{AppState, Viewport, child_index, parent_index};
use bracket_engine::dealer::Dealer;
use bracket_engine::layout::{LayoutConfig, LayoutEngine};
use bracket_engine::progression::{IgnoredReason, MatchupPhase, ProgressionEngine, TriggerOutcome};
use bracket_engine::{Bracket, MatchupKey, Team};
use log::info;
use std::time::Duration;
use tokio::sync::mpsc;

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum MenuItem {
    #[default]
    Bracket,
    Help,
}

pub struct App {
    pub settings: AppSettings,
    pub state: AppState,
    pub engine: ProgressionEngine,
    /// Terminal card placement. Depends only on round sizes.
    pub grid: BracketGrid,
    dealer: Dealer,
}

impl App {
    pub fn new(
        settings: AppSettings,
        bracket: Bracket,
        completions: mpsc::Sender<MatchupKey>,
    ) -> Self {
        let layout = LayoutEngine::new(LayoutConfig::terminal());
        let grid = BracketGrid::compute(&bracket.round_sizes(), &layout);
        let dealer = Dealer::new(settings.deal_delay, completions);

        let app = Self {
            state: AppState::new(),
            engine: ProgressionEngine::new(bracket),
            grid,
            dealer,
            settings,
        };

        if let Some(level) = app.settings.log_level {
            log::set_max_level(level);
            tui_logger::set_default_level(level);
        }

        app
    }

    // -----------------------------------------------------------------------
    // Dealing: gestures in, completions back from the dealer
    // -----------------------------------------------------------------------

    /// Deal the selected matchup. Rejected gestures only leave a notice.
    pub fn deal_selected(&mut self) -> TriggerOutcome {
        let key = self.state.selected;
        let outcome = self.engine.trigger(key.round, key.matchup);
        match outcome {
            TriggerOutcome::Started => {
                self.dealer.deal(key);
                self.state.last_notice = None;
                info!("dealing matchup {key}");
                self.select_next_idle_in_round();
            }
            TriggerOutcome::Ignored(reason) => {
                self.state.last_notice = Some(ignored_notice(reason).to_string());
            }
        }
        outcome
    }

    pub fn on_deal_completed(&mut self, key: MatchupKey) {
        self.dealer.settle(key);
        let next_round = key.round + 1;
        let was_visible = self.engine.is_round_visible(next_round);

        // The engine keeps the champion as its announcement.
        self.engine.complete(key.round, key.matchup);

        if !was_visible && self.engine.is_round_visible(next_round) {
            info!("{} unlocked", self.engine.bracket().round_label(next_round));
            // Nothing is left to deal where the cursor is; follow the bracket.
            if self.state.selected.round == key.round {
                self.state.selected = MatchupKey::new(next_round, 0);
            }
        }
    }

    pub fn announcement(&self) -> Option<&Team> {
        self.engine.announcement()
    }

    pub fn dismiss_announcement(&mut self) {
        self.engine.dismiss_announcement();
    }

    /// (played, total) matchups.
    pub fn progress(&self) -> (usize, usize) {
        (self.engine.played_count(), self.engine.matchup_count())
    }

    pub fn pending_deals(&self) -> usize {
        self.dealer.pending_count()
    }

    pub fn deal_delay(&self) -> Duration {
        self.dealer.delay()
    }

    // -----------------------------------------------------------------------
    // Selection cursor
    // -----------------------------------------------------------------------

    pub fn select_next_round(&mut self) {
        let next = self.state.selected.round + 1;
        if next >= self.engine.visible_rounds() {
            return;
        }
        let len = self.round_len(next);
        let matchup = parent_index(self.state.selected.matchup).min(len.saturating_sub(1));
        self.state.selected = MatchupKey::new(next, matchup);
    }

    pub fn select_prev_round(&mut self) {
        let Some(prev) = self.state.selected.round.checked_sub(1) else {
            return;
        };
        let matchup = child_index(self.state.selected.matchup, self.round_len(prev));
        self.state.selected = MatchupKey::new(prev, matchup);
    }

    pub fn select_down(&mut self) {
        let max = self.round_len(self.state.selected.round).saturating_sub(1);
        if self.state.selected.matchup < max {
            self.state.selected.matchup += 1;
        }
    }

    pub fn select_up(&mut self) {
        self.state.selected.matchup = self.state.selected.matchup.saturating_sub(1);
    }

    /// Move to the next idle matchup of the current round, wrapping around.
    fn select_next_idle_in_round(&mut self) {
        let MatchupKey { round, matchup } = self.state.selected;
        let len = self.round_len(round);
        let next = (1..len)
            .map(|step| (matchup + step) % len)
            .find(|&m| self.engine.phase(MatchupKey::new(round, m)) == MatchupPhase::Idle);
        if let Some(m) = next {
            self.state.selected = MatchupKey::new(round, m);
        }
    }

    fn round_len(&self, round: usize) -> usize {
        self.engine
            .bracket()
            .round(round)
            .map(|r| r.matchups.len())
            .unwrap_or(0)
    }

    /// Scroll the bracket so the selected card fits a `width` x `height`
    /// card area.
    pub fn scroll_to_selection(&mut self, width: u16, height: u16) {
        let Some(cell) = self.grid.cell(self.state.selected) else {
            return;
        };
        let (top, col, cell_width) = (cell.top_row, cell.col, cell.cell_width);
        let viewport = &mut self.state.viewport;
        viewport.scroll_offset =
            Viewport::reveal(viewport.scroll_offset, top, top.saturating_add(CARD_HEIGHT), height);
        viewport.h_scroll = Viewport::reveal(viewport.h_scroll, col, col.saturating_add(cell_width), width);
    }

    // -----------------------------------------------------------------------
    // Tab management
    // -----------------------------------------------------------------------

    pub fn update_tab(&mut self, next: MenuItem) {
        if self.state.active_tab == next {
            return;
        }
        self.state.previous_tab = self.state.active_tab;
        self.state.active_tab = next;
    }

    pub fn exit_help(&mut self) {
        if self.state.active_tab == MenuItem::Help {
            self.state.active_tab = self.state.previous_tab;
        }
    }

    pub fn toggle_show_logs(&mut self) {
        self.state.show_logs = !self.state.show_logs;
    }

    pub fn toggle_full_screen(&mut self) {
        self.settings.full_screen = !self.settings.full_screen;
    }

    // -----------------------------------------------------------------------
    // Animation tick, called every 80ms from AnimationTick event
    // -----------------------------------------------------------------------

    pub fn advance_animation(&mut self) {
        self.state.animation.advance();
    }
}

fn ignored_notice(reason: IgnoredReason) -> &'static str {
    match reason {
        IgnoredReason::UnknownMatchup => "no matchup selected",
        IgnoredReason::RoundHidden => "finish the previous round first",
        IgnoredReason::AlreadyAnimating => "already dealing",
        IgnoredReason::AlreadyPlayed => "already dealt",
    }
}
