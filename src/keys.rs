use crate::app::{App, MenuItem};
use crossterm::event::KeyCode::Char;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use tokio::sync::Mutex;

pub async fn handle_key_bindings(key_event: KeyEvent, app: &Arc<Mutex<App>>) {
    let mut guard = app.lock().await;

    if is_quit(key_event) {
        crate::cleanup_terminal();
        std::process::exit(0);
    }

    // The champion popup swallows everything but quit until dismissed.
    if guard.announcement().is_some() {
        if let KeyCode::Enter | KeyCode::Esc | Char('x') = key_event.code {
            guard.dismiss_announcement();
        }
        return;
    }

    apply_key(&mut guard, key_event);
}

fn is_quit(key_event: KeyEvent) -> bool {
    matches!(
        (key_event.code, key_event.modifiers),
        (Char('q'), _) | (Char('c'), KeyModifiers::CONTROL)
    )
}

/// Everything except quit and the popup, split out so it runs without a
/// terminal.
fn apply_key(app: &mut App, key_event: KeyEvent) {
    match (app.state.active_tab, key_event.code) {
        (_, Char('?')) => app.update_tab(MenuItem::Help),
        (MenuItem::Help, KeyCode::Esc) => app.exit_help(),

        // Bracket navigation
        (MenuItem::Bracket, Char('l') | KeyCode::Right) => app.select_next_round(),
        (MenuItem::Bracket, Char('h') | KeyCode::Left) => app.select_prev_round(),
        (MenuItem::Bracket, Char('j') | KeyCode::Down) => app.select_down(),
        (MenuItem::Bracket, Char('k') | KeyCode::Up) => app.select_up(),
        (MenuItem::Bracket, KeyCode::Enter | Char(' ') | Char('d')) => {
            app.deal_selected();
        }

        // Global
        (_, Char('f')) => app.toggle_full_screen(),
        (_, Char('"')) => app.toggle_show_logs(),

        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::app_settings::AppSettings;
    use bracket_engine::{Bracket, MatchupKey};
    use tokio::sync::mpsc;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn new_app() -> (App, mpsc::Receiver<MatchupKey>) {
        let (tx, rx) = mpsc::channel(16);
        let bracket = Bracket::embedded().unwrap();
        (App::new(AppSettings::default(), bracket, tx), rx)
    }

    #[test]
    fn quit_keys() {
        assert!(is_quit(press(Char('q'))));
        assert!(is_quit(KeyEvent::new(Char('c'), KeyModifiers::CONTROL)));
        assert!(!is_quit(press(Char('c'))));
    }

    #[tokio::test(start_paused = true)]
    async fn vim_and_arrow_keys_move_the_cursor() {
        let (mut app, _rx) = new_app();
        apply_key(&mut app, press(Char('j')));
        apply_key(&mut app, press(KeyCode::Down));
        assert_eq!(app.state.selected, MatchupKey::new(0, 2));
        apply_key(&mut app, press(Char('k')));
        assert_eq!(app.state.selected, MatchupKey::new(0, 1));
    }

    #[tokio::test(start_paused = true)]
    async fn deal_keys_trigger_selected_matchup() {
        let (mut app, _rx) = new_app();
        apply_key(&mut app, press(KeyCode::Enter));
        apply_key(&mut app, press(Char(' ')));
        apply_key(&mut app, press(Char('d')));
        assert_eq!(app.engine.animating_count(), 3);
        assert_eq!(app.pending_deals(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn help_tab_ignores_deal_keys() {
        let (mut app, _rx) = new_app();
        apply_key(&mut app, press(Char('?')));
        assert_eq!(app.state.active_tab, MenuItem::Help);
        apply_key(&mut app, press(KeyCode::Enter));
        assert_eq!(app.engine.animating_count(), 0);
        apply_key(&mut app, press(KeyCode::Esc));
        assert_eq!(app.state.active_tab, MenuItem::Bracket);
    }

    #[tokio::test(start_paused = true)]
    async fn popup_dismissed_before_other_keys() {
        let (tx, _rx) = mpsc::channel(16);
        let bracket = Bracket::from_json(
            r#"{"rounds":[{"matchups":[{"team1":{"seed":1,"name":"A"},"team2":{"seed":2,"name":"B"},"winner":0}]}]}"#,
        )
        .unwrap();
        let app = Arc::new(Mutex::new(App::new(AppSettings::default(), bracket, tx)));
        {
            let mut guard = app.lock().await;
            guard.deal_selected();
            guard.on_deal_completed(MatchupKey::new(0, 0));
            assert!(guard.announcement().is_some());
        }

        handle_key_bindings(press(Char('f')), &app).await;
        assert!(!app.lock().await.settings.full_screen);
        assert!(app.lock().await.announcement().is_some());

        handle_key_bindings(press(KeyCode::Esc), &app).await;
        assert!(app.lock().await.announcement().is_none());

        handle_key_bindings(press(Char('f')), &app).await;
        assert!(app.lock().await.settings.full_screen);
    }
}
