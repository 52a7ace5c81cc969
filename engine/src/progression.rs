use crate::{Bracket, MatchupKey, Team};
use log::{debug, info};
use std::collections::HashMap;

// ---------------------------------------------------------------------------
// Per-matchup reveal state
// ---------------------------------------------------------------------------

/// Reveal lifecycle of one matchup: `Idle -> Animating -> Played`.
/// There are no back-transitions and no cancellation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MatchupPhase {
    #[default]
    Idle,
    Animating,
    Played,
}

impl MatchupPhase {
    pub fn is_played(self) -> bool {
        self == MatchupPhase::Played
    }

    pub fn is_animating(self) -> bool {
        self == MatchupPhase::Animating
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoredReason {
    UnknownMatchup,
    RoundHidden,
    AlreadyAnimating,
    AlreadyPlayed,
}

/// Result of a deal gesture. Rejections are never faults, the caller just
/// skips scheduling a timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerOutcome {
    Started,
    Ignored(IgnoredReason),
}

impl TriggerOutcome {
    pub fn is_started(self) -> bool {
        self == TriggerOutcome::Started
    }
}

// ---------------------------------------------------------------------------
// ProgressionEngine
// ---------------------------------------------------------------------------

/// Owns the bracket and the reveal state of every matchup in it.
#[derive(Debug, Default)]
pub struct ProgressionEngine {
    bracket: Bracket,
    /// Entries are created on first trigger; absent means `Idle`.
    phases: HashMap<MatchupKey, MatchupPhase>,
    announcement: Option<Team>,
}

impl ProgressionEngine {
    pub fn new(bracket: Bracket) -> Self {
        Self { bracket, phases: HashMap::new(), announcement: None }
    }

    pub fn bracket(&self) -> &Bracket {
        &self.bracket
    }

    pub fn phase(&self, key: MatchupKey) -> MatchupPhase {
        self.phases.get(&key).copied().unwrap_or_default()
    }

    pub fn is_played(&self, key: MatchupKey) -> bool {
        self.phase(key).is_played()
    }

    pub fn is_animating(&self, key: MatchupKey) -> bool {
        self.phase(key).is_animating()
    }

    /// Round 0 is always visible; a later round only once every matchup of
    /// the round before it has been played.
    pub fn is_round_visible(&self, round: usize) -> bool {
        if round >= self.bracket.round_count() {
            return false;
        }
        if round == 0 {
            return true;
        }
        let prev = round - 1;
        (0..self.bracket.rounds[prev].matchups.len())
            .all(|m| self.is_played(MatchupKey::new(prev, m)))
    }

    /// Number of leading rounds currently visible.
    pub fn visible_rounds(&self) -> usize {
        (0..self.bracket.round_count())
            .take_while(|&r| self.is_round_visible(r))
            .count()
    }

    /// Start the reveal of a matchup. Only an idle matchup in a visible round
    /// moves to `Animating`; anything else is ignored without side effects.
    pub fn trigger(&mut self, round: usize, matchup: usize) -> TriggerOutcome {
        let key = MatchupKey::new(round, matchup);
        let outcome = match self.phase(key) {
            _ if self.bracket.matchup(key).is_none() => {
                TriggerOutcome::Ignored(IgnoredReason::UnknownMatchup)
            }
            _ if !self.is_round_visible(round) => {
                TriggerOutcome::Ignored(IgnoredReason::RoundHidden)
            }
            MatchupPhase::Animating => TriggerOutcome::Ignored(IgnoredReason::AlreadyAnimating),
            MatchupPhase::Played => TriggerOutcome::Ignored(IgnoredReason::AlreadyPlayed),
            MatchupPhase::Idle => {
                self.phases.insert(key, MatchupPhase::Animating);
                TriggerOutcome::Started
            }
        };
        debug!("trigger {key}: {outcome:?}");
        outcome
    }

    /// Completion of a matchup's reveal. Flips `Animating` to `Played` and,
    /// for the final, returns the champion that is now announced.
    pub fn complete(&mut self, round: usize, matchup: usize) -> Option<Team> {
        let key = MatchupKey::new(round, matchup);
        if !self.is_animating(key) {
            debug!("completion for {key} ignored: {:?}", self.phase(key));
            return None;
        }
        self.phases.insert(key, MatchupPhase::Played);
        debug!("matchup {key} played");

        if !self.bracket.is_final(key) {
            return None;
        }
        let champion = self.bracket.matchup(key)?.winning_team()?.clone();
        info!("champion: ({}) {}", champion.seed, champion.name);
        self.announcement = Some(champion.clone());
        Some(champion)
    }

    pub fn announcement(&self) -> Option<&Team> {
        self.announcement.as_ref()
    }

    /// Clears the champion overlay. Reveal state is left untouched, the
    /// bracket stays resolved.
    pub fn dismiss_announcement(&mut self) {
        self.announcement = None;
    }

    pub fn played_keys(&self) -> Vec<MatchupKey> {
        let mut keys: Vec<MatchupKey> = self
            .phases
            .iter()
            .filter(|(_, phase)| phase.is_played())
            .map(|(key, _)| *key)
            .collect();
        keys.sort();
        keys
    }

    pub fn played_count(&self) -> usize {
        self.phases.values().filter(|p| p.is_played()).count()
    }

    pub fn animating_count(&self) -> usize {
        self.phases.values().filter(|p| p.is_animating()).count()
    }

    pub fn matchup_count(&self) -> usize {
        self.bracket.matchup_count()
    }

    pub fn is_complete(&self) -> bool {
        self.bracket
            .final_key()
            .map(|key| self.is_played(key))
            .unwrap_or(false)
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Side;
    use crate::fixtures::{eight_team, single_final};

    fn play(engine: &mut ProgressionEngine, round: usize, matchup: usize) -> Option<Team> {
        assert!(engine.trigger(round, matchup).is_started(), "trigger {round}-{matchup}");
        engine.complete(round, matchup)
    }

    #[test]
    fn test_round_zero_always_visible() {
        let engine = ProgressionEngine::new(eight_team());
        assert!(engine.is_round_visible(0));
        assert!(!engine.is_round_visible(1));
        assert!(!engine.is_round_visible(2));
        assert!(!engine.is_round_visible(3));
        assert_eq!(engine.visible_rounds(), 1);
    }

    #[test]
    fn test_round_visible_only_after_every_predecessor_played() {
        let mut engine = ProgressionEngine::new(eight_team());
        for m in 0..3 {
            play(&mut engine, 0, m);
            assert!(!engine.is_round_visible(1), "after {m}");
        }
        // Animating is not enough.
        engine.trigger(0, 3);
        assert!(!engine.is_round_visible(1));
        engine.complete(0, 3);
        assert!(engine.is_round_visible(1));
        assert!(!engine.is_round_visible(2));
        assert_eq!(engine.visible_rounds(), 2);
    }

    #[test]
    fn test_trigger_sets_animating_synchronously() {
        let mut engine = ProgressionEngine::new(eight_team());
        let key = MatchupKey::new(0, 2);
        assert_eq!(engine.phase(key), MatchupPhase::Idle);
        assert_eq!(engine.trigger(0, 2), TriggerOutcome::Started);
        assert!(engine.is_animating(key));
        assert!(!engine.is_played(key));
    }

    #[test]
    fn test_complete_flips_both_flags_together() {
        let mut engine = ProgressionEngine::new(eight_team());
        let key = MatchupKey::new(0, 0);
        engine.trigger(0, 0);
        engine.complete(0, 0);
        assert!(engine.is_played(key));
        assert!(!engine.is_animating(key));
    }

    #[test]
    fn test_double_trigger_is_ignored() {
        let mut engine = ProgressionEngine::new(eight_team());
        assert!(engine.trigger(0, 1).is_started());
        assert_eq!(
            engine.trigger(0, 1),
            TriggerOutcome::Ignored(IgnoredReason::AlreadyAnimating)
        );
        assert_eq!(engine.animating_count(), 1);
        engine.complete(0, 1);
        assert_eq!(
            engine.trigger(0, 1),
            TriggerOutcome::Ignored(IgnoredReason::AlreadyPlayed)
        );
        assert_eq!(engine.phase(MatchupKey::new(0, 1)), MatchupPhase::Played);
    }

    #[test]
    fn test_second_completion_is_a_noop() {
        let mut engine = ProgressionEngine::new(single_final(Side::Team1));
        assert!(play(&mut engine, 0, 0).is_some());
        engine.dismiss_announcement();
        assert!(engine.complete(0, 0).is_none());
        assert!(engine.announcement().is_none());
    }

    #[test]
    fn test_complete_without_trigger_is_ignored() {
        let mut engine = ProgressionEngine::new(eight_team());
        assert!(engine.complete(0, 0).is_none());
        assert_eq!(engine.phase(MatchupKey::new(0, 0)), MatchupPhase::Idle);
    }

    #[test]
    fn test_trigger_in_hidden_round_is_ignored() {
        let mut engine = ProgressionEngine::new(eight_team());
        assert_eq!(
            engine.trigger(1, 0),
            TriggerOutcome::Ignored(IgnoredReason::RoundHidden)
        );
        assert_eq!(engine.phase(MatchupKey::new(1, 0)), MatchupPhase::Idle);
    }

    #[test]
    fn test_trigger_out_of_range_is_ignored() {
        let mut engine = ProgressionEngine::new(eight_team());
        assert_eq!(
            engine.trigger(0, 9),
            TriggerOutcome::Ignored(IgnoredReason::UnknownMatchup)
        );
        assert_eq!(
            engine.trigger(7, 0),
            TriggerOutcome::Ignored(IgnoredReason::UnknownMatchup)
        );
        assert_eq!(engine.animating_count(), 0);
    }

    #[test]
    fn test_final_with_winner_zero_announces_team1() {
        let mut engine = ProgressionEngine::new(single_final(Side::Team1));
        let champion = play(&mut engine, 0, 0).expect("final should announce");
        assert_eq!(champion.name, "A");
        assert_eq!(engine.announcement().map(|t| t.name.as_str()), Some("A"));
    }

    #[test]
    fn test_final_with_winner_one_announces_team2() {
        let mut engine = ProgressionEngine::new(single_final(Side::Team2));
        let champion = play(&mut engine, 0, 0).expect("final should announce");
        assert_eq!(champion.seed, 2);
        assert_eq!(champion.name, "B");
    }

    #[test]
    fn test_only_final_announces() {
        let mut engine = ProgressionEngine::new(eight_team());
        for m in 0..4 {
            assert!(play(&mut engine, 0, m).is_none());
        }
        for m in 0..2 {
            assert!(play(&mut engine, 1, m).is_none());
        }
        assert!(engine.announcement().is_none());
        assert!(!engine.is_complete());
        let champion = play(&mut engine, 2, 0).expect("final");
        assert_eq!(champion.name, "Kicker");
        assert!(engine.is_complete());
        assert_eq!(engine.played_count(), engine.matchup_count());
    }

    #[test]
    fn test_dismiss_keeps_progress() {
        let mut engine = ProgressionEngine::new(single_final(Side::Team1));
        play(&mut engine, 0, 0);
        let before = engine.played_keys();
        engine.dismiss_announcement();
        assert!(engine.announcement().is_none());
        assert_eq!(engine.played_keys(), before);
        assert!(engine.is_played(MatchupKey::new(0, 0)));
        assert!(!engine.is_animating(MatchupKey::new(0, 0)));
    }

    #[test]
    fn test_end_to_end_single_matchup() {
        let mut engine = ProgressionEngine::new(single_final(Side::Team1));
        assert!(engine.is_round_visible(0));
        assert!(engine.played_keys().is_empty());
        play(&mut engine, 0, 0);
        let played: Vec<String> = engine.played_keys().iter().map(|k| k.to_string()).collect();
        assert_eq!(played, vec!["0-0"]);
        assert_eq!(engine.announcement().map(|t| t.name.as_str()), Some("A"));
    }

    #[test]
    fn test_missing_winner_team_does_not_announce() {
        let mut bracket = single_final(Side::Team2);
        bracket.rounds[0].matchups[0].team2 = None;
        let mut engine = ProgressionEngine::new(bracket);
        assert!(play(&mut engine, 0, 0).is_none());
        assert!(engine.is_played(MatchupKey::new(0, 0)));
        assert!(engine.announcement().is_none());
    }

    #[test]
    fn test_matchups_complete_in_any_order() {
        let mut engine = ProgressionEngine::new(eight_team());
        for m in 0..4 {
            engine.trigger(0, m);
        }
        assert_eq!(engine.animating_count(), 4);
        for m in [3, 0, 2, 1] {
            engine.complete(0, m);
        }
        assert_eq!(engine.animating_count(), 0);
        assert!(engine.is_round_visible(1));
    }
}
