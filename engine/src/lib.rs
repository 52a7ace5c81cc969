pub mod dealer;
pub mod layout;
pub mod loader;
pub mod progression;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use loader::{BracketError, BracketResult};

pub const DEFAULT_TITLE: &str = "Build4Good PokerBot Challenge";

// ---------------------------------------------------------------------------
// Domain types: the bracket document as supplied at startup
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Bracket {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub rounds: Vec<Round>,
}

impl Bracket {
    pub fn title(&self) -> &str {
        self.title
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or(DEFAULT_TITLE)
    }

    pub fn round_count(&self) -> usize {
        self.rounds.len()
    }

    pub fn round(&self, round: usize) -> Option<&Round> {
        self.rounds.get(round)
    }

    pub fn matchup(&self, key: MatchupKey) -> Option<&Matchup> {
        self.rounds.get(key.round)?.matchups.get(key.matchup)
    }

    /// Number of matchups per round, first round first.
    pub fn round_sizes(&self) -> Vec<usize> {
        self.rounds.iter().map(|r| r.matchups.len()).collect()
    }

    pub fn matchup_count(&self) -> usize {
        self.rounds.iter().map(|r| r.matchups.len()).sum()
    }

    /// All keys in round-major order.
    pub fn keys(&self) -> impl Iterator<Item = MatchupKey> + '_ {
        self.rounds.iter().enumerate().flat_map(|(r, round)| {
            (0..round.matchups.len()).map(move |m| MatchupKey::new(r, m))
        })
    }

    /// Key of the championship matchup, if the last round holds exactly one.
    pub fn final_key(&self) -> Option<MatchupKey> {
        let last = self.rounds.len().checked_sub(1)?;
        (self.rounds[last].matchups.len() == 1).then_some(MatchupKey::new(last, 0))
    }

    pub fn is_final(&self, key: MatchupKey) -> bool {
        self.final_key() == Some(key)
    }

    pub fn round_label(&self, round: usize) -> String {
        if round == 0 {
            "First Round".to_string()
        } else if round + 1 == self.rounds.len() {
            "Finals".to_string()
        } else {
            format!("Round {}", round + 1)
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Round {
    pub matchups: Vec<Matchup>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matchup {
    /// None when the document leaves the slot empty; rendered as TBD.
    #[serde(default)]
    pub team1: Option<Team>,
    #[serde(default)]
    pub team2: Option<Team>,
    pub winner: Side,
}

impl Matchup {
    pub fn team(&self, side: Side) -> Option<&Team> {
        match side {
            Side::Team1 => self.team1.as_ref(),
            Side::Team2 => self.team2.as_ref(),
        }
    }

    pub fn winning_team(&self) -> Option<&Team> {
        self.team(self.winner)
    }
}

/// Which of the two slots won. Encoded as `0` / `1` in the document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Side {
    #[default]
    Team1,
    Team2,
}

impl Side {
    pub fn index(self) -> usize {
        match self {
            Side::Team1 => 0,
            Side::Team2 => 1,
        }
    }
}

impl TryFrom<u8> for Side {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Side::Team1),
            1 => Ok(Side::Team2),
            other => Err(format!("winner must be 0 or 1, got {other}")),
        }
    }
}

impl From<Side> for u8 {
    fn from(side: Side) -> Self {
        side.index() as u8
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub seed: u32,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub money: Option<Money>,
}

/// Display-only prize amount; the document may carry a number or a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Money {
    Amount(f64),
    Text(String),
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Money::Amount(v) if v.fract() == 0.0 && v.abs() < 1e15 => write!(f, "{}", *v as i64),
            Money::Amount(v) => write!(f, "{v}"),
            Money::Text(s) => f.write_str(s),
        }
    }
}

// ---------------------------------------------------------------------------
// MatchupKey: composite (round, matchup) key shared by engine and dealer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MatchupKey {
    pub round: usize,
    pub matchup: usize,
}

impl MatchupKey {
    pub const fn new(round: usize, matchup: usize) -> Self {
        Self { round, matchup }
    }
}

impl fmt::Display for MatchupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.round, self.matchup)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn team(seed: u32, name: &str) -> Team {
        Team { seed, name: name.to_string(), money: None }
    }

    pub fn matchup(a: Team, b: Team, winner: Side) -> Matchup {
        Matchup { team1: Some(a), team2: Some(b), winner }
    }

    /// Eight-team bracket, sizes [4, 2, 1]. Lower seed always wins except in
    /// the final, where team2 takes it.
    pub fn eight_team() -> Bracket {
        let r0 = Round {
            matchups: vec![
                matchup(team(1, "Ace"), team(8, "Hotshot"), Side::Team1),
                matchup(team(4, "Nuts"), team(5, "River"), Side::Team1),
                matchup(team(3, "Bluff"), team(6, "Tilt"), Side::Team1),
                matchup(team(2, "Kicker"), team(7, "Donk"), Side::Team1),
            ],
        };
        let r1 = Round {
            matchups: vec![
                matchup(team(1, "Ace"), team(4, "Nuts"), Side::Team1),
                matchup(team(3, "Bluff"), team(2, "Kicker"), Side::Team2),
            ],
        };
        let r2 = Round {
            matchups: vec![matchup(team(1, "Ace"), team(2, "Kicker"), Side::Team2)],
        };
        Bracket { title: None, rounds: vec![r0, r1, r2] }
    }

    pub fn single_final(winner: Side) -> Bracket {
        Bracket {
            title: Some("Heads Up".into()),
            rounds: vec![Round { matchups: vec![matchup(team(1, "A"), team(2, "B"), winner)] }],
        }
    }
}
