use crate::Bracket;
use crate::layout::{LayoutConfig, LayoutEngine};
use log::debug;
use std::fmt;
use std::path::Path;

pub type BracketResult<T> = Result<T, BracketError>;

const EMBEDDED_BRACKET_JSON: &str = include_str!("../data/sample_bracket.json");

#[derive(Debug)]
pub enum BracketError {
    Io(std::io::Error, String),
    Parse(serde_json::Error, String),
    Malformed(String),
}

impl fmt::Display for BracketError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BracketError::Io(e, path) => write!(f, "could not read {path}: {e}"),
            BracketError::Parse(e, source) => write!(f, "invalid bracket json in {source}: {e}"),
            BracketError::Malformed(msg) => write!(f, "malformed bracket: {msg}"),
        }
    }
}

impl std::error::Error for BracketError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BracketError::Io(e, _) => Some(e),
            BracketError::Parse(e, _) => Some(e),
            BracketError::Malformed(_) => None,
        }
    }
}

impl Bracket {
    /// Parse and validate a bracket document.
    pub fn from_json(json: &str) -> BracketResult<Self> {
        parse(json, "<inline>")
    }

    pub fn from_path(path: impl AsRef<Path>) -> BracketResult<Self> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let content =
            std::fs::read_to_string(path).map_err(|e| BracketError::Io(e, display.clone()))?;
        parse(&content, &display)
    }

    /// The sample bracket bundled with the crate.
    pub fn embedded() -> BracketResult<Self> {
        parse(EMBEDDED_BRACKET_JSON, "<embedded>")
    }

    /// Check the shape invariants the progression and layout rely on:
    /// a non-empty bracket, no empty rounds, halving round sizes, a
    /// single-matchup final and a terminal grid that fits `u16` coordinates.
    pub fn validate(&self) -> BracketResult<()> {
        if self.rounds.is_empty() {
            return Err(BracketError::Malformed("bracket has no rounds".into()));
        }
        for (idx, round) in self.rounds.iter().enumerate() {
            if round.matchups.is_empty() {
                return Err(BracketError::Malformed(format!("round {idx} has no matchups")));
            }
        }
        for (idx, pair) in self.rounds.windows(2).enumerate() {
            let expected = pair[0].matchups.len().div_ceil(2);
            let actual = pair[1].matchups.len();
            if actual != expected {
                return Err(BracketError::Malformed(format!(
                    "round {} has {actual} matchups, expected {expected} after round {idx}",
                    idx + 1
                )));
            }
        }
        let last = self.rounds.len() - 1;
        let finals = self.rounds[last].matchups.len();
        if finals != 1 {
            return Err(BracketError::Malformed(format!(
                "final round {last} must hold exactly one matchup, found {finals}"
            )));
        }
        let (width, height) =
            LayoutEngine::new(LayoutConfig::terminal()).extent(&self.round_sizes());
        let limit = f64::from(u16::MAX);
        if width > limit || height > limit {
            return Err(BracketError::Malformed(format!(
                "bracket needs {width}x{height} terminal cells, at most {limit} per axis fit"
            )));
        }
        Ok(())
    }
}

/// Resolve the bracket to play.
///
/// Fallback chain:
/// 1) `path`, a local bracket document, when configured.
/// 2) The embedded sample bracket.
pub fn load(path: Option<&Path>) -> BracketResult<Bracket> {
    match path {
        Some(path) => {
            debug!("loading bracket from {}", path.display());
            Bracket::from_path(path)
        }
        None => {
            debug!("no bracket path configured, using embedded sample");
            Bracket::embedded()
        }
    }
}

fn parse(json: &str, source: &str) -> BracketResult<Bracket> {
    let bracket: Bracket =
        serde_json::from_str(json).map_err(|e| BracketError::Parse(e, source.to_owned()))?;
    bracket.validate()?;
    debug!(
        "parsed bracket from {source}: {} rounds, {} matchups",
        bracket.round_count(),
        bracket.matchup_count()
    );
    Ok(bracket)
}
