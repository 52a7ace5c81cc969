use bracket_engine::{Bracket, Matchup, Team};
use serde::Serialize;
use std::path::Path;

/// Summary printed by `--check`.
#[derive(Debug, Serialize)]
pub struct CheckReport {
    pub path: String,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rounds: Vec<RoundSummary>,
    pub matchups: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub champion: Option<Team>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RoundSummary {
    pub label: String,
    pub matchups: usize,
}

pub fn check_bracket(path: &Path) -> CheckReport {
    let display = path.display().to_string();
    match Bracket::from_path(path) {
        Ok(bracket) => summarize(display, &bracket),
        Err(e) => CheckReport {
            path: display,
            ok: false,
            title: None,
            rounds: Vec::new(),
            matchups: 0,
            champion: None,
            error: Some(e.to_string()),
        },
    }
}

fn summarize(path: String, bracket: &Bracket) -> CheckReport {
    let rounds = bracket
        .rounds
        .iter()
        .enumerate()
        .map(|(idx, round)| RoundSummary {
            label: bracket.round_label(idx),
            matchups: round.matchups.len(),
        })
        .collect();
    let champion = bracket
        .final_key()
        .and_then(|key| bracket.matchup(key))
        .and_then(Matchup::winning_team)
        .cloned();

    CheckReport {
        path,
        ok: true,
        title: Some(bracket.title().to_string()),
        rounds,
        matchups: bracket.matchup_count(),
        champion,
        error: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(name: &str, content: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("dealtui-check-{}-{name}", std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn summarizes_the_sample_bracket() {
        let report = summarize("<embedded>".into(), &Bracket::embedded().unwrap());
        assert!(report.ok);
        assert_eq!(report.matchups, 7);
        let labels: Vec<&str> = report.rounds.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, ["First Round", "Round 2", "Finals"]);
        assert_eq!(report.champion.map(|t| t.name), Some("PotOdds".to_string()));
    }

    #[test]
    fn reports_malformed_file() {
        let path = write_temp(
            "bad.json",
            r#"{"rounds":[{"matchups":[]}]}"#,
        );
        let report = check_bracket(&path);
        std::fs::remove_file(&path).ok();
        assert!(!report.ok);
        assert!(report.error.unwrap().contains("round 0 has no matchups"));

        let json = serde_json::to_value(check_bracket(Path::new("/no/such/bracket.json"))).unwrap();
        assert_eq!(json["ok"], false);
        assert!(json.get("rounds").is_none());
    }

    #[test]
    fn checks_file_on_disk() {
        let path = write_temp(
            "final.json",
            r#"{"rounds":[{"matchups":[{"team1":{"seed":1,"name":"A"},"team2":{"seed":2,"name":"B"},"winner":0}]}]}"#,
        );
        let report = check_bracket(&path);
        std::fs::remove_file(&path).ok();
        assert!(report.ok);
        assert_eq!(report.rounds.len(), 1);
        assert_eq!(report.champion.map(|t| t.seed), Some(1));
    }
}
