//! Which page overlays show in each phase

use crate::highscores::RunSummary;
use crate::sim::Phase;

/// `(element id, visible)` for every phase-driven overlay. `new-best` is only
/// listed once a run has ended, so a stale badge is left to the host markup.
pub fn overlay_visibility(phase: Phase, summary: Option<RunSummary>) -> Vec<(&'static str, bool)> {
    let mut overlays = vec![
        ("start-btn", phase == Phase::Setup),
        ("ready-prompt", phase == Phase::Ready),
        ("game-over", phase == Phase::GameOver),
    ];
    if let Some(summary) = summary {
        overlays.push(("new-best", summary.new_best));
    }
    overlays
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shown(overlays: &[(&'static str, bool)]) -> Vec<&'static str> {
        overlays.iter().filter(|(_, v)| *v).map(|(id, _)| *id).collect()
    }

    #[test]
    fn test_one_overlay_per_phase() {
        assert_eq!(shown(&overlay_visibility(Phase::Setup, None)), vec!["start-btn"]);
        assert_eq!(shown(&overlay_visibility(Phase::Ready, None)), vec!["ready-prompt"]);
        assert!(shown(&overlay_visibility(Phase::Playing, None)).is_empty());
    }

    #[test]
    fn test_new_best_badge_follows_summary() {
        let summary = RunSummary {
            score: 4,
            high_score: 4,
            new_best: true,
        };
        let overlays = overlay_visibility(Phase::GameOver, Some(summary));
        assert_eq!(shown(&overlays), vec!["game-over", "new-best"]);

        let tie = RunSummary {
            new_best: false,
            ..summary
        };
        let overlays = overlay_visibility(Phase::GameOver, Some(tie));
        assert!(overlays.contains(&("new-best", false)));
    }
}
