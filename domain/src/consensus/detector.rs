//! Consensus detection: merge per-model findings into agreed and
//! disputed issues.
//!
//! The merge is commutative over participant order except for first-seen
//! tie-breaks, which follow the run's participant insertion order.

use super::issue::{ConsensusIssue, ModelFinding, Verdict};
use super::parsing::extract_findings;
use super::tournament::TournamentRun;
use std::collections::{BTreeSet, HashMap};

/// Default minimum number of supporting models for an issue to count as
/// agreed
pub const DEFAULT_AGREEMENT_THRESHOLD: usize = 2;

struct IssueGroup {
    /// (model_id, description, confidence) in contribution order
    contributions: Vec<(String, String, f64)>,
}

/// Merge the successful participants' findings of `run` into a verdict.
///
/// Failed and timed-out participants contribute nothing and are not
/// counted in `total_models`. Issues are grouped by `issue_type`;
/// groups appear in the output in first-appearance order.
pub fn detect(run: &TournamentRun, agreement_threshold: usize) -> Verdict {
    let total_models = run.successful_count();

    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, IssueGroup> = HashMap::new();

    for result in run.successful() {
        let findings: Vec<ModelFinding> = result
            .payload
            .as_deref()
            .map(extract_findings)
            .unwrap_or_default();

        for finding in findings {
            let group = groups
                .entry(finding.issue_type.clone())
                .or_insert_with(|| {
                    order.push(finding.issue_type.clone());
                    IssueGroup {
                        contributions: Vec::new(),
                    }
                });
            group.contributions.push((
                result.model_id.clone(),
                finding.description,
                finding.confidence,
            ));
        }
    }

    let mut verdict = Verdict::default();

    for issue_type in order {
        let group = &groups[&issue_type];

        let supporting: BTreeSet<&str> = group
            .contributions
            .iter()
            .map(|(model, _, _)| model.as_str())
            .collect();
        let supporting_models = supporting.len();

        let confidence = group
            .contributions
            .iter()
            .map(|(_, _, c)| c)
            .sum::<f64>()
            / group.contributions.len() as f64;

        let issue = ConsensusIssue::new(
            issue_type,
            representative_description(&group.contributions),
            supporting_models,
            total_models,
            confidence,
        );

        if supporting_models >= agreement_threshold {
            verdict.agreed.push(issue);
        } else {
            verdict.disputed.push(issue);
        }
    }

    verdict
}

/// Most frequent description in the group; ties go to the first seen.
fn representative_description(contributions: &[(String, String, f64)]) -> String {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for (_, description, _) in contributions {
        *counts.entry(description.as_str()).or_default() += 1;
    }

    let mut best: Option<(&str, usize)> = None;
    for (_, description, _) in contributions {
        let count = counts[description.as_str()];
        match best {
            // Strictly-greater keeps the first-seen winner on ties
            Some((_, best_count)) if count <= best_count => {}
            _ => best = Some((description, count)),
        }
    }

    best.map(|(d, _)| d.to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consensus::tournament::ParticipantResult;

    fn payload(entries: &[(&str, &str, f64)]) -> String {
        let items: Vec<String> = entries
            .iter()
            .map(|(t, d, c)| {
                format!(r#"{{"issue_type": "{t}", "description": "{d}", "confidence": {c}}}"#)
            })
            .collect();
        format!("[{}]", items.join(","))
    }

    #[test]
    fn test_two_of_three_agreement() {
        let mut run = TournamentRun::new("r", "q");
        run.record(ParticipantResult::success(
            "a",
            payload(&[("pacing", "slow middle", 0.9)]),
            1,
        ));
        run.record(ParticipantResult::success(
            "b",
            payload(&[("pacing", "slow middle", 0.7)]),
            1,
        ));
        run.record(ParticipantResult::success("c", "[]", 1));

        let verdict = detect(&run, DEFAULT_AGREEMENT_THRESHOLD);

        assert_eq!(verdict.agreed.len(), 1);
        assert!(verdict.disputed.is_empty());
        let issue = &verdict.agreed[0];
        assert_eq!(issue.issue_type, "pacing");
        assert_eq!(issue.supporting_models, 2);
        assert_eq!(issue.total_models, 3);
        assert!((issue.support_ratio - 2.0 / 3.0).abs() < 1e-12);
        assert!((issue.confidence - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_all_distinct_issues_disputed() {
        let mut run = TournamentRun::new("r", "q");
        run.record(ParticipantResult::success(
            "a",
            payload(&[("pacing", "slow", 0.9)]),
            1,
        ));
        run.record(ParticipantResult::success(
            "b",
            payload(&[("tone", "flat", 0.8)]),
            1,
        ));
        run.record(ParticipantResult::success(
            "c",
            payload(&[("continuity", "gap", 0.7)]),
            1,
        ));

        let verdict = detect(&run, DEFAULT_AGREEMENT_THRESHOLD);

        assert!(verdict.agreed.is_empty());
        assert_eq!(verdict.disputed.len(), 3);
        for issue in &verdict.disputed {
            assert_eq!(issue.supporting_models, 1);
            assert!((issue.support_ratio - 1.0 / 3.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_failed_participants_excluded_from_math() {
        let mut run = TournamentRun::new("r", "q");
        run.record(ParticipantResult::success(
            "a",
            payload(&[("pacing", "slow", 0.8)]),
            1,
        ));
        run.record(ParticipantResult::success(
            "b",
            payload(&[("pacing", "slow", 0.6)]),
            1,
        ));
        run.record(ParticipantResult::timeout("c", 30_000));
        run.record(ParticipantResult::failure("d", "connection refused", 5));

        let verdict = detect(&run, DEFAULT_AGREEMENT_THRESHOLD);

        // total counts only the 2 successful participants
        assert_eq!(verdict.agreed[0].total_models, 2);
        assert_eq!(verdict.agreed[0].support_ratio, 1.0);
    }

    #[test]
    fn test_representative_description_most_frequent() {
        let mut run = TournamentRun::new("r", "q");
        run.record(ParticipantResult::success(
            "a",
            payload(&[("pacing", "slow middle", 0.9)]),
            1,
        ));
        run.record(ParticipantResult::success(
            "b",
            payload(&[("pacing", "drags in act two", 0.9)]),
            1,
        ));
        run.record(ParticipantResult::success(
            "c",
            payload(&[("pacing", "drags in act two", 0.9)]),
            1,
        ));

        let verdict = detect(&run, DEFAULT_AGREEMENT_THRESHOLD);
        assert_eq!(verdict.agreed[0].description, "drags in act two");
    }

    #[test]
    fn test_description_tie_broken_by_first_seen() {
        let mut run = TournamentRun::new("r", "q");
        run.record(ParticipantResult::success(
            "a",
            payload(&[("pacing", "first wording", 0.9)]),
            1,
        ));
        run.record(ParticipantResult::success(
            "b",
            payload(&[("pacing", "second wording", 0.9)]),
            1,
        ));

        let verdict = detect(&run, DEFAULT_AGREEMENT_THRESHOLD);
        assert_eq!(verdict.agreed[0].description, "first wording");
    }

    #[test]
    fn test_groups_in_first_appearance_order() {
        let mut run = TournamentRun::new("r", "q");
        run.record(ParticipantResult::success(
            "a",
            payload(&[("zeta", "z", 0.5), ("alpha", "a", 0.5)]),
            1,
        ));
        run.record(ParticipantResult::success(
            "b",
            payload(&[("middle", "m", 0.5)]),
            1,
        ));

        let verdict = detect(&run, DEFAULT_AGREEMENT_THRESHOLD);
        let types: Vec<_> = verdict
            .disputed
            .iter()
            .map(|i| i.issue_type.as_str())
            .collect();
        assert_eq!(types, vec!["zeta", "alpha", "middle"]);
    }

    #[test]
    fn test_unparseable_payload_contributes_nothing() {
        let mut run = TournamentRun::new("r", "q");
        run.record(ParticipantResult::success("a", "free-form prose", 1));
        run.record(ParticipantResult::success(
            "b",
            payload(&[("tone", "flat", 0.6)]),
            1,
        ));

        let verdict = detect(&run, DEFAULT_AGREEMENT_THRESHOLD);
        assert_eq!(verdict.issue_count(), 1);
        // The prose participant still counts in the denominator
        assert_eq!(verdict.disputed[0].total_models, 2);
    }

    #[test]
    fn test_empty_run_yields_empty_verdict() {
        let run = TournamentRun::new("r", "q");
        let verdict = detect(&run, DEFAULT_AGREEMENT_THRESHOLD);
        assert!(verdict.is_empty());
    }
}
