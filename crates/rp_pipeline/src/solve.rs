//! TARGET + SOLVE + BUFFER stages.
//!
//! Input: a validated `Tally` and `Params`.
//! Output: the milestone to beat, the exact positives it takes, and the
//! buffered number of ratings to collect. An unreachable target stops here,
//! before anything is apportioned.

use rp_algo::{events_needed, min_positive_needed, pick_target_for, Requirement};
use rp_core::{
    variables::{Params, UnreachablePolicy},
    Tally,
};
use tracing::{debug, warn};

use crate::PipelineError;

/// Milestone chosen for this run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TargetChoice {
    pub target: u8,
    /// The picked milestone when it was unreachable and `target` replaced it.
    pub substituted_from: Option<u8>,
    pub needed_positive: u64,
}

/// Pick the next milestone and solve for it, applying the unreachable policy.
pub fn choose_target(tally: &Tally, params: &Params) -> Result<TargetChoice, PipelineError> {
    let picked = pick_target_for(tally, &params.milestones);
    debug!(picked, current = %tally.current_percent().to_decimal_string(2), "target picked");

    match min_positive_needed(tally, picked) {
        Requirement::Needed(n) => Ok(TargetChoice { target: picked, substituted_from: None, needed_positive: n }),
        Requirement::Unreachable => match params.unreachable_policy {
            UnreachablePolicy::Error => Err(unreachable(picked, tally)),
            UnreachablePolicy::Fallback => {
                let Some(lower) = params.milestones.highest_below_full() else {
                    return Err(unreachable(picked, tally));
                };
                match min_positive_needed(tally, lower) {
                    Requirement::Needed(n) => {
                        warn!(from = picked, to = lower, "target unreachable; falling back to lower milestone");
                        Ok(TargetChoice { target: lower, substituted_from: Some(picked), needed_positive: n })
                    }
                    Requirement::Unreachable => Err(unreachable(lower, tally)),
                }
            }
        },
    }
}

/// Total ratings to collect for `choice` under the configured risk strategy.
pub fn buffered_events(tally: &Tally, choice: &TargetChoice, params: &Params) -> Result<u64, PipelineError> {
    match events_needed(params.buffer_strategy, tally, choice.target, choice.needed_positive, params.risk) {
        Requirement::Needed(n) => {
            debug!(
                needed = choice.needed_positive,
                events = n,
                strategy = %params.buffer_strategy,
                risk = %params.risk.percent_display(),
                "requirement buffered"
            );
            Ok(n)
        }
        Requirement::Unreachable => Err(PipelineError::Unreachable {
            target: choice.target,
            reason: format!(
                "with {} of new ratings negative the ratio cannot rise above {}%",
                params.risk.percent_display(),
                choice.target
            ),
        }),
    }
}

fn unreachable(target: u8, tally: &Tally) -> PipelineError {
    PipelineError::Unreachable {
        target,
        reason: format!("{} negative rating(s) already recorded", tally.negative()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rp_core::variables::{BufferStrategy, Milestones, RiskFraction};

    fn tally(total: u64, positive: u64) -> Tally {
        Tally::new(total, positive).unwrap()
    }

    #[test]
    fn picks_and_solves() {
        let c = choose_target(&tally(100, 80), &Params::default()).unwrap();
        assert_eq!(c, TargetChoice { target: 90, substituted_from: None, needed_positive: 101 });

        let c = choose_target(&tally(50, 50), &Params::default()).unwrap();
        assert_eq!(c, TargetChoice { target: 100, substituted_from: None, needed_positive: 0 });
    }

    #[test]
    fn unreachable_full_target_is_error_by_default() {
        let err = choose_target(&tally(1000, 999), &Params::default()).unwrap_err();
        assert!(matches!(err, PipelineError::Unreachable { target: 100, .. }));

        let only_full = Params { milestones: Milestones::new(vec![100]).unwrap(), ..Params::default() };
        let err = choose_target(&tally(50, 45), &only_full).unwrap_err();
        assert!(err.to_string().contains("5 negative rating(s)"));
    }

    #[test]
    fn fallback_uses_highest_milestone_below_full() {
        let params = Params { unreachable_policy: UnreachablePolicy::Fallback, ..Params::default() };
        // 1000/999 sits above every milestone below 100.
        let c = choose_target(&tally(1000, 999), &params).unwrap();
        assert_eq!(c.target, 99);
        assert_eq!(c.substituted_from, Some(100));
        assert_eq!(c.needed_positive, 0);

        // 50/45 = 90%: the 93 milestone is picked directly, no fallback involved.
        let c = choose_target(&tally(50, 45), &params).unwrap();
        assert_eq!(c.substituted_from, None);
    }

    #[test]
    fn fallback_without_lower_milestone_still_fails() {
        let params = Params {
            unreachable_policy: UnreachablePolicy::Fallback,
            milestones: Milestones::new(vec![100]).unwrap(),
            ..Params::default()
        };
        assert!(choose_target(&tally(10, 9), &params).is_err());
    }

    #[test]
    fn buffering_follows_strategy() {
        let t = tally(100, 80);
        let c = choose_target(&t, &Params::default()).unwrap();
        assert_eq!(buffered_events(&t, &c, &Params::default()).unwrap(), 119);

        let strict = Params { buffer_strategy: BufferStrategy::Strict, ..Params::default() };
        assert!(matches!(buffered_events(&t, &c, &strict), Err(PipelineError::Unreachable { target: 90, .. })));

        let strict_low = Params { risk: RiskFraction::from_f64(0.05).unwrap(), ..strict };
        assert!(buffered_events(&t, &c, &strict_low).unwrap() > 101);
    }
}
