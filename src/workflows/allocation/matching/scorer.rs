use chrono::Timelike;

use super::config::MatchingConfig;
use crate::workflows::allocation::domain::{Student, SurveyProfile};

/// Pairwise compatibility scorer. Lower scores are better; `None` marks a
/// hard-incompatible pair that must never share a room.
///
/// Evaluation runs in three tiers, short-circuiting on the first:
/// 1. chronotype filter: wake-up times more than the tolerance apart are
///    incompatible outright;
/// 2. weighted Euclidean distance over cleanliness and guest tolerance, plus
///    a flat penalty when darkness requirements differ;
/// 3. social adjustment: penalize two dominant personalities, reward a
///    complementary dominance gap.
#[derive(Debug, Clone)]
pub struct CompatibilityScorer {
    config: MatchingConfig,
}

impl CompatibilityScorer {
    pub fn new(config: MatchingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MatchingConfig {
        &self.config
    }

    /// Score two survey profiles. Symmetric in its arguments.
    pub fn score(&self, a: &SurveyProfile, b: &SurveyProfile) -> Option<f64> {
        let wake_a = self.wake_hours(a);
        let wake_b = self.wake_hours(b);
        if (wake_a - wake_b).abs() > self.config.chronotype_tolerance_hours {
            return None;
        }

        let clean_diff = f64::from(a.cleanliness) - f64::from(b.cleanliness);
        let guest_diff = f64::from(a.guest_tolerance) - f64::from(b.guest_tolerance);
        let mut distance = (self.config.cleanliness_weight * clean_diff.powi(2)
            + self.config.guest_tolerance_weight * guest_diff.powi(2))
        .sqrt();
        if a.requires_darkness != b.requires_darkness {
            distance += self.config.darkness_mismatch_penalty;
        }

        let dominance_sum = a.dominance + b.dominance;
        if dominance_sum > self.config.dominance_sum_threshold {
            distance += self.config.dominance_penalty;
        } else if a.dominance.abs_diff(b.dominance) >= self.config.complementarity_gap {
            distance -= self.config.complementarity_bonus;
        }

        Some(distance)
    }

    /// Score two students, treating a missing survey profile on either side
    /// as unscorable rather than defaulting it.
    pub fn score_students(&self, a: &Student, b: &Student) -> Option<f64> {
        match (&a.profile, &b.profile) {
            (Some(pa), Some(pb)) => self.score(pa, pb),
            _ => None,
        }
    }

    fn wake_hours(&self, profile: &SurveyProfile) -> f64 {
        match profile.wake_up_time {
            Some(time) => f64::from(time.hour()) + f64::from(time.minute()) / 60.0,
            None => self.config.default_wake_hour,
        }
    }
}
