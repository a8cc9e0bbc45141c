/// Tunable constants for the three-tier compatibility evaluation and the
/// greedy group former. Passed in at construction so tests and deployments
/// can tune them without touching the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchingConfig {
    /// Decimal hour substituted when a profile has no wake-up time (8 AM).
    pub default_wake_hour: f64,
    /// Tier 1: maximum wake-time difference, in hours, before a pair is
    /// hard-incompatible.
    pub chronotype_tolerance_hours: f64,
    /// Tier 2: weight on the cleanliness delta (critical priority).
    pub cleanliness_weight: f64,
    /// Tier 2: weight on the guest-tolerance delta.
    pub guest_tolerance_weight: f64,
    /// Tier 2: flat penalty when darkness requirements differ.
    pub darkness_mismatch_penalty: f64,
    /// Tier 3: combined dominance above this sum marks two alphas.
    pub dominance_sum_threshold: u8,
    /// Tier 3: penalty applied to an alpha-alpha pair.
    pub dominance_penalty: f64,
    /// Tier 3: dominance gap at or above this earns the complementarity bonus.
    pub complementarity_gap: u8,
    /// Tier 3: bonus subtracted for a complementary pair.
    pub complementarity_bonus: f64,
    /// Group former: a candidate joins a group only while its average score
    /// against the members stays below this.
    pub group_admission_threshold: f64,
    /// Upper bound on roommate group size (room capacity).
    pub max_group_size: usize,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            default_wake_hour: 8.0,
            chronotype_tolerance_hours: 2.0,
            cleanliness_weight: 3.0,
            guest_tolerance_weight: 2.0,
            darkness_mismatch_penalty: 5.0,
            dominance_sum_threshold: 8,
            dominance_penalty: 15.0,
            complementarity_gap: 2,
            complementarity_bonus: 2.0,
            group_admission_threshold: 20.0,
            max_group_size: 4,
        }
    }
}
