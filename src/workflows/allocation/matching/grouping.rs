use std::collections::HashMap;

use super::config::MatchingConfig;
use super::scorer::CompatibilityScorer;
use crate::workflows::allocation::domain::{Student, StudentId};

/// A transient set of students slated to share one room. `fallback` marks
/// groups chunked from leftovers without a mutual-compatibility guarantee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoommateGroup {
    pub members: Vec<StudentId>,
    pub fallback: bool,
}

impl RoommateGroup {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Greedy roommate group former.
///
/// Students are indexed once per run by slice position; pair scores are keyed
/// by the unordered index pair. The pass is deterministic for a fixed input
/// order: pairs sort by `(score, i, j)` and candidate scans run in index
/// order, so identical input yields identical groups.
#[derive(Debug, Clone)]
pub struct GroupFormer {
    scorer: CompatibilityScorer,
}

impl GroupFormer {
    pub fn new(config: MatchingConfig) -> Self {
        Self {
            scorer: CompatibilityScorer::new(config),
        }
    }

    pub fn scorer(&self) -> &CompatibilityScorer {
        &self.scorer
    }

    /// Partition `students` into disjoint groups of at most `max_group_size`
    /// members. Compatible groups come first in formation order; leftovers
    /// are chunked in input order at the end so nobody is left unhoused.
    pub fn form_groups(&self, students: &[Student], max_group_size: usize) -> Vec<RoommateGroup> {
        let max_group_size = max_group_size.max(1);
        if students.len() < 2 {
            return students
                .iter()
                .map(|s| RoommateGroup {
                    members: vec![s.id],
                    fallback: false,
                })
                .collect();
        }

        let n = students.len();
        let mut scores: HashMap<(usize, usize), f64> = HashMap::new();
        let mut pairs: Vec<(usize, usize, f64)> = Vec::new();
        for i in 0..n {
            for j in (i + 1)..n {
                if let Some(score) = self.scorer.score_students(&students[i], &students[j]) {
                    scores.insert((i, j), score);
                    pairs.push((i, j, score));
                }
            }
        }
        pairs.sort_by(|a, b| a.2.total_cmp(&b.2).then_with(|| (a.0, a.1).cmp(&(b.0, b.1))));

        let mut assigned = vec![false; n];
        let mut groups = Vec::new();

        for &(i, j, _) in &pairs {
            if assigned[i] || assigned[j] {
                continue;
            }
            let mut group = vec![i, j];
            assigned[i] = true;
            assigned[j] = true;

            if max_group_size > 2 {
                for k in 0..n {
                    if assigned[k] || group.len() >= max_group_size {
                        continue;
                    }
                    // Admit only candidates with a defined score against
                    // every current member whose average stays below the
                    // threshold; a single undefined pair disqualifies.
                    let mut total = 0.0;
                    let mut compatible = true;
                    for &member in &group {
                        let key = (k.min(member), k.max(member));
                        match scores.get(&key) {
                            Some(score) => total += score,
                            None => {
                                compatible = false;
                                break;
                            }
                        }
                    }
                    if compatible
                        && total / (group.len() as f64)
                            < self.scorer.config().group_admission_threshold
                    {
                        group.push(k);
                        assigned[k] = true;
                    }
                }
            }

            groups.push(RoommateGroup {
                members: group.iter().map(|&idx| students[idx].id).collect(),
                fallback: false,
            });
        }

        // Leftovers go into fixed-size chunks in input order; these carry no
        // compatibility guarantee but keep everyone housed.
        let unassigned: Vec<StudentId> = (0..n)
            .filter(|&idx| !assigned[idx])
            .map(|idx| students[idx].id)
            .collect();
        for chunk in unassigned.chunks(max_group_size) {
            groups.push(RoommateGroup {
                members: chunk.to_vec(),
                fallback: true,
            });
        }

        groups
    }

    /// Mean of the defined pairwise scores among `members`; 0.0 when fewer
    /// than two members or no pair is scorable.
    pub fn average_compatibility(&self, members: &[&Student]) -> f64 {
        if members.len() < 2 {
            return 0.0;
        }
        let mut total = 0.0;
        let mut count = 0usize;
        for i in 0..members.len() {
            for j in (i + 1)..members.len() {
                if let Some(score) = self.scorer.score_students(members[i], members[j]) {
                    total += score;
                    count += 1;
                }
            }
        }
        if count == 0 {
            0.0
        } else {
            total / count as f64
        }
    }
}
