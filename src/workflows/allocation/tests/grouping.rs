use std::collections::BTreeSet;

use super::common::*;
use crate::workflows::allocation::domain::{Gender, Student, StudentId};
use crate::workflows::allocation::matching::{GroupFormer, MatchingConfig};

fn former() -> GroupFormer {
    GroupFormer::new(MatchingConfig::default())
}

fn member_ids(students: &[Student]) -> BTreeSet<StudentId> {
    students.iter().map(|s| s.id).collect()
}

#[test]
fn empty_pool_forms_no_groups() {
    assert!(former().form_groups(&[], 4).is_empty());
}

#[test]
fn single_student_forms_a_singleton() {
    let students = vec![student(1, Gender::Male, Some(baseline_profile()))];
    let groups = former().form_groups(&students, 4);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].members, vec![StudentId(1)]);
    assert!(!groups[0].fallback);
}

#[test]
fn groups_partition_the_input_exactly() {
    let mut students = compatible_quad();
    // A night owl nobody matches and an incomplete profile.
    students.push(student(
        5,
        Gender::Male,
        Some(profile(wake(11, 0), true, 2, 5, 5)),
    ));
    students.push(student(6, Gender::Male, None));

    let groups = former().form_groups(&students, 4);

    let mut seen = BTreeSet::new();
    for group in &groups {
        assert!(group.len() <= 4, "group exceeds max size");
        assert!(!group.is_empty());
        for member in &group.members {
            assert!(seen.insert(*member), "student {member:?} appears twice");
        }
    }
    assert_eq!(seen, member_ids(&students), "every student must be placed");
}

#[test]
fn identical_input_order_gives_identical_groups() {
    let mut students = compatible_quad();
    students.push(student(
        5,
        Gender::Male,
        Some(profile(wake(10, 0), true, 1, 5, 5)),
    ));
    let former = former();
    let first = former.form_groups(&students, 3);
    let second = former.form_groups(&students, 3);
    assert_eq!(first, second);
}

#[test]
fn four_compatible_students_form_one_full_group() {
    let students = compatible_quad();
    let groups = former().form_groups(&students, 4);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].len(), 4);
    assert!(!groups[0].fallback);
    assert_eq!(member_ids(&students), groups[0].members.iter().copied().collect());
}

#[test]
fn chronotype_clusters_never_mix() {
    // Two clusters four-plus hours apart in wake time with opposite
    // darkness preferences.
    let mut students = Vec::new();
    for id in 1..=4 {
        students.push(student(
            id,
            Gender::Male,
            Some(profile(wake(6, 0), false, 4, 2, u8::try_from(id).unwrap())),
        ));
    }
    for id in 5..=8 {
        students.push(student(
            id,
            Gender::Male,
            Some(profile(wake(10, 30), true, 4, 2, u8::try_from(id - 4).unwrap())),
        ));
    }

    let early: BTreeSet<StudentId> = (1..=4).map(StudentId).collect();
    let late: BTreeSet<StudentId> = (5..=8).map(StudentId).collect();

    for group in former().form_groups(&students, 4) {
        let members: BTreeSet<StudentId> = group.members.iter().copied().collect();
        assert!(
            members.is_subset(&early) || members.is_subset(&late),
            "group mixes chronotype clusters: {members:?}"
        );
    }
}

#[test]
fn candidate_above_admission_threshold_is_left_out() {
    // s1 and s2 are a perfect pair; s3 is scorable against both but the
    // behavioral distance, darkness mismatch, and alpha-alpha penalty
    // against s1 push the average past the threshold
    // ((28.94 + 11.94) / 2 ≈ 20.44).
    let students = vec![
        student(1, Gender::Male, Some(profile(wake(6, 0), false, 5, 5, 5))),
        student(2, Gender::Male, Some(profile(wake(6, 0), false, 5, 5, 1))),
        student(3, Gender::Male, Some(profile(wake(6, 0), true, 1, 1, 5))),
    ];
    let groups = former().form_groups(&students, 4);
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].members, vec![StudentId(1), StudentId(2)]);
    assert!(!groups[0].fallback);
    assert_eq!(groups[1].members, vec![StudentId(3)]);
    assert!(groups[1].fallback);
}

#[test]
fn candidate_without_a_score_against_every_member_is_skipped() {
    // s3 is within tolerance of s1 but not of s2, so it can never join
    // their group even though one pairing is defined.
    let students = vec![
        student(1, Gender::Male, Some(profile(wake(6, 0), false, 3, 3, 3))),
        student(2, Gender::Male, Some(profile(wake(7, 30), false, 3, 3, 3))),
        student(3, Gender::Male, Some(profile(wake(5, 0), false, 3, 3, 3))),
    ];
    let groups = former().form_groups(&students, 4);
    let first: BTreeSet<StudentId> = groups[0].members.iter().copied().collect();
    assert_eq!(first, [StudentId(1), StudentId(2)].into_iter().collect());
    assert_eq!(groups[1].members, vec![StudentId(3)]);
    assert!(groups[1].fallback);
}

#[test]
fn leftovers_are_chunked_in_input_order() {
    // Wake times fan out so no pair is within tolerance.
    let hours = [5, 8, 11, 14, 17];
    let students: Vec<Student> = hours
        .iter()
        .enumerate()
        .map(|(idx, &hour)| {
            student(
                idx as u32 + 1,
                Gender::Female,
                Some(profile(wake(hour, 0), false, 3, 3, 3)),
            )
        })
        .collect();

    let groups = former().form_groups(&students, 2);
    assert_eq!(groups.len(), 3);
    assert!(groups.iter().all(|g| g.fallback));
    assert_eq!(groups[0].members, vec![StudentId(1), StudentId(2)]);
    assert_eq!(groups[1].members, vec![StudentId(3), StudentId(4)]);
    assert_eq!(groups[2].members, vec![StudentId(5)]);
}

#[test]
fn average_compatibility_of_small_or_unscorable_groups_is_zero() {
    let former = former();
    let solo = student(1, Gender::Male, Some(baseline_profile()));
    assert_eq!(former.average_compatibility(&[&solo]), 0.0);

    let early = student(2, Gender::Male, Some(profile(wake(5, 0), false, 3, 3, 3)));
    let late = student(3, Gender::Male, Some(profile(wake(11, 0), false, 3, 3, 3)));
    assert_eq!(former.average_compatibility(&[&early, &late]), 0.0);
}

#[test]
fn average_compatibility_is_the_mean_of_defined_pair_scores() {
    let former = former();
    let a = student(1, Gender::Male, Some(profile(wake(6, 0), false, 4, 3, 3)));
    let b = student(2, Gender::Male, Some(profile(wake(6, 0), false, 3, 3, 3)));
    let average = former.average_compatibility(&[&a, &b]);
    assert!((average - 3.0_f64.sqrt()).abs() < 1e-9);
}
