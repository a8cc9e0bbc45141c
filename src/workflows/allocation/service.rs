use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use super::domain::{
    Allocation, AllocationId, Gender, Hostel, HostelId, RequestStatus, Room, RoomId, RoomStatus,
    Student, StudentId, StudentRole, Term,
};
use super::matching::{GroupFormer, MatchingConfig, RoommateGroup};
use super::report::{
    AllocationView, GenderPreview, GroupMemberView, GroupPreview, PreviewReport, ResetOutcome,
    RunOutcome,
};
use super::repository::{HousingStore, StoreError, StoreState};

/// Which rule decides who is eligible for an allocation run. The policy is
/// chosen once through configuration; the service never mixes the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EligibilityPolicy {
    /// Unallocated, profile complete, and holding a pending accommodation
    /// request for the term. The preferred policy.
    RequestGated,
    /// Unallocated and profile complete. Fallback for deployments without a
    /// request subsystem.
    ProfileComplete,
}

/// Error raised by the allocation service.
#[derive(Debug, thiserror::Error)]
pub enum AllocationServiceError {
    #[error("reset is destructive and requires confirm=true")]
    ConfirmationRequired,
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Facade composing eligibility selection, the matching engine, hostel/room
/// selection, and the transactional committer over a [`HousingStore`].
pub struct AllocationService<S> {
    store: Arc<S>,
    former: GroupFormer,
    policy: EligibilityPolicy,
    max_group_size: usize,
}

impl<S> AllocationService<S>
where
    S: HousingStore + 'static,
{
    pub fn new(store: Arc<S>, config: MatchingConfig, policy: EligibilityPolicy) -> Self {
        let max_group_size = config.max_group_size.max(1);
        Self {
            store,
            former: GroupFormer::new(config),
            policy,
            max_group_size,
        }
    }

    /// Run the full allocation for a term: per gender, select eligible
    /// students, form roommate groups, pick a hostel and room per group, and
    /// take beds. The whole run commits atomically; a concurrent commit
    /// fails the run with [`StoreError::Conflict`] and the caller retries.
    pub fn run(&self, term: &Term) -> Result<RunOutcome, AllocationServiceError> {
        let mut tx = self.store.snapshot()?;
        let mut allocated = 0usize;
        let mut next_allocation_id = tx
            .state
            .allocations
            .iter()
            .map(|a| a.id.0)
            .max()
            .unwrap_or(0)
            + 1;

        for gender in Gender::ordered() {
            let students = self.eligible_students(&tx.state, term, gender, None);
            if students.is_empty() {
                continue;
            }
            let groups = self.former.form_groups(&students, self.max_group_size);
            debug!(
                gender = gender.label(),
                eligible = students.len(),
                groups = groups.len(),
                "formed roommate groups"
            );

            for group in &groups {
                let Some(first) = group.members.first().and_then(|id| tx.state.student(*id))
                else {
                    continue;
                };
                let Some(hostel_id) = suitable_hostel(&tx.state, first).map(|h| h.id) else {
                    warn!(
                        gender = gender.label(),
                        students = group.len(),
                        "no suitable hostel; skipping group"
                    );
                    continue;
                };
                let Some(room_id) = room_for_group(&tx.state, hostel_id).map(|r| r.id) else {
                    warn!(
                        gender = gender.label(),
                        hostel = hostel_id.0,
                        students = group.len(),
                        "no room with free beds; skipping group"
                    );
                    continue;
                };
                allocated +=
                    allocate_group(&mut tx.state, group, room_id, term, &mut next_allocation_id);
            }
        }

        self.store.commit(tx)?;
        info!(term = %term, allocated, "allocation run committed");
        Ok(RunOutcome { allocated })
    }

    /// Dry run: eligibility and group formation only, no hostel or room
    /// selection and no writes.
    pub fn preview(&self, term: &Term) -> Result<PreviewReport, AllocationServiceError> {
        let snapshot = self.store.snapshot()?;
        let mut report = PreviewReport {
            term: term.clone(),
            male: GenderPreview::default(),
            female: GenderPreview::default(),
        };

        for gender in Gender::ordered() {
            let students = self.eligible_students(&snapshot.state, term, gender, None);
            let mut preview = GenderPreview {
                eligible: students.len(),
                groups: Vec::new(),
            };
            if !students.is_empty() {
                for group in self.former.form_groups(&students, self.max_group_size) {
                    let members: Vec<&Student> = group
                        .members
                        .iter()
                        .filter_map(|id| snapshot.state.student(*id))
                        .collect();
                    preview.groups.push(GroupPreview {
                        average_compatibility: self.former.average_compatibility(&members),
                        members: members.iter().map(|s| GroupMemberView::from_student(s)).collect(),
                        fallback: group.fallback,
                    });
                }
            }
            match gender {
                Gender::Male => report.male = preview,
                Gender::Female => report.female = preview,
            }
        }

        Ok(report)
    }

    /// Destructive reversal of committed allocations. Scoped to `term` when
    /// given, otherwise everything. Rejected before any read or write unless
    /// `confirm` is set.
    pub fn reset(
        &self,
        term: Option<&Term>,
        confirm: bool,
    ) -> Result<ResetOutcome, AllocationServiceError> {
        if !confirm {
            return Err(AllocationServiceError::ConfirmationRequired);
        }

        let mut tx = self.store.snapshot()?;
        let (cleared, kept): (Vec<Allocation>, Vec<Allocation>) = tx
            .state
            .allocations
            .drain(..)
            .partition(|a| term.map_or(true, |t| &a.term == t));
        tx.state.allocations = kept;

        let mut beds_freed = 0usize;
        let mut requests_reset = 0usize;
        for allocation in &cleared {
            if let Some(bed) = allocation.bed.and_then(|id| tx.state.bed_mut(id)) {
                if bed.is_occupied {
                    bed.is_occupied = false;
                    beds_freed += 1;
                }
            }
            let student = allocation.student;
            let request_term = allocation.term.clone();
            if let Some(request) = tx.state.requests.iter_mut().find(|r| {
                r.student == student && r.term == request_term && r.status == RequestStatus::Allocated
            }) {
                request.status = RequestStatus::Pending;
                requests_reset += 1;
            }
        }

        let room_ids: Vec<_> = tx.state.rooms.iter().map(|r| r.id).collect();
        for room in room_ids {
            tx.state.refresh_room_status(room);
        }

        self.store.commit(tx)?;
        let outcome = ResetOutcome {
            cleared: cleared.len(),
            beds_freed,
            requests_reset,
        };
        info!(
            term = term.map(|t| t.0.as_str()).unwrap_or("all"),
            cleared = outcome.cleared,
            beds_freed = outcome.beds_freed,
            requests_reset = outcome.requests_reset,
            "allocations reset"
        );
        Ok(outcome)
    }

    /// Self-service lookup of a student's active allocation.
    pub fn my_allocation(
        &self,
        student: StudentId,
    ) -> Result<Option<AllocationView>, AllocationServiceError> {
        let snapshot = self.store.snapshot()?;
        Ok(snapshot
            .state
            .active_allocation(student)
            .and_then(|a| AllocationView::from_allocation(&snapshot.state, a)))
    }

    /// Admin listing, optionally filtered by term and hostel.
    pub fn list_allocations(
        &self,
        term: Option<&Term>,
        hostel: Option<HostelId>,
    ) -> Result<Vec<AllocationView>, AllocationServiceError> {
        let snapshot = self.store.snapshot()?;
        let state = &snapshot.state;
        let mut views: Vec<AllocationView> = state
            .allocations
            .iter()
            .filter(|a| term.map_or(true, |t| &a.term == t))
            .filter_map(|a| AllocationView::from_allocation(state, a))
            .filter(|v| hostel.map_or(true, |h| v.hostel_id == h))
            .collect();
        views.sort_by_key(|v| v.allocation_id);
        Ok(views)
    }

    /// Students eligible for allocation under the configured policy, in
    /// ascending id order so every downstream pass stays deterministic.
    pub(crate) fn eligible_students(
        &self,
        state: &StoreState,
        term: &Term,
        gender: Gender,
        batch: Option<&str>,
    ) -> Vec<Student> {
        let mut students: Vec<Student> = state
            .students
            .iter()
            .filter(|s| s.role == StudentRole::Student)
            .filter(|s| s.gender == gender)
            .filter(|s| s.is_profile_complete())
            .filter(|s| state.active_allocation(s.id).is_none())
            .filter(|s| batch.map_or(true, |b| s.batch.as_deref() == Some(b)))
            .filter(|s| match self.policy {
                EligibilityPolicy::ProfileComplete => true,
                EligibilityPolicy::RequestGated => state.requests.iter().any(|r| {
                    r.student == s.id && &r.term == term && r.status == RequestStatus::Pending
                }),
            })
            .cloned()
            .collect();
        students.sort_by_key(|s| s.id);
        students
    }
}

/// Hostel choice for a student: gender must match; prefer the first hostel
/// (ascending id) admitting the student's batch, then any gender match.
/// Students without a parsed batch only match hostels open to any batch
/// before the fallback.
pub(crate) fn suitable_hostel<'a>(state: &'a StoreState, student: &Student) -> Option<&'a Hostel> {
    let mut candidates: Vec<&Hostel> = state
        .hostels
        .iter()
        .filter(|h| h.gender_type == student.gender)
        .collect();
    candidates.sort_by_key(|h| h.id);

    let batch_match = candidates.iter().find(|h| match &student.batch {
        Some(batch) => h.admits_batch(batch),
        None => h.allowed_batches.is_empty(),
    });
    batch_match.copied().or_else(|| candidates.first().copied())
}

/// Room choice inside a hostel: prefer an `Available` room with a free bed,
/// fall back to any room with a free bed regardless of status. Ascending
/// room id keeps the choice stable.
pub(crate) fn room_for_group(state: &StoreState, hostel: HostelId) -> Option<&Room> {
    let has_free_bed =
        |room: &Room| state.beds.iter().any(|b| b.room == room.id && !b.is_occupied);
    state
        .rooms
        .iter()
        .filter(|r| r.hostel == hostel && r.status == RoomStatus::Available && has_free_bed(r))
        .min_by_key(|r| r.id)
        .or_else(|| {
            state
                .rooms
                .iter()
                .filter(|r| r.hostel == hostel && has_free_bed(r))
                .min_by_key(|r| r.id)
        })
}

/// Assign up to `group.len()` free beds of `room` to the group's members in
/// stable bed order, recording allocations and transitioning any pending
/// request for the term. Members beyond the available beds stay unallocated
/// for a future run. Returns how many students were placed.
fn allocate_group(
    state: &mut StoreState,
    group: &RoommateGroup,
    room: RoomId,
    term: &Term,
    next_allocation_id: &mut u32,
) -> usize {
    let beds = state.unoccupied_beds(room);
    let mut placed = 0usize;

    for (student, bed) in group.members.iter().copied().zip(beds) {
        state.allocations.push(Allocation {
            id: AllocationId(*next_allocation_id),
            student,
            room,
            bed: Some(bed),
            term: term.clone(),
            created_at: Utc::now(),
        });
        *next_allocation_id += 1;
        if let Some(b) = state.bed_mut(bed) {
            b.is_occupied = true;
        }
        if let Some(request) = state.requests.iter_mut().find(|r| {
            r.student == student && &r.term == term && r.status == RequestStatus::Pending
        }) {
            request.status = RequestStatus::Allocated;
        }
        placed += 1;
    }

    state.refresh_room_status(room);
    placed
}
