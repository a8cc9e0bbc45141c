use chrono::{DateTime, Utc};
use serde::Serialize;

use super::domain::{
    Allocation, AllocationId, BedId, Gender, HostelId, RoomId, Student, StudentId, Term,
};
use super::repository::StoreState;

/// Summary returned by an allocation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunOutcome {
    pub allocated: usize,
}

/// Counts returned by a reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResetOutcome {
    pub cleared: usize,
    pub beds_freed: usize,
    pub requests_reset: usize,
}

/// Joined allocation record for self-service lookups and admin listings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllocationView {
    pub allocation_id: AllocationId,
    pub student_id: StudentId,
    pub student_email: String,
    pub hostel_id: HostelId,
    pub hostel_name: String,
    pub room_id: RoomId,
    pub room_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bed_id: Option<BedId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bed_number: Option<String>,
    pub term: Term,
    pub created_at: DateTime<Utc>,
}

impl AllocationView {
    /// Build the view from an allocation, resolving room, hostel, bed, and
    /// student labels from the snapshot. Returns `None` only for a dangling
    /// reference, which a committed state never contains.
    pub(crate) fn from_allocation(state: &StoreState, allocation: &Allocation) -> Option<Self> {
        let student = state.student(allocation.student)?;
        let room = state.room(allocation.room)?;
        let hostel = state.hostels.iter().find(|h| h.id == room.hostel)?;
        let bed = allocation
            .bed
            .and_then(|id| state.beds.iter().find(|b| b.id == id));
        Some(Self {
            allocation_id: allocation.id,
            student_id: student.id,
            student_email: student.email.clone(),
            hostel_id: hostel.id,
            hostel_name: hostel.name.clone(),
            room_id: room.id,
            room_number: room.room_number.clone(),
            bed_id: allocation.bed,
            bed_number: bed.map(|b| b.bed_number.clone()),
            term: allocation.term.clone(),
            created_at: allocation.created_at,
        })
    }
}

/// Member line inside a previewed group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupMemberView {
    pub student_id: StudentId,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enrollment_number: Option<String>,
    pub full_name: String,
}

impl GroupMemberView {
    pub(crate) fn from_student(student: &Student) -> Self {
        Self {
            student_id: student.id,
            email: student.email.clone(),
            enrollment_number: student.enrollment_number.clone(),
            full_name: student.full_name.clone(),
        }
    }
}

/// One previewed roommate group with its mean pairwise compatibility (lower
/// is better; 0.0 for singletons or unscorable fallback groups).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupPreview {
    pub members: Vec<GroupMemberView>,
    pub average_compatibility: f64,
    pub fallback: bool,
}

/// Per-gender slice of a preview run.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct GenderPreview {
    pub eligible: usize,
    pub groups: Vec<GroupPreview>,
}

/// Dry-run report: what an allocation run would do, without committing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreviewReport {
    pub term: Term,
    pub male: GenderPreview,
    pub female: GenderPreview,
}

impl PreviewReport {
    pub fn for_gender(&self, gender: Gender) -> &GenderPreview {
        match gender {
            Gender::Male => &self.male,
            Gender::Female => &self.female,
        }
    }
}
