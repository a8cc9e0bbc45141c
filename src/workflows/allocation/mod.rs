//! Roommate matching and bed allocation for university hostels.
//!
//! The engine scores pairwise compatibility in three tiers, greedily forms
//! roommate groups, assigns groups to hostels and beds, and commits each run
//! atomically through a [`repository::HousingStore`] snapshot. A read-only
//! preview mode exposes group formation to operators before committing.

pub mod domain;
pub mod matching;
pub mod report;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    AccommodationRequest, Allocation, AllocationId, Bed, BedId, Gender, Hostel, HostelId,
    RequestId, RequestStatus, Room, RoomId, RoomStatus, Student, StudentId, StudentRole,
    SurveyProfile, Term,
};
pub use matching::{CompatibilityScorer, GroupFormer, MatchingConfig, RoommateGroup};
pub use report::{
    AllocationView, GenderPreview, GroupMemberView, GroupPreview, PreviewReport, ResetOutcome,
    RunOutcome,
};
pub use repository::{HousingStore, InMemoryHousingStore, StoreError, StoreSnapshot, StoreState};
pub use router::allocation_router;
pub use service::{AllocationService, AllocationServiceError, EligibilityPolicy};
