use std::sync::Arc;

use chrono::NaiveTime;

use crate::workflows::allocation::domain::{
    AccommodationRequest, Bed, BedId, Gender, Hostel, HostelId, RequestId, RequestStatus, Room,
    RoomId, RoomStatus, Student, StudentId, StudentRole, SurveyProfile, Term,
};
use crate::workflows::allocation::matching::MatchingConfig;
use crate::workflows::allocation::repository::{InMemoryHousingStore, StoreState};
use crate::workflows::allocation::service::{AllocationService, EligibilityPolicy};

pub(super) fn term() -> Term {
    Term("2025 1st Semester".to_string())
}

pub(super) fn wake(hour: u32, minute: u32) -> Option<NaiveTime> {
    NaiveTime::from_hms_opt(hour, minute, 0)
}

pub(super) fn profile(
    wake_up_time: Option<NaiveTime>,
    requires_darkness: bool,
    cleanliness: u8,
    guest_tolerance: u8,
    dominance: u8,
) -> SurveyProfile {
    SurveyProfile {
        wake_up_time,
        requires_darkness,
        cleanliness,
        guest_tolerance,
        dominance,
    }
}

/// An early riser with mid-range survey answers; the baseline most scoring
/// tests perturb one field of.
pub(super) fn baseline_profile() -> SurveyProfile {
    profile(wake(6, 0), false, 3, 3, 3)
}

pub(super) fn student(id: u32, gender: Gender, survey: Option<SurveyProfile>) -> Student {
    let mut s = Student::provision(
        StudentId(id),
        &format!("cst22{id:03}@std.uwu.ac.lk"),
        &format!("Student {id}"),
        gender,
    );
    s.profile = survey;
    s
}

pub(super) fn warden(id: u32, gender: Gender) -> Student {
    let mut s = student(id, gender, Some(baseline_profile()));
    s.role = StudentRole::Warden;
    s
}

/// Inventory with one hostel for `gender` holding a single room of
/// `capacity` beds.
pub(super) fn single_room_inventory(gender: Gender, capacity: u8) -> StoreState {
    let mut state = StoreState::default();
    state.hostels.push(Hostel {
        id: HostelId(1),
        name: "Block A".to_string(),
        gender_type: gender,
        caretaker_name: "Mr. John".to_string(),
        allowed_batches: Vec::new(),
    });
    state.rooms.push(Room {
        id: RoomId(1),
        hostel: HostelId(1),
        room_number: "101".to_string(),
        capacity,
        status: RoomStatus::Available,
    });
    for slot in 1..=capacity {
        state.beds.push(Bed {
            id: BedId(u32::from(slot)),
            room: RoomId(1),
            bed_number: format!("101-{slot}"),
            is_occupied: false,
        });
    }
    state
}

pub(super) fn add_room(state: &mut StoreState, room_id: u32, capacity: u8, status: RoomStatus) {
    state.rooms.push(Room {
        id: RoomId(room_id),
        hostel: HostelId(1),
        room_number: format!("{}", 100 + room_id),
        capacity,
        status,
    });
    let base = state.beds.len() as u32;
    for slot in 1..=capacity {
        state.beds.push(Bed {
            id: BedId(base + u32::from(slot)),
            room: RoomId(room_id),
            bed_number: format!("{}-{slot}", 100 + room_id),
            is_occupied: false,
        });
    }
}

pub(super) fn enroll(state: &mut StoreState, students: Vec<Student>) {
    for s in students {
        let request_id = state.requests.len() as u32 + 1;
        state.requests.push(AccommodationRequest {
            id: RequestId(request_id),
            student: s.id,
            term: term(),
            status: RequestStatus::Pending,
        });
        state.students.push(s);
    }
}

/// Four male students that are mutually compatible: wake times within an
/// hour, same darkness preference, identical cleanliness and guest
/// tolerance, complementary dominance.
pub(super) fn compatible_quad() -> Vec<Student> {
    vec![
        student(1, Gender::Male, Some(profile(wake(6, 0), false, 5, 2, 4))),
        student(2, Gender::Male, Some(profile(wake(6, 30), false, 5, 2, 2))),
        student(3, Gender::Male, Some(profile(wake(7, 0), false, 5, 2, 3))),
        student(4, Gender::Male, Some(profile(wake(6, 15), false, 5, 2, 1))),
    ]
}

pub(super) fn service_with(
    state: StoreState,
) -> (
    AllocationService<InMemoryHousingStore>,
    Arc<InMemoryHousingStore>,
) {
    service_with_policy(state, EligibilityPolicy::RequestGated)
}

pub(super) fn service_with_policy(
    state: StoreState,
    policy: EligibilityPolicy,
) -> (
    AllocationService<InMemoryHousingStore>,
    Arc<InMemoryHousingStore>,
) {
    let store = Arc::new(InMemoryHousingStore::new(state));
    let service = AllocationService::new(store.clone(), MatchingConfig::default(), policy);
    (service, store)
}
