//! Seeded demo inventory for the CLI and the default serve state: two
//! gender-segregated hostel blocks with 4-bed rooms and a survey-complete
//! student cohort holding pending accommodation requests.

use chrono::NaiveTime;

use crate::workflows::allocation::{
    AccommodationRequest, Bed, BedId, Gender, Hostel, HostelId, InMemoryHousingStore, RequestId,
    RequestStatus, Room, RoomId, RoomStatus, Student, StudentId, SurveyProfile, Term,
};

pub const DEMO_TERM: &str = "2025 1st Semester";

struct DemoStudent {
    email: &'static str,
    name: &'static str,
    gender: Gender,
    wake: (u32, u32),
    requires_darkness: bool,
    cleanliness: u8,
    guest_tolerance: u8,
    dominance: u8,
}

const DEMO_STUDENTS: &[DemoStudent] = &[
    DemoStudent {
        email: "cst22001@std.uwu.ac.lk",
        name: "Kasun Perera",
        gender: Gender::Male,
        wake: (6, 0),
        requires_darkness: false,
        cleanliness: 5,
        guest_tolerance: 2,
        dominance: 4,
    },
    DemoStudent {
        email: "cst22002@std.uwu.ac.lk",
        name: "Nuwan Silva",
        gender: Gender::Male,
        wake: (6, 30),
        requires_darkness: false,
        cleanliness: 5,
        guest_tolerance: 2,
        dominance: 2,
    },
    DemoStudent {
        email: "ent22003@std.uwu.ac.lk",
        name: "Tharindu Fernando",
        gender: Gender::Male,
        wake: (7, 0),
        requires_darkness: false,
        cleanliness: 4,
        guest_tolerance: 3,
        dominance: 3,
    },
    DemoStudent {
        email: "ent22004@std.uwu.ac.lk",
        name: "Sahan Jayawardena",
        gender: Gender::Male,
        wake: (6, 15),
        requires_darkness: false,
        cleanliness: 5,
        guest_tolerance: 2,
        dominance: 1,
    },
    DemoStudent {
        email: "cst23005@std.uwu.ac.lk",
        name: "Dilshan Wickrama",
        gender: Gender::Male,
        wake: (10, 30),
        requires_darkness: true,
        cleanliness: 2,
        guest_tolerance: 5,
        dominance: 5,
    },
    DemoStudent {
        email: "cst22011@std.uwu.ac.lk",
        name: "Ishara Gunasekara",
        gender: Gender::Female,
        wake: (6, 0),
        requires_darkness: true,
        cleanliness: 4,
        guest_tolerance: 2,
        dominance: 2,
    },
    DemoStudent {
        email: "bst22012@std.uwu.ac.lk",
        name: "Sachini Rathnayake",
        gender: Gender::Female,
        wake: (6, 45),
        requires_darkness: true,
        cleanliness: 4,
        guest_tolerance: 3,
        dominance: 4,
    },
    DemoStudent {
        email: "bst23013@std.uwu.ac.lk",
        name: "Hansika Bandara",
        gender: Gender::Female,
        wake: (7, 30),
        requires_darkness: false,
        cleanliness: 3,
        guest_tolerance: 4,
        dominance: 3,
    },
];

/// Build an in-memory store seeded with Block A (Boys), Block B (Girls),
/// 4-bed rooms, and the demo cohort above.
pub fn seeded_store() -> InMemoryHousingStore {
    let mut state = crate::workflows::allocation::StoreState::default();
    let term = Term(DEMO_TERM.to_string());

    state.hostels.push(Hostel {
        id: HostelId(1),
        name: "Block A (Boys)".to_string(),
        gender_type: Gender::Male,
        caretaker_name: "Mr. John".to_string(),
        allowed_batches: Vec::new(),
    });
    state.hostels.push(Hostel {
        id: HostelId(2),
        name: "Block B (Girls)".to_string(),
        gender_type: Gender::Female,
        caretaker_name: "Ms. Jane".to_string(),
        allowed_batches: Vec::new(),
    });

    let mut bed_id = 1u32;
    let mut room_id = 1u32;
    for hostel in [HostelId(1), HostelId(2)] {
        for number in 101..=104u32 {
            let room = RoomId(room_id);
            room_id += 1;
            state.rooms.push(Room {
                id: room,
                hostel,
                room_number: number.to_string(),
                capacity: 4,
                status: RoomStatus::Available,
            });
            for slot in 1..=4u32 {
                state.beds.push(Bed {
                    id: BedId(bed_id),
                    room,
                    bed_number: format!("{number}-{slot}"),
                    is_occupied: false,
                });
                bed_id += 1;
            }
        }
    }

    for (index, demo) in DEMO_STUDENTS.iter().enumerate() {
        let id = StudentId(index as u32 + 1);
        let mut student = Student::provision(id, demo.email, demo.name, demo.gender);
        student.profile = Some(SurveyProfile {
            wake_up_time: NaiveTime::from_hms_opt(demo.wake.0, demo.wake.1, 0),
            requires_darkness: demo.requires_darkness,
            cleanliness: demo.cleanliness,
            guest_tolerance: demo.guest_tolerance,
            dominance: demo.dominance,
        });
        state.students.push(student);
        state.requests.push(AccommodationRequest {
            id: RequestId(index as u32 + 1),
            student: id,
            term: term.clone(),
            status: RequestStatus::Pending,
        });
    }

    InMemoryHousingStore::new(state)
}
