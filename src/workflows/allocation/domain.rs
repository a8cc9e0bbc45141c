use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier newtypes for the housing inventory. Plain integers on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StudentId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct HostelId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RoomId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BedId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AllocationId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RequestId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// Allocation runs process genders in this fixed order.
    pub const fn ordered() -> [Self; 2] {
        [Self::Male, Self::Female]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StudentRole {
    Student,
    Warden,
}

/// Roommate survey answers. All scale fields use a 1-5 range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyProfile {
    pub wake_up_time: Option<NaiveTime>,
    pub requires_darkness: bool,
    pub cleanliness: u8,
    pub guest_tolerance: u8,
    pub dominance: u8,
}

/// A student as the matching engine sees them. `profile: None` marks an
/// incomplete survey; such students are never scorable and never eligible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub id: StudentId,
    pub email: String,
    pub full_name: String,
    pub role: StudentRole,
    pub gender: Gender,
    pub batch: Option<String>,
    pub enrollment_number: Option<String>,
    pub profile: Option<SurveyProfile>,
}

impl Student {
    /// Provision a student record at identity-creation time, deriving the
    /// enrollment number and batch year from the institutional email local
    /// part (three or four letters followed by five digits, e.g.
    /// `cst22001@...` becomes enrollment `CST/22/001`, batch `22`).
    pub fn provision(id: StudentId, email: &str, full_name: &str, gender: Gender) -> Self {
        let parsed = parse_enrollment(email);
        Self {
            id,
            email: email.to_string(),
            full_name: full_name.to_string(),
            role: StudentRole::Student,
            gender,
            batch: parsed.as_ref().map(|p| p.batch.clone()),
            enrollment_number: parsed.map(|p| p.enrollment),
            profile: None,
        }
    }

    pub fn is_profile_complete(&self) -> bool {
        self.profile.is_some()
    }
}

struct ParsedEnrollment {
    enrollment: String,
    batch: String,
}

fn parse_enrollment(email: &str) -> Option<ParsedEnrollment> {
    let local = email.split('@').next()?;
    let letters: String = local.chars().take_while(|c| c.is_ascii_alphabetic()).collect();
    if !(3..=4).contains(&letters.len()) {
        return None;
    }
    let digits = &local[letters.len()..];
    if digits.len() != 5 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let batch = digits[..2].to_string();
    let serial = &digits[2..];
    Some(ParsedEnrollment {
        enrollment: format!("{}/{}/{}", letters.to_ascii_uppercase(), batch, serial),
        batch,
    })
}

/// Allocation cycle label, e.g. "2025 1st Semester" or "Fall 2025".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Term(pub String);

impl Term {
    /// Derive the term label for a date from the institutional calendar:
    /// November-March is the 1st semester, May-September the 2nd, and the
    /// transition months April and October roll forward to the upcoming one.
    pub fn current_for(date: NaiveDate) -> Self {
        let (month, year) = (date.month(), date.year());
        let label = match month {
            11 | 12 => format!("{year} 1st Semester"),
            1..=3 => format!("{} 1st Semester", year - 1),
            4..=9 => format!("{year} 2nd Semester"),
            _ => format!("{year} 1st Semester"),
        };
        Self(label)
    }
}

impl std::fmt::Display for Term {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hostel {
    pub id: HostelId,
    pub name: String,
    pub gender_type: Gender,
    pub caretaker_name: String,
    /// Batch years admitted to this hostel; empty means any batch.
    pub allowed_batches: Vec<String>,
}

impl Hostel {
    pub fn admits_batch(&self, batch: &str) -> bool {
        self.allowed_batches.is_empty() || self.allowed_batches.iter().any(|b| b == batch)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomStatus {
    Available,
    Full,
    Maintenance,
}

impl RoomStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Full => "full",
            Self::Maintenance => "maintenance",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    pub hostel: HostelId,
    pub room_number: String,
    pub capacity: u8,
    pub status: RoomStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bed {
    pub id: BedId,
    pub room: RoomId,
    pub bed_number: String,
    pub is_occupied: bool,
}

/// One student's active room/bed assignment for a term. A student holds at
/// most one active allocation; the committer enforces this and the store
/// re-checks it at commit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Allocation {
    pub id: AllocationId,
    pub student: StudentId,
    pub room: RoomId,
    pub bed: Option<BedId>,
    pub term: Term,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Pending,
    Allocated,
    Rejected,
}

impl RequestStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Allocated => "allocated",
            Self::Rejected => "rejected",
        }
    }
}

/// Accommodation request feeding the request-gated eligibility policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccommodationRequest {
    pub id: RequestId,
    pub student: StudentId,
    pub term: Term,
    pub status: RequestStatus,
}
