use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use super::domain::{
    AccommodationRequest, Allocation, Bed, BedId, Hostel, Room, RoomId, RoomStatus, Student,
    StudentId,
};

/// Full inventory and allocation state. Service operations work on an owned
/// copy obtained through [`HousingStore::snapshot`] and apply it with
/// [`HousingStore::commit`], so every multi-step write is all-or-nothing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreState {
    pub students: Vec<Student>,
    pub hostels: Vec<Hostel>,
    pub rooms: Vec<Room>,
    pub beds: Vec<Bed>,
    pub allocations: Vec<Allocation>,
    pub requests: Vec<AccommodationRequest>,
}

impl StoreState {
    pub fn student(&self, id: StudentId) -> Option<&Student> {
        self.students.iter().find(|s| s.id == id)
    }

    pub fn room(&self, id: RoomId) -> Option<&Room> {
        self.rooms.iter().find(|r| r.id == id)
    }

    pub fn active_allocation(&self, student: StudentId) -> Option<&Allocation> {
        self.allocations.iter().find(|a| a.student == student)
    }

    /// Occupancy is always derived from the beds, never stored.
    pub fn room_occupancy(&self, room: RoomId) -> usize {
        self.beds
            .iter()
            .filter(|b| b.room == room && b.is_occupied)
            .count()
    }

    /// Unoccupied beds of a room in ascending bed id, the stable order the
    /// committer hands beds out in.
    pub fn unoccupied_beds(&self, room: RoomId) -> Vec<BedId> {
        let mut beds: Vec<BedId> = self
            .beds
            .iter()
            .filter(|b| b.room == room && !b.is_occupied)
            .map(|b| b.id)
            .collect();
        beds.sort();
        beds
    }

    /// Recompute a room's status from bed occupancy. A manual `Maintenance`
    /// marking is preserved.
    pub fn refresh_room_status(&mut self, room: RoomId) {
        let occupied = self.room_occupancy(room);
        if let Some(r) = self.rooms.iter_mut().find(|r| r.id == room) {
            if r.status != RoomStatus::Maintenance {
                r.status = if occupied >= usize::from(r.capacity) {
                    RoomStatus::Full
                } else {
                    RoomStatus::Available
                };
            }
        }
    }

    pub(crate) fn bed_mut(&mut self, id: BedId) -> Option<&mut Bed> {
        self.beds.iter_mut().find(|b| b.id == id)
    }

    /// The unique-allocation-per-student invariant, re-checked at commit so
    /// a conflicting writer can never slip a duplicate in.
    fn holds_unique_student_invariant(&self) -> bool {
        let mut students: Vec<StudentId> = self.allocations.iter().map(|a| a.student).collect();
        students.sort();
        let before = students.len();
        students.dedup();
        students.len() == before
    }
}

/// Versioned copy of the store handed to a single logical operation.
#[derive(Debug, Clone)]
pub struct StoreSnapshot {
    pub version: u64,
    pub state: StoreState,
}

/// Error enumeration for store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store changed since snapshot was taken; retry the operation")]
    Conflict,
    #[error("a student holds more than one active allocation")]
    DuplicateAllocation,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Persistence abstraction for the allocation engine. `snapshot` yields an
/// owned, consistent view; `commit` applies the mutated view atomically and
/// fails with [`StoreError::Conflict`] if another commit landed in between.
/// Concurrent runs over the same pool therefore serialize instead of
/// double-allocating beds or students.
pub trait HousingStore: Send + Sync {
    fn snapshot(&self) -> Result<StoreSnapshot, StoreError>;
    fn commit(&self, snapshot: StoreSnapshot) -> Result<(), StoreError>;
}

/// Mutex-guarded in-memory store with optimistic version checking.
#[derive(Debug, Default)]
pub struct InMemoryHousingStore {
    inner: Mutex<(u64, StoreState)>,
}

impl InMemoryHousingStore {
    pub fn new(state: StoreState) -> Self {
        Self {
            inner: Mutex::new((0, state)),
        }
    }
}

impl HousingStore for InMemoryHousingStore {
    fn snapshot(&self) -> Result<StoreSnapshot, StoreError> {
        let guard = self
            .inner
            .lock()
            .map_err(|_| StoreError::Unavailable("store mutex poisoned".to_string()))?;
        Ok(StoreSnapshot {
            version: guard.0,
            state: guard.1.clone(),
        })
    }

    fn commit(&self, snapshot: StoreSnapshot) -> Result<(), StoreError> {
        if !snapshot.state.holds_unique_student_invariant() {
            return Err(StoreError::DuplicateAllocation);
        }
        let mut guard = self
            .inner
            .lock()
            .map_err(|_| StoreError::Unavailable("store mutex poisoned".to_string()))?;
        if guard.0 != snapshot.version {
            return Err(StoreError::Conflict);
        }
        *guard = (snapshot.version + 1, snapshot.state);
        Ok(())
    }
}
