//! Classroom model.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::subject::{normalize_key, validate_key};
use super::{Availability, Subject, TimeSlot};
use crate::error::{Result, TimetableError};

/// Allowed room capacity.
pub const CAPACITY_RANGE: std::ops::RangeInclusive<u32> = 1..=1000;

/// Room classification. Lab subjects need exactly [`RoomType::Laboratory`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomType {
    LectureHall,
    #[default]
    Classroom,
    Laboratory,
    ComputerLab,
    SeminarRoom,
    Auditorium,
    Workshop,
}

/// Operational status. Only available rooms can be booked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomStatus {
    #[default]
    Available,
    Occupied,
    Maintenance,
    Closed,
}

/// Equipment flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomFeatures {
    pub projector: bool,
    pub computers: bool,
    pub internet: bool,
    pub audio_system: bool,
    pub whiteboard: bool,
    pub air_conditioning: bool,
}

impl Default for RoomFeatures {
    fn default() -> Self {
        Self {
            projector: false,
            computers: false,
            internet: true,
            audio_system: false,
            whiteboard: true,
            air_conditioning: false,
        }
    }
}

/// A bookable room.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Classroom {
    /// Unique, upper-cased room number.
    pub room_number: String,
    pub name: String,
    pub building: Option<String>,
    pub floor: Option<i32>,
    pub capacity: u32,
    pub room_type: RoomType,
    pub status: RoomStatus,
    pub features: RoomFeatures,
    pub computer_count: Option<u32>,
    pub availability: Availability,
    /// Maintenance windows, treated like blocked slots.
    #[serde(default)]
    pub maintenance_slots: Vec<TimeSlot>,
    /// Special equipment beyond [`RoomFeatures`], e.g. "fume hood".
    #[serde(default)]
    pub equipment: BTreeSet<String>,
    /// Installed software.
    #[serde(default)]
    pub software: BTreeSet<String>,
}

impl Classroom {
    /// Creates an ordinary classroom available Monday to Friday.
    pub fn new(room_number: impl AsRef<str>, name: impl Into<String>, capacity: u32) -> Self {
        Self {
            room_number: normalize_key(room_number.as_ref()),
            name: name.into(),
            building: None,
            floor: None,
            capacity,
            room_type: RoomType::Classroom,
            status: RoomStatus::Available,
            features: RoomFeatures::default(),
            computer_count: None,
            availability: Availability::weekdays(),
            maintenance_slots: Vec::new(),
            equipment: BTreeSet::new(),
            software: BTreeSet::new(),
        }
    }

    pub fn with_type(mut self, room_type: RoomType) -> Self {
        self.room_type = room_type;
        self
    }

    pub fn with_status(mut self, status: RoomStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_projector(mut self) -> Self {
        self.features.projector = true;
        self
    }

    /// Equips the room with `count` computers.
    pub fn with_computers(mut self, count: u32) -> Self {
        self.features.computers = true;
        self.computer_count = Some(count);
        self
    }

    pub fn with_location(mut self, building: impl Into<String>, floor: i32) -> Self {
        self.building = Some(building.into());
        self.floor = Some(floor);
        self
    }

    pub fn with_availability(mut self, availability: Availability) -> Self {
        self.availability = availability;
        self
    }

    pub fn with_unavailable(mut self, slot: TimeSlot) -> Self {
        self.availability.blocked.push(slot);
        self
    }

    pub fn with_maintenance(mut self, slot: TimeSlot) -> Self {
        self.maintenance_slots.push(slot);
        self
    }

    pub fn with_equipment(mut self, item: impl Into<String>) -> Self {
        self.add_equipment(item);
        self
    }

    pub fn with_software(mut self, name: impl Into<String>) -> Self {
        self.add_software(name);
        self
    }

    /// Returns `false` if the item was already listed.
    pub fn add_equipment(&mut self, item: impl Into<String>) -> bool {
        self.equipment.insert(item.into())
    }

    /// Returns `false` if the item was not listed.
    pub fn remove_equipment(&mut self, item: &str) -> bool {
        self.equipment.remove(item)
    }

    pub fn add_software(&mut self, name: impl Into<String>) -> bool {
        self.software.insert(name.into())
    }

    pub fn remove_software(&mut self, name: &str) -> bool {
        self.software.remove(name)
    }

    pub fn has_equipment(&self, item: &str) -> bool {
        self.equipment.contains(item)
    }

    pub fn has_software(&self, name: &str) -> bool {
        self.software.contains(name)
    }

    /// Available status, available day, and no blocked or maintenance overlap.
    pub fn is_available_at(&self, slot: &TimeSlot) -> bool {
        self.status == RoomStatus::Available
            && self.availability.is_available_at(slot)
            && !self.maintenance_slots.iter().any(|m| m.overlaps(slot))
    }

    /// Whether the room satisfies a subject's equipment needs.
    ///
    /// A lab subject needs a room of type laboratory (a computer lab does not
    /// qualify). Projector and computer needs are matched against features.
    pub fn meets_requirements(&self, subject: &Subject) -> bool {
        if subject.requires_lab && self.room_type != RoomType::Laboratory {
            return false;
        }
        if subject.requires_projector && !self.features.projector {
            return false;
        }
        if subject.requires_computer && !self.features.computers {
            return false;
        }
        true
    }

    pub fn can_accommodate(&self, students: u32) -> bool {
        self.capacity >= students
    }

    /// Name with building and floor, e.g. `"Room 101, Building A, Floor 1"`.
    pub fn full_name(&self) -> String {
        let mut parts = vec![self.name.clone()];
        if let Some(building) = &self.building {
            parts.push(format!("Building {building}"));
        }
        if let Some(floor) = self.floor {
            parts.push(format!("Floor {floor}"));
        }
        parts.join(", ")
    }

    pub(crate) fn normalize_keys(&mut self) {
        self.room_number = normalize_key(&self.room_number);
    }

    /// Checks capacity and equipment consistency. Called by the registry.
    pub fn validate(&self) -> Result<()> {
        validate_key("classroom.room_number", &self.room_number)?;
        if self.name.trim().is_empty() {
            return Err(TimetableError::invalid("classroom.name", "must not be empty"));
        }
        if !CAPACITY_RANGE.contains(&self.capacity) {
            return Err(TimetableError::invalid(
                "classroom.capacity",
                format!(
                    "{} is outside {}..={}",
                    self.capacity,
                    CAPACITY_RANGE.start(),
                    CAPACITY_RANGE.end()
                ),
            ));
        }
        if let Some(floor) = self.floor {
            if !(-5..=50).contains(&floor) {
                return Err(TimetableError::invalid(
                    "classroom.floor",
                    format!("{floor} is outside -5..=50"),
                ));
            }
        }
        if let Some(count) = self.computer_count {
            if count > self.capacity {
                return Err(TimetableError::invalid(
                    "classroom.computer_count",
                    format!("{count} exceeds capacity {}", self.capacity),
                ));
            }
            if count > 0 && !self.features.computers {
                return Err(TimetableError::invalid(
                    "classroom.computer_count",
                    "computer count given but room has no computers",
                ));
            }
        }
        Ok(())
    }
}
