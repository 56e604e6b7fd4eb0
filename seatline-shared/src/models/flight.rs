use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

/// A scheduled flight and its seat occupancy.
///
/// `booked_seats` only ever holds numbers in `1..=capacity`; stores enforce
/// this when claiming.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Flight {
    pub id: Uuid,
    pub origin: String,
    pub destination: String,
    pub date: String,
    pub time: String,
    pub capacity: u32,
    pub booked_seats: BTreeSet<u32>,
}

/// Seed record for a flight, before an identifier is assigned.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewFlight {
    pub origin: String,
    pub destination: String,
    pub date: String,
    pub time: String,
    pub capacity: u32,
}

impl Flight {
    pub fn new(record: NewFlight) -> Self {
        Self {
            id: Uuid::new_v4(),
            origin: record.origin,
            destination: record.destination,
            date: record.date,
            time: record.time,
            capacity: record.capacity,
            booked_seats: BTreeSet::new(),
        }
    }

    pub fn seat_in_range(&self, seat_number: u32) -> bool {
        (1..=self.capacity).contains(&seat_number)
    }

    pub fn is_booked(&self, seat_number: u32) -> bool {
        self.booked_seats.contains(&seat_number)
    }

    pub fn available_seats(&self) -> u32 {
        self.capacity.saturating_sub(self.booked_seats.len() as u32)
    }
}

impl NewFlight {
    pub fn new(origin: &str, destination: &str, date: &str, time: &str, capacity: u32) -> Self {
        Self {
            origin: origin.to_string(),
            destination: destination.to_string(),
            date: date.to_string(),
            time: time.to_string(),
            capacity,
        }
    }
}
