use seatline_shared::NewFlight;

pub const STARTER_ORIGIN: &str = "India";
pub const STARTER_CAPACITY: u32 = 60;

const STARTER_ROUTES: [(&str, &str, &str); 10] = [
    ("Canada", "2025-04-26", "10:00 AM"),
    ("USA", "2025-04-27", "3:30 PM"),
    ("New Zealand", "2025-04-28", "6:00 AM"),
    ("UK", "2025-04-29", "9:15 PM"),
    ("Australia", "2025-04-30", "7:00 AM"),
    ("Germany", "2025-05-01", "2:45 PM"),
    ("France", "2025-05-02", "1:00 PM"),
    ("Italy", "2025-05-03", "11:30 AM"),
    ("Japan", "2025-05-04", "8:00 AM"),
    ("Singapore", "2025-05-05", "5:30 PM"),
];

/// The fixed starter schedule loaded by the seed endpoint.
pub fn starter_flights() -> Vec<NewFlight> {
    STARTER_ROUTES
        .iter()
        .map(|(destination, date, time)| {
            NewFlight::new(STARTER_ORIGIN, destination, date, time, STARTER_CAPACITY)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starter_flights() {
        let flights = starter_flights();
        assert_eq!(flights.len(), 10);
        assert!(flights.iter().all(|f| f.capacity == 60 && f.origin == "India"));
        assert_eq!(flights[0].destination, "Canada");
        assert_eq!(flights[9].time, "5:30 PM");
    }
}
