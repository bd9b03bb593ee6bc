use std::fmt::Display;

use alloy::primitives::Address;
use chrono::{DateTime, Utc};
use rand::Rng;

/// Chain-emitted request for flight-status consensus.
///
/// Ephemeral: consumed once per delivery, never persisted. The chain is the
/// source of truth for whether the request is still open.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestEvent {
    /// Index bucket the request is filed under.
    pub index: u8,
    pub airline: Address,
    pub flight: String,
    pub timestamp: u64,
}

impl Display for RequestEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let ts = DateTime::<Utc>::from_timestamp(self.timestamp as i64, 0)
            .unwrap_or_default()
            .format("%Y-%m-%d %H:%M:%S");
        write!(f, "{}-{} @ {} [index {}]", self.airline, self.flight, ts, self.index)
    }
}

/// Flight status code an oracle reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum FlightStatus {
    Unknown = 0,
    OnTime = 10,
    LateAirline = 20,
    LateWeather = 30,
    LateTechnical = 40,
    LateOther = 50,
}

impl FlightStatus {
    /// All status codes an oracle may report.
    pub const ALL: [FlightStatus; 6] = [
        FlightStatus::Unknown,
        FlightStatus::OnTime,
        FlightStatus::LateAirline,
        FlightStatus::LateWeather,
        FlightStatus::LateTechnical,
        FlightStatus::LateOther,
    ];

    /// On-chain status code.
    pub fn code(self) -> u8 { self as u8 }

    /// Uniform draw over [`FlightStatus::ALL`].
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}

impl Display for FlightStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}({})", self, self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            FlightStatus::ALL.map(FlightStatus::code),
            [0, 10, 20, 30, 40, 50]
        );
    }

    #[test]
    fn test_random_draws_are_members() {
        let mut rng = rand::thread_rng();
        for _ in 0..1000 {
            let status = FlightStatus::random(&mut rng);
            assert!(FlightStatus::ALL.contains(&status));
        }
    }
}
