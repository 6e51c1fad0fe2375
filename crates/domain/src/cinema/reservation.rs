//! Reservation records and reservation outcomes.

use chrono::{DateTime, Utc};
use cinema_common::{ClientId, ReservationId, SessionId};
use serde::{Deserialize, Serialize};

use super::Seat;

/// Seats held by a client for one session.
///
/// Seats are kept in the order they were requested. Duplicates inside a
/// single reservation are not rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: ReservationId,
    pub client_id: ClientId,
    pub session_id: SessionId,
    pub seats: Vec<Seat>,
    pub reserved_at: DateTime<Utc>,
}

impl Reservation {
    /// Creates a reservation stamped with a fresh ID and the current time.
    pub fn new(client_id: ClientId, session_id: SessionId, seats: Vec<Seat>) -> Self {
        Self {
            id: ReservationId::new(),
            client_id,
            session_id,
            seats,
            reserved_at: Utc::now(),
        }
    }

    /// Returns true if this reservation holds `seat`.
    pub fn holds(&self, seat: Seat) -> bool {
        self.seats.contains(&seat)
    }
}

/// Outcome of a reservation attempt that passed id and seat validation.
///
/// A seat conflict is an expected business outcome, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReserveResult {
    /// All requested seats were recorded.
    Ok,

    /// The first requested seat, in request order, that another reservation
    /// already holds. Nothing was recorded.
    SeatAlreadyReserved(Seat),
}

impl ReserveResult {
    /// Returns true if the reservation was recorded.
    pub fn is_ok(&self) -> bool {
        matches!(self, ReserveResult::Ok)
    }
}
