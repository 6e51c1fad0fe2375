//! Cinema domain events.

use chrono::{DateTime, Utc};
use cinema_common::{ClientId, ReservationId, SessionId};
use serde::{Deserialize, Serialize};

use crate::aggregate::DomainEvent;

use super::{Reservation, Seat};

/// Events that can occur on a cinema aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum CinemaEvent {
    /// Seats were reserved for a client.
    SeatsReserved(SeatsReservedData),
}

impl DomainEvent for CinemaEvent {
    fn event_type(&self) -> &'static str {
        match self {
            CinemaEvent::SeatsReserved(_) => "SeatsReserved",
        }
    }
}

impl CinemaEvent {
    /// Creates a SeatsReserved event for a freshly generated reservation.
    pub fn seats_reserved(client_id: ClientId, session_id: SessionId, seats: Vec<Seat>) -> Self {
        CinemaEvent::SeatsReserved(Reservation::new(client_id, session_id, seats).into())
    }
}

/// Data for SeatsReserved event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatsReservedData {
    pub reservation_id: ReservationId,
    pub client_id: ClientId,
    pub session_id: SessionId,
    pub seats: Vec<Seat>,
    pub reserved_at: DateTime<Utc>,
}

impl From<Reservation> for SeatsReservedData {
    fn from(r: Reservation) -> Self {
        Self {
            reservation_id: r.id,
            client_id: r.client_id,
            session_id: r.session_id,
            seats: r.seats,
            reserved_at: r.reserved_at,
        }
    }
}

impl From<SeatsReservedData> for Reservation {
    fn from(data: SeatsReservedData) -> Self {
        Self {
            id: data.reservation_id,
            client_id: data.client_id,
            session_id: data.session_id,
            seats: data.seats,
            reserved_at: data.reserved_at,
        }
    }
}
