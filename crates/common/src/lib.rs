//! Shared identifier types for the cinema booking domain.

mod types;

pub use types::{ClientId, MovieId, ProviderId, ReservationId, SessionId};
