//! Cinema aggregate and related types.

mod aggregate;
mod catalog;
mod events;
mod providers;
mod reservation;
mod value_objects;

pub use aggregate::Cinema;
pub use catalog::{Catalog, Client, Movie, Session};
pub use events::{CinemaEvent, SeatsReservedData};
pub use providers::{Provider, ProviderTree, RawProviderTree};
pub use reservation::{Reservation, ReserveResult};
pub use value_objects::{Money, Seat};

use cinema_common::{ClientId, MovieId, ProviderId, SessionId};
use thiserror::Error;

/// Errors raised by cinema operations when a referenced entity does not exist.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CinemaError {
    /// No client with this ID.
    #[error("Client not found: {client_id}")]
    ClientNotFound { client_id: ClientId },

    /// No session with this ID.
    #[error("Session not found: {session_id}")]
    SessionNotFound { session_id: SessionId },

    /// Seat number outside `1..=seat_count` for the session.
    #[error("Seat not found: {seat}")]
    SeatNotFound { seat: Seat },

    /// No provider with this ID in the provider tree.
    #[error("Provider not found: {provider_id}")]
    ProviderNotFound { provider_id: ProviderId },
}

/// Errors raised while assembling a catalog or seeding a cinema.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Duplicate provider id: {provider_id}")]
    DuplicateProvider { provider_id: ProviderId },

    #[error("Duplicate movie id: {movie_id}")]
    DuplicateMovie { movie_id: MovieId },

    #[error("Duplicate client id: {client_id}")]
    DuplicateClient { client_id: ClientId },

    #[error("Duplicate session id: {session_id}")]
    DuplicateSession { session_id: SessionId },

    #[error("Unknown provider: {provider_id}")]
    UnknownProvider { provider_id: ProviderId },

    #[error("Provider not reachable from the root: {provider_id}")]
    DetachedProvider { provider_id: ProviderId },

    #[error("Unknown movie: {movie_id}")]
    UnknownMovie { movie_id: MovieId },

    #[error("Reservation references unknown client: {client_id}")]
    UnknownClient { client_id: ClientId },

    #[error("Reservation references unknown session: {session_id}")]
    UnknownSession { session_id: SessionId },
}
