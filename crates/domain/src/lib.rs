//! Domain layer for the cinema booking system.
//!
//! This crate provides:
//! - Aggregate and DomainEvent traits for event-applied state
//! - The Cinema aggregate: seat reservations, watch history, provider earnings
//! - The validated catalog of providers, movies, clients, and sessions
//! - Earnings configuration loaded from the environment

pub mod aggregate;
pub mod cinema;
pub mod config;
pub mod error;

pub use aggregate::{Aggregate, DomainEvent};
pub use cinema::{
    Catalog, CatalogError, Cinema, CinemaError, CinemaEvent, Client, Money, Movie, Provider,
    ProviderTree, RawProviderTree, Reservation, ReserveResult, Seat, SeatsReservedData, Session,
};
pub use config::{ConfigError, EarningsConfig, EarningsDepth};
pub use error::DomainError;
