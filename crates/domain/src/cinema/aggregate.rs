//! Cinema aggregate implementation.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use cinema_common::{ClientId, ProviderId, SessionId};

use crate::aggregate::Aggregate;
use crate::config::{EarningsConfig, EarningsDepth};

use super::{
    Catalog, CatalogError, CinemaError, CinemaEvent, Money, Movie, Provider, Reservation,
    ReserveResult, Seat, Session,
};

/// Cinema aggregate root.
///
/// Holds a fixed catalog and an append-only reservation log. Reservations
/// enter the log only by applying [`CinemaEvent::SeatsReserved`], whether they
/// were seeded at construction or recorded by [`Cinema::reserve`].
#[derive(Debug, Clone)]
pub struct Cinema {
    catalog: Catalog,
    reservations: Vec<Reservation>,
    config: EarningsConfig,

    /// Events recorded by `reserve` and not yet taken.
    pending_events: Vec<CinemaEvent>,
}

impl Aggregate for Cinema {
    type Event = CinemaEvent;

    fn aggregate_type() -> &'static str {
        "Cinema"
    }

    fn apply(&mut self, event: Self::Event) {
        match event {
            CinemaEvent::SeatsReserved(data) => self.reservations.push(data.into()),
        }
    }
}

impl Cinema {
    /// Creates a cinema over `catalog`, seeded with `initial_reservations`.
    ///
    /// Seeded reservations must reference known clients and sessions. Their
    /// seats are taken as given and not checked for conflicts.
    pub fn new(
        catalog: Catalog,
        initial_reservations: impl IntoIterator<Item = Reservation>,
    ) -> Result<Self, CatalogError> {
        let mut seeded = Vec::new();
        for reservation in initial_reservations {
            if catalog.client(reservation.client_id).is_none() {
                return Err(CatalogError::UnknownClient {
                    client_id: reservation.client_id,
                });
            }
            if catalog.session(reservation.session_id).is_none() {
                return Err(CatalogError::UnknownSession {
                    session_id: reservation.session_id,
                });
            }
            seeded.push(CinemaEvent::SeatsReserved(reservation.into()));
        }

        let mut cinema = Self {
            catalog,
            reservations: Vec::with_capacity(seeded.len()),
            config: EarningsConfig::default(),
            pending_events: Vec::new(),
        };
        cinema.apply_events(seeded);
        Ok(cinema)
    }

    /// Replaces the earnings configuration.
    pub fn with_config(mut self, config: EarningsConfig) -> Self {
        self.config = config;
        self
    }
}

// Query methods
impl Cinema {
    /// Returns the catalog.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Returns the earnings configuration.
    pub fn config(&self) -> EarningsConfig {
        self.config
    }

    /// Returns all reservations in the order they were recorded.
    pub fn reservations(&self) -> &[Reservation] {
        &self.reservations
    }

    /// Returns the reservations for one session, in recording order.
    pub fn reservations_for_session(
        &self,
        session_id: SessionId,
    ) -> impl Iterator<Item = &Reservation> {
        self.reservations
            .iter()
            .filter(move |r| r.session_id == session_id)
    }

    /// Returns every seat already held for a session, in recording order.
    pub fn reserved_seats(&self, session_id: SessionId) -> Result<Vec<Seat>, CinemaError> {
        self.session(session_id)?;
        Ok(self
            .reservations_for_session(session_id)
            .flat_map(|r| r.seats.iter().copied())
            .collect())
    }

    /// Returns the free seats of a session in ascending order.
    pub fn available_seats(&self, session_id: SessionId) -> Result<Vec<Seat>, CinemaError> {
        let session = self.session(session_id)?;
        let taken = self.taken_seats(session_id);
        Ok((1..=session.seat_count)
            .filter(|seat| !taken.contains(seat))
            .collect())
    }

    /// Drains the events recorded since the last call.
    pub fn take_events(&mut self) -> Vec<CinemaEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Returns the movies the client has reservations for.
    ///
    /// One entry per reservation in recording order, so a movie booked twice
    /// appears twice.
    #[tracing::instrument(skip(self))]
    pub fn watched_movies(&self, client_id: ClientId) -> Result<Vec<&Movie>, CinemaError> {
        self.client_exists(client_id)?;

        Ok(self
            .reservations
            .iter()
            .filter(|r| r.client_id == client_id)
            .filter_map(|r| self.catalog.session(r.session_id))
            .filter_map(|s| self.catalog.movie(s.movie_id))
            .collect())
    }

    /// Sums the session earnings credited to `provider_id` and its sub-providers.
    ///
    /// Each reservation contributes its session's `provider_earn` once,
    /// regardless of how many seats it holds. With the default configuration
    /// only the provider and its direct sub-providers are counted and the date
    /// range is not applied; see [`EarningsConfig`].
    #[tracing::instrument(skip(self))]
    pub fn provider_earnings(
        &self,
        provider_id: ProviderId,
        date_from: DateTime<Utc>,
        date_to: DateTime<Utc>,
    ) -> Result<Money, CinemaError> {
        let providers = self.catalog.providers();
        if !providers.contains(provider_id) {
            return Err(CinemaError::ProviderNotFound { provider_id });
        }

        let mut credited = vec![provider_id];
        match self.config.depth {
            EarningsDepth::DirectChildren => {
                credited.extend(providers.children(provider_id).map(Provider::id));
            }
            EarningsDepth::WholeSubtree => credited.extend(providers.descendants(provider_id)),
        }

        let range = self.config.filter_by_date.then_some((date_from, date_to));
        let total: Money = credited
            .into_iter()
            .map(|id| self.concrete_provider_earnings(id, range))
            .sum();

        tracing::debug!(%total, "provider earnings computed");
        Ok(total)
    }

    fn concrete_provider_earnings(
        &self,
        provider_id: ProviderId,
        range: Option<(DateTime<Utc>, DateTime<Utc>)>,
    ) -> Money {
        self.reservations
            .iter()
            .filter_map(|r| self.catalog.session(r.session_id))
            .filter(|s| s.provider_id == provider_id)
            .filter(|s| range.is_none_or(|(from, to)| from <= s.date && s.date <= to))
            .map(|s| s.provider_earn)
            .sum()
    }

    fn client_exists(&self, client_id: ClientId) -> Result<(), CinemaError> {
        self.catalog
            .client(client_id)
            .map(|_| ())
            .ok_or(CinemaError::ClientNotFound { client_id })
    }

    fn session(&self, session_id: SessionId) -> Result<&Session, CinemaError> {
        self.catalog
            .session(session_id)
            .ok_or(CinemaError::SessionNotFound { session_id })
    }

    fn taken_seats(&self, session_id: SessionId) -> HashSet<Seat> {
        self.reservations_for_session(session_id)
            .flat_map(|r| r.seats.iter().copied())
            .collect()
    }
}

// Command methods
impl Cinema {
    /// Reserves `seats` in a session for a client.
    ///
    /// Unknown clients, sessions, and seats are errors, checked in that order.
    /// A seat already held by another reservation is reported as
    /// [`ReserveResult::SeatAlreadyReserved`] and nothing is recorded.
    #[tracing::instrument(skip(self))]
    pub fn reserve(
        &mut self,
        client_id: ClientId,
        session_id: SessionId,
        seats: &[Seat],
    ) -> Result<ReserveResult, CinemaError> {
        let event = match self.plan_reservation(client_id, session_id, seats) {
            Ok(Ok(event)) => event,
            Ok(Err(seat)) => {
                metrics::counter!("cinema_seat_conflicts_total").increment(1);
                tracing::info!(seat, "seat already reserved");
                return Ok(ReserveResult::SeatAlreadyReserved(seat));
            }
            Err(e) => {
                metrics::counter!("cinema_reservation_errors_total").increment(1);
                return Err(e);
            }
        };

        self.pending_events.push(event.clone());
        self.apply(event);

        metrics::counter!("cinema_reservations_total").increment(1);
        metrics::counter!("cinema_seats_reserved_total").increment(seats.len() as u64);
        tracing::debug!(seat_count = seats.len(), "reservation recorded");

        Ok(ReserveResult::Ok)
    }

    /// Validates a reservation request against the current state.
    ///
    /// Returns the event to record, or the first conflicting seat.
    fn plan_reservation(
        &self,
        client_id: ClientId,
        session_id: SessionId,
        seats: &[Seat],
    ) -> Result<Result<CinemaEvent, Seat>, CinemaError> {
        self.client_exists(client_id)?;
        let session = self.session(session_id)?;

        if let Some(&seat) = seats.iter().find(|&&seat| !session.has_seat(seat)) {
            tracing::warn!(seat, seat_count = session.seat_count, "seat not found");
            return Err(CinemaError::SeatNotFound { seat });
        }

        let taken = self.taken_seats(session_id);
        if let Some(&seat) = seats.iter().find(|seat| taken.contains(*seat)) {
            return Ok(Err(seat));
        }

        Ok(Ok(CinemaEvent::seats_reserved(
            client_id,
            session_id,
            seats.to_vec(),
        )))
    }
}
