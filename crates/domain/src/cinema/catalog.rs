//! Fixed reference data: movies, clients, sessions, and the provider tree.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use cinema_common::{ClientId, MovieId, ProviderId, SessionId};
use serde::{Deserialize, Serialize};

use super::{CatalogError, Money, ProviderTree};

/// A movie that can be screened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
    pub id: MovieId,
    pub name: String,
    pub description: String,
}

impl Movie {
    /// Creates a new movie.
    pub fn new(id: MovieId, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: description.into(),
        }
    }
}

/// A client who can reserve seats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub id: ClientId,
    pub name: String,
}

impl Client {
    /// Creates a new client.
    pub fn new(id: ClientId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// A scheduled screening of a movie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub movie_id: MovieId,

    /// Seats are numbered `1..=seat_count`.
    pub seat_count: u32,
    pub date: DateTime<Utc>,

    /// Provider credited for every reservation against this session.
    pub provider_id: ProviderId,
    pub provider_earn: Money,
}

impl Session {
    /// Creates a new session.
    pub fn new(
        id: SessionId,
        movie_id: MovieId,
        seat_count: u32,
        date: DateTime<Utc>,
        provider_id: ProviderId,
        provider_earn: Money,
    ) -> Self {
        Self {
            id,
            movie_id,
            seat_count,
            date,
            provider_id,
            provider_earn,
        }
    }

    /// Returns true if `seat` names a seat of this session.
    pub fn has_seat(&self, seat: u32) -> bool {
        (1..=self.seat_count).contains(&seat)
    }
}

/// Validated reference data for a cinema.
///
/// Every session points at a movie and a provider that exist, and ids are
/// unique within each kind of record.
#[derive(Debug, Clone)]
pub struct Catalog {
    providers: ProviderTree,
    movies: HashMap<MovieId, Movie>,
    clients: HashMap<ClientId, Client>,
    sessions: HashMap<SessionId, Session>,
}

impl Catalog {
    /// Builds a catalog, checking ids for uniqueness and references for existence.
    pub fn new(
        providers: ProviderTree,
        movies: impl IntoIterator<Item = Movie>,
        clients: impl IntoIterator<Item = Client>,
        sessions: impl IntoIterator<Item = Session>,
    ) -> Result<Self, CatalogError> {
        let mut movie_index = HashMap::new();
        for movie in movies {
            let movie_id = movie.id;
            if movie_index.insert(movie_id, movie).is_some() {
                return Err(CatalogError::DuplicateMovie { movie_id });
            }
        }

        let mut client_index = HashMap::new();
        for client in clients {
            let client_id = client.id;
            if client_index.insert(client_id, client).is_some() {
                return Err(CatalogError::DuplicateClient { client_id });
            }
        }

        let mut session_index = HashMap::new();
        for session in sessions {
            if !movie_index.contains_key(&session.movie_id) {
                return Err(CatalogError::UnknownMovie {
                    movie_id: session.movie_id,
                });
            }
            if !providers.contains(session.provider_id) {
                return Err(CatalogError::UnknownProvider {
                    provider_id: session.provider_id,
                });
            }

            let session_id = session.id;
            if session_index.insert(session_id, session).is_some() {
                return Err(CatalogError::DuplicateSession { session_id });
            }
        }

        Ok(Self {
            providers,
            movies: movie_index,
            clients: client_index,
            sessions: session_index,
        })
    }

    /// Returns the provider tree.
    pub fn providers(&self) -> &ProviderTree {
        &self.providers
    }

    /// Returns a movie by ID.
    pub fn movie(&self, id: MovieId) -> Option<&Movie> {
        self.movies.get(&id)
    }

    /// Returns a client by ID.
    pub fn client(&self, id: ClientId) -> Option<&Client> {
        self.clients.get(&id)
    }

    /// Returns a session by ID.
    pub fn session(&self, id: SessionId) -> Option<&Session> {
        self.sessions.get(&id)
    }

    /// Returns all movies, in no particular order.
    pub fn movies(&self) -> impl Iterator<Item = &Movie> {
        self.movies.values()
    }

    /// Returns all clients, in no particular order.
    pub fn clients(&self) -> impl Iterator<Item = &Client> {
        self.clients.values()
    }

    /// Returns all sessions, in no particular order.
    pub fn sessions(&self) -> impl Iterator<Item = &Session> {
        self.sessions.values()
    }
}
