//! Integration tests for the Cinema aggregate.
//!
//! These tests drive the public API end to end: catalog assembly, seat
//! reservation, watch history, and provider earnings.

use chrono::{DateTime, TimeZone, Utc};
use cinema_common::{ClientId, MovieId, ProviderId, SessionId};
use cinema_domain::{
    Catalog, CatalogError, Cinema, CinemaError, CinemaEvent, Client, DomainEvent, EarningsConfig,
    EarningsDepth, Money, Movie, ProviderTree, Reservation, ReserveResult, Session,
};
use rust_decimal_macros::dec;

const ROOT: ProviderId = ProviderId::new(1);
const CHILD_A: ProviderId = ProviderId::new(2);
const CHILD_B: ProviderId = ProviderId::new(3);
const GRANDCHILD: ProviderId = ProviderId::new(4);

const ANN: ClientId = ClientId::new(1);
const BOB: ClientId = ClientId::new(2);
const CAROL: ClientId = ClientId::new(3);

/// Root session, 50 seats, May 1st.
const ROOT_SESSION: SessionId = SessionId::new(10);
/// Child A session, 20 seats, May 10th.
const CHILD_A_SESSION: SessionId = SessionId::new(20);
/// Child B session, 20 seats, May 20th.
const CHILD_B_SESSION: SessionId = SessionId::new(30);
/// Grandchild session, 20 seats, May 25th.
const GRANDCHILD_SESSION: SessionId = SessionId::new(40);

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn may(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, day, 19, 0, 0).unwrap()
}

/// Builds the catalog: ROOT -> [CHILD_A -> [GRANDCHILD], CHILD_B].
fn catalog() -> Catalog {
    let mut providers = ProviderTree::new(ROOT, "Cinema Group");
    providers
        .add_sub_provider(ROOT, CHILD_A, "Downtown Screens")
        .unwrap()
        .add_sub_provider(ROOT, CHILD_B, "Uptown Screens")
        .unwrap()
        .add_sub_provider(CHILD_A, GRANDCHILD, "Downtown Annex")
        .unwrap();

    let movies = vec![
        Movie::new(MovieId::new(1), "Metropolis", "Silent sci-fi"),
        Movie::new(MovieId::new(2), "Solaris", "Ocean planet"),
        Movie::new(MovieId::new(3), "Stalker", "The Zone"),
    ];

    let clients = vec![
        Client::new(ANN, "Ann"),
        Client::new(BOB, "Bob"),
        Client::new(CAROL, "Carol"),
    ];

    let sessions = vec![
        Session::new(
            ROOT_SESSION,
            MovieId::new(1),
            50,
            may(1),
            ROOT,
            Money::new(dec!(100.50)),
        ),
        Session::new(
            CHILD_A_SESSION,
            MovieId::new(2),
            20,
            may(10),
            CHILD_A,
            Money::new(dec!(40.25)),
        ),
        Session::new(
            CHILD_B_SESSION,
            MovieId::new(3),
            20,
            may(20),
            CHILD_B,
            Money::new(dec!(15)),
        ),
        Session::new(
            GRANDCHILD_SESSION,
            MovieId::new(1),
            20,
            may(25),
            GRANDCHILD,
            Money::new(dec!(7)),
        ),
    ];

    Catalog::new(providers, movies, clients, sessions).unwrap()
}

fn empty_cinema() -> Cinema {
    init_tracing();
    Cinema::new(catalog(), vec![]).unwrap()
}

mod reservation {
    use super::*;

    #[test]
    fn conflicting_request_is_rejected_without_recording() {
        let mut cinema = empty_cinema();

        let first = cinema.reserve(ANN, ROOT_SESSION, &[1, 2, 3]).unwrap();
        assert_eq!(first, ReserveResult::Ok);

        let second = cinema.reserve(BOB, ROOT_SESSION, &[3, 4]).unwrap();
        assert_eq!(second, ReserveResult::SeatAlreadyReserved(3));

        assert_eq!(cinema.reservations().len(), 1);
        assert!(cinema.reservations().iter().all(|r| r.client_id != BOB));
        assert_eq!(cinema.available_seats(ROOT_SESSION).unwrap().len(), 47);
    }

    #[test]
    fn no_seat_is_double_booked() {
        let mut cinema = empty_cinema();
        let requests = [
            (ANN, vec![1, 2]),
            (BOB, vec![2, 3]),
            (CAROL, vec![3, 4]),
            (BOB, vec![5, 1]),
            (CAROL, vec![6]),
            (ANN, vec![4, 7]),
        ];

        for (client, seats) in requests {
            cinema.reserve(client, CHILD_A_SESSION, &seats).unwrap();
        }

        let held = cinema.reserved_seats(CHILD_A_SESSION).unwrap();
        let mut unique = held.clone();
        unique.sort_unstable();
        unique.dedup();
        assert_eq!(held.len(), unique.len());
        assert_eq!(unique, vec![1, 2, 3, 4, 6]);
    }

    #[test]
    fn seat_beyond_capacity_fails_regardless_of_other_seats() {
        let mut cinema = empty_cinema();
        cinema.reserve(ANN, CHILD_B_SESSION, &[1]).unwrap();

        // Seat 1 is taken, but the capacity check happens first.
        let err = cinema
            .reserve(BOB, CHILD_B_SESSION, &[1, 21, 2])
            .unwrap_err();
        assert_eq!(err, CinemaError::SeatNotFound { seat: 21 });

        let err = cinema
            .reserve(BOB, CHILD_B_SESSION, &[22, 21])
            .unwrap_err();
        assert_eq!(err, CinemaError::SeatNotFound { seat: 22 });

        assert_eq!(cinema.reservations().len(), 1);
    }

    #[test]
    fn last_seat_is_reservable() {
        let mut cinema = empty_cinema();
        let result = cinema.reserve(ANN, CHILD_B_SESSION, &[20]).unwrap();
        assert_eq!(result, ReserveResult::Ok);
    }

    #[test]
    fn unknown_client_is_checked_before_session_and_seats() {
        let mut cinema = empty_cinema();

        let err = cinema
            .reserve(ClientId::new(99), SessionId::new(99), &[1000])
            .unwrap_err();
        assert_eq!(
            err,
            CinemaError::ClientNotFound {
                client_id: ClientId::new(99)
            }
        );

        let err = cinema
            .reserve(ANN, SessionId::new(99), &[1000])
            .unwrap_err();
        assert_eq!(
            err,
            CinemaError::SessionNotFound {
                session_id: SessionId::new(99)
            }
        );

        assert!(cinema.reservations().is_empty());
        assert!(cinema.take_events().is_empty());
    }

    #[test]
    fn successful_reservations_emit_events() {
        let mut cinema = empty_cinema();
        cinema.reserve(ANN, ROOT_SESSION, &[8, 9]).unwrap();
        cinema.reserve(BOB, ROOT_SESSION, &[9]).unwrap();
        cinema.reserve(BOB, ROOT_SESSION, &[10]).unwrap();

        let events = cinema.take_events();
        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|e| e.event_type() == "SeatsReserved"));

        let CinemaEvent::SeatsReserved(data) = &events[1];
        assert_eq!(data.client_id, BOB);
        assert_eq!(data.seats, vec![10]);
        assert_eq!(data.reservation_id, cinema.reservations()[1].id);
    }

    #[test]
    fn duplicate_seats_within_one_request_are_accepted() {
        let mut cinema = empty_cinema();
        let result = cinema.reserve(ANN, ROOT_SESSION, &[5, 5]).unwrap();
        assert_eq!(result, ReserveResult::Ok);
        assert_eq!(cinema.reservations()[0].seats, vec![5, 5]);
    }

    #[test]
    fn empty_request_records_empty_reservation() {
        let mut cinema = empty_cinema();
        let result = cinema.reserve(CAROL, CHILD_B_SESSION, &[]).unwrap();
        assert_eq!(result, ReserveResult::Ok);
        assert!(cinema.reservations()[0].seats.is_empty());
        assert_eq!(cinema.watched_movies(CAROL).unwrap().len(), 1);
    }
}

mod watched_movies {
    use super::*;

    fn names(movies: Vec<&Movie>) -> Vec<&str> {
        movies.into_iter().map(|m| m.name.as_str()).collect()
    }

    #[test]
    fn movies_follow_reservation_order_with_duplicates() {
        let mut cinema = empty_cinema();
        cinema.reserve(ANN, CHILD_B_SESSION, &[1]).unwrap();
        cinema.reserve(BOB, ROOT_SESSION, &[1]).unwrap();
        cinema.reserve(ANN, ROOT_SESSION, &[2]).unwrap();
        cinema.reserve(ANN, CHILD_B_SESSION, &[2]).unwrap();

        let watched = cinema.watched_movies(ANN).unwrap();
        assert_eq!(names(watched), vec!["Stalker", "Metropolis", "Stalker"]);

        let watched = cinema.watched_movies(BOB).unwrap();
        assert_eq!(names(watched), vec!["Metropolis"]);
    }

    #[test]
    fn client_without_reservations_has_empty_history() {
        let cinema = empty_cinema();
        assert!(cinema.watched_movies(CAROL).unwrap().is_empty());
    }

    #[test]
    fn unknown_client_fails() {
        let cinema = empty_cinema();
        let err = cinema.watched_movies(ClientId::new(77)).unwrap_err();
        assert_eq!(
            err,
            CinemaError::ClientNotFound {
                client_id: ClientId::new(77)
            }
        );
    }
}

mod provider_earnings {
    use super::*;

    fn booked_cinema() -> Cinema {
        let mut cinema = empty_cinema();
        cinema.reserve(ANN, ROOT_SESSION, &[1]).unwrap();
        cinema.reserve(BOB, ROOT_SESSION, &[2, 3]).unwrap();
        cinema.reserve(ANN, CHILD_A_SESSION, &[1]).unwrap();
        cinema.reserve(CAROL, GRANDCHILD_SESSION, &[1]).unwrap();
        cinema
    }

    #[test]
    fn root_includes_direct_children_only() {
        let cinema = booked_cinema();

        // 2 x 100.50 (root) + 40.25 (child A) + 0 (child B).
        // The grandchild's 7.00 is not included with the default depth.
        let total = cinema.provider_earnings(ROOT, may(1), may(31)).unwrap();
        assert_eq!(total, Money::new(dec!(241.25)));
    }

    #[test]
    fn child_includes_its_own_children() {
        let cinema = booked_cinema();
        let total = cinema.provider_earnings(CHILD_A, may(1), may(31)).unwrap();
        assert_eq!(total, Money::new(dec!(47.25)));
    }

    #[test]
    fn provider_without_reservations_earns_zero() {
        let cinema = booked_cinema();
        let total = cinema.provider_earnings(CHILD_B, may(1), may(31)).unwrap();
        assert!(total.is_zero());
    }

    #[test]
    fn date_range_is_ignored_by_default() {
        let cinema = booked_cinema();
        let far_past = Utc.with_ymd_and_hms(1990, 1, 1, 0, 0, 0).unwrap();
        let total = cinema
            .provider_earnings(ROOT, far_past, far_past)
            .unwrap();
        assert_eq!(total, Money::new(dec!(241.25)));
    }

    #[test]
    fn whole_subtree_depth_includes_grandchildren() {
        let cinema = booked_cinema().with_config(EarningsConfig {
            depth: EarningsDepth::WholeSubtree,
            filter_by_date: false,
        });
        let total = cinema.provider_earnings(ROOT, may(1), may(31)).unwrap();
        assert_eq!(total, Money::new(dec!(248.25)));
    }

    #[test]
    fn date_filter_is_inclusive() {
        let cinema = booked_cinema().with_config(EarningsConfig::full());

        // Only the child A (May 10th) and grandchild (May 25th) sessions.
        let total = cinema.provider_earnings(ROOT, may(10), may(25)).unwrap();
        assert_eq!(total, Money::new(dec!(47.25)));

        let total = cinema.provider_earnings(ROOT, may(11), may(24)).unwrap();
        assert!(total.is_zero());
    }

    #[test]
    fn unknown_provider_fails() {
        let cinema = booked_cinema();
        let err = cinema
            .provider_earnings(ProviderId::new(404), may(1), may(2))
            .unwrap_err();
        assert_eq!(
            err,
            CinemaError::ProviderNotFound {
                provider_id: ProviderId::new(404)
            }
        );
    }
}

mod seeding {
    use super::*;

    #[test]
    fn seeded_reservations_match_reserved_ones() {
        let seeded = Cinema::new(
            catalog(),
            vec![
                Reservation::new(ANN, ROOT_SESSION, vec![1]),
                Reservation::new(ANN, CHILD_A_SESSION, vec![4]),
                Reservation::new(BOB, CHILD_B_SESSION, vec![2]),
            ],
        )
        .unwrap();

        let mut reserved = empty_cinema();
        reserved.reserve(ANN, ROOT_SESSION, &[1]).unwrap();
        reserved.reserve(ANN, CHILD_A_SESSION, &[4]).unwrap();
        reserved.reserve(BOB, CHILD_B_SESSION, &[2]).unwrap();

        assert_eq!(
            seeded.watched_movies(ANN).unwrap(),
            reserved.watched_movies(ANN).unwrap()
        );
        assert_eq!(
            seeded.provider_earnings(ROOT, may(1), may(31)).unwrap(),
            reserved.provider_earnings(ROOT, may(1), may(31)).unwrap()
        );
    }

    #[test]
    fn seeded_seats_block_new_reservations() {
        let mut cinema = Cinema::new(
            catalog(),
            vec![Reservation::new(CAROL, ROOT_SESSION, vec![12])],
        )
        .unwrap();

        let result = cinema.reserve(ANN, ROOT_SESSION, &[11, 12]).unwrap();
        assert_eq!(result, ReserveResult::SeatAlreadyReserved(12));
    }

    #[test]
    fn seeding_does_not_emit_events() {
        let mut cinema = Cinema::new(
            catalog(),
            vec![Reservation::new(CAROL, ROOT_SESSION, vec![1])],
        )
        .unwrap();
        assert!(cinema.take_events().is_empty());
    }

    #[test]
    fn seed_with_unknown_references_is_rejected() {
        let err = Cinema::new(
            catalog(),
            vec![Reservation::new(ClientId::new(50), ROOT_SESSION, vec![1])],
        )
        .unwrap_err();
        assert_eq!(
            err,
            CatalogError::UnknownClient {
                client_id: ClientId::new(50)
            }
        );

        let err = Cinema::new(
            catalog(),
            vec![Reservation::new(ANN, SessionId::new(50), vec![1])],
        )
        .unwrap_err();
        assert_eq!(
            err,
            CatalogError::UnknownSession {
                session_id: SessionId::new(50)
            }
        );
    }
}
