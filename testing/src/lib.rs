//! # CineReservas Testing
//!
//! Testing utilities for CineReservas reducers and stores.
//!
//! This crate provides:
//! - Deterministic clocks for the `Clock` environment trait
//! - [`ReducerTest`], a Given-When-Then harness for reducers
//! - Helpers that drive effects to completion without a store
//!
//! ## Example
//!
//! ```ignore
//! use cinereservas_testing::{test_clock, ReducerTest};
//!
//! ReducerTest::new(ReservationReducer::new())
//!     .with_env(test_environment())
//!     .given_state(seeded_state())
//!     .when_action(ReservationAction::CancelBooking { booking_id: BookingId::new(1) })
//!     .then_state(|state| assert!(state.last_error.is_none()))
//!     .run();
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use cinereservas_core::environment::Clock;

pub mod reducer_test;

pub use reducer_test::{assertions, ReducerTest};

/// Mock implementations of Environment traits
pub mod mocks {
    use super::{Clock, DateTime, NaiveDate, Utc};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use cinereservas_testing::mocks::FixedClock;
    /// use cinereservas_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }

        /// Fixed clock at midnight UTC of `date`
        #[must_use]
        pub fn on_date(date: NaiveDate) -> Self {
            Self::new(date.and_time(chrono::NaiveTime::MIN).and_utc())
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// The date every [`test_clock`] reports: 2025-01-01
    #[must_use]
    pub fn test_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap_or_default()
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    #[must_use]
    pub fn test_clock() -> FixedClock {
        FixedClock::on_date(test_date())
    }
}

/// Test helpers
pub mod helpers {
    use cinereservas_core::effect::Effect;
    use futures::future::BoxFuture;

    /// Install a fmt subscriber for the current test binary.
    ///
    /// Safe to call from every test; only the first call takes effect.
    pub fn init_test_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .try_init();
    }

    /// Execute effects and collect the actions they feed back.
    ///
    /// Delays are not awaited. Parallel effects run in declaration order.
    pub async fn collect_actions<A: Send + 'static>(effects: Vec<Effect<A>>) -> Vec<A> {
        let mut actions = Vec::new();
        for effect in effects {
            actions.extend(collect(effect).await);
        }
        actions
    }

    fn collect<A: Send>(effect: Effect<A>) -> BoxFuture<'static, Vec<A>>
    where
        A: 'static,
    {
        Box::pin(async move {
            match effect {
                Effect::None => Vec::new(),
                Effect::Parallel(effects) | Effect::Sequential(effects) => {
                    let mut actions = Vec::new();
                    for effect in effects {
                        actions.extend(collect(effect).await);
                    }
                    actions
                },
                Effect::Delay { action, .. } => vec![*action],
                Effect::Future(future) => future.await.into_iter().collect(),
            }
        })
    }
}

pub use helpers::{collect_actions, init_test_tracing};
pub use mocks::{test_clock, test_date, FixedClock};

#[cfg(test)]
mod tests {
    use super::*;
    use cinereservas_core::effect::Effect;

    #[test]
    fn fixed_clock_is_stable() {
        let clock = test_clock();
        assert_eq!(clock.now(), clock.now());
        assert_eq!(clock.today(), test_date());
    }

    #[tokio::test]
    async fn collect_actions_flattens_nested_effects() {
        let effects = vec![
            Effect::None,
            Effect::merge(vec![
                Effect::future(async { Some(1) }),
                Effect::future(async { None }),
            ]),
            Effect::Delay {
                duration: std::time::Duration::from_secs(60),
                action: Box::new(2),
            },
        ];
        assert_eq!(collect_actions(effects).await, vec![1, 2]);
    }
}
