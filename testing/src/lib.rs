//! # Commerce Shipping Testing
//!
//! Testing utilities for the shipping workspace.
//!
//! This crate provides:
//! - Mock implementations of environment traits ([`FixedClock`])
//! - An in-memory [`EntityStorage`](commerce_shipping_core::storage::EntityStorage)
//!   with failure injection ([`InMemoryEntityStorage`])
//! - Log output for tests ([`init_tracing`])
//!
//! ## Example
//!
//! ```ignore
//! use commerce_shipping_testing::{test_clock, InMemoryEntityStorage};
//!
//! #[tokio::test]
//! async fn cancels_shipments() {
//!     let shipments = Arc::new(InMemoryEntityStorage::<Shipment>::new());
//!     let mut shipment = Shipment::new(OrderId::new("1"), "ready", &test_clock());
//!     shipments.save(&mut shipment).await.unwrap();
//!     assert_eq!(shipments.len(), 1);
//! }
//! ```

use chrono::{DateTime, Utc};
use commerce_shipping_core::environment::Clock;

pub mod storage;

/// Mock implementations for testing.
pub mod mocks {
    use super::{Clock, DateTime, Utc};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use commerce_shipping_testing::mocks::FixedClock;
    /// use commerce_shipping_core::environment::Clock;
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

        /// Create a fixed clock at a UNIX timestamp (seconds)
        #[must_use]
        pub fn at_timestamp(timestamp: i64) -> Self {
            Self::new(DateTime::from_timestamp(timestamp, 0).unwrap_or_default())
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    #[must_use]
    pub fn test_clock() -> FixedClock {
        FixedClock::at_timestamp(TEST_EPOCH)
    }

    /// UNIX timestamp [`test_clock`] is fixed at
    pub const TEST_EPOCH: i64 = 1_735_689_600;
}

/// Install a `tracing` subscriber for test output.
///
/// Honors `RUST_LOG` and defaults to `warn`. Safe to call from every test;
/// only the first call installs anything.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

// Re-export commonly used items
pub use mocks::{FixedClock, TEST_EPOCH, test_clock};
pub use storage::InMemoryEntityStorage;
