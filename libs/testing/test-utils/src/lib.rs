//! Shared test utilities for domain testing
//!
//! - `TestMongo`: MongoDB container with automatic cleanup (feature: "mongo")
//! - `TestDataBuilder`: Deterministic test data generation (always available)
//! - `assertions`: Custom assertion helpers (always available)
//!
//! # Usage
//!
//! ```rust,no_run
//! use test_utils::{TestDataBuilder, TestMongo};
//!
//! #[tokio::test]
//! async fn my_mongo_test() {
//!     let mongo = TestMongo::new().await;
//!     let builder = TestDataBuilder::from_test_name("my_test");
//!
//!     let db = mongo.database(&builder.database_name());
//!     let code = builder.code(1);
//! }
//! ```

#[cfg(feature = "mongo")]
mod mongo;

#[cfg(feature = "mongo")]
pub use mongo::TestMongo;

/// Builder for test data with deterministic randomization
///
/// This ensures tests are reproducible by using seeded random data.
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    /// Create a new builder with a seed (for deterministic tests)
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Create from test name (generates seed from test name hash)
    ///
    /// # Example
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::from_test_name("test_create_product");
    /// ```
    pub fn from_test_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// Deterministic product code, distinct for each `n` within a builder
    ///
    /// Codes stay positive and leave room for 1000 values per builder.
    pub fn code(&self, n: u32) -> i64 {
        let base = (self.seed % 1_000_000) as i64 * 1000;
        base + i64::from(n % 1000)
    }

    /// Generate a unique name for testing
    ///
    /// # Example
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::new(12345);
    /// assert_eq!(builder.name("producto", "main"), "test-producto-12345-main");
    /// ```
    pub fn name(&self, prefix: &str, suffix: &str) -> String {
        format!("test-{}-{}-{}", prefix, self.seed, suffix)
    }

    /// Database name unique to this builder, within MongoDB's 63-byte limit
    pub fn database_name(&self) -> String {
        format!("test_{:x}", self.seed)
    }
}

/// Test assertion helpers
pub mod assertions {
    /// Assert that `value` looks like a hex-encoded ObjectId
    pub fn assert_object_id_hex(value: &str, context: &str) {
        assert!(
            value.len() == 24 && value.chars().all(|c| c.is_ascii_hexdigit()),
            "{}: expected 24 hex chars, got {:?}",
            context,
            value
        );
    }

    /// Assert that an optional value is Some
    pub fn assert_some<T>(value: Option<T>, context: &str) -> T {
        value.unwrap_or_else(|| panic!("{}: expected Some, got None", context))
    }
}
