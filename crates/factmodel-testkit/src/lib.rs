//! # factmodel Testkit
//!
//! Testing utilities for factmodel.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Fixed scenarios with their expected transaction JSON
//! - **Generators**: Proptest strategies for property-based testing
//! - **Fixtures**: A session with two declared types and instance shortcuts
//!
//! ## Golden Vectors
//!
//! ```rust
//! use factmodel_testkit::vectors::verify_all_vectors;
//!
//! for (name, matches, rendered) in verify_all_vectors() {
//!     assert!(matches, "{name}: {rendered}");
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use factmodel_testkit::generators::{mouse_from_params, TagChangeParams};
//! use factmodel_testkit::TestFixture;
//!
//! proptest! {
//!     #[test]
//!     fn tag_change_is_deterministic(params: TagChangeParams) {
//!         let fixture = TestFixture::starting_at(-1);
//!         let a = mouse_from_params(&fixture, &params).tx_data().unwrap();
//!         let fixture = TestFixture::starting_at(-1);
//!         let b = mouse_from_params(&fixture, &params).tx_data().unwrap();
//!         prop_assert_eq!(a, b);
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use factmodel_testkit::fixtures::TestFixture;
//!
//! let fixture = TestFixture::new();
//! let jerry = fixture.mouse("Jerry", &["fast"]);
//! assert!(jerry.is_new_record());
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{mouse_type, symbols, user_type, TestFixture};
pub use generators::{mouse_from_params, TagChangeParams};
pub use vectors::{all_vectors, render_vector, verify_all_vectors, GoldenVector};
