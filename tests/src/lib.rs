//! # Bucket Discovery Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── e2e_membership.rs   # Multi-node join/refresh/leave against one bucket
//!     ├── flows.rs            # Pagination, corrupt objects, metrics wiring
//!     └── config_reload.rs    # Property file edits between cycles
//! tests/benches/
//! └── discovery_benchmarks.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p discovery-tests
//! cargo test -p discovery-tests integration::flows::
//! cargo bench -p discovery-tests
//! ```

pub mod integration;
