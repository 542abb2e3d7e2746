//! Domain Layer - Pure membership logic with no I/O
//!
//! This module contains:
//! - Membership records and their text codec
//! - Registry configuration and its validation rules
//! - Bucket health classification
//! - Error taxonomy shared by ports and services

pub mod config;
pub mod entities;
pub mod errors;
pub mod health;
pub mod record;

pub use config::*;
pub use entities::*;
pub use errors::*;
pub use health::*;
pub use record::*;
