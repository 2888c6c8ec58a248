//! Helper functions for identifier generation, name validation and request handling.
//!
//! - [`id_generator`] - UUIDv7 record identifiers and idempotency keys
//! - [`name_validator`] - Short name validation
//! - [`deadline`] - Per-request deadlines
//! - [`db_error`] - Database error classification

pub mod db_error;
pub mod deadline;
pub mod id_generator;
pub mod name_validator;
