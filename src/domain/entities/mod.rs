//! Core domain entities.
//!
//! - [`ShortUrl`] - A stored name-to-link mapping
//! - [`ShortUrlId`] - Opaque record identifier
//! - [`IdempotencyKey`] - Token identifying one logical creation attempt

pub mod short_url;

pub use short_url::{IdempotencyKey, ShortUrl, ShortUrlId};
