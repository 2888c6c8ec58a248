//! Identifier and idempotency key generation.
//!
//! Both kinds of values are UUIDv7 strings: a 48-bit Unix millisecond
//! timestamp followed by a 74-bit sequence. The sequence starts from random
//! bits drawn from the OS entropy source on every new millisecond and is
//! incremented for each value produced within the same millisecond, so values
//! from this process sort strictly by creation order.

use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::json;
use uuid::Uuid;

use crate::domain::entities::{IdempotencyKey, ShortUrlId};
use crate::error::AppError;

const SEQUENCE_BITS: u32 = 74;
const RAND_B_BITS: u32 = 62;
const SEQUENCE_MASK: u128 = (1_u128 << SEQUENCE_BITS) - 1;
const RAND_B_MASK: u128 = (1_u128 << RAND_B_BITS) - 1;

/// Last timestamp and sequence handed out.
struct State {
    millis: u64,
    sequence: u128,
}

static STATE: Mutex<State> = Mutex::new(State {
    millis: 0,
    sequence: 0,
});

/// Generates a fresh record identifier.
///
/// # Errors
///
/// Returns [`AppError::Generation`] if the system clock is before the Unix
/// epoch or the entropy source fails.
pub fn new_id() -> Result<ShortUrlId, AppError> {
    new_uuid_v7().map(ShortUrlId::new)
}

/// Generates a fresh idempotency key.
///
/// # Errors
///
/// See [`new_id`].
pub fn new_idempotency_key() -> Result<IdempotencyKey, AppError> {
    new_uuid_v7().map(IdempotencyKey::new)
}

fn new_uuid_v7() -> Result<String, AppError> {
    let now = unix_millis()?;

    let mut state = STATE
        .lock()
        .map_err(|_| AppError::generation("Id generator state is poisoned", json!({})))?;

    // A clock that stepped backwards keeps the last timestamp.
    if now > state.millis {
        state.millis = now;
        state.sequence = random_sequence()?;
    } else if state.sequence < SEQUENCE_MASK {
        state.sequence += 1;
    } else {
        state.millis += 1;
        state.sequence = random_sequence()?;
    }

    Ok(encode(state.millis, state.sequence).hyphenated().to_string())
}

fn unix_millis() -> Result<u64, AppError> {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| {
            AppError::generation(
                "System clock is before the Unix epoch",
                json!({ "reason": e.to_string() }),
            )
        })?
        .as_millis();

    u64::try_from(millis).map_err(|_| {
        AppError::generation(
            "System clock is out of range",
            json!({ "millis": millis.to_string() }),
        )
    })
}

/// Random starting sequence with the top bit clear, leaving room to count.
fn random_sequence() -> Result<u128, AppError> {
    let mut random = [0u8; 16];
    getrandom::fill(&mut random).map_err(|e| {
        AppError::generation(
            "Failed to read random bytes",
            json!({ "reason": e.to_string() }),
        )
    })?;

    Ok(u128::from_be_bytes(random) & (SEQUENCE_MASK >> 1))
}

/// Lays out `unix_ts_ms | ver | rand_a | var | rand_b`.
fn encode(millis: u64, sequence: u128) -> Uuid {
    let rand_a = (sequence >> RAND_B_BITS) & 0xfff;
    let rand_b = sequence & RAND_B_MASK;

    let bits = (u128::from(millis & 0xffff_ffff_ffff) << 80)
        | (0x7_u128 << 76)
        | (rand_a << 64)
        | (0b10_u128 << 62)
        | rand_b;

    Uuid::from_u128(bits)
}
