//! Item identifiers.
//!
//! # Design
//! Ids are ULIDs: a 48-bit millisecond timestamp followed by 80 random bits,
//! rendered as 26 Crockford base-32 characters. Sorting tokens as strings
//! sorts items by creation time, so "ordered by id" and "ordered by creation"
//! are the same thing in every store.

use std::fmt;
use std::str::FromStr;
use std::sync::{Mutex, PoisonError};
use std::time::SystemTime;

use serde::{Deserialize, Serialize};
use ulid::{Generator, Ulid};

use crate::error::MalformedId;

/// Length of the external token form.
pub const TOKEN_LEN: usize = ulid::ULID_LEN;

/// Identifier of a todo item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(Ulid);

impl ItemId {
    /// Parse an externally supplied token.
    ///
    /// 26 base-32 characters hold 130 bits, so a leading character above `7`
    /// would overflow 128 bits and is rejected.
    pub fn parse(token: &str) -> Result<Self, MalformedId> {
        if token.len() == TOKEN_LEN && token.as_bytes().first().is_some_and(|&b| b > b'7') {
            return Err(MalformedId {
                token: token.to_string(),
                source: ulid::DecodeError::InvalidChar,
            });
        }
        Ulid::from_string(token)
            .map(Self)
            .map_err(|source| MalformedId {
                token: token.to_string(),
                source,
            })
    }

    /// Creation time embedded in the id, at millisecond precision.
    pub fn created_at(&self) -> SystemTime {
        self.0.datetime()
    }
}

impl From<Ulid> for ItemId {
    fn from(ulid: Ulid) -> Self {
        Self(ulid)
    }
}

impl FromStr for ItemId {
    type Err = MalformedId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Source of new item ids.
///
/// Ids from one generator are strictly increasing, including ids minted in
/// the same millisecond. If the random part overflows within a millisecond,
/// the generator waits for the next one. Ids from separate generators (other
/// processes) only order by millisecond, which is all the store needs for
/// creation order.
pub struct IdGenerator {
    inner: Mutex<Generator>,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Generator::new()),
        }
    }

    pub fn next_id(&self) -> ItemId {
        let mut generator = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        loop {
            match generator.generate() {
                Ok(ulid) => return ItemId(ulid),
                // Random part exhausted for this millisecond.
                Err(_) => std::thread::yield_now(),
            }
        }
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for IdGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdGenerator").finish_non_exhaustive()
    }
}
