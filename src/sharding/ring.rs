//! Consistent-hash ring.
//!
//! # Responsibilities
//! - Place each member at a fixed number of virtual positions on a u64
//!   circle
//! - Map a key to the member owning the first position at or after the
//!   key's hash, wrapping around
//!
//! # Design Decisions
//! - Keyless xxh3 positions, so placement is identical across process runs
//! - BTreeMap range scan for the wrap-around lookup
//! - Removing a member remaps only the keys that member owned

use std::collections::BTreeMap;

use xxhash_rust::xxh3::xxh3_64;

use crate::error::Error;

/// Default virtual nodes per member.
pub const DEFAULT_VNODES: usize = 20;

/// Consistent-hash ring over member names.
#[derive(Debug, Clone)]
pub struct HashRing {
    vnodes: usize,
    positions: BTreeMap<u64, String>,
}

impl HashRing {
    /// A ring placing each member at `vnodes` virtual positions. A count of
    /// zero is clamped to one so every member owns at least one position.
    pub fn new(vnodes: usize) -> Self {
        Self {
            vnodes: vnodes.max(1),
            positions: BTreeMap::new(),
        }
    }

    /// Insert `member` at its virtual positions.
    ///
    /// Positions are derived from the member name alone, so re-adding an
    /// existing member rewrites the same entries.
    pub fn add(&mut self, member: &str) {
        for index in 0..self.vnodes {
            self.positions
                .insert(Self::position(member, index), member.to_string());
        }
    }

    /// Remove `member`'s virtual positions.
    pub fn remove(&mut self, member: &str) {
        for index in 0..self.vnodes {
            self.positions.remove(&Self::position(member, index));
        }
    }

    /// The member owning `key`: the first position at or after the key's
    /// hash, wrapping around to the start of the circle.
    pub fn get(&self, key: &str) -> Result<&str, Error> {
        let hash = xxh3_64(key.as_bytes());
        self.positions
            .range(hash..)
            .next()
            .or_else(|| self.positions.iter().next())
            .map(|(_, member)| member.as_str())
            .ok_or(Error::EmptyRing)
    }

    /// Whether the ring has any members.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    fn position(member: &str, index: usize) -> u64 {
        xxh3_64(format!("{member}#{index}").as_bytes())
    }
}
