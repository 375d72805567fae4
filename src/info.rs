//! Host identity data model
//!
//! One [`InfoSnapshot`] captures the machine's hostname together with every
//! network interface and the addresses bound to it. A snapshot is built in
//! full by the collector and never mutated afterwards; refreshing produces a
//! new snapshot that replaces the old one wholesale.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Immutable capture of the host's identity.
///
/// The wire field names `Hostname` and `Addresses` are a compatibility
/// requirement for existing consumers of the `/info` endpoint and must not be
/// renamed. An interface with no bound addresses maps to an empty list, never
/// to a missing key. `BTreeMap` keeps the JSON key order stable so repeated
/// requests serve byte-identical bodies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfoSnapshot {
    #[serde(rename = "Hostname")]
    pub hostname: String,

    /// Interface name to its addresses, in the order the OS reported them.
    #[serde(rename = "Addresses")]
    pub addresses: BTreeMap<String, Vec<String>>,
}

impl InfoSnapshot {
    pub fn new(hostname: String, addresses: BTreeMap<String, Vec<String>>) -> Self {
        Self {
            hostname,
            addresses,
        }
    }
}
