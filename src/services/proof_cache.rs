use crate::services::clock::Clock;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Short-lived memoization of transaction hashes already accepted as valid
/// payment proof. Lets a client resubmit the same receipt within the TTL
/// window without triggering another RPC round trip.
///
/// A single lock guards the whole map. Entries are evicted lazily: a stale
/// entry is deleted the moment a lookup finds it expired. The lock is never
/// held across network calls.
pub struct ProofCache {
    ttl: Duration,
    clock: Arc<dyn Clock>,
    entries: Mutex<HashMap<String, Instant>>,
}

impl ProofCache {
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            ttl,
            clock,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Marks `tx_hash` accepted as of now. Overwrites any previous entry.
    pub fn record_accepted(&self, tx_hash: &str) {
        let now = self.clock.now();
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(tx_hash.to_string(), now);
    }

    /// True iff `tx_hash` was accepted within the TTL window. A stale entry
    /// is removed as a side effect of the lookup that finds it.
    pub fn is_valid_and_fresh(&self, tx_hash: &str) -> bool {
        let now = self.clock.now();
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        match entries.get(tx_hash) {
            Some(&accepted_at) if now.duration_since(accepted_at) <= self.ttl => true,
            Some(_) => {
                entries.remove(tx_hash);
                false
            }
            None => false,
        }
    }
}
