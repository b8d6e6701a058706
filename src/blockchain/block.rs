use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::sync::atomic::{AtomicBool, Ordering};

use super::{GENESIS_PAYLOAD, GENESIS_TIMESTAMP, PREVIOUS_HASH_SENTINEL};

/// A single block in the ledger holding an opaque JSON payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    pub index: u64,
    pub timestamp: String, // opaque to the core, only hashed
    pub payload: Value,
    pub previous_hash: String,
    pub nonce: u64,   // Proof-of-Work nonce
    pub hash: String, // Cached hash of the block
}

impl Block {
    /// Create the genesis block (first block in the chain).
    pub fn genesis() -> Self {
        let mut block = Self {
            index: 0,
            timestamp: GENESIS_TIMESTAMP.to_string(),
            payload: Value::String(GENESIS_PAYLOAD.to_string()),
            previous_hash: PREVIOUS_HASH_SENTINEL.to_string(),
            nonce: 0,
            hash: String::new(),
        };
        block.hash = block.compute_hash();
        block
    }

    /// Create a candidate block, not linked or mined yet. `add_block`
    /// overwrites `previous_hash` and calls `mine()` before appending.
    pub fn new(index: u64, timestamp: String, payload: Value) -> Self {
        let mut block = Self {
            index,
            timestamp,
            payload,
            previous_hash: PREVIOUS_HASH_SENTINEL.to_string(),
            nonce: 0,
            hash: String::new(),
        };
        block.hash = block.compute_hash();
        block
    }

    /// Compute the SHA-256 hash of this block using its fields
    /// (excluding the `hash` field itself). The payload is serialized
    /// as JSON with sorted object keys, so logically equal payloads
    /// always contribute identical bytes to the preimage.
    pub fn compute_hash(&self) -> String {
        let payload_json = serde_json::to_string(&self.payload).expect("serialize payload");
        let preimage = format!(
            "{}:{}:{}:{}:{}",
            self.index, self.previous_hash, self.timestamp, payload_json, self.nonce
        );
        let mut hasher = Sha256::new();
        hasher.update(preimage.as_bytes());
        let digest = hasher.finalize();
        hex::encode(digest)
    }

    /// Perform Proof-of-Work by finding a nonce that yields a hash
    /// starting with `difficulty` leading zeros (in hex). Blocks the
    /// calling thread until a satisfying nonce is found.
    pub fn mine(&mut self, difficulty: u32) {
        let target_prefix = "0".repeat(difficulty as usize);
        loop {
            self.hash = self.compute_hash();
            if self.hash.starts_with(&target_prefix) {
                break;
            }
            self.nonce = self.nonce.wrapping_add(1);
        }
        info!("Block mined: {}", self.hash);
        debug!("block #{} sealed at nonce {}", self.index, self.nonce);
    }

    /// Like `mine`, but checks a stop flag between attempts so a caller
    /// can abort the search (e.g. on shutdown). Returns `true` once
    /// `hash` meets the difficulty, `false` if `stop` was raised first.
    pub fn mine_cancellable(&mut self, difficulty: u32, stop: &AtomicBool) -> bool {
        let target_prefix = "0".repeat(difficulty as usize);
        loop {
            self.hash = self.compute_hash();
            if self.hash.starts_with(&target_prefix) {
                info!("Block mined: {}", self.hash);
                return true;
            }
            if stop.load(Ordering::Relaxed) {
                debug!(
                    "block #{} mining cancelled at nonce {}",
                    self.index, self.nonce
                );
                return false;
            }
            self.nonce = self.nonce.wrapping_add(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Block;
    use serde_json::json;
    use std::sync::atomic::AtomicBool;

    #[test]
    fn genesis_has_valid_hash() {
        let b = Block::genesis();
        assert_eq!(b.index, 0);
        assert_eq!(b.previous_hash, "0000");
        assert_eq!(b.payload, json!("Genesis Block"));
        assert_eq!(b.hash, b.compute_hash());
        assert!(!b.hash.is_empty());
    }

    #[test]
    fn compute_hash_is_deterministic() {
        let b = Block::new(
            1,
            "31/12/2017".into(),
            json!({ "sender": "Dragan", "receiver": "Zlate", "amount": 10 }),
        );
        let first = b.compute_hash();
        for _ in 0..5 {
            assert_eq!(first, b.compute_hash());
        }
    }

    #[test]
    fn payload_key_order_does_not_change_hash() {
        let a = Block::new(
            1,
            "31/12/2017".into(),
            json!({ "amount": 10, "sender": "Dragan", "receiver": "Zlate" }),
        );
        let b = Block::new(
            1,
            "31/12/2017".into(),
            json!({ "sender": "Dragan", "receiver": "Zlate", "amount": 10 }),
        );
        assert_eq!(a.compute_hash(), b.compute_hash());
    }

    #[test]
    fn hash_depends_on_every_field() {
        let base = Block::new(1, "31/12/2017".into(), json!("payload"));

        let mut changed = base.clone();
        changed.nonce += 1;
        assert_ne!(base.compute_hash(), changed.compute_hash());

        let mut changed = base.clone();
        changed.payload = json!("tampered");
        assert_ne!(base.compute_hash(), changed.compute_hash());

        let mut changed = base.clone();
        changed.previous_hash = "ffff".into();
        assert_ne!(base.compute_hash(), changed.compute_hash());

        let mut changed = base.clone();
        changed.timestamp = "01/01/2018".into();
        assert_ne!(base.compute_hash(), changed.compute_hash());
    }

    #[test]
    fn mining_produces_leading_zeros() {
        for difficulty in 0..=4u32 {
            let mut b = Block::new(1, "31/12/2017".into(), json!({ "amount": 10 }));
            b.mine(difficulty);
            assert!(b.hash.chars().take(difficulty as usize).all(|c| c == '0'));
            assert_eq!(b.hash, b.compute_hash());
        }
    }

    #[test]
    fn zero_difficulty_matches_at_nonce_zero() {
        let mut b = Block::new(1, "31/12/2017".into(), json!("data"));
        b.mine(0);
        assert_eq!(b.nonce, 0);
        assert_eq!(b.hash, b.compute_hash());
    }

    #[test]
    fn cancelled_mining_stops_without_a_result() {
        let stop = AtomicBool::new(true);
        let mut b = Block::new(1, "31/12/2017".into(), json!("data"));
        // 64 leading zeros is unreachable; only the stop flag ends the loop.
        assert!(!b.mine_cancellable(64, &stop));
    }

    #[test]
    fn cancellable_mining_succeeds_when_not_stopped() {
        let stop = AtomicBool::new(false);
        let mut b = Block::new(1, "31/12/2017".into(), json!("data"));
        assert!(b.mine_cancellable(2, &stop));
        assert!(b.hash.starts_with("00"));
    }
}
