use log::debug;
use serde::Serialize;

use super::Block;

/// Simple in-memory proof-of-work ledger.
#[derive(Debug, Serialize)]
pub struct Blockchain {
    pub chain: Vec<Block>,
    pub difficulty: u32,
}

impl Blockchain {
    /// Initialize a new blockchain with a genesis block.
    pub fn new(difficulty: u32) -> Self {
        let mut bc = Self {
            chain: Vec::new(),
            difficulty,
        };
        bc.chain.push(Block::genesis());
        bc
    }

    /// Return the last block in the chain.
    pub fn last_block(&self) -> &Block {
        self.chain
            .last()
            .expect("Blockchain should always have at least the genesis block")
    }

    /// Link `candidate` to the current tail, mine it at the configured
    /// difficulty and append it. Blocks until mining succeeds. The
    /// candidate's index is taken as-is; keeping it contiguous is the
    /// caller's job.
    pub fn add_block(&mut self, mut candidate: Block) -> &Block {
        candidate.previous_hash = self.last_block().hash.clone();
        debug!(
            "mining block #{} on top of {}",
            candidate.index, candidate.previous_hash
        );
        candidate.mine(self.difficulty);
        self.chain.push(candidate);
        self.last_block()
    }

    /// Validate the chain: every block's cached hash must match its
    /// recomputed content hash, and every `previous_hash` must equal
    /// the predecessor's hash. Genesis is trusted by construction; the
    /// difficulty prefix and index contiguity are not re-checked.
    pub fn is_valid_chain(&self) -> bool {
        for i in 1..self.chain.len() {
            let current = &self.chain[i];
            let prev = &self.chain[i - 1];

            // Check hash integrity
            if current.hash != current.compute_hash() {
                return false;
            }

            // Check linkage
            if current.previous_hash != prev.hash {
                return false;
            }
        }
        true
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn difficulty(&self) -> u32 {
        self.difficulty
    }
}
