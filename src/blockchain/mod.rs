pub mod block;
pub mod model;

pub use block::Block;
pub use model::Blockchain;

/// Default Proof-of-Work difficulty (number of leading zeros).
pub const DEFAULT_DIFFICULTY: u32 = 2;

/// Fixed genesis parameters; every chain starts from this exact block.
pub const GENESIS_TIMESTAMP: &str = "30/12/2017";
pub const GENESIS_PAYLOAD: &str = "Genesis Block";

/// `previous_hash` placeholder for genesis and for candidates that have
/// not been linked to a tail yet.
pub const PREVIOUS_HASH_SENTINEL: &str = "0000";
