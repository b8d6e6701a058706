mod blockchain;

use chrono::Utc;
use dotenvy::dotenv;
use serde_json::json;
use std::env;

use blockchain::{Block, Blockchain, DEFAULT_DIFFICULTY};

fn main() {
    let _ = dotenv();
    env_logger::init();

    let difficulty: u32 = env::var("DIFFICULTY")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_DIFFICULTY);

    let mut ledger = Blockchain::new(difficulty);
    println!(
        "⛓️ Starting proof-of-work ledger (difficulty {})",
        ledger.difficulty()
    );

    let today = Utc::now().format("%d/%m/%Y").to_string();

    println!("Mining block 1...");
    ledger.add_block(Block::new(
        1,
        today.clone(),
        json!({ "sender": "Dragan", "receiver": "Zlate", "amount": 10 }),
    ));

    println!("Mining block 2...");
    ledger.add_block(Block::new(
        2,
        today,
        json!({ "sender": "Zlate", "receiver": "KlimenT", "amount": 99 }),
    ));

    println!(
        "{}",
        serde_json::to_string_pretty(&ledger).expect("serialize chain")
    );
    println!("Is this chain valid? {}", ledger.is_valid_chain());
}
