//! Quickstart - Essential Aptos read operations
//!
//! Covers: ledger info, collection and token lookups, balances, faucet funding
//!
//! Run: cargo run --example quickstart
//!
//! Optional environment variables:
//!   APTOS_NETWORK=devnet
//!   APTOS_PRIVATE_KEY=0x...

use aptos_kit::*;

const CREATOR: &str = "0xaef92afd9bcce9a48a66ec4088b19624ebb5b3658e3d5669b3fa58412edec093";
const COLLECTION: &str = "LifeMining Profile Collection V1";
const TOKEN: &str = "LMProfileV1: 0x000001's Profile";

// ============================================================================
// 1. Ledger and token metadata (read-only)
// ============================================================================

async fn token_example(aptos: &Aptos) -> Result<(), Error> {
    println!("=== Token Example ===\n");

    let ledger = aptos.ledger_info().await?;
    println!("Chain {} at version {}", ledger.chain_id, ledger.ledger_version);

    let tokens = aptos.tokens();

    match tokens.collection_data(CREATOR, COLLECTION).await {
        Ok(collection) => println!("{}: {} minted", collection.name, collection.supply),
        Err(e) if e.is_not_found() => println!("No collection named {COLLECTION}"),
        Err(e) => return Err(e),
    }

    match tokens.token_data(CREATOR, COLLECTION, TOKEN).await {
        Ok(data) => {
            println!("{} -> {}", data.name, data.uri);
            for property in data.default_properties.iter() {
                println!("  {} ({})", property.key, property.value.type_tag);
            }
        }
        Err(e) if e.is_not_found() => println!("No token named {TOKEN}"),
        Err(e) => return Err(e),
    }

    let held = tokens.token(CREATOR, COLLECTION, TOKEN, 0).await?;
    println!("Creator holds {}", held.amount);

    Ok(())
}

// ============================================================================
// 2. Fund the configured account (test networks only)
// ============================================================================

async fn faucet_example(aptos: &Aptos) -> Result<(), Error> {
    println!("\n=== Faucet Example ===\n");

    let Some(address) = aptos.account_address() else {
        println!("Set APTOS_PRIVATE_KEY to fund an account");
        return Ok(());
    };

    aptos.fund_account(address, "1 APT".parse()?).await?;
    let balance = aptos.coin_balance(address).await?;
    println!("{address} now holds {balance}");

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let aptos = Aptos::from_env()?;
    println!("Connected to {} ({})\n", aptos.network(), aptos.node_url());

    token_example(&aptos).await?;

    if aptos.faucet().is_ok() {
        faucet_example(&aptos).await?;
    }

    Ok(())
}
