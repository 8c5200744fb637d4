//! Token helpers for the Aptos token standard (`0x3::token`).
//!
//! Collections and token metadata live in tables owned by the creator;
//! balances live in a `TokenStore` under each holder.
//!
//! ```rust,no_run
//! use aptos_kit::*;
//!
//! # async fn example() -> Result<(), aptos_kit::Error> {
//! let aptos = Aptos::testnet().build();
//! let tokens = aptos.tokens();
//! let creator = "0xaef92afd9bcce9a48a66ec4088b19624ebb5b3658e3d5669b3fa58412edec093";
//!
//! let collection = tokens.collection_data(creator, "My Collection").await?;
//! println!("{}: {} of {}", collection.name, collection.supply, collection.maximum);
//!
//! let data = tokens.token_data(creator, "My Collection", "My Token").await?;
//! if let Some(level) = data.default_properties.get_u64("level")? {
//!     println!("level {level}");
//! }
//!
//! let held = tokens.token(creator, "My Collection", "My Token", 0).await?;
//! println!("creator holds {}", held.amount);
//! # Ok(())
//! # }
//! ```

mod client;
mod types;

pub use client::*;
pub use types::*;
