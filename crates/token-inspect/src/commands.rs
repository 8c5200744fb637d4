//! Subcommand implementations.

use std::io::Write;

use aptos_kit::{Aptos, Octas, TokenDataId, TokenId};

use crate::cli::{Cli, Commands, parse_address};
use crate::error::InspectError;
use crate::lookup::run_lookups;

/// Run the command selected by `cli`, writing its report to `out`.
///
/// Lookup failures end up in the report; only configuration and output
/// errors are returned.
pub async fn execute(cli: &Cli, out: &mut impl Write) -> Result<(), InspectError> {
    let command = cli.command.clone().unwrap_or(Commands::Lookup);
    let aptos = match command {
        Commands::Fund { .. } => cli.funding_client()?,
        _ => cli.read_client()?,
    };

    match command {
        Commands::Lookup => {
            let target = cli.target()?;
            let report = run_lookups(&aptos.tokens(), &target).await;
            report.render(out)?;
        }
        Commands::TokenBalance {
            owner,
            property_version,
        } => token_balance(&aptos, cli, owner.as_deref(), property_version, out).await?,
        Commands::CoinBalance { address } => {
            let address = parse_address("address", &address)?;
            let balance = aptos.coin_balance(address).await?;
            writeln!(out, "{address}: {balance}")?;
        }
        Commands::Fund { address, amount } => {
            fund(&aptos, address.as_deref(), &amount, out).await?
        }
        Commands::Ledger => {
            let ledger = aptos.ledger_info().await?;
            writeln!(out, "network:        {}", aptos.network())?;
            writeln!(out, "chain id:       {}", ledger.chain_id)?;
            writeln!(out, "epoch:          {}", ledger.epoch)?;
            writeln!(out, "ledger version: {}", ledger.ledger_version)?;
            writeln!(out, "block height:   {}", ledger.block_height)?;
        }
    }

    Ok(())
}

async fn token_balance(
    aptos: &Aptos,
    cli: &Cli,
    owner: Option<&str>,
    property_version: u64,
    out: &mut impl Write,
) -> Result<(), InspectError> {
    let target = cli.target()?;
    let owner = match owner {
        Some(owner) => parse_address("owner", owner)?,
        None => target.creator,
    };
    let id = TokenId::new(
        TokenDataId::new(target.creator, &target.collection, &target.token),
        property_version,
    );

    let token = aptos.tokens().token_for_account(owner, id).await?;
    writeln!(
        out,
        "{owner} holds {} of '{}' (property version {property_version})",
        token.amount, target.token
    )?;
    Ok(())
}

async fn fund(
    aptos: &Aptos,
    address: Option<&str>,
    amount: &str,
    out: &mut impl Write,
) -> Result<(), InspectError> {
    let address = match address {
        Some(address) => parse_address("address", address)?,
        None => aptos.account_address().ok_or_else(|| {
            InspectError::Config("fund needs an address or --private-key".into())
        })?,
    };
    let amount: Octas = amount.parse().map_err(aptos_kit::Error::from)?;

    let committed = aptos.fund_account(address, amount).await?;
    for tx in &committed {
        match tx.version {
            Some(version) => writeln!(out, "{} committed at version {version}", tx.hash)?,
            None => writeln!(out, "{} committed", tx.hash)?,
        }
    }
    writeln!(out, "{address}: {}", aptos.coin_balance(address).await?)?;
    Ok(())
}
