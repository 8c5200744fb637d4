//! The collection-then-token lookup sequence and its report.

use std::error::Error as StdError;
use std::io::{self, Write};

use aptos_kit::{AccountAddress, CollectionData, Error, TokenClient, TokenData};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use tracing::info;

const COLLECTION_BANNER: &str = ">>>>>>>> ========== CollectionData: ";
const TOKEN_BANNER: &str = ">>>>>>>> ========== tokenData: ";
const ERROR_BANNER: &str = ">>>>>>>>>> ERROR >>>>>>>>>>>>>>>>>";

/// What to look up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupTarget {
    pub creator: AccountAddress,
    pub collection: String,
    pub token: String,
}

/// Outcome of both lookups, each captured independently.
#[derive(Debug)]
pub struct LookupReport {
    pub token_name: String,
    pub collection: Result<CollectionData, Error>,
    pub token: Result<TokenData, Error>,
}

impl LookupReport {
    /// True when both the collection and the token were found.
    pub fn all_found(&self) -> bool {
        self.collection.is_ok() && self.token.is_ok()
    }

    /// Print the token name, the collection block, then the token block.
    ///
    /// Collection data is printed in debug form; token data as JSON with a
    /// four-space indent. A failed lookup prints the error marker and the
    /// error with its causes instead.
    pub fn render(&self, out: &mut impl Write) -> io::Result<()> {
        writeln!(out, "{}", self.token_name)?;

        match &self.collection {
            Ok(data) => writeln!(out, "{COLLECTION_BANNER}\n{data:#?}")?,
            Err(e) => render_error(out, e)?,
        }

        match &self.token {
            Ok(data) => writeln!(out, "\n{TOKEN_BANNER}\n{}", pretty_json(data)?)?,
            Err(e) => render_error(out, e)?,
        }

        Ok(())
    }
}

/// Look up the collection, then the token.
///
/// The token lookup runs whatever the collection lookup returned.
pub async fn run_lookups(tokens: &TokenClient, target: &LookupTarget) -> LookupReport {
    info!(token = %target.token, "Looking up token");

    let collection = tokens
        .collection_data(target.creator, &target.collection)
        .await;
    let token = tokens
        .token_data(target.creator, &target.collection, &target.token)
        .await;

    LookupReport {
        token_name: target.token.clone(),
        collection,
        token,
    }
}

fn render_error(out: &mut impl Write, err: &Error) -> io::Result<()> {
    writeln!(out, "{ERROR_BANNER}")?;
    writeln!(out, "{err}")?;

    // transparent wrappers repeat their source's message
    let mut last = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let message = cause.to_string();
        if !last.contains(&message) {
            writeln!(out, "  caused by: {message}")?;
        }
        last = message;
        source = cause.source();
    }
    Ok(())
}

fn pretty_json(value: &impl Serialize) -> io::Result<String> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser).map_err(io::Error::other)?;
    String::from_utf8(buf).map_err(io::Error::other)
}
