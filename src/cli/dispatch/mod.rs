//! Command-line argument dispatch and server initialization.
//!
//! This module maps validated CLI arguments to the appropriate action, such
//! as starting the server with its session and provider configuration.

use crate::cli::actions::{Action, server::Args};
use crate::cli::commands::{provider, session};
use anyhow::Result;

/// Map validated CLI matches to a server action.
///
/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>("port").copied().unwrap_or(8080);

    crate::cli::commands::validate(matches).map_err(|e| anyhow::anyhow!(e))?;

    let session_opts = session::Options::parse(matches)?;
    let provider_opts = provider::Options::parse(matches)?;

    Ok(Action::Server(Args {
        port,
        session_secrets: session_opts.secrets,
        cookie_name: session_opts.cookie_name,
        cookie_secure: session_opts.secure,
        session_max_age_seconds: session_opts.max_age_seconds,
        provider_url: provider_opts.url,
        provider_api_key: provider_opts.api_key,
        provider_timeout_seconds: provider_opts.timeout_seconds,
    }))
}
