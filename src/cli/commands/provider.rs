use anyhow::{Context, Result};
use clap::{Arg, ArgMatches, Command};

pub const ARG_PROVIDER_URL: &str = "provider-url";
pub const ARG_PROVIDER_API_KEY: &str = "provider-api-key";
pub const ARG_PROVIDER_TIMEOUT: &str = "provider-timeout";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_PROVIDER_URL)
                .long(ARG_PROVIDER_URL)
                .help("Base URL of the hosted auth backend (its /signup and /health endpoints live under it)")
                .env("ANTEROOM_PROVIDER_URL")
                .required(true),
        )
        .arg(
            Arg::new(ARG_PROVIDER_API_KEY)
                .long(ARG_PROVIDER_API_KEY)
                .help("API key sent to the auth backend")
                .env("ANTEROOM_PROVIDER_API_KEY")
                .required(true),
        )
        .arg(
            Arg::new(ARG_PROVIDER_TIMEOUT)
                .long(ARG_PROVIDER_TIMEOUT)
                .help("Timeout in seconds for auth backend calls")
                .env("ANTEROOM_PROVIDER_TIMEOUT")
                .default_value("10")
                .value_parser(clap::value_parser!(u64)),
        )
}

#[derive(Debug)]
pub struct Options {
    pub url: String,
    pub api_key: String,
    pub timeout_seconds: u64,
}

impl Options {
    /// # Errors
    /// Returns an error if required provider arguments are missing.
    pub fn parse(matches: &ArgMatches) -> Result<Self> {
        let url = matches
            .get_one::<String>(ARG_PROVIDER_URL)
            .cloned()
            .with_context(|| format!("missing required argument: --{ARG_PROVIDER_URL}"))?;
        let api_key = matches
            .get_one::<String>(ARG_PROVIDER_API_KEY)
            .cloned()
            .with_context(|| format!("missing required argument: --{ARG_PROVIDER_API_KEY}"))?;

        Ok(Self {
            url,
            api_key,
            timeout_seconds: matches
                .get_one::<u64>(ARG_PROVIDER_TIMEOUT)
                .copied()
                .unwrap_or(10),
        })
    }
}
