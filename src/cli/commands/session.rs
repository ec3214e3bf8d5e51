use anyhow::{Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};

pub const ARG_SESSION_SECRET: &str = "session-secret";
pub const ARG_COOKIE_NAME: &str = "cookie-name";
pub const ARG_COOKIE_SECURE: &str = "cookie-secure";
pub const ARG_SESSION_MAX_AGE: &str = "session-max-age";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_SESSION_SECRET)
                .long(ARG_SESSION_SECRET)
                .help("Session cookie signing secret; repeat to keep rotated-out secrets verifiable (the first one signs)")
                .env("ANTEROOM_SESSION_SECRETS")
                .value_delimiter(',')
                .action(ArgAction::Append)
                .required(true),
        )
        .arg(
            Arg::new(ARG_COOKIE_NAME)
                .long(ARG_COOKIE_NAME)
                .help("Session cookie name")
                .env("ANTEROOM_COOKIE_NAME")
                .default_value(crate::session::DEFAULT_COOKIE_NAME),
        )
        .arg(
            Arg::new(ARG_COOKIE_SECURE)
                .long(ARG_COOKIE_SECURE)
                .help("Mark the session cookie Secure (set when serving over HTTPS)")
                .env("ANTEROOM_COOKIE_SECURE")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new(ARG_SESSION_MAX_AGE)
                .long(ARG_SESSION_MAX_AGE)
                .help("Session cookie Max-Age in seconds; omitted means a browser-session cookie")
                .env("ANTEROOM_SESSION_MAX_AGE")
                .value_parser(clap::value_parser!(i64)),
        )
}

#[derive(Debug)]
pub struct Options {
    pub secrets: Vec<String>,
    pub cookie_name: String,
    pub secure: bool,
    pub max_age_seconds: Option<i64>,
}

impl Options {
    /// # Errors
    /// Returns an error if required session arguments are missing.
    pub fn parse(matches: &ArgMatches) -> Result<Self> {
        let secrets: Vec<String> = matches
            .get_many::<String>(ARG_SESSION_SECRET)
            .with_context(|| format!("missing required argument: --{ARG_SESSION_SECRET}"))?
            .cloned()
            .collect();
        let cookie_name = matches
            .get_one::<String>(ARG_COOKIE_NAME)
            .cloned()
            .unwrap_or_else(|| crate::session::DEFAULT_COOKIE_NAME.to_string());

        Ok(Self {
            secrets,
            cookie_name,
            secure: matches.get_flag(ARG_COOKIE_SECURE),
            max_age_seconds: matches.get_one::<i64>(ARG_SESSION_MAX_AGE).copied(),
        })
    }
}
