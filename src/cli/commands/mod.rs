pub mod logging;
pub mod provider;
pub mod session;

use clap::{
    Arg, ColorChoice, Command,
    builder::styling::{AnsiColor, Effects, Styles},
};

use self::provider::ARG_PROVIDER_URL;
use self::session::ARG_SESSION_SECRET;

/// Cross-argument validation that clap's per-arg rules cannot express.
///
/// # Errors
/// Returns an error string if the provider URL is not http(s) or a configured
/// session secret is blank.
pub fn validate(matches: &clap::ArgMatches) -> Result<(), String> {
    if let Some(url) = matches.get_one::<String>(ARG_PROVIDER_URL)
        && !url.starts_with("http://")
        && !url.starts_with("https://")
    {
        return Err(format!(
            "--{ARG_PROVIDER_URL} must be an http:// or https:// URL"
        ));
    }

    if let Some(secrets) = matches.get_many::<String>(ARG_SESSION_SECRET)
        && secrets.into_iter().any(|secret| secret.trim().is_empty())
    {
        return Err(format!("--{ARG_SESSION_SECRET} must not be empty"));
    }

    Ok(())
}

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let long_version: &'static str = Box::leak(
        format!("{} - {}", env!("CARGO_PKG_VERSION"), crate::GIT_COMMIT_HASH).into_boxed_str(),
    );

    let command = Command::new("anteroom")
        .about("Signup front door for a hosted authentication backend")
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .help("Port to listen on")
                .default_value("8080")
                .env("ANTEROOM_PORT")
                .value_parser(clap::value_parser!(u16)),
        );

    let command = session::with_args(command);
    let command = provider::with_args(command);
    logging::with_args(command)
}
