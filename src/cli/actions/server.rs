use crate::{
    api,
    provider::ProviderConfig,
    session::SessionStore,
};
use anyhow::{Context, Result, anyhow};
use secrecy::SecretString;
use url::Url;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub session_secrets: Vec<String>,
    pub cookie_name: String,
    pub cookie_secure: bool,
    pub session_max_age_seconds: Option<i64>,
    pub provider_url: String,
    pub provider_api_key: String,
    pub provider_timeout_seconds: u64,
}

/// Execute the server action.
/// # Errors
/// Returns an error if the configuration is invalid or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    let mut secrets = args.session_secrets.into_iter().map(SecretString::from);
    let primary = secrets
        .next()
        .ok_or_else(|| anyhow!("at least one session secret is required"))?;

    let mut store = SessionStore::new(primary)
        .with_fallback_secrets(secrets.collect())
        .with_cookie_name(args.cookie_name)
        .with_secure(args.cookie_secure);
    if let Some(seconds) = args.session_max_age_seconds {
        store = store.with_max_age_seconds(seconds);
    }

    let provider_url = Url::parse(&args.provider_url).context("Invalid provider URL")?;
    let provider_config = ProviderConfig::new(provider_url, SecretString::from(args.provider_api_key))
        .with_timeout_seconds(args.provider_timeout_seconds);

    api::new(args.port, store, provider_config).await
}
