use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_ENCODING};
use reqwest::redirect::Policy;
use reqwest::Client;

use crate::core::state::InstallerSettings;

/// Client used for the actual transfers. Follows redirects transparently, up
/// to the same hop limit the resolver enforces.
pub fn build_http_client(settings: &InstallerSettings) -> Result<Client, reqwest::Error> {
    base_builder(settings)
        .redirect(Policy::limited(settings.max_redirects))
        .build()
}

/// Client used by the resolver. Redirects are surfaced to the caller so each
/// hop can be inspected.
pub fn build_resolver_client(settings: &InstallerSettings) -> Result<Client, reqwest::Error> {
    base_builder(settings).redirect(Policy::none()).build()
}

fn base_builder(settings: &InstallerSettings) -> reqwest::ClientBuilder {
    let mut default_headers = HeaderMap::new();
    default_headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("identity"));

    Client::builder()
        .user_agent(settings.user_agent.clone())
        .default_headers(default_headers)
        .connect_timeout(Duration::from_secs(settings.connect_timeout_secs))
        .timeout(Duration::from_secs(settings.request_timeout_secs))
}
