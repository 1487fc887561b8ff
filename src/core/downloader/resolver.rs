// ─── Remote Reference Resolver ───
// Walks a redirect chain by hand to learn the file name a download URL will
// produce, without transferring the body.

use reqwest::header::{CONTENT_DISPOSITION, LOCATION};
use reqwest::{Client, StatusCode, Url};
use tracing::debug;

use crate::core::artifact::is_safe_file_name;
use crate::core::error::{InstallerError, InstallerResult};

pub struct RemoteReferenceResolver<'a> {
    /// Must have automatic redirects disabled.
    client: &'a Client,
    max_redirects: usize,
}

impl<'a> RemoteReferenceResolver<'a> {
    pub fn new(client: &'a Client, max_redirects: usize) -> Self {
        Self {
            client,
            max_redirects,
        }
    }

    /// Resolve `url` to the file name the server will hand out for it.
    ///
    /// A `Content-Disposition` filename on the final response wins; otherwise
    /// the last path segment of the final URL is percent-decoded and used.
    pub async fn resolve_file_name(&self, url: &str) -> InstallerResult<String> {
        let mut current = parse_url(url)?;
        let mut hops = 0usize;

        loop {
            // The body is never read; dropping the response releases the
            // connection.
            let response = self.client.get(current.clone()).send().await?;
            let status = response.status();

            if status.is_redirection() {
                if let Some(location) = response.headers().get(LOCATION) {
                    if hops >= self.max_redirects {
                        return Err(InstallerError::TooManyRedirects {
                            url: url.to_string(),
                            hops,
                        });
                    }
                    let location = location.to_str().map_err(|e| InstallerError::InvalidUrl {
                        url: current.to_string(),
                        reason: format!("unreadable Location header: {e}"),
                    })?;
                    let next = current
                        .join(location)
                        .map_err(|e| InstallerError::InvalidUrl {
                            url: location.to_string(),
                            reason: e.to_string(),
                        })?;
                    debug!("Redirect {} {} -> {}", status.as_u16(), current, next);
                    current = next;
                    hops += 1;
                    continue;
                }
            }

            if status != StatusCode::OK {
                return Err(InstallerError::DownloadFailed {
                    url: current.to_string(),
                    status: status.as_u16(),
                });
            }

            let from_header = response
                .headers()
                .get(CONTENT_DISPOSITION)
                .and_then(|value| value.to_str().ok())
                .and_then(parse_content_disposition);

            let file_name = match from_header {
                Some(name) => name,
                None => file_name_from_url(&current)?,
            };
            if !is_safe_file_name(&file_name) {
                return Err(InstallerError::UnsafeFileName { name: file_name });
            }

            debug!("Resolved {} -> {}", url, file_name);
            return Ok(file_name);
        }
    }
}

fn parse_url(url: &str) -> InstallerResult<Url> {
    Url::parse(url).map_err(|e| InstallerError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })
}

/// Extract the `filename` parameter of a `Content-Disposition` value.
///
/// The plain `filename=` form is preferred; `filename*=UTF-8''...` is only
/// consulted when the plain form is absent.
pub fn parse_content_disposition(value: &str) -> Option<String> {
    let mut extended = None;

    for part in split_params(value) {
        let part = part.trim();
        let Some((key, raw)) = part.split_once('=') else {
            continue;
        };
        let key = key.trim().to_ascii_lowercase();
        let raw = raw.trim();

        if key == "filename" {
            let name = unquote(raw);
            if !name.is_empty() {
                return Some(name);
            }
        } else if key == "filename*" && extended.is_none() {
            extended = decode_ext_value(raw);
        }
    }

    extended
}

/// Split on `;` outside double quotes.
fn split_params(value: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut in_quotes = false;
    let mut start = 0;
    for (i, c) in value.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            ';' if !in_quotes => {
                parts.push(&value[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&value[start..]);
    parts
}

fn unquote(raw: &str) -> String {
    match raw.strip_prefix('"').and_then(|r| r.strip_suffix('"')) {
        Some(inner) => inner.replace("\\\"", "\"").replace("\\\\", "\\"),
        None => raw.to_string(),
    }
}

/// RFC 5987 `charset'lang'value`. Only UTF-8 and ISO-8859-1 occur in practice.
fn decode_ext_value(raw: &str) -> Option<String> {
    let mut pieces = raw.splitn(3, '\'');
    let charset = pieces.next()?;
    let _lang = pieces.next()?;
    let encoded = pieces.next()?;
    if !charset.eq_ignore_ascii_case("utf-8") && !charset.eq_ignore_ascii_case("iso-8859-1") {
        return None;
    }
    let decoded = urlencoding::decode(encoded).ok()?.into_owned();
    (!decoded.is_empty()).then_some(decoded)
}

/// Last path segment of `url`, percent-decoded as UTF-8.
pub fn file_name_from_url(url: &Url) -> InstallerResult<String> {
    let segment = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| InstallerError::MissingFileName {
            url: url.to_string(),
        })?;

    urlencoding::decode(segment)
        .map(|s| s.into_owned())
        .map_err(|e| InstallerError::InvalidUrl {
            url: url.to_string(),
            reason: format!("path segment is not UTF-8: {e}"),
        })
}
