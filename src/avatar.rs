//! Best-effort avatar downloads.
//!
//! Avatars are embedded in the SVG as data URIs. A failed download only
//! costs that node its image, so nothing here returns an error to callers.

use crate::error::{Error, Result};
use base64::{Engine, engine::general_purpose::STANDARD};
use reqwest::Client;
use std::collections::HashMap;
use tracing::{debug, warn};

pub const DEFAULT_AVATAR_BASE: &str = "https://github.com";

/// Avatar data URIs keyed by account login. A missing key means no image.
pub type Avatars = HashMap<String, String>;

pub fn avatar_url(base: &str, login: &str) -> String {
    format!("{}/{}.png", base.trim_end_matches('/'), login)
}

async fn download(http: &Client, url: &str) -> Result<(Vec<u8>, String)> {
    let response = http
        .get(url)
        .send()
        .await
        .map_err(|e| Error::image_fetch(format!("download failed: {e}")))?;

    if !response.status().is_success() {
        return Err(Error::image_fetch(format!(
            "download returned status {}",
            response.status()
        )));
    }

    let content_type = match response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
    {
        None => "image/png".to_string(),
        Some(raw) => image_mime(raw)
            .ok_or_else(|| Error::image_fetch(format!("not an image: {raw:?}")))?,
    };

    let data = response
        .bytes()
        .await
        .map_err(|e| Error::image_fetch(format!("failed to read avatar data: {e}")))?;

    Ok((data.to_vec(), content_type))
}

/// The `image/*` media type of a content-type header, parameters dropped.
/// Anything else, or a subtype with characters outside a token, is rejected.
fn image_mime(content_type: &str) -> Option<String> {
    let essence = content_type.split(';').next()?.trim().to_ascii_lowercase();
    let subtype = essence.strip_prefix("image/")?;
    let valid = !subtype.is_empty()
        && subtype
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    valid.then_some(essence)
}

/// Fetch `url` as a `data:` URI, or `None` when anything goes wrong.
pub async fn fetch_data_uri(http: &Client, url: &str) -> Option<String> {
    match download(http, url).await {
        Ok((data, content_type)) => {
            debug!(url, bytes = data.len(), "fetched avatar");
            Some(format!(
                "data:{};base64,{}",
                content_type,
                STANDARD.encode(&data)
            ))
        }
        Err(e) => {
            warn!(url, "rendering without avatar: {e}");
            None
        }
    }
}

/// Fetch avatars for every login, one after another.
pub async fn fetch_all<'a, I>(http: &Client, base: &str, logins: I) -> Avatars
where
    I: IntoIterator<Item = &'a str>,
{
    let mut avatars = Avatars::new();
    for login in logins {
        if avatars.contains_key(login) {
            continue;
        }
        if let Some(uri) = fetch_data_uri(http, &avatar_url(base, login)).await {
            avatars.insert(login.to_string(), uri);
        }
    }
    avatars
}
