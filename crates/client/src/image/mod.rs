//! Featured-image selection pipeline.
//!
//! Per page: harvest candidates from markup, gate on URL extension,
//! download each under a byte cap, sniff dimensions from the binary
//! header, score, and pick the best. Every per-candidate failure --
//! bad URL, wrong extension, oversized body, network error,
//! unrecognized format -- drops that candidate and nothing else.

pub mod harvest;
pub mod score;
pub mod sniff;

pub use harvest::{MAX_CANDIDATES, harvest_candidates};
pub use score::{ImageInfo, has_valid_extension, select_best};
pub use sniff::{SniffedFormat, detect_format, dimensions};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::fetch::FetchClient;

/// Terminal output of the image pipeline.
///
/// `success: false` is a valid, non-error outcome meaning no suitable
/// image was found anywhere in the tried URLs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionResult {
    pub success: bool,
    pub image_url: Option<String>,
}

impl SelectionResult {
    pub fn found(image_url: String) -> Self {
        Self { success: true, image_url: Some(image_url) }
    }

    pub fn none() -> Self {
        Self { success: false, image_url: None }
    }
}

/// Run the harvest -> probe -> score pipeline against one fetched page.
/// Returns the absolute URL of the best surviving candidate, or `None`
/// when nothing survives.
pub async fn select_from_page(
    client: &FetchClient, html: &str, page_url: &Url, max_bytes: usize,
) -> Option<String> {
    let candidates = harvest_candidates(html, page_url);

    let mut probed = Vec::new();
    for candidate in candidates {
        let Ok(url) = Url::parse(&candidate) else { continue };

        if !has_valid_extension(&url) {
            continue;
        }

        let bytes = match client.fetch_bounded(&url, max_bytes).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                tracing::debug!("candidate {} rejected: exceeds {} byte cap", url, max_bytes);
                continue;
            }
            Err(e) => {
                tracing::debug!("candidate {} failed: {}", url, e);
                continue;
            }
        };

        let (width, height) = sniff::dimensions(&bytes);
        probed.push(ImageInfo { url: candidate, byte_size: bytes.len(), width, height });
    }

    select_best(&probed).map(|info| info.url.clone())
}
