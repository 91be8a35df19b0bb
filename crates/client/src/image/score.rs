//! Candidate scoring and selection.

use serde::{Deserialize, Serialize};
use url::Url;

/// Extensions accepted by the pre-download gate.
const VALID_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

/// A probed image candidate.
///
/// `byte_size` never exceeds the configured cap: oversized downloads
/// are aborted before an `ImageInfo` is materialized. Zero width or
/// height means the header sniff could not resolve dimensions; such a
/// candidate scores 0 and only wins when nothing scores higher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageInfo {
    pub url: String,
    pub byte_size: usize,
    pub width: u32,
    pub height: u32,
}

/// Extension gate on the URL path; query strings never count.
pub fn has_valid_extension(url: &Url) -> bool {
    let path = url.path().to_lowercase();
    VALID_EXTENSIONS.iter().any(|ext| path.ends_with(&format!(".{ext}")))
}

/// Quality score: pixel area normalized into 0-10 with diminishing
/// returns, halved for extreme aspect ratios (beyond 3:1).
pub fn score(info: &ImageInfo) -> f64 {
    if info.width == 0 || info.height == 0 {
        return 0.0;
    }

    let area = f64::from(info.width) * f64::from(info.height);
    let aspect = f64::from(info.width.max(info.height)) / f64::from(info.width.min(info.height));
    let aspect_penalty = if aspect <= 3.0 { 1.0 } else { 0.5 };

    (area / 100_000.0).min(10.0) * aspect_penalty
}

/// Highest-scoring candidate; earlier harvest order wins ties.
pub fn select_best(infos: &[ImageInfo]) -> Option<&ImageInfo> {
    let mut best: Option<(&ImageInfo, f64)> = None;
    for info in infos {
        let candidate_score = score(info);
        match best {
            Some((_, best_score)) if candidate_score <= best_score => {}
            _ => best = Some((info, candidate_score)),
        }
    }
    best.map(|(info, _)| info)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(url: &str, width: u32, height: u32) -> ImageInfo {
        ImageInfo { url: url.to_string(), byte_size: 10_000, width, height }
    }

    #[test]
    fn test_has_valid_extension() {
        for good in ["https://a.com/x.jpg", "https://a.com/x.JPEG", "https://a.com/x.png?w=800", "https://a.com/x.webp"] {
            assert!(has_valid_extension(&Url::parse(good).unwrap()), "{good}");
        }
        for bad in ["https://a.com/x.gif", "https://a.com/x.svg", "https://a.com/page", "https://a.com/x.jpg.html"] {
            assert!(!has_valid_extension(&Url::parse(bad).unwrap()), "{bad}");
        }
    }

    #[test]
    fn test_score_zero_dimension() {
        assert_eq!(score(&info("a", 0, 600)), 0.0);
        assert_eq!(score(&info("a", 800, 0)), 0.0);
    }

    #[test]
    fn test_score_area_capped_at_ten() {
        assert_eq!(score(&info("a", 4000, 3000)), 10.0);
    }

    #[test]
    fn test_score_aspect_penalty() {
        // 1000x1000: area score 10, square. 1000x100: ratio 10, penalized.
        let square = score(&info("a", 1000, 1000));
        let strip = score(&info("b", 1000, 100));
        assert_eq!(square, 10.0);
        assert!(strip <= 5.0);
        assert!(square > strip);
    }

    #[test]
    fn test_select_best_prefers_square_over_strip() {
        let candidates = vec![info("strip", 1000, 100), info("square", 1000, 1000)];
        assert_eq!(select_best(&candidates).unwrap().url, "square");
    }

    #[test]
    fn test_select_best_tie_keeps_first_seen() {
        let candidates = vec![info("first", 400, 300), info("second", 300, 400)];
        assert_eq!(select_best(&candidates).unwrap().url, "first");
    }

    #[test]
    fn test_select_best_all_unresolved_takes_first() {
        let candidates = vec![info("a", 0, 0), info("b", 0, 0)];
        assert_eq!(select_best(&candidates).unwrap().url, "a");
    }

    #[test]
    fn test_select_best_empty() {
        assert!(select_best(&[]).is_none());
    }
}
