//! `Accept` header negotiation between the representations a route offers.

use axum::http::{header::ACCEPT, HeaderMap};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Representation {
    Html,
    Json,
    Text,
}

impl Representation {
    fn media_type(self) -> (&'static str, &'static str) {
        match self {
            Representation::Html => ("text", "html"),
            Representation::Json => ("application", "json"),
            Representation::Text => ("text", "plain"),
        }
    }

    /// How specifically `range` names this representation, if it matches at all.
    fn specificity(self, range: &str) -> Option<u8> {
        let (kind, sub) = self.media_type();
        match range.split_once('/') {
            Some(("*", "*")) => Some(0),
            Some((k, "*")) if k.eq_ignore_ascii_case(kind) => Some(1),
            Some((k, s)) if k.eq_ignore_ascii_case(kind) && s.eq_ignore_ascii_case(sub) => {
                Some(2)
            }
            _ => None,
        }
    }
}

struct MediaRange<'a> {
    range: &'a str,
    quality: f32,
}

fn parse_accept(header: &str) -> Vec<MediaRange<'_>> {
    header
        .split(',')
        .filter_map(|part| {
            let mut params = part.split(';');
            let range = params.next()?.trim();
            if range.is_empty() {
                return None;
            }
            let quality = params
                .filter_map(|p| p.trim().strip_prefix("q="))
                .find_map(|q| q.trim().parse::<f32>().ok())
                .unwrap_or(1.0);
            Some(MediaRange { range, quality })
        })
        .collect()
}

/// Quality the header gives `offer` and the position of the range that decided it.
///
/// The most specific matching range wins, so `text/html;q=0` excludes HTML even
/// when `*/*` is also present.
fn rate(ranges: &[MediaRange<'_>], offer: Representation) -> Option<(f32, usize)> {
    ranges
        .iter()
        .enumerate()
        .filter_map(|(index, range)| {
            offer
                .specificity(range.range)
                .map(|specificity| (specificity, index, range.quality))
        })
        // first range wins among equally specific ones
        .max_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)))
        .map(|(_, index, quality)| (quality, index))
}

/// Pick the offered representation the client rates highest.
///
/// No `Accept` header means anything goes, so the first offer wins. Ties on
/// quality go to the range listed first, then to offer order. A header that
/// rules out every offer yields `None`.
pub fn negotiate(accept: Option<&str>, offered: &[Representation]) -> Option<Representation> {
    let Some(header) = accept.filter(|h| !h.trim().is_empty()) else {
        return offered.first().copied();
    };

    let ranges = parse_accept(header);
    let mut best: Option<(f32, usize, Representation)> = None;
    for &offer in offered {
        let Some((quality, index)) = rate(&ranges, offer) else {
            continue;
        };
        if quality <= 0.0 {
            continue;
        }
        let better = match best {
            None => true,
            Some((q, i, _)) => quality > q || (quality == q && index < i),
        };
        if better {
            best = Some((quality, index, offer));
        }
    }
    best.map(|(_, _, offer)| offer)
}

/// Raw `Accept` value of a request, if it is valid UTF-8.
pub fn accept_header(headers: &HeaderMap) -> Option<&str> {
    headers.get(ACCEPT).and_then(|v| v.to_str().ok())
}

#[cfg(test)]
mod tests {
    use super::Representation::*;
    use super::*;

    const OFFERED: &[Representation] = &[Html, Json, Text];

    #[test]
    fn exact_types_select_their_representation() {
        assert_eq!(negotiate(Some("text/html"), OFFERED), Some(Html));
        assert_eq!(negotiate(Some("application/json"), OFFERED), Some(Json));
        assert_eq!(negotiate(Some("text/plain"), OFFERED), Some(Text));
    }

    #[test]
    fn browser_accept_prefers_html() {
        let accept = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
        assert_eq!(negotiate(Some(accept), OFFERED), Some(Html));
    }

    #[test]
    fn quality_values_reorder_preferences() {
        let accept = "text/html;q=0.5, application/json";
        assert_eq!(negotiate(Some(accept), OFFERED), Some(Json));
    }

    #[test]
    fn wildcards_take_the_first_offer_of_that_kind() {
        assert_eq!(negotiate(Some("*/*"), OFFERED), Some(Html));
        assert_eq!(negotiate(Some("application/*"), OFFERED), Some(Json));
        assert_eq!(negotiate(None, OFFERED), Some(Html));
        assert_eq!(negotiate(Some("  "), OFFERED), Some(Html));
    }

    #[test]
    fn unsupported_types_yield_nothing() {
        assert_eq!(negotiate(Some("image/png"), OFFERED), None);
        assert_eq!(negotiate(Some("application/json;q=0"), OFFERED), None);
    }

    #[test]
    fn zero_quality_excludes_a_type_despite_wildcards() {
        assert_eq!(negotiate(Some("*/*, text/html;q=0"), OFFERED), Some(Json));
        assert_eq!(negotiate(Some("text/*, text/html;q=0"), OFFERED), Some(Text));
        assert_eq!(negotiate(Some("text/html, */*;q=0"), OFFERED), Some(Html));
    }
}
