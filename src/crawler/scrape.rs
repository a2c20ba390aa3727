use log2::debug;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use url::Url;

/// `a` elements carrying an href
static ANCHOR_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[href]").expect("anchor selector is valid"));

/// True for hrefs that are absolute http(s) URLs. The href itself is kept
/// verbatim; parsing only checks that it is well formed.
pub fn is_absolute_http_link(href: &str) -> bool {
    let has_scheme = ["http://", "https://"].iter().any(|scheme| {
        href.get(..scheme.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
    });

    has_scheme && Url::parse(href).is_ok()
}

/// Collect every absolute anchor target in document order, duplicates included.
/// html5ever recovers from malformed markup, so this never fails; content
/// with nothing parseable just yields no links.
pub fn extract_links(content: &str) -> Vec<String> {
    let document = Html::parse_document(content);

    let mut links = Vec::new();
    for element in document.select(&ANCHOR_SELECTOR) {
        if let Some(href) = element.value().attr("href") {
            if is_absolute_http_link(href) {
                links.push(href.to_string());
            } else {
                debug!("Skipped non-absolute link: {}", href);
            }
        }
    }

    links
}
