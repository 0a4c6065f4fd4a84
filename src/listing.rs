use crate::errors::SyncError;
use crate::scraper_client::ScraperClient;
use scraper::{Html, Selector};
use std::collections::BTreeSet;

/// Site origin used to absolutize relative links.
pub const SITE_ORIGIN: &str = "https://letzplay.me";

/// Path marker identifying tournament detail pages.
const TOURNEY_MARKER: &str = "/tourneys/";

/// Fetch a circuit listing page and return its tournament detail links.
pub async fn fetch_tourney_links(
    client: &mut ScraperClient,
    listing_url: &str,
) -> Result<Vec<String>, SyncError> {
    let html = client.fetch_url(listing_url).await?;
    extract_tourney_links(&html)
}

/// Collect every hyperlink pointing at a tournament detail page. Relative
/// targets are prefixed with the site origin; the result is deduplicated and
/// lexicographically sorted, so the output is independent of discovery order.
pub fn extract_tourney_links(html: &str) -> Result<Vec<String>, SyncError> {
    let document = Html::parse_document(html);
    let link_selector =
        Selector::parse("a[href]").map_err(|err| SyncError::SelectorError(err.to_string()))?;

    let mut links = BTreeSet::new();
    for element in document.select(&link_selector) {
        if let Some(href) = element.value().attr("href") {
            if href.contains(TOURNEY_MARKER) {
                let absolute = if href.starts_with('/') {
                    format!("{SITE_ORIGIN}{href}")
                } else {
                    href.to_string()
                };
                links.insert(absolute);
            }
        }
    }

    Ok(links.into_iter().collect())
}
