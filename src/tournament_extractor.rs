use crate::date_parser::parse_date_br;
use crate::errors::SyncError;
use crate::scraper_client::ScraperClient;
use chrono::NaiveDate;
use regex::Regex;
use scraper::{Html, Selector};

/// City filter: only tournaments held in São Paulo/SP are kept.
const CITY_MARKER: &str = "são paulo";
const REGION_MARKER: &str = "sp";

const DEFAULT_NAME: &str = "Torneio sem nome";
const CURRENCY_MARKER: &str = "r$";

const START_MARKER: &str = "início em";
const RANGE_FROM_MARKER: &str = "jogos de";
const RANGE_UNTIL_MARKER: &str = "até";

#[derive(Debug, Clone, PartialEq)]
pub struct Tournament {
    pub name: String,
    pub arena: String,
    pub bairro: String,
    pub valor: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub url: String,
}

/// Fetch one detail page and extract its tournament. `Ok(None)` means the
/// page was fetched fine but the tournament is not in the target city.
pub async fn fetch_tournament(
    client: &mut ScraperClient,
    url: &str,
) -> Result<Option<Tournament>, SyncError> {
    let html = client.fetch_url(url).await?;
    extract_tournament(url, &html)
}

/// Extract a tournament from a detail page's HTML. All field heuristics run
/// over the page's visible text, flattened into whitespace-collapsed lines.
pub fn extract_tournament(url: &str, html: &str) -> Result<Option<Tournament>, SyncError> {
    let document = Html::parse_document(html);
    let whitespace = Regex::new(r"\s+")?;

    let name = extract_name(&document, &whitespace)?;
    let lines = visible_lines(&document, &whitespace);

    Ok(fields_from_lines(name, url, &lines))
}

/// First top-level heading, or a placeholder when the page has none.
fn extract_name(document: &Html, whitespace: &Regex) -> Result<String, SyncError> {
    let heading_selector =
        Selector::parse("h1").map_err(|err| SyncError::SelectorError(err.to_string()))?;

    let name = document
        .select(&heading_selector)
        .next()
        .map(|h1| {
            let text: String = h1.text().collect::<Vec<_>>().join(" ");
            whitespace.replace_all(&text, " ").trim().to_string()
        })
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| DEFAULT_NAME.to_string());

    Ok(name)
}

/// Flatten the page's text nodes into trimmed, non-empty lines.
fn visible_lines(document: &Html, whitespace: &Regex) -> Vec<String> {
    document
        .root_element()
        .text()
        .map(|fragment| whitespace.replace_all(fragment, " ").trim().to_string())
        .filter(|line| !line.is_empty())
        .collect()
}

/// Pure line-scanning heuristics. Returns `None` when the city filter
/// rejects the page; individual field failures only leave that field empty.
fn fields_from_lines(name: String, url: &str, lines: &[String]) -> Option<Tournament> {
    let arena = venue_from_lines(lines)?;
    if !arena.to_lowercase().contains(CITY_MARKER) {
        return None;
    }
    let bairro = bairro_from_arena(&arena);

    let (start_date, end_date) = dates_from_lines(lines);
    let valor = valor_from_lines(lines);

    Some(Tournament {
        name,
        arena,
        bairro,
        valor,
        start_date,
        end_date,
        url: url.to_string(),
    })
}

/// First line mentioning both the city and its region code is the venue.
fn venue_from_lines(lines: &[String]) -> Option<String> {
    lines
        .iter()
        .find(|line| {
            let low = line.to_lowercase();
            low.contains(CITY_MARKER) && low.contains(REGION_MARKER)
        })
        .cloned()
}

/// Best-effort neighborhood: the last hyphen-separated segment of the venue,
/// unless that segment still names the city or region.
fn bairro_from_arena(arena: &str) -> String {
    let parts: Vec<&str> = arena.split('-').collect();
    if parts.len() > 1 {
        let candidate = parts[parts.len() - 1].trim();
        let low = candidate.to_lowercase();
        if !low.contains(CITY_MARKER) && !low.contains(REGION_MARKER) {
            return candidate.to_string();
        }
    }
    String::new()
}

/// Scan every line for the two date patterns. Later matching lines overwrite
/// earlier ones per field independently; unparseable tokens change nothing.
/// A missing end date falls back to the start date.
fn dates_from_lines(lines: &[String]) -> (Option<NaiveDate>, Option<NaiveDate>) {
    let mut start_date = None;
    let mut end_date = None;

    for line in lines {
        let low = line.to_lowercase();

        if let Some((_, rest)) = low.split_once(START_MARKER) {
            if let Some(date) = first_token(rest).and_then(parse_date_br) {
                start_date = Some(date);
            }
        }

        if low.contains(RANGE_FROM_MARKER) && low.contains(RANGE_UNTIL_MARKER) {
            if let Some((_, after)) = low.split_once(RANGE_FROM_MARKER) {
                if let Some((from_text, until_text)) = after.split_once(RANGE_UNTIL_MARKER) {
                    if let Some(date) = first_token(from_text).and_then(parse_date_br) {
                        start_date = Some(date);
                    }
                    if let Some(date) = first_token(until_text).and_then(parse_date_br) {
                        end_date = Some(date);
                    }
                }
            }
        }
    }

    if end_date.is_none() {
        end_date = start_date;
    }
    (start_date, end_date)
}

fn first_token(text: &str) -> Option<&str> {
    text.trim().split_whitespace().next()
}

/// First line carrying a currency token, verbatim.
fn valor_from_lines(lines: &[String]) -> String {
    lines
        .iter()
        .find(|line| line.to_lowercase().contains(CURRENCY_MARKER))
        .cloned()
        .unwrap_or_default()
}
