use letzplay_sync::config::Config;
use letzplay_sync::errors::SyncError;
use letzplay_sync::listing::fetch_tourney_links;
use letzplay_sync::notion_client::{upsert, NotionClient, UpsertAction};
use letzplay_sync::scraper_client::ScraperClient;
use letzplay_sync::tournament_extractor::fetch_tournament;

#[tokio::main]
async fn main() -> Result<(), SyncError> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let config = Config::from_env()?;
    let notion = NotionClient::new(&config)?;
    let mut scraper_client = ScraperClient::new_http();

    let mut tournaments = Vec::new();
    for circuit_url in &config.circuit_urls {
        println!("Fetching listing: {circuit_url}");
        let links = fetch_tourney_links(&mut scraper_client, circuit_url).await?;

        for link in &links {
            match fetch_tournament(&mut scraper_client, link).await? {
                Some(tournament) => tournaments.push(tournament),
                None => log::debug!("Skipped (outside target city): {link}"),
            }
        }
    }

    scraper_client.print_stats();
    println!("Found {} tournaments.", tournaments.len());

    for tournament in &tournaments {
        match upsert(&notion, tournament).await? {
            UpsertAction::Created => println!("[CREATE] {}", tournament.name),
            UpsertAction::Updated => println!("[UPDATE] {}", tournament.name),
        }
    }

    Ok(())
}
