pub mod config;
pub mod date_parser;
pub mod errors;
pub mod listing;
pub mod notion_client;
pub mod scraper_client;
pub mod tournament_extractor;

#[cfg(test)]
mod pipeline_tests {
    use crate::errors::SyncError;
    use crate::listing::extract_tourney_links;
    use crate::notion_client::{upsert, TournamentStore, UpsertAction};
    use crate::tournament_extractor::{extract_tournament, Tournament};
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct CountingStore {
        creates: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl TournamentStore for CountingStore {
        async fn find_by_url(&self, _url: &str) -> Result<Option<String>, SyncError> {
            Ok(None)
        }

        async fn create(&self, tournament: &Tournament) -> Result<(), SyncError> {
            self.creates.lock().unwrap().push(tournament.url.clone());
            Ok(())
        }

        async fn update(&self, _page_id: &str, _t: &Tournament) -> Result<(), SyncError> {
            panic!("no update expected for an empty store");
        }
    }

    fn detail_page(name: &str, venue: &str) -> String {
        format!(
            r#"<html><body>
                <h1>{name}</h1>
                <p>{venue}</p>
                <p>Jogos de 10/jan/2025 até 12/jan/2025</p>
                <p>R$ 100,00</p>
            </body></html>"#
        )
    }

    // Listing with three detail links, two of which pass the city filter:
    // exactly two records survive and two upserts happen.
    #[tokio::test]
    async fn test_listing_to_upsert_pipeline() {
        let listing_html = r#"
            <a href="/c/tourneys/a">A</a>
            <a href="/c/tourneys/b">B</a>
            <a href="/c/tourneys/c">C</a>
        "#;
        let links = extract_tourney_links(listing_html).unwrap();
        assert_eq!(links.len(), 3);

        let pages = [
            detail_page("Etapa Moema", "Arena Sol - São Paulo - SP - Moema"),
            detail_page("Etapa Campinas", "Arena Azul - Campinas"),
            detail_page("Etapa Pinheiros", "Quadra Norte - São Paulo - SP"),
        ];

        let mut tournaments = Vec::new();
        for (link, html) in links.iter().zip(&pages) {
            if let Some(t) = extract_tournament(link, html).unwrap() {
                tournaments.push(t);
            }
        }
        assert_eq!(tournaments.len(), 2);

        let store = CountingStore::default();
        for t in &tournaments {
            assert_eq!(upsert(&store, t).await.unwrap(), UpsertAction::Created);
        }

        let creates = store.creates.lock().unwrap();
        assert_eq!(creates.len(), 2);
        assert_eq!(creates[0], "https://letzplay.me/c/tourneys/a");
        assert_eq!(creates[1], "https://letzplay.me/c/tourneys/c");
    }
}
