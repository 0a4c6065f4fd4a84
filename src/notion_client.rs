use crate::config::Config;
use crate::errors::SyncError;
use crate::tournament_extractor::Tournament;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

const NOTION_API: &str = "https://api.notion.com/v1";
const NOTION_VERSION: &str = "2022-06-28";

/// Which branch of the upsert was taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertAction {
    Created,
    Updated,
}

/// Remote store for tournament records, keyed by the detail-page URL.
/// Abstracted so the upsert decision can be tested without HTTP.
#[async_trait]
pub trait TournamentStore {
    /// Look up an existing record by its URL natural key, returning the
    /// remote page id when one exists.
    async fn find_by_url(&self, url: &str) -> Result<Option<String>, SyncError>;

    async fn create(&self, tournament: &Tournament) -> Result<(), SyncError>;

    async fn update(&self, page_id: &str, tournament: &Tournament) -> Result<(), SyncError>;
}

/// Create-if-absent-else-update, keyed on the tournament URL. Two steps with
/// no transaction: a concurrent run could still create a duplicate.
pub async fn upsert<S: TournamentStore + Sync>(
    store: &S,
    tournament: &Tournament,
) -> Result<UpsertAction, SyncError> {
    match store.find_by_url(&tournament.url).await? {
        Some(page_id) => {
            store.update(&page_id, tournament).await?;
            Ok(UpsertAction::Updated)
        }
        None => {
            store.create(tournament).await?;
            Ok(UpsertAction::Created)
        }
    }
}

pub struct NotionClient {
    client: Client,
    database_id: String,
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    results: Vec<PageRef>,
}

#[derive(Deserialize)]
struct PageRef {
    id: String,
}

impl NotionClient {
    pub fn new(config: &Config) -> Result<Self, SyncError> {
        let mut headers = HeaderMap::new();
        let bearer = HeaderValue::from_str(&format!("Bearer {}", config.notion_token))
            .map_err(|err| SyncError::NotionError(format!("Invalid token header: {err}")))?;
        headers.insert(AUTHORIZATION, bearer);
        headers.insert("Notion-Version", HeaderValue::from_static(NOTION_VERSION));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            database_id: config.notion_db_id.clone(),
        })
    }

    /// Map a tournament onto the database's property schema. The date range
    /// is only written when a start date was extracted; a missing end date is
    /// sent as null (open/single-day range).
    fn build_properties(tournament: &Tournament) -> Value {
        let mut properties = json!({
            "Torneio": { "title": [{ "text": { "content": &tournament.name } }] },
            "Local (Arena)": { "rich_text": [{ "text": { "content": &tournament.arena } }] },
            "Bairro": { "rich_text": [{ "text": { "content": &tournament.bairro } }] },
            "Valor de inscrição": { "rich_text": [{ "text": { "content": &tournament.valor } }] },
            "Link Letzplay": { "url": &tournament.url },
        });

        if let Some(start) = tournament.start_date {
            properties["Data"] = json!({
                "date": {
                    "start": start.format("%Y-%m-%d").to_string(),
                    "end": tournament.end_date.map(|d| d.format("%Y-%m-%d").to_string()),
                }
            });
        }

        properties
    }
}

#[async_trait]
impl TournamentStore for NotionClient {
    async fn find_by_url(&self, url: &str) -> Result<Option<String>, SyncError> {
        let query_url = format!("{NOTION_API}/databases/{}/query", self.database_id);
        let payload = json!({
            "filter": {
                "property": "Link Letzplay",
                "url": { "equals": url }
            },
            "page_size": 1
        });

        let response = self
            .client
            .post(&query_url)
            .json(&payload)
            .send()
            .await?
            .error_for_status()?;

        let body: QueryResponse = response.json().await?;
        Ok(body.results.into_iter().next().map(|page| page.id))
    }

    async fn create(&self, tournament: &Tournament) -> Result<(), SyncError> {
        let body = json!({
            "parent": { "database_id": self.database_id },
            "properties": Self::build_properties(tournament),
        });

        self.client
            .post(format!("{NOTION_API}/pages"))
            .json(&body)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn update(&self, page_id: &str, tournament: &Tournament) -> Result<(), SyncError> {
        let body = json!({ "properties": Self::build_properties(tournament) });

        self.client
            .patch(format!("{NOTION_API}/pages/{page_id}"))
            .json(&body)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::collections::HashMap;
    use std::sync::Mutex;

    fn sample_tournament(url: &str) -> Tournament {
        Tournament {
            name: "Open de Beach Tennis".to_string(),
            arena: "Arena Beach Star - São Paulo - SP".to_string(),
            bairro: "Moema".to_string(),
            valor: "R$ 120,00".to_string(),
            start_date: NaiveDate::from_ymd_opt(2025, 1, 10),
            end_date: NaiveDate::from_ymd_opt(2025, 1, 12),
            url: url.to_string(),
        }
    }

    #[derive(Default)]
    struct MockStore {
        pages: Mutex<HashMap<String, String>>,
        creates: Mutex<Vec<String>>,
        updates: Mutex<Vec<String>>,
    }

    impl MockStore {
        fn with_page(url: &str, page_id: &str) -> Self {
            let store = Self::default();
            store
                .pages
                .lock()
                .unwrap()
                .insert(url.to_string(), page_id.to_string());
            store
        }
    }

    #[async_trait]
    impl TournamentStore for MockStore {
        async fn find_by_url(&self, url: &str) -> Result<Option<String>, SyncError> {
            Ok(self.pages.lock().unwrap().get(url).cloned())
        }

        async fn create(&self, tournament: &Tournament) -> Result<(), SyncError> {
            let page_id = format!("page-{}", self.creates.lock().unwrap().len());
            self.pages
                .lock()
                .unwrap()
                .insert(tournament.url.clone(), page_id);
            self.creates.lock().unwrap().push(tournament.url.clone());
            Ok(())
        }

        async fn update(&self, page_id: &str, _tournament: &Tournament) -> Result<(), SyncError> {
            self.updates.lock().unwrap().push(page_id.to_string());
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_upsert_creates_when_url_is_unknown() {
        let store = MockStore::default();
        let t = sample_tournament("https://letzplay.me/c/tourneys/new");

        let action = upsert(&store, &t).await.unwrap();

        assert_eq!(action, UpsertAction::Created);
        assert_eq!(store.creates.lock().unwrap().len(), 1);
        assert!(store.updates.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_upsert_updates_existing_page_by_id() {
        let url = "https://letzplay.me/c/tourneys/known";
        let store = MockStore::with_page(url, "page-42");
        let t = sample_tournament(url);

        let action = upsert(&store, &t).await.unwrap();

        assert_eq!(action, UpsertAction::Updated);
        assert!(store.creates.lock().unwrap().is_empty());
        assert_eq!(*store.updates.lock().unwrap(), vec!["page-42".to_string()]);
    }

    #[tokio::test]
    async fn test_upsert_is_idempotent_on_rerun() {
        let store = MockStore::default();
        let t = sample_tournament("https://letzplay.me/c/tourneys/x");

        assert_eq!(upsert(&store, &t).await.unwrap(), UpsertAction::Created);
        assert_eq!(upsert(&store, &t).await.unwrap(), UpsertAction::Updated);
        assert_eq!(store.creates.lock().unwrap().len(), 1);
        assert_eq!(store.updates.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_properties_include_date_range() {
        let t = sample_tournament("https://letzplay.me/c/tourneys/x");
        let props = NotionClient::build_properties(&t);

        assert_eq!(
            props["Torneio"]["title"][0]["text"]["content"],
            "Open de Beach Tennis"
        );
        assert_eq!(
            props["Link Letzplay"]["url"],
            "https://letzplay.me/c/tourneys/x"
        );
        assert_eq!(props["Data"]["date"]["start"], "2025-01-10");
        assert_eq!(props["Data"]["date"]["end"], "2025-01-12");
    }

    #[test]
    fn test_properties_omit_date_without_start() {
        let mut t = sample_tournament("https://letzplay.me/c/tourneys/x");
        t.start_date = None;
        t.end_date = None;

        let props = NotionClient::build_properties(&t);
        assert!(props.get("Data").is_none());
    }

    #[test]
    fn test_properties_null_end_when_absent() {
        let mut t = sample_tournament("https://letzplay.me/c/tourneys/x");
        t.end_date = None;

        let props = NotionClient::build_properties(&t);
        assert_eq!(props["Data"]["date"]["start"], "2025-01-10");
        assert!(props["Data"]["date"]["end"].is_null());
    }
}
