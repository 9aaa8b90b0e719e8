//! Integration tests for the agent HTTP adapter
//!
//! These tests use wiremock to stand in for the browsing agent service and
//! run the blocking client on tokio's blocking pool.

use poi_crawl::config::{AgentConfig, Config, CrawlerConfig, OutputConfig, TaskConfig};
use poi_crawl::crawler::{crawl, AgentClient, CrawlManager};
use poi_crawl::storage::{CrawlStore, SqliteStore};
use poi_crawl::{EstimatedScore, PoiCrawlError};
use serde_json::json;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Mounts a scrape answer for one page URL
async fn mount_page(server: &MockServer, url: &str, response: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path("/scrape"))
        .and(body_json(json!({ "url": url })))
        .respond_with(ResponseTemplate::new(200).set_body_json(response))
        .mount(server)
        .await;
}

async fn mount_validator(server: &MockServer, template: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/validate"))
        .respond_with(template)
        .mount(server)
        .await;
}

/// Builds the blocking client; must run off the async runtime
fn client_for(uri: &str) -> AgentClient {
    AgentClient::with_endpoints(
        &format!("{}/scrape", uri),
        &format!("{}/validate", uri),
        Duration::from_secs(5),
    )
    .expect("Failed to build agent client")
}

fn homepage_response() -> serde_json::Value {
    json!({
        "summary": "Tourist board homepage",
        "pois": [
            {
                "name": "Arena",
                "description": "Roman amphitheatre",
                "category": "Landmark",
                "location": "Pula"
            }
        ],
        "links": [
            { "url": "https://x.test/beaches", "score": 4 },
            { "url": "https://booking.test/deals", "score": 5 },
            { "url": "https://x.test/broken-score", "score": 9 },
            { "url": "https://x.test/huge-score", "score": 300 }
        ]
    })
}

#[tokio::test(flavor = "multi_thread")]
async fn test_agent_driven_crawl() {
    let server = MockServer::start().await;
    mount_page(&server, "https://x.test", homepage_response()).await;
    mount_page(
        &server,
        "https://x.test/beaches",
        json!({
            "summary": "Beaches",
            "pois": [
                { "name": "Bijeca", "description": "Sandy beach", "category": "Beach" }
            ],
            "links": [ { "url": "https://x.test", "score": 3 } ]
        }),
    )
    .await;
    mount_validator(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({ "is_valid": true, "raw_response": "ok" })),
    )
    .await;

    let uri = server.uri();
    tokio::task::spawn_blocking(move || {
        let agent = client_for(&uri);
        let dir = TempDir::new().unwrap();
        let store = SqliteStore::new(&dir.path().join("poi.db")).unwrap();
        let mut manager = CrawlManager::new(
            store,
            agent.clone(),
            "agent",
            "https://x.test",
            EstimatedScore::max(),
        )
        .unwrap();

        let mut scraper = agent;
        let outcome = manager.process(&mut scraper, 10, None).unwrap();

        assert!(outcome.completed);
        assert_eq!(outcome.links_visited, 2);
        assert_eq!(manager.site().len(), 2);
        assert!(manager.site().find("https://x.test/broken-score").is_none());
        assert!(manager.site().find("https://x.test/huge-score").is_none());
        assert!(manager.site().find("https://booking.test/deals").is_none());

        let home = &outcome.pois["https://x.test"][0];
        assert_eq!(home.name, "Arena");
        assert_eq!(home.location.as_deref(), Some("Pula"));
        assert_eq!(outcome.pois["https://x.test/beaches"][0].location, None);
    })
    .await
    .unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_rejected_pois_are_not_stored() {
    let server = MockServer::start().await;
    mount_page(&server, "https://x.test", homepage_response()).await;
    mount_validator(
        &server,
        ResponseTemplate::new(200)
            .set_body_json(json!({ "is_valid": false, "raw_response": "not a POI" })),
    )
    .await;

    let uri = server.uri();
    tokio::task::spawn_blocking(move || {
        let agent = client_for(&uri);
        let dir = TempDir::new().unwrap();
        let store = SqliteStore::new(&dir.path().join("poi.db")).unwrap();
        let mut manager =
            CrawlManager::new(store, agent.clone(), "agent", "https://x.test", EstimatedScore::max())
                .unwrap();

        let outcome = manager.process(&mut agent.clone(), 1, None).unwrap();

        assert!(outcome.pois.is_empty());
        assert!(!outcome.completed);
    })
    .await
    .unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_validator_failure_rejects_poi_and_continues() {
    let server = MockServer::start().await;
    mount_page(&server, "https://x.test", homepage_response()).await;
    mount_validator(&server, ResponseTemplate::new(503)).await;

    let uri = server.uri();
    tokio::task::spawn_blocking(move || {
        let agent = client_for(&uri);
        let dir = TempDir::new().unwrap();
        let store = SqliteStore::new(&dir.path().join("poi.db")).unwrap();
        let mut manager =
            CrawlManager::new(store, agent.clone(), "agent", "https://x.test", EstimatedScore::max())
                .unwrap();

        let outcome = manager.process(&mut agent.clone(), 1, None).unwrap();

        assert_eq!(outcome.links_visited, 1);
        assert!(outcome.pois.is_empty());
        assert!(manager.site().find("https://x.test/beaches").is_some());
    })
    .await
    .unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_scrape_failure_is_fatal() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/scrape"))
        .respond_with(ResponseTemplate::new(500).set_body_string("agent overloaded"))
        .mount(&server)
        .await;

    let uri = server.uri();
    tokio::task::spawn_blocking(move || {
        let agent = client_for(&uri);
        let dir = TempDir::new().unwrap();
        let store = SqliteStore::new(&dir.path().join("poi.db")).unwrap();
        let mut manager =
            CrawlManager::new(store, agent.clone(), "agent", "https://x.test", EstimatedScore::max())
                .unwrap();

        let result = manager.process(&mut agent.clone(), 5, None);

        match result {
            Err(PoiCrawlError::Agent { message, .. }) => {
                assert!(message.contains("500"));
                assert!(message.contains("agent overloaded"));
            }
            other => panic!("expected agent error, got {:?}", other.map(|o| o.links_visited)),
        }
        assert_eq!(manager.site().visited_count(), 0);
    })
    .await
    .unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_undecodable_scrape_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/scrape"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let uri = server.uri();
    tokio::task::spawn_blocking(move || {
        let agent = client_for(&uri);
        let dir = TempDir::new().unwrap();
        let store = SqliteStore::new(&dir.path().join("poi.db")).unwrap();
        let mut manager =
            CrawlManager::new(store, agent.clone(), "agent", "https://x.test", EstimatedScore::max())
                .unwrap();

        let result = manager.process(&mut agent.clone(), 5, None);
        assert!(matches!(result, Err(PoiCrawlError::Agent { .. })));
    })
    .await
    .unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_crawl_entry_point_from_config() {
    let server = MockServer::start().await;
    mount_page(&server, "https://x.test", homepage_response()).await;
    mount_page(
        &server,
        "https://x.test/beaches",
        json!({ "summary": "nothing here", "pois": [], "links": [] }),
    )
    .await;
    mount_validator(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({ "is_valid": true })),
    )
    .await;

    let uri = server.uri();
    tokio::task::spawn_blocking(move || {
        let dir = TempDir::new().unwrap();
        let db_path = dir.path().join("poi.db");
        let config = Config {
            task: TaskConfig {
                name: "from-config".to_string(),
                base_url: "x.test".to_string(),
            },
            crawler: CrawlerConfig {
                max_links_to_scrape: 1,
                min_scraping_score: None,
                seed_score: 5,
            },
            agent: AgentConfig {
                scrape_endpoint: format!("{}/scrape", uri),
                validate_endpoint: format!("{}/validate", uri),
                timeout_secs: 5,
            },
            output: OutputConfig {
                database_path: db_path.display().to_string(),
                summary_path: dir.path().join("summary.md").display().to_string(),
                score_decimals: 3,
            },
        };

        let store = SqliteStore::new(&db_path).unwrap();
        let (store, outcome, site) = crawl(&config, store).unwrap();
        assert_eq!(outcome.links_visited, 1);
        assert!(!outcome.completed);
        assert_eq!(site.len(), 2);

        // The second run picks up where the first stopped
        let (store, outcome, _) = crawl(&config, store).unwrap();
        assert_eq!(outcome.links_visited, 1);
        assert!(outcome.completed);
        assert_eq!(store.count_pois(1).unwrap(), 1);
    })
    .await
    .unwrap();
}
