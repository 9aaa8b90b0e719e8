//! Integration tests for the crawl manager
//!
//! These tests drive full crawls against an on-disk database with a
//! scripted scraper standing in for the browsing agent, including crawls
//! split over several manager instances.

use poi_crawl::crawler::{CrawlManager, PageScraper, PageVisit, PoiValidation, PoiValidator};
use poi_crawl::storage::{CrawlStore, PoiRecord, SqliteStore, TaskStatus};
use poi_crawl::{EstimatedScore, PoiCrawlError};
use std::collections::HashMap;
use tempfile::TempDir;

/// Rejects anything that looks like accommodation
struct NoHotels;

impl PoiValidator for NoHotels {
    fn validate(&mut self, poi: &PoiRecord) -> poi_crawl::Result<PoiValidation> {
        if poi.category == "Hotel" {
            Ok(PoiValidation::reject("accommodation is not a point of interest"))
        } else {
            Ok(PoiValidation::accept("looks like a point of interest"))
        }
    }
}

/// What the fake agent reports for one page
#[derive(Clone, Default)]
struct FakePage {
    pois: Vec<(&'static str, &'static str)>,
    links: Vec<(&'static str, u8)>,
}

/// Plays back a fixed website and records the visiting order
#[derive(Default)]
struct FakeAgent {
    pages: HashMap<&'static str, FakePage>,
    visited: Vec<String>,
}

impl FakeAgent {
    fn page(
        mut self,
        url: &'static str,
        pois: Vec<(&'static str, &'static str)>,
        links: Vec<(&'static str, u8)>,
    ) -> Self {
        self.pages.insert(url, FakePage { pois, links });
        self
    }
}

impl PageScraper for FakeAgent {
    fn scrape(&mut self, page: &mut PageVisit<'_>) -> poi_crawl::Result<String> {
        self.visited.push(page.url().to_string());
        let script = self.pages.get(page.url()).cloned().unwrap_or_default();

        for (name, category) in script.pois {
            page.register_poi(PoiRecord::new(name, "seen during the test", category, None))?;
        }
        for (url, score) in script.links {
            page.register_url(url, score);
        }

        Ok(format!("scraped {}", page.url()))
    }
}

/// A small tourism site with a few cross links
fn tourism_site() -> FakeAgent {
    FakeAgent::default()
        .page(
            "https://x.test",
            vec![],
            vec![
                ("https://x.test/sights", 5),
                ("https://x.test/hotels", 3),
                ("https://x.test/contact", 1),
                ("https://partner.test/deals", 5),
            ],
        )
        .page(
            "https://x.test/sights",
            vec![("Arena", "Landmark"), ("Kamenjak", "Nature park")],
            vec![
                ("https://x.test/sights/beaches", 4),
                ("https://x.test", 2),
                ("https://x.test/sights", 5),
            ],
        )
        .page(
            "https://x.test/sights/beaches",
            vec![("Bijeca", "Beach")],
            vec![("https://x.test/sights", 5)],
        )
        .page(
            "https://x.test/hotels",
            vec![("Hotel Park", "Hotel"), ("Arena", "Landmark")],
            vec![],
        )
}

fn open_store(dir: &TempDir) -> SqliteStore {
    SqliteStore::new(&dir.path().join("poi.db")).expect("Failed to open database")
}

fn open_manager(dir: &TempDir) -> CrawlManager<SqliteStore, NoHotels> {
    CrawlManager::new(
        open_store(dir),
        NoHotels,
        "tourism",
        "https://x.test",
        EstimatedScore::max(),
    )
    .expect("Failed to create manager")
}

#[test]
fn test_full_crawl_single_invocation() {
    let dir = TempDir::new().unwrap();
    let mut manager = open_manager(&dir);
    let mut agent = tourism_site();

    let outcome = manager.process(&mut agent, 100, None).unwrap();

    assert!(outcome.completed);
    assert_eq!(outcome.links_visited, 5);
    assert_eq!(
        agent.visited,
        vec![
            "https://x.test",
            "https://x.test/sights",
            "https://x.test/sights/beaches",
            "https://x.test/hotels",
            "https://x.test/contact",
        ]
    );

    let names: Vec<&str> = outcome
        .pois
        .values()
        .flatten()
        .map(|poi| poi.name.as_str())
        .collect();
    assert_eq!(names, vec!["Arena", "Kamenjak", "Bijeca"]);

    // Off-site links never enter the graph
    assert!(manager.site().find("https://partner.test/deals").is_none());

    let task = manager.store().get_task("tourism").unwrap().unwrap();
    assert_eq!(task.status, TaskStatus::Completed);
    assert!(!task.has_snapshot);
}

#[test]
fn test_budget_split_over_invocations() {
    let dir = TempDir::new().unwrap();

    let mut first_agent = tourism_site();
    {
        let mut manager = open_manager(&dir);
        let outcome = manager.process(&mut first_agent, 2, None).unwrap();

        assert_eq!(outcome.links_visited, 2);
        assert!(!outcome.completed);
        assert_eq!(outcome.pois.values().flatten().count(), 2);
    }
    assert_eq!(first_agent.visited, vec!["https://x.test", "https://x.test/sights"]);

    let store = open_store(&dir);
    let task = store.get_task("tourism").unwrap().unwrap();
    assert_eq!(task.status, TaskStatus::InProgress);
    assert!(task.has_snapshot);
    drop(store);

    let mut second_agent = tourism_site();
    let mut manager = open_manager(&dir);
    assert_eq!(manager.site().visited_count(), 2);
    assert_eq!(manager.site().len(), 5);

    let outcome = manager.process(&mut second_agent, 100, None).unwrap();

    assert!(outcome.completed);
    assert_eq!(outcome.links_visited, 3);
    assert!(!second_agent.visited.contains(&"https://x.test".to_string()));
    assert!(!second_agent
        .visited
        .contains(&"https://x.test/sights".to_string()));
    assert_eq!(outcome.pois.values().flatten().count(), 3);
}

#[test]
fn test_resume_preserves_scores() {
    let dir = TempDir::new().unwrap();

    let scores_before = {
        let mut manager = open_manager(&dir);
        manager.process(&mut tourism_site(), 3, None).unwrap();
        manager.site().get_url_scores(6)
    };

    let manager = open_manager(&dir);
    assert_eq!(manager.site().get_url_scores(6), scores_before);
}

#[test]
fn test_rejected_pois_do_not_count_as_found() {
    let dir = TempDir::new().unwrap();
    let mut manager = open_manager(&dir);
    let mut agent = FakeAgent::default()
        .page(
            "https://x.test",
            vec![],
            vec![("https://x.test/hotels", 4), ("https://x.test/other", 3)],
        )
        .page("https://x.test/hotels", vec![("Hotel Park", "Hotel")], vec![]);

    let outcome = manager.process(&mut agent, 2, None).unwrap();

    assert!(outcome.pois.is_empty());
    let home = manager.site().link_by_url("https://x.test").unwrap();
    assert_eq!(home.children_visited(), 1);
    assert_eq!(home.children_poi_found(), 0);

    // (0/1 - 0.5) * (1 - e^-0.2) pulls the sibling down
    let scores = manager.site().get_url_scores(3);
    assert_eq!(scores["https://x.test/other"], 2.909);
}

#[test]
fn test_duplicate_poi_on_another_page_does_not_count() {
    let dir = TempDir::new().unwrap();
    let mut manager = open_manager(&dir);
    let mut agent = FakeAgent::default()
        .page(
            "https://x.test",
            vec![("Arena", "Landmark")],
            vec![("https://x.test/again", 4)],
        )
        .page("https://x.test/again", vec![("Arena", "Landmark")], vec![]);

    manager.process(&mut agent, 10, None).unwrap();

    let store = manager.store();
    assert_eq!(store.count_pois(manager.task_id()).unwrap(), 1);
    assert_eq!(
        store
            .count_pois_for_url(manager.task_id(), "https://x.test/again")
            .unwrap(),
        0
    );
    assert_eq!(
        manager
            .site()
            .link_by_url("https://x.test")
            .unwrap()
            .children_poi_found(),
        0
    );
}

#[test]
fn test_same_page_spellings_are_scraped_once() {
    let dir = TempDir::new().unwrap();
    let mut manager = open_manager(&dir);
    let mut agent = FakeAgent::default()
        .page(
            "https://x.test",
            vec![],
            vec![
                ("https://x.test/", 5),
                ("https://x.test/a", 4),
                ("https://x.test/a#top", 4),
            ],
        )
        .page("https://x.test/a", vec![], vec![("https://x.test/#news", 3)]);

    let outcome = manager.process(&mut agent, 100, None).unwrap();
    assert_eq!(outcome.links_visited, 2);
    assert_eq!(agent.visited, vec!["https://x.test", "https://x.test/a"]);
    assert_eq!(manager.site().len(), 2);
    assert!(manager.site().find("https://x.test/a#top").is_some());
}

#[test]
fn test_min_score_leaves_low_links_unvisited() {
    let dir = TempDir::new().unwrap();
    let mut manager = open_manager(&dir);
    let mut agent = tourism_site();

    let outcome = manager.process(&mut agent, 100, Some(3)).unwrap();

    assert!(outcome.completed);
    assert!(!agent.visited.contains(&"https://x.test/contact".to_string()));
    assert!(!manager
        .site()
        .link_by_url("https://x.test/contact")
        .unwrap()
        .is_visited());
}

#[test]
fn test_equal_scores_follow_discovery_order() {
    let dir = TempDir::new().unwrap();
    let mut manager = open_manager(&dir);
    let mut agent = FakeAgent::default().page(
        "https://x.test",
        vec![],
        vec![
            ("https://x.test/c", 3),
            ("https://x.test/a", 3),
            ("https://x.test/b", 3),
        ],
    );

    manager.process(&mut agent, 1, None).unwrap();
    drop(manager);

    let mut manager = open_manager(&dir);
    manager.process(&mut agent, 10, None).unwrap();

    assert_eq!(
        agent.visited,
        vec![
            "https://x.test",
            "https://x.test/c",
            "https://x.test/a",
            "https://x.test/b",
        ]
    );
}

#[test]
fn test_completed_task_starts_over_and_keeps_pois() {
    let dir = TempDir::new().unwrap();
    {
        let mut manager = open_manager(&dir);
        manager.process(&mut tourism_site(), 100, None).unwrap();
    }

    let mut manager = open_manager(&dir);
    assert_eq!(manager.site().len(), 1);

    let mut agent = tourism_site();
    let outcome = manager.process(&mut agent, 2, None).unwrap();

    assert_eq!(agent.visited.len(), 2);
    // Everything found again is a duplicate of the first run
    assert_eq!(outcome.pois.values().flatten().count(), 3);
}

#[test]
fn test_corrupt_snapshot_is_fatal() {
    let dir = TempDir::new().unwrap();
    {
        let mut manager = open_manager(&dir);
        manager.process(&mut tourism_site(), 1, None).unwrap();
    }

    let conn = rusqlite::Connection::open(dir.path().join("poi.db")).unwrap();
    conn.execute(
        "UPDATE tasks SET snapshot = ?1 WHERE name = 'tourism'",
        [b"not json".to_vec()],
    )
    .unwrap();
    drop(conn);

    let result = CrawlManager::new(
        open_store(&dir),
        NoHotels,
        "tourism",
        "https://x.test",
        EstimatedScore::max(),
    );
    assert!(matches!(result, Err(PoiCrawlError::StorageError(_))));
}

#[test]
fn test_database_file_is_created() {
    let dir = TempDir::new().unwrap();
    let _manager = open_manager(&dir);
    assert!(dir.path().join("poi.db").exists());
}
