//! Per-listing image resolution: bounded polling, raster selection, and
//! failure isolation, exercised against a scripted extraction provider.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use lookalike::config::AppConfig;
use lookalike::models::catalog::CatalogItem;
use lookalike::models::extraction::{ExtractedImage, ExtractionJob};
use lookalike::services::extraction::{self, ExtractionError, ExtractionProvider};
use lookalike::services::scraper::CatalogScraper;

enum Script {
    /// The start call itself returns a non-2xx status.
    StartFails(u16),
    /// Pending for `pending_polls` polls, then terminal with this status and
    /// image list.
    Completes {
        pending_polls: usize,
        status: &'static str,
        images: Vec<ExtractedImage>,
    },
    /// Pending forever; only the poll budget ends it.
    NeverFinishes,
}

struct ScriptedExtraction {
    /// Keyed by listing URL; the job id echoes the listing URL.
    scripts: HashMap<String, Script>,
    polls: Mutex<HashMap<String, usize>>,
}

impl ScriptedExtraction {
    fn new(scripts: Vec<(&str, Script)>) -> Self {
        Self {
            scripts: scripts
                .into_iter()
                .map(|(url, script)| (url.to_string(), script))
                .collect(),
            polls: Mutex::new(HashMap::new()),
        }
    }

    fn poll_count(&self, url: &str) -> usize {
        self.polls.lock().unwrap().get(url).copied().unwrap_or(0)
    }
}

fn pending_job(id: &str) -> ExtractionJob {
    ExtractionJob {
        id: id.to_string(),
        status: "pending".to_string(),
        images: Vec::new(),
    }
}

fn image(url: &str) -> ExtractedImage {
    ExtractedImage {
        url: url.to_string(),
        id: format!("img-{url}"),
    }
}

#[async_trait]
impl ExtractionProvider for ScriptedExtraction {
    async fn start(&self, url: &str) -> Result<ExtractionJob, ExtractionError> {
        match self.scripts.get(url) {
            Some(Script::StartFails(status)) => Err(ExtractionError::Api { status: *status }),
            Some(_) => Ok(pending_job(url)),
            None => Err(ExtractionError::Api { status: 404 }),
        }
    }

    async fn poll(&self, id: &str) -> Result<ExtractionJob, ExtractionError> {
        let count = {
            let mut polls = self.polls.lock().unwrap();
            let entry = polls.entry(id.to_string()).or_insert(0);
            *entry += 1;
            *entry
        };

        match self.scripts.get(id) {
            Some(Script::Completes {
                pending_polls,
                status,
                images,
            }) => {
                if count <= *pending_polls {
                    Ok(pending_job(id))
                } else {
                    Ok(ExtractionJob {
                        id: id.to_string(),
                        status: status.to_string(),
                        images: images.clone(),
                    })
                }
            }
            Some(Script::NeverFinishes) => Ok(pending_job(id)),
            _ => Err(ExtractionError::Api { status: 404 }),
        }
    }
}

fn test_config() -> AppConfig {
    AppConfig {
        bind_addr: "127.0.0.1:0".to_string(),
        caption_api_url: "http://localhost/caption".to_string(),
        search_api_url: "http://localhost/search".to_string(),
        comparison_api_url: "http://localhost/compare".to_string(),
        extraction_api_url: "http://localhost/v0".to_string(),
        extraction_api_key: "test-key".to_string(),
        marketplace_url: "https://market.test/".to_string(),
        search_input_selector: "input[type='search']".to_string(),
        listing_selector: "a[href*='/products/']".to_string(),
        max_listings: 10,
        poll_interval_ms: 1,
        poll_max_attempts: 3,
        resolve_concurrency: 4,
    }
}

fn listing(url: &str) -> CatalogItem {
    CatalogItem {
        listing_url: url.to_string(),
        price: "£10.00".to_string(),
        image_url: None,
    }
}

#[tokio::test]
async fn first_recognized_raster_extension_wins() {
    let url = "https://market.test/products/polo/";
    let provider = ScriptedExtraction::new(vec![(
        url,
        Script::Completes {
            pending_polls: 2,
            status: "done",
            images: vec![image("https://cdn.test/a.webp"), image("https://cdn.test/b.jpg")],
        },
    )]);
    let config = test_config();
    let scraper = CatalogScraper::new(&config, &provider);

    let resolved = scraper.resolve_images(vec![listing(url)]).await;

    assert_eq!(resolved.len(), 1);
    assert_eq!(resolved[0].image_url.as_deref(), Some("https://cdn.test/b.jpg"));
    // pending, pending, done
    assert_eq!(provider.poll_count(url), 3);
}

#[tokio::test]
async fn failed_start_leaves_image_absent_and_run_continues() {
    let rejected = "https://market.test/products/rejected/";
    let accepted = "https://market.test/products/accepted/";
    let provider = ScriptedExtraction::new(vec![
        (rejected, Script::StartFails(401)),
        (
            accepted,
            Script::Completes {
                pending_polls: 0,
                status: "done",
                images: vec![image("https://cdn.test/photo.png")],
            },
        ),
    ]);
    let config = test_config();
    let scraper = CatalogScraper::new(&config, &provider);

    let resolved = scraper
        .resolve_images(vec![listing(rejected), listing(accepted)])
        .await;

    assert_eq!(resolved.len(), 2);
    assert_eq!(resolved[0].image_url, None);
    assert_eq!(
        resolved[1].image_url.as_deref(),
        Some("https://cdn.test/photo.png")
    );
}

#[tokio::test]
async fn poll_budget_exhaustion_is_a_timeout() {
    let url = "https://market.test/products/stuck/";
    let provider = ScriptedExtraction::new(vec![(url, Script::NeverFinishes)]);

    let error = extraction::await_completion(
        &provider,
        url,
        std::time::Duration::from_millis(1),
        3,
    )
    .await
    .unwrap_err();

    assert!(matches!(error, ExtractionError::Timeout { attempts: 3 }));
    assert_eq!(provider.poll_count(url), 3);

    // Through the scraper the timeout degrades to an absent image.
    let config = test_config();
    let scraper = CatalogScraper::new(&config, &provider);
    let resolved = scraper.resolve_images(vec![listing(url)]).await;
    assert_eq!(resolved.len(), 1);
    assert_eq!(resolved[0].image_url, None);
}

#[tokio::test]
async fn ten_listings_always_yield_ten_results() {
    let urls: Vec<String> = (0..10)
        .map(|i| format!("https://market.test/products/item-{i}/"))
        .collect();

    let mut scripts: Vec<(&str, Script)> = Vec::new();
    for (i, url) in urls.iter().enumerate() {
        let script = match i % 5 {
            // Resolves to a jpg
            0 | 1 => Script::Completes {
                pending_polls: i % 3,
                status: "done",
                images: vec![image(&format!("https://cdn.test/{i}.jpg"))],
            },
            // Finishes but finds no recognized raster format
            2 => Script::Completes {
                pending_polls: 0,
                status: "done",
                images: vec![image(&format!("https://cdn.test/{i}.svg"))],
            },
            // Job ends in error
            3 => Script::Completes {
                pending_polls: 1,
                status: "error",
                images: Vec::new(),
            },
            // Start call rejected
            _ => Script::StartFails(500),
        };
        scripts.push((url.as_str(), script));
    }
    let provider = ScriptedExtraction::new(scripts);
    let config = test_config();
    let scraper = CatalogScraper::new(&config, &provider);

    let resolved = scraper
        .resolve_images(urls.iter().map(|u| listing(u)).collect())
        .await;

    assert_eq!(resolved.len(), 10);
    // Order preserved
    for (item, url) in resolved.iter().zip(&urls) {
        assert_eq!(&item.listing_url, url);
    }
    // Only the i % 5 ∈ {0, 1} listings carry an image
    for (i, item) in resolved.iter().enumerate() {
        let expect_image = i % 5 == 0 || i % 5 == 1;
        assert_eq!(item.image_url.is_some(), expect_image, "listing {i}");
    }
}
