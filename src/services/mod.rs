pub mod caption;
pub mod comparison;
pub mod extraction;
pub mod listings;
pub mod orchestrator;
pub mod progress;
pub mod scraper;
pub mod similarity;
