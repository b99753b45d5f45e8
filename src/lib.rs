//! Visual Product Matcher
//!
//! This library backs the lookalike demo: an uploaded image is captioned,
//! visually similar marketplace listings are retrieved for that caption, and
//! each candidate is scored against the original image. A companion scraper
//! binary collects the listing catalog from a marketplace with a headless
//! browser and resolves product images through the extract.pics API.

pub mod app_state;
pub mod browser;
pub mod config;
pub mod models;
pub mod routes;
pub mod services;
