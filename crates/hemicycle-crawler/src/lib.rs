mod client;
mod config;
mod error;
mod fetcher;
mod harvester;
mod pagination;
mod profile;
mod record;

pub use client::{HttpClient, HttpResponse, ReqwestClient, ResponseFuture};
pub use config::{HarvestConfig, OnError};
pub use error::HarvestError;
pub use fetcher::{fetch_document, RawDocument};
pub use harvester::Harvester;
pub use pagination::{collect_locators, Crawl};
pub use profile::{ItemLocator, SourceProfile, UrlRewrite};
pub use record::{CleanedRecord, HarvestReport, Publish};

pub use anyhow;
pub use hemicycle_extract as extract;
