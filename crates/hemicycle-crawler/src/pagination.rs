use std::collections::HashSet;

use reqwest::Url;
use select::document::Document;
use select::predicate::{Attr, Name, Predicate};

use crate::client::HttpClient;
use crate::config::{HarvestConfig, OnError};
use crate::error::HarvestError;
use crate::profile::ItemLocator;

/// Outcome of following the next-page chain.
#[derive(Debug)]
pub struct Crawl {
    /// Document locations in discovery order
    pub locators: Vec<ItemLocator>,
    /// Set when a page failure stopped the crawl early
    pub interrupted: Option<HarvestError>,
}

/// Follows the next-page links from `seed_url` and collects one locator per
/// table of contents page.
///
/// Pages are visited at most once: the crawl stops on the first link leading
/// back to a visited page, when no next link exists or after `max_pages`.
pub async fn collect_locators<C>(
    client: &C,
    config: &HarvestConfig,
    seed_url: &str,
) -> Result<Crawl, HarvestError>
where
    C: HttpClient,
{
    let profile = &config.profile;
    let marker = profile.next_marker.to_lowercase();

    let mut visited = HashSet::new();
    let mut locators = vec![];
    let mut current = Some(parse_url(seed_url)?.to_string());

    while let Some(url) = current.take() {
        if config.max_pages.map_or(false, |max| locators.len() >= max) {
            log::info!("Reached the limit of {} pages", locators.len());
            break;
        }

        visited.insert(url.clone());
        locators.push(profile.rewrite.locate(&url));

        let page = match download_page(client, &url).await {
            Ok(page) => page,
            Err(e) => match config.on_page_error {
                OnError::SkipAndLog => {
                    log::warn!("Stopping crawl at {url} got: {e}");
                    return Ok(Crawl {
                        locators,
                        interrupted: Some(e),
                    });
                }
                OnError::Fail => return Err(e),
            },
        };

        let Some(href) = next_href(&page, &profile.next_label, &marker) else {
            log::debug!("No next link on {url}");
            break;
        };

        let next = match parse_url(&url).and_then(|base| join_url(&base, &href)) {
            Ok(next) => next,
            Err(e) => {
                log::warn!("Stopping crawl at {url} got: {e}");
                break;
            }
        };

        if visited.contains(&next) {
            log::debug!("Next link of {url} leads back to {next}");
            break;
        }
        current = Some(next);
    }

    log::info!("Collected {} pages", locators.len());
    Ok(Crawl {
        locators,
        interrupted: None,
    })
}

async fn download_page<C>(client: &C, url: &str) -> Result<String, HarvestError>
where
    C: HttpClient,
{
    let resp = client.get(url).await?;
    if !resp.is_success() {
        return Err(HarvestError::Status {
            url: url.to_string(),
            status: resp.status,
        });
    }
    Ok(resp.text())
}

/// Target of the next-page anchor: the anchor titled `label`, or else the first
/// anchor whose lowercased text contains `marker`.
fn next_href(page: &str, label: &str, marker: &str) -> Option<String> {
    let document = Document::from(page);

    let anchor = document
        .find(Name("a").and(Attr("title", label)))
        .next()
        .or_else(|| {
            document
                .find(Name("a"))
                .find(|a| !marker.is_empty() && a.text().to_lowercase().contains(marker))
        })?;

    anchor
        .attr("href")
        .map(str::trim)
        .filter(|href| !href.is_empty())
        .map(String::from)
}

fn parse_url(url: &str) -> Result<Url, HarvestError> {
    Url::parse(url).map_err(|e| HarvestError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })
}

fn join_url(base: &Url, href: &str) -> Result<String, HarvestError> {
    base.join(href)
        .map(|mut url| {
            url.set_fragment(None);
            url.to_string()
        })
        .map_err(|e| HarvestError::InvalidUrl {
            url: href.to_string(),
            reason: e.to_string(),
        })
}
