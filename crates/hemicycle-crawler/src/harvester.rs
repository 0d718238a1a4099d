use futures::{stream, StreamExt};
use hemicycle_extract::Extractor;

use crate::client::{HttpClient, ReqwestClient};
use crate::config::HarvestConfig;
use crate::error::HarvestError;
use crate::fetcher::fetch_document;
use crate::pagination::collect_locators;
use crate::profile::ItemLocator;
use crate::record::{CleanedRecord, HarvestReport, Publish};

/// Crawls the next-page chain and turns every discovered document into a
/// cleaned record.
pub struct Harvester<C> {
    client: C,
    config: HarvestConfig,
    extractor: Extractor,
}

impl Harvester<ReqwestClient> {
    pub fn new(config: HarvestConfig) -> anyhow::Result<Self> {
        let client = ReqwestClient::new(&config)?;
        Self::with_client(client, config)
    }
}

impl<C> Harvester<C>
where
    C: HttpClient,
{
    pub fn with_client(client: C, config: HarvestConfig) -> anyhow::Result<Self> {
        let extractor = config.profile.extractor()?;
        Ok(Self {
            client,
            config,
            extractor,
        })
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn config(&self) -> &HarvestConfig {
        &self.config
    }

    /// Harvests every document reachable from `seed_url`.
    ///
    /// Only pagination failures, and only with [`OnError::Fail`], are errors.
    /// Documents that can't be fetched or yield no accepted text are reported
    /// in [`HarvestReport::failures`] and skipped.
    ///
    /// [`OnError::Fail`]: crate::OnError::Fail
    pub async fn run(&self, seed_url: &str) -> Result<HarvestReport, HarvestError> {
        let crawl = collect_locators(&self.client, &self.config, seed_url).await?;

        let mut report = HarvestReport {
            attempted: crawl.locators.len(),
            interrupted: crawl.interrupted,
            ..Default::default()
        };

        let outcomes = stream::iter(&crawl.locators)
            .map(|locator| async move { (locator, self.harvest_one(locator).await) })
            .buffered(self.config.concurrent_downloads.max(1))
            .collect::<Vec<_>>()
            .await;

        for (locator, outcome) in outcomes {
            match outcome {
                Ok(record) => report.records.push(record),
                Err(e) => {
                    log::warn!("Skipping {} got: {e}", locator.page);
                    report.failures.push((locator.page.clone(), e));
                }
            }
        }

        log::info!(
            "Harvested {} records out of {} documents",
            report.records.len(),
            report.attempted
        );
        Ok(report)
    }

    /// Runs the harvest and hands the records to `publisher`, unless there are
    /// none.
    pub async fn run_and_publish<P>(
        &self,
        seed_url: &str,
        publisher: &mut P,
    ) -> anyhow::Result<HarvestReport>
    where
        P: Publish,
    {
        let report = self.run(seed_url).await?;
        if report.is_empty() {
            log::info!("Nothing to publish");
        } else {
            publisher.publish(&report.records)?;
        }
        Ok(report)
    }

    async fn harvest_one(&self, locator: &ItemLocator) -> Result<CleanedRecord, HarvestError> {
        let document =
            fetch_document(&self.client, locator, self.config.profile.xml_dialect).await?;
        let text = self.extractor.extract(&document.body, document.format)?;
        log::debug!("Extracted {} characters from {}", text.chars().count(), document.url);

        Ok(CleanedRecord {
            url: document.url,
            text,
            source: self.config.profile.source_label.clone(),
        })
    }
}
