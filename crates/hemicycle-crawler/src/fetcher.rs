use hemicycle_extract::{Format, XmlDialect};

use crate::client::HttpClient;
use crate::error::HarvestError;
use crate::profile::ItemLocator;

/// A retrieved document, kept only until its text is extracted.
#[derive(Debug, Clone)]
pub struct RawDocument {
    pub url: String,
    pub body: Vec<u8>,
    pub content_type: Option<String>,
    pub format: Format,
}

/// Retrieves the document behind `locator`.
///
/// A 404 on the primary URL is retried once on the fallback URL, whose outcome
/// is returned as is. Any other failure is returned right away.
pub async fn fetch_document<C>(
    client: &C,
    locator: &ItemLocator,
    dialect: XmlDialect,
) -> Result<RawDocument, HarvestError>
where
    C: HttpClient,
{
    match (download(client, &locator.primary, dialect).await, &locator.fallback) {
        (Err(e), Some(fallback)) if e.is_not_found() => {
            log::debug!("{} not found, trying {fallback}", locator.primary);
            download(client, fallback, dialect).await
        }
        (res, _) => res,
    }
}

async fn download<C>(client: &C, url: &str, dialect: XmlDialect) -> Result<RawDocument, HarvestError>
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

    let format = Format::detect(url, resp.content_type.as_deref(), dialect);
    Ok(RawDocument {
        url: url.to_string(),
        body: resp.body,
        content_type: resp.content_type,
        format,
    })
}
