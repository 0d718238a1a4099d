use hemicycle_extract::ExtractError;

#[derive(Debug, thiserror::Error)]
pub enum HarvestError {
    #[error("couldn't reach {url} got: {reason}")]
    Network { url: String, reason: String },

    #[error("{url} answered with HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("invalid URL {url} got: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error(transparent)]
    Extract(#[from] ExtractError),
}

impl HarvestError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status: 404, .. })
    }
}
