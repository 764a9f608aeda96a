//! One scrape: acquire, parse, render. Nothing is kept between calls.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, instrument, warn};

use crate::error::AcquisitionError;
use crate::exposition::render;
use crate::parser::parse_document;
use crate::source::DiagnosticSource;

pub const DEFAULT_DEADLINE: Duration = Duration::from_secs(10);

#[derive(Clone)]
pub struct Scraper {
    source: Arc<dyn DiagnosticSource>,
    deadline: Duration,
}

impl Scraper {
    pub fn new(source: Arc<dyn DiagnosticSource>, deadline: Duration) -> Self {
        Self { source, deadline }
    }

    pub fn source(&self) -> &dyn DiagnosticSource {
        self.source.as_ref()
    }

    /// Run the full pipeline and return the exposition text.
    ///
    /// Acquisition failures (including running past the deadline) abort the
    /// scrape. A malformed document does not: it renders as zero values.
    #[instrument(skip(self), fields(deadline_ms = self.deadline.as_millis()))]
    pub async fn scrape(&self) -> Result<String, AcquisitionError> {
        let raw = match tokio::time::timeout(self.deadline, self.source.acquire()).await {
            Ok(result) => result?,
            Err(_) => {
                warn!("Diagnostic source did not answer in time");
                return Err(AcquisitionError::Timeout(self.deadline));
            }
        };

        let doc = parse_document(&raw);
        let text = render(&doc);
        info!(devices = doc.devices.len(), bytes = text.len(), "Scrape complete");
        Ok(text)
    }
}
