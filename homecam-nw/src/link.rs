//! Dashboard link
//!
//! The view action routes the user back to the dashboard: focus it
//! when one is already reachable, otherwise open a fresh one at the
//! root path. Both paths go through the platform browser; the probe
//! only decides which outcome to report.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{Error, Result};

/// Outcome of routing a view action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewOutcome {
    /// An existing dashboard answered its health probe
    Focused,
    /// No dashboard was reachable; a new one was opened
    Opened,
}

/// Seam between action routing and the platform browser
#[async_trait]
pub trait DashboardLink: Send + Sync {
    /// Whether a dashboard is currently reachable
    async fn probe(&self) -> bool;

    /// Bring a browser to the dashboard
    fn open(&self) -> Result<()>;
}

/// Production link: health probe over HTTP, `open` for the browser
pub struct SystemLink {
    http: reqwest::Client,
    dashboard_url: String,
}

impl SystemLink {
    pub fn new(dashboard_url: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(2))
            .build()
            .map_err(|e| Error::Launch(format!("probe client init failed: {}", e)))?;
        Ok(Self {
            http,
            dashboard_url: dashboard_url.into(),
        })
    }
}

#[async_trait]
impl DashboardLink for SystemLink {
    async fn probe(&self) -> bool {
        let url = format!("{}/health", self.dashboard_url);
        match self.http.get(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                debug!("Dashboard health probe failed: {}", e);
                false
            }
        }
    }

    fn open(&self) -> Result<()> {
        info!("Opening dashboard at {}", self.dashboard_url);
        open::that(&self.dashboard_url).map_err(|e| Error::Launch(e.to_string()))
    }
}

/// Route a view action through the link
pub async fn route_view(link: &dyn DashboardLink) -> Result<ViewOutcome> {
    if link.probe().await {
        link.open()?;
        Ok(ViewOutcome::Focused)
    } else {
        link.open()?;
        Ok(ViewOutcome::Opened)
    }
}
