//! Sharing summaries with recipients.
//!
//! Validation lives here; the actual hand-off goes through [`SummaryDelivery`].
//! The default [`SimulatedDelivery`] contacts no mail transport.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};

pub const SHARED_MESSAGE: &str = "Summary shared successfully!";

#[derive(Debug, Error)]
pub enum ShareError {
    #[error("Summary and recipients are required")]
    MissingFields,

    #[error("{0}")]
    Delivery(anyhow::Error),
}

/// Request body for `POST /api/share`. `subject` falls back to the configured default.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ShareRequest {
    pub summary: String,
    pub recipients: Vec<String>,
    pub subject: Option<String>,
}

/// A message ready to hand to a delivery backend.
#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingEmail {
    pub to: Vec<String>,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailData {
    pub to: Vec<String>,
    pub subject: String,
    pub body: String,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareResponse {
    pub message: String,
    pub email_data: EmailData,
    pub success: bool,
}

#[async_trait]
pub trait SummaryDelivery: Send + Sync {
    fn name(&self) -> &'static str;

    async fn deliver(&self, email: OutgoingEmail) -> Result<EmailData>;
}

/// Pretends every message was sent.
pub struct SimulatedDelivery;

#[async_trait]
impl SummaryDelivery for SimulatedDelivery {
    fn name(&self) -> &'static str {
        "simulated"
    }

    async fn deliver(&self, email: OutgoingEmail) -> Result<EmailData> {
        Ok(EmailData {
            to: email.to,
            subject: email.subject,
            body: email.body,
            status: "sent".to_string(),
        })
    }
}

pub struct ShareService {
    delivery: Arc<dyn SummaryDelivery>,
    default_subject: String,
}

impl ShareService {
    pub fn new(delivery: Arc<dyn SummaryDelivery>, default_subject: impl Into<String>) -> Self {
        Self {
            delivery,
            default_subject: default_subject.into(),
        }
    }

    pub fn simulated(default_subject: impl Into<String>) -> Self {
        Self::new(Arc::new(SimulatedDelivery), default_subject)
    }

    pub async fn share(&self, request: ShareRequest) -> Result<ShareResponse, ShareError> {
        if request.summary.trim().is_empty() || request.recipients.is_empty() {
            return Err(ShareError::MissingFields);
        }

        let email = OutgoingEmail {
            to: request.recipients,
            subject: request
                .subject
                .unwrap_or_else(|| self.default_subject.clone()),
            body: request.summary,
        };

        info!(
            "Sharing summary with {} recipient(s) via {} delivery",
            email.to.len(),
            self.delivery.name()
        );

        let email_data = self.delivery.deliver(email).await.map_err(|e| {
            error!("Summary delivery failed: {:#}", e);
            ShareError::Delivery(e)
        })?;

        Ok(ShareResponse {
            message: SHARED_MESSAGE.to_string(),
            email_data,
            success: true,
        })
    }
}
