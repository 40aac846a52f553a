//! Account deletion requests.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletionRequest {
    pub email: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip)]
    pub confirm_delete: bool,
}

impl DeletionRequest {
    /// Whether the request has everything needed to be sent.
    pub fn is_complete(&self) -> bool {
        !self.email.is_empty() && !self.phone.is_empty() && self.confirm_delete
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeletionStatus {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletionResponse {
    pub status: DeletionStatus,
}

#[derive(Debug, Error)]
pub enum DeletionError {
    #[error("Deletion request is incomplete")]
    Incomplete,
    #[error("Deletion service unavailable: {0}")]
    Unavailable(String),
}

/// Service that accepts account deletion requests.
///
/// Mirrors `POST /account/delete` with a JSON body of email, phone and an
/// optional reason, answering with `{"status": "success" | "error"}`.
#[async_trait]
pub trait DeletionClient: Send + Sync {
    async fn request_deletion(
        &self,
        request: DeletionRequest,
    ) -> Result<DeletionResponse, DeletionError>;
}

/// Stands in for the deletion service: waits, then accepts.
pub struct SimulatedDeletion {
    delay: Duration,
}

impl SimulatedDeletion {
    pub const fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl DeletionClient for SimulatedDeletion {
    async fn request_deletion(
        &self,
        request: DeletionRequest,
    ) -> Result<DeletionResponse, DeletionError> {
        if !request.is_complete() {
            return Err(DeletionError::Incomplete);
        }
        tracing::info!(
            email = %request.email,
            has_reason = request.reason.is_some(),
            "Submitting account deletion request"
        );
        tokio::time::sleep(self.delay).await;
        Ok(DeletionResponse {
            status: DeletionStatus::Success,
        })
    }
}
