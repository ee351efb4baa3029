//! Moderation workflow for backend-submitted shelters.
//!
//! ```text
//! pending --approve--> approved   (listed publicly)
//! pending --reject---> rejected   (deleted from the store)
//! ```
//!
//! Both targets are terminal. Transitions run only under a stored admin token and are never
//! retried: a repeated approval of an already-moderated id must surface `NotFound`.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::client::ShelterRepository;
use crate::errors::{Error, Result};
use crate::models::{ModerationStatus, Shelter};
use crate::session::SessionManager;

/// An admin decision on a pending shelter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModerationAction {
    Approve,
    Reject,
}

impl ModerationAction {
    /// Target state of this action from `from`, or `None` if `from` is terminal.
    pub fn apply(self, from: ModerationStatus) -> Option<ModerationStatus> {
        match from {
            ModerationStatus::Pending => Some(self.target()),
            ModerationStatus::Approved | ModerationStatus::Rejected => None,
        }
    }

    /// State a pending shelter ends up in.
    pub fn target(self) -> ModerationStatus {
        match self {
            ModerationAction::Approve => ModerationStatus::Approved,
            ModerationAction::Reject => ModerationStatus::Rejected,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            ModerationAction::Approve => "approve",
            ModerationAction::Reject => "reject",
        }
    }
}

/// Admin-side state container for the pending queue.
pub struct ModerationWorkflow {
    repository: Arc<dyn ShelterRepository>,
    session: Arc<SessionManager>,
    pending: RwLock<Vec<Shelter>>,
}

impl ModerationWorkflow {
    pub fn new(repository: Arc<dyn ShelterRepository>, session: Arc<SessionManager>) -> Self {
        Self {
            repository,
            session,
            pending: RwLock::new(Vec::new()),
        }
    }

    /// Load the pending queue when the admin view opens.
    pub async fn initialize(&self) -> Result<Vec<Shelter>> {
        self.load_pending().await
    }

    /// Fetch the pending queue from the backend.
    pub async fn load_pending(&self) -> Result<Vec<Shelter>> {
        let token = self.session.bearer().await?;
        let shelters = self.repository.list_pending(&token).await?;
        tracing::info!("{} shelters pending moderation", shelters.len());
        *self.pending.write().await = shelters.clone();
        Ok(shelters)
    }

    /// The pending queue as last loaded, minus shelters moderated since.
    pub async fn pending(&self) -> Vec<Shelter> {
        self.pending.read().await.clone()
    }

    pub async fn approve(&self, id: &str) -> Result<ModerationStatus> {
        self.transition(id, ModerationAction::Approve).await
    }

    pub async fn reject(&self, id: &str) -> Result<ModerationStatus> {
        self.transition(id, ModerationAction::Reject).await
    }

    async fn transition(&self, id: &str, action: ModerationAction) -> Result<ModerationStatus> {
        if let Some(known) = self.pending.read().await.iter().find(|s| s.id == id) {
            if action.apply(known.moderation_status).is_none() {
                return Err(Error::NotFound(format!(
                    "Shelter {} is already {}",
                    id,
                    known.moderation_status.as_str()
                )));
            }
        }

        // Without a token nothing is sent and nothing changes
        let token = self.session.bearer().await?;

        let result = match action {
            ModerationAction::Approve => self.repository.approve(id, &token).await,
            ModerationAction::Reject => self.repository.reject(id, &token).await,
        };

        match result {
            Ok(()) => {
                self.forget(id).await;
                tracing::info!("Shelter {} moderated ({})", id, action.as_str());
                Ok(action.target())
            }
            Err(Error::NotFound(msg)) => {
                // Someone else moderated it first; it is no longer pending either way
                self.forget(id).await;
                tracing::warn!("Shelter {} was already moderated: {}", id, msg);
                Err(Error::NotFound(msg))
            }
            Err(e) => {
                tracing::error!("Failed to {} shelter {}: {}", action.as_str(), id, e);
                Err(e)
            }
        }
    }

    async fn forget(&self, id: &str) {
        self.pending.write().await.retain(|s| s.id != id);
    }
}
