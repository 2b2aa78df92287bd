use super::policy::{ErrorRecoveryPolicy, Failure};
use super::snapshot::ListSnapshotProvider;
use crate::browser::{Element, Session, settle};
use crate::config::HarvestConfig;
use crate::error::BrowserError;

/// Outcome of trying to open a list row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    /// The row was clicked and its detail panel should be showing
    Activated,
    /// The index is past the end of the fresh snapshot
    OutOfRange { len: usize },
    /// Every attempt failed, or the failure was not worth retrying
    GaveUp { attempts: usize },
}

impl Activation {
    pub fn is_activated(&self) -> bool {
        matches!(self, Activation::Activated)
    }
}

/// Resolves a list index to a live row and clicks it.
///
/// Each attempt starts from a fresh snapshot, so a retry never reuses a
/// handle that went stale.
pub struct SafeSelector<'a, S: Session> {
    session: &'a S,
    config: &'a HarvestConfig,
    policy: &'a ErrorRecoveryPolicy,
}

impl<'a, S: Session> SafeSelector<'a, S> {
    pub fn new(session: &'a S, config: &'a HarvestConfig, policy: &'a ErrorRecoveryPolicy) -> Self {
        Self {
            session,
            config,
            policy,
        }
    }

    /// Only a lost session is returned as an error
    pub async fn resolve_and_activate(&self, index: usize) -> Result<Activation, BrowserError> {
        let snapshots = ListSnapshotProvider::new(self.session, self.config);
        let max_attempts = self.policy.max_attempts();

        for attempt in 1..=max_attempts {
            let items = snapshots.fetch().await?;
            let Some(item) = items.get(index) else {
                ::log::warn!(
                    "Business index {} out of range (total: {})",
                    index,
                    items.len()
                );
                return Ok(Activation::OutOfRange { len: items.len() });
            };

            let error = match self.activate(item).await {
                Ok(()) => {
                    ::log::debug!("Successfully clicked business at index {}", index);
                    settle(self.config.timing.post_click()).await;
                    return Ok(Activation::Activated);
                }
                Err(e) => e,
            };

            let failure = self.policy.classify(&error);
            match failure {
                Failure::Fatal => return Err(error),
                Failure::Stale => ::log::warn!(
                    "Stale element at attempt {}/{}, retrying...",
                    attempt,
                    max_attempts
                ),
                Failure::Missing => ::log::warn!(
                    "Business at index {} disappeared before it could be clicked: {}",
                    index,
                    error
                ),
                Failure::Other => ::log::warn!(
                    "Error clicking business at index {} (attempt {}/{}): {}",
                    index,
                    attempt,
                    max_attempts,
                    error
                ),
            }

            if !self.policy.should_retry(failure, attempt) {
                return Ok(Activation::GaveUp { attempts: attempt });
            }
            settle(self.policy.backoff()).await;
        }

        Ok(Activation::GaveUp {
            attempts: max_attempts,
        })
    }

    async fn activate(&self, item: &S::Element) -> Result<(), BrowserError> {
        item.scroll_into_view().await?;
        settle(self.config.timing.pre_click()).await;
        item.click().await
    }
}
