//! Batch decryption of stored items on unlock.
//!
//! Each item gets an explicit outcome. Items that fail to decrypt are dropped
//! and logged, and the batch continues. Once every item has been tried, the
//! outcomes are folded into the unlock result: if a non-empty set produced
//! no decrypted item at all, the password is reported as wrong.
//!
//! That last rule is a heuristic. A vault whose items are all independently
//! corrupted is indistinguishable from a wrong password here.

use tracing::{debug, warn};

use super::error::{VaultError, VaultResult};
use super::model::{DecryptedItem, VaultItem};
use crate::security::{decrypt_payload, VaultKey};

/// Result of trying to decrypt a single stored item.
#[derive(Debug)]
pub enum ItemOutcome {
    Decrypted(DecryptedItem),
    Corrupted { id: String, reason: VaultError },
}

/// Try to decrypt one stored item.
pub fn decrypt_item(key: &VaultKey, item: &VaultItem) -> ItemOutcome {
    match decrypt_payload(key, &item.encrypted_payload, &item.nonce) {
        Ok(payload) => ItemOutcome::Decrypted(DecryptedItem::from_payload(
            item.id.clone(),
            payload,
            item.created_at,
        )),
        Err(reason) => ItemOutcome::Corrupted {
            id: item.id.clone(),
            reason,
        },
    }
}

/// Aggregated outcomes of one reconcile pass.
#[derive(Debug, Default)]
pub struct ReconcileReport {
    pub decrypted: Vec<DecryptedItem>,
    /// Ids of items that could not be decrypted
    pub corrupted: Vec<String>,
}

impl ReconcileReport {
    pub fn record(&mut self, outcome: ItemOutcome) {
        match outcome {
            ItemOutcome::Decrypted(item) => self.decrypted.push(item),
            ItemOutcome::Corrupted { id, reason } => {
                warn!("Skipping undecryptable secure item {}: {}", id, reason.code());
                self.corrupted.push(id);
            }
        }
    }

    pub fn total(&self) -> usize {
        self.decrypted.len() + self.corrupted.len()
    }

    /// Apply the unlock policy: zero successes out of a non-empty set means
    /// the password is wrong.
    pub fn into_result(self) -> VaultResult<Vec<DecryptedItem>> {
        if self.total() > 0 && self.decrypted.is_empty() {
            return Err(VaultError::WrongPassword);
        }
        Ok(self.decrypted)
    }
}

/// Decrypt all `items` sequentially under `key`.
///
/// Yields to the runtime every `yield_interval` items so a large vault does
/// not monopolize the executor. `0` disables yielding.
pub async fn reconcile(
    key: &VaultKey,
    items: &[VaultItem],
    yield_interval: usize,
) -> VaultResult<Vec<DecryptedItem>> {
    let mut report = ReconcileReport::default();

    for (index, item) in items.iter().enumerate() {
        report.record(decrypt_item(key, item));

        let processed = index + 1;
        if yield_interval > 0 && processed % yield_interval == 0 && processed < items.len() {
            tokio::task::yield_now().await;
        }
    }

    debug!(
        "Reconciled {} secure items ({} undecryptable)",
        report.total(),
        report.corrupted.len()
    );
    report.into_result()
}
