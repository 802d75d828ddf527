//! Rules a buddy list store consults while saving and loading.

use buddyvault_error::{StorageError, VaultResult};
use serde::{Deserialize, Serialize};

use crate::model::{Buddy, BuddyList};

/// Hooks of the surrounding buddy list manager.
///
/// The store never decides on its own which buddies survive a reload or
/// whether variables are persisted; it asks the policy it was built with.
pub trait BuddyListPolicy: Send + Sync {
    /// Whether `$`-prefixed variables are written and restored.
    fn allow_offline_variables(&self) -> bool;

    /// Transient buddies are left out of saved records.
    fn is_transient(
        &self,
        buddy: &Buddy,
    ) -> bool {
        buddy.is_temp()
    }

    /// Accepts or rejects adding `buddy` to `list`.
    fn admit_buddy(
        &self,
        list: &BuddyList,
        buddy: &Buddy,
    ) -> VaultResult<()>;
}

/// Config-driven policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuddyListSettings {
    pub allow_offline_variables: bool,
    pub max_buddy_list_size: usize,
}

impl Default for BuddyListSettings {
    fn default() -> Self {
        Self {
            allow_offline_variables: true,
            max_buddy_list_size: 100,
        }
    }
}

impl BuddyListPolicy for BuddyListSettings {
    fn allow_offline_variables(&self) -> bool {
        self.allow_offline_variables
    }

    fn admit_buddy(
        &self,
        list: &BuddyList,
        buddy: &Buddy,
    ) -> VaultResult<()> {
        if list.contains(buddy.name()) {
            return Err(StorageError::DuplicateBuddy {
                owner: list.owner().to_string(),
                buddy: buddy.name().to_string(),
            }
            .into());
        }
        if list.len() >= self.max_buddy_list_size {
            return Err(StorageError::CapacityExceeded {
                owner: list.owner().to_string(),
                limit: self.max_buddy_list_size,
            }
            .into());
        }
        Ok(())
    }
}
