use std::path::PathBuf;

use buddyvault_error::VaultResult;

use super::policy::BuddyListPolicy;
use crate::model::{BuddyList, BuddyVariable, LoadedBuddyList};

/// Persistence of buddy lists, one record per owner.
///
/// Everything except [`init`](Self::init) fails with `NotInitialized` until
/// `init` has succeeded. Reads and writes take `&self`, so a ready store can
/// be shared between threads.
pub trait BuddyStorage: Send + Sync {
    /// Prepares the backing medium. May be called again after a failure.
    fn init(&mut self) -> VaultResult<()>;

    /// Returns the store to the uninitialized state.
    fn destroy(&mut self);

    /// Loads and rebuilds the list of `owner`.
    fn load_list(
        &self,
        owner: &str,
    ) -> VaultResult<LoadedBuddyList>;

    /// Persists `list`, returns the number of bytes written.
    fn save_list(
        &self,
        list: &BuddyList,
    ) -> VaultResult<usize>;

    /// Offline variables of `owner` without rebuilding the list.
    fn get_offline_variables(
        &self,
        owner: &str,
    ) -> VaultResult<Vec<BuddyVariable>>;

    fn policy(&self) -> &dyn BuddyListPolicy;
}

/// Lifecycle of a store.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StoreState {
    #[default]
    Uninitialized,
    Ready {
        dir: PathBuf,
    },
}

impl StoreState {
    pub fn is_ready(&self) -> bool {
        matches!(self, StoreState::Ready { .. })
    }
}
