//! File-system buddy list store: one file per owner under `<root>/<zone>`,
//! named by the owner's [storage key](super::key).

use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
    sync::Arc,
};

use buddyvault_error::{KeyError, ResultExt, StorageError, VaultResult};
use tempfile::NamedTempFile;
use tracing::{debug, info, trace, warn};

use super::{
    codec::decode,
    key::{decode_key, encode_key, StorageKey},
    policy::BuddyListPolicy,
    storage::{BuddyStorage, StoreState},
};
use crate::{
    config::{Settings, StorageConfig},
    model::{BuddyList, BuddyVariable, LoadedBuddyList, Record},
};

/// Longest file name most file systems accept.
pub const MAX_KEY_LEN: usize = 255;

pub struct FsBuddyStorage {
    config: StorageConfig,
    policy: Arc<dyn BuddyListPolicy>,
    state: StoreState,
}

impl FsBuddyStorage {
    /// Creates an uninitialized store; call [`init`](BuddyStorage::init)
    /// before use.
    pub fn new(
        config: StorageConfig,
        policy: Arc<dyn BuddyListPolicy>,
    ) -> Self {
        Self {
            config,
            policy,
            state: StoreState::Uninitialized,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            settings.storage.clone(),
            Arc::new(settings.buddy_list.clone()),
        )
    }

    pub fn state(&self) -> &StoreState {
        &self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state.is_ready()
    }

    pub fn zone(&self) -> &str {
        &self.config.zone
    }

    /// Path of the record of `owner`, whether or not it exists.
    pub fn record_path(
        &self,
        owner: &str,
    ) -> VaultResult<PathBuf> {
        let dir = self.ready_dir()?;
        Ok(dir.join(key_for(owner)?))
    }

    /// Decodes the stored record of `owner` without rebuilding a live list.
    pub fn load_record(
        &self,
        owner: &str,
    ) -> VaultResult<Record> {
        let bytes = self
            .read_blob(owner)?
            .ok_or_else(|| StorageError::RecordNotFound {
                owner: owner.to_string(),
            })?;
        Record::from_bytes(&bytes).with_context(|| format!("decoding buddy list of '{owner}'"))
    }

    /// Owners that have a record, sorted. Files whose name is not a valid
    /// storage key are ignored.
    pub fn stored_owners(&self) -> VaultResult<Vec<String>> {
        let dir = self.ready_dir()?;
        let entries = fs::read_dir(dir).map_err(|e| StorageError::io("list directory", dir, &e))?;

        let mut owners = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StorageError::io("list directory", dir, &e))?;
            if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
                continue;
            }
            let file_name = entry.file_name();
            let Some(name) = file_name.to_str() else {
                continue;
            };
            match decode_key(name) {
                Ok(owner) if !owner.is_empty() => owners.push(owner),
                _ => trace!(file = name, "Skipping foreign file in buddy storage"),
            }
        }

        owners.sort();
        Ok(owners)
    }

    /// Removes the record of `owner`.
    pub fn delete_list(
        &self,
        owner: &str,
    ) -> VaultResult<()> {
        let path = self.record_path(owner)?;
        if !is_record_file(&path)? {
            return Err(StorageError::RecordNotFound {
                owner: owner.to_string(),
            }
            .into());
        }
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!(owner, zone = %self.config.zone, "Buddy list deleted");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(StorageError::RecordNotFound {
                owner: owner.to_string(),
            }
            .into()),
            Err(e) => Err(StorageError::io("delete", &path, &e).into()),
        }
    }

    fn ready_dir(&self) -> VaultResult<&Path> {
        match &self.state {
            StoreState::Ready { dir } => Ok(dir.as_path()),
            StoreState::Uninitialized => Err(StorageError::NotInitialized {
                zone: self.config.zone.clone(),
            }
            .into()),
        }
    }

    /// Raw record bytes of `owner`, `None` if there is no record.
    fn read_blob(
        &self,
        owner: &str,
    ) -> VaultResult<Option<Vec<u8>>> {
        let path = self.record_path(owner)?;
        if !is_record_file(&path)? {
            return Ok(None);
        }
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::io("read", &path, &e).into()),
        }
    }
}

impl BuddyStorage for FsBuddyStorage {
    fn init(&mut self) -> VaultResult<()> {
        let dir = self.config.root.join(&self.config.zone);
        match prepare_dir(&dir) {
            Ok(()) => {
                info!(zone = %self.config.zone, dir = %dir.display(), "Buddy storage ready");
                self.state = StoreState::Ready { dir };
                Ok(())
            }
            Err(e) => {
                warn!(
                    zone = %self.config.zone,
                    dir = %dir.display(),
                    error = %e,
                    "Buddy storage initialization failed"
                );
                self.state = StoreState::Uninitialized;
                Err(e)
            }
        }
    }

    fn destroy(&mut self) {
        if self.state.is_ready() {
            debug!(zone = %self.config.zone, "Buddy storage shut down");
        }
        self.state = StoreState::Uninitialized;
    }

    fn load_list(
        &self,
        owner: &str,
    ) -> VaultResult<LoadedBuddyList> {
        let record = self.load_record(owner)?;
        let loaded = record.into_list(self.policy.as_ref());

        for skipped in &loaded.skipped {
            warn!(
                owner,
                buddy = %skipped.name,
                error = %skipped.error,
                "Stored buddy rejected on load"
            );
        }
        debug!(
            owner,
            buddies = loaded.list.len(),
            skipped = loaded.skipped.len(),
            "Buddy list loaded"
        );

        Ok(loaded)
    }

    fn save_list(
        &self,
        list: &BuddyList,
    ) -> VaultResult<usize> {
        let dir = self.ready_dir()?;
        let key = key_for(list.owner())?;
        let record = Record::from_list(list, self.policy.as_ref());
        let bytes = record
            .to_bytes()
            .with_context(|| format!("encoding buddy list of '{}'", list.owner()))?;

        let path = dir.join(&key);
        write_atomic(dir, &path, &bytes)?;

        debug!(
            owner = list.owner(),
            key = %key,
            buddies = record.buddies.len(),
            variables = record.offline_variables.len(),
            bytes = bytes.len(),
            "Buddy list saved"
        );
        Ok(bytes.len())
    }

    fn get_offline_variables(
        &self,
        owner: &str,
    ) -> VaultResult<Vec<BuddyVariable>> {
        self.ready_dir()?;
        key_for(owner)?;
        if !self.policy.allow_offline_variables() {
            return Ok(Vec::new());
        }

        let Some(bytes) = self.read_blob(owner)? else {
            return Ok(Vec::new());
        };
        let value = decode(&bytes).with_context(|| format!("decoding buddy list of '{owner}'"))?;
        Record::offline_variables_from_value(&value)
            .with_context(|| format!("reading offline variables of '{owner}'"))
    }

    fn policy(&self) -> &dyn BuddyListPolicy {
        self.policy.as_ref()
    }
}

fn key_for(owner: &str) -> VaultResult<StorageKey> {
    if owner.is_empty() {
        return Err(KeyError::Empty.into());
    }
    let key = encode_key(owner);
    if key.as_str().len() > MAX_KEY_LEN {
        return Err(KeyError::TooLong {
            len: key.as_str().len(),
            max: MAX_KEY_LEN,
        }
        .into());
    }
    Ok(key)
}

/// `false` when nothing, or something other than a regular file, sits at
/// `path`.
fn is_record_file(path: &Path) -> VaultResult<bool> {
    match fs::metadata(path) {
        Ok(meta) => Ok(meta.is_file()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(StorageError::io("stat", path, &e).into()),
    }
}

/// Creates `dir` if needed and checks that files can be created in it.
fn prepare_dir(dir: &Path) -> VaultResult<()> {
    fs::create_dir_all(dir).map_err(|e| StorageError::io("create directory", dir, &e))?;
    NamedTempFile::new_in(dir).map_err(|e| StorageError::io("probe write access", dir, &e))?;
    Ok(())
}

/// Writes `bytes` to a temp file in `dir`, syncs it and renames it over
/// `path`, so readers see either the old record or the new one.
fn write_atomic(
    dir: &Path,
    path: &Path,
    bytes: &[u8],
) -> VaultResult<()> {
    let mut tmp =
        NamedTempFile::new_in(dir).map_err(|e| StorageError::io("create temp file", dir, &e))?;
    tmp.write_all(bytes)
        .map_err(|e| StorageError::io("write", tmp.path(), &e))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| StorageError::io("sync", tmp.path(), &e))?;
    tmp.persist(path)
        .map_err(|e| StorageError::io("rename", path, &e.error))?;
    Ok(())
}
