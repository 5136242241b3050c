use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard};

use clanboard_types::{GroupId, MemberId, SlotId};

use super::{BackupRecord, CommitReceipt, MemoryState, Store, StoreError, WriteOp};
use crate::group::{GroupRecord, Member};
use crate::ledger::{ChallengeFilter, ChallengeRecord};

/// Store persisted as a single JSON document.
///
/// Each commit rewrites the document through a temporary file and a rename,
/// so a crash leaves either the old or the new contents on disk.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    state: RwLock<MemoryState>,
}

impl FileStore {
    /// Open the document at `path`, starting empty when it does not exist yet
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let state = match fs::read_to_string(&path) {
            Ok(text) if text.trim().is_empty() => MemoryState::default(),
            Ok(text) => serde_json::from_str(&text)?,
            Err(err) if err.kind() == ErrorKind::NotFound => MemoryState::default(),
            Err(source) => return Err(StoreError::Read { path, source }),
        };
        tracing::debug!(path = %path.display(), "opened store document");
        Ok(Self {
            path,
            state: RwLock::new(state),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, MemoryState>, StoreError> {
        self.state.read().map_err(|_| StoreError::Poisoned)
    }

    fn persist(&self, state: &MemoryState) -> Result<(), StoreError> {
        let json = serde_json::to_string(state)?;
        let tmp = self.path.with_extension("json.tmp");
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|source| StoreError::Write {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        fs::write(&tmp, json).map_err(|source| StoreError::Write {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &self.path).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })
    }
}

impl Store for FileStore {
    fn group(&self, group: GroupId) -> Result<Option<GroupRecord>, StoreError> {
        Ok(self.read()?.group(group).cloned())
    }

    fn member(&self, group: GroupId, member: MemberId) -> Result<Option<Member>, StoreError> {
        Ok(self.read()?.member(group, member).cloned())
    }

    fn members(&self, group: GroupId) -> Result<Vec<Member>, StoreError> {
        Ok(self.read()?.members(group))
    }

    fn backup(&self, group: GroupId, slot: SlotId) -> Result<Option<BackupRecord>, StoreError> {
        Ok(self.read()?.backup(group, slot).cloned())
    }

    fn challenges(&self, filter: &ChallengeFilter) -> Result<Vec<ChallengeRecord>, StoreError> {
        Ok(self.read()?.challenges(filter))
    }

    fn latest_challenge(&self, group: GroupId, slot: SlotId) -> Result<Option<ChallengeRecord>, StoreError> {
        Ok(self.read()?.latest_challenge(group, slot))
    }

    fn record_counts(&self, group: GroupId) -> Result<Vec<(SlotId, usize)>, StoreError> {
        Ok(self.read()?.record_counts(group))
    }

    fn commit(&self, ops: Vec<WriteOp>) -> Result<CommitReceipt, StoreError> {
        let mut state = self.state.write().map_err(|_| StoreError::Poisoned)?;
        let mut next = state.clone();
        let receipt = next.apply(ops);
        self.persist(&next)?;
        *state = next;
        Ok(receipt)
    }
}
