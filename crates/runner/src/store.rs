//! Files that let an interrupted run resume.
//!
//! All files live in one state directory:
//! - `progress.json`: remaining team mints per category
//! - `contract.json`: address of the collection deployed by this tool
//! - `error.log` / `error-<category>.log`: last error of a failed run
//! - `.mintctl.lock`: held while a procedure runs

use alloy_primitives::Address;
use mintctl_primitives::MintCategory;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fmt,
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};
use thiserror::Error;
use tracing::{debug, warn};

/// Progress file name.
pub const PROGRESS_FILE: &str = "progress.json";
/// Contract address file name.
pub const CONTRACT_FILE: &str = "contract.json";
/// Top-level error log file name.
pub const ERROR_LOG: &str = "error.log";
/// Lock file name.
pub const LOCK_FILE: &str = ".mintctl.lock";

/// On-disk marker for a category whose remaining quantity is not known yet.
pub const NOT_COMPUTED: i64 = -1;

/// Errors raised by the [`StateStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading, writing or removing a state file failed.
    #[error("state file {}: {source}", path.display())]
    Io {
        /// File involved.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
    /// A state file holds malformed JSON.
    #[error("malformed state file {}: {source}", path.display())]
    Malformed {
        /// File involved.
        path: PathBuf,
        /// Underlying parse error.
        source: serde_json::Error,
    },
    /// Another invocation holds the lock.
    #[error("state directory is locked by another run; remove {} if that run is gone", path.display())]
    Locked {
        /// Lock file path.
        path: PathBuf,
    },
}

/// Remaining team mints per category.
///
/// On disk every value is a remaining quantity or [`NOT_COMPUTED`]; any other
/// negative value fails to load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<MintCategory, i64>", into = "BTreeMap<MintCategory, i64>")]
pub struct ProgressRecord(BTreeMap<MintCategory, i64>);

impl TryFrom<BTreeMap<MintCategory, i64>> for ProgressRecord {
    type Error = String;

    fn try_from(values: BTreeMap<MintCategory, i64>) -> Result<Self, Self::Error> {
        match values.iter().find(|(_, value)| **value < NOT_COMPUTED) {
            Some((category, value)) => {
                Err(format!("{category}: remaining quantity {value} is negative"))
            }
            None => Ok(Self(values)),
        }
    }
}

impl From<ProgressRecord> for BTreeMap<MintCategory, i64> {
    fn from(progress: ProgressRecord) -> Self {
        progress.0
    }
}

impl ProgressRecord {
    /// A record with every category marked as not computed.
    pub fn pending() -> Self {
        Self(MintCategory::ALL.into_iter().map(|category| (category, NOT_COMPUTED)).collect())
    }

    /// Remaining quantity of `category`, `None` when not computed yet.
    pub fn remaining(&self, category: MintCategory) -> Option<u64> {
        self.0.get(&category).and_then(|value| u64::try_from(*value).ok())
    }

    /// Records the remaining quantity of `category`, clamped to `i64::MAX`.
    ///
    /// Callers bound quantities before recording them, see
    /// [`RunnerError::SupplyOverflow`](crate::RunnerError::SupplyOverflow).
    pub fn set_remaining(&mut self, category: MintCategory, remaining: u64) {
        self.0.insert(category, i64::try_from(remaining).unwrap_or(i64::MAX));
    }

    /// Returns true if every category has been computed and reached zero.
    pub fn is_complete(&self) -> bool {
        MintCategory::ALL.into_iter().all(|category| self.remaining(category) == Some(0))
    }
}

/// Address of the collection deployed by this tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractRecord {
    /// Contract address.
    pub contract: Address,
}

/// Exclusive hold on a state directory, released on drop.
#[derive(Debug)]
pub struct RunLock {
    path: PathBuf,
}

impl RunLock {
    /// Path of the lock file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for RunLock {
    fn drop(&mut self) {
        if let Err(err) = fs::remove_file(&self.path) {
            warn!(path = %self.path.display(), %err, "failed to release lock");
        }
    }
}

/// State files of one collection.
#[derive(Debug, Clone)]
pub struct StateStore {
    dir: PathBuf,
}

impl StateStore {
    /// Creates a store rooted at `dir`. Nothing is touched until first use.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// State directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the progress file.
    pub fn progress_path(&self) -> PathBuf {
        self.dir.join(PROGRESS_FILE)
    }

    /// Path of the contract address file.
    pub fn contract_path(&self) -> PathBuf {
        self.dir.join(CONTRACT_FILE)
    }

    /// Path of the error log for `category`, or of the top-level log.
    pub fn error_log_path(&self, category: Option<MintCategory>) -> PathBuf {
        match category {
            Some(category) => self.dir.join(format!("error-{category}.log")),
            None => self.dir.join(ERROR_LOG),
        }
    }

    /// Takes the state directory lock; fails if another run holds it.
    pub fn lock(&self) -> Result<RunLock, StoreError> {
        self.ensure_dir()?;
        let path = self.dir.join(LOCK_FILE);
        let mut file = match fs::OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => {
                return Err(StoreError::Locked { path })
            }
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        // the lock is taken once the file exists; the pid is informational
        let lock = RunLock { path };
        writeln!(file, "{}", std::process::id())
            .map_err(|source| StoreError::Io { path: lock.path.clone(), source })?;
        Ok(lock)
    }

    /// Loads the progress file, if present.
    pub fn load_progress(&self) -> Result<Option<ProgressRecord>, StoreError> {
        self.read_json(&self.progress_path())
    }

    /// Writes the progress file.
    pub fn save_progress(&self, progress: &ProgressRecord) -> Result<(), StoreError> {
        self.write_json(&self.progress_path(), progress)
    }

    /// Removes the progress file if present.
    pub fn clear_progress(&self) -> Result<(), StoreError> {
        remove_if_exists(&self.progress_path())
    }

    /// Loads the contract address file, if present.
    pub fn load_contract(&self) -> Result<Option<ContractRecord>, StoreError> {
        self.read_json(&self.contract_path())
    }

    /// Writes the contract address file.
    pub fn save_contract(&self, record: &ContractRecord) -> Result<(), StoreError> {
        self.write_json(&self.contract_path(), record)
    }

    /// Removes the contract address file if present.
    pub fn clear_contract(&self) -> Result<(), StoreError> {
        remove_if_exists(&self.contract_path())
    }

    /// Overwrites the error log for `category` (or the top-level log) with `err`.
    pub fn write_error_log(
        &self,
        category: Option<MintCategory>,
        err: &dyn fmt::Display,
    ) -> Result<PathBuf, StoreError> {
        self.ensure_dir()?;
        let path = self.error_log_path(category);
        fs::write(&path, format!("{err}\n"))
            .map_err(|source| StoreError::Io { path: path.clone(), source })?;
        Ok(path)
    }

    fn ensure_dir(&self) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir).map_err(|source| StoreError::Io { path: self.dir.clone(), source })
    }

    fn read_json<T: DeserializeOwned>(&self, path: &Path) -> Result<Option<T>, StoreError> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(StoreError::Io { path: path.to_path_buf(), source }),
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| StoreError::Malformed { path: path.to_path_buf(), source })
    }

    /// Writes through a temporary file and a rename, so a crash never leaves
    /// a half-written state file behind.
    fn write_json<T: Serialize>(&self, path: &Path, value: &T) -> Result<(), StoreError> {
        self.ensure_dir()?;
        let io_err = |source: io::Error| StoreError::Io { path: path.to_path_buf(), source };

        let mut json = serde_json::to_string_pretty(value)
            .map_err(|source| StoreError::Malformed { path: path.to_path_buf(), source })?;
        json.push('\n');

        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir).map_err(io_err)?;
        tmp.write_all(json.as_bytes()).map_err(io_err)?;
        tmp.as_file().sync_all().map_err(io_err)?;
        tmp.persist(path).map_err(|err| io_err(err.error))?;

        debug!(path = %path.display(), "state file written");
        Ok(())
    }
}

fn remove_if_exists(path: &Path) -> Result<(), StoreError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(StoreError::Io { path: path.to_path_buf(), source }),
    }
}
