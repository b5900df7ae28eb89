//! # schedule
//! Persisted list of daily merge schedules (`source_branch` into `target_branch` at `HH:MM`).
//!
//! Only the bookkeeping lives here; nothing in this crate performs a merge.

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::AutoMergeError;

const TIME_FORMAT: &str = "%H:%M";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeSchedule {
    pub id: String,
    pub source_branch: String,
    pub target_branch: String,

    /// Always zero-padded `HH:MM`
    pub time: String,
}

/// A schedule that has not been stored yet
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewMergeSchedule {
    pub source_branch: String,
    pub target_branch: String,
    pub time: String,
}

/// Parse a `HH:MM` time, returning it re-formatted with zero padding.
pub fn normalize_time(time: &str) -> Result<String, AutoMergeError> {
    NaiveTime::parse_from_str(time, TIME_FORMAT)
        .map(|t| t.format(TIME_FORMAT).to_string())
        .map_err(|_| AutoMergeError::InvalidTime(time.to_string()))
}

/// Hand-edited files may carry unpadded times; those that don't parse are kept as-is and
/// never come due.
fn normalize_loaded(mut schedule: MergeSchedule) -> MergeSchedule {
    match normalize_time(&schedule.time) {
        Ok(time) => schedule.time = time,
        Err(err) => warn!("Schedule {} will never run: {err}", schedule.id),
    }
    schedule
}

#[derive(Debug)]
pub struct ScheduleStore {
    path: PathBuf,
    schedules: Vec<MergeSchedule>,
}

impl ScheduleStore {
    /// Open the store backed by `path`.
    ///
    /// A missing file is an empty store. So is a file that can't be read or parsed; that case
    /// is logged and the file is overwritten on the next write.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let schedules = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<Vec<MergeSchedule>>(&contents) {
                Ok(schedules) => schedules.into_iter().map(normalize_loaded).collect(),
                Err(err) => {
                    warn!("Ignoring malformed schedule file {}: {err}", path.display());
                    Vec::new()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => Vec::new(),
            Err(err) => {
                warn!("Unable to read schedule file {}: {err}", path.display());
                Vec::new()
            }
        };

        info!("Loaded {} merge schedules from {}", schedules.len(), path.display());
        Self { path, schedules }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn list(&self) -> &[MergeSchedule] {
        &self.schedules
    }

    pub fn get(&self, id: &str) -> Option<&MergeSchedule> {
        self.schedules.iter().find(|s| s.id == id)
    }

    /// Validate, store and persist a new schedule.
    pub fn add(&mut self, new: NewMergeSchedule) -> Result<MergeSchedule, AutoMergeError> {
        let schedule = MergeSchedule {
            id: Uuid::new_v4().to_string(),
            source_branch: new.source_branch,
            target_branch: new.target_branch,
            time: normalize_time(&new.time)?,
        };

        let mut schedules = self.schedules.clone();
        schedules.push(schedule.clone());
        self.write(&schedules)?;
        self.schedules = schedules;

        info!(
            "Scheduled merge of {} into {} daily at {}",
            schedule.source_branch, schedule.target_branch, schedule.time
        );
        Ok(schedule)
    }

    /// Remove and persist. Unknown ids leave the store and its file untouched.
    pub fn remove(&mut self, id: &str) -> Result<MergeSchedule, AutoMergeError> {
        let index = self
            .schedules
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| AutoMergeError::ScheduleNotFound(id.to_string()))?;

        let mut schedules = self.schedules.clone();
        let removed = schedules.remove(index);
        self.write(&schedules)?;
        self.schedules = schedules;

        info!("Removed merge schedule {id}");
        Ok(removed)
    }

    /// Schedules that fire at the minute of `time`.
    pub fn due_at(&self, time: NaiveTime) -> Vec<&MergeSchedule> {
        let key = time.format(TIME_FORMAT).to_string();
        self.schedules.iter().filter(|s| s.time == key).collect()
    }

    /// Write the store as pretty-printed JSON.
    pub fn save(&self) -> Result<(), AutoMergeError> {
        self.write(&self.schedules)
    }

    /// In-memory state is only replaced by callers once this succeeds.
    fn write(&self, schedules: &[MergeSchedule]) -> Result<(), AutoMergeError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(schedules)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}
