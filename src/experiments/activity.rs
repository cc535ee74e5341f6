use std::fs::Metadata;
use std::io;
use std::path::Path;
use std::time::SystemTime;

use chrono::{DateTime, Local, NaiveDateTime};

use crate::error::{DashboardError, Result};

/// Artifacts under an experiment directory whose mtime counts as activity.
pub const OUTPUT_PATTERN: &str = "output/*.txt";

pub fn to_local(time: SystemTime) -> NaiveDateTime {
    DateTime::<Local>::from(time).naive_local()
}

/// Best-effort creation time of a directory.
///
/// On Unix this is the inode status-change time (`st_ctime`), which is what most
/// filesystems can report for directories. Elsewhere the platform creation time is used,
/// falling back to the modification time.
#[cfg(unix)]
pub fn creation_time(metadata: &Metadata) -> Result<NaiveDateTime> {
    use std::os::unix::fs::MetadataExt;

    from_unix_timestamp(metadata.ctime(), metadata.ctime_nsec() as u32)
}

/// Local time of a Unix timestamp read from file metadata.
pub fn from_unix_timestamp(secs: i64, nsecs: u32) -> Result<NaiveDateTime> {
    DateTime::from_timestamp(secs, nsecs)
        .map(|utc| utc.with_timezone(&Local).naive_local())
        .ok_or_else(|| {
            DashboardError::Io(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("file timestamp out of range: {}", secs),
            ))
        })
}

#[cfg(not(unix))]
pub fn creation_time(metadata: &Metadata) -> Result<NaiveDateTime> {
    let time = metadata.created().or_else(|_| metadata.modified())?;
    Ok(to_local(time))
}

/// Latest modification time among the experiment's output artifacts, or the directory's
/// own modification time when it has none.
pub fn last_activity_time(experiment: &Path) -> Result<NaiveDateTime> {
    let pattern = format!(
        "{}/{}",
        glob::Pattern::escape(&experiment.to_string_lossy()),
        OUTPUT_PATTERN
    );

    let paths = glob::glob(&pattern)
        .map_err(|e| DashboardError::Config(format!("Invalid artifact pattern {:?}: {}", pattern, e)))?;

    let mut latest: Option<SystemTime> = None;
    for entry in paths {
        let path = match entry {
            Ok(path) => path,
            Err(e) => {
                tracing::warn!(error = %e, "Unreadable output artifact");
                continue;
            }
        };
        let modified = match std::fs::metadata(&path).and_then(|m| m.modified()) {
            Ok(modified) => modified,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Skipping vanished output artifact");
                continue;
            }
        };
        latest = Some(latest.map_or(modified, |current| current.max(modified)));
    }

    let time = match latest {
        Some(time) => time,
        None => std::fs::metadata(experiment)?.modified()?,
    };
    Ok(to_local(time))
}
