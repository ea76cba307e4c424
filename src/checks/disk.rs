//! Disk space probe.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::error;

use crate::check::{CheckResult, CheckStatus, HealthCheck};
use crate::error::BoxError;

/// Default minimum free space: 100 MiB.
pub const DEFAULT_DISK_THRESHOLD_BYTES: u64 = 100 * 1024 * 1024;

/// Probes the free space of the filesystem holding a path.
///
/// Reports down when fewer bytes than the threshold are available to
/// unprivileged processes, or when the filesystem cannot be queried at all.
pub struct DiskSpaceCheck {
    name: String,
    path: PathBuf,
    threshold_bytes: u64,
}

impl DiskSpaceCheck {
    /// Create a new disk space probe for the filesystem holding `path`.
    pub fn new(path: impl Into<PathBuf>, threshold_bytes: u64) -> Self {
        Self {
            name: "disk-space".to_string(),
            path: path.into(),
            threshold_bytes,
        }
    }

    /// Override the check name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

impl Default for DiskSpaceCheck {
    fn default() -> Self {
        Self::new("/", DEFAULT_DISK_THRESHOLD_BYTES)
    }
}

#[async_trait]
impl HealthCheck for DiskSpaceCheck {
    async fn check(&self) -> Result<CheckResult, BoxError> {
        let path = self.path.display().to_string();

        match free_bytes(&self.path) {
            Ok(free) => {
                let status = if free >= self.threshold_bytes {
                    CheckStatus::Up
                } else {
                    CheckStatus::Down
                };
                Ok(CheckResult::up(&self.name)
                    .with_status(status)
                    .with_data("path", path)
                    .with_data("free_bytes", free as i64)
                    .with_data("threshold_bytes", self.threshold_bytes as i64))
            }
            Err(e) => {
                error!(check = %self.name, path = %path, error = %e, "disk space lookup failed");
                Ok(CheckResult::down(&self.name)
                    .with_data("path", path)
                    .with_data("error", e.to_string()))
            }
        }
    }
}

/// Bytes available to unprivileged processes on the filesystem holding `path`.
#[cfg(unix)]
fn free_bytes(path: &Path) -> std::io::Result<u64> {
    use std::os::unix::ffi::OsStrExt;

    let path = std::ffi::CString::new(path.as_os_str().as_bytes())
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;

    let mut stat: libc::statvfs = unsafe { std::mem::zeroed() };
    // SAFETY: path is a valid C string and stat is a writable statvfs buffer.
    let rc = unsafe { libc::statvfs(path.as_ptr(), &mut stat) };
    if rc != 0 {
        return Err(std::io::Error::last_os_error());
    }

    Ok(stat.f_bavail as u64 * stat.f_frsize as u64)
}

#[cfg(not(unix))]
fn free_bytes(_path: &Path) -> std::io::Result<u64> {
    Err(std::io::Error::new(
        std::io::ErrorKind::Unsupported,
        "free space lookup requires statvfs",
    ))
}
