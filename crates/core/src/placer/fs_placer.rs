//! File system placer implementation.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio::fs;
use tracing::{debug, error, warn};

use super::config::PlacerConfig;
use super::error::PlacerError;
use super::types::{PromotionJob, PromotionResult};

/// File system based placer implementation.
pub struct FsPlacer {
    config: PlacerConfig,
}

impl FsPlacer {
    /// Creates a new file system placer with the given configuration.
    pub fn new(config: PlacerConfig) -> Self {
        Self { config }
    }

    /// Creates a placer with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(PlacerConfig::default())
    }

    /// Returns the backup path for a final directory, a sibling whose name
    /// carries the configured suffix.
    fn backup_path(&self, final_dir: &Path) -> PathBuf {
        let mut name: OsString = final_dir
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(&self.config.backup_suffix);
        final_dir.with_file_name(name)
    }

    /// Attempts to move a directory atomically (rename).
    async fn try_atomic_move(source: &Path, destination: &Path) -> Result<bool, std::io::Error> {
        match fs::rename(source, destination).await {
            Ok(()) => Ok(true),
            Err(e) => {
                // Cross-filesystem moves fail with EXDEV (18 on Linux)
                if e.kind() == std::io::ErrorKind::CrossesDevices || e.raw_os_error() == Some(18) {
                    Ok(false)
                } else {
                    Err(e)
                }
            }
        }
    }

    /// Copies a directory tree into a (possibly nonexistent) destination.
    async fn copy_dir_recursive(source: &Path, destination: &Path) -> std::io::Result<()> {
        fs::create_dir_all(destination).await?;
        let mut pending = vec![(source.to_path_buf(), destination.to_path_buf())];

        while let Some((src, dst)) = pending.pop() {
            let mut entries = fs::read_dir(&src).await?;
            while let Some(entry) = entries.next_entry().await? {
                let entry_dest = dst.join(entry.file_name());
                if entry.file_type().await?.is_dir() {
                    fs::create_dir_all(&entry_dest).await?;
                    pending.push((entry.path(), entry_dest));
                } else {
                    fs::copy(entry.path(), &entry_dest).await?;
                }
            }
        }
        Ok(())
    }

    /// Moves the staging directory to its destination, falling back to a
    /// recursive copy on cross-device renames when configured.
    async fn move_into_place(
        &self,
        staging: &Path,
        destination: &Path,
    ) -> Result<(), std::io::Error> {
        if Self::try_atomic_move(staging, destination).await? {
            return Ok(());
        }
        if !self.config.fallback_to_copy {
            return Err(std::io::Error::new(
                std::io::ErrorKind::CrossesDevices,
                "staging and output are on different filesystems",
            ));
        }
        debug!(
            staging = %staging.display(),
            destination = %destination.display(),
            "Cross-device rename, copying staged output"
        );
        Self::copy_dir_recursive(staging, destination).await?;
        fs::remove_dir_all(staging).await
    }

    /// Promotes a staged output directory to its final location.
    ///
    /// On failure after the previous output has been displaced, a restore of
    /// the displaced directory is attempted so a failed promotion does not
    /// eat the previous output.
    pub async fn promote(&self, job: PromotionJob) -> Result<PromotionResult, PlacerError> {
        let start = Instant::now();

        if !job.staging_dir.is_dir() {
            return Err(PlacerError::StagingMissing {
                path: job.staging_dir.clone(),
            });
        }

        let backup = self.backup_path(&job.final_dir);
        let mut displaced = false;

        if fs::metadata(&job.final_dir).await.is_ok() {
            // Displace any backup left over from an earlier run first.
            if fs::metadata(&backup).await.is_ok() {
                fs::remove_dir_all(&backup)
                    .await
                    .map_err(|e| PlacerError::BackupFailed {
                        path: backup.clone(),
                        source: e,
                    })?;
            }
            fs::rename(&job.final_dir, &backup)
                .await
                .map_err(|e| PlacerError::BackupFailed {
                    path: job.final_dir.clone(),
                    source: e,
                })?;
            displaced = true;
        }

        if let Err(e) = self.move_into_place(&job.staging_dir, &job.final_dir).await {
            if displaced {
                if let Err(restore_err) = fs::rename(&backup, &job.final_dir).await {
                    error!(
                        backup = %backup.display(),
                        "Failed to restore displaced output after failed promotion: {}",
                        restore_err
                    );
                }
            }
            return Err(PlacerError::PromoteFailed {
                staging: job.staging_dir.clone(),
                destination: job.final_dir.clone(),
                source: e,
            });
        }

        let mut backup_left_behind = false;
        if displaced {
            if let Err(e) = fs::remove_dir_all(&backup).await {
                warn!(
                    backup = %backup.display(),
                    "Failed to remove displaced output: {}",
                    e
                );
                backup_left_behind = true;
            }
        }

        Ok(PromotionResult {
            collection_id: job.collection_id,
            final_dir: job.final_dir,
            displaced_previous: displaced,
            backup_left_behind,
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }
}

/// Returns the total size in bytes of all files under a directory.
pub async fn dir_size(path: &Path) -> std::io::Result<u64> {
    let mut total = 0u64;
    let mut pending = vec![path.to_path_buf()];

    while let Some(dir) = pending.pop() {
        let mut entries = fs::read_dir(&dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_dir() {
                pending.push(entry.path());
            } else {
                total += entry.metadata().await?.len();
            }
        }
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::CollectionId;
    use tempfile::TempDir;

    fn job(staging: &Path, final_dir: &Path) -> PromotionJob {
        PromotionJob {
            collection_id: CollectionId::new("col1").unwrap(),
            staging_dir: staging.to_path_buf(),
            final_dir: final_dir.to_path_buf(),
        }
    }

    async fn seed(dir: &Path, files: &[(&str, &str)]) {
        fs::create_dir_all(dir).await.unwrap();
        for (name, content) in files {
            fs::write(dir.join(name), content).await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_promote_without_previous_output() {
        let temp = TempDir::new().unwrap();
        let staging = temp.path().join("staging");
        let final_dir = temp.path().join("out").join("col1");
        fs::create_dir_all(temp.path().join("out")).await.unwrap();
        seed(&staging, &[("a.txt", "new")]).await;

        let placer = FsPlacer::with_defaults();
        let result = placer.promote(job(&staging, &final_dir)).await.unwrap();

        assert!(!result.displaced_previous);
        assert!(!result.backup_left_behind);
        assert_eq!(
            fs::read_to_string(final_dir.join("a.txt")).await.unwrap(),
            "new"
        );
        assert!(!staging.exists());
    }

    #[tokio::test]
    async fn test_promote_replaces_previous_output() {
        let temp = TempDir::new().unwrap();
        let staging = temp.path().join("staging");
        let final_dir = temp.path().join("out").join("col1");
        seed(&staging, &[("new.txt", "new")]).await;
        seed(&final_dir, &[("old.txt", "old")]).await;

        let placer = FsPlacer::with_defaults();
        let result = placer.promote(job(&staging, &final_dir)).await.unwrap();

        assert!(result.displaced_previous);
        assert!(final_dir.join("new.txt").exists());
        assert!(!final_dir.join("old.txt").exists());
        // no backup remains after a successful promotion
        assert!(!temp.path().join("out").join("col1_old").exists());
    }

    #[tokio::test]
    async fn test_promote_displaces_stale_backup() {
        let temp = TempDir::new().unwrap();
        let staging = temp.path().join("staging");
        let final_dir = temp.path().join("out").join("col1");
        let stale_backup = temp.path().join("out").join("col1_old");
        seed(&staging, &[("new.txt", "new")]).await;
        seed(&final_dir, &[("current.txt", "current")]).await;
        seed(&stale_backup, &[("ancient.txt", "ancient")]).await;

        let placer = FsPlacer::with_defaults();
        placer.promote(job(&staging, &final_dir)).await.unwrap();

        assert!(final_dir.join("new.txt").exists());
        assert!(!stale_backup.exists());
    }

    #[tokio::test]
    async fn test_promote_missing_staging() {
        let temp = TempDir::new().unwrap();
        let placer = FsPlacer::with_defaults();
        let result = placer
            .promote(job(
                &temp.path().join("nope"),
                &temp.path().join("out").join("col1"),
            ))
            .await;
        assert!(matches!(result, Err(PlacerError::StagingMissing { .. })));
    }

    #[tokio::test]
    async fn test_copy_fallback_disabled_fails_cleanly() {
        let temp = TempDir::new().unwrap();
        let staging = temp.path().join("staging");
        let final_dir = temp.path().join("out").join("col1");
        fs::create_dir_all(temp.path().join("out")).await.unwrap();
        seed(&staging, &[("a.txt", "new")]).await;

        // Same filesystem, so the rename succeeds even without the fallback.
        let placer = FsPlacer::new(PlacerConfig::default().with_copy_fallback(false));
        let result = placer.promote(job(&staging, &final_dir)).await.unwrap();
        assert!(final_dir.join("a.txt").exists());
        assert!(!result.displaced_previous);
    }

    #[tokio::test]
    async fn test_copy_dir_recursive_preserves_tree() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("src");
        let dest = temp.path().join("dst");
        seed(&source, &[("a.txt", "a")]).await;
        seed(&source.join("sub"), &[("b.txt", "b")]).await;

        FsPlacer::copy_dir_recursive(&source, &dest).await.unwrap();

        assert_eq!(fs::read_to_string(dest.join("a.txt")).await.unwrap(), "a");
        assert_eq!(
            fs::read_to_string(dest.join("sub").join("b.txt"))
                .await
                .unwrap(),
            "b"
        );
    }

    #[tokio::test]
    async fn test_backup_path_uses_suffix() {
        let placer = FsPlacer::new(PlacerConfig::default().with_backup_suffix(".prev"));
        assert_eq!(
            placer.backup_path(Path::new("/data/output/col1")),
            PathBuf::from("/data/output/col1.prev")
        );
    }

    #[tokio::test]
    async fn test_dir_size_sums_nested_files() {
        let temp = TempDir::new().unwrap();
        seed(temp.path(), &[("a.txt", "12345")]).await;
        seed(&temp.path().join("nested"), &[("b.txt", "123")]).await;

        let size = dir_size(temp.path()).await.unwrap();
        assert_eq!(size, 8);
    }
}
