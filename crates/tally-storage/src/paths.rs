//! Physical locations of the store file and its backups.

use std::path::{Path, PathBuf};

/// Resolved locations for one installation's store.
///
/// Release builds keep the store under the per-user application-data
/// directory; debug builds keep it next to the working directory so a
/// developer run never touches real data.
#[derive(Debug, Clone)]
pub struct StorePaths {
    data_dir: PathBuf,
}

impl StorePaths {
    pub const DB_FILE: &'static str = "transactions.db";
    pub const BACKUP_DIR: &'static str = "backups";
    pub const MIGRATION_BACKUP_FILE: &'static str = "MigrationBackup.db";

    /// Paths rooted at an explicit directory. Tests use this with a temp dir.
    pub fn at(data_dir: impl Into<PathBuf>) -> Self {
        Self { data_dir: data_dir.into() }
    }

    /// Paths for the current installation.
    pub fn per_user() -> Self {
        #[cfg(debug_assertions)]
        let data_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        #[cfg(not(debug_assertions))]
        let data_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("Tally");
        Self { data_dir }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(Self::DB_FILE)
    }

    pub fn backup_dir(&self) -> PathBuf {
        self.data_dir.join(Self::BACKUP_DIR)
    }

    /// Fixed location of the pre-migration snapshot. Overwritten on every
    /// migration; only the most recent snapshot is retained.
    pub fn migration_backup_path(&self) -> PathBuf {
        self.backup_dir().join(Self::MIGRATION_BACKUP_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_paths() {
        let paths = StorePaths::at("/tmp/tally-test");
        assert_eq!(paths.db_path(), PathBuf::from("/tmp/tally-test/transactions.db"));
        assert_eq!(
            paths.migration_backup_path(),
            PathBuf::from("/tmp/tally-test/backups/MigrationBackup.db")
        );
    }
}
