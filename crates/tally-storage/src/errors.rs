//! Storage error types.
//! One error enum covering the gateway, codec, migration, and services.

/// Errors that can occur in the persistence core.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The physical store cannot be created or opened. Fatal at startup;
    /// there is no degraded mode without a store.
    #[error("store unavailable at {path}: {message}")]
    StorageUnavailable { path: String, message: String },

    /// A scan was requested for a kind with no physical table.
    #[error("unknown entity kind: {0}")]
    UnknownEntityKind(String),

    /// The pre-migration snapshot could not be written. The migration must
    /// not proceed without it.
    #[error("pre-migration backup failed: {message}")]
    BackupFailed { message: String },

    /// A migration step failed after the backup was taken. The store has
    /// been restored from the backup before this is raised.
    #[error("migration failed: {source}")]
    MigrationFailed {
        #[source]
        source: Box<StoreError>,
    },

    /// Restoring the backup after a failed migration itself failed. The
    /// store is in an undefined state and needs manual recovery from the
    /// backup file.
    #[error("rollback failed after migration error ({migration}): {rollback}")]
    RollbackFailed {
        migration: Box<StoreError>,
        #[source]
        rollback: Box<StoreError>,
    },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("storage error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::StorageUnavailable { .. } => "STORE_UNAVAILABLE",
            Self::UnknownEntityKind(_) => "UNKNOWN_ENTITY_KIND",
            Self::BackupFailed { .. } => "BACKUP_FAILED",
            Self::MigrationFailed { .. } => "MIGRATION_FAILED",
            Self::RollbackFailed { .. } => "ROLLBACK_FAILED",
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::Sqlite(_) => "STORAGE_ERROR",
            Self::Io(_) => "IO_ERROR",
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
