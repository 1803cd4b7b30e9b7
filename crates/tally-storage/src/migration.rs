//! Migration engine — schema-drift detection and safe data migration.
//!
//! At startup the engine compares the store's recorded shape fingerprint
//! against the current one. On mismatch it snapshots the store, exports
//! every row through the tolerant codec, rebuilds the store against the
//! current schema, writes the rows back, and records the new fingerprint.
//! Any failure after the snapshot restores the store verbatim and
//! surfaces the original error.

use tracing::{debug, info, warn};

use tally_core::entities::{EntityKind, ImportBundle};
use tally_core::fingerprint;

use crate::codec;
use crate::errors::{StoreError, StoreResult};
use crate::gateway::StoreGateway;
use crate::record;

/// What `check_and_migrate` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationOutcome {
    /// Fresh store; the current fingerprint was recorded, no data existed.
    FirstRun,
    /// Fingerprints match. The common case on every normal startup.
    UpToDate,
    /// Structural mismatch found; all data was re-homed.
    Migrated {
        users: usize,
        categories: usize,
        transactions: usize,
    },
}

/// Drives the startup check. The UI must not touch the store until this
/// has returned; on error the application halts with a diagnostic rather
/// than run against a possibly-inconsistent store.
pub struct MigrationEngine {
    gateway: StoreGateway,
}

impl MigrationEngine {
    pub fn new(gateway: StoreGateway) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &StoreGateway {
        &self.gateway
    }

    pub fn check_and_migrate(&self) -> StoreResult<MigrationOutcome> {
        self.gateway.ensure_store_exists()?;

        let current = fingerprint::current();
        let previous = {
            let conn = self.gateway.open()?;
            record::read_fingerprint(&conn)?
        };

        let Some(previous) = previous else {
            // Fresh install: nothing persisted yet, just record the shape.
            let conn = self.gateway.open()?;
            record::write_fingerprint(&conn, &current)?;
            info!(fingerprint = %current, "first run, schema fingerprint recorded");
            return Ok(MigrationOutcome::FirstRun);
        };

        if previous.fingerprint == current {
            debug!("schema fingerprint unchanged");
            return Ok(MigrationOutcome::UpToDate);
        }

        info!(
            previous = %previous.fingerprint,
            current = %current,
            "schema drift detected, migrating store"
        );

        // The reset below is irreversible; the snapshot is the only
        // recovery path and must exist before anything destructive runs.
        let backup_path = self.gateway.paths().migration_backup_path();
        self.gateway.checkpoint_and_copy_to(&backup_path)?;

        match self.migrate(&current) {
            Ok(outcome) => {
                info!("migration complete");
                Ok(outcome)
            }
            Err(cause) => {
                warn!(error = %cause, "migration failed, restoring pre-migration store");
                match self.gateway.close_and_replace_from(&backup_path) {
                    Ok(()) => Err(StoreError::MigrationFailed {
                        source: Box::new(cause),
                    }),
                    Err(rollback) => Err(StoreError::RollbackFailed {
                        migration: Box::new(cause),
                        rollback: Box::new(rollback),
                    }),
                }
            }
        }
    }

    /// Export, reset, reimport, record. The fingerprint is written last so
    /// a failure anywhere here leaves the old value in place and the next
    /// startup retries the same migration.
    fn migrate(&self, current: &str) -> StoreResult<MigrationOutcome> {
        let bundle = self.export_all()?;
        self.gateway.reset_and_repopulate(&bundle)?;

        let conn = self.gateway.open()?;
        record::write_fingerprint(&conn, current)?;

        Ok(MigrationOutcome::Migrated {
            users: bundle.users.len(),
            categories: bundle.categories.len(),
            transactions: bundle.transactions.len(),
        })
    }

    /// Capture every data row through the tolerant codec. A row whose
    /// shape changed is still recovered with whatever fields still match.
    pub fn export_all(&self) -> StoreResult<ImportBundle> {
        let mut bundle = ImportBundle::default();
        for kind in EntityKind::DATA {
            let rows = self.gateway.scan_raw_rows(kind.table_name())?;
            match kind {
                EntityKind::User => {
                    bundle.users.extend(rows.iter().map(codec::decode_user));
                }
                EntityKind::Category => {
                    bundle
                        .categories
                        .extend(rows.iter().map(codec::decode_category));
                }
                EntityKind::Transaction => {
                    bundle
                        .transactions
                        .extend(rows.iter().map(codec::decode_transaction));
                }
                EntityKind::Fingerprint => {}
            }
        }
        debug!(rows = bundle.row_count(), "store exported");
        Ok(bundle)
    }
}
