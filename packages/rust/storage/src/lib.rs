//! libSQL ingestion sink for scraped rate sets.
//!
//! The [`Storage`] struct wraps a local libSQL database holding bank
//! identity records and their current fixed-deposit rate rows. Ingestion is
//! replace-by-bank: the bank's prior rows are deleted and the new set
//! inserted. There is no compensating rollback beyond what the engine
//! itself provides for the delete+insert sequence.

mod migrations;

use std::path::Path;

use libsql::{Connection, Database, params};
use serde::{Deserialize, Serialize};

use fdrates_shared::{Bank, DatabaseConfig, FdRatesError, IngestSummary, RateRow, Result};

/// Primary storage handle wrapping a libSQL database.
pub struct Storage {
    #[allow(dead_code)]
    db: Database,
    conn: Connection,
}

/// A stored rate row as read back from the database. The transient tenor
/// text is not persisted; only the parsed bounds and the rate are.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRate {
    pub min_days: Option<u32>,
    pub max_days: Option<u32>,
    pub interest_rate: f64,
}

impl Storage {
    /// Open or create the database described by `config`.
    ///
    /// The configuration struct is passed in explicitly; there is no
    /// module-level connection state.
    pub async fn open(config: &DatabaseConfig) -> Result<Self> {
        let path = config.resolved_path()?;
        Self::open_at(&path).await
    }

    /// Open or create a database at `path`.
    pub async fn open_at(path: &Path) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| FdRatesError::io(parent, e))?;
        }

        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| FdRatesError::Storage(e.to_string()))?;

        let conn = db
            .connect()
            .map_err(|e| FdRatesError::Storage(e.to_string()))?;

        let storage = Self { db, conn };
        storage.run_migrations().await?;
        Ok(storage)
    }

    /// Run pending schema migrations.
    async fn run_migrations(&self) -> Result<()> {
        let current_version = self.get_schema_version().await;

        for migration in migrations::all_migrations() {
            if migration.version > current_version {
                tracing::info!(
                    version = migration.version,
                    description = migration.description,
                    "applying migration"
                );
                self.conn.execute_batch(migration.sql).await.map_err(|e| {
                    FdRatesError::Storage(format!("migration v{} failed: {e}", migration.version))
                })?;
            }
        }
        Ok(())
    }

    /// Get the current schema version, or 0 if no migrations have been applied.
    async fn get_schema_version(&self) -> u32 {
        let result = self
            .conn
            .query("SELECT MAX(version) FROM schema_migrations", params![])
            .await;

        match result {
            Ok(mut rows) => {
                if let Ok(Some(row)) = rows.next().await {
                    row.get::<u32>(0).unwrap_or(0)
                } else {
                    0
                }
            }
            Err(_) => 0, // Table doesn't exist yet
        }
    }

    // -----------------------------------------------------------------------
    // Ingestion
    // -----------------------------------------------------------------------

    /// Replace `bank_name`'s rate set with `rows`.
    ///
    /// Looks the bank up by exact name (inserting the identity record on
    /// first sight), deletes its prior rate rows, inserts the new set, and
    /// reports the inserted count.
    pub async fn ingest(&self, bank_name: &str, rows: &[RateRow]) -> Result<IngestSummary> {
        let bank_id = self.ensure_bank(bank_name).await?;
        let rows_inserted = self.replace_rates(bank_id, rows).await?;

        tracing::info!(bank = bank_name, bank_id, rows_inserted, "ingested rate set");
        Ok(IngestSummary {
            bank_id,
            rows_inserted,
        })
    }

    /// Look up a bank by exact name, inserting the identity record if absent.
    /// Returns the bank id. Idempotent across runs.
    pub async fn ensure_bank(&self, name: &str) -> Result<i64> {
        let mut rows = self
            .conn
            .query("SELECT id FROM banks WHERE name = ?1 LIMIT 1", params![name])
            .await
            .map_err(|e| FdRatesError::Storage(e.to_string()))?;

        if let Ok(Some(row)) = rows.next().await {
            return row
                .get::<i64>(0)
                .map_err(|e| FdRatesError::Storage(e.to_string()));
        }

        self.conn
            .execute("INSERT INTO banks (name) VALUES (?1)", params![name])
            .await
            .map_err(|e| FdRatesError::Storage(e.to_string()))?;

        Ok(self.conn.last_insert_rowid())
    }

    /// Delete a bank's existing rate rows and insert the new set.
    /// Returns the number of rows inserted.
    pub async fn replace_rates(&self, bank_id: i64, rows: &[RateRow]) -> Result<usize> {
        self.conn
            .execute(
                "DELETE FROM interest_rates WHERE bank_id = ?1",
                params![bank_id],
            )
            .await
            .map_err(|e| FdRatesError::Storage(e.to_string()))?;

        for row in rows {
            self.conn
                .execute(
                    "INSERT INTO interest_rates (bank_id, min_days, max_days, interest_rate)
                     VALUES (?1, ?2, ?3, ?4)",
                    params![
                        bank_id,
                        row.min_days.map(i64::from),
                        row.max_days.map(i64::from),
                        row.interest_rate,
                    ],
                )
                .await
                .map_err(|e| FdRatesError::Storage(e.to_string()))?;
        }

        Ok(rows.len())
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// List all bank identity records, ordered by name.
    pub async fn list_banks(&self) -> Result<Vec<Bank>> {
        let mut rows = self
            .conn
            .query("SELECT id, name FROM banks ORDER BY name", params![])
            .await
            .map_err(|e| FdRatesError::Storage(e.to_string()))?;

        let mut banks = Vec::new();
        while let Ok(Some(row)) = rows.next().await {
            banks.push(Bank {
                id: row
                    .get::<i64>(0)
                    .map_err(|e| FdRatesError::Storage(e.to_string()))?,
                name: row
                    .get::<String>(1)
                    .map_err(|e| FdRatesError::Storage(e.to_string()))?,
            });
        }
        Ok(banks)
    }

    /// Fetch a bank and its stored rates by exact name, or `None` if the
    /// bank is unknown.
    pub async fn rates_for_bank(&self, bank_name: &str) -> Result<Option<(Bank, Vec<StoredRate>)>> {
        let mut rows = self
            .conn
            .query(
                "SELECT id, name FROM banks WHERE name = ?1 LIMIT 1",
                params![bank_name],
            )
            .await
            .map_err(|e| FdRatesError::Storage(e.to_string()))?;

        let bank = match rows.next().await {
            Ok(Some(row)) => Bank {
                id: row
                    .get::<i64>(0)
                    .map_err(|e| FdRatesError::Storage(e.to_string()))?,
                name: row
                    .get::<String>(1)
                    .map_err(|e| FdRatesError::Storage(e.to_string()))?,
            },
            Ok(None) => return Ok(None),
            Err(e) => return Err(FdRatesError::Storage(e.to_string())),
        };

        let mut rate_rows = self
            .conn
            .query(
                "SELECT min_days, max_days, interest_rate
                 FROM interest_rates WHERE bank_id = ?1 ORDER BY min_days",
                params![bank.id],
            )
            .await
            .map_err(|e| FdRatesError::Storage(e.to_string()))?;

        let mut rates = Vec::new();
        while let Ok(Some(row)) = rate_rows.next().await {
            rates.push(StoredRate {
                min_days: row.get::<i64>(0).ok().map(|v| v as u32),
                max_days: row.get::<i64>(1).ok().map(|v| v as u32),
                interest_rate: row
                    .get::<f64>(2)
                    .map_err(|e| FdRatesError::Storage(e.to_string()))?,
            });
        }

        Ok(Some((bank, rates)))
    }
}
