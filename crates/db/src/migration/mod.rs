//! Database migrations.
//!
//! Migrations are plain SQL run by `rusqlite_migration`, which tracks the
//! applied version in `PRAGMA user_version`.

use rusqlite::Connection;
use rusqlite_migration::{M, Migrations, SchemaVersion};
use tracing::info;

use crate::error::DbError;

mod m20261016_000001_initial;
mod m20261016_000002_history_guards;

/// A named schema change.
#[derive(Debug, Clone, Copy)]
pub struct Migration {
    /// Unique, sortable name.
    pub name: &'static str,
    /// SQL applying the change.
    pub up: &'static str,
    /// SQL reverting the change.
    pub down: &'static str,
}

/// State of one migration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationStatus {
    /// Migration name.
    pub name: &'static str,
    /// Whether it has been applied.
    pub applied: bool,
}

/// Runs database migrations.
pub struct Migrator;

impl Migrator {
    /// All migrations, oldest first.
    #[must_use]
    pub fn migrations() -> Vec<Migration> {
        vec![
            m20261016_000001_initial::MIGRATION,
            m20261016_000002_history_guards::MIGRATION,
        ]
    }

    fn runner() -> Migrations<'static> {
        Migrations::new(
            Self::migrations()
                .into_iter()
                .map(|m| M::up(m.up).down(m.down))
                .collect(),
        )
    }

    /// Number of migrations applied to `conn`.
    ///
    /// # Errors
    ///
    /// Returns an error if the schema version cannot be read.
    pub fn version(conn: &Connection) -> Result<usize, DbError> {
        Ok(match Self::runner().current_version(conn)? {
            SchemaVersion::NoneSet => 0,
            SchemaVersion::Inside(v) | SchemaVersion::Outside(v) => v.get(),
        })
    }

    /// Applies every pending migration and returns their names.
    ///
    /// # Errors
    ///
    /// Returns an error if a migration fails; nothing from this run is kept.
    pub fn up(conn: &mut Connection) -> Result<Vec<&'static str>, DbError> {
        let before = Self::version(conn)?;
        Self::runner().to_latest(conn)?;

        let applied: Vec<_> = Self::migrations()
            .into_iter()
            .skip(before)
            .map(|m| m.name)
            .collect();
        for name in &applied {
            info!(migration = name, "Applied migration");
        }
        Ok(applied)
    }

    /// Reverts the most recently applied migration, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the revert fails.
    pub fn down(conn: &mut Connection) -> Result<Option<&'static str>, DbError> {
        let version = Self::version(conn)?;
        let Some(migration) = version
            .checked_sub(1)
            .and_then(|i| Self::migrations().get(i).copied())
        else {
            return Ok(None);
        };

        Self::runner().to_version(conn, version - 1)?;
        info!(migration = migration.name, "Reverted migration");
        Ok(Some(migration.name))
    }

    /// Applied/pending state of every migration.
    ///
    /// # Errors
    ///
    /// Returns an error if the schema version cannot be read.
    pub fn status(conn: &Connection) -> Result<Vec<MigrationStatus>, DbError> {
        let version = Self::version(conn)?;
        Ok(Self::migrations()
            .into_iter()
            .enumerate()
            .map(|(i, m)| MigrationStatus {
                name: m.name,
                applied: i < version,
            })
            .collect())
    }
}
