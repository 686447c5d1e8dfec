//! Entry and entry history persistence.
//!
//! Rows are removed only through [`crate::SqliteTransaction`], which
//! requires a history receipt.

use gemledger_core::User;
use gemledger_core::account::AccountRef;
use gemledger_core::book::BookRef;
use gemledger_core::ledger::{Entry, EntryHistory, HistoryReason};
use gemledger_core::tags::TagSet;
use gemledger_shared::types::{AccountId, BookId, EntryId, HistoryId, UserId};
use rusqlite::{Connection, OptionalExtension, Row, params};

use crate::codec;
use crate::error::DbError;

const SELECT_ENTRY: &str = "
SELECT e.id, e.book_id, b.slug, e.who_id, u.username, e.date, e.what, e.notes,
       e.account_id, a.slug, a.currency, e.amount, e.is_income, e.country,
       (SELECT GROUP_CONCAT(t.tag, ',') FROM entry_tags t WHERE t.entry_id = e.id)
FROM entries e
JOIN books b ON b.id = e.book_id
JOIN users u ON u.id = e.who_id
JOIN accounts a ON a.id = e.account_id";

const SELECT_HISTORY: &str = "
SELECT id, book, who, date, what, account, amount, is_income, tags, country, notes,
       created_at, reason
FROM entry_history";

/// Raw entry columns, decoded outside the row callback.
struct EntryRow {
    id: String,
    book_id: String,
    book_slug: String,
    who_id: String,
    username: String,
    date: String,
    what: String,
    notes: String,
    account_id: String,
    account_slug: String,
    currency: String,
    amount: String,
    is_income: bool,
    country: String,
    tags: Option<String>,
}

impl EntryRow {
    fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            book_id: row.get(1)?,
            book_slug: row.get(2)?,
            who_id: row.get(3)?,
            username: row.get(4)?,
            date: row.get(5)?,
            what: row.get(6)?,
            notes: row.get(7)?,
            account_id: row.get(8)?,
            account_slug: row.get(9)?,
            currency: row.get(10)?,
            amount: row.get(11)?,
            is_income: row.get(12)?,
            country: row.get(13)?,
            tags: row.get(14)?,
        })
    }

    fn decode(self) -> Result<Entry, DbError> {
        let tags = codec::labels(self.tags.as_deref())
            .into_iter()
            .map(|label| codec::tag("entry_tags.tag", label))
            .collect::<Result<TagSet, _>>()?;

        Ok(Entry {
            id: codec::id("entries.id", &self.id, EntryId::from_uuid)?,
            book: BookRef {
                id: codec::id("entries.book_id", &self.book_id, BookId::from_uuid)?,
                slug: self.book_slug,
            },
            who: User {
                id: codec::id("entries.who_id", &self.who_id, UserId::from_uuid)?,
                username: self.username,
            },
            when: codec::date("entries.date", &self.date)?,
            what: self.what,
            notes: self.notes,
            account: AccountRef {
                id: codec::id("entries.account_id", &self.account_id, AccountId::from_uuid)?,
                slug: self.account_slug,
                currency: codec::currency("accounts.currency", &self.currency)?,
            },
            amount: codec::amount("entries.amount", &self.amount)?,
            is_income: self.is_income,
            tags,
            country: codec::country("entries.country", &self.country)?,
        })
    }
}

/// Entry repository.
#[derive(Debug, Clone, Copy)]
pub struct EntryRepository<'a> {
    conn: &'a Connection,
}

impl<'a> EntryRepository<'a> {
    /// Creates a new entry repository.
    #[must_use]
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Finds an entry by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn find(&self, id: EntryId) -> Result<Option<Entry>, DbError> {
        let row = self
            .conn
            .query_row(
                &format!("{SELECT_ENTRY} WHERE e.id = ?1"),
                params![id.to_string()],
                EntryRow::read,
            )
            .optional()?;
        row.map(EntryRow::decode).transpose()
    }

    /// Lists the entries of a book by date, then ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_by_book(&self, book: BookId) -> Result<Vec<Entry>, DbError> {
        let mut stmt = self
            .conn
            .prepare(&format!("{SELECT_ENTRY} WHERE e.book_id = ?1 ORDER BY e.date, e.id"))?;
        let rows = stmt
            .query_map(params![book.to_string()], EntryRow::read)?
            .collect::<Result<Vec<_>, _>>()?;
        rows.into_iter().map(EntryRow::decode).collect()
    }

    /// Number of entries.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn count(&self) -> Result<usize, DbError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM entries", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or_default())
    }

    /// Inserts an entry and its tags.
    ///
    /// # Errors
    ///
    /// Returns `DbError::Conflict` if the entry key is taken.
    pub fn insert(&self, entry: &Entry) -> Result<(), DbError> {
        self.conn
            .execute(
                "INSERT INTO entries
                    (id, book_id, who_id, date, what, notes, account_id, amount, is_income, country)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                params![
                    entry.id.to_string(),
                    entry.book.id.to_string(),
                    entry.who.id.to_string(),
                    codec::format_date(entry.when),
                    entry.what,
                    entry.notes,
                    entry.account.id.to_string(),
                    codec::format_amount(entry.amount),
                    entry.is_income,
                    entry.country.as_str(),
                ],
            )
            .map_err(|e| DbError::from_write(e, || entry.key().to_string()))?;

        for tag in &entry.tags {
            self.conn.execute(
                "INSERT INTO entry_tags (entry_id, tag) VALUES (?1, ?2)",
                params![entry.id.to_string(), tag.as_str()],
            )?;
        }
        Ok(())
    }

    /// Moves an entry to another account. Returns `None` if the entry does
    /// not exist.
    ///
    /// # Errors
    ///
    /// Returns `DbError::Conflict` if the moved entry's key is taken.
    pub fn update_account(
        &self,
        id: EntryId,
        account: &AccountRef,
    ) -> Result<Option<Entry>, DbError> {
        let Some(mut entry) = self.find(id)? else {
            return Ok(None);
        };
        entry.account = account.clone();

        self.conn
            .execute(
                "UPDATE entries SET account_id = ?2 WHERE id = ?1",
                params![id.to_string(), account.id.to_string()],
            )
            .map_err(|e| DbError::from_write(e, || entry.key().to_string()))?;
        Ok(Some(entry))
    }

    /// Deletes an entry row. Callers record history first.
    pub(crate) fn delete(&self, id: EntryId) -> Result<bool, DbError> {
        let changed = self
            .conn
            .execute("DELETE FROM entries WHERE id = ?1", params![id.to_string()])?;
        Ok(changed > 0)
    }

    /// Appends a history record.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn append_history(&self, record: &EntryHistory) -> Result<(), DbError> {
        self.conn.execute(
            "INSERT INTO entry_history
                (id, book, who, date, what, account, amount, is_income, tags, country, notes,
                 created_at, reason)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
            params![
                record.id.to_string(),
                record.book,
                record.who,
                codec::format_date(record.when),
                record.what,
                record.account,
                codec::format_amount(record.amount),
                record.is_income,
                record.tags.join(","),
                record.country.as_str(),
                record.notes,
                record.created_at.to_rfc3339(),
                record.reason.as_str(),
            ],
        )?;
        Ok(())
    }

    /// The history ledger, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn history(&self) -> Result<Vec<EntryHistory>, DbError> {
        let mut stmt = self.conn.prepare(&format!("{SELECT_HISTORY} ORDER BY rowid"))?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    [
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, String>(4)?,
                        row.get::<_, String>(5)?,
                        row.get::<_, String>(6)?,
                    ],
                    row.get::<_, bool>(7)?,
                    [
                        row.get::<_, String>(8)?,
                        row.get::<_, String>(9)?,
                        row.get::<_, String>(10)?,
                        row.get::<_, String>(11)?,
                        row.get::<_, String>(12)?,
                    ],
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(head, is_income, tail)| {
                let [id, book, who, date, what, account, amount] = head;
                let [tags, country, notes, created_at, reason] = tail;
                Ok(EntryHistory {
                    id: codec::id("entry_history.id", &id, HistoryId::from_uuid)?,
                    book,
                    who,
                    when: codec::date("entry_history.date", &date)?,
                    what,
                    account,
                    amount: codec::amount("entry_history.amount", &amount)?,
                    is_income,
                    tags: codec::labels(Some(tags.as_str()))
                        .into_iter()
                        .map(String::from)
                        .collect(),
                    country: codec::country("entry_history.country", &country)?,
                    notes,
                    created_at: codec::timestamp("entry_history.created_at", &created_at)?,
                    reason: reason
                        .parse::<HistoryReason>()
                        .map_err(|e| DbError::invalid("entry_history.reason", &reason, e))?,
                })
            })
            .collect()
    }
}
