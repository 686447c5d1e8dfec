//! Account repository for database operations.
//!
//! Tag rules are stored with an explicit position so the classifier sees
//! them in the order they were configured.

use gemledger_core::account::{Account, TagRule};
use gemledger_shared::types::{AccountId, TagRuleId, UserId};
use rusqlite::{Connection, OptionalExtension, Transaction, params};

use super::user;
use crate::codec;
use crate::error::DbError;

type AccountRow = (String, String, String, String, bool, Option<String>);

const SELECT_ACCOUNT: &str = "SELECT id, slug, name, currency, is_active, parser FROM accounts";

/// Account repository for CRUD operations.
#[derive(Debug, Clone, Copy)]
pub struct AccountRepository<'a> {
    conn: &'a Connection,
}

impl<'a> AccountRepository<'a> {
    /// Creates a new account repository.
    #[must_use]
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Inserts an account with its users and tag rules.
    ///
    /// Must not be called while the connection holds an open transaction.
    ///
    /// # Errors
    ///
    /// Returns `DbError::Conflict` if the slug is taken.
    pub fn create(&self, account: &Account) -> Result<(), DbError> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO accounts (id, slug, name, currency, is_active, parser)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                account.id.to_string(),
                account.slug,
                account.name,
                account.currency().code(),
                account.is_active,
                account.parser,
            ],
        )
        .map_err(|e| DbError::from_write(e, || format!("account {}", account.slug)))?;
        for user in &account.users {
            tx.execute(
                "INSERT INTO account_users (account_id, user_id) VALUES (?1, ?2)",
                params![account.id.to_string(), user.id.to_string()],
            )?;
        }
        insert_rules(&tx, account)?;
        tx.commit()?;
        Ok(())
    }

    /// Replaces the stored tag rules of an account with `account.rules()`.
    ///
    /// Must not be called while the connection holds an open transaction.
    ///
    /// # Errors
    ///
    /// Returns `DbError::Conflict` on a duplicate (regex, tag) pair.
    pub fn save_rules(&self, account: &Account) -> Result<(), DbError> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "DELETE FROM tag_rules WHERE account_id = ?1",
            params![account.id.to_string()],
        )?;
        insert_rules(&tx, account)?;
        tx.commit()?;
        Ok(())
    }

    /// Marks an account active or inactive.
    ///
    /// # Errors
    ///
    /// Returns `DbError::NotFound` if the account does not exist.
    pub fn set_active(&self, id: AccountId, is_active: bool) -> Result<(), DbError> {
        let changed = self.conn.execute(
            "UPDATE accounts SET is_active = ?2 WHERE id = ?1",
            params![id.to_string(), is_active],
        )?;
        if changed == 0 {
            return Err(DbError::NotFound(format!("account {id}")));
        }
        Ok(())
    }

    /// Finds an account by slug, with users and rules.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn find_by_slug(&self, slug: &str) -> Result<Option<Account>, DbError> {
        let row = self
            .conn
            .query_row(&format!("{SELECT_ACCOUNT} WHERE slug = ?1"), params![slug], read_row)
            .optional()?;
        row.map(|row| self.decode(row)).transpose()
    }

    /// Finds an account by ID, with users and rules.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, DbError> {
        let row = self
            .conn
            .query_row(
                &format!("{SELECT_ACCOUNT} WHERE id = ?1"),
                params![id.to_string()],
                read_row,
            )
            .optional()?;
        row.map(|row| self.decode(row)).transpose()
    }

    /// Lists the accounts a user can record against, by slug.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_for_user(&self, user: UserId) -> Result<Vec<Account>, DbError> {
        let mut stmt = self.conn.prepare(&format!(
            "{SELECT_ACCOUNT} WHERE id IN
                (SELECT account_id FROM account_users WHERE user_id = ?1)
             ORDER BY slug"
        ))?;
        let rows = stmt
            .query_map(params![user.to_string()], read_row)?
            .collect::<Result<Vec<_>, _>>()?;
        rows.into_iter().map(|row| self.decode(row)).collect()
    }

    fn rules(&self, account: &str) -> Result<Vec<TagRule>, DbError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, regex, tag, transfer_id FROM tag_rules
             WHERE account_id = ?1
             ORDER BY position",
        )?;
        let rows = stmt
            .query_map(params![account], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, Option<String>>(3)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(id, regex, tag, transfer)| {
                Ok(TagRule {
                    id: codec::id("tag_rules.id", &id, TagRuleId::from_uuid)?,
                    regex,
                    tag: codec::tag("tag_rules.tag", &tag)?,
                    transfer: transfer
                        .map(|t| codec::id("tag_rules.transfer_id", &t, AccountId::from_uuid))
                        .transpose()?,
                })
            })
            .collect()
    }

    fn decode(&self, row: AccountRow) -> Result<Account, DbError> {
        let (id, slug, name, currency, is_active, parser) = row;

        let mut stmt = self.conn.prepare(
            "SELECT u.id, u.username FROM users u
             JOIN account_users au ON au.user_id = u.id
             WHERE au.account_id = ?1
             ORDER BY u.username",
        )?;
        let users = stmt
            .query_map(params![id], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<Result<Vec<(String, String)>, _>>()?
            .into_iter()
            .map(user::decode)
            .collect::<Result<Vec<_>, _>>()?;

        let mut account = Account::from_parts(
            codec::id("accounts.id", &id, AccountId::from_uuid)?,
            slug,
            name,
            codec::currency("accounts.currency", &currency)?,
            self.rules(&id)?,
        );
        account.users = users;
        account.is_active = is_active;
        account.parser = parser;
        Ok(account)
    }
}

fn read_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<AccountRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
    ))
}

fn insert_rules(tx: &Transaction<'_>, account: &Account) -> Result<(), DbError> {
    for (position, rule) in account.rules().iter().enumerate() {
        tx.execute(
            "INSERT INTO tag_rules (id, account_id, position, regex, tag, transfer_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                rule.id.to_string(),
                account.id.to_string(),
                i64::try_from(position).unwrap_or(i64::MAX),
                rule.regex,
                rule.tag.as_str(),
                rule.transfer.map(|t| t.to_string()),
            ],
        )
        .map_err(|e| {
            DbError::from_write(e, || {
                format!("rule {:?} -> {} on account {}", rule.regex, rule.tag, account.slug)
            })
        })?;
    }
    Ok(())
}
