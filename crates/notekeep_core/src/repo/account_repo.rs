//! Account repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist account rows and look them up by id or username.
//! - Surface the `accounts.username` UNIQUE index as `RepoError::Conflict`.
//!
//! # Invariants
//! - Public reads (`get_account`, `search_by_username`) never select the hash.
//! - Username matching is case-sensitive.

use crate::db::DbPool;
use crate::model::account::Account;
use crate::model::ids::AccountId;
use crate::repo::{is_unique_violation, RepoError, RepoResult};
use rusqlite::{params, OptionalExtension, Row};

/// Insert model. The hash is computed by the caller.
#[derive(Clone, Copy)]
pub struct NewAccountRecord<'a> {
    pub id: &'a AccountId,
    pub username: &'a str,
    pub password_hash: &'a str,
    pub fullname: &'a str,
}

/// Credential row used only by login verification.
#[derive(Clone)]
pub struct StoredCredential {
    pub id: AccountId,
    pub password_hash: String,
}

/// Repository interface for account persistence.
pub trait AccountRepository {
    /// Inserts one account. Returns the id echoed back by the store, if any.
    fn insert_account(&self, record: NewAccountRecord<'_>) -> RepoResult<Option<AccountId>>;
    /// Loads id + hash for an exact username.
    fn find_credential(&self, username: &str) -> RepoResult<Option<StoredCredential>>;
    fn get_account(&self, id: &AccountId) -> RepoResult<Option<Account>>;
    /// Case-sensitive substring search, ordered by username.
    fn search_by_username(&self, fragment: &str) -> RepoResult<Vec<Account>>;
}

/// SQLite-backed account repository over the shared pool.
#[derive(Clone)]
pub struct SqliteAccountRepository {
    pool: DbPool,
}

impl SqliteAccountRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl AccountRepository for SqliteAccountRepository {
    fn insert_account(&self, record: NewAccountRecord<'_>) -> RepoResult<Option<AccountId>> {
        let conn = self.pool.get()?;
        let inserted: Option<String> = conn
            .query_row(
                "INSERT INTO accounts (id, username, password_hash, fullname)
                 VALUES (?1, ?2, ?3, ?4)
                 RETURNING id;",
                params![
                    record.id.as_str(),
                    record.username,
                    record.password_hash,
                    record.fullname,
                ],
                |row| row.get(0),
            )
            .optional()
            .map_err(|err| {
                if is_unique_violation(&err) {
                    RepoError::Conflict("username")
                } else {
                    RepoError::from(err)
                }
            })?;

        Ok(inserted.map(AccountId::from))
    }

    fn find_credential(&self, username: &str) -> RepoResult<Option<StoredCredential>> {
        let conn = self.pool.get()?;
        let credential = conn
            .query_row(
                "SELECT id, password_hash FROM accounts WHERE username = ?1;",
                [username],
                |row| {
                    Ok(StoredCredential {
                        id: AccountId::from(row.get::<_, String>("id")?),
                        password_hash: row.get("password_hash")?,
                    })
                },
            )
            .optional()?;
        Ok(credential)
    }

    fn get_account(&self, id: &AccountId) -> RepoResult<Option<Account>> {
        let conn = self.pool.get()?;
        let account = conn
            .query_row(
                "SELECT id, username, fullname FROM accounts WHERE id = ?1;",
                [id.as_str()],
                parse_account_row,
            )
            .optional()?;
        Ok(account)
    }

    fn search_by_username(&self, fragment: &str) -> RepoResult<Vec<Account>> {
        let conn = self.pool.get()?;
        // instr() is case-sensitive and needs no LIKE wildcard escaping.
        let mut stmt = conn.prepare(
            "SELECT id, username, fullname
             FROM accounts
             WHERE instr(username, ?1) > 0
             ORDER BY username ASC;",
        )?;
        let accounts = stmt
            .query_map([fragment], parse_account_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(accounts)
    }
}

fn parse_account_row(row: &Row<'_>) -> rusqlite::Result<Account> {
    Ok(Account {
        id: AccountId::from(row.get::<_, String>("id")?),
        username: row.get("username")?,
        fullname: row.get("fullname")?,
    })
}
