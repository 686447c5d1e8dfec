//! Initial schema: users, books, accounts, tag rules, entries and history.

use super::Migration;

pub(super) const MIGRATION: Migration = Migration {
    name: "m20261016_000001_initial",
    up: r"
CREATE TABLE users (
    id          TEXT PRIMARY KEY NOT NULL,
    username    TEXT NOT NULL UNIQUE
);

CREATE TABLE books (
    id          TEXT PRIMARY KEY NOT NULL,
    slug        TEXT NOT NULL UNIQUE,
    name        TEXT NOT NULL
);

CREATE TABLE book_users (
    book_id     TEXT NOT NULL REFERENCES books(id) ON DELETE CASCADE,
    user_id     TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    PRIMARY KEY (book_id, user_id)
);

CREATE TABLE accounts (
    id          TEXT PRIMARY KEY NOT NULL,
    slug        TEXT NOT NULL UNIQUE,
    name        TEXT NOT NULL,
    currency    TEXT NOT NULL CHECK (currency IN ('ARS', 'EUR', 'USD', 'UYU', 'GBP')),
    is_active   INTEGER NOT NULL DEFAULT 1,
    parser      TEXT
);

CREATE TABLE account_users (
    account_id  TEXT NOT NULL REFERENCES accounts(id) ON DELETE CASCADE,
    user_id     TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    PRIMARY KEY (account_id, user_id)
);

CREATE TABLE tag_rules (
    id          TEXT PRIMARY KEY NOT NULL,
    account_id  TEXT NOT NULL REFERENCES accounts(id) ON DELETE CASCADE,
    position    INTEGER NOT NULL,
    regex       TEXT NOT NULL,
    tag         TEXT NOT NULL,
    transfer_id TEXT REFERENCES accounts(id) ON DELETE SET NULL,
    UNIQUE (account_id, regex, tag)
);

CREATE TABLE entries (
    id          TEXT PRIMARY KEY NOT NULL,
    book_id     TEXT NOT NULL REFERENCES books(id) ON DELETE CASCADE,
    who_id      TEXT NOT NULL REFERENCES users(id),
    date        TEXT NOT NULL,
    what        TEXT NOT NULL,
    notes       TEXT NOT NULL DEFAULT '',
    account_id  TEXT NOT NULL REFERENCES accounts(id),
    amount      TEXT NOT NULL,
    is_income   INTEGER NOT NULL,
    country     TEXT NOT NULL,
    UNIQUE (book_id, account_id, date, what, amount, is_income)
);

CREATE INDEX idx_entries_book_date ON entries(book_id, date);

CREATE TABLE entry_tags (
    entry_id    TEXT NOT NULL REFERENCES entries(id) ON DELETE CASCADE,
    tag         TEXT NOT NULL,
    PRIMARY KEY (entry_id, tag)
);

CREATE TABLE entry_history (
    id          TEXT PRIMARY KEY NOT NULL,
    book        TEXT NOT NULL,
    who         TEXT NOT NULL,
    date        TEXT NOT NULL,
    what        TEXT NOT NULL,
    account     TEXT NOT NULL,
    amount      TEXT NOT NULL,
    is_income   INTEGER NOT NULL,
    tags        TEXT NOT NULL,
    country     TEXT NOT NULL,
    notes       TEXT NOT NULL,
    created_at  TEXT NOT NULL,
    reason      TEXT NOT NULL CHECK (reason IN ('delete', 'merge'))
);
",
    down: r"
DROP TABLE entry_history;
DROP TABLE entry_tags;
DROP TABLE entries;
DROP TABLE tag_rules;
DROP TABLE account_users;
DROP TABLE accounts;
DROP TABLE book_users;
DROP TABLE books;
DROP TABLE users;
",
};
