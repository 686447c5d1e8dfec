//! Repository abstractions for data access.
//!
//! Repositories borrow a connection and hide the SQL from the rest of the
//! application. Entries are written through [`crate::SqliteStore`].

pub mod account;
pub mod book;
pub mod entry;
pub mod user;

pub use account::AccountRepository;
pub use book::BookRepository;
pub use entry::EntryRepository;
pub use user::UserRepository;
