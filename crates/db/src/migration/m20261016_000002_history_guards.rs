//! Make `entry_history` append-only at the database level.

use super::Migration;

pub(super) const MIGRATION: Migration = Migration {
    name: "m20261016_000002_history_guards",
    up: r"
CREATE TRIGGER entry_history_no_update
BEFORE UPDATE ON entry_history
BEGIN
    SELECT RAISE(ABORT, 'entry_history is append-only');
END;

CREATE TRIGGER entry_history_no_delete
BEFORE DELETE ON entry_history
BEGIN
    SELECT RAISE(ABORT, 'entry_history is append-only');
END;
",
    down: r"
DROP TRIGGER entry_history_no_delete;
DROP TRIGGER entry_history_no_update;
",
};
