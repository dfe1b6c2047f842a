//! redb table definitions for the ConfGrid record store.

use redb::TableDefinition;

/// Stored records keyed by `{namespace}/{name}`, JSON-serialized.
pub const RECORDS: TableDefinition<&str, &[u8]> = TableDefinition::new("records");
