//! Schema and table allow-lists

use mysqldump_source::{DumpHandler, HandlerOutcome};

/// Passes through only the rows of selected schemas and tables.
///
/// Rows outside the allow-lists are answered with [`HandlerOutcome::Skipped`]
/// without reaching the wrapped handler. An empty list allows everything.
/// Table entries match either the bare table name or `schema.table`. A table
/// name that itself contains a dot can be given bare or qualified.
pub struct TableFilter<H> {
    inner: H,
    schemas: Vec<String>,
    tables: Vec<String>,
    skipped: u64,
}

impl<H> TableFilter<H> {
    pub fn new(inner: H, schemas: Vec<String>, tables: Vec<String>) -> Self {
        Self {
            inner,
            schemas,
            tables,
            skipped: 0,
        }
    }

    pub fn allows(&self, schema: &str, table: &str) -> bool {
        let schema_ok = self.schemas.is_empty() || self.schemas.iter().any(|s| s == schema);
        let table_ok = self.tables.is_empty()
            || self.tables.iter().any(|t| {
                t == table
                    || t
                        .strip_prefix(schema)
                        .and_then(|rest| rest.strip_prefix('.'))
                        == Some(table)
            });
        schema_ok && table_ok
    }

    /// Number of rows declined so far.
    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    pub fn inner(&self) -> &H {
        &self.inner
    }

    pub fn into_inner(self) -> H {
        self.inner
    }
}

impl<H: DumpHandler> DumpHandler for TableFilter<H> {
    type Error = H::Error;

    fn binlog(&mut self, name: &str, position: u64) -> Result<HandlerOutcome, Self::Error> {
        self.inner.binlog(name, position)
    }

    fn data(
        &mut self,
        schema: &str,
        table: &str,
        values: Vec<String>,
    ) -> Result<HandlerOutcome, Self::Error> {
        if !self.allows(schema, table) {
            self.skipped += 1;
            return Ok(HandlerOutcome::Skipped);
        }
        self.inner.data(schema, table, values)
    }
}
