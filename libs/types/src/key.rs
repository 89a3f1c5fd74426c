//! Composite calendar key
//!
//! Format: `"{warehouse_name}:{acceptance_type}:{YYYY-MM-DD}"`.
//! `\` and `:` inside identifiers are escaped so distinct slots never share
//! a key; identifiers without them render exactly as written.

use crate::date::CalendarDate;
use std::fmt;

/// Identifies one logical calendar slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CalendarKey {
    warehouse_name: String,
    acceptance_type: String,
    date: CalendarDate,
}

impl CalendarKey {
    pub fn new(
        warehouse_name: impl Into<String>,
        acceptance_type: impl Into<String>,
        date: CalendarDate,
    ) -> Self {
        Self {
            warehouse_name: warehouse_name.into(),
            acceptance_type: acceptance_type.into(),
            date,
        }
    }

    /// Canonical string used as the cache key.
    pub fn canonical(&self) -> String {
        self.to_string()
    }
}

fn write_escaped(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    for c in s.chars() {
        match c {
            '\\' => f.write_str("\\\\")?,
            ':' => f.write_str("\\:")?,
            c => write!(f, "{}", c)?,
        }
    }
    Ok(())
}

impl fmt::Display for CalendarKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_escaped(f, &self.warehouse_name)?;
        f.write_str(":")?;
        write_escaped(f, &self.acceptance_type)?;
        write!(f, ":{}", self.date)
    }
}
