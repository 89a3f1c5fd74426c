//! The unit of ingestion

use crate::coefficient::Coefficient;
use crate::date::CalendarDate;
use crate::errors::ValidationError;
use crate::key::CalendarKey;
use serde::{Deserialize, Serialize};

/// One validated coefficient submission for a calendar slot.
///
/// Rows built from an entry are immutable once persisted; a changed
/// coefficient produces a new entry rather than an update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEntry {
    pub warehouse_name: String,
    pub acceptance_type: String,
    pub date: CalendarDate,
    pub coefficient: Coefficient,
}

impl CalendarEntry {
    /// Validate raw submission fields.
    pub fn new(
        warehouse_name: impl Into<String>,
        acceptance_type: impl Into<String>,
        date: CalendarDate,
        coefficient: f64,
    ) -> Result<Self, ValidationError> {
        let warehouse_name = non_empty("warehouse_name", warehouse_name.into())?;
        let acceptance_type = non_empty("acceptance_type", acceptance_type.into())?;
        let coefficient = Coefficient::new(coefficient)?;
        Ok(Self {
            warehouse_name,
            acceptance_type,
            date,
            coefficient,
        })
    }

    pub fn key(&self) -> CalendarKey {
        CalendarKey::new(
            self.warehouse_name.clone(),
            self.acceptance_type.clone(),
            self.date,
        )
    }
}

fn non_empty(field: &'static str, value: String) -> Result<String, ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::EmptyIdentifier { field })
    } else {
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> CalendarDate {
        CalendarDate::parse("2024-01-01").unwrap()
    }

    #[test]
    fn test_valid_entry() {
        let entry = CalendarEntry::new("Warehouse1", "TypeA", day(), 1.23).unwrap();
        assert_eq!(entry.key().canonical(), "Warehouse1:TypeA:2024-01-01");
        assert_eq!(entry.coefficient.canonical(), "1.23");
    }

    #[test]
    fn test_rejects_blank_identifiers() {
        assert_eq!(
            CalendarEntry::new("", "TypeA", day(), 1.0),
            Err(ValidationError::EmptyIdentifier {
                field: "warehouse_name"
            })
        );
        assert_eq!(
            CalendarEntry::new("Warehouse1", "   ", day(), 1.0),
            Err(ValidationError::EmptyIdentifier {
                field: "acceptance_type"
            })
        );
    }

    #[test]
    fn test_identifiers_kept_verbatim() {
        let entry = CalendarEntry::new(" Warehouse1 ", "TypeA", day(), 1.0).unwrap();
        assert_eq!(entry.warehouse_name, " Warehouse1 ");
    }

    #[test]
    fn test_rejects_nan() {
        assert!(matches!(
            CalendarEntry::new("Warehouse1", "TypeA", day(), f64::NAN),
            Err(ValidationError::NonFiniteCoefficient { .. })
        ));
    }
}
