//! Field definition model supplied by the configuration collaborator.
//!
//! Definitions are created at configuration load and only borrowed by
//! [`RecordMapper`](crate::mapper::RecordMapper) during construction;
//! validation of expression syntax and type names happens there.

/// Where a field's raw bytes are taken from within a matched cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueSource {
    /// The cell's stored value bytes.
    CellValue,
    /// The cell's qualifier bytes, indexing the qualifier names themselves.
    Qualifier,
}

/// Declares one target index field: name, value-source expression, value
/// source, and type name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDefinition {
    /// Name of the field in the index document.
    pub name: String,
    /// Expression addressing the cell(s) the field is built from, of the
    /// form `family:qualifier`, `family:prefix*`, `family:*`, or `family`.
    pub value_expression: String,
    /// Which bytes of a matched cell become the field's raw value.
    pub value_source: ValueSource,
    /// Registered name of the value type, e.g. `string` or `long`.
    pub type_name: String,
}

impl FieldDefinition {
    /// Create a field definition.
    pub fn new(
        name: String,
        value_expression: String,
        value_source: ValueSource,
        type_name: String,
    ) -> Self {
        Self {
            name,
            value_expression,
            value_source,
            type_name,
        }
    }
}
