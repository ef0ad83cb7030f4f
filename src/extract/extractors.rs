//! Concrete extractors, one per value source.

use super::{CellExtractor, ColumnAddress};
use crate::record::Record;

/// Yields the stored value bytes of every cell the address matches.
#[derive(Debug, Clone)]
pub struct CellValueExtractor {
    address: ColumnAddress,
}

impl CellValueExtractor {
    /// Create an extractor for `address`.
    pub fn new(address: ColumnAddress) -> Self {
        Self { address }
    }
}

impl CellExtractor for CellValueExtractor {
    fn address(&self) -> &ColumnAddress {
        &self.address
    }

    fn extract<'r>(&self, record: &'r Record) -> Vec<&'r [u8]> {
        match &self.address {
            ColumnAddress::Column { family, qualifier } => {
                record.value(family, qualifier).into_iter().collect()
            }
            ColumnAddress::Family { family } => {
                record.family(family).map(|(_, value)| value).collect()
            }
            ColumnAddress::QualifierPrefix { family, prefix } => record
                .family(family)
                .filter(|(qualifier, _)| qualifier.starts_with(prefix))
                .map(|(_, value)| value)
                .collect(),
        }
    }
}

/// Yields the qualifier bytes of every cell the address matches, indexing
/// the qualifier names themselves rather than the stored values.
#[derive(Debug, Clone)]
pub struct QualifierExtractor {
    address: ColumnAddress,
}

impl QualifierExtractor {
    /// Create an extractor for `address`.
    pub fn new(address: ColumnAddress) -> Self {
        Self { address }
    }
}

impl CellExtractor for QualifierExtractor {
    fn address(&self) -> &ColumnAddress {
        &self.address
    }

    fn extract<'r>(&self, record: &'r Record) -> Vec<&'r [u8]> {
        match &self.address {
            ColumnAddress::Column { family, qualifier } => record
                .family(family)
                .filter(|(own_qualifier, _)| *own_qualifier == qualifier.as_slice())
                .map(|(qualifier, _)| qualifier)
                .collect(),
            ColumnAddress::Family { family } => record
                .family(family)
                .map(|(qualifier, _)| qualifier)
                .collect(),
            ColumnAddress::QualifierPrefix { family, prefix } => record
                .family(family)
                .filter(|(qualifier, _)| qualifier.starts_with(prefix))
                .map(|(qualifier, _)| qualifier)
                .collect(),
        }
    }
}
