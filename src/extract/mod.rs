//! Locating the raw byte values for a field inside a record.
//!
//! A value-source expression addresses either one exact cell, every
//! qualifier under a family, or every qualifier starting with a prefix.
//! The parsed [`ColumnAddress`] drives extraction, cell relevance tests,
//! and the fetch-descriptor union.

mod extractors;

pub use extractors::{CellValueExtractor, QualifierExtractor};
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::{
    conf::{FieldDefinition, ValueSource},
    record::{CellRef, Record},
};

/// `family`, optionally followed by `:` and a qualifier part.
static EXPRESSION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([^:]+)(?::([^:]*))?$").expect("valid expression pattern"));

/// Failure parsing a value-source expression.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExpressionError {
    /// Not of the form `family`, `family:qualifier`, `family:prefix*` or
    /// `family:*`.
    #[error("malformed value expression {0:?}")]
    Malformed(String),
    /// A `:` is present but the qualifier part is empty.
    #[error("empty qualifier in value expression {0:?}")]
    EmptyQualifier(String),
}

/// Column coordinates addressed by one extractor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnAddress {
    /// One exact (family, qualifier) cell.
    Column {
        /// Column family.
        family: Vec<u8>,
        /// Column qualifier.
        qualifier: Vec<u8>,
    },
    /// Every qualifier under one family.
    Family {
        /// Column family.
        family: Vec<u8>,
    },
    /// Every qualifier under one family starting with a prefix.
    QualifierPrefix {
        /// Column family.
        family: Vec<u8>,
        /// Qualifier prefix.
        prefix: Vec<u8>,
    },
}

impl ColumnAddress {
    /// Parse a value-source expression.
    ///
    /// `family:qualifier` addresses one cell, `family:*` and bare `family`
    /// a whole family, and `family:prefix*` every qualifier with the
    /// prefix. A trailing `*` is the only wildcard position.
    pub fn parse(expression: &str) -> Result<Self, ExpressionError> {
        let captures = EXPRESSION
            .captures(expression)
            .ok_or_else(|| ExpressionError::Malformed(expression.to_owned()))?;
        let family = captures[1].as_bytes().to_vec();
        match captures.get(2).map(|qualifier| qualifier.as_str()) {
            None | Some("*") => Ok(ColumnAddress::Family { family }),
            Some("") => Err(ExpressionError::EmptyQualifier(expression.to_owned())),
            Some(qualifier) => {
                if let Some(prefix) = qualifier.strip_suffix('*') {
                    Ok(ColumnAddress::QualifierPrefix {
                        family,
                        prefix: prefix.as_bytes().to_vec(),
                    })
                } else {
                    Ok(ColumnAddress::Column {
                        family,
                        qualifier: qualifier.as_bytes().to_vec(),
                    })
                }
            }
        }
    }

    /// Family this address lives under.
    pub fn family(&self) -> &[u8] {
        match self {
            ColumnAddress::Column { family, .. }
            | ColumnAddress::Family { family }
            | ColumnAddress::QualifierPrefix { family, .. } => family,
        }
    }

    /// True iff a cell at (family, qualifier) falls under this address.
    pub fn matches(&self, family: &[u8], qualifier: &[u8]) -> bool {
        match self {
            ColumnAddress::Column {
                family: own_family,
                qualifier: own_qualifier,
            } => own_family.as_slice() == family && own_qualifier.as_slice() == qualifier,
            ColumnAddress::Family { family: own_family } => own_family.as_slice() == family,
            ColumnAddress::QualifierPrefix {
                family: own_family,
                prefix,
            } => own_family.as_slice() == family && qualifier.starts_with(prefix),
        }
    }
}

/// Locates raw byte values for one field inside a record and tests whether
/// a changed cell is applicable to that field.
///
/// Extractors are immutable once constructed and never mutate the record.
pub trait CellExtractor: Send + Sync {
    /// The column coordinates this extractor addresses.
    fn address(&self) -> &ColumnAddress;

    /// Collect the raw byte slices for this field, in record cell order.
    /// Empty if no cell matches; several if a wildcard matches several
    /// qualifiers.
    fn extract<'r>(&self, record: &'r Record) -> Vec<&'r [u8]>;

    /// True iff a mutation of `cell` could change this field's extraction.
    fn is_applicable(&self, cell: CellRef<'_>) -> bool {
        self.address().matches(cell.family, cell.qualifier)
    }
}

/// Build the extractor for one field definition.
///
/// Fails iff the definition's value expression does not parse.
pub fn for_definition(
    definition: &FieldDefinition,
) -> Result<Box<dyn CellExtractor>, ExpressionError> {
    let address = ColumnAddress::parse(&definition.value_expression)?;
    Ok(match definition.value_source {
        ValueSource::CellValue => Box::new(CellValueExtractor::new(address)),
        ValueSource::Qualifier => Box::new(QualifierExtractor::new(address)),
    })
}
