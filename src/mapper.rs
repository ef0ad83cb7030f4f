//! Top-level orchestration: one [`RecordMapper`] per configuration load.

use std::collections::{btree_map, BTreeMap, BTreeSet};

use thiserror::Error;

use crate::{
    conf::FieldDefinition,
    extract::{self, ColumnAddress, ExpressionError},
    record::{CellRef, Record},
    transform::IndexValueTransformer,
    value::{MapperRegistry, Value},
};

/// Fatal configuration failure surfaced at mapper construction, before any
/// record traffic begins.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A field's value-source expression does not parse.
    #[error("invalid value expression for field {field:?}: {source}")]
    InvalidExpression {
        /// Name of the offending field definition.
        field: String,
        /// Underlying parse failure.
        #[source]
        source: ExpressionError,
    },
    /// A field names a type the registry does not know.
    #[error("unknown type {type_name:?} for field {field:?}")]
    UnknownType {
        /// Name of the offending field definition.
        field: String,
        /// The unregistered type name.
        type_name: String,
    },
}

/// Ordered typed values per field name, as produced by
/// [`RecordMapper::parse`].
///
/// Values within a field keep transformer evaluation order; a field with no
/// matching cells has no entry at all.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedValues {
    fields: BTreeMap<String, Vec<Value>>,
}

impl ParsedValues {
    /// Empty result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one value to `field`, creating the field on first use.
    pub fn push(&mut self, field: String, value: Value) {
        self.fields.entry(field).or_default().push(value);
    }

    /// Values collected for `field`, in evaluation order.
    pub fn values(&self, field: &str) -> Option<&[Value]> {
        self.fields.get(field).map(Vec::as_slice)
    }

    /// Iterate fields and their value sequences.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Value])> {
        self.fields
            .iter()
            .map(|(field, values)| (field.as_str(), values.as_slice()))
    }

    /// Number of fields with at least one value.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True iff no field collected any value.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl IntoIterator for ParsedValues {
    type Item = (String, Vec<Value>);
    type IntoIter = btree_map::IntoIter<String, Vec<Value>>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

/// Field occurrences handed to the search-index client.
///
/// Every (field, value) pair is one occurrence; a multi-valued field simply
/// repeats its name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    fields: Vec<(String, Value)>,
}

impl Document {
    /// Empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one field occurrence.
    pub fn add_field(&mut self, name: impl Into<String>, value: Value) {
        self.fields.push((name.into(), value));
    }

    /// All field occurrences, in insertion order.
    pub fn fields(&self) -> &[(String, Value)] {
        &self.fields
    }

    /// Number of field occurrences.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True iff the document holds no field occurrences.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Minimal column set sufficient to answer every configured extraction.
///
/// Whole families and exact columns are kept separately; a whole family
/// absorbs exact columns under it, so the set never fetches a column twice.
/// Prefix-addressed fields contribute their whole family and are narrowed
/// at extraction time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchDescriptor {
    families: BTreeSet<Vec<u8>>,
    columns: BTreeSet<(Vec<u8>, Vec<u8>)>,
}

impl FetchDescriptor {
    fn add_address(&mut self, address: &ColumnAddress) {
        match address {
            ColumnAddress::Column { family, qualifier } => {
                if !self.families.contains(family) {
                    self.columns.insert((family.clone(), qualifier.clone()));
                }
            }
            ColumnAddress::Family { family }
            | ColumnAddress::QualifierPrefix { family, .. } => {
                self.families.insert(family.clone());
                self.columns.retain(|(column_family, _)| column_family != family);
            }
        }
    }

    /// Families fetched in full.
    pub fn families(&self) -> impl Iterator<Item = &[u8]> {
        self.families.iter().map(Vec::as_slice)
    }

    /// Exact (family, qualifier) columns fetched individually.
    pub fn columns(&self) -> impl Iterator<Item = (&[u8], &[u8])> {
        self.columns
            .iter()
            .map(|(family, qualifier)| (family.as_slice(), qualifier.as_slice()))
    }

    /// True iff fetching this descriptor retrieves (family, qualifier).
    pub fn covers(&self, family: &[u8], qualifier: &[u8]) -> bool {
        self.families.contains(family)
            || self
                .columns
                .iter()
                .any(|(column_family, column_qualifier)| {
                    column_family.as_slice() == family && column_qualifier.as_slice() == qualifier
                })
    }

    /// True iff no column is addressed at all.
    pub fn is_empty(&self) -> bool {
        self.families.is_empty() && self.columns.is_empty()
    }
}

/// Maps stored records into index documents according to an ordered list of
/// field definitions.
///
/// Construction is the only place expensive setup happens; afterwards the
/// mapper is immutable and safe for unsynchronized concurrent use. All
/// per-record operations are pure, synchronous, and bounded by the size of
/// one record.
pub struct RecordMapper {
    transformers: Vec<IndexValueTransformer>,
    fetch_descriptor: FetchDescriptor,
}

impl std::fmt::Debug for RecordMapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordMapper")
            .field("fields", &self.transformers.len())
            .field("fetch_descriptor", &self.fetch_descriptor)
            .finish()
    }
}

impl RecordMapper {
    /// Build a mapper from `definitions`, resolving one extractor, value
    /// mapper, and transformer per definition in input order.
    ///
    /// Fails as a whole on the first unparsable expression or unknown type
    /// name; a partially constructed mapper is never observable.
    pub fn new(
        definitions: &[FieldDefinition],
        registry: &MapperRegistry,
    ) -> Result<Self, ConfigError> {
        let mut transformers = Vec::with_capacity(definitions.len());
        let mut fetch_descriptor = FetchDescriptor::default();
        for definition in definitions {
            let extractor =
                extract::for_definition(definition).map_err(|source| {
                    ConfigError::InvalidExpression {
                        field: definition.name.clone(),
                        source,
                    }
                })?;
            let mapper =
                registry
                    .get(&definition.type_name)
                    .ok_or_else(|| ConfigError::UnknownType {
                        field: definition.name.clone(),
                        type_name: definition.type_name.clone(),
                    })?;
            fetch_descriptor.add_address(extractor.address());
            transformers.push(IndexValueTransformer::new(
                definition.name.clone(),
                extractor,
                mapper,
            ));
        }
        Ok(Self {
            transformers,
            fetch_descriptor,
        })
    }

    /// Run every transformer over `record` and merge their outputs.
    ///
    /// Field name collisions across transformers append to the same field.
    pub fn parse(&self, record: &Record) -> ParsedValues {
        let mut parsed = ParsedValues::new();
        for transformer in &self.transformers {
            transformer.extract_and_transform(record, &mut parsed);
        }
        parsed
    }

    /// Parse `record` and flatten into an index document with one occurrence
    /// per (field, value) pair.
    pub fn map(&self, record: &Record) -> Document {
        let mut document = Document::new();
        for (field, values) in self.parse(record) {
            for value in values {
                document.add_field(field.clone(), value);
            }
        }
        document
    }

    /// True iff a mutation of `cell` could affect the indexed document.
    ///
    /// Short-circuits on the first applicable extractor; no record fetch,
    /// no allocation.
    pub fn is_relevant(&self, cell: CellRef<'_>) -> bool {
        self.transformers
            .iter()
            .any(|transformer| transformer.extractor().is_applicable(cell))
    }

    /// Precomputed column set the storage layer has to fetch for any row.
    ///
    /// The row key is accepted for interface symmetry with row-dependent
    /// fetch strategies; it does not vary the result.
    pub fn fetch_descriptor(&self, _row: &[u8]) -> &FetchDescriptor {
        &self.fetch_descriptor
    }
}
