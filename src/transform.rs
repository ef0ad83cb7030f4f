//! Binds one extractor to one value mapper for a single index field.

use std::sync::Arc;

use crate::{
    extract::CellExtractor,
    logging::rowdex_log,
    mapper::ParsedValues,
    record::Record,
    value::ValueMapper,
};

/// Produces zero or more typed values for one named index field.
///
/// Owned exclusively by [`RecordMapper`](crate::mapper::RecordMapper);
/// immutable after construction.
pub struct IndexValueTransformer {
    field_name: String,
    extractor: Box<dyn CellExtractor>,
    mapper: Arc<dyn ValueMapper>,
}

impl IndexValueTransformer {
    /// Pair a field name with its extractor and value mapper.
    pub fn new(
        field_name: String,
        extractor: Box<dyn CellExtractor>,
        mapper: Arc<dyn ValueMapper>,
    ) -> Self {
        Self {
            field_name,
            extractor,
            mapper,
        }
    }

    /// Name of the index field this transformer fills.
    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    /// The extractor bound to this field, for cell relevance tests.
    pub fn extractor(&self) -> &dyn CellExtractor {
        self.extractor.as_ref()
    }

    /// Extract and decode this field's values from `record`, appending to
    /// `out` in cell order.
    ///
    /// A value that fails to decode is logged and skipped; remaining values
    /// of this field and every other field are unaffected.
    pub fn extract_and_transform(&self, record: &Record, out: &mut ParsedValues) {
        for raw in self.extractor.extract(record) {
            match self.mapper.map(raw) {
                Ok(value) => out.push(self.field_name.clone(), value),
                Err(err) => {
                    rowdex_log!(
                        log::Level::Warn,
                        "value_decode_failed",
                        "field={} raw_len={} error={}",
                        self.field_name,
                        raw.len(),
                        err,
                    );
                }
            }
        }
    }
}
