//! Configuration-driven mapping from stored row cells to typed
//! search-index documents.
//!
//! The entry point is [`RecordMapper`]: built once from an ordered list of
//! [`FieldDefinition`]s, then shared read-only across workers on the hot
//! path. `parse`/`map` turn one record into indexable field values,
//! `is_relevant` lets a change-capture pipeline skip mutations that cannot
//! affect the document, and `fetch_descriptor` is the minimal column set
//! the storage layer has to retrieve.

pub mod conf;
pub mod extract;
pub mod mapper;
pub mod record;
pub mod transform;
pub mod value;

pub(crate) mod logging;

pub use crate::{
    conf::{FieldDefinition, ValueSource},
    mapper::{ConfigError, Document, FetchDescriptor, ParsedValues, RecordMapper},
    record::{Cell, CellRef, Record},
    value::{DataType, DecodeError, MapperRegistry, Value, ValueMapper},
};
