//! Typed field values and the byte decoders that produce them.

mod mappers;

pub use mappers::{
    BinaryMapper, BooleanMapper, DateMapper, DoubleMapper, FloatMapper, IntMapper, LongMapper,
    MapperRegistry, ShortMapper, StringMapper, ValueMapper,
};
use thiserror::Error;

/// Logical type of a decoded field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    /// Single-byte boolean.
    Boolean,
    /// 16-bit signed integer.
    Int16,
    /// 32-bit signed integer.
    Int32,
    /// 64-bit signed integer.
    Int64,
    /// 32-bit float.
    Float32,
    /// 64-bit float.
    Float64,
    /// UTF-8 string.
    String,
    /// Raw bytes, passed through unchanged.
    Binary,
    /// Date as milliseconds since the Unix epoch.
    Date64,
}

/// Error decoding raw stored bytes into a typed value.
///
/// Recoverable: isolated to the single value being decoded, never fatal to
/// the record.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The raw slice does not have the fixed width the type requires.
    #[error("expected {expected} bytes for {data_type:?} value, got {actual}")]
    WrongLength {
        /// Type being decoded.
        data_type: DataType,
        /// Required byte width.
        expected: usize,
        /// Actual slice length.
        actual: usize,
    },
    /// The raw slice is not valid UTF-8.
    #[error("invalid utf-8 in string value: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),
}

/// A decoded field value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Boolean value.
    Boolean(bool),
    /// 16-bit signed integer.
    Int16(i16),
    /// 32-bit signed integer.
    Int32(i32),
    /// 64-bit signed integer.
    Int64(i64),
    /// 32-bit float.
    Float32(f32),
    /// 64-bit float.
    Float64(f64),
    /// UTF-8 string.
    String(String),
    /// Raw bytes.
    Binary(Vec<u8>),
    /// Date as milliseconds since the Unix epoch.
    Date64(i64),
}

impl Value {
    /// Logical type of this value.
    pub fn data_type(&self) -> DataType {
        match self {
            Value::Boolean(_) => DataType::Boolean,
            Value::Int16(_) => DataType::Int16,
            Value::Int32(_) => DataType::Int32,
            Value::Int64(_) => DataType::Int64,
            Value::Float32(_) => DataType::Float32,
            Value::Float64(_) => DataType::Float64,
            Value::String(_) => DataType::String,
            Value::Binary(_) => DataType::Binary,
            Value::Date64(_) => DataType::Date64,
        }
    }
}
