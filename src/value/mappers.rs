//! Built-in byte-to-value mappers and the registry that names them.
//!
//! Byte layouts follow the storage conventions the records were written
//! with: big-endian fixed-width numerics, UTF-8 strings, single-byte
//! booleans, dates as 8-byte big-endian milliseconds since the epoch.

use std::{collections::HashMap, mem::size_of, sync::Arc};

use super::{DataType, DecodeError, Value};

/// Converts raw stored bytes into one typed [`Value`].
///
/// Mappers are stateless pure functions; one instance per distinct type
/// name is shared across every transformer that uses the type.
pub trait ValueMapper: Send + Sync {
    /// The type this mapper produces.
    fn data_type(&self) -> DataType;

    /// Decode one raw byte slice. Pure and deterministic; malformed input
    /// is a [`DecodeError`], never a panic.
    fn map(&self, raw: &[u8]) -> Result<Value, DecodeError>;
}

macro_rules! impl_num_mapper {
    ($name:ident, $t:ty, $variant:ident, $dt:expr) => {
        /// Fixed-width big-endian decoder.
        #[derive(Clone, Copy, Debug, Default)]
        pub struct $name;

        impl ValueMapper for $name {
            fn data_type(&self) -> DataType {
                $dt
            }

            fn map(&self, raw: &[u8]) -> Result<Value, DecodeError> {
                let bytes: [u8; size_of::<$t>()] =
                    raw.try_into().map_err(|_| DecodeError::WrongLength {
                        data_type: $dt,
                        expected: size_of::<$t>(),
                        actual: raw.len(),
                    })?;
                Ok(Value::$variant(<$t>::from_be_bytes(bytes)))
            }
        }
    };
}

impl_num_mapper!(ShortMapper, i16, Int16, DataType::Int16);
impl_num_mapper!(IntMapper, i32, Int32, DataType::Int32);
impl_num_mapper!(LongMapper, i64, Int64, DataType::Int64);
impl_num_mapper!(FloatMapper, f32, Float32, DataType::Float32);
impl_num_mapper!(DoubleMapper, f64, Float64, DataType::Float64);

/// UTF-8 string decoder.
#[derive(Clone, Copy, Debug, Default)]
pub struct StringMapper;

impl ValueMapper for StringMapper {
    fn data_type(&self) -> DataType {
        DataType::String
    }

    fn map(&self, raw: &[u8]) -> Result<Value, DecodeError> {
        Ok(Value::String(std::str::from_utf8(raw)?.to_owned()))
    }
}

/// Single-byte boolean decoder: zero is false, any other byte is true.
#[derive(Clone, Copy, Debug, Default)]
pub struct BooleanMapper;

impl ValueMapper for BooleanMapper {
    fn data_type(&self) -> DataType {
        DataType::Boolean
    }

    fn map(&self, raw: &[u8]) -> Result<Value, DecodeError> {
        match raw {
            [byte] => Ok(Value::Boolean(*byte != 0)),
            _ => Err(DecodeError::WrongLength {
                data_type: DataType::Boolean,
                expected: 1,
                actual: raw.len(),
            }),
        }
    }
}

/// Date decoder: 8-byte big-endian milliseconds since the Unix epoch.
#[derive(Clone, Copy, Debug, Default)]
pub struct DateMapper;

impl ValueMapper for DateMapper {
    fn data_type(&self) -> DataType {
        DataType::Date64
    }

    fn map(&self, raw: &[u8]) -> Result<Value, DecodeError> {
        let bytes: [u8; 8] = raw.try_into().map_err(|_| DecodeError::WrongLength {
            data_type: DataType::Date64,
            expected: 8,
            actual: raw.len(),
        })?;
        Ok(Value::Date64(i64::from_be_bytes(bytes)))
    }
}

/// Passthrough decoder for opaque binary fields.
#[derive(Clone, Copy, Debug, Default)]
pub struct BinaryMapper;

impl ValueMapper for BinaryMapper {
    fn data_type(&self) -> DataType {
        DataType::Binary
    }

    fn map(&self, raw: &[u8]) -> Result<Value, DecodeError> {
        Ok(Value::Binary(raw.to_vec()))
    }
}

/// Explicit mapping from configured type names to shared mapper instances.
///
/// Built once at process start and passed into
/// [`RecordMapper::new`](crate::mapper::RecordMapper::new); an unknown type
/// name fails mapper construction, before any record is handled.
pub struct MapperRegistry {
    mappers: HashMap<String, Arc<dyn ValueMapper>>,
}

impl MapperRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self {
            mappers: HashMap::new(),
        }
    }

    /// Registry with every built-in type name registered: `string`,
    /// `integer` (alias `int`), `long`, `short`, `float`, `double`,
    /// `boolean`, `date`, `binary`.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register("string", Arc::new(StringMapper));
        let int_mapper: Arc<dyn ValueMapper> = Arc::new(IntMapper);
        registry.register("integer", Arc::clone(&int_mapper));
        registry.register("int", int_mapper);
        registry.register("long", Arc::new(LongMapper));
        registry.register("short", Arc::new(ShortMapper));
        registry.register("float", Arc::new(FloatMapper));
        registry.register("double", Arc::new(DoubleMapper));
        registry.register("boolean", Arc::new(BooleanMapper));
        registry.register("date", Arc::new(DateMapper));
        registry.register("binary", Arc::new(BinaryMapper));
        registry
    }

    /// Register `mapper` under `name`, replacing any previous entry.
    pub fn register(&mut self, name: impl Into<String>, mapper: Arc<dyn ValueMapper>) {
        self.mappers.insert(name.into(), mapper);
    }

    /// Look up the mapper for a configured type name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn ValueMapper>> {
        self.mappers.get(name).map(Arc::clone)
    }
}

impl Default for MapperRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
