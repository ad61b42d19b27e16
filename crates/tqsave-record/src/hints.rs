//! Type hints consulted while decoding.

use std::collections::HashMap;

use crate::DataType;

/// Supplies the declared data type of known field names.
///
/// Codecs consult hints only to pick a type; fields without a hint are still
/// decoded, so hints are an interpretation layer and never a requirement.
pub trait TypeHints {
    /// Declared data type of `name`, if known.
    fn data_type(&self, name: &str) -> Option<DataType>;
}

/// Hints that know no field.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHints;

impl TypeHints for NoHints {
    fn data_type(&self, _name: &str) -> Option<DataType> {
        None
    }
}

impl TypeHints for HashMap<String, DataType> {
    fn data_type(&self, name: &str) -> Option<DataType> {
        self.get(name).copied()
    }
}

impl<T: TypeHints + ?Sized> TypeHints for &T {
    fn data_type(&self, name: &str) -> Option<DataType> {
        (**self).data_type(name)
    }
}
