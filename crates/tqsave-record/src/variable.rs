//! Named, typed record fields.

use std::fmt;

use tqsave_common::UniqueId;

use crate::{DataType, Error, Result, Value};

/// One named, typed field of a record.
///
/// A variable holds one or more values, all of its data type. The data type
/// is fixed at construction; typed accessors and setters check it and never
/// coerce.
///
/// `Display` renders the text line written by the text codec:
///
/// ```
/// use tqsave_record::Variable;
///
/// let var = Variable::integers("skillLevel", [3, 1, 4]).unwrap();
/// assert_eq!(var.to_string(), "skillLevel,3;1;4,");
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Variable {
    name: String,
    data_type: DataType,
    values: Vec<Value>,
}

impl Variable {
    /// Create a variable, checking that it holds at least one value and that
    /// every value is of `data_type`.
    pub fn new(name: impl Into<String>, data_type: DataType, values: Vec<Value>) -> Result<Self> {
        let name = name.into();
        check_values(&name, data_type, &values)?;
        Ok(Self {
            name,
            data_type,
            values,
        })
    }

    /// Create a scalar variable; the data type is taken from the value.
    pub fn scalar(name: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            data_type: value.data_type(),
            values: vec![value],
        }
    }

    /// Create an integer variable.
    pub fn integer(name: impl Into<String>, value: i32) -> Self {
        Self::scalar(name, Value::Integer(value))
    }

    /// Create an integer array variable.
    pub fn integers(name: impl Into<String>, values: impl IntoIterator<Item = i32>) -> Result<Self> {
        let values = values.into_iter().map(Value::Integer).collect();
        Self::new(name, DataType::Integer, values)
    }

    /// Create a float variable.
    pub fn float(name: impl Into<String>, value: f32) -> Self {
        Self::scalar(name, Value::Float(value))
    }

    /// Create a float array variable.
    pub fn floats(name: impl Into<String>, values: impl IntoIterator<Item = f32>) -> Result<Self> {
        let values = values.into_iter().map(Value::Float).collect();
        Self::new(name, DataType::Float, values)
    }

    /// Create a single-byte string variable.
    pub fn string(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::scalar(name, Value::String(value.into()))
    }

    /// Create a UTF-16 string variable.
    pub fn wide_string(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::scalar(name, Value::WideString(value.into()))
    }

    /// Create a boolean variable.
    pub fn boolean(name: impl Into<String>, value: bool) -> Self {
        Self::scalar(name, Value::Boolean(value))
    }

    /// Create a unique id variable.
    pub fn unique_id(name: impl Into<String>, value: UniqueId) -> Self {
        Self::scalar(name, Value::UniqueId(value))
    }

    /// Create a binary blob variable.
    pub fn stream(name: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        Self::scalar(name, Value::Stream(value.into()))
    }

    /// Field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Data type of every value.
    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    /// Number of values held.
    pub fn number_of_values(&self) -> usize {
        self.values.len()
    }

    /// All values, in order.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Value at `index`.
    pub fn value(&self, index: usize) -> Result<&Value> {
        self.values.get(index).ok_or_else(|| Error::IndexOutOfRange {
            name: self.name.clone(),
            index,
            count: self.values.len(),
        })
    }

    /// Replace every value, keeping the data type.
    pub fn set_values(&mut self, values: Vec<Value>) -> Result<()> {
        check_values(&self.name, self.data_type, &values)?;
        self.values = values;
        Ok(())
    }

    /// Replace the value at `index`, keeping the data type.
    pub fn set_value(&mut self, index: usize, value: Value) -> Result<()> {
        self.expect_type(value.data_type())?;
        let count = self.values.len();
        let slot = self.values.get_mut(index).ok_or_else(|| Error::IndexOutOfRange {
            name: self.name.clone(),
            index,
            count,
        })?;
        *slot = value;
        Ok(())
    }

    /// Integer at `index`.
    pub fn get_i32(&self, index: usize) -> Result<i32> {
        self.expect_type(DataType::Integer)?;
        match self.value(index)? {
            Value::Integer(v) => Ok(*v),
            other => Err(self.mismatch(DataType::Integer, other)),
        }
    }

    /// Float at `index`.
    pub fn get_f32(&self, index: usize) -> Result<f32> {
        self.expect_type(DataType::Float)?;
        match self.value(index)? {
            Value::Float(v) => Ok(*v),
            other => Err(self.mismatch(DataType::Float, other)),
        }
    }

    /// Single-byte string at `index`.
    pub fn get_str(&self, index: usize) -> Result<&str> {
        self.expect_type(DataType::String)?;
        match self.value(index)? {
            Value::String(v) => Ok(v),
            other => Err(self.mismatch(DataType::String, other)),
        }
    }

    /// UTF-16 string at `index`.
    pub fn get_wide_str(&self, index: usize) -> Result<&str> {
        self.expect_type(DataType::WideString)?;
        match self.value(index)? {
            Value::WideString(v) => Ok(v),
            other => Err(self.mismatch(DataType::WideString, other)),
        }
    }

    /// Boolean at `index`.
    pub fn get_bool(&self, index: usize) -> Result<bool> {
        self.expect_type(DataType::Boolean)?;
        match self.value(index)? {
            Value::Boolean(v) => Ok(*v),
            other => Err(self.mismatch(DataType::Boolean, other)),
        }
    }

    /// Unique id at `index`.
    pub fn get_unique_id(&self, index: usize) -> Result<UniqueId> {
        self.expect_type(DataType::UniqueId)?;
        match self.value(index)? {
            Value::UniqueId(v) => Ok(*v),
            other => Err(self.mismatch(DataType::UniqueId, other)),
        }
    }

    /// Binary blob at `index`.
    pub fn get_stream(&self, index: usize) -> Result<&[u8]> {
        self.expect_type(DataType::Stream)?;
        match self.value(index)? {
            Value::Stream(v) => Ok(v),
            other => Err(self.mismatch(DataType::Stream, other)),
        }
    }

    /// Set the integer at `index`.
    pub fn set_i32(&mut self, index: usize, value: i32) -> Result<()> {
        self.set_value(index, Value::Integer(value))
    }

    /// Set the float at `index`.
    pub fn set_f32(&mut self, index: usize, value: f32) -> Result<()> {
        self.set_value(index, Value::Float(value))
    }

    /// Set the single-byte string at `index`.
    pub fn set_str(&mut self, index: usize, value: impl Into<String>) -> Result<()> {
        self.set_value(index, Value::String(value.into()))
    }

    /// Set the UTF-16 string at `index`.
    pub fn set_wide_str(&mut self, index: usize, value: impl Into<String>) -> Result<()> {
        self.set_value(index, Value::WideString(value.into()))
    }

    /// Set the boolean at `index`.
    pub fn set_bool(&mut self, index: usize, value: bool) -> Result<()> {
        self.set_value(index, Value::Boolean(value))
    }

    /// Set the value at `index` from its text form, parsed as this
    /// variable's data type.
    pub fn set_text(&mut self, index: usize, text: &str) -> Result<()> {
        let value = Value::parse_text(self.data_type, text).ok_or_else(|| Error::InvalidTextValue {
            name: self.name.clone(),
            data_type: self.data_type,
            value: text.to_string(),
        })?;
        self.set_value(index, value)
    }

    /// Check whether `other` is the same field: same name and data type.
    pub fn same_field(&self, other: &Variable) -> bool {
        self.name == other.name && self.data_type == other.data_type
    }

    /// Check whether `other` is the same field holding different values,
    /// i.e. a pending edit.
    pub fn differs_from(&self, other: &Variable) -> bool {
        self.same_field(other) && self.values != other.values
    }

    fn expect_type(&self, requested: DataType) -> Result<()> {
        if self.data_type != requested {
            return Err(Error::TypeMismatch {
                name: self.name.clone(),
                expected: requested,
                actual: self.data_type,
            });
        }
        Ok(())
    }

    fn mismatch(&self, expected: DataType, found: &Value) -> Error {
        Error::TypeMismatch {
            name: self.name.clone(),
            expected,
            actual: found.data_type(),
        }
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},", self.name)?;
        for (i, value) in self.values.iter().enumerate() {
            if i > 0 {
                f.write_str(";")?;
            }
            write!(f, "{}", value)?;
        }
        f.write_str(",")
    }
}

fn check_values(name: &str, data_type: DataType, values: &[Value]) -> Result<()> {
    if values.is_empty() {
        return Err(Error::EmptyVariable {
            name: name.to_string(),
        });
    }
    if let Some(bad) = values.iter().find(|v| v.data_type() != data_type) {
        return Err(Error::TypeMismatch {
            name: name.to_string(),
            expected: data_type,
            actual: bad.data_type(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_access() {
        let var = Variable::integer("playerLevel", 42);
        assert_eq!(var.get_i32(0).unwrap(), 42);
        assert_eq!(var.number_of_values(), 1);
    }

    #[test]
    fn test_type_mismatch_never_coerces() {
        let var = Variable::string("name", "7");
        assert!(matches!(
            var.get_i32(0),
            Err(Error::TypeMismatch {
                expected: DataType::Integer,
                actual: DataType::String,
                ..
            })
        ));
        assert!(var.get_wide_str(0).is_err());
    }

    #[test]
    fn test_index_out_of_range() {
        let var = Variable::integers("max", [1, 2]).unwrap();
        assert_eq!(var.get_i32(1).unwrap(), 2);
        assert!(matches!(
            var.get_i32(2),
            Err(Error::IndexOutOfRange { index: 2, count: 2, .. })
        ));
    }

    #[test]
    fn test_construction_checks() {
        assert!(matches!(
            Variable::new("empty", DataType::Integer, vec![]),
            Err(Error::EmptyVariable { .. })
        ));
        assert!(Variable::new(
            "mixed",
            DataType::Integer,
            vec![Value::Integer(1), Value::Float(1.0)]
        )
        .is_err());
    }

    #[test]
    fn test_setters_keep_type() {
        let mut var = Variable::integer("money", 10);
        var.set_i32(0, 5000).unwrap();
        assert_eq!(var.get_i32(0).unwrap(), 5000);
        assert!(var.set_f32(0, 1.0).is_err());
        assert!(var.set_i32(1, 1).is_err());
        assert_eq!(var.data_type(), DataType::Integer);

        var.set_text(0, "123").unwrap();
        assert_eq!(var.get_i32(0).unwrap(), 123);
        assert!(var.set_text(0, "abc").is_err());
    }

    #[test]
    fn test_display_line() {
        assert_eq!(Variable::string("itemName", "records\\a.dbr").to_string(), "itemName,records\\a.dbr,");
        assert_eq!(
            Variable::floats("scale", [1.0, 0.25]).unwrap().to_string(),
            "scale,1.000000;0.250000,"
        );
        assert_eq!(Variable::boolean("tempBool", true).to_string(), "tempBool,1,");
    }

    #[test]
    fn test_same_field_and_pending_edit() {
        let a = Variable::integer("money", 1);
        let b = Variable::integer("money", 2);
        let c = Variable::float("money", 1.0);
        assert!(a.same_field(&b));
        assert!(a.differs_from(&b));
        assert!(!a.same_field(&c));
        assert!(!a.differs_from(&a.clone()));
    }
}
