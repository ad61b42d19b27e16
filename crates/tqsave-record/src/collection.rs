//! Ordered record collections.

use crate::{Error, RecordId, Result, Variable};

/// Key that opens a nested block in the binary form.
pub const BEGIN_BLOCK: &str = "begin_block";

/// Key that closes a nested block in the binary form.
pub const END_BLOCK: &str = "end_block";

/// Value stored under [`BEGIN_BLOCK`].
pub const BEGIN_BLOCK_MAGIC: i32 = 0xB01D_FACEu32 as i32;

/// Value stored under [`END_BLOCK`].
pub const END_BLOCK_MAGIC: i32 = 0xDEAD_C0DEu32 as i32;

/// One record: an identifier and an ordered sequence of variables.
///
/// Order is part of the on-disk contract. Duplicate names are allowed and
/// kept; lookups by name return the first match.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RecordCollection {
    id: RecordId,
    variables: Vec<Variable>,
}

impl RecordCollection {
    /// Create an empty collection.
    pub fn new(id: impl Into<RecordId>) -> Self {
        Self {
            id: id.into(),
            variables: Vec::new(),
        }
    }

    /// Create a collection from variables, in order.
    pub fn with_variables(id: impl Into<RecordId>, variables: Vec<Variable>) -> Self {
        Self {
            id: id.into(),
            variables,
        }
    }

    /// Record identifier.
    pub fn id(&self) -> &RecordId {
        &self.id
    }

    /// Replace the identifier.
    pub fn set_id(&mut self, id: impl Into<RecordId>) {
        self.id = id.into();
    }

    /// Number of variables.
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    /// Check whether the collection has no variables.
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Append a variable.
    pub fn push(&mut self, variable: Variable) {
        self.variables.push(variable);
    }

    /// Insert a variable at `index`.
    pub fn insert(&mut self, index: usize, variable: Variable) -> Result<()> {
        if index > self.variables.len() {
            return Err(Error::IndexOutOfRange {
                name: variable.name().to_string(),
                index,
                count: self.variables.len(),
            });
        }
        self.variables.insert(index, variable);
        Ok(())
    }

    /// Remove and return the variable at `index`.
    pub fn remove(&mut self, index: usize) -> Option<Variable> {
        (index < self.variables.len()).then(|| self.variables.remove(index))
    }

    /// Variables in order.
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    /// Iterate over the variables in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Variable> {
        self.variables.iter()
    }

    /// Iterate mutably over the variables in order.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Variable> {
        self.variables.iter_mut()
    }

    /// First variable named `name`.
    pub fn get(&self, name: &str) -> Option<&Variable> {
        self.variables.iter().find(|v| v.name() == name)
    }

    /// First variable named `name`, mutably.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Variable> {
        self.variables.iter_mut().find(|v| v.name() == name)
    }

    /// Every variable named `name`, in order.
    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Variable> + 'a {
        self.variables.iter().filter(move |v| v.name() == name)
    }

    /// Index of the first variable named `name`.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.variables.iter().position(|v| v.name() == name)
    }

    /// Number of variables named `name`.
    pub fn count(&self, name: &str) -> usize {
        self.get_all(name).count()
    }

    /// Check that block markers nest and return the deepest nesting level.
    ///
    /// Only the marker names are considered; their values are not checked.
    pub fn check_blocks(&self) -> Result<usize> {
        let mut open = Vec::new();
        let mut max_depth = 0usize;

        for (index, variable) in self.variables.iter().enumerate() {
            match variable.name() {
                BEGIN_BLOCK => {
                    open.push(index);
                    max_depth = max_depth.max(open.len());
                }
                END_BLOCK => {
                    open.pop().ok_or(Error::UnbalancedBlock { index })?;
                }
                _ => {}
            }
        }

        match open.pop() {
            None => Ok(max_depth),
            Some(index) => Err(Error::UnbalancedBlock { index }),
        }
    }
}

impl<'a> IntoIterator for &'a RecordCollection {
    type Item = &'a Variable;
    type IntoIter = std::slice::Iter<'a, Variable>;

    fn into_iter(self) -> Self::IntoIter {
        self.variables.iter()
    }
}

impl IntoIterator for RecordCollection {
    type Item = Variable;
    type IntoIter = std::vec::IntoIter<Variable>;

    fn into_iter(self) -> Self::IntoIter {
        self.variables.into_iter()
    }
}
