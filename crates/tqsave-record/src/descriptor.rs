//! Record key descriptors.
//!
//! A descriptor ties a well-known field, identified by a key enum, to its
//! on-disk name, its data type and the game editions it applies to. When a
//! field changed between editions the table carries one descriptor per
//! edition group, and resolution picks the most specific one.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use crate::{DataType, DescriptorError, GameVersion, TypeHints};

/// Metadata of one well-known field for a set of editions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordKeyDescriptor<K> {
    pub key: K,
    pub name: &'static str,
    pub data_type: DataType,
    pub version: GameVersion,
}

impl<K> RecordKeyDescriptor<K> {
    pub const fn new(key: K, name: &'static str, data_type: DataType, version: GameVersion) -> Self {
        Self {
            key,
            name,
            data_type,
            version,
        }
    }
}

/// An immutable, validated set of descriptors.
///
/// # Example
///
/// ```
/// use tqsave_record::{DataType, DescriptorTable, GameVersion, RecordKeyDescriptor};
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// enum Key { Money }
///
/// let table = DescriptorTable::new([
///     RecordKeyDescriptor::new(Key::Money, "money", DataType::Integer, GameVersion::ALL),
///     RecordKeyDescriptor::new(Key::Money, "money", DataType::Float, GameVersion::TQIT),
/// ])
/// .unwrap();
///
/// assert_eq!(table.resolve(Key::Money, GameVersion::TQIT).unwrap().data_type, DataType::Float);
/// assert_eq!(table.resolve(Key::Money, GameVersion::TQAE).unwrap().data_type, DataType::Integer);
/// ```
#[derive(Debug, Clone)]
pub struct DescriptorTable<K> {
    descriptors: Vec<RecordKeyDescriptor<K>>,
    by_key: HashMap<K, Vec<usize>>,
    by_name: HashMap<&'static str, Vec<usize>>,
}

impl<K> DescriptorTable<K>
where
    K: Copy + Eq + Hash + fmt::Debug,
{
    /// Build a table, rejecting descriptors with no edition and any key or
    /// name whose most specific match for some edition is not unique.
    pub fn new(
        descriptors: impl IntoIterator<Item = RecordKeyDescriptor<K>>,
    ) -> Result<Self, DescriptorError> {
        let descriptors: Vec<_> = descriptors.into_iter().collect();
        let mut by_key: HashMap<K, Vec<usize>> = HashMap::new();
        let mut by_name: HashMap<&'static str, Vec<usize>> = HashMap::new();

        for (index, descriptor) in descriptors.iter().enumerate() {
            if descriptor.version.is_empty() {
                return Err(DescriptorError::EmptyVersion {
                    name: descriptor.name.to_string(),
                });
            }
            by_key.entry(descriptor.key).or_default().push(index);
            by_name.entry(descriptor.name).or_default().push(index);
        }

        for (key, indices) in &by_key {
            check_group(&descriptors, indices, || format!("key {:?}", key))?;
        }
        for (name, indices) in &by_name {
            check_group(&descriptors, indices, || format!("field {:?}", name))?;
        }

        Ok(Self {
            descriptors,
            by_key,
            by_name,
        })
    }

    /// Most specific descriptor of `key` that covers `version`.
    pub fn resolve(&self, key: K, version: GameVersion) -> Option<&RecordKeyDescriptor<K>> {
        let indices = self.by_key.get(&key)?;
        most_specific(&self.descriptors, indices, version)
    }

    /// Most specific descriptor named `name` that covers `version`.
    pub fn resolve_name(&self, name: &str, version: GameVersion) -> Option<&RecordKeyDescriptor<K>> {
        let indices = self.by_name.get(name)?;
        most_specific(&self.descriptors, indices, version)
    }

    /// All descriptors in declaration order.
    pub fn descriptors(&self) -> &[RecordKeyDescriptor<K>] {
        &self.descriptors
    }

    /// Number of descriptors.
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Check whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Type hints for one edition.
    pub fn hints(&self, version: GameVersion) -> VersionHints<'_, K> {
        VersionHints {
            table: self,
            version,
        }
    }
}

/// A descriptor table viewed for one edition.
#[derive(Debug, Clone, Copy)]
pub struct VersionHints<'a, K> {
    table: &'a DescriptorTable<K>,
    version: GameVersion,
}

impl<K> TypeHints for VersionHints<'_, K>
where
    K: Copy + Eq + Hash + fmt::Debug,
{
    fn data_type(&self, name: &str) -> Option<DataType> {
        self.table
            .resolve_name(name, self.version)
            .map(|descriptor| descriptor.data_type)
    }
}

fn most_specific<'a, K>(
    descriptors: &'a [RecordKeyDescriptor<K>],
    indices: &[usize],
    version: GameVersion,
) -> Option<&'a RecordKeyDescriptor<K>> {
    indices
        .iter()
        .map(|&i| &descriptors[i])
        .filter(|d| d.version.contains(version))
        .min_by_key(|d| d.version.count())
}

fn check_group<K>(
    descriptors: &[RecordKeyDescriptor<K>],
    indices: &[usize],
    subject: impl Fn() -> String,
) -> Result<(), DescriptorError> {
    for edition in GameVersion::ALL.iter() {
        let counts: Vec<u32> = indices
            .iter()
            .map(|&i| descriptors[i].version)
            .filter(|version| version.contains(edition))
            .map(GameVersion::count)
            .collect();
        let Some(best) = counts.iter().min() else {
            continue;
        };
        if counts.iter().filter(|&count| count == best).count() > 1 {
            return Err(DescriptorError::Ambiguous {
                subject: subject(),
                version: edition,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Key {
        Level,
        Name,
    }

    fn d(key: Key, name: &'static str, data_type: DataType, version: GameVersion) -> RecordKeyDescriptor<Key> {
        RecordKeyDescriptor::new(key, name, data_type, version)
    }

    fn versioned_table() -> DescriptorTable<Key> {
        DescriptorTable::new([
            d(Key::Level, "playerLevel", DataType::Integer, GameVersion::ALL),
            d(Key::Level, "playerLevel", DataType::Float, GameVersion::TQIT),
            d(Key::Level, "playerLevel", DataType::Boolean, GameVersion::TQ),
            d(Key::Name, "myPlayerName", DataType::WideString, GameVersion::ALL),
        ])
        .unwrap()
    }

    #[test]
    fn test_specific_version_wins() {
        let table = versioned_table();
        let tqit = table.resolve(Key::Level, GameVersion::TQIT).unwrap();
        assert_eq!(tqit.version, GameVersion::TQIT);
        assert_eq!(tqit.data_type, DataType::Float);

        let tq = table.resolve(Key::Level, GameVersion::TQ).unwrap();
        assert_eq!(tq.data_type, DataType::Boolean);
    }

    #[test]
    fn test_falls_back_to_all() {
        let table = versioned_table();
        let tqae = table.resolve(Key::Level, GameVersion::TQAE).unwrap();
        assert_eq!(tqae.version, GameVersion::ALL);
        assert_eq!(tqae.data_type, DataType::Integer);
    }

    #[test]
    fn test_uncovered_edition_resolves_to_none() {
        let table = DescriptorTable::new([d(Key::Level, "playerLevel", DataType::Integer, GameVersion::TQAE)]).unwrap();
        assert!(table.resolve(Key::Level, GameVersion::TQ).is_none());
        assert!(table.resolve(Key::Name, GameVersion::TQAE).is_none());
    }

    #[test]
    fn test_resolve_by_name_and_hints() {
        let table = versioned_table();
        assert_eq!(
            table.resolve_name("playerLevel", GameVersion::TQIT).unwrap().key,
            Key::Level
        );
        let hints = table.hints(GameVersion::TQAE);
        assert_eq!(hints.data_type("myPlayerName"), Some(DataType::WideString));
        assert_eq!(hints.data_type("unknownField"), None);
    }

    #[test]
    fn test_ambiguity_detected_at_build() {
        let result = DescriptorTable::new([
            d(Key::Level, "playerLevel", DataType::Integer, GameVersion::TQ | GameVersion::TQIT),
            d(Key::Level, "playerLevel", DataType::Float, GameVersion::TQIT | GameVersion::TQAE),
        ]);
        assert_eq!(
            result.unwrap_err(),
            DescriptorError::Ambiguous {
                subject: "key Level".to_string(),
                version: GameVersion::TQIT,
            }
        );
    }

    #[test]
    fn test_shared_name_across_keys_is_ambiguous() {
        let result = DescriptorTable::new([
            d(Key::Level, "value", DataType::Integer, GameVersion::ALL),
            d(Key::Name, "value", DataType::String, GameVersion::ALL),
        ]);
        assert!(matches!(result, Err(DescriptorError::Ambiguous { .. })));
    }

    #[test]
    fn test_empty_version_rejected() {
        let result = DescriptorTable::new([d(Key::Level, "playerLevel", DataType::Integer, GameVersion::NONE)]);
        assert!(matches!(result, Err(DescriptorError::EmptyVersion { .. })));
    }
}
