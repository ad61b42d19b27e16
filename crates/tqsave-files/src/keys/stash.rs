//! Stash file (`winsys.dxb`, `miscsys.dxb`) fields.

use std::sync::LazyLock;

use tqsave_record::{DataType, DescriptorError, DescriptorTable, GameVersion, RecordKeyDescriptor};

/// Well-known fields of stash files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransferStashKey {
    BeginBlock,
    EndBlock,
    StashVersion,
    FileName,
    SackWidth,
    SackHeight,
    NumItems,
    StackSize,
    XOffset,
    YOffset,
    BaseName,
    PrefixName,
    SuffixName,
    RelicName,
    RelicBonus,
    Seed,
    Var1,
    RelicName2,
    RelicBonus2,
    Var2,
}

const EXPANSION: GameVersion = GameVersion::from_bits_truncate(GameVersion::TQIT.bits() | GameVersion::TQAE.bits());

/// Descriptor declarations for stash files.
pub static STASH_DESCRIPTORS: &[RecordKeyDescriptor<TransferStashKey>] = &[
    RecordKeyDescriptor::new(TransferStashKey::BeginBlock, "begin_block", DataType::Integer, GameVersion::ALL),
    RecordKeyDescriptor::new(TransferStashKey::EndBlock, "end_block", DataType::Integer, GameVersion::ALL),
    RecordKeyDescriptor::new(TransferStashKey::StashVersion, "stashVersion", DataType::Integer, GameVersion::ALL),
    RecordKeyDescriptor::new(TransferStashKey::FileName, "fName", DataType::String, GameVersion::ALL),
    RecordKeyDescriptor::new(TransferStashKey::SackWidth, "sackWidth", DataType::Integer, GameVersion::ALL),
    RecordKeyDescriptor::new(TransferStashKey::SackHeight, "sackHeight", DataType::Integer, GameVersion::ALL),
    RecordKeyDescriptor::new(TransferStashKey::NumItems, "numItems", DataType::Integer, GameVersion::ALL),
    RecordKeyDescriptor::new(TransferStashKey::StackSize, "stackSize", DataType::Integer, GameVersion::ALL),
    RecordKeyDescriptor::new(TransferStashKey::XOffset, "xOffset", DataType::Float, GameVersion::ALL),
    RecordKeyDescriptor::new(TransferStashKey::YOffset, "yOffset", DataType::Float, GameVersion::ALL),
    RecordKeyDescriptor::new(TransferStashKey::BaseName, "baseName", DataType::String, GameVersion::ALL),
    RecordKeyDescriptor::new(TransferStashKey::PrefixName, "prefixName", DataType::String, GameVersion::ALL),
    RecordKeyDescriptor::new(TransferStashKey::SuffixName, "suffixName", DataType::String, GameVersion::ALL),
    RecordKeyDescriptor::new(TransferStashKey::RelicName, "relicName", DataType::String, GameVersion::ALL),
    RecordKeyDescriptor::new(TransferStashKey::RelicBonus, "relicBonus", DataType::String, GameVersion::ALL),
    RecordKeyDescriptor::new(TransferStashKey::Seed, "seed", DataType::Integer, GameVersion::ALL),
    RecordKeyDescriptor::new(TransferStashKey::Var1, "var1", DataType::Integer, GameVersion::ALL),
    RecordKeyDescriptor::new(TransferStashKey::RelicName2, "relicName2", DataType::String, EXPANSION),
    RecordKeyDescriptor::new(TransferStashKey::RelicBonus2, "relicBonus2", DataType::String, EXPANSION),
    RecordKeyDescriptor::new(TransferStashKey::Var2, "var2", DataType::Integer, EXPANSION),
];

static STASH_TABLE: LazyLock<Result<DescriptorTable<TransferStashKey>, DescriptorError>> =
    LazyLock::new(|| DescriptorTable::new(STASH_DESCRIPTORS.iter().copied()));

/// The validated stash file table.
pub fn stash_table() -> Result<&'static DescriptorTable<TransferStashKey>, DescriptorError> {
    STASH_TABLE.as_ref().map_err(Clone::clone)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stash_table() {
        let table = stash_table().unwrap();
        let hints = table.hints(GameVersion::TQ);
        assert_eq!(
            tqsave_record::TypeHints::data_type(&hints, "xOffset"),
            Some(DataType::Float)
        );
        assert_eq!(tqsave_record::TypeHints::data_type(&hints, "var2"), None);
        assert_eq!(
            tqsave_record::TypeHints::data_type(&table.hints(GameVersion::TQAE), "var2"),
            Some(DataType::Integer)
        );
    }
}
