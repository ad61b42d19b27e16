//! Character file (`Player.chr`) fields.
//!
//! Vault files share the sack and item layout of the character file, so
//! they resolve through this table too.

use std::sync::LazyLock;

use tqsave_record::{DataType, DescriptorError, DescriptorTable, GameVersion, RecordKeyDescriptor};

/// Well-known fields of character and vault files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerKey {
    BeginBlock,
    EndBlock,
    HeaderVersion,
    PlayerCharacterClass,
    UniqueId,
    StreamData,
    PlayerClassTag,
    PlayerName,
    PlayerTexture,
    Money,
    Level,
    Experience,
    ModifierPoints,
    SkillPoints,
    IsInMainQuest,
    HasBeenInGame,
    NumberOfSacks,
    CurrentlyFocusedSackNumber,
    CurrentlySelectedSackNumber,
    TempBool,
    SackSize,
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
    PointX,
    PointY,
}

const fn all(key: PlayerKey, name: &'static str, data_type: DataType) -> RecordKeyDescriptor<PlayerKey> {
    RecordKeyDescriptor::new(key, name, data_type, GameVersion::ALL)
}

const EXPANSION: GameVersion = GameVersion::from_bits_truncate(GameVersion::TQIT.bits() | GameVersion::TQAE.bits());

/// Descriptor declarations for character and vault files.
pub static PLAYER_DESCRIPTORS: &[RecordKeyDescriptor<PlayerKey>] = &[
    all(PlayerKey::BeginBlock, "begin_block", DataType::Integer),
    all(PlayerKey::EndBlock, "end_block", DataType::Integer),
    all(PlayerKey::HeaderVersion, "headerVersion", DataType::Integer),
    all(PlayerKey::PlayerCharacterClass, "playerCharacterClass", DataType::String),
    all(PlayerKey::UniqueId, "uniqueId", DataType::UniqueId),
    all(PlayerKey::StreamData, "streamData", DataType::Stream),
    all(PlayerKey::PlayerClassTag, "playerClassTag", DataType::String),
    all(PlayerKey::PlayerName, "myPlayerName", DataType::WideString),
    all(PlayerKey::PlayerTexture, "playerTexture", DataType::String),
    all(PlayerKey::Money, "money", DataType::Integer),
    all(PlayerKey::Level, "currentStats.charLevel", DataType::Integer),
    all(PlayerKey::Experience, "currentStats.experiencePoints", DataType::Integer),
    all(PlayerKey::ModifierPoints, "modifierPoints", DataType::Integer),
    all(PlayerKey::SkillPoints, "skillPoints", DataType::Integer),
    all(PlayerKey::IsInMainQuest, "isInMainQuest", DataType::Integer),
    all(PlayerKey::HasBeenInGame, "hasBeenInGame", DataType::Integer),
    all(PlayerKey::NumberOfSacks, "numberOfSacks", DataType::Integer),
    all(PlayerKey::CurrentlyFocusedSackNumber, "currentlyFocusedSackNumber", DataType::Integer),
    all(PlayerKey::CurrentlySelectedSackNumber, "currentlySelectedSackNumber", DataType::Integer),
    all(PlayerKey::TempBool, "tempBool", DataType::Integer),
    all(PlayerKey::SackSize, "size", DataType::Integer),
    all(PlayerKey::BaseName, "baseName", DataType::String),
    all(PlayerKey::PrefixName, "prefixName", DataType::String),
    all(PlayerKey::SuffixName, "suffixName", DataType::String),
    all(PlayerKey::RelicName, "relicName", DataType::String),
    all(PlayerKey::RelicBonus, "relicBonus", DataType::String),
    all(PlayerKey::Seed, "seed", DataType::Integer),
    all(PlayerKey::Var1, "var1", DataType::Integer),
    RecordKeyDescriptor::new(PlayerKey::RelicName2, "relicName2", DataType::String, EXPANSION),
    RecordKeyDescriptor::new(PlayerKey::RelicBonus2, "relicBonus2", DataType::String, EXPANSION),
    RecordKeyDescriptor::new(PlayerKey::Var2, "var2", DataType::Integer, EXPANSION),
    all(PlayerKey::PointX, "pointX", DataType::Integer),
    all(PlayerKey::PointY, "pointY", DataType::Integer),
];

static PLAYER_TABLE: LazyLock<Result<DescriptorTable<PlayerKey>, DescriptorError>> =
    LazyLock::new(|| DescriptorTable::new(PLAYER_DESCRIPTORS.iter().copied()));

/// The validated character file table.
pub fn player_table() -> Result<&'static DescriptorTable<PlayerKey>, DescriptorError> {
    PLAYER_TABLE.as_ref().map_err(Clone::clone)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_key_has_a_descriptor() {
        let table = player_table().unwrap();
        assert_eq!(table.len(), PLAYER_DESCRIPTORS.len());
        assert_eq!(
            table.resolve(PlayerKey::PlayerName, GameVersion::TQAE).unwrap().data_type,
            DataType::WideString
        );
    }

    #[test]
    fn test_expansion_fields() {
        let table = player_table().unwrap();
        assert!(table.resolve(PlayerKey::RelicName2, GameVersion::TQ).is_none());
        assert!(table.resolve(PlayerKey::RelicName2, GameVersion::TQIT).is_some());
        assert!(table.resolve(PlayerKey::Var2, GameVersion::TQAE).is_some());
        assert!(table.resolve_name("relicBonus2", GameVersion::TQ).is_none());
    }
}
