//! Game edition bitset.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};
use std::str::FromStr;

/// A set of game editions.
///
/// Descriptors declare the editions they apply to as a set, so a field that
/// never changed carries [`GameVersion::ALL`] while a field that changed
/// format gets one descriptor per edition group.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GameVersion(u8);

impl GameVersion {
    /// No edition.
    pub const NONE: Self = Self(0);
    /// Titan Quest.
    pub const TQ: Self = Self(1 << 0);
    /// Titan Quest: Immortal Throne.
    pub const TQIT: Self = Self(1 << 1);
    /// Titan Quest: Anniversary Edition.
    pub const TQAE: Self = Self(1 << 2);
    /// Every edition.
    pub const ALL: Self = Self(Self::TQ.0 | Self::TQIT.0 | Self::TQAE.0);

    const NAMES: [(Self, &'static str); 3] =
        [(Self::TQ, "TQ"), (Self::TQIT, "TQIT"), (Self::TQAE, "TQAE")];

    /// Raw bit pattern.
    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Build from raw bits, dropping unknown ones.
    #[inline]
    pub const fn from_bits_truncate(bits: u8) -> Self {
        Self(bits & Self::ALL.0)
    }

    /// Check whether every edition of `other` is in `self`.
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Check whether the set is empty.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Number of editions in the set.
    #[inline]
    pub const fn count(self) -> u32 {
        self.0.count_ones()
    }

    /// Iterate over the single editions in the set.
    pub fn iter(self) -> impl Iterator<Item = GameVersion> {
        Self::NAMES
            .into_iter()
            .map(|(edition, _)| edition)
            .filter(move |edition| self.contains(*edition))
    }
}

impl BitOr for GameVersion {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for GameVersion {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for GameVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GameVersion({})", self)
    }
}

impl fmt::Display for GameVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("none");
        }

        let mut first = true;
        for (edition, name) in Self::NAMES {
            if self.contains(edition) {
                if !first {
                    f.write_str("|")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        Ok(())
    }
}

impl FromStr for GameVersion {
    type Err = String;

    /// Parse `tq`, `tqit`, `tqae` or `all`, optionally joined with `|`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut version = Self::NONE;
        for part in s.split('|') {
            version |= match part.trim().to_ascii_lowercase().as_str() {
                "tq" => Self::TQ,
                "tqit" | "it" => Self::TQIT,
                "tqae" | "ae" => Self::TQAE,
                "all" => Self::ALL,
                other => return Err(format!("unknown game version {:?}", other)),
            };
        }
        Ok(version)
    }
}
