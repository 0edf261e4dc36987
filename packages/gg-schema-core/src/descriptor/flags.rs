//! Per-field behavior flags.

use std::fmt;
use std::ops::BitOr;

/// Per-field metadata bitset.
///
/// Flags are read by every consumer of the schema from the same field
/// descriptor: the codec honors `NO_SERIALIZE`, editing surfaces honor
/// the UI hints, and neither interferes with the other.
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct FieldFlags(u32);

impl FieldFlags {
    /// No flags set.
    pub const NONE: FieldFlags = FieldFlags(0);
    /// Field exists at runtime but is excluded from every encoded form.
    /// Decoded instances receive the field's default instead.
    pub const NO_SERIALIZE: FieldFlags = FieldFlags(1 << 0);
    /// Advisory UI hint: hide the per-element index of a small fixed array.
    pub const UI_HIDE_ARRAY_INDEX: FieldFlags = FieldFlags(1 << 1);

    /// Returns true if all bits of `other` are set in `self`.
    pub const fn contains(self, other: FieldFlags) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns the union of the two flag sets.
    pub const fn union(self, other: FieldFlags) -> FieldFlags {
        FieldFlags(self.0 | other.0)
    }

    /// Returns true if no flags are set.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for FieldFlags {
    type Output = FieldFlags;

    fn bitor(self, rhs: FieldFlags) -> FieldFlags {
        self.union(rhs)
    }
}

impl fmt::Debug for FieldFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "FieldFlags(NONE)");
        }
        let mut names = Vec::new();
        if self.contains(FieldFlags::NO_SERIALIZE) {
            names.push("NO_SERIALIZE");
        }
        if self.contains(FieldFlags::UI_HIDE_ARRAY_INDEX) {
            names.push("UI_HIDE_ARRAY_INDEX");
        }
        write!(f, "FieldFlags({})", names.join(" | "))
    }
}
