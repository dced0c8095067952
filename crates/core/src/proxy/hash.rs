//! Perfect hashing for property names
//!
//! Each property table is a fieldless enum deriving
//! [`PropertyKeys`](stagehook_macros::PropertyKeys). The derive searches for
//! hash parameters with no collisions and emits the slot array as a constant,
//! so a lookup is one hash, one slot read and one string compare.
//!
//! # Hash
//!
//! ```text
//! h = PRIMES[table_start]
//! skip first_char characters          (longest prefix shared by two keys)
//! repeat hash_chars times:            (cycling through the key)
//!     h = (h ^ c) + ((h << 26) + (h >> 6))
//! slot = h % slots.len()
//! ```

/// Seed values indexed by `table_start`
pub const PRIMES: [u32; 34] = [
    17, 5381, 27541, 29191, 29611, 31321, 34429, 36739, 40099, 40591, 42589, 46691, 50821, 54251,
    56897, 57793, 65213, 65599, 68111, 72073, 76147, 84631, 89041, 93563, 28813, 37633, 43201,
    47629, 60493, 63949, 65713, 69313, 73009, 76801,
];

/// Key hash (compile-time capable)
///
/// Characters are read cyclically: reaching the end of the key restarts at
/// its first character.
pub const fn key_hash(key: &[u8], hash_chars: u32, table_start: u32, first_char: u32) -> u32 {
    let mut hash = PRIMES[table_start as usize];
    let mut index = 0usize;

    let mut i = 0;
    while i < first_char {
        if index >= key.len() {
            index = 0;
        }
        index += 1;
        i += 1;
    }

    let mut i = 0;
    while i < hash_chars {
        if index >= key.len() {
            index = 0;
        }
        let c = if index < key.len() { key[index] as u32 } else { 0 };
        hash = (hash ^ c).wrapping_add((hash << 26).wrapping_add(hash >> 6));
        index += 1;
        i += 1;
    }

    hash
}

/// One name in a property table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyKey {
    pub name: &'static str,
    /// Resolves, but is left out of enumeration
    pub deprecated: bool,
}

/// Static perfect-hash table
#[derive(Debug, Clone, Copy)]
pub struct PerfectHash {
    pub keys: &'static [PropertyKey],
    pub table_start: u32,
    pub hash_chars: u32,
    pub first_char: u32,
    /// Key index per slot, `-1` for an empty slot
    pub slots: &'static [i16],
}

impl PerfectHash {
    /// Index of `name` in [`keys`](Self::keys)
    pub fn find(&self, name: &str) -> Option<usize> {
        if self.slots.is_empty() {
            return None;
        }
        let hash = key_hash(name.as_bytes(), self.hash_chars, self.table_start, self.first_char);
        let slot = self.slots[hash as usize % self.slots.len()];
        let index = usize::try_from(slot).ok()?;
        (self.keys.get(index)?.name == name).then_some(index)
    }

    /// Names that enumeration should report
    pub fn visible(&self) -> impl Iterator<Item = &'static str> {
        self.keys.iter().filter(|k| !k.deprecated).map(|k| k.name)
    }
}

/// A property table generated by `#[derive(PropertyKeys)]`
pub trait PropertyKeys: Copy + Sized + 'static {
    const TABLE: PerfectHash;

    fn from_index(index: usize) -> Option<Self>;

    fn index(self) -> usize;

    /// Resolve a script name
    fn lookup(name: &str) -> Option<Self> {
        Self::TABLE.find(name).and_then(Self::from_index)
    }

    fn name(self) -> &'static str {
        Self::TABLE.keys[self.index()].name
    }

    fn is_deprecated(self) -> bool {
        Self::TABLE.keys[self.index()].deprecated
    }

    /// Every non-deprecated key in declaration order
    fn visible() -> Vec<Self> {
        (0..Self::TABLE.keys.len())
            .filter_map(Self::from_index)
            .filter(|k| !k.is_deprecated())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PropertyKeys;

    #[derive(Debug, Clone, Copy, PartialEq, PropertyKeys)]
    #[keys(table_start = 0, hash_chars = 1)]
    enum Sample {
        #[key(name = "maskX")]
        MaskX,
        #[key(name = "maskY")]
        MaskY,
        #[key(name = "x")]
        X,
        #[key(name = "stageWidth", deprecated)]
        StageWidth,
    }

    #[derive(Debug, Clone, Copy, PartialEq, PropertyKeys)]
    enum Single {
        #[key(name = "setFocus")]
        SetFocus,
    }

    #[test]
    fn test_every_key_resolves() {
        for key in [Sample::MaskX, Sample::MaskY, Sample::X, Sample::StageWidth] {
            assert_eq!(Sample::lookup(key.name()), Some(key));
        }
    }

    #[test]
    fn test_unknown_names_miss() {
        assert_eq!(Sample::lookup("maskZ"), None);
        assert_eq!(Sample::lookup(""), None);
        assert_eq!(Sample::lookup("xx"), None);
        assert_eq!(Single::lookup("setfocus"), None);
        assert_eq!(Single::lookup("setFocus"), Some(Single::SetFocus));
    }

    #[test]
    fn test_deprecated_hidden_from_enumeration() {
        assert!(Sample::StageWidth.is_deprecated());
        assert_eq!(Sample::visible(), vec![Sample::MaskX, Sample::MaskY, Sample::X]);
        assert_eq!(Sample::TABLE.visible().count(), 3);
    }

    #[test]
    fn test_const_evaluation() {
        // Verify the hash can be computed at compile time
        const HASH: u32 = key_hash(b"contentBounds", 4, 3, 2);
        assert_eq!(HASH, key_hash(b"contentBounds", 4, 3, 2));
        assert_ne!(key_hash(b"x", 1, 0, 0), key_hash(b"y", 1, 0, 0));
    }
}
