//! Token privilege model

use std::fmt;

/// Privilege is enabled by default
pub const SE_PRIVILEGE_ENABLED_BY_DEFAULT: u32 = 0x0000_0001;
/// Privilege is enabled
pub const SE_PRIVILEGE_ENABLED: u32 = 0x0000_0002;
/// Privilege is removed from the token
pub const SE_PRIVILEGE_REMOVED: u32 = 0x0000_0004;

/// Locally unique identifier of a privilege
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Luid {
    pub low: u32,
    pub high: i32,
}

impl Luid {
    pub fn new(low: u32, high: i32) -> Self {
        Luid { low, high }
    }
}

impl fmt::Display for Luid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}:{:#x}", self.high, self.low)
    }
}

/// State of a privilege
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrivilegeState {
    /// Privilege is enabled
    Enabled,
    /// Privilege is disabled but can be enabled
    Disabled,
    /// Privilege is not available to the token
    NotPresent,
}

impl fmt::Display for PrivilegeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrivilegeState::Enabled => write!(f, "enabled"),
            PrivilegeState::Disabled => write!(f, "disabled"),
            PrivilegeState::NotPresent => write!(f, "not present"),
        }
    }
}

/// One entry of a token's privilege list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Privilege {
    pub luid: Luid,
    pub attributes: u32,
}

impl Privilege {
    pub fn new(luid: Luid, attributes: u32) -> Self {
        Privilege { luid, attributes }
    }

    pub fn is_enabled(&self) -> bool {
        self.attributes & SE_PRIVILEGE_ENABLED != 0
    }

    pub fn state(&self) -> PrivilegeState {
        if self.attributes & SE_PRIVILEGE_REMOVED != 0 {
            PrivilegeState::NotPresent
        } else if self.is_enabled() {
            PrivilegeState::Enabled
        } else {
            PrivilegeState::Disabled
        }
    }
}

/// The privileges held by a token.
///
/// Only entries already present can be enabled; nothing is ever added.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrivilegeSet {
    entries: Vec<Privilege>,
}

impl PrivilegeSet {
    pub fn new(entries: Vec<Privilege>) -> Self {
        PrivilegeSet { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Privilege> {
        self.entries.iter()
    }

    pub fn state_of(&self, luid: Luid) -> PrivilegeState {
        self.entries
            .iter()
            .find(|p| p.luid == luid)
            .map(Privilege::state)
            .unwrap_or(PrivilegeState::NotPresent)
    }

    pub fn all_enabled(&self) -> bool {
        self.entries.iter().all(Privilege::is_enabled)
    }

    /// Sets the enabled attribute on every entry and returns how many changed
    pub fn enable_all(&mut self) -> usize {
        let mut changed = 0;
        for entry in self.entries.iter_mut().filter(|p| !p.is_enabled()) {
            entry.attributes |= SE_PRIVILEGE_ENABLED;
            changed += 1;
        }
        changed
    }

    /// Decodes a `TOKEN_PRIVILEGES` buffer viewed as 32-bit words:
    /// the count, then `(low, high, attributes)` per entry.
    pub fn from_words(words: &[u32]) -> Option<Self> {
        let (&count, rest) = words.split_first()?;
        let count = count as usize;
        if rest.len() < count.checked_mul(3)? {
            return None;
        }
        let entries = rest
            .chunks_exact(3)
            .take(count)
            .map(|c| Privilege::new(Luid::new(c[0], c[1] as i32), c[2]))
            .collect();
        Some(PrivilegeSet { entries })
    }

    /// Encodes the set in the `TOKEN_PRIVILEGES` word layout
    pub fn to_words(&self) -> Vec<u32> {
        let mut words = Vec::with_capacity(1 + self.entries.len() * 3);
        words.push(self.entries.len() as u32);
        for entry in &self.entries {
            words.extend_from_slice(&[entry.luid.low, entry.luid.high as u32, entry.attributes]);
        }
        words
    }
}

impl<'a> IntoIterator for &'a PrivilegeSet {
    type Item = &'a Privilege;
    type IntoIter = std::slice::Iter<'a, Privilege>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> PrivilegeSet {
        PrivilegeSet::new(vec![
            Privilege::new(Luid::new(20, 0), 0),
            Privilege::new(Luid::new(17, 0), SE_PRIVILEGE_ENABLED_BY_DEFAULT),
            Privilege::new(Luid::new(23, 0), SE_PRIVILEGE_ENABLED | SE_PRIVILEGE_ENABLED_BY_DEFAULT),
        ])
    }

    #[test]
    fn test_privilege_state() {
        let set = sample();
        assert_eq!(set.state_of(Luid::new(20, 0)), PrivilegeState::Disabled);
        assert_eq!(set.state_of(Luid::new(23, 0)), PrivilegeState::Enabled);
        assert_eq!(set.state_of(Luid::new(99, 0)), PrivilegeState::NotPresent);
    }

    #[test]
    fn test_enable_all_counts_changes() {
        let mut set = sample();
        assert!(!set.all_enabled());
        assert_eq!(set.enable_all(), 2);
        assert!(set.all_enabled());
        assert_eq!(set.enable_all(), 0);
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_enable_all_keeps_default_bits() {
        let mut set = sample();
        set.enable_all();
        let second: Vec<_> = set.iter().map(|p| p.attributes).collect();
        assert_eq!(
            second,
            vec![
                SE_PRIVILEGE_ENABLED,
                SE_PRIVILEGE_ENABLED | SE_PRIVILEGE_ENABLED_BY_DEFAULT,
                SE_PRIVILEGE_ENABLED | SE_PRIVILEGE_ENABLED_BY_DEFAULT,
            ]
        );
    }

    #[test]
    fn test_word_layout() {
        let set = PrivilegeSet::new(vec![Privilege::new(Luid::new(20, -1), 2)]);
        assert_eq!(set.to_words(), vec![1, 20, u32::MAX, 2]);
        assert_eq!(PrivilegeSet::from_words(&set.to_words()), Some(set));
    }

    #[test]
    fn test_from_words_rejects_truncated_buffer() {
        assert_eq!(PrivilegeSet::from_words(&[]), None);
        assert_eq!(PrivilegeSet::from_words(&[2, 20, 0, 2]), None);
        assert_eq!(PrivilegeSet::from_words(&[0]), Some(PrivilegeSet::default()));
    }

    #[test]
    fn test_from_words_ignores_trailing_padding() {
        let set = PrivilegeSet::from_words(&[1, 5, 0, 0, 0xdead]).unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.state_of(Luid::new(5, 0)), PrivilegeState::Disabled);
    }

    #[test]
    fn test_removed_privilege_reports_not_present() {
        let entry = Privilege::new(Luid::new(3, 0), SE_PRIVILEGE_REMOVED);
        assert_eq!(entry.state(), PrivilegeState::NotPresent);
        assert_eq!(PrivilegeState::Enabled.to_string(), "enabled");
    }
}
