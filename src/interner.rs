use std::fmt;

use rustc_hash::FxHashMap;

use crate::error::FreqError;

/// Compact handle for a token string. Only comparable between handles
/// issued by the same [`Interner`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OrthId(usize);

impl OrthId {
    pub fn from_index(index: usize) -> Self {
        OrthId(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for OrthId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Two-way string table. Ids are handed out in order of first occurrence.
#[derive(Debug, Default, Clone)]
pub struct Interner {
    ids: FxHashMap<Box<str>, OrthId>,
    strings: Vec<Box<str>>,
}

impl Interner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intern(&mut self, token: &str) -> OrthId {
        if let Some(&id) = self.ids.get(token) {
            return id;
        }
        let id = OrthId(self.strings.len());
        let owned: Box<str> = token.into();
        self.strings.push(owned.clone());
        self.ids.insert(owned, id);
        id
    }

    pub fn resolve(&self, id: OrthId) -> Result<&str, FreqError> {
        self.strings
            .get(id.0)
            .map(|s| s.as_ref())
            .ok_or(FreqError::InvalidIdentity(id))
    }

    /// Looks up a string without interning it.
    pub fn get(&self, token: &str) -> Option<OrthId> {
        self.ids.get(token).copied()
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}
