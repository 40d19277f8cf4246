//! Child-position paths from a tree's root to one of its nodes.
//!
//! An address is a view, not a stored entity: it is resolved freshly on every
//! call and goes stale as soon as the tree changes at or above the node it
//! points to.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use itertools::Itertools;

use crate::errors::TreeError;

/// Path of child indices, one per level below the root.
///
/// `[]` is the root itself, `[2, 0]` is the root's third child's first child.
/// Equality and hashing go by the resolved [`path`](Address::path).
#[derive(Debug, Clone)]
pub enum Address {
    /// Resolve every component.
    Full(Vec<usize>),
    /// Resolve only the first `stop` components and return the node reached there.
    Partial { path: Vec<usize>, stop: usize },
}

impl Address {
    pub const ROOT: Address = Address::Full(Vec::new());

    pub fn full(path: impl IntoIterator<Item = usize>) -> Self {
        Address::Full(path.into_iter().collect())
    }

    pub fn partial(path: impl IntoIterator<Item = usize>, stop: usize) -> Self {
        Address::Partial {
            path: path.into_iter().collect(),
            stop,
        }
    }

    /// The components that are actually resolved.
    pub fn path(&self) -> &[usize] {
        match self {
            Address::Full(path) => path,
            Address::Partial { path, stop } => &path[..(*stop).min(path.len())],
        }
    }

    pub fn is_root(&self) -> bool {
        self.path().is_empty()
    }

    /// Index of the addressed node within its parent, `None` for the root.
    pub fn last(&self) -> Option<usize> {
        self.path().last().copied()
    }

    pub fn parent(&self) -> Option<Address> {
        let path = self.path();
        if path.is_empty() {
            return None;
        }
        Some(Address::Full(path[..path.len() - 1].to_vec()))
    }

    pub fn child(&self, index: usize) -> Address {
        let mut path = self.path().to_vec();
        path.push(index);
        Address::Full(path)
    }
}

impl PartialEq for Address {
    fn eq(&self, other: &Self) -> bool {
        self.path() == other.path()
    }
}

impl Eq for Address {}

impl Hash for Address {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.path().hash(state);
    }
}

impl Default for Address {
    fn default() -> Self {
        Address::ROOT
    }
}

impl From<Vec<usize>> for Address {
    fn from(path: Vec<usize>) -> Self {
        Address::Full(path)
    }
}

impl From<&[usize]> for Address {
    fn from(path: &[usize]) -> Self {
        Address::Full(path.to_vec())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.path().iter().join(", "))
    }
}

/// Accepts `0,2,1`, `0.2.1` or `[0, 2, 1]`; an empty string is the root.
impl FromStr for Address {
    type Err = TreeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let inner = s
            .trim()
            .trim_start_matches('[')
            .trim_end_matches(']')
            .trim();
        if inner.is_empty() {
            return Ok(Address::ROOT);
        }
        inner
            .split([',', '.'])
            .map(|part| {
                part.trim()
                    .parse::<usize>()
                    .map_err(|_| TreeError::InvalidAddress(s.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Address::Full)
    }
}
