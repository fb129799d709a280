//! Hierarchical, totally ordered operation identifiers.
//!
//! An [`OperationId`] is a non-empty sequence of integers compared
//! lexicographically, so a prefix sorts before any of its extensions:
//! `3 < 3.0 < 3.1 < 4`. Decomposing the operation tagged `3` mints ids
//! under the prefix `3.0`, all of which sort after `3` and before `4`.
//!
//! Two sentinels bracket every sequence id. [`OperationId::leftmost`] sorts
//! first and [`OperationId::rightmost`] sorts last; resolving a wire against
//! `rightmost` always yields its newest version.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CompileError, CompileResult};

/// Identifier used to order operations and decide wire resolution.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct OperationId(Repr);

// Variant order gives `Min < Seq(_) < Max`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
enum Repr {
    Min,
    Seq(Vec<u64>),
    Max,
}

impl OperationId {
    /// Create a single-component id.
    pub fn new(n: u64) -> Self {
        Self(Repr::Seq(vec![n]))
    }

    /// Create an id from explicit components.
    pub fn from_components(components: impl Into<Vec<u64>>) -> CompileResult<Self> {
        let components = components.into();
        if components.is_empty() {
            return Err(CompileError::MalformedOperationId(
                "an operation id needs at least one component".into(),
            ));
        }
        Ok(Self(Repr::Seq(components)))
    }

    /// The id that sorts before every other id.
    pub fn leftmost() -> Self {
        Self(Repr::Min)
    }

    /// The id that sorts after every other id.
    pub fn rightmost() -> Self {
        Self(Repr::Max)
    }

    /// Whether this id is one of the two sentinels.
    pub fn is_sentinel(&self) -> bool {
        !matches!(self.0, Repr::Seq(_))
    }

    /// The components of a sequence id, or `None` for a sentinel.
    pub fn components(&self) -> Option<&[u64]> {
        match &self.0 {
            Repr::Seq(c) => Some(c),
            Repr::Min | Repr::Max => None,
        }
    }

    /// Number of components; sentinels have depth 0.
    pub fn depth(&self) -> usize {
        self.components().map_or(0, <[u64]>::len)
    }

    /// Open a nested level by appending a `0` component.
    #[must_use]
    pub fn enter_level(&self) -> Self {
        match &self.0 {
            Repr::Seq(c) => {
                let mut next = c.clone();
                next.push(0);
                Self(Repr::Seq(next))
            }
            Repr::Min | Repr::Max => self.clone(),
        }
    }

    /// Step to the next id on the same level.
    ///
    /// # Panics
    ///
    /// Panics if the last component is `u64::MAX`. Reaching it takes 2^64
    /// siblings on one level; the engine advances a freshly entered level
    /// once per gadget operation, so it never gets there.
    #[must_use]
    pub fn advance(&self) -> Self {
        match &self.0 {
            Repr::Seq(c) => {
                let mut next = c.clone();
                if let Some(last) = next.last_mut() {
                    *last = last
                        .checked_add(1)
                        .expect("operation id component overflowed u64");
                }
                Self(Repr::Seq(next))
            }
            Repr::Min | Repr::Max => self.clone(),
        }
    }
}

impl From<u64> for OperationId {
    fn from(n: u64) -> Self {
        Self::new(n)
    }
}

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Repr::Min => f.write_str("leftmost"),
            Repr::Max => f.write_str("rightmost"),
            Repr::Seq(c) => {
                for (i, n) in c.iter().enumerate() {
                    if i > 0 {
                        f.write_str(".")?;
                    }
                    write!(f, "{n}")?;
                }
                Ok(())
            }
        }
    }
}

impl FromStr for OperationId {
    type Err = CompileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "leftmost" => Ok(Self::leftmost()),
            "rightmost" => Ok(Self::rightmost()),
            text => {
                let components = text
                    .split('.')
                    .map(|part| {
                        part.parse::<u64>().map_err(|e| {
                            CompileError::MalformedOperationId(format!("'{text}': {e}"))
                        })
                    })
                    .collect::<CompileResult<Vec<_>>>()?;
                Self::from_components(components)
            }
        }
    }
}

impl From<OperationId> for String {
    fn from(id: OperationId) -> Self {
        id.to_string()
    }
}

impl TryFrom<String> for OperationId {
    type Error = CompileError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(components: &[u64]) -> OperationId {
        OperationId::from_components(components.to_vec()).unwrap()
    }

    #[test]
    fn test_prefix_sorts_first() {
        assert!(id(&[3]) < id(&[3, 0]));
        assert!(id(&[3, 0]) < id(&[3, 1]));
        assert!(id(&[3, 9, 9]) < id(&[4]));
        assert!(id(&[2, 100]) < id(&[3]));
    }

    #[test]
    fn test_sentinels_bracket_everything() {
        let left = OperationId::leftmost();
        let right = OperationId::rightmost();
        for inner in [id(&[0]), id(&[u64::MAX]), id(&[u64::MAX, u64::MAX])] {
            assert!(left < inner);
            assert!(inner < right);
        }
        assert!(left < right);
        assert_eq!(right, OperationId::rightmost());
    }

    #[test]
    fn test_advance_twice() {
        assert_eq!(OperationId::new(5).advance().advance(), OperationId::new(7));
    }

    #[test]
    #[should_panic(expected = "operation id component overflowed u64")]
    fn test_advance_past_u64_max_panics() {
        let id = OperationId::from_components(vec![1, u64::MAX]).unwrap();
        let _ = id.advance();
    }

    #[test]
    fn test_enter_level_then_advance() {
        let next = OperationId::new(5).enter_level().advance();
        assert_eq!(next, id(&[5, 1]));
        assert_ne!(next, OperationId::new(6));
        assert!(OperationId::new(5) < next && next < OperationId::new(6));
    }

    #[test]
    fn test_sentinels_are_fixed_points() {
        for s in [OperationId::leftmost(), OperationId::rightmost()] {
            assert_eq!(s.enter_level(), s);
            assert_eq!(s.advance(), s);
            assert!(s.is_sentinel());
            assert_eq!(s.depth(), 0);
            assert!(s.components().is_none());
        }
    }

    #[test]
    fn test_empty_components_rejected() {
        assert!(matches!(
            OperationId::from_components(Vec::new()),
            Err(CompileError::MalformedOperationId(_))
        ));
    }

    #[test]
    fn test_display_and_parse() {
        let original = id(&[3, 0, 1]);
        assert_eq!(original.to_string(), "3.0.1");
        assert_eq!("3.0.1".parse::<OperationId>().unwrap(), original);
        assert_eq!("rightmost".parse::<OperationId>().unwrap(), OperationId::rightmost());
        assert_eq!(OperationId::leftmost().to_string(), "leftmost");

        for bad in ["", "3..1", "a.b", "-1", "3."] {
            assert!(
                matches!(bad.parse::<OperationId>(), Err(CompileError::MalformedOperationId(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&id(&[1, 2])).unwrap();
        assert_eq!(json, "\"1.2\"");
        let back: OperationId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id(&[1, 2]));
        assert!(serde_json::from_str::<OperationId>("\"x\"").is_err());
    }
}
