//! `PropertySet` for pass communication.
//!
//! Passes share the decomposition targets through the standard fields and
//! report results as typed custom properties:
//!
//! ```
//! use icm_compile::{DecompositionMode, GateSet, PropertySet};
//!
//! #[derive(Debug, PartialEq)]
//! struct Note(&'static str);
//!
//! let mut props = PropertySet::new().with_targets(GateSet::t_gates(), DecompositionMode::Forward);
//! props.insert(Note("checked"));
//!
//! assert!(props.targets.as_ref().unwrap().contains("tdg"));
//! assert_eq!(props.get::<Note>(), Some(&Note("checked")));
//! ```

use rustc_hash::FxHashMap;
use std::any::{Any, TypeId};

use crate::gadget::DecompositionMode;
use crate::tagging::GateSet;
use crate::wire::WireArena;

/// How ancilla wires are named.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AncillaNaming {
    /// Name prefix.
    pub prefix: String,
    /// Index of the first ancilla.
    pub first: u64,
}

impl Default for AncillaNaming {
    fn default() -> Self {
        Self {
            prefix: WireArena::DEFAULT_ANCILLA_PREFIX.to_string(),
            first: 0,
        }
    }
}

/// Shared state passed through all compilation passes.
#[derive(Debug, Default)]
pub struct PropertySet {
    /// Gates to expand into ICM gadgets.
    ///
    /// Must be set before running the decomposition pass.
    pub targets: Option<GateSet>,

    /// Decomposition direction.
    pub mode: DecompositionMode,

    /// Gates tagged but not expanded.
    pub extra_tags: Option<GateSet>,

    /// Ancilla naming.
    pub ancillas: AncillaNaming,

    /// Group decomposed output into ASAP moments.
    pub coalesce_moments: bool,

    /// Custom properties storage (type-erased).
    custom: FxHashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl PropertySet {
    /// Create a new empty property set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the decomposition targets.
    #[must_use]
    pub fn with_targets(mut self, targets: GateSet, mode: DecompositionMode) -> Self {
        self.targets = Some(targets);
        self.mode = mode;
        self
    }

    /// Insert a custom property.
    pub fn insert<T: Any + Send + Sync>(&mut self, value: T) {
        self.custom.insert(TypeId::of::<T>(), Box::new(value));
    }

    /// Get a custom property.
    pub fn get<T: Any>(&self) -> Option<&T> {
        self.custom
            .get(&TypeId::of::<T>())
            .and_then(|v| v.downcast_ref())
    }

    /// Get a mutable custom property.
    pub fn get_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.custom
            .get_mut(&TypeId::of::<T>())
            .and_then(|v| v.downcast_mut())
    }

    /// Remove a custom property.
    pub fn remove<T: Any>(&mut self) -> Option<T> {
        self.custom
            .remove(&TypeId::of::<T>())
            .and_then(|v| v.downcast().ok())
            .map(|v| *v)
    }
}
