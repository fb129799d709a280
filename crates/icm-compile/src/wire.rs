//! Split wires and their resolution.
//!
//! Every logical qubit starts as a root wire in a [`WireArena`]. Decomposing
//! a gate splits the wire carrying it into two children: child 0 keeps the
//! parent's name, child 1 is a fresh ancilla. The parent records the id of
//! the operation that split it (its *threshold*) and is retired.
//!
//! An operation tagged `id` that still refers to a retired wire is resolved
//! by walking down the split tree, taking child 0 when `id <= threshold` and
//! child 1 otherwise, until a leaf is reached.
//!
//! A root wire and its chain of child-0 continuations form one *line*: the
//! physical qubit a rebuilt circuit allocates. Each ancilla starts a line of
//! its own. Ancilla names skip any name already held by a wire.

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashSet;
use tracing::trace;

use crate::error::{CompileError, CompileResult};
use crate::operation_id::OperationId;

/// Handle to a wire stored in a [`WireArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WireId(pub u32);

impl fmt::Display for WireId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "w{}", self.0)
    }
}

#[derive(Debug, Clone)]
struct Split {
    threshold: OperationId,
    children: [WireId; 2],
}

#[derive(Debug, Clone)]
struct WireNode {
    name: Arc<str>,
    depth: u32,
    root: WireId,
    line: WireId,
    split: Option<Split>,
}

/// Arena owning every wire created during one decomposition.
///
/// The arena also owns the ancilla counter, so two arenas never hand out
/// conflicting ancilla names.
#[derive(Debug, Clone)]
pub struct WireArena {
    nodes: Vec<WireNode>,
    names: FxHashSet<Arc<str>>,
    ancilla_prefix: String,
    next_ancilla: u64,
    ancillas_created: u64,
    max_depth: u32,
}

impl WireArena {
    /// Default prefix for ancilla names.
    pub const DEFAULT_ANCILLA_PREFIX: &'static str = "anc_";

    /// Create an empty arena with ancillas named `anc_0`, `anc_1`, ...
    pub fn new() -> Self {
        Self::with_ancillas(Self::DEFAULT_ANCILLA_PREFIX, 0)
    }

    /// Create an empty arena with a custom ancilla prefix and first index.
    pub fn with_ancillas(prefix: impl Into<String>, first: u64) -> Self {
        Self {
            nodes: vec![],
            names: FxHashSet::default(),
            ancilla_prefix: prefix.into(),
            next_ancilla: first,
            ancillas_created: 0,
            max_depth: 0,
        }
    }

    /// Add an unsplit root wire.
    pub fn add_wire(&mut self, name: impl Into<Arc<str>>) -> WireId {
        let id = self.next_id();
        let name = name.into();
        self.names.insert(Arc::clone(&name));
        self.nodes.push(WireNode {
            name,
            depth: 0,
            root: id,
            line: id,
            split: None,
        });
        id
    }

    fn fresh_ancilla_name(&mut self) -> Arc<str> {
        loop {
            let name: Arc<str> = format!("{}{}", self.ancilla_prefix, self.next_ancilla).into();
            self.next_ancilla += 1;
            if self.names.insert(Arc::clone(&name)) {
                return name;
            }
            trace!("Ancilla name '{}' is taken, skipping", name);
        }
    }

    fn next_id(&self) -> WireId {
        WireId(u32::try_from(self.nodes.len()).expect("wire arena exceeded u32::MAX wires"))
    }

    fn node(&self, wire: WireId) -> &WireNode {
        &self.nodes[wire.0 as usize]
    }

    /// Find the live leaf an operation tagged `id` must act on.
    pub fn resolve(&self, wire: WireId, id: &OperationId) -> CompileResult<WireId> {
        let mut current = wire;
        // A walk from depth d visits at most max_depth - d + 1 nodes.
        for _ in 0..=self.max_depth {
            match &self.node(current).split {
                None => return Ok(current),
                Some(split) => {
                    current = if *id <= split.threshold {
                        split.children[0]
                    } else {
                        split.children[1]
                    };
                }
            }
        }

        Err(CompileError::ResolutionExhausted {
            wire: self.name(wire).to_string(),
            id: id.clone(),
            bound: self.max_depth,
        })
    }

    /// Split the leaf `wire` resolves to under `id` into two children.
    ///
    /// Returns `(continuation, ancilla)`. Only the resolved leaf is changed.
    pub fn split(&mut self, wire: WireId, id: &OperationId) -> CompileResult<(WireId, WireId)> {
        let leaf = self.resolve(wire, id)?;
        let (name, depth, root, line) = {
            let node = self.node(leaf);
            (Arc::clone(&node.name), node.depth + 1, node.root, node.line)
        };

        let ancilla_name = self.fresh_ancilla_name();
        self.ancillas_created += 1;

        let first = self.next_id();
        self.nodes.push(WireNode {
            name,
            depth,
            root,
            line,
            split: None,
        });
        let second = self.next_id();
        self.nodes.push(WireNode {
            name: ancilla_name,
            depth,
            root,
            line: second,
            split: None,
        });

        self.nodes[leaf.0 as usize].split = Some(Split {
            threshold: id.clone(),
            children: [first, second],
        });
        self.max_depth = self.max_depth.max(depth);

        trace!(
            "Split wire '{}' at {} into {} and '{}'",
            self.name(leaf),
            id,
            first,
            self.name(second)
        );

        Ok((first, second))
    }

    /// Split a wire into `n` wires, each split taken on the newest ancilla.
    ///
    /// Returns `[continuation, ancilla, ..., ancilla]`. The last entry is the
    /// wire the logical qubit continues on. With `n <= 1` the resolved leaf is
    /// returned alone.
    pub fn split_n(&mut self, wire: WireId, n: usize, id: &OperationId) -> CompileResult<Vec<WireId>> {
        let mut wires = vec![self.resolve(wire, id)?];
        for _ in 1..n {
            let last = wires.len() - 1;
            let (first, second) = self.split(wires[last], id)?;
            wires[last] = first;
            wires.push(second);
        }
        Ok(wires)
    }

    /// Name of a wire.
    pub fn name(&self, wire: WireId) -> &str {
        &self.node(wire).name
    }

    /// Shared handle to the name of a wire.
    pub fn name_arc(&self, wire: WireId) -> Arc<str> {
        Arc::clone(&self.node(wire).name)
    }

    /// Children of a split wire.
    pub fn children(&self, wire: WireId) -> Option<(WireId, WireId)> {
        self.node(wire)
            .split
            .as_ref()
            .map(|s| (s.children[0], s.children[1]))
    }

    /// Id recorded when the wire was split.
    pub fn threshold(&self, wire: WireId) -> Option<&OperationId> {
        self.node(wire).split.as_ref().map(|s| &s.threshold)
    }

    /// Whether the wire has been split and must no longer be targeted.
    pub fn is_retired(&self, wire: WireId) -> bool {
        self.node(wire).split.is_some()
    }

    /// Number of splits between the wire and its root.
    pub fn depth(&self, wire: WireId) -> u32 {
        self.node(wire).depth
    }

    /// Root wire the wire descends from.
    pub fn root(&self, wire: WireId) -> WireId {
        self.node(wire).root
    }

    /// First wire of the line the wire belongs to.
    ///
    /// This is the root for continuations of an input wire, and the ancilla
    /// itself for continuations of an ancilla.
    pub fn line(&self, wire: WireId) -> WireId {
        self.node(wire).line
    }

    /// Deepest split in the arena.
    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// Number of wires, retired ones included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the arena holds no wires.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of ancilla names handed out.
    pub fn ancillas_created(&self) -> u64 {
        self.ancillas_created
    }

    /// All wires in creation order.
    pub fn wires(&self) -> impl Iterator<Item = WireId> + '_ {
        (0..self.nodes.len()).map(|i| WireId(i as u32))
    }

    /// First wire of every line, in creation order.
    pub fn lines(&self) -> impl Iterator<Item = WireId> + '_ {
        self.wires().filter(|&w| self.line(w) == w)
    }

    /// Live (unsplit) wires in creation order.
    pub fn leaves(&self) -> impl Iterator<Item = WireId> + '_ {
        self.wires().filter(|&w| !self.is_retired(w))
    }
}

impl Default for WireArena {
    fn default() -> Self {
        Self::new()
    }
}
