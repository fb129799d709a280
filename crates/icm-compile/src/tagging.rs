//! Operation tagging.
//!
//! Host instructions carry no identity of their own, so the engine wraps
//! them in [`TaggedOp`], pairing an instruction kind and its wires with an
//! optional [`OperationId`].

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use icm_ir::{Circuit, InstructionKind, QubitId};

use crate::operation_id::OperationId;

/// A set of instruction names, e.g. `{"t", "tdg"}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct GateSet {
    names: FxHashSet<String>,
}

impl GateSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// The T gate and its inverse.
    pub fn t_gates() -> Self {
        Self::from_names(["t", "tdg"])
    }

    /// Every gate that has an ICM gadget.
    pub fn decomposable() -> Self {
        Self::from_names(["t", "tdg", "h", "s", "sdg"])
    }

    /// Create a set from names. Names are lower-cased.
    pub fn from_names(names: impl IntoIterator<Item = impl AsRef<str>>) -> Self {
        Self {
            names: names
                .into_iter()
                .map(|n| n.as_ref().trim().to_ascii_lowercase())
                .filter(|n| !n.is_empty())
                .collect(),
        }
    }

    /// Add a name.
    pub fn insert(&mut self, name: impl AsRef<str>) {
        self.names.insert(name.as_ref().to_ascii_lowercase());
    }

    /// Remove a name.
    pub fn remove(&mut self, name: &str) -> bool {
        self.names.remove(name)
    }

    /// Check whether a name is in the set.
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Union of two sets.
    #[must_use]
    pub fn union(&self, other: &GateSet) -> GateSet {
        Self {
            names: self.names.union(&other.names).cloned().collect(),
        }
    }

    /// Number of names.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.names.iter().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl From<Vec<String>> for GateSet {
    fn from(names: Vec<String>) -> Self {
        Self::from_names(names)
    }
}

impl From<GateSet> for Vec<String> {
    fn from(set: GateSet) -> Self {
        set.names().into_iter().map(String::from).collect()
    }
}

/// An instruction kind applied to wires, with an optional id.
///
/// `W` is the wire handle: [`QubitId`] for host circuits and
/// [`WireId`](crate::wire::WireId) inside the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct TaggedOp<W> {
    /// What the operation does.
    pub kind: InstructionKind,
    /// Wires the operation acts on, in operand order.
    pub wires: Vec<W>,
    /// Id assigned by tagging, if any.
    pub id: Option<OperationId>,
}

impl<W> TaggedOp<W> {
    /// Create an untagged operation.
    pub fn new(kind: InstructionKind, wires: impl IntoIterator<Item = W>) -> Self {
        Self {
            kind,
            wires: wires.into_iter().collect(),
            id: None,
        }
    }

    /// Attach an id.
    #[must_use]
    pub fn with_id(mut self, id: OperationId) -> Self {
        self.id = Some(id);
        self
    }

    /// Name of the instruction.
    pub fn name(&self) -> &str {
        self.kind.name()
    }

    /// Whether the operation carries an id.
    pub fn is_tagged(&self) -> bool {
        self.id.is_some()
    }
}

/// An ordered list of possibly tagged operations.
#[derive(Debug, Clone, PartialEq)]
pub struct TaggedCircuit<W> {
    ops: Vec<TaggedOp<W>>,
}

impl<W> TaggedCircuit<W> {
    /// Create a circuit from operations, keeping their order.
    pub fn new(ops: Vec<TaggedOp<W>>) -> Self {
        Self { ops }
    }

    /// Operations in order.
    pub fn ops(&self) -> &[TaggedOp<W>] {
        &self.ops
    }

    /// Mutable access to the operations.
    pub fn ops_mut(&mut self) -> &mut [TaggedOp<W>] {
        &mut self.ops
    }

    /// Consume the circuit, returning its operations.
    pub fn into_ops(self) -> Vec<TaggedOp<W>> {
        self.ops
    }

    /// Number of operations.
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Whether there are no operations.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Rebuild the circuit over a different wire handle.
    pub fn map_wires<V, E>(
        self,
        mut f: impl FnMut(W) -> Result<V, E>,
    ) -> Result<TaggedCircuit<V>, E> {
        let ops = self
            .ops
            .into_iter()
            .map(|op| {
                let wires = op.wires.into_iter().map(&mut f).collect::<Result<Vec<_>, E>>()?;
                Ok(TaggedOp {
                    kind: op.kind,
                    wires,
                    id: op.id,
                })
            })
            .collect::<Result<Vec<_>, E>>()?;
        Ok(TaggedCircuit { ops })
    }
}

impl TaggedCircuit<QubitId> {
    /// Lift a host circuit into untagged operations, in moment order.
    pub fn from_circuit(circuit: &Circuit) -> Self {
        Self::new(
            circuit
                .operations()
                .into_iter()
                .map(|inst| TaggedOp::new(inst.kind.clone(), inst.qubits.iter().copied()))
                .collect(),
        )
    }
}

/// Assigns ids to operations whose names are in a [`GateSet`].
#[derive(Debug, Clone)]
pub struct Tagger {
    gates: GateSet,
}

impl Tagger {
    /// Create a tagger for the given names.
    pub fn new(gates: GateSet) -> Self {
        Self { gates }
    }

    /// The names this tagger matches.
    pub fn gates(&self) -> &GateSet {
        &self.gates
    }

    /// Tag every matching operation with its ordinal among matching
    /// operations. Operations that already carry an id keep it.
    ///
    /// Returns the number of operations that received a new id.
    pub fn tag<W>(&self, circuit: &mut TaggedCircuit<W>) -> usize {
        let mut ordinal = 0u64;
        let mut tagged = 0;
        for op in circuit.ops_mut() {
            if !self.gates.contains(op.name()) {
                continue;
            }
            if op.id.is_none() {
                op.id = Some(OperationId::new(ordinal));
                tagged += 1;
            }
            ordinal += 1;
        }
        tagged
    }

    /// Remove the ids of every matching operation.
    ///
    /// Returns the number of ids removed.
    pub fn strip<W>(&self, circuit: &mut TaggedCircuit<W>) -> usize {
        circuit
            .ops_mut()
            .iter_mut()
            .filter(|op| self.gates.contains(op.name()))
            .filter_map(|op| op.id.take())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use icm_ir::QubitId;

    fn scenario() -> Circuit {
        let mut circuit = Circuit::with_qubits("scenario", ["a", "b", "c"]).unwrap();
        let (a, b, c) = (QubitId(0), QubitId(1), QubitId(2));
        circuit
            .t(a)
            .unwrap()
            .t(b)
            .unwrap()
            .cx(a, b)
            .unwrap()
            .s(a)
            .unwrap()
            .cx(b, c)
            .unwrap()
            .t(c)
            .unwrap();
        circuit
    }

    fn ids<W>(circuit: &TaggedCircuit<W>) -> Vec<Option<String>> {
        circuit
            .ops()
            .iter()
            .map(|op| op.id.as_ref().map(ToString::to_string))
            .collect()
    }

    #[test]
    fn test_tag_matching_only() {
        let mut tagged = TaggedCircuit::from_circuit(&scenario());
        let count = Tagger::new(GateSet::t_gates()).tag(&mut tagged);

        assert_eq!(count, 3);
        let names: Vec<_> = tagged.ops().iter().map(TaggedOp::name).collect();
        assert_eq!(names, ["t", "t", "cx", "s", "cx", "t"]);
        assert_eq!(
            ids(&tagged),
            [
                Some("0".into()),
                Some("1".into()),
                None,
                None,
                None,
                Some("2".into())
            ]
        );
    }

    #[test]
    fn test_tag_is_idempotent() {
        let mut tagged = TaggedCircuit::from_circuit(&scenario());
        let tagger = Tagger::new(GateSet::from_names(["t", "s"]));

        assert_eq!(tagger.tag(&mut tagged), 4);
        let first = ids(&tagged);
        assert_eq!(tagger.tag(&mut tagged), 0);
        assert_eq!(ids(&tagged), first);
    }

    #[test]
    fn test_strip_then_retag() {
        let mut tagged = TaggedCircuit::from_circuit(&scenario());
        let tagger = Tagger::new(GateSet::t_gates());
        tagger.tag(&mut tagged);
        let first = ids(&tagged);

        assert_eq!(tagger.strip(&mut tagged), 3);
        assert!(tagged.ops().iter().all(|op| !op.is_tagged()));
        tagger.tag(&mut tagged);
        assert_eq!(ids(&tagged), first);
    }

    #[test]
    fn test_empty_gate_set_tags_nothing() {
        let mut tagged = TaggedCircuit::from_circuit(&scenario());
        assert_eq!(Tagger::new(GateSet::new()).tag(&mut tagged), 0);
    }

    #[test]
    fn test_gate_set_normalizes_names() {
        let set = GateSet::from_names([" T ", "Tdg", ""]);
        assert_eq!(set.names(), ["t", "tdg"]);
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"["t","tdg"]"#);
    }
}
