//! Graph construction: one pass architecture per function.
//!
//! For each function: reset naming state, create the Entry/Exit sentinel
//! pair, then two full passes over the blocks — the first creates
//! instruction nodes and the intra-block `FLOWS_TO` chain, the second adds
//! the inter-block `BB_TO` edges. Linking relies on the instruction node
//! factory being idempotent, so reaching across block boundaries never
//! duplicates a node.

use ahash::{AHashMap, AHashSet};
use tracing::debug;

use crate::errors::{GraphError, Result};
use crate::graph::render;
use crate::graph::{Edge, EdgeLabel, EdgeRecord, GraphDocument, Node, NodeId, NodeRecord};
use crate::ir::{Block, BlockId, Function, FunctionId, InstId, Module};
use crate::slots::SlotTracker;

/// Entry/Exit sentinel pair of one processed function.
#[derive(Debug, Clone, Copy)]
struct FunctionBoundary {
    entry: NodeId,
    exit: NodeId,
}

/// Accumulates nodes and edges for the functions it is fed.
///
/// Owns the node arena, the insertion-ordered deduplicated edge list, the
/// instruction→node index and the per-function slot tracker. Functions must
/// be processed one complete cycle at a time; naming state never spans two.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    seen_edges: AHashSet<Edge>,
    instruction_index: AHashMap<(FunctionId, InstId), NodeId>,
    boundaries: AHashMap<FunctionId, FunctionBoundary>,
    slots: SlotTracker,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the graph for every function of `module`, in order.
    pub fn build_module(&mut self, module: &Module) -> Result<()> {
        debug!(
            module = module.name(),
            functions = module.len(),
            "building module graph"
        );
        for (id, function) in module.functions() {
            self.build_function(id, function)?;
        }
        Ok(())
    }

    /// Runs one complete construction cycle for `function`.
    ///
    /// Block linking depends on every block's instruction nodes already
    /// existing, so the two block passes are not interleaved.
    pub fn build_function(&mut self, id: FunctionId, function: &Function) -> Result<()> {
        if self.boundaries.contains_key(&id) {
            return Err(GraphError::FunctionAlreadyProcessed {
                function: function.name().to_owned(),
            });
        }
        debug!(function = function.name(), "building function graph");

        self.initialize_function();
        self.create_entry_and_exit_nodes(id);
        for (_, block) in function.blocks() {
            self.register_block_label(block);
            self.create_and_connect_instruction_nodes(id, function, block);
        }
        for (block_id, _) in function.blocks() {
            self.link_block(id, function, block_id)?;
        }
        self.cache_instruction_code(id, function);
        self.finalize_function();

        debug!(
            function = function.name(),
            nodes = self.nodes.len(),
            edges = self.edges.len(),
            "function graph complete"
        );
        Ok(())
    }

    /// Resets per-function naming state. Runs before any node creation.
    fn initialize_function(&mut self) {
        self.slots.reset();
    }

    /// Hook kept for symmetry with `initialize_function`.
    fn finalize_function(&mut self) {}

    /// Creates the function's Entry and Exit sentinels, exactly once.
    fn create_entry_and_exit_nodes(&mut self, id: FunctionId) {
        let entry = self.push_node(Node::Entry { function: id });
        let exit = self.push_node(Node::Exit { function: id });
        self.boundaries.insert(id, FunctionBoundary { entry, exit });
    }

    /// Registers the block's own label with the namer. A block label is
    /// visible even when nothing references the block.
    fn register_block_label(&mut self, block: &Block) {
        self.slots.add(block.label());
    }

    /// Creates the block's instruction nodes in order and chains them with
    /// `FLOWS_TO` edges. The first instruction gets no intra-block
    /// predecessor; inter-block edges come from [`Self::link_block`].
    fn create_and_connect_instruction_nodes(
        &mut self,
        id: FunctionId,
        function: &Function,
        block: &Block,
    ) {
        let mut previous: Option<NodeId> = None;
        for &inst in block.instructions() {
            let current = self.instruction_node(id, function, inst);
            if let Some(previous) = previous {
                self.create_edge(EdgeLabel::FlowsTo, previous, current);
            }
            previous = Some(current);
        }
    }

    /// Adds the block's `BB_TO` edges. Four independent cases: no
    /// predecessors ⇒ Entry into the first instruction; each predecessor's
    /// last instruction into the first; no successors ⇒ last instruction
    /// into Exit; last instruction into each successor's first. A block
    /// with neither predecessors nor successors contributes both sentinel
    /// edges. Self-loops dedup to one edge per direction.
    fn link_block(&mut self, id: FunctionId, function: &Function, block_id: BlockId) -> Result<()> {
        let block = function.block(block_id);

        if block.predecessors().is_empty() {
            let entry = self.boundaries[&id].entry;
            let first = self.first_instruction_node(id, function, block_id)?;
            self.create_edge(EdgeLabel::BbTo, entry, first);
        }
        for &pred in block.predecessors() {
            self.link_block_instructions(id, function, pred, block_id)?;
        }
        if block.successors().is_empty() {
            let last = self.last_instruction_node(id, function, block_id)?;
            let exit = self.boundaries[&id].exit;
            self.create_edge(EdgeLabel::BbTo, last, exit);
        }
        for &succ in block.successors() {
            self.link_block_instructions(id, function, block_id, succ)?;
        }
        Ok(())
    }

    /// `BB_TO` from the source block's last instruction to the target
    /// block's first.
    fn link_block_instructions(
        &mut self,
        id: FunctionId,
        function: &Function,
        source: BlockId,
        target: BlockId,
    ) -> Result<()> {
        let source_node = self.last_instruction_node(id, function, source)?;
        let target_node = self.first_instruction_node(id, function, target)?;
        self.create_edge(EdgeLabel::BbTo, source_node, target_node);
        Ok(())
    }

    /// Idempotent instruction node factory. On first creation the node is
    /// appended, indexed, and — iff the instruction is anonymous with a
    /// non-void result — its result value takes the next naming slot.
    fn instruction_node(&mut self, id: FunctionId, function: &Function, inst: InstId) -> NodeId {
        if let Some(&node) = self.instruction_index.get(&(id, inst)) {
            return node;
        }
        let node = self.push_node(Node::Instruction {
            function: id,
            inst,
            code: None,
        });
        self.instruction_index.insert((id, inst), node);
        if render::needs_slot(function, inst) {
            self.slots.add(function.instruction(inst).result());
        }
        node
    }

    /// Inserts the triple into the deduplicating edge collection. A
    /// structurally identical edge is a no-op.
    fn create_edge(&mut self, label: EdgeLabel, source: NodeId, target: NodeId) {
        let edge = Edge {
            label,
            source,
            target,
        };
        if self.seen_edges.insert(edge) {
            self.edges.push(edge);
        }
    }

    fn first_instruction_node(
        &mut self,
        id: FunctionId,
        function: &Function,
        block: BlockId,
    ) -> Result<NodeId> {
        let inst = function
            .block(block)
            .first_instruction()
            .ok_or_else(|| GraphError::EmptyBlock {
                function: function.name().to_owned(),
                block: block.0,
            })?;
        Ok(self.instruction_node(id, function, inst))
    }

    fn last_instruction_node(
        &mut self,
        id: FunctionId,
        function: &Function,
        block: BlockId,
    ) -> Result<NodeId> {
        let inst = function
            .block(block)
            .last_instruction()
            .ok_or_else(|| GraphError::EmptyBlock {
                function: function.name().to_owned(),
                block: block.0,
            })?;
        Ok(self.instruction_node(id, function, inst))
    }

    /// Renders and caches every instruction node of the finished function
    /// against the function's final naming state.
    fn cache_instruction_code(&mut self, id: FunctionId, function: &Function) {
        let slots = &self.slots;
        for node in &mut self.nodes {
            if let Node::Instruction {
                function: owner,
                inst,
                code,
            } = node
            {
                if *owner == id {
                    *code = Some(render::instruction_code(function, *inst, slots));
                }
            }
        }
    }

    fn push_node(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    // ============================================================
    // Read-only views
    // ============================================================

    /// Nodes in creation order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (NodeId(i as u32), n))
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// Deduplicated edges in insertion order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn entry_node(&self, function: FunctionId) -> Option<NodeId> {
        self.boundaries.get(&function).map(|b| b.entry)
    }

    pub fn exit_node(&self, function: FunctionId) -> Option<NodeId> {
        self.boundaries.get(&function).map(|b| b.exit)
    }

    pub fn node_for_instruction(&self, function: FunctionId, inst: InstId) -> Option<NodeId> {
        self.instruction_index.get(&(function, inst)).copied()
    }

    /// On-demand render against the current naming state. Pure: identical
    /// calls without an intervening function cycle yield identical text.
    pub fn instruction_code(&self, function: &Function, inst: InstId) -> String {
        render::instruction_code(function, inst, &self.slots)
    }

    /// Number of naming slots consumed by the current function.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Snapshots the accumulated graph for the external exporter.
    pub fn to_document(&self, module: &Module) -> GraphDocument {
        let nodes = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, node)| NodeRecord {
                id: i as u32,
                kind: node.kind_str().to_owned(),
                function: module.function(node.function()).name().to_owned(),
                code: node.code().map(str::to_owned),
            })
            .collect();
        let edges = self
            .edges
            .iter()
            .map(|e| EdgeRecord {
                label: e.label,
                source: e.source.0,
                target: e.target.0,
            })
            .collect();
        GraphDocument { nodes, edges }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::TypeKind;

    #[test]
    fn create_edge_deduplicates_the_full_triple() {
        let mut builder = GraphBuilder::new();
        builder.create_edge(EdgeLabel::FlowsTo, NodeId(0), NodeId(1));
        builder.create_edge(EdgeLabel::FlowsTo, NodeId(0), NodeId(1));
        builder.create_edge(EdgeLabel::BbTo, NodeId(0), NodeId(1));

        assert_eq!(builder.edge_count(), 2);
    }

    #[test]
    fn processing_a_function_twice_is_rejected() {
        let mut f = Function::new("f");
        let b = f.add_block(None);
        f.add_instruction(b, "ret", None, TypeKind::Void, &[]);

        let mut builder = GraphBuilder::new();
        builder.build_function(FunctionId(0), &f).unwrap();
        let err = builder.build_function(FunctionId(0), &f).unwrap_err();
        assert!(matches!(err, GraphError::FunctionAlreadyProcessed { .. }));
    }

    #[test]
    fn linking_an_empty_block_is_rejected() {
        let mut f = Function::new("f");
        f.add_block(None);

        let mut builder = GraphBuilder::new();
        let err = builder.build_function(FunctionId(0), &f).unwrap_err();
        assert!(matches!(err, GraphError::EmptyBlock { block: 0, .. }));
    }

    #[test]
    fn boundary_nodes_are_registered_per_function() {
        let mut f = Function::new("f");
        let b = f.add_block(None);
        f.add_instruction(b, "ret", None, TypeKind::Void, &[]);

        let mut builder = GraphBuilder::new();
        builder.build_function(FunctionId(0), &f).unwrap();

        let entry = builder.entry_node(FunctionId(0)).unwrap();
        let exit = builder.exit_node(FunctionId(0)).unwrap();
        assert!(matches!(builder.node(entry), Node::Entry { .. }));
        assert!(matches!(builder.node(exit), Node::Exit { .. }));
        assert!(builder.entry_node(FunctionId(1)).is_none());
    }
}
