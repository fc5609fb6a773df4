/*
 * irgraph - Property-graph extraction from a compiled program's IR
 *
 * Layout:
 * - ir/     : Immutable IR traversal model the builder consumes
 * - slots   : Per-function anonymous-value numbering
 * - graph/  : Node/edge model, builder, instruction renderer, export document
 *
 * One node per distinct instruction, one Entry/Exit sentinel pair per
 * function, FLOWS_TO edges for intra-block sequence and BB_TO edges for
 * control-flow transfer. The resulting collections are consumed by an
 * external exporter; nothing here persists or queries the graph.
 */

pub mod errors;
pub mod graph;
pub mod ir;
pub mod slots;

pub use errors::{GraphError, Result};
pub use graph::builder::GraphBuilder;
pub use graph::{Edge, EdgeLabel, EdgeRecord, GraphDocument, Node, NodeId, NodeRecord};
pub use slots::SlotTracker;
