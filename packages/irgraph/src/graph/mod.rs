//! Property-graph model: nodes, labeled edges, and the exported document.
//!
//! Nodes live in an arena owned by the builder and are addressed by
//! [`NodeId`]; edges carry value identity so a structurally identical edge
//! inserted twice deduplicates to one.

pub mod builder;
pub mod render;

use serde::{Deserialize, Serialize};

use crate::ir::{FunctionId, InstId};

/// Index into the builder's node arena. Stable for the builder's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A graph node: one per distinct instruction, plus one Entry/Exit sentinel
/// pair per function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Wraps one IR instruction. `code` is the rendered assignment form,
    /// cached once the owning function's build completes.
    Instruction {
        function: FunctionId,
        inst: InstId,
        code: Option<String>,
    },
    /// Function entry sentinel.
    Entry { function: FunctionId },
    /// Function exit sentinel.
    Exit { function: FunctionId },
}

impl Node {
    pub fn function(&self) -> FunctionId {
        match *self {
            Node::Instruction { function, .. }
            | Node::Entry { function }
            | Node::Exit { function } => function,
        }
    }

    pub fn is_instruction(&self) -> bool {
        matches!(self, Node::Instruction { .. })
    }

    /// Rendered text of an instruction node, once cached. Sentinels have none.
    pub fn code(&self) -> Option<&str> {
        match self {
            Node::Instruction { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    pub fn kind_str(&self) -> &'static str {
        match self {
            Node::Instruction { .. } => "INSTRUCTION",
            Node::Entry { .. } => "ENTRY",
            Node::Exit { .. } => "EXIT",
        }
    }
}

/// Edge label. The string forms are the wire labels the exporter writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EdgeLabel {
    /// Sequential same-block instruction order.
    #[serde(rename = "FLOWS_TO")]
    FlowsTo,
    /// Control-flow transfer: Entry into a block, block to block, or a
    /// terminal block into Exit.
    #[serde(rename = "BB_TO")]
    BbTo,
}

impl EdgeLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            EdgeLabel::FlowsTo => "FLOWS_TO",
            EdgeLabel::BbTo => "BB_TO",
        }
    }
}

/// A labeled directed edge. Identity is the full triple, which is what the
/// builder's dedup set keys on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Edge {
    pub label: EdgeLabel,
    pub source: NodeId,
    pub target: NodeId,
}

// ============================================================
// Exported document
// ============================================================

/// Flat node record for the external exporter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: u32,
    pub kind: String,
    pub function: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// Flat edge record for the external exporter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub label: EdgeLabel,
    pub source: u32,
    pub target: u32,
}

/// Snapshot of the accumulated graph, ready for serialization. The builder
/// produces it; persistence and querying live elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphDocument {
    pub nodes: Vec<NodeRecord>,
    pub edges: Vec<EdgeRecord>,
}

impl GraphDocument {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
