// Graph Builder - Property Test Suite
//
// Structural invariants over randomly shaped linear CFGs:
// - node count = instruction count + one sentinel pair
// - FLOWS_TO count = sum of (block length - 1)
// - BB_TO count = blocks + 1 on a linear chain
// - no duplicate edges, one node per instruction
// - rendering is idempotent

use proptest::prelude::*;
use std::collections::HashSet;

use irgraph::ir::{Function, FunctionId, TypeKind};
use irgraph::{EdgeLabel, GraphBuilder};

/// Builds a function of `sizes.len()` blocks chained linearly, block `i`
/// holding `sizes[i]` anonymous instructions (last one void).
fn linear_function(sizes: &[usize]) -> Function {
    let mut f = Function::new("chain");
    let mut blocks = Vec::new();
    for &size in sizes {
        let b = f.add_block(None);
        for i in 0..size {
            if i + 1 == size {
                f.add_instruction(b, "br", None, TypeKind::Void, &[]);
            } else {
                f.add_instruction(b, "add", None, TypeKind::Int, &[]);
            }
        }
        blocks.push(b);
    }
    for pair in blocks.windows(2) {
        f.connect(pair[0], pair[1]);
    }
    f
}

proptest! {
    #[test]
    fn linear_cfg_has_expected_shape(sizes in prop::collection::vec(1usize..=4, 1..=6)) {
        let f = linear_function(&sizes);
        let mut builder = GraphBuilder::new();
        builder.build_function(FunctionId(0), &f).unwrap();

        let total: usize = sizes.iter().sum();
        prop_assert_eq!(builder.node_count(), total + 2);

        let flows = builder
            .edges()
            .iter()
            .filter(|e| e.label == EdgeLabel::FlowsTo)
            .count();
        prop_assert_eq!(flows, sizes.iter().map(|s| s - 1).sum::<usize>());

        // Entry edge + one per chain link + exit edge.
        let bb = builder
            .edges()
            .iter()
            .filter(|e| e.label == EdgeLabel::BbTo)
            .count();
        prop_assert_eq!(bb, sizes.len() + 1);
    }

    #[test]
    fn edges_are_unique_and_instructions_map_one_to_one(
        sizes in prop::collection::vec(1usize..=4, 1..=6)
    ) {
        let f = linear_function(&sizes);
        let mut builder = GraphBuilder::new();
        builder.build_function(FunctionId(0), &f).unwrap();

        let unique: HashSet<_> = builder.edges().iter().copied().collect();
        prop_assert_eq!(unique.len(), builder.edge_count());

        let instruction_nodes = builder
            .nodes()
            .filter(|(_, n)| n.is_instruction())
            .count();
        prop_assert_eq!(instruction_nodes, f.instruction_count());
    }

    #[test]
    fn rendering_is_idempotent(sizes in prop::collection::vec(1usize..=4, 1..=6)) {
        let f = linear_function(&sizes);
        let mut builder = GraphBuilder::new();
        builder.build_function(FunctionId(0), &f).unwrap();

        for (_, node) in builder.nodes() {
            if let irgraph::Node::Instruction { inst, code, .. } = node {
                let fresh = builder.instruction_code(&f, *inst);
                prop_assert_eq!(code.as_deref(), Some(fresh.as_str()));
                prop_assert_eq!(builder.instruction_code(&f, *inst), fresh);
            }
        }
    }
}
