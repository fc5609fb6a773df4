//! Immutable IR traversal model consumed by the graph builder.
//!
//! The upstream provider (parser / frontend) populates these structures; the
//! builder only walks them. Functions own three arenas — values, blocks and
//! instructions — addressed by copyable ids, so nodes can hold non-owning
//! back-references into the IR without lifetimes leaking into the graph.

/// Identifies a function within a [`Module`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FunctionId(pub u32);

/// Identifies a basic block within a [`Function`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(pub u32);

/// Identifies an instruction within a [`Function`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstId(pub u32);

/// Identifies a value within a [`Function`].
///
/// Block labels, instruction results and constants all live in one value
/// arena; anonymous-value numbering runs over the same shared namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ValueId(pub u32);

impl FunctionId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl BlockId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl InstId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl ValueId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Result type of a value, reduced to what rendering needs.
///
/// Only the void / non-void distinction drives behavior (void results never
/// take a naming slot and render without an LHS); the remaining variants
/// carry the upstream type through for exporters that want it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Void,
    Int,
    Float,
    Pointer,
    Label,
    Other,
}

impl TypeKind {
    pub fn is_void(self) -> bool {
        matches!(self, TypeKind::Void)
    }
}

/// A value in the IR: a block label, an instruction result or a constant.
#[derive(Debug, Clone)]
pub struct Value {
    name: Option<String>,
    ty: TypeKind,
    text: Option<String>,
}

impl Value {
    /// Symbolic name, if the frontend assigned one.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn ty(&self) -> TypeKind {
        self.ty
    }

    /// Printable form for values the namer never tracks (constants).
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }
}

/// A single IR instruction: result value, opcode mnemonic, ordered operands.
#[derive(Debug, Clone)]
pub struct Instruction {
    result: ValueId,
    opcode: String,
    operands: Vec<ValueId>,
}

impl Instruction {
    /// The value this instruction defines. Void instructions still carry a
    /// result value; its type is [`TypeKind::Void`].
    pub fn result(&self) -> ValueId {
        self.result
    }

    pub fn opcode(&self) -> &str {
        &self.opcode
    }

    pub fn operands(&self) -> &[ValueId] {
        &self.operands
    }
}

/// A basic block: its own label value, ordered instructions, and CFG
/// adjacency as recorded by the upstream provider.
#[derive(Debug, Clone)]
pub struct Block {
    label: ValueId,
    instructions: Vec<InstId>,
    predecessors: Vec<BlockId>,
    successors: Vec<BlockId>,
}

impl Block {
    /// The block's own label value. Visible in the naming namespace even
    /// when nothing references the block.
    pub fn label(&self) -> ValueId {
        self.label
    }

    pub fn instructions(&self) -> &[InstId] {
        &self.instructions
    }

    pub fn first_instruction(&self) -> Option<InstId> {
        self.instructions.first().copied()
    }

    pub fn last_instruction(&self) -> Option<InstId> {
        self.instructions.last().copied()
    }

    pub fn predecessors(&self) -> &[BlockId] {
        &self.predecessors
    }

    pub fn successors(&self) -> &[BlockId] {
        &self.successors
    }
}

/// A function: named, with ordered basic blocks over value/instruction
/// arenas. Construction happens up front; the builder sees it immutable.
#[derive(Debug, Clone)]
pub struct Function {
    name: String,
    values: Vec<Value>,
    blocks: Vec<Block>,
    instructions: Vec<Instruction>,
}

impl Function {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: Vec::new(),
            blocks: Vec::new(),
            instructions: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Appends a new block; its label value is created in the same step.
    pub fn add_block(&mut self, name: Option<&str>) -> BlockId {
        let label = self.push_value(Value {
            name: name.map(str::to_owned),
            ty: TypeKind::Label,
            text: None,
        });
        let id = BlockId(self.blocks.len() as u32);
        self.blocks.push(Block {
            label,
            instructions: Vec::new(),
            predecessors: Vec::new(),
            successors: Vec::new(),
        });
        id
    }

    /// Appends an instruction to `block` and creates its result value.
    pub fn add_instruction(
        &mut self,
        block: BlockId,
        opcode: &str,
        name: Option<&str>,
        ty: TypeKind,
        operands: &[ValueId],
    ) -> InstId {
        let result = self.push_value(Value {
            name: name.map(str::to_owned),
            ty,
            text: None,
        });
        let id = InstId(self.instructions.len() as u32);
        self.instructions.push(Instruction {
            result,
            opcode: opcode.to_owned(),
            operands: operands.to_vec(),
        });
        self.blocks[block.index()].instructions.push(id);
        id
    }

    /// Creates an untracked value with a printable form, e.g. `i32 7`.
    pub fn add_constant(&mut self, text: &str, ty: TypeKind) -> ValueId {
        self.push_value(Value {
            name: None,
            ty,
            text: Some(text.to_owned()),
        })
    }

    /// Records a control-flow edge `from → to` in both adjacency lists.
    pub fn connect(&mut self, from: BlockId, to: BlockId) {
        self.blocks[from.index()].successors.push(to);
        self.blocks[to.index()].predecessors.push(from);
    }

    pub fn value(&self, id: ValueId) -> &Value {
        &self.values[id.index()]
    }

    pub fn instruction(&self, id: InstId) -> &Instruction {
        &self.instructions[id.index()]
    }

    pub fn block(&self, id: BlockId) -> &Block {
        &self.blocks[id.index()]
    }

    /// Blocks in their fixed program order.
    pub fn blocks(&self) -> impl Iterator<Item = (BlockId, &Block)> {
        self.blocks
            .iter()
            .enumerate()
            .map(|(i, b)| (BlockId(i as u32), b))
    }

    pub fn instruction_count(&self) -> usize {
        self.instructions.len()
    }

    fn push_value(&mut self, value: Value) -> ValueId {
        let id = ValueId(self.values.len() as u32);
        self.values.push(value);
        id
    }
}

/// A compilation unit: functions in a fixed order.
#[derive(Debug, Clone, Default)]
pub struct Module {
    name: String,
    functions: Vec<Function>,
}

impl Module {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            functions: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn add_function(&mut self, function: Function) -> FunctionId {
        let id = FunctionId(self.functions.len() as u32);
        self.functions.push(function);
        id
    }

    pub fn function(&self, id: FunctionId) -> &Function {
        &self.functions[id.index()]
    }

    /// Functions in their fixed program order.
    pub fn functions(&self) -> impl Iterator<Item = (FunctionId, &Function)> {
        self.functions
            .iter()
            .enumerate()
            .map(|(i, f)| (FunctionId(i as u32), f))
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connect_maintains_both_adjacency_lists() {
        let mut f = Function::new("f");
        let b0 = f.add_block(Some("entry"));
        let b1 = f.add_block(None);
        f.connect(b0, b1);

        assert_eq!(f.block(b0).successors(), &[b1]);
        assert_eq!(f.block(b1).predecessors(), &[b0]);
        assert!(f.block(b0).predecessors().is_empty());
        assert!(f.block(b1).successors().is_empty());
    }

    #[test]
    fn block_labels_and_results_share_the_value_arena() {
        let mut f = Function::new("f");
        let b0 = f.add_block(None);
        let add = f.add_instruction(b0, "add", None, TypeKind::Int, &[]);

        let label = f.block(b0).label();
        let result = f.instruction(add).result();
        assert_ne!(label, result);
        assert_eq!(f.value(label).ty(), TypeKind::Label);
        assert_eq!(f.value(result).ty(), TypeKind::Int);
    }
}
