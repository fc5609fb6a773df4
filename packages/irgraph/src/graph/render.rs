//! Textual rendering of an instruction into its one-line assignment form.
//!
//! Rendering is a pure function of the instruction and the current slot
//! tracker state; the builder caches the result per node once a function's
//! traversal is complete.

use std::fmt::Write;

use crate::ir::{Function, InstId, ValueId};
use crate::slots::{SlotTracker, UNASSIGNED};

/// Renders `<lhs><opcode> <operands>` for one instruction.
///
/// LHS is `%<name> = ` for named results, `%<slot> = ` for anonymous
/// non-void results, and empty for void results.
pub fn instruction_code(function: &Function, inst: InstId, slots: &SlotTracker) -> String {
    let mut out = String::new();
    render_lhs(&mut out, function, inst, slots);
    render_opcode(&mut out, function, inst);
    render_operands(&mut out, function, inst, slots);
    out
}

/// True iff the instruction's result is anonymous and non-void, i.e. it
/// consumes a naming slot.
pub fn needs_slot(function: &Function, inst: InstId) -> bool {
    let result = function.value(function.instruction(inst).result());
    result.name().is_none() && !result.ty().is_void()
}

fn render_lhs(out: &mut String, function: &Function, inst: InstId, slots: &SlotTracker) {
    let result = function.instruction(inst).result();
    let value = function.value(result);
    if let Some(name) = value.name() {
        let _ = write!(out, "%{name} = ");
    } else if !value.ty().is_void() {
        let _ = write!(out, "%{} = ", slots.slot_index(result));
    }
}

fn render_opcode(out: &mut String, function: &Function, inst: InstId) {
    out.push_str(function.instruction(inst).opcode());
    out.push(' ');
}

fn render_operands(out: &mut String, function: &Function, inst: InstId, slots: &SlotTracker) {
    for (i, &operand) in function.instruction(inst).operands().iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        render_operand(out, function, operand, slots);
    }
}

fn render_operand(out: &mut String, function: &Function, operand: ValueId, slots: &SlotTracker) {
    let value = function.value(operand);
    if let Some(name) = value.name() {
        let _ = write!(out, "%{name}");
        return;
    }
    let slot = slots.slot_index(operand);
    if slot != UNASSIGNED {
        let _ = write!(out, "%{slot}");
    } else if let Some(text) = value.text() {
        out.push_str(text);
    } else {
        // Last resort for unnamed values the namer never tracked.
        let _ = write!(out, "<v{}>", operand.index());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::TypeKind;

    #[test]
    fn named_result_renders_with_its_name() {
        let mut f = Function::new("f");
        let b = f.add_block(None);
        let x = f.add_instruction(b, "alloca", Some("x"), TypeKind::Pointer, &[]);

        let slots = SlotTracker::new();
        assert_eq!(instruction_code(&f, x, &slots), "%x = alloca ");
    }

    #[test]
    fn anonymous_non_void_result_renders_with_its_slot() {
        let mut f = Function::new("f");
        let b = f.add_block(None);
        let add = f.add_instruction(b, "add", None, TypeKind::Int, &[]);

        let mut slots = SlotTracker::new();
        slots.add(f.block(b).label());
        slots.add(f.instruction(add).result());
        assert_eq!(instruction_code(&f, add, &slots), "%1 = add ");
    }

    #[test]
    fn void_result_renders_without_lhs() {
        let mut f = Function::new("f");
        let b = f.add_block(None);
        let ret = f.add_instruction(b, "ret", None, TypeKind::Void, &[]);

        let slots = SlotTracker::new();
        assert_eq!(instruction_code(&f, ret, &slots), "ret ");
        assert!(!needs_slot(&f, ret));
    }

    #[test]
    fn operands_render_name_then_slot_then_text() {
        let mut f = Function::new("f");
        let b = f.add_block(None);
        let named = f.add_instruction(b, "load", Some("p"), TypeKind::Int, &[]);
        let anon = f.add_instruction(b, "mul", None, TypeKind::Int, &[]);
        let constant = f.add_constant("i32 7", TypeKind::Int);
        let named_result = f.instruction(named).result();
        let anon_result = f.instruction(anon).result();
        let add = f.add_instruction(
            b,
            "add",
            None,
            TypeKind::Int,
            &[named_result, anon_result, constant],
        );

        let mut slots = SlotTracker::new();
        slots.add(f.block(b).label());
        slots.add(f.instruction(anon).result());
        slots.add(f.instruction(add).result());
        assert_eq!(instruction_code(&f, add, &slots), "%2 = add %p, %1, i32 7");
    }

    #[test]
    fn untracked_unnamed_operand_falls_back_to_raw_identity() {
        let mut f = Function::new("f");
        let b = f.add_block(None);
        let mystery = f.add_instruction(b, "load", None, TypeKind::Int, &[]);
        let operand = f.instruction(mystery).result();
        let use_it = f.add_instruction(b, "ret", None, TypeKind::Void, &[operand]);

        // Namer never saw the operand: slot is the unassigned sentinel.
        let slots = SlotTracker::new();
        assert_eq!(
            instruction_code(&f, use_it, &slots),
            format!("ret <v{}>", operand.index())
        );
    }
}
