use crate::model::{ConcreteReg, ExecState};

/// One C table initializer per register, in the field order of its
/// execution state. Columns absent from that encoding render as 0.
pub fn render_row(reg: &ConcreteReg) -> String {
    match reg.state {
        ExecState::AArch64 => format!(
            "{{ ARM64_REG_{:<16}, {:4}, {:4}, {:4}, {:4}, {:4}, {:4} }},",
            reg.reg_name,
            0,
            reg.field("CRn"),
            reg.field("CRm"),
            reg.field("op0"),
            reg.field("op1"),
            reg.field("op2"),
        ),
        ExecState::AArch32 => format!(
            "{{ ARM_REG_{:<16}, {:4}, {:4}, {:4}, {:4}, {:4}, {:4} }},",
            reg.reg_name,
            reg.field("coproc"),
            reg.field("CRn"),
            reg.field("CRm"),
            0,
            reg.field("opc1"),
            reg.field("opc2"),
        ),
    }
}

pub fn render_table(regs: &[ConcreteReg]) -> String {
    let mut out = String::new();
    for r in regs {
        out.push_str(&render_row(r));
        out.push('\n');
    }
    out
}
