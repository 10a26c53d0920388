use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecState {
    AArch32,
    AArch64,
}

impl ExecState {
    /// Maps the `execution_state` attribute; anything but "AArch64" renders
    /// in the AArch32 layout.
    pub fn from_attr(attr: Option<&str>) -> Self {
        match attr {
            Some("AArch64") => ExecState::AArch64,
            _ => ExecState::AArch32,
        }
    }

    pub fn index_file(self) -> &'static str {
        match self {
            ExecState::AArch32 => "AArch32-regindex.xml",
            ExecState::AArch64 => "AArch64-regindex.xml",
        }
    }
}

/// Instruction family used to read a register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccessInst {
    Mrc,
    Mrc2,
    Mrrc,
    Mrrc2,
    Mrs,
    Vmrs,
    MrsBanked,
}

impl AccessInst {
    pub fn from_id(id: &str) -> Option<Self> {
        Some(match id {
            "MRC" => AccessInst::Mrc,
            "MRC2" => AccessInst::Mrc2,
            "MRRC" => AccessInst::Mrrc,
            "MRRC2" => AccessInst::Mrrc2,
            "MRS" => AccessInst::Mrs,
            "VMRS" => AccessInst::Vmrs,
            "MRS_br" => AccessInst::MrsBanked,
            _ => return None,
        })
    }

    /// Banked and FP/SIMD status moves go through a different access path
    /// and never land in the descriptor table.
    pub fn direct_read(self) -> bool {
        !matches!(self, AccessInst::MrsBanked | AccessInst::Vmrs)
    }
}

/// Unresolved variable occupying bits [msb:lsb] of its field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VarSlot {
    pub var: String,
    pub msb: u8,
    pub lsb: u8,
}

/// One named encoding field: literal bits accumulated from fixed
/// sub-ranges, plus the variable slots still to be filled in. A field with
/// no slots is fully literal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncField {
    pub bits: u32,
    pub slots: Vec<VarSlot>,
}

impl EncField {
    pub fn literal(bits: u32) -> Self {
        Self {
            bits,
            slots: Vec::new(),
        }
    }
}

/// Conventional msb for a whole-field variable (lsb is always 0). The
/// hardware encodings fix CRn/CRm at four bits and op0 at two.
pub fn default_field_msb(field: &str) -> u8 {
    match field {
        "CRn" | "CRm" => 3,
        "op0" => 1,
        _ => 2,
    }
}

/// One register variant before variable substitution.
#[derive(Debug, Clone, Serialize)]
pub struct Template {
    pub reg_name: String,
    pub state: ExecState,
    pub access: AccessInst,
    pub fields: BTreeMap<String, EncField>,
}

/// One fully resolved register instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConcreteReg {
    pub reg_name: String,
    pub state: ExecState,
    pub fields: BTreeMap<String, u32>,
}

impl ConcreteReg {
    /// Encoding positions absent from an access form read as zero.
    pub fn field(&self, name: &str) -> u32 {
        self.fields.get(name).copied().unwrap_or(0)
    }
}
