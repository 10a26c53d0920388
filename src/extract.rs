use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::domain::{Domain, VarCatalog};
use crate::model::{default_field_msb, AccessInst, EncField, ExecState, Template, VarSlot};

/// Everything one `<register>` definition contributes: the templated
/// variants plus the variable catalog they draw from.
#[derive(Debug, Default)]
pub struct Extraction {
    pub templates: Vec<Template>,
    pub vars: VarCatalog,
}

fn find_descendant<'a, 'i>(
    node: roxmltree::Node<'a, 'i>,
    tag: &str,
) -> Option<roxmltree::Node<'a, 'i>> {
    node.descendants().find(|n| n.has_tag_name(tag))
}

/// Walk one `<register>` element. Registers without a readable access form
/// contribute nothing; a malformed variant degrades to zero descriptors
/// rather than aborting the file.
pub fn extract_register(reg: roxmltree::Node) -> Extraction {
    let mut out = Extraction::default();

    let state = ExecState::from_attr(reg.attribute("execution_state"));
    let short_name = find_descendant(reg, "reg_short_name")
        .and_then(|n| n.text())
        .map(str::trim)
        .unwrap_or("")
        .to_string();

    let Some(instructions) = find_descendant(reg, "access_instructions") else {
        debug!(reg = %short_name, "no access instructions, skipping");
        return out;
    };

    let Some(id) = find_descendant(reg, "access_instruction").and_then(|n| n.attribute("id"))
    else {
        warn!(reg = %short_name, "access instruction carries no id, skipping");
        return out;
    };
    let Some(access) = AccessInst::from_id(id) else {
        warn!(reg = %short_name, id, "unknown access instruction, skipping");
        return out;
    };
    if !access.direct_read() {
        debug!(reg = %short_name, ?access, "not readable by a direct move, skipping");
        return out;
    }

    if let Some(vars) = find_descendant(reg, "reg_variables") {
        out.vars = extract_catalog(vars, &short_name);
    }

    for defvar in instructions.children().filter(|n| n.has_tag_name("defvar")) {
        for vardef in defvar.children().filter(|n| n.is_element()) {
            match extract_variant(vardef, &short_name, state, access) {
                Some(tpl) => out.templates.push(tpl),
                None => warn!(reg = %short_name, "malformed variant, skipping"),
            }
        }
    }
    out
}

/// Declared variables: a `max` attribute bounds the range [0, max),
/// otherwise the child elements enumerate the values in document order.
fn extract_catalog(vars: roxmltree::Node, reg: &str) -> VarCatalog {
    let mut catalog = VarCatalog::new();
    for decl in vars.children().filter(|n| n.is_element()) {
        let Some(name) = decl.attribute("variable") else {
            continue;
        };
        let domain = match decl.attribute("max").map(str::parse::<u32>) {
            Some(Ok(max)) => Domain::UpTo(max),
            Some(Err(_)) => {
                warn!(reg, var = name, "unparsable max bound, dropping declaration");
                continue;
            }
            None => Domain::List(
                decl.children()
                    .filter(|n| n.is_element())
                    .filter_map(|n| n.text())
                    .filter_map(|t| t.trim().parse::<u32>().ok())
                    .collect(),
            ),
        };
        catalog.insert(name, domain);
    }
    catalog
}

/// One `vardef` child is one variant encoding of the register.
fn extract_variant(
    vardef: roxmltree::Node,
    short_name: &str,
    state: ExecState,
    access: AccessInst,
) -> Option<Template> {
    // A variant may rename the register for the assembler.
    let reg_name = if vardef.attribute("asmname") == Some("systemreg") {
        vardef.attribute("asmvalue")?.to_string()
    } else {
        short_name.to_string()
    };

    let mut fields: BTreeMap<String, EncField> = BTreeMap::new();
    // Double-register moves carry no CRn/op2 positions; the table still
    // expects the columns.
    fields.insert("CRn".to_string(), EncField::literal(0));
    let op2 = match state {
        ExecState::AArch32 => "opc2",
        ExecState::AArch64 => "op2",
    };
    fields.insert(op2.to_string(), EncField::literal(0));

    for enc in vardef.children().filter(|n| n.is_element()) {
        let name = enc.attribute("n")?;
        let field = if let Some(var) = enc.attribute("varname") {
            // Whole field bound to a variable at its conventional width.
            EncField {
                bits: 0,
                slots: vec![VarSlot {
                    var: var.to_string(),
                    msb: default_field_msb(name),
                    lsb: 0,
                }],
            }
        } else if enc.attribute("width").is_some() {
            composite_field(enc)?
        } else {
            EncField::literal(u32::from_str_radix(enc.attribute("v")?, 2).ok()?)
        };
        fields.insert(name.to_string(), field);
    }

    Some(Template {
        reg_name,
        state,
        access,
        fields,
    })
}

/// Composite field: literal sub-ranges accumulate by shifting into place,
/// named sub-ranges become variable slots at their declared positions.
fn composite_field(enc: roxmltree::Node) -> Option<EncField> {
    let mut field = EncField::default();
    for encbit in enc.children().filter(|n| n.is_element()) {
        if let Some(v) = encbit.attribute("v") {
            let msb: u8 = encbit.attribute("msb")?.parse().ok()?;
            let lsb: u8 = encbit.attribute("lsb")?.parse().ok()?;
            if msb < lsb || msb >= 32 {
                return None;
            }
            let mask = ((1u64 << (msb - lsb + 1)) - 1) as u32;
            let val = u32::from_str_radix(v, 2).ok()?;
            field.bits |= (val & mask) << lsb;
        } else {
            for sub in encbit.children().filter(|n| n.is_element()) {
                let msb: u8 = sub.attribute("msb")?.parse().ok()?;
                let lsb: u8 = sub.attribute("lsb")?.parse().ok()?;
                if msb < lsb || msb >= 32 {
                    return None;
                }
                field.slots.push(VarSlot {
                    var: sub.attribute("name")?.to_string(),
                    msb,
                    lsb,
                });
            }
        }
    }
    Some(field)
}
