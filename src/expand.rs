use std::collections::BTreeMap;
use tracing::debug;

use crate::domain::VarCatalog;
use crate::model::{ConcreteReg, Template};

#[derive(thiserror::Error, Debug)]
pub enum ExpandError {
    #[error("register {reg}: no domain declared for variable `{var}`")]
    UnresolvedVariable { reg: String, var: String },
}

/// Where one free variable lands: field name plus bit slice.
#[derive(Debug)]
struct Location {
    field: String,
    msb: u8,
    lsb: u8,
}

#[derive(Debug)]
struct FreeVar {
    name: String,
    locations: Vec<Location>,
}

/// Free variables of a template in field order, a repeated name merged
/// into one variable with several locations.
fn free_vars(tpl: &Template) -> Vec<FreeVar> {
    let mut vars: Vec<FreeVar> = Vec::new();
    for (field, enc) in &tpl.fields {
        for slot in &enc.slots {
            let loc = Location {
                field: field.clone(),
                msb: slot.msb,
                lsb: slot.lsb,
            };
            match vars.iter_mut().find(|v| v.name == slot.var) {
                Some(v) => v.locations.push(loc),
                None => vars.push(FreeVar {
                    name: slot.var.clone(),
                    locations: vec![loc],
                }),
            }
        }
    }
    vars
}

/// Cross-product of domain value tuples, last variable varying fastest.
/// No domains yields the single empty tuple.
fn value_tuples(domains: &[Vec<u32>]) -> Vec<Vec<u32>> {
    let mut tuples: Vec<Vec<u32>> = vec![Vec::new()];
    for dom in domains {
        let mut next = Vec::with_capacity(tuples.len() * dom.len());
        for stem in &tuples {
            for &v in dom {
                let mut t = stem.clone();
                t.push(v);
                next.push(t);
            }
        }
        tuples = next;
    }
    tuples
}

fn substitute_name(name: &str, bindings: &BTreeMap<&str, u32>) -> String {
    let mut out = name.to_string();
    for (var, val) in bindings {
        out = out.replace(&format!("<{var}>"), &val.to_string());
    }
    out
}

/// Expand one template into the full cross-product of concrete registers.
/// A template with no free variables yields exactly itself.
pub fn expand(tpl: &Template, catalog: &VarCatalog) -> Result<Vec<ConcreteReg>, ExpandError> {
    let vars = free_vars(tpl);

    // Resolve every domain before generating anything; a variable without
    // a declaration fails the whole register instead of emitting a partial
    // table.
    let mut domains = Vec::with_capacity(vars.len());
    for v in &vars {
        let dom = catalog
            .resolve(&v.name)
            .ok_or_else(|| ExpandError::UnresolvedVariable {
                reg: tpl.reg_name.clone(),
                var: v.name.clone(),
            })?;
        debug!(var = %v.name, count = dom.len(), "resolved domain");
        domains.push(dom.values());
    }

    let base: BTreeMap<String, u32> = tpl
        .fields
        .iter()
        .map(|(name, f)| (name.clone(), f.bits))
        .collect();

    let mut out = Vec::new();
    for tuple in value_tuples(&domains) {
        let mut fields = base.clone();
        let mut bindings: BTreeMap<&str, u32> = BTreeMap::new();
        for (v, &val) in vars.iter().zip(&tuple) {
            for loc in &v.locations {
                let mask = ((1u64 << (loc.msb - loc.lsb + 1)) - 1) as u32;
                // OR over the literal bits already accumulated in the field.
                *fields.entry(loc.field.clone()).or_insert(0) |= (val & mask) << loc.lsb;
            }
            bindings.insert(&v.name, val);
        }
        let reg_name = substitute_name(&tpl.reg_name, &bindings);
        debug!(reg = %reg_name, ?tuple, "generated instance");
        out.push(ConcreteReg {
            reg_name,
            state: tpl.state,
            fields,
        });
    }
    Ok(out)
}
