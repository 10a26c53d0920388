use pretty_assertions::assert_eq;
use sysreg_rs::extract::extract_register;
use sysreg_rs::{expand, AccessInst, Domain, ExecState};

fn first_register<'a, 'i>(doc: &'a roxmltree::Document<'i>) -> roxmltree::Node<'a, 'i> {
    doc.descendants()
        .find(|n| n.has_tag_name("register"))
        .expect("fixture has a <register>")
}

#[test]
fn register_without_access_instructions_is_skipped() {
    let doc = roxmltree::Document::parse(
        r#"<register_page><registers>
             <register execution_state="AArch64">
               <reg_short_name>MIDR_EL1</reg_short_name>
             </register>
           </registers></register_page>"#,
    )
    .unwrap();
    let ex = extract_register(first_register(&doc));
    assert!(ex.templates.is_empty());
}

#[test]
fn banked_and_fp_status_moves_are_skipped() {
    for id in ["MRS_br", "VMRS"] {
        let xml = format!(
            r#"<register execution_state="AArch32">
                 <reg_short_name>SPSR_fiq</reg_short_name>
                 <access_instructions>
                   <access_instruction id="{id}"/>
                   <defvar>
                     <vardef>
                       <enc n="coproc" v="1111"/>
                     </vardef>
                   </defvar>
                 </access_instructions>
               </register>"#
        );
        let doc = roxmltree::Document::parse(&xml).unwrap();
        let ex = extract_register(first_register(&doc));
        assert!(ex.templates.is_empty(), "{id} must contribute nothing");
    }
}

#[test]
fn literal_fields_parse_as_binary() {
    let doc = roxmltree::Document::parse(
        r#"<register execution_state="AArch64">
             <reg_short_name>TTBR0_EL1</reg_short_name>
             <access_instructions>
               <access_instruction id="MRS"/>
               <defvar>
                 <vardef>
                   <enc n="op0" v="11"/>
                   <enc n="op1" v="0"/>
                   <enc n="CRn" v="10"/>
                   <enc n="CRm" v="0"/>
                   <enc n="op2" v="0"/>
                 </vardef>
               </defvar>
             </access_instructions>
           </register>"#,
    )
    .unwrap();
    let ex = extract_register(first_register(&doc));
    assert_eq!(ex.templates.len(), 1);
    let tpl = &ex.templates[0];
    assert_eq!(tpl.reg_name, "TTBR0_EL1");
    assert_eq!(tpl.state, ExecState::AArch64);
    assert_eq!(tpl.access, AccessInst::Mrs);
    assert_eq!(tpl.fields["op0"].bits, 0b11);
    assert_eq!(tpl.fields["CRn"].bits, 0b10);
    assert!(tpl.fields["op0"].slots.is_empty());
}

#[test]
fn whole_field_variables_take_conventional_widths() {
    let doc = roxmltree::Document::parse(
        r#"<register execution_state="AArch64">
             <reg_short_name>DBGBVR&lt;n&gt;_EL1</reg_short_name>
             <access_instructions>
               <access_instruction id="MRS"/>
               <defvar>
                 <vardef>
                   <enc n="CRm" varname="n"/>
                   <enc n="op0" varname="x"/>
                   <enc n="op1" varname="y"/>
                 </vardef>
               </defvar>
             </access_instructions>
           </register>"#,
    )
    .unwrap();
    let ex = extract_register(first_register(&doc));
    let tpl = &ex.templates[0];
    assert_eq!(tpl.reg_name, "DBGBVR<n>_EL1");
    let widths: Vec<(u8, u8)> = ["CRm", "op0", "op1"]
        .iter()
        .map(|f| {
            let s = &tpl.fields[*f].slots[0];
            (s.msb, s.lsb)
        })
        .collect();
    assert_eq!(widths, vec![(3, 0), (1, 0), (2, 0)]);
}

#[test]
fn composite_field_splits_literal_and_variable_ranges() {
    let doc = roxmltree::Document::parse(
        r#"<register execution_state="AArch64">
             <reg_short_name>C&lt;m&gt;</reg_short_name>
             <access_instructions>
               <access_instruction id="MRS"/>
               <defvar>
                 <vardef>
                   <enc n="CRm" width="4">
                     <encbit msb="3" lsb="2" v="10"/>
                     <encbit>
                       <encvar name="m" msb="1" lsb="0"/>
                     </encbit>
                   </enc>
                 </vardef>
               </defvar>
             </access_instructions>
           </register>"#,
    )
    .unwrap();
    let ex = extract_register(first_register(&doc));
    let field = &ex.templates[0].fields["CRm"];
    assert_eq!(field.bits, 0b1000);
    assert_eq!(field.slots.len(), 1);
    assert_eq!(field.slots[0].var, "m");
    assert_eq!((field.slots[0].msb, field.slots[0].lsb), (1, 0));
}

#[test]
fn systemreg_asmname_overrides_the_short_name() {
    let doc = roxmltree::Document::parse(
        r#"<register execution_state="AArch64">
             <reg_short_name>TEECR</reg_short_name>
             <access_instructions>
               <access_instruction id="MRS"/>
               <defvar>
                 <vardef asmname="systemreg" asmvalue="TEECR32_EL1">
                   <enc n="op0" v="11"/>
                 </vardef>
               </defvar>
             </access_instructions>
           </register>"#,
    )
    .unwrap();
    let ex = extract_register(first_register(&doc));
    assert_eq!(ex.templates[0].reg_name, "TEECR32_EL1");
}

#[test]
fn double_register_move_defaults_crn_and_opc2() {
    let doc = roxmltree::Document::parse(
        r#"<register execution_state="AArch32">
             <reg_short_name>PAR</reg_short_name>
             <access_instructions>
               <access_instruction id="MRRC"/>
               <defvar>
                 <vardef>
                   <enc n="coproc" v="1111"/>
                   <enc n="opc1" v="0"/>
                   <enc n="CRm" v="111"/>
                 </vardef>
               </defvar>
             </access_instructions>
           </register>"#,
    )
    .unwrap();
    let ex = extract_register(first_register(&doc));
    let tpl = &ex.templates[0];
    assert_eq!(tpl.fields["CRn"].bits, 0);
    assert_eq!(tpl.fields["opc2"].bits, 0);
    assert_eq!(tpl.fields["coproc"].bits, 0b1111);
    assert_eq!(tpl.fields["CRm"].bits, 0b111);
}

#[test]
fn variable_catalog_reads_bounds_and_enumerations() {
    let doc = roxmltree::Document::parse(
        r#"<register execution_state="AArch64">
             <reg_short_name>DBGBVR&lt;n&gt;_EL1</reg_short_name>
             <access_instructions>
               <access_instruction id="MRS"/>
               <defvar>
                 <vardef>
                   <enc n="CRm" varname="n"/>
                 </vardef>
               </defvar>
               <reg_variables>
                 <reg_variable variable="n" max="4"/>
                 <reg_variable variable="m">
                   <reg_variable_value>1</reg_variable_value>
                   <reg_variable_value>2</reg_variable_value>
                   <reg_variable_value>5</reg_variable_value>
                 </reg_variable>
               </reg_variables>
             </access_instructions>
           </register>"#,
    )
    .unwrap();
    let ex = extract_register(first_register(&doc));
    assert_eq!(ex.vars.resolve("n"), Some(&Domain::UpTo(4)));
    assert_eq!(ex.vars.resolve("m"), Some(&Domain::List(vec![1, 2, 5])));
    assert!(ex.vars.resolve("q").is_none());

    // The extracted register expands straight from its own catalog.
    let regs = expand(&ex.templates[0], &ex.vars).unwrap();
    let names: Vec<&str> = regs.iter().map(|r| r.reg_name.as_str()).collect();
    assert_eq!(
        names,
        vec!["DBGBVR0_EL1", "DBGBVR1_EL1", "DBGBVR2_EL1", "DBGBVR3_EL1"]
    );
}

#[test]
fn each_variant_yields_its_own_template() {
    let doc = roxmltree::Document::parse(
        r#"<register execution_state="AArch32">
             <reg_short_name>MVFR0</reg_short_name>
             <access_instructions>
               <access_instruction id="MRC"/>
               <defvar>
                 <vardef>
                   <enc n="coproc" v="1111"/>
                   <enc n="opc1" v="0"/>
                 </vardef>
                 <vardef>
                   <enc n="coproc" v="1110"/>
                   <enc n="opc1" v="111"/>
                 </vardef>
               </defvar>
             </access_instructions>
           </register>"#,
    )
    .unwrap();
    let ex = extract_register(first_register(&doc));
    assert_eq!(ex.templates.len(), 2);
    assert_eq!(ex.templates[0].fields["coproc"].bits, 0b1111);
    assert_eq!(ex.templates[1].fields["coproc"].bits, 0b1110);
    assert_eq!(ex.templates[1].fields["opc1"].bits, 0b111);
}
