//! Model fixtures for SIF search tests

#![allow(dead_code)]

use pathsif::id_fetcher::HgncTable;
use pathsif::model::{
    Complex, Control, Conversion, Element, EntityReference, Model, PhysicalEntity,
    TemplateReaction,
};
use pathsif::types::{ControlType, ConversionKind};

fn ids(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Fluent builder for small pathway models
#[derive(Debug, Default)]
pub struct ModelFixture {
    elements: Vec<Element>,
    symbols: Vec<(String, String)>,
}

impl ModelFixture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Protein reference resolving to `symbol` through an HGNC xref
    pub fn gene(mut self, id: &str, accession: &str, symbol: &str) -> Self {
        self.elements.push(Element::ProteinReference(
            EntityReference::new(id).with_xref("HGNC", accession),
        ));
        self.symbols.push((accession.to_string(), symbol.to_string()));
        self
    }

    /// Protein reference without any cross-reference
    pub fn anonymous_gene(mut self, id: &str) -> Self {
        self.elements
            .push(Element::ProteinReference(EntityReference::new(id)));
        self
    }

    pub fn protein(mut self, id: &str, reference: &str) -> Self {
        self.elements
            .push(Element::Protein(PhysicalEntity::new(id, Some(reference))));
        self
    }

    pub fn complex(mut self, id: &str, components: &[&str]) -> Self {
        self.elements.push(Element::Complex(Complex {
            id: id.to_string(),
            components: ids(components),
            ..Default::default()
        }));
        self
    }

    pub fn conversion(mut self, id: &str, kind: ConversionKind, left: &[&str], right: &[&str]) -> Self {
        self.elements.push(Element::Conversion(Conversion {
            id: id.to_string(),
            kind,
            left: ids(left),
            right: ids(right),
        }));
        self
    }

    pub fn template_reaction(mut self, id: &str, products: &[&str]) -> Self {
        self.elements.push(Element::TemplateReaction(TemplateReaction {
            id: id.to_string(),
            products: ids(products),
        }));
        self
    }

    pub fn control(mut self, id: &str, control_type: ControlType, controllers: &[&str], controlled: &[&str]) -> Self {
        self.elements.push(Element::Control(Control {
            id: id.to_string(),
            control_type: Some(control_type),
            controllers: ids(controllers),
            controlled: ids(controlled),
        }));
        self
    }

    pub fn symbols(&self) -> HgncTable {
        let mut table = HgncTable::new();
        for (accession, symbol) in &self.symbols {
            table.insert(accession, symbol);
        }
        table
    }

    pub fn build(self) -> (Model, HgncTable) {
        let table = self.symbols();
        let model = Model::from_elements(self.elements).expect("fixture ids are unique");
        (model, table)
    }
}

/// TP53 activates a conversion that changes the state of MDM2
pub fn state_change_fixture() -> ModelFixture {
    ModelFixture::new()
        .gene("pr-tp53", "HGNC:11998", "TP53")
        .gene("pr-mdm2", "HGNC:6973", "MDM2")
        .protein("tp53", "pr-tp53")
        .protein("mdm2", "pr-mdm2")
        .protein("mdm2-p", "pr-mdm2")
        .conversion("phosphorylation", ConversionKind::BiochemicalReaction, &["mdm2"], &["mdm2-p"])
        .control("ctl", ControlType::Activation, &["tp53"], &["phosphorylation"])
}

/// `upstream` controls a conversion that consumes `target` and produces nothing
pub fn degradation_fixture(control_type: ControlType) -> ModelFixture {
    ModelFixture::new()
        .gene("pr-a", "1", "CUL1")
        .gene("pr-b", "2", "TP53")
        .protein("a", "pr-a")
        .protein("b", "pr-b")
        .conversion("deg", ConversionKind::Degradation, &["b"], &[])
        .control("ctl", control_type, &["a"], &["deg"])
}

/// `upstream` controls `ctl`, which controls the degradation of TP53
pub fn nested_degradation_fixture(outer: ControlType) -> ModelFixture {
    ModelFixture::new()
        .gene("pr-e3", "1", "E3")
        .gene("pr-tp53", "2", "TP53")
        .gene("pr-up", "3", "UPSTREAM")
        .protein("e3", "pr-e3")
        .protein("tp53", "pr-tp53")
        .protein("up", "pr-up")
        .conversion("deg", ConversionKind::Degradation, &["tp53"], &[])
        .control("ctl", ControlType::Inhibition, &["e3"], &["deg"])
        .control("ctl-outer", outer, &["up"], &["ctl"])
}

/// HK1 and GPI catalyse two steps sharing the intermediate g6p
pub fn pathway_steps_fixture() -> ModelFixture {
    ModelFixture::new()
        .gene("pr-hk1", "4922", "HK1")
        .gene("pr-gpi", "4458", "GPI")
        .anonymous_gene("pr-glc")
        .anonymous_gene("pr-g6p")
        .anonymous_gene("pr-f6p")
        .protein("hk1", "pr-hk1")
        .protein("gpi", "pr-gpi")
        .protein("glc", "pr-glc")
        .protein("g6p", "pr-g6p")
        .protein("f6p", "pr-f6p")
        .conversion("step1", ConversionKind::BiochemicalReaction, &["glc"], &["g6p"])
        .conversion("step2", ConversionKind::BiochemicalReaction, &["g6p"], &["f6p"])
        .control("cat1", ControlType::Activation, &["hk1"], &["step1"])
        .control("cat2", ControlType::Activation, &["gpi"], &["step2"])
}
