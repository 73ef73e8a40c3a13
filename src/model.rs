//! Read-only pathway model consumed by the graph builder.
//!
//! Elements are plain data keyed by a stable id. Relations between elements
//! are held as id lists, so a model can be assembled in any order and loaded
//! straight from a JSON document.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::types::{ControlType, ConversionKind, ElementClass};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Xref {
    pub db: String,
    pub id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityReference {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub xrefs: Vec<Xref>,
}

impl EntityReference {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into(), ..Default::default() }
    }

    pub fn with_xref(mut self, db: &str, id: &str) -> Self {
        self.xrefs.push(Xref { db: db.to_string(), id: id.to_string() });
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhysicalEntity {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub entity_reference: Option<String>,
    #[serde(default)]
    pub cellular_location: Option<String>,
    #[serde(default)]
    pub xrefs: Vec<Xref>,
}

impl PhysicalEntity {
    pub fn new(id: impl Into<String>, entity_reference: Option<&str>) -> Self {
        Self {
            id: id.into(),
            entity_reference: entity_reference.map(str::to_string),
            ..Default::default()
        }
    }

    pub fn with_xref(mut self, db: &str, id: &str) -> Self {
        self.xrefs.push(Xref { db: db.to_string(), id: id.to_string() });
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Complex {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub components: Vec<String>,
    #[serde(default)]
    pub cellular_location: Option<String>,
    #[serde(default)]
    pub xrefs: Vec<Xref>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Control {
    pub id: String,
    #[serde(default)]
    pub control_type: Option<ControlType>,
    #[serde(default)]
    pub controllers: Vec<String>,
    #[serde(default)]
    pub controlled: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Conversion {
    pub id: String,
    #[serde(default)]
    pub kind: ConversionKind,
    #[serde(default)]
    pub left: Vec<String>,
    #[serde(default)]
    pub right: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemplateReaction {
    pub id: String,
    #[serde(default)]
    pub products: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pathway {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub components: Vec<String>,
    #[serde(default)]
    pub xrefs: Vec<Xref>,
}

/// One element of the pathway model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Element {
    ProteinReference(EntityReference),
    SmallMoleculeReference(EntityReference),
    Protein(PhysicalEntity),
    SmallMolecule(PhysicalEntity),
    Complex(Complex),
    Control(Control),
    Conversion(Conversion),
    TemplateReaction(TemplateReaction),
    Pathway(Pathway),
}

impl Element {
    pub fn id(&self) -> &str {
        match self {
            Element::ProteinReference(e) | Element::SmallMoleculeReference(e) => &e.id,
            Element::Protein(e) | Element::SmallMolecule(e) => &e.id,
            Element::Complex(e) => &e.id,
            Element::Control(e) => &e.id,
            Element::Conversion(e) => &e.id,
            Element::TemplateReaction(e) => &e.id,
            Element::Pathway(e) => &e.id,
        }
    }

    /// Most specific class of this element.
    pub fn class(&self) -> ElementClass {
        match self {
            Element::ProteinReference(_) => ElementClass::ProteinReference,
            Element::SmallMoleculeReference(_) => ElementClass::SmallMoleculeReference,
            Element::Protein(_) => ElementClass::Protein,
            Element::SmallMolecule(_) => ElementClass::SmallMolecule,
            Element::Complex(_) => ElementClass::Complex,
            Element::Control(_) => ElementClass::Control,
            Element::Conversion(c) if c.kind == ConversionKind::Degradation => {
                ElementClass::Degradation
            }
            Element::Conversion(_) => ElementClass::Conversion,
            Element::TemplateReaction(_) => ElementClass::TemplateReaction,
            Element::Pathway(_) => ElementClass::Pathway,
        }
    }

    pub fn is_a(&self, class: ElementClass) -> bool {
        self.class().is_a(class)
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Element::ProteinReference(e) | Element::SmallMoleculeReference(e) => e.name.as_deref(),
            Element::Protein(e) | Element::SmallMolecule(e) => e.name.as_deref(),
            Element::Complex(e) => e.name.as_deref(),
            Element::Pathway(e) => e.name.as_deref(),
            Element::Control(_) | Element::Conversion(_) | Element::TemplateReaction(_) => None,
        }
    }

    /// Cross-references, empty for elements that cannot carry any.
    pub fn xrefs(&self) -> &[Xref] {
        match self {
            Element::ProteinReference(e) | Element::SmallMoleculeReference(e) => &e.xrefs,
            Element::Protein(e) | Element::SmallMolecule(e) => &e.xrefs,
            Element::Complex(e) => &e.xrefs,
            Element::Pathway(e) => &e.xrefs,
            Element::Control(_) | Element::Conversion(_) | Element::TemplateReaction(_) => &[],
        }
    }

    pub fn entity_reference(&self) -> Option<&str> {
        match self {
            Element::Protein(e) | Element::SmallMolecule(e) => e.entity_reference.as_deref(),
            _ => None,
        }
    }

    pub fn cellular_location(&self) -> Option<&str> {
        match self {
            Element::Protein(e) | Element::SmallMolecule(e) => e.cellular_location.as_deref(),
            Element::Complex(e) => e.cellular_location.as_deref(),
            _ => None,
        }
    }

    /// Control type of a control element.
    pub fn control_type(&self) -> Option<ControlType> {
        match self {
            Element::Control(c) => c.control_type,
            _ => None,
        }
    }
}

#[derive(Deserialize)]
struct ModelDocument {
    elements: Vec<Element>,
}

/// Element store with lookup by id. Never mutated by the search layers.
#[derive(Debug, Clone, Default)]
pub struct Model {
    elements: Vec<Element>,
    index: HashMap<String, usize>,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_elements(elements: impl IntoIterator<Item = Element>) -> Result<Self> {
        let mut model = Model::new();
        for element in elements {
            model.add(element)?;
        }
        Ok(model)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let doc: ModelDocument = serde_json::from_str(json)?;
        Self::from_elements(doc.elements)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let model = Self::from_json_str(&content)?;
        debug!(path = %path.display(), elements = model.len(), "Loaded model");
        Ok(model)
    }

    pub fn add(&mut self, element: Element) -> Result<()> {
        let id = element.id().to_string();
        if self.index.contains_key(&id) {
            return Err(Error::DuplicateElement(id));
        }
        self.index.insert(id, self.elements.len());
        self.elements.push(element);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&Element> {
        self.index.get(id).map(|&i| &self.elements[i])
    }

    /// All elements in insertion order.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.elements.iter()
    }

    pub fn elements_of(&self, class: ElementClass) -> impl Iterator<Item = &Element> {
        self.elements.iter().filter(move |e| e.is_a(class))
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}
