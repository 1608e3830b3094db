//! Concept sets and vocabulary concepts

use serde::{Deserialize, Serialize};

/// A vocabulary concept, as carried inside a concept set expression.
///
/// Field names follow the upper-case wire convention of the vocabulary
/// export format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Concept {
    /// Unique concept identifier
    #[serde(rename = "CONCEPT_ID")]
    pub concept_id: i64,
    /// Human-readable concept name
    #[serde(rename = "CONCEPT_NAME", default)]
    pub concept_name: String,
    /// Source code for the concept
    #[serde(rename = "CONCEPT_CODE", default)]
    pub concept_code: String,
    /// Domain the concept belongs to (e.g., "Condition")
    #[serde(rename = "DOMAIN_ID", default)]
    pub domain_id: String,
    /// Vocabulary the concept comes from (e.g., "SNOMED")
    #[serde(rename = "VOCABULARY_ID", default)]
    pub vocabulary_id: String,
    /// "S" when the concept is a standard concept
    #[serde(rename = "STANDARD_CONCEPT", default)]
    pub standard_concept: Option<String>,
    /// Reason the concept was invalidated, when it was
    #[serde(rename = "INVALID_REASON", default)]
    pub invalid_reason: Option<String>,
}

impl Concept {
    /// Create a concept carrying only its identifier
    pub fn with_id(concept_id: i64) -> Self {
        Self {
            concept_id,
            concept_name: String::new(),
            concept_code: String::new(),
            domain_id: String::new(),
            vocabulary_id: String::new(),
            standard_concept: None,
            invalid_reason: None,
        }
    }
}

/// One entry of a concept set expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConceptSetItem {
    /// The concept this entry refers to
    pub concept: Concept,
    /// Whether descendants of the concept are included as well
    #[serde(rename = "includeDescendants", default)]
    pub include_descendants: bool,
    /// Whether source codes mapped to the concept are included
    #[serde(rename = "includeMapped", default)]
    pub include_mapped: bool,
    /// Whether this entry subtracts from the set instead of adding to it
    #[serde(rename = "isExcluded", default)]
    pub is_excluded: bool,
}

impl ConceptSetItem {
    /// Create an including entry for a concept
    pub fn new(concept: Concept) -> Self {
        Self {
            concept,
            include_descendants: false,
            include_mapped: false,
            is_excluded: false,
        }
    }

    /// Include descendants of the concept
    pub fn with_descendants(mut self) -> Self {
        self.include_descendants = true;
        self
    }

    /// Mark the entry as an exclusion
    pub fn excluded(mut self) -> Self {
        self.is_excluded = true;
        self
    }
}

/// The expression body of a concept set
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ConceptSetExpression {
    /// Entries making up the set
    #[serde(default)]
    pub items: Vec<ConceptSetItem>,
}

/// A named, numbered concept set referenced by criteria via its id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConceptSet {
    /// Identifier criteria use to reference this set
    pub id: i32,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// The set's expression
    #[serde(default)]
    pub expression: ConceptSetExpression,
}

impl ConceptSet {
    /// Create a named concept set
    pub fn new(id: i32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            expression: ConceptSetExpression::default(),
        }
    }

    /// Set the expression items
    pub fn with_items(mut self, items: Vec<ConceptSetItem>) -> Self {
        self.expression.items = items;
        self
    }
}
