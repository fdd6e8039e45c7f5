//! Ontology document types.
//!
//! These are the shapes printed to stdout and persisted in the cache. Field
//! names match the JSON consumed by downstream renderers, so the serde
//! attributes here are part of the wire contract.
use serde::{Deserialize, Serialize};

/// A generated ontology for a single domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ontology {
    pub domain: String,

    /// Set when the document was produced on an error path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    #[serde(default)]
    pub relationships: Vec<Relationship>,
}

impl Ontology {
    /// Document returned when the generation service cannot be reached.
    pub fn unreachable(domain: &str, error: impl Into<String>) -> Self {
        Self {
            domain: domain.to_string(),
            error: Some(error.into()),
            relationships: Vec::new(),
        }
    }
}

/// A directed, labeled edge between two entities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    pub from: String,
    pub to: String,
    pub relationship: String,
    #[serde(default)]
    pub from_cardinality: Cardinality,
    #[serde(default)]
    pub to_cardinality: Cardinality,
    #[serde(default)]
    pub category: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<RelationshipDetails>,
}

impl Relationship {
    pub fn new(
        from: impl Into<String>,
        to: impl Into<String>,
        relationship: impl Into<String>,
    ) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            relationship: relationship.into(),
            from_cardinality: Cardinality::default(),
            to_cardinality: Cardinality::default(),
            category: Category::default(),
            details: None,
        }
    }

    pub fn with_cardinality(mut self, from: Cardinality, to: Cardinality) -> Self {
        self.from_cardinality = from;
        self.to_cardinality = to;
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }
}

/// Multiplicity at one end of a relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Cardinality {
    #[default]
    #[serde(rename = "1")]
    One,
    #[serde(rename = "0..1")]
    ZeroOrOne,
    #[serde(rename = "0..*")]
    ZeroOrMany,
    #[serde(rename = "*")]
    Many,
    #[serde(rename = "1..*")]
    OneOrMany,
}

impl Cardinality {
    pub const ALL: [Cardinality; 5] = [
        Cardinality::One,
        Cardinality::ZeroOrOne,
        Cardinality::ZeroOrMany,
        Cardinality::Many,
        Cardinality::OneOrMany,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Cardinality::One => "1",
            Cardinality::ZeroOrOne => "0..1",
            Cardinality::ZeroOrMany => "0..*",
            Cardinality::Many => "*",
            Cardinality::OneOrMany => "1..*",
        }
    }

    /// Exact match against the notation; no trimming or case folding.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|card| card.as_str() == value)
    }
}

/// Coarse semantic class of a relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    IsA,
    PartOf,
    Has,
    Performs,
    #[default]
    AssociatesWith,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::IsA,
        Category::PartOf,
        Category::Has,
        Category::Performs,
        Category::AssociatesWith,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::IsA => "is-a",
            Category::PartOf => "part-of",
            Category::Has => "has",
            Category::Performs => "performs",
            Category::AssociatesWith => "associates-with",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|category| category.as_str() == value)
    }
}

/// Descriptive content attached to a relationship by the enhancer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipDetails {
    pub from_definition: String,
    pub to_definition: String,
    pub relationship_explanation: String,
    pub examples: Vec<String>,
    pub significance: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relationship_serializes_with_wire_field_names() {
        let rel = Relationship::new("Professor", "Course", "teaches")
            .with_cardinality(Cardinality::One, Cardinality::OneOrMany)
            .with_category(Category::Performs);
        let json = serde_json::to_value(&rel).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "from": "Professor",
                "to": "Course",
                "relationship": "teaches",
                "fromCardinality": "1",
                "toCardinality": "1..*",
                "category": "performs"
            })
        );
    }

    #[test]
    fn enum_notation_matches_serde_names() {
        for card in Cardinality::ALL {
            let json = serde_json::to_value(card).unwrap();
            assert_eq!(json, serde_json::Value::String(card.as_str().to_string()));
            assert_eq!(Cardinality::parse(card.as_str()), Some(card));
        }
        for category in Category::ALL {
            let json = serde_json::to_value(category).unwrap();
            assert_eq!(
                json,
                serde_json::Value::String(category.as_str().to_string())
            );
            assert_eq!(Category::parse(category.as_str()), Some(category));
        }
        assert_eq!(Cardinality::parse("many"), None);
        assert_eq!(Category::parse("Is-A"), None);
    }

    #[test]
    fn unreachable_document_has_error_and_no_relationships() {
        let doc = Ontology::unreachable("music", "Cannot connect");
        let text = serde_json::to_string(&doc).unwrap();
        assert_eq!(
            text,
            r#"{"domain":"music","error":"Cannot connect","relationships":[]}"#
        );
    }
}
