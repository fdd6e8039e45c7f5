//! Deterministic minimal ontology used whenever generation cannot be trusted.
use crate::schema::{Cardinality, Category, Ontology, Relationship};
use crate::util::capitalize;

/// Build the four-edge placeholder ontology for `domain`.
pub fn create_fallback_ontology(domain: &str) -> Ontology {
    Ontology {
        domain: domain.to_string(),
        error: None,
        relationships: fallback_relationships(domain),
    }
}

pub fn fallback_relationships(domain: &str) -> Vec<Relationship> {
    let name = capitalize(domain);
    let entity = |suffix: &str| format!("{name} {suffix}");

    vec![
        Relationship::new(entity("Entity"), entity("Component"), "contains")
            .with_cardinality(Cardinality::One, Cardinality::Many)
            .with_category(Category::PartOf),
        Relationship::new(entity("Component"), entity("Entity"), "is part of")
            .with_cardinality(Cardinality::Many, Cardinality::One)
            .with_category(Category::PartOf),
        Relationship::new(entity("Actor"), entity("Resource"), "uses")
            .with_cardinality(Cardinality::One, Cardinality::OneOrMany)
            .with_category(Category::Performs),
        Relationship::new(entity("Process"), entity("Output"), "produces")
            .with_cardinality(Cardinality::One, Cardinality::ZeroOrMany)
            .with_category(Category::Has),
    ]
}
