//! Single-component guarantee for relationship graphs.
//!
//! Direction is ignored: two entities are connected if any relationship
//! mentions both. Disconnected components are chained together with
//! synthetic `relates to` edges, one per gap.
use crate::schema::{Cardinality, Category, Ontology, Relationship};
use std::collections::{HashMap, HashSet, VecDeque};

pub const BRIDGE_LABEL: &str = "relates to";

/// Connected components of the undirected graph induced by `relationships`.
///
/// Entities are visited in order of first appearance, so the first member of
/// each component is the earliest-mentioned entity in it.
pub fn connected_components(relationships: &[Relationship]) -> Vec<Vec<String>> {
    let mut order: Vec<&str> = Vec::new();
    let mut adjacency: HashMap<&str, Vec<&str>> = HashMap::new();
    for rel in relationships {
        let (from, to) = (rel.from.as_str(), rel.to.as_str());
        for entity in [from, to] {
            if !adjacency.contains_key(entity) {
                adjacency.insert(entity, Vec::new());
                order.push(entity);
            }
        }
        if let Some(neighbors) = adjacency.get_mut(from) {
            neighbors.push(to);
        }
        if let Some(neighbors) = adjacency.get_mut(to) {
            neighbors.push(from);
        }
    }

    let mut visited: HashSet<&str> = HashSet::new();
    let mut components = Vec::new();
    for &start in &order {
        if !visited.insert(start) {
            continue;
        }
        let mut component = Vec::new();
        let mut queue = VecDeque::from([start]);
        while let Some(current) = queue.pop_front() {
            component.push(current.to_string());
            for &neighbor in adjacency.get(current).into_iter().flatten() {
                if visited.insert(neighbor) {
                    queue.push_back(neighbor);
                }
            }
        }
        components.push(component);
    }
    components
}

/// Append bridge edges until the ontology forms one component.
pub fn enforce_connectivity(mut ontology: Ontology) -> Ontology {
    let components = connected_components(&ontology.relationships);
    if components.len() <= 1 {
        return ontology;
    }
    tracing::info!(
        domain = %ontology.domain,
        components = components.len(),
        "connecting disconnected ontology components"
    );
    let bridges: Vec<Relationship> = components
        .windows(2)
        .map(|pair| bridge(&pair[0][0], &pair[1][0]))
        .collect();
    for rel in &bridges {
        tracing::info!(from = %rel.from, to = %rel.to, "added connecting relationship");
    }
    ontology.relationships.extend(bridges);
    ontology
}

fn bridge(from: &str, to: &str) -> Relationship {
    Relationship::new(from, to, BRIDGE_LABEL)
        .with_cardinality(Cardinality::ZeroOrOne, Cardinality::ZeroOrOne)
        .with_category(Category::AssociatesWith)
}

#[cfg(test)]
#[path = "connectivity_tests.rs"]
mod tests;
