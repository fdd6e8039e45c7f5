//! Prompt assembly for ontology generation and detail enhancement.
//!
//! Templates live in `prompts/` and are embedded at compile time; `{name}`
//! placeholders are substituted here.
use crate::schema::{Cardinality, Category, Relationship};

const ONTOLOGY_SYSTEM: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/prompts/ontology_system.md"
));
const ONTOLOGY_USER: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/prompts/ontology_user.md"
));
const ENHANCE_SYSTEM: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/prompts/enhance_system.md"
));
const ENHANCE_USER: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/prompts/enhance_user.md"
));

pub fn ontology_system_prompt() -> &'static str {
    ONTOLOGY_SYSTEM.trim()
}

pub fn ontology_prompt(domain: &str) -> String {
    let cardinalities = quoted_list(Cardinality::ALL.iter().map(|c| c.as_str()));
    let categories = quoted_list(Category::ALL.iter().map(|c| c.as_str()));
    fill(
        ONTOLOGY_USER,
        &[
            ("cardinalities", cardinalities.as_str()),
            ("categories", categories.as_str()),
            ("domain", domain),
        ],
    )
}

pub fn enhance_system_prompt() -> &'static str {
    ENHANCE_SYSTEM.trim()
}

/// One combined prompt covering every relationship in a batch.
pub fn enhance_prompt(domain: &str, batch: &[Relationship]) -> String {
    let relationships = batch
        .iter()
        .enumerate()
        .map(|(idx, rel)| {
            format!(
                "{}. Relationship: {} {} {}\nAnalyze in depth with comprehensive definitions and examples.",
                idx + 1,
                rel.from,
                rel.relationship,
                rel.to
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    let count = batch.len().to_string();
    fill(
        ENHANCE_USER,
        &[
            ("relationships", relationships.as_str()),
            ("count", count.as_str()),
            ("domain", domain),
        ],
    )
}

/// Substitute `{name}` placeholders in one pass over the template.
///
/// Substituted text is never rescanned, so braces inside values survive.
fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let replaced = after.find('}').and_then(|close| {
            let name = &after[..close];
            values
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value, close))
        });
        match replaced {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

fn quoted_list<'a>(items: impl Iterator<Item = &'a str>) -> String {
    items
        .map(|item| format!("\"{item}\""))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ontology_prompt_names_domain_and_enums() {
        let prompt = ontology_prompt("astronomy");
        assert!(prompt.contains("domain of \"astronomy\""));
        assert!(prompt.contains("\"0..1\", \"0..*\""));
        assert!(prompt.contains("\"associates-with\""));
        assert!(!prompt.contains("{domain}"));
    }

    #[test]
    fn enhance_prompt_lists_batch_in_order() {
        let batch = vec![
            Relationship::new("Star", "Planet", "hosts"),
            Relationship::new("Planet", "Moon", "has"),
        ];
        let prompt = enhance_prompt("astronomy", &batch);
        let first = prompt.find("1. Relationship: Star hosts Planet").unwrap();
        let second = prompt.find("2. Relationship: Planet has Moon").unwrap();
        assert!(first < second);
        assert!(prompt.contains("exactly 2 objects"));
        assert!(!prompt.contains("{relationships}"));
    }

    #[test]
    fn braces_in_relationship_text_are_left_alone() {
        let batch = vec![Relationship::new("Set {domain}", "B", "has {count}")];
        let prompt = enhance_prompt("music", &batch);
        assert!(prompt.contains("1. Relationship: Set {domain} has {count} B"));
        assert!(prompt.contains("exactly 1 objects"));
    }

    #[test]
    fn fill_keeps_unknown_and_unclosed_braces() {
        assert_eq!(
            fill("{a} {x} {\"k\": {b}} {", &[("a", "1"), ("b", "{a}")]),
            "1 {x} {\"k\": {a}} {"
        );
    }
}
