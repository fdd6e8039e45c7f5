//! Batched detail enhancement.
//!
//! Relationships are sent to the model a few at a time; each reply is paired
//! back to the batch by position. Content quality degrades to fixed templates
//! whenever a batch or an individual entry is unusable, so every relationship
//! leaves this stage with fully populated [`RelationshipDetails`].
//!
//! # Degradation rules
//!
//! | Reply for the batch            | Relationship *j* gets            |
//! |--------------------------------|----------------------------------|
//! | array with entry *j*           | entry fields, template per gap   |
//! | array shorter than the batch   | full template (missing entry)    |
//! | request/extraction failure,    | full template (batch failed)     |
//! | non-array or empty array       |                                  |
use crate::client::{GenerateOptions, GenerateRequest, GenerationService};
use crate::config::GeneratorConfig;
use crate::context::RequestContext;
use crate::extract::extract_json;
use crate::prompts;
use crate::schema::{Ontology, Relationship, RelationshipDetails};
use serde_json::{Map, Value};

/// Outcome of one batch request, before pairing.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum BatchReply {
    Entries(Vec<Value>),
    Failed(String),
}

/// Where a single relationship's details come from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum DetailSource<'a> {
    Entry(&'a Value),
    MissingEntry,
    BatchFailed,
}

pub struct DetailEnhancer<'a> {
    service: &'a dyn GenerationService,
    config: &'a GeneratorConfig,
}

impl<'a> DetailEnhancer<'a> {
    pub fn new(service: &'a dyn GenerationService, config: &'a GeneratorConfig) -> Self {
        Self { service, config }
    }

    /// Attach details to every relationship. Never fails.
    pub fn enhance(&self, ctx: &RequestContext, mut ontology: Ontology) -> Ontology {
        let batch_size = self.config.batch_size.max(1);
        tracing::info!(
            domain = %ctx.domain,
            relationships = ontology.relationships.len(),
            batch_size,
            "enhancing relationships with details"
        );
        for (index, batch) in ontology.relationships.chunks_mut(batch_size).enumerate() {
            let reply = self.request_batch(ctx, batch);
            if let BatchReply::Failed(reason) = &reply {
                tracing::warn!(
                    batch = index,
                    error = %reason,
                    "relationship batch enhancement failed; using templated details"
                );
            }
            let sources = pair_batch(batch.len(), &reply);
            for (rel, source) in batch.iter_mut().zip(sources) {
                rel.details = Some(details_for(rel, source));
            }
        }
        ontology
    }

    fn request_batch(&self, ctx: &RequestContext, batch: &[Relationship]) -> BatchReply {
        let options = &self.config.enhance;
        let request = GenerateRequest {
            model: self.config.model.clone(),
            prompt: prompts::enhance_prompt(&ctx.domain, batch),
            system: prompts::enhance_system_prompt().to_string(),
            stream: false,
            options: Some(GenerateOptions {
                num_ctx: options.num_ctx,
                temperature: Some(options.temperature),
                top_p: Some(options.top_p),
            }),
        };
        let text = match self.service.generate(&request) {
            Ok(text) => text,
            Err(err) => return BatchReply::Failed(err.to_string()),
        };
        match extract_json(&text) {
            Ok(Value::Array(entries)) if !entries.is_empty() => BatchReply::Entries(entries),
            Ok(Value::Array(_)) => BatchReply::Failed("empty detail array".to_string()),
            Ok(_) => BatchReply::Failed("detail reply is not an array".to_string()),
            Err(err) => BatchReply::Failed(err.to_string()),
        }
    }
}

/// Index-aligned pairing of a reply with a batch of `len` relationships.
///
/// Extra entries beyond the batch are ignored.
pub(crate) fn pair_batch(len: usize, reply: &BatchReply) -> Vec<DetailSource<'_>> {
    match reply {
        BatchReply::Failed(_) => vec![DetailSource::BatchFailed; len],
        BatchReply::Entries(entries) => (0..len)
            .map(|idx| match entries.get(idx) {
                Some(entry) => DetailSource::Entry(entry),
                None => DetailSource::MissingEntry,
            })
            .collect(),
    }
}

pub(crate) fn details_for(rel: &Relationship, source: DetailSource<'_>) -> RelationshipDetails {
    match source {
        DetailSource::Entry(entry) => match entry.as_object() {
            Some(fields) => merge_entry(rel, fields),
            None => templated_details(rel),
        },
        DetailSource::MissingEntry | DetailSource::BatchFailed => templated_details(rel),
    }
}

/// Details built only from the relationship's own strings.
pub fn templated_details(rel: &Relationship) -> RelationshipDetails {
    RelationshipDetails {
        from_definition: format!("Definition of {}", rel.from),
        to_definition: format!("Definition of {}", rel.to),
        relationship_explanation: format!("How {} {} {}", rel.from, rel.relationship, rel.to),
        examples: vec![format!("Example of {} {} {}", rel.from, rel.relationship, rel.to)],
        significance: format!(
            "Significance of the relationship between {} and {}",
            rel.from, rel.to
        ),
    }
}

fn merge_entry(rel: &Relationship, fields: &Map<String, Value>) -> RelationshipDetails {
    let template = templated_details(rel);
    RelationshipDetails {
        from_definition: text_field(fields, "from_definition").unwrap_or(template.from_definition),
        to_definition: text_field(fields, "to_definition").unwrap_or(template.to_definition),
        relationship_explanation: text_field(fields, "relationship_explanation")
            .unwrap_or(template.relationship_explanation),
        examples: examples_field(fields).unwrap_or(template.examples),
        significance: text_field(fields, "significance").unwrap_or(template.significance),
    }
}

fn text_field(fields: &Map<String, Value>, key: &str) -> Option<String> {
    fields
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

fn examples_field(fields: &Map<String, Value>) -> Option<Vec<String>> {
    let examples: Vec<String> = match fields.get("examples")? {
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(str::to_string)
            .collect(),
        Value::String(text) if !text.trim().is_empty() => vec![text.trim().to_string()],
        _ => Vec::new(),
    };
    (!examples.is_empty()).then_some(examples)
}

#[cfg(test)]
#[path = "enhance_tests.rs"]
mod tests;
