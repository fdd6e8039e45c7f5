//! End-to-end ontology generation.
//!
//! ```text
//! cache check ─hit──────────────────────────────────────────────▶ cached doc
//!     │miss
//! probe ─unreachable────────────────────────────────────────────▶ error doc
//!     │
//! dispatch ▶ extract ▶ normalize ▶ connect ▶ enhance ▶ cache write ▶ doc
//! ```
//!
//! [`Generator::generate_ontology`] never fails: extraction problems and
//! empty results fall back to the placeholder relationships. A failed
//! generation request also yields the placeholder set, connected and with
//! templated details; only transport and decode failures annotate it with
//! `error`, since a status reply means the service answered.
use crate::cache::CacheStore;
use crate::client::{GenerateOptions, GenerateRequest, GenerationService, ServiceError};
use crate::config::GeneratorConfig;
use crate::connectivity::enforce_connectivity;
use crate::context::RequestContext;
use crate::enhance::{templated_details, DetailEnhancer};
use crate::extract::extract_json;
use crate::fallback::{create_fallback_ontology, fallback_relationships};
use crate::normalize::{normalize_relationships, raw_relationships};
use crate::prompts;
use crate::schema::Ontology;
use crate::util::truncate_string;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("ontology request failed: {0}")]
    Dispatch(#[from] ServiceError),
}

impl GenerationError {
    /// Message for the document's `error` field, if this failure warrants one.
    pub fn annotation(&self) -> Option<String> {
        match self {
            Self::Dispatch(ServiceError::Status { .. }) => None,
            Self::Dispatch(_) => Some(self.to_string()),
        }
    }
}

/// How the cache participates in a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheMode {
    /// Read before generating, write after.
    #[default]
    ReadWrite,
    /// Skip the read but store the fresh result.
    Refresh,
}

pub struct Generator<'a> {
    service: &'a dyn GenerationService,
    cache: &'a dyn CacheStore,
    config: &'a GeneratorConfig,
    cache_mode: CacheMode,
}

impl<'a> Generator<'a> {
    pub fn new(
        service: &'a dyn GenerationService,
        cache: &'a dyn CacheStore,
        config: &'a GeneratorConfig,
    ) -> Self {
        Self {
            service,
            cache,
            config,
            cache_mode: CacheMode::default(),
        }
    }

    pub fn with_cache_mode(mut self, cache_mode: CacheMode) -> Self {
        self.cache_mode = cache_mode;
        self
    }

    /// Produce an ontology for `domain`. Never fails.
    pub fn generate_ontology(&self, domain: &str, num_ctx: u32) -> Ontology {
        let ctx = RequestContext::new(domain, num_ctx);

        if self.cache_mode == CacheMode::ReadWrite {
            if let Some(cached) = self.cache.get(&ctx.domain) {
                return cached;
            }
        }

        if let Err(err) = self.service.probe() {
            tracing::error!(error = %err, "generation service unreachable");
            return Ontology::unreachable(&ctx.domain, err.to_string());
        }

        match self.synthesize(&ctx) {
            Ok(ontology) => {
                if let Err(err) = self.cache.put(&ctx.domain, &ontology) {
                    tracing::warn!(error = %format!("{err:#}"), "error writing ontology to cache");
                }
                ontology
            }
            Err(err) => {
                tracing::error!(domain = %ctx.domain, error = %err, "error generating ontology");
                failure_fallback(&ctx, &err)
            }
        }
    }

    /// Generation without any cache access.
    pub fn synthesize(&self, ctx: &RequestContext) -> Result<Ontology, GenerationError> {
        tracing::info!(domain = %ctx.domain, model = %self.config.model, "generating ontology");
        let text = self.service.generate(&self.ontology_request(ctx))?;
        tracing::debug!(
            preview = %truncate_string(&text, 100),
            "received ontology response"
        );

        let mut relationships = match extract_json(&text) {
            Ok(value) => normalize_relationships(raw_relationships(&value)),
            Err(err) => {
                tracing::warn!(error = %err, "falling back to default ontology");
                Vec::new()
            }
        };
        if relationships.is_empty() {
            tracing::warn!(
                domain = %ctx.domain,
                "no valid relationships found in response, using fallback"
            );
            relationships = fallback_relationships(&ctx.domain);
        }

        let ontology = Ontology {
            domain: ctx.domain.clone(),
            error: None,
            relationships,
        };
        let ontology = enforce_connectivity(ontology);
        Ok(DetailEnhancer::new(self.service, self.config).enhance(ctx, ontology))
    }

    fn ontology_request(&self, ctx: &RequestContext) -> GenerateRequest {
        GenerateRequest {
            model: self.config.model.clone(),
            prompt: prompts::ontology_prompt(&ctx.domain),
            system: prompts::ontology_system_prompt().to_string(),
            stream: false,
            options: Some(GenerateOptions {
                num_ctx: ctx.num_ctx,
                temperature: None,
                top_p: None,
            }),
        }
    }
}

/// Placeholder ontology for a failed generation request.
///
/// Built without further service calls: connected, with templated details.
fn failure_fallback(ctx: &RequestContext, err: &GenerationError) -> Ontology {
    let mut fallback = enforce_connectivity(create_fallback_ontology(&ctx.domain));
    for rel in &mut fallback.relationships {
        rel.details = Some(templated_details(rel));
    }
    fallback.error = err.annotation();
    fallback
}

#[cfg(test)]
#[path = "generator_tests.rs"]
mod tests;
