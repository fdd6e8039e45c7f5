/// Per-request values threaded through every pipeline stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub domain: String,
    /// Context window for the ontology generation call.
    pub num_ctx: u32,
}

impl RequestContext {
    pub fn new(domain: impl Into<String>, num_ctx: u32) -> Self {
        Self {
            domain: domain.into(),
            num_ctx,
        }
    }
}
