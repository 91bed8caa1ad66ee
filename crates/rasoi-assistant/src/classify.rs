//! Classification result and the fallback-classifier seam.

use async_trait::async_trait;

use rasoi_protocol::{Entities, Intent};

/// Outcome of classifying one message, whichever tier produced it.
#[derive(Debug, Clone)]
pub struct Classification {
    pub intent: Intent,
    pub entities: Entities,
    /// In [0, 1]. Pattern hits are always 1.0; a degraded fallback is 0.0.
    pub confidence: f64,
    pub needs_clarification: bool,
    pub clarification_question: Option<String>,
}

impl Classification {
    /// A deterministic pattern-table hit.
    pub fn pattern_hit(intent: Intent, entities: Entities) -> Self {
        Self {
            intent,
            entities,
            confidence: 1.0,
            needs_clarification: false,
            clarification_question: None,
        }
    }

    /// The degraded result: `Unknown`, confidence 0, clarification requested.
    /// Used for every fallback failure rung — unconfigured, unreachable,
    /// garbage output.
    pub fn degraded(question: Option<String>) -> Self {
        Self {
            intent: Intent::Unknown,
            entities: Entities::None,
            confidence: 0.0,
            needs_clarification: true,
            clarification_question: question,
        }
    }
}

/// Restaurant context handed to the fallback model.
#[derive(Debug, Clone, Default)]
pub struct ClassifyContext {
    pub restaurant_name: String,
    pub categories: Vec<String>,
}

/// Second classification tier, consulted only when the pattern table misses.
///
/// Implementations must never fail: any internal error degrades to
/// `Classification::degraded`.
#[async_trait]
pub trait FallbackClassifier: Send + Sync {
    async fn classify(&self, text: &str, ctx: &ClassifyContext) -> Classification;

    /// Name of this tier (for logging/audit).
    fn tier_name(&self) -> &str;
}
