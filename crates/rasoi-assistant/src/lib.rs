//! Natural-language command pipeline for the Rasoi POS.
//!
//! Turns manager text ("86 the lassi", "increase starters by 10%") into a
//! classified intent with extracted entities, routes it to a handler, and
//! for price changes separates a preview (no mutation) from an explicit
//! confirm (mutation).
//!
//! Two classification tiers:
//! - **Pattern matcher** (local): regex table for common phrasings, zero
//!   cost, confidence 1.0.
//! - **Gemini** (cloud): HTTP fallback for anything the patterns miss;
//!   degrades to `Unknown` when unavailable.

pub mod apply;
pub mod classify;
pub mod error;
pub mod gemini;
pub mod handlers;
pub mod mock;
pub mod patterns;
pub mod service;
pub mod store;

pub use classify::{Classification, ClassifyContext, FallbackClassifier};
pub use error::{AssistantError, AssistantResult};
pub use gemini::{GeminiClient, GeminiConfig};
pub use service::{Assistant, AssistantConfig, RequestContext};
