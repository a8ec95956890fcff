//! Configuration options for the Stencil engine.
//!
//! Every options struct can be loaded from configuration with serde; missing
//! fields take their default.

use serde::Deserialize;

/// Options for turning raw host data into a context.
///
/// # Example
///
/// ```
/// use stencil_core::api::ContextOptions;
///
/// let options: ContextOptions =
///     serde_json::from_str(r#"{"skip_context_evaluation": true}"#).unwrap();
/// assert!(options.skip_context_evaluation);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ContextOptions {
    /// Keep string values as strings instead of reading them as numbers,
    /// booleans or timestamps.
    ///
    /// Default: false
    pub skip_context_evaluation: bool,
}

/// Configuration options for template evaluation.
///
/// These options control resource limits during evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EvaluatorOptions {
    /// Maximum evaluation stack depth (for recursion protection).
    ///
    /// Default: 1000
    pub max_depth: usize,
}

impl Default for EvaluatorOptions {
    fn default() -> Self {
        Self { max_depth: 1000 }
    }
}

/// Configuration options for the Stencil engine.
///
/// # Example
///
/// ```
/// use stencil_core::api::{ContextOptions, EngineOptions, EvaluatorOptions};
///
/// let options = EngineOptions {
///     context: ContextOptions { skip_context_evaluation: true },
///     evaluator: EvaluatorOptions { max_depth: 500 },
/// };
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EngineOptions {
    /// Used by `Engine::context`.
    pub context: ContextOptions,

    /// Used for every evaluation run by the engine.
    pub evaluator: EvaluatorOptions,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = EngineOptions::default();
        assert!(!options.context.skip_context_evaluation);
        assert_eq!(options.evaluator.max_depth, 1000);
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let options: EngineOptions =
            serde_json::from_str(r#"{"evaluator": {"max_depth": 50}}"#).unwrap();
        assert_eq!(options.evaluator.max_depth, 50);
        assert_eq!(options.context, ContextOptions::default());

        let options: EngineOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options, EngineOptions::default());
    }
}
