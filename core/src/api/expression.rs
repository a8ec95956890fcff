//! Compiled Stencil templates.

use std::fmt;
use std::sync::Arc;

use super::{Error, engine::Resolvers};
use crate::api::EvaluatorOptions;
use crate::context::Context;
use crate::evaluator::{self, Evaluator};
use crate::parser::Template;
use crate::values::Value;

/// A parsed template ready for evaluation.
///
/// Compiled templates own their tree and share the engine's resolvers, so
/// they can be cached, cloned cheaply and evaluated from several threads
/// against different contexts.
///
/// # Example
///
/// ```
/// use stencil_core::api::{Engine, EngineOptions};
///
/// let engine = Engine::new(EngineOptions::default());
/// let template = engine.compile("@a + @b = @(a + b)").unwrap();
///
/// let ctx = engine.context(serde_json::json!({"a": 1, "b": "2"}));
/// assert_eq!(template.run_to_string(&ctx).unwrap(), "1 + 2 = 3");
/// ```
#[derive(Clone)]
pub struct CompiledTemplate {
    source: Arc<str>,
    template: Arc<Template>,
    resolvers: Arc<Resolvers>,
    options: EvaluatorOptions,
}

impl fmt::Debug for CompiledTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledTemplate")
            .field("source", &self.source)
            .field("template", &self.template)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl CompiledTemplate {
    pub(crate) fn new(
        source: &str,
        template: Template,
        resolvers: Arc<Resolvers>,
        options: EvaluatorOptions,
    ) -> Self {
        Self {
            source: source.into(),
            template: Arc::new(template),
            resolvers,
            options,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    /// Evaluate every segment, returning one value per segment.
    pub fn run(&self, context: &Context) -> Result<Vec<Value>, Error> {
        let resolver = self.resolvers.select(context)?;
        Ok(Evaluator::new(context, resolver, self.options.clone()).eval_sequence(&self.template)?)
    }

    /// Evaluate and join the rendered segments.
    pub fn run_to_string(&self, context: &Context) -> Result<String, Error> {
        self.run(context).map(|values| evaluator::stringify(&values))
    }
}
