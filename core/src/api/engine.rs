//! The Stencil evaluation engine.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use super::{CompiledTemplate, EngineOptions, Error};
use crate::context::Context;
use crate::dispatch::FunctionResolver;
use crate::evaluator::{EvalError, Evaluator};
use crate::parser::{self, Expr, Template};
use crate::stdlib::StandardLibrary;
use crate::values::Value;

/// The default resolver plus the named overrides a context may select.
#[derive(Clone)]
pub(crate) struct Resolvers {
    default: Arc<dyn FunctionResolver>,
    named: HashMap<String, Arc<dyn FunctionResolver>>,
}

impl Resolvers {
    /// Pick the resolver for one evaluation. The `__resolver__` context
    /// key, when present, must name a registered resolver.
    pub(crate) fn select(&self, context: &Context) -> Result<&Arc<dyn FunctionResolver>, EvalError> {
        match context.resolver_name() {
            None => Ok(&self.default),
            Some(name) => {
                debug!(resolver = name, "Using resolver override");
                self.named.get(name).ok_or_else(|| EvalError::UnknownResolver {
                    name: name.to_string(),
                })
            }
        }
    }
}

/// The Stencil compilation and evaluation engine.
///
/// The engine manages:
/// - Function resolvers (the default one and named overrides)
/// - Runtime configuration (EngineOptions)
///
/// # Example
///
/// ```
/// use stencil_core::api::{Engine, EngineOptions};
/// use stencil_core::context::Context;
/// use stencil_core::dispatch::DispatchError;
/// use stencil_core::values::Value;
///
/// let mut engine = Engine::new(EngineOptions::default());
/// engine.register_resolver("shouty", |name: &str, args: &[Value], _: &Context| {
///     match name {
///         "greet" => Ok(Value::str(format!("HELLO {}!", args[0]))),
///         _ => Err(DispatchError::UnknownFunction(name.to_string())),
///     }
/// });
///
/// let ctx = engine.context(serde_json::json!({"__resolver__": "shouty", "name": "Ada"}));
/// assert_eq!(engine.evaluate_as_string("@greet(name)", &ctx).unwrap(), "HELLO Ada!");
/// ```
pub struct Engine {
    resolvers: Arc<Resolvers>,
    options: EngineOptions,
}

impl Engine {
    /// Create an engine backed by the standard library.
    pub fn new(options: EngineOptions) -> Self {
        Self::with_resolver(options, StandardLibrary)
    }

    /// Create an engine with a custom default resolver.
    pub fn with_resolver(options: EngineOptions, resolver: impl FunctionResolver + 'static) -> Self {
        Self {
            resolvers: Arc::new(Resolvers {
                default: Arc::new(resolver),
                named: HashMap::new(),
            }),
            options,
        }
    }

    /// Register a resolver that contexts can select by name through the
    /// `__resolver__` key. Templates compiled earlier keep the resolvers
    /// they were compiled with.
    pub fn register_resolver(
        &mut self,
        name: impl Into<String>,
        resolver: impl FunctionResolver + 'static,
    ) {
        Arc::make_mut(&mut self.resolvers)
            .named
            .insert(name.into(), Arc::new(resolver));
    }

    /// Access the engine options.
    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Normalize raw host data into a context using the engine's options.
    pub fn context(&self, raw: serde_json::Value) -> Context {
        Context::new(raw, &self.options.context)
    }

    /// Parse a template once for repeated evaluation.
    pub fn compile(&self, source: &str) -> Result<CompiledTemplate, Error> {
        let template = parser::parse(source)?;
        Ok(self.compiled(source, template))
    }

    /// Load a template tree produced elsewhere, in its JSON form.
    pub fn load_json(&self, json: &str) -> Result<CompiledTemplate, Error> {
        let template = parser::from_json(json)?;
        Ok(self.compiled(json, template))
    }

    fn compiled(&self, source: &str, template: Template) -> CompiledTemplate {
        CompiledTemplate::new(
            source,
            template,
            Arc::clone(&self.resolvers),
            self.options.evaluator.clone(),
        )
    }

    /// Evaluate a template, one value per segment.
    pub fn evaluate(&self, source: &str, context: &Context) -> Result<Vec<Value>, Error> {
        self.compile(source)?.run(context)
    }

    /// Evaluate a template and join the rendered segments.
    pub fn evaluate_as_string(&self, source: &str, context: &Context) -> Result<String, Error> {
        self.compile(source)?.run_to_string(context)
    }

    /// Evaluate a bare expression such as `age >= 18`.
    pub fn evaluate_expression(&self, source: &str, context: &Context) -> Result<Value, Error> {
        let expr = parser::parse_expression(source)?;
        self.eval_expr(&expr, context)
    }

    /// Evaluate a bare expression that must produce a boolean.
    pub fn evaluate_as_boolean(&self, source: &str, context: &Context) -> Result<bool, Error> {
        match self.evaluate_expression(source, context)? {
            Value::Bool(b) => Ok(b),
            other => Err(EvalError::NotABoolean {
                value: other.repr(),
            }
            .into()),
        }
    }

    /// Evaluate a single expression node.
    pub fn eval_expr(&self, expr: &Expr, context: &Context) -> Result<Value, Error> {
        let resolver = self.resolvers.select(context)?;
        Ok(Evaluator::new(context, resolver, self.options.evaluator.clone()).eval(expr)?)
    }

    /// Evaluate a segment sequence.
    pub fn eval_template(&self, template: &[Expr], context: &Context) -> Result<Vec<Value>, Error> {
        let resolver = self.resolvers.select(context)?;
        Ok(Evaluator::new(context, resolver, self.options.evaluator.clone())
            .eval_sequence(template)?)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineOptions::default())
    }
}
