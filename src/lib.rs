//! Stencil - an embeddable template and expression language
//!
//! # Overview
//!
//! Stencil lets end users write text with `@` expressions that a host
//! application fills in from its own data. Common use cases include:
//!
//! - Message templates in chat and email automation
//! - Conditional logic in flows (`@(age >= 18)`)
//! - Light arithmetic and formatting over loosely-typed data
//!
//! # Quick Start
//!
//! ```
//! use stencil::{Engine, EngineOptions};
//!
//! let engine = Engine::new(EngineOptions::default());
//!
//! // Host data is normalized: keys are lower-cased and "36" becomes a number.
//! let ctx = engine.context(serde_json::json!({
//!     "Contact": {"Name": "Ada", "Age": "36"}
//! }));
//!
//! let text = engine
//!     .evaluate_as_string("Hi @contact.name, next year you turn @(contact.age + 1).", &ctx)
//!     .unwrap();
//! assert_eq!(text, "Hi Ada, next year you turn 37.");
//! ```
//!
//! # Custom functions
//!
//! Function calls go to a [`FunctionResolver`]. The standard library is the
//! default; hosts can install their own and let contexts pick one by name
//! through the `__resolver__` key.
//!
//! ```
//! use stencil::{Context, DispatchError, Engine, EngineOptions, Value};
//!
//! let engine = Engine::with_resolver(
//!     EngineOptions::default(),
//!     |name: &str, args: &[Value], _: &Context| match name {
//!         "double" => Ok(Value::Int(args[0].as_int().unwrap_or(0) * 2)),
//!         _ => Err(DispatchError::UnknownFunction(name.to_string())),
//!     },
//! );
//!
//! let ctx = engine.context(serde_json::json!({"n": 21}));
//! assert_eq!(engine.evaluate_as_string("@double(n) @nope()", &ctx).unwrap(),
//!            "42 ERROR: unknown function \"nope\"");
//! ```

// Re-export public API from stencil_core
pub use stencil_core::api::{
    CompiledTemplate, ContextOptions, Diagnostic, Engine, EngineOptions, Error, EvaluatorOptions,
    Severity,
};

// Re-export commonly used types and values
pub use stencil_core::context::{self, Context};
pub use stencil_core::dispatch::{DispatchError, FunctionResolver};
pub use stencil_core::parser::{self, Expr, Template};
pub use stencil_core::stdlib::{self, StandardLibrary};
pub use stencil_core::values::{self, Closure, Value};

// Re-export errors
pub use stencil_core::evaluator::{self, EvalError};
pub use stencil_core::parser::ParseError;

mod error_renderer;
pub use error_renderer::{render_error, render_error_to, render_error_to_string, render_error_to_string_no_color};
