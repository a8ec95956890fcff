//! Public API for the Stencil template language.
//!
//! An [`Engine`] parses templates, normalizes host data into contexts and
//! evaluates one against the other, dispatching function calls to the
//! standard library or to resolvers registered by the host.
//!
//! # Example
//!
//! ```
//! use stencil_core::api::{Engine, EngineOptions};
//!
//! let engine = Engine::new(EngineOptions::default());
//! let ctx = engine.context(serde_json::json!({"contact": {"Name": "Ada"}}));
//!
//! let greeting = engine.evaluate_as_string("Hi @upper(contact.name)!", &ctx).unwrap();
//! assert_eq!(greeting, "Hi ADA!");
//! ```

pub mod engine;
pub mod error;
pub mod expression;
pub mod options;

pub use engine::Engine;
pub use error::{Diagnostic, Error, Severity};
pub use expression::CompiledTemplate;
pub use options::{ContextOptions, EngineOptions, EvaluatorOptions};
