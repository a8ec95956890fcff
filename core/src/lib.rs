//! Stencil: an embeddable template and expression language.
//!
//! Templates mix literal text with `@` expressions:
//!
//! ```text
//! Hi @contact.name, your total is @(price * quantity). Reply @@support.
//! ```
//!
//! - [`parser`] turns source text into an [`parser::Expr`] tree
//! - [`context`] turns raw host data into a typed, lower-cased [`context::Context`]
//! - [`evaluator`] walks the tree against a context
//! - [`dispatch`] is the contract for function calls, implemented by [`stdlib`]
//! - [`api`] bundles all of the above behind an [`api::Engine`]

pub mod api;
pub mod context;
pub mod dispatch;
pub mod evaluator;
pub mod parser;
pub mod stdlib;
pub mod values;

pub use api::{Engine, EngineOptions, Error};
pub use context::Context;
pub use values::Value;

/// Test utilities for enabling logging in tests
#[cfg(test)]
pub mod test_utils {
    /// Initialize tracing subscriber for tests with DEBUG level
    /// Call this at the start of tests where you want to see logging output
    ///
    /// # Example
    /// ```ignore
    /// #[test]
    /// fn test_function_failure() {
    ///     test_utils::init_test_logging();
    ///     // ... your test code
    /// }
    /// ```
    pub fn init_test_logging() {
        use tracing_subscriber::{EnvFilter, fmt};

        // Try to initialize, ignore error if already initialized
        let _ = fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
            )
            .with_test_writer()
            .try_init();
    }
}
