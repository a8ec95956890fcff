#![allow(dead_code)]

use once_cell::sync::Lazy;
use stencil::{Engine, Error};

pub static ENGINE: Lazy<Engine> = Lazy::new(Engine::default);

/// Normalize `data` and render `template` against it with the shared engine.
pub fn render(template: &str, data: serde_json::Value) -> Result<String, Error> {
    let ctx = ENGINE.context(data);
    ENGINE.evaluate_as_string(template, &ctx)
}

#[macro_export]
macro_rules! test_case {
    (
        $name:ident,
        template: $template:expr,
        context: $context:tt,
        output: $output:expr $(,)?
    ) => {
        #[test]
        fn $name() {
            match $crate::cases::render($template, serde_json::json!($context)) {
                Ok(text) => pretty_assertions::assert_eq!(text, $output),
                Err(err) => panic!("{} failed to render: {}", stringify!($name), err),
            }
        }
    };
    (
        $name:ident,
        template: $template:expr,
        context: $context:tt,
        error: $pattern:pat $(,)?
    ) => {
        #[test]
        fn $name() {
            let result = $crate::cases::render($template, serde_json::json!($context));
            assert!(
                matches!(result, Err($pattern)),
                "{}: unexpected result {:?}",
                stringify!($name),
                result
            );
        }
    };
}
