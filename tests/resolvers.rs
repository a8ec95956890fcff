use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use pretty_assertions::assert_eq;
use stencil::{
    Context, DispatchError, Engine, EngineOptions, Error, EvalError, FunctionResolver,
    StandardLibrary, Value,
};

/// Counts calls and answers `greet` in the tenant's language.
#[derive(Default)]
struct Greeter {
    calls: AtomicUsize,
}

impl FunctionResolver for Greeter {
    fn call(&self, name: &str, args: &[Value], context: &Context) -> Result<Value, DispatchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match name {
            "greet" => {
                let [who] = args else {
                    return Err(DispatchError::arity(name, 1, args.len()));
                };
                let hello = match context.get("lang").and_then(Value::as_str) {
                    Some("fr") => "Bonjour",
                    _ => "Hello",
                };
                Ok(Value::str(format!("{hello} {who}")))
            }
            "explode" => Err(EvalError::Arithmetic("boom".to_string()).into()),
            _ => StandardLibrary.call(name, args, context),
        }
    }
}

fn shared<R: FunctionResolver + 'static>(resolver: &Arc<R>) -> impl FunctionResolver + use<R> {
    let resolver = Arc::clone(resolver);
    move |name: &str, args: &[Value], context: &Context| resolver.call(name, args, context)
}

#[test]
fn custom_default_resolver() {
    let greeter = Arc::new(Greeter::default());
    let engine = Engine::with_resolver(EngineOptions::default(), shared(&greeter));

    let ctx = engine.context(serde_json::json!({"name": "Ada", "lang": "fr"}));
    assert_eq!(
        engine.evaluate_as_string("@greet(name), @upper(name)", &ctx).unwrap(),
        "Bonjour Ada, ADA"
    );
    assert_eq!(greeter.calls.load(Ordering::SeqCst), 2);
}

#[test]
fn resolver_failures_render_inline() {
    let engine = Engine::with_resolver(EngineOptions::default(), Greeter::default());
    let ctx = Context::default();

    assert_eq!(
        engine.evaluate_as_string("@greet()|@greet(1)", &ctx).unwrap(),
        "ERROR: greet expects 1 argument(s), got 0|Hello 1"
    );
}

#[test]
fn resolver_can_abort_evaluation() {
    let engine = Engine::with_resolver(EngineOptions::default(), Greeter::default());

    assert!(matches!(
        engine.evaluate_as_string("@explode()", &Context::default()),
        Err(Error::Runtime(EvalError::Arithmetic(message))) if message == "boom"
    ));
}

#[test]
fn context_selects_a_named_resolver() {
    let mut engine = Engine::default();
    engine.register_resolver("greeter", Greeter::default());

    let plain = engine.context(serde_json::json!({"name": "Ada"}));
    assert_eq!(
        engine.evaluate_as_string("@greet(name)", &plain).unwrap(),
        r#"ERROR: unknown function "greet""#
    );

    let custom = engine.context(serde_json::json!({"name": "Ada", "__resolver__": "greeter"}));
    assert_eq!(
        engine.evaluate_as_string("@greet(name)", &custom).unwrap(),
        "Hello Ada"
    );
}

#[test]
fn unknown_resolver_name_is_fatal() {
    let engine = Engine::default();
    let ctx = engine.context(serde_json::json!({"__resolver__": "nobody"}));

    assert!(matches!(
        engine.evaluate_as_string("@upper(\"x\")", &ctx),
        Err(Error::Runtime(EvalError::UnknownResolver { name })) if name == "nobody"
    ));
}

#[test]
fn lambdas_keep_the_resolver_they_were_made_with() {
    let mut engine = Engine::default();
    engine.register_resolver("greeter", Greeter::default());

    let ctx = engine.context(serde_json::json!({
        "names": ["Ada", "Grace"],
        "__resolver__": "greeter",
    }));
    assert_eq!(
        engine
            .evaluate_as_string("@map(names, &(greet(&1)))", &ctx)
            .unwrap(),
        r#"["Hello Ada", "Hello Grace"]"#
    );
}

#[test]
fn templates_from_json() {
    let engine = Engine::default();
    let compiled = engine
        .load_json(
            r#"[
                {"text": "Hi "},
                {"function": {"name": "upper", "args": [{"atom": "name"}]}}
            ]"#,
        )
        .unwrap();

    let ctx = engine.context(serde_json::json!({"name": "Ada"}));
    assert_eq!(compiled.run_to_string(&ctx).unwrap(), "Hi ADA");

    assert!(matches!(
        engine.load_json(r#"[{"bogus": 1}]"#),
        Err(Error::MalformedAst(_))
    ));
}
