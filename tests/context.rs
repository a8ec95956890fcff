mod cases;

use pretty_assertions::assert_eq;
use stencil::{Context, ContextOptions, Engine, EngineOptions, Error, EvalError, Value};

use cases::ENGINE;

test_case!(
    leading_zeros_are_kept,
    template: "@code",
    context: {"code": "007"},
    output: "007",
);

test_case!(
    zero_is_a_number,
    template: "@(flag + 1)",
    context: {"flag": "0"},
    output: "1",
);

test_case!(
    booleans_are_inferred,
    template: r#"@if(active, "on", "off")"#,
    context: {"active": "false"},
    output: "off",
);

test_case!(
    floats_are_inferred,
    template: "@(n * 2)",
    context: {"n": "1.5"},
    output: "3.0",
);

test_case!(
    timestamps_are_inferred,
    template: "@d",
    context: {"d": "2020-12-13T23:34:45"},
    output: "2020-12-13T23:34:45+00:00",
);

test_case!(
    keys_are_case_insensitive,
    template: "@contact.firstname @CONTACT.FirstName",
    context: {"Contact": {"FirstName": "Ada"}},
    output: "Ada Ada",
);

test_case!(
    nested_lists_are_normalized,
    template: "@(rows[1][0] + 1)",
    context: {"rows": [["1"], ["2"]]},
    output: "3",
);

#[test]
fn normalized_values() {
    let ctx = ENGINE.context(serde_json::json!({
        "Code": "007",
        "Count": "12",
        "Name": "Ada",
        "Active": "TRUE",
        "Tags": ["1", "x"],
    }));

    assert_eq!(ctx.get("code"), Some(&Value::str("007")));
    assert_eq!(ctx.get("count"), Some(&Value::Int(12)));
    assert_eq!(ctx.get("name"), Some(&Value::str("Ada")));
    assert_eq!(ctx.get("active"), Some(&Value::Bool(true)));
    assert_eq!(
        ctx.get("tags"),
        Some(&Value::List(vec![Value::Int(1), Value::str("x")]))
    );
}

#[test]
fn skipping_evaluation_keeps_strings() {
    let options = EngineOptions {
        context: ContextOptions {
            skip_context_evaluation: true,
        },
        ..Default::default()
    };
    let engine = Engine::new(options);
    let ctx = engine.context(serde_json::json!({"n": "42"}));

    assert_eq!(ctx.get("n"), Some(&Value::str("42")));
    assert_eq!(engine.evaluate_as_string("@n", &ctx).unwrap(), "42");
    assert!(matches!(
        engine.evaluate_as_string("@(n + 1)", &ctx),
        Err(Error::Runtime(EvalError::NotANumber { .. }))
    ));
}

#[test]
fn options_load_from_configuration() {
    let options: EngineOptions = serde_json::from_value(serde_json::json!({
        "evaluator": {"max_depth": 3}
    }))
    .unwrap();
    assert!(!options.context.skip_context_evaluation);

    let engine = Engine::new(options);
    let ctx = Context::default();

    assert_eq!(engine.evaluate_as_string("@(1 + 2)", &ctx).unwrap(), "3");
    assert!(matches!(
        engine.evaluate_as_string("@(1 + (2 + (3 + 4)))", &ctx),
        Err(Error::ResourceExceeded(EvalError::StackOverflow { max_depth: 3, .. }))
    ));
}

#[test]
fn context_round_trips_through_json() {
    let ctx = ENGINE.context(serde_json::json!({"a": {"b": ["1", "two"]}, "c": "2.5"}));
    let again = ENGINE.context(ctx.to_json());

    assert_eq!(again, ctx);
}

#[test]
fn contexts_built_in_code() {
    let mut ctx: Context = [("Name", Value::str("Ada"))].into_iter().collect();
    ctx.insert("Age", Value::Int(36));

    assert_eq!(
        ENGINE.evaluate_as_string("@name is @age", &ctx).unwrap(),
        "Ada is 36"
    );
}
