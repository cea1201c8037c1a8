// ABOUTME: Integration tests for placeholder substitution through the public API
// ABOUTME: Covers pass-through, pipelines, lenient and strict failures, and concurrent use

use std::sync::Arc;
use std::thread;

use substitutor::functions::builtins::standard;
use substitutor::template::{has_placeholders, tokenize, Severity};
use substitutor::{Params, SubstitutionError, Substitutor, SubstitutorConfig};

mod common;
use common::{marker_substitutor, sample_params};

#[test]
fn test_patterns_without_placeholders_are_unchanged() {
    let substitutor = Substitutor::new();
    let params = sample_params();

    for pattern in [
        "",
        "plain text",
        "dollar $ and braces { } but no marker",
        "${}",
        "$ {string}",
        "${unterminated",
        "multi\nline\ttext ünïcödé",
    ] {
        assert_eq!(substitutor.substitute(pattern, &params).unwrap(), pattern);
    }
}

#[test]
fn test_scalar_values_use_textual_form() {
    let substitutor = Substitutor::new();
    let result = substitutor
        .substitute("Hello ${string} ${int} ${double}", &sample_params())
        .unwrap();
    assert_eq!(result, "Hello Lorem ipsum dolor sit amet 2 3.14159");

    let params = Params::new().with("n", 2);
    assert_eq!(substitutor.substitute("${n}", &params).unwrap(), "2");
}

#[test]
fn test_original_examples() {
    let substitutor = Substitutor::new();
    let params = sample_params();

    assert_eq!(
        substitutor
            .substitute("Hello ${stringWithSpace | trim} ${int} ${double}", &params)
            .unwrap(),
        "Hello World 2 3.14159"
    );
    assert_eq!(
        substitutor
            .substitute("Hello ${string | prefix 'String:'} ${int} ${double}", &params)
            .unwrap(),
        "Hello String:Lorem ipsum dolor sit amet 2 3.14159"
    );
    assert_eq!(
        substitutor
            .substitute(
                "Hello ${stringWithSpace | trim | prefix 'pre:'} ${int} ${double}",
                &params
            )
            .unwrap(),
        "Hello pre:World 2 3.14159"
    );
    assert_eq!(
        substitutor
            .substitute("Hello ${string | append}", &params)
            .unwrap(),
        "Hello Lorem ipsum dolor sit amet"
    );
}

#[test]
fn test_pipeline_folds_left_to_right() {
    let substitutor = marker_substitutor();
    let params = Params::new().with("v", "x");

    assert_eq!(
        substitutor
            .substitute("${v | mark | between '[' ']' | mark}", &params)
            .unwrap(),
        "<[<x>]>"
    );
}

#[test]
fn test_literal_text_preserved_verbatim() {
    let substitutor = Substitutor::new();
    let params = Params::new().with("a", "A").with("b", "B");

    assert_eq!(
        substitutor
            .substitute("  ${a}\n\t${b}$${a}}{", &params)
            .unwrap(),
        "  A\n\tB$A}{"
    );
}

#[test]
fn test_quoted_arguments_keep_whitespace() {
    assert_eq!(tokenize("prefix 'a b'"), vec!["prefix", "'a b'"]);

    let substitutor = Substitutor::new();
    let params = Params::new().with("name", "Ada");
    assert_eq!(
        substitutor
            .substitute("${name | prefix \"Dear  \" | suffix ', hi'}", &params)
            .unwrap(),
        "Dear  Ada, hi"
    );
}

#[test]
fn test_substitution_is_idempotent_when_output_has_no_markers() {
    let substitutor = Substitutor::new();
    let params = sample_params();
    let once = substitutor
        .substitute("${stringWithSpace | trim}: ${int}", &params)
        .unwrap();

    assert!(!has_placeholders(&once));
    assert_eq!(substitutor.substitute(&once, &params).unwrap(), once);
}

#[test]
fn test_values_are_not_rescanned() {
    let substitutor = Substitutor::new();
    let params = Params::new().with("a", "${b}").with("b", "nope");

    assert_eq!(substitutor.substitute("${a}", &params).unwrap(), "${b}");
}

#[test]
fn test_lenient_mode_returns_complete_output() {
    let substitutor = Substitutor::new();
    let params = Params::new().with("s", " ok ");

    let rendered = substitutor
        .render("[${missing}] [${s | nope | trim}] [${s | prefix bad}]", &params)
        .unwrap();

    assert_eq!(rendered.text, "[${missing}] [ok] [ ok ]");

    let severities: Vec<_> = rendered.diagnostics.iter().map(|d| d.severity).collect();
    assert_eq!(
        severities,
        vec![
            Severity::Warning,
            Severity::Error,
            Severity::Warning,
            Severity::Error
        ]
    );
}

#[test]
fn test_strict_mode_surfaces_typed_errors() {
    let substitutor = Substitutor::new().strict(true);
    let params = sample_params();

    assert!(matches!(
        substitutor.substitute("Hello ${does_not_exist}", &params),
        Err(SubstitutionError::MissingKey { .. })
    ));
    assert!(matches!(
        substitutor.substitute("Hello ${string|func_does_not_exist}", &params),
        Err(SubstitutionError::FunctionNotFound { .. })
    ));
    assert!(matches!(
        substitutor.substitute("${string | prefix what}", &params),
        Err(SubstitutionError::UnsupportedArgumentType { .. })
    ));
}

#[test]
fn test_error_messages_name_function_and_provider() {
    let substitutor = Substitutor::new().strict(true);
    let err = substitutor
        .substitute("${string | shout 'x'}", &sample_params())
        .unwrap_err();

    let message = err.to_string();
    assert!(message.contains("shout"));
    assert!(message.contains("minimal"));
    assert!(message.contains("string, string"));
}

#[test]
fn test_standard_provider_pipeline() {
    let config = SubstitutorConfig {
        provider: "standard".to_string(),
        strict_mode: true,
    };
    let substitutor = Substitutor::from_config(&config).unwrap();
    let params = Params::new()
        .with("id", 42)
        .with("name", "  ada lovelace ")
        .with("price", 3.14159);

    assert_eq!(
        substitutor
            .substitute(
                "#${id | pad_left 5 '0'} ${name | trim | capitalize} ${price | round 2}",
                &params
            )
            .unwrap(),
        "#00042 Ada lovelace 3.14"
    );
}

#[test]
fn test_params_are_not_mutated() {
    let substitutor = Substitutor::new();
    let params = sample_params();
    let before = params.clone();

    substitutor
        .substitute("${stringWithSpace | trim} ${missing}", &params)
        .unwrap();

    assert_eq!(params, before);
}

#[test]
fn test_concurrent_substitution() {
    let substitutor = Arc::new(Substitutor::with_provider(Arc::new(standard())));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let substitutor = Arc::clone(&substitutor);
            thread::spawn(move || {
                let params = Params::new().with("n", i);
                substitutor
                    .substitute("value-${n | pad_left 3 '0'}", &params)
                    .unwrap()
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        assert_eq!(handle.join().unwrap(), format!("value-{:03}", i));
    }
}
