// ABOUTME: Built-in pipeline functions and the named providers assembled from them
// ABOUTME: `minimal` carries trim/prefix/suffix; `standard` adds case, padding, replace, and base64

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};

use super::provider::{arg_i64, arg_str, arg_usize, FunctionError};
use super::registry::FunctionRegistry;
use crate::template::value::{ArgType, ArgValue};

pub const MINIMAL_PROVIDER: &str = "minimal";
pub const STANDARD_PROVIDER: &str = "standard";

/// Identifiers accepted by [`builtin_provider`]
pub const BUILTIN_PROVIDERS: &[&str] = &[MINIMAL_PROVIDER, STANDARD_PROVIDER];

/// Upper bound on the size a length-taking function may produce
pub const MAX_OUTPUT_LEN: usize = 1024 * 1024;

/// Build a built-in provider by identifier
pub fn builtin_provider(name: &str) -> Option<FunctionRegistry> {
    match name {
        MINIMAL_PROVIDER => Some(minimal()),
        STANDARD_PROVIDER => Some(standard()),
        _ => None,
    }
}

/// trim, prefix, suffix
pub fn minimal() -> FunctionRegistry {
    let mut registry = FunctionRegistry::new(MINIMAL_PROVIDER);
    registry
        .register_unary("trim", |v| v.trim().to_string())
        .register("prefix", &[ArgType::String], prefix)
        .register("suffix", &[ArgType::String], suffix);
    registry
}

/// Everything in [`minimal`] plus general-purpose string helpers
pub fn standard() -> FunctionRegistry {
    let mut registry = FunctionRegistry::new(STANDARD_PROVIDER);
    registry
        .merge(&minimal())
        .register_unary("trim_start", |v| v.trim_start().to_string())
        .register_unary("trim_end", |v| v.trim_end().to_string())
        .register_unary("upper", str::to_uppercase)
        .register_unary("lower", str::to_lowercase)
        .register_unary("capitalize", capitalize)
        .register("default", &[ArgType::String], default_value)
        .register("replace", &[ArgType::String, ArgType::String], replace)
        .register("truncate", &[ArgType::Integer], truncate)
        .register("repeat", &[ArgType::Integer], repeat)
        .register("pad_left", &[ArgType::Integer], |v, args| {
            pad(v, args, Side::Left, " ")
        })
        .register(
            "pad_left",
            &[ArgType::Integer, ArgType::String],
            |v, args| pad(v, args, Side::Left, arg_str(args, 1)?),
        )
        .register("pad_right", &[ArgType::Integer], |v, args| {
            pad(v, args, Side::Right, " ")
        })
        .register(
            "pad_right",
            &[ArgType::Integer, ArgType::String],
            |v, args| pad(v, args, Side::Right, arg_str(args, 1)?),
        )
        .register("round", &[ArgType::Integer], round)
        .register_unary("base64_encode", |v| BASE64.encode(v.as_bytes()))
        .register("base64_decode", &[], base64_decode);
    registry
}

type FnResult = super::provider::Result<String>;

fn prefix(value: &str, args: &[ArgValue]) -> FnResult {
    Ok(format!("{}{}", arg_str(args, 0)?, value))
}

fn suffix(value: &str, args: &[ArgValue]) -> FnResult {
    Ok(format!("{}{}", value, arg_str(args, 0)?))
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn default_value(value: &str, args: &[ArgValue]) -> FnResult {
    if value.is_empty() {
        Ok(arg_str(args, 0)?.to_string())
    } else {
        Ok(value.to_string())
    }
}

fn replace(value: &str, args: &[ArgValue]) -> FnResult {
    let from = arg_str(args, 0)?;
    if from.is_empty() {
        return Err(FunctionError::Failed(
            "replace pattern must not be empty".to_string(),
        ));
    }
    Ok(value.replace(from, arg_str(args, 1)?))
}

fn truncate(value: &str, args: &[ArgValue]) -> FnResult {
    let max = arg_usize(args, 0)?;
    Ok(value.chars().take(max).collect())
}

fn repeat(value: &str, args: &[ArgValue]) -> FnResult {
    let count = arg_usize(args, 0)?;
    value
        .len()
        .checked_mul(count)
        .filter(|len| *len <= MAX_OUTPUT_LEN)
        .ok_or_else(|| too_large("repeat", count))?;
    Ok(value.repeat(count))
}

fn too_large(function: &str, requested: usize) -> FunctionError {
    FunctionError::Failed(format!(
        "{} {} would exceed the {} byte output limit",
        function, requested, MAX_OUTPUT_LEN
    ))
}

enum Side {
    Left,
    Right,
}

fn pad(value: &str, args: &[ArgValue], side: Side, fill: &str) -> FnResult {
    let width = arg_usize(args, 0)?;
    if width > MAX_OUTPUT_LEN {
        return Err(too_large("pad", width));
    }
    if fill.is_empty() {
        return Err(FunctionError::Failed("pad fill must not be empty".to_string()));
    }

    let missing = width.saturating_sub(value.chars().count());
    let padding: String = fill.chars().cycle().take(missing).collect();

    Ok(match side {
        Side::Left => format!("{}{}", padding, value),
        Side::Right => format!("{}{}", value, padding),
    })
}

fn round(value: &str, args: &[ArgValue]) -> FnResult {
    let places = arg_i64(args, 0)?;
    let places = usize::try_from(places)
        .map_err(|_| FunctionError::Failed("decimal places must not be negative".to_string()))?;
    if places > MAX_OUTPUT_LEN {
        return Err(too_large("round", places));
    }
    let number: f64 = value
        .trim()
        .parse()
        .map_err(|_| FunctionError::Failed(format!("'{}' is not a number", value)))?;

    Ok(format!("{:.*}", places, number))
}

fn base64_decode(value: &str, _args: &[ArgValue]) -> FnResult {
    let bytes = BASE64
        .decode(value)
        .map_err(|e| FunctionError::Failed(format!("Base64 decode error: {}", e)))?;

    String::from_utf8(bytes)
        .map_err(|e| FunctionError::Failed(format!("UTF-8 decode error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::functions::FunctionProvider;

    fn call(registry: &FunctionRegistry, name: &str, value: &str, args: &[ArgValue]) -> FnResult {
        let types: Vec<ArgType> = args.iter().map(ArgValue::arg_type).collect();
        let function = registry
            .resolve(name, &types)
            .unwrap_or_else(|| panic!("{} not registered", name));
        function(value, args)
    }

    fn s(text: &str) -> ArgValue {
        ArgValue::String(text.to_string())
    }

    #[test]
    fn test_minimal_functions() {
        let registry = minimal();

        assert_eq!(call(&registry, "trim", "   World     ", &[]).unwrap(), "World");
        assert_eq!(
            call(&registry, "prefix", "abc", &[s("String:")]).unwrap(),
            "String:abc"
        );
        assert_eq!(call(&registry, "suffix", "abc", &[s("!")]).unwrap(), "abc!");
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_standard_includes_minimal() {
        let registry = standard();
        assert!(registry.resolve("trim", &[]).is_some());
        assert!(registry.resolve("prefix", &[ArgType::String]).is_some());
        assert_eq!(registry.name(), STANDARD_PROVIDER);
    }

    #[test]
    fn test_case_functions() {
        let registry = standard();
        assert_eq!(call(&registry, "upper", "hello world", &[]).unwrap(), "HELLO WORLD");
        assert_eq!(call(&registry, "lower", "HELLO WORLD", &[]).unwrap(), "hello world");
        assert_eq!(call(&registry, "capitalize", "élan", &[]).unwrap(), "Élan");
        assert_eq!(call(&registry, "capitalize", "", &[]).unwrap(), "");
    }

    #[test]
    fn test_default_function() {
        let registry = standard();
        assert_eq!(call(&registry, "default", "", &[s("fallback")]).unwrap(), "fallback");
        assert_eq!(call(&registry, "default", "value", &[s("fallback")]).unwrap(), "value");
    }

    #[test]
    fn test_replace_function() {
        let registry = standard();
        assert_eq!(
            call(&registry, "replace", "a-b-c", &[s("-"), s(" / ")]).unwrap(),
            "a / b / c"
        );
        assert!(call(&registry, "replace", "abc", &[s(""), s("x")]).is_err());
    }

    #[test]
    fn test_length_functions() {
        let registry = standard();
        let three = ArgValue::Integer(3);

        assert_eq!(call(&registry, "truncate", "abcdef", &[three.clone()]).unwrap(), "abc");
        assert_eq!(call(&registry, "truncate", "ab", &[three.clone()]).unwrap(), "ab");
        assert_eq!(call(&registry, "repeat", "ab", &[three]).unwrap(), "ababab");
        assert!(call(&registry, "repeat", "ab", &[ArgValue::Integer(-1)]).is_err());
    }

    #[test]
    fn test_padding_functions() {
        let registry = standard();
        let five = ArgValue::Integer(5);

        assert_eq!(call(&registry, "pad_left", "42", &[five.clone()]).unwrap(), "   42");
        assert_eq!(
            call(&registry, "pad_left", "42", &[five.clone(), s("0")]).unwrap(),
            "00042"
        );
        assert_eq!(
            call(&registry, "pad_right", "ab", &[five.clone(), s("-=")]).unwrap(),
            "ab-=-"
        );
        assert_eq!(
            call(&registry, "pad_right", "toolong", &[five.clone()]).unwrap(),
            "toolong"
        );
        assert!(call(&registry, "pad_left", "x", &[five, s("")]).is_err());
    }

    #[test]
    fn test_output_limit() {
        let registry = standard();
        let huge = ArgValue::Integer(i64::MAX);

        let err = call(&registry, "repeat", "ab", &[huge.clone()]).unwrap_err();
        assert!(matches!(err, FunctionError::Failed(ref msg) if msg.contains("output limit")));
        assert!(call(&registry, "pad_left", "ab", &[huge.clone()]).is_err());
        assert!(call(&registry, "pad_right", "ab", &[huge.clone(), s("0")]).is_err());
        assert!(call(&registry, "round", "1.5", &[huge]).is_err());

        let half = (MAX_OUTPUT_LEN / 2) as i64;
        let at_limit = call(&registry, "repeat", "ab", &[ArgValue::Integer(half)]).unwrap();
        assert_eq!(at_limit.len(), MAX_OUTPUT_LEN);
        assert!(call(&registry, "repeat", "ab", &[ArgValue::Integer(half + 1)]).is_err());
        assert_eq!(call(&registry, "repeat", "", &[ArgValue::Integer(i64::MAX)]).unwrap(), "");
    }

    #[test]
    fn test_round_function() {
        let registry = standard();
        assert_eq!(
            call(&registry, "round", "3.14159", &[ArgValue::Integer(2)]).unwrap(),
            "3.14"
        );
        assert_eq!(call(&registry, "round", "2", &[ArgValue::Integer(1)]).unwrap(), "2.0");
        assert!(call(&registry, "round", "abc", &[ArgValue::Integer(1)]).is_err());
    }

    #[test]
    fn test_base64_functions() {
        let registry = standard();
        let encoded = call(&registry, "base64_encode", "hello world", &[]).unwrap();
        assert_eq!(encoded, "aGVsbG8gd29ybGQ=");

        let decoded = call(&registry, "base64_decode", &encoded, &[]).unwrap();
        assert_eq!(decoded, "hello world");

        assert!(call(&registry, "base64_decode", "not base64!", &[]).is_err());
    }

    #[test]
    fn test_builtin_provider_lookup() {
        assert_eq!(builtin_provider("minimal").unwrap().name(), MINIMAL_PROVIDER);
        assert_eq!(builtin_provider("standard").unwrap().name(), STANDARD_PROVIDER);
        assert!(builtin_provider("com.example.Unknown").is_none());
    }
}
