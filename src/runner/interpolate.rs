//! Argument interpolation for strings
//!
//! Arguments travel as `key:value` strings and replace `{key}` placeholders.
//! `{{` and `}}` stand for literal braces.

use crate::error::{InterpolationError, InterpolationResult};
use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

fn placeholder_regex() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| {
        Regex::new(r"\{\{|\}\}|\{([^{}]*)\}").expect("placeholder pattern is valid")
    })
}

/// Convert `key:value` arguments into a lookup map
///
/// Each entry is split on its first colon, so values may contain colons.
pub fn args_to_map(args: &[String]) -> InterpolationResult<HashMap<String, String>> {
    let mut map = HashMap::with_capacity(args.len());

    for arg in args {
        let (key, value) = arg
            .split_once(':')
            .ok_or_else(|| InterpolationError::MalformedArgument(arg.clone()))?;

        if map.insert(key.to_string(), value.to_string()).is_some() {
            return Err(InterpolationError::DuplicateArgument(key.to_string()));
        }
    }

    Ok(map)
}

/// Replace every `{key}` placeholder in a string
///
/// Fails on the first placeholder without a matching argument.
pub fn interpolate(s: &str, args: &HashMap<String, String>) -> InterpolationResult<String> {
    let mut result = String::with_capacity(s.len());
    let mut last = 0;

    for caps in placeholder_regex().captures_iter(s) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        result.push_str(&s[last..whole.start()]);

        match caps.get(1) {
            Some(key) => {
                let value = args
                    .get(key.as_str())
                    .ok_or_else(|| InterpolationError::UnknownArgument(key.as_str().to_string()))?;
                result.push_str(value);
            }
            // Escaped brace
            None => result.push_str(&whole.as_str()[..1]),
        }

        last = whole.end();
    }

    result.push_str(&s[last..]);
    Ok(result)
}

/// Interpolate an optional field
pub fn interpolate_opt(
    s: Option<&str>,
    args: &HashMap<String, String>,
) -> InterpolationResult<Option<String>> {
    s.map(|s| interpolate(s, args)).transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(pairs: &[&str]) -> Vec<String> {
        pairs.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn test_args_to_map() {
        let map = args_to_map(&args(&["arg1:item1", "arg2:item2"])).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map["arg1"], "item1");
        assert_eq!(map["arg2"], "item2");
    }

    #[test]
    fn test_args_to_map_splits_on_first_colon() {
        let map = args_to_map(&args(&["url:http://localhost:8080"])).unwrap();
        assert_eq!(map["url"], "http://localhost:8080");
    }

    #[test]
    fn test_args_to_map_malformed() {
        let result = args_to_map(&args(&["ok:1", "broken"]));
        assert_eq!(
            result,
            Err(InterpolationError::MalformedArgument("broken".to_string()))
        );
    }

    #[test]
    fn test_args_to_map_duplicate_key() {
        let result = args_to_map(&args(&["a:1", "a:2"]));
        assert_eq!(
            result,
            Err(InterpolationError::DuplicateArgument("a".to_string()))
        );
    }

    #[test]
    fn test_multiple_placeholders() {
        let map = args_to_map(&args(&["first:John", "last:Doe"])).unwrap();
        let result = interpolate("{first} {last}", &map).unwrap();
        assert_eq!(result, "John Doe");
    }

    #[test]
    fn test_repeated_placeholder() {
        let map = args_to_map(&args(&["x:7"])).unwrap();
        assert_eq!(interpolate("{x}-{x}", &map).unwrap(), "7-7");
    }

    #[test]
    fn test_unknown_placeholder() {
        let map = args_to_map(&args(&["known:1"])).unwrap();
        let result = interpolate("echo {unknown}", &map);
        assert_eq!(
            result,
            Err(InterpolationError::UnknownArgument("unknown".to_string()))
        );
    }

    #[test]
    fn test_escaped_braces() {
        let map = args_to_map(&args(&["col:1"])).unwrap();
        let result = interpolate("awk '{{print ${col}}}'", &map).unwrap();
        assert_eq!(result, "awk '{print $1}'");
    }

    #[test]
    fn test_no_placeholders() {
        let map = HashMap::new();
        assert_eq!(
            interpolate("No variables here", &map).unwrap(),
            "No variables here"
        );
    }

    #[test]
    fn test_interpolate_opt() {
        let map = args_to_map(&args(&["n:3"])).unwrap();
        assert_eq!(interpolate_opt(None, &map).unwrap(), None);
        assert_eq!(
            interpolate_opt(Some("{n}"), &map).unwrap(),
            Some("3".to_string())
        );
    }
}
