//! Parsing of `Call: name(key='value', ...)` directives in model output.

use std::sync::OnceLock;

use regex::Regex;
use serde::Deserialize;

use crate::tools::ToolArgs;

/// A tool invocation extracted from model output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCall {
    pub name: String,
    pub args: ToolArgs,
}

/// Location of a call directive before its arguments are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawCall<'a> {
    pub name: &'a str,
    pub arguments: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArgumentError {
    #[error("unterminated quote in arguments")]
    UnterminatedQuote,
    #[error("expected key='value' but found `{0}`")]
    MissingEquals(String),
    #[error("empty argument name in `{0}`")]
    EmptyKey(String),
    #[error("value for `{0}` must be quoted")]
    UnquotedValue(String),
}

/// What to do when some argument tokens fail to parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedArgumentPolicy {
    /// Any failure yields an empty argument mapping.
    #[default]
    EmptyFallback,
    /// Keep the pairs that parsed, drop the rest.
    KeepValid,
    /// Do not run the tool; report the error to the model.
    Reject,
}

impl MalformedArgumentPolicy {
    pub fn apply(self, raw: &str) -> Result<ToolArgs, ArgumentError> {
        let (args, errors) = parse_arguments(raw);
        let Some(first) = errors.into_iter().next() else {
            return Ok(args);
        };
        log::warn!("malformed tool arguments ({self:?}): {first}");
        match self {
            MalformedArgumentPolicy::EmptyFallback => Ok(ToolArgs::new()),
            MalformedArgumentPolicy::KeepValid => Ok(args),
            MalformedArgumentPolicy::Reject => Err(first),
        }
    }
}

fn call_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"Call:\s*(\w+)\(").ok())
        .as_ref()
}

/// Finds the first call directive. The argument text runs to the matching
/// unquoted `)`, or to the last `)` when quoting is unbalanced. Output with
/// no closing parenthesis at all holds no call.
pub fn find_call(output: &str) -> Option<RawCall<'_>> {
    let captures = call_pattern()?.captures(output)?;
    let name = captures.get(1)?.as_str();
    let open_end = captures.get(0)?.end();
    let rest = &output[open_end..];

    let close = closing_paren(rest).or_else(|| rest.rfind(')'))?;
    Some(RawCall {
        name,
        arguments: &rest[..close],
    })
}

fn closing_paren(text: &str) -> Option<usize> {
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for (idx, ch) in text.char_indices() {
        match quote {
            Some(q) => {
                if escaped {
                    escaped = false;
                } else if ch == '\\' {
                    escaped = true;
                } else if ch == q {
                    quote = None;
                }
            }
            None => match ch {
                '\'' | '"' => quote = Some(ch),
                ')' => return Some(idx),
                _ => {}
            },
        }
    }
    None
}

/// Parses the call and applies `policy` to its arguments.
pub fn parse_call(
    output: &str,
    policy: MalformedArgumentPolicy,
) -> Option<(String, Result<ToolArgs, ArgumentError>)> {
    let raw = find_call(output)?;
    Some((raw.name.to_string(), policy.apply(raw.arguments)))
}

/// Splits `key='value'` pairs. Returns every pair that parsed plus an error
/// per rejected token; an unterminated quote rejects the whole list.
pub fn parse_arguments(raw: &str) -> (ToolArgs, Vec<ArgumentError>) {
    let tokens = match split_top_level(raw) {
        Ok(tokens) => tokens,
        Err(err) => return (ToolArgs::new(), vec![err]),
    };

    let mut args = ToolArgs::new();
    let mut errors = Vec::new();
    for token in tokens {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        match parse_pair(token) {
            Ok((key, value)) => args.insert(key, value),
            Err(err) => errors.push(err),
        }
    }
    (args, errors)
}

fn split_top_level(raw: &str) -> Result<Vec<&str>, ArgumentError> {
    let mut tokens = Vec::new();
    let mut start = 0;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (idx, ch) in raw.char_indices() {
        match quote {
            Some(q) => {
                if escaped {
                    escaped = false;
                } else if ch == '\\' {
                    escaped = true;
                } else if ch == q {
                    quote = None;
                }
            }
            None => match ch {
                '\'' | '"' => quote = Some(ch),
                ',' => {
                    tokens.push(&raw[start..idx]);
                    start = idx + 1;
                }
                _ => {}
            },
        }
    }
    if quote.is_some() {
        return Err(ArgumentError::UnterminatedQuote);
    }
    tokens.push(&raw[start..]);
    Ok(tokens)
}

fn parse_pair(token: &str) -> Result<(String, String), ArgumentError> {
    let (key, value) = token
        .split_once('=')
        .ok_or_else(|| ArgumentError::MissingEquals(token.to_string()))?;

    let key = key.trim();
    let key = strip_quotes(key).map(unescape).unwrap_or_else(|| key.to_string());
    if key.is_empty() {
        return Err(ArgumentError::EmptyKey(token.to_string()));
    }

    let value = strip_quotes(value.trim()).ok_or_else(|| ArgumentError::UnquotedValue(key.clone()))?;
    Ok((key, unescape(value)))
}

fn strip_quotes(text: &str) -> Option<&str> {
    let first = text.chars().next()?;
    if (first == '\'' || first == '"') && text.len() >= 2 && text.ends_with(first) {
        Some(&text[1..text.len() - 1])
    } else {
        None
    }
}

fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some(c @ ('\\' | '\'' | '"')) => out.push(c),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn pairs(args: &ToolArgs) -> Vec<(String, String)> {
        args.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn finds_call_and_ignores_trailing_text() {
        let output = "Thought: I should read it.\nCall: read_file(file_path='notes.txt')\nDone.";
        let (name, args) = parse_call(output, MalformedArgumentPolicy::default()).unwrap();
        assert_eq!(name, "read_file");
        assert_eq!(args.unwrap().get("file_path"), Some("notes.txt"));
    }

    #[test]
    fn no_directive_means_no_call() {
        assert!(find_call("Final Answer: hello").is_none());
    }

    #[test]
    fn only_first_call_is_used() {
        let raw = find_call("Call: a(x='1') Call: b(y='2')").unwrap();
        assert_eq!(raw.name, "a");
        assert_eq!(raw.arguments, "x='1'");
    }

    #[test]
    fn parenthesis_inside_quotes_does_not_close() {
        let raw = find_call("Call: create_file(file_path='a.txt', content='f(x) = 1')").unwrap();
        assert_eq!(raw.arguments, "file_path='a.txt', content='f(x) = 1'");
    }

    #[test]
    fn unbalanced_quote_falls_back_to_last_paren() {
        let raw = find_call("Call: t(a='it's') trailing").unwrap();
        assert_eq!(raw.arguments, "a='it's'");
    }

    #[test]
    fn missing_close_paren_is_not_a_call() {
        assert!(find_call("Call: read_file(file_path='x'").is_none());
    }

    #[test]
    fn empty_argument_list() {
        let raw = find_call("Call: list_directory()").unwrap();
        let (args, errors) = parse_arguments(raw.arguments);
        assert!(args.is_empty());
        assert!(errors.is_empty());
    }

    #[rstest]
    #[case("file_path='a.txt'", vec![("file_path", "a.txt")])]
    #[case("file_path=\"a.txt\"", vec![("file_path", "a.txt")])]
    #[case("'file_path'='a.txt'", vec![("file_path", "a.txt")])]
    #[case("a='1', b='2'", vec![("a", "1"), ("b", "2")])]
    #[case("  a = '1' ,b='x, y'", vec![("a", "1"), ("b", "x, y")])]
    #[case("content='line1\\nline2'", vec![("content", "line1\nline2")])]
    #[case("content='it\\'s'", vec![("content", "it's")])]
    #[case("content='a\\\\b'", vec![("content", "a\\b")])]
    #[case("expr='x=1'", vec![("expr", "x=1")])]
    #[case("a='1',", vec![("a", "1")])]
    fn parses_well_formed_arguments(#[case] raw: &str, #[case] expected: Vec<(&str, &str)>) {
        let (args, errors) = parse_arguments(raw);
        assert!(errors.is_empty(), "{errors:?}");
        let expected: Vec<(String, String)> = expected
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        assert_eq!(pairs(&args), expected);
    }

    #[rstest]
    #[case("file_path", ArgumentError::MissingEquals("file_path".into()))]
    #[case("='x'", ArgumentError::EmptyKey("='x'".into()))]
    #[case("file_path=notes.txt", ArgumentError::UnquotedValue("file_path".into()))]
    #[case("a='open", ArgumentError::UnterminatedQuote)]
    fn reports_malformed_tokens(#[case] raw: &str, #[case] expected: ArgumentError) {
        let (_, errors) = parse_arguments(raw);
        assert_eq!(errors, vec![expected]);
    }

    #[rstest]
    #[case(MalformedArgumentPolicy::EmptyFallback, Ok(vec![]))]
    #[case(MalformedArgumentPolicy::KeepValid, Ok(vec![("a", "1")]))]
    #[case(
        MalformedArgumentPolicy::Reject,
        Err(ArgumentError::UnquotedValue("b".into()))
    )]
    fn policies_handle_partial_failure(
        #[case] policy: MalformedArgumentPolicy,
        #[case] expected: Result<Vec<(&str, &str)>, ArgumentError>,
    ) {
        let result = policy.apply("a='1', b=2").map(|args| pairs(&args));
        let expected = expected.map(|v| {
            v.into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<Vec<_>>()
        });
        assert_eq!(result, expected);
    }
}
