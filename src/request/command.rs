// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::consts::DEFAULT_ALLOCATION_SIZE;
use crate::registry::Code;
use serde::{Deserialize, Serialize};

/// Every operation names this field in its structured form.
pub const OPERATIONS: &[&str] = &[
    "translate",
    "search",
    "suggest",
    "validate",
    "system_info",
    "range_check",
    "summary",
    "help",
];

/// One query against the registry, in structured form.
///
/// # Example
/// ```json
/// {"operation": "suggest", "concept": "payment processing", "size": 20}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "operation", rename_all = "snake_case")]
pub enum Request {
    Translate {
        code: Code,
    },
    Search {
        #[serde(alias = "search_term")]
        term: String,
    },
    Suggest {
        concept: String,
        #[serde(default = "default_size")]
        size: u32,
    },
    Validate {
        code: Code,
        #[serde(alias = "name")]
        symbol: String,
        system: String,
    },
    SystemInfo {
        system: String,
    },
    RangeCheck {
        code: Code,
        system: String,
    },
    Summary,
    Help,
}

fn default_size() -> u32 {
    DEFAULT_ALLOCATION_SIZE
}

/// Anything a caller may hand the request handler.
///
/// Deserialises from any JSON value: a number, a command string, a structured
/// [`Request`], a list of inputs, or (as a last resort) whatever else was sent,
/// which the handler answers with an error outcome.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RequestInput {
    Code(Code),
    Command(String),
    Structured(Request),
    Batch(Vec<RequestInput>),
    Unrecognized(serde_json::Value),
}

impl From<Request> for RequestInput {
    fn from(request: Request) -> Self {
        RequestInput::Structured(request)
    }
}

/// Turn a command line such as `search login` into a [`Request`].
///
/// Commands are matched case-insensitively; their arguments keep their case.
/// `help`/`?`, `summary`/`systems`, `search <term>`, `suggest <concept>`,
/// `validate <code> <symbol> <system>` and a bare number are recognised;
/// anything else is a name search for the whole text.
pub fn parse_command(input: &str) -> Result<Request, String> {
    let text = input.trim();
    let lower = text.to_lowercase();

    if lower.starts_with("help") || lower == "?" {
        return Ok(Request::Help);
    }
    if lower.starts_with("summary") || lower == "systems" {
        return Ok(Request::Summary);
    }
    if let Some(term) = strip_prefix_ignore_case(text, "search ") {
        return Ok(Request::Search {
            term: term.trim().to_string(),
        });
    }
    if let Some(concept) = strip_prefix_ignore_case(text, "suggest ") {
        return Ok(Request::Suggest {
            concept: concept.trim().to_string(),
            size: DEFAULT_ALLOCATION_SIZE,
        });
    }
    if let Some(args) = strip_prefix_ignore_case(text, "validate ") {
        return parse_validate(args);
    }
    if !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit()) {
        return text
            .parse::<Code>()
            .map(|code| Request::Translate { code })
            .map_err(|_| format!("Code '{}' is out of range", text));
    }

    Ok(Request::Search {
        term: text.to_string(),
    })
}

fn parse_validate(args: &str) -> Result<Request, String> {
    let parts: Vec<&str> = args.split_whitespace().collect();
    let [code, symbol, system, ..] = parts.as_slice() else {
        return Err("Validation requires: code, symbol, and system".to_string());
    };
    let code = code
        .parse::<Code>()
        .map_err(|_| "Invalid validation format. Use: validate <code> <symbol> <system>".to_string())?;
    Ok(Request::Validate {
        code,
        symbol: symbol.to_string(),
        system: system.to_string(),
    })
}

fn strip_prefix_ignore_case<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let head = text.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &text[prefix.len()..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_command("?"), Ok(Request::Help));
        assert_eq!(parse_command("HELP me"), Ok(Request::Help));
        assert_eq!(parse_command("systems"), Ok(Request::Summary));
        assert_eq!(
            parse_command("Search Login"),
            Ok(Request::Search { term: "Login".to_string() })
        );
        assert_eq!(
            parse_command("suggest payment processing"),
            Ok(Request::Suggest { concept: "payment processing".to_string(), size: 10 })
        );
        assert_eq!(parse_command(" 1001 "), Ok(Request::Translate { code: 1001 }));
        assert_eq!(
            parse_command("warning"),
            Ok(Request::Search { term: "warning".to_string() })
        );
    }

    #[test]
    fn test_parse_validate() {
        assert_eq!(
            parse_command("validate 1234 test_name auth_system"),
            Ok(Request::Validate {
                code: 1234,
                symbol: "test_name".to_string(),
                system: "auth_system".to_string(),
            })
        );
        assert!(parse_command("validate 1234 test_name").is_err());
        assert!(parse_command("validate abc test_name auth_system").is_err());
    }

    #[test]
    fn test_oversized_number_is_an_error() {
        assert!(parse_command("99999999999").is_err());
    }

    #[test]
    fn test_structured_requests_from_json() {
        let request: Request =
            serde_json::from_str(r#"{"operation": "search", "search_term": "login"}"#).unwrap();
        assert_eq!(request, Request::Search { term: "login".to_string() });

        let request: Request =
            serde_json::from_str(r#"{"operation": "suggest", "concept": "payments"}"#).unwrap();
        assert_eq!(request, Request::Suggest { concept: "payments".to_string(), size: 10 });

        let request: Request = serde_json::from_str(
            r#"{"operation": "validate", "code": 98, "name": "x", "system": "universal_foundation"}"#,
        )
        .unwrap();
        assert!(matches!(request, Request::Validate { code: 98, .. }));

        assert!(serde_json::from_str::<Request>(r#"{"operation": "translate"}"#).is_err());
    }

    #[test]
    fn test_input_variants() {
        let input: RequestInput = serde_json::from_str("11").unwrap();
        assert_eq!(input, RequestInput::Code(11));

        let input: RequestInput = serde_json::from_str(r#""search login""#).unwrap();
        assert_eq!(input, RequestInput::Command("search login".to_string()));

        let input: RequestInput = serde_json::from_str(r#"{"operation": "summary"}"#).unwrap();
        assert_eq!(input, RequestInput::Structured(Request::Summary));

        let input: RequestInput = serde_json::from_str(r#"[11, "help"]"#).unwrap();
        assert_eq!(
            input,
            RequestInput::Batch(vec![
                RequestInput::Code(11),
                RequestInput::Command("help".to_string()),
            ])
        );

        let input: RequestInput = serde_json::from_str("-4").unwrap();
        assert!(matches!(input, RequestInput::Unrecognized(_)));

        let input: RequestInput = serde_json::from_str(r#"{"operation": "bogus"}"#).unwrap();
        assert!(matches!(input, RequestInput::Unrecognized(_)));
    }
}
