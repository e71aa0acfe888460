// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! One entry point for every registry query, for callers that speak JSON.
//!
//! A [`RequestHandler`] accepts a [`RequestInput`] (a code, a command string, a
//! structured [`Request`] or a batch of those) and always answers with a
//! [`RequestOutcome`]. Bad input and failed queries become `error` outcomes;
//! nothing here panics or returns `Err`.
//!
//! # Wire shape
//!
//! ```json
//! {"status": "success", "request_type": "code_translation", "code": 11,
//!  "translation": "active", "system": "universal_foundation", ...}
//! {"status": "error", "request_type": "code_translation", "error": "Unknown code: 12"}
//! ```

mod command;

pub use command::{parse_command, Request, RequestInput, OPERATIONS};

use crate::advisor::{AdditionReport, AllocationAdvisor, AllocationSuggestion};
use crate::errors::QueryError;
use crate::registry::{Code, RegistryIndex};
use crate::translator::{CodeInfo, SubsystemUsage, SystemSummary, Translator};
use serde::Serialize;
use std::sync::Arc;

/// JSON shapes a handler may be sent, named in `Unsupported request type` errors.
const INPUT_KINDS: &[&str] = &["integer", "string", "object", "array"];

const COMMANDS: &[(&str, &str)] = &[
    ("<code>", "Translate a code to its symbol"),
    ("search <term>", "Find codes whose symbol contains <term>"),
    ("suggest <concept>", "Suggest a free block of codes for a new concept"),
    ("validate <code> <symbol> <system>", "Check a proposed code before adding it"),
    ("summary", "Per-system usage of the code space"),
    ("help", "Show this help"),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    pub code: Code,
    pub symbol: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HelpEntry {
    pub usage: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub successful: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchItem {
    pub batch_index: usize,
    #[serde(flatten)]
    pub outcome: RequestOutcome,
}

/// Payload of a successful request, tagged by `request_type`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "request_type", rename_all = "snake_case")]
pub enum Response {
    CodeTranslation {
        code: Code,
        translation: String,
        system: Option<String>,
        formatted: String,
        detailed_info: CodeInfo,
    },
    NameSearch {
        search_term: String,
        results: Vec<SearchHit>,
        count: usize,
    },
    CodeSuggestion {
        concept: String,
        size: u32,
        suggestion: AllocationSuggestion,
    },
    Validation {
        validation_result: AdditionReport,
    },
    SystemInfo {
        system: String,
        info: SubsystemUsage,
    },
    RangeCheck {
        code: Code,
        system: String,
        valid: bool,
    },
    SystemSummary {
        data: SystemSummary,
    },
    Help {
        commands: Vec<HelpEntry>,
        operations: &'static [&'static str],
    },
    Batch {
        total_requests: usize,
        results: Vec<BatchItem>,
        summary: BatchSummary,
    },
}

/// Why a request failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestFailure {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_type: Option<&'static str>,
    pub error: String,
    /// Valid alternatives, when the failure was an unknown name.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub available: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RequestOutcome {
    Success(Response),
    Error(RequestFailure),
}

impl RequestOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RequestOutcome::Success(_))
    }

    fn failure(request_type: &'static str, error: impl ToString) -> Self {
        RequestOutcome::Error(RequestFailure {
            request_type: Some(request_type),
            error: error.to_string(),
            available: Vec::new(),
        })
    }

    fn from_result(request_type: &'static str, result: Result<Response, QueryError>) -> Self {
        match result {
            Ok(response) => RequestOutcome::Success(response),
            Err(err) => Self::failure(request_type, err),
        }
    }
}

/// Answers requests against one index snapshot.
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use the_codebook::registry::{build_registry, CodeDefinitionGroup, SystemRange};
/// use the_codebook::request::{RequestHandler, RequestInput};
///
/// let index = build_registry(
///     vec![SystemRange::new("status", 0, 49, "Status").unwrap()],
///     vec![CodeDefinitionGroup::new("Status", "").with_entry(11, "active")],
/// ).unwrap();
/// let handler = RequestHandler::new(Arc::new(index));
///
/// let outcome = handler.handle(&RequestInput::Code(11));
/// let json = serde_json::to_value(&outcome).unwrap();
/// assert_eq!(json["status"], "success");
/// assert_eq!(json["translation"], "active");
/// ```
#[derive(Debug, Clone)]
pub struct RequestHandler {
    translator: Translator,
    advisor: AllocationAdvisor,
}

impl RequestHandler {
    pub fn new(index: Arc<RegistryIndex>) -> Self {
        Self {
            translator: Translator::new(Arc::clone(&index)),
            advisor: AllocationAdvisor::new(index),
        }
    }

    pub fn handle(&self, input: &RequestInput) -> RequestOutcome {
        match input {
            RequestInput::Code(code) => self.translate(*code),
            RequestInput::Command(text) => match parse_command(text) {
                Ok(request) => self.handle_request(&request),
                Err(error) => RequestOutcome::failure("command", error),
            },
            RequestInput::Structured(request) => self.handle_request(request),
            RequestInput::Batch(items) => self.batch(items),
            RequestInput::Unrecognized(value) => unrecognized(value),
        }
    }

    /// Parse `text` as JSON and handle it; a parse failure is an error outcome.
    pub fn handle_json(&self, text: &str) -> RequestOutcome {
        match serde_json::from_str::<RequestInput>(text) {
            Ok(input) => self.handle(&input),
            Err(err) => RequestOutcome::failure("json", format!("Invalid JSON request: {}", err)),
        }
    }

    pub fn handle_request(&self, request: &Request) -> RequestOutcome {
        match request {
            Request::Translate { code } => self.translate(*code),
            Request::Search { term } => self.search(term),
            Request::Suggest { concept, size } => RequestOutcome::from_result(
                "code_suggestion",
                self.advisor
                    .suggest_allocation(concept, *size)
                    .map(|suggestion| Response::CodeSuggestion {
                        concept: concept.clone(),
                        size: *size,
                        suggestion,
                    }),
            ),
            Request::Validate { code, symbol, system } => {
                RequestOutcome::Success(Response::Validation {
                    validation_result: self.advisor.validate_code_addition(*code, symbol, system),
                })
            }
            Request::SystemInfo { system } => self.system_info(system),
            Request::RangeCheck { code, system } => RequestOutcome::from_result(
                "range_check",
                self.translator
                    .range_check(*code, system)
                    .map(|valid| Response::RangeCheck {
                        code: *code,
                        system: system.clone(),
                        valid,
                    }),
            ),
            Request::Summary => RequestOutcome::Success(Response::SystemSummary {
                data: self.translator.get_system_summary(),
            }),
            Request::Help => RequestOutcome::Success(Response::Help {
                commands: COMMANDS
                    .iter()
                    .map(|&(usage, description)| HelpEntry { usage, description })
                    .collect(),
                operations: OPERATIONS,
            }),
        }
    }

    fn translate(&self, code: Code) -> RequestOutcome {
        let result = self.translator.get_code_info(code).map(|info| Response::CodeTranslation {
            code,
            translation: info.symbol.clone(),
            system: info.subsystem.clone(),
            formatted: self.translator.format_code_with_context(code),
            detailed_info: info,
        });
        RequestOutcome::from_result("code_translation", result)
    }

    fn search(&self, term: &str) -> RequestOutcome {
        let results: Vec<SearchHit> = self
            .translator
            .find_codes_by_name(term)
            .into_iter()
            .map(|(code, symbol)| SearchHit {
                code,
                symbol: symbol.to_string(),
            })
            .collect();
        RequestOutcome::Success(Response::NameSearch {
            search_term: term.to_string(),
            count: results.len(),
            results,
        })
    }

    fn system_info(&self, system: &str) -> RequestOutcome {
        let mut summary = self.translator.get_system_summary();
        match summary.per_subsystem.iter().position(|usage| usage.label == system) {
            Some(at) => RequestOutcome::Success(Response::SystemInfo {
                system: system.to_string(),
                info: summary.per_subsystem.swap_remove(at),
            }),
            None => RequestOutcome::Error(RequestFailure {
                request_type: Some("system_info"),
                error: format!("System '{}' not found", system),
                available: summary.per_subsystem.into_iter().map(|usage| usage.label).collect(),
            }),
        }
    }

    fn batch(&self, items: &[RequestInput]) -> RequestOutcome {
        let results: Vec<BatchItem> = items
            .iter()
            .enumerate()
            .map(|(batch_index, item)| BatchItem {
                batch_index,
                outcome: self.handle(item),
            })
            .collect();
        let successful = results.iter().filter(|item| item.outcome.is_success()).count();

        RequestOutcome::Success(Response::Batch {
            total_requests: items.len(),
            summary: BatchSummary {
                successful,
                failed: results.len() - successful,
            },
            results,
        })
    }
}

fn unrecognized(value: &serde_json::Value) -> RequestOutcome {
    if value.is_object() {
        let error = match serde_json::from_value::<Request>(value.clone()) {
            Err(err) => format!("Invalid structured request: {}", err),
            Ok(_) => "Invalid structured request".to_string(),
        };
        return RequestOutcome::Error(RequestFailure {
            request_type: Some("structured"),
            error,
            available: OPERATIONS.iter().map(|op| op.to_string()).collect(),
        });
    }
    RequestOutcome::Error(RequestFailure {
        request_type: None,
        error: format!("Unsupported request: {}", value),
        available: INPUT_KINDS.iter().map(|kind| kind.to_string()).collect(),
    })
}
