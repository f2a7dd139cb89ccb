//! CLI command implementations
//!
//! Each command loads configuration, reads one search body, scores it and
//! writes one JSON response. A body that decodes but is not a valid search
//! request is reported in the response; it is not a CLI failure.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::complexity::{ComplexityAnalyzer, ComplexityReport};
use crate::dsl::decode_request;
use crate::observability::{log_event_with_fields, Event, LogTarget, Logger, Severity};

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};
use super::io::{read_request, write_json_to};

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Minimum log severity (optional, default "info")
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Destination of non-error log lines (optional, default "stderr")
    #[serde(default = "default_log_target")]
    pub log_target: String,

    /// Include the per-category breakdown in score responses (optional, default false)
    #[serde(default)]
    pub include_breakdown: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_target() -> String {
    "stderr".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_target: default_log_target(),
            include_breakdown: false,
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Load configuration from file, or defaults when no path is given
    pub fn load_or_default(path: Option<&Path>) -> CliResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    fn validate(&self) -> CliResult<()> {
        self.severity()?;
        self.target()?;
        Ok(())
    }

    /// Parsed `log_level`
    pub fn severity(&self) -> CliResult<Severity> {
        Severity::parse(&self.log_level).ok_or_else(|| {
            CliError::config_error(format!(
                "Invalid log_level: '{}'. Must be one of trace, info, warn, error, fatal.",
                self.log_level
            ))
        })
    }

    /// Parsed `log_target`
    pub fn target(&self) -> CliResult<LogTarget> {
        LogTarget::parse(&self.log_target).ok_or_else(|| {
            CliError::config_error(format!(
                "Invalid log_target: '{}'. Must be 'stdout' or 'stderr'.",
                self.log_target
            ))
        })
    }

    /// Applies the logging settings process-wide
    pub fn apply_logging(&self) -> CliResult<()> {
        Logger::set_min_severity(self.severity()?);
        Logger::set_target(self.target()?);
        Ok(())
    }
}

/// What a command reports about a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseMode {
    /// The score, plus the breakdown when configured
    Score,
    /// The full breakdown
    Explain,
}

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_command(cli.command)
}

/// Dispatch a parsed command, writing the response to stdout
pub fn run_command(command: Command) -> CliResult<()> {
    run_command_to(command, &mut io::stdout())
}

/// Dispatch a parsed command, writing the response to `out`.
///
/// Returns `Err` only for fatal errors (configuration, I/O, JSON syntax).
/// A body that is not a valid search request is answered on `out`.
pub fn run_command_to<W: Write>(command: Command, out: &mut W) -> CliResult<()> {
    match command {
        Command::Score { config, input } => {
            execute(ResponseMode::Score, config.as_deref(), input.as_deref(), out)
        }
        Command::Explain { config, input } => {
            execute(ResponseMode::Explain, config.as_deref(), input.as_deref(), out)
        }
    }
}

fn execute<W: Write>(
    mode: ResponseMode,
    config_path: Option<&Path>,
    input: Option<&Path>,
    out: &mut W,
) -> CliResult<()> {
    let config = Config::load_or_default(config_path)?;
    config.apply_logging()?;
    if let Some(path) = config_path {
        let path = path.display().to_string();
        log_event_with_fields(Event::ConfigLoaded, &[("path", path.as_str())]);
    }

    let body = read_request(input)?;
    let response = handle_request(mode, &config, &body);
    write_json_to(out, &response)
}

/// Scores one search body and builds the JSON response.
///
/// Never fails: an undecodable body yields an error response.
pub fn handle_request(mode: ResponseMode, config: &Config, body: &Value) -> Value {
    let request_id = Uuid::new_v4().to_string();
    log_event_with_fields(Event::RequestReceived, &[("request_id", request_id.as_str())]);

    let request = match decode_request(body) {
        Ok(request) => request,
        Err(e) => {
            log_event_with_fields(
                Event::RequestRejected,
                &[
                    ("code", e.code()),
                    ("path", e.path()),
                    ("request_id", request_id.as_str()),
                ],
            );
            return json!({
                "status": "error",
                "code": e.code(),
                "message": e.to_string(),
                "path": e.path(),
            });
        }
    };

    let aggregation_count = request.aggregations.len().to_string();
    log_event_with_fields(
        Event::RequestDecoded,
        &[
            ("aggregations", aggregation_count.as_str()),
            ("has_query", if request.query.is_some() { "true" } else { "false" }),
            ("request_id", request_id.as_str()),
        ],
    );

    let score = ComplexityAnalyzer::new().calculate(request.query.as_ref(), &request.aggregations);
    let score_str = score.to_string();
    log_event_with_fields(
        Event::ScoreComputed,
        &[("request_id", request_id.as_str()), ("score", score_str.as_str())],
    );

    let data = match mode {
        ResponseMode::Score if config.include_breakdown => {
            let report = ComplexityReport::build(request.query.as_ref(), &request.aggregations);
            json!({ "score": score, "breakdown": report })
        }
        ResponseMode::Score => json!({ "score": score }),
        ResponseMode::Explain => {
            let report = ComplexityReport::build(request.query.as_ref(), &request.aggregations);
            json!({ "report": report, "text": report.to_string() })
        }
    };

    json!({ "status": "ok", "data": data })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    fn score_command(config: Option<&Path>, input: Option<&Path>) -> Command {
        Command::Score {
            config: config.map(Path::to_path_buf),
            input: input.map(Path::to_path_buf),
        }
    }

    #[test]
    fn test_config_defaults() {
        let file = write_config("{}");
        let config = Config::load(file.path()).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.severity().unwrap(), Severity::Info);
        assert_eq!(config.target().unwrap(), LogTarget::Stderr);
    }

    #[test]
    fn test_config_invalid_log_level() {
        let file = write_config(r#"{"log_level": "loud"}"#);
        let err = Config::load(file.path()).unwrap_err();
        assert_eq!(err.code_str(), "QC_CLI_CONFIG_ERROR");
        assert!(err.message().contains("loud"));
    }

    #[test]
    fn test_config_unknown_field_rejected() {
        let file = write_config(r#"{"wildcard_penalty": 50}"#);
        let err = Config::load(file.path()).unwrap_err();
        assert_eq!(err.code_str(), "QC_CLI_CONFIG_ERROR");
    }

    #[test]
    fn test_config_missing_file() {
        let err = Config::load(Path::new("/nonexistent/querycost.json")).unwrap_err();
        assert!(err.message().contains("Failed to read config"));
    }

    #[test]
    fn test_handle_score_request() {
        let body = json!({
            "query": {
                "bool": {
                    "must": [ { "term": { "field1": "value1" } } ],
                    "should": [ {
                        "bool": {
                            "must": [
                                { "term": { "field2": "value2" } },
                                { "wildcard": { "field3": "val*" } }
                            ]
                        }
                    } ]
                }
            }
        });

        let response = handle_request(ResponseMode::Score, &Config::default(), &body);
        assert_eq!(response["status"], "ok");
        assert_eq!(response["data"]["score"], 25);
        assert!(response["data"].get("breakdown").is_none());
    }

    #[test]
    fn test_handle_score_with_breakdown() {
        let config = Config {
            include_breakdown: true,
            ..Config::default()
        };
        let body = json!({ "aggs": { "a": { "avg": { "field": "x" } } } });

        let response = handle_request(ResponseMode::Score, &config, &body);
        assert_eq!(response["data"]["score"], 5);
        assert_eq!(response["data"]["breakdown"]["aggregation_nodes"], 1);
    }

    #[test]
    fn test_handle_explain_request() {
        let body = json!({ "query": { "wildcard": { "name": "k*" } } });

        let response = handle_request(ResponseMode::Explain, &Config::default(), &body);
        assert_eq!(response["data"]["report"]["total"], 21);
        assert!(response["data"]["text"].as_str().unwrap().contains("Total: 21"));
    }

    #[test]
    fn test_handle_invalid_request() {
        let body = json!({ "query": {} });

        let response = handle_request(ResponseMode::Score, &Config::default(), &body);
        assert_eq!(response["status"], "error");
        assert_eq!(response["code"], "QC_DSL_EMPTY_CLAUSE");
        assert_eq!(response["path"], "$.query");
    }

    #[test]
    fn test_run_command_scores_body() {
        let config = write_config(r#"{"log_level": "error"}"#);
        let input = write_config(r#"{"query": {"wildcard": {"name": "k*"}}}"#);

        let mut out = Vec::new();
        run_command_to(score_command(Some(config.path()), Some(input.path())), &mut out).unwrap();

        let response: Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(response["status"], "ok");
        assert_eq!(response["data"]["score"], 21);
    }

    #[test]
    fn test_run_command_undecodable_body_not_fatal() {
        let config = write_config(r#"{"log_level": "error"}"#);
        let input = write_config(r#"{"query": {"bool": {"must": "term"}}}"#);

        let mut out = Vec::new();
        let result = run_command_to(score_command(Some(config.path()), Some(input.path())), &mut out);
        assert!(result.is_ok());

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 1);
        let response: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(response["status"], "error");
        assert_eq!(response["code"], "QC_DSL_INVALID_BOOL_CLAUSE");
    }

    #[test]
    fn test_run_command_bad_config_is_fatal() {
        let config = write_config(r#"{"log_target": "syslog"}"#);
        let input = write_config(r#"{"query": {"match_all": {}}}"#);

        let mut out = Vec::new();
        let err = run_command_to(score_command(Some(config.path()), Some(input.path())), &mut out)
            .unwrap_err();
        assert_eq!(err.code_str(), "QC_CLI_CONFIG_ERROR");
        assert!(out.is_empty());
    }

    #[test]
    fn test_run_command_missing_input_is_fatal() {
        let mut out = Vec::new();
        let command = Command::Explain {
            config: None,
            input: Some("/nonexistent/body.json".into()),
        };
        let err = run_command_to(command, &mut out).unwrap_err();
        assert_eq!(err.code_str(), "QC_CLI_IO_ERROR");
        assert!(out.is_empty());
    }

    #[test]
    fn test_run_command_malformed_json_is_fatal() {
        let input = write_config("{\"query\": ");

        let mut out = Vec::new();
        let err = run_command_to(score_command(None, Some(input.path())), &mut out).unwrap_err();
        assert_eq!(err.code_str(), "QC_CLI_INVALID_JSON");
        assert!(out.is_empty());
    }
}
