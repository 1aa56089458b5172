//! Colscope MCP Server
//!
//! Newline-delimited JSON-RPC 2.0 over stdio.
//!
//! Tools:
//! - list_columns: Column names of a row set
//! - analyze_column: Type, summary, bins, series view and optional forecast for one column
//! - analyze_dataset: Analysis of every column
//! - forecast: Linear forecast with confidence band for a number series
//! - moving_average: Centered moving average of a number series

use colscope::{AnalysisConfig, Analyzer, Dataset, ForecastRequest, ScopeError};
use colscope_core::Cell;
use colscope_stats::{extract_numbers, moving_average};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};
use std::io::{self, BufRead, Write};
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

const PROTOCOL_VERSION: &str = "2025-11-25";
const SERVER_NAME: &str = "colscope";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

const PARSE_ERROR: i32 = -32700;
const METHOD_NOT_FOUND: i32 = -32601;
const INVALID_PARAMS: i32 = -32602;

// MCP Protocol types
#[derive(Debug, Deserialize)]
struct McpRequest {
    #[allow(dead_code)]
    jsonrpc: String,
    id: Option<JsonValue>,
    method: String,
    #[serde(default)]
    params: Option<JsonValue>,
}

#[derive(Debug, Serialize)]
struct McpResponse {
    jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<McpError>,
}

#[derive(Debug, Serialize)]
struct McpError {
    code: i32,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<JsonValue>,
}

impl McpError {
    fn invalid_params(message: impl Into<String>) -> Self {
        Self {
            code: INVALID_PARAMS,
            message: message.into(),
            data: None,
        }
    }
}

impl McpResponse {
    fn new(id: Option<JsonValue>, result: Result<JsonValue, McpError>) -> Self {
        match result {
            Ok(r) => Self {
                jsonrpc: "2.0".to_string(),
                id,
                result: Some(r),
                error: None,
            },
            Err(e) => Self {
                jsonrpc: "2.0".to_string(),
                id,
                result: None,
                error: Some(e),
            },
        }
    }
}

fn main() {
    // stdout carries the protocol, so logs go to stderr
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AnalysisConfig::from_env();
    info!(version = SERVER_VERSION, protocol = PROTOCOL_VERSION, ?config, "colscope MCP server started");
    let analyzer = Analyzer::new(config);

    let stdin = io::stdin();
    let mut reader = io::BufReader::new(stdin.lock());

    loop {
        let mut line = String::new();
        match reader.read_line(&mut line) {
            Ok(0) => {
                info!("client disconnected (EOF)");
                break;
            }
            Ok(_) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                debug!(bytes = line.len(), "received request");

                let response = match serde_json::from_str::<McpRequest>(line) {
                    Ok(request) => {
                        debug!(method = %request.method, "processing");
                        let response = handle_request(&analyzer, &request);
                        // Notifications (no id) get no response
                        if request.id.is_none() {
                            debug!(method = %request.method, "notification processed");
                            continue;
                        }
                        response
                    }
                    Err(e) => {
                        warn!(error = %e, "malformed request");
                        McpResponse::new(
                            None,
                            Err(McpError {
                                code: PARSE_ERROR,
                                message: format!("Parse error: {}", e),
                                data: None,
                            }),
                        )
                    }
                };

                if let Err(e) = write_response(&response) {
                    error!(error = %e, "failed to write response");
                    break;
                }
            }
            Err(e) => {
                error!(error = %e, "failed to read input");
                break;
            }
        }
    }

    info!("server shutting down");
}

fn write_response(response: &McpResponse) -> io::Result<()> {
    let text = serde_json::to_string(response)?;
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", text)?;
    stdout.flush()
}

fn handle_request(analyzer: &Analyzer, request: &McpRequest) -> McpResponse {
    let result = match request.method.as_str() {
        // Lifecycle
        "initialize" => handle_initialize(&request.params),
        "initialized" => Ok(json!({})),
        "ping" => Ok(json!({})),

        // Tools
        "tools/list" => handle_tools_list(),
        "tools/call" => handle_tool_call(analyzer, &request.params),

        _ => Err(McpError {
            code: METHOD_NOT_FOUND,
            message: format!("Method not found: {}", request.method),
            data: None,
        }),
    };

    McpResponse::new(request.id.clone(), result)
}

fn handle_initialize(params: &Option<JsonValue>) -> Result<JsonValue, McpError> {
    let client_info = params
        .as_ref()
        .and_then(|p| p.get("clientInfo"))
        .and_then(|c| c.get("name"))
        .and_then(|n| n.as_str())
        .unwrap_or("unknown");

    // Use client's protocol version for compatibility
    let client_protocol = params
        .as_ref()
        .and_then(|p| p.get("protocolVersion"))
        .and_then(|v| v.as_str())
        .unwrap_or(PROTOCOL_VERSION);

    info!(client = client_info, protocol = client_protocol, "client connected");

    Ok(json!({
        "protocolVersion": client_protocol,
        "serverInfo": {
            "name": SERVER_NAME,
            "version": SERVER_VERSION,
            "description": "Exploratory column analysis for tabular data"
        },
        "capabilities": {
            "tools": {
                "listChanged": false
            }
        },
        "instructions": "Pass rows as an array of JSON objects. Use 'list_columns' to see column names, 'analyze_column' for one column, 'analyze_dataset' for all of them, and 'forecast' or 'moving_average' for a plain number series."
    }))
}

fn handle_tools_list() -> Result<JsonValue, McpError> {
    let rows_schema = json!({
        "type": "array",
        "items": { "type": "object" },
        "description": "Rows as objects mapping column name to cell value"
    });
    let values_schema = json!({
        "type": "array",
        "items": { "type": ["number", "string", "null"] },
        "description": "Series values; entries that are not numbers are dropped"
    });

    Ok(json!({
        "tools": [
            {
                "name": "list_columns",
                "description": "List the column names of a row set, in the key order of the first row.",
                "inputSchema": {
                    "type": "object",
                    "properties": { "rows": rows_schema },
                    "required": ["rows"]
                }
            },
            {
                "name": "analyze_column",
                "description": "Infer a column's type and compute its statistics, histogram bins and series view. Numeric columns can also be forecast.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "rows": rows_schema,
                        "column": { "type": "string", "description": "Column name" },
                        "forecast": {
                            "type": ["boolean", "object"],
                            "description": "true for the default forecast, or {horizon, confidence}",
                            "properties": {
                                "horizon": { "type": "integer", "minimum": 1 },
                                "confidence": { "type": "integer", "enum": [90, 95, 99] }
                            }
                        }
                    },
                    "required": ["rows", "column"]
                }
            },
            {
                "name": "analyze_dataset",
                "description": "Analyze every column of a row set.",
                "inputSchema": {
                    "type": "object",
                    "properties": { "rows": rows_schema },
                    "required": ["rows"]
                }
            },
            {
                "name": "forecast",
                "description": "Fit a least-squares line to a series and project it forward with a confidence band.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "values": values_schema,
                        "horizon": { "type": "integer", "minimum": 1, "description": "Steps to project (default 5)" },
                        "confidence": { "type": "integer", "enum": [90, 95, 99], "description": "Confidence level in percent (default 95)" }
                    },
                    "required": ["values"]
                }
            },
            {
                "name": "moving_average",
                "description": "Centered moving average; the window shrinks at the edges.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "values": values_schema,
                        "window": { "type": "integer", "minimum": 1, "description": "Window size (default 5)" }
                    },
                    "required": ["values"]
                }
            }
        ]
    }))
}

fn handle_tool_call(analyzer: &Analyzer, params: &Option<JsonValue>) -> Result<JsonValue, McpError> {
    let params = params
        .as_ref()
        .ok_or_else(|| McpError::invalid_params("Missing params"))?;

    let name = params
        .get("name")
        .and_then(|v| v.as_str())
        .ok_or_else(|| McpError::invalid_params("Missing tool name"))?;

    let args = params.get("arguments").cloned().unwrap_or(json!({}));

    let outcome = match name {
        "list_columns" => tool_list_columns(&args),
        "analyze_column" => tool_analyze_column(analyzer, &args),
        "analyze_dataset" => tool_analyze_dataset(analyzer, &args),
        "forecast" => tool_forecast(analyzer, &args),
        "moving_average" => tool_moving_average(analyzer, &args),
        _ => return Err(McpError::invalid_params(format!("Unknown tool: {}", name))),
    };

    Ok(match outcome {
        Ok(value) => tool_result(&value, false),
        Err(e) => {
            warn!(tool = name, code = %e.code, "tool failed: {}", e.message);
            tool_result(&json!({ "error": e }), true)
        }
    })
}

fn tool_result(value: &JsonValue, is_error: bool) -> JsonValue {
    let text = serde_json::to_string_pretty(value).unwrap_or_else(|e| e.to_string());
    json!({
        "content": [{ "type": "text", "text": text }],
        "structuredContent": value,
        "isError": is_error
    })
}

// ===== Tools =====

fn tool_list_columns(args: &JsonValue) -> Result<JsonValue, ScopeError> {
    let dataset = rows_arg(args)?;
    Ok(json!({
        "columns": dataset.columns(),
        "row_count": dataset.row_count()
    }))
}

fn tool_analyze_column(analyzer: &Analyzer, args: &JsonValue) -> Result<JsonValue, ScopeError> {
    let dataset = rows_arg(args)?;
    let column = args
        .get("column")
        .and_then(|v| v.as_str())
        .ok_or_else(|| ScopeError::invalid_argument("column", "expected a column name"))?;
    let request = forecast_arg(analyzer.config(), args.get("forecast"))?;

    to_json(&analyzer.analyze_column(&dataset, column, request)?)
}

fn tool_analyze_dataset(analyzer: &Analyzer, args: &JsonValue) -> Result<JsonValue, ScopeError> {
    let dataset = rows_arg(args)?;
    to_json(&analyzer.analyze_dataset(&dataset))
}

fn tool_forecast(analyzer: &Analyzer, args: &JsonValue) -> Result<JsonValue, ScopeError> {
    let column = values_arg(args)?;
    let request = analyzer.config().request(
        usize_arg(args, "horizon")?,
        confidence_arg(args)?,
    );
    to_json(&analyzer.forecast_column(&column, &request)?)
}

fn tool_moving_average(analyzer: &Analyzer, args: &JsonValue) -> Result<JsonValue, ScopeError> {
    let column = values_arg(args)?;
    let window = usize_arg(args, "window")?.unwrap_or(analyzer.config().smoothing_window);
    let values = extract_numbers(&column.cells);
    let smoothed = moving_average(&values, window)?;
    Ok(json!({
        "window": window,
        "values": values,
        "moving_average": smoothed
    }))
}

// ===== Argument helpers =====

fn rows_arg(args: &JsonValue) -> Result<Dataset, ScopeError> {
    let rows = args
        .get("rows")
        .ok_or_else(|| ScopeError::invalid_argument("rows", "missing"))?;
    Dataset::from_json(rows)
}

fn values_arg(args: &JsonValue) -> Result<colscope_core::Column, ScopeError> {
    let values = args
        .get("values")
        .and_then(|v| v.as_array())
        .ok_or_else(|| ScopeError::invalid_argument("values", "expected an array"))?;
    Ok(colscope_core::Column::new(
        "values",
        values.iter().map(Cell::from).collect(),
    ))
}

fn usize_arg(args: &JsonValue, name: &str) -> Result<Option<usize>, ScopeError> {
    match args.get(name) {
        None | Some(JsonValue::Null) => Ok(None),
        Some(v) => v
            .as_u64()
            .map(|n| Some(n as usize))
            .ok_or_else(|| ScopeError::invalid_argument(name, "expected a non-negative integer")),
    }
}

/// Percentages too large for `u32` map to 0 so they take the 95% fallback
fn confidence_arg(args: &JsonValue) -> Result<Option<u32>, ScopeError> {
    Ok(usize_arg(args, "confidence")?.map(|c| u32::try_from(c).unwrap_or(0)))
}

/// `forecast` may be absent, a boolean, or `{horizon, confidence}`
fn forecast_arg(
    config: &AnalysisConfig,
    value: Option<&JsonValue>,
) -> Result<Option<ForecastRequest>, ScopeError> {
    match value {
        None | Some(JsonValue::Null) | Some(JsonValue::Bool(false)) => Ok(None),
        Some(JsonValue::Bool(true)) => Ok(Some(config.default_request())),
        Some(options @ JsonValue::Object(_)) => Ok(Some(config.request(
            usize_arg(options, "horizon")?,
            confidence_arg(options)?,
        ))),
        Some(_) => Err(ScopeError::invalid_argument(
            "forecast",
            "expected a boolean or an object",
        )),
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<JsonValue, ScopeError> {
    serde_json::to_value(value).map_err(|e| ScopeError::internal(e.to_string()))
}
