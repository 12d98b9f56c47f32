//! JSON envelope for command results and the error → exit code table.

use crate::error::Hint;
use crate::{Error, ErrorCode, Result};
use serde::Serialize;
use std::io::{self, Write};

#[derive(Debug, Serialize)]
pub struct CliResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<CliError>,
}

#[derive(Debug, Serialize)]
pub struct CliError {
    pub code: String,
    pub message: String,
    pub details: serde_json::Value,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub hints: Vec<Hint>,
}

impl<T: Serialize> CliResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            Error::internal_json(e.to_string(), Some("serialize response".to_string()))
        })
    }
}

impl CliResponse<()> {
    pub fn from_error(err: &Error) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(CliError {
                code: err.code.as_str().to_string(),
                message: err.message.clone(),
                details: err.details.clone(),
                hints: err.hints.clone(),
            }),
        }
    }
}

/// Print the envelope for `result` on stdout. A closed pipe is not an error.
pub fn print_result(result: Result<serde_json::Value>) -> Result<()> {
    let payload = match result {
        Ok(data) => CliResponse::success(data).to_json()?,
        Err(err) => CliResponse::<()>::from_error(&err).to_json()?,
    };

    match writeln!(io::stdout().lock(), "{}", payload) {
        Err(e) if e.kind() != io::ErrorKind::BrokenPipe => Err(Error::internal_io(
            e.to_string(),
            Some("write stdout".to_string()),
        )),
        _ => Ok(()),
    }
}

pub fn map_cmd_result_to_json<T: Serialize>(
    result: Result<(T, i32)>,
) -> (Result<serde_json::Value>, i32) {
    match result {
        Ok((data, exit_code)) => match serde_json::to_value(data) {
            Ok(value) => (Ok(value), exit_code),
            Err(err) => (
                Err(Error::internal_json(
                    err.to_string(),
                    Some("serialize response".to_string()),
                )),
                1,
            ),
        },
        Err(err) => {
            let exit_code = exit_code_for_error(err.code);
            (Err(err), exit_code)
        }
    }
}

pub fn exit_code_for_error(code: ErrorCode) -> i32 {
    match code {
        ErrorCode::ConfigInvalidJson
        | ErrorCode::ConfigInvalidValue
        | ErrorCode::ValidationInvalidArgument => 2,

        ErrorCode::ToolNotFound | ErrorCode::ToolCommandFailed => 20,

        ErrorCode::InputClosed | ErrorCode::InternalIoError | ErrorCode::InternalJsonError => 1,
    }
}
