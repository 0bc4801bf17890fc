//! Remote evaluation API types
//!
//! The simulator and resolver are external. This module only owns the wire
//! shapes, turns error fields into `ApiError`, and keeps the last good result
//! on screen while a failure is reported next to it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::board::SparseGrid;

/// Failures surfaced from a simulate/resolve round trip
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("remote error: {0}")]
    Remote(String),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("response carried no board")]
    MissingBoard,
}

/// Board simulation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationRequest {
    /// Board in the spaced grid dialect
    pub board: String,
    pub val_a: i64,
    pub val_b: i64,
    pub turns: u32,
}

impl SimulationRequest {
    pub fn new(grid: &SparseGrid, val_a: i64, val_b: i64, turns: u32) -> Self {
        Self {
            board: grid.serialize(),
            val_a,
            val_b,
            turns,
        }
    }

    pub fn to_json(&self) -> Result<String, ApiError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Board simulation response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResponse {
    pub board: String,
    /// Any JSON number, fractional or exponent forms included
    pub output: Option<f64>,
    pub score: f64,
    pub error: Option<String>,
}

/// A successful simulation, board already parsed
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationOutcome {
    pub board: SparseGrid,
    pub output: Option<f64>,
    pub score: f64,
}

impl SimulationResponse {
    pub fn from_json(json: &str) -> Result<Self, ApiError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Split into outcome or error. A non-null `error` wins over the board.
    pub fn into_result(self) -> Result<SimulationOutcome, ApiError> {
        if let Some(error) = self.error {
            return Err(ApiError::Remote(error));
        }
        Ok(SimulationOutcome {
            board: SparseGrid::parse(&self.board),
            output: self.output,
            score: self.score,
        })
    }
}

/// Board resolve request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolveRequest {
    pub board: String,
}

impl ResolveRequest {
    pub fn new(grid: &SparseGrid) -> Self {
        Self {
            board: grid.serialize(),
        }
    }
}

/// Board resolve response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolveResponse {
    pub board: Option<String>,
    pub error: Option<String>,
}

impl ResolveResponse {
    pub fn from_json(json: &str) -> Result<Self, ApiError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn into_result(self) -> Result<SparseGrid, ApiError> {
        match (self.board, self.error) {
            (_, Some(error)) => Err(ApiError::Remote(error)),
            (Some(board), None) => Ok(SparseGrid::parse(&board)),
            (None, None) => Err(ApiError::MissingBoard),
        }
    }
}

/// Last successful value plus the most recent error.
///
/// A failure never clears the value; a success clears the error.
#[derive(Debug)]
pub struct LastKnownGood<T> {
    value: Option<T>,
    error: Option<ApiError>,
}

impl<T> Default for LastKnownGood<T> {
    fn default() -> Self {
        Self {
            value: None,
            error: None,
        }
    }
}

impl<T> LastKnownGood<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, result: Result<T, ApiError>) {
        match result {
            Ok(value) => {
                self.value = Some(value);
                self.error = None;
            }
            Err(error) => {
                log::warn!("Keeping last good result: {}", error);
                self.error = Some(error);
            }
        }
    }

    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn error(&self) -> Option<&ApiError> {
        self.error.as_ref()
    }

    pub fn clear(&mut self) {
        self.value = None;
        self.error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_uses_camel_case() {
        let grid = SparseGrid::parse("1 + 2");
        let req = SimulationRequest::new(&grid, 3, 4, 10);
        let json = req.to_json().unwrap();
        assert!(json.contains("\"valA\":3"));
        assert!(json.contains("\"valB\":4"));
        assert!(json.contains("\"turns\":10"));
        assert!(json.contains("\"board\":\"1 + 2\""));
    }

    #[test]
    fn test_simulation_response_ok() {
        let resp = SimulationResponse::from_json(
            r#"{"board":". 3\nS .","output":3,"score":12,"error":null}"#,
        )
        .unwrap();
        let outcome = resp.into_result().unwrap();
        assert_eq!(outcome.output, Some(3.0));
        assert_eq!(outcome.score, 12.0);
        assert_eq!(outcome.board.len(), 2);
    }

    #[test]
    fn test_simulation_response_accepts_any_number() {
        let fractional = SimulationResponse::from_json(
            r#"{"board":"1","output":2.5,"score":0.75,"error":null}"#,
        )
        .unwrap();
        assert_eq!(fractional.output, Some(2.5));
        assert_eq!(fractional.score, 0.75);

        let huge = SimulationResponse::from_json(
            r#"{"board":"1","output":1e30,"score":-4E+2,"error":null}"#,
        )
        .unwrap()
        .into_result()
        .unwrap();
        assert_eq!(huge.output, Some(1e30));
        assert_eq!(huge.score, -400.0);
    }

    #[test]
    fn test_simulation_response_error() {
        let resp = SimulationResponse::from_json(
            r#"{"board":"","output":null,"score":0,"error":"collision at (1, 2)"}"#,
        )
        .unwrap();
        assert!(matches!(resp.into_result(), Err(ApiError::Remote(_))));
    }

    #[test]
    fn test_resolve_response_variants() {
        let ok = ResolveResponse {
            board: Some("A".into()),
            error: None,
        };
        assert_eq!(ok.into_result().unwrap().len(), 1);

        let empty = ResolveResponse {
            board: None,
            error: None,
        };
        assert!(matches!(empty.into_result(), Err(ApiError::MissingBoard)));
    }

    #[test]
    fn test_malformed_json_is_decode_error() {
        assert!(matches!(
            SimulationResponse::from_json("{not json"),
            Err(ApiError::Decode(_))
        ));
    }

    #[test]
    fn test_last_known_good_keeps_value_on_error() {
        let mut holder = LastKnownGood::new();
        holder.apply(Ok(7));
        holder.apply(Err(ApiError::Transport("timeout".into())));
        assert_eq!(holder.value(), Some(&7));
        assert!(holder.error().is_some());

        holder.apply(Ok(8));
        assert_eq!(holder.value(), Some(&8));
        assert!(holder.error().is_none());
    }
}
