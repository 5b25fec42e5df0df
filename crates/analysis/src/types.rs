use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Field the backend uses for the relative address of the generated report.
pub const REPORT_URL_FIELD: &str = "report_url";

/// Backend analysis output, passed through exactly as received.
///
/// The shape belongs to the backend; interpreting it is the caller's job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnalysisResult(Value);

impl AnalysisResult {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_inner(self) -> Value {
        self.0
    }

    /// Relative report address, if the backend included one.
    pub fn report_reference(&self) -> Option<&str> {
        self.0.get(REPORT_URL_FIELD).and_then(Value::as_str)
    }
}

impl From<Value> for AnalysisResult {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl From<AnalysisResult> for Value {
    fn from(result: AnalysisResult) -> Self {
        result.0
    }
}
