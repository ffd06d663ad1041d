use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::ClassifierError;

/// A successful classifier payload.
///
/// Fields are loosely shaped and individually optional; the only guarantee is
/// that the body is a JSON object. The normalizer owns every interpretation of
/// its contents.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClassifierResponse {
    fields: Map<String, Value>,
}

impl ClassifierResponse {
    pub fn from_value(value: Value) -> Result<Self, ClassifierError> {
        match value {
            Value::Object(fields) => Ok(Self { fields }),
            other => Err(ClassifierError::MalformedBody(format!(
                "expected a JSON object, got {}",
                json_kind(&other)
            ))),
        }
    }

    pub fn from_json(body: &str) -> Result<Self, ClassifierError> {
        let value: Value = serde_json::from_str(body)
            .map_err(|e| ClassifierError::MalformedBody(e.to_string()))?;
        Self::from_value(value)
    }

    /// Top-level field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Field of the nested `advice` object, if there is one.
    pub fn advice(&self, key: &str) -> Option<&Value> {
        self.fields.get("advice")?.as_object()?.get(key)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn default_true() -> bool {
    true
}

/// Query options of `POST /predict/file`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictOptions {
    /// Ask for a Grad-CAM overlay.
    #[serde(default = "default_true")]
    pub return_overlay: bool,
    /// Ask the classifier to echo the decoded image back.
    #[serde(default = "default_true")]
    pub return_image: bool,
    /// Convolution layer to build the overlay from; the classifier picks one when absent.
    #[serde(default)]
    pub last_conv: Option<String>,
}

impl Default for PredictOptions {
    fn default() -> Self {
        Self {
            return_overlay: true,
            return_image: true,
            last_conv: None,
        }
    }
}

impl PredictOptions {
    pub(crate) fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("return_overlay", self.return_overlay.to_string()),
            ("return_image", self.return_image.to_string()),
        ];
        if let Some(layer) = &self.last_conv {
            pairs.push(("last_conv", layer.clone()));
        }
        pairs
    }
}

fn default_threshold() -> f64 {
    0.5
}

/// Body of `POST /predict/url`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrlPredictRequest {
    pub url: String,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    #[serde(default)]
    pub last_conv: Option<String>,
    #[serde(default = "default_true")]
    pub return_overlay: bool,
    #[serde(default = "default_true")]
    pub return_image: bool,
}

impl UrlPredictRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            threshold: default_threshold(),
            last_conv: None,
            return_overlay: true,
            return_image: true,
        }
    }
}

/// Body of `GET /` on the classifier.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierHealth {
    pub status: String,
    pub model_path: Option<String>,
    pub loaded_as: Option<String>,
    pub input_size: Option<Vec<u32>>,
    pub last_conv: Option<String>,
    pub class_names: Vec<String>,
}

impl ClassifierHealth {
    pub fn is_ok(&self) -> bool {
        self.status.eq_ignore_ascii_case("ok")
    }
}
