//! Wire types for the backend's JSON responses.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ClientError;

/// Body of `GET /status`.
///
/// Older backends serve one model and report `model_loaded`; newer ones
/// serve classification and segmentation side by side. The dual shape is
/// tried first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StatusResponse {
    /// Classification and segmentation models reported separately.
    Dual(DualModelStatus),
    /// A single model.
    Single(SingleModelStatus),
}

/// Status of a backend serving both models.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DualModelStatus {
    /// Free-form backend state, `"ok"` when healthy.
    pub status: String,
    /// Whether the 2D classifier is ready.
    pub classification_model_loaded: bool,
    /// Whether the volume segmentation model is ready.
    pub segmentation_model_loaded: bool,
    /// Classifier input tensor shape, if reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_shape: Option<Vec<u32>>,
}

/// Status of a backend serving one model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SingleModelStatus {
    /// Free-form backend state, `"ok"` when healthy.
    pub status: String,
    /// Whether the model is ready.
    pub model_loaded: bool,
    /// Model input tensor shape, if reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_shape: Option<Vec<u32>>,
    /// Why the model failed to load, if it did.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StatusResponse {
    /// Overall model health.
    #[must_use]
    pub fn health(&self) -> ModelHealth {
        let ready = match self {
            Self::Dual(s) => s.classification_model_loaded && s.segmentation_model_loaded,
            Self::Single(s) => s.status == "ok" && s.model_loaded,
        };
        if ready {
            ModelHealth::Connected
        } else {
            ModelHealth::Partial
        }
    }
}

/// Summary shown by the status indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelHealth {
    /// Every model is loaded.
    Connected,
    /// The backend answered but at least one model is not ready.
    Partial,
    /// The backend could not be reached or answered with an error.
    Disconnected,
}

impl ModelHealth {
    /// Health derived from the outcome of one `/status` poll.
    #[must_use]
    pub fn from_poll(poll: &Result<StatusResponse, ClientError>) -> Self {
        poll.as_ref().map_or(Self::Disconnected, StatusResponse::health)
    }

    /// Indicator text.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Connected => "Models Connected",
            Self::Partial => "Partial Connection",
            Self::Disconnected => "Models disconnected",
        }
    }
}

impl fmt::Display for ModelHealth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Body of a successful `POST /classify`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifyResponse {
    /// Name of the most likely class.
    pub predicted_class: String,
    /// Probability of `predicted_class`, in `[0, 1]`.
    pub confidence: f64,
    /// Probability of every class the model knows, by name.
    #[serde(default)]
    pub all_class_probabilities: BTreeMap<String, f64>,
}

/// One row of the per-class breakdown.
#[derive(Debug, Clone, PartialEq)]
pub struct Finding {
    /// Class name as reported by the backend.
    pub class_name: String,
    /// Confidence in percent with one decimal.
    pub confidence_percent: f64,
}

impl ClassifyResponse {
    /// Confidence of the predicted class in percent with one decimal,
    /// e.g. `0.947` becomes `94.7`.
    #[must_use]
    pub fn confidence_percent(&self) -> f64 {
        to_percent(self.confidence)
    }

    /// Per-class confidences, most likely first. Ties are ordered by
    /// class name.
    #[must_use]
    pub fn findings(&self) -> Vec<Finding> {
        let mut findings: Vec<Finding> = self
            .all_class_probabilities
            .iter()
            .map(|(name, &p)| Finding {
                class_name: name.clone(),
                confidence_percent: to_percent(p),
            })
            .collect();
        // BTreeMap iteration is already name-ordered and the sort is stable.
        findings.sort_by(|a, b| b.confidence_percent.total_cmp(&a.confidence_percent));
        findings
    }
}

fn to_percent(probability: f64) -> f64 {
    (probability * 1000.0).round() / 10.0
}

/// Error body the backend sends with non-success statuses.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn dual_status_parses_first() {
        let status: StatusResponse = serde_json::from_str(
            r#"{"status":"ok","classification_model_loaded":true,
                "segmentation_model_loaded":false,"input_shape":[224,224]}"#,
        )
        .unwrap();
        assert!(matches!(
            &status,
            StatusResponse::Dual(dual) if dual.input_shape.as_deref() == Some(&[224, 224][..])
        ));
        assert_eq!(status.health(), ModelHealth::Partial);
    }

    #[test]
    fn single_status_connected() {
        let status: StatusResponse =
            serde_json::from_str(r#"{"status":"ok","model_loaded":true}"#).unwrap();
        assert!(matches!(status, StatusResponse::Single(_)));
        assert_eq!(status.health(), ModelHealth::Connected);
    }

    #[test]
    fn single_status_error_is_partial() {
        let status: StatusResponse = serde_json::from_str(
            r#"{"status":"error","model_loaded":false,"error":"boom"}"#,
        )
        .unwrap();
        assert_eq!(status.health(), ModelHealth::Partial);
    }

    #[test]
    fn dual_status_all_loaded() {
        let status = StatusResponse::Dual(DualModelStatus {
            status: "ok".into(),
            classification_model_loaded: true,
            segmentation_model_loaded: true,
            input_shape: None,
        });
        assert_eq!(status.health(), ModelHealth::Connected);
        assert_eq!(ModelHealth::from_poll(&Ok(status)), ModelHealth::Connected);
    }

    #[test]
    fn failed_poll_is_disconnected() {
        let poll = Err(ClientError::Backend {
            status: 500,
            message: "down".into(),
        });
        let health = ModelHealth::from_poll(&poll);
        assert_eq!(health, ModelHealth::Disconnected);
        assert_eq!(health.to_string(), "Models disconnected");
    }

    #[test]
    fn unknown_status_shape_is_rejected() {
        let parsed = serde_json::from_str::<StatusResponse>(r#"{"ready":true}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn confidence_is_rounded_to_one_decimal() {
        let response = ClassifyResponse {
            predicted_class: "glioma".into(),
            confidence: 0.947,
            all_class_probabilities: BTreeMap::new(),
        };
        assert_eq!(response.confidence_percent(), 94.7);
    }

    #[test]
    fn findings_are_sorted_by_confidence_then_name() {
        let response: ClassifyResponse = serde_json::from_str(
            r#"{"predicted_class":"glioma","confidence":0.6,
                "all_class_probabilities":{"notumor":0.1,"glioma":0.6,
                "meningioma":0.15,"pituitary":0.15}}"#,
        )
        .unwrap();
        let findings = response.findings();
        let names: Vec<&str> = findings.iter().map(|f| f.class_name.as_str()).collect();
        assert_eq!(names, ["glioma", "meningioma", "pituitary", "notumor"]);
        assert_eq!(findings[0].confidence_percent, 60.0);
    }

    #[test]
    fn error_body_tolerates_missing_field() {
        let body: ErrorBody = serde_json::from_str("{}").unwrap();
        assert!(body.error.is_none());
        let body: ErrorBody = serde_json::from_str(r#"{"error":"No file part"}"#).unwrap();
        assert_eq!(body.error.as_deref(), Some("No file part"));
    }
}
