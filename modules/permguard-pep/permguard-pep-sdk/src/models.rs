//! Domain models for `PermGuard` authorization checks.
//!
//! Request side: an [`AZRequest`] carries the shared [`AZModel`] plus either
//! a single top-level subject/resource/action ("atomic" shape) or an ordered
//! list of [`Evaluation`]s ("batch" shape). Response side: an [`AZResponse`]
//! with one [`EvaluationResponse`] per evaluation, in request order.
//!
//! The JSON form uses `snake_case` keys and matches the request documents
//! accepted by the `PermGuard` tooling.

use serde::{Deserialize, Serialize};

use crate::value::PropertyMap;

/// The calling identity (e.g. a workload identity).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[allow(clippy::struct_field_names)] // `type` is reserved
pub struct Principal {
    pub id: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub principal_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// The entity on whose behalf the action is requested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[allow(clippy::struct_field_names)] // `type` is reserved
pub struct Subject {
    pub id: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub subject_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default)]
    pub properties: PropertyMap,
}

/// The resource being accessed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[allow(clippy::struct_field_names)] // `type` is reserved
pub struct Resource {
    #[serde(rename = "type")]
    pub resource_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub properties: PropertyMap,
}

/// The action being performed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub name: String,
    #[serde(default)]
    pub properties: PropertyMap,
}

/// Policy set the request is evaluated against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyStore {
    pub kind: String,
    pub id: String,
}

/// Schema reference and inline entity definitions for the model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Entities {
    pub schema: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<PropertyMap>,
}

/// Shared authorization context of a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AZModel {
    pub zone_id: i64,
    pub policy_store: PolicyStore,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub principal: Option<Principal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entities: Option<Entities>,
}

/// One authorization question inside a batch request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    pub subject: Subject,
    pub resource: Resource,
    pub action: Action,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<PropertyMap>,
}

/// Authorization check request.
///
/// Builders produce exactly one shape: top-level `subject`/`resource`/`action`
/// with no evaluations, or evaluations with no top-level entities. Requests
/// deserialized from JSON are taken as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AZRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(rename = "authorization_model")]
    pub model: AZModel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<Subject>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<Resource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<Action>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<PropertyMap>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub evaluations: Vec<Evaluation>,
}

impl AZRequest {
    /// Parse a request from its JSON document form.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if the document is malformed or a
    /// required key is missing.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Whether any of the top-level subject/resource/action is set.
    #[must_use]
    pub fn has_atomic_fields(&self) -> bool {
        self.subject.is_some() || self.resource.is_some() || self.action.is_some()
    }

    /// Single-evaluation shorthand: top-level entities, no evaluations.
    #[must_use]
    pub fn is_atomic(&self) -> bool {
        self.has_atomic_fields() && self.evaluations.is_empty()
    }

    /// Batch form: evaluations, no top-level entities.
    #[must_use]
    pub fn is_batch(&self) -> bool {
        !self.evaluations.is_empty() && !self.has_atomic_fields()
    }

    /// Both shapes populated at once.
    #[must_use]
    pub fn has_mixed_shape(&self) -> bool {
        !self.evaluations.is_empty() && self.has_atomic_fields()
    }
}

/// A reason attached to a decision.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReasonResponse {
    pub code: String,
    pub message: String,
}

/// Decision context returned by the PDP.
///
/// `ContextResponse::default()` is the "present but empty" context, which is
/// different from an absent one (`None` on the owning response).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextResponse {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason_admin: Option<ReasonResponse>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason_user: Option<ReasonResponse>,
}

/// Decision for one evaluation of a batch request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationResponse {
    pub decision: bool,
    #[serde(default)]
    pub request_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<ContextResponse>,
}

/// Authorization check response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AZResponse {
    pub decision: bool,
    #[serde(default)]
    pub request_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<ContextResponse>,
    #[serde(default)]
    pub evaluations: Vec<EvaluationResponse>,
}

impl AZResponse {
    /// User-facing reason, if the PDP attached one.
    #[must_use]
    pub fn reason_user(&self) -> Option<&ReasonResponse> {
        self.context.as_ref().and_then(|c| c.reason_user.as_ref())
    }

    /// Admin-facing reason, if the PDP attached one.
    #[must_use]
    pub fn reason_admin(&self) -> Option<&ReasonResponse> {
        self.context.as_ref().and_then(|c| c.reason_admin.as_ref())
    }

    /// Find the evaluation response correlated by request id.
    #[must_use]
    pub fn evaluation(&self, request_id: &str) -> Option<&EvaluationResponse> {
        self.evaluations.iter().find(|e| e.request_id == request_id)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::value::Value;

    const ONLY_ONE_JSON: &str = r#"{
        "authorization_model": {
            "zone_id": 634601921829,
            "policy_store": {"kind": "ledger", "id": "417b278c0d024cf789e3d3c2bc9854c6"},
            "principal": {
                "type": "workload",
                "id": "spiffe://edge.example.com/workload/64ad91fec7b0403eaf5d37e56c14ba42",
                "source": "spire"
            },
            "entities": {
                "schema": "cedar",
                "items": [
                    {"uid": {"type": "PharmaAuthZFlow::Platform::BranchInfo", "id": "subscription"}, "attrs": {"active": true}, "parents": []}
                ]
            }
        },
        "request_id": "json-request-001",
        "subject": {"type": "attribute", "id": "role/branch-owner", "properties": {"isSuperUser": true}},
        "resource": {"type": "PharmaAuthZFlow::Platform::Branch", "id": "fb008a600df04b21841c4fb5ad27ddf7", "properties": {}},
        "action": {"name": "PharmaAuthZFlow::Platform::Action::assign-role"},
        "context": {"time": "2025-01-23T16:17:46+00:00", "isSubscriptionActive": true}
    }"#;

    #[test]
    fn parses_atomic_json_request() {
        let req = AZRequest::from_json(ONLY_ONE_JSON).expect("valid request");

        assert_eq!(req.request_id.as_deref(), Some("json-request-001"));
        assert_eq!(req.model.zone_id, 634_601_921_829);
        assert_eq!(req.model.policy_store.kind, "ledger");
        let principal = req.model.principal.as_ref().expect("principal");
        assert_eq!(principal.principal_type.as_deref(), Some("workload"));
        let entities = req.model.entities.as_ref().expect("entities");
        assert_eq!(entities.schema, "cedar");
        assert_eq!(entities.items.len(), 1);

        let subject = req.subject.as_ref().expect("subject");
        assert_eq!(subject.subject_type.as_deref(), Some("attribute"));
        assert_eq!(subject.properties.get("isSuperUser"), Some(&Value::Bool(true)));
        let resource = req.resource.as_ref().expect("resource");
        assert!(resource.properties.is_empty());
        let action = req.action.as_ref().expect("action");
        assert!(action.properties.is_empty());

        assert!(req.is_atomic());
        assert!(!req.is_batch());
        assert!(!req.has_mixed_shape());
    }

    #[test]
    fn missing_model_is_rejected() {
        let err = AZRequest::from_json(r#"{"request_id": "x"}"#).expect_err("model required");
        assert!(err.to_string().contains("authorization_model"));
    }

    #[test]
    fn json_round_trip_keeps_optional_fields_absent() {
        let req = AZRequest::from_json(
            r#"{"authorization_model": {"zone_id": 1, "policy_store": {"kind": "ledger", "id": "s"}}}"#,
        )
        .expect("valid request");

        let json = serde_json::to_value(&req).expect("serializes");
        assert_eq!(
            json,
            serde_json::json!({
                "authorization_model": {"zone_id": 1, "policy_store": {"kind": "ledger", "id": "s"}}
            })
        );
        assert!(!req.is_atomic());
        assert!(!req.is_batch());
    }

    #[test]
    fn response_reason_accessors() {
        let resp = AZResponse {
            decision: false,
            context: Some(ContextResponse {
                reason_user: Some(ReasonResponse {
                    code: "E403".to_owned(),
                    message: "not permitted".to_owned(),
                }),
                ..ContextResponse::default()
            }),
            evaluations: vec![EvaluationResponse {
                decision: true,
                request_id: "eval-view".to_owned(),
                context: None,
            }],
            ..AZResponse::default()
        };

        assert_eq!(resp.reason_user().map(|r| r.code.as_str()), Some("E403"));
        assert!(resp.reason_admin().is_none());
        assert!(resp.evaluation("eval-view").is_some_and(|e| e.decision));
        assert!(resp.evaluation("eval-assign-role").is_none());
    }
}
