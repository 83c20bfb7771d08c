//! Protobuf messages of the `policydecisionpoint.V1PDPService` API.
//!
//! Kept by hand in the shape `prost-build` would generate, so the crate
//! builds without `protoc`. Property bags travel as `google.protobuf.Struct`.

use prost_types::Struct;

/// Fully qualified gRPC service name.
pub const SERVICE_NAME: &str = "policydecisionpoint.V1PDPService";

/// HTTP/2 path of the `AuthorizationCheck` unary method.
pub const AUTHORIZATION_CHECK_PATH: &str = "/policydecisionpoint.V1PDPService/AuthorizationCheck";

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PolicyStore {
    #[prost(string, tag = "1")]
    pub kind: String,
    #[prost(string, tag = "2")]
    pub id: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Principal {
    #[prost(string, tag = "1")]
    pub r#type: String,
    #[prost(string, tag = "2")]
    pub id: String,
    #[prost(string, optional, tag = "3")]
    pub source: Option<String>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Entities {
    #[prost(string, tag = "1")]
    pub schema: String,
    #[prost(message, repeated, tag = "2")]
    pub items: Vec<Struct>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AuthorizationModelRequest {
    #[prost(int64, tag = "1")]
    pub zone_id: i64,
    #[prost(message, optional, tag = "2")]
    pub policy_store: Option<PolicyStore>,
    #[prost(message, optional, tag = "3")]
    pub principal: Option<Principal>,
    #[prost(message, optional, tag = "4")]
    pub entities: Option<Entities>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Subject {
    #[prost(string, tag = "1")]
    pub r#type: String,
    #[prost(string, tag = "2")]
    pub id: String,
    #[prost(string, optional, tag = "3")]
    pub source: Option<String>,
    #[prost(message, optional, tag = "4")]
    pub properties: Option<Struct>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Resource {
    #[prost(string, tag = "1")]
    pub r#type: String,
    #[prost(string, tag = "2")]
    pub id: String,
    #[prost(message, optional, tag = "3")]
    pub properties: Option<Struct>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Action {
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(message, optional, tag = "2")]
    pub properties: Option<Struct>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct EvaluationRequest {
    #[prost(string, optional, tag = "1")]
    pub request_id: Option<String>,
    #[prost(message, optional, tag = "2")]
    pub subject: Option<Subject>,
    #[prost(message, optional, tag = "3")]
    pub resource: Option<Resource>,
    #[prost(message, optional, tag = "4")]
    pub action: Option<Action>,
    #[prost(message, optional, tag = "5")]
    pub context: Option<Struct>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AuthorizationCheckRequest {
    #[prost(string, optional, tag = "1")]
    pub request_id: Option<String>,
    #[prost(message, optional, tag = "2")]
    pub authorization_model: Option<AuthorizationModelRequest>,
    #[prost(message, optional, tag = "3")]
    pub subject: Option<Subject>,
    #[prost(message, optional, tag = "4")]
    pub resource: Option<Resource>,
    #[prost(message, optional, tag = "5")]
    pub action: Option<Action>,
    #[prost(message, optional, tag = "6")]
    pub context: Option<Struct>,
    #[prost(message, repeated, tag = "7")]
    pub evaluations: Vec<EvaluationRequest>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ReasonResponse {
    #[prost(string, tag = "1")]
    pub code: String,
    #[prost(string, tag = "2")]
    pub message: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ContextResponse {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(message, optional, tag = "2")]
    pub reason_admin: Option<ReasonResponse>,
    #[prost(message, optional, tag = "3")]
    pub reason_user: Option<ReasonResponse>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct EvaluationResponse {
    #[prost(string, optional, tag = "1")]
    pub request_id: Option<String>,
    #[prost(bool, tag = "2")]
    pub decision: bool,
    #[prost(message, optional, tag = "3")]
    pub context: Option<ContextResponse>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AuthorizationCheckResponse {
    #[prost(string, optional, tag = "1")]
    pub request_id: Option<String>,
    #[prost(bool, tag = "2")]
    pub decision: bool,
    #[prost(message, optional, tag = "3")]
    pub context: Option<ContextResponse>,
    #[prost(message, repeated, tag = "4")]
    pub evaluations: Vec<EvaluationResponse>,
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use prost::Message;

    use super::*;

    #[test]
    fn response_presence_survives_the_wire() {
        let response = AuthorizationCheckResponse {
            request_id: Some("atomic-request-001".to_owned()),
            decision: false,
            context: Some(ContextResponse {
                id: "ctx".to_owned(),
                reason_admin: None,
                reason_user: Some(ReasonResponse {
                    code: "E403".to_owned(),
                    message: "not permitted".to_owned(),
                }),
            }),
            evaluations: Vec::new(),
        };

        let bytes = response.encode_to_vec();
        let decoded = AuthorizationCheckResponse::decode(bytes.as_slice()).expect("decodes");

        assert_eq!(decoded, response);
        let context = decoded.context.expect("context present");
        assert!(context.reason_admin.is_none());
    }

    #[test]
    fn empty_optional_string_differs_from_absent() {
        let with_empty = EvaluationResponse {
            request_id: Some(String::new()),
            ..EvaluationResponse::default()
        };
        let decoded =
            EvaluationResponse::decode(with_empty.encode_to_vec().as_slice()).expect("decodes");
        assert_eq!(decoded.request_id.as_deref(), Some(""));

        let absent = EvaluationResponse::default();
        let decoded =
            EvaluationResponse::decode(absent.encode_to_vec().as_slice()).expect("decodes");
        assert!(decoded.request_id.is_none());
    }
}
