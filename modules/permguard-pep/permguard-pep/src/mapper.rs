//! Mapping between the domain model and the wire messages.
//!
//! Absent optional data stays absent on the wire and in the domain; the
//! request id is the one field always sent (empty when unset).

use permguard_pep_sdk::{
    AZModel, AZRequest, AZResponse, Action, ContextResponse, Entities, Evaluation,
    EvaluationResponse, PepClientError, Principal, ReasonResponse, Resource, Subject,
};

use crate::codec::encode_map;
use crate::wire;

/// Map a domain request to its wire form.
///
/// # Errors
///
/// [`PepClientError::InvalidRequestShape`] if the zone id is not positive,
/// the policy store id is empty, or a populated principal, subject, resource
/// or action lacks its identifying field.
pub fn to_wire(request: &AZRequest) -> Result<wire::AuthorizationCheckRequest, PepClientError> {
    if request.has_mixed_shape() {
        tracing::warn!(
            request_id = request.request_id.as_deref().unwrap_or_default(),
            evaluations = request.evaluations.len(),
            "request carries both top-level subject/resource/action and evaluations; sending as-is"
        );
    }

    let wire = wire::AuthorizationCheckRequest {
        request_id: Some(request.request_id.clone().unwrap_or_default()),
        authorization_model: Some(map_model(&request.model)?),
        subject: request.subject.as_ref().map(map_subject).transpose()?,
        resource: request.resource.as_ref().map(map_resource).transpose()?,
        action: request.action.as_ref().map(map_action).transpose()?,
        context: request.context.as_ref().map(encode_map),
        evaluations: request
            .evaluations
            .iter()
            .map(map_evaluation)
            .collect::<Result<_, _>>()?,
    };

    tracing::debug!(
        zone_id = request.model.zone_id,
        atomic = request.is_atomic(),
        evaluations = wire.evaluations.len(),
        "mapped authorization check request"
    );

    Ok(wire)
}

/// Map a wire response to the domain model.
#[must_use]
pub fn from_wire(response: wire::AuthorizationCheckResponse) -> AZResponse {
    AZResponse {
        decision: response.decision,
        request_id: response.request_id.unwrap_or_default(),
        context: response.context.map(map_context_response),
        evaluations: response
            .evaluations
            .into_iter()
            .map(map_evaluation_response)
            .collect(),
    }
}

fn require(field: &str, value: &str) -> Result<(), PepClientError> {
    if value.is_empty() {
        return Err(PepClientError::invalid_shape(format!("{field} is empty")));
    }
    Ok(())
}

fn map_model(model: &AZModel) -> Result<wire::AuthorizationModelRequest, PepClientError> {
    if model.zone_id <= 0 {
        return Err(PepClientError::invalid_shape(format!(
            "authorization_model.zone_id must be positive, got {}",
            model.zone_id
        )));
    }
    require("authorization_model.policy_store.id", &model.policy_store.id)?;

    Ok(wire::AuthorizationModelRequest {
        zone_id: model.zone_id,
        policy_store: Some(wire::PolicyStore {
            kind: model.policy_store.kind.clone(),
            id: model.policy_store.id.clone(),
        }),
        principal: model.principal.as_ref().map(map_principal).transpose()?,
        entities: model.entities.as_ref().map(map_entities),
    })
}

fn map_principal(principal: &Principal) -> Result<wire::Principal, PepClientError> {
    require("principal.id", &principal.id)?;
    Ok(wire::Principal {
        r#type: principal.principal_type.clone().unwrap_or_default(),
        id: principal.id.clone(),
        source: principal.source.clone(),
    })
}

fn map_entities(entities: &Entities) -> wire::Entities {
    wire::Entities {
        schema: entities.schema.clone(),
        items: entities.items.iter().map(encode_map).collect(),
    }
}

fn map_subject(subject: &Subject) -> Result<wire::Subject, PepClientError> {
    require("subject.id", &subject.id)?;
    Ok(wire::Subject {
        r#type: subject.subject_type.clone().unwrap_or_default(),
        id: subject.id.clone(),
        source: subject.source.clone(),
        properties: Some(encode_map(&subject.properties)),
    })
}

fn map_resource(resource: &Resource) -> Result<wire::Resource, PepClientError> {
    require("resource.type", &resource.resource_type)?;
    Ok(wire::Resource {
        r#type: resource.resource_type.clone(),
        id: resource.id.clone().unwrap_or_default(),
        properties: Some(encode_map(&resource.properties)),
    })
}

fn map_action(action: &Action) -> Result<wire::Action, PepClientError> {
    require("action.name", &action.name)?;
    Ok(wire::Action {
        name: action.name.clone(),
        properties: Some(encode_map(&action.properties)),
    })
}

fn map_evaluation(evaluation: &Evaluation) -> Result<wire::EvaluationRequest, PepClientError> {
    Ok(wire::EvaluationRequest {
        request_id: Some(evaluation.request_id.clone().unwrap_or_default()),
        subject: Some(map_subject(&evaluation.subject)?),
        resource: Some(map_resource(&evaluation.resource)?),
        action: Some(map_action(&evaluation.action)?),
        context: evaluation.context.as_ref().map(encode_map),
    })
}

fn map_evaluation_response(response: wire::EvaluationResponse) -> EvaluationResponse {
    EvaluationResponse {
        decision: response.decision,
        request_id: response.request_id.unwrap_or_default(),
        context: response.context.map(map_context_response),
    }
}

fn map_context_response(context: wire::ContextResponse) -> ContextResponse {
    ContextResponse {
        id: context.id,
        reason_admin: context.reason_admin.map(map_reason),
        reason_user: context.reason_user.map(map_reason),
    }
}

fn map_reason(reason: wire::ReasonResponse) -> ReasonResponse {
    ReasonResponse {
        code: reason.code,
        message: reason.message,
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use permguard_pep_sdk::{
        AZAtomicRequestBuilder, AZRequestBuilder, ActionBuilder, EvaluationBuilder,
        PrincipalBuilder, PropertyMap, ResourceBuilder, SubjectBuilder, Value,
    };
    use tracing_test::traced_test;

    use super::*;
    use crate::codec::decode_map;

    const ZONE_ID: i64 = 634_601_921_829;
    const POLICY_STORE_ID: &str = "417b278c0d024cf789e3d3c2bc9854c6";
    const PRINCIPAL_ID: &str =
        "spiffe://edge.example.com/workload/64ad91fec7b0403eaf5d37e56c14ba42";
    const RESOURCE_TYPE: &str = "PharmaAuthZFlow::Platform::Branch";

    fn evaluation(request_id: &str, action: &str) -> Evaluation {
        EvaluationBuilder::new(
            SubjectBuilder::new("role/branch-owner")
                .with_type("attribute")
                .build()
                .expect("subject"),
            ResourceBuilder::new(RESOURCE_TYPE)
                .with_id("fb008a600df04b21841c4fb5ad27ddf7")
                .build()
                .expect("resource"),
            ActionBuilder::new(action).build().expect("action"),
        )
        .with_request_id(request_id)
        .build()
        .expect("evaluation")
    }

    #[test]
    fn atomic_request_maps_every_populated_field() {
        let request = AZAtomicRequestBuilder::new(
            ZONE_ID,
            POLICY_STORE_ID,
            "role/branch-owner",
            RESOURCE_TYPE,
            "PharmaAuthZFlow::Platform::Action::assign-role",
        )
        .with_request_id("atomic-request-001")
        .with_principal(
            PrincipalBuilder::new(PRINCIPAL_ID)
                .with_type("workload")
                .with_source("spire")
                .build()
                .expect("principal"),
        )
        .with_subject_type("attribute")
        .with_subject_property("isSuperUser", true)
        .with_resource_id("fb008a600df04b21841c4fb5ad27ddf7")
        .with_context_property("isSubscriptionActive", true)
        .build()
        .expect("request");

        let wire = to_wire(&request).expect("maps");

        assert_eq!(wire.request_id.as_deref(), Some("atomic-request-001"));
        let model = wire.authorization_model.expect("model");
        assert_eq!(model.zone_id, ZONE_ID);
        let store = model.policy_store.expect("policy store");
        assert_eq!((store.kind.as_str(), store.id.as_str()), ("ledger", POLICY_STORE_ID));
        let principal = model.principal.expect("principal");
        assert_eq!(principal.id, PRINCIPAL_ID);
        assert_eq!(principal.r#type, "workload");
        assert_eq!(principal.source.as_deref(), Some("spire"));
        assert!(model.entities.is_none());

        let subject = wire.subject.expect("subject");
        assert_eq!(subject.r#type, "attribute");
        assert!(subject.source.is_none());
        let props = decode_map(subject.properties.expect("properties"));
        assert_eq!(props.get("isSuperUser"), Some(&Value::Bool(true)));

        let resource = wire.resource.expect("resource");
        assert_eq!(resource.r#type, RESOURCE_TYPE);
        assert_eq!(resource.id, "fb008a600df04b21841c4fb5ad27ddf7");
        assert!(resource.properties.is_some_and(|p| p.fields.is_empty()));

        assert!(wire.action.is_some());
        assert!(wire.context.is_some());
        assert!(wire.evaluations.is_empty());
    }

    #[test]
    fn batch_keeps_order_and_per_evaluation_context() {
        let mut view = evaluation("eval-view", "PharmaAuthZFlow::Platform::Action::view");
        view.context = Some(PropertyMap::new());

        let request = AZRequestBuilder::new(ZONE_ID, POLICY_STORE_ID)
            .with_evaluation(evaluation(
                "eval-assign-role",
                "PharmaAuthZFlow::Platform::Action::assign-role",
            ))
            .with_evaluation(view)
            .build()
            .expect("request");

        let wire = to_wire(&request).expect("maps");

        assert_eq!(wire.request_id.as_deref(), Some(""));
        assert!(wire.subject.is_none());
        assert!(wire.context.is_none());
        let ids: Vec<_> = wire
            .evaluations
            .iter()
            .filter_map(|e| e.request_id.as_deref())
            .collect();
        assert_eq!(ids, ["eval-assign-role", "eval-view"]);
        assert!(wire.evaluations[0].context.is_none());
        assert!(
            wire.evaluations[1]
                .context
                .as_ref()
                .is_some_and(|c| c.fields.is_empty())
        );
    }

    #[test]
    fn entities_items_are_encoded() {
        let mut item = PropertyMap::new();
        item.insert("attrs".to_owned(), Value::from_native(serde_json::json!({"active": true})));

        let request = AZRequestBuilder::new(ZONE_ID, POLICY_STORE_ID)
            .with_entities("cedar", vec![item.clone()])
            .build()
            .expect("request");

        let entities = to_wire(&request)
            .expect("maps")
            .authorization_model
            .and_then(|m| m.entities)
            .expect("entities");
        assert_eq!(entities.schema, "cedar");
        assert_eq!(entities.items.len(), 1);
        assert_eq!(decode_map(entities.items[0].clone()), item);
    }

    #[test]
    fn structurally_incomplete_requests_are_rejected() {
        let mut request = AZRequestBuilder::new(ZONE_ID, POLICY_STORE_ID)
            .build()
            .expect("request");
        request.model.zone_id = 0;
        assert!(matches!(
            to_wire(&request),
            Err(PepClientError::InvalidRequestShape { .. })
        ));

        request.model.zone_id = ZONE_ID;
        request.model.policy_store.id.clear();
        assert!(matches!(
            to_wire(&request),
            Err(PepClientError::InvalidRequestShape { reason })
                if reason.contains("policy_store.id")
        ));

        request.model.policy_store.id = POLICY_STORE_ID.to_owned();
        let mut eval = evaluation("e", "view");
        eval.subject.id.clear();
        request.evaluations.push(eval);
        assert!(matches!(
            to_wire(&request),
            Err(PepClientError::InvalidRequestShape { reason }) if reason.contains("subject.id")
        ));
    }

    #[test]
    fn optional_data_never_fails_mapping() {
        let request = AZRequestBuilder::new(1, "s").build().expect("request");
        let wire = to_wire(&request).expect("maps");
        assert!(wire.authorization_model.is_some_and(|m| m.principal.is_none()));
    }

    #[test]
    #[traced_test]
    fn mixed_shape_is_sent_as_is_with_warning() {
        let mut request = AZRequestBuilder::new(ZONE_ID, POLICY_STORE_ID)
            .with_evaluation(evaluation("eval-view", "view"))
            .build()
            .expect("request");
        request.action = Some(ActionBuilder::new("assign-role").build().expect("action"));

        let wire = to_wire(&request).expect("maps");

        assert!(wire.action.is_some());
        assert_eq!(wire.evaluations.len(), 1);
        assert!(logs_contain("sending as-is"));
    }

    #[test]
    fn response_presence_is_preserved() {
        let response = from_wire(wire::AuthorizationCheckResponse {
            request_id: None,
            decision: false,
            context: Some(wire::ContextResponse {
                id: String::new(),
                reason_admin: None,
                reason_user: Some(wire::ReasonResponse {
                    code: "E403".to_owned(),
                    message: "not permitted".to_owned(),
                }),
            }),
            evaluations: vec![
                wire::EvaluationResponse {
                    request_id: Some("eval-assign-role".to_owned()),
                    decision: false,
                    context: Some(wire::ContextResponse::default()),
                },
                wire::EvaluationResponse {
                    request_id: Some("eval-view".to_owned()),
                    decision: true,
                    context: None,
                },
            ],
        });

        assert!(!response.decision);
        assert_eq!(response.request_id, "");
        let reason = response.reason_user().expect("user reason");
        assert_eq!((reason.code.as_str(), reason.message.as_str()), ("E403", "not permitted"));
        assert!(response.reason_admin().is_none());

        assert_eq!(response.evaluations.len(), 2);
        assert_eq!(response.evaluations[0].request_id, "eval-assign-role");
        assert_eq!(response.evaluations[0].context, Some(ContextResponse::default()));
        assert_eq!(response.evaluations[1].request_id, "eval-view");
        assert!(response.evaluations[1].context.is_none());
    }

    #[test]
    fn empty_top_level_context_is_present() {
        let present = from_wire(wire::AuthorizationCheckResponse {
            request_id: Some("atomic-request-001".to_owned()),
            decision: true,
            context: Some(wire::ContextResponse::default()),
            evaluations: Vec::new(),
        });
        let absent = from_wire(wire::AuthorizationCheckResponse {
            request_id: Some("atomic-request-001".to_owned()),
            decision: true,
            context: None,
            evaluations: Vec::new(),
        });

        assert_eq!(present.context, Some(ContextResponse::default()));
        assert!(present.reason_user().is_none());
        assert!(absent.context.is_none());
    }
}
