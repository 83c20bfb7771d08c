//! General authorization request builder.

use super::require_non_empty;
use crate::error::BuildError;
use crate::models::{
    AZModel, AZRequest, Action, Entities, Evaluation, PolicyStore, Principal, Resource, Subject,
};
use crate::value::{PropertyMap, Value};

/// Policy store kind used when none is given.
pub const DEFAULT_POLICY_STORE_KIND: &str = "ledger";

/// Builder for batch-shaped [`AZRequest`]s.
///
/// ```ignore
/// let request = AZRequestBuilder::new(634_601_921_829, "417b278c0d024cf789e3d3c2bc9854c6")
///     .with_request_id("batch-1")
///     .with_principal(principal)
///     .with_evaluation(assign_role)
///     .with_evaluation(view)
///     .build()?;
/// ```
#[derive(Debug, Clone)]
pub struct AZRequestBuilder {
    zone_id: i64,
    policy_store_kind: String,
    policy_store_id: String,
    request_id: Option<String>,
    principal: Option<Principal>,
    entities: Option<Entities>,
    subject: Option<Subject>,
    resource: Option<Resource>,
    action: Option<Action>,
    context: Option<PropertyMap>,
    evaluations: Vec<Evaluation>,
}

impl AZRequestBuilder {
    #[must_use]
    pub fn new(zone_id: i64, policy_store_id: impl Into<String>) -> Self {
        Self {
            zone_id,
            policy_store_kind: DEFAULT_POLICY_STORE_KIND.to_owned(),
            policy_store_id: policy_store_id.into(),
            request_id: None,
            principal: None,
            entities: None,
            subject: None,
            resource: None,
            action: None,
            context: None,
            evaluations: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_policy_store_kind(mut self, kind: impl Into<String>) -> Self {
        self.policy_store_kind = kind.into();
        self
    }

    #[must_use]
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    #[must_use]
    pub fn with_principal(mut self, principal: Principal) -> Self {
        self.principal = Some(principal);
        self
    }

    /// Attach a schema reference and inline entity definitions.
    #[must_use]
    pub fn with_entities(mut self, schema: impl Into<String>, items: Vec<PropertyMap>) -> Self {
        self.entities = Some(Entities {
            schema: schema.into(),
            items,
        });
        self
    }

    /// Set the request-level context (replaces any previously set).
    #[must_use]
    pub fn with_context(mut self, context: PropertyMap) -> Self {
        self.context = Some(context);
        self
    }

    #[must_use]
    pub fn with_context_property(
        mut self,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        self.context
            .get_or_insert_default()
            .insert(key.into(), value.into());
        self
    }

    /// Append an evaluation; evaluations are sent in insertion order.
    #[must_use]
    pub fn with_evaluation(mut self, evaluation: Evaluation) -> Self {
        self.evaluations.push(evaluation);
        self
    }

    #[must_use]
    pub fn with_evaluations(mut self, evaluations: impl IntoIterator<Item = Evaluation>) -> Self {
        self.evaluations.extend(evaluations);
        self
    }

    /// Top-level subject/resource/action; only the atomic builder sets these.
    #[must_use]
    pub(crate) fn with_atomic(
        mut self,
        subject: Subject,
        resource: Resource,
        action: Action,
    ) -> Self {
        self.subject = Some(subject);
        self.resource = Some(resource);
        self.action = Some(action);
        self
    }

    /// # Errors
    ///
    /// [`BuildError::MissingRequiredField`] if the zone id is not positive or
    /// the policy store id is empty.
    pub fn build(&self) -> Result<AZRequest, BuildError> {
        if self.zone_id <= 0 {
            return Err(BuildError::MissingRequiredField {
                field: "authorization_model.zone_id",
            });
        }
        require_non_empty("authorization_model.policy_store.id", &self.policy_store_id)?;

        Ok(AZRequest {
            request_id: self.request_id.clone(),
            model: AZModel {
                zone_id: self.zone_id,
                policy_store: PolicyStore {
                    kind: self.policy_store_kind.clone(),
                    id: self.policy_store_id.clone(),
                },
                principal: self.principal.clone(),
                entities: self.entities.clone(),
            },
            subject: self.subject.clone(),
            resource: self.resource.clone(),
            action: self.action.clone(),
            context: self.context.clone(),
            evaluations: self.evaluations.clone(),
        })
    }
}
