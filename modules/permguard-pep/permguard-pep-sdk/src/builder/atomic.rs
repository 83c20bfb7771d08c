//! Single-evaluation request builder from flat parameters.

use super::entity::{ActionBuilder, ResourceBuilder, SubjectBuilder};
use super::request::AZRequestBuilder;
use crate::error::BuildError;
use crate::models::{AZRequest, Principal};
use crate::value::{PropertyMap, Value};

/// Builds an atomic [`AZRequest`]: top-level subject/resource/action and no
/// evaluations.
///
/// Subject, resource and action are composed through their entity builders,
/// so the same required-field checks apply.
#[derive(Debug, Clone)]
pub struct AZAtomicRequestBuilder {
    request: AZRequestBuilder,
    subject: SubjectBuilder,
    resource: ResourceBuilder,
    action: ActionBuilder,
}

impl AZAtomicRequestBuilder {
    #[must_use]
    pub fn new(
        zone_id: i64,
        policy_store_id: impl Into<String>,
        subject_id: impl Into<String>,
        resource_type: impl Into<String>,
        action_name: impl Into<String>,
    ) -> Self {
        Self {
            request: AZRequestBuilder::new(zone_id, policy_store_id),
            subject: SubjectBuilder::new(subject_id),
            resource: ResourceBuilder::new(resource_type),
            action: ActionBuilder::new(action_name),
        }
    }

    #[must_use]
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request = self.request.with_request_id(request_id);
        self
    }

    #[must_use]
    pub fn with_principal(mut self, principal: Principal) -> Self {
        self.request = self.request.with_principal(principal);
        self
    }

    #[must_use]
    pub fn with_policy_store_kind(mut self, kind: impl Into<String>) -> Self {
        self.request = self.request.with_policy_store_kind(kind);
        self
    }

    #[must_use]
    pub fn with_entities(mut self, schema: impl Into<String>, items: Vec<PropertyMap>) -> Self {
        self.request = self.request.with_entities(schema, items);
        self
    }

    #[must_use]
    pub fn with_subject_type(mut self, subject_type: impl Into<String>) -> Self {
        self.subject = self.subject.with_type(subject_type);
        self
    }

    #[must_use]
    pub fn with_subject_source(mut self, source: impl Into<String>) -> Self {
        self.subject = self.subject.with_source(source);
        self
    }

    #[must_use]
    pub fn with_subject_property(
        mut self,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        self.subject = self.subject.with_property(key, value);
        self
    }

    #[must_use]
    pub fn with_resource_id(mut self, id: impl Into<String>) -> Self {
        self.resource = self.resource.with_id(id);
        self
    }

    #[must_use]
    pub fn with_resource_property(
        mut self,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        self.resource = self.resource.with_property(key, value);
        self
    }

    #[must_use]
    pub fn with_action_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.action = self.action.with_property(key, value);
        self
    }

    #[must_use]
    pub fn with_context_property(
        mut self,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        self.request = self.request.with_context_property(key, value);
        self
    }

    /// # Errors
    ///
    /// [`BuildError::MissingRequiredField`] for a non-positive zone id, an
    /// empty policy store id, subject id, resource type or action name.
    pub fn build(&self) -> Result<AZRequest, BuildError> {
        let subject = self.subject.build()?;
        let resource = self.resource.build()?;
        let action = self.action.build()?;

        self.request
            .clone()
            .with_atomic(subject, resource, action)
            .build()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::builder::PrincipalBuilder;

    const ZONE_ID: i64 = 634_601_921_829;
    const POLICY_STORE_ID: &str = "417b278c0d024cf789e3d3c2bc9854c6";
    const PRINCIPAL_ID: &str =
        "spiffe://edge.example.com/workload/64ad91fec7b0403eaf5d37e56c14ba42";
    const RESOURCE_TYPE: &str = "PharmaAuthZFlow::Platform::Branch";
    const ACTION_NAME: &str = "PharmaAuthZFlow::Platform::Action::assign-role";

    fn builder() -> AZAtomicRequestBuilder {
        AZAtomicRequestBuilder::new(
            ZONE_ID,
            POLICY_STORE_ID,
            "role/branch-owner",
            RESOURCE_TYPE,
            ACTION_NAME,
        )
    }

    #[test]
    fn builds_atomic_shape() {
        let principal = PrincipalBuilder::new(PRINCIPAL_ID)
            .with_type("workload")
            .with_source("spire")
            .build()
            .expect("principal");

        let req = builder()
            .with_request_id("atomic-1")
            .with_principal(principal.clone())
            .with_subject_type("attribute")
            .with_subject_property("isSuperUser", true)
            .with_resource_id("fb008a600df04b21841c4fb5ad27ddf7")
            .with_resource_property("isEnabled", true)
            .with_action_property("isEnabled", true)
            .with_context_property("isSubscriptionActive", true)
            .build()
            .expect("valid request");

        assert!(req.is_atomic());
        assert!(req.evaluations.is_empty());
        assert_eq!(req.model.principal, Some(principal));
        assert_eq!(req.model.policy_store.kind, "ledger");

        let subject = req.subject.as_ref().expect("subject");
        assert_eq!(subject.id, "role/branch-owner");
        assert_eq!(subject.subject_type.as_deref(), Some("attribute"));
        assert_eq!(subject.properties.get("isSuperUser"), Some(&Value::Bool(true)));

        let resource = req.resource.as_ref().expect("resource");
        assert_eq!(resource.resource_type, RESOURCE_TYPE);
        assert_eq!(resource.id.as_deref(), Some("fb008a600df04b21841c4fb5ad27ddf7"));

        let action = req.action.as_ref().expect("action");
        assert_eq!(action.name, ACTION_NAME);
        assert_eq!(action.properties.get("isEnabled"), Some(&Value::Bool(true)));
        assert!(req.context.is_some());
    }

    #[test]
    fn reports_missing_composed_fields() {
        let missing = |b: AZAtomicRequestBuilder| match b.build() {
            Err(BuildError::MissingRequiredField { field }) => field,
            Ok(_) => "none",
        };

        assert_eq!(
            missing(AZAtomicRequestBuilder::new(
                ZONE_ID,
                POLICY_STORE_ID,
                "",
                RESOURCE_TYPE,
                ACTION_NAME
            )),
            "subject.id"
        );
        assert_eq!(
            missing(AZAtomicRequestBuilder::new(ZONE_ID, POLICY_STORE_ID, "s", "", ACTION_NAME)),
            "resource.type"
        );
        assert_eq!(
            missing(AZAtomicRequestBuilder::new(ZONE_ID, POLICY_STORE_ID, "s", RESOURCE_TYPE, "")),
            "action.name"
        );
        assert_eq!(
            missing(AZAtomicRequestBuilder::new(
                0,
                POLICY_STORE_ID,
                "s",
                RESOURCE_TYPE,
                ACTION_NAME
            )),
            "authorization_model.zone_id"
        );
        assert_eq!(
            missing(AZAtomicRequestBuilder::new(ZONE_ID, "", "s", RESOURCE_TYPE, ACTION_NAME)),
            "authorization_model.policy_store.id"
        );
    }

    #[test]
    fn context_absent_without_properties() {
        let req = builder().build().expect("valid request");
        assert!(req.context.is_none());
        assert!(req.model.entities.is_none());
    }
}
