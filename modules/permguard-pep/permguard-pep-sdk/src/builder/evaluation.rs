//! Builder for a single evaluation of a batch request.

use crate::error::BuildError;
use crate::models::{Action, Evaluation, Resource, Subject};
use crate::value::{PropertyMap, Value};

/// Builder for [`Evaluation`].
///
/// Usually created with [`EvaluationBuilder::new`]; the `Default` form lets
/// callers assemble the parts step by step, and `build()` reports whichever
/// of subject, resource or action is still missing.
#[derive(Debug, Clone, Default)]
pub struct EvaluationBuilder {
    request_id: Option<String>,
    subject: Option<Subject>,
    resource: Option<Resource>,
    action: Option<Action>,
    context: Option<PropertyMap>,
}

impl EvaluationBuilder {
    #[must_use]
    pub fn new(subject: Subject, resource: Resource, action: Action) -> Self {
        Self {
            subject: Some(subject),
            resource: Some(resource),
            action: Some(action),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_subject(mut self, subject: Subject) -> Self {
        self.subject = Some(subject);
        self
    }

    #[must_use]
    pub fn with_resource(mut self, resource: Resource) -> Self {
        self.resource = Some(resource);
        self
    }

    #[must_use]
    pub fn with_action(mut self, action: Action) -> Self {
        self.action = Some(action);
        self
    }

    /// Correlation id echoed back on the matching evaluation response.
    #[must_use]
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    /// Set the whole evaluation context (replaces any previously set).
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

    /// # Errors
    ///
    /// [`BuildError::MissingRequiredField`] if subject, resource or action is unset.
    pub fn build(&self) -> Result<Evaluation, BuildError> {
        let subject = self.subject.clone().ok_or(BuildError::MissingRequiredField {
            field: "evaluation.subject",
        })?;
        let resource = self
            .resource
            .clone()
            .ok_or(BuildError::MissingRequiredField {
                field: "evaluation.resource",
            })?;
        let action = self.action.clone().ok_or(BuildError::MissingRequiredField {
            field: "evaluation.action",
        })?;

        Ok(Evaluation {
            request_id: self.request_id.clone(),
            subject,
            resource,
            action,
            context: self.context.clone(),
        })
    }
}
