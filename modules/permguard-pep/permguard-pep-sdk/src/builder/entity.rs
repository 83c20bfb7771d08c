//! Builders for principal, subject, resource and action.

use super::require_non_empty;
use crate::error::BuildError;
use crate::models::{Action, Principal, Resource, Subject};
use crate::value::{PropertyMap, Value};

/// Builder for [`Principal`].
#[derive(Debug, Clone)]
pub struct PrincipalBuilder {
    id: String,
    principal_type: Option<String>,
    source: Option<String>,
}

impl PrincipalBuilder {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            principal_type: None,
            source: None,
        }
    }

    /// Principal type (e.g. `"workload"`, `"user"`).
    #[must_use]
    pub fn with_type(mut self, principal_type: impl Into<String>) -> Self {
        self.principal_type = Some(principal_type.into());
        self
    }

    /// Identity provider that issued the principal (e.g. `"spire"`).
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// # Errors
    ///
    /// [`BuildError::MissingRequiredField`] if the id is empty.
    pub fn build(&self) -> Result<Principal, BuildError> {
        require_non_empty("principal.id", &self.id)?;
        Ok(Principal {
            id: self.id.clone(),
            principal_type: self.principal_type.clone(),
            source: self.source.clone(),
        })
    }
}

/// Builder for [`Subject`].
#[derive(Debug, Clone)]
pub struct SubjectBuilder {
    id: String,
    subject_type: Option<String>,
    source: Option<String>,
    properties: PropertyMap,
}

impl SubjectBuilder {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            subject_type: None,
            source: None,
            properties: PropertyMap::new(),
        }
    }

    #[must_use]
    pub fn with_type(mut self, subject_type: impl Into<String>) -> Self {
        self.subject_type = Some(subject_type.into());
        self
    }

    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Add a single property; a repeated key overwrites the earlier value.
    #[must_use]
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Set all properties at once (replaces any previously set).
    #[must_use]
    pub fn with_properties(mut self, properties: PropertyMap) -> Self {
        self.properties = properties;
        self
    }

    /// # Errors
    ///
    /// [`BuildError::MissingRequiredField`] if the id is empty.
    pub fn build(&self) -> Result<Subject, BuildError> {
        require_non_empty("subject.id", &self.id)?;
        Ok(Subject {
            id: self.id.clone(),
            subject_type: self.subject_type.clone(),
            source: self.source.clone(),
            properties: self.properties.clone(),
        })
    }
}

/// Builder for [`Resource`].
#[derive(Debug, Clone)]
pub struct ResourceBuilder {
    resource_type: String,
    id: Option<String>,
    properties: PropertyMap,
}

impl ResourceBuilder {
    #[must_use]
    pub fn new(resource_type: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            id: None,
            properties: PropertyMap::new(),
        }
    }

    /// Specific resource instance; omit to address the type as a whole.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_properties(mut self, properties: PropertyMap) -> Self {
        self.properties = properties;
        self
    }

    /// # Errors
    ///
    /// [`BuildError::MissingRequiredField`] if the resource type is empty.
    pub fn build(&self) -> Result<Resource, BuildError> {
        require_non_empty("resource.type", &self.resource_type)?;
        Ok(Resource {
            resource_type: self.resource_type.clone(),
            id: self.id.clone(),
            properties: self.properties.clone(),
        })
    }
}

/// Builder for [`Action`].
#[derive(Debug, Clone)]
pub struct ActionBuilder {
    name: String,
    properties: PropertyMap,
}

impl ActionBuilder {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: PropertyMap::new(),
        }
    }

    #[must_use]
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_properties(mut self, properties: PropertyMap) -> Self {
        self.properties = properties;
        self
    }

    /// # Errors
    ///
    /// [`BuildError::MissingRequiredField`] if the action name is empty.
    pub fn build(&self) -> Result<Action, BuildError> {
        require_non_empty("action.name", &self.name)?;
        Ok(Action {
            name: self.name.clone(),
            properties: self.properties.clone(),
        })
    }
}
