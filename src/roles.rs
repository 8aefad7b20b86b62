//! Role taxonomy
//!
//! Roles are plain data: an identifier, the definition text that becomes the
//! role's anchor embedding, and an optional summary template. Adding a role is
//! a configuration change, never a code change.

use serde::{Deserialize, Serialize};

use crate::scoring::UNKNOWN_ROLE;

/// Minimum number of roles a taxonomy must define
pub const MIN_ROLES: usize = 2;

/// One behavioral archetype
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleDefinition {
    /// Stable identifier, e.g. "Builder"
    pub id: String,
    /// Definition text embedded once per scorer as the role anchor
    pub description: String,
    /// Optional summary template (see `summary` for placeholders)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
}

impl RoleDefinition {
    pub fn new(id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            template: None,
        }
    }

    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }
}

/// Problems with a role taxonomy, detected before any scoring happens
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RoleConfigError {
    #[error("At least 2 roles are required, got {0}")]
    TooFewRoles(usize),

    #[error("Role at position {0} has an empty id")]
    EmptyId(usize),

    #[error("Duplicate role id: {0}")]
    DuplicateId(String),

    #[error("Role {0} has an empty description")]
    EmptyDescription(String),

    #[error("Role id '{0}' is reserved for degraded results")]
    ReservedId(String),
}

/// Validated, ordered set of roles
///
/// Order is significant: it fixes the column order of the similarity matrix,
/// the key order of every score map, and the tie-break for argmax.
#[derive(Debug, Clone, PartialEq)]
pub struct RoleSet {
    roles: Vec<RoleDefinition>,
}

impl RoleSet {
    /// Validate and wrap a list of roles
    pub fn new(roles: Vec<RoleDefinition>) -> Result<Self, RoleConfigError> {
        if roles.len() < MIN_ROLES {
            return Err(RoleConfigError::TooFewRoles(roles.len()));
        }

        for (i, role) in roles.iter().enumerate() {
            if role.id.trim().is_empty() {
                return Err(RoleConfigError::EmptyId(i));
            }
            if role.id.trim() == UNKNOWN_ROLE {
                return Err(RoleConfigError::ReservedId(role.id.clone()));
            }
            if role.description.trim().is_empty() {
                return Err(RoleConfigError::EmptyDescription(role.id.clone()));
            }
            if roles[..i].iter().any(|other| other.id == role.id) {
                return Err(RoleConfigError::DuplicateId(role.id.clone()));
            }
        }

        Ok(Self { roles })
    }

    /// The four-archetype RoleColor taxonomy
    pub fn default_taxonomy() -> Self {
        Self {
            roles: vec![
                RoleDefinition::new(
                    "Builder",
                    "Creates innovative solutions and drives strategic vision. \
                     Architects scalable systems and establishes technical direction. \
                     Focuses on long-term product thinking and builds foundational infrastructure.",
                )
                .with_template(
                    "Experienced {title} {experience} in architecting scalable systems and \
                     driving technical vision. Leverage a strong background in {skills} to \
                     transform abstract concepts into foundational infrastructure that supports \
                     organizational growth. Have a proven track record of designing long-term \
                     solutions and building frameworks that scale with evolving business needs.",
                ),
                RoleDefinition::new(
                    "Enabler",
                    "Facilitates collaboration across cross-functional teams. \
                     Coordinates stakeholders and executes complex plans. \
                     Bridges technical and business teams, enabling collective success.",
                )
                .with_template(
                    "{Title} {experience} in cross-functional collaboration and bridging gaps \
                     between technical and business stakeholders. Use expertise in {skills} to \
                     coordinate complex initiatives across multiple teams and unblock critical \
                     paths. Facilitate seamless collaboration and enable high-performing teams \
                     through effective communication and strategic execution.",
                ),
                RoleDefinition::new(
                    "Thriver",
                    "Performs exceptionally under tight deadlines and high pressure. \
                     Adapts rapidly to changing requirements and priorities. \
                     Thrives in fast-paced, dynamic environments with uncertainty.",
                )
                .with_template(
                    "{Title} {experience} thriving in fast-paced, dynamic environments where \
                     rapid adaptation is essential. Leverage technical expertise in {skills} to \
                     iterate and ship high-quality solutions under tight deadlines. Deliver \
                     results under pressure and uncertainty, pivoting quickly as requirements \
                     change.",
                ),
                RoleDefinition::new(
                    "Supportee",
                    "Ensures reliability and maintains critical systems. \
                     Documents processes and establishes quality standards. \
                     Provides consistent support and operational excellence.",
                )
                .with_template(
                    "{Title} {experience} focused on reliability and operational excellence \
                     through rigorous processes and attention to detail. Apply deep expertise in \
                     {skills} to maintain critical systems and ensure consistent quality through \
                     comprehensive documentation and standardized procedures.",
                ),
            ],
        }
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    /// Always false for a validated set; present for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RoleDefinition> {
        self.roles.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.roles.iter().map(|r| r.id.as_str())
    }

    pub fn get(&self, id: &str) -> Option<&RoleDefinition> {
        self.roles.iter().find(|r| r.id == id)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.roles.iter().position(|r| r.id == id)
    }

    pub fn as_slice(&self) -> &[RoleDefinition] {
        &self.roles
    }
}

impl Default for RoleSet {
    fn default() -> Self {
        Self::default_taxonomy()
    }
}

impl<'a> IntoIterator for &'a RoleSet {
    type Item = &'a RoleDefinition;
    type IntoIter = std::slice::Iter<'a, RoleDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        self.roles.iter()
    }
}
