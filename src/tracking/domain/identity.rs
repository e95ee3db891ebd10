//! Caller identity and role model.

use super::{CompanyId, OrgKind, PersonId, WorkItemDomainError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Population a role belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// Employees of the operating organisation.
    Internal,
    /// Staff of a customer company.
    Customer,
}

/// Closed set of caller roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// System administrator with unrestricted visibility.
    Admin,
    /// Internal manager with unrestricted visibility.
    Manager,
    /// Internal lead of one or more teams.
    TeamLead,
    /// Internal employee.
    Employee,
    /// Head of a customer company.
    CustomerHead,
    /// Staff member of a customer company.
    CustomerEmployee,
}

impl Role {
    /// Returns the population the role belongs to.
    #[must_use]
    pub const fn side(self) -> Side {
        match self {
            Self::Admin | Self::Manager | Self::TeamLead | Self::Employee => Side::Internal,
            Self::CustomerHead | Self::CustomerEmployee => Side::Customer,
        }
    }

    /// Returns the canonical claim representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Manager => "manager",
            Self::TeamLead => "team_lead",
            Self::Employee => "employee",
            Self::CustomerHead => "customer_head",
            Self::CustomerEmployee => "customer_employee",
        }
    }

    /// Returns `true` when the role sees every work item.
    #[must_use]
    pub const fn is_unrestricted(self) -> bool {
        matches!(self, Self::Admin | Self::Manager)
    }

    /// Returns `true` when the role may create items owned by `kind`.
    #[must_use]
    pub const fn can_create(self, kind: OrgKind) -> bool {
        match kind {
            OrgKind::Team => matches!(self, Self::Admin | Self::Manager | Self::TeamLead),
            OrgKind::CustomerCompany => {
                matches!(self, Self::Admin | Self::Manager | Self::CustomerHead)
            }
        }
    }

    /// Returns `true` when the role may delete work items.
    #[must_use]
    pub const fn can_delete(self) -> bool {
        self.is_unrestricted()
    }

    /// Returns `true` when the role holds management authority that allows
    /// transferring work between people.
    #[must_use]
    pub const fn can_transfer(self) -> bool {
        matches!(
            self,
            Self::Admin | Self::Manager | Self::TeamLead | Self::CustomerHead
        )
    }
}

impl TryFrom<&str> for Role {
    type Error = WorkItemDomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "admin" => Ok(Self::Admin),
            "manager" => Ok(Self::Manager),
            "team_lead" | "teamlead" => Ok(Self::TeamLead),
            "employee" => Ok(Self::Employee),
            "customer_head" => Ok(Self::CustomerHead),
            "customer_employee" => Ok(Self::CustomerEmployee),
            _ => Err(WorkItemDomainError::UnknownRole(value.to_owned())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolved caller of a tracking operation.
///
/// Supplied by the authentication collaborator. Customer-side roles always
/// carry the company they belong to; internal roles never do. Deserialised
/// identities go through the same check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "IdentityClaims")]
pub struct Identity {
    person: PersonId,
    role: Role,
    company: Option<CompanyId>,
}

/// Unvalidated wire form of [`Identity`].
#[derive(Deserialize)]
struct IdentityClaims {
    person: PersonId,
    role: Role,
    #[serde(default)]
    company: Option<CompanyId>,
}

impl TryFrom<IdentityClaims> for Identity {
    type Error = WorkItemDomainError;

    fn try_from(claims: IdentityClaims) -> Result<Self, Self::Error> {
        let IdentityClaims {
            person,
            role,
            company,
        } = claims;
        company.map_or_else(
            || Self::internal(person, role),
            |company_id| Self::customer(person, role, company_id),
        )
    }
}

impl Identity {
    /// Creates an identity for an internal employee.
    ///
    /// # Errors
    ///
    /// Returns [`WorkItemDomainError::AffiliationMismatch`] when `role` is a
    /// customer-side role.
    pub const fn internal(person: PersonId, role: Role) -> Result<Self, WorkItemDomainError> {
        match role.side() {
            Side::Internal => Ok(Self {
                person,
                role,
                company: None,
            }),
            Side::Customer => Err(WorkItemDomainError::AffiliationMismatch(role)),
        }
    }

    /// Creates an identity for a member of a customer company.
    ///
    /// # Errors
    ///
    /// Returns [`WorkItemDomainError::AffiliationMismatch`] when `role` is an
    /// internal role.
    pub const fn customer(
        person: PersonId,
        role: Role,
        company: CompanyId,
    ) -> Result<Self, WorkItemDomainError> {
        match role.side() {
            Side::Customer => Ok(Self {
                person,
                role,
                company: Some(company),
            }),
            Side::Internal => Err(WorkItemDomainError::AffiliationMismatch(role)),
        }
    }

    /// Builds an identity from raw authentication claims.
    ///
    /// # Errors
    ///
    /// Returns [`WorkItemDomainError::UnknownRole`] for unrecognised roles and
    /// [`WorkItemDomainError::AffiliationMismatch`] when the company claim
    /// does not match the role's side.
    pub fn from_claims(
        person: PersonId,
        role: &str,
        company: Option<CompanyId>,
    ) -> Result<Self, WorkItemDomainError> {
        let parsed = Role::try_from(role)?;
        company.map_or_else(
            || Self::internal(person, parsed),
            |company_id| Self::customer(person, parsed, company_id),
        )
    }

    /// Returns the caller's person reference.
    #[must_use]
    pub const fn person(&self) -> PersonId {
        self.person
    }

    /// Returns the caller's role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Returns the caller's customer company, if any.
    #[must_use]
    pub const fn company(&self) -> Option<CompanyId> {
        self.company
    }
}
