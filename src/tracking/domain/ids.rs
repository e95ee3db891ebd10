//! Identifier types for the tracking domain.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! uuid_identifier {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new random identifier.
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Creates an identifier from an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the wrapped UUID.
            #[must_use]
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl AsRef<Uuid> for $name {
            fn as_ref(&self) -> &Uuid {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

uuid_identifier!(
    /// Unique identifier for a work item.
    WorkItemId
);

uuid_identifier!(
    /// Reference to a person: an internal employee or a customer employee.
    PersonId
);

uuid_identifier!(
    /// Reference to a project in the external directory.
    ProjectId
);

uuid_identifier!(
    /// Reference to an internal team.
    TeamId
);

uuid_identifier!(
    /// Reference to a customer company.
    CompanyId
);

/// Kind of organising unit that owns a work item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrgKind {
    /// Internal team of employees.
    Team,
    /// External customer company.
    CustomerCompany,
}

impl OrgKind {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Team => "team",
            Self::CustomerCompany => "customer_company",
        }
    }
}

/// Organising unit that owns a work item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum OrgRef {
    /// Item owned by an internal team.
    Team(TeamId),
    /// Item owned by a customer company.
    Company(CompanyId),
}

impl OrgRef {
    /// Returns the discriminator of this organisation reference.
    #[must_use]
    pub const fn kind(self) -> OrgKind {
        match self {
            Self::Team(_) => OrgKind::Team,
            Self::Company(_) => OrgKind::CustomerCompany,
        }
    }

    /// Returns the team identifier for internal items.
    #[must_use]
    pub const fn team(self) -> Option<TeamId> {
        match self {
            Self::Team(team) => Some(team),
            Self::Company(_) => None,
        }
    }

    /// Returns the company identifier for customer items.
    #[must_use]
    pub const fn company(self) -> Option<CompanyId> {
        match self {
            Self::Team(_) => None,
            Self::Company(company) => Some(company),
        }
    }
}

impl fmt::Display for OrgRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Team(team) => write!(f, "team {team}"),
            Self::Company(company) => write!(f, "company {company}"),
        }
    }
}
