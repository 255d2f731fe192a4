//! String identifiers
//!
//! Every record in the external stores is keyed by an opaque string id.
//! Newtypes keep a customer id from being passed where a project id is
//! expected.

use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Create id from any string-like value
            #[inline]
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the raw id
            #[inline]
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

string_id!(
    /// Principal (login identity) id
    PrincipalId
);
string_id!(
    /// Customer record id; also the onboarding dossier key
    CustomerId
);
string_id!(
    /// Team member (sales, tech, consultant) id
    TeamMemberId
);
string_id!(
    /// Project id
    ProjectId
);
string_id!(
    /// Workspace id
    WorkspaceId
);
string_id!(
    /// Customer action id
    ActionId
);
string_id!(
    /// Feedback item id
    FeedbackId
);
string_id!(
    /// Link from a principal to a team member or customer record.
    ///
    /// Which kind it is depends on the principal's role.
    LinkingId
);

impl LinkingId {
    /// Interpret as a customer id (customer principals)
    #[inline]
    #[must_use]
    pub fn as_customer(&self) -> CustomerId {
        CustomerId(self.0.clone())
    }

    /// Interpret as a team member id (sales, tech, consultant principals)
    #[inline]
    #[must_use]
    pub fn as_team_member(&self) -> TeamMemberId {
        TeamMemberId(self.0.clone())
    }
}

impl PartialEq<CustomerId> for LinkingId {
    fn eq(&self, other: &CustomerId) -> bool {
        self.0 == other.0
    }
}

impl PartialEq<TeamMemberId> for LinkingId {
    fn eq(&self, other: &TeamMemberId) -> bool {
        self.0 == other.0
    }
}
