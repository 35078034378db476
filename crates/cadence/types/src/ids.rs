//! Identifier newtypes
//!
//! Every record family gets its own id type so a `ContactId` can never be
//! handed to something expecting a `CampaignId`. All ids are opaque strings
//! (UUIDs when generated here, caller-supplied when records originate in an
//! external store).

use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub String);

        impl $name {
            pub fn generate() -> Self {
                Self(uuid::Uuid::new_v4().to_string())
            }

            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// The first eight characters, for log-friendly display.
            /// Ids are not required to be ASCII, so the cut respects
            /// character boundaries.
            pub fn short(&self) -> &str {
                match self.0.char_indices().nth(8) {
                    Some((end, _)) => &self.0[..end],
                    None => &self.0,
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

string_id!(
    /// Unique identifier for an authored workflow
    WorkflowId
);
string_id!(
    /// Unique identifier for a workflow node
    NodeId
);
string_id!(
    /// Unique identifier for a campaign
    CampaignId
);
string_id!(
    /// Unique identifier for a compiled campaign step
    StepId
);
string_id!(
    /// Unique identifier for a contact
    ContactId
);
string_id!(
    /// Unique identifier for a scheduled step; the unit the gate acts on
    ActionId
);
string_id!(
    /// Unique identifier for an approval item
    ApprovalId
);
string_id!(
    /// Unique identifier for a workspace (tenant scope for gate state)
    WorkspaceId
);
string_id!(
    /// Unique identifier for the human or agent driving a deployment
    ActorId
);
