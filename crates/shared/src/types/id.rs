//! Typed ID newtypes for entity references.
//!
//! An `InvoiceId` and a `ClientId` are both UUIDs on the wire, but mixing
//! them up is a bug the compiler can catch. Fresh IDs are UUIDv7 so primary
//! keys stay roughly insertion-ordered.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! typed_id {
    ($($(#[doc = $doc:literal])+ $name:ident),+ $(,)?) => {$(
        $(#[doc = $doc])+
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Mints a fresh time-ordered identifier.
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Wraps an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Unwraps to the raw UUID for the storage layer.
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

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                std::fmt::Display::fmt(&self.0, f)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.parse().map(Self)
            }
        }
    )+};
}

typed_id! {
    /// Invoice primary key.
    InvoiceId,
    /// Invoice line item primary key.
    LineItemId,
    /// Reference to a clinic client (pet owner), owned by the clients
    /// collaborator.
    ClientId,
    /// Reference to a pet, owned by the pets collaborator.
    PetId,
    /// Reference to a catalog service, owned by the services collaborator.
    ServiceId,
    /// Reference to a catalog product, owned by the products collaborator.
    ProductId,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_new_ids_are_unique() {
        assert_ne!(InvoiceId::new(), InvoiceId::new());
    }

    #[test]
    fn test_round_trip_through_uuid() {
        let id = LineItemId::new();
        assert_eq!(LineItemId::from_uuid(id.into_inner()), id);
        assert_eq!(Uuid::from(LineItemId::from(id.into_inner())), id.into_inner());
    }

    #[test]
    fn test_v7_ids_are_time_ordered() {
        let earlier = InvoiceId::new();
        let later = InvoiceId::new();
        assert!(earlier <= later);
    }

    #[test]
    fn test_from_str() {
        let id = InvoiceId::new();
        let parsed = InvoiceId::from_str(&id.to_string()).unwrap();
        assert_eq!(parsed, id);

        assert!(InvoiceId::from_str("not-a-uuid").is_err());
    }
}
