//! Principals that statements are granted to.

use crate::Locator;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// An identity capable of receiving permission statements.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Principal {
    /// An account as a whole, by account id.
    Account(String),
    /// A role, user or other identity addressed by its locator.
    Identity(Locator),
    /// A service acting on behalf of a resource (e.g.
    /// `dnssec-route53.amazonaws.com`).
    Service(String),
}

impl Principal {
    /// Principal for the identity behind `locator`.
    pub fn identity(locator: impl Into<Locator>) -> Self {
        Self::Identity(locator.into())
    }

    /// Principal for a service.
    pub fn service(name: impl Into<String>) -> Self {
        Self::Service(name.into())
    }

    /// Principal for an account root.
    pub fn account(id: impl Into<String>) -> Self {
        Self::Account(id.into())
    }
}

impl Display for Principal {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Principal::Account(id) => write!(f, "account:{id}"),
            Principal::Identity(locator) => write!(f, "{locator}"),
            Principal::Service(name) => write!(f, "service:{name}"),
        }
    }
}

/// Anything that can be the target of a grant.
///
/// Grant composition never inspects a grantee beyond its [`Principal`].
pub trait Grantee {
    /// The principal statements are attached to.
    fn principal(&self) -> &Principal;
}

impl Grantee for Principal {
    fn principal(&self) -> &Principal {
        self
    }
}

impl<T: Grantee + ?Sized> Grantee for &T {
    fn principal(&self) -> &Principal {
        (**self).principal()
    }
}
