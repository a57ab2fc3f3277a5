//! DNSSEC key signing keys.
//!
//! A key signing key lets the DNS service sign a hosted zone with a
//! caller-owned asymmetric key. The service acts on behalf of the zone, so
//! the key grants it receives are conditioned on the zone's locator.

use serde::{Deserialize, Serialize};
use tabula_capability::{Action, Actions, Condition, Grant, Locator, Principal};
use tabula_effects::PlatformError;
use tabula_effects::dns::{HostedZone, KeySigningKeyInput, KeySigningKeyStatus};
use tabula_effects::key::{Key, KeyService};
use tabula_effects::platform::{Platform, Scope};

/// Service principal that signs hosted zones.
pub const DNSSEC_SERVICE_PRINCIPAL: &str = "dnssec-route53.amazonaws.com";

/// Condition key carrying the locator of the resource a service acts for.
pub const SOURCE_LOCATOR: &str = "aws:SourceArn";

/// Condition key set when a key grant is created for a managed resource.
pub const GRANT_IS_FOR_RESOURCE: &str = "kms:GrantIsForAWSResource";

const SIGNING_ACTIONS: &[Action] = &[
    Action::from_static("kms:DescribeKey"),
    Action::from_static("kms:GetPublicKey"),
    Action::from_static("kms:Sign"),
];

const CREATE_GRANT_ACTIONS: &[Action] = &[Action::from_static("kms:CreateGrant")];

/// Grant `principal`, acting for `owner`, the use of `key`.
///
/// Returns two separate grants:
///
/// 1. signing actions, only when the request comes from `owner`;
/// 2. `kms:CreateGrant`, only for grants made to a managed resource.
pub fn grant_for_owner(
    keys: &impl KeyService,
    key: &Key,
    principal: &Principal,
    owner: &Locator,
) -> [Grant; 2] {
    [
        keys.grant_with(
            key,
            principal,
            Actions::from(SIGNING_ACTIONS),
            vec![Condition::arn_equals(SOURCE_LOCATOR, owner)],
        ),
        keys.grant_with(
            key,
            principal,
            Actions::from(CREATE_GRANT_ACTIONS),
            vec![Condition::bool(GRANT_IS_FOR_RESOURCE, true)],
        ),
    ]
}

/// Options of a [`KeySigningKey`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeySigningKeyProps {
    /// Zone to sign.
    pub hosted_zone: HostedZone,
    /// Asymmetric signing key.
    pub key: Key,
    /// Name, unique within the zone; allocated by the platform when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Signing status.
    #[serde(default)]
    pub status: KeySigningKeyStatus,
}

/// A key signing key for a hosted zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeySigningKey {
    hosted_zone: HostedZone,
    name: String,
    grants: Vec<Grant>,
}

impl KeySigningKey {
    /// Create a key signing key at `scope`, granting the DNS service use of
    /// `props.key` on behalf of the zone.
    pub fn new<Env>(
        env: &mut Env,
        scope: &Scope,
        props: KeySigningKeyProps,
    ) -> Result<Self, PlatformError>
    where
        Env: Platform + KeyService,
    {
        let KeySigningKeyProps {
            hosted_zone,
            key,
            name,
            status,
        } = props;
        let grants = grant_for_owner(
            &*env,
            &key,
            &Principal::service(DNSSEC_SERVICE_PRINCIPAL),
            &hosted_zone.locator,
        );

        let name = match name {
            Some(name) => name,
            None => env.allocate_name(scope),
        };
        let handle = env.create_key_signing_key(
            scope,
            &KeySigningKeyInput {
                hosted_zone_id: hosted_zone.id.clone(),
                key_locator: key.locator.clone(),
                name: name.clone(),
                status,
            },
        )?;

        tracing::info!(
            scope = %scope,
            zone = %hosted_zone.id,
            key_signing_key = %handle.id,
            status = %status,
            "created key signing key"
        );

        Ok(Self {
            hosted_zone,
            name,
            grants: grants.into(),
        })
    }

    /// Reference an existing key signing key.
    pub fn from_attributes(hosted_zone: HostedZone, name: impl Into<String>) -> Self {
        Self {
            hosted_zone,
            name: name.into(),
            grants: Vec::new(),
        }
    }

    /// Signed zone.
    pub fn hosted_zone(&self) -> &HostedZone {
        &self.hosted_zone
    }

    /// Name within the zone.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// `{zone id}|{name}`.
    pub fn id(&self) -> String {
        format!("{}|{}", self.hosted_zone.id, self.name)
    }

    /// Key grants issued when this key signing key was created. Empty for
    /// imported ones.
    pub fn grants(&self) -> &[Grant] {
        &self.grants
    }
}
