//! # Assertions
//!
//! The typed payload inside a credential subject. On the wire an assertion
//! is a JSON object whose `@type` member names its kind:
//!
//! ```json
//! {"@type": "credchain.AuthorizedDevice", "identityKey": "…", "deviceKey": "…"}
//! ```
//!
//! Verification only inspects `AuthorizedDevice`. `SpaceMember` and `Epoch`
//! are typed for convenience; any other kind is carried as
//! [`Assertion::Other`] with its members kept verbatim.
//!
//! The `@type` member is excluded from signing payloads by the canonical
//! encoder, so the signed bytes fix a kind only through its member names.
//! [`Assertion::validate`] therefore refuses an `Other` whose signed members
//! are exactly those of a typed kind. Two `Other` kinds with the same member
//! names remain interchangeable.

use credchain_core::{Canonicalize, CanonicalValue, ObjectBuilder, PublicKey, Timeframe};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::CredentialError;

/// Type URL of [`AuthorizedDevice`].
pub const AUTHORIZED_DEVICE: &str = "credchain.AuthorizedDevice";
/// Type URL of [`SpaceMember`].
pub const SPACE_MEMBER: &str = "credchain.SpaceMember";
/// Type URL of [`Epoch`].
pub const EPOCH: &str = "credchain.Epoch";

const TYPE_MEMBER: &str = "@type";

/// Signed member names of each typed kind, sorted, optional members
/// expanded.
const TYPED_MEMBER_SETS: &[(&str, &[&str])] = &[
    (AUTHORIZED_DEVICE, &["deviceKey", "identityKey"]),
    (SPACE_MEMBER, &["role", "spaceKey"]),
    (SPACE_MEMBER, &["genesisFeedKey", "role", "spaceKey"]),
    (EPOCH, &["number", "timeframe"]),
    (EPOCH, &["number", "previousId", "timeframe"]),
];

/// Delegates signing authority from an identity key to a device key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizedDevice {
    pub identity_key: PublicKey,
    pub device_key: PublicKey,
}

/// Membership role. Opaque to verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Owner,
    Admin,
    Editor,
    Reader,
    Removed,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Owner => "OWNER",
            Role::Admin => "ADMIN",
            Role::Editor => "EDITOR",
            Role::Reader => "READER",
            Role::Removed => "REMOVED",
        }
    }
}

/// Admits the subject to a space with a role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpaceMember {
    pub space_key: PublicKey,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genesis_feed_key: Option<PublicKey>,
}

/// Pins a replicated state snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Epoch {
    pub number: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_id: Option<PublicKey>,
    #[serde(default)]
    pub timeframe: Timeframe,
}

/// A kind-tagged credential payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Assertion {
    AuthorizedDevice(AuthorizedDevice),
    SpaceMember(SpaceMember),
    Epoch(Epoch),
    /// Any other kind; `fields` holds every member except `@type`.
    Other {
        type_url: String,
        fields: Map<String, Value>,
    },
}

impl Assertion {
    /// The kind's type URL.
    pub fn kind(&self) -> &str {
        match self {
            Assertion::AuthorizedDevice(_) => AUTHORIZED_DEVICE,
            Assertion::SpaceMember(_) => SPACE_MEMBER,
            Assertion::Epoch(_) => EPOCH,
            Assertion::Other { type_url, .. } => type_url,
        }
    }

    pub fn as_authorized_device(&self) -> Option<&AuthorizedDevice> {
        match self {
            Assertion::AuthorizedDevice(device) => Some(device),
            _ => None,
        }
    }

    /// Parse the wire form.
    ///
    /// # Errors
    ///
    /// `InvalidAssertion` if the value is not an object, `@type` is missing
    /// or not a dotted identifier, or a known kind has malformed members.
    pub fn from_json(value: &Value) -> Result<Self, CredentialError> {
        let object = value
            .as_object()
            .ok_or_else(|| CredentialError::InvalidAssertion("assertion must be an object".into()))?;
        let type_url = object
            .get(TYPE_MEMBER)
            .and_then(Value::as_str)
            .ok_or_else(|| CredentialError::InvalidAssertion("missing @type".into()))?;
        if !is_type_url(type_url) {
            return Err(CredentialError::InvalidAssertion(format!(
                "unrecognized assertion kind {type_url:?}"
            )));
        }

        let malformed =
            |e: serde_json::Error| CredentialError::InvalidAssertion(format!("{type_url}: {e}"));
        let assertion = match type_url {
            AUTHORIZED_DEVICE => {
                Assertion::AuthorizedDevice(serde_json::from_value(value.clone()).map_err(malformed)?)
            }
            SPACE_MEMBER => {
                Assertion::SpaceMember(serde_json::from_value(value.clone()).map_err(malformed)?)
            }
            EPOCH => Assertion::Epoch(serde_json::from_value(value.clone()).map_err(malformed)?),
            _ => {
                let mut fields = object.clone();
                fields.remove(TYPE_MEMBER);
                Assertion::Other {
                    type_url: type_url.to_string(),
                    fields,
                }
            }
        };
        Ok(assertion)
    }

    /// The wire form, with `@type` set.
    pub fn to_json(&self) -> Value {
        let mut object = match self {
            Assertion::AuthorizedDevice(a) => object_of(a),
            Assertion::SpaceMember(a) => object_of(a),
            Assertion::Epoch(a) => object_of(a),
            Assertion::Other { fields, .. } => fields.clone(),
        };
        object.insert(TYPE_MEMBER.to_string(), Value::String(self.kind().to_string()));
        Value::Object(object)
    }

    /// Check that the kind tag is usable for signing.
    ///
    /// `Other` must carry a dotted identifier that does not shadow a known
    /// kind, and its signed members must not be exactly a known kind's.
    pub fn validate(&self) -> Result<(), CredentialError> {
        if let Assertion::Other { type_url, fields } = self {
            if !is_type_url(type_url) {
                return Err(CredentialError::InvalidAssertion(format!(
                    "unrecognized assertion kind {type_url:?}"
                )));
            }
            if matches!(type_url.as_str(), AUTHORIZED_DEVICE | SPACE_MEMBER | EPOCH) {
                return Err(CredentialError::InvalidAssertion(format!(
                    "{type_url} must use its typed variant"
                )));
            }
            let mut signed: Vec<&str> = fields
                .iter()
                .filter(|(name, value)| !name.starts_with("__") && !value.is_null())
                .map(|(name, _)| name.as_str())
                .collect();
            signed.sort_unstable();
            if let Some((kind, _)) = TYPED_MEMBER_SETS
                .iter()
                .find(|(_, members)| signed.as_slice() == *members)
            {
                return Err(CredentialError::InvalidAssertion(format!(
                    "{type_url} has the signed members of {kind}"
                )));
            }
        }
        Ok(())
    }
}

fn object_of<T: Serialize>(value: &T) -> Map<String, Value> {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    }
}

/// `segment(.segment)+`, each segment an identifier.
fn is_type_url(s: &str) -> bool {
    let mut segments = 0;
    for segment in s.split('.') {
        let mut chars = segment.chars();
        let valid_start = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_');
        if !valid_start || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return false;
        }
        segments += 1;
    }
    segments >= 2
}

impl From<AuthorizedDevice> for Assertion {
    fn from(value: AuthorizedDevice) -> Self {
        Assertion::AuthorizedDevice(value)
    }
}

impl From<SpaceMember> for Assertion {
    fn from(value: SpaceMember) -> Self {
        Assertion::SpaceMember(value)
    }
}

impl From<Epoch> for Assertion {
    fn from(value: Epoch) -> Self {
        Assertion::Epoch(value)
    }
}

impl Serialize for Assertion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Assertion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_json(&value).map_err(serde::de::Error::custom)
    }
}

impl Canonicalize for Role {
    fn canonical_value(&self) -> CanonicalValue {
        CanonicalValue::String(self.as_str().to_string())
    }
}

impl Canonicalize for Assertion {
    fn canonical_value(&self) -> CanonicalValue {
        let builder = ObjectBuilder::new().field(TYPE_MEMBER, self.kind());
        match self {
            Assertion::AuthorizedDevice(a) => builder
                .field("identityKey", &a.identity_key)
                .field("deviceKey", &a.device_key)
                .build(),
            Assertion::SpaceMember(a) => builder
                .field("spaceKey", &a.space_key)
                .field("role", &a.role)
                .field("genesisFeedKey", &a.genesis_feed_key)
                .build(),
            Assertion::Epoch(a) => builder
                .field("number", &a.number)
                .field("previousId", &a.previous_id)
                .field("timeframe", &a.timeframe)
                .build(),
            Assertion::Other { fields, .. } => fields
                .iter()
                .fold(builder, |b, (name, value)| b.field(name, value))
                .build(),
        }
    }
}
