//! On-disk layouts of the user document.
//!
//! Two layouts exist. The current one maps each username to
//! `{ "PasswordHash": .., "Role": .. }`; the legacy one maps each username
//! straight to its hash string. Decoding tries the layouts in order and keeps
//! the first that fits. Legacy records are lifted by [`migrate_legacy`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::role::Role;
use crate::error::{DocumentError, UserDocumentError};

/// Stored credentials for one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct UserRecord {
    #[serde(default)]
    password_hash: String,
    #[serde(default)]
    role: Role,
}

impl UserRecord {
    pub(crate) const fn new(password_hash: String, role: Role) -> Self {
        Self {
            password_hash,
            role,
        }
    }

    pub(crate) fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub(crate) const fn role(&self) -> Role {
        self.role
    }

    pub(crate) const fn set_role(&mut self, role: Role) {
        self.role = role;
    }
}

/// Layout a document was decoded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SchemaVersion {
    /// Username to `{ PasswordHash, Role }`.
    Current,
    /// Username to bare hash string.
    LegacyHashes,
}

impl SchemaVersion {
    pub(crate) const fn name(self) -> &'static str {
        match self {
            Self::Current => "current",
            Self::LegacyHashes => "legacy-hashes",
        }
    }

    /// Whether a document in this layout must be rewritten.
    pub(crate) const fn needs_upgrade(self) -> bool {
        matches!(self, Self::LegacyHashes)
    }
}

/// Users decoded from a document, keyed by username as stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DecodedUsers {
    pub(crate) version: SchemaVersion,
    pub(crate) users: BTreeMap<String, UserRecord>,
}

type Decoder = fn(&str) -> Result<BTreeMap<String, UserRecord>, serde_json::Error>;

const DECODERS: [(SchemaVersion, Decoder); 2] = [
    (SchemaVersion::Current, decode_current as Decoder),
    (SchemaVersion::LegacyHashes, decode_legacy as Decoder),
];

/// Decodes `json` with the first layout that accepts it.
pub(crate) fn decode(json: &str) -> Result<DecodedUsers, UserDocumentError> {
    let mut attempts = Vec::with_capacity(DECODERS.len());
    for (version, decoder) in DECODERS {
        match decoder(json) {
            Ok(users) => return Ok(DecodedUsers { version, users }),
            Err(err) => attempts.push(format!("{}: {err}", version.name())),
        }
    }
    Err(UserDocumentError::Undecodable { attempts })
}

/// Lifts legacy hash-only entries into full records with the `User` role.
pub(crate) fn migrate_legacy(hashes: BTreeMap<String, String>) -> BTreeMap<String, UserRecord> {
    hashes
        .into_iter()
        .map(|(username, hash)| (username, UserRecord::new(hash, Role::User)))
        .collect()
}

/// Encodes users in the current layout.
pub(crate) fn encode<'a, I>(users: I) -> Result<String, DocumentError>
where
    I: IntoIterator<Item = (&'a str, &'a UserRecord)>,
{
    let document: BTreeMap<&str, &UserRecord> = users.into_iter().collect();
    serde_json::to_string(&document).map_err(|err| DocumentError::EncodeError {
        message: err.to_string(),
    })
}

fn decode_current(json: &str) -> Result<BTreeMap<String, UserRecord>, serde_json::Error> {
    serde_json::from_str(json)
}

fn decode_legacy(json: &str) -> Result<BTreeMap<String, UserRecord>, serde_json::Error> {
    serde_json::from_str::<BTreeMap<String, String>>(json).map(migrate_legacy)
}
