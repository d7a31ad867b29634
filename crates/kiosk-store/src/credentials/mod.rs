//! Local credential store.
//!
//! Accounts live in memory, keyed by case-folded username, and every
//! mutation rewrites the whole `users.json` document. The store guarantees
//! that an account named `admin` (in any casing) exists, holds the
//! [`Role::Admin`] role, and can be neither deleted nor demoted.
//!
//! Persistence failures are surfaced as [`DocumentError`] values and then
//! filtered through the store's [`PersistPolicy`]: by default they are logged
//! and the in-memory change stands.

mod role;
mod schema;

#[cfg(test)]
mod tests;

use std::collections::BTreeMap;

use camino::Utf8Path;
use tracing::{debug, error, info, warn};

pub use self::role::Role;
use self::schema::UserRecord;
use crate::document::{DocumentStore, FileDocument};
use crate::error::DocumentError;
use crate::password::{hash_password, verify_password};

/// File name of the user document beneath the base directory.
pub const USERS_DOCUMENT: &str = "users.json";

/// Username of the bootstrap administrator.
pub const ADMIN_USERNAME: &str = "admin";

const ADMIN_BOOTSTRAP_PASSWORD: &str = "admin123";

/// What a mutating call does when the document write fails.
///
/// In both cases the in-memory change is kept; memory and disk then differ
/// until the next successful write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PersistPolicy {
    /// Log the failure and report the operation's own outcome.
    #[default]
    LogAndContinue,
    /// Return the write failure to the caller.
    Propagate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Account {
    username: String,
    record: UserRecord,
}

/// Username/password accounts backed by a single JSON document.
///
/// Construct one per process and pass it by reference; it is not
/// synchronised internally.
///
/// # Examples
///
/// ```
/// use kiosk_store::{CredentialStore, InMemoryDocument, PersistPolicy, Role};
///
/// let mut store = CredentialStore::load(InMemoryDocument::new(), PersistPolicy::default())
///     .expect("in-memory store");
///
/// assert!(store.is_admin("admin"));
/// assert_eq!(store.register("Alice", "s3cret"), Ok(true));
/// assert_eq!(store.register("alice", "other"), Ok(false));
/// assert_eq!(store.validate("ALICE", "s3cret"), Ok(true));
/// assert_eq!(store.update_role("admin", Role::User), Ok(false));
/// ```
#[derive(Debug)]
pub struct CredentialStore<D = FileDocument> {
    document: D,
    policy: PersistPolicy,
    accounts: BTreeMap<String, Account>,
}

impl CredentialStore<FileDocument> {
    /// Opens `users.json` beneath `base_dir` with the default policy.
    ///
    /// # Errors
    ///
    /// Never fails under [`PersistPolicy::LogAndContinue`]; the signature
    /// matches [`CredentialStore::load`].
    pub fn open(base_dir: &Utf8Path) -> Result<Self, DocumentError> {
        Self::load(
            FileDocument::new(base_dir, USERS_DOCUMENT),
            PersistPolicy::default(),
        )
    }
}

impl<D: DocumentStore> CredentialStore<D> {
    /// Loads accounts from `document` and seeds the bootstrap administrator.
    ///
    /// An unreadable or undecodable document is logged and treated as empty.
    /// A legacy document is rewritten in the current layout straight away.
    ///
    /// # Errors
    ///
    /// Under [`PersistPolicy::Propagate`], returns the write failure from the
    /// migration or bootstrap save.
    pub fn load(document: D, policy: PersistPolicy) -> Result<Self, DocumentError> {
        let mut store = Self {
            document,
            policy,
            accounts: BTreeMap::new(),
        };
        if store.load_accounts() {
            store.persist()?;
        }
        store.ensure_bootstrap_admin()?;
        Ok(store)
    }

    /// Creates a `User` account. Returns `Ok(false)` if the username is
    /// already taken in any casing; the existing account is left untouched.
    ///
    /// # Errors
    ///
    /// Under [`PersistPolicy::Propagate`], returns the write failure. The
    /// account exists in memory regardless.
    pub fn register(&mut self, username: &str, password: &str) -> Result<bool, DocumentError> {
        let key = account_key(username);
        if self.accounts.contains_key(&key) {
            info!(username, "registration rejected: username taken");
            return Ok(false);
        }
        let record = UserRecord::new(hash_password(password), Role::User);
        self.accounts.insert(
            key,
            Account {
                username: username.to_owned(),
                record,
            },
        );
        info!(username, "user registered");
        self.persist().map(|()| true)
    }

    /// Checks a username/password pair.
    ///
    /// Unknown usernames and malformed stored hashes both yield `Ok(false)`.
    /// Validating `admin` also restores its role if it was ever lost.
    ///
    /// # Errors
    ///
    /// Under [`PersistPolicy::Propagate`], returns the write failure of a
    /// role repair.
    pub fn validate(&mut self, username: &str, password: &str) -> Result<bool, DocumentError> {
        let key = account_key(username);
        let Some(account) = self.accounts.get_mut(&key) else {
            debug!(username, "login rejected: unknown user");
            return Ok(false);
        };
        let repaired = key == ADMIN_USERNAME && account.record.role() != Role::Admin;
        if repaired {
            account.record.set_role(Role::Admin);
        }
        let verified = verify_password(password, account.record.password_hash());
        if repaired {
            warn!(username, "administrator role restored during login");
            self.persist()?;
        }
        Ok(verified)
    }

    /// Whether `username` exists and holds the `Admin` role.
    #[must_use]
    pub fn is_admin(&self, username: &str) -> bool {
        self.accounts
            .get(&account_key(username))
            .is_some_and(|account| account.record.role() == Role::Admin)
    }

    /// Whether an account named `username` exists in any casing.
    #[must_use]
    pub fn contains(&self, username: &str) -> bool {
        self.accounts.contains_key(&account_key(username))
    }

    /// Usernames, as registered, with their roles. Hashes are not exposed.
    #[must_use]
    pub fn list_users(&self) -> BTreeMap<String, Role> {
        self.accounts
            .values()
            .map(|account| (account.username.clone(), account.record.role()))
            .collect()
    }

    /// Number of accounts, including the administrator.
    #[must_use]
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Whether the store holds no accounts. Only possible before bootstrap.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Removes an account. Returns `Ok(false)` for `admin` in any casing and
    /// for unknown usernames.
    ///
    /// # Errors
    ///
    /// Under [`PersistPolicy::Propagate`], returns the write failure. The
    /// account is gone from memory regardless.
    pub fn delete_user(&mut self, username: &str) -> Result<bool, DocumentError> {
        let key = account_key(username);
        if key == ADMIN_USERNAME {
            warn!(username, "refusing to delete the administrator");
            return Ok(false);
        }
        if self.accounts.remove(&key).is_none() {
            return Ok(false);
        }
        info!(username, "user deleted");
        self.persist().map(|()| true)
    }

    /// Sets the role of an account. Returns `Ok(false)` for `admin` in any
    /// casing and for unknown usernames.
    ///
    /// # Errors
    ///
    /// Under [`PersistPolicy::Propagate`], returns the write failure. The new
    /// role is held in memory regardless.
    pub fn update_role(&mut self, username: &str, role: Role) -> Result<bool, DocumentError> {
        Ok(self.change_role(username, |_| role)?.is_some())
    }

    /// Flips an account between `User` and `Admin` and returns the new role.
    /// Returns `Ok(None)` where [`CredentialStore::update_role`] would return
    /// `Ok(false)`.
    ///
    /// # Errors
    ///
    /// Same as [`CredentialStore::update_role`].
    pub fn toggle_role(&mut self, username: &str) -> Result<Option<Role>, DocumentError> {
        self.change_role(username, Role::toggled)
    }

    /// Backing document.
    #[must_use]
    pub const fn document(&self) -> &D {
        &self.document
    }

    /// Active persistence policy.
    #[must_use]
    pub const fn policy(&self) -> PersistPolicy {
        self.policy
    }

    fn change_role(
        &mut self,
        username: &str,
        next: impl FnOnce(Role) -> Role,
    ) -> Result<Option<Role>, DocumentError> {
        let key = account_key(username);
        if key == ADMIN_USERNAME {
            warn!(username, "refusing to change the administrator role");
            return Ok(None);
        }
        let Some(account) = self.accounts.get_mut(&key) else {
            return Ok(None);
        };
        let role = next(account.record.role());
        account.record.set_role(role);
        info!(username, role = %role, "user role updated");
        self.persist().map(|()| Some(role))
    }

    /// Reads the document into memory. Returns whether it must be rewritten.
    fn load_accounts(&mut self) -> bool {
        let location = self.document.location().to_owned();
        let contents = match self.document.read() {
            Ok(Some(contents)) => contents,
            Ok(None) => {
                info!(path = %location, "no user document yet");
                return false;
            }
            Err(err) => {
                error!(path = %location, error = %err, "failed to load users");
                return false;
            }
        };

        match schema::decode(&contents) {
            Ok(decoded) => {
                for (username, record) in decoded.users {
                    self.accounts
                        .insert(account_key(&username), Account { username, record });
                }
                info!(
                    path = %location,
                    count = self.accounts.len(),
                    schema = decoded.version.name(),
                    "users loaded"
                );
                if decoded.version.needs_upgrade() {
                    info!(path = %location, "upgrading user document to current layout");
                }
                decoded.version.needs_upgrade()
            }
            Err(err) => {
                error!(path = %location, error = %err, "failed to load users");
                false
            }
        }
    }

    fn ensure_bootstrap_admin(&mut self) -> Result<(), DocumentError> {
        if let Some(account) = self.accounts.get_mut(ADMIN_USERNAME) {
            if account.record.role() == Role::Admin {
                return Ok(());
            }
            account.record.set_role(Role::Admin);
            warn!(username = %account.username, "administrator role restored");
        } else {
            let record = UserRecord::new(hash_password(ADMIN_BOOTSTRAP_PASSWORD), Role::Admin);
            self.accounts.insert(
                ADMIN_USERNAME.to_owned(),
                Account {
                    username: ADMIN_USERNAME.to_owned(),
                    record,
                },
            );
            info!("bootstrap administrator created");
        }
        self.persist()
    }

    fn persist(&self) -> Result<(), DocumentError> {
        let written = schema::encode(
            self.accounts
                .values()
                .map(|account| (account.username.as_str(), &account.record)),
        )
        .and_then(|json| self.document.write(&json));

        match written {
            Ok(()) => {
                debug!(
                    path = %self.document.location(),
                    count = self.accounts.len(),
                    "users saved"
                );
                Ok(())
            }
            Err(err) => {
                error!(path = %self.document.location(), error = %err, "failed to save users");
                match self.policy {
                    PersistPolicy::LogAndContinue => Ok(()),
                    PersistPolicy::Propagate => Err(err),
                }
            }
        }
    }
}

fn account_key(username: &str) -> String {
    username.to_lowercase()
}
