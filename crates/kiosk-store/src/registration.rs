//! Sign-in and sign-up input for kiosk screens and the command line.
//!
//! Raw text fields are checked here, then handed to a
//! [`CredentialStore`]; a blank username or password never reaches the
//! user document.

use std::fmt;

use zeroize::Zeroizing;

use crate::credentials::CredentialStore;
use crate::document::DocumentStore;
use crate::error::{DocumentError, RegistrationError};

/// Password text wiped from memory on drop and never printed.
#[derive(Clone, PartialEq, Eq)]
struct Secret(Zeroizing<String>);

impl Secret {
    fn new(raw: &str) -> Result<Self, RegistrationError> {
        if raw.is_empty() {
            return Err(RegistrationError::EmptyPassword);
        }
        Ok(Self(Zeroizing::new(raw.to_owned())))
    }

    fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<redacted>")
    }
}

fn account_name(raw: &str) -> Result<String, RegistrationError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(RegistrationError::EmptyUsername);
    }
    Ok(name.to_owned())
}

/// A username and password typed at the sign-in screen.
///
/// The username is trimmed; the password is kept exactly as typed, spaces
/// included, because stored hashes were derived from the untrimmed text.
///
/// ```
/// use kiosk_store::LoginCredentials;
///
/// let login = LoginCredentials::try_from_parts(" Admin ", "admin123").expect("valid");
/// assert_eq!(login.username(), "Admin");
/// assert!(!format!("{login:?}").contains("admin123"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: Secret,
}

impl LoginCredentials {
    /// Checks the sign-in fields.
    ///
    /// # Errors
    ///
    /// [`RegistrationError::EmptyUsername`] for a blank username and
    /// [`RegistrationError::EmptyPassword`] for an empty password. The
    /// username is checked first.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, RegistrationError> {
        Ok(Self {
            username: account_name(username)?,
            password: Secret::new(password)?,
        })
    }

    /// Trimmed account name.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Password as typed.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.expose()
    }

    /// Validates these credentials against `store`.
    ///
    /// # Errors
    ///
    /// Propagates [`CredentialStore::validate`] persistence failures.
    pub fn sign_in<D: DocumentStore>(
        &self,
        store: &mut CredentialStore<D>,
    ) -> Result<bool, DocumentError> {
        store.validate(self.username(), self.password())
    }
}

/// A sign-up form whose password was typed twice and matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    credentials: LoginCredentials,
}

impl Registration {
    /// Checks the sign-up fields.
    ///
    /// # Errors
    ///
    /// The [`LoginCredentials::try_from_parts`] errors first, then
    /// [`RegistrationError::PasswordMismatch`] when `confirmation` is not
    /// byte-for-byte equal to `password`.
    pub fn try_from_parts(
        username: &str,
        password: &str,
        confirmation: &str,
    ) -> Result<Self, RegistrationError> {
        let credentials = LoginCredentials::try_from_parts(username, password)?;
        if credentials.password() == confirmation {
            Ok(Self { credentials })
        } else {
            Err(RegistrationError::PasswordMismatch)
        }
    }

    /// Trimmed account name.
    #[must_use]
    pub fn username(&self) -> &str {
        self.credentials.username()
    }

    /// Confirmed password.
    #[must_use]
    pub fn password(&self) -> &str {
        self.credentials.password()
    }

    /// Creates the account in `store`; `false` when the name is taken.
    ///
    /// # Errors
    ///
    /// Propagates [`CredentialStore::register`] persistence failures.
    pub fn submit<D: DocumentStore>(
        &self,
        store: &mut CredentialStore<D>,
    ) -> Result<bool, DocumentError> {
        store.register(self.username(), self.password())
    }
}
