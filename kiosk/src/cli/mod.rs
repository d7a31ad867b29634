//! Administrative command line for the kiosk services.
//!
//! Argument parsing lives here rather than in the binary so every command
//! can be driven from tests against a temporary base directory.

use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;
use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use chrono::NaiveDateTime;
use clap::{Args, Parser, Subcommand};
use kiosk_store::{
    CredentialStore, DocumentError, Feedback, FeedbackBox, FeedbackError, FileDocument,
    LoginCredentials, PersistPolicy, Registration, RegistrationError, Role, TrainDataError,
    TrainQuery, TrainRecord, TrainRegistry, TrainValidationError, USERS_DOCUMENT, timestamp,
};
use mockable::Clock;
use thiserror::Error;
use tracing::info;

use crate::config::{ConfigError, KioskSettings};

/// `kiosk` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "kiosk",
    about = "Manage kiosk accounts, the train schedule and visitor feedback",
    version
)]
pub struct Cli {
    /// Operation to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level operations.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Manage kiosk accounts.
    #[command(subcommand)]
    Users(UsersCommand),
    /// Inspect and edit the train schedule.
    #[command(subcommand)]
    Trains(TrainsCommand),
    /// Leave a comment in the feedback box.
    Feedback(FeedbackArgs),
}

/// Account operations.
#[derive(Clone, Subcommand)]
pub enum UsersCommand {
    /// List accounts with their roles.
    List,
    /// Create a user account.
    Register {
        /// Name of the new account.
        username: String,
        /// Password for the new account.
        #[arg(long, value_name = "password")]
        password: String,
        /// The password again.
        #[arg(long, value_name = "password")]
        confirm: String,
    },
    /// Check a username and password.
    Login {
        /// Account name.
        username: String,
        /// Account password.
        #[arg(long, value_name = "password")]
        password: String,
    },
    /// Remove an account.
    Delete {
        /// Account name.
        username: String,
    },
    /// Assign a role to an account.
    SetRole {
        /// Account name.
        username: String,
        /// `admin` or `user`, in any casing.
        #[arg(value_parser = Role::from_str)]
        role: Role,
    },
    /// Flip an account between admin and user.
    ToggleRole {
        /// Account name.
        username: String,
    },
}

impl fmt::Debug for UsersCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const REDACTED: &str = "<redacted>";
        match self {
            Self::List => f.write_str("List"),
            Self::Register { username, .. } => f
                .debug_struct("Register")
                .field("username", username)
                .field("password", &REDACTED)
                .field("confirm", &REDACTED)
                .finish(),
            Self::Login { username, .. } => f
                .debug_struct("Login")
                .field("username", username)
                .field("password", &REDACTED)
                .finish(),
            Self::Delete { username } => {
                f.debug_struct("Delete").field("username", username).finish()
            }
            Self::SetRole { username, role } => f
                .debug_struct("SetRole")
                .field("username", username)
                .field("role", role)
                .finish(),
            Self::ToggleRole { username } => f
                .debug_struct("ToggleRole")
                .field("username", username)
                .finish(),
        }
    }
}

/// Schedule operations.
#[derive(Debug, Clone, Subcommand)]
pub enum TrainsCommand {
    /// List every train with its position.
    List,
    /// Show trains matching the given criteria.
    Search(SearchArgs),
    /// Append a train to the schedule.
    Add(AddArgs),
    /// Remove the train at a position shown by `trains list`.
    Remove {
        /// Zero-based position.
        index: usize,
    },
    /// Show the departure and status of one train.
    Status {
        /// Train number, matched ignoring case.
        number: String,
    },
}

/// Criteria for `trains search`.
#[derive(Debug, Clone, Args)]
pub struct SearchArgs {
    /// Part of the train number.
    #[arg(long, value_name = "text")]
    pub number: Option<String>,
    /// Exact destination, or `All`.
    #[arg(long, value_name = "name")]
    pub destination: Option<String>,
    /// Exact train type, or `All`.
    #[arg(long = "type", value_name = "name")]
    pub train_type: Option<String>,
    /// Keep departures within an hour of this local timestamp.
    #[arg(long, value_name = "timestamp", value_parser = timestamp::parse, conflicts_with = "now")]
    pub around: Option<NaiveDateTime>,
    /// Keep departures within an hour of the current local time.
    #[arg(long)]
    pub now: bool,
}

/// Fields for `trains add`.
#[derive(Debug, Clone, Args)]
pub struct AddArgs {
    /// Train number.
    #[arg(long, value_name = "text")]
    pub number: String,
    /// Destination station.
    #[arg(long, value_name = "name")]
    pub destination: String,
    /// Local departure timestamp, such as `2025-01-10T14:05`.
    #[arg(long, value_name = "timestamp", value_parser = timestamp::parse)]
    pub departure: NaiveDateTime,
    /// Train type; defaults to `InterCity`.
    #[arg(long = "type", value_name = "name", default_value = "")]
    pub train_type: String,
    /// Operational status; defaults to `On Time`.
    #[arg(long, value_name = "text", default_value = "")]
    pub status: String,
}

/// Fields for `feedback`.
#[derive(Debug, Clone, Args)]
pub struct FeedbackArgs {
    /// Star rating from 1 (poor) to 5 (excellent).
    #[arg(long, value_name = "stars")]
    pub rating: Option<u8>,
    /// Comment text.
    pub text: String,
}

/// Errors surfaced by [`run`].
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be resolved.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// A store operation declined the request.
    #[error("{reason}")]
    Rejected {
        /// One-line explanation for the operator.
        reason: String,
    },
    /// Username or password input was unusable.
    #[error(transparent)]
    Registration(#[from] RegistrationError),
    /// The user document could not be written.
    #[error(transparent)]
    Document(#[from] DocumentError),
    /// The schedule could not be read, edited or written.
    #[error(transparent)]
    Trains(#[from] TrainDataError),
    /// A new train record was incomplete.
    #[error(transparent)]
    InvalidTrain(#[from] TrainValidationError),
    /// Feedback was invalid or could not be stored.
    #[error(transparent)]
    Feedback(#[from] FeedbackError),
    /// Writing to the output stream failed.
    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),
}

impl CliError {
    fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected {
            reason: reason.into(),
        }
    }
}

/// Where the services keep their documents and how they behave.
#[derive(Clone)]
pub struct KioskContext {
    base_dir: Utf8PathBuf,
    policy: PersistPolicy,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for KioskContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KioskContext")
            .field("base_dir", &self.base_dir)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl KioskContext {
    /// Context rooted at `base_dir`.
    #[must_use]
    pub const fn new(base_dir: Utf8PathBuf, policy: PersistPolicy, clock: Arc<dyn Clock>) -> Self {
        Self {
            base_dir,
            policy,
            clock,
        }
    }

    /// Context described by `settings`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the base directory cannot be resolved.
    pub fn from_settings(
        settings: &KioskSettings,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, ConfigError> {
        Ok(Self::new(settings.base_dir()?, settings.persist_policy(), clock))
    }

    /// Directory holding the kiosk documents.
    #[must_use]
    pub fn base_dir(&self) -> &Utf8Path {
        &self.base_dir
    }

    fn credential_store(&self) -> Result<CredentialStore, CliError> {
        let document = FileDocument::new(self.base_dir.as_path(), USERS_DOCUMENT);
        Ok(CredentialStore::load(document, self.policy)?)
    }
}

/// Runs `cli` against the services described by `context`.
///
/// # Errors
///
/// Returns [`CliError`] when the operation fails or is declined.
pub fn run(cli: &Cli, context: &KioskContext, out: &mut impl Write) -> Result<(), CliError> {
    match &cli.command {
        Command::Users(command) => run_users(command, context, out),
        Command::Trains(command) => run_trains(command, context, out),
        Command::Feedback(args) => run_feedback(args, context, out),
    }
}

fn run_users(
    command: &UsersCommand,
    context: &KioskContext,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let mut store = context.credential_store()?;
    match command {
        UsersCommand::List => {
            for (username, role) in store.list_users() {
                writeln!(out, "{username}\t{role}")?;
            }
        }
        UsersCommand::Register {
            username,
            password,
            confirm,
        } => {
            let registration = Registration::try_from_parts(username, password, confirm)?;
            if !registration.submit(&mut store)? {
                return Err(CliError::rejected(format!(
                    "username '{}' is already taken",
                    registration.username()
                )));
            }
            info!(username = %registration.username(), "account registered");
            writeln!(out, "registered {}", registration.username())?;
        }
        UsersCommand::Login { username, password } => {
            let credentials = LoginCredentials::try_from_parts(username, password)?;
            if !credentials.sign_in(&mut store)? {
                return Err(CliError::rejected("invalid username or password"));
            }
            let role = if store.is_admin(credentials.username()) {
                Role::Admin
            } else {
                Role::User
            };
            writeln!(out, "signed in as {} ({role})", credentials.username())?;
        }
        UsersCommand::Delete { username } => {
            if !store.delete_user(username)? {
                return Err(CliError::rejected(format!(
                    "cannot delete '{username}': unknown or protected account"
                )));
            }
            writeln!(out, "deleted {username}")?;
        }
        UsersCommand::SetRole { username, role } => {
            if !store.update_role(username, *role)? {
                return Err(CliError::rejected(format!(
                    "cannot change the role of '{username}': unknown or protected account"
                )));
            }
            writeln!(out, "{username} is now {role}")?;
        }
        UsersCommand::ToggleRole { username } => {
            let Some(role) = store.toggle_role(username)? else {
                return Err(CliError::rejected(format!(
                    "cannot change the role of '{username}': unknown or protected account"
                )));
            };
            writeln!(out, "{username} is now {role}")?;
        }
    }
    Ok(())
}

fn run_trains(
    command: &TrainsCommand,
    context: &KioskContext,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let mut registry = TrainRegistry::open(context.base_dir())?;
    match command {
        TrainsCommand::List => {
            for (index, record) in registry.records().iter().enumerate() {
                writeln!(out, "{index}\t{}", TrainRow(record))?;
            }
        }
        TrainsCommand::Search(args) => {
            let around = if args.now {
                Some(context.clock.local().naive_local())
            } else {
                args.around
            };
            let query = TrainQuery::from_parts(
                args.number.as_deref(),
                args.destination.as_deref(),
                args.train_type.as_deref(),
                around,
            );
            let matches = registry.filter(&query);
            if matches.is_empty() {
                writeln!(out, "no matching trains")?;
            }
            for record in &matches {
                writeln!(out, "{}", TrainRow(record))?;
            }
        }
        TrainsCommand::Add(args) => {
            let record = TrainRecord::new(
                &args.number,
                &args.destination,
                args.departure,
                &args.train_type,
                &args.status,
            )?;
            let index = registry.add(record)?;
            registry.save()?;
            writeln!(out, "added train {} at position {index}", args.number.trim())?;
        }
        TrainsCommand::Remove { index } => {
            let removed = registry.remove(*index)?;
            registry.save()?;
            writeln!(out, "removed train {}", removed.train_number)?;
        }
        TrainsCommand::Status { number } => {
            let Some(record) = registry.find_by_number(number) else {
                return Err(CliError::rejected(format!("no train numbered '{number}'")));
            };
            writeln!(
                out,
                "Train {} to {}\nDeparture: {}\nStatus: {} ({})",
                record.train_number,
                record.destination,
                record.departure_time.format("%Y-%m-%d %H:%M"),
                record.status,
                record.status_kind().label(),
            )?;
        }
    }
    Ok(())
}

fn run_feedback(
    args: &FeedbackArgs,
    context: &KioskContext,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let feedback = Feedback::try_new(args.rating, &args.text)?;
    let feedback_box = FeedbackBox::new(context.base_dir(), Arc::clone(&context.clock));
    let path = feedback_box.submit(&feedback)?;
    writeln!(out, "feedback saved to {path}")?;
    Ok(())
}

/// One schedule line for terminal output.
struct TrainRow<'a>(&'a TrainRecord);

impl fmt::Display for TrainRow<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let record = self.0;
        write!(
            f,
            "{}\t{}\t{}\t{}\t{}",
            record.train_number,
            record.destination,
            record.departure_time.format("%Y-%m-%d %H:%M"),
            record.train_type,
            record.status,
        )
    }
}
