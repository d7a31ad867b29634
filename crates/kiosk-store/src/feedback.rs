//! Visitor feedback box.
//!
//! Each submission becomes its own text file under `Feedback/`, named after
//! the local time of submission (`yyyyMMdd_HHmmss.txt`). Two submissions in
//! the same second share a name and the later one wins.

use std::fmt;
use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use chrono::NaiveDateTime;
use mockable::Clock;
use tracing::info;

use crate::document::{DocumentStore, FileDocument};
use crate::error::FeedbackError;

/// Directory, relative to the base directory, that holds feedback files.
pub const FEEDBACK_DIR: &str = "Feedback";

/// Five-level satisfaction rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FeedbackRating {
    /// One star.
    Poor = 1,
    /// Two stars.
    Fair = 2,
    /// Three stars.
    Good = 3,
    /// Four stars.
    VeryGood = 4,
    /// Five stars.
    Excellent = 5,
}

impl FeedbackRating {
    /// Label written to the feedback file.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Poor => "Poor",
            Self::Fair => "Fair",
            Self::Good => "Good",
            Self::VeryGood => "Very Good",
            Self::Excellent => "Excellent",
        }
    }
}

impl TryFrom<u8> for FeedbackRating {
    type Error = FeedbackError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Poor),
            2 => Ok(Self::Fair),
            3 => Ok(Self::Good),
            4 => Ok(Self::VeryGood),
            5 => Ok(Self::Excellent),
            _ => Err(FeedbackError::InvalidRating { value }),
        }
    }
}

impl fmt::Display for FeedbackRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A validated feedback submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    rating: Option<FeedbackRating>,
    text: String,
}

impl Feedback {
    /// Validates raw input. The text is trimmed.
    ///
    /// # Errors
    ///
    /// Returns [`FeedbackError::InvalidRating`] for a rating outside 1..=5 and
    /// [`FeedbackError::EmptyFeedback`] for blank text.
    pub fn try_new(stars: Option<u8>, text: &str) -> Result<Self, FeedbackError> {
        let rating = stars.map(FeedbackRating::try_from).transpose()?;
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(FeedbackError::EmptyFeedback);
        }
        Ok(Self {
            rating,
            text: trimmed.to_owned(),
        })
    }

    /// Rating, if one was given.
    #[must_use]
    pub const fn rating(&self) -> Option<FeedbackRating> {
        self.rating
    }

    /// Trimmed feedback text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    fn render(&self, submitted: NaiveDateTime) -> String {
        let rating = self.rating.map_or("", FeedbackRating::label);
        format!(
            "Rating: {rating}\nDate: {}\n\n{}",
            submitted.format("%Y-%m-%d %H:%M:%S"),
            self.text
        )
    }
}

/// Writes feedback files beneath a base directory.
pub struct FeedbackBox {
    base_dir: Utf8PathBuf,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for FeedbackBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FeedbackBox")
            .field("base_dir", &self.base_dir)
            .finish_non_exhaustive()
    }
}

impl FeedbackBox {
    /// Binds the box to `base_dir`, stamping files with `clock`.
    pub fn new(base_dir: impl Into<Utf8PathBuf>, clock: Arc<dyn Clock>) -> Self {
        Self {
            base_dir: base_dir.into(),
            clock,
        }
    }

    /// Base directory the `Feedback/` folder lives under.
    #[must_use]
    pub fn base_dir(&self) -> &Utf8Path {
        &self.base_dir
    }

    /// Writes `feedback` and returns the path of the new file.
    ///
    /// # Errors
    ///
    /// Returns [`FeedbackError::Document`] when the file cannot be written.
    pub fn submit(&self, feedback: &Feedback) -> Result<Utf8PathBuf, FeedbackError> {
        let submitted = self.clock.local().naive_local();
        let relative = format!(
            "{FEEDBACK_DIR}/{}.txt",
            submitted.format("%Y%m%d_%H%M%S")
        );
        let document = FileDocument::new(self.base_dir.clone(), relative);
        document.write(&feedback.render(submitted))?;
        info!(
            path = %document.location(),
            rating = feedback.rating.map(FeedbackRating::label),
            "feedback recorded"
        );
        Ok(document.location().to_owned())
    }
}
