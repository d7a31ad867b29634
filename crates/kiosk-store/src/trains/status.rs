//! Operational status classification.

use super::record::TrainRecord;

/// Broad class of a free-form train status string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusKind {
    /// Running to schedule.
    OnTime,
    /// Running late.
    Delayed,
    /// Not running.
    Cancelled,
    /// Any other status, such as `Boarding`.
    Other,
}

impl StatusKind {
    /// Classifies `status`, ignoring case and surrounding whitespace.
    ///
    /// # Examples
    ///
    /// ```
    /// use kiosk_store::StatusKind;
    ///
    /// assert_eq!(StatusKind::classify("On Time"), StatusKind::OnTime);
    /// assert_eq!(StatusKind::classify("Boarding"), StatusKind::Other);
    /// ```
    #[must_use]
    pub fn classify(status: &str) -> Self {
        match status.trim().to_lowercase().as_str() {
            "on time" => Self::OnTime,
            "delayed" => Self::Delayed,
            "cancelled" => Self::Cancelled,
            _ => Self::Other,
        }
    }

    /// Short label for terminal output.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::OnTime => "on time",
            Self::Delayed => "delayed",
            Self::Cancelled => "cancelled",
            Self::Other => "other",
        }
    }
}

impl TrainRecord {
    /// Broad class of this record's status.
    #[must_use]
    pub fn status_kind(&self) -> StatusKind {
        StatusKind::classify(&self.status)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("On Time", StatusKind::OnTime)]
    #[case("on time", StatusKind::OnTime)]
    #[case(" DELAYED ", StatusKind::Delayed)]
    #[case("Cancelled", StatusKind::Cancelled)]
    #[case("Canceled", StatusKind::Other)]
    #[case("Boarding", StatusKind::Other)]
    #[case("", StatusKind::Other)]
    fn statuses_classify(#[case] status: &str, #[case] expected: StatusKind) {
        assert_eq!(StatusKind::classify(status), expected);
    }
}
