//! Validated scalar values carried by work items.

use super::WorkItemDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Workflow status of a work item.
///
/// Any status may follow any other; the workflow has no transition graph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    /// Work has not started.
    #[default]
    #[serde(rename = "To Do")]
    ToDo,
    /// Work is under way.
    #[serde(rename = "In Progress")]
    InProgress,
    /// Work cannot continue until something external changes.
    Blocked,
    /// Work is complete.
    Done,
}

impl Status {
    /// Every legal status, in workflow order.
    pub const ALL: [Self; 4] = [Self::ToDo, Self::InProgress, Self::Blocked, Self::Done];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ToDo => "To Do",
            Self::InProgress => "In Progress",
            Self::Blocked => "Blocked",
            Self::Done => "Done",
        }
    }
}

impl TryFrom<&str> for Status {
    type Error = WorkItemDomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase().replace(['_', '-'], " ");
        match normalized.as_str() {
            "to do" | "todo" => Ok(Self::ToDo),
            "in progress" => Ok(Self::InProgress),
            "blocked" => Ok(Self::Blocked),
            "done" => Ok(Self::Done),
            _ => Err(WorkItemDomainError::UnknownStatus(value.to_owned())),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Urgency of a work item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Priority {
    /// Can wait.
    Low,
    /// Normal urgency.
    #[default]
    Medium,
    /// Should be picked up soon.
    High,
    /// Needs immediate attention.
    Critical,
}

impl Priority {
    /// Every priority, lowest first.
    pub const ALL: [Self; 4] = [Self::Low, Self::Medium, Self::High, Self::Critical];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Critical => "Critical",
        }
    }
}

impl TryFrom<&str> for Priority {
    type Error = WorkItemDomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "critical" => Ok(Self::Critical),
            _ => Err(WorkItemDomainError::UnknownPriority(value.to_owned())),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of work an item represents.
///
/// The well-known kinds are matched case-insensitively; any other non-blank
/// name is kept verbatim as [`ItemType::Custom`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ItemType {
    /// General task.
    #[default]
    Task,
    /// Defect report.
    Bug,
    /// New capability.
    Feature,
    /// Enhancement of existing behaviour.
    Improvement,
    /// Organisation-specific kind.
    Custom(String),
}

impl ItemType {
    /// Longest custom item type name accepted, in characters.
    pub const MAX_CHARS: usize = 64;

    /// Parses an item type name.
    ///
    /// # Errors
    ///
    /// Returns [`WorkItemDomainError::EmptyItemType`] when the name is blank
    /// and [`WorkItemDomainError::ItemTypeTooLong`] when it exceeds
    /// [`Self::MAX_CHARS`].
    pub fn parse(value: &str) -> Result<Self, WorkItemDomainError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(WorkItemDomainError::EmptyItemType);
        }
        if trimmed.chars().count() > Self::MAX_CHARS {
            return Err(WorkItemDomainError::ItemTypeTooLong(Self::MAX_CHARS));
        }
        let parsed = match trimmed.to_ascii_lowercase().as_str() {
            "task" => Self::Task,
            "bug" => Self::Bug,
            "feature" => Self::Feature,
            "improvement" => Self::Improvement,
            _ => Self::Custom(trimmed.to_owned()),
        };
        Ok(parsed)
    }

    /// Returns the canonical storage representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Task => "Task",
            Self::Bug => "Bug",
            Self::Feature => "Feature",
            Self::Improvement => "Improvement",
            Self::Custom(name) => name,
        }
    }
}

impl TryFrom<String> for ItemType {
    type Error = WorkItemDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ItemType> for String {
    fn from(value: ItemType) -> Self {
        match value {
            ItemType::Custom(name) => name,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Non-negative hour amount with two decimal places.
///
/// Stored as hundredths of an hour so sums stay exact.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Hours(u64);

impl Hours {
    /// Zero hours.
    pub const ZERO: Self = Self(0);

    const SCALE: u64 = 100;

    /// Creates an amount from hundredths of an hour.
    #[must_use]
    pub const fn from_hundredths(hundredths: u64) -> Self {
        Self(hundredths)
    }

    /// Parses a decimal amount such as `"3"`, `"1.5"`, or `"0.25"`.
    ///
    /// # Errors
    ///
    /// Returns [`WorkItemDomainError::InvalidHours`] for negative, malformed,
    /// or overly precise input.
    pub fn parse(value: &str) -> Result<Self, WorkItemDomainError> {
        let invalid = || WorkItemDomainError::InvalidHours(value.to_owned());
        let trimmed = value.trim();
        let (whole, fraction) = trimmed.split_once('.').unwrap_or((trimmed, ""));
        let is_digits = |part: &str| part.chars().all(|ch| ch.is_ascii_digit());
        if (whole.is_empty() && fraction.is_empty())
            || !is_digits(whole)
            || !is_digits(fraction)
            || fraction.len() > 2
        {
            return Err(invalid());
        }

        let whole_value = if whole.is_empty() {
            0
        } else {
            whole.parse::<u64>().map_err(|_| invalid())?
        };
        let fraction_value = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<u64>().map_err(|_| invalid())? * 10,
            _ => fraction.parse::<u64>().map_err(|_| invalid())?,
        };

        whole_value
            .checked_mul(Self::SCALE)
            .and_then(|scaled| scaled.checked_add(fraction_value))
            .map(Self)
            .ok_or_else(invalid)
    }

    /// Returns the amount in hundredths of an hour.
    #[must_use]
    pub const fn hundredths(self) -> u64 {
        self.0
    }

    /// Returns `true` when the amount is zero.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Adds two amounts.
    ///
    /// # Errors
    ///
    /// Returns [`WorkItemDomainError::HoursOverflow`] on overflow.
    pub const fn checked_add(self, other: Self) -> Result<Self, WorkItemDomainError> {
        match self.0.checked_add(other.0) {
            Some(total) => Ok(Self(total)),
            None => Err(WorkItemDomainError::HoursOverflow),
        }
    }

    /// Adds two amounts, clamping at the maximum.
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }
}

impl TryFrom<String> for Hours {
    type Error = WorkItemDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Hours> for String {
    fn from(value: Hours) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Hours {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{:02}",
            self.0.div_euclid(Self::SCALE),
            self.0.rem_euclid(Self::SCALE)
        )
    }
}
