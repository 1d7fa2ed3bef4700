//! Lead capture model.
//!
//! A lead is one registration form submission. Leads are append-only: they
//! are created once, never updated, and only removed by a tenant admin.

use std::fmt;

use chrono::{DateTime, Utc};

use super::contact::{ContactValidationError, EmailAddress, PhoneNumber};
use super::validation::{FieldIssue, FieldIssues};
use super::TenantId;

/// Shortest accepted registrant name once trimmed.
pub const NAME_MIN: usize = 2;
/// Longest accepted registrant name once trimmed.
pub const NAME_MAX: usize = 100;

/// Database identifier of a lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LeadId(i32);

impl LeadId {
    /// Wrap a raw identifier.
    #[must_use]
    pub const fn new(raw: i32) -> Self {
        Self(raw)
    }

    /// Raw identifier.
    #[must_use]
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for LeadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Trimmed registrant name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadName(String);

impl LeadName {
    /// Validate a registrant name.
    ///
    /// # Errors
    /// Returns a `name` field issue when the trimmed name is outside
    /// [`NAME_MIN`]..=[`NAME_MAX`] characters.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, FieldIssue> {
        let trimmed = raw.as_ref().trim();
        let length = trimmed.chars().count();
        if length < NAME_MIN {
            return Err(FieldIssue::new(
                "name",
                "too_short",
                format!("Name must be at least {NAME_MIN} characters"),
            ));
        }
        if length > NAME_MAX {
            return Err(FieldIssue::new(
                "name",
                "too_long",
                format!("Name must be at most {NAME_MAX} characters"),
            ));
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for LeadName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Validated registration awaiting storage.
///
/// # Examples
/// ```
/// use scratch_backend::domain::NewLead;
///
/// let lead = NewLead::try_from_parts("Jo Lee", "6198712110", "jo@example.com", true).unwrap();
/// assert_eq!(lead.email.as_ref(), "jo@example.com");
///
/// let issues = NewLead::try_from_parts("J", "123", "nope", false).unwrap_err();
/// assert_eq!(issues.as_slice().len(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLead {
    /// Registrant name.
    pub name: LeadName,
    /// Registrant phone number.
    pub phone: PhoneNumber,
    /// Registrant email, lowercased.
    pub email: EmailAddress,
    /// Whether the registrant finished the gate video.
    pub video_watched: bool,
}

impl NewLead {
    /// Validate raw form fields, reporting every invalid one.
    ///
    /// # Errors
    /// Returns the collected field issues.
    pub fn try_from_parts(
        name: &str,
        phone: &str,
        email: &str,
        video_watched: bool,
    ) -> Result<Self, FieldIssues> {
        let mut issues = FieldIssues::new();
        let name = issues.collect(LeadName::new(name));
        let phone = issues.collect(
            PhoneNumber::new(phone).map_err(|err: ContactValidationError| err.into_issue("phone")),
        );
        let email = issues.collect(EmailAddress::new(email).map_err(|err| err.into_issue("email")));
        issues.finish(|| {
            Some(Self {
                name: name?,
                phone: phone?,
                email: email?,
                video_watched,
            })
        })
    }
}

/// Stored lead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lead {
    /// Database identifier.
    pub id: LeadId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Registrant name.
    pub name: LeadName,
    /// Registrant phone number.
    pub phone: PhoneNumber,
    /// Registrant email.
    pub email: EmailAddress,
    /// Whether the registrant finished the gate video.
    pub video_watched: bool,
    /// Submission instant.
    pub created_at: DateTime<Utc>,
}

/// Dashboard aggregates over a tenant's leads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LeadSummary {
    /// All leads.
    pub total: u64,
    /// Leads that watched the gate video.
    pub video_watched: u64,
    /// Leads submitted since 00:00 UTC today.
    pub today: u64,
    /// Leads submitted in the last seven days.
    pub this_week: u64,
    /// Share of leads that watched the video, in percent, one decimal.
    pub conversion_rate: f64,
}

impl LeadSummary {
    /// Aggregate `leads` relative to `now`.
    #[must_use]
    pub fn from_leads(leads: &[Lead], now: DateTime<Utc>) -> Self {
        let start_of_day = now
            .date_naive()
            .and_hms_opt(0, 0, 0)
            .map_or(now, |midnight| midnight.and_utc());
        let week_ago = now - chrono::Duration::days(7);

        let total = leads.len() as u64;
        let video_watched = count_where(leads, |lead| lead.video_watched);
        Self {
            total,
            video_watched,
            today: count_where(leads, |lead| lead.created_at >= start_of_day),
            this_week: count_where(leads, |lead| lead.created_at >= week_ago),
            conversion_rate: conversion_rate(video_watched, total),
        }
    }
}

fn count_where(leads: &[Lead], predicate: impl Fn(&Lead) -> bool) -> u64 {
    leads.iter().filter(|lead| predicate(lead)).count() as u64
}

#[expect(
    clippy::cast_precision_loss,
    reason = "lead counts stay far below 2^52"
)]
fn conversion_rate(converted: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let percent = converted as f64 * 100.0 / total as f64;
    (percent * 10.0).round() / 10.0
}
