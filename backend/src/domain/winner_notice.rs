//! Winner notification payload.

use super::contact::EmailAddress;
use super::validation::{FieldIssue, FieldIssues};

/// Validated content of a winner email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WinnerNotice {
    /// Recipient address.
    pub user_email: EmailAddress,
    /// Recipient display name.
    pub user_name: String,
    /// Prize label.
    pub prize_name: String,
    /// Prize value as displayed, e.g. `$591`.
    pub prize_value: String,
    /// Contact number printed in the email.
    pub phone_number: String,
}

fn required(issues: &mut FieldIssues, field: &'static str, raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        issues.push(FieldIssue::new(field, "required", format!("{field} is required")));
        None
    } else {
        Some(trimmed.to_owned())
    }
}

impl WinnerNotice {
    /// Validate raw notice fields; every field must be non-empty.
    ///
    /// # Errors
    /// Returns the collected field issues.
    pub fn try_from_parts(
        user_email: &str,
        user_name: &str,
        prize_name: &str,
        prize_value: &str,
        phone_number: &str,
    ) -> Result<Self, FieldIssues> {
        let mut issues = FieldIssues::new();
        let user_email =
            issues.collect(EmailAddress::new(user_email).map_err(|err| err.into_issue("userEmail")));
        let user_name = required(&mut issues, "userName", user_name);
        let prize_name = required(&mut issues, "prizeName", prize_name);
        let prize_value = required(&mut issues, "prizeValue", prize_value);
        let phone_number = required(&mut issues, "phoneNumber", phone_number);
        issues.finish(|| {
            Some(Self {
                user_email: user_email?,
                user_name: user_name?,
                prize_name: prize_name?,
                prize_value: prize_value?,
                phone_number: phone_number?,
            })
        })
    }

    /// Canned notice an admin sends to check delivery.
    #[must_use]
    pub fn test_for(recipient: EmailAddress) -> Self {
        Self {
            user_email: recipient,
            user_name: "Test Winner".to_owned(),
            prize_name: "Replace Water Lines & Gas Valves On All Home Appliances".to_owned(),
            prize_value: "$591".to_owned(),
            phone_number: "(310) 295-6355".to_owned(),
        }
    }
}
