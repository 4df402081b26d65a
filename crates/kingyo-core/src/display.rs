//! Label helpers and option catalogues for status filters and selectors.

use serde::Serialize;

use crate::enums::{Browser, Configuration, Os, Outcome, TestCaseStatus, TestPlanStatus};

/// Convert a `snake_case` value to a title: `"in_progress"` → `"In Progress"`.
#[must_use]
pub fn snake_to_title(value: &str) -> String {
    value
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Format a wire configuration string (`"chrome on windows10"`) for display.
///
/// Unknown browser or OS tokens pass through unchanged.
#[must_use]
pub fn format_configuration(value: &str) -> String {
    let mut words = value.split(' ');
    let browser = words.next().unwrap_or_default();
    let os = words.nth(1).unwrap_or_default();

    let browser = browser
        .parse::<Browser>()
        .map_or_else(|_| browser.to_string(), |b| b.label().to_string());
    let os = os
        .parse::<Os>()
        .map_or_else(|_| os.to_string(), |o| o.label().to_string());

    format!("{browser} on {os}")
}

/// File name of a stored attachment URL, ignoring any query string
/// (signed storage URLs carry one). Returns `"unknown"` when there is none.
#[must_use]
pub fn attachment_file_name(file_url: &str) -> String {
    file_url
        .split('?')
        .next()
        .and_then(|path| path.rsplit('/').next())
        .filter(|name| !name.is_empty())
        .unwrap_or("unknown")
        .to_string()
}

/// One entry of a selector: wire value plus display label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

#[must_use]
pub fn test_plan_status_options() -> Vec<SelectOption> {
    TestPlanStatus::ALL
        .iter()
        .map(|s| SelectOption::new(s.as_str(), s.label()))
        .collect()
}

#[must_use]
pub fn test_case_status_options() -> Vec<SelectOption> {
    TestCaseStatus::ALL
        .iter()
        .map(|s| SelectOption::new(s.as_str(), s.label()))
        .collect()
}

#[must_use]
pub fn outcome_options() -> Vec<SelectOption> {
    Outcome::ALL
        .iter()
        .map(|s| SelectOption::new(s.as_str(), s.label()))
        .collect()
}

/// The full browser x OS matrix as selector options.
#[must_use]
pub fn configuration_options() -> Vec<SelectOption> {
    Configuration::all()
        .into_iter()
        .map(|c| SelectOption::new(c.to_string(), c.label()))
        .collect()
}
