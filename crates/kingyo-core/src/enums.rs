//! Status, outcome and configuration enums for Kingyo.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`
//! and match the server's choice values exactly. Every enum exposes `ALL` (the
//! option catalogue, in server order), `as_str()` and a `FromStr` impl so CLI
//! flags and filter values parse the same way the wire does.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::display::snake_to_title;
use crate::errors::CoreError;

fn parse_variant<T: Copy>(
    all: &[T],
    as_str: fn(T) -> &'static str,
    kind: &'static str,
    value: &str,
) -> Result<T, CoreError> {
    all.iter()
        .copied()
        .find(|variant| as_str(*variant) == value)
        .ok_or_else(|| CoreError::UnknownVariant {
            kind,
            value: value.to_string(),
        })
}

// ---------------------------------------------------------------------------
// TestPlanStatus
// ---------------------------------------------------------------------------

/// Overall status of a test plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TestPlanStatus {
    NotStarted,
    InProgress,
    Completed,
}

impl TestPlanStatus {
    pub const ALL: [Self; 3] = [Self::NotStarted, Self::InProgress, Self::Completed];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }

    /// Human-readable label, e.g. `"Not Started"`.
    #[must_use]
    pub fn label(self) -> String {
        snake_to_title(self.as_str())
    }
}

impl fmt::Display for TestPlanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TestPlanStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_variant(&Self::ALL, Self::as_str, "test plan status", s)
    }
}

// ---------------------------------------------------------------------------
// TestCaseStatus
// ---------------------------------------------------------------------------

/// Authoring status of a test case definition.
///
/// ```text
/// design → ready → closed
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum TestCaseStatus {
    #[default]
    Design,
    Ready,
    Closed,
}

impl TestCaseStatus {
    pub const ALL: [Self; 3] = [Self::Design, Self::Ready, Self::Closed];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Design => "design",
            Self::Ready => "ready",
            Self::Closed => "closed",
        }
    }

    #[must_use]
    pub fn label(self) -> String {
        snake_to_title(self.as_str())
    }
}

impl fmt::Display for TestCaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TestCaseStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_variant(&Self::ALL, Self::as_str, "test case status", s)
    }
}

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// Outcome of one execution (`TestResult.result`), also used for the derived
/// `TestCase.latest_result`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Pass,
    Fail,
    #[default]
    InProgress,
}

impl Outcome {
    pub const ALL: [Self; 3] = [Self::Pass, Self::Fail, Self::InProgress];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Fail => "fail",
            Self::InProgress => "in_progress",
        }
    }

    #[must_use]
    pub fn label(self) -> String {
        snake_to_title(self.as_str())
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Outcome {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_variant(&Self::ALL, Self::as_str, "result", s)
    }
}

// ---------------------------------------------------------------------------
// ResultStepStatus
// ---------------------------------------------------------------------------

/// Per-step outcome recorded while executing a test case.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum ResultStepStatus {
    Pass,
    Fail,
    Skip,
    #[default]
    InProgress,
}

impl ResultStepStatus {
    pub const ALL: [Self; 4] = [Self::Pass, Self::Fail, Self::Skip, Self::InProgress];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Fail => "fail",
            Self::Skip => "skip",
            Self::InProgress => "in_progress",
        }
    }

    #[must_use]
    pub fn label(self) -> String {
        snake_to_title(self.as_str())
    }
}

impl fmt::Display for ResultStepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResultStepStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_variant(&Self::ALL, Self::as_str, "result step status", s)
    }
}

// ---------------------------------------------------------------------------
// Browser / Os
// ---------------------------------------------------------------------------

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Browser {
    #[default]
    Chrome,
    Firefox,
    Safari,
    Edge,
    Opera,
}

impl Browser {
    pub const ALL: [Self; 5] = [
        Self::Chrome,
        Self::Firefox,
        Self::Safari,
        Self::Edge,
        Self::Opera,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Chrome => "chrome",
            Self::Firefox => "firefox",
            Self::Safari => "safari",
            Self::Edge => "edge",
            Self::Opera => "opera",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Chrome => "Chrome",
            Self::Firefox => "Firefox",
            Self::Safari => "Safari",
            Self::Edge => "Edge",
            Self::Opera => "Opera",
        }
    }
}

impl fmt::Display for Browser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Browser {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_variant(&Self::ALL, Self::as_str, "browser", s)
    }
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Os {
    Windows10,
    #[default]
    Windows11,
    Macos,
    Linux,
    Android,
    Ios,
}

impl Os {
    pub const ALL: [Self; 6] = [
        Self::Windows10,
        Self::Windows11,
        Self::Macos,
        Self::Linux,
        Self::Android,
        Self::Ios,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Windows10 => "windows10",
            Self::Windows11 => "windows11",
            Self::Macos => "macos",
            Self::Linux => "linux",
            Self::Android => "android",
            Self::Ios => "ios",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Windows10 => "Windows 10",
            Self::Windows11 => "Windows 11",
            Self::Macos => "macOS",
            Self::Linux => "Linux",
            Self::Android => "Android",
            Self::Ios => "iOS",
        }
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Os {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_variant(&Self::ALL, Self::as_str, "os", s)
    }
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// A browser + OS pairing under which a test result was captured.
///
/// Its wire form is the server-derived string `"{browser} on {os}"`, which is
/// also the value accepted by the test-result `configuration` filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Configuration {
    pub browser: Browser,
    pub os: Os,
}

impl Configuration {
    #[must_use]
    pub const fn new(browser: Browser, os: Os) -> Self {
        Self { browser, os }
    }

    /// Every browser x OS pairing, browser-major.
    #[must_use]
    pub fn all() -> Vec<Self> {
        Browser::ALL
            .iter()
            .flat_map(|browser| Os::ALL.iter().map(move |os| Self::new(*browser, *os)))
            .collect()
    }

    /// Human-readable label, e.g. `"Chrome on Windows 10"`.
    #[must_use]
    pub fn label(self) -> String {
        format!("{} on {}", self.browser.label(), self.os.label())
    }
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} on {}", self.browser, self.os)
    }
}

impl FromStr for Configuration {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (browser, os) = s.split_once(" on ").ok_or_else(|| CoreError::UnknownVariant {
            kind: "configuration",
            value: s.to_string(),
        })?;
        Ok(Self::new(browser.parse()?, os.parse()?))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
