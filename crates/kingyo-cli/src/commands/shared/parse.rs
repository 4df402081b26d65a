use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Context;

/// Split `N=VALUE` into a 1-based step number and the raw value.
pub fn numbered<'a>(raw: &'a str, field: &str) -> anyhow::Result<(u32, &'a str)> {
    let (number, value) = raw
        .split_once('=')
        .with_context(|| format!("invalid {field} '{raw}': expected N=VALUE"))?;
    let number: u32 = number
        .trim()
        .parse()
        .with_context(|| format!("invalid {field} '{raw}': step number must be a positive integer"))?;
    if number == 0 {
        anyhow::bail!("invalid {field} '{raw}': steps are numbered from 1");
    }
    Ok((number, value))
}

/// `N=PATH` pairs for file arguments.
pub fn numbered_paths(raw: &[String], field: &str) -> anyhow::Result<Vec<(u32, PathBuf)>> {
    raw.iter()
        .map(|item| numbered(item, field).map(|(n, path)| (n, PathBuf::from(path))))
        .collect()
}

/// `ACTION` or `ACTION::EXPECTED`.
#[must_use]
pub fn step_text(raw: &str) -> (&str, &str) {
    raw.split_once("::")
        .map_or((raw.trim(), ""), |(action, expected)| (action.trim(), expected.trim()))
}

/// `STATUS` or `STATUS:COMMENT` with a wire-format status.
pub fn status_with_comment<T>(raw: &str, field: &str) -> anyhow::Result<(T, String)>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let (status, comment) = raw.split_once(':').unwrap_or((raw, ""));
    let status = status
        .trim()
        .parse::<T>()
        .map_err(|error| anyhow::anyhow!("invalid {field} '{raw}': {error}"))?;
    Ok((status, comment.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use kingyo_core::enums::ResultStepStatus;
    use pretty_assertions::assert_eq;

    use super::{numbered, status_with_comment, step_text};

    #[test]
    fn numbered_splits_on_first_equals() {
        assert_eq!(numbered("2=a=b.png", "attach").unwrap(), (2, "a=b.png"));
    }

    #[test]
    fn numbered_rejects_zero_and_missing_separator() {
        assert!(numbered("0=x.png", "attach").is_err());
        let err = numbered("x.png", "attach").unwrap_err();
        assert!(err.to_string().contains("expected N=VALUE"));
    }

    #[test]
    fn step_text_with_and_without_expectation() {
        assert_eq!(step_text("Open /login :: Form shows"), ("Open /login", "Form shows"));
        assert_eq!(step_text("Submit"), ("Submit", ""));
    }

    #[test]
    fn status_comment_parses_wire_value() {
        let (status, comment): (ResultStepStatus, String) =
            status_with_comment("fail:spinner never stops", "step").unwrap();
        assert_eq!(status, ResultStepStatus::Fail);
        assert_eq!(comment, "spinner never stops");

        assert!(status_with_comment::<ResultStepStatus>("done", "step").is_err());
    }
}
