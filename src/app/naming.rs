//! Stack naming and validation.
//!
//! Stack names must match `^[a-zA-Z][-a-zA-Z0-9]*$` and are checked before
//! any remote call. A `stack://<name>` locator is a logical alias for a
//! stack name and is stripped to the bare name before validation.

use once_cell::sync::Lazy;
use regex::Regex;
use uuid::Uuid;

use crate::app::error::{Error, Result};

static STACK_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\A[a-zA-Z][-a-zA-Z0-9]*\z").expect("stack name regex"));

static INVALID_NAME_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^-a-zA-Z0-9]+").expect("invalid chars regex"));

static REPEATED_HYPHENS: Lazy<Regex> = Lazy::new(|| Regex::new(r"-+").expect("hyphen regex"));

/// Reject names that fail the CloudFormation stack-name pattern.
pub fn validate_stack_name(stack_name: &str) -> Result<()> {
    if STACK_NAME.is_match(stack_name) {
        Ok(())
    } else {
        Err(Error::InvalidStackName(stack_name.to_string()))
    }
}

/// Strip a `stack://` locator prefix, leaving plain names untouched. An
/// empty captured name is returned as-is and fails validation downstream.
pub fn normalize_stack_name(stack_name: &str) -> &str {
    stack_name.strip_prefix("stack://").unwrap_or(stack_name)
}

/// Generate a name for an ephemeral stack: `kumogata-<user>-<host>-<uuid>`,
/// with the user/host segment dropped when neither is obtainable. Runs of
/// characters outside `[-a-zA-Z0-9]` collapse to a single hyphen, so the
/// result always satisfies [`validate_stack_name`].
pub fn random_stack_name() -> String {
    let mut parts = vec!["kumogata".to_string()];
    if let Some(user_host) = user_host() {
        parts.push(user_host);
    }
    parts.push(Uuid::new_v4().to_string());

    let name = parts.join("-");
    let name = INVALID_NAME_CHARS.replace_all(&name, "-");
    REPEATED_HYPHENS.replace_all(&name, "-").into_owned()
}

fn user_host() -> Option<String> {
    let user = whoami::fallible::username().unwrap_or_default();
    let host = whoami::fallible::hostname().unwrap_or_default();

    let joined = [user, host]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-");

    if joined.is_empty() {
        None
    } else {
        Some(joined)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_valid_names() {
        for name in ["a", "Stack", "my-stack-01", "A-B-C"] {
            assert!(validate_stack_name(name).is_ok(), "expected {name} valid");
        }
    }

    #[test]
    fn rejects_invalid_names() {
        for name in ["", "1stack", "-stack", "my_stack", "my stack", "sta.ck"] {
            assert!(
                validate_stack_name(name).is_err(),
                "expected {name:?} invalid"
            );
        }
    }

    #[test]
    fn normalize_strips_locator_prefix() {
        assert_eq!(normalize_stack_name("stack://my-stack"), "my-stack");
        assert_eq!(normalize_stack_name("my-stack"), "my-stack");
        // An empty captured name must still flow into validation and fail.
        assert_eq!(normalize_stack_name("stack://"), "");
        assert!(validate_stack_name(normalize_stack_name("stack://")).is_err());
    }

    #[test]
    fn random_names_always_validate() {
        for _ in 0..16 {
            let name = random_stack_name();
            assert!(name.starts_with("kumogata-"));
            assert!(
                validate_stack_name(&name).is_ok(),
                "generated name {name:?} failed validation"
            );
            assert!(!name.contains("--"));
        }
    }
}
