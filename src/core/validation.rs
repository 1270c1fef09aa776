//! Input validation for repository names and derived identifiers.

use crate::error::{ConfigError, Result};

/// Validate a destination repository name.
///
/// Repository names must be usable as a hosting-service repository name:
/// - Only A-Z, a-z, 0-9, `.`, `_` and `-`
/// - Cannot be empty
/// - Cannot be `.` or `..`
///
/// # Errors
///
/// Returns `ConfigError::InvalidRepoName` if the name is invalid.
pub fn validate_repo_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(invalid(name, "cannot be empty".to_string()));
    }

    if name == "." || name == ".." {
        return Err(invalid(name, "reserved name".to_string()));
    }

    for (i, ch) in name.chars().enumerate() {
        if !ch.is_ascii_alphanumeric() && !matches!(ch, '.' | '_' | '-') {
            return Err(invalid(
                name,
                format!(
                    "invalid character '{}' at position {}. Only A-Z, a-z, 0-9, '.', '_' and '-' are allowed",
                    ch,
                    i + 1
                ),
            ));
        }
    }

    Ok(())
}

/// Validate a secret name derived from a repository name.
///
/// Secret names may only contain alphanumerics and underscores and cannot
/// start with a digit.
///
/// # Arguments
///
/// * `repo` - The repository the secret belongs to (for error messages)
/// * `secret` - The derived secret name
///
/// # Errors
///
/// Returns `ConfigError::InvalidRepoName` naming the repository.
pub fn validate_secret_name(repo: &str, secret: &str) -> Result<()> {
    if let Some(first) = secret.chars().next() {
        if first.is_ascii_digit() {
            return Err(invalid(
                repo,
                format!("secret name {} cannot start with a digit", secret),
            ));
        }
    }

    if let Some(ch) = secret
        .chars()
        .find(|ch| !ch.is_ascii_alphanumeric() && *ch != '_')
    {
        return Err(invalid(
            repo,
            format!(
                "derived secret name {} contains '{}'; only alphanumerics and '_' are allowed",
                secret, ch
            ),
        ));
    }

    Ok(())
}

/// Validate a `owner/repo` coordinate.
///
/// # Errors
///
/// Returns `ConfigError::InvalidValue` if the value is not exactly two
/// non-empty, slash-separated segments.
pub fn validate_coordinate(field: &'static str, value: &str) -> Result<()> {
    match value.split_once('/') {
        Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') => {
            validate_repo_name(repo)
        }
        _ => Err(ConfigError::InvalidValue {
            field,
            reason: format!("expected owner/repo, got '{}'", value),
        }
        .into()),
    }
}

fn invalid(name: &str, reason: String) -> crate::error::Error {
    ConfigError::InvalidRepoName {
        name: name.to_string(),
        reason,
    }
    .into()
}
