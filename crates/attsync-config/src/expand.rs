//! Environment variable expansion for configuration strings.
//!
//! Supports:
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default

use std::sync::LazyLock;

use regex::Regex;

use crate::ConfigError;

/// `${VAR}` references without a default value.
static REQUIRED_VAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("valid regex"));

/// Expand environment variable references in a string.
///
/// Bare `$VAR` syntax is left untouched, so URLs and passwords containing
/// a dollar sign survive unchanged.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    // A bare `${VAR}` must resolve; only `${VAR:-default}` may fall back.
    for caps in REQUIRED_VAR.captures_iter(value) {
        let name = &caps[1];
        if std::env::var(name).is_err() {
            return Err(ConfigError::EnvVar {
                field: field.to_owned(),
                message: format!("${{{name}}} not set"),
            });
        }
    }

    shellexpand::env_with_context(value, |var| -> Result<Option<String>, std::env::VarError> {
        Ok(std::env::var(var).ok())
    })
    .map(std::borrow::Cow::into_owned)
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{0}}} could not be read", e.var_name),
    })
}
