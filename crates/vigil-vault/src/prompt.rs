// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Master password acquisition via TTY prompt or VIGIL_MASTER_PASSWORD environment variable.

use secrecy::SecretString;
use vigil_core::VigilError;

/// The environment variable name for providing the master password.
pub const MASTER_PASSWORD_ENV_VAR: &str = "VIGIL_MASTER_PASSWORD";

fn from_env() -> Option<SecretString> {
    std::env::var(MASTER_PASSWORD_ENV_VAR)
        .ok()
        .filter(|value| !value.is_empty())
        .map(SecretString::from)
}

fn read_password(prompt: &str) -> Result<String, VigilError> {
    eprint!("{prompt}");
    rpassword::read_password()
        .map_err(|e| VigilError::InvalidInput(format!("failed to read master password: {e}")))
}

fn no_source() -> VigilError {
    VigilError::InvalidInput(format!(
        "no master password provided. Set {MASTER_PASSWORD_ENV_VAR} or run interactively."
    ))
}

/// Get the master password from the environment or an interactive prompt.
///
/// Priority:
/// 1. `VIGIL_MASTER_PASSWORD` environment variable (scripts, CI)
/// 2. Interactive TTY prompt via `rpassword`
pub fn get_master_password() -> Result<SecretString, VigilError> {
    if let Some(password) = from_env() {
        return Ok(password);
    }

    if std::io::IsTerminal::is_terminal(&std::io::stdin()) {
        let password = read_password("Master password: ")?;
        if password.is_empty() {
            return Err(VigilError::InvalidInput("empty master password not allowed".to_string()));
        }
        return Ok(SecretString::from(password));
    }

    Err(no_source())
}

/// Get a new master password, prompting twice on a TTY.
///
/// The environment variable needs no confirmation.
pub fn get_master_password_with_confirm() -> Result<SecretString, VigilError> {
    if let Some(password) = from_env() {
        return Ok(password);
    }

    if std::io::IsTerminal::is_terminal(&std::io::stdin()) {
        let first = read_password("New master password: ")?;
        let second = read_password("Confirm master password: ")?;
        if first != second {
            return Err(VigilError::InvalidInput("passwords do not match".to_string()));
        }
        if first.is_empty() {
            return Err(VigilError::InvalidInput("empty master password not allowed".to_string()));
        }
        return Ok(SecretString::from(first));
    }

    Err(no_source())
}

/// Prompt for a credential password on the TTY without echo.
pub fn prompt_secret(prompt: &str) -> Result<SecretString, VigilError> {
    if !std::io::IsTerminal::is_terminal(&std::io::stdin()) {
        return Err(VigilError::InvalidInput(
            "not a terminal; pass the password on stdin instead".to_string(),
        ));
    }
    read_password(prompt).map(SecretString::from)
}

/// Read one line from `reader` as a secret, dropping the line terminator.
pub fn read_secret_line(mut reader: impl std::io::BufRead) -> Result<SecretString, VigilError> {
    let mut line = String::new();
    reader
        .read_line(&mut line)
        .map_err(|e| VigilError::InvalidInput(format!("failed to read password: {e}")))?;
    let trimmed = line.trim_end_matches(['\r', '\n']).to_string();
    zeroize::Zeroize::zeroize(&mut line);
    Ok(SecretString::from(trimmed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use serial_test::serial;

    #[test]
    #[serial]
    fn reads_password_from_env_var() {
        // SAFETY: test-only env mutation, serialized with #[serial].
        unsafe { std::env::set_var(MASTER_PASSWORD_ENV_VAR, "env-password") };
        let result = get_master_password();
        let confirmed = get_master_password_with_confirm();
        unsafe { std::env::remove_var(MASTER_PASSWORD_ENV_VAR) };

        assert_eq!(result.unwrap().expose_secret(), "env-password");
        assert_eq!(confirmed.unwrap().expose_secret(), "env-password");
    }

    #[test]
    #[serial]
    fn empty_env_var_is_ignored() {
        unsafe { std::env::set_var(MASTER_PASSWORD_ENV_VAR, "") };
        // stdin is not a terminal under the test harness.
        let result = get_master_password();
        unsafe { std::env::remove_var(MASTER_PASSWORD_ENV_VAR) };

        assert!(matches!(result, Err(VigilError::InvalidInput(_))));
    }

    #[test]
    fn read_secret_line_strips_only_the_terminator() {
        let secret = read_secret_line(&b"  spaced pass \r\nnext line\n"[..]).unwrap();
        assert_eq!(secret.expose_secret(), "  spaced pass ");
    }

    #[test]
    fn read_secret_line_accepts_missing_newline() {
        let secret = read_secret_line(&b"no-newline"[..]).unwrap();
        assert_eq!(secret.expose_secret(), "no-newline");
    }
}
