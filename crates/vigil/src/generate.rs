// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `vigil generate` command implementation.

use secrecy::ExposeSecret;
use vigil_core::VigilError;
use vigil_vault::{PasswordPolicy, generate_password};

use crate::GenerateArgs;

impl From<&GenerateArgs> for PasswordPolicy {
    fn from(args: &GenerateArgs) -> Self {
        Self {
            length: args.length,
            lowercase: !args.no_lowercase,
            uppercase: !args.no_uppercase,
            digits: !args.no_digits,
            symbols: !args.no_symbols,
        }
    }
}

/// Print one generated password to stdout.
pub fn run_generate(args: &GenerateArgs) -> Result<(), VigilError> {
    let password = generate_password(&PasswordPolicy::from(args))?;
    println!("{}", password.expose_secret());
    Ok(())
}
