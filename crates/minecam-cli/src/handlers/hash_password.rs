//! Hash-password command handler.

use anyhow::{Context, Result};
use minecam_axum::hash_password;

use crate::utils::input::value_or_prompt;

/// Print the bcrypt hash of a password for the `hashed_password` field of
/// `users.json`.
pub fn execute(password: Option<String>) -> Result<()> {
    let password = value_or_prompt(password, "Password")?;
    let hashed = hash_password(&password).context("Failed to hash password")?;
    println!("{hashed}");
    Ok(())
}
