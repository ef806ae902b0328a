//! Prompts for values not given on the command line.

use std::io::{self, Write};

use anyhow::{Context, Result, bail};

/// Print `prompt` and read one trimmed line from stdin.
pub fn prompt_string(prompt: &str) -> Result<String> {
    print!("{prompt}: ");
    io::stdout().flush().context("Failed to flush stdout")?;

    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .context("Failed to read user input")?;
    Ok(input.trim().to_string())
}

/// Prompt with a suggested default returned on empty input.
pub fn prompt_string_with_default(prompt: &str, default: Option<&str>) -> Result<String> {
    let input = match default {
        Some(value) => prompt_string(&format!("{prompt} [{value}]"))?,
        None => prompt_string(prompt)?,
    };
    Ok(match default {
        Some(value) if input.is_empty() => value.to_string(),
        _ => input,
    })
}

/// `value` when given, otherwise a prompt that must not be left empty.
pub fn value_or_prompt(value: Option<String>, prompt: &str) -> Result<String> {
    let value = match value {
        Some(v) => v,
        None => prompt_string(prompt)?,
    };
    if value.is_empty() {
        bail!("{prompt} must not be empty");
    }
    Ok(value)
}
