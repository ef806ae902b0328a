//! Settings command handler.

use anyhow::{Context, Result, bail};
use serde_json::{Map, Value};

use crate::bootstrap::ClientContext;
use crate::commands::SettingsCommand;
use crate::parser::ClientArgs;

/// Parse a settings patch given on the command line.
fn parse_patch(raw: &str) -> Result<Map<String, Value>> {
    match serde_json::from_str(raw).context("Settings patch is not valid JSON")? {
        Value::Object(map) => Ok(map),
        _ => bail!("Settings patch must be a JSON object"),
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Execute the settings command.
pub async fn execute(args: &ClientArgs, command: Option<SettingsCommand>) -> Result<()> {
    let ctx = ClientContext::open(args)?;
    let api = ctx.authorized()?;

    match command.unwrap_or(SettingsCommand::Show) {
        SettingsCommand::Show => print_json(&api.settings().await?),
        SettingsCommand::Set { patch } => {
            let patch = parse_patch(&patch)?;
            let updated = api.update_settings(&patch).await?;
            println!("Settings updated");
            print_json(&updated)
        }
        SettingsCommand::Reset => {
            let defaults = api.reset_settings().await?;
            println!("Settings reset to defaults");
            print_json(&defaults)
        }
        SettingsCommand::Params => print_json(&api.enhance_params().await?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_must_be_an_object() {
        let patch = parse_patch(r#"{"enhancement": {"gamma": 1.4}}"#).unwrap();
        assert_eq!(patch["enhancement"]["gamma"], 1.4);
        assert!(parse_patch("[1, 2]").is_err());
        assert!(parse_patch("gamma=1.4").is_err());
    }
}
