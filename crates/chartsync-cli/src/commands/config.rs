use color_eyre::Result;
use serde_json::Value;

use crate::commands::load_context;
use crate::output::{Output, OutputFormat};

/// Print the effective configuration. Client secrets are masked unless
/// `--full` is given; tokens live in the credential store and are never
/// shown here.
pub fn show_config(full: bool, output: &Output) -> Result<()> {
    let ctx = load_context()?;

    let mut value = serde_json::to_value(&ctx.config)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to serialize config: {}", e))?;
    if !full {
        mask_secrets(&mut value);
    }

    match output.format() {
        OutputFormat::Human => {
            let rendered = toml::to_string_pretty(&value)
                .map_err(|e| color_eyre::eyre::eyre!("Failed to render config: {}", e))?;
            output.println(rendered);
        }
        OutputFormat::Json | OutputFormat::JsonPretty => {
            output.json(&value);
        }
    }

    Ok(())
}

fn mask_secrets(value: &mut Value) {
    if let Some(accounts) = value.get_mut("accounts").and_then(Value::as_object_mut) {
        for account in accounts.values_mut() {
            if let Some(secret) = account.get_mut("client_secret") {
                *secret = Value::String("********".to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_secrets_replaces_all_accounts() {
        let mut value = serde_json::json!({
            "accounts": {
                "netflix": {"client_id": "id-1", "client_secret": "s3cret-1"},
                "prime": {"client_id": "id-2", "client_secret": "s3cret-2"},
                "others": {"client_id": "id-3", "client_secret": "s3cret-3"},
            },
            "request": {"timeout_secs": 30},
        });

        mask_secrets(&mut value);

        for account in value["accounts"].as_object().unwrap().values() {
            assert_eq!(account["client_secret"], "********");
        }
        assert_eq!(value["accounts"]["netflix"]["client_id"], "id-1");
        assert_eq!(value["request"]["timeout_secs"], 30);
    }
}
