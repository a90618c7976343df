use blueprint_core::Settings;

use crate::cli::SettingsAction;

pub fn handle(action: &SettingsAction) -> anyhow::Result<()> {
    let current = blueprint_core::read_settings()?;
    match action {
        SettingsAction::Show => {
            let shown = masked(&current.with_env_key());
            println!("{}", serde_json::to_string_pretty(&shown)?);
        }
        SettingsAction::Set {
            api_key,
            model,
            deploy_delay_ms,
        } => {
            let updated = apply(current, api_key.as_deref(), model.as_deref(), *deploy_delay_ms);
            blueprint_core::write_settings(&updated)?;
            println!("saved {}", blueprint_core::settings_path().display());
        }
    }
    Ok(())
}

/// Only report whether a key is set, never the key itself.
fn masked(settings: &Settings) -> serde_json::Value {
    serde_json::json!({
        "model": settings.model,
        "endpoint": settings.endpoint,
        "deployDelayMs": settings.deploy_delay_ms,
        "hasKey": !settings.api_key.trim().is_empty(),
        "configured": settings.configured(),
    })
}

fn apply(
    mut settings: Settings,
    api_key: Option<&str>,
    model: Option<&str>,
    deploy_delay_ms: Option<u64>,
) -> Settings {
    // Empty means "keep existing"
    if let Some(key) = api_key.filter(|k| !k.trim().is_empty()) {
        settings.api_key = key.trim().to_string();
    }
    if let Some(model) = model.filter(|m| !m.trim().is_empty()) {
        settings.model = model.trim().to_string();
    }
    if let Some(ms) = deploy_delay_ms {
        settings.deploy_delay_ms = ms;
    }
    settings
}
