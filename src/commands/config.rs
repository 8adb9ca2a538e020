//! `finlens config` subcommands.

use crate::cli::ConfigAction;
use crate::config;

pub fn handle(action: ConfigAction) -> anyhow::Result<()> {
    match action {
        ConfigAction::Show => {
            let file = config::load_config_file()?;
            let resolved = config::resolve(file, &config::Overrides::default());

            if let Some(path) = config::config_file_path() {
                println!("config file:     {}", path.display());
            }
            println!("model:           {}", resolved.model);
            println!("fallback model:  {}", resolved.fallback_model);
            println!("temperature:     {}", resolved.temperature);
            println!(
                "inline limit:    {} MB",
                resolved.inline_limit_bytes / (1024 * 1024)
            );
            println!("web search:      {}", resolved.enable_search);
            println!(
                "api key:         {}",
                if resolved.api_key.is_some() {
                    "set (env or config file)"
                } else {
                    "not set here (keychain may hold one)"
                }
            );
        }
    }
    Ok(())
}
