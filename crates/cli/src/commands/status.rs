//! `scopedesk status` — Show resolved configuration.

use super::Globals;
use scopedesk_config::AppConfig;

pub async fn run(globals: &Globals) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config()?;
    let directory = config.directory()?;
    let data_path = globals.data_path(&config);

    println!("🗂️  ScopeDesk Status");
    println!("===================");
    println!("  Config dir:   {}", AppConfig::config_dir().display());
    println!("  Provider:     {}", config.default_provider);
    println!("  Model:        {}", config.model_for(&config.default_provider));
    println!("  Temperature:  {}", config.default_temperature);
    println!("  Max tokens:   {}", config.default_max_tokens);
    println!("  Timeout:      {}s", config.request_timeout_secs);
    println!("  Dataset:      {}", data_path.display());
    println!(
        "  Identities:   {} ({})",
        directory.len(),
        if config.users.is_empty() { "built-in" } else { "from config" }
    );
    println!(
        "  API key:      {}",
        if globals.credential().is_some() { "set" } else { "not set" }
    );

    if AppConfig::config_path().exists() {
        println!("\n  ✅ Config file found");
    } else {
        println!("\n  ⚠️  No config file — run `scopedesk init` first");
    }

    Ok(())
}
