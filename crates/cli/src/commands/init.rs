//! `scopedesk init` — Write a starter config.

use scopedesk_config::AppConfig;

pub async fn run(force: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config_dir = AppConfig::config_dir();
    let config_path = AppConfig::config_path();

    println!("🗂️  ScopeDesk — Setup");
    println!("=====================\n");

    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir)?;
        println!("✅ Created config directory: {}", config_dir.display());
    } else {
        println!("  Config directory exists: {}", config_dir.display());
    }

    if config_path.exists() && !force {
        println!("\n⚠️  Config already exists at: {}", config_path.display());
        println!("   Edit it manually or re-run with --force.\n");
        return Ok(());
    }

    std::fs::write(&config_path, AppConfig::default_toml())?;
    println!("✅ Wrote config.toml at: {}", config_path.display());

    println!("\n📝 Next steps:");
    println!("   1. Point data.path at your student CSV (needs grade and region columns)");
    println!("   2. Optionally add [[users]] entries to replace the built-in identities");
    println!("   3. Export your key, it is never stored in the config:");
    println!("        export OPENAI_API_KEY=sk-...");
    println!("   4. Run: scopedesk chat");
    println!();

    Ok(())
}
