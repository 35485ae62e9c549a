//! `scopedesk doctor` — Diagnose configuration, dataset and provider access.

use super::Globals;
use scopedesk_config::AppConfig;
use scopedesk_core::identity::IdentityDirectory;
use scopedesk_core::scope::filter;

pub async fn run(globals: &Globals) -> Result<(), Box<dyn std::error::Error>> {
    println!("🩺 ScopeDesk Doctor — System Diagnostics");
    println!("========================================\n");

    let mut issues = 0;

    // Config
    if AppConfig::config_path().exists() {
        println!("  ✅ Config file found");
    } else {
        println!("  ⚠️  No config file, using defaults (run `scopedesk init`)");
        issues += 1;
    }
    let config = match AppConfig::load() {
        Ok(config) => {
            println!("  ✅ Config valid");
            config
        }
        Err(e) => {
            println!("  ❌ Config invalid: {e}");
            println!("\n  ⚠️  Fix the config before running further checks.");
            return Ok(());
        }
    };

    // Identities
    let directory = match config.directory() {
        Ok(directory) => {
            println!("  ✅ {} identities available", directory.len());
            directory
        }
        Err(e) => {
            println!("  ❌ User table invalid: {e}");
            return Ok(());
        }
    };

    // Dataset
    let data_path = globals.data_path(&config);
    match scopedesk_data::load_dataset(&data_path) {
        Ok(loaded) if loaded.warnings.is_empty() => {
            println!("  ✅ Dataset {} ({} rows)", data_path.display(), loaded.dataset.len());
            for name in directory.list() {
                let Some(user) = directory.resolve(&name) else {
                    continue;
                };
                match filter(&loaded.dataset, Some(&user)) {
                    Ok(view) if view.is_empty() => {
                        println!("  ⚠️  {name}: no rows in scope ({})", user.scope);
                        issues += 1;
                    }
                    Ok(view) => println!("  ✅ {name}: {} row(s)", view.len()),
                    Err(e) => {
                        println!("  ❌ {name}: {e}");
                        issues += 1;
                    }
                }
            }
        }
        Ok(loaded) => {
            for warning in &loaded.warnings {
                println!("  ⚠️  {warning}");
            }
            issues += loaded.warnings.len();
        }
        Err(e) => {
            println!("  ❌ Dataset {} unusable: {e}", data_path.display());
            issues += 1;
        }
    }

    // Credential & provider
    match globals.credential() {
        Some(credential) => {
            println!("  ✅ API key provided");
            let router = scopedesk_providers::build_from_config(&config)?;
            let provider = router.default().ok_or("No default provider configured")?;
            match provider.health_check(&credential).await {
                Ok(true) => println!("  ✅ Provider '{}' reachable", provider.name()),
                Ok(false) => {
                    println!("  ❌ Provider '{}' rejected the request", provider.name());
                    issues += 1;
                }
                Err(e) => {
                    println!("  ❌ Provider '{}' unreachable: {e}", provider.name());
                    issues += 1;
                }
            }
        }
        None => {
            println!("  ⚠️  No API key, use --api-key or set SCOPEDESK_API_KEY / OPENAI_API_KEY");
            issues += 1;
        }
    }

    // Summary
    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
