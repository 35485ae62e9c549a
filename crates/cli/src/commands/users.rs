//! `scopedesk users` — List the identities you can act as.

use scopedesk_core::identity::IdentityDirectory;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config()?;
    let directory = config.directory()?;

    println!("👥 Identities");
    println!("─────────────────────────────────────");
    print!("{}", list_identities(&directory));
    Ok(())
}

/// Numbered listing, one identity per line; the first is the default.
pub fn list_identities(directory: &dyn IdentityDirectory) -> String {
    let mut out = String::new();
    for (i, name) in directory.list().iter().enumerate() {
        let detail = directory
            .resolve(name)
            .map(|u| format!("{}, {}", u.role, u.scope))
            .unwrap_or_default();
        let marker = if i == 0 { " (default)" } else { "" };
        out.push_str(&format!("  {}. {name}  [{detail}]{marker}\n", i + 1));
    }
    out
}
