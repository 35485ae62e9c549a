//! `scopedesk ask` — Answer a single question and exit.

use super::Globals;
use scopedesk_agent::Reply;

pub async fn run(
    globals: &Globals,
    user: Option<String>,
    message: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config()?;
    let panel = super::build_panel(globals, &config)?;
    let (mut session, _) = super::open_session(&panel, globals, user.as_deref());

    match panel.ask(&mut session, message).await {
        Reply::Answered(answer) => println!("{answer}"),
        Reply::Refused(refusal) => eprintln!("  ⚠️  {refusal}"),
    }

    Ok(())
}
