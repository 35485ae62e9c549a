//! `scopedesk view` — Print the rows an identity can see.

use super::Globals;
use scopedesk_core::dataset::ScopedView;

pub async fn run(globals: &Globals, user: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config()?;
    let panel = super::build_panel(globals, &config)?;
    let (session, _) = super::open_session(&panel, globals, user.as_deref());

    match session.active() {
        Some(active) => println!("👤 {} ({})", active.display_name, active.scope),
        None => println!("👤 No identity selected"),
    }
    println!("{}", render_table(session.view()));
    Ok(())
}

/// Render a view as an aligned text table.
pub fn render_table(view: &ScopedView) -> String {
    if view.is_empty() {
        return "  (no rows visible)".to_string();
    }

    let columns = view.columns();
    let rows: Vec<Vec<String>> = view.rows().iter().map(ScopedView::cells).collect();

    let mut widths: Vec<usize> = columns.iter().map(|c| c.chars().count()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let format_line = |cells: &[&str]| -> String {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| format!("{cell:<width$}"))
            .collect();
        format!("  {}", padded.join("  ").trim_end())
    };

    let mut out = Vec::with_capacity(rows.len() + 3);
    out.push(format_line(&columns));
    let rules: Vec<String> = widths.iter().map(|w| "─".repeat(*w)).collect();
    out.push(format_line(&rules.iter().map(String::as_str).collect::<Vec<_>>()));
    for row in &rows {
        out.push(format_line(&row.iter().map(String::as_str).collect::<Vec<_>>()));
    }
    out.push(format!("  {} row(s)", rows.len()));
    out.join("\n")
}
