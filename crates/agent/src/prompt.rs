//! System prompt assembly for scoped questions.
//!
//! Format:
//! ```text
//! <instructions>
//! ...
//! </instructions>
//!
//! <dataset>
//! columns: grade, region, ...
//! rows: N
//! [ {...}, {...} ]
//! </dataset>
//! ```

use scopedesk_core::dataset::ScopedView;

const INSTRUCTIONS: &str = concat!(
    "You are a data assistant for a school administrator. ",
    "Answer questions using only the student records inside <dataset>. ",
    "Those records are the complete set of data this administrator may see; ",
    "do not guess about students, grades, or regions that are not listed. ",
    "If the records cannot answer the question, say so plainly. ",
    "Show counts and averages computed from the records, and keep answers concise.",
);

/// Build the system message for a question over `view`.
pub fn system_prompt(view: &ScopedView) -> String {
    let records = serde_json::to_string_pretty(&view.to_records()).unwrap_or_else(|_| "[]".into());

    let mut prompt = String::with_capacity(records.len() + 512);
    prompt.push_str("<instructions>\n");
    prompt.push_str(INSTRUCTIONS);
    prompt.push_str("\n</instructions>\n\n");
    prompt.push_str("<dataset>\n");
    prompt.push_str(&format!("columns: {}\n", view.columns().join(", ")));
    prompt.push_str(&format!("rows: {}\n", view.len()));
    prompt.push_str(&records);
    prompt.push_str("\n</dataset>\n");
    prompt
}
