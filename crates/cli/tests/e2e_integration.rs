//! End-to-end integration tests for the ScopeDesk panel.
//!
//! These tests exercise the full pipeline from a CSV on disk and a config
//! file through identity selection, scoping, and question answering.

use std::io::Write;
use std::sync::{Arc, Mutex};

use scopedesk_agent::{Panel, QueryBridge, Refusal, Reply, FALLBACK_MESSAGE};
use scopedesk_config::AppConfig;
use scopedesk_core::credential::Credential;
use scopedesk_core::error::ProviderError;
use scopedesk_core::identity::{Scope, StaticDirectory};
use scopedesk_core::message::Role;
use scopedesk_core::provider::{Provider, ProviderRequest, ProviderResponse, Usage};
use scopedesk_core::session::Session;

// ── Mock Provider ────────────────────────────────────────────────────────

/// A mock provider that returns scripted answers in sequence and keeps
/// every request it saw.
struct ScriptedProvider {
    answers: Mutex<Vec<Result<String, ProviderError>>>,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl ScriptedProvider {
    fn new(answers: Vec<Result<String, ProviderError>>) -> Arc<Self> {
        Arc::new(Self {
            answers: Mutex::new(answers),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn text(answers: &[&str]) -> Arc<Self> {
        Self::new(answers.iter().map(|a| Ok(a.to_string())).collect())
    }

    fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn system_prompt(&self, call: usize) -> String {
        self.requests.lock().unwrap()[call].messages[0].content.clone()
    }
}

#[async_trait::async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        self.requests.lock().unwrap().push(request);
        let mut answers = self.answers.lock().unwrap();
        let next = if answers.is_empty() {
            Ok("(no more scripted answers)".to_string())
        } else {
            answers.remove(0)
        };
        next.map(|content| ProviderResponse {
            content,
            usage: Some(Usage {
                prompt_tokens: 100,
                completion_tokens: 20,
                total_tokens: 120,
            }),
            model: "mock".into(),
        })
    }
}

// ── Fixtures ─────────────────────────────────────────────────────────────

const STUDENTS: &str = "\
student_name,grade,class,region,homework_submitted,quiz_score
Asha,8,A,North,yes,88
Bruno,8,B,South,no,72
Chidi,9,A,North,yes,91
Dana,9,B,East,yes,65
Eli,8,A,North,no,79
";

fn write_csv(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

fn panel_over(csv: &str, provider: Arc<ScriptedProvider>) -> Panel {
    let file = write_csv(csv);
    let loaded = scopedesk_data::load_dataset(file.path()).unwrap();
    Panel::new(
        Arc::new(StaticDirectory::builtin()),
        loaded.dataset,
        QueryBridge::new(provider, "gpt-3.5-turbo"),
    )
}

fn keyed_session() -> Session {
    let mut session = Session::new();
    session.set_credential(Credential::new("sk-e2e"));
    session
}

// ── Tests ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn e2e_grade_admin_sees_only_their_grade() {
    let provider = ScriptedProvider::text(&["Three grade 8 students."]);
    let panel = panel_over(STUDENTS, provider.clone());
    let mut session = keyed_session();

    let selection = panel.select_default(&mut session);
    assert_eq!(selection.visible_rows, 3);

    let reply = panel.ask(&mut session, "How many students do I have?").await;
    assert_eq!(reply, Reply::Answered("Three grade 8 students.".into()));

    let prompt = provider.system_prompt(0);
    for visible in ["Asha", "Bruno", "Eli"] {
        assert!(prompt.contains(visible), "{visible} should be visible");
    }
    for hidden in ["Chidi", "Dana"] {
        assert!(!prompt.contains(hidden), "{hidden} should be hidden");
    }
}

#[tokio::test]
async fn e2e_region_admin_sees_only_their_region() {
    let provider = ScriptedProvider::text(&["ok"]);
    let panel = panel_over(STUDENTS, provider.clone());
    let mut session = keyed_session();

    let selection = panel.select(&mut session, "Mrs. Iqbal (North Region)");
    assert_eq!(selection.visible_rows, 3);

    panel.ask(&mut session, "Who is in the North?").await;
    let prompt = provider.system_prompt(0);
    assert!(prompt.contains("Chidi"));
    assert!(!prompt.contains("Bruno"));
    assert!(!prompt.contains("Dana"));
}

#[tokio::test]
async fn e2e_switching_identity_resets_conversation() {
    let provider = ScriptedProvider::text(&["first", "second", "third"]);
    let panel = panel_over(STUDENTS, provider.clone());
    let mut session = keyed_session();

    panel.select_default(&mut session);
    panel.ask(&mut session, "q1").await;
    panel.ask(&mut session, "q2").await;
    assert_eq!(session.transcript().len(), 4);

    let selection = panel.select(&mut session, "Mr. Chen (Grade 9 Admin)");
    assert_eq!(
        selection.notice().as_deref(),
        Some("Chat reset. You are now logged in as Mr. Chen (Grade 9 Admin).")
    );
    assert!(session.transcript().is_empty());

    panel.ask(&mut session, "q3").await;
    let requests = provider.requests.lock().unwrap();
    let roles: Vec<Role> = requests[2].messages.iter().map(|m| m.role).collect();
    assert_eq!(roles, vec![Role::System, Role::User]);
    assert!(requests[2].messages[0].content.contains("Dana"));
    assert!(!requests[2].messages[0].content.contains("Asha"));
}

#[tokio::test]
async fn e2e_empty_scope_refuses_without_calling_provider() {
    let provider = ScriptedProvider::text(&["never"]);
    let panel = panel_over(STUDENTS, provider.clone());
    let mut session = keyed_session();

    panel.select(&mut session, "Mr. Frank (Grade 10 Admin)");
    let reply = panel.ask(&mut session, "How many students?").await;

    match reply {
        Reply::Refused(refusal) => assert_eq!(
            refusal.to_string(),
            "No data available for your scope (grade = 10). Cannot answer questions."
        ),
        other => panic!("expected refusal, got {other:?}"),
    }
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn e2e_missing_credential_refuses_first() {
    let provider = ScriptedProvider::text(&["never"]);
    let panel = panel_over(STUDENTS, provider.clone());
    let mut session = Session::new();

    panel.select(&mut session, "Mr. Frank (Grade 10 Admin)");
    let reply = panel.ask(&mut session, "anything").await;
    assert_eq!(reply, Reply::Refused(Refusal::MissingCredential));
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn e2e_provider_failure_shows_fallback_and_session_continues() {
    let provider = ScriptedProvider::new(vec![
        Err(ProviderError::RateLimited {
            retry_after_secs: 30,
        }),
        Ok("Recovered.".into()),
    ]);
    let panel = panel_over(STUDENTS, provider.clone());
    let mut session = keyed_session();
    panel.select_default(&mut session);

    let first = panel.ask(&mut session, "q1").await;
    assert_eq!(first, Reply::Answered(FALLBACK_MESSAGE.into()));

    let second = panel.ask(&mut session, "q2").await;
    assert_eq!(second, Reply::Answered("Recovered.".into()));
    assert_eq!(provider.calls(), 2);
}

#[tokio::test]
async fn e2e_missing_dataset_means_nothing_is_answerable() {
    let dir = tempfile::tempdir().unwrap();
    let loaded = scopedesk_data::load_dataset(&dir.path().join("absent.csv")).unwrap();
    assert_eq!(loaded.warnings.len(), 1);

    let provider = ScriptedProvider::text(&["never"]);
    let panel = Panel::new(
        Arc::new(StaticDirectory::builtin()),
        loaded.dataset,
        QueryBridge::new(provider.clone(), "m"),
    );
    let mut session = keyed_session();
    panel.select_default(&mut session);

    let reply = panel.ask(&mut session, "q").await;
    assert!(matches!(reply, Reply::Refused(Refusal::EmptyScope { .. })));
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn e2e_non_numeric_grade_fails_closed_for_grade_scopes() {
    let csv = "\
student_name,grade,region
Asha,8,North
Bruno,eight,South
";
    let provider = ScriptedProvider::text(&["ok"]);
    let panel = panel_over(csv, provider.clone());
    let mut session = keyed_session();

    let selection = panel.select_default(&mut session);
    assert!(selection.scope_error.is_some());
    assert_eq!(selection.visible_rows, 0);

    let selection = panel.select(&mut session, "Mrs. Iqbal (North Region)");
    assert!(selection.scope_error.is_none());
    assert_eq!(selection.visible_rows, 1);
}

#[tokio::test]
async fn e2e_configured_users_replace_builtin_table() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("config.toml");
    std::fs::write(
        &config_path,
        r#"
default_model = "gpt-4o-mini"

[[users]]
name = "East Lead"
user_id = "e1"
scope_type = "region"
scope_value = "East"

[[users]]
name = "District Head"
user_id = "d1"
scope_type = "district"
scope_value = 7
"#,
    )
    .unwrap();

    let config = AppConfig::load_from(&config_path).unwrap();
    let directory = config.directory().unwrap();

    let provider = ScriptedProvider::text(&["Dana is the only one."]);
    let file = write_csv(STUDENTS);
    let dataset = scopedesk_data::load_dataset(file.path()).unwrap().dataset;
    let panel = Panel::new(
        Arc::new(directory),
        dataset,
        QueryBridge::new(provider.clone(), config.model_for(&config.default_provider)),
    );
    let mut session = keyed_session();

    let selection = panel.select_default(&mut session);
    assert_eq!(selection.user.as_ref().unwrap().scope, Scope::Region("East".into()));
    assert_eq!(selection.visible_rows, 1);

    panel.ask(&mut session, "Who is here?").await;
    assert_eq!(provider.requests.lock().unwrap()[0].model, "gpt-4o-mini");

    // Unknown scope kinds see nothing.
    let selection = panel.select(&mut session, "District Head");
    assert_eq!(selection.visible_rows, 0);
    let reply = panel.ask(&mut session, "q").await;
    assert!(matches!(reply, Reply::Refused(Refusal::EmptyScope { .. })));
    assert_eq!(provider.calls(), 1);
}
