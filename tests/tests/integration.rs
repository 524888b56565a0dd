use futures::future::join_all;
use outguard_foundation::governance::{
    BroadcastNotifier, GovernanceOrchestrator, InMemoryAuditSink, JsonLinesAuditSink,
};
use outguard_kernel::config::load_governance_config;
use outguard_kernel::governance::{
    AuditRecord, ContractType, FileDescriptor, GovernanceError, GovernanceOutcome, GovernanceStep,
    RegenerationError, RetryTermination,
};
use outguard_testing::{RecordingNotifier, ScriptedRegenerator, assert_regenerated, init_tracing};
use serde_json::{Value, json};
use std::io::Write;
use std::sync::Arc;

const KEY: &str = "sk-0123456789abcdef0123456789abcdef0123456789abcdef";

fn orchestrator_with(
    sink: Arc<InMemoryAuditSink>,
    notifier: Arc<RecordingNotifier>,
) -> GovernanceOrchestrator {
    GovernanceOrchestrator::builder()
        .audit_sink(sink)
        .notifier(notifier)
        .build()
        .unwrap()
}

#[tokio::test]
async fn json_with_embedded_key_is_sanitized_without_retry() {
    init_tracing();
    let sink = Arc::new(InMemoryAuditSink::new());
    let orchestrator = orchestrator_with(sink.clone(), Arc::new(RecordingNotifier::new()));
    let regenerator = ScriptedRegenerator::new();

    let raw = format!(r#"Aqui está: {{"foo":1,"bar":"{KEY}"}}"#);
    let result = orchestrator
        .for_chat(&raw, "Corrija o JSON. Apenas JSON.", &regenerator, vec![])
        .await;

    assert!(result.valid());
    assert_eq!(result.contract_type, ContractType::JsonFix);
    assert!(result.json_only);
    assert_eq!(result.retry_attempts, 0);
    assert!(result.secrets_detected);
    assert!(result.text().contains("[REDACTED_API_KEY]"));
    assert!(!result.markdown.contains(KEY));

    let parsed: Value = serde_json::from_str(result.text()).unwrap();
    assert_eq!(parsed, json!({"foo": 1, "bar": "[REDACTED_API_KEY]"}));
    assert_eq!(result.detail_payload.json_data.as_ref(), Some(&parsed));
    assert_eq!(result.detail_payload.content, parsed);
    assert_regenerated!(regenerator, 0);
    assert_eq!(sink.len(), 1);
}

#[tokio::test]
async fn prose_answer_is_corrected_into_json() {
    init_tracing();
    let notifier = Arc::new(RecordingNotifier::new());
    let orchestrator = orchestrator_with(Arc::new(InMemoryAuditSink::new()), notifier.clone());
    let regenerator = ScriptedRegenerator::new().then_respond(r#"{"info": "here"}"#);

    let result = orchestrator
        .for_chat("Sure, here's info", "Give me the info, json only", &regenerator, vec![])
        .await;

    assert!(result.valid());
    assert_eq!(result.retry_attempts, 1);
    assert_eq!(result.detail_payload.json_data, Some(json!({"info": "here"})));
    assert_regenerated!(regenerator, 1);
    assert!(regenerator.history()[0].contains("response must contain JSON only."));

    assert_eq!(
        notifier.step_names(),
        vec![
            "contract_selected",
            "validating",
            "correcting",
            "validating",
            "accepted",
            "formatted"
        ]
    );
    let ids: Vec<_> = notifier.steps().iter().map(GovernanceStep::invocation_id).collect();
    assert!(ids.iter().all(|id| *id == result.audit.invocation_id));
}

#[tokio::test]
async fn failing_generator_degrades_after_one_attempt() {
    init_tracing();
    let sink = Arc::new(InMemoryAuditSink::new());
    let orchestrator = orchestrator_with(sink.clone(), Arc::new(RecordingNotifier::new()));
    let regenerator =
        ScriptedRegenerator::new().always_fail(RegenerationError::failed("connection refused"));

    let result = orchestrator
        .for_chat("Sure, here's info", "only json", &regenerator, vec![])
        .await;

    assert!(!result.valid());
    assert_eq!(result.retry_attempts, 1);
    assert_regenerated!(regenerator, 1);
    assert!(result.errors().contains(&"response must contain JSON only.".to_string()));
    assert!(result.errors().contains(&"regeneration failed: connection refused".to_string()));
    assert_eq!(result.text(), "Sure, here's info");

    let record = &sink.records()[0];
    assert!(!record.validation_passed);
    assert_eq!(record.retry_attempts, 1);
    assert_eq!(record.errors_found, 2);

    assert_eq!(
        result.into_accepted(),
        Err(GovernanceError::RegenerationFailed("connection refused".into()))
    );
}

#[tokio::test]
async fn exhausted_retries_keep_last_errors() {
    init_tracing();
    let orchestrator = GovernanceOrchestrator::default();
    let regenerator = ScriptedRegenerator::new().always_respond("still not json");

    let result = orchestrator
        .for_chat("nope", "apenas json", &regenerator, vec![])
        .await;

    assert_eq!(result.retry_attempts, orchestrator.config().max_retries);
    assert_regenerated!(regenerator, 2);
    assert!(matches!(
        &result.outcome,
        GovernanceOutcome::Degraded {
            termination: RetryTermination::Exhausted,
            errors,
            ..
        } if errors == &vec!["response must contain JSON only.".to_string()]
    ));
}

#[tokio::test]
async fn log_analysis_speaks_canned_phrase() {
    init_tracing();
    let orchestrator = GovernanceOrchestrator::default();
    let regenerator = ScriptedRegenerator::new();

    let result = orchestrator
        .for_multimodal(
            "The gateway timed out 3 times between 10:02 and 10:05.",
            "o que aconteceu?",
            &regenerator,
            vec![FileDescriptor::new("text/x-log")],
        )
        .await;

    assert!(result.valid());
    assert_eq!(result.contract_type, ContractType::LogAnalysis);
    assert_eq!(
        result.voice_script,
        "Log analysis complete. The details and likely causes are in the chat."
    );
    assert_eq!(result.detail_payload.json_data, None);
}

#[tokio::test]
async fn email_is_masked_everywhere() {
    init_tracing();
    let orchestrator = GovernanceOrchestrator::default();
    let regenerator = ScriptedRegenerator::new();

    let live = orchestrator
        .for_live(
            "Write to joao.silva@example.com and you will get an answer today.",
            "who do I contact?",
            &regenerator,
            vec![],
        )
        .await;

    assert!(live.audit.secrets_detected);
    let chat = live.chat_payload.content.as_str().unwrap();
    assert!(chat.contains("j***@example.com"));
    assert!(!chat.contains("joao.silva"));
    assert!(live.voice_script.starts_with("I removed sensitive data from this answer."));
    assert!(!live.voice_script.contains("joao.silva"));
}

#[tokio::test]
async fn escaped_secrets_in_json_are_masked_on_every_channel() {
    init_tracing();
    let sink = Arc::new(InMemoryAuditSink::new());
    let orchestrator = orchestrator_with(sink.clone(), Arc::new(RecordingNotifier::new()));
    let regenerator = ScriptedRegenerator::new();
    let escaped = r#"{"owner": "joao.silva\u0040example.com", "token": "sk\u002dproj-abcdefghijklmnopqrstuvwxyz"}"#;

    let json_only = orchestrator
        .for_chat(escaped, "apenas json", &regenerator, vec![])
        .await;
    assert!(json_only.valid());
    assert!(json_only.secrets_detected);
    assert!(!json_only.text().contains("joao.silva@example.com"));
    assert!(!json_only.text().contains("sk-proj-"));
    let parsed: Value = serde_json::from_str(json_only.text()).unwrap();
    assert_eq!(parsed["owner"], "j***@example.com");
    assert_eq!(parsed["token"], "[REDACTED_API_KEY]");

    let prose = orchestrator
        .for_chat(&format!("Owner: {escaped}"), "who owns this?", &regenerator, vec![])
        .await;
    assert!(prose.secrets_detected);
    let data = prose.detail_payload.json_data.as_ref().unwrap();
    assert_eq!(data["owner"], "j***@example.com");
    assert!(!prose.markdown.contains("joao.silva"));
    assert!(!data.to_string().contains("joao.silva"));

    assert_regenerated!(regenerator, 0);
    assert!(sink.records().iter().all(|record| record.secrets_detected));
}

#[tokio::test]
async fn concurrent_invocations_are_independent() {
    init_tracing();
    let sink = Arc::new(InMemoryAuditSink::new());
    let orchestrator = Arc::new(
        GovernanceOrchestrator::builder()
            .audit_sink(sink.clone())
            .build()
            .unwrap(),
    );

    let runs = (0..16).map(|n| {
        let orchestrator = Arc::clone(&orchestrator);
        async move {
            let regenerator = ScriptedRegenerator::new().then_respond(format!(r#"{{"run": {n}}}"#));
            let raw = if n % 2 == 0 { format!(r#"{{"run": {n}}}"#) } else { "prose".to_string() };
            let result = orchestrator
                .for_chat(&raw, "json only", &regenerator, vec![])
                .await;
            (n, result, regenerator.call_count())
        }
    });

    for (n, result, calls) in join_all(runs).await {
        assert!(result.valid());
        assert_eq!(result.detail_payload.json_data, Some(json!({"run": n})));
        assert_eq!(calls, if n % 2 == 0 { 0 } else { 1 });
    }

    let mut ids: Vec<_> = sink.records().iter().map(|r| r.invocation_id).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 16);
}

#[tokio::test]
async fn broadcast_subscribers_follow_an_invocation() {
    let notifier = Arc::new(BroadcastNotifier::new(32));
    let mut rx = notifier.subscribe();
    let orchestrator = GovernanceOrchestrator::builder()
        .notifier(notifier)
        .build()
        .unwrap();

    let result = orchestrator
        .for_chat("Paris.", "capital of France?", &ScriptedRegenerator::new(), vec![])
        .await;

    let first = rx.recv().await.unwrap();
    assert!(matches!(
        first,
        GovernanceStep::ContractSelected {
            contract_type: ContractType::GeneralChat,
            ..
        }
    ));
    assert_eq!(first.invocation_id(), result.audit.invocation_id);
}

#[tokio::test]
async fn audit_trail_is_written_as_json_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("audit.jsonl");
    let orchestrator = GovernanceOrchestrator::builder()
        .audit_sink(Arc::new(JsonLinesAuditSink::open(&path).unwrap()))
        .build()
        .unwrap();

    let regenerator = ScriptedRegenerator::new();
    orchestrator.for_chat("one", "hi", &regenerator, vec![]).await;
    orchestrator.for_live("two", "hi", &regenerator, vec![]).await;

    let content = std::fs::read_to_string(&path).unwrap();
    let records: Vec<AuditRecord> = content
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(records.len(), 2);
    assert_eq!(records[1].mode.to_string(), "live");
}

#[tokio::test]
async fn loaded_config_bounds_the_retry_cycle() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(file, "max_retries = 1\n\n[voice]\nsoft_word_budget = 15\nhard_word_cap = 20").unwrap();
    let config = load_governance_config(file.path().to_str().unwrap()).unwrap();

    let orchestrator = GovernanceOrchestrator::builder().config(config).build().unwrap();
    let regenerator = ScriptedRegenerator::new().always_respond("never json");
    let result = orchestrator
        .for_chat(&"word ".repeat(100), "json only", &regenerator, vec![])
        .await;

    assert_eq!(result.retry_attempts, 1);
    assert_regenerated!(regenerator, 1);
    assert!(result.voice_script.split_whitespace().count() <= 20);
}
