use async_trait::async_trait;
use docuchat_application::DocuChatApp;
use docuchat_application::chat::AskOutcome;
use docuchat_core::backend::{Answer, ChatBackend};
use docuchat_core::conversation::{Conversation, ConversationId, Message, Source};
use docuchat_core::error::{DocuChatError, Result};
use docuchat_core::notification::{Notification, NotificationKind};
use docuchat_core::state::Ignored;
use docuchat_core::upload::{PendingFile, UploadReceipt};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::oneshot;

/// Scripted in-memory backend that records every call.
#[derive(Default)]
struct FakeBackend {
    conversations: Mutex<VecDeque<Result<Vec<Conversation>>>>,
    new_chat: Mutex<VecDeque<Result<ConversationId>>>,
    history: Mutex<HashMap<ConversationId, Result<Vec<Message>>>>,
    upload: Mutex<VecDeque<Result<UploadReceipt>>>,
    query: Mutex<VecDeque<Result<Answer>>>,
    query_gate: Mutex<Option<oneshot::Receiver<()>>>,
    calls: Mutex<Vec<String>>,
}

impl FakeBackend {
    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn on_list(&self, result: Result<Vec<Conversation>>) {
        self.conversations.lock().unwrap().push_back(result);
    }

    fn on_new_chat(&self, result: Result<ConversationId>) {
        self.new_chat.lock().unwrap().push_back(result);
    }

    fn on_history(&self, id: i64, result: Result<Vec<Message>>) {
        self.history
            .lock()
            .unwrap()
            .insert(ConversationId(id), result);
    }

    fn on_upload(&self, result: Result<UploadReceipt>) {
        self.upload.lock().unwrap().push_back(result);
    }

    fn on_query(&self, result: Result<Answer>) {
        self.query.lock().unwrap().push_back(result);
    }

    /// Makes the next query wait until the returned sender fires.
    fn hold_next_query(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.query_gate.lock().unwrap() = Some(rx);
        tx
    }
}

fn unscripted<T>(call: &str) -> Result<T> {
    Err(DocuChatError::transport(format!("no scripted response for {call}")))
}

#[async_trait]
impl ChatBackend for FakeBackend {
    async fn list_conversations(&self) -> Result<Vec<Conversation>> {
        self.record("list_conversations");
        self.conversations
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| unscripted("list_conversations"))
    }

    async fn new_chat(&self) -> Result<ConversationId> {
        self.record("new_chat");
        self.new_chat
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| unscripted("new_chat"))
    }

    async fn history(&self, id: ConversationId) -> Result<Vec<Message>> {
        self.record(format!("history/{id}"));
        self.history
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .unwrap_or_else(|| unscripted("history"))
    }

    async fn upload(&self, file: &PendingFile) -> Result<UploadReceipt> {
        self.record(format!("upload:{}", file.name));
        self.upload
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| unscripted("upload"))
    }

    async fn query(&self, question: &str, conversation_id: ConversationId) -> Result<Answer> {
        self.record(format!("query:{conversation_id}:{question}"));
        let gate = self.query_gate.lock().unwrap().take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        self.query
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| unscripted("query"))
    }
}

fn conversation(id: i64) -> Conversation {
    Conversation {
        id: ConversationId(id),
        created_at: "2025-03-01 10:15:00".to_string(),
    }
}

fn setup() -> (Arc<FakeBackend>, DocuChatApp) {
    let backend = Arc::new(FakeBackend::default());
    let app = DocuChatApp::with_notification_ttl(backend.clone(), Duration::from_secs(5));
    (backend, app)
}

/// App with conversation 7 active.
async fn setup_active() -> (Arc<FakeBackend>, DocuChatApp) {
    let (backend, app) = setup();
    backend.on_new_chat(Ok(ConversationId(7)));
    backend.on_list(Ok(vec![conversation(7)]));
    app.sessions().start_new().await.unwrap();
    (backend, app)
}

async fn notification(app: &DocuChatApp) -> Option<Notification> {
    app.store()
        .read(|state| state.current_notification().cloned())
        .await
}

// ============================================================================
// Conversation registry
// ============================================================================

#[tokio::test]
async fn test_mount_loads_registry() {
    let (backend, app) = setup();
    backend.on_list(Ok(vec![conversation(7), conversation(3)]));

    assert_eq!(app.mount().await.unwrap(), 2);

    let state = app.snapshot().await;
    assert_eq!(state.conversations, vec![conversation(7), conversation(3)]);
    assert!(state.notification.is_none());
}

#[tokio::test]
async fn test_refresh_failure_keeps_existing_list() {
    let (backend, app) = setup();
    backend.on_list(Ok(vec![conversation(1)]));
    app.mount().await.unwrap();

    backend.on_list(Err(DocuChatError::decode("expected value at line 1")));
    assert!(app.registry().refresh().await.is_err());

    let state = app.snapshot().await;
    assert_eq!(state.conversations, vec![conversation(1)]);
    assert_eq!(
        notification(&app).await,
        Some(Notification::error("Error fetching conversations."))
    );
}

// ============================================================================
// Session controller
// ============================================================================

#[tokio::test]
async fn test_start_new_activates_and_refreshes_registry() {
    let (backend, app) = setup();
    backend.on_list(Ok(vec![]));
    app.mount().await.unwrap();

    backend.on_new_chat(Ok(ConversationId(7)));
    backend.on_list(Ok(vec![conversation(7)]));
    let id = app.sessions().start_new().await.unwrap();

    assert_eq!(id, ConversationId(7));
    let state = app.snapshot().await;
    assert_eq!(state.active_conversation(), Some(ConversationId(7)));
    assert!(state.transcript.is_empty());
    assert!(state.pending_file.is_none());
    assert_eq!(state.conversations, vec![conversation(7)]);
    assert_eq!(
        backend.calls(),
        vec!["list_conversations", "new_chat", "list_conversations"]
    );
}

#[tokio::test]
async fn test_start_new_failure_keeps_prior_state() {
    let (backend, app) = setup_active().await;
    backend.on_query(Ok(Answer {
        answer: "X is Y".into(),
        sources: vec![],
    }));
    app.chat().ask("What is X?").await.unwrap();

    backend.on_new_chat(Err(DocuChatError::transport("connection refused")));
    assert!(app.sessions().start_new().await.is_err());

    let state = app.snapshot().await;
    assert_eq!(state.active_conversation(), Some(ConversationId(7)));
    assert_eq!(state.transcript.len(), 2);
    assert_eq!(
        notification(&app).await,
        Some(Notification::error("Error starting new chat."))
    );
}

#[tokio::test]
async fn test_start_new_then_select_resets_dependent_state() {
    let (backend, app) = setup_active().await;
    app.uploads().select_file("/tmp/report.pdf").await.unwrap();

    backend.on_new_chat(Ok(ConversationId(8)));
    backend.on_list(Ok(vec![conversation(8), conversation(7)]));
    app.sessions().start_new().await.unwrap();
    let state = app.snapshot().await;
    assert!(state.transcript.is_empty());
    assert!(state.pending_file.is_none());

    app.uploads().select_file("/tmp/other.pdf").await.unwrap();
    backend.on_history(7, Ok(vec![]));
    app.sessions().select(ConversationId(7)).await.unwrap();

    let state = app.snapshot().await;
    assert_eq!(state.active_conversation(), Some(ConversationId(7)));
    assert!(state.transcript.is_empty());
    assert!(state.pending_file.is_none());
}

#[tokio::test]
async fn test_select_replaces_transcript_with_history() {
    let (backend, app) = setup_active().await;
    let history = vec![Message::user("What is X?"), Message::ai("X is Y", vec![])];
    backend.on_history(3, Ok(history.clone()));

    app.sessions().select(ConversationId(3)).await.unwrap();

    let state = app.snapshot().await;
    assert_eq!(state.active_conversation(), Some(ConversationId(3)));
    assert_eq!(state.transcript.messages(), history);
}

#[tokio::test]
async fn test_select_failure_does_not_partially_switch() {
    let (backend, app) = setup_active().await;
    app.uploads().select_file("/tmp/report.pdf").await.unwrap();
    backend.on_history(3, Err(DocuChatError::http(500, None)));

    assert!(app.sessions().select(ConversationId(3)).await.is_err());

    let state = app.snapshot().await;
    assert_eq!(state.active_conversation(), Some(ConversationId(7)));
    assert_eq!(state.pending_file.unwrap().name, "report.pdf");
    assert_eq!(
        notification(&app).await,
        Some(Notification::error("Error loading conversation."))
    );
}

// ============================================================================
// Chat transcript controller
// ============================================================================

#[tokio::test]
async fn test_ask_appends_question_and_answer() {
    let (backend, app) = setup_active().await;
    backend.on_query(Ok(Answer {
        answer: "X is Y".into(),
        sources: vec![Source::new("X is defined as Y", 3)],
    }));
    app.chat().edit("What is X?").await;

    let outcome = app.chat().submit_draft().await.unwrap();

    assert_eq!(outcome, AskOutcome::Answered);
    let state = app.snapshot().await;
    assert_eq!(
        state.transcript.messages(),
        vec![
            Message::user("What is X?"),
            Message::ai("X is Y", vec![Source::new("X is defined as Y", 3)]),
        ]
    );
    assert!(state.question.is_empty());
    assert!(!state.is_loading());
    assert!(backend.calls().contains(&"query:7:What is X?".to_string()));
}

#[tokio::test]
async fn test_ask_ignored_without_text_or_session() {
    let (backend, app) = setup();
    app.chat().edit("draft").await;

    let outcome = app.chat().ask("What is X?").await.unwrap();
    assert_eq!(outcome, AskOutcome::Ignored(Ignored::NoActiveSession));

    let state = app.snapshot().await;
    assert!(state.transcript.is_empty());
    assert!(!state.is_loading());
    assert_eq!(state.question, "draft");

    let (backend_active, app_active) = setup_active().await;
    app_active.chat().edit("draft").await;
    let outcome = app_active.chat().ask("").await.unwrap();
    assert_eq!(outcome, AskOutcome::Ignored(Ignored::EmptyQuestion));

    let state = app_active.snapshot().await;
    assert!(state.transcript.is_empty());
    assert!(!state.is_loading());
    assert_eq!(state.question, "draft");

    assert!(!backend.calls().iter().any(|call| call.starts_with("query")));
    assert!(!backend_active.calls().iter().any(|call| call.starts_with("query")));
}

#[tokio::test]
async fn test_ask_failure_rolls_back_question() {
    let (backend, app) = setup_active().await;
    backend.on_query(Ok(Answer {
        answer: "first answer".into(),
        sources: vec![],
    }));
    app.chat().ask("first").await.unwrap();
    let before = app.snapshot().await.transcript.len();

    backend.on_query(Err(DocuChatError::http(
        400,
        Some("Document not uploaded or processed yet.".into()),
    )));
    assert!(app.chat().ask("second").await.is_err());

    let state = app.snapshot().await;
    assert_eq!(state.transcript.len(), before);
    assert!(!state.is_loading());
    assert_eq!(
        state.current_notification(),
        Some(&Notification::error("Document not uploaded or processed yet."))
    );
}

#[tokio::test]
async fn test_ask_failure_without_error_text_uses_default() {
    let (backend, app) = setup_active().await;
    backend.on_query(Err(DocuChatError::http(500, None)));

    assert!(app.chat().ask("What is X?").await.is_err());

    assert_eq!(
        notification(&app).await,
        Some(Notification::error("Failed to get answer"))
    );
    assert!(app.snapshot().await.transcript.is_empty());
}

#[tokio::test]
async fn test_answer_after_session_switch_is_discarded() {
    let (backend, app) = setup_active().await;
    backend.on_query(Ok(Answer {
        answer: "X is Y".into(),
        sources: vec![],
    }));
    backend.on_history(3, Ok(vec![Message::user("older question")]));
    let release = backend.hold_next_query();

    let asking = app.clone();
    let pending = tokio::spawn(async move { asking.chat().ask("What is X?").await });
    while !app.store().read(|state| state.is_loading()).await {
        tokio::task::yield_now().await;
    }

    app.sessions().select(ConversationId(3)).await.unwrap();
    release.send(()).unwrap();

    let outcome = pending.await.unwrap().unwrap();
    assert_eq!(outcome, AskOutcome::Discarded);

    let state = app.snapshot().await;
    assert_eq!(state.active_conversation(), Some(ConversationId(3)));
    assert_eq!(state.transcript.messages(), vec![Message::user("older question")]);
    assert!(!state.is_loading());
}

// ============================================================================
// Upload controller
// ============================================================================

#[tokio::test]
async fn test_submit_without_file_sends_nothing() {
    let (backend, app) = setup_active().await;
    let calls_before = backend.calls().len();

    let err = app.uploads().submit().await.unwrap_err();

    assert!(err.is_precondition());
    assert_eq!(backend.calls().len(), calls_before);
    assert_eq!(
        notification(&app).await,
        Some(Notification::error(
            "Please select a file and start a new chat first."
        ))
    );
}

#[tokio::test]
async fn test_select_file_without_session_is_rejected() {
    let (_backend, app) = setup();

    assert!(app.uploads().select_file("/tmp/report.pdf").await.is_err());
    assert!(app.snapshot().await.pending_file.is_none());
}

#[tokio::test]
async fn test_upload_success_keeps_pending_file() {
    let (backend, app) = setup_active().await;
    app.uploads().select_file("/tmp/report.pdf").await.unwrap();
    backend.on_upload(Ok(UploadReceipt {
        message: Some("File 'report.pdf' processed and ready for questions.".into()),
    }));

    app.uploads().submit().await.unwrap();

    let state = app.snapshot().await;
    assert!(!state.is_uploading);
    assert_eq!(state.pending_file.unwrap().name, "report.pdf");
    assert_eq!(
        state.notification.map(|live| live.notification),
        Some(Notification::success(
            "File 'report.pdf' processed and ready for questions."
        ))
    );
    assert!(backend.calls().contains(&"upload:report.pdf".to_string()));
}

#[tokio::test]
async fn test_upload_success_without_message_uses_default() {
    let (backend, app) = setup_active().await;
    app.uploads().select_file("/tmp/report.pdf").await.unwrap();
    backend.on_upload(Ok(UploadReceipt::default()));

    app.uploads().submit().await.unwrap();

    assert_eq!(
        notification(&app).await,
        Some(Notification::success("File processed successfully!"))
    );
}

#[tokio::test]
async fn test_upload_failure_reports_server_text_and_keeps_file() {
    let (backend, app) = setup_active().await;
    app.uploads().select_file("/tmp/report.pdf").await.unwrap();
    backend.on_upload(Err(DocuChatError::http(
        500,
        Some("Error processing file: bad PDF".into()),
    )));

    assert!(app.uploads().submit().await.is_err());

    let state = app.snapshot().await;
    assert!(!state.is_uploading);
    assert!(state.pending_file.is_some());
    let shown = state.current_notification().unwrap();
    assert_eq!(shown.kind, NotificationKind::Error);
    assert_eq!(shown.text, "Error processing file: bad PDF");
}

#[tokio::test]
async fn test_upload_failure_without_text_uses_default() {
    let (backend, app) = setup_active().await;
    app.uploads().select_file("/tmp/report.pdf").await.unwrap();
    backend.on_upload(Err(DocuChatError::http(500, None)));

    assert!(app.uploads().submit().await.is_err());

    assert_eq!(
        notification(&app).await,
        Some(Notification::error("Failed to upload file."))
    );
}

#[tokio::test(start_paused = true)]
async fn test_error_notification_expires() {
    let (backend, app) = setup();
    backend.on_list(Err(DocuChatError::transport("connection refused")));
    let _ = app.mount().await;
    assert!(notification(&app).await.is_some());

    tokio::time::sleep(Duration::from_secs(6)).await;

    assert!(notification(&app).await.is_none());
}
