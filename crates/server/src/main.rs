//! Aria Server
//!
//! Axum server exposing the chat endpoint and read/update access to the
//! conversational memory, plus one-shot CLI commands over the same core.

use anyhow::Context;
use aria_core::chat::{ChatRequest, ChatService, ReplySource};
use aria_core::config::{ChatConfig, MemoryConfig};
use aria_core::memory::{
    ChatMemory, CodeRequest, ConversationEntry, DocumentStore, InMemoryStore, JsonFileStore,
    LearningRecord, MemoryStats, ProfilePatch, UserProfile,
};
use aria_core::provider::{CompletionProvider, LlmCompletionProvider};
use aria_core::ValidationError;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::{net::SocketAddr, path::PathBuf, sync::Arc, time::Instant};
use tokio::net::TcpListener;
use utoipa::{OpenApi, ToSchema};

/// Application state
struct AppState {
    chat: ChatService,
    started_at: Instant,
}

type SharedState = Arc<AppState>;

// === API Types ===

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
struct ChatApiRequest {
    user_id: String,
    message: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
struct ChatApiResponse {
    response: String,
    /// "provider", "rules" or "fallback"
    source: String,
    user: ProfileView,
    #[serde(skip_serializing_if = "Option::is_none")]
    diagnostic: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
struct ProfileView {
    id: String,
    display_name: String,
    first_seen: String,
    last_seen: String,
    interaction_count: u64,
    #[schema(value_type = Object)]
    attributes: Map<String, Value>,
}

impl From<UserProfile> for ProfileView {
    fn from(profile: UserProfile) -> Self {
        Self {
            id: profile.id,
            display_name: profile.display_name,
            first_seen: profile.first_seen.to_rfc3339(),
            last_seen: profile.last_seen.to_rfc3339(),
            interaction_count: profile.interaction_count,
            attributes: profile.attributes,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
struct ExchangeView {
    message: String,
    response: String,
    timestamp: String,
}

impl From<ConversationEntry> for ExchangeView {
    fn from(entry: ConversationEntry) -> Self {
        Self {
            message: entry.message,
            response: entry.response,
            timestamp: entry.timestamp.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
struct UserResponse {
    profile: ProfileView,
    history: Vec<ExchangeView>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
struct UpdateUserRequest {
    display_name: Option<String>,
    #[serde(default)]
    #[schema(value_type = Object)]
    attributes: Map<String, Value>,
}

#[derive(Debug, Deserialize, ToSchema)]
struct RememberRequest {
    #[schema(value_type = Object)]
    fields: Map<String, Value>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
struct LearningView {
    key: String,
    #[schema(value_type = Object)]
    fields: Map<String, Value>,
    updated_at: String,
}

impl LearningView {
    fn new(key: &str, record: LearningRecord) -> Self {
        Self {
            key: key.to_string(),
            fields: record.fields,
            updated_at: record.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
struct CodeRequestBody {
    language: String,
    description: String,
}

#[derive(Debug, Serialize, ToSchema)]
struct CodeRequestView {
    language: String,
    description: String,
    timestamp: String,
}

impl From<CodeRequest> for CodeRequestView {
    fn from(request: CodeRequest) -> Self {
        Self {
            language: request.language,
            description: request.description,
            timestamp: request.timestamp.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
struct ContextResponse {
    context: String,
}

#[derive(Debug, Serialize, ToSchema)]
struct StatsResponse {
    users: usize,
    conversations: usize,
    learnings: usize,
    code_requests: usize,
    max_conversations: usize,
    context_window: usize,
}

#[derive(Debug, Serialize, ToSchema)]
struct HealthResponse {
    status: String,
    provider: String,
    uptime_secs: u64,
}

#[derive(Debug, Serialize, ToSchema)]
struct ErrorResponse {
    error: String,
}

/// Handler error rendered as `{ "error": ... }`
#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: e.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                error: self.message,
            }),
        )
            .into_response()
    }
}

#[derive(Parser, Clone)]
#[command(author, version, about = "Aria - chat assistant with conversational memory")]
struct Args {
    /// Path of the memory document (overrides ARIA_DATA_PATH)
    #[arg(long, global = true)]
    data_path: Option<PathBuf>,
    /// Keep memory in process only; nothing is written to disk
    #[arg(long, global = true)]
    ephemeral: bool,
    #[command(subcommand)]
    command: Option<CliCommand>,
}

#[derive(Subcommand, Clone)]
enum CliCommand {
    /// Start the Aria server (default)
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,
        /// Address to bind
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },
    /// Send one message and print the reply (no server)
    Chat {
        /// User id to chat as
        #[arg(short, long, default_value = "cli")]
        user: String,
        /// The message to send
        message: String,
    },
    /// Print a user's profile and recent history as JSON
    Inspect {
        /// User id to inspect
        user: String,
    },
}

// === OpenAPI Definition ===

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Aria API",
        version = "1.0.0",
        description = "Chat endpoint and conversational memory for Aria"
    ),
    paths(
        chat,
        get_user,
        update_user,
        get_context,
        get_code_history,
        record_code_request,
        get_learning,
        remember,
        get_stats,
        health
    ),
    components(schemas(
        ChatApiRequest,
        ChatApiResponse,
        ProfileView,
        ExchangeView,
        UserResponse,
        UpdateUserRequest,
        ContextResponse,
        RememberRequest,
        LearningView,
        CodeRequestBody,
        CodeRequestView,
        StatsResponse,
        HealthResponse,
        ErrorResponse
    )),
    tags(
        (name = "chat", description = "Chat with the assistant"),
        (name = "memory", description = "Users and conversation history"),
        (name = "system", description = "Health and statistics")
    )
)]
struct ApiDoc;

// === API Handlers ===

/// Send a message and get a reply
#[utoipa::path(
    post,
    path = "/api/v1/chat",
    tag = "chat",
    request_body = ChatApiRequest,
    responses(
        (status = 200, description = "Reply and updated profile", body = ChatApiResponse),
        (status = 400, description = "Missing or invalid userId/message", body = ErrorResponse)
    )
)]
async fn chat(
    State(state): State<SharedState>,
    Json(req): Json<ChatApiRequest>,
) -> Result<Json<ChatApiResponse>, ApiError> {
    let outcome = state
        .chat
        .handle(ChatRequest::new(req.user_id, req.message))
        .await?;

    let source = match outcome.source {
        ReplySource::Provider => "provider",
        ReplySource::Rules => "rules",
        ReplySource::Fallback => "fallback",
    };

    Ok(Json(ChatApiResponse {
        response: outcome.response,
        source: source.to_string(),
        user: outcome.profile.into(),
        diagnostic: outcome.diagnostic,
    }))
}

/// Get a user's profile and recent history
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    tag = "memory",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "Profile and recent exchanges", body = UserResponse),
        (status = 404, description = "Unknown user", body = ErrorResponse)
    )
)]
async fn get_user(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    let memory = state.chat.memory().lock().await;
    let profile = memory
        .profile(&id)
        .cloned()
        .ok_or_else(|| ApiError::not_found(format!("Unknown user: {}", id)))?;

    Ok(Json(UserResponse {
        profile: profile.into(),
        history: memory
            .recent_for(&id, None)
            .into_iter()
            .map(ExchangeView::from)
            .collect(),
    }))
}

/// Update a user's profile (partial merge)
#[utoipa::path(
    patch,
    path = "/api/v1/users/{id}",
    tag = "memory",
    params(("id" = String, Path, description = "User id")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Merged profile", body = ProfileView),
        (status = 400, description = "Invalid user id", body = ErrorResponse)
    )
)]
async fn update_user(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<ProfileView>, ApiError> {
    let id = state.chat.validate_user_id(&id)?;

    let patch = ProfilePatch {
        display_name: req.display_name,
        attributes: req.attributes,
    };
    let outcome = state.chat.memory().lock().await.update_profile(&id, patch).await;
    Ok(Json(outcome.value.into()))
}

/// Get the context block the provider would receive for a user
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}/context",
    tag = "memory",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "Rendered context, empty without history", body = ContextResponse)
    )
)]
async fn get_context(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Json<ContextResponse> {
    let context = state.chat.memory().lock().await.context_for(&id);
    Json(ContextResponse { context })
}

/// List a user's recorded code-generation requests, oldest first
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}/code-history",
    tag = "memory",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "Recorded requests", body = Vec<CodeRequestView>)
    )
)]
async fn get_code_history(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Json<Vec<CodeRequestView>> {
    let history = state.chat.memory().lock().await.code_history(&id);
    Json(history.into_iter().map(CodeRequestView::from).collect())
}

/// Record a code-generation request for a user
#[utoipa::path(
    post,
    path = "/api/v1/users/{id}/code-history",
    tag = "memory",
    params(("id" = String, Path, description = "User id")),
    request_body = CodeRequestBody,
    responses(
        (status = 200, description = "Recorded request", body = CodeRequestView),
        (status = 400, description = "Invalid user id or empty fields", body = ErrorResponse)
    )
)]
async fn record_code_request(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Json(req): Json<CodeRequestBody>,
) -> Result<Json<CodeRequestView>, ApiError> {
    let id = state.chat.validate_user_id(&id)?;
    let language = req.language.trim();
    let description = req.description.trim();
    if language.is_empty() {
        return Err(ValidationError::MissingField("language").into());
    }
    if description.is_empty() {
        return Err(ValidationError::MissingField("description").into());
    }

    let outcome = state
        .chat
        .memory()
        .lock()
        .await
        .record_code_request(&id, language, description)
        .await;
    Ok(Json(outcome.value.into()))
}

/// Get a stored learning
#[utoipa::path(
    get,
    path = "/api/v1/learnings/{key}",
    tag = "memory",
    params(("key" = String, Path, description = "Learning key")),
    responses(
        (status = 200, description = "Stored fields", body = LearningView),
        (status = 404, description = "Unknown key", body = ErrorResponse)
    )
)]
async fn get_learning(
    State(state): State<SharedState>,
    Path(key): Path<String>,
) -> Result<Json<LearningView>, ApiError> {
    let memory = state.chat.memory().lock().await;
    let record = memory
        .learning(&key)
        .cloned()
        .ok_or_else(|| ApiError::not_found(format!("Unknown learning: {}", key)))?;
    Ok(Json(LearningView::new(&key, record)))
}

/// Merge fields into a learning (partial merge)
#[utoipa::path(
    post,
    path = "/api/v1/learnings/{key}",
    tag = "memory",
    params(("key" = String, Path, description = "Learning key")),
    request_body = RememberRequest,
    responses(
        (status = 200, description = "Merged learning", body = LearningView),
        (status = 400, description = "Empty key", body = ErrorResponse)
    )
)]
async fn remember(
    State(state): State<SharedState>,
    Path(key): Path<String>,
    Json(req): Json<RememberRequest>,
) -> Result<Json<LearningView>, ApiError> {
    let key = key.trim();
    if key.is_empty() {
        return Err(ValidationError::MissingField("key").into());
    }

    let outcome = state.chat.memory().lock().await.remember(key, req.fields).await;
    Ok(Json(LearningView::new(key, outcome.value)))
}

/// Memory statistics
#[utoipa::path(
    get,
    path = "/api/v1/stats",
    tag = "system",
    responses(
        (status = 200, description = "Document sizes and limits", body = StatsResponse)
    )
)]
async fn get_stats(State(state): State<SharedState>) -> Json<StatsResponse> {
    let memory = state.chat.memory().lock().await;
    let MemoryStats {
        users,
        conversations,
        learnings,
        code_requests,
    } = memory.stats();

    Json(StatsResponse {
        users,
        conversations,
        learnings,
        code_requests,
        max_conversations: memory.config().max_conversations,
        context_window: memory.config().context_window,
    })
}

/// Liveness check
#[utoipa::path(
    get,
    path = "/api/v1/health",
    tag = "system",
    responses(
        (status = 200, description = "Server is up", body = HealthResponse)
    )
)]
async fn health(State(state): State<SharedState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        provider: state.chat.provider_name().to_string(),
        uptime_secs: state.started_at.elapsed().as_secs(),
    })
}

async fn serve_openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

// === Server Entry ===

fn router(state: SharedState) -> Router {
    let user_routes = Router::new()
        .route("/:id", get(get_user).patch(update_user))
        .route("/:id/context", get(get_context))
        .route(
            "/:id/code-history",
            get(get_code_history).post(record_code_request),
        );

    Router::new()
        .route("/api/v1/chat", post(chat))
        .nest("/api/v1/users", user_routes)
        .route("/api/v1/learnings/:key", get(get_learning).post(remember))
        .route("/api/v1/stats", get(get_stats))
        .route("/api/v1/health", get(health))
        .route("/api/v1/openapi.json", get(serve_openapi))
        .with_state(state)
}

async fn open_memory(args: &Args) -> ChatMemory {
    let mut config = MemoryConfig::from_env();
    if let Some(path) = &args.data_path {
        config.data_path = path.clone();
    }

    let store: Arc<dyn DocumentStore> = if args.ephemeral {
        Arc::new(InMemoryStore::new())
    } else {
        Arc::new(JsonFileStore::new(config.data_path.clone()))
    };
    ChatMemory::open(store, config).await
}

fn build_service(memory: ChatMemory) -> ChatService {
    let provider = LlmCompletionProvider::from_env()
        .map(|p| Arc::new(p) as Arc<dyn CompletionProvider>);
    ChatService::new(memory, provider, ChatConfig::from_env())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
    }
}

pub async fn run_server(service: ChatService, host: &str, port: u16) -> anyhow::Result<()> {
    let state: SharedState = Arc::new(AppState {
        chat: service,
        started_at: Instant::now(),
    });

    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", host, port))?;

    println!("🚀 Aria Server running at http://{}", addr);
    println!("   API v1 Routes:");
    println!("   Chat:    /api/v1/chat (POST)");
    println!("   Users:   /api/v1/users/:id (GET, PATCH), /:id/context, /:id/code-history");
    println!("   Learn:   /api/v1/learnings/:key (GET, POST)");
    println!("   System:  /api/v1/stats, /health, /openapi.json");

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, router(state.clone()))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutting down, flushing memory");
    if let Err(e) = state.chat.memory().lock().await.flush().await {
        tracing::warn!("Final memory flush failed: {}", e);
    }
    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    init_tracing();

    let args = Args::parse();
    let memory = open_memory(&args).await;

    match args.command.clone() {
        Some(CliCommand::Chat { user, message }) => {
            let service = build_service(memory);
            let outcome = service
                .handle(ChatRequest::new(user, message))
                .await
                .context("Message rejected")?;
            println!("{}", outcome.response);
            if let Some(diagnostic) = outcome.diagnostic {
                tracing::warn!("{}", diagnostic);
            }
            Ok(())
        }
        Some(CliCommand::Inspect { user }) => {
            let profile = memory
                .profile(&user)
                .cloned()
                .with_context(|| format!("Unknown user: {}", user))?;
            let view = UserResponse {
                profile: profile.into(),
                history: memory
                    .recent_for(&user, None)
                    .into_iter()
                    .map(ExchangeView::from)
                    .collect(),
            };
            println!("{}", serde_json::to_string_pretty(&view)?);
            Ok(())
        }
        Some(CliCommand::Serve { port, host }) => {
            run_server(build_service(memory), &host, port).await
        }
        None => run_server(build_service(memory), "127.0.0.1", 3000).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_state() -> SharedState {
        let memory =
            ChatMemory::open(Arc::new(InMemoryStore::new()), MemoryConfig::default()).await;
        Arc::new(AppState {
            chat: ChatService::new(memory, None, ChatConfig::default()),
            started_at: Instant::now(),
        })
    }

    fn chat_request(user_id: &str, message: &str) -> Json<ChatApiRequest> {
        Json(ChatApiRequest {
            user_id: user_id.to_string(),
            message: message.to_string(),
        })
    }

    #[tokio::test]
    async fn test_chat_creates_user() {
        let state = test_state().await;

        let Json(resp) = chat(State(state.clone()), chat_request("u1", "merhaba"))
            .await
            .unwrap();
        assert_eq!(resp.source, "rules");
        assert_eq!(resp.user.id, "u1");
        assert_eq!(resp.user.interaction_count, 1);
        assert!(resp.diagnostic.is_none());

        let Json(user) = get_user(State(state), Path("u1".to_string()))
            .await
            .unwrap();
        assert_eq!(user.history.len(), 1);
        assert_eq!(user.history[0].message, "merhaba");
    }

    #[tokio::test]
    async fn test_chat_rejects_empty_message() {
        let state = test_state().await;
        let err = chat(State(state), chat_request("u1", "   "))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "message is required");
    }

    #[tokio::test]
    async fn test_unknown_user_is_404() {
        let state = test_state().await;
        let err = get_user(State(state), Path("ghost".to_string()))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_update_user_merges() {
        let state = test_state().await;
        let mut attributes = Map::new();
        attributes.insert("language".to_string(), Value::from("tr"));

        let Json(first) = update_user(
            State(state.clone()),
            Path("u1".to_string()),
            Json(UpdateUserRequest {
                display_name: Some("Deniz".to_string()),
                attributes,
            }),
        )
        .await
        .unwrap();
        assert_eq!(first.display_name, "Deniz");

        let Json(second) = update_user(
            State(state),
            Path("u1".to_string()),
            Json(UpdateUserRequest {
                display_name: None,
                attributes: Map::new(),
            }),
        )
        .await
        .unwrap();
        assert_eq!(second.display_name, "Deniz");
        assert_eq!(second.attributes["language"], Value::from("tr"));
        assert_eq!(second.interaction_count, 0);
    }

    #[tokio::test]
    async fn test_update_user_rejects_overlong_id() {
        let state = test_state().await;
        let err = update_user(
            State(state.clone()),
            Path("u".repeat(129)),
            Json(UpdateUserRequest {
                display_name: Some("Deniz".to_string()),
                attributes: Map::new(),
            }),
        )
        .await
        .unwrap_err();

        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "userId exceeds 128 characters");
        let Json(stats) = get_stats(State(state)).await;
        assert_eq!(stats.users, 0);
    }

    #[tokio::test]
    async fn test_learnings_and_code_history_routes() {
        let state = test_state().await;

        let mut fields = Map::new();
        fields.insert("favorite".to_string(), Value::from("rust"));
        let Json(learned) = remember(
            State(state.clone()),
            Path("u1:language".to_string()),
            Json(RememberRequest { fields }),
        )
        .await
        .unwrap();
        assert_eq!(learned.fields["favorite"], Value::from("rust"));

        let Json(stored) = get_learning(State(state.clone()), Path("u1:language".to_string()))
            .await
            .unwrap();
        assert_eq!(stored.key, "u1:language");
        let missing = get_learning(State(state.clone()), Path("nope".to_string())).await;
        assert_eq!(missing.unwrap_err().status, StatusCode::NOT_FOUND);

        let Json(recorded) = record_code_request(
            State(state.clone()),
            Path("u1".to_string()),
            Json(CodeRequestBody {
                language: "rust".to_string(),
                description: " a tokenizer ".to_string(),
            }),
        )
        .await
        .unwrap();
        assert_eq!(recorded.description, "a tokenizer");

        let empty = record_code_request(
            State(state.clone()),
            Path("u1".to_string()),
            Json(CodeRequestBody {
                language: "rust".to_string(),
                description: "  ".to_string(),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(empty.message, "description is required");

        let Json(history) = get_code_history(State(state.clone()), Path("u1".to_string())).await;
        assert_eq!(history.len(), 1);

        let Json(stats) = get_stats(State(state)).await;
        assert_eq!(stats.learnings, 1);
        assert_eq!(stats.code_requests, 1);
    }

    #[tokio::test]
    async fn test_context_and_stats() {
        let state = test_state().await;
        let Json(empty) = get_context(State(state.clone()), Path("u1".to_string())).await;
        assert_eq!(empty.context, "");

        let Json(reply) = chat(State(state.clone()), chat_request("u1", "hello"))
            .await
            .unwrap();
        assert_eq!(reply.user.interaction_count, 1);
        let Json(ctx) = get_context(State(state.clone()), Path("u1".to_string())).await;
        assert!(ctx.context.starts_with("User: hello\nAssistant: "));

        let Json(stats) = get_stats(State(state.clone())).await;
        assert_eq!(stats.users, 1);
        assert_eq!(stats.conversations, 1);
        assert_eq!(stats.max_conversations, 100);

        let Json(h) = health(State(state)).await;
        assert_eq!(h.status, "ok");
        assert_eq!(h.provider, "rules");
    }

    #[test]
    fn test_openapi_lists_routes() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/v1/chat"));
        assert!(doc.paths.paths.contains_key("/api/v1/users/{id}"));
        assert!(doc.paths.paths.contains_key("/api/v1/users/{id}/code-history"));
        assert!(doc.paths.paths.contains_key("/api/v1/learnings/{key}"));
    }

    #[test]
    fn test_cli_parses_chat() {
        let args = Args::parse_from(["aria", "--ephemeral", "chat", "-u", "u1", "merhaba"]);
        assert!(args.ephemeral);
        assert!(matches!(
            args.command,
            Some(CliCommand::Chat { ref user, ref message }) if user == "u1" && message == "merhaba"
        ));
    }
}
