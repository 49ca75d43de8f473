use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::admin::auth::Caller;
use crate::editor::{EditableSection, SectionEditor, SubmitOutcome};
use crate::http::handlers::LoginQuery;
use crate::http::response::ApiError;
use crate::http::server::AppState;
use crate::preview::{render_login, LoginView, PreviewStore};
use crate::session::{AdminSession, SessionError, SessionSnapshot};
use crate::site::schema::UnknownSection;
use crate::site::{AuthPolicy, Branding, Section, SiteConfig, SiteInfo, Theme};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub email: String,
    #[serde(flatten)]
    pub snapshot: SessionSnapshot,
    pub preview_active: bool,
}

#[derive(Serialize)]
pub struct SaveResponse {
    /// `saved` or `unchanged`.
    pub status: &'static str,
    pub config: Option<SiteConfig>,
}

#[derive(Serialize)]
pub struct PreviewUpdate {
    pub updated: bool,
}

fn session_view(state: &AppState, caller: &Caller, session: &AdminSession) -> SessionView {
    SessionView {
        email: caller.email.clone(),
        snapshot: session.snapshot(),
        preview_active: state.preview_for(&caller.email).is_some(),
    }
}

pub async fn get_session(State(state): State<AppState>, Extension(caller): Extension<Caller>) -> Json<SessionView> {
    let session = state.session_for(&caller).await;
    Json(session_view(&state, &caller, &session))
}

pub async fn initialize(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
) -> Result<Json<SessionView>, ApiError> {
    let session = state.session_for(&caller).await;
    session.initialize().await?;
    Ok(Json(session_view(&state, &caller, &session)))
}

pub async fn reload(State(state): State<AppState>, Extension(caller): Extension<Caller>) -> Json<SessionView> {
    let session = state.session_for(&caller).await;
    session.refresh().await;
    Json(session_view(&state, &caller, &session))
}

/// Run the section editor over a submitted section and save it.
pub async fn put_section(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(section): Path<String>,
    body: Bytes,
) -> Result<Json<SaveResponse>, ApiError> {
    let section: Section = section
        .parse()
        .map_err(|e: UnknownSection| ApiError::NotFound(e.to_string()))?;
    let body: Value = serde_json::from_slice(&body)
        .map_err(|e| ApiError::BadRequest(format!("invalid JSON body: {}", e)))?;
    let session = state.session_for(&caller).await;
    let preview = state.preview_for(&caller.email);

    let outcome = match section {
        Section::Site => submit_section::<SiteInfo>(&session, preview, body).await?,
        Section::Branding => submit_section::<Branding>(&session, preview, body).await?,
        Section::Theme => submit_section::<Theme>(&session, preview, body).await?,
        Section::Auth => submit_section::<AuthPolicy>(&session, preview, body).await?,
    };

    let status = match outcome {
        SubmitOutcome::Unchanged => "unchanged",
        SubmitOutcome::Saved(_) => "saved",
    };
    tracing::info!(email = %caller.email, section = %section, status, "Section submitted");
    Ok(Json(SaveResponse {
        status,
        config: session.config(),
    }))
}

async fn submit_section<S>(
    session: &AdminSession,
    preview: Option<PreviewStore>,
    body: Value,
) -> Result<SubmitOutcome, ApiError>
where
    S: EditableSection + DeserializeOwned,
{
    let submitted: S = serde_json::from_value(body)
        .map_err(|e| ApiError::BadRequest(format!("invalid {} section: {}", S::SECTION, e)))?;
    if !session.is_admin() {
        return Err(ApiError::Forbidden);
    }
    let config = session.config().ok_or(SessionError::NotLoaded)?;

    let mut editor = SectionEditor::<S>::from_config(&config, session.is_admin());
    if let Some(preview) = preview {
        editor = editor.with_preview(preview);
    }
    editor.edit(|draft| *draft = submitted)?;
    Ok(editor.submit(|draft| session.save_section(draft)).await?)
}

/// Seed a preview document from the session's (or the committed) document.
pub async fn enter_console(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
) -> Result<Json<SiteConfig>, ApiError> {
    let session = state.session_for(&caller).await;
    let config = match session.config() {
        Some(config) => config,
        None => state
            .committed_config()
            .await
            .ok_or_else(|| ApiError::NotFound("configuration not found".to_string()))?,
    };

    state
        .previews
        .insert(caller.email.to_lowercase(), PreviewStore::seeded(config.clone()));
    tracing::info!(email = %caller.email, revision = config.revision, "Entered console");
    Ok(Json(config))
}

pub async fn exit_console(State(state): State<AppState>, Extension(caller): Extension<Caller>) -> StatusCode {
    if state.end_session(&caller.email) {
        tracing::info!(email = %caller.email, "Exited console, session and preview discarded");
    }
    StatusCode::NO_CONTENT
}

pub async fn patch_preview(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(section): Path<String>,
    Json(body): Json<Value>,
) -> Json<PreviewUpdate> {
    let updated = state
        .preview_for(&caller.email)
        .is_some_and(|store| store.update_section_raw(&section, body));
    Json(PreviewUpdate { updated })
}

pub async fn get_preview(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
) -> Json<Option<SiteConfig>> {
    let current = state
        .preview_for(&caller.email)
        .and_then(|store| store.current())
        .map(|config| (*config).clone());
    Json(current)
}

pub async fn get_preview_login(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Query(query): Query<LoginQuery>,
) -> Result<Json<LoginView>, ApiError> {
    let preview = state.preview_for(&caller.email).and_then(|store| store.current());
    let committed = match state.committed_config().await {
        Some(config) => config,
        None => preview
            .as_deref()
            .cloned()
            .ok_or_else(|| ApiError::NotFound("configuration not found".to_string()))?,
    };
    Ok(Json(render_login(
        preview.as_deref(),
        &committed,
        query.primary.as_deref(),
    )))
}
