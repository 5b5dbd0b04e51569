//! HTTP request handlers
//!
//! Every interaction restores the user's controller from the session cookie,
//! applies one operation and writes the new session back.

use super::state::AppState;
use crate::engines::{build_proxy_url, ProxyTemplate};
use crate::launch::RedirectNavigator;
use crate::metrics::LaunchOutcome;
use crate::query::Target;
use crate::session::{cookie_value, set_cookie, SessionState, SESSION_COOKIE};
use crate::theme::{self, MemoryThemeStore, ThemeError, THEME_KEY, THEME_OPTIONS};
use crate::ui::{
    content, AppController, FallbackAction, Launch, LaunchError, Level, Notification,
    SettingsSection, View,
};
use axum::{
    extract::{Form, Path, Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tera::Context;
use tracing::{debug, error};

/// Session cookie lifetime
const SESSION_MAX_AGE: u64 = 60 * 60 * 24 * 30;
/// Theme cookie lifetime
const THEME_MAX_AGE: u64 = 60 * 60 * 24 * 365;
/// Notifications carried between requests; older ones are dropped
pub(crate) const MAX_FLASH: usize = 8;

/// Query parameters for a launch
#[derive(Debug, Deserialize)]
pub struct GoParams {
    /// URL or search term
    pub q: Option<String>,
    /// Engine to select before launching
    pub engine: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EngineParams {
    pub engine: String,
}

#[derive(Debug, Deserialize)]
pub struct ThemeForm {
    pub theme: String,
}

#[derive(Debug, Deserialize)]
pub struct ResolveParams {
    pub q: String,
    pub engine: Option<String>,
}

/// Answer of `/api/resolve`
#[derive(Debug, Serialize)]
pub struct ResolveResponse {
    pub target: Target,
    pub engine: String,
    pub template: ProxyTemplate,
    pub proxy_url: String,
}

#[derive(Debug, Serialize)]
struct SectionEntry {
    id: &'static str,
    title: &'static str,
    icon: &'static str,
    available: bool,
}

#[derive(Debug, Serialize)]
struct ActionEntry {
    id: FallbackAction,
    label: &'static str,
}

#[derive(Debug, Serialize)]
struct ThemeEntry {
    id: String,
    name: String,
    description: String,
}

#[derive(Debug, Serialize)]
struct QuickLinkEntry<'a> {
    index: usize,
    name: &'a str,
    icon: &'a str,
    url: &'a str,
}

/// Rebuild the requesting user's controller from the session cookie
fn restore(state: &AppState, headers: &HeaderMap) -> AppController {
    let SessionState { ui, flash } = state.sessions.load(headers);

    let mut app = AppController::restore(state.catalog.clone(), ui)
        .with_search_provider(state.settings.search.provider)
        .with_fallback_ttl(state.fallback_ttl())
        .with_themes(state.settings.ui.themes.clone());
    for notification in flash {
        app.push_notification(notification);
    }
    app
}

/// Attach the controller's state to the response as the new session cookie.
/// Undelivered notifications become the next page's flash, newest
/// `MAX_FLASH` only.
fn commit(state: &AppState, app: AppController, mut response: Response) -> Response {
    let (ui, mut flash) = app.into_parts();
    if flash.len() > MAX_FLASH {
        flash.drain(..flash.len() - MAX_FLASH);
    }
    match state.sessions.encode(&SessionState { ui, flash }) {
        Ok(value) => {
            let cookie = set_cookie(SESSION_COOKIE, &value, SESSION_MAX_AGE);
            match HeaderValue::from_str(&cookie) {
                Ok(value) => {
                    response.headers_mut().append(header::SET_COOKIE, value);
                }
                Err(e) => error!("Invalid session cookie: {}", e),
            }
        }
        Err(e) => error!("Failed to encode session: {}", e),
    }
    response
}

fn back_home(state: &AppState, app: AppController) -> Response {
    commit(state, app, Redirect::to("/").into_response())
}

fn render(state: &AppState, template: &str, ctx: &Context) -> Response {
    match state.templates.render_with_context(template, ctx) {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            error!("Template error: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Template error").into_response()
        }
    }
}

/// Theme currently stored in the request's cookie, if still offered
fn current_theme(state: &AppState, headers: &HeaderMap) -> String {
    theme::active_theme(
        cookie_value(headers, THEME_KEY),
        &state.settings.ui.themes,
        &state.settings.ui.default_theme,
    )
}

fn theme_entries(state: &AppState) -> Vec<ThemeEntry> {
    state
        .settings
        .ui
        .themes
        .iter()
        .map(|id| match THEME_OPTIONS.iter().find(|t| t.id == id.as_str()) {
            Some(option) => ThemeEntry {
                id: id.clone(),
                name: option.name.to_string(),
                description: option.description.to_string(),
            },
            None => ThemeEntry {
                id: id.clone(),
                name: theme::display_name(id),
                description: String::new(),
            },
        })
        .collect()
}

/// Values every page needs
fn page_context(state: &AppState, headers: &HeaderMap) -> Context {
    let mut ctx = Context::new();
    ctx.insert("instance_name", state.instance_name());
    ctx.insert("version", crate::VERSION);
    ctx.insert("theme", &current_theme(state, headers));
    ctx.insert("base_url", &state.settings.server.base_url);
    ctx.insert("show_stats", &state.settings.general.enable_metrics);
    ctx.insert("notifications", &Vec::<Notification>::new());
    ctx.insert(
        "notification_ttl_ms",
        &(state.settings.ui.notification_ttl_secs * 1000),
    );
    ctx
}

/// Page context that also delivers the user's pending notifications
fn session_context(state: &AppState, headers: &HeaderMap, app: &mut AppController) -> Context {
    let mut ctx = page_context(state, headers);
    ctx.insert("notifications", &app.take_notifications());
    ctx
}

/// Home page handler: renders the session's current view
pub async fn index(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let mut app = restore(&state, &headers);
    let mut ctx = session_context(&state, &headers, &mut app);

    let ui = app.state().clone();
    let sections: Vec<SectionEntry> = SettingsSection::ALL
        .iter()
        .map(|s| SectionEntry {
            id: s.id(),
            title: s.title(),
            icon: s.icon(),
            available: s.is_available(),
        })
        .collect();
    let quick_links: Vec<QuickLinkEntry> = state
        .settings
        .ui
        .quick_links
        .iter()
        .enumerate()
        .map(|(index, link)| QuickLinkEntry {
            index,
            name: &link.name,
            icon: &link.icon,
            url: &link.url,
        })
        .collect();

    ctx.insert("view", ui.view.as_str());
    ctx.insert("settings_open", &ui.settings_open);
    ctx.insert("settings_section", ui.settings_section.id());
    ctx.insert("sections", &sections);
    ctx.insert("engines", &app.registry().list());
    ctx.insert("current_engine", app.registry().current_id());
    ctx.insert("engine_description", app.engine_description());
    ctx.insert("themes", &theme_entries(&state));
    ctx.insert("quick_links", &quick_links);
    ctx.insert("featured_apps", content::FEATURED_APPS);
    ctx.insert("changelog", content::CHANGELOG);
    ctx.insert("patch_notes", content::PATCH_NOTES);
    ctx.insert("faq", content::FAQ);
    ctx.insert("team", content::TEAM);
    ctx.insert("cloak_presets", content::CLOAK_PRESETS);
    ctx.insert("build", content::BUILD);
    ctx.insert("last_updated", content::LAST_UPDATED);

    let response = render(&state, ui.view.template(), &ctx);
    commit(&state, app, response)
}

/// Switch the active view
pub async fn set_view(
    State(state): State<AppState>,
    Path(view): Path<String>,
    headers: HeaderMap,
) -> Response {
    let mut app = restore(&state, &headers);
    app.set_view(View::from(view));
    back_home(&state, app)
}

pub async fn toggle_settings(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let mut app = restore(&state, &headers);
    app.toggle_settings_panel();
    back_home(&state, app)
}

pub async fn close_settings(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let mut app = restore(&state, &headers);
    app.close_settings_panel();
    back_home(&state, app)
}

pub async fn settings_section(
    State(state): State<AppState>,
    Path(section): Path<String>,
    headers: HeaderMap,
) -> Response {
    let mut app = restore(&state, &headers);
    match SettingsSection::parse(&section) {
        Some(section) => app.open_settings_section(section),
        None => debug!("Ignoring unknown settings section: {}", section),
    }
    back_home(&state, app)
}

fn select_engine(state: &AppState, headers: &HeaderMap, engine: &str) -> Response {
    let mut app = restore(state, headers);
    // Unknown ids leave the selection unchanged
    let _ = app.set_engine(engine);
    back_home(state, app)
}

pub async fn select_engine_query(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<EngineParams>,
) -> Response {
    select_engine(&state, &headers, &params.engine)
}

pub async fn select_engine_form(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(params): Form<EngineParams>,
) -> Response {
    select_engine(&state, &headers, &params.engine)
}

/// Turn a launch result into a response: a redirect to the proxy, the
/// fallback page, or back home with a notification
fn finish_launch(
    state: &AppState,
    headers: &HeaderMap,
    mut app: AppController,
    result: Result<Launch, LaunchError>,
) -> Response {
    match result {
        Ok(launch) => {
            state
                .metrics
                .record_launch(&launch.engine, LaunchOutcome::Opened);
            // Only warnings and errors outlive a redirect
            for notification in app.take_notifications() {
                if matches!(notification.level, Level::Warning | Level::Error) {
                    app.push_notification(notification);
                }
            }
            let response = Redirect::to(&launch.proxy_url).into_response();
            commit(state, app, response)
        }
        Err(LaunchError::EmptyInput) => {
            state.metrics.record_empty_input();
            back_home(state, app)
        }
        Err(LaunchError::PopupBlocked { offer }) => {
            state
                .metrics
                .record_launch(&offer.engine, LaunchOutcome::Blocked);
            let mut ctx = session_context(state, headers, &mut app);
            ctx.insert("offer", &offer);
            ctx.insert("engine", state.catalog.get(&offer.engine));
            let actions: Vec<ActionEntry> = offer
                .actions
                .iter()
                .map(|&id| ActionEntry {
                    id,
                    label: id.label(),
                })
                .collect();
            ctx.insert("actions", &actions);
            ctx.insert("expires_in", &offer.remaining_secs(chrono::Utc::now()));
            let response = render(state, "launch.html", &ctx);
            commit(state, app, response)
        }
        Err(LaunchError::OpenFailed { .. }) => {
            state
                .metrics
                .record_launch(app.registry().current_id(), LaunchOutcome::Failed);
            back_home(state, app)
        }
    }
}

/// Submit a URL or search term
pub async fn go(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<GoParams>,
) -> Response {
    if !state.allow_launch() {
        return (StatusCode::TOO_MANY_REQUESTS, "Too many launches, slow down").into_response();
    }

    let mut app = restore(&state, &headers);
    if let Some(ref engine) = params.engine {
        let _ = app.set_engine(engine);
    }

    let navigator = RedirectNavigator::new(state.settings.launch.auto_redirect);
    let result = app.submit_search(params.q.as_deref().unwrap_or_default(), &navigator);
    finish_launch(&state, &headers, app, result)
}

/// Launch one of the configured quick links
pub async fn quick_link(
    State(state): State<AppState>,
    Path(index): Path<usize>,
    headers: HeaderMap,
) -> Response {
    let Some(link) = state.settings.ui.quick_links.get(index) else {
        return (StatusCode::NOT_FOUND, "Unknown quick link").into_response();
    };
    if !state.allow_launch() {
        return (StatusCode::TOO_MANY_REQUESTS, "Too many launches, slow down").into_response();
    }

    let mut app = restore(&state, &headers);
    let navigator = RedirectNavigator::new(state.settings.launch.auto_redirect);
    let result = app.launch_quick_link(&link.url, &navigator);
    finish_launch(&state, &headers, app, result)
}

/// Persist the theme in its own long-lived cookie
pub async fn select_theme(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<ThemeForm>,
) -> Response {
    let mut app = restore(&state, &headers);
    let store = MemoryThemeStore::new(cookie_value(&headers, THEME_KEY).map(str::to_string));

    let mut response = Redirect::to("/").into_response();
    match app.select_theme(&form.theme, &store) {
        Ok(()) => {
            if let Some(saved) = store.saved() {
                let cookie = set_cookie(THEME_KEY, &saved, THEME_MAX_AGE);
                if let Ok(value) = HeaderValue::from_str(&cookie) {
                    response.headers_mut().append(header::SET_COOKIE, value);
                }
            }
        }
        Err(ThemeError::Unknown(theme)) => debug!("Ignoring unknown theme: {}", theme),
        Err(e) => error!("Failed to save theme: {}", e),
    }
    commit(&state, app, response)
}

/// Engine catalog as JSON
pub async fn api_engines(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "default": state.catalog.default_engine().id,
        "engines": state.catalog.iter().collect::<Vec<_>>(),
    }))
}

/// One engine; unknown ids answer with the default engine
pub async fn api_engine(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    Json(state.catalog.get(&id).clone())
}

/// Reachability of one engine
pub async fn api_engine_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    let Some(engine) = state.catalog.find(&id) else {
        return (StatusCode::NOT_FOUND, "Unknown engine").into_response();
    };

    let mut report = state.probe.cached(&id).await;
    if state.settings.probe.enabled && report.checked_at.is_none() {
        report = state.probe.check(engine).await;
    }
    Json(report).into_response()
}

/// Show what a launch would open without opening it. The engine id is
/// used as given, so unknown ids show the fallback template.
pub async fn api_resolve(
    State(state): State<AppState>,
    Query(params): Query<ResolveParams>,
) -> Response {
    let target = match Target::resolve(&params.q, state.settings.search.provider) {
        Ok(target) => target,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    };

    let engine = params
        .engine
        .unwrap_or_else(|| state.catalog.default_engine().id.clone());
    let template = ProxyTemplate::for_engine(&engine);
    let proxy_url = build_proxy_url(&engine, &target.url);

    Json(ResolveResponse {
        target,
        engine,
        template,
        proxy_url,
    })
    .into_response()
}

/// Launch and probe counters as JSON
pub async fn api_stats(State(state): State<AppState>) -> Response {
    if !state.settings.general.enable_metrics {
        return StatusCode::NOT_FOUND.into_response();
    }
    Json(serde_json::json!({
        "total_launches": state.metrics.get_total_launches(),
        "empty_inputs": state.metrics.get_empty_inputs(),
        "engines": state.metrics.get_engine_stats(),
    }))
    .into_response()
}

/// Stats page handler
pub async fn stats(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if !state.settings.general.enable_metrics {
        return StatusCode::NOT_FOUND.into_response();
    }
    let mut ctx = page_context(&state, &headers);
    ctx.insert("engines", &state.catalog.iter().collect::<Vec<_>>());
    ctx.insert("engine_stats", &state.metrics.get_engine_stats());
    ctx.insert("total_launches", &state.metrics.get_total_launches());
    ctx.insert("empty_inputs", &state.metrics.get_empty_inputs());

    render(&state, "stats.html", &ctx)
}

/// Health check handler
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": crate::VERSION
    }))
}

/// Robots.txt handler
pub async fn robots_txt(State(state): State<AppState>) -> impl IntoResponse {
    let content = if state.is_public() {
        "User-agent: *\nAllow: /\nDisallow: /go\nDisallow: /quick\nDisallow: /api\n"
    } else {
        "User-agent: *\nDisallow: /\n"
    };
    ([(header::CONTENT_TYPE, "text/plain")], content)
}

/// Favicon handler
pub async fn favicon() -> impl IntoResponse {
    StatusCode::NO_CONTENT
}
