use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Html;
use axum::routing::get;
use axum::Json;
use handlebars::Handlebars;

use crate::config::ViewerConfig;
use crate::error::UiError;
use crate::exporters::d3js::Node;

const INDEX_TEMPLATE: &str = "index";

/// Serves the treemap viewer until the process is killed.
pub fn serve(treemap_data: Node, config: &ViewerConfig) -> Result<(), UiError> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_io()
        .build()?;

    rt.block_on(serve_impl(treemap_data, config))
}

#[derive(Debug, Clone)]
struct UiState {
    treemap_data: Arc<Node>,
    title: Arc<str>,
    handlebars: Arc<Handlebars<'static>>,
}

impl UiState {
    fn new(treemap_data: Node, title: &str) -> Result<Self, UiError> {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(true);
        handlebars.register_template_string(INDEX_TEMPLATE, include_str!("../static/index.hbs"))?;

        Ok(Self {
            treemap_data: Arc::new(treemap_data),
            title: Arc::from(title),
            handlebars: Arc::new(handlebars),
        })
    }
}

async fn serve_impl(treemap_data: Node, config: &ViewerConfig) -> Result<(), UiError> {
    let app = axum::Router::new()
        .route("/__debug__", get(debug_treemap_data))
        .route("/__data__", get(data_handler))
        .route("/", get(page_handler))
        .with_state(UiState::new(treemap_data, &config.title)?);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!("listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}

#[derive(serde_derive::Serialize)]
struct HbsData<'a> {
    title: &'a str,
}

async fn page_handler(State(state): State<UiState>) -> Result<Html<String>, (StatusCode, String)> {
    state
        .handlebars
        .render(INDEX_TEMPLATE, &HbsData { title: &state.title })
        .map(Html)
        .map_err(|err| {
            tracing::warn!(%err, "failed to render index page");
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        })
}

async fn data_handler(State(state): State<UiState>) -> Json<Node> {
    Json(state.treemap_data.as_ref().clone())
}

async fn debug_treemap_data(State(state): State<UiState>) -> Html<String> {
    Html(format!(
        "<pre>{}</pre>",
        handlebars::html_escape(&format!("{:#?}", state.treemap_data))
    ))
}
