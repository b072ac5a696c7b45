use anyhow::Context as _;
use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{get, MethodRouter},
    Json, Router,
};
use repository::Repository;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use util::Config;
use utoipa::OpenApi;
use utoipa_redoc::{Redoc, Servable};

pub mod blog;
mod healthz;
mod not_found;
mod response;

/// Largest accepted request body, the MongoDB document size limit.
const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

#[derive(OpenApi)]
#[openapi(
    paths(
        blog::get_posts,
        blog::get_post,
        blog::create_post,
        blog::update_post,
        blog::delete_post,
    ),
    components(schemas(
        blog::response::GetPostsResponse,
        blog::response::GetPostResponse,
        blog::response::CreatePostResponse,
        blog::response::UpdatePostResponse,
        blog::response::DeletePostResponse,
    )),
    tags(
        (name = "blog", description = "Blog posts, every reply is sent with status 200")
    )
)]
struct ApiDoc;

pub fn router(
    repository: Repository,
    config: &Config,
) -> anyhow::Result<Router> {
    info!(task = "start api serving", base_path = %config.base_path);

    let origins = config
        .cors_origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .with_context(|| format!("invalid CORS origin: {origin}"))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    // blog, with and without a trailing slash
    let prefix = config.base_path.trim_end_matches('/');
    let mut blog_router = Router::new()
        .route(&format!("{prefix}/"), posts())
        .route(&format!("{prefix}/:post_id"), post())
        .route(&format!("{prefix}/:post_id/"), post());
    if !prefix.is_empty() {
        blog_router = blog_router.route(prefix, posts());
    }

    let openapi = openapi(&config.base_path);
    let router = Router::new()
        .merge(Redoc::with_url("/redoc", openapi.clone()))
        .route(
            "/api-docs/openapi.json",
            get(move || async move { Json(openapi) }),
        )
        .route("/healthz", get(healthz::get_health))
        .merge(blog_router.with_state(repository));

    Ok(router
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::new().allow_origin(origins))
        .fallback(not_found::get_404))
}

fn posts() -> MethodRouter<Repository> {
    get(blog::get_posts).post(blog::create_post)
}

fn post() -> MethodRouter<Repository> {
    get(blog::get_post)
        .put(blog::update_post)
        .delete(blog::delete_post)
}

/// The generated document with every blog path moved under `base_path`.
fn openapi(base_path: &str) -> utoipa::openapi::OpenApi {
    let mut openapi = ApiDoc::openapi();
    let prefix = base_path.trim_end_matches('/');

    openapi.paths.paths = std::mem::take(&mut openapi.paths.paths)
        .into_iter()
        .map(|(path, item)| match path.as_str() {
            "/" if !prefix.is_empty() => (prefix.to_string(), item),
            _ => (format!("{prefix}{path}"), item),
        })
        .collect();

    openapi
}
