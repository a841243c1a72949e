use actix_web::{web, App, HttpResponse, HttpServer, Result as ActixResult};
use actix_cors::Cors;
use celebmatch_core::{DisplayNames, Error, UserMatcher};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

/// Everything a request handler needs, built once at startup.
pub struct ApiContext {
    pub matcher: UserMatcher,
    pub names: DisplayNames,
    pub top_n: usize,
}

#[derive(Deserialize)]
struct MatchRequest {
    username: String,
}

#[derive(Serialize)]
struct MatchEntry {
    username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    similarity: f32,
}

#[derive(Serialize)]
struct MatchResponse {
    username: String,
    results: Vec<MatchEntry>,
}

#[derive(Deserialize)]
struct CompareRequest {
    first: String,
    second: String,
}

#[derive(Serialize)]
struct CompareResponse {
    first: String,
    second: String,
    similarity: f32,
}

pub struct RestApi;

impl RestApi {
    pub async fn start(ctx: Arc<ApiContext>, port: u16) -> std::io::Result<()> {
        HttpServer::new(move || {
            let cors = Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header()
                .max_age(3600);

            App::new()
                .wrap(cors)
                .app_data(web::Data::new(ctx.clone()))
                .route("/", web::get().to(root))
                .route("/results", web::post().to(top_matches))
                .route("/compare", web::post().to(compare))
        })
        .bind(("0.0.0.0", port))?
        .run()
        .await
    }
}

async fn root() -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Welcome to the celebmatch API"
    })))
}

async fn top_matches(
    ctx: web::Data<Arc<ApiContext>>,
    req: web::Json<MatchRequest>,
) -> ActixResult<HttpResponse> {
    let username = req.into_inner().username;

    match ctx.matcher.top_matches(&username, ctx.top_n).await {
        Ok(entries) => {
            let results = entries
                .into_iter()
                .map(|entry| MatchEntry {
                    name: ctx.names.get(&entry.candidate).map(str::to_string),
                    similarity: round4(entry.score),
                    username: entry.candidate,
                })
                .collect();
            Ok(HttpResponse::Ok().json(MatchResponse { username, results }))
        }
        Err(e) => Ok(error_response(&e)),
    }
}

async fn compare(
    ctx: web::Data<Arc<ApiContext>>,
    req: web::Json<CompareRequest>,
) -> ActixResult<HttpResponse> {
    let req = req.into_inner();

    match ctx.matcher.compare(&req.first, &req.second).await {
        Ok(result) => Ok(HttpResponse::Ok().json(CompareResponse {
            first: result.subject,
            second: result.candidate,
            similarity: round4(result.score),
        })),
        Err(e) => Ok(error_response(&e)),
    }
}

/// Resolution-level failures are the caller's problem; everything else is
/// ours.
fn error_response(error: &Error) -> HttpResponse {
    warn!(%error, "request failed");
    let body = serde_json::json!({ "error": error.to_string() });
    match error {
        Error::NotFound(_)
        | Error::NoContent(_)
        | Error::Resolution { .. }
        | Error::InsufficientData { .. } => HttpResponse::BadRequest().json(body),
        _ => HttpResponse::InternalServerError().json(body),
    }
}

fn round4(score: f32) -> f32 {
    (score * 10_000.0).round() / 10_000.0
}
