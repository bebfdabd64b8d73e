//! Web server: JSON API over one shared bracket store.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default so the API is reachable on a VPS.
//! Override with env: HOST, PORT. Set DISCORD_WEBHOOK_URL to announce results.
//! Mutating requests name the acting admin in the `X-Admin-Id` header.

use actix_web::{
    delete, get, post, put,
    web::{self, Data, Json, Path},
    App, HttpRequest, HttpResponse, HttpServer, Responder,
};
use elimination_bracket_web::{
    AdminId, AppConfig, BracketError, BracketId, BracketType, GameMode, MatchId, MatchScore,
    MemoryStore, NotifyOutcome, PlayerId, StatLine, TeamId, TournamentContext, WebhookNotifier,
};
use serde::Deserialize;
use uuid::Uuid;

type AppState = Data<TournamentContext<MemoryStore>>;

const ADMIN_HEADER: &str = "X-Admin-Id";

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct AddTeamBody {
    name: String,
    seed: u32,
}

#[derive(Deserialize)]
struct AddPlayerBody {
    name: String,
    character_played: String,
}

#[derive(Deserialize)]
struct MovePlayerBody {
    team_id: TeamId,
}

#[derive(Deserialize)]
struct PlayerStatsBody {
    stats: StatLine,
    #[serde(default)]
    match_id: Option<MatchId>,
}

#[derive(Deserialize)]
struct CreateBracketBody {
    name: String,
    bracket_type: BracketType,
    team_ids: Vec<TeamId>,
}

#[derive(Deserialize)]
struct ResultBody {
    winner: TeamId,
}

#[derive(Deserialize)]
struct ScoreBody {
    score: MatchScore,
}

#[derive(Deserialize)]
struct GameModeBody {
    mode: GameMode,
}

#[derive(Deserialize)]
struct MvpSvpBody {
    #[serde(default)]
    mvp: Option<PlayerId>,
    #[serde(default)]
    svp: Option<PlayerId>,
}

#[derive(Deserialize)]
struct IdPath {
    id: Uuid,
}

fn error_response(e: BracketError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match e {
        BracketError::NotFound { .. } => HttpResponse::NotFound().json(body),
        BracketError::AlreadyDecided(_) => HttpResponse::Conflict().json(body),
        BracketError::InvalidInput(_) | BracketError::InvalidBracket(_) | BracketError::InvalidResult(_) => {
            HttpResponse::BadRequest().json(body)
        }
        BracketError::InconsistentGraph(_) | BracketError::Poisoned => {
            log::error!("{}", e);
            HttpResponse::InternalServerError().json(body)
        }
    }
}

fn respond<T: serde::Serialize>(result: Result<T, BracketError>) -> HttpResponse {
    match result {
        Ok(value) => HttpResponse::Ok().json(value),
        Err(e) => error_response(e),
    }
}

fn admin_id(req: &HttpRequest) -> Result<AdminId, HttpResponse> {
    req.headers()
        .get(ADMIN_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| Uuid::parse_str(v.trim()).ok())
        .ok_or_else(|| {
            HttpResponse::BadRequest().json(serde_json::json!({
                "error": format!("{} header with an admin id is required", ADMIN_HEADER)
            }))
        })
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "elimination-bracket-web",
    })
}

#[get("/api/teams")]
async fn api_list_teams(state: AppState) -> HttpResponse {
    respond(state.teams())
}

#[post("/api/teams")]
async fn api_add_team(state: AppState, body: Json<AddTeamBody>) -> HttpResponse {
    respond(state.add_team(&body.name, body.seed).and_then(|id| state.team(id)))
}

/// Team with its roster.
#[get("/api/teams/{id}")]
async fn api_get_team(state: AppState, path: Path<IdPath>) -> HttpResponse {
    respond(state.team(path.id).and_then(|team| {
        let players = state.players_of(team.id)?;
        Ok(serde_json::json!({ "team": team, "players": players }))
    }))
}

#[delete("/api/teams/{id}")]
async fn api_remove_team(state: AppState, path: Path<IdPath>) -> HttpResponse {
    respond(state.remove_team(path.id))
}

#[post("/api/teams/{id}/players")]
async fn api_add_player(state: AppState, path: Path<IdPath>, body: Json<AddPlayerBody>) -> HttpResponse {
    respond(
        state
            .add_player(path.id, &body.name, &body.character_played)
            .and_then(|id| state.player(id)),
    )
}

#[delete("/api/players/{id}")]
async fn api_remove_player(state: AppState, path: Path<IdPath>) -> HttpResponse {
    respond(state.remove_player(path.id))
}

#[put("/api/players/{id}/team")]
async fn api_move_player(state: AppState, path: Path<IdPath>, body: Json<MovePlayerBody>) -> HttpResponse {
    respond(state.move_player(path.id, body.team_id).and_then(|()| state.player(path.id)))
}

/// Returns the player's team with refreshed totals.
#[put("/api/players/{id}/stats")]
async fn api_update_player_stats(
    req: HttpRequest,
    state: AppState,
    path: Path<IdPath>,
    body: Json<PlayerStatsBody>,
) -> HttpResponse {
    let actor = match admin_id(&req) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    respond(state.update_player_stats(actor, path.id, body.stats, body.match_id))
}

#[get("/api/brackets")]
async fn api_list_brackets(state: AppState) -> HttpResponse {
    respond(state.brackets())
}

#[post("/api/brackets")]
async fn api_create_bracket(state: AppState, body: Json<CreateBracketBody>) -> HttpResponse {
    let body = body.into_inner();
    respond(
        state
            .create_bracket(&body.name, body.bracket_type, &body.team_ids)
            .and_then(|id: BracketId| state.bracket_view(id)),
    )
}

/// Bracket with its matches, status and standings.
#[get("/api/brackets/{id}")]
async fn api_get_bracket(state: AppState, path: Path<IdPath>) -> HttpResponse {
    respond(state.bracket_view(path.id))
}

#[delete("/api/brackets/{id}")]
async fn api_remove_bracket(state: AppState, path: Path<IdPath>) -> HttpResponse {
    respond(state.remove_bracket(path.id))
}

#[get("/api/matches/{id}")]
async fn api_get_match(state: AppState, path: Path<IdPath>) -> HttpResponse {
    respond(state.get_match(path.id))
}

/// Decide a match; returns what changed in the bracket.
#[post("/api/matches/{id}/result")]
async fn api_record_result(
    req: HttpRequest,
    state: AppState,
    path: Path<IdPath>,
    body: Json<ResultBody>,
) -> HttpResponse {
    let actor = match admin_id(&req) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    respond(state.record_result(actor, path.id, body.winner))
}

#[put("/api/matches/{id}/score")]
async fn api_set_score(req: HttpRequest, state: AppState, path: Path<IdPath>, body: Json<ScoreBody>) -> HttpResponse {
    let actor = match admin_id(&req) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    respond(state.set_score(actor, path.id, body.score))
}

#[put("/api/matches/{id}/mode")]
async fn api_set_game_mode(
    req: HttpRequest,
    state: AppState,
    path: Path<IdPath>,
    body: Json<GameModeBody>,
) -> HttpResponse {
    let actor = match admin_id(&req) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    respond(state.set_game_mode(actor, path.id, body.mode))
}

/// Set MVP/SVP. The result announcement goes out on a blocking thread.
#[put("/api/matches/{id}/mvp-svp")]
async fn api_set_mvp_svp(
    req: HttpRequest,
    state: AppState,
    path: Path<IdPath>,
    body: Json<MvpSvpBody>,
) -> HttpResponse {
    let actor = match admin_id(&req) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let match_id = path.id;
    let MvpSvpBody { mvp, svp } = body.into_inner();
    let ctx = state.clone();
    let result = match web::block(move || ctx.set_mvp_svp(actor, match_id, mvp, svp)).await {
        Ok(result) => result,
        Err(e) => {
            log::error!("MVP/SVP update for match {} did not finish: {}", match_id, e);
            return HttpResponse::InternalServerError().json(serde_json::json!({ "error": "worker error" }));
        }
    };
    match result {
        Ok((m, outcome)) => {
            let notification = match outcome {
                NotifyOutcome::Sent => "sent".to_string(),
                NotifyOutcome::Skipped => "skipped".to_string(),
                NotifyOutcome::Failed(e) => format!("failed: {}", e),
            };
            HttpResponse::Ok().json(serde_json::json!({ "match": m, "notification": notification }))
        }
        Err(e) => error_response(e),
    }
}

/// Audit log of a match, newest first.
#[get("/api/matches/{id}/history")]
async fn api_match_history(state: AppState, path: Path<IdPath>) -> HttpResponse {
    respond(state.match_history(path.id))
}

/// The webhook client blocks, so it is built before the async runtime starts.
fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = AppConfig::from_env().map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;

    let mut context = TournamentContext::new(MemoryStore::default());
    match &config.discord_webhook_url {
        Some(url) => match WebhookNotifier::new(url.as_str()) {
            Ok(notifier) => {
                log::info!("Result announcements enabled");
                context = context.with_notifier(notifier);
            }
            Err(e) => log::warn!("Webhook notifier disabled: {}", e),
        },
        None => log::info!("DISCORD_WEBHOOK_URL not set; results will not be announced"),
    }
    let state = Data::new(context);

    actix_web::rt::System::new().block_on(serve(config, state))
}

async fn serve(config: AppConfig, state: AppState) -> std::io::Result<()> {
    let bind = (config.host.as_str(), config.port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(api_health)
            .service(api_list_teams)
            .service(api_add_team)
            .service(api_get_team)
            .service(api_remove_team)
            .service(api_add_player)
            .service(api_remove_player)
            .service(api_move_player)
            .service(api_update_player_stats)
            .service(api_list_brackets)
            .service(api_create_bracket)
            .service(api_get_bracket)
            .service(api_remove_bracket)
            .service(api_get_match)
            .service(api_record_result)
            .service(api_set_score)
            .service(api_set_game_mode)
            .service(api_set_mvp_svp)
            .service(api_match_history)
    })
    .bind(bind)?
    .run()
    .await
}
