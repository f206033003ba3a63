//! Single binary web server: JSON API over the tournament operations.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST, PORT.
//! Fixture tuning via env: GROUP_STAGE_THRESHOLD, GROUP_OPPONENTS, KNOCKOUT_SIZE.
//! Elevated users via env: ADMIN_IDS, MASTER_IDS (comma-separated user ids).

use actix_session::{storage::CookieSessionStore, Session, SessionMiddleware};
use actix_web::{
    cookie::Key,
    get, post, put,
    web::{Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};
use tournament_tracker::{
    advance_phase, compute_standings, confirm_result, create_tournament, find_by_invite_code,
    finish_tournament, join_tournament, phase_view, report_result, rounds_view,
    standings_to_csv, start_tournament, Actor, FixtureConfig, MatchId, ResultReport,
    RoleDirectory, Tournament, TournamentError, TournamentId, TournamentType,
};
use uuid::Uuid;

/// Per-tournament entry: tournament data + last activity time (for auto-cleanup).
struct TournamentEntry {
    tournament: Tournament,
    last_activity: Instant,
}

/// In-memory state: tournaments by ID. Draft and finished entries are removed after 12h
/// inactivity; active ones are kept.
type AppState = Data<RwLock<HashMap<TournamentId, TournamentEntry>>>;

/// Inactivity threshold for tournaments that may expire.
const INACTIVITY_TIMEOUT: Duration = Duration::from_secs(12 * 3600);

/// Session key holding the signed-in user id. Roles are resolved per request.
const USER_KEY: &str = "user_id";

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

/// Identity is owned by an upstream auth layer; this only records who is acting.
/// Roles never come from the client.
#[derive(Deserialize)]
struct SessionBody {
    #[serde(default)]
    user_id: Option<Uuid>,
}

#[derive(Deserialize)]
struct CreateTournamentBody {
    name: String,
    #[serde(rename = "type", default)]
    kind: TournamentType,
    #[serde(default)]
    detailed: bool,
}

#[derive(Deserialize)]
struct JoinBody {
    code: String,
}

/// Path segment: tournament id (e.g. /api/tournaments/{id})
#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

/// Path segments: tournament id and match id (e.g. /api/tournaments/{id}/matches/{match_id})
#[derive(Deserialize)]
struct TournamentMatchPath {
    id: TournamentId,
    match_id: MatchId,
}

fn error_response(e: &TournamentError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match e {
        TournamentError::UnauthorizedActor => HttpResponse::Forbidden().json(body),
        TournamentError::MatchNotFound(_) | TournamentError::InvalidInviteCode => {
            HttpResponse::NotFound().json(body)
        }
        _ => HttpResponse::BadRequest().json(body),
    }
}

fn no_tournament() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({ "error": "No tournament" }))
}

/// The signed-in actor with its configured role, or the response to send when there is none.
fn current_actor(session: &Session, roles: &RoleDirectory) -> Result<Actor, HttpResponse> {
    match session.get::<Uuid>(USER_KEY) {
        Ok(Some(id)) => Ok(roles.actor(id)),
        Ok(None) => Err(HttpResponse::Unauthorized().json(serde_json::json!({ "error": "Not signed in" }))),
        Err(_) => Err(HttpResponse::BadRequest().json(serde_json::json!({ "error": "Invalid session" }))),
    }
}

/// Run `op` against the latest state of a tournament under the write lock and store the
/// returned value in its place. Refusals leave the stored tournament as it was.
fn mutate<F>(state: &AppState, id: TournamentId, op: F) -> HttpResponse
where
    F: FnOnce(&Tournament) -> Result<Tournament, TournamentError>,
{
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&id) {
        Some(e) => e,
        None => return no_tournament(),
    };
    entry.last_activity = Instant::now();
    match op(&entry.tournament) {
        Ok(next) => {
            entry.tournament = next;
            HttpResponse::Ok().json(&entry.tournament)
        }
        Err(e) => {
            log::warn!("Tournament {}: refused: {}", id, e);
            error_response(&e)
        }
    }
}

/// Read-only view of a tournament. Touching it refreshes last_activity.
fn view<F, T>(state: &AppState, id: TournamentId, f: F) -> HttpResponse
where
    F: FnOnce(&Tournament) -> T,
    T: Serialize,
{
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.get_mut(&id) {
        Some(entry) => {
            entry.last_activity = Instant::now();
            HttpResponse::Ok().json(f(&entry.tournament))
        }
        None => no_tournament(),
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "tournament-tracker",
    })
}

/// Sign in as a user (a new id is issued when none is given).
#[post("/api/session")]
async fn api_sign_in(
    session: Session,
    roles: Data<RoleDirectory>,
    body: Json<SessionBody>,
) -> HttpResponse {
    let actor = roles.actor(body.user_id.unwrap_or_else(Uuid::new_v4));
    if session.insert(USER_KEY, actor.id).is_err() {
        return HttpResponse::InternalServerError().body("session error");
    }
    HttpResponse::Ok().json(actor)
}

#[get("/api/session")]
async fn api_get_session(session: Session, roles: Data<RoleDirectory>) -> HttpResponse {
    match current_actor(&session, &roles) {
        Ok(actor) => HttpResponse::Ok().json(actor),
        Err(resp) => resp,
    }
}

/// Create a tournament with the signed-in user as creator and first participant.
#[post("/api/tournaments")]
async fn api_create_tournament(
    state: AppState,
    session: Session,
    roles: Data<RoleDirectory>,
    body: Json<CreateTournamentBody>,
) -> HttpResponse {
    let actor = match current_actor(&session, &roles) {
        Ok(a) => a,
        Err(resp) => return resp,
    };
    let tournament = match create_tournament(
        &body.name,
        body.kind,
        actor.id,
        body.detailed,
        &mut rand::thread_rng(),
    ) {
        Ok(t) => t,
        Err(e) => return error_response(&e),
    };
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let response = HttpResponse::Ok().json(&tournament);
    g.insert(
        tournament.id,
        TournamentEntry {
            tournament,
            last_activity: Instant::now(),
        },
    );
    response
}

/// Tournaments the signed-in user takes part in, newest first.
#[get("/api/tournaments")]
async fn api_list_tournaments(
    state: AppState,
    session: Session,
    roles: Data<RoleDirectory>,
) -> HttpResponse {
    let actor = match current_actor(&session, &roles) {
        Ok(a) => a,
        Err(resp) => return resp,
    };
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let mut mine: Vec<&Tournament> = g
        .values()
        .map(|e| &e.tournament)
        .filter(|t| t.is_participant(actor.id))
        .collect();
    mine.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    HttpResponse::Ok().json(mine)
}

/// Join a Draft tournament through its invite code.
#[post("/api/tournaments/join")]
async fn api_join_tournament(
    state: AppState,
    session: Session,
    roles: Data<RoleDirectory>,
    body: Json<JoinBody>,
) -> HttpResponse {
    let actor = match current_actor(&session, &roles) {
        Ok(a) => a,
        Err(resp) => return resp,
    };
    let id = {
        let g = match state.read() {
            Ok(guard) => guard,
            Err(_) => return HttpResponse::InternalServerError().body("lock error"),
        };
        find_by_invite_code(g.values().map(|e| &e.tournament), &body.code).map(|t| t.id)
    };
    match id {
        Some(id) => mutate(&state, id, |t| join_tournament(t, &body.code, &actor)),
        None => error_response(&TournamentError::InvalidInviteCode),
    }
}

#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    view(&state, path.id, Tournament::clone)
}

/// Generate all fixtures and start (Draft -> Active).
#[post("/api/tournaments/{id}/start")]
async fn api_start_tournament(
    state: AppState,
    config: Data<FixtureConfig>,
    session: Session,
    roles: Data<RoleDirectory>,
    path: Path<TournamentPath>,
) -> HttpResponse {
    let actor = match current_actor(&session, &roles) {
        Ok(a) => a,
        Err(resp) => return resp,
    };
    mutate(&state, path.id, |t| {
        start_tournament(t, &actor, &config, &mut rand::thread_rng())
    })
}

/// Report (or correct) a match result.
#[put("/api/tournaments/{id}/matches/{match_id}/result")]
async fn api_report_result(
    state: AppState,
    session: Session,
    roles: Data<RoleDirectory>,
    path: Path<TournamentMatchPath>,
    body: Json<ResultReport>,
) -> HttpResponse {
    let actor = match current_actor(&session, &roles) {
        Ok(a) => a,
        Err(resp) => return resp,
    };
    mutate(&state, path.id, |t| report_result(t, path.match_id, &body, &actor))
}

/// Confirm the reported result of a match.
#[post("/api/tournaments/{id}/matches/{match_id}/confirm")]
async fn api_confirm_result(
    state: AppState,
    session: Session,
    roles: Data<RoleDirectory>,
    path: Path<TournamentMatchPath>,
) -> HttpResponse {
    let actor = match current_actor(&session, &roles) {
        Ok(a) => a,
        Err(resp) => return resp,
    };
    mutate(&state, path.id, |t| confirm_result(t, path.match_id, &actor))
}

/// Generate the next knockout round (cups only).
#[post("/api/tournaments/{id}/advance")]
async fn api_advance_phase(
    state: AppState,
    config: Data<FixtureConfig>,
    session: Session,
    roles: Data<RoleDirectory>,
    path: Path<TournamentPath>,
) -> HttpResponse {
    let actor = match current_actor(&session, &roles) {
        Ok(a) => a,
        Err(resp) => return resp,
    };
    mutate(&state, path.id, |t| {
        advance_phase(t, &actor, &config, &mut rand::thread_rng())
    })
}

#[post("/api/tournaments/{id}/finish")]
async fn api_finish_tournament(
    state: AppState,
    session: Session,
    roles: Data<RoleDirectory>,
    path: Path<TournamentPath>,
) -> HttpResponse {
    let actor = match current_actor(&session, &roles) {
        Ok(a) => a,
        Err(resp) => return resp,
    };
    mutate(&state, path.id, |t| finish_tournament(t, &actor))
}

#[get("/api/tournaments/{id}/standings")]
async fn api_standings(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    view(&state, path.id, compute_standings)
}

/// Standings as a CSV download.
#[get("/api/tournaments/{id}/standings.csv")]
async fn api_standings_csv(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let rows = {
        let g = match state.read() {
            Ok(guard) => guard,
            Err(_) => return HttpResponse::InternalServerError().body("lock error"),
        };
        match g.get(&path.id) {
            Some(entry) => compute_standings(&entry.tournament),
            None => return no_tournament(),
        }
    };
    match standings_to_csv(&rows) {
        Ok(csv) => HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .body(csv),
        Err(e) => {
            log::error!("Standings export failed for {}: {}", path.id, e);
            HttpResponse::InternalServerError().body("export error")
        }
    }
}

#[get("/api/tournaments/{id}/rounds")]
async fn api_rounds(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    view(&state, path.id, rounds_view)
}

/// Whether the tournament can advance or be finished right now.
#[get("/api/tournaments/{id}/phase")]
async fn api_phase(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    view(&state, path.id, phase_view)
}

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn fixture_config_from_env() -> FixtureConfig {
    let defaults = FixtureConfig::default();
    FixtureConfig {
        group_stage_threshold: env_or("GROUP_STAGE_THRESHOLD", defaults.group_stage_threshold),
        group_opponents: env_or("GROUP_OPPONENTS", defaults.group_opponents),
        knockout_size: env_or("KNOCKOUT_SIZE", defaults.knockout_size),
    }
}

fn role_directory_from_env() -> RoleDirectory {
    let admins = std::env::var("ADMIN_IDS").unwrap_or_default();
    let masters = std::env::var("MASTER_IDS").unwrap_or_default();
    RoleDirectory::from_lists(&admins, &masters)
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let host = std::env::var("HOST").unwrap_or_else(|_| default_host());
    let port: u16 = env_or("PORT", default_port());
    let bind = (host.as_str(), port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let fixture_config = Data::new(fixture_config_from_env());
    log::info!("Fixture config: {:?}", fixture_config.get_ref());
    let roles = Data::new(role_directory_from_env());

    let state = Data::new(RwLock::new(HashMap::<TournamentId, TournamentEntry>::new()));
    let session_key = Key::generate();

    // Background task: every 30 minutes, remove idle drafts and finished tournaments
    let state_cleanup = state.clone();
    actix_web::rt::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(30 * 60));
        loop {
            interval.tick().await;
            let mut g = match state_cleanup.write() {
                Ok(guard) => guard,
                Err(_) => continue,
            };
            let before = g.len();
            g.retain(|_, entry| {
                !entry.tournament.expires_when_idle()
                    || entry.last_activity.elapsed() < INACTIVITY_TIMEOUT
            });
            let removed = before - g.len();
            if removed > 0 {
                log::info!("Cleaned up {} inactive tournament(s) (no activity for 12h)", removed);
            }
        }
    });

    HttpServer::new(move || {
        App::new()
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), session_key.clone())
                    .cookie_secure(false)
                    .build(),
            )
            .app_data(state.clone())
            .app_data(fixture_config.clone())
            .app_data(roles.clone())
            .service(api_health)
            .service(api_sign_in)
            .service(api_get_session)
            .service(api_create_tournament)
            .service(api_list_tournaments)
            .service(api_join_tournament)
            .service(api_get_tournament)
            .service(api_start_tournament)
            .service(api_report_result)
            .service(api_confirm_result)
            .service(api_advance_phase)
            .service(api_finish_tournament)
            .service(api_standings)
            .service(api_standings_csv)
            .service(api_rounds)
            .service(api_phase)
    })
    .bind(bind)?
    .run()
    .await
}
