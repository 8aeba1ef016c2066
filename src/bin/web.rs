//! Ranking service: build tournaments over REST and fetch Elo leaderboards (JSON or CSV).
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default.
//! Override with env: HOST (e.g. 0.0.0.0), PORT (e.g. 8080).

use actix_web::{
    get, post,
    web::{Data, Json, Path, Query},
    App, HttpResponse, HttpServer, Responder,
};
use serde::{Deserialize, Serialize};
use shen_ranking::{
    EloConfig, Leaderboard, Rating, RoundMeta, Tournament, TournamentError, TournamentId, User,
    UserId, DEFAULT_BEST_OF,
};
use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Per-tournament entry: tournament data + last activity time (for auto-cleanup).
struct TournamentEntry {
    tournament: Tournament,
    last_activity: Instant,
}

/// In-memory state: tournaments by id. Each handler holds the lock for its whole
/// operation, so a leaderboard never sees a half-recorded match.
type AppState = Data<RwLock<HashMap<TournamentId, TournamentEntry>>>;

/// Inactivity threshold: tournaments not accessed for this long are removed.
const INACTIVITY_TIMEOUT: Duration = Duration::from_secs(12 * 3600);

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct CreateTournamentBody {
    title: String,
}

#[derive(Deserialize)]
struct AddPlayerBody {
    name: String,
    /// Keep an id assigned elsewhere; a fresh one is generated otherwise.
    user_id: Option<UserId>,
    discriminator: Option<String>,
    nickname: Option<String>,
}

#[derive(Deserialize)]
struct StartMatchBody {
    players: Vec<UserId>,
    best_of: Option<u32>,
}

#[derive(Deserialize)]
struct RecordRoundBody {
    winners: Vec<UserId>,
    #[serde(default)]
    meta: RoundMeta,
    #[serde(default)]
    player_meta: BTreeMap<UserId, RoundMeta>,
}

/// Path segment: tournament id (e.g. /api/tournaments/{id})
#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

/// Path segments: tournament id and match id.
#[derive(Deserialize)]
struct TournamentMatchPath {
    id: TournamentId,
    match_id: Uuid,
}

/// One CSV line; `place` is empty for players without matches.
#[derive(Serialize)]
struct CsvRow<'a> {
    place: Option<usize>,
    player: &'a str,
    rating: Rating,
    matches_played: u32,
    matches_won: u32,
}

fn error_json(status: actix_web::http::StatusCode, msg: impl std::fmt::Display) -> HttpResponse {
    HttpResponse::build(status).json(serde_json::json!({ "error": msg.to_string() }))
}

fn tournament_error(e: TournamentError) -> HttpResponse {
    use actix_web::http::StatusCode;
    match e {
        TournamentError::MatchNotFound(_) => error_json(StatusCode::NOT_FOUND, e),
        _ => error_json(StatusCode::BAD_REQUEST, e),
    }
}

fn no_tournament() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({ "error": "No tournament" }))
}

fn leaderboard_csv(lb: &Leaderboard) -> Result<Vec<u8>, csv::Error> {
    let mut w = csv::Writer::from_writer(Vec::new());
    for (i, s) in lb.ranked().iter().enumerate() {
        w.serialize(CsvRow {
            place: Some(i + 1),
            player: s.player().nickname(),
            rating: s.rating(),
            matches_played: s.matches_played(),
            matches_won: s.matches_won(),
        })?;
    }
    for s in lb.unranked() {
        w.serialize(CsvRow {
            place: None,
            player: s.player().nickname(),
            rating: s.rating(),
            matches_played: s.matches_played(),
            matches_won: s.matches_won(),
        })?;
    }
    w.into_inner().map_err(|e| csv::Error::from(e.into_error()))
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "shen-ranking",
    })
}

/// Create a new tournament (returns it with id; client stores id for subsequent requests).
#[post("/api/tournaments")]
async fn api_create_tournament(state: AppState, body: Json<CreateTournamentBody>) -> HttpResponse {
    let tournament = Tournament::new(body.title.trim());
    let id = tournament.id();
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = g.entry(id).or_insert(TournamentEntry {
        tournament,
        last_activity: Instant::now(),
    });
    log::info!("Created tournament {} ({})", entry.tournament.title(), id);
    HttpResponse::Ok().json(&entry.tournament)
}

/// Get a tournament by id (404 if not found). Touching it refreshes last_activity.
#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.get_mut(&path.id) {
        Some(entry) => {
            entry.last_activity = Instant::now();
            HttpResponse::Ok().json(&entry.tournament)
        }
        None => no_tournament(),
    }
}

/// Register a new user as a player.
#[post("/api/tournaments/{id}/players")]
async fn api_add_player(state: AppState, path: Path<TournamentPath>, body: Json<AddPlayerBody>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return no_tournament(),
    };
    entry.last_activity = Instant::now();
    let name = body.name.trim();
    if name.is_empty() {
        return HttpResponse::BadRequest().json(serde_json::json!({ "error": "Name is required" }));
    }
    let mut user = match body.user_id {
        Some(id) => User::with_id(id, name),
        None => User::new(name),
    };
    if let Some(d) = &body.discriminator {
        user = user.with_discriminator(d.as_str());
    }
    let t = &mut entry.tournament;
    if let Err(e) = t.add_player(&user, body.nickname.as_deref()) {
        return tournament_error(e);
    }
    HttpResponse::Ok().json(&*t)
}

/// Start a match between registered players. Returns the new match.
#[post("/api/tournaments/{id}/matches")]
async fn api_start_match(state: AppState, path: Path<TournamentPath>, body: Json<StartMatchBody>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return no_tournament(),
    };
    entry.last_activity = Instant::now();
    let t = &mut entry.tournament;
    let users: Result<Vec<User>, _> = body
        .players
        .iter()
        .map(|&id| t.player(id).map(|p| p.user().clone()))
        .collect();
    let users = match users {
        Ok(u) => u,
        Err(e) => return tournament_error(e),
    };
    let refs: Vec<&User> = users.iter().collect();
    match t.start_match(&refs, body.best_of.unwrap_or(DEFAULT_BEST_OF)) {
        Ok(m) => HttpResponse::Ok().json(&*m),
        Err(e) => tournament_error(e),
    }
}

/// Record one round of a match. Returns the updated match.
#[post("/api/tournaments/{id}/matches/{match_id}/rounds")]
async fn api_record_round(
    state: AppState,
    path: Path<TournamentMatchPath>,
    body: Json<RecordRoundBody>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return no_tournament(),
    };
    entry.last_activity = Instant::now();
    let m = match entry.tournament.match_mut(path.match_id) {
        Ok(m) => m,
        Err(e) => return tournament_error(e),
    };
    let body = body.into_inner();
    if let Err(e) = m.record_win_with_meta(&body.winners, body.meta, body.player_meta) {
        return HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() }));
    }
    HttpResponse::Ok().json(&*m)
}

/// Rank the tournament. Query parameters override the Elo defaults.
#[get("/api/tournaments/{id}/leaderboard")]
async fn api_leaderboard(state: AppState, path: Path<TournamentPath>, config: Query<EloConfig>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return no_tournament(),
    };
    entry.last_activity = Instant::now();
    match entry.tournament.generate_leaderboard(&config) {
        Ok(lb) => HttpResponse::Ok().json(&lb),
        Err(e) => HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() })),
    }
}

/// Same as the JSON leaderboard, as CSV.
#[get("/api/tournaments/{id}/leaderboard.csv")]
async fn api_leaderboard_csv(state: AppState, path: Path<TournamentPath>, config: Query<EloConfig>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&path.id) {
        Some(e) => e,
        None => return no_tournament(),
    };
    entry.last_activity = Instant::now();
    let lb = match entry.tournament.generate_leaderboard(&config) {
        Ok(lb) => lb,
        Err(e) => {
            return HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() }))
        }
    };
    match leaderboard_csv(&lb) {
        Ok(bytes) => HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .body(bytes),
        Err(e) => {
            log::error!("CSV export failed: {}", e);
            HttpResponse::InternalServerError().body("csv error")
        }
    }
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
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or_else(default_port);
    let bind = (host.as_str(), port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let state = Data::new(RwLock::new(HashMap::<TournamentId, TournamentEntry>::new()));

    // Background task: every 30 minutes, remove tournaments inactive for 12+ hours
    let state_cleanup = state.clone();
    actix_web::rt::spawn(async move {
        let mut interval = actix_web::rt::time::interval(Duration::from_secs(30 * 60));
        loop {
            interval.tick().await;
            let mut g = match state_cleanup.write() {
                Ok(guard) => guard,
                Err(_) => continue,
            };
            let before = g.len();
            g.retain(|_, entry| entry.last_activity.elapsed() < INACTIVITY_TIMEOUT);
            let removed = before - g.len();
            if removed > 0 {
                log::info!("Cleaned up {} inactive tournament(s) (no activity for 12h)", removed);
            }
        }
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(api_health)
            .service(api_create_tournament)
            .service(api_get_tournament)
            .service(api_add_player)
            .service(api_start_match)
            .service(api_record_round)
            .service(api_leaderboard_csv)
            .service(api_leaderboard)
    })
    .bind(bind)?
    .run()
    .await
}
