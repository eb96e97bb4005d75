//! Single binary web host for the scheduler: tournaments live in memory, mutations go through commands.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST, PORT.
//! Scheduling defaults come from SCHEDULER_DEFAULT_DURATION / _SLACK / _START.

use actix_web::{
    get, post,
    web::{Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use pitch_scheduler::{
    apply, schedule_csv, Command, CompetitionId, ScheduleScope, SchedulerConfig, Tournament,
    TournamentError, TournamentId,
};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

/// Per-tournament entry: current snapshot + last activity time (for auto-cleanup).
struct TournamentEntry {
    tournament: Tournament,
    last_activity: Instant,
}

struct AppStateInner {
    tournaments: RwLock<HashMap<TournamentId, TournamentEntry>>,
    config: SchedulerConfig,
}

type AppState = Data<AppStateInner>;

/// Inactivity threshold: tournaments not accessed for this long are removed.
const INACTIVITY_TIMEOUT: Duration = Duration::from_secs(12 * 3600);

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

#[derive(Deserialize)]
struct CompetitionPath {
    id: TournamentId,
    competition_id: CompetitionId,
}

#[derive(Deserialize)]
struct AutoScheduleBody {
    #[serde(default)]
    scope: ScheduleScope,
}

fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({ "error": "No tournament" }))
}

fn bad_request(e: TournamentError) -> HttpResponse {
    HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() }))
}

/// Apply a command to the stored snapshot and replace it with the result.
fn run_command(state: &AppState, id: TournamentId, command: Command) -> HttpResponse {
    let mut g = match state.tournaments.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&id) {
        Some(e) => e,
        None => return not_found(),
    };
    entry.last_activity = Instant::now();
    match apply(entry.tournament.clone(), command, &state.config) {
        Ok(next) => {
            entry.tournament = next;
            HttpResponse::Ok().json(&entry.tournament)
        }
        Err(e) => bad_request(e),
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "pitch-scheduler",
    })
}

/// Create a new, empty tournament (client keeps the id for subsequent requests).
#[post("/api/tournaments")]
async fn api_create_tournament(state: AppState) -> HttpResponse {
    let tournament = Tournament::new();
    let id = tournament.id;
    let mut g = match state.tournaments.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = g.entry(id).or_insert(TournamentEntry {
        tournament,
        last_activity: Instant::now(),
    });
    HttpResponse::Ok().json(&entry.tournament)
}

/// Get a tournament by id (404 if not found). Touching it refreshes last_activity.
#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let mut g = match state.tournaments.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.get_mut(&path.id) {
        Some(entry) => {
            entry.last_activity = Instant::now();
            HttpResponse::Ok().json(&entry.tournament)
        }
        None => not_found(),
    }
}

/// Apply any command (JSON body tagged by `type`).
#[post("/api/tournaments/{id}/commands")]
async fn api_command(state: AppState, path: Path<TournamentPath>, body: Json<Command>) -> HttpResponse {
    run_command(&state, path.id, body.into_inner())
}

/// Regenerate all group-stage fixtures of a competition.
#[post("/api/tournaments/{id}/competitions/{competition_id}/generate")]
async fn api_generate(state: AppState, path: Path<CompetitionPath>) -> HttpResponse {
    let command = Command::GenerateFixtures {
        competition_id: path.competition_id,
        group_id: None,
    };
    run_command(&state, path.id, command)
}

/// Assign pitches and times (full re-run unless `scope` says `unplaced_only`).
#[post("/api/tournaments/{id}/competitions/{competition_id}/auto-schedule")]
async fn api_auto_schedule(
    state: AppState,
    path: Path<CompetitionPath>,
    body: Option<Json<AutoScheduleBody>>,
) -> HttpResponse {
    let scope = body.map(|b| b.scope).unwrap_or_default();
    let command = Command::AutoSchedule {
        competition_id: path.competition_id,
        scope,
    };
    run_command(&state, path.id, command)
}

/// Recompute times of placed fixtures, keeping their pitches.
#[post("/api/tournaments/{id}/competitions/{competition_id}/recalculate")]
async fn api_recalculate(state: AppState, path: Path<CompetitionPath>) -> HttpResponse {
    let command = Command::Recalculate {
        competition_id: path.competition_id,
    };
    run_command(&state, path.id, command)
}

/// Download the placed schedule as CSV.
#[get("/api/tournaments/{id}/schedule.csv")]
async fn api_schedule_csv(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let g = match state.tournaments.read() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get(&path.id) {
        Some(e) => e,
        None => return not_found(),
    };
    match schedule_csv(&entry.tournament) {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .body(body),
        Err(e) => {
            log::error!("CSV export failed for tournament {}: {}", path.id, e);
            HttpResponse::InternalServerError().body("export error")
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
    let config = SchedulerConfig::from_env();
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);
    log::info!(
        "Defaults: {} min fixtures, {} min slack, pitches open {}",
        config.default_duration,
        config.default_slack,
        config.default_start_time
    );

    let state = Data::new(AppStateInner {
        tournaments: RwLock::new(HashMap::new()),
        config,
    });

    // Background task: every 30 minutes, remove tournaments inactive for 12+ hours
    let state_cleanup = state.clone();
    actix_web::rt::spawn(async move {
        let mut interval = actix_web::rt::time::interval(Duration::from_secs(30 * 60));
        loop {
            interval.tick().await;
            let mut g = match state_cleanup.tournaments.write() {
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
            .service(api_command)
            .service(api_generate)
            .service(api_auto_schedule)
            .service(api_recalculate)
            .service(api_schedule_csv)
    })
    .bind(bind)?
    .run()
    .await
}
