//! Demo data: build a roster, a bracket, and play it out with simulated results.
//! Run with: cargo run --bin populate -- --teams 6 --kind double --seed 42

use clap::Parser;
use elimination_bracket_web::logic::create_demo_roster;
use elimination_bracket_web::{
    AdvancementEvent, BracketError, BracketStatus, BracketType, MemoryStore, TournamentContext,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "populate", about = "Simulate an elimination bracket with demo teams")]
struct Args {
    /// Number of teams entered (at least 2)
    #[arg(short, long, default_value_t = 8)]
    teams: usize,

    /// Bracket type: single or double
    #[arg(short, long, default_value = "double")]
    kind: BracketType,

    #[arg(long, default_value_t = 6)]
    players_per_team: usize,

    /// RNG seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Bracket name
    #[arg(long, default_value = "Demo Bracket")]
    name: String,
}

fn main() {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    let args = Args::parse();
    if let Err(e) = run(&args) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), BracketError> {
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut store = MemoryStore::default();
    let team_ids = create_demo_roster(&mut store, args.teams, args.players_per_team, &mut rng)?;
    let ctx = TournamentContext::new(store);
    let bracket_id = ctx.create_bracket(&args.name, args.kind, &team_ids)?;
    log::info!(
        "Created {} elimination bracket '{}' with {} teams",
        args.kind,
        args.name,
        team_ids.len()
    );

    let admin = Uuid::new_v4();
    let events = ctx.simulate(admin, bracket_id, &mut rng)?;
    let played = events
        .iter()
        .filter(|e| matches!(e, AdvancementEvent::MatchDecided { loser: Some(_), .. }))
        .count();
    log::info!("Played {} matches", played);

    let view = ctx.bracket_view(bracket_id)?;
    match view.status {
        BracketStatus::Completed { champion } => {
            log::info!("Champion: {}", ctx.team(champion)?.name);
        }
        BracketStatus::InProgress => log::warn!("Bracket did not finish"),
    }
    for standing in &view.standings {
        log::info!(
            "#{:<2} {:<14} {}-{}{}",
            standing.seed,
            standing.name,
            standing.wins,
            standing.losses,
            if standing.eliminated { "  (out)" } else { "" }
        );
    }
    Ok(())
}
