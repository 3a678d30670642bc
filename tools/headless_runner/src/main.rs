mod autoplay;

use autoplay::Autoplayer;
use clap::Parser;
use sim_core::{Clock, FixedStepClock, Millis, SystemClock};
use sim_host::MatchHost;
use sim_td::{LevelDef, Settings, TdConfig, TdEvent, TdGame};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "headless-runner")]
#[command(about = "Run a tower defence session without a window")]
struct Args {
    /// Pace ticks against the wall clock instead of running flat out
    #[arg(short, long)]
    realtime: bool,

    /// Stop after this many ticks
    #[arg(long, default_value_t = 60 * 60 * 10)]
    max_ticks: u64,

    /// Frame length in milliseconds
    #[arg(long, default_value_t = 16)]
    frame_ms: u64,

    #[arg(long, default_value_t = 12345)]
    seed: u64,

    /// JSON file with a list of level definitions
    #[arg(long)]
    campaign: Option<PathBuf>,

    /// JSON file with settings overrides
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Towers the autoplayer plans per level
    #[arg(long, default_value_t = 12)]
    towers: usize,

    /// Only consider slots this close to a path
    #[arg(long, default_value_t = 120.0)]
    reach: f32,

    /// Print every event as it happens
    #[arg(short, long)]
    verbose: bool,

    /// Print the final snapshot as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;
    let frame = Millis::from_millis(args.frame_ms);

    let events = if args.realtime {
        let mut host = MatchHost::<TdGame, _>::new(config, args.seed, SystemClock::new())?;
        println!("=== Running in Real-Time Mode ({}ms frames) ===", args.frame_ms);
        println!("Press Ctrl+C to stop\n");
        let events = run(&mut host, &args, Some(frame));
        report(&host, &args)?;
        events
    } else {
        let mut host = MatchHost::<TdGame, _>::new(config, args.seed, FixedStepClock::new(frame))?;
        let events = run(&mut host, &args, None);
        report(&host, &args)?;
        events
    };

    print_event_summary(&events);
    Ok(())
}

fn load_config(args: &Args) -> Result<TdConfig, Box<dyn std::error::Error>> {
    let mut config = TdConfig::default();
    if let Some(path) = &args.settings {
        let settings: Settings = serde_json::from_str(&std::fs::read_to_string(path)?)?;
        config.settings = settings;
    }
    if let Some(path) = &args.campaign {
        let levels: Vec<LevelDef> = serde_json::from_str(&std::fs::read_to_string(path)?)?;
        tracing::info!(levels = levels.len(), path = %path.display(), "loaded campaign");
        config.levels = levels;
    }
    Ok(config)
}

/// Step the host until the session ends or the tick budget runs out. With a
/// `pace`, each tick is stretched to at least that long.
fn run<C: Clock>(host: &mut MatchHost<TdGame, C>, args: &Args, pace: Option<Millis>) -> Vec<TdEvent> {
    let mut player = Autoplayer::for_level(host.game(), args.towers, args.reach);
    println!("Level 1: planned {} tower placements", player.planned());

    let mut all_events = Vec::new();
    let mut last_status = Instant::now();

    while host.current_tick() < args.max_ticks {
        let tick_start = Instant::now();

        if let Some(action) = player.next_action(host.game()) {
            host.submit_next(action);
        }

        let Some(events) = host.step_one_tick() else {
            break;
        };

        for event in &events {
            if args.verbose || pace.is_some() {
                print_event(host.current_tick(), event);
            }
            if let TdEvent::LevelStarted { level, .. } = event {
                if *level > 0 {
                    player = Autoplayer::for_level(host.game(), args.towers, args.reach);
                    println!("Level {}: planned {} tower placements", level + 1, player.planned());
                }
            }
        }
        all_events.extend(events);

        if let Some(pace) = pace {
            if last_status.elapsed() >= Duration::from_secs(1) {
                print_status(host);
                last_status = Instant::now();
            }
            let frame = Duration::from_millis(pace.as_millis());
            let elapsed = tick_start.elapsed();
            if elapsed < frame {
                std::thread::sleep(frame - elapsed);
            }
        }
    }

    all_events
}

fn report<C: Clock>(host: &MatchHost<TdGame, C>, args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let game = host.game();
    println!("\n=== Tower Defence Simulation Complete ===");
    println!("Outcome: {:?}", host.is_terminal());
    println!("Final tick: {} ({})", host.current_tick(), host.now());
    println!("Level: {}/{}", game.level_index() + 1, game.levels_total());
    println!(
        "Wave: {}/{} ({} remaining)",
        game.current_wave_index() + 1,
        game.level().waves_total(),
        game.waves_remaining()
    );
    println!("Money: {}", game.money());
    println!("Towers: {}", game.towers().len());
    println!("Enemies alive: {}", game.enemies().len());

    if args.json {
        println!("{}", serde_json::to_string_pretty(&host.observe())?);
    }
    Ok(())
}

fn print_event(tick: u64, event: &TdEvent) {
    match event {
        TdEvent::TowerPlaced {
            kind, position, cost, ..
        } => println!(
            "[{:>6}] {} tower placed at ({}, {}) for {}",
            tick, kind, position.x, position.y, cost
        ),
        TdEvent::TowerUpgraded { id, level, cost } => {
            println!("[{:>6}] Tower {:?} upgraded to level {} for {}", tick, id, level, cost)
        }
        TdEvent::PlacementRejected {
            kind,
            position,
            reason,
        } => println!(
            "[{:>6}] {} tower at ({}, {}) rejected: {:?}",
            tick, kind, position.x, position.y, reason
        ),
        TdEvent::UpgradeRejected { position, reason } => println!(
            "[{:>6}] Upgrade at ({}, {}) rejected: {:?}",
            tick, position.x, position.y, reason
        ),
        TdEvent::EnemySpawned { id, wave } => {
            println!("[{:>6}] Enemy {} spawned (wave {})", tick, id.0, wave + 1)
        }
        TdEvent::EnemyKilled { id, reward } => {
            println!("[{:>6}] Enemy {} killed, +{}", tick, id.0, reward)
        }
        TdEvent::EnemyLeaked { id } => println!("[{:>6}] Enemy {} leaked!", tick, id.0),
        TdEvent::BulletFired { .. } => {}
        TdEvent::IncomeGenerated { amount, .. } => println!("[{:>6}] Income +{}", tick, amount),
        TdEvent::WaveStarted { wave } => println!("[{:>6}] === Wave {} started ===", tick, wave + 1),
        TdEvent::WaveCleared { wave } => println!("[{:>6}] === Wave {} cleared ===", tick, wave + 1),
        TdEvent::LevelStarted { level, name } => {
            println!("[{:>6}] ##### Level {} ({}) started #####", tick, level + 1, name)
        }
        TdEvent::LevelCompleted { level } => {
            println!("[{:>6}] ##### Level {} completed #####", tick, level + 1)
        }
        TdEvent::GameWon => println!("[{:>6}] All levels complete. You win!", tick),
        TdEvent::GameLost => println!("[{:>6}] Game over", tick),
    }
}

fn print_status<C: Clock>(host: &MatchHost<TdGame, C>) {
    let game = host.game();
    println!(
        "  [{:>5.1}s] Level {}, Wave {}, Enemies: {}, Towers: {}, Bullets: {}, Money: {}",
        host.now().as_secs_f64(),
        game.level_index() + 1,
        game.current_wave_index() + 1,
        game.enemies().len(),
        game.towers().len(),
        game.bullets().len(),
        game.money()
    );
}

fn print_event_summary(events: &[TdEvent]) {
    let mut towers_placed = 0;
    let mut towers_upgraded = 0;
    let mut rejected = 0;
    let mut enemies_spawned = 0;
    let mut enemies_killed = 0;
    let mut leaks = 0;
    let mut shots = 0;
    let mut income = 0u64;
    let mut waves_cleared = 0;
    let mut levels_completed = 0;

    for event in events {
        match event {
            TdEvent::TowerPlaced { .. } => towers_placed += 1,
            TdEvent::TowerUpgraded { .. } => towers_upgraded += 1,
            TdEvent::PlacementRejected { .. } | TdEvent::UpgradeRejected { .. } => rejected += 1,
            TdEvent::EnemySpawned { .. } => enemies_spawned += 1,
            TdEvent::EnemyKilled { .. } => enemies_killed += 1,
            TdEvent::EnemyLeaked { .. } => leaks += 1,
            TdEvent::BulletFired { .. } => shots += 1,
            TdEvent::IncomeGenerated { amount, .. } => income += u64::from(*amount),
            TdEvent::WaveCleared { .. } => waves_cleared += 1,
            TdEvent::LevelCompleted { .. } => levels_completed += 1,
            TdEvent::WaveStarted { .. }
            | TdEvent::LevelStarted { .. }
            | TdEvent::GameWon
            | TdEvent::GameLost => {}
        }
    }

    println!("\n=== Event Summary ===");
    println!("Towers placed: {}", towers_placed);
    println!("Towers upgraded: {}", towers_upgraded);
    println!("Rejected commands: {}", rejected);
    println!("Enemies spawned: {}", enemies_spawned);
    println!("Enemies killed: {}", enemies_killed);
    println!("Leaks: {}", leaks);
    println!("Shots fired: {}", shots);
    println!("Passive income: {}", income);
    println!("Waves cleared: {}", waves_cleared);
    println!("Levels completed: {}", levels_completed);
}
