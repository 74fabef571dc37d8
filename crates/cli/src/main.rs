//! puyo - headless runner for CPU matches and in-process relay rooms.

mod autopilot;

use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use autopilot::Autopilot;
use clap::{Parser, Subcommand, ValueEnum};
use puyo_engine::TimingConfig;
use puyo_match::{
    CpuMatch, LocalTransport, OnlineSession, RoomRegistry, Round, RoundConfig, RoundEvent,
    RoundInput,
};
use puyo_search::PlacementSearch;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level);

    match &args.mode {
        Mode::Cpu => run_cpu(&args),
        Mode::Relay { room } => run_relay(&args, room),
    }
}

/// Runs the chain puzzle headless: a steered player against the CPU, or two
/// steered players through an in-process relay room.
#[derive(Debug, Parser)]
#[command(name = "puyo", version)]
struct Args {
    #[command(subcommand)]
    mode: Mode,

    /// Seed for piece colors and nuisance columns. Random if unset.
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// JSON round config (attack table, timing, seed). Flags override it.
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Stop after this many pairs have locked on the CPU side (or either
    /// side in relay mode).
    #[arg(long, global = true, default_value = "200", value_name = "N")]
    pieces: u32,

    /// Wait out fall intervals and chain pauses instead of running flat out.
    #[arg(long, global = true)]
    real_time: bool,

    /// Override whether outgoing attack is netted against pending nuisance.
    #[arg(long, global = true)]
    netting: Option<Netting>,

    /// Default log filter; `RUST_LOG` takes precedence.
    #[arg(long, global = true, default_value = "info")]
    log_level: String,
}

#[derive(Debug, Subcommand)]
enum Mode {
    /// Steered player against the placement search.
    Cpu,
    /// Two steered players joined through an in-process relay room.
    Relay {
        #[arg(long, default_value = "demo")]
        room: String,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Netting {
    On,
    Off,
}

fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn load_config(args: &Args, preset: RoundConfig) -> Result<RoundConfig> {
    let mut config = match &args.config {
        Some(path) => RoundConfig::from_json_file(path)
            .with_context(|| format!("loading round config {}", path.display()))?,
        None => preset,
    };
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if !args.real_time {
        config.timing = TimingConfig::headless();
    }
    match args.netting {
        Some(Netting::On) => config.attack.netting = true,
        Some(Netting::Off) => config.attack.netting = false,
        None => {}
    }
    Ok(config)
}

fn pause(args: &Args, delays: &[Option<Duration>]) {
    if !args.real_time {
        return;
    }
    if let Some(delay) = delays.iter().flatten().min() {
        thread::sleep(*delay);
    }
}

fn run_cpu(args: &Args) -> Result<()> {
    let config = load_config(args, RoundConfig::cpu_match())?;
    info!(seed = ?config.seed, netting = config.attack.netting, "cpu match");

    let mut game = CpuMatch::new(config);
    let mut pilot = Autopilot::new(PlacementSearch::default());

    while !game.is_over() && game.cpu_locks() < args.pieces {
        if let Some(command) = pilot.next_command(game.player()) {
            let step = game.handle_player(RoundInput::Command(command));
            pilot.observe(Some(command), &step.player);
        }
        let step = game.tick();
        pilot.observe(None, &step.player);
        pause(args, &[game.player().next_delay(), game.cpu().next_delay()]);
    }

    report("player", game.player());
    report("cpu", game.cpu());
    match game.winner() {
        Some(side) => println!("winner: {side:?}"),
        None => println!("no winner after {} cpu pieces", game.cpu_locks()),
    }
    Ok(())
}

struct Seat {
    name: &'static str,
    session: OnlineSession<LocalTransport>,
    pilot: Autopilot,
    locks: u32,
}

impl Seat {
    fn step(&mut self) -> Result<()> {
        let events = self.session.pump()?;
        self.pilot.observe(None, &events);
        let command = self.pilot.next_command(self.session.round());
        if let Some(command) = command {
            let events = self.session.handle(RoundInput::Command(command))?;
            self.pilot.observe(Some(command), &events);
            self.count_locks(&events);
        }
        let events = self.session.handle(RoundInput::Tick)?;
        self.pilot.observe(None, &events);
        self.count_locks(&events);
        for notice in self.session.take_notices() {
            info!(seat = self.name, ?notice, "notice");
        }
        Ok(())
    }

    fn count_locks(&mut self, events: &[RoundEvent]) {
        self.locks += events.iter().filter(|e| **e == RoundEvent::Locked).count() as u32;
    }
}

fn run_relay(args: &Args, room: &str) -> Result<()> {
    let config = load_config(args, RoundConfig::versus())?;
    let relay = RoomRegistry::new();

    let mut seats = Vec::new();
    for (index, name) in ["east", "west"].into_iter().enumerate() {
        let seat_config = RoundConfig {
            seed: config.seed.map(|seed| seed.wrapping_add(index as u64)),
            ..config.clone()
        };
        let mut session = OnlineSession::new(seat_config, relay.connect());
        session
            .join(room)
            .with_context(|| format!("{name} joining room {room}"))?;
        seats.push(Seat {
            name,
            session,
            pilot: Autopilot::new(PlacementSearch::default()),
            locks: 0,
        });
    }
    info!(room, players = relay.room_size(room), "relay room ready");

    loop {
        for seat in &mut seats {
            seat.step()?;
        }
        let over = seats.iter().any(|s| s.session.round().is_game_over());
        let done = seats.iter().any(|s| s.locks >= args.pieces);
        if over || done {
            break;
        }
        let delays: Vec<_> = seats.iter().map(|s| s.session.round().next_delay()).collect();
        pause(args, &delays);
    }

    for seat in &mut seats {
        report(seat.name, seat.session.round());
        seat.session.close();
    }
    info!(rooms = relay.room_count(), "relay closed");
    Ok(())
}

fn report(name: &str, round: &Round) {
    println!(
        "{name}: score {} pending {}{}",
        round.score(),
        round.pending(),
        if round.is_game_over() { " (game over)" } else { "" }
    );
    print!("{}", round.grid());
}
