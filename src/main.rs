use color_eyre::eyre::{eyre, Result};
use spinwheel::app::App;
use spinwheel::spin::SpinEngine;
use spinwheel::wheel::Wheel;
use spinwheel::{geometry, svg};
use std::path::PathBuf;
use std::sync::OnceLock;
use std::time::{Duration, Instant};
use tokio::time;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::{fmt, EnvFilter};

mod ui;

// Keeps the non-blocking log writer alive for the process lifetime.
static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

const FRAME_INTERVAL: Duration = Duration::from_millis(33);

struct AppConfig {
    labels: Vec<String>,
    party: Option<usize>,
    seed: Option<u64>,
    svg_out: Option<PathBuf>,
    dump_layout: bool,
}

fn print_usage_and_exit() -> ! {
    println!(
        "Usage: spinwheel [--label <text>]... [--party <n>] [--seed <n>]\n\
         [--svg <path>] [--dump-layout]\n\
         \n\
         Flags:\n\
           --label <text>  Add an option to the wheel (repeat; at least 2)\n\
           --party <n>     Fill the wheel with <n> generated first names\n\
           --seed <n>      Seed the spin randomness for a replayable session\n\
           --svg <path>    Render the wheel to an SVG file and exit\n\
           --dump-layout   Print the computed slice geometry as JSON and exit"
    );
    std::process::exit(0);
}

fn parse_cli_args() -> Result<AppConfig> {
    let mut args = std::env::args().skip(1);
    let mut config = AppConfig {
        labels: Vec::new(),
        party: None,
        seed: None,
        svg_out: None,
        dump_layout: false,
    };

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--label" => {
                let label = args
                    .next()
                    .ok_or_else(|| eyre!("--label requires a text argument"))?;
                config.labels.push(label);
            }
            "--party" => {
                let n = args
                    .next()
                    .ok_or_else(|| eyre!("--party requires a count argument"))?;
                if config.party.is_some() {
                    return Err(eyre!("--party may only be specified once"));
                }
                config.party = Some(n.parse().map_err(|_| eyre!("invalid --party count: {n}"))?);
            }
            "--seed" => {
                let n = args
                    .next()
                    .ok_or_else(|| eyre!("--seed requires a number argument"))?;
                if config.seed.is_some() {
                    return Err(eyre!("--seed may only be specified once"));
                }
                config.seed = Some(n.parse().map_err(|_| eyre!("invalid --seed value: {n}"))?);
            }
            "--svg" => {
                let path = args
                    .next()
                    .ok_or_else(|| eyre!("--svg requires a path argument"))?;
                if config.svg_out.is_some() {
                    return Err(eyre!("--svg may only be specified once"));
                }
                config.svg_out = Some(PathBuf::from(path));
            }
            "--dump-layout" => config.dump_layout = true,
            "--help" | "-h" => print_usage_and_exit(),
            other => return Err(eyre!("Unknown argument: {other}")),
        }
    }

    if config.party.is_some() && !config.labels.is_empty() {
        return Err(eyre!("--party and --label are mutually exclusive"));
    }

    Ok(config)
}

fn build_wheel(config: &AppConfig) -> Result<Wheel> {
    if let Some(n) = config.party {
        let names: Vec<String> = (0..n).map(|_| fakeit::name::first()).collect();
        return Wheel::from_labels(&names)
            .map_err(|_| eyre!("--party needs a count of at least 2"));
    }
    if !config.labels.is_empty() {
        return Wheel::from_labels(&config.labels)
            .map_err(|_| eyre!("at least 2 non-blank --label values are required"));
    }
    Ok(Wheel::default())
}

fn init_tracing() -> Result<()> {
    // Stdout belongs to ratatui, so logs go to a rolling file instead.
    let appender = rolling::daily("logs", "spinwheel.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    LOG_GUARD
        .set(guard)
        .map_err(|_| eyre!("tracing initialized twice"))?;
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(writer)
        .with_ansi(false)
        .init();
    Ok(())
}

#[derive(serde::Serialize)]
struct LayoutEntry<'a> {
    index: usize,
    label: &'a str,
    color: String,
    path: geometry::SlicePath,
    d: String,
    placement: geometry::LabelPlacement,
}

fn dump_layout(wheel: &Wheel) -> Result<()> {
    let n = wheel.len();
    let entries: Vec<LayoutEntry> = wheel
        .items()
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let path = geometry::slice_path(index, n);
            LayoutEntry {
                index,
                label: &item.label,
                color: item.color.to_hex(),
                d: path.d(),
                path,
                placement: geometry::label_placement(index, n),
            }
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&entries)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let config = parse_cli_args()?;
    let wheel = build_wheel(&config)?;

    if config.dump_layout {
        return dump_layout(&wheel);
    }
    if let Some(path) = &config.svg_out {
        std::fs::write(path, svg::render(wheel.items(), 0.0))?;
        println!("wrote {}", path.display());
        return Ok(());
    }

    init_tracing()?;
    tracing::info!(items = wheel.len(), "starting spinwheel");
    let engine = match config.seed {
        Some(seed) => SpinEngine::with_seed(seed),
        None => SpinEngine::new(),
    };
    let mut app = App::new(wheel, engine);
    run_app(&mut app).await
}

async fn run_app(app: &mut App) -> Result<()> {
    let mut ui_state = ui::UiState::default();
    ui::terminal_enter(&mut ui_state)?;
    let res = run_loop(app, &mut ui_state).await;
    ui::terminal_exit()?;
    res
}

async fn run_loop(app: &mut App, ui_state: &mut ui::UiState) -> Result<()> {
    let mut ticker = time::interval(FRAME_INTERVAL);
    let mut snapshot = app.snapshot(Instant::now());
    ui::draw(ui_state, &snapshot)?;
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => { break; }
            _ = ticker.tick() => {
                let now = Instant::now();
                while let Some(event) = ui::poll_event(ui_state, &snapshot)? {
                    match event {
                        ui::UserEvent::Quit => return Ok(()),
                        ui::UserEvent::Spin => { let _ = app.spin(now); }
                        ui::UserEvent::ConfirmAdd { label } => { let _ = app.add(&label); }
                        ui::UserEvent::ConfirmDelete { id } => { let _ = app.remove(id); }
                        ui::UserEvent::Redraw => {}
                    }
                }
                app.tick(now);
                snapshot = app.snapshot(now);
                ui::draw(ui_state, &snapshot)?;
            }
        }
    }
    Ok(())
}
