use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use glam::Vec3;
use skirmish_assets::{DeferredModelProvider, Model};
use skirmish_common::SimConfig;
use skirmish_input::Key;
use skirmish_kernel::{Scene, SceneEvent};
use skirmish_render::{DebugTextRenderer, DrawList, Renderer};
use tracing_subscriber::EnvFilter;

/// Drive forward, fire twice, turn, fire again.
const DEMO_SCRIPT: &str =
    "0:down:w,0.2:down:space,0.3:up:space,0.8:down:space,0.9:up:space,1.0:down:d,1.4:up:d,1.5:down:space,1.6:up:space,2.0:up:w";

#[derive(Parser)]
#[command(name = "skirmish-cli", about = "Headless host for the skirmish scene")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// YAML config file; defaults are used when omitted
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Print the effective configuration as YAML
    Config,
    /// Mount a scene, play an input script and print the result
    Run {
        /// Simulated seconds
        #[arg(short, long, default_value = "3")]
        seconds: f32,
        /// Tick rate in Hz
        #[arg(short, long, default_value = "60")]
        rate: f32,
        /// Input timeline: comma-separated `seconds:down|up:key` entries
        #[arg(long)]
        script: Option<String>,
        /// Ticks the model takes to load
        #[arg(long, default_value = "0")]
        load_ticks: u32,
        /// Print events and the final frame as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ScriptStep {
    at: f64,
    key: Key,
    pressed: bool,
}

fn parse_script(source: &str) -> anyhow::Result<Vec<ScriptStep>> {
    let mut steps = Vec::new();
    for entry in source.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let mut parts = entry.splitn(3, ':');
        let (Some(at), Some(action), Some(key)) = (parts.next(), parts.next(), parts.next()) else {
            bail!("script entry `{entry}` is not `seconds:down|up:key`");
        };
        let at: f64 = at
            .trim()
            .parse()
            .with_context(|| format!("bad time in script entry `{entry}`"))?;
        if !at.is_finite() || at < 0.0 {
            bail!("script time must be non-negative in `{entry}`");
        }
        let pressed = match action.trim() {
            "down" => true,
            "up" => false,
            other => bail!("unknown action `{other}` in script entry `{entry}`"),
        };
        let key = key.trim();
        let key = Key::ALL
            .into_iter()
            .find(|k| k.name() == key)
            .or_else(|| Key::normalize(key, ""))
            .with_context(|| format!("unknown key `{key}` in script entry `{entry}`"))?;
        steps.push(ScriptStep { at, key, pressed });
    }
    steps.sort_by(|a, b| a.at.total_cmp(&b.at));
    Ok(steps)
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<SimConfig> {
    let Some(path) = path else {
        return Ok(SimConfig::default());
    };
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config = SimConfig::from_yaml_str(&source)
        .with_context(|| format!("parsing config {}", path.display()))?;
    tracing::info!(path = %path.display(), "config loaded");
    Ok(config)
}

fn run(
    config: SimConfig,
    seconds: f32,
    rate: f32,
    script: &[ScriptStep],
    load_ticks: u32,
) -> anyhow::Result<Scene> {
    if !rate.is_finite() || rate <= 0.0 || !seconds.is_finite() || seconds < 0.0 {
        bail!("rate must be positive and seconds non-negative");
    }
    let model = Model::box_model("tank", Vec3::new(1.0, 0.8, 2.0))?;
    let mut scene = Scene::mount(config, DeferredModelProvider::new(model, load_ticks));

    let dt = 1.0 / rate;
    let ticks = (seconds * rate).round() as u64;
    let mut pending = script.iter().peekable();
    for _ in 0..ticks {
        while let Some(step) = pending.next_if(|s| s.at <= scene.clock()) {
            if step.pressed {
                scene.key_down(step.key);
            } else {
                scene.key_up(step.key);
            }
        }
        scene.step(dt);
    }
    tracing::info!(
        ticks = scene.tick(),
        live = scene.registry().len(),
        hash = scene.state_hash(),
        "run finished"
    );
    Ok(scene)
}

fn describe(event: &SceneEvent) -> String {
    match event {
        SceneEvent::ModelReady { tick } => format!("[{tick:>4}] model ready"),
        SceneEvent::Fired {
            tick,
            time,
            muzzle,
            projectile,
            burst,
            ..
        } => format!(
            "[{tick:>4}] fired at t={time:.3}s from ({:.2}, {:.2}, {:.2}) projectile={projectile} burst={burst}",
            muzzle.x, muzzle.y, muzzle.z
        ),
        SceneEvent::ProjectileExpired { tick, id, reason } => {
            format!("[{tick:>4}] projectile {id} expired ({reason:?})")
        }
        SceneEvent::BurstExpired { tick, id } => format!("[{tick:>4}] burst {id} expired"),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("skirmish-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("input: {}", skirmish_input::crate_info());
            println!("assets: {}", skirmish_assets::crate_info());
            println!("ecs: {}", skirmish_ecs::crate_info());
            println!("sim: {}", skirmish_sim::crate_info());
            println!("kernel: {}", skirmish_kernel::crate_info());
            println!("render: {}", skirmish_render::crate_info());
        }
        Commands::Config => {
            let config = load_config(cli.config.as_ref())?;
            print!("{}", config.to_yaml_string()?);
        }
        Commands::Run {
            seconds,
            rate,
            script,
            load_ticks,
            json,
        } => {
            let config = load_config(cli.config.as_ref())?;
            let script = parse_script(script.as_deref().unwrap_or(DEMO_SCRIPT))?;
            let scene = run(config, seconds, rate, &script, load_ticks)?;

            if json {
                let report = serde_json::json!({
                    "events": scene.events(),
                    "frame": DrawList::capture(&scene),
                    "state_hash": scene.state_hash(),
                });
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                for event in scene.events() {
                    println!("{}", describe(event));
                }
                print!("{}", DebugTextRenderer::new().render(&scene));
                println!("State hash: {:#x}", scene.state_hash());
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names_and_aliases() {
        let steps = parse_script("0.5:up:space, 0:down:w,0.1:down:fire").unwrap();
        assert_eq!(
            steps,
            vec![
                ScriptStep { at: 0.0, key: Key::Forward, pressed: true },
                ScriptStep { at: 0.1, key: Key::Fire, pressed: true },
                ScriptStep { at: 0.5, key: Key::Fire, pressed: false },
            ]
        );
    }

    #[test]
    fn rejects_malformed_entries() {
        assert!(parse_script("0:down").is_err());
        assert!(parse_script("x:down:w").is_err());
        assert!(parse_script("0:tap:w").is_err());
        assert!(parse_script("0:down:q").is_err());
        assert!(parse_script("-1:down:w").is_err());
    }

    #[test]
    fn demo_script_fires_three_times() {
        let script = parse_script(DEMO_SCRIPT).unwrap();
        let scene = run(SimConfig::default(), 3.0, 60.0, &script, 0).unwrap();
        let shots = scene
            .events()
            .iter()
            .filter(|e| matches!(e, SceneEvent::Fired { .. }))
            .count();
        assert_eq!(shots, 3);
    }

    #[test]
    fn config_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sim.yaml");
        std::fs::write(&path, "seed: 9\nvehicle:\n  fire_interval: 0.25\n").unwrap();
        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.seed, 9);
        assert_eq!(config.vehicle.fire_interval, 0.25);
    }

    #[test]
    fn invalid_config_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sim.yaml");
        std::fs::write(&path, "effect:\n  spawn_radius: -0.5\n").unwrap();
        assert!(load_config(Some(&path)).is_err());
        assert!(load_config(Some(&dir.path().join("missing.yaml"))).is_err());
    }

    #[test]
    fn rejects_bad_rate() {
        assert!(run(SimConfig::default(), 1.0, 0.0, &[], 0).is_err());
    }
}
