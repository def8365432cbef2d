use anyhow::{bail, Context, Result};
use delve_agent::{write_json, Engine, EngineConfig, EngineError};
use delve_core::{classify, EventBus, Fighter, LootOffer, RunState};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

/// The snapshot as the game server materializes it: typed fighters,
/// raw loot offers. Classification happens here, at the boundary.
#[derive(Debug, Deserialize)]
struct SnapshotPayload {
    player: Fighter,
    enemies: Vec<Fighter>,
    #[serde(default)]
    current_enemy_index: usize,
    #[serde(default)]
    loot_phase: bool,
    #[serde(default)]
    loot_offers: Vec<LootOffer>,
    #[serde(default)]
    total_rooms: Option<u32>,
    #[serde(default)]
    current_room_index: Option<u32>,
}

impl SnapshotPayload {
    fn into_state(self) -> RunState {
        let loot_options = self.loot_offers.iter().map(classify).collect();
        RunState {
            player: self.player,
            enemies: self.enemies,
            current_enemy_index: self.current_enemy_index,
            loot_phase: self.loot_phase,
            loot_options,
            total_rooms: self.total_rooms,
            current_room_index: self.current_room_index,
        }
    }
}

#[derive(Debug, Default)]
struct CliOptions {
    snapshot: Option<PathBuf>,
    explain: bool,
    horizon: Option<u32>,
    trace: Option<PathBuf>,
}

const USAGE: &str = "usage: delve <snapshot.json> [--explain] [--horizon N] [--trace out.json]";

fn parse_args(args: &[String]) -> Result<CliOptions> {
    let mut options = CliOptions::default();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--explain" => options.explain = true,
            "--horizon" => {
                let value = iter.next().context("--horizon needs a value")?;
                options.horizon = Some(value.parse().context("--horizon must be an integer")?);
            }
            "--trace" => {
                let value = iter.next().context("--trace needs a path")?;
                options.trace = Some(PathBuf::from(value));
            }
            "--help" | "-h" => bail!("{USAGE}"),
            other if other.starts_with('-') => bail!("unknown flag {other}\n{USAGE}"),
            other => {
                if options.snapshot.is_some() {
                    bail!("only one snapshot path is accepted\n{USAGE}");
                }
                options.snapshot = Some(PathBuf::from(other));
            }
        }
    }
    Ok(options)
}

fn run(options: CliOptions) -> Result<()> {
    let path = options.snapshot.as_deref().context(USAGE)?;
    let body = fs::read_to_string(path)
        .with_context(|| format!("reading snapshot {}", path.display()))?;
    let payload: SnapshotPayload =
        serde_json::from_str(&body).context("snapshot does not match the payload schema")?;
    let state = payload.into_state();

    let mut config = EngineConfig::default();
    if let Some(horizon) = options.horizon {
        config.horizon = horizon.max(1);
    }
    let engine = Engine {
        config,
        ..Engine::default()
    };

    let mut events = EventBus::default();
    let (action, record) = engine.decide_traced(&state, &mut events)?;

    println!("{}", action.short_label());
    if options.explain {
        println!("{}", record.to_text_report());
        for event in events.drain() {
            println!("event: {event:?}");
        }
    }
    if let Some(trace_path) = &options.trace {
        write_json(trace_path, &record)
            .with_context(|| format!("writing trace {}", trace_path.display()))?;
    }
    Ok(())
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = match parse_args(&args) {
        Ok(options) => options,
        Err(err) => {
            eprintln!("{err:#}");
            return ExitCode::from(2);
        }
    };
    match run(options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            let invalid_input = err.is::<EngineError>()
                || err.is::<serde_json::Error>()
                || err.is::<std::io::Error>();
            ExitCode::from(if invalid_input { 2 } else { 1 })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use delve_core::LootOption;

    #[test]
    fn args_round_trip() {
        let options = parse_args(&[
            "snap.json".to_string(),
            "--explain".to_string(),
            "--horizon".to_string(),
            "4".to_string(),
        ])
        .unwrap();
        assert_eq!(options.snapshot.as_deref().unwrap().to_str(), Some("snap.json"));
        assert!(options.explain);
        assert_eq!(options.horizon, Some(4));
        assert!(parse_args(&["--horizon".to_string()]).is_err());
        assert!(parse_args(&["--bogus".to_string()]).is_err());
    }

    #[test]
    fn payload_classifies_raw_offers() {
        let body = r#"{
            "player": {
                "health": {"current": 10, "max": 20},
                "armor": {"current": 0, "max": 4},
                "rock": {"atk": 3, "def": 0, "charges": 3},
                "paper": {"atk": 2, "def": 1, "charges": 2},
                "scissor": {"atk": 2, "def": 0, "charges": 1}
            },
            "enemies": [],
            "loot_phase": true,
            "loot_offers": [
                {"kind": "Heal", "value": 5},
                {"kind": "boon", "label": "Rusty Sword", "value": 1}
            ]
        }"#;
        let payload: SnapshotPayload = serde_json::from_str(body).unwrap();
        let state = payload.into_state();
        assert_eq!(state.loot_options[0], LootOption::Heal(5));
        assert_eq!(state.loot_options[1], LootOption::UpgradeRock(1, 0));
    }
}
