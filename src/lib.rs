pub mod adapters;
pub mod audio;
pub mod cli;
pub mod config;
pub mod events;
pub mod paths;
pub mod playback;
pub mod scaffold;
pub mod state;
mod store;

use std::io::{IsTerminal, Read};

use clap::CommandFactory;

use cli::{Cli, Commands};
use config::Config;
use events::Tool;
use paths::AppPaths;
use playback::{HookOutcome, SystemDispatcher};
use state::{State, StateLock};

/// Run one invocation and return its process exit code.
pub fn run(cli: Cli) -> anyhow::Result<i32> {
    setup_tracing(cli.verbose);
    let paths = AppPaths::discover()?;

    match cli.command {
        Some(Commands::On) => set_enabled(&paths, true),
        Some(Commands::Off) => set_enabled(&paths, false),
        Some(Commands::Toggle) => toggle(&paths),
        Some(Commands::Status) => status(&paths),
        Some(Commands::Init(args)) => init(&paths, args),
        Some(Commands::Events(args)) => list_events(args),
        Some(Commands::Hook(args)) => hook(&paths, args),
        Some(Commands::Play(args)) => play(&paths, args),
        None => {
            Cli::command().print_help()?;
            Ok(1)
        }
    }
}

fn setup_tracing(verbose: bool) {
    let filter = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn set_enabled(paths: &AppPaths, value: bool) -> anyhow::Result<i32> {
    let mut config = Config::load(paths)?;
    config.enabled = value;
    config.save(paths)?;
    println!("c-notify: {}", if value { "ON" } else { "OFF" });
    Ok(0)
}

fn toggle(paths: &AppPaths) -> anyhow::Result<i32> {
    let config = Config::load(paths)?;
    set_enabled(paths, !config.enabled)
}

fn status(paths: &AppPaths) -> anyhow::Result<i32> {
    let config = Config::load(paths)?;
    println!("c-notify: {}", if config.enabled { "ON" } else { "OFF" });
    println!("config: {}", paths.config_path().display());
    println!("state: {}", paths.state_path().display());
    println!("sound_root: {}", config.sound_root.display());
    Ok(0)
}

fn init(paths: &AppPaths, args: cli::InitArgs) -> anyhow::Result<i32> {
    let config = Config::load(paths)?;
    scaffold::init_sound_tree(&config, args.refresh_readmes)?;
    println!("c-notify: initialized at {}", config.sound_root.display());
    Ok(0)
}

fn list_events(args: cli::EventsArgs) -> anyhow::Result<i32> {
    let tools = match args.tool {
        Some(tool) => vec![tool],
        None => vec![Tool::Codex, Tool::Claude],
    };

    for (idx, tool) in tools.iter().enumerate() {
        if idx > 0 {
            println!();
        }
        println!("[{}]", tool.name());
        for (category, doc) in tool.event_docs() {
            println!("- {category}: {doc}");
        }
    }
    Ok(0)
}

fn play(paths: &AppPaths, args: cli::PlayArgs) -> anyhow::Result<i32> {
    let config = Config::load(paths)?;
    let category = events::slug(&args.event);

    let result = {
        let _lock = StateLock::acquire(paths)?;
        let mut state = State::load(paths);
        let result = playback::attempt_playback(
            args.tool,
            std::slice::from_ref(&category),
            &config,
            &mut state,
            &SystemDispatcher,
        );
        state.save(paths)?;
        result
    };

    match result.file {
        Some(file) => {
            let name = file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let played = result.category.unwrap_or(category);
            println!("c-notify: played {}/{} -> {}", args.tool.name(), played, name);
            Ok(0)
        }
        None => {
            println!(
                "c-notify: no playable sound for {}/{}",
                args.tool.name(),
                category
            );
            Ok(1)
        }
    }
}

fn hook(paths: &AppPaths, args: cli::HookArgs) -> anyhow::Result<i32> {
    let config = Config::load(paths)?;
    if !config.enabled {
        return Ok(0);
    }

    let payload_text = resolve_payload_text(args.payload, &args.extra);
    let (normalized, candidates) =
        adapters::resolve_events(args.tool, &payload_text, &args.event, &config);

    let result = {
        let _lock = StateLock::acquire(paths)?;
        let mut state = State::load(paths);
        let result = playback::attempt_playback(
            args.tool,
            &candidates,
            &config,
            &mut state,
            &SystemDispatcher,
        );
        state.save(paths)?;
        result
    };

    if args.debug {
        let report = serde_json::json!({
            "tool": args.tool.name(),
            "normalized_event": normalized,
            "candidates": candidates,
            "played_event": result.category.clone().unwrap_or_default(),
            "played_file": result
                .file
                .as_ref()
                .map(|f| f.display().to_string())
                .unwrap_or_default(),
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    let outcome = HookOutcome::classify(&candidates, &result);
    Ok(outcome.exit_code(config.hook_strict_exit))
}

/// Payload precedence: explicit flag, first positional token, then stdin
/// (when piped).
fn resolve_payload_text(payload: Option<String>, extra: &[String]) -> String {
    if let Some(payload) = payload {
        return payload;
    }
    if let Some(first) = extra.first() {
        return first.clone();
    }

    let mut stdin = std::io::stdin();
    if stdin.is_terminal() {
        return String::new();
    }
    let mut input = String::new();
    match stdin.read_to_string(&mut input) {
        Ok(_) => input.trim().to_string(),
        Err(_) => String::new(),
    }
}
