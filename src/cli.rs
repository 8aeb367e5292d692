use clap::{Args, Parser, Subcommand};

use crate::events::Tool;

#[derive(Parser, Debug)]
#[command(
    name = "c-notify",
    version,
    about = "Event-based sound notifications for Codex and Claude"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(about = "Enable sound playback")]
    On,
    #[command(about = "Disable sound playback")]
    Off,
    #[command(about = "Toggle sound playback")]
    Toggle,
    #[command(about = "Show runtime status")]
    Status,
    #[command(about = "Initialize the sound directory tree and README files")]
    Init(InitArgs),
    #[command(about = "List known events")]
    Events(EventsArgs),
    #[command(about = "Hook entrypoint for Codex/Claude")]
    Hook(HookArgs),
    #[command(about = "Manually play one event folder")]
    Play(PlayArgs),
}

#[derive(Args, Debug)]
pub struct InitArgs {
    #[arg(long, help = "Rewrite event README.md files")]
    pub refresh_readmes: bool,
}

#[derive(Args, Debug)]
pub struct EventsArgs {
    #[arg(long, value_enum, help = "Filter to one tool")]
    pub tool: Option<Tool>,
}

#[derive(Args, Debug)]
pub struct HookArgs {
    #[arg(long, value_enum, help = "Event source tool")]
    pub tool: Tool,

    #[arg(long, default_value = "", help = "Optional explicit event name")]
    pub event: String,

    #[arg(long, help = "Optional explicit payload JSON/string")]
    pub payload: Option<String>,

    #[arg(long, help = "Print resolution details")]
    pub debug: bool,

    #[arg(
        value_name = "EXTRA",
        help = "Extra args; first token is treated as payload when --payload is absent"
    )]
    pub extra: Vec<String>,
}

#[derive(Args, Debug)]
pub struct PlayArgs {
    #[arg(long, value_enum, help = "Tool namespace")]
    pub tool: Tool,

    #[arg(long, help = "Event folder name")]
    pub event: String,
}
