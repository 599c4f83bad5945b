//! CLI argument parsing with clap derive macros.

use clap::{Parser, Subcommand};

/// Drive touch gestures through an in-app test agent.
///
/// Compiles touch-action sequences into the agent's native tap, long-press
/// and swipe commands and sends them over the agent's socket.
#[derive(Debug, Parser)]
#[command(name = "gesturewire", version)]
pub struct Cli {
    /// Agent host [env: GESTUREWIRE_HOST] [default: 127.0.0.1]
    #[arg(long, global = true)]
    pub host: Option<String>,

    /// Agent port [env: GESTUREWIRE_PORT] [default: 12345]
    #[arg(long, global = true)]
    pub port: Option<u16>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Perform a touch-action sequence read from a JSON file
    #[command(after_help = "\
The file holds a JSON array of steps, each {\"action\": ..., \"options\": {...}}.

Supported sequences:
  press -> release                 tap
  longPress -> release             long press
  press -> moveTo -> release       swipe
  longPress -> moveTo -> release   long-press swipe

Examples:
  gesturewire perform swipe.json
  echo '[{\"action\":\"press\",\"options\":{\"x\":5,\"y\":9}},{\"action\":\"release\"}]' | gesturewire perform -
  gesturewire perform --relative-move-to drag.json")]
    Perform(PerformArgs),

    /// Tap an element, an offset from an element, or an absolute point
    #[command(after_help = "\
Examples:
  gesturewire tap --element 42          # Element's default point
  gesturewire tap --element 42 5 5      # 5,5 from the element's top-left corner
  gesturewire tap 120 640               # Absolute screen point")]
    Tap(TapArgs),

    /// Click an element
    Click(ClickArgs),

    /// Print the application's UI tree
    Source,
}

#[derive(Debug, clap::Args)]
pub struct PerformArgs {
    /// Path to the JSON gesture file, or '-' for stdin
    pub file: String,

    /// Treat element-less moveTo coordinates as offsets from the start point
    #[arg(long)]
    pub relative_move_to: bool,
}

#[derive(Debug, clap::Args)]
pub struct TapArgs {
    /// Element id to tap
    #[arg(short, long)]
    pub element: Option<String>,

    /// X coordinate (absolute, or offset when --element is given)
    #[arg(default_value_t = 0.0, allow_negative_numbers = true)]
    pub x: f64,

    /// Y coordinate (absolute, or offset when --element is given)
    #[arg(default_value_t = 0.0, allow_negative_numbers = true)]
    pub y: f64,
}

#[derive(Debug, clap::Args)]
pub struct ClickArgs {
    /// Element id to click
    pub element: String,
}
