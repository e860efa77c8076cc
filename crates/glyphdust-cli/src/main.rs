//! glyphdust CLI - render particle text animations to PNG frames

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{fit, render, watch};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "glyphdust")]
#[command(about = "Particle text animations, rendered headless", long_about = None)]
#[command(version)]
struct Cli {
    /// Log at debug level (RUST_LOG still wins when set)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render an animation to numbered PNG frames
    Render {
        /// Path to an animation config (TOML)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Text to animate (overrides the config file)
        #[arg(long)]
        text: Option<String>,

        /// Animation kind: fade-in or fade-out (overrides the config file)
        #[arg(long)]
        animation: Option<String>,

        /// Output directory for frames
        #[arg(short, long, default_value = "frames")]
        output: PathBuf,

        /// Canvas width in pixels
        #[arg(long)]
        width: Option<u32>,

        /// Canvas height in pixels
        #[arg(long)]
        height: Option<u32>,

        /// Number of frames to run
        #[arg(long, default_value_t = 180)]
        frames: u32,

        /// Frame at which the animation is triggered
        #[arg(long, default_value_t = 30)]
        trigger_at: u32,

        /// Frame at which the animation is reset
        #[arg(long)]
        reset_at: Option<u32>,

        /// Write only every Nth frame
        #[arg(long, default_value_t = 1)]
        every: u32,

        /// Background color (#rrggbb); transparent when omitted
        #[arg(long)]
        background: Option<String>,

        /// Font family for text rasterization
        #[arg(long)]
        font: Option<String>,

        /// Draw characters as solid blocks instead of font glyphs
        #[arg(long)]
        blocks: bool,
    },

    /// Re-render frames whenever the config file changes
    Watch {
        /// Path to an animation config (TOML)
        config: PathBuf,

        /// Output directory for frames
        #[arg(short, long, default_value = "frames")]
        output: PathBuf,

        /// Number of frames to run per render
        #[arg(long, default_value_t = 180)]
        frames: u32,

        /// Frame at which the animation is triggered
        #[arg(long, default_value_t = 30)]
        trigger_at: u32,

        /// Write only every Nth frame
        #[arg(long, default_value_t = 1)]
        every: u32,

        /// Background color (#rrggbb); transparent when omitted
        #[arg(long)]
        background: Option<String>,

        /// Font family for text rasterization
        #[arg(long)]
        font: Option<String>,

        /// Draw characters as solid blocks instead of font glyphs
        #[arg(long)]
        blocks: bool,
    },

    /// Print the font size a text would be fitted to
    Fit {
        /// Text to measure
        text: String,

        /// Target width in pixels
        #[arg(long, default_value_t = 640)]
        width: u32,

        /// Target height in pixels
        #[arg(long, default_value_t = 240)]
        height: u32,

        /// Font family used for measuring
        #[arg(long)]
        font: Option<String>,

        /// Measure as solid blocks instead of font glyphs
        #[arg(long)]
        blocks: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    match cli.command {
        Commands::Render {
            config,
            text,
            animation,
            output,
            width,
            height,
            frames,
            trigger_at,
            reset_at,
            every,
            background,
            font,
            blocks,
        } => render::run(render::RenderArgs {
            config,
            text,
            animation,
            output,
            width,
            height,
            frames,
            trigger_at,
            reset_at,
            every,
            background,
            font,
            blocks,
        }),
        Commands::Watch {
            config,
            output,
            frames,
            trigger_at,
            every,
            background,
            font,
            blocks,
        } => watch::run(render::RenderArgs {
            config: Some(config),
            text: None,
            animation: None,
            output,
            width: None,
            height: None,
            frames,
            trigger_at,
            reset_at: None,
            every,
            background,
            font,
            blocks,
        }),
        Commands::Fit {
            text,
            width,
            height,
            font,
            blocks,
        } => fit::run(&text, width, height, font, blocks),
    }
}
