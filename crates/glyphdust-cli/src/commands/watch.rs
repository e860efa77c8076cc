//! Re-render on config changes

use super::render::{RenderArgs, Session};
use anyhow::{Context, Result};
use notify::RecursiveMode;
use notify_debouncer_mini::new_debouncer;
use std::sync::mpsc;
use std::time::Duration;

pub fn run(args: RenderArgs) -> Result<()> {
    let config_path = args
        .config
        .clone()
        .context("watch needs a config file")?;

    let mut session = Session::start(args)?;
    session.render()?;

    let (tx, rx) = mpsc::channel();
    let mut debouncer =
        new_debouncer(Duration::from_millis(300), tx).context("Failed to create file watcher")?;
    debouncer
        .watcher()
        .watch(&config_path, RecursiveMode::NonRecursive)
        .context("Failed to watch config file")?;

    println!(
        "Watching {} for changes (Ctrl+C to stop)...",
        config_path.display()
    );

    for result in rx {
        match result {
            Ok(events) => {
                if events.is_empty() {
                    continue;
                }
                println!("Config changed, re-rendering...");
                // A broken edit keeps the previous field; the next save retries
                if let Err(e) = session.reload().and_then(|()| session.render()) {
                    eprintln!("Render failed: {e:#}");
                }
            }
            Err(e) => {
                eprintln!("Watch error: {e:?}");
            }
        }
    }

    Ok(())
}
