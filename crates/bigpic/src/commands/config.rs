use anyhow::Result;
use colored::Colorize;

use crate::cli::ConfigCommands;
use crate::config::{Config, DEFAULT_PATTERN};

pub fn run(command: ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Show => show(),
        ConfigCommands::Set { key, value } => set(&key, &value),
    }
}

fn show() -> Result<()> {
    let config = Config::load_or_default();
    let settings = config.overlay_settings();

    println!("{}", "Configuration".bold());
    if let Ok(path) = Config::path() {
        println!("  {} {}", "file:".dimmed(), path.display());
    }
    println!();
    println!("  defaults.theme                {}", config.theme());
    let pattern = config.pattern();
    if pattern == DEFAULT_PATTERN {
        println!("  defaults.pattern              {} {}", pattern, "(default)".dimmed());
    } else {
        println!("  defaults.pattern              {pattern}");
    }
    println!(
        "  presentation.transition       {}s",
        settings.duration.as_secs_f32()
    );
    println!("  presentation.easing           {}", settings.easing.name());
    println!("  presentation.fill             {}", settings.fill);
    println!(
        "  presentation.backdrop_opacity {}",
        settings.backdrop_opacity
    );
    println!("  presentation.navigate         {}", settings.navigate);
    println!("  presentation.wrap             {}", settings.wrap);
    println!("  presentation.cursor           {}", config.cursor());
    Ok(())
}

fn set(key: &str, value: &str) -> Result<()> {
    let mut config = Config::load_or_default();
    config.set(key, value)?;
    let path = config.save()?;
    println!(
        "{} {} = {} ({})",
        "Saved".green().bold(),
        key,
        value,
        path.display()
    );
    Ok(())
}
