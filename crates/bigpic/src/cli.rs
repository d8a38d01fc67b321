use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::config::Config;

#[derive(Parser)]
#[command(name = "bigpic")]
#[command(author, version, about)]
#[command(long_about = "A click-to-enlarge image presentation viewer.\n\n\
    Point it at a folder and click any thumbnail to morph it into a\n\
    full-screen view. Arrow keys move between images in the same folder.\n\n\
    Examples:\n  \
    bigpic ~/Pictures             View a folder (fullscreen)\n  \
    bigpic . --windowed           View the current folder in a window\n  \
    bigpic . --no-wrap            Stop at the ends instead of wrapping\n  \
    bigpic config show            Print the active configuration")]
#[command(propagate_version = true)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// Directory of images to view
    pub dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Launch in a window instead of fullscreen
    #[arg(long, global = false)]
    pub windowed: bool,

    /// Regex selecting presentable files (over the path relative to DIR)
    #[arg(long, value_name = "REGEX")]
    pub pattern: Option<String>,

    /// Morph animation duration in seconds
    #[arg(long, value_name = "SECS")]
    pub transition: Option<f32>,

    /// Fraction of the viewport the enlarged image may fill
    #[arg(long, value_name = "FRACTION")]
    pub fill: Option<f32>,

    /// Theme name (light or dark)
    #[arg(long)]
    pub theme: Option<String>,

    /// Disable arrow-key navigation while presenting
    #[arg(long)]
    pub no_navigate: bool,

    /// Clamp at group ends instead of wrapping around
    #[arg(long)]
    pub no_wrap: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// View and modify configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Show version information
    Version,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Display current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g. defaults.theme, presentation.transition)
        key: String,

        /// Value to set
        value: String,
    },
}

#[derive(Clone, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        match self.command {
            Some(Commands::Config { command }) => crate::commands::config::run(command),
            Some(Commands::Completion { shell }) => {
                crate::commands::completion::run(shell);
                Ok(())
            }
            Some(Commands::Version) => {
                println!("bigpic {}", env!("CARGO_PKG_VERSION"));
                Ok(())
            }
            None => {
                if let Some(dir) = self.dir.clone() {
                    if !dir.is_dir() {
                        anyhow::bail!("Not a directory: {}", dir.display());
                    }
                    let mut config = Config::load_or_default();
                    self.apply_overrides(&mut config)?;
                    crate::app::run(dir, config, self.windowed)
                } else {
                    use clap::CommandFactory;
                    let mut cmd = Self::command();
                    cmd.print_help()?;
                    println!();
                    Ok(())
                }
            }
        }
    }

    /// Flags win over the config file for this run only.
    fn apply_overrides(&self, config: &mut Config) -> anyhow::Result<()> {
        if let Some(pattern) = &self.pattern {
            config.set("defaults.pattern", pattern)?;
        }
        if let Some(theme) = &self.theme {
            config.set("defaults.theme", theme)?;
        }
        if let Some(transition) = self.transition {
            config.set("presentation.transition", &transition.to_string())?;
        }
        if let Some(fill) = self.fill {
            config.set("presentation.fill", &fill.to_string())?;
        }
        if self.no_navigate {
            config.set("presentation.navigate", "false")?;
        }
        if self.no_wrap {
            config.set("presentation.wrap", "false")?;
        }
        Ok(())
    }
}
