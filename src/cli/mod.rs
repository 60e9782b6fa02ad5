//! Command-line interface parsing and handling
//!
//! This module handles parsing command-line arguments and executing the appropriate commands.

pub mod health;
pub mod history;
pub mod mode;
pub mod say;
pub mod settings;


use std::error::Error;
use std::io;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::debug;

use crate::api::HttpChatApi;
use crate::core::config::Config;
use crate::core::mode::Mode;
use crate::core::session::SessionRuntime;
use crate::core::store::FileStore;
use crate::utils::logging::{self, LogTarget};
use crate::ui::chat_loop::{run_chat, ChatOptions};
use crate::ui::theme::Theme;

#[derive(Parser, Debug)]
#[command(name = "chatguard")]
#[command(version)]
#[command(about = "A terminal chat client with moderated replies")]
#[command(
    long_about = "ChatGuard is a terminal chat client for a moderated chat service. \
Every reply is tagged safe, offensive or irrelevant, and the conversation and reply \
mode are kept between sessions.\n\n\
Environment Variables:\n\
  CHATGUARD_API_URL   Chat service base URL (overrides the config file)\n\
  CHATGUARD_LOG       Log filter, e.g. 'debug' or 'chatguard=trace'\n\n\
Controls:\n\
  Enter             Send the message\n\
  Ctrl+F            Toggle between formal and funny replies\n\
  Ctrl+L            Clear the conversation (asks for confirmation)\n\
  Up/Down/PgUp/PgDn Scroll through the conversation\n\
  Esc or Ctrl+C     Quit"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Chat service base URL, e.g. http://localhost:5001/api
    #[arg(short = 'u', long, global = true, value_name = "URL")]
    pub base_url: Option<String>,

    /// Write diagnostic logs to this file
    #[arg(long, global = true, value_name = "FILE")]
    pub debug_log: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the chat interface (default)
    Chat,
    /// Send one message and print the reply
    Say {
        /// Message to send
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        message: Vec<String>,
    },
    /// Show the reply mode, or set it to formal or funny
    Mode {
        /// New mode
        mode: Option<Mode>,
    },
    /// Print the saved conversation
    History,
    /// Delete the saved conversation
    Clear {
        /// Do not ask for confirmation
        #[arg(short = 'y', long)]
        yes: bool,
    },
    /// Check whether the chat service is reachable
    Health,
    /// Set configuration values, or show them when no value is given
    Set {
        /// Configuration key to set
        key: Option<String>,
        /// Value to set for the key
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        value: Vec<String>,
    },
    /// Unset configuration values
    Unset {
        /// Configuration key to unset
        key: String,
    },
}

impl Commands {
    fn is_interactive(&self) -> bool {
        matches!(self, Commands::Chat)
    }
}

pub fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let command = args.command.unwrap_or(Commands::Chat);
    logging::init(LogTarget::for_command(
        args.debug_log.clone(),
        command.is_interactive(),
    ))?;

    tokio::runtime::Runtime::new()?.block_on(async_main(command, args.base_url))
}

fn resolve_theme(config: &Config) -> Theme {
    match config.theme.as_deref() {
        Some(name) => Theme::from_name(name).unwrap_or_else(|| {
            tracing::warn!("unknown theme '{name}' in config, using dark");
            Theme::dark_default()
        }),
        None => Theme::dark_default(),
    }
}

async fn async_main(command: Commands, base_url: Option<String>) -> Result<(), Box<dyn Error>> {
    let mut config = Config::load()?;
    let base_url = config.effective_base_url(base_url.as_deref());
    debug!(?command, %base_url, "running command");

    // Commands that never touch the chat service or the store.
    match command {
        Commands::Set { key, value } => {
            let Some(key) = key.filter(|_| !value.is_empty()) else {
                config.print_all();
                return Ok(());
            };
            return match settings::set_setting(&mut config, &key, &value) {
                Ok(message) => {
                    config.save()?;
                    println!("{message}");
                    Ok(())
                }
                Err(err) => {
                    err.print();
                    std::process::exit(1);
                }
            };
        }
        Commands::Unset { key } => {
            return match settings::unset_setting(&mut config, &key) {
                Ok(message) => {
                    config.save()?;
                    println!("{message}");
                    Ok(())
                }
                Err(err) => {
                    err.print();
                    std::process::exit(1);
                }
            };
        }
        _ => {}
    }

    let data_dir = config.resolve_data_dir()?;
    if let Commands::Chat = command {
        return run_chat(ChatOptions {
            base_url,
            request_timeout: config.request_timeout(),
            data_dir,
            theme: resolve_theme(&config),
        })
        .await;
    }

    let api = HttpChatApi::new(base_url.clone(), config.request_timeout())?;
    if let Commands::Health = command {
        return health::run_health(&api, &base_url, &mut io::stdout()).await;
    }

    let mut runtime = SessionRuntime::new(FileStore::new(data_dir), api);
    let mut stdout = io::stdout();
    match command {
        Commands::Say { message } => say::run_say(&mut runtime, &message, &mut stdout).await,
        Commands::Mode { mode: new_mode } => {
            mode::run_mode(&mut runtime, new_mode, &mut stdout).await
        }
        Commands::History => history::run_history(&mut runtime, &mut stdout).await,
        Commands::Clear { yes } => {
            let mut stdin = io::stdin().lock();
            history::run_clear(&mut runtime, yes, &mut stdin, &mut stdout).await
        }
        Commands::Chat | Commands::Health | Commands::Set { .. } | Commands::Unset { .. } => Ok(()),
    }
}
