// Entrypoint for the CLI.
// - Each subcommand maps to exactly one backend call; privileged commands
//   run the address + certificate pre-flight first.
// - Returns `anyhow::Result` so fatal conditions exit non-zero with their
//   message; transport failures on read commands are printed and exit zero.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use indicatif::{ProgressBar, ProgressStyle};

use scoutctl::api::{ApiClient, ApiError, Badge, Modification, ScoreModification};
use scoutctl::auth;
use scoutctl::config::{self, Config};
use scoutctl::credentials::CredentialStore;
use scoutctl::session;

#[derive(Parser)]
#[command(name = "scoutctl", about = "CLI client for the scouting-data backend", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Set the event key the backend serves data for
    #[command(visible_alias = "sk")]
    SetKey {
        #[arg(short, long, help = "TBA event key")]
        key: String,
    },

    /// Log in to the backend; prompts for anything not given as a flag
    #[command(visible_alias = "L")]
    Login {
        #[arg(short, long)]
        username: Option<String>,
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Check the server is reachable
    #[command(visible_alias = "v")]
    Validate,

    /// Fetch the schedule for the currently selected event
    GetSchedule,

    /// Update the address the CLI sends requests to
    UpdateAddress {
        #[arg(short, long)]
        address: String,
    },

    /// Update the sheet the backend reads from
    UpdateSheet {
        #[arg(short, long)]
        sheet: String,
    },

    /// Fetch the schedule of a single scouter
    GetScouterSchedule {
        #[arg(long)]
        scouter: String,
    },

    /// Fetch the leaderboard
    GetLeaderboard,

    /// Print the cached server address
    GetAddress,

    /// List all users
    GetUsers,

    /// Generate a bcrypt password hash
    GenPassword {
        #[arg(short, long)]
        password: String,
    },

    /// Modify a scouter's leaderboard score
    ModifyLeaderboard {
        #[arg(short, long, help = "Name of scouter to modify")]
        name: String,
        #[arg(short, long, help = "Increase, Decrease, or Set")]
        modification: Modification,
        #[arg(short, long, help = "How much to modify by")]
        by: i64,
    },

    /// Add a badge to a scouter
    AddBadge {
        #[arg(short, long, help = "Name of scouter to modify")]
        name: String,
        #[arg(short, long, help = "The badge name to add")]
        badge: String,
        #[arg(short, long, help = "The badge description")]
        description: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_dir = config::default_config_dir()?;
    let config = Config::load_from(&config_dir)?;
    let store = CredentialStore::new(&config_dir);

    match cli.command {
        Command::UpdateAddress { address } => {
            config::update_address(&config_dir, &address)?;
            println!("Address updated to {address}");
        }

        Command::GetAddress => {
            println!("{}", config.address);
        }

        Command::GenPassword { password } => {
            // Cost 6 matches what the backend was provisioned with.
            let hashed = bcrypt::hash(&password, 6).context("failed to hash password")?;
            println!("{hashed}");
        }

        Command::Login { username, password } => {
            session::check_address_configured(&config)?;
            let api = ApiClient::new(&config.address)?;

            let username = match username {
                Some(u) => u,
                None => Input::new().with_prompt("Username").interact_text()?,
            };
            let password = match password {
                Some(p) => p,
                None => Password::new().with_prompt("Password").interact()?,
            };

            let spinner = spinner("Logging in...");
            let body = auth::login(&api, &store, &username, &password);
            spinner.finish_and_clear();
            println!("{}", body?);
        }

        Command::Validate => {
            session::check_address_configured(&config)?;
            let api = ApiClient::new(&config.address)?;
            let certificate = store.load_or_default().certificate;
            if api.is_reachable(&certificate) {
                println!("Server validated to be on!");
            } else {
                println!(
                    "Server offline. Please make sure {} is the right address.",
                    config.address
                );
            }
        }

        Command::GetSchedule => {
            session::check_address_configured(&config)?;
            let api = ApiClient::new(&config.address)?;
            render(api.schedule())?;
        }

        Command::SetKey { key } => {
            let api = preflight(&config, &store)?;
            let certificate = store.load_or_default().certificate;
            // Transport failure here is fatal: key rotation needs a
            // confirmed response.
            let body = api.key_change(&certificate, &key)?;
            println!("{body}");
        }

        Command::UpdateSheet { sheet } => {
            let api = preflight(&config, &store)?;
            render(api.update_sheet(&sheet))?;
        }

        Command::GetScouterSchedule { scouter } => {
            let api = preflight(&config, &store)?;
            let certificate = store.load_or_default().certificate;
            render(api.scouter_schedule(&certificate, &scouter))?;
        }

        Command::GetLeaderboard => {
            let api = preflight(&config, &store)?;
            render(api.leaderboard())?;
        }

        Command::GetUsers => {
            let api = preflight(&config, &store)?;
            let certificate = store.load_or_default().certificate;
            render(api.all_users(&certificate))?;
        }

        Command::ModifyLeaderboard {
            name,
            modification,
            by,
        } => {
            let api = preflight(&config, &store)?;
            let certificate = store.load_or_default().certificate;
            let body = ScoreModification {
                name,
                by,
                modification,
            };
            render(api.modify_score(&certificate, &body))?;
        }

        Command::AddBadge {
            name,
            badge,
            description,
        } => {
            let api = preflight(&config, &store)?;
            let certificate = store.load_or_default().certificate;
            let body = Badge {
                id: badge,
                description,
            };
            render(api.add_badge(&certificate, &name, &body))?;
        }
    }

    Ok(())
}

/// Address + certificate checks shared by every privileged command.
fn preflight(config: &Config, store: &CredentialStore) -> Result<ApiClient> {
    session::check_address_configured(config)?;
    let api = ApiClient::new(&config.address)?;
    session::check_certificate_valid(&api, store)?;
    Ok(api)
}

/// Print a response body verbatim. A transport failure on a read command is
/// reported but not fatal; the invocation still exits zero.
fn render(result: Result<String, ApiError>) -> Result<()> {
    match result {
        Ok(body) => println!("{body}"),
        Err(e @ ApiError::NoResponse(_)) => println!("{e}"),
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

fn spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::with_template("{spinner} {msg}").unwrap());
    pb.set_message(message);
    pb
}
