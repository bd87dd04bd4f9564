use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use freesound::{cli, config, error};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Log in, log out or check the session
    #[command(subcommand)]
    Auth(AuthCommand),

    /// Search tracks, artists, albums and playlists
    Search(SearchOptions),

    /// Show an artist's top tracks and albums
    Artist(IdOption),

    /// Show an album's tracks
    Album(IdOption),

    /// List your playlists
    Playlists,

    /// Show the tracks of a playlist
    Playlist(PlaylistOptions),

    /// Show your home page
    Home,

    /// Show your profile and top artists
    Profile,

    /// Open the interactive player
    Play(PlayOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Subcommand, Debug, Clone)]
pub enum AuthCommand {
    /// Log in with Spotify through the browser
    Login,
    /// End the session
    Logout,
    /// Show who is logged in
    Status,
}

#[derive(Parser, Debug, Clone)]
pub struct SearchOptions {
    /// What to search for
    #[clap(required = true, num_args = 1..)]
    query: Vec<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct IdOption {
    /// Spotify id
    id: String,
}

#[derive(Parser, Debug, Clone)]
pub struct PlaylistOptions {
    /// Spotify playlist id
    id: String,
    /// Number of tracks to show
    #[clap(long)]
    limit: Option<u32>,
    /// Index of the first track to show
    #[clap(long)]
    offset: Option<u32>,
}

#[derive(Parser, Debug, Clone)]
pub struct PlayOptions {
    /// Start with a search
    #[clap(long, short)]
    query: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    match cli.command {
        Command::Auth(auth) => match auth {
            AuthCommand::Login => cli::login().await,
            AuthCommand::Logout => cli::logout().await,
            AuthCommand::Status => cli::status().await,
        },
        Command::Search(opt) => cli::search(&opt.query.join(" ")).await,
        Command::Artist(opt) => cli::artist(&opt.id).await,
        Command::Album(opt) => cli::album(&opt.id).await,
        Command::Playlists => cli::playlists().await,
        Command::Playlist(opt) => cli::playlist(&opt.id, opt.limit, opt.offset).await,
        Command::Home => cli::home().await,
        Command::Profile => cli::profile().await,
        Command::Play(opt) => cli::play(opt.query).await,
        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
