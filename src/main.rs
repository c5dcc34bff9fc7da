use std::path::PathBuf;

use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use dreamstreamer::{
    cli::{self, AdminAction, AdminEntity, AuthAction, Context, RecordInput},
    config::{self, Settings},
    error,
    error::Result,
    types::{CatalogFilter, Id},
    utils,
};

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
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Manage your account
    #[command(subcommand)]
    Auth(AuthCommand),

    /// Browse and manage albums
    Albums(EntityOptions),

    /// Browse and manage artists
    Artists(EntityOptions),

    /// Browse and manage genres
    Genres(EntityOptions),

    /// Browse and manage tracks
    Tracks(EntityOptions),

    /// Search tracks
    Search(SearchOptions),

    /// Play a track and count the play
    Play {
        /// Track id
        id: Id,
    },

    /// Show or change your favorite tracks
    Favorites(FavoritesOptions),

    /// Show what you played recently
    Recent,

    #[clap(about = "Show engagement analytics (admin)")]
    Dashboard {
        /// Entries per category
        #[clap(long, default_value_t = 10)]
        limit: usize,
    },

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Subcommand, Debug, Clone)]
pub enum AuthCommand {
    /// Create an account
    SignUp {
        #[clap(long)]
        username: String,
        #[clap(long)]
        email: String,
        #[clap(long)]
        password: String,
    },
    /// Confirm an account with the emailed code
    Confirm {
        #[clap(long)]
        username: String,
        #[clap(long)]
        code: String,
    },
    /// Sign in
    SignIn {
        #[clap(long)]
        username: String,
        #[clap(long)]
        password: String,
        /// New password, when the account must change its temporary one
        #[clap(long)]
        new_password: Option<String>,
    },
    /// Sign out everywhere and forget the stored session
    SignOut,
    /// Show the signed-in user
    Whoami,
    /// Change your display name or email
    Update {
        #[clap(long)]
        name: Option<String>,
        #[clap(long)]
        email: Option<String>,
    },
    /// Change your password
    Passwd {
        #[clap(long)]
        old_password: String,
        #[clap(long)]
        new_password: String,
    },
}

#[derive(Parser, Debug, Clone)]
#[command(
    args_conflicts_with_subcommands = true // disallow mixing list filters with `create`/`edit`/`delete`
)]
pub struct EntityOptions {
    /// Show a single record
    #[clap(long)]
    pub id: Option<Id>,

    /// Only records in this genre
    #[clap(long)]
    pub genre: Option<Id>,

    /// Only records by this artist
    #[clap(long)]
    pub artist: Option<Id>,

    /// Only records whose title or name contains this text
    #[clap(long)]
    pub title: Option<String>,

    #[command(subcommand)]
    pub command: Option<EntitySubcommand>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum EntitySubcommand {
    /// Create a record (admin)
    Create(RecordOpts),
    /// Edit a record; unset fields keep their stored value (admin)
    Edit {
        id: Id,
        #[clap(flatten)]
        fields: RecordOpts,
    },
    /// Delete a record and its files (admin)
    Delete { id: Id },
}

#[derive(Parser, Debug, Clone)]
pub struct RecordOpts {
    /// Title, or name for artists and genres
    #[clap(long, alias = "name")]
    pub title: Option<String>,

    #[clap(long)]
    pub release_year: Option<String>,

    #[clap(long)]
    pub biography: Option<String>,

    /// Birth date (YYYY-MM-DD)
    #[clap(long)]
    pub birth_date: Option<String>,

    #[clap(long)]
    pub duration: Option<String>,

    #[clap(long)]
    pub genre_id: Option<Id>,

    #[clap(long)]
    pub album_id: Option<Id>,

    /// Comma separated artist ids
    #[clap(long)]
    pub artists: Option<String>,

    /// Artwork or image file
    #[clap(long)]
    pub image: Option<PathBuf>,

    /// Audio file (tracks only)
    #[clap(long)]
    pub song: Option<PathBuf>,
}

impl From<RecordOpts> for RecordInput {
    fn from(o: RecordOpts) -> Self {
        RecordInput {
            title: o.title,
            release_year: o.release_year,
            biography: o.biography,
            birth_date: o.birth_date,
            duration: o.duration,
            genre_id: o.genre_id,
            album_id: o.album_id,
            artist_ids: o.artists.as_deref().map(utils::parse_id_list).unwrap_or_default(),
            image: o.image,
            song: o.song,
        }
    }
}

#[derive(Parser, Debug, Clone)]
pub struct SearchOptions {
    /// Search term
    pub term: Option<String>,

    /// Read terms from stdin and search as you type
    #[clap(long, short)]
    pub interactive: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct FavoritesOptions {
    /// Add or remove this track
    #[clap(long)]
    pub toggle: Option<Id>,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("dreamstreamer=warn")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    if let Command::Completions(opt) = &cli.command {
        let mut cmd = Cli::command_for_update();
        let name = cmd.get_name().to_string();
        generate(opt.shell, &mut cmd, name, &mut std::io::stdout());
        return;
    }

    if let Err(e) = run(cli.command).await {
        error!("{}", e.user_message());
    }
}

async fn run(command: Command) -> Result<()> {
    let settings = Settings::from_env()?;
    let mut ctx = Context::load(settings).await?;

    match command {
        Command::Auth(cmd) => cli::auth(&mut ctx, auth_action(cmd)).await,
        Command::Albums(opt) => {
            let catalog_filter = filter(&opt);
            match opt.command {
                Some(sub) => cli::admin(&ctx, AdminEntity::Album, admin_action(sub)).await,
                None => cli::albums(&ctx, opt.id, catalog_filter).await,
            }
        }
        Command::Artists(opt) => {
            let catalog_filter = filter(&opt);
            match opt.command {
                Some(sub) => cli::admin(&ctx, AdminEntity::Artist, admin_action(sub)).await,
                None => cli::artists(&ctx, opt.id, catalog_filter).await,
            }
        }
        Command::Genres(opt) => {
            let catalog_filter = filter(&opt);
            match opt.command {
                Some(sub) => cli::admin(&ctx, AdminEntity::Genre, admin_action(sub)).await,
                None => cli::genres(&ctx, opt.id, catalog_filter).await,
            }
        }
        Command::Tracks(opt) => {
            let catalog_filter = filter(&opt);
            match opt.command {
                Some(sub) => cli::admin(&ctx, AdminEntity::Track, admin_action(sub)).await,
                None => cli::tracks(&ctx, opt.id, catalog_filter).await,
            }
        }
        Command::Search(opt) => cli::search(&ctx, opt.term, opt.interactive).await,
        Command::Play { id } => cli::play(&ctx, id).await,
        Command::Favorites(opt) => match opt.toggle {
            Some(id) => cli::toggle_favorite(&ctx, id).await,
            None => cli::favorites(&ctx).await,
        },
        Command::Recent => cli::recently_played(&ctx).await,
        Command::Dashboard { limit } => cli::dashboard(&ctx, limit).await,
        Command::Completions(_) => Ok(()),
    }
}

fn filter(opt: &EntityOptions) -> CatalogFilter {
    CatalogFilter {
        genre_id: opt.genre,
        artist_id: opt.artist,
        title: opt.title.clone(),
    }
}

fn admin_action(sub: EntitySubcommand) -> AdminAction {
    match sub {
        EntitySubcommand::Create(fields) => AdminAction::Create(fields.into()),
        EntitySubcommand::Edit { id, fields } => AdminAction::Edit {
            id,
            input: fields.into(),
        },
        EntitySubcommand::Delete { id } => AdminAction::Delete { id },
    }
}

fn auth_action(cmd: AuthCommand) -> AuthAction {
    match cmd {
        AuthCommand::SignUp {
            username,
            email,
            password,
        } => AuthAction::SignUp {
            username,
            email,
            password,
        },
        AuthCommand::Confirm { username, code } => AuthAction::Confirm { username, code },
        AuthCommand::SignIn {
            username,
            password,
            new_password,
        } => AuthAction::SignIn {
            username,
            password,
            new_password,
        },
        AuthCommand::SignOut => AuthAction::SignOut,
        AuthCommand::Whoami => AuthAction::WhoAmI,
        AuthCommand::Update { name, email } => AuthAction::Update { name, email },
        AuthCommand::Passwd {
            old_password,
            new_password,
        } => AuthAction::Password {
            old_password,
            new_password,
        },
    }
}
