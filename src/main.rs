use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use courtside::config::AppConfig;
use courtside::dashboard::Dashboard;
use courtside::favorites::FavoritesStore;
use courtside::fetch::{HttpStatsClient, StatsService};
use courtside::leaderboard::LeaderboardLoader;
use courtside::models::{EntityKind, EntityRef, Mode, Range, SearchHit, SortKey};
use courtside::registry::Registry;
use courtside::search::EntitySearch;
use courtside::storage::{FileStore, KeyValueStore};
use courtside::view::{self, ComparisonRow, PlayerDetail};

#[derive(Parser)]
#[command(name = "courtside")]
#[command(about = "Compare basketball players and teams over recent games")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./courtside.toml")]
    config: PathBuf,

    /// Data directory path (overrides config)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Statistics service base URL (overrides config)
    #[arg(long)]
    api_url: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the league leaderboard
    Top {
        /// Column to sort by (pts, reb, ast, fg3m, fg3_pct, blk, stl, tov, ftm, gp)
        #[arg(long, default_value = "pts")]
        sort: SortKey,
    },

    /// Show team standings
    Standings,

    /// Show stat cards and trends for one player
    Player {
        id: u32,

        /// Lookback range (3g, 10g, 1m, 3m, 6m)
        #[arg(long)]
        range: Option<Range>,
    },

    /// Compare players and team rosters side by side
    Track {
        /// Player as id:name, repeatable
        #[arg(long = "player", value_parser = parse_entity)]
        players: Vec<EntityRef>,

        /// Team as id:name, repeatable
        #[arg(long = "team", value_parser = parse_entity)]
        teams: Vec<EntityRef>,

        #[arg(long)]
        range: Option<Range>,
    },

    /// Search players, or teams with --teams
    Search {
        query: String,

        #[arg(long)]
        teams: bool,
    },

    /// Manage favorites
    Favorites {
        #[command(subcommand)]
        action: FavoritesAction,
    },
}

#[derive(Subcommand)]
enum FavoritesAction {
    /// List favorite players and teams
    List,

    /// Star or unstar a player
    TogglePlayer { id: u32, name: String },

    /// Star or unstar a team
    ToggleTeam { id: u32, name: String },

    /// Compare all favorites
    Show {
        #[arg(long)]
        range: Option<Range>,
    },
}

fn parse_entity(s: &str) -> Result<EntityRef, String> {
    EntityRef::parse_pair(s).ok_or_else(|| format!("expected <id>:<name>, got '{}'", s))
}

fn init_tracing(level: &str, json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("Failed to load config from {:?}", cli.config))?;
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    if let Some(api_url) = cli.api_url {
        config.api.base_url = api_url;
    }
    if let Some(log_level) = cli.log_level {
        config.log_level = log_level;
    }
    config.validate()?;

    init_tracing(&config.log_level, cli.json_logs);
    tracing::info!("Starting courtside v{}", env!("CARGO_PKG_VERSION"));

    let service: Arc<dyn StatsService> = Arc::new(HttpStatsClient::new(config.api.fetcher_config())?);
    let storage: Arc<dyn KeyValueStore> = Arc::new(FileStore::for_config(&config.storage_config()));
    let favorites = Arc::new(FavoritesStore::load(storage));
    let default_range = config.dashboard.default_range;

    match cli.command {
        Commands::Top { sort } => {
            let loader = LeaderboardLoader::new(service, config.dashboard.top_n);
            loader.load_top(sort).await;
            println!(
                "{}",
                view::render_top_players(&loader.top().await, &|id| favorites.is_player_favorite(id))
            );
        }

        Commands::Standings => {
            let loader = LeaderboardLoader::new(service, config.dashboard.top_n);
            loader.load_standings().await;
            println!(
                "{}",
                view::render_standings(&loader.standings().await, &|id| favorites.is_team_favorite(id))
            );
        }

        Commands::Player { id, range } => {
            let range = range.unwrap_or(default_range);
            println!("{}", view::DETAIL_LOADING);
            let detail = PlayerDetail::load(service.as_ref(), id, range).await;
            println!("{}", detail.render());
        }

        Commands::Track {
            players,
            teams,
            range,
        } => {
            if players.is_empty() && teams.is_empty() {
                println!("{}", view::COMPARISON_EMPTY);
                return Ok(());
            }

            let registry = Registry::new(service, range.unwrap_or(default_range));
            for player in players {
                registry.add_player(player).await;
            }
            for team in teams {
                registry.add_team(team).await;
            }
            registry.settle().await;

            let is_player_favorite = |id: u32| favorites.is_player_favorite(id);
            let tracked = registry.players().await;
            if !tracked.is_empty() {
                let rows: Vec<ComparisonRow> = tracked.iter().map(ComparisonRow::from_tracked).collect();
                println!("{}\n", view::render_comparison(&rows, &is_player_favorite));
            }
            for team in registry.teams().await {
                println!(
                    "{}\n",
                    view::render_team_section(&team, favorites.is_team_favorite(team.id()), &is_player_favorite)
                );
            }
        }

        Commands::Search { query, teams } => {
            let kind = if teams {
                EntityKind::Team
            } else {
                EntityKind::Player
            };
            let search = EntitySearch::new(service, config.dashboard.dashboard_config().search);
            search.input(kind, &query);
            search.settle().await;

            let results = search.results();
            if results.is_empty() {
                println!("(no results)");
            }
            for hit in results {
                match hit {
                    SearchHit::Player(p) if !p.is_active => {
                        println!("{:>12}  {} (inactive)", p.id, p.full_name)
                    }
                    SearchHit::Player(p) => println!("{:>12}  {}", p.id, p.full_name),
                    SearchHit::Team(t) => println!("{:>12}  {} {}", t.id, t.full_name, t.abbreviation),
                }
            }
        }

        Commands::Favorites { action } => match action {
            FavoritesAction::List => {
                let snapshot = favorites.snapshot();
                if snapshot.is_empty() {
                    println!("{}", view::FAVORITES_EMPTY);
                }
                for player in &snapshot.players {
                    println!("player  {}", player);
                }
                for team in &snapshot.teams {
                    println!("team    {}", team);
                }
            }
            FavoritesAction::TogglePlayer { id, name } => {
                favorites.toggle_player(id, &name);
                print_toggled(&name, favorites.is_player_favorite(id));
            }
            FavoritesAction::ToggleTeam { id, name } => {
                favorites.toggle_team(id, &name);
                print_toggled(&name, favorites.is_team_favorite(id));
            }
            FavoritesAction::Show { range } => {
                let dashboard = Dashboard::new(
                    service,
                    Arc::clone(&favorites),
                    config.dashboard.dashboard_config(),
                );
                dashboard.set_range(range.unwrap_or(default_range)).await;
                dashboard.set_mode(Mode::Favorites).await;
                dashboard.settle().await;

                let tracked = dashboard.favorite_tracked();
                println!(
                    "{}",
                    view::render_favorites(
                        &favorites.snapshot(),
                        &tracked.players().await,
                        &tracked.teams().await
                    )
                );
            }
        },
    }

    Ok(())
}

fn print_toggled(name: &str, added: bool) {
    if added {
        println!("{} {} added to favorites", view::star(true), name);
    } else {
        println!("{} {} removed from favorites", view::star(false), name);
    }
}
