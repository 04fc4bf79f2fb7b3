use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use env_logger::{Builder, Target};
use log::LevelFilter;
use marquee_client::app::App;
use marquee_client::common::notifications::Notification;
use marquee_client::domains::auth::AuthState;
use marquee_client::domains::catalog::{
    CatalogContext, CatalogRequest, LoadReport,
};
use marquee_config::{ConfigLoad, ConfigLoader};
use marquee_model::{BackdropSize, MediaCategory, MediaType};
use tokio::sync::broadcast;

#[derive(Debug, Parser)]
#[command(name = "marquee", version, about = "Browse the Marquee catalog")]
struct Cli {
    /// Path to marquee.toml
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Load environment overrides from this file instead of ./.env
    #[arg(long, value_name = "FILE")]
    env_file: Option<PathBuf>,

    /// movie or tv
    #[arg(long, default_value = "movie")]
    media_type: MediaType,

    /// popular or top_rated
    #[arg(long, default_value = "popular")]
    category: MediaCategory,

    #[arg(long, default_value_t = 1)]
    page: u32,

    /// Print the whole page instead of the highlight reel
    #[arg(long)]
    listing: bool,

    /// Store this session token before loading
    #[arg(long, value_name = "TOKEN", conflicts_with = "logout")]
    login: Option<String>,

    /// Remove the stored session token and exit
    #[arg(long)]
    logout: bool,
}

fn init_logger() {
    Builder::new()
        .target(Target::Stdout)
        .filter_level(LevelFilter::Warn)
        .filter_module("marquee_client", LevelFilter::Debug)
        .filter_module("marquee", LevelFilter::Debug)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    if std::env::var("RUST_LOG").is_err() {
        init_logger();
    } else {
        env_logger::init();
    }

    let cli = Cli::parse();

    let mut loader = ConfigLoader::new();
    if let Some(path) = &cli.config {
        loader = loader.with_config_path(path);
    }
    if let Some(path) = &cli.env_file {
        loader = loader.with_env_file(path);
    }
    let ConfigLoad { config, warnings } = loader.load()?;
    for warning in warnings.iter() {
        log::warn!("[Config] {}", warning.message);
        if let Some(hint) = &warning.hint {
            log::warn!("[Config]   hint: {}", hint);
        }
    }

    let app = App::from_config(&config)?;
    let mut notifications = app.notifications().subscribe();

    if cli.logout {
        app.bootstrap().logout().await?;
        println!("Signed out");
        return Ok(ExitCode::SUCCESS);
    }

    app.spawn_background();
    let auth = match &cli.login {
        Some(token) => app.bootstrap().login(token).await?,
        None => app.bootstrap().run().await,
    };
    match &auth {
        AuthState::Authenticated { user } => {
            println!("Signed in as {}", user.label())
        }
        _ => println!("Browsing anonymously"),
    }

    let context = if cli.listing {
        CatalogContext::Listing
    } else {
        CatalogContext::Highlight
    };
    let request =
        CatalogRequest::new(cli.media_type, cli.category).with_page(cli.page);
    let view = app.catalog_view(context);
    let report = view.load(request).await;

    let snapshot = view.snapshot();
    println!("\n{} / {}", request.media_type, request.category);
    for entry in snapshot.decorated() {
        let rating = entry
            .item
            .vote_average
            .map(|vote| format!("{vote:.1}"))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:>8}  {:<40} {:>4}  {}",
            entry.item.id,
            entry.item.display_title(),
            rating,
            entry.primary_genres(2).join(", ")
        );
        if context == CatalogContext::Highlight
            && let Some(path) = entry.item.hero_image_path()
        {
            println!(
                "          {}",
                app.images().backdrop(path, BackdropSize::default())
            );
        }
    }

    print_notifications(&mut notifications);

    Ok(match report {
        LoadReport::Loaded { .. } => ExitCode::SUCCESS,
        _ => ExitCode::FAILURE,
    })
}

fn print_notifications(receiver: &mut broadcast::Receiver<Notification>) {
    while let Ok(notification) = receiver.try_recv() {
        eprintln!("{}: {}", notification.level, notification.message);
    }
}
