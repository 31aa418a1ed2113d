/// Newcomer Server - accounts, profiles and follows over REST
use anyhow::Context;
use clap::{Parser, Subcommand};
use newcomer_core::{NewUser, Role, UserStore};
use newcomer_server::{api, config::ServerConfig, state::AppState, AuthService};
use newcomer_storage::LocalUserStore;
use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "newcomer-server")]
#[command(about = "Newcomer account and follow-graph API server", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "NEWCOMER_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve,
    /// Create a new user (any role, including admin)
    AddUser {
        /// Full name
        #[arg(long)]
        full_name: String,
        /// Username
        #[arg(short, long)]
        username: String,
        /// Email address
        #[arg(short, long)]
        email: String,
        /// Password
        #[arg(short, long)]
        password: String,
        /// Role
        #[arg(short, long, default_value = "user")]
        role: Role,
    },
    /// List all users
    ListUsers,
    /// Recompute every follower count from the follow table
    Reconcile,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = ServerConfig::load_from(cli.config.as_deref())?;

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.server.environment.default_log_filter().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Serve => serve(config).await?,
        Commands::AddUser {
            full_name,
            username,
            email,
            password,
            role,
        } => {
            add_user(
                &config,
                NewUserArgs {
                    full_name,
                    username,
                    email,
                    password,
                    role,
                },
            )
            .await?
        }
        Commands::ListUsers => list_users(&config).await?,
        Commands::Reconcile => reconcile(&config).await?,
    }

    Ok(())
}

async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    config.validate()?;

    tracing::info!("Starting Newcomer Server");
    tracing::info!("Host: {}", config.server.host);
    tracing::info!("Port: {}", config.server.port);
    tracing::info!("Environment: {:?}", config.server.environment);

    // Initialize database
    let store = LocalUserStore::connect(&config.storage.database_url)
        .await
        .context("failed to open database")?;
    tracing::info!("Database connected");

    let auth_service = Arc::new(
        AuthService::new(
            config.auth.jwt_secret.clone(),
            config.auth.jwt_expiration_hours,
        )
        .with_bcrypt_cost(config.auth.bcrypt_cost),
    );

    let secure_cookies = config.server.environment == newcomer_server::Environment::Production;
    let app_state = AppState::new(Arc::new(store.clone()), auth_service)
        .with_secure_cookies(secure_cookies);

    let app = api::create_router(app_state);

    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));

    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    store.close().await;
    tracing::info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining connections");
}

struct NewUserArgs {
    full_name: String,
    username: String,
    email: String,
    password: String,
    role: Role,
}

async fn add_user(config: &ServerConfig, args: NewUserArgs) -> anyhow::Result<()> {
    let store = LocalUserStore::connect(&config.storage.database_url).await?;

    let auth_service = AuthService::new(
        config.auth.jwt_secret.clone(),
        config.auth.jwt_expiration_hours,
    )
    .with_bcrypt_cost(config.auth.bcrypt_cost);

    let password_hash = auth_service.hash_password(&args.password)?;

    let user = store
        .create_user(NewUser {
            full_name: args.full_name,
            username: args.username,
            email: args.email,
            password_hash,
            role: args.role,
        })
        .await?;

    println!("Created user {} ({}) with role {}", user.username, user.id, user.role);

    store.close().await;
    Ok(())
}

async fn list_users(config: &ServerConfig) -> anyhow::Result<()> {
    let store = LocalUserStore::connect(&config.storage.database_url).await?;

    let users = store.get_all_users().await?;

    println!("Users:");
    for user in users {
        println!(
            "  {} - {} <{}> [{}] followers: {}",
            user.id, user.username, user.email, user.role, user.follower_count
        );
    }

    store.close().await;
    Ok(())
}

async fn reconcile(config: &ServerConfig) -> anyhow::Result<()> {
    let store = LocalUserStore::connect(&config.storage.database_url).await?;

    let fixed = store.reconcile_follower_counts().await?;
    println!("Corrected follower counts on {} user(s)", fixed);

    store.close().await;
    Ok(())
}
