//! Reset and seed the users table with deterministic example data.
//!
//! Deletes every existing record, then inserts `--count` generated users.
//! Use with caution: the wipe is unconditional, mirroring a demo-environment
//! reset rather than a production import.

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use backend::domain::NewUser;
use backend::domain::ports::UserRepository;
use backend::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig, migrate};
use example_data::generate_users;

/// Command-line arguments for the seeding run.
#[derive(Debug, Parser)]
#[command(name = "seed-users", about = "Reset and seed the users table")]
struct Args {
    /// PostgreSQL connection string.
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    /// Number of users to generate.
    #[arg(long, default_value_t = 50)]
    count: usize,

    /// RNG seed; the same seed always produces the same users.
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt().with_env_filter(EnvFilter::from_default_env()).try_init() {
        warn!(error = %e, "tracing init failed");
    }

    let args = Args::parse();

    migrate::run_pending_migrations(&args.database_url).map_err(std::io::Error::other)?;

    let pool = DbPool::new(PoolConfig::new(&args.database_url).with_max_size(2))
        .await
        .map_err(std::io::Error::other)?;
    let repository = DieselUserRepository::new(pool);

    let removed = repository
        .delete_all()
        .await
        .map_err(std::io::Error::other)?;
    info!(removed, "cleared users table");

    for user in generate_users(args.seed, args.count) {
        let new_user = NewUser {
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            position: user.position,
            phone: user.phone,
        };
        repository
            .insert(&new_user)
            .await
            .map_err(std::io::Error::other)?;
    }

    info!(count = args.count, seed = args.seed, "users added successfully");
    Ok(())
}
