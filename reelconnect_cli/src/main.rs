use std::path::PathBuf;

use clap::{Parser, Subcommand};
use sqlx::{sqlite::SqlitePoolOptions, Row, SqlitePool};

use reelconnect_core::{derive_hash_hex, verify_grid, GameConfig, Grid, MemoryReelView};
use reelconnect_shared::{MatchDto, SpinLogEntry};

#[derive(Parser)]
#[command(name = "reelconnect-cli", about = "Offline play and admin tools for reelconnect")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Database URL, default sqlite://reelconnect.db
    #[arg(long, value_parser, env = "DATABASE_URL")]
    database_url: Option<String>,
    /// Game config used by offline commands
    #[arg(long, default_value = "reelconnect.toml")]
    config: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Play spins locally without a server
    Spin {
        #[arg(default_value_t = 1)]
        count: u32,
        /// Overrides the configured client seed
        #[arg(long)]
        client_seed: Option<String>,
    },
    /// Recompute a logged spin from its revealed server seed
    Verify { id: i64, server_seed: String },
    /// Rotate server seed to a new secret
    RotateSeed { new_seed: String },
    /// View last N log entries
    ViewLogs {
        #[arg(default_value_t = 20)]
        n: i64,
    },
    /// Export spins to CSV path
    ExportCsv { path: String },
}

async fn get_pool(url: Option<String>) -> anyhow::Result<SqlitePool> {
    let url = url.unwrap_or_else(|| "sqlite://reelconnect.db".into());
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&url)
        .await?;
    Ok(pool)
}

fn row_to_entry(r: &sqlx::sqlite::SqliteRow) -> anyhow::Result<SpinLogEntry> {
    let ts: String = r.try_get("ts")?;
    let grid: Grid = serde_json::from_str(&r.try_get::<String, _>("grid_json")?)?;
    let matches: Vec<MatchDto> = serde_json::from_str(&r.try_get::<String, _>("matches_json")?)?;
    Ok(SpinLogEntry {
        id: r.try_get("id")?,
        ts: chrono::DateTime::parse_from_rfc3339(&ts)?.with_timezone(&chrono::Utc),
        client_seed: r.try_get("client_seed")?,
        nonce: r.try_get("nonce")?,
        server_seed_hash: r.try_get("server_seed_hash")?,
        grid,
        matches,
        win_amount: r.try_get("win_amount")?,
    })
}

struct Rotation {
    revealed_seed: String,
    revealed_hash: String,
    new_hash: String,
}

/// Swap in a new server seed and hand back the retired one so spins played
/// under it can be verified.
async fn rotate_seed(pool: &SqlitePool, new_seed: &str) -> anyhow::Result<Rotation> {
    if new_seed.is_empty() {
        anyhow::bail!("new seed must not be empty");
    }
    let mut tx = pool.begin().await?;
    let old = sqlx::query("SELECT server_seed, server_seed_hash FROM params WHERE id = 1")
        .fetch_one(&mut *tx)
        .await?;
    let new_hash = derive_hash_hex(new_seed.as_bytes());
    sqlx::query("UPDATE params SET server_seed = ?, server_seed_hash = ?, nonce = 0 WHERE id = 1")
        .bind(new_seed)
        .bind(&new_hash)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok(Rotation {
        revealed_seed: old.try_get("server_seed")?,
        revealed_hash: old.try_get("server_seed_hash")?,
        new_hash,
    })
}

fn play(config: &GameConfig, count: u32) -> anyhow::Result<()> {
    let mut session = config.session();
    let mut view = MemoryReelView::default();
    let mut total = 0u64;
    println!("server_seed_hash={}", session.server_seed_hash());
    for _ in 0..count {
        let plan = session.start_spin()?;
        view.show_grid(&plan.grid);
        let evaluation = session.finish_spin(&mut view)?;
        println!("-- nonce {} --", plan.nonce);
        for row in view.display_keys() {
            let cells: Vec<String> = row
                .iter()
                .map(|k| format!("{:>10}", k.as_deref().unwrap_or("-")))
                .collect();
            println!("{}", cells.join(""));
        }
        for m in &evaluation.matches {
            println!("  {} x{} at {:?}", m.symbol, m.count, m.indices);
        }
        println!("Win Amount: {}", evaluation.win_amount);
        total += evaluation.win_amount;
    }
    if count > 1 {
        println!("Total: {total} over {count} spins");
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Spin { count, client_seed } => {
            let mut config = GameConfig::load_or_default(&cli.config)?;
            if let Some(seed) = client_seed {
                config.seeds.client_seed = seed;
                config.validate()?;
            }
            play(&config, count)?;
        }
        Commands::Verify { id, server_seed } => {
            let pool = get_pool(cli.database_url).await?;
            let row = sqlx::query("SELECT id, ts, client_seed, nonce, server_seed_hash, grid_json, matches_json, win_amount FROM spins WHERE id = ?")
                .bind(id)
                .fetch_one(&pool)
                .await?;
            let entry = row_to_entry(&row)?;
            let hash_ok = derive_hash_hex(server_seed.as_bytes()) == entry.server_seed_hash;
            let grid_ok = verify_grid(&server_seed, &entry.client_seed, entry.nonce as u64, &entry.grid)?;
            println!(
                "spin #{}: seed hash {}, grid {}",
                entry.id,
                if hash_ok { "matches" } else { "MISMATCH" },
                if grid_ok { "matches" } else { "MISMATCH" }
            );
            if !(hash_ok && grid_ok) {
                anyhow::bail!("spin #{} failed verification", entry.id);
            }
        }
        Commands::RotateSeed { new_seed } => {
            let pool = get_pool(cli.database_url).await?;
            let rotation = rotate_seed(&pool, &new_seed).await?;
            println!("Rotated server seed. New hash: {}", rotation.new_hash);
            println!(
                "Revealed previous seed: {} (hash {})",
                rotation.revealed_seed, rotation.revealed_hash
            );
        }
        Commands::ViewLogs { n } => {
            let pool = get_pool(cli.database_url).await?;
            let rows = sqlx::query("SELECT id, ts, client_seed, nonce, server_seed_hash, grid_json, matches_json, win_amount FROM spins ORDER BY id DESC LIMIT ?")
                .bind(n)
                .fetch_all(&pool).await?;
            for r in &rows {
                let e = row_to_entry(r)?;
                println!(
                    "#{:>6} {} seed={} nonce={} hash={} matches={} win={}",
                    e.id,
                    e.ts.to_rfc3339(),
                    e.client_seed,
                    e.nonce,
                    e.server_seed_hash,
                    e.matches.len(),
                    e.win_amount
                );
            }
        }
        Commands::ExportCsv { path } => {
            let pool = get_pool(cli.database_url).await?;
            let mut wtr = csv::Writer::from_path(&path)?;
            wtr.write_record([
                "id",
                "ts",
                "client_seed",
                "nonce",
                "server_seed_hash",
                "grid_json",
                "matches_json",
                "win_amount",
            ])?;
            let rows = sqlx::query("SELECT id, ts, client_seed, nonce, server_seed_hash, grid_json, matches_json, win_amount FROM spins ORDER BY id ASC")
                .fetch_all(&pool).await?;
            for r in &rows {
                wtr.write_record(&[
                    r.try_get::<i64, _>("id")?.to_string(),
                    r.try_get::<String, _>("ts")?,
                    r.try_get::<String, _>("client_seed")?,
                    r.try_get::<i64, _>("nonce")?.to_string(),
                    r.try_get::<String, _>("server_seed_hash")?,
                    r.try_get::<String, _>("grid_json")?,
                    r.try_get::<String, _>("matches_json")?,
                    r.try_get::<i64, _>("win_amount")?.to_string(),
                ])?;
            }
            wtr.flush()?;
            println!("Exported {} rows to {}", rows.len(), path);
        }
    }

    Ok(())
}
