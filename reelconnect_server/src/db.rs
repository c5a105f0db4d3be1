use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};

use reelconnect_core::derive_hash_hex;
use reelconnect_shared::MatchDto;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct StoredParams {
    pub server_seed: String,
    pub server_seed_hash: String,
    pub nonce: i64,
}

pub struct NewSpin<'a> {
    pub ts: String,
    pub client_seed: &'a str,
    pub nonce: i64,
    pub server_seed_hash: &'a str,
    pub grid_json: String,
    pub matches: &'a [MatchDto],
    pub win_amount: i64,
}

pub async fn connect(url: &str) -> anyhow::Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(url)
        .await?;
    Ok(pool)
}

pub async fn get_params(pool: &SqlitePool) -> anyhow::Result<StoredParams> {
    let row = sqlx::query_as::<_, StoredParams>(
        "SELECT server_seed, server_seed_hash, nonce FROM params WHERE id = 1",
    )
    .fetch_one(pool)
    .await?;
    Ok(row)
}

pub async fn init_db(db: &SqlitePool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(db).await?;
    // the seeded row ships without a hash; keep it in step with the seed
    let p = get_params(db).await?;
    let hash = derive_hash_hex(p.server_seed.as_bytes());
    if p.server_seed_hash != hash {
        sqlx::query("UPDATE params SET server_seed_hash = ? WHERE id = 1")
            .bind(&hash)
            .execute(db)
            .await?;
    }
    Ok(())
}

/// Claim the next nonce and log the spin it produced, atomically.
///
/// `roll` receives the params with the already-incremented nonce.
pub async fn record_spin<F, T>(db: &SqlitePool, client_seed: &str, roll: F) -> anyhow::Result<T>
where
    F: FnOnce(&StoredParams) -> anyhow::Result<(T, NewSpinParts)>,
{
    let mut tx = db.begin().await?;
    let p = sqlx::query_as::<_, StoredParams>(
        "UPDATE params SET nonce = nonce + 1 WHERE id = 1 RETURNING server_seed, server_seed_hash, nonce",
    )
    .fetch_one(&mut *tx)
    .await?;

    let (out, parts) = roll(&p)?;
    let spin = NewSpin {
        ts: chrono::Utc::now().to_rfc3339(),
        client_seed,
        nonce: p.nonce,
        server_seed_hash: &p.server_seed_hash,
        grid_json: parts.grid_json,
        matches: &parts.matches,
        win_amount: parts.win_amount,
    };
    insert_spin(&mut tx, &spin).await?;
    tx.commit().await?;
    Ok(out)
}

/// Fields of a spin row the caller computes from the roll.
pub struct NewSpinParts {
    pub grid_json: String,
    pub matches: Vec<MatchDto>,
    pub win_amount: i64,
}

async fn insert_spin(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    spin: &NewSpin<'_>,
) -> anyhow::Result<()> {
    sqlx::query(
        "INSERT INTO spins (ts, client_seed, nonce, server_seed_hash, grid_json, matches_json, win_amount) VALUES (?, ?, ?, ?, ?, ?, ?)"
    )
    .bind(&spin.ts)
    .bind(spin.client_seed)
    .bind(spin.nonce)
    .bind(spin.server_seed_hash)
    .bind(&spin.grid_json)
    .bind(serde_json::to_string(spin.matches)?)
    .bind(spin.win_amount)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

/// Replace the server seed, reset the nonce and hand back the retired seed.
pub async fn rotate_seed(db: &SqlitePool, new_seed: &str) -> anyhow::Result<(StoredParams, String)> {
    let mut tx = db.begin().await?;
    let old = sqlx::query_as::<_, StoredParams>(
        "SELECT server_seed, server_seed_hash, nonce FROM params WHERE id = 1",
    )
    .fetch_one(&mut *tx)
    .await?;
    let hash = derive_hash_hex(new_seed.as_bytes());
    sqlx::query("UPDATE params SET server_seed = ?, server_seed_hash = ?, nonce = 0 WHERE id = 1")
        .bind(new_seed)
        .bind(&hash)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok((old, hash))
}

#[cfg(test)]
pub async fn memory_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    init_db(&pool).await.unwrap();
    pool
}
