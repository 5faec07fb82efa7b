//! Load connection records from a JSON file into the store.
//!
//! Input is an array of edge records; missing ids get fresh UUIDs and
//! free-text labels are normalized into the closed vocabulary:
//!
//! ```json
//! [{"person_a": "ana", "person_b": "rui", "connection_type": "family",
//!   "status": "accepted", "relation_a_to_b": "mãe", "relation_b_to_a": "filho",
//!   "strength": 4.0, "common_connections": 2}]
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;
use uuid::Uuid;

use kingraph::graph::{Connection, ConnectionStatus, ConnectionType};
use kingraph::kinship::RelationshipLabel;
use kingraph::store::{self, migrate, Db};
use kingraph::Config;

#[derive(Parser, Debug)]
#[command(name = "seed", about = "Load connection records into the kingraph store")]
struct Args {
    /// JSON file containing an array of connection records
    file: PathBuf,

    /// Override the database path from config.toml
    #[arg(long)]
    db: Option<PathBuf>,
}

/// Raw record as written by the surrounding app's export: labels are free
/// text, ids optional.
#[derive(Debug, Deserialize)]
struct ConnectionRecord {
    connection_id: Option<String>,
    person_a: String,
    person_b: String,
    #[serde(default)]
    connection_type: String,
    #[serde(default)]
    status: String,
    relation_a_to_b: Option<String>,
    relation_b_to_a: Option<String>,
    #[serde(default)]
    strength: f32,
    #[serde(default)]
    common_connections: u32,
}

fn record_to_connection(record: ConnectionRecord) -> Connection {
    let status = match record.status.trim().to_lowercase().as_str() {
        "accepted" => ConnectionStatus::Accepted,
        "rejected" => ConnectionStatus::Rejected,
        _ => ConnectionStatus::Pending,
    };
    Connection {
        connection_id: record
            .connection_id
            .unwrap_or_else(|| Uuid::new_v4().to_string()),
        person_a: record.person_a,
        person_b: record.person_b,
        connection_type: ConnectionType::normalize_lossy(&record.connection_type),
        status,
        relation_a_to_b: RelationshipLabel::normalize_lossy(
            record.relation_a_to_b.as_deref().unwrap_or(""),
        ),
        relation_b_to_a: RelationshipLabel::normalize_lossy(
            record.relation_b_to_a.as_deref().unwrap_or(""),
        ),
        strength: record.strength,
        common_connections: record.common_connections,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();

    let db_path = match args.db {
        Some(path) => path,
        None => Config::load()?.db_path().to_path_buf(),
    };
    let db = Db::new(&db_path);
    let migrations_dir = std::path::Path::new("migrations");
    db.with_connection(move |conn| migrate::run_migrations(conn, migrations_dir))
        .await?;

    let content = std::fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    let records: Vec<ConnectionRecord> =
        serde_json::from_str(&content).context("Failed to parse connection records")?;

    let total = records.len();
    for record in records {
        let edge = record_to_connection(record);
        log::debug!(
            "Inserting {} <-> {} ({})",
            edge.person_a,
            edge.person_b,
            edge.connection_id
        );
        store::insert_connection(&db, edge).await?;
    }

    log::info!("Seeded {} connections into {}", total, db_path.display());
    println!("Seeded {} connections.", total);
    Ok(())
}
