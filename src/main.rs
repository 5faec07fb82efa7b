use anyhow::Result;
use std::path::Path;

use kingraph::graph::{find_shortest_path, rank_suggestions, ConnectionGraph, PathOutcome};
use kingraph::kinship::{deduce, sweep_kin_suggestions, RelationshipLabel};
use kingraph::store::{self, migrate, Db};
use kingraph::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logger from environment variable or default to info level
    env_logger::Builder::from_env(env_logger::Env::default().filter_or("RUST_LOG", "info")).init();

    // Parse command-line arguments
    let args: Vec<String> = std::env::args().collect();
    let command = args.get(1).map(|s| s.as_str()).unwrap_or("verify");

    match command {
        "path" => run_path(&args[2..]).await?,
        "suggest" => run_suggest(&args[2..]).await?,
        "deduce" => run_deduce(&args[2..])?,
        "kin" => run_kin(&args[2..]).await?,
        "verify" | _ => run_schema_verification().await?,
    }

    Ok(())
}

/// Open the store and apply pending migrations.
async fn open_store(config: &Config) -> Result<Db> {
    let db = Db::new(config.db_path());
    let migrations_dir = Path::new("migrations");
    db.with_connection(|conn| migrate::run_migrations(conn, migrations_dir))
        .await?;
    Ok(db)
}

/// `kingraph path <source> <target>`: shortest route within the configured
/// depth bound.
async fn run_path(args: &[String]) -> Result<()> {
    let (source, target) = match (args.first(), args.get(1)) {
        (Some(s), Some(t)) => (s.as_str(), t.as_str()),
        _ => anyhow::bail!("Usage: kingraph path <source-id> <target-id>"),
    };

    let config = Config::load()?;
    let db = open_store(&config).await?;

    let connections = store::load_neighborhood(&db, source, config.engine.max_depth).await?;
    let graph = ConnectionGraph::from_connections(&connections);
    log::info!(
        "Graph built: {} people, {} edges",
        graph.node_count(),
        connections.len()
    );

    match find_shortest_path(&graph, source, target, config.engine.max_depth) {
        PathOutcome::Found(path) => {
            println!("Path ({} hops): {}", path.len() - 1, path.join(" -> "));
        }
        PathOutcome::NodeAbsent => {
            println!("No path: one of the people has no accepted connections.");
        }
        PathOutcome::Unreachable => {
            println!(
                "No path within {} degrees of separation.",
                config.engine.max_depth
            );
        }
    }

    Ok(())
}

/// `kingraph suggest <frontier> [--exclude <id>]...`: ranked next hops.
async fn run_suggest(args: &[String]) -> Result<()> {
    let mut frontier = None;
    let mut exclude = std::collections::HashSet::new();
    let mut next_exclude = false;
    for arg in args {
        if next_exclude {
            exclude.insert(arg.clone());
            next_exclude = false;
            continue;
        }
        if arg == "--exclude" {
            next_exclude = true;
            continue;
        }
        if arg.starts_with("--") {
            continue;
        }
        if frontier.is_none() {
            frontier = Some(arg.clone());
        }
    }
    let frontier = frontier
        .ok_or_else(|| anyhow::anyhow!("Usage: kingraph suggest <frontier-id> [--exclude <id>]..."))?;

    let config = Config::load()?;
    let db = open_store(&config).await?;

    let connections = store::load_neighborhood(&db, &frontier, 1).await?;
    let graph = ConnectionGraph::from_connections(&connections);

    let suggestions = rank_suggestions(&graph, &frontier, &exclude, config.engine.suggestion_limit);
    if suggestions.is_empty() {
        println!("No suggestions.");
    } else {
        for (idx, s) in suggestions.iter().enumerate() {
            println!(
                "#{} {} (strength: {:.1}, common connections: {})",
                idx + 1,
                s.person_id,
                s.strength,
                s.common_connections
            );
        }
    }

    Ok(())
}

/// `kingraph deduce <my-relation-to-pivot> <pivot-relation-to-candidate>`.
fn run_deduce(args: &[String]) -> Result<()> {
    let (first, second) = match (args.first(), args.get(1)) {
        (Some(a), Some(b)) => (a.as_str(), b.as_str()),
        _ => anyhow::bail!("Usage: kingraph deduce <relation-to-pivot> <pivot-relation-to-candidate>"),
    };

    // Strict parsing here: a CLI typo should be reported as bad input,
    // not silently treated as "no deduction"
    let my_to_pivot = RelationshipLabel::parse(first)?;
    let pivot_to_candidate = RelationshipLabel::parse(second)?;

    match deduce(my_to_pivot, pivot_to_candidate) {
        Some(d) => {
            println!("Relation to candidate: {}", d.relation_to_candidate);
            println!("Candidate's relation to you: {}", d.candidate_relation_to_me);
        }
        None => {
            println!("No confident deduction for {} + {}.", my_to_pivot, pivot_to_candidate);
        }
    }

    Ok(())
}

/// `kingraph kin <user>`: sweep the user's family neighborhood for
/// deducible relationships.
async fn run_kin(args: &[String]) -> Result<()> {
    let user = args
        .first()
        .ok_or_else(|| anyhow::anyhow!("Usage: kingraph kin <user-id>"))?;

    let config = Config::load()?;
    let db = open_store(&config).await?;

    // Two hops: the user's pivots plus the pivots' own connections
    let connections = store::load_neighborhood(&db, user, 2).await?;
    let existing = store::connected_person_ids(&db, user).await?;

    let suggestions = sweep_kin_suggestions(user, &connections, &existing);
    if suggestions.is_empty() {
        println!("No kinship suggestions.");
    } else {
        for s in &suggestions {
            println!(
                "{} is your {} (via {}); you are their {}",
                s.candidate_id, s.relation_to_candidate, s.pivot_id, s.candidate_relation_to_me
            );
        }
    }

    Ok(())
}

/// Default command: verify the store schema.
async fn run_schema_verification() -> Result<()> {
    log::info!("Starting Kingraph v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::load()?;
    log::info!("Database path: {}", config.db_path().display());
    log::info!("Traversal bound: {} hops", config.engine.max_depth);

    let db = open_store(&config).await?;
    verify_database_schema(&db).await?;

    log::info!("Store ready");
    Ok(())
}

/// Verify that all expected database objects exist
async fn verify_database_schema(db: &Db) -> Result<()> {
    use kingraph::error::KingraphError;

    db.with_connection(|conn| {
        let mut stmt =
            conn.prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")?;
        let tables: Vec<String> = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;

        for table in ["connections", "schema_migrations"] {
            if !tables.iter().any(|t| t == table) {
                return Err(KingraphError::Config(format!("Missing table: {}", table)));
            }
            log::debug!("✓ Table exists: {}", table);
        }

        let mut stmt = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='index' AND name LIKE 'idx_%'")?;
        let indexes: Vec<String> = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;
        for index in [
            "idx_connections_person_a_status",
            "idx_connections_person_b_status",
        ] {
            if !indexes.iter().any(|i| i == index) {
                log::warn!("Index not found: {}", index);
            } else {
                log::debug!("✓ Index exists: {}", index);
            }
        }

        let journal_mode: String = conn.query_row("PRAGMA journal_mode", [], |row| row.get(0))?;
        if journal_mode.to_uppercase() != "WAL" {
            return Err(KingraphError::Config(format!(
                "Journal mode is not WAL: {}",
                journal_mode
            )));
        }
        log::debug!("✓ Journal mode: WAL");

        let integrity: String = conn.query_row("PRAGMA integrity_check", [], |row| row.get(0))?;
        if integrity != "ok" {
            return Err(KingraphError::Config(format!(
                "Database integrity check failed: {}",
                integrity
            )));
        }
        log::info!("✓ Database integrity: OK");

        Ok(())
    })
    .await?;

    log::info!("✓ Database schema verification complete");
    Ok(())
}
