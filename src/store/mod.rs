//! Graph data provider: the boundary to the external relational store.
//!
//! The engines never talk to the database themselves; this module performs
//! the single "neighborhood up to depth N" fetch they consume, normalizing
//! free-text labels and types into the closed vocabulary on the way in.

use std::collections::{HashSet, VecDeque};
use std::path::Path;

use chrono::Utc;
use rusqlite::{params, Connection as SqliteConnection, Row};
use tokio::task;

use crate::error::{KingraphError, Result};
use crate::graph::{Connection, ConnectionStatus, ConnectionType, PersonId};
use crate::kinship::RelationshipLabel;

pub mod migrate;

/// Database connection wrapper
pub struct Db {
    path: std::path::PathBuf,
}

impl Db {
    /// Create a new database connection manager
    pub fn new<P: AsRef<Path>>(db_path: P) -> Self {
        Self {
            path: db_path.as_ref().to_path_buf(),
        }
    }

    /// Open a new database connection with optimized pragmas
    pub fn open_connection(&self) -> Result<SqliteConnection> {
        let conn = SqliteConnection::open(&self.path).map_err(KingraphError::Database)?;
        set_pragmas(&conn)?;
        Ok(conn)
    }

    /// Execute a closure with a database connection in a blocking task
    pub async fn with_connection<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let path = self.path.clone();
        task::spawn_blocking(move || {
            let mut conn = SqliteConnection::open(&path).map_err(KingraphError::Database)?;
            set_pragmas(&conn)?;
            f(&mut conn)
        })
        .await
        .map_err(|_e| KingraphError::Database(rusqlite::Error::InvalidParameterCount(0, 0)))?
    }
}

/// WAL for concurrent readers, NORMAL sync for speed, foreign keys on.
fn set_pragmas(conn: &SqliteConnection) -> Result<()> {
    conn.execute_batch(
        "PRAGMA journal_mode = WAL; \
         PRAGMA synchronous = NORMAL; \
         PRAGMA foreign_keys = ON; \
         PRAGMA temp_store = MEMORY;",
    )?;
    Ok(())
}

const CONNECTION_COLUMNS: &str = "connection_id, person_a, person_b, connection_type, status, \
     relation_a_to_b, relation_b_to_a, strength, common_connections";

/// Map a raw store row to a normalized edge. Labels and types are free text
/// in the store; anything unrecognized normalizes rather than failing.
fn row_to_connection(row: &Row<'_>) -> rusqlite::Result<Connection> {
    let type_text: String = row.get(3)?;
    let status_text: String = row.get(4)?;
    let relation_a_to_b: Option<String> = row.get(5)?;
    let relation_b_to_a: Option<String> = row.get(6)?;
    let strength: f64 = row.get(7)?;
    let common_connections: i64 = row.get(8)?;

    Ok(Connection {
        connection_id: row.get(0)?,
        person_a: row.get(1)?,
        person_b: row.get(2)?,
        connection_type: ConnectionType::normalize_lossy(&type_text),
        status: status_from_text(&status_text),
        relation_a_to_b: RelationshipLabel::normalize_lossy(
            relation_a_to_b.as_deref().unwrap_or(""),
        ),
        relation_b_to_a: RelationshipLabel::normalize_lossy(
            relation_b_to_a.as_deref().unwrap_or(""),
        ),
        strength: strength as f32,
        common_connections: common_connections.max(0) as u32,
    })
}

/// Unknown status text maps to Rejected so it never enters the algorithms.
fn status_from_text(raw: &str) -> ConnectionStatus {
    match raw.trim().to_lowercase().as_str() {
        "pending" => ConnectionStatus::Pending,
        "accepted" => ConnectionStatus::Accepted,
        _ => ConnectionStatus::Rejected,
    }
}

/// Fetch the accepted-connection neighborhood of `root` out to `max_depth`
/// hops, as one materialized edge set the in-memory engines can run on.
///
/// BFS over SQL: one indexed query per frontier person, edges deduplicated
/// by connection id, frontier expanded in `ORDER BY connection_id` order.
/// A root with no accepted connections yields an empty set.
pub async fn load_neighborhood(db: &Db, root: &str, max_depth: usize) -> Result<Vec<Connection>> {
    let root = root.to_string();
    db.with_connection(move |conn| {
        let sql = format!(
            "SELECT {} FROM connections \
             WHERE status = 'accepted' AND (person_a = ?1 OR person_b = ?1) \
             ORDER BY connection_id",
            CONNECTION_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;

        let mut visited: HashSet<PersonId> = HashSet::new();
        let mut seen_edges: HashSet<String> = HashSet::new();
        let mut queue: VecDeque<(PersonId, usize)> = VecDeque::new();
        let mut out = Vec::new();

        visited.insert(root.clone());
        queue.push_back((root, 0));

        while let Some((person, depth)) = queue.pop_front() {
            if depth >= max_depth {
                continue;
            }
            let rows = stmt.query_map(params![person], row_to_connection)?;
            for row in rows {
                let edge = row.map_err(KingraphError::Database)?;
                let counterpart = match edge.counterpart(&person) {
                    Some(p) => p.clone(),
                    None => continue,
                };
                if visited.insert(counterpart.clone()) {
                    queue.push_back((counterpart, depth + 1));
                }
                if seen_edges.insert(edge.connection_id.clone()) {
                    out.push(edge);
                }
            }
        }

        log::debug!(
            "Neighborhood fetch: {} edges across {} people",
            out.len(),
            visited.len()
        );
        Ok(out)
    })
    .await
}

/// Counterpart ids of `person`'s pending or accepted connections: the
/// exclusion set for the kinship sweep (never suggest someone the user
/// already has a connection with, even an unanswered one).
pub async fn connected_person_ids(db: &Db, person: &str) -> Result<HashSet<PersonId>> {
    let person = person.to_string();
    db.with_connection(move |conn| {
        let mut stmt = conn.prepare(
            "SELECT person_a, person_b FROM connections \
             WHERE status IN ('pending', 'accepted') \
               AND (person_a = ?1 OR person_b = ?1)",
        )?;
        let rows = stmt.query_map(params![person], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut out = HashSet::new();
        for row in rows {
            let (a, b) = row.map_err(KingraphError::Database)?;
            out.insert(if a == person { b } else { a });
        }
        Ok(out)
    })
    .await
}

/// Insert one edge record. Used by the seed binary and tests; the real
/// store is written by the surrounding app.
pub async fn insert_connection(db: &Db, edge: Connection) -> Result<()> {
    db.with_connection(move |conn| {
        conn.execute(
            "INSERT INTO connections (connection_id, person_a, person_b, connection_type, \
             status, relation_a_to_b, relation_b_to_a, strength, common_connections, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                edge.connection_id,
                edge.person_a,
                edge.person_b,
                edge.connection_type.as_str(),
                edge.status.as_str(),
                edge.relation_a_to_b.canonical_tag(),
                edge.relation_b_to_a.canonical_tag(),
                edge.strength as f64,
                edge.common_connections,
                Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(())
    })
    .await
}
