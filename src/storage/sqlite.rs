//! SQLite storage backend

use super::clock::{from_micros, MonotonicClock};
use super::traits::{GraphStore, OpenStore, StorageError, StorageResult, VertexFilter};
use crate::graph::{Edge, Vertex, VertexAttributes, VertexId};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// SQLite-backed graph store
///
/// Uses a single SQLite database file with one table for vertices and one for
/// edges. Thread-safe via internal mutex on the connection; a vertex and its
/// outgoing edge are written in one transaction.
pub struct SqliteStore {
    conn: Mutex<Connection>,
    clock: MonotonicClock,
}

impl SqliteStore {
    /// Initialize the database schema
    fn init_schema(conn: &Connection) -> StorageResult<()> {
        conn.execute_batch(
            r#"
            PRAGMA foreign_keys = ON;

            -- WAL keeps readers from other processes unblocked during writes
            PRAGMA journal_mode = WAL;

            CREATE TABLE IF NOT EXISTS vertices (
                id TEXT PRIMARY KEY,
                vertex_type TEXT NOT NULL,
                properties_json TEXT NOT NULL,
                created_at INTEGER NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_vertices_type_created
                ON vertices(vertex_type, created_at);

            CREATE TABLE IF NOT EXISTS edges (
                source_id TEXT NOT NULL,
                label TEXT NOT NULL,
                target_id TEXT NOT NULL,
                created_at INTEGER NOT NULL,
                PRIMARY KEY (source_id, label, target_id),
                FOREIGN KEY (source_id) REFERENCES vertices(id) ON DELETE CASCADE,
                FOREIGN KEY (target_id) REFERENCES vertices(id) ON DELETE CASCADE
            );

            CREATE INDEX IF NOT EXISTS idx_edges_target
                ON edges(target_id, label);
            "#,
        )?;
        Ok(())
    }

    fn from_connection(conn: Connection) -> StorageResult<Self> {
        Self::init_schema(&conn)?;

        // Resume the clock after the newest persisted vertex
        let last_micros: i64 = conn.query_row(
            "SELECT COALESCE(MAX(created_at), 0) FROM vertices",
            [],
            |row| row.get(0),
        )?;

        Ok(Self {
            conn: Mutex::new(conn),
            clock: MonotonicClock::starting_after(last_micros),
        })
    }

    fn lock(&self) -> StorageResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StorageError::LockPoisoned)
    }

    /// Deserialize a vertex from database columns
    fn row_to_vertex(
        id: String,
        vertex_type: String,
        properties_json: String,
        created_at: i64,
    ) -> StorageResult<Vertex> {
        Ok(Vertex {
            id: VertexId::from_string(id),
            vertex_type,
            properties: serde_json::from_str(&properties_json)?,
            created_at: from_micros(created_at)?,
        })
    }

    fn insert_vertex(conn: &Connection, vertex: &Vertex) -> StorageResult<()> {
        conn.execute(
            "INSERT INTO vertices (id, vertex_type, properties_json, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                vertex.id.as_str(),
                vertex.vertex_type,
                serde_json::to_string(&vertex.properties)?,
                vertex.created_at.timestamp_micros(),
            ],
        )?;
        Ok(())
    }

    fn insert_edge(conn: &Connection, edge: &Edge) -> StorageResult<()> {
        conn.execute(
            "INSERT OR IGNORE INTO edges (source_id, label, target_id, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                edge.source.as_str(),
                edge.label,
                edge.target.as_str(),
                edge.created_at.timestamp_micros(),
            ],
        )?;
        Ok(())
    }

    fn ensure_vertex(conn: &Connection, id: &VertexId) -> StorageResult<()> {
        let found: Option<i64> = conn
            .query_row(
                "SELECT 1 FROM vertices WHERE id = ?1",
                params![id.as_str()],
                |row| row.get(0),
            )
            .optional()?;
        match found {
            Some(_) => Ok(()),
            None => Err(StorageError::VertexNotFound(id.to_string())),
        }
    }

    fn linked_ids(conn: &Connection, sql: &str, id: &VertexId, label: &str) -> StorageResult<Vec<VertexId>> {
        let mut stmt = conn.prepare(sql)?;
        let ids = stmt
            .query_map(params![id.as_str(), label], |row| row.get::<_, String>(0))?
            .map(|r| r.map(VertexId::from))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ids)
    }
}

impl OpenStore for SqliteStore {
    fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }

        Self::from_connection(Connection::open(path)?)
    }

    fn open_in_memory() -> StorageResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }
}

impl GraphStore for SqliteStore {
    // === Vertex Operations ===

    fn create_vertex(&self, attributes: &VertexAttributes) -> StorageResult<Vertex> {
        let conn = self.lock()?;
        let vertex = Vertex::from_attributes(VertexId::generate(), attributes, self.clock.tick()?);
        Self::insert_vertex(&conn, &vertex)?;
        Ok(vertex)
    }

    fn create_linked_vertex(
        &self,
        attributes: &VertexAttributes,
        label: &str,
        target: &VertexId,
    ) -> StorageResult<Vertex> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        // Dropping `tx` on any early return rolls the insert back
        Self::ensure_vertex(&tx, target)?;

        let vertex = Vertex::from_attributes(VertexId::generate(), attributes, self.clock.tick()?);
        let mut edge = Edge::new(vertex.id.clone(), target.clone(), label);
        edge.created_at = vertex.created_at;

        Self::insert_vertex(&tx, &vertex)?;
        Self::insert_edge(&tx, &edge)?;
        tx.commit()?;

        Ok(vertex)
    }

    fn get_vertex(&self, id: &VertexId) -> StorageResult<Option<Vertex>> {
        let conn = self.lock()?;

        let row: Option<(String, String, String, i64)> = conn
            .query_row(
                "SELECT id, vertex_type, properties_json, created_at FROM vertices WHERE id = ?1",
                params![id.as_str()],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
            )
            .optional()?;

        match row {
            Some((id, vertex_type, properties, created_at)) => {
                Ok(Some(Self::row_to_vertex(id, vertex_type, properties, created_at)?))
            }
            None => Ok(None),
        }
    }

    fn delete_vertex(&self, id: &VertexId) -> StorageResult<bool> {
        let conn = self.lock()?;

        // Incident edges go with it via ON DELETE CASCADE
        let rows = conn.execute("DELETE FROM vertices WHERE id = ?1", params![id.as_str()])?;
        Ok(rows > 0)
    }

    fn all_vertex_ids(&self, filter: &VertexFilter) -> StorageResult<Vec<VertexId>> {
        let conn = self.lock()?;

        let mut sql = String::from("SELECT v.id FROM vertices v WHERE 1 = 1");
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(ref vertex_type) = filter.vertex_type {
            sql.push_str(" AND v.vertex_type = ?");
            params_vec.push(Box::new(vertex_type.clone()));
        }

        if let Some(ref label) = filter.without_outgoing {
            sql.push_str(
                " AND NOT EXISTS (SELECT 1 FROM edges e WHERE e.source_id = v.id AND e.label = ?)",
            );
            params_vec.push(Box::new(label.clone()));
        }

        let mut stmt = conn.prepare(&sql)?;
        let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|b| b.as_ref()).collect();

        let ids = stmt
            .query_map(params_refs.as_slice(), |row| row.get::<_, String>(0))?
            .map(|r| r.map(VertexId::from))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ids)
    }

    // === Edge Operations ===

    fn create_edge(&self, edge: &Edge) -> StorageResult<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        Self::ensure_vertex(&tx, &edge.source)?;
        Self::ensure_vertex(&tx, &edge.target)?;
        Self::insert_edge(&tx, edge)?;
        tx.commit()?;
        Ok(())
    }

    fn edges_into(&self, id: &VertexId, label: &str) -> StorageResult<Vec<VertexId>> {
        let conn = self.lock()?;
        Self::linked_ids(
            &conn,
            "SELECT source_id FROM edges WHERE target_id = ?1 AND label = ?2",
            id,
            label,
        )
    }

    fn edges_from(&self, id: &VertexId, label: &str) -> StorageResult<Vec<VertexId>> {
        let conn = self.lock()?;
        Self::linked_ids(
            &conn,
            "SELECT target_id FROM edges WHERE source_id = ?1 AND label = ?2",
            id,
            label,
        )
    }
}
