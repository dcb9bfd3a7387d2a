use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use fs_err as fs;
use rusqlite::{params, Connection};
use std::path::Path;

use crate::bundle::{GeneratedBundle, TemplateKind};

/// One row of the "generated tools" list. File bodies are not kept.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub id: String,
    pub name: String,
    pub description: String,
    pub template: TemplateKind,
    pub created_at: DateTime<Utc>,
}

pub struct History {
    conn: Connection,
}

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS tools (
    id          TEXT PRIMARY KEY,
    name        TEXT NOT NULL,
    description TEXT NOT NULL,
    template    TEXT NOT NULL,
    created_at  TEXT NOT NULL
)";

impl History {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path).with_context(|| format!("opening history {}", path.display()))?;
        Self::init(conn)
    }

    pub fn in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute(SCHEMA, []).context("creating history table")?;
        Ok(Self { conn })
    }

    pub fn record(&self, bundle: &GeneratedBundle) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO tools (id, name, description, template, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                bundle.id().to_string(),
                bundle.name(),
                bundle.description(),
                bundle.template_kind().as_str(),
                bundle.created_at().to_rfc3339_opts(SecondsFormat::Micros, true),
            ],
        )?;
        Ok(())
    }

    /// Newest first.
    pub fn recent(&self, limit: usize) -> Result<Vec<HistoryEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, description, template, created_at FROM tools
             ORDER BY created_at DESC, rowid DESC LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit as i64], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
            ))
        })?;

        let mut out = Vec::new();
        for row in rows {
            let (id, name, description, template, created_at) = row?;
            let created_at = DateTime::parse_from_rfc3339(&created_at)
                .with_context(|| format!("bad timestamp for {id}"))?
                .with_timezone(&Utc);
            out.push(HistoryEntry {
                id,
                name,
                description,
                template: TemplateKind::parse_lenient(&template),
                created_at,
            });
        }
        Ok(out)
    }

    pub fn clear(&self) -> Result<usize> {
        Ok(self.conn.execute("DELETE FROM tools", [])?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates;

    #[test]
    fn records_and_lists_newest_first() {
        let h = History::in_memory().unwrap();
        let a = templates::generate("week planner", TemplateKind::Planner);
        std::thread::sleep(std::time::Duration::from_millis(5));
        let b = templates::generate("pill reminder", TemplateKind::Medication);
        h.record(&a).unwrap();
        h.record(&b).unwrap();

        let recent = h.recent(10).unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].name, b.name());
        assert_eq!(recent[0].template, TemplateKind::Medication);
        assert_eq!(recent[1].id, a.id().to_string());

        assert_eq!(h.recent(1).unwrap().len(), 1);
    }

    #[test]
    fn recording_twice_keeps_one_row() {
        let h = History::in_memory().unwrap();
        let a = templates::generate("week planner", TemplateKind::Planner);
        h.record(&a).unwrap();
        h.record(&a).unwrap();
        assert_eq!(h.recent(10).unwrap().len(), 1);
        assert_eq!(h.clear().unwrap(), 1);
        assert!(h.recent(10).unwrap().is_empty());
    }

    #[test]
    fn persists_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("history.sqlite");
        let a = templates::generate("news reader", TemplateKind::ScreenReader);
        History::open(&path).unwrap().record(&a).unwrap();
        let again = History::open(&path).unwrap();
        assert_eq!(again.recent(5).unwrap()[0].description, a.description());
    }
}
