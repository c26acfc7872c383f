use std::path::Path;

use monta_core::store::SyncDb;

use crate::output;

/// `monta log`: show the most recent sync log entries, newest first.
pub fn run(db_path: &Path, limit: usize, json: bool) -> anyhow::Result<()> {
    let db = SyncDb::open(db_path)?;
    let entries = db.recent_logs(limit)?;

    if json {
        output::print_json(&entries)?;
        return Ok(());
    }

    let rows = entries
        .iter()
        .map(|entry| {
            vec![
                entry.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
                format!("{:?}", entry.level).to_lowercase(),
                entry.tag.clone(),
                entry.data.to_string(),
            ]
        })
        .collect();
    output::print_table(&["TIME", "LEVEL", "TAG", "DATA"], rows);
    Ok(())
}
