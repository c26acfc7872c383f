use clap::Subcommand;
use std::path::Path;

use monta_core::store::SyncDb;
use monta_core::MontaError;

use crate::output;

#[derive(Subcommand)]
pub enum OrdersSubcommand {
    /// List all mirrored records
    List,
    /// Show one record by exact reference
    Show { reference: String },
}

pub fn run(db_path: &Path, subcommand: OrdersSubcommand, json: bool) -> anyhow::Result<()> {
    let db = SyncDb::open(db_path)?;
    match subcommand {
        OrdersSubcommand::List => {
            let records = db.list_orders()?;
            if json {
                output::print_json(&records)?;
            } else {
                let rows = records
                    .iter()
                    .map(|r| {
                        vec![
                            r.reference.clone(),
                            r.status.clone().unwrap_or_default(),
                            r.normalized.to_string(),
                            r.track_trace.clone().unwrap_or_default(),
                            r.last_sync.format("%Y-%m-%d %H:%M:%S").to_string(),
                        ]
                    })
                    .collect();
                output::print_table(
                    &["REFERENCE", "STATUS", "BUCKET", "TRACK & TRACE", "LAST SYNC"],
                    rows,
                );
            }
        }
        OrdersSubcommand::Show { reference } => {
            let record = db
                .get_order(&reference)?
                .ok_or_else(|| MontaError::OrderNotFound(reference.clone()))?;
            output::print_json(&record)?;
        }
    }
    Ok(())
}
