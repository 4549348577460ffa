//! Bulk decode check over every boundary row in a shapes database.
//!
//! One thread streams rows out of the store while a pool of workers runs
//! the decoder; a bad row becomes a fault record instead of aborting the
//! sweep, so one report covers every problem in the database.

use std::thread;

use log::debug;

use crate::coord_text::DecodeError;
use crate::store::{RawShapeRow, RegionLevel, ShapeStore, StoreError};

#[derive(Debug)]
pub struct RowFault {
  pub level: RegionLevel,
  pub id: i64,
  pub name: String,
  pub error: DecodeError,
}

#[derive(Debug)]
pub struct AuditReport {
  pub provinces: usize,
  pub counties: usize,
  pub faults: Vec<RowFault>,
}

impl AuditReport {
  pub fn checked(&self) -> usize {
    self.provinces + self.counties
  }

  pub fn is_clean(&self) -> bool {
    self.faults.is_empty()
  }
}

fn initialize_workers(
  row_rx: crossbeam_channel::Receiver<(RegionLevel, RawShapeRow)>,
  fault_tx: crossbeam_channel::Sender<RowFault>,
) -> Vec<thread::JoinHandle<()>> {
  let max_workers = std::cmp::max(num_cpus::get().saturating_sub(2), 2);
  let mut worker_handles = Vec::with_capacity(max_workers);

  for worker_id in 0..max_workers {
    let worker_row_rx = row_rx.clone();
    let worker_fault_tx = fault_tx.clone();
    worker_handles.push(thread::spawn(move || {
      while let Ok((level, row)) = worker_row_rx.recv() {
        if let Err(error) = row.decode() {
          worker_fault_tx
            .send(RowFault {
              level,
              id: row.id,
              name: row.name,
              error,
            })
            .unwrap();
        }
      }
      debug!("audit worker {} finished", worker_id);
    }));
  }
  worker_handles
}

/// Decodes every boundary row and reports the rows that fail, sorted by
/// level and id. Store access errors still abort; decode faults never do.
pub fn audit_shapes(store: &ShapeStore) -> Result<AuditReport, StoreError> {
  let province_rows = store.raw_shape_rows(RegionLevel::Province)?;
  let county_rows = store.raw_shape_rows(RegionLevel::County)?;
  let provinces = province_rows.len();
  let counties = county_rows.len();

  let (row_tx, row_rx) = crossbeam_channel::unbounded::<(RegionLevel, RawShapeRow)>();
  let (fault_tx, fault_rx) = crossbeam_channel::unbounded::<RowFault>();
  let worker_handles = initialize_workers(row_rx, fault_tx);

  for row in province_rows {
    row_tx.send((RegionLevel::Province, row)).unwrap();
  }
  for row in county_rows {
    row_tx.send((RegionLevel::County, row)).unwrap();
  }
  drop(row_tx);

  // the fault channel closes once every worker has drained its share
  let mut faults: Vec<RowFault> = fault_rx.iter().collect();
  for handle in worker_handles {
    handle.join().unwrap();
  }

  faults.sort_by_key(|fault| (fault.level, fault.id));
  Ok(AuditReport {
    provinces,
    counties,
    faults,
  })
}
