use crate::models::StationTable;
use tokio::sync::mpsc;
use tracing::debug;

/// Sole owner of the final table. Folds partial tables in arrival order.
///
/// The fold is commutative and associative per station, so the result does
/// not depend on which worker finished first.
pub struct MergeAggregator {
    table: StationTable,
    partials_merged: u64,
}

/// Final table plus the number of partial tables folded into it.
#[derive(Debug)]
pub struct MergeOutcome {
    pub table: StationTable,
    pub partials_merged: u64,
}

impl MergeAggregator {
    pub fn new() -> Self {
        Self {
            table: StationTable::new(),
            partials_merged: 0,
        }
    }

    pub fn merge(&mut self, partial: StationTable) {
        self.table.merge(partial);
        self.partials_merged += 1;
    }

    /// Drain `partials` until every sender is gone, then hand back the table.
    pub async fn run(mut self, mut partials: mpsc::Receiver<StationTable>) -> MergeOutcome {
        while let Some(partial) = partials.recv().await {
            self.merge(partial);
        }

        debug!(
            partials = self.partials_merged,
            stations = self.table.len(),
            "merge queue drained"
        );
        self.finish()
    }

    pub fn finish(self) -> MergeOutcome {
        MergeOutcome {
            table: self.table,
            partials_merged: self.partials_merged,
        }
    }
}

impl Default for MergeAggregator {
    fn default() -> Self {
        Self::new()
    }
}
