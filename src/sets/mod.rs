mod model;
mod reconcile;
mod results;

pub use model::SetResult;
pub use reconcile::{check_reconcile_order, reconcile_sets, Reconciliation};
pub use results::{load_set_results, parse_set_row, LoadStats, SetResultLoad};
