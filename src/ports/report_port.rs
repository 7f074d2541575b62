//! Report generation port trait.

use crate::domain::error::TariffscopeError;
use crate::domain::scenario::Dashboard;

/// Port for writing the trade dashboard.
pub trait ReportPort {
    fn write(&self, dashboard: &Dashboard, output_path: &str) -> Result<(), TariffscopeError>;
}
