pub mod auth;
pub mod inventory;
pub mod reporting;

pub use auth::AuthService;
pub use inventory::InventoryService;
pub use reporting::{DashboardMetrics, ReorderLine, ReportingService, SupplierPerformance};
