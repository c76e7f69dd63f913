pub mod export_flow;
pub mod harvest_flow;

pub use export_flow::{output_folder_name, ExportFlow, ExportSummary};
pub use harvest_flow::{HarvestFlow, HarvestSettings};
