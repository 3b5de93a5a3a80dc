pub mod controller;
pub mod state;

pub use controller::Preview;
pub use dpv_ingest::ROW_LIMIT;
pub use state::{Phase, PreviewState};
