//! Snapshot state the host renders from.
//!
//! The controller owns one [`PreviewState`] and publishes it wholesale on
//! every change; hosts only ever see complete, immutable snapshots. The
//! row and column collections are `Arc`-wrapped so cloning a snapshot is
//! cheap.

use std::sync::Arc;

use dpv_grid::{ColumnConfig, FieldInfoRow};
use dpv_model::RowRecord;

/// Lifecycle phase, derived from the state flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Init,
    /// Sniffing the header before the main parse.
    Loading,
    Streaming,
    Complete,
    /// Complete, but truncated at the row ceiling.
    TooLarge,
    Error,
}

/// One published snapshot of the widget.
#[derive(Debug, Clone, Default)]
pub struct PreviewState {
    /// Terminal, human-readable failure message; replaces the grid.
    pub error: Option<String>,
    /// True while the header sniff is in flight.
    pub loading: bool,
    /// The row ceiling was hit and rows were truncated.
    pub too_large: bool,
    /// The stream has ended, one way or another.
    pub complete: bool,
    /// Host-toggled visibility of the field-information panel.
    pub show_field_info: bool,
    pub filename: String,
    pub download_url: String,
    pub columns: Arc<Vec<ColumnConfig>>,
    pub field_info: Arc<Vec<FieldInfoRow>>,
    pub rows: Arc<Vec<RowRecord>>,
}

impl PreviewState {
    pub fn phase(&self) -> Phase {
        if self.error.is_some() {
            Phase::Error
        } else if self.too_large {
            Phase::TooLarge
        } else if self.complete {
            Phase::Complete
        } else if self.loading {
            Phase::Loading
        } else if !self.columns.is_empty() {
            Phase::Streaming
        } else {
            Phase::Init
        }
    }

    /// True once no further ingestion can happen for this document.
    pub fn is_terminal(&self) -> bool {
        self.complete || self.error.is_some()
    }
}
