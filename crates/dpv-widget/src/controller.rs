//! The widget controller.
//!
//! A single state-owning task drives the whole pipeline for one document:
//! validate, resolve the schema (sniffing the header when needed), project
//! the grid, then apply streamed row batches until a terminal state.
//! Stream events reach the task through one bounded mpsc channel, which
//! serializes batch application: batch N is fully applied, ceiling check
//! included, before batch N+1 is looked at. Panel toggles travel on their
//! own unbounded channel, so batch back-pressure can never drop one.
//! Blocking network/parse work runs on the blocking pool and only ever
//! talks to the task through the stream channel.
//!
//! Errors never crash the host. Input and transport failures surface as a
//! message in the published state; rows accumulated before a mid-stream
//! failure stay visible.

use std::ops::ControlFlow;
use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use dpv_grid::{build_columns, build_field_info_rows};
use dpv_ingest::{
    CancelHandle, DefaultFetcher, Fetcher, ROW_LIMIT, StreamOptions, sniff_header, stream_rows,
};
use dpv_model::{DataPackageDocument, ResolvedSchema, RowRecord, resolve};

use crate::state::PreviewState;

/// Events produced by the stream worker.
#[derive(Debug)]
enum StreamEvent {
    Batch(Vec<RowRecord>),
    Done,
    Failed(String),
}

/// A running preview pipeline for one data-package document.
///
/// The document is consumed once at spawn; previewing a different document
/// means spawning a new instance. Dropping the handle cancels the
/// in-flight stream silently.
pub struct Preview {
    state: watch::Receiver<PreviewState>,
    toggles: mpsc::UnboundedSender<()>,
    cancel: CancelHandle,
    task: JoinHandle<()>,
}

impl Preview {
    /// Spawns the pipeline with HTTP/file fetching picked by URL scheme.
    pub fn spawn(document: DataPackageDocument) -> Self {
        Self::spawn_with_fetcher(document, Arc::new(DefaultFetcher::new()))
    }

    /// Spawns the pipeline with an explicit fetch source.
    pub fn spawn_with_fetcher(document: DataPackageDocument, fetcher: Arc<dyn Fetcher>) -> Self {
        let (state_tx, state_rx) = watch::channel(PreviewState::default());
        let (toggle_tx, toggle_rx) = mpsc::unbounded_channel();
        let cancel = CancelHandle::new();
        let task = tokio::spawn(run(document, fetcher, state_tx, toggle_rx, cancel.clone()));
        Self {
            state: state_rx,
            toggles: toggle_tx,
            cancel,
            task,
        }
    }

    /// Subscribes to state snapshots.
    pub fn state(&self) -> watch::Receiver<PreviewState> {
        self.state.clone()
    }

    /// Current snapshot.
    pub fn current(&self) -> PreviewState {
        self.state.borrow().clone()
    }

    /// Shows or hides the field-information panel. Ingestion is unaffected;
    /// every toggle is eventually applied, in order.
    pub fn toggle_field_info(&self) {
        let _ = self.toggles.send(());
    }

    /// Waits until the pipeline reaches a terminal state and returns it.
    pub async fn wait_terminal(&self) -> PreviewState {
        let mut rx = self.state.clone();
        loop {
            {
                let snapshot = rx.borrow_and_update();
                if snapshot.is_terminal() {
                    return snapshot.clone();
                }
            }
            if rx.changed().await.is_err() {
                break;
            }
        }
        self.state.borrow().clone()
    }
}

impl Drop for Preview {
    fn drop(&mut self) {
        self.cancel.cancel();
        self.task.abort();
    }
}

async fn run(
    document: DataPackageDocument,
    fetcher: Arc<dyn Fetcher>,
    state_tx: watch::Sender<PreviewState>,
    mut toggle_rx: mpsc::UnboundedReceiver<()>,
    cancel: CancelHandle,
) {
    let mut state = PreviewState::default();

    let Some((resolved, all_strings)) = prepare(&document, &fetcher, &mut state, &state_tx).await
    else {
        // Absorbing error state; keep serving panel toggles.
        toggle_loop(&mut toggle_rx, &mut state, &state_tx).await;
        return;
    };

    state.columns = Arc::new(build_columns(
        &resolved.header,
        resolved.fields_by_name.as_ref(),
        all_strings,
    ));
    state.field_info = Arc::new(build_field_info_rows(
        &resolved.header,
        resolved.fields_by_name.as_ref(),
    ));
    publish(&state_tx, &state);

    let (event_tx, mut event_rx) = mpsc::channel(8);
    spawn_stream_worker(
        Arc::clone(&fetcher),
        state.download_url.clone(),
        resolved.header.clone(),
        cancel.clone(),
        event_tx,
    );

    loop {
        tokio::select! {
            event = event_rx.recv() => {
                // The worker dropped its sender; the stream is over.
                let Some(event) = event else { break };
                apply_stream_event(event, &mut state, &state_tx, &cancel);
            }
            toggle = toggle_rx.recv() => {
                // The handle is gone; nobody observes state any more.
                if toggle.is_none() {
                    return;
                }
                state.show_field_info = !state.show_field_info;
                publish(&state_tx, &state);
            }
        }
    }

    toggle_loop(&mut toggle_rx, &mut state, &state_tx).await;
}

fn apply_stream_event(
    event: StreamEvent,
    state: &mut PreviewState,
    state_tx: &watch::Sender<PreviewState>,
    cancel: &CancelHandle,
) {
    match event {
        StreamEvent::Batch(batch) => {
            // Terminal states absorb; late batches after the ceiling
            // or a failure are dropped unseen.
            if state.is_terminal() {
                return;
            }
            let rows = Arc::make_mut(&mut state.rows);
            rows.extend(batch);
            if rows.len() > ROW_LIMIT {
                rows.truncate(ROW_LIMIT);
                state.too_large = true;
                state.complete = true;
                cancel.cancel();
                info!(limit = ROW_LIMIT, "row ceiling hit, truncating and cancelling");
            }
            publish(state_tx, state);
        }
        StreamEvent::Done => {
            state.complete = true;
            publish(state_tx, state);
        }
        StreamEvent::Failed(message) => {
            warn!(%message, "stream failed");
            if !state.too_large {
                state.error = Some(message);
            }
            state.complete = true;
            publish(state_tx, state);
        }
    }
}

/// Validates the document and resolves the schema, sniffing when needed.
///
/// Returns `None` after publishing an error state. No network access
/// happens before validation passes.
async fn prepare(
    document: &DataPackageDocument,
    fetcher: &Arc<dyn Fetcher>,
    state: &mut PreviewState,
    state_tx: &watch::Sender<PreviewState>,
) -> Option<(ResolvedSchema, bool)> {
    let resource = match document.first_resource() {
        Ok(resource) => resource,
        Err(error) => {
            state.error = Some(error.to_string());
            publish(state_tx, state);
            return None;
        }
    };
    let url = match resource.url() {
        Ok(url) => url.to_string(),
        Err(error) => {
            state.error = Some(error.to_string());
            publish(state_tx, state);
            return None;
        }
    };
    state.filename = resource.display_name().to_string();
    state.download_url = url.clone();

    let mut resolved = resolve(resource);
    if resolved.must_sniff {
        state.loading = true;
        publish(state_tx, state);

        let sniff_fetcher = Arc::clone(fetcher);
        let sniff_url = url.clone();
        let sniffed =
            tokio::task::spawn_blocking(move || sniff_header(sniff_fetcher.as_ref(), &sniff_url))
                .await;
        state.loading = false;
        match sniffed {
            Ok(Ok(header)) => {
                debug!(columns = header.len(), "header sniffed");
                resolved.apply_sniffed_header(header);
                publish(state_tx, state);
            }
            Ok(Err(error)) => {
                state.error = Some(error.to_string());
                publish(state_tx, state);
                return None;
            }
            Err(join_error) => {
                state.error = Some(join_error.to_string());
                publish(state_tx, state);
                return None;
            }
        }
    }
    Some((resolved, resource.all_strings))
}

fn spawn_stream_worker(
    fetcher: Arc<dyn Fetcher>,
    url: String,
    header: Vec<String>,
    cancel: CancelHandle,
    event_tx: mpsc::Sender<StreamEvent>,
) {
    tokio::task::spawn_blocking(move || {
        let result = stream_rows(
            fetcher.as_ref(),
            &url,
            &header,
            &StreamOptions::default(),
            &cancel,
            |batch| {
                // A closed channel means the widget is gone; stop reading.
                if event_tx.blocking_send(StreamEvent::Batch(batch)).is_err() {
                    return ControlFlow::Break(());
                }
                ControlFlow::Continue(())
            },
        );
        let terminal = match result {
            Ok(outcome) => {
                debug!(?outcome, "stream worker finished");
                StreamEvent::Done
            }
            Err(error) => StreamEvent::Failed(error.to_string()),
        };
        let _ = event_tx.blocking_send(terminal);
    });
}

/// Serves panel toggles once the stream is over.
async fn toggle_loop(
    toggle_rx: &mut mpsc::UnboundedReceiver<()>,
    state: &mut PreviewState,
    state_tx: &watch::Sender<PreviewState>,
) {
    while toggle_rx.recv().await.is_some() {
        state.show_field_info = !state.show_field_info;
        publish(state_tx, state);
    }
}

fn publish(state_tx: &watch::Sender<PreviewState>, state: &PreviewState) {
    let _ = state_tx.send(state.clone());
}
