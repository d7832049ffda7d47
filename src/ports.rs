//! Seams between the pipeline and its collaborators.

/// Receiver for live-reload signals emitted after a render stage writes
/// its output.
///
/// Plain builds use [`NoopReload`]; the dev server attaches a
/// broadcast-backed implementation so connected browsers refresh.
pub trait ReloadNotifier {
    fn notify(&self, stage: &str);
}

/// Discards reload signals; used when no dev server is attached.
pub struct NoopReload;

impl ReloadNotifier for NoopReload {
    fn notify(&self, _stage: &str) {}
}
