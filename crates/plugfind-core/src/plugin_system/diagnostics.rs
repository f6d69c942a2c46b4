use std::fmt;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::kernel::constants::DUPE_LOG_TARGET;
use crate::plugin_system::version::VersionKey;

/// Something the duplicate selector decided or noticed.
///
/// Events carry owned data so sinks can keep them past the selection call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceEvent {
    /// A (identifier, version) bucket was formed
    Grouped { id: String, version_key: VersionKey, count: usize },
    /// Two candidates for `id` are about to be compared
    Comparing { id: String, first: PathBuf, second: PathBuf },
    /// One side of a comparison had a version that could not be parsed
    UnparsableVersion { id: String, version: String },
    /// Neither side of a comparison had a parsable version; treated as a tie
    UnparsableVersions { id: String, first_version: String, second_version: String },
    /// The candidate kept for `id`
    Selected { id: String, version: String, base: PathBuf },
}

impl fmt::Display for TraceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceEvent::Grouped { id, version_key, count } => {
                write!(f, "Grouped duplicate plugins pluginId={} version={} count={}", id, version_key, count)
            }
            TraceEvent::Comparing { id, first, second } => write!(
                f,
                "Comparing duplicate plugins pluginId={} i={} j={}",
                id,
                first.display(),
                second.display()
            ),
            TraceEvent::UnparsableVersion { id, version } => {
                write!(f, "Could not parse version pluginId={} version={:?}", id, version)
            }
            TraceEvent::UnparsableVersions { id, first_version, second_version } => write!(
                f,
                "Could not parse versions pluginId={} version={:?} version={:?}",
                id, first_version, second_version
            ),
            TraceEvent::Selected { id, version, base } => write!(
                f,
                "Selected plugin pluginId={} version={:?} path={}",
                id,
                version,
                base.display()
            ),
        }
    }
}

/// Receiver for selector diagnostics
pub trait TraceSink: Send + Sync {
    fn emit(&self, event: &TraceEvent);
}

/// Forwards events to the `log` facade at debug level
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl TraceSink for LogSink {
    fn emit(&self, event: &TraceEvent) {
        log::debug!(target: DUPE_LOG_TARGET, "{}", event);
    }
}

/// Keeps every event in memory, in emission order
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<TraceEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events recorded so far
    pub fn events(&self) -> Vec<TraceEvent> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Removes and returns the recorded events
    pub fn take(&self) -> Vec<TraceEvent> {
        match self.events.lock() {
            Ok(mut events) => std::mem::take(&mut *events),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

impl TraceSink for MemorySink {
    fn emit(&self, event: &TraceEvent) {
        match self.events.lock() {
            Ok(mut events) => events.push(event.clone()),
            Err(poisoned) => poisoned.into_inner().push(event.clone()),
        }
    }
}
