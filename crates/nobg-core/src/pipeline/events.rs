//! Progress events for hosts that display batch status.

/// Progress reported while a batch runs.
///
/// Sent in order over an optional channel; a dropped receiver does not
/// affect the batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchEvent {
    /// Validation passed and `total` items will be processed.
    Started { total: usize },
    ItemProcessed {
        index: usize,
        identifier: String,
        output_name: String,
    },
    ItemFailed {
        index: usize,
        identifier: String,
        message: String,
    },
    /// The output file was produced.
    Bundled { filename: String, entries: usize },
    Finished { succeeded: usize, failed: usize },
}

/// One-line description of an event, for hosts that print progress.
pub fn format_event(event: &BatchEvent) -> String {
    match event {
        BatchEvent::Started { total } => format!("Processing {} images", total),
        BatchEvent::ItemProcessed {
            index,
            identifier,
            output_name,
        } => format!("[{}] {} → {}", index + 1, identifier, output_name),
        BatchEvent::ItemFailed {
            index,
            identifier,
            message,
        } => format!("[{}] {} failed: {}", index + 1, identifier, message),
        BatchEvent::Bundled { filename, entries } => {
            format!("Wrote {} ({} files)", filename, entries)
        }
        BatchEvent::Finished { succeeded, failed } => {
            format!("Done: {} succeeded, {} failed", succeeded, failed)
        }
    }
}
