//! Desktop notifications for newly arrived newsletters.

use std::collections::HashSet;

use newsletters_core::{GroupedView, NewsletterId, NewsletterRecord, row_label};
use notify_rust::Notification;
use tracing::{debug, warn};

/// Tracks which records of today's view have been seen.
#[derive(Debug, Default)]
pub struct ArrivalTracker {
    seen: Option<HashSet<NewsletterId>>,
}

impl ArrivalTracker {
    /// Returns the records of `view` not present in the previous call.
    ///
    /// The first call only primes the tracker and returns nothing.
    pub fn arrivals<'a>(&mut self, view: &'a GroupedView) -> Vec<&'a NewsletterRecord> {
        let current: HashSet<NewsletterId> = view
            .groups
            .iter()
            .flat_map(|g| &g.items)
            .filter_map(|r| r.id.clone())
            .collect();

        let arrivals = self.seen.as_ref().map_or_else(Vec::new, |seen| {
            view.groups
                .iter()
                .flat_map(|g| &g.items)
                .filter(|r| r.id.as_ref().is_some_and(|id| !seen.contains(id)))
                .collect()
        });

        self.seen = Some(current);
        arrivals
    }
}

/// Shows one desktop notification per record.
pub fn notify_arrivals(view: &GroupedView, records: &[&NewsletterRecord]) {
    for record in records {
        let label = row_label(record, view.context);
        match Notification::new()
            .appname("Newsletters")
            .summary(&label.title)
            .body(&label.subtitle)
            .show()
        {
            Ok(_) => debug!("Notified about {}", record.subject),
            Err(e) => warn!("Failed to show notification: {e}"),
        }
    }
}
