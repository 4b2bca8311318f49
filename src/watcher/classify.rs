// src/watcher/classify.rs

use std::collections::BTreeSet;

use crate::snapshot::Snapshot;
use crate::watcher::ChangeEvent;

/// Compare a fresh snapshot with the stored one.
///
/// - No prior snapshot: `[FirstObservation]`.
/// - Digests: `[Unchanged]` when byte-equal, otherwise `[Changed]`.
/// - Labels: one `Added` per new label, then one `Removed` per vanished
///   label, each in sorted order. `Unchanged` follows when none of those
///   labels is monitored. An empty `monitored` set means every label counts.
/// - Prior of a different kind: treated as no prior.
pub fn classify(
    prior: Option<&Snapshot>,
    current: &Snapshot,
    monitored: &BTreeSet<String>,
) -> Vec<ChangeEvent> {
    match (prior, current) {
        (Some(Snapshot::Digest(old)), Snapshot::Digest(new)) => {
            if old == new {
                vec![ChangeEvent::Unchanged]
            } else {
                vec![ChangeEvent::Changed]
            }
        }
        (Some(Snapshot::Labels(old)), Snapshot::Labels(new)) => diff_labels(old, new, monitored),
        _ => vec![ChangeEvent::FirstObservation],
    }
}

/// Whether `label` is of interest under `monitored`.
pub fn is_monitored(monitored: &BTreeSet<String>, label: &str) -> bool {
    monitored.is_empty() || monitored.contains(label)
}

fn diff_labels(
    old: &BTreeSet<String>,
    new: &BTreeSet<String>,
    monitored: &BTreeSet<String>,
) -> Vec<ChangeEvent> {
    let added = new.difference(old);
    let removed = old.difference(new);

    let monitored_changed = added
        .clone()
        .chain(removed.clone())
        .any(|label| is_monitored(monitored, label));

    let mut events: Vec<ChangeEvent> = added
        .map(|label| ChangeEvent::Added(label.clone()))
        .collect();
    events.extend(removed.map(|label| ChangeEvent::Removed(label.clone())));

    if !monitored_changed {
        events.push(ChangeEvent::Unchanged);
    }
    events
}
