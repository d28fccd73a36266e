//! Deterministic ordering for everything that reaches the renderer.
//!
//! Ordering is plain string comparison on identifiers. It exists only to make
//! output byte-identical across runs.

use crate::ir::{Model, Target, Workload};
use std::collections::HashMap;

/// Keys of `map` in ascending order.
pub fn sorted_keys<V>(map: &HashMap<String, V>) -> Vec<&str> {
    let mut keys: Vec<&str> = map.keys().map(String::as_str).collect();
    keys.sort_unstable();
    keys
}

/// Orders by id. Distinct peers can normalize to the same id, so peer and
/// port break ties.
pub fn sort_targets(targets: &mut [Target]) {
    targets.sort_by(|a, b| {
        a.id.cmp(&b.id)
            .then_with(|| a.peer_id.cmp(&b.peer_id))
            .then_with(|| a.peer.cmp(&b.peer))
            .then_with(|| a.port.cmp(&b.port))
    });
}

pub fn sort_workload(workload: &mut Workload) {
    workload.names.sort();
    sort_targets(&mut workload.ingress);
    sort_targets(&mut workload.egress);
}

/// Turns the aggregation map into an ordered model.
pub fn canonicalize(mut workloads: HashMap<String, Workload>) -> Model {
    let ids: Vec<String> = sorted_keys(&workloads)
        .into_iter()
        .map(str::to_string)
        .collect();
    let mut ordered = Vec::with_capacity(ids.len());
    for id in ids {
        if let Some(mut workload) = workloads.remove(&id) {
            sort_workload(&mut workload);
            ordered.push(workload);
        }
    }
    Model { workloads: ordered }
}
