//! Proximity query over a finished layout.
//!
//! While a node is dragged, the interaction layer asks which other node is
//! close enough to connect to. This only reads the positions already in a
//! `LayoutResult`; nothing is re-laid out.

use crate::layout::types::LayoutResult;

/// Distance under which two node centers count as close.
pub const DEFAULT_MIN_DISTANCE: f64 = 150.0;

/// The closest node and the edge a connection to it would create.
#[derive(Debug, Clone, PartialEq)]
pub struct ProximityMatch {
    pub node_id: String,
    pub distance: f64,
    /// The node further left becomes the source.
    pub source: String,
    pub target: String,
    /// Id of the proposed edge, `"{source}-{target}"`.
    pub edge_id: String,
}

/// Find the node whose center is closest to `node_id`'s, strictly within
/// `max_distance`. Earlier nodes win ties.
pub fn closest_node(result: &LayoutResult, node_id: &str, max_distance: f64) -> Option<ProximityMatch> {
    let dragged = result.center_of(node_id)?;

    let mut best: Option<(&str, f64, f64)> = None;
    for node in &result.nodes {
        if node.id == node_id {
            continue;
        }
        let center = node.center(result.origin);
        let d = center.distance(&dragged);
        if d < max_distance && best.is_none_or(|(_, bd, _)| d < bd) {
            best = Some((node.id.as_str(), d, center.x));
        }
    }

    let (closest, distance, closest_x) = best?;
    let (source, target) = if closest_x < dragged.x {
        (closest, node_id)
    } else {
        (node_id, closest)
    };
    Some(ProximityMatch {
        node_id: closest.to_string(),
        distance,
        source: source.to_string(),
        target: target.to_string(),
        edge_id: format!("{source}-{target}"),
    })
}

#[cfg(test)]
#[path = "../tests/rust/test_proximity.rs"]
mod tests;
