//! Label measurement: turns edge label text into layout hints.
//!
//! A start label sits next to the edge's source node and an end label next
//! to its target, so each widens the box reserved around that node. A wide
//! end label also needs room along the edge, which is bought with extra rank
//! gaps (`minlen`).

use std::collections::HashMap;

use unicode_width::UnicodeWidthStr;

use crate::layout::types::GraphInput;

/// Converts label text to layout units.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelMetrics {
    /// Width of one display column.
    pub char_width: f64,
    /// Padding added around non-empty label text.
    pub padding: f64,
    /// Label width that costs one extra rank gap.
    pub rank_unit: f64,
}

impl Default for LabelMetrics {
    fn default() -> Self {
        Self {
            char_width: 7.2,
            padding: 16.0,
            rank_unit: 40.0,
        }
    }
}

impl LabelMetrics {
    /// Rendered width of a label, 0 for empty text.
    pub fn text_width(&self, text: &str) -> f64 {
        if text.is_empty() {
            return 0.0;
        }
        UnicodeWidthStr::width(text) as f64 * self.char_width + self.padding
    }

    /// Extra rank gaps an end label of this text needs.
    pub fn extra_ranks(&self, text: &str) -> usize {
        let width = self.text_width(text);
        if width == 0.0 {
            return 0;
        }
        (width / self.rank_unit).ceil() as usize
    }
}

/// Labels attached to the two ends of one edge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdgeLabels {
    pub start: Option<String>,
    pub end: Option<String>,
}

impl EdgeLabels {
    pub fn new(start: Option<&str>, end: Option<&str>) -> Self {
        Self {
            start: start.map(str::to_owned),
            end: end.map(str::to_owned),
        }
    }
}

/// Fold label sizes into the graph's layout hints, keyed by edge id.
///
/// Every node's `extra_width` grows by the widest start label among its
/// outgoing edges plus the widest end label among its incoming edges. Every
/// edge with an end label gets its `minlen` raised by `extra_ranks`.
pub fn apply_label_hints(
    input: &mut GraphInput,
    labels: &HashMap<String, EdgeLabels>,
    metrics: &LabelMetrics,
) {
    let mut start_width: HashMap<&str, f64> = HashMap::new();
    let mut end_width: HashMap<&str, f64> = HashMap::new();

    for edge in &input.edges {
        let Some(l) = labels.get(&edge.id) else {
            continue;
        };
        if let Some(text) = l.start.as_deref() {
            let w = metrics.text_width(text);
            let entry = start_width.entry(edge.source.as_str()).or_insert(0.0);
            *entry = entry.max(w);
        }
        if let Some(text) = l.end.as_deref() {
            let w = metrics.text_width(text);
            let entry = end_width.entry(edge.target.as_str()).or_insert(0.0);
            *entry = entry.max(w);
        }
    }

    let extra: HashMap<String, f64> = input
        .nodes
        .iter()
        .map(|n| {
            let id = n.id.as_str();
            let w = start_width.get(id).copied().unwrap_or(0.0)
                + end_width.get(id).copied().unwrap_or(0.0);
            (n.id.clone(), w)
        })
        .collect();
    for node in &mut input.nodes {
        node.extra_width += extra.get(&node.id).copied().unwrap_or(0.0);
    }

    for edge in &mut input.edges {
        let Some(end) = labels.get(&edge.id).and_then(|l| l.end.as_deref()) else {
            continue;
        };
        let extra_ranks = metrics.extra_ranks(end);
        if extra_ranks > 0 {
            edge.minlen = Some(edge.minlen.unwrap_or(1) + extra_ranks);
        }
    }
}

#[cfg(test)]
#[path = "../tests/rust/test_labels.rs"]
mod tests;
