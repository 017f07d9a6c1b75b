//! Selection events - per-node range/frustum status recorded during an
//! event-emitting selection pass.
//!
//! Consumers that own per-node resources (instances, meshes) use the
//! transitions reported by [`SelectionTracker`] to add and remove them
//! incrementally instead of rebuilding everything on each pass.

use std::collections::HashMap;

use super::NodeKey;

bitflags::bitflags! {
  /// What a selection pass observed about a node.
  #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
  pub struct SelectionEventType: u8 {
    /// Node intersects its level's range sphere.
    const IN_RANGE       = 0b0000_0001;
    /// Node misses its level's range sphere.
    const OUT_OF_RANGE   = 0b0000_0010;
    /// Node intersects the observer frustum.
    const IN_FRUSTUM     = 0b0000_0100;
    /// Node is outside the observer frustum.
    const OUT_OF_FRUSTUM = 0b0000_1000;
    /// Status decided by an ancestor rather than the node's own test.
    const DUE_TO_PARENT  = 0b0001_0000;
  }
}

/// One node's status for one selection pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NodeSelectionEvent {
  pub key: NodeKey,
  pub level: u8,
  pub flags: SelectionEventType,
  /// Whether the node is part of the pass's selection.
  pub selected: bool,
}

impl NodeSelectionEvent {
  /// Event with no flags set.
  pub fn new(key: NodeKey, level: u8) -> Self {
    Self {
      key,
      level,
      flags: SelectionEventType::empty(),
      selected: false,
    }
  }

  /// Range status if the pass tested it.
  pub fn in_range(&self) -> Option<bool> {
    if self.flags.contains(SelectionEventType::IN_RANGE) {
      Some(true)
    } else if self.flags.contains(SelectionEventType::OUT_OF_RANGE) {
      Some(false)
    } else {
      None
    }
  }

  /// Frustum status if the pass tested it.
  pub fn in_frustum(&self) -> Option<bool> {
    if self.flags.contains(SelectionEventType::IN_FRUSTUM) {
      Some(true)
    } else if self.flags.contains(SelectionEventType::OUT_OF_FRUSTUM) {
      Some(false)
    } else {
      None
    }
  }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct NodeStatus {
  level: u8,
  in_range: Option<bool>,
  in_frustum: Option<bool>,
  selected: bool,
}

/// Remembers the last known status per node and reduces a pass's events to
/// the transitions since the previous pass.
#[derive(Clone, Debug, Default)]
pub struct SelectionTracker {
  status: HashMap<NodeKey, NodeStatus>,
}

impl SelectionTracker {
  pub fn new() -> Self {
    Self::default()
  }

  /// Number of nodes currently tracked.
  pub fn len(&self) -> usize {
    self.status.len()
  }

  pub fn is_empty(&self) -> bool {
    self.status.is_empty()
  }

  /// Forget everything, e.g. after keys were re-derived by a rebase.
  pub fn clear(&mut self) {
    self.status.clear();
  }

  /// Reduce `events` to transitions.
  ///
  /// An event is kept if its node was not tracked before or if its range,
  /// frustum or selected status differs from the previous pass. Status the
  /// pass did not test carries over unchanged. Tracked nodes the pass did not
  /// visit at all (an ancestor was culled) are reported as
  /// `OUT_OF_RANGE | DUE_TO_PARENT` and dropped from the tracker.
  pub fn transitions(&mut self, events: &[NodeSelectionEvent]) -> Vec<NodeSelectionEvent> {
    let mut out = Vec::new();
    let mut visited: HashMap<NodeKey, NodeStatus> = HashMap::with_capacity(events.len());

    for event in events {
      let previous = self.status.get(&event.key);
      let status = NodeStatus {
        level: event.level,
        in_range: event.in_range().or(previous.and_then(|p| p.in_range)),
        in_frustum: event.in_frustum().or(previous.and_then(|p| p.in_frustum)),
        selected: event.selected,
      };

      if previous != Some(&status) {
        out.push(*event);
      }
      visited.insert(event.key, status);
    }

    let mut vanished: Vec<(NodeKey, NodeStatus)> = self
      .status
      .iter()
      .filter(|(key, _)| !visited.contains_key(key))
      .map(|(key, status)| (*key, *status))
      .collect();
    vanished.sort_by_key(|(key, _)| *key);

    for (key, status) in vanished {
      if status.in_range != Some(false) || status.selected {
        let mut event = NodeSelectionEvent::new(key, status.level);
        event.flags = SelectionEventType::OUT_OF_RANGE | SelectionEventType::DUE_TO_PARENT;
        out.push(event);
      }
    }

    self.status = visited;
    out
  }
}

#[cfg(test)]
#[path = "events_test.rs"]
mod events_test;
