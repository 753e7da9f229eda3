//! Reconstruction of a bounded reply tree from a flat, depth-tagged comment sequence.
//!
//! Discussion pages list their comments in document order, each row carrying an
//! indentation level. [`reconstruct`] walks that sequence once and rebuilds the
//! reply hierarchy, keeping at most [`ReconstructPolicy::max_children`] siblings
//! under every parent (and at the root level), and only letting depths listed in
//! [`ReconstructPolicy::collect_depths`] act as attachment points for replies.
//!
//! Records that cannot be attached are dropped silently; nothing in this module
//! performs I/O or fails on malformed depth sequences.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;
use tracing::debug;

/// Breadth cap applied when a caller does not configure one.
pub const DEFAULT_MAX_CHILDREN: usize = 5;

/// One comment row as extracted from the source document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentRecord {
    /// Nesting level; `0` is top level.
    pub depth: u32,
    /// `None` when the author could not be located (distinct from an empty name).
    pub author: Option<String>,
    /// Whitespace-normalised body text, empty when absent.
    pub text: String,
}

impl CommentRecord {
    pub fn new(depth: u32, author: Option<&str>, text: &str) -> Self {
        Self {
            depth,
            author: author.map(str::to_owned),
            text: text.to_owned(),
        }
    }
}

/// A kept comment together with its direct replies, in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentNode {
    pub author: Option<String>,
    pub text: String,
    pub depth: u32,
    pub replies: Vec<CommentNode>,
}

impl CommentNode {
    fn from_record(record: CommentRecord, replies: Vec<CommentNode>) -> Self {
        Self {
            author: record.author,
            text: record.text,
            depth: record.depth,
            replies,
        }
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn subtree_len(&self) -> usize {
        1 + self.replies.iter().map(CommentNode::subtree_len).sum::<usize>()
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ThreadError {
    #[error("max_children must be a positive integer, got {0}")]
    InvalidBreadthCap(usize),
}

/// Breadth cap and anchor-eligible depths for one reconstruction.
///
/// Always holds a positive `max_children`; construction and deserialisation
/// reject zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PolicySection")]
pub struct ReconstructPolicy {
    max_children: usize,
    collect_depths: BTreeSet<u32>,
}

impl ReconstructPolicy {
    pub fn new<I>(max_children: usize, collect_depths: I) -> Result<Self, ThreadError>
    where
        I: IntoIterator<Item = u32>,
    {
        if max_children == 0 {
            return Err(ThreadError::InvalidBreadthCap(max_children));
        }
        Ok(Self {
            max_children,
            collect_depths: collect_depths.into_iter().collect(),
        })
    }

    pub fn max_children(&self) -> usize {
        self.max_children
    }

    pub fn collect_depths(&self) -> &BTreeSet<u32> {
        &self.collect_depths
    }

    /// Whether nodes at `depth` may receive replies.
    pub fn collects(&self, depth: u32) -> bool {
        self.collect_depths.contains(&depth)
    }
}

impl Default for ReconstructPolicy {
    fn default() -> Self {
        Self {
            max_children: DEFAULT_MAX_CHILDREN,
            collect_depths: BTreeSet::from([0]),
        }
    }
}

#[derive(Deserialize)]
struct PolicySection {
    #[serde(default = "default_max_children")]
    max_children: usize,
    #[serde(default = "default_collect_depths")]
    collect_depths: Vec<u32>,
}

fn default_max_children() -> usize {
    DEFAULT_MAX_CHILDREN
}

fn default_collect_depths() -> Vec<u32> {
    vec![0]
}

impl TryFrom<PolicySection> for ReconstructPolicy {
    type Error = ThreadError;

    fn try_from(section: PolicySection) -> Result<Self, Self::Error> {
        ReconstructPolicy::new(section.max_children, section.collect_depths)
    }
}

struct Slot {
    record: CommentRecord,
    replies: Vec<usize>,
}

/// Rebuild the reply tree from `records` in a single forward pass.
///
/// Nodes live in a local arena while the pass runs; the anchor table maps a
/// depth to the arena index of the last node kept at that depth. Once the pass
/// ends the arena is folded bottom-up into owned [`CommentNode`]s. Children
/// always sit at higher arena indices than their parent, so a reverse sweep
/// sees every reply before the node that owns it.
pub fn reconstruct<I>(records: I, policy: &ReconstructPolicy) -> Vec<CommentNode>
where
    I: IntoIterator<Item = CommentRecord>,
{
    let cap = policy.max_children();
    let mut arena: Vec<Slot> = Vec::new();
    let mut roots: Vec<usize> = Vec::new();
    let mut anchors: BTreeMap<u32, usize> = BTreeMap::new();
    let mut seen = 0usize;
    let mut dropped = 0usize;
    let mut root_cap_hit = false;

    for record in records {
        seen += 1;
        let depth = record.depth;

        // An indentation drop closes every deeper branch, kept or not.
        anchors.retain(|&open, _| open <= depth);

        if depth == 0 {
            if roots.len() >= cap {
                root_cap_hit = true;
                break;
            }
            let idx = arena.len();
            arena.push(Slot {
                record,
                replies: Vec::new(),
            });
            roots.push(idx);
            if policy.collects(0) {
                anchors.insert(0, idx);
            }
            continue;
        }

        let parent_depth = depth - 1;
        let parent = match anchors.get(&parent_depth) {
            Some(&parent)
                if policy.collects(parent_depth) && arena[parent].replies.len() < cap =>
            {
                parent
            }
            _ => {
                dropped += 1;
                continue;
            }
        };

        let idx = arena.len();
        arena.push(Slot {
            record,
            replies: Vec::new(),
        });
        arena[parent].replies.push(idx);
        if policy.collects(depth) {
            anchors.insert(depth, idx);
        }
    }

    debug!(
        records_seen = seen,
        kept = arena.len(),
        dropped,
        roots = roots.len(),
        root_cap_hit,
        "Reconstructed comment thread"
    );

    let mut built: Vec<Option<CommentNode>> =
        std::iter::repeat_with(|| None).take(arena.len()).collect();
    for (idx, slot) in arena.into_iter().enumerate().rev() {
        let replies = slot
            .replies
            .iter()
            .filter_map(|&child| built[child].take())
            .collect();
        built[idx] = Some(CommentNode::from_record(slot.record, replies));
    }

    roots
        .into_iter()
        .filter_map(|root| built[root].take())
        .collect()
}
