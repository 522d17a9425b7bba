//! In-memory transform history
//!
//! Keeps a bounded, time-ordered buffer per (parent, child) pair plus a set
//! of static transforms that are valid at every time. Lookups at a given
//! stamp interpolate between the samples that bracket it and fail outside
//! the buffered range; `Latest` always returns the newest sample.

use std::collections::{HashMap, VecDeque};

use crate::geometry::{RigidTransform, StampedTransform};
use crate::tf::{LookupTime, TransformLookup, TransformSink};

pub const DEFAULT_HISTORY_CAPACITY: usize = 100;

type FramePair = (String, String);

#[derive(Debug, Clone)]
struct TransformBuffer {
    samples: VecDeque<(u64, RigidTransform)>,
    max_capacity: usize,
}

impl TransformBuffer {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity),
            max_capacity: capacity,
        }
    }

    fn insert(&mut self, stamp_ns: u64, transform: RigidTransform) {
        let pos = self.samples.partition_point(|(stamp, _)| *stamp < stamp_ns);
        match self.samples.get_mut(pos) {
            Some(existing) if existing.0 == stamp_ns => existing.1 = transform,
            _ => self.samples.insert(pos, (stamp_ns, transform)),
        }

        while self.samples.len() > self.max_capacity {
            self.samples.pop_front();
        }
    }

    fn latest(&self) -> Option<RigidTransform> {
        self.samples.back().map(|(_, t)| *t)
    }

    fn at(&self, stamp_ns: u64) -> Option<RigidTransform> {
        let (first, _) = self.samples.front()?;
        let (last, _) = self.samples.back()?;
        if stamp_ns < *first || stamp_ns > *last {
            return None;
        }

        let pos = self.samples.partition_point(|(stamp, _)| *stamp < stamp_ns);
        let (after_stamp, after) = self.samples[pos];
        if after_stamp == stamp_ns {
            return Some(after);
        }

        // stamp_ns > first, so pos >= 1
        let (before_stamp, before) = self.samples[pos - 1];
        let ratio = (stamp_ns - before_stamp) as f64 / (after_stamp - before_stamp) as f64;
        Some(before.interpolate(&after, ratio))
    }
}

/// Time-indexed store of transforms between named frames
#[derive(Debug, Clone)]
pub struct TransformHistory {
    buffers: HashMap<FramePair, TransformBuffer>,
    statics: HashMap<FramePair, RigidTransform>,
    capacity: usize,
}

impl Default for TransformHistory {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }
}

impl TransformHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// History keeping at most `capacity` samples per frame pair
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffers: HashMap::new(),
            statics: HashMap::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn add_transform(&mut self, transform: StampedTransform) {
        let capacity = self.capacity;
        self.buffers
            .entry((transform.parent_frame, transform.child_frame))
            .or_insert_with(|| TransformBuffer::with_capacity(capacity))
            .insert(transform.stamp_ns, transform.transform);
    }

    /// Record a transform that never changes
    pub fn add_static(&mut self, parent: impl Into<String>, child: impl Into<String>, transform: RigidTransform) {
        self.statics.insert((parent.into(), child.into()), transform);
    }

    /// Number of buffered (non-static) samples for `parent -> child`
    pub fn sample_count(&self, parent: &str, child: &str) -> usize {
        self.buffers
            .get(&(parent.to_string(), child.to_string()))
            .map_or(0, |b| b.samples.len())
    }

    fn lookup_direct(&self, parent: &str, child: &str, time: LookupTime) -> Option<RigidTransform> {
        let key = (parent.to_string(), child.to_string());
        if let Some(transform) = self.statics.get(&key) {
            return Some(*transform);
        }

        let buffer = self.buffers.get(&key)?;
        match time {
            LookupTime::At(stamp_ns) => buffer.at(stamp_ns),
            LookupTime::Latest => buffer.latest(),
        }
    }
}

impl TransformLookup for TransformHistory {
    fn lookup(&self, parent: &str, child: &str, time: LookupTime) -> Option<RigidTransform> {
        self.lookup_direct(parent, child, time)
            .or_else(|| self.lookup_direct(child, parent, time).map(|t| t.inverse()))
    }
}

impl TransformSink for TransformHistory {
    fn send(&mut self, transforms: &[StampedTransform]) {
        for transform in transforms {
            self.add_transform(transform.clone());
        }
    }
}
