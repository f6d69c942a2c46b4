//! Selection of one plugin per identifier when discovery finds duplicates.
//!
//! The same plugin can turn up under several roots, e.g. once as a bundled
//! `dist` build and once as an external install. [`DuplicateSelector::filter`]
//! keeps exactly one candidate per identifier:
//!
//! 1. candidates are grouped by identifier, then by [`VersionKey`];
//! 2. each identifier's buckets are flattened back into one list;
//! 3. the list is reduced pairwise with [`compare_candidates`] until one
//!    candidate is left.
//!
//! The reduction is a single carry-forward pass: when the earlier candidate
//! wins it is moved behind the remaining ones, otherwise it is dropped, so a
//! tie always drops the earlier candidate. Every comparison orders by `dist`
//! placement first and version second, so the survivor is never beaten by
//! any other candidate of its identifier.
use std::cmp::Ordering;
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::sync::Arc;

use crate::plugin_system::candidate::PluginCandidate;
use crate::plugin_system::class::PluginClass;
use crate::plugin_system::diagnostics::{LogSink, TraceEvent, TraceSink};
use crate::plugin_system::features::{FeatureToggles, FLAG_EXTERNAL_CORE_PLUGINS};
use crate::plugin_system::version::{parse_plugin_version, VersionKey};

/// Rule that decided a comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareReason {
    /// Core class without the external override: `dist` wins
    CoreDist,
    /// Exactly one side is in a `dist` directory
    Dist,
    /// Both versions parsed; semver precedence decided
    Version,
    /// Only the first version failed to parse
    FirstUnparsable,
    /// Only the second version failed to parse
    SecondUnparsable,
    /// Neither version parsed; tie
    BothUnparsable,
}

/// Outcome of comparing two candidates.
///
/// `Greater` prefers the first candidate, `Less` the second.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Comparison {
    pub ordering: Ordering,
    pub reason: CompareReason,
}

impl Comparison {
    fn new(ordering: Ordering, reason: CompareReason) -> Self {
        Self { ordering, reason }
    }

    pub fn prefers_first(&self) -> bool {
        self.ordering == Ordering::Greater
    }
}

/// Compares two candidates sharing an identifier.
///
/// `external_core_enabled` is the state of [`FLAG_EXTERNAL_CORE_PLUGINS`];
/// it only matters for [`PluginClass::Core`].
pub fn compare_candidates(
    class: PluginClass,
    external_core_enabled: bool,
    a: &PluginCandidate,
    b: &PluginCandidate,
) -> Comparison {
    let a_in_dist = a.in_dist_folder();
    let b_in_dist = b.in_dist_folder();

    if class.is_core() && !external_core_enabled {
        if let Some(ordering) = dist_preference(a_in_dist, b_in_dist) {
            return Comparison::new(ordering, CompareReason::CoreDist);
        }
    }

    if let Some(ordering) = dist_preference(a_in_dist, b_in_dist) {
        return Comparison::new(ordering, CompareReason::Dist);
    }

    compare_versions(a.version(), b.version())
}

fn dist_preference(a_in_dist: bool, b_in_dist: bool) -> Option<Ordering> {
    match (a_in_dist, b_in_dist) {
        (true, false) => Some(Ordering::Greater),
        (false, true) => Some(Ordering::Less),
        _ => None,
    }
}

/// Compares declared versions; an unparsable version loses to a parsable one.
pub fn compare_versions(a: &str, b: &str) -> Comparison {
    match (parse_plugin_version(a), parse_plugin_version(b)) {
        (Err(_), Err(_)) => Comparison::new(Ordering::Equal, CompareReason::BothUnparsable),
        (Err(_), Ok(_)) => Comparison::new(Ordering::Less, CompareReason::FirstUnparsable),
        (Ok(_), Err(_)) => Comparison::new(Ordering::Greater, CompareReason::SecondUnparsable),
        (Ok(va), Ok(vb)) => Comparison::new(va.cmp_precedence(&vb), CompareReason::Version),
    }
}

/// Candidates sharing one declared version, as indices into the input slice
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionBucket {
    pub key: VersionKey,
    pub members: Vec<usize>,
}

/// All candidates for one identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginGroup {
    pub id: String,
    pub buckets: Vec<VersionBucket>,
}

impl PluginGroup {
    /// Member indices across all buckets, bucket by bucket
    pub fn flatten(&self) -> Vec<usize> {
        self.buckets
            .iter()
            .flat_map(|bucket| bucket.members.iter().copied())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.buckets.iter().map(|bucket| bucket.members.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Groups candidates by identifier, then by [`VersionKey`].
///
/// Identifiers keep the order they were first seen in, buckets the order
/// their key was first seen in, and members their discovery order.
pub fn group_by_id_and_version(candidates: &[PluginCandidate]) -> Vec<PluginGroup> {
    let mut groups: Vec<PluginGroup> = Vec::new();
    let mut group_index: HashMap<&str, usize> = HashMap::new();

    for (index, candidate) in candidates.iter().enumerate() {
        let key = VersionKey::from_declared(candidate.version());
        let slot = *group_index.entry(candidate.id()).or_insert_with(|| {
            groups.push(PluginGroup {
                id: candidate.id().to_string(),
                buckets: Vec::new(),
            });
            groups.len() - 1
        });

        let group = &mut groups[slot];
        match group.buckets.iter_mut().find(|bucket| bucket.key == key) {
            Some(bucket) => bucket.members.push(index),
            None => group.buckets.push(VersionBucket { key, members: vec![index] }),
        }
    }

    groups
}

/// Picks one plugin per identifier out of a discovery result
pub struct DuplicateSelector {
    features: Arc<dyn FeatureToggles>,
    sink: Arc<dyn TraceSink>,
}

impl fmt::Debug for DuplicateSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DuplicateSelector").finish_non_exhaustive()
    }
}

impl DuplicateSelector {
    /// Selector reporting to the `log` facade
    pub fn new(features: Arc<dyn FeatureToggles>) -> Self {
        Self {
            features,
            sink: Arc::new(LogSink),
        }
    }

    /// Replace the diagnostics sink
    pub fn with_sink(mut self, sink: Arc<dyn TraceSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Keeps one candidate per identifier, in order of first discovery.
    pub fn filter(&self, class: PluginClass, candidates: Vec<PluginCandidate>) -> Vec<PluginCandidate> {
        if candidates.is_empty() {
            return candidates;
        }

        let groups = self.group_by_id_and_version(&candidates);
        let winners: Vec<usize> = groups
            .iter()
            .filter_map(|group| self.resolve_indices(class, &candidates, group.flatten()))
            .collect();

        let mut slots: Vec<Option<PluginCandidate>> = candidates.into_iter().map(Some).collect();
        winners
            .into_iter()
            .filter_map(|index| slots.get_mut(index).and_then(Option::take))
            .inspect(|winner| {
                self.sink.emit(&TraceEvent::Selected {
                    id: winner.id().to_string(),
                    version: winner.version().to_string(),
                    base: winner.base().to_path_buf(),
                })
            })
            .collect()
    }

    /// [`group_by_id_and_version`], reporting each bucket to the sink
    pub fn group_by_id_and_version(&self, candidates: &[PluginCandidate]) -> Vec<PluginGroup> {
        let groups = group_by_id_and_version(candidates);
        for group in &groups {
            for bucket in &group.buckets {
                self.sink.emit(&TraceEvent::Grouped {
                    id: group.id.clone(),
                    version_key: bucket.key.clone(),
                    count: bucket.members.len(),
                });
            }
        }
        groups
    }

    /// Reduces same-identifier candidates to one. `None` only for an empty slice.
    pub fn resolve<'a>(
        &self,
        class: PluginClass,
        candidates: &'a [PluginCandidate],
    ) -> Option<&'a PluginCandidate> {
        let order = (0..candidates.len()).collect();
        self.resolve_indices(class, candidates, order)
            .and_then(|index| candidates.get(index))
    }

    fn resolve_indices(
        &self,
        class: PluginClass,
        arena: &[PluginCandidate],
        order: Vec<usize>,
    ) -> Option<usize> {
        let mut queue: VecDeque<usize> = order.into();

        while queue.len() > 1 {
            let first = queue.pop_front()?;
            let second = *queue.front()?;
            let (a, b) = (&arena[first], &arena[second]);

            self.sink.emit(&TraceEvent::Comparing {
                id: a.id().to_string(),
                first: a.base().to_path_buf(),
                second: b.base().to_path_buf(),
            });

            if self.compare(class, a, b) == Ordering::Greater {
                // The earlier candidate survives and waits behind the rest.
                queue.pop_front();
                queue.push_back(first);
            }
        }

        queue.pop_front()
    }

    /// Compares two candidates with this selector's feature toggles.
    ///
    /// `Greater` prefers `a`, `Less` prefers `b`.
    pub fn compare(&self, class: PluginClass, a: &PluginCandidate, b: &PluginCandidate) -> Ordering {
        let external_core_enabled =
            class.is_core() && self.features.is_enabled_globally(FLAG_EXTERNAL_CORE_PLUGINS);
        let comparison = compare_candidates(class, external_core_enabled, a, b);
        self.trace_comparison(&comparison, a, b);
        comparison.ordering
    }

    fn trace_comparison(&self, comparison: &Comparison, a: &PluginCandidate, b: &PluginCandidate) {
        let event = match comparison.reason {
            CompareReason::BothUnparsable => TraceEvent::UnparsableVersions {
                id: a.id().to_string(),
                first_version: a.version().to_string(),
                second_version: b.version().to_string(),
            },
            CompareReason::FirstUnparsable => TraceEvent::UnparsableVersion {
                id: a.id().to_string(),
                version: a.version().to_string(),
            },
            CompareReason::SecondUnparsable => TraceEvent::UnparsableVersion {
                id: b.id().to_string(),
                version: b.version().to_string(),
            },
            CompareReason::CoreDist | CompareReason::Dist | CompareReason::Version => return,
        };
        self.sink.emit(&event);
    }
}
