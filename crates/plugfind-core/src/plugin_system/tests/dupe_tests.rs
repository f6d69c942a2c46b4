// crates/plugfind-core/src/plugin_system/tests/dupe_tests.rs
#![cfg(test)]

use std::cmp::Ordering;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use proptest::prelude::*;
use semver::Version;

use crate::plugin_system::candidate::PluginCandidate;
use crate::plugin_system::class::PluginClass;
use crate::plugin_system::diagnostics::{MemorySink, TraceEvent};
use crate::plugin_system::dupe::{
    compare_candidates, group_by_id_and_version, CompareReason, DuplicateSelector,
};
use crate::plugin_system::features::{StaticFeatureToggles, FLAG_EXTERNAL_CORE_PLUGINS};
use crate::plugin_system::manifest::PluginManifest;
use crate::plugin_system::version::VersionKey;

fn candidate(id: &str, version: &str, base: &str) -> PluginCandidate {
    PluginCandidate::local(PluginManifest::new(id, version), base)
}

fn selector() -> DuplicateSelector {
    DuplicateSelector::new(Arc::new(StaticFeatureToggles::new()))
}

fn recording_selector(toggles: StaticFeatureToggles) -> (DuplicateSelector, Arc<MemorySink>) {
    let sink = Arc::new(MemorySink::new());
    let selector = DuplicateSelector::new(Arc::new(toggles)).with_sink(sink.clone());
    (selector, sink)
}

fn bases(candidates: &[PluginCandidate]) -> Vec<PathBuf> {
    candidates.iter().map(|c| c.base().to_path_buf()).collect()
}

#[test]
fn test_filter_empty_input() {
    let selected = selector().filter(PluginClass::External, Vec::new());
    assert!(selected.is_empty());
}

#[test]
fn test_single_candidate_is_returned_unchanged() {
    let only = candidate("grafana-clock-panel", "1.0.0", "/var/lib/plugins/clock");
    let selected = selector().filter(PluginClass::External, vec![only.clone()]);

    assert_eq!(selected.len(), 1);
    assert_eq!(selected[0].manifest(), only.manifest());
    assert_eq!(selected[0].base(), only.base());
    assert!(Arc::ptr_eq(selected[0].fs(), only.fs()));
}

#[test]
fn test_dist_beats_higher_version_for_external_class() {
    let external = candidate("clock", "9.0.0", "/plugins/clock");
    let bundled = candidate("clock", "1.0.0", "/app/public/clock/dist");

    for input in [
        vec![external.clone(), bundled.clone()],
        vec![bundled.clone(), external.clone()],
    ] {
        let selected = selector().filter(PluginClass::External, input);
        assert_eq!(bases(&selected), vec![PathBuf::from("/app/public/clock/dist")]);
    }
}

#[test]
fn test_core_class_prefers_dist_when_override_disabled() {
    let a = candidate("table", "9.9.9", "/plugins/table");
    let b = candidate("table", "0.0.1", "/app/core/table/dist");

    let comparison = compare_candidates(PluginClass::Core, false, &a, &b);
    assert_eq!(comparison.ordering, Ordering::Less);
    assert_eq!(comparison.reason, CompareReason::CoreDist);

    let selected = selector().filter(PluginClass::Core, vec![a, b]);
    assert_eq!(selected.len(), 1);
    assert_eq!(selected[0].version(), "0.0.1");
}

#[test]
fn test_core_class_with_override_still_prefers_dist() {
    // The general dist rule applies to every class, so enabling the override
    // only changes which rule decides.
    let a = candidate("table", "9.9.9", "/plugins/table");
    let b = candidate("table", "0.0.1", "/app/core/table/dist");

    let comparison = compare_candidates(PluginClass::Core, true, &a, &b);
    assert_eq!(comparison.ordering, Ordering::Less);
    assert_eq!(comparison.reason, CompareReason::Dist);

    let toggles = StaticFeatureToggles::new().with_enabled(FLAG_EXTERNAL_CORE_PLUGINS);
    let (selector, _) = recording_selector(toggles);
    let selected = selector.filter(PluginClass::Core, vec![a, b]);
    assert_eq!(selected[0].version(), "0.0.1");
}

#[test]
fn test_higher_version_wins_outside_dist() {
    let older = candidate("worldmap", "1.2.0", "/plugins/a/worldmap");
    let newer = candidate("worldmap", "1.3.0", "/plugins/b/worldmap");

    let selected = selector().filter(PluginClass::External, vec![older.clone(), newer.clone()]);
    assert_eq!(selected[0].version(), "1.3.0");

    let selected = selector().filter(PluginClass::External, vec![newer, older]);
    assert_eq!(selected[0].version(), "1.3.0");
}

#[test]
fn test_parsable_version_beats_empty_version() {
    let empty = candidate("piechart", "", "/plugins/a/piechart");
    let real = candidate("piechart", "2.0.0", "/plugins/b/piechart");

    let selected = selector().filter(PluginClass::Bundled, vec![empty.clone(), real.clone()]);
    assert_eq!(selected[0].version(), "2.0.0");

    let selected = selector().filter(PluginClass::Bundled, vec![real, empty]);
    assert_eq!(selected[0].version(), "2.0.0");
}

#[test]
fn test_tie_returns_a_member_of_the_input() {
    let a = candidate("gauge", "1.0.0", "/plugins/a/gauge");
    let b = candidate("gauge", "1.0.0", "/plugins/b/gauge");
    let inputs: HashSet<PathBuf> = bases(&[a.clone(), b.clone()]).into_iter().collect();

    let selected = selector().filter(PluginClass::External, vec![a, b]);
    assert_eq!(selected.len(), 1);
    assert!(inputs.contains(selected[0].base()));
}

#[test]
fn test_grouping_buckets_unparsable_versions_together() {
    let candidates = vec![
        candidate("heatmap", "1.0.0", "/plugins/a/heatmap"),
        candidate("heatmap", "bogus", "/plugins/b/heatmap"),
        candidate("heatmap", "", "/plugins/c/heatmap"),
    ];

    let groups = group_by_id_and_version(&candidates);
    assert_eq!(groups.len(), 1);
    let group = &groups[0];
    assert_eq!(group.id, "heatmap");
    assert_eq!(group.buckets.len(), 2);
    assert_eq!(group.buckets[0].key, VersionKey::Parsed(Version::new(1, 0, 0)));
    assert_eq!(group.buckets[0].members, vec![0]);
    assert_eq!(group.buckets[1].key, VersionKey::Unknown);
    assert_eq!(group.buckets[1].members, vec![1, 2]);
    assert_eq!(group.len(), 3);

    let selected = selector().filter(PluginClass::External, candidates);
    assert_eq!(selected.len(), 1);
    assert_eq!(selected[0].version(), "1.0.0");
}

#[test]
fn test_grouping_normalizes_version_strings() {
    let candidates = vec![
        candidate("text", "1.0", "/plugins/a/text"),
        candidate("text", "v1.0.0", "/plugins/b/text"),
        candidate("graph", "1.0.0", "/plugins/c/graph"),
    ];

    let groups = group_by_id_and_version(&candidates);
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].id, "text");
    assert_eq!(groups[0].buckets.len(), 1);
    assert_eq!(groups[0].buckets[0].key.to_string(), "1.0.0");
    assert_eq!(groups[0].flatten(), vec![0, 1]);
    assert_eq!(groups[1].id, "graph");
}

#[test]
fn test_output_keeps_first_discovery_order_of_ids() {
    let candidates = vec![
        candidate("b-plugin", "1.0.0", "/plugins/one/b"),
        candidate("a-plugin", "1.0.0", "/plugins/one/a"),
        candidate("b-plugin", "2.0.0", "/plugins/two/b"),
        candidate("c-plugin", "1.0.0", "/plugins/one/c"),
    ];

    let selected = selector().filter(PluginClass::External, candidates);
    let ids: Vec<&str> = selected.iter().map(|c| c.id()).collect();
    assert_eq!(ids, vec!["b-plugin", "a-plugin", "c-plugin"]);
    assert_eq!(selected[0].version(), "2.0.0");
}

#[test]
fn test_resolve_carries_winner_forward() {
    let candidates = vec![
        candidate("clock", "1.0.0", "/a/clock/dist"),
        candidate("clock", "2.0.0", "/b/clock"),
        candidate("clock", "3.0.0", "/c/clock"),
    ];
    let (selector, sink) = recording_selector(StaticFeatureToggles::new());

    let winner = selector.resolve(PluginClass::External, &candidates).unwrap();
    assert_eq!(winner.base(), PathBuf::from("/a/clock/dist").as_path());

    let comparisons: Vec<(PathBuf, PathBuf)> = sink
        .events()
        .into_iter()
        .filter_map(|event| match event {
            TraceEvent::Comparing { first, second, .. } => Some((first, second)),
            _ => None,
        })
        .collect();
    assert_eq!(
        comparisons,
        vec![
            (PathBuf::from("/a/clock/dist"), PathBuf::from("/b/clock")),
            (PathBuf::from("/c/clock"), PathBuf::from("/a/clock/dist")),
        ]
    );
}

#[test]
fn test_resolve_drops_earlier_on_tie() {
    let candidates = vec![
        candidate("clock", "bogus", "/a/clock"),
        candidate("clock", "", "/b/clock"),
    ];
    let winner = selector().resolve(PluginClass::External, &candidates).unwrap();
    assert_eq!(winner.base(), PathBuf::from("/b/clock").as_path());
}

#[test]
fn test_resolve_empty_slice() {
    assert!(selector().resolve(PluginClass::External, &[]).is_none());
}

#[test]
fn test_unparsable_versions_are_traced() {
    let (selector, sink) = recording_selector(StaticFeatureToggles::new());

    let ordering = selector.compare(
        PluginClass::External,
        &candidate("x", "bogus", "/a/x"),
        &candidate("x", "", "/b/x"),
    );
    assert_eq!(ordering, Ordering::Equal);

    selector.compare(
        PluginClass::External,
        &candidate("x", "1.0.0", "/a/x"),
        &candidate("x", "nope", "/b/x"),
    );

    assert_eq!(
        sink.take(),
        vec![
            TraceEvent::UnparsableVersions {
                id: "x".to_string(),
                first_version: "bogus".to_string(),
                second_version: String::new(),
            },
            TraceEvent::UnparsableVersion {
                id: "x".to_string(),
                version: "nope".to_string(),
            },
        ]
    );
    assert!(sink.events().is_empty());
}

#[test]
fn test_filter_emits_grouping_and_selection_events() {
    let (selector, sink) = recording_selector(StaticFeatureToggles::new());
    let candidates = vec![
        candidate("news", "1.0.0", "/a/news"),
        candidate("news", "1.1.0", "/b/news"),
    ];

    selector.filter(PluginClass::External, candidates);
    let events = sink.events();

    let grouped = events
        .iter()
        .filter(|e| matches!(e, TraceEvent::Grouped { .. }))
        .count();
    assert_eq!(grouped, 2);
    assert_eq!(
        events.last(),
        Some(&TraceEvent::Selected {
            id: "news".to_string(),
            version: "1.1.0".to_string(),
            base: PathBuf::from("/b/news"),
        })
    );
}

const IDS: [&str; 3] = ["alpha", "beta", "gamma"];
const VERSIONS: [&str; 7] = ["", "bogus", "1.0.0", "1.2.0", "2.0.0-beta.1", "2.0.0", "v2"];

fn candidate_strategy() -> impl Strategy<Value = (usize, usize, bool)> {
    (0..IDS.len(), 0..VERSIONS.len(), any::<bool>())
}

fn build_candidates(layout: &[(usize, usize, bool)]) -> Vec<PluginCandidate> {
    layout
        .iter()
        .enumerate()
        .map(|(index, (id, version, in_dist))| {
            let base = if *in_dist {
                format!("/plugins/{}/{}/dist", index, IDS[*id])
            } else {
                format!("/plugins/{}/{}", index, IDS[*id])
            };
            candidate(IDS[*id], VERSIONS[*version], &base)
        })
        .collect()
}

proptest! {
    #[test]
    fn prop_one_candidate_per_identifier(layout in prop::collection::vec(candidate_strategy(), 0..24)) {
        let candidates = build_candidates(&layout);
        let input_ids: HashSet<String> = candidates.iter().map(|c| c.id().to_string()).collect();
        let input_bases: HashSet<PathBuf> = bases(&candidates).into_iter().collect();

        let selected = selector().filter(PluginClass::External, candidates);

        let output_ids: Vec<String> = selected.iter().map(|c| c.id().to_string()).collect();
        let unique: HashSet<String> = output_ids.iter().cloned().collect();
        prop_assert_eq!(output_ids.len(), unique.len());
        prop_assert_eq!(unique, input_ids);
        for winner in &selected {
            prop_assert!(input_bases.contains(winner.base()));
        }
    }

    #[test]
    fn prop_no_candidate_beats_the_winner(
        layout in prop::collection::vec(candidate_strategy(), 1..24),
        core in any::<bool>(),
        external_core in any::<bool>(),
    ) {
        let class = if core { PluginClass::Core } else { PluginClass::External };
        let toggles = if external_core {
            StaticFeatureToggles::new().with_enabled(FLAG_EXTERNAL_CORE_PLUGINS)
        } else {
            StaticFeatureToggles::new()
        };
        let candidates = build_candidates(&layout);
        let selector = DuplicateSelector::new(Arc::new(toggles));

        let selected = selector.filter(class, candidates.clone());

        for winner in &selected {
            for other in candidates.iter().filter(|c| c.id() == winner.id()) {
                let comparison = compare_candidates(class, external_core, other, winner);
                prop_assert_ne!(comparison.ordering, Ordering::Greater);
            }
        }
    }
}
