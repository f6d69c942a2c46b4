#![cfg(test)]

use std::sync::Arc;

use crate::kernel::error::Result as KernelResult;
use crate::plugin_system::class::PluginClass;
use crate::plugin_system::diagnostics::{MemorySink, TraceEvent};
use crate::plugin_system::dupe::DuplicateSelector;
use crate::plugin_system::features::StaticFeatureToggles;
use crate::plugin_system::finder::PluginFinder;
use crate::storage::config::FinderConfig;

use super::common::PluginTree;

#[tokio::test]
async fn test_bundled_dist_wins_over_external_install() -> KernelResult<()> {
    let tree = PluginTree::new();
    let dist = tree.plugin("public/app/plugins/panel/clock/dist", "clock", "1.0.0");
    tree.plugin("data/plugins/clock", "clock", "2.5.0");
    let piechart = tree.plugin("data/plugins/piechart", "piechart", "1.6.0");

    let roots = vec![tree.path().join("public"), tree.path().join("data")];
    let report = PluginFinder::new(FinderConfig::default().finder_options(roots)).find().await?;
    assert_eq!(report.candidates.len(), 3);

    let selector = DuplicateSelector::new(Arc::new(StaticFeatureToggles::new()));
    let selected = selector.filter(PluginClass::External, report.candidates);

    assert_eq!(selected.len(), 2);
    assert_eq!(selected[0].id(), "clock");
    assert_eq!(selected[0].base(), dist.as_path());
    assert_eq!(selected[1].id(), "piechart");
    assert_eq!(selected[1].base(), piechart.as_path());
    Ok(())
}

#[tokio::test]
async fn test_config_driven_core_selection() -> KernelResult<()> {
    let tree = PluginTree::new();
    let dist = tree.plugin("core/table/dist", "table", "0.0.1");
    tree.plugin("external/table", "table", "9.9.9");
    tree.plugin("external/news", "news", "");
    let newest_news = tree.plugin("external/news-v2", "news", "v2.1");
    let config_path = tree.file(
        "plugfind.json",
        &format!(
            r#"{{ "plugin_roots": [{:?}, {:?}], "class": "core", "feature_toggles": {{ "externalCorePlugins": false }} }}"#,
            tree.path().join("core"),
            tree.path().join("external"),
        ),
    );

    let config = FinderConfig::load(&config_path)?;
    let report = PluginFinder::new(config.finder_options(Vec::new())).find().await?;

    let sink = Arc::new(MemorySink::new());
    let selector = DuplicateSelector::new(Arc::new(config.feature_toggles())).with_sink(sink.clone());
    let selected = selector.filter(config.class.unwrap_or_default(), report.candidates);

    let table = selected.iter().find(|c| c.id() == "table").expect("table selected");
    assert_eq!(table.base(), dist.as_path());
    let news = selected.iter().find(|c| c.id() == "news").expect("news selected");
    assert_eq!(news.base(), newest_news.as_path());

    let unparsable: Vec<TraceEvent> = sink
        .events()
        .into_iter()
        .filter(|e| matches!(e, TraceEvent::UnparsableVersion { .. }))
        .collect();
    assert_eq!(
        unparsable,
        vec![TraceEvent::UnparsableVersion {
            id: "news".to_string(),
            version: String::new(),
        }]
    );
    Ok(())
}

#[tokio::test]
async fn test_broken_manifest_does_not_hide_duplicates() -> KernelResult<()> {
    let tree = PluginTree::new();
    tree.file("plugins/broken/plugin.json", "{ this is not json");
    tree.plugin("plugins/gauge-a", "gauge", "1.0.0");
    let newer = tree.plugin("plugins/gauge-b", "gauge", "1.0.1");

    let report = PluginFinder::new(FinderConfig::default().finder_options(vec![tree.path().join("plugins")]))
        .find()
        .await?;
    assert_eq!(report.skipped.len(), 1);

    let selector = DuplicateSelector::new(Arc::new(StaticFeatureToggles::new()));
    let selected = selector.filter(PluginClass::Bundled, report.candidates);
    assert_eq!(selected.len(), 1);
    assert_eq!(selected[0].base(), newer.as_path());
    Ok(())
}
