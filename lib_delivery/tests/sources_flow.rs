//! Default widget chains wired to real file-backed providers.
#![cfg(feature = "sources")]

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use lib_delivery::delivery::Provider;
use lib_delivery::render::{apply_type_filter, property_types, RenderOptions};
use lib_delivery::sources::{
    community_chain, community_loader, widget_chain, ChainSources, Community, ConstantProvider, StaticJsonProvider,
    StaticSource,
};
use lib_delivery::{CoordinationRegistry, DeliveryError, DeliveryResult, Item, LoadOutcome, Region, RetryPolicy, Widget};

struct DownCms;

#[async_trait::async_trait]
impl Provider<Item> for DownCms {
    fn name(&self) -> &str {
        "sanity:notable"
    }

    async fn fetch(&self) -> DeliveryResult<Vec<Item>> {
        Err(DeliveryError::provider("sanity:notable", "HTTP 503"))
    }
}

fn properties_file() -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    let body = serde_json::json!({
        "notableTransactions": [
            { "id": "n1", "name": "Atlantis The Royal Penthouse", "price": "120,000,000", "currency": "AED", "status": "Sold", "images": { "main": "n1.webp" } },
            { "id": "n2", "name": "Jumeirah Bay Villa", "price": "98,000,000", "currency": "AED", "status": "Sold", "images": { "main": "n2.webp" } },
            { "id": "n3", "name": "One Za'abeel Residence", "price": 72000000, "currency": "AED", "status": "Sold", "images": { "main": "n3.webp" } }
        ],
        "communities": {
            "valley": [
                { "id": "v1", "name": "Eden Townhouse", "price": "2,100,000", "propertyType": "Townhouse", "status": "for-sale", "images": { "main": "v1.webp" } },
                { "id": "v2", "name": "Farm Gardens Villa", "price": "4,800,000", "propertyType": "Villa", "status": "for-sale", "images": { "main": "v2.webp" } }
            ]
        }
    });
    write!(file, "{}", body).unwrap();
    file
}

#[tokio::test(start_paused = true)]
async fn static_json_answers_when_cms_is_down() {
    let file = properties_file();
    let chain = Widget::NotableTransactions
        .chain()
        .then_with_retry(Arc::new(DownCms), RetryPolicy::new(2, Duration::from_millis(500)))
        .then(Arc::new(
            StaticJsonProvider::new(
                StaticSource::File(file.path().to_path_buf()),
                "notableTransactions",
                Duration::from_secs(1),
            )
            .unwrap(),
        ))
        .then(Arc::new(ConstantProvider::for_widget(Widget::NotableTransactions)));

    let resolved = chain.resolve().await.unwrap();
    assert_eq!(resolved.source_name, "static-json");
    assert_eq!(resolved.items.len(), 3);
    assert!(resolved.items.iter().all(|i| i.source == "static-json"));
}

#[tokio::test]
async fn offline_default_chain_renders_constants() {
    let sources = ChainSources {
        static_data: Some(StaticSource::File("/nonexistent/properties.json".into())),
        retry: RetryPolicy::once(),
        timeout: Duration::from_secs(1),
        ..Default::default()
    };
    let widget = Widget::ExclusiveListings;
    let loader = widget.loader(
        widget_chain(widget, &sources).unwrap(),
        RenderOptions::default(),
        Duration::ZERO,
    );
    let region = Region::shared(widget.region_key());

    match loader.load(&CoordinationRegistry::new(), &region).await {
        LoadOutcome::Rendered { source_name, count, .. } => {
            assert_eq!(source_name, "constant");
            assert_eq!(count, 2);
        }
        other => panic!("unexpected outcome {other:?}"),
    }
    let html = region.lock().unwrap().to_html();
    assert!(html.contains("Burj Khalifa Penthouse"));
    assert!(html.contains("125,000,000 AED"));
}

#[tokio::test]
async fn community_grid_reads_static_file_and_filters_by_type() {
    let file = properties_file();
    let sources = ChainSources {
        static_data: Some(StaticSource::File(file.path().to_path_buf())),
        retry: RetryPolicy::once(),
        timeout: Duration::from_secs(1),
        ..Default::default()
    };
    let valley = Community::new("valley", "The Valley");
    let loader = community_loader(&valley, community_chain(&valley, &sources).unwrap(), RenderOptions::default());
    let region = Region::shared(valley.region_key());

    match loader.load(&CoordinationRegistry::new(), &region).await {
        LoadOutcome::Rendered { source_name, count, carousel } => {
            assert_eq!(source_name, "static-json");
            assert_eq!(count, 2);
            assert!(carousel.is_none());
        }
        other => panic!("unexpected outcome {other:?}"),
    }

    let mut region = region.lock().unwrap();
    assert_eq!(property_types(region.render_state().items()), ["townhouse", "villa"]);
    assert_eq!(apply_type_filter(&mut region, "villa"), 1);
    assert!(region.children()[0].has_class("hidden"));
}

#[tokio::test]
async fn unknown_community_shows_placeholder() {
    let file = properties_file();
    let sources = ChainSources {
        static_data: Some(StaticSource::File(file.path().to_path_buf())),
        ..Default::default()
    };
    let polo = Community::new("grandpolo", "Grand Polo Club");
    let loader = community_loader(&polo, community_chain(&polo, &sources).unwrap(), RenderOptions::default());
    let region = Region::shared(polo.region_key());

    assert!(matches!(
        loader.load(&CoordinationRegistry::new(), &region).await,
        LoadOutcome::Placeholder
    ));
}

#[tokio::test]
async fn offline_projects_grid_uses_typed_constants() {
    let widget = Widget::Projects;
    let loader = widget.loader(
        widget_chain(widget, &ChainSources::default()).unwrap(),
        RenderOptions::default(),
        Duration::ZERO,
    );
    let region = Region::shared(widget.region_key());
    assert!(loader.load(&CoordinationRegistry::new(), &region).await.did_render());

    let mut region = region.lock().unwrap();
    assert_eq!(property_types(region.render_state().items()), ["villa", "penthouse", "apartment"]);
    assert_eq!(apply_type_filter(&mut region, "Penthouse"), 1);
}
