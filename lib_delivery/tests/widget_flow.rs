//! End-to-end widget loads through the public API only.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use lib_delivery::render::RenderOptions;
use lib_delivery::{
    CoordinationRegistry, DeliveryError, DeliveryResult, FallbackChain, Item, LoadOutcome, Provider, Region,
    RetryPolicy, Widget,
};

struct Counting {
    name: &'static str,
    answer: Option<Vec<Item>>,
    calls: AtomicUsize,
}

impl Counting {
    fn new(name: &'static str, answer: Option<Vec<Item>>) -> Arc<Self> {
        Arc::new(Self {
            name,
            answer,
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Provider<Item> for Counting {
    fn name(&self) -> &str {
        self.name
    }

    async fn fetch(&self) -> DeliveryResult<Vec<Item>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.answer
            .clone()
            .ok_or_else(|| DeliveryError::provider(self.name, "HTTP 500"))
    }
}

fn sold(id: &str, title: &str, price: &str) -> Item {
    Item::new(id, title)
        .with_price(price, "AED")
        .with_status("sold")
        .with_image(format!("assets/images/{id}.webp"))
}

#[tokio::test(start_paused = true)]
async fn failing_cms_falls_back_and_renders_carousel() {
    let cms = Counting::new("sanity:notable", None);
    let json = Counting::new(
        "static-json",
        Some(vec![
            sold("palm", "Palm Jumeirah Villa", "150,000,000"),
            sold("downtown", "Downtown Dubai Penthouse", "85000000"),
            sold("marina", "Dubai Marina Tower", "65,000,000 AED"),
        ]),
    );
    let constant = Counting::new("constant", Some(vec![sold("x", "Never", "1")]));

    let widget = Widget::NotableTransactions;
    let chain = widget
        .chain()
        .then_with_retry(cms.clone(), RetryPolicy::new(3, Duration::from_secs(1)))
        .then(json.clone())
        .then(constant.clone());
    let loader = widget.loader(chain, RenderOptions::default(), Duration::from_millis(100));

    let registry = CoordinationRegistry::new();
    let region = Region::shared(widget.region_key());
    let outcome = loader.load(&registry, &region).await;

    let carousel = match outcome {
        LoadOutcome::Rendered {
            source_name,
            count,
            carousel: Some(carousel),
        } => {
            assert_eq!(source_name, "static-json");
            assert_eq!(count, 3);
            carousel
        }
        other => panic!("unexpected outcome {other:?}"),
    };
    assert_eq!((cms.calls(), json.calls(), constant.calls()), (3, 1, 0));

    {
        let region = region.lock().unwrap();
        assert!(region.render_state().items().iter().all(|i| i.source == "static-json"));
        let html = region.to_html();
        assert!(html.contains("data-price=\"150,000,000 AED\""));
        assert!(html.contains("data-price=\"85,000,000 AED\""));
        assert!(html.contains("data-price=\"65,000,000 AED\""));
        assert!(region.children()[0].has_class("active"));
    }

    assert_eq!(carousel.previous().await.unwrap(), Some(2));
    assert_eq!(carousel.current_item().await.unwrap().title, "Dubai Marina Tower");
}

#[tokio::test]
async fn second_loader_for_same_region_does_nothing() {
    let registry = CoordinationRegistry::new();
    let region = Region::shared("exclusive-listings");
    let widget = Widget::ExclusiveListings;

    let cms = Counting::new("sanity:curated-exclusive", Some(vec![sold("a", "Bvlgari Lighthouse", "95,000,000")]));
    let legacy = Counting::new("static-json", Some(vec![sold("b", "Legacy", "1")]));

    let primary = widget.loader(widget.chain().then(cms.clone()), RenderOptions::default(), Duration::ZERO);
    let secondary = widget.loader(widget.chain().then(legacy.clone()), RenderOptions::default(), Duration::ZERO);

    assert!(primary.load(&registry, &region).await.did_render());
    let html_after_primary = region.lock().unwrap().to_html();

    assert!(matches!(secondary.load(&registry, &region).await, LoadOutcome::Skipped));
    assert_eq!(legacy.calls(), 0);
    assert_eq!(region.lock().unwrap().to_html(), html_after_primary);
    assert_eq!(region.lock().unwrap().generation(), 1);
}

#[tokio::test]
async fn everything_down_shows_placeholder() {
    let registry = CoordinationRegistry::new();
    let region = Region::shared("testimonials");
    let widget = Widget::Testimonials;
    let chain: FallbackChain<Item> = widget
        .chain()
        .then(Counting::new("sanity:testimonials", None))
        .then(Counting::new("constant", Some(Vec::new())));

    let outcome = widget
        .loader(chain, RenderOptions::default(), Duration::ZERO)
        .load(&registry, &region)
        .await;

    assert!(matches!(outcome, LoadOutcome::Placeholder));
    let region = region.lock().unwrap();
    assert!(region.is_placeholder());
    assert_eq!(region.to_html(), "<div class=\"no-results\"><p>No properties available at the moment.</p></div>");
}

#[tokio::test]
async fn racing_loaders_render_region_once() {
    let registry = CoordinationRegistry::new();
    let region = Region::shared("exclusive-listings");
    let widget = Widget::ExclusiveListings;

    let providers: Vec<_> = (0..5)
        .map(|_| Counting::new("sanity:curated-exclusive", Some(vec![sold("a", "Bvlgari Lighthouse", "95,000,000")])))
        .collect();
    let loaders: Vec<_> = providers
        .iter()
        .map(|p| widget.loader(widget.chain().then(p.clone()), RenderOptions::default(), Duration::ZERO))
        .collect();

    let outcomes = futures_util::future::join_all(loaders.iter().map(|l| l.load(&registry, &region))).await;

    assert_eq!(outcomes.iter().filter(|o| o.did_render()).count(), 1);
    assert_eq!(providers.iter().map(|p| p.calls()).sum::<usize>(), 1);
    assert_eq!(region.lock().unwrap().generation(), 1);
}
