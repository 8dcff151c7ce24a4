use bytes::BytesMut;
use http::{Response, StatusCode};
use tokio_util::codec::Encoder;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;
use varnish_tags::codec::{HeaderEncoder, MultiValueRegistry};
use varnish_tags::config::FixedPageCacheConfig;
use varnish_tags::interceptor::{Interceptor, SplitTagsInterceptor, TagHeaderSplitter};

#[tokio::main]
async fn main() {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::DEBUG).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let splitter = TagHeaderSplitter::new(FixedPageCacheConfig::varnish()).with_threshold(64);

    // serialization side: tell the encoder the tag header folds on the wire
    let mut registry = MultiValueRegistry::new();
    splitter.register_wire_format(&mut registry);

    let interceptor = SplitTagsInterceptor::new(splitter);

    let tags = (0..20).map(|i| format!("catalog_product_{i}")).collect::<Vec<_>>().join(",");
    let mut response = Response::builder()
        .status(StatusCode::OK)
        .header("content-type", "text/html")
        .header("x-magento-tags", tags)
        .body(())
        .unwrap();

    interceptor.on_response(&mut response).await;
    info!(occurrences = response.headers().get_all("x-magento-tags").iter().count(), "after rewrite");

    let mut encoder = HeaderEncoder::new(registry);
    let mut wire = BytesMut::new();
    encoder.encode(response.headers(), &mut wire).unwrap();

    println!("{}", String::from_utf8_lossy(&wire));
}
