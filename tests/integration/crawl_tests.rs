//! Integration tests for the harvester
//!
//! These tests use wiremock to stand in for the catalog API. The mock server
//! also acts as the HTTP proxy: every category is bound to it, so requests
//! arrive in proxy (absolute-URI) form and still hit the mocked endpoint.

use catalog_harvester::catalog::Record;
use catalog_harvester::config::{ApiConfig, Config, InputConfig, OutputConfig};
use catalog_harvester::crawler::{harvest, CatalogQuery, Coordinator, CrawlOutcome, HttpFetcher};
use catalog_harvester::{ConfigError, HarvestError};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CATALOG_PATH: &str = "/front/api/catalog/products";

/// Creates a config whose endpoint lives on the mock server
fn create_test_config(server: &MockServer, dir: &Path, categories: &[&str], proxies: &[&str]) -> Config {
    let categories_path = dir.join("categoryID.txt");
    let proxies_path = dir.join("proxy.txt");
    std::fs::write(&categories_path, categories.join("\n")).unwrap();
    std::fs::write(&proxies_path, proxies.join("\n")).unwrap();

    let mut api = ApiConfig::new(format!("{}{}", server.uri(), CATALOG_PATH));
    api.city_id = "test-city".to_string();
    api.user_agent = "TestBrowser/1.0".to_string();
    api.timeout_secs = 5;
    api.connect_timeout_secs = 2;

    Config {
        api,
        input: InputConfig {
            categories_path: categories_path.display().to_string(),
            proxies_path: proxies_path.display().to_string(),
        },
        output: OutputConfig {
            path: output_path(dir).display().to_string(),
        },
    }
}

fn output_path(dir: &Path) -> PathBuf {
    dir.join("products.jsonl")
}

fn products(items: Vec<Value>) -> Value {
    json!({ "data": { "products": items } })
}

fn product(id: &str) -> Value {
    json!({
        "itemId": id,
        "name": format!("Product {}", id),
        "brand": "Brand",
        "productType": "cream",
        "imageUrls": [{ "url": format!("http://img/{}/${{screen}}.${{format}}", id) }],
        "inStock": false,
        "price": { "actual": { "amount": 250 } }
    })
}

/// Mounts one page of one category
async fn mount_page(server: &MockServer, category: &str, page: u32, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(CATALOG_PATH))
        .and(query_param("categoryId", category))
        .and(query_param("pageNumber", page.to_string()))
        .respond_with(response)
        .mount(server)
        .await;
}

fn read_output(dir: &Path) -> Vec<Value> {
    std::fs::read_to_string(output_path(dir))
        .expect("Output file missing")
        .lines()
        .map(|line| serde_json::from_str(line).expect("Output line is not JSON"))
        .collect()
}

fn ids(lines: &[Value]) -> Vec<&str> {
    lines.iter().map(|l| l["id"].as_str().unwrap()).collect()
}

#[tokio::test]
async fn test_single_category_scenario() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_page(
        &mock_server,
        "A",
        1,
        ResponseTemplate::new(200).set_body_json(products(vec![json!({
            "itemId": "x1",
            "name": "Shoe",
            "inStock": true,
            "price": { "actual": { "amount": 100 } },
            "imageUrls": [{ "url": "http://img/${screen}.${format}" }]
        })])),
    )
    .await;
    mount_page(
        &mock_server,
        "A",
        2,
        ResponseTemplate::new(200).set_body_json(products(vec![])),
    )
    .await;

    let proxy = mock_server.uri();
    let config = create_test_config(&mock_server, dir.path(), &["A"], &[&proxy]);
    let stats = harvest(config).await.expect("Harvest failed");

    assert_eq!(stats.total_records, 1);
    assert_eq!(stats.total_requests, 2);

    let lines = read_output(dir.path());
    assert_eq!(
        lines,
        vec![json!({
            "id": "x1",
            "name": "Shoe",
            "brand": "not specified",
            "type": "not specified",
            "photos": ["http://img/fullhd.jpg"],
            "in_stock": true,
            "price": 100
        })]
    );
}

#[tokio::test]
async fn test_request_shape() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path(CATALOG_PATH))
        .and(query_param("categoryId", "1000000007"))
        .and(query_param("cityId", "test-city"))
        .and(query_param("pageNumber", "1"))
        .and(query_param("z", "16-46"))
        .and(header("user-agent", "TestBrowser/1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(products(vec![])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let proxy = mock_server.uri();
    let config = create_test_config(&mock_server, dir.path(), &["1000000007"], &[&proxy]);
    harvest(config).await.expect("Harvest failed");
}

#[tokio::test]
async fn test_empty_first_page_makes_one_request() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path(CATALOG_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(products(vec![])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let proxy = mock_server.uri();
    let config = create_test_config(&mock_server, dir.path(), &["empty"], &[&proxy]);
    let stats = harvest(config).await.expect("Harvest failed");

    assert_eq!(stats.total_records, 0);
    assert!(read_output(dir.path()).is_empty());
}

#[tokio::test]
async fn test_server_error_ends_category_with_prior_pages() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_page(
        &mock_server,
        "A",
        1,
        ResponseTemplate::new(200).set_body_json(products(vec![product("a1"), product("a2")])),
    )
    .await;
    mount_page(&mock_server, "A", 2, ResponseTemplate::new(500)).await;
    Mock::given(method("GET"))
        .and(query_param("pageNumber", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(products(vec![product("a3")])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let proxy = mock_server.uri();
    let config = create_test_config(&mock_server, dir.path(), &["A"], &[&proxy]);
    harvest(config).await.expect("Harvest failed");

    assert_eq!(ids(&read_output(dir.path())), vec!["a1", "a2"]);
}

#[tokio::test]
async fn test_non_json_body_ends_category() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_page(
        &mock_server,
        "A",
        1,
        ResponseTemplate::new(200).set_body_string("<html>captcha</html>"),
    )
    .await;

    let proxy = mock_server.uri();
    let config = create_test_config(&mock_server, dir.path(), &["A"], &[&proxy]);
    let stats = harvest(config).await.expect("Harvest failed");

    assert_eq!(stats.total_records, 0);
    assert_eq!(stats.categories[0].outcome, "fetch_failed");
}

#[tokio::test]
async fn test_output_follows_category_order_despite_latency() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    mount_page(
        &mock_server,
        "slow",
        1,
        ResponseTemplate::new(200)
            .set_body_json(products(vec![product("s1"), product("s2")]))
            .set_delay(Duration::from_millis(400)),
    )
    .await;
    mount_page(
        &mock_server,
        "fast",
        1,
        ResponseTemplate::new(200).set_body_json(products(vec![product("f1")])),
    )
    .await;
    mount_page(
        &mock_server,
        "medium",
        1,
        ResponseTemplate::new(200)
            .set_body_json(products(vec![product("m1")]))
            .set_delay(Duration::from_millis(150)),
    )
    .await;
    Mock::given(method("GET"))
        .and(query_param("pageNumber", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(products(vec![])))
        .mount(&mock_server)
        .await;

    let proxy = mock_server.uri();
    let config = create_test_config(
        &mock_server,
        dir.path(),
        &["slow", "fast", "medium"],
        &[&proxy, &proxy, &proxy],
    );
    harvest(config).await.expect("Harvest failed");

    assert_eq!(ids(&read_output(dir.path())), vec!["s1", "s2", "f1", "m1"]);
}

#[tokio::test]
async fn test_every_line_matches_record_shape() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    let mut no_price = product("n1");
    no_price["price"] = json!({ "actual": null });

    mount_page(
        &mock_server,
        "A",
        1,
        ResponseTemplate::new(200).set_body_json(products(vec![product("p1"), no_price])),
    )
    .await;
    mount_page(
        &mock_server,
        "A",
        2,
        ResponseTemplate::new(200).set_body_json(products(vec![])),
    )
    .await;

    let proxy = mock_server.uri();
    let config = create_test_config(&mock_server, dir.path(), &["A"], &[&proxy]);
    harvest(config).await.expect("Harvest failed");

    let content = std::fs::read_to_string(output_path(dir.path())).unwrap();
    let records: Vec<Record> = content
        .lines()
        .map(|line| serde_json::from_str(line).expect("Line does not match record shape"))
        .collect();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].photos, vec!["http://img/p1/fullhd.jpg"]);
    assert_eq!(records[0].price.as_ref().and_then(|p| p.as_u64()), Some(250));
    assert_eq!(records[1].price, None);
    assert!(content.lines().nth(1).unwrap().contains("\"price\":null"));
}

#[tokio::test]
async fn test_missing_proxy_makes_no_requests() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(products(vec![product("x")])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let proxy = mock_server.uri();
    let config = create_test_config(&mock_server, dir.path(), &["A", "B"], &[&proxy]);
    let err = harvest(config).await.unwrap_err();

    assert!(matches!(
        err,
        HarvestError::Config(ConfigError::InsufficientProxies {
            categories: 2,
            proxies: 1
        })
    ));
    assert!(!output_path(dir.path()).exists());
}

#[tokio::test]
async fn test_unreachable_proxy_is_end_of_data() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    // Direct requests would succeed; nothing may reach the server without the proxy
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(products(vec![product("x")])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server, dir.path(), &["A"], &["http://127.0.0.1:9"]);
    let query = CatalogQuery::from_api(&config.api);
    let coordinator = Coordinator::new(HttpFetcher::new(config.api), query);

    let results = coordinator
        .run(&["A".to_string()], &["http://127.0.0.1:9".to_string()])
        .await
        .expect("Run failed");

    assert!(results[0].records.is_empty());
    assert_eq!(results[0].pages_requested, 1);
    assert!(matches!(
        results[0].outcome,
        CrawlOutcome::FetchFailed { page: 1, .. }
    ));
}

#[tokio::test]
async fn test_malformed_item_does_not_stop_other_categories() {
    let mock_server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    let mut broken = product("bad");
    broken.as_object_mut().unwrap().remove("inStock");

    mount_page(
        &mock_server,
        "broken",
        1,
        ResponseTemplate::new(200).set_body_json(products(vec![product("k1"), broken])),
    )
    .await;
    mount_page(
        &mock_server,
        "healthy",
        1,
        ResponseTemplate::new(200).set_body_json(products(vec![product("h1")])),
    )
    .await;
    mount_page(
        &mock_server,
        "healthy",
        2,
        ResponseTemplate::new(200).set_body_json(products(vec![])),
    )
    .await;

    let proxy = mock_server.uri();
    let config = create_test_config(
        &mock_server,
        dir.path(),
        &["broken", "healthy"],
        &[&proxy, &proxy],
    );
    let stats = harvest(config).await.expect("Harvest failed");

    assert_eq!(stats.categories[0].outcome, "malformed");
    assert_eq!(stats.categories[1].outcome, "exhausted");
    assert_eq!(ids(&read_output(dir.path())), vec!["k1", "h1"]);
}
