use std::sync::Arc;

use product_images::{FanOut, ImportError, Pipeline, PipelineConfig};
use product_images_http::{HttpCatalog, HttpCatalogConfig, HttpImageFetcher};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn pipeline_for(server: &MockServer, output: &std::path::Path) -> Pipeline {
    let client = reqwest::Client::new();
    let catalog = HttpCatalog::with_client(
        HttpCatalogConfig {
            url_template: format!("{}/xml/{{identifier}}", server.uri()),
            user_agent: None,
        },
        client.clone(),
    );
    let fetcher = HttpImageFetcher::with_client(client, None);

    Pipeline::new(
        Arc::new(catalog),
        Arc::new(fetcher),
        PipelineConfig {
            output_dir: output.to_path_buf(),
            fan_out: FanOut::Unbounded,
        },
    )
}

async fn mount_document(server: &MockServer, product: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(format!("/xml/{product}")))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_image(server: &MockServer, image_path: &str, bytes: &[u8]) {
    Mock::given(method("GET"))
        .and(path(image_path))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(bytes.to_vec()))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn two_products_one_image_and_one_empty() {
    let server = MockServer::start().await;
    let work = tempfile::tempdir().unwrap();
    let output = work.path().join("product-images");

    mount_document(
        &server,
        "P1",
        format!(
            r#"<images><image name="front" url="{}/a.jpg"/></images>"#,
            server.uri()
        ),
    )
    .await;
    mount_document(&server, "P2", "<images></images>".to_owned()).await;
    mount_image(&server, "/a.jpg", b"jpeg bytes of a").await;

    let input = work.path().join("products.txt");
    std::fs::write(&input, "P1\nP2\n").unwrap();

    let summary = pipeline_for(&server, &output).run(&input).await.unwrap();

    assert_eq!(summary.products, 2);
    assert_eq!(
        std::fs::read(output.join("P1/00-front")).unwrap(),
        b"jpeg bytes of a"
    );
    let p2_files = match std::fs::read_dir(output.join("P2")) {
        Ok(entries) => entries.count(),
        Err(_) => 0,
    };
    assert_eq!(p2_files, 0);
}

#[tokio::test]
async fn catalog_failure_stops_later_lookups() {
    let server = MockServer::start().await;
    let work = tempfile::tempdir().unwrap();
    let output = work.path().join("product-images");

    mount_document(&server, "P1", "<images/>".to_owned()).await;

    Mock::given(method("GET"))
        .and(path("/xml/P2"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/xml/P3"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<images/>"))
        .expect(0)
        .mount(&server)
        .await;

    let input = work.path().join("products.txt");
    std::fs::write(&input, "P1\nP2\nP3\n").unwrap();

    let result = pipeline_for(&server, &output).run(&input).await;

    assert!(matches!(result, Err(ImportError::Network(_))));
}

#[tokio::test]
async fn image_failure_fails_the_run() {
    let server = MockServer::start().await;
    let work = tempfile::tempdir().unwrap();
    let output = work.path().join("product-images");

    mount_document(
        &server,
        "P1",
        format!(
            r#"<images><image name="a.jpg" url="{0}/a.jpg"/><image name="b.jpg" url="{0}/b.jpg"/></images>"#,
            server.uri()
        ),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/a.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"a".to_vec()))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/b.jpg"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/xml/P2"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<images/>"))
        .expect(0)
        .mount(&server)
        .await;

    let input = work.path().join("products.txt");
    std::fs::write(&input, "P1\nP2").unwrap();

    let result = pipeline_for(&server, &output).run(&input).await;

    assert!(matches!(result, Err(ImportError::Network(_))));
}

#[tokio::test]
async fn unparseable_catalog_body_fails_the_run() {
    let server = MockServer::start().await;
    let work = tempfile::tempdir().unwrap();
    let output = work.path().join("product-images");

    mount_document(&server, "P1", "<images><image".to_owned()).await;

    let input = work.path().join("products.txt");
    std::fs::write(&input, "P1\n").unwrap();

    let result = pipeline_for(&server, &output).run(&input).await;

    assert!(matches!(result, Err(ImportError::Parse { .. })));
}
