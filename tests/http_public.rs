mod support;

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use tintero::domain::blocks::{Annotations, Block, RichTextSegment};
use tower::ServiceExt;

use support::{FakeContentApi, FakeDocumentStore, app, body_to_string, paragraph, summary};

fn blog() -> FakeContentApi {
    FakeContentApi::default()
        .with_article(
            summary("page-1", "Hello World"),
            vec![
                Block::Heading {
                    level: tintero::domain::blocks::HeadingLevel::Two,
                    rich_text: vec![RichTextSegment::plain("Intro")],
                },
                Block::Paragraph {
                    rich_text: vec![
                        RichTextSegment::plain("Bold move").with_annotations(Annotations {
                            bold: true,
                            ..Annotations::default()
                        }),
                    ],
                },
            ],
        )
        .with_article(summary("page-2", "Second Post"), vec![paragraph("Later")])
        .with_comment("page-1", Some("Grace"), "Great read")
        .with_comment("page-1", None, "<script>alert(1)</script>")
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

fn comment_form(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .expect("request")
}

#[tokio::test]
async fn index_lists_articles_with_slug_links() {
    let app = app(Arc::new(blog()), Arc::new(FakeDocumentStore::default()));

    let response = app.oneshot(get("/")).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_to_string(response.into_body()).await;
    assert!(html.contains(r#"href="/posts/hello-world""#));
    assert!(html.contains(r#"href="/posts/second-post""#));
    assert!(html.contains("Second Post"));
    assert!(html.contains(r#"<link rel="canonical" href="https://blog.example.com/""#));
}

#[tokio::test]
async fn empty_listing_shows_placeholder() {
    let app = app(
        Arc::new(FakeContentApi::default()),
        Arc::new(FakeDocumentStore::default()),
    );

    let response = app.oneshot(get("/")).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_to_string(response.into_body()).await;
    assert!(html.contains("No articles yet."));
}

#[tokio::test]
async fn failing_listing_renders_bad_gateway_page() {
    let api = FakeContentApi {
        fail_listing: true,
        ..FakeContentApi::default()
    };
    let app = app(Arc::new(api), Arc::new(FakeDocumentStore::default()));

    let response = app.oneshot(get("/")).await.expect("response");
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let html = body_to_string(response.into_body()).await;
    assert!(html.contains("Content service failed"));
}

#[tokio::test]
async fn article_page_renders_blocks_and_comments() {
    let app = app(Arc::new(blog()), Arc::new(FakeDocumentStore::default()));

    let response = app
        .oneshot(get("/posts/hello-world"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_to_string(response.into_body()).await;
    assert!(html.contains("<title>Hello World · Tintero</title>"));
    assert!(html.contains(r#"<h2 class="nb-heading">Intro</h2>"#));
    assert!(html.contains(r#"<p class="nb-paragraph"><strong>Bold move</strong></p>"#));
    assert!(html.contains("Comments (2)"));
    assert!(html.contains("<strong>Grace</strong>"));
    assert!(html.contains("<strong>Anonymous</strong>"));
    assert!(html.contains("05/03/2024 08:07"));
    assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    assert!(!html.contains("<script>alert(1)</script>"));
    assert!(html.contains(r#"action="/posts/hello-world/comments""#));
}

#[tokio::test]
async fn article_blocks_are_fetched_when_not_inline() {
    let mut api = blog();
    api.blocks_only.push("page-2".to_string());
    let app = app(Arc::new(api), Arc::new(FakeDocumentStore::default()));

    let response = app
        .oneshot(get("/posts/second-post"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_to_string(response.into_body()).await;
    assert!(html.contains(r#"<p class="nb-paragraph">Later</p>"#));
    assert!(html.contains("Comments (0)"));
}

#[tokio::test]
async fn comment_failures_do_not_break_the_article() {
    let mut api = blog();
    api.fail_comments = true;
    let app = app(Arc::new(api), Arc::new(FakeDocumentStore::default()));

    let response = app
        .oneshot(get("/posts/hello-world"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_to_string(response.into_body()).await;
    assert!(html.contains("Comments (0)"));
}

#[tokio::test]
async fn unknown_slug_renders_not_found_page() {
    let app = app(Arc::new(blog()), Arc::new(FakeDocumentStore::default()));

    let response = app
        .oneshot(get("/posts/does-not-exist"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let html = body_to_string(response.into_body()).await;
    assert!(html.contains("Page Not Found"));
}

#[tokio::test]
async fn posting_a_comment_redirects_back_to_the_article() {
    let api = Arc::new(blog());
    let app = app(api.clone(), Arc::new(FakeDocumentStore::default()));

    let response = app
        .oneshot(comment_form(
            "/posts/hello-world/comments",
            "comment=Thanks+for+writing",
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response
            .headers()
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok()),
        Some("/posts/hello-world")
    );
    assert_eq!(
        api.posted(),
        vec![("page-1".to_string(), "Thanks for writing".to_string())]
    );
}

#[tokio::test]
async fn blank_comment_is_rejected() {
    let api = Arc::new(blog());
    let app = app(api.clone(), Arc::new(FakeDocumentStore::default()));

    let response = app
        .oneshot(comment_form("/posts/hello-world/comments", "comment=+++"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(api.posted().is_empty());
}

#[tokio::test]
async fn comment_on_unknown_slug_is_not_found() {
    let api = Arc::new(blog());
    let app = app(api.clone(), Arc::new(FakeDocumentStore::default()));

    let response = app
        .oneshot(comment_form("/posts/missing/comments", "comment=hi"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(api.posted().is_empty());
}

#[tokio::test]
async fn db_health_reflects_store_availability() {
    let healthy = app(
        Arc::new(FakeContentApi::default()),
        Arc::new(FakeDocumentStore::default()),
    );
    let response = healthy.oneshot(get("/_health/db")).await.expect("response");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let down = app(
        Arc::new(FakeContentApi::default()),
        Arc::new(FakeDocumentStore::unavailable()),
    );
    let response = down.oneshot(get("/_health/db")).await.expect("response");
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn stylesheet_is_served_from_static() {
    let app = app(
        Arc::new(FakeContentApi::default()),
        Arc::new(FakeDocumentStore::default()),
    );

    let response = app
        .clone()
        .oneshot(get("/static/site.css"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok()),
        Some("text/css")
    );

    let response = app
        .oneshot(get("/static/missing.css"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_routes_fall_back_to_not_found_page() {
    let app = app(
        Arc::new(FakeContentApi::default()),
        Arc::new(FakeDocumentStore::default()),
    );

    let response = app.oneshot(get("/nowhere")).await.expect("response");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let html = body_to_string(response.into_body()).await;
    assert!(html.contains("Back to home"));
}

#[tokio::test]
async fn responses_carry_a_request_id() {
    let app = app(
        Arc::new(FakeContentApi::default()),
        Arc::new(FakeDocumentStore::default()),
    );

    let response = app.clone().oneshot(get("/")).await.expect("response");
    let minted = response
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .expect("request id header");
    assert_eq!(minted.len(), 36);

    let forwarded = Request::builder()
        .uri("/nowhere")
        .header("x-request-id", "edge-7")
        .body(Body::empty())
        .expect("request");
    let response = app.oneshot(forwarded).await.expect("response");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        response
            .headers()
            .get("x-request-id")
            .and_then(|value| value.to_str().ok()),
        Some("edge-7")
    );
}
