use std::sync::Arc;

use honestreviews_analysis::testing::{comment, post, verdict_json, MockDiscussionSource, MockVerdictModel};
use honestreviews_analysis::{analyzer, build_queries, AnalysisRequest};
use honestreviews_common::{AnalysisError, Category, Provider};

/// Two qualifying posts under the first query, each with one usable comment.
fn two_post_source(product: &str) -> MockDiscussionSource {
    let q = build_queries(product);
    MockDiscussionSource::new()
        .with_empty_searches(product)
        .on_search(&q[0], vec![post("one", "headphones", 14), post("two", "audiophile", 6)])
        .on_comments(
            "/r/headphones/comments/one/thread/",
            vec![comment("Noise cancelling is class leading, comfort is fine.")],
        )
        .on_comments(
            "/r/audiophile/comments/two/thread/",
            vec![comment("The hinge cracked after eight months of daily use.")],
        )
}

#[tokio::test]
async fn successful_analysis_returns_verdict_and_sources() {
    let source = Arc::new(two_post_source("Sony WH-1000XM5"));
    let model = Arc::new(MockVerdictModel::valid());
    let analyzer = analyzer(source, model.clone());

    let report = analyzer
        .analyze(AnalysisRequest::new("  Sony WH-1000XM5 ").with_category("Technology & Electronics"))
        .await
        .unwrap();

    assert_eq!(report.product, "Sony WH-1000XM5");
    assert_eq!(report.category, Some(Category::Technology));
    assert_eq!(report.sources.len(), 2);
    assert_eq!(report.sources[0].subreddit, "headphones");
    assert_eq!(report.analysis.sentiment_score, 74);
    assert!((0..=100).contains(&report.analysis.sentiment_score));
    assert!(!report.analysis.conclusion.is_empty());

    let prompts = model.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("Reviews:\n### Post from r/headphones"));
    assert!(prompts[0].contains("Comment: The hinge cracked"));
}

#[tokio::test]
async fn report_serializes_in_response_shape() {
    let analyzer = analyzer(
        Arc::new(two_post_source("Kindle")),
        Arc::new(MockVerdictModel::valid()),
    );

    let report = analyzer.analyze(AnalysisRequest::new("Kindle")).await.unwrap();
    let value = serde_json::to_value(&report).unwrap();

    assert_eq!(value["product"], "Kindle");
    assert!(value.get("category").is_none());
    assert_eq!(value["analysis"], verdict_json());
    assert_eq!(value["sources"][1]["url"], "https://reddit.com/r/audiophile/comments/two/thread/");
}

#[tokio::test]
async fn blank_product_name_is_rejected_without_upstream_calls() {
    let source = Arc::new(MockDiscussionSource::new());
    let model = Arc::new(MockVerdictModel::valid());
    let analyzer = analyzer(source.clone(), model.clone());

    for request in [
        AnalysisRequest::default(),
        AnalysisRequest::new(""),
        AnalysisRequest::new("   "),
    ] {
        let err = analyzer.analyze(request).await.unwrap_err();
        assert!(matches!(err, AnalysisError::MissingProductName));
        assert_eq!(err.public_detail(), "Product name is required");
    }
    assert!(source.searches_made().is_empty());
    assert!(model.prompts().is_empty());
}

#[tokio::test]
async fn unknown_category_is_ignored() {
    let analyzer = analyzer(
        Arc::new(two_post_source("Kindle")),
        Arc::new(MockVerdictModel::valid()),
    );

    let report = analyzer
        .analyze(AnalysisRequest::new("Kindle").with_category("Electronics"))
        .await
        .unwrap();

    assert_eq!(report.product, "Kindle");
    assert_eq!(report.category, None);
    assert_eq!(report.sources.len(), 2);
}

#[tokio::test]
async fn no_discussions_skips_the_model() {
    let model = Arc::new(MockVerdictModel::valid());
    let analyzer = analyzer(
        Arc::new(MockDiscussionSource::new().with_empty_searches("Zune")),
        model.clone(),
    );

    let err = analyzer.analyze(AnalysisRequest::new("Zune")).await.unwrap_err();

    assert_eq!(
        err.public_detail(),
        "No Reddit discussions found for 'Zune'. Try a more specific name."
    );
    assert!(model.prompts().is_empty());
}

#[tokio::test]
async fn missing_model_key_fails_after_collection() {
    let source = Arc::new(two_post_source("Kindle"));
    let analyzer = analyzer(source.clone(), Arc::new(MockVerdictModel::missing_key()));

    let err = analyzer.analyze(AnalysisRequest::new("Kindle")).await.unwrap_err();

    assert!(matches!(err, AnalysisError::Configuration(Provider::Gemini)));
    assert_eq!(err.status_code(), 500);
    assert!(err.public_detail().starts_with("AI analysis failed"));
    assert!(!source.searches_made().is_empty());
}

#[tokio::test]
async fn prose_wrapped_json_is_recovered() {
    let reply = format!(
        "Sure! Here is the analysis you asked for:\n{}\nLet me know if you need more.",
        verdict_json()
    );
    let analyzer = analyzer(
        Arc::new(two_post_source("Kindle")),
        Arc::new(MockVerdictModel::replying(reply)),
    );

    let report = analyzer.analyze(AnalysisRequest::new("Kindle")).await.unwrap();

    assert_eq!(report.analysis.pros.len(), 3);
}

#[tokio::test]
async fn unparseable_reply_is_a_parse_failure() {
    let analyzer = analyzer(
        Arc::new(two_post_source("Kindle")),
        Arc::new(MockVerdictModel::replying("I'd rather not say.")),
    );

    let err = analyzer.analyze(AnalysisRequest::new("Kindle")).await.unwrap_err();

    assert!(matches!(err, AnalysisError::ResponseParse(_)));
    assert_eq!(err.public_detail(), "Failed to parse AI response");
}

#[tokio::test]
async fn malformed_verdict_fails_validation() {
    let mut bad = verdict_json();
    bad["sentiment_score"] = serde_json::json!(250);
    let analyzer = analyzer(
        Arc::new(two_post_source("Kindle")),
        Arc::new(MockVerdictModel::replying(bad.to_string())),
    );

    let err = analyzer.analyze(AnalysisRequest::new("Kindle")).await.unwrap_err();

    assert!(matches!(err, AnalysisError::Validation(_)));
}

#[tokio::test]
async fn empty_and_failing_model_replies() {
    let empty = analyzer(Arc::new(two_post_source("Kindle")), Arc::new(MockVerdictModel::empty()));
    let err = empty.analyze(AnalysisRequest::new("Kindle")).await.unwrap_err();
    assert_eq!(err.public_detail(), "Empty response from AI");

    let failing = analyzer(Arc::new(two_post_source("Kindle")), Arc::new(MockVerdictModel::failing(503)));
    let err = failing.analyze(AnalysisRequest::new("Kindle")).await.unwrap_err();
    assert!(matches!(err, AnalysisError::Upstream { provider: Provider::Gemini, .. }));
    assert_eq!(err.public_detail(), "AI analysis failed");
}

#[tokio::test]
async fn prompt_carries_at_most_thirty_thousand_characters_of_reviews() {
    let product = "Pixel 8";
    let q = build_queries(product);
    let long_post = |id: &str| {
        let mut p = post(id, "GooglePixel", 99);
        p.selftext = "b".repeat(9000);
        p
    };
    let comments: Vec<_> = (0..15).map(|i| comment(&format!("{i:02}{}", "c".repeat(3000)))).collect();
    let source = MockDiscussionSource::new()
        .with_empty_searches(product)
        .on_search(&q[0], vec![long_post("first"), long_post("second")])
        .on_comments("/r/GooglePixel/comments/first/thread/", comments.clone())
        .on_comments("/r/GooglePixel/comments/second/thread/", comments);
    let model = Arc::new(MockVerdictModel::valid());
    let analyzer = analyzer(Arc::new(source), model.clone());

    analyzer.analyze(AnalysisRequest::new(product)).await.unwrap();

    let prompt = &model.prompts()[0];
    let reviews = prompt.split("Reviews:\n").nth(1).unwrap();
    assert_eq!(reviews.chars().count(), 30_000);
    assert!(!reviews.contains(&"b".repeat(2001)));
    assert!(!reviews.contains(&"c".repeat(1499)));
}
