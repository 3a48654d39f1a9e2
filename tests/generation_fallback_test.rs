mod common;

use std::collections::HashSet;
use std::sync::atomic::Ordering;

use common::{remote_story, test_app, Failure};
use storycanvas::entities::{ScenarioType, StoryStatus, UserStory, Wireframe};
use storycanvas::generation::GenerationSource;
use storycanvas::sync::CancelToken;

#[tokio::test]
async fn template_fallback_generates_ecommerce_stories_offline() {
    let app = test_app();
    let project = app
        .ctx
        .create_project("Handmade Market", "ecommerce", "Sell handmade goods")
        .unwrap();
    app.gateway.fail_everything();

    let outcome = app
        .ctx
        .generate_user_stories(&project.id, &CancelToken::new())
        .await
        .unwrap();

    assert_eq!(outcome.source, GenerationSource::TemplateFallback);
    assert_eq!(outcome.created_count, 15);
    assert_eq!(outcome.local_count, 15);

    let stories = app.ctx.store().list_by_project::<UserStory>(&project.id);
    let count_for = |role: &str| stories.iter().filter(|s| s.role == role).count();
    assert_eq!(count_for("customer"), 3);
    assert_eq!(count_for("seller"), 4);
    assert_eq!(count_for("admin"), 5);
    assert_eq!(count_for("shipper"), 3);
    for story in &stories {
        assert!(!story.generated_by_llm);
        assert_eq!(story.status, StoryStatus::Draft);
    }
}

#[tokio::test]
async fn regeneration_appends_and_never_duplicates_ids() {
    let app = test_app();
    let project = app
        .ctx
        .create_project("Handmade Market", "ecommerce", "Sell handmade goods")
        .unwrap();
    app.gateway.fail_everything();

    let first = app
        .ctx
        .generate_user_stories(&project.id, &CancelToken::new())
        .await
        .unwrap();
    let second = app
        .ctx
        .generate_user_stories(&project.id, &CancelToken::new())
        .await
        .unwrap();

    let stories = app.ctx.store().list_by_project::<UserStory>(&project.id);
    assert!(second.local_count >= first.local_count);

    let ids: HashSet<&str> = stories.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids.len(), stories.len(), "no duplicate ids");
}

#[tokio::test]
async fn regeneration_skips_ids_already_persisted() {
    let app = test_app();
    let project = app
        .ctx
        .create_project("Handmade Market", "ecommerce", "Sell handmade goods")
        .unwrap();
    app.ctx.sign_in("token-1", None).unwrap();
    app.gateway.set_generated_stories(vec![
        remote_story(&project.id, "us-1", "first"),
        remote_story(&project.id, "us-2", "second"),
    ]);

    let first = app
        .ctx
        .generate_user_stories(&project.id, &CancelToken::new())
        .await
        .unwrap();
    assert_eq!(first.source, GenerationSource::DatabaseGenerated);
    assert_eq!(first.created_count, 2);

    // user approves a story, then clicks Regenerate
    app.ctx
        .store()
        .update::<UserStory, _>("us-1", |s| s.status = StoryStatus::Approved)
        .unwrap();

    let second = app
        .ctx
        .generate_user_stories(&project.id, &CancelToken::new())
        .await
        .unwrap();
    assert_eq!(second.created_count, 0);
    assert_eq!(second.skipped_count, 2);

    // the approval survived
    let stored: UserStory = app.ctx.store().get("us-1").unwrap();
    assert_eq!(stored.status, StoryStatus::Approved);
}

#[tokio::test]
async fn anonymous_tier_is_used_when_unauthenticated() {
    let app = test_app();
    let project = app
        .ctx
        .create_project("Handmade Market", "ecommerce", "Sell handmade goods")
        .unwrap();
    app.gateway
        .set_anonymous_stories(vec![remote_story(&project.id, "us-anon", "from local api")]);

    let outcome = app
        .ctx
        .generate_user_stories(&project.id, &CancelToken::new())
        .await
        .unwrap();

    assert_eq!(outcome.source, GenerationSource::LocalApiGenerated);
    assert_eq!(outcome.created_count, 1);
    // tier 1 was never attempted without a token
    assert_eq!(app.gateway.generate_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn authenticated_tier_wins_when_available() {
    let app = test_app();
    let project = app
        .ctx
        .create_project("Handmade Market", "ecommerce", "Sell handmade goods")
        .unwrap();
    app.ctx.sign_in("token-1", None).unwrap();
    app.gateway
        .set_generated_stories(vec![remote_story(&project.id, "us-db", "from database")]);

    let outcome = app
        .ctx
        .generate_user_stories(&project.id, &CancelToken::new())
        .await
        .unwrap();

    assert_eq!(outcome.source, GenerationSource::DatabaseGenerated);
    assert_eq!(app.gateway.anonymous_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn expired_session_falls_through_to_anonymous_tier_and_signs_out() {
    let app = test_app();
    let project = app
        .ctx
        .create_project("Handmade Market", "ecommerce", "Sell handmade goods")
        .unwrap();
    app.ctx.sign_in("stale-token", None).unwrap();
    app.gateway.fail_generates(Failure::Unauthorized);
    app.gateway
        .set_anonymous_stories(vec![remote_story(&project.id, "us-anon", "from local api")]);

    let outcome = app
        .ctx
        .generate_user_stories(&project.id, &CancelToken::new())
        .await
        .unwrap();

    assert_eq!(outcome.source, GenerationSource::LocalApiGenerated);
    assert!(!app.ctx.auth().is_authenticated());
}

#[tokio::test]
async fn malformed_remote_payload_falls_through_the_chain() {
    let app = test_app();
    let project = app
        .ctx
        .create_project("Handmade Market", "ecommerce", "Sell handmade goods")
        .unwrap();
    app.ctx.sign_in("token-1", None).unwrap();
    app.gateway.fail_generates(Failure::Malformed);
    app.gateway.fail_anonymous(Failure::Malformed);

    let outcome = app
        .ctx
        .generate_user_stories(&project.id, &CancelToken::new())
        .await
        .unwrap();

    assert_eq!(outcome.source, GenerationSource::TemplateFallback);
    assert!(outcome.created_count > 0);
}

#[tokio::test]
async fn anonymous_request_sends_capped_samples() {
    let app = test_app();
    let project = app
        .ctx
        .create_project("Handmade Market", "ecommerce", "Sell handmade goods")
        .unwrap();

    for i in 0..10 {
        app.ctx
            .store()
            .insert(remote_story(&project.id, &format!("us-{}", i), "existing"))
            .unwrap();
    }
    for i in 0..5 {
        app.ctx
            .store()
            .insert(Wireframe::new(&project.id, format!("Page {}", i), "form"))
            .unwrap();
    }
    app.gateway.set_anonymous_scenarios(vec![]);

    app.ctx
        .generate_scenarios(&project.id, &CancelToken::new())
        .await
        .unwrap();

    let sample = app.gateway.last_anonymous_sample.lock().unwrap().unwrap();
    assert_eq!(sample, (3, 2));
}

#[tokio::test]
async fn template_scenarios_cover_each_story_and_reference_wireframes() {
    let app = test_app();
    let project = app
        .ctx
        .create_project("Handmade Market", "ecommerce", "Sell handmade goods")
        .unwrap();
    app.gateway.fail_everything();

    app.ctx
        .store()
        .insert(remote_story(&project.id, "us-1", "track my order"))
        .unwrap();
    app.ctx
        .store()
        .insert(Wireframe::new(&project.id, "Order Tracking", "detail"))
        .unwrap();

    let outcome = app
        .ctx
        .generate_scenarios(&project.id, &CancelToken::new())
        .await
        .unwrap();

    assert_eq!(outcome.source, GenerationSource::TemplateFallback);
    let scenarios = app.ctx.scenarios_for_story(&project.id, "us-1");
    assert_eq!(scenarios.len(), 2);
    assert!(scenarios.iter().all(|s| s.structurally_valid));
    assert!(scenarios
        .iter()
        .any(|s| s.scenario_type == ScenarioType::HappyPath));
    assert!(scenarios
        .iter()
        .any(|s| s.scenario_type == ScenarioType::ExceptionPath));
    assert!(scenarios[0].steps[0].contains("\"Order Tracking\""));
}

#[tokio::test]
async fn template_scenarios_for_storyless_project_are_orphaned() {
    let app = test_app();
    let project = app
        .ctx
        .create_project("Handmade Market", "ecommerce", "sell handmade goods")
        .unwrap();
    app.gateway.fail_everything();

    let outcome = app
        .ctx
        .generate_scenarios(&project.id, &CancelToken::new())
        .await
        .unwrap();

    assert_eq!(outcome.source, GenerationSource::TemplateFallback);
    assert_eq!(outcome.created_count, 3);
    let orphans = app.ctx.orphaned_scenarios(&project.id);
    assert_eq!(orphans.len(), 3);
}

#[tokio::test]
async fn generation_for_unknown_project_is_an_error() {
    let app = test_app();
    let err = app
        .ctx
        .generate_user_stories("ghost", &CancelToken::new())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("ghost"));
}
