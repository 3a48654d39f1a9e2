mod common;

use common::{remote_scenario, remote_story, test_app};
use storycanvas::app_context::{ProjectUpdate, ScenarioUpdate, StoryUpdate};
use storycanvas::entities::{Scenario, ScenarioStatus, StoryPriority, UserStory, Wireframe};
use storycanvas::sync::{CancelToken, SyncMode, SyncStatus};

#[tokio::test]
async fn project_lifecycle_with_local_cascade() {
    let app = test_app();
    let project = app
        .ctx
        .create_project("Shop", "ecommerce", "Sell handmade goods")
        .unwrap();

    app.ctx
        .store()
        .insert(remote_story(&project.id, "us-1", "browse"))
        .unwrap();
    app.ctx
        .store()
        .insert(remote_scenario(&project.id, "sc-1", "Browse works"))
        .unwrap();
    app.ctx
        .store()
        .insert(Wireframe::new(&project.id, "Catalog", "list"))
        .unwrap();

    let renamed = app
        .ctx
        .update_project(&project.id, ProjectUpdate::rename("Shop v2"))
        .await
        .unwrap();
    assert_eq!(renamed.title, "Shop v2");

    app.ctx.delete_project(&project.id).await.unwrap();
    assert!(app.ctx.get_project(&project.id).is_none());
    assert_eq!(
        app.ctx.store().count_for_project::<UserStory>(&project.id),
        0
    );
    assert_eq!(
        app.ctx.store().count_for_project::<Scenario>(&project.id),
        0
    );
    assert_eq!(
        app.ctx.store().count_for_project::<Wireframe>(&project.id),
        0
    );
}

#[tokio::test]
async fn deleting_a_missing_project_is_an_error_with_retry_affordance() {
    let app = test_app();
    let err = app.ctx.delete_project("ghost").await.unwrap_err();
    assert!(err.to_string().contains("ghost"));
}

#[tokio::test]
async fn story_update_rederives_story_text_and_bumps_iteration() {
    let app = test_app();
    let project = app
        .ctx
        .create_project("Shop", "ecommerce", "Sell handmade goods")
        .unwrap();
    let story = app
        .ctx
        .store()
        .insert(UserStory::new(
            &project.id,
            "customer",
            "browse products",
            "I can compare options",
        ))
        .unwrap();

    let updated = app
        .ctx
        .update_user_story(
            &story.id,
            StoryUpdate {
                role: Some("guest".to_string()),
                priority: Some(StoryPriority::High),
                ..Default::default()
            },
        )
        .unwrap()
        .unwrap();

    assert!(updated.story_text.starts_with("As a guest, "));
    assert!(updated.story_text_is_consistent());
    assert_eq!(updated.iteration, 1);
    assert_eq!(updated.priority, StoryPriority::High);

    // non-clause edits leave the derived text and iteration alone
    let updated = app
        .ctx
        .update_user_story(
            &story.id,
            StoryUpdate {
                story_points: Some(8),
                ..Default::default()
            },
        )
        .unwrap()
        .unwrap();
    assert_eq!(updated.iteration, 1);
    assert!(updated.story_text_is_consistent());
}

#[tokio::test]
async fn scenario_update_revalidates_steps() {
    let app = test_app();
    let project = app
        .ctx
        .create_project("Shop", "ecommerce", "Sell handmade goods")
        .unwrap();
    let scenario = app
        .ctx
        .store()
        .insert(remote_scenario(&project.id, "sc-1", "Browse works"))
        .unwrap();
    assert!(scenario.structurally_valid);

    let updated = app
        .ctx
        .update_scenario(
            &scenario.id,
            ScenarioUpdate {
                steps: Some(vec!["just some text".to_string()]),
                status: Some(ScenarioStatus::Rejected),
                ..Default::default()
            },
        )
        .unwrap()
        .unwrap();

    assert!(!updated.structurally_valid);
    assert_eq!(updated.status, ScenarioStatus::Rejected);
}

#[tokio::test]
async fn page_entry_returns_local_snapshot_with_offline_outcome() {
    let app = test_app();
    let project = app
        .ctx
        .create_project("Shop", "ecommerce", "Sell handmade goods")
        .unwrap();
    app.ctx
        .store()
        .insert(remote_story(&project.id, "us-1", "browse"))
        .unwrap();

    let snapshot = app
        .ctx
        .user_stories_for_project(&project.id, &CancelToken::new())
        .await
        .unwrap();

    assert_eq!(snapshot.items.len(), 1);
    assert_eq!(snapshot.outcome.mode, SyncMode::Offline);
    assert_eq!(snapshot.outcome.status, SyncStatus::Offline);
}

#[tokio::test]
async fn sign_in_switches_operating_mode_and_survives_reload() {
    let app = test_app();
    assert_eq!(app.ctx.operating_mode(), SyncMode::Offline);

    app.ctx.sign_in("token-1", Some("dev@example.com".to_string())).unwrap();
    assert_eq!(app.ctx.operating_mode(), SyncMode::Online);

    // a second context over the same data dir sees the session
    let reloaded = storycanvas::AppContext::with_gateway(
        app.ctx.config().clone(),
        app.gateway.clone(),
    )
    .unwrap();
    assert_eq!(reloaded.operating_mode(), SyncMode::Online);

    app.ctx.sign_out();
    assert_eq!(app.ctx.operating_mode(), SyncMode::Offline);
}

#[tokio::test]
async fn projects_list_is_most_recently_updated_first() {
    let app = test_app();
    let first = app
        .ctx
        .create_project("First", "generic", "one")
        .unwrap();
    let _second = app
        .ctx
        .create_project("Second", "generic", "two")
        .unwrap();

    app.ctx
        .update_project(&first.id, ProjectUpdate::rename("First, renamed"))
        .await
        .unwrap();

    let listed = app.ctx.list_projects();
    assert_eq!(listed[0].title, "First, renamed");
}
