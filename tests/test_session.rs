mod common;

use std::{sync::Arc, time::Duration};

use common::FailingGateway;
use guest_book_be::{
    db::{MemoryGateway, SharedGateway},
    guestbook::form::FormPhase,
    models::{DisplayConfig, DisplayVariant, messages::FeedbackClientMessage},
    state::AppState,
    ws::session::ViewerSession,
};
use tokio::time::sleep;
use uuid::Uuid;

fn session_with(variant: DisplayVariant, gateway: SharedGateway) -> ViewerSession {
    let state = AppState::new(gateway, DisplayConfig::for_variant(variant));
    ViewerSession::new(Uuid::new_v4(), state)
}

fn session(variant: DisplayVariant) -> ViewerSession {
    session_with(variant, Arc::new(MemoryGateway::new()))
}

fn index(session: &ViewerSession) -> usize {
    session.focus().map(|f| f.index).unwrap_or_default()
}

async fn fill_form(session: &mut ViewerSession) {
    session
        .handle_message(FeedbackClientMessage::FormName {
            value: "Ada".into(),
        })
        .await;
    session
        .handle_message(FeedbackClientMessage::FormComment {
            value: "Great party".into(),
        })
        .await;
    session
        .handle_message(FeedbackClientMessage::FormStar { star: 4 })
        .await;
}

#[tokio::test(start_paused = true)]
async fn test_tree_navigation_pauses_until_cooldown() {
    let mut session = session(DisplayVariant::Tree);
    session.set_entry_count(4);
    session.start();

    sleep(Duration::from_millis(5100)).await;
    assert_eq!(index(&session), 1);

    session.handle_message(FeedbackClientMessage::Next).await;
    assert_eq!(index(&session), 2);
    assert!(!session.is_rotating());

    sleep(Duration::from_secs(9)).await;
    assert_eq!(index(&session), 2);

    // cooldown ends at 10s, first advance one period after that
    sleep(Duration::from_millis(5800)).await;
    assert!(session.is_rotating());
    assert_eq!(index(&session), 2);

    sleep(Duration::from_millis(300)).await;
    assert_eq!(index(&session), 3);
}

#[tokio::test(start_paused = true)]
async fn test_tree_prev_and_select_pause() {
    let mut session = session(DisplayVariant::Tree);
    session.set_entry_count(4);
    session.start();

    session.handle_message(FeedbackClientMessage::Prev).await;
    assert_eq!(index(&session), 3);
    assert!(!session.is_rotating());

    sleep(Duration::from_secs(11)).await;
    assert!(session.is_rotating());

    session
        .handle_message(FeedbackClientMessage::Select { index: 1 })
        .await;
    assert_eq!(index(&session), 1);
    assert!(!session.is_rotating());
}

#[tokio::test(start_paused = true)]
async fn test_out_of_range_select_is_ignored() {
    let mut session = session(DisplayVariant::Tree);
    session.set_entry_count(3);
    session.start();

    session
        .handle_message(FeedbackClientMessage::Select { index: 7 })
        .await;

    assert_eq!(index(&session), 0);
    assert!(session.is_rotating());
}

#[tokio::test(start_paused = true)]
async fn test_tree_ignores_hover() {
    let mut session = session(DisplayVariant::Tree);
    session.set_entry_count(4);
    session.start();

    session
        .handle_message(FeedbackClientMessage::Hover { active: true })
        .await;
    sleep(Duration::from_millis(5100)).await;

    assert!(session.is_rotating());
    assert_eq!(index(&session), 1);
}

#[tokio::test(start_paused = true)]
async fn test_carousel_hover_pauses_and_resumes() {
    let mut session = session(DisplayVariant::Carousel);
    session.set_entry_count(3);
    session.start();

    session
        .handle_message(FeedbackClientMessage::Hover { active: true })
        .await;
    sleep(Duration::from_secs(20)).await;
    assert_eq!(index(&session), 0);
    assert!(!session.is_rotating());

    session
        .handle_message(FeedbackClientMessage::Hover { active: false })
        .await;
    sleep(Duration::from_millis(4400)).await;
    assert_eq!(index(&session), 0);

    sleep(Duration::from_millis(200)).await;
    assert_eq!(index(&session), 1);
}

#[tokio::test(start_paused = true)]
async fn test_carousel_navigation_keeps_rotating() {
    let mut session = session(DisplayVariant::Carousel);
    session.set_entry_count(4);
    session.start();

    session.handle_message(FeedbackClientMessage::Next).await;
    assert_eq!(index(&session), 1);
    assert!(session.is_rotating());

    sleep(Duration::from_millis(4600)).await;
    assert_eq!(index(&session), 2);
}

#[tokio::test(start_paused = true)]
async fn test_grid_has_no_rotation() {
    let mut session = session(DisplayVariant::Grid);
    session.set_entry_count(5);
    session.start();

    assert!(session.focus().is_none());
    assert!(session.focus_updates().is_none());

    session.handle_message(FeedbackClientMessage::Next).await;
    sleep(Duration::from_secs(30)).await;

    assert!(!session.is_rotating());
    assert!(session.focus().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_entry_count_publishes_focus_once() {
    let session = session(DisplayVariant::Carousel);
    let mut focus_rx = session.focus_updates().unwrap();

    session.set_entry_count(3);
    assert!(focus_rx.has_changed().unwrap());
    assert_eq!(focus_rx.borrow_and_update().label, "01 / 03");

    session.set_entry_count(3);
    assert!(!focus_rx.has_changed().unwrap());
}

#[tokio::test(start_paused = true)]
async fn test_submit_confirms_then_clears() {
    let mut session = session(DisplayVariant::Tree);
    fill_form(&mut session).await;

    session.handle_message(FeedbackClientMessage::FormSubmit).await;

    let state = session.form_state().await;
    assert!(matches!(state.phase, FormPhase::Confirmed { .. }));
    assert_eq!(
        state.confirmation.map(|c| c.message),
        Some("Thank you, Ada!".to_string())
    );
    assert!(session.has_pending_reset());

    sleep(Duration::from_millis(3100)).await;

    let state = session.form_state().await;
    assert_eq!(state.phase, FormPhase::Editing);
    assert_eq!(state.name, "");
    assert!(!session.has_pending_reset());
}

#[tokio::test(start_paused = true)]
async fn test_failed_submit_keeps_form() {
    let mut session = session_with(DisplayVariant::Tree, Arc::new(FailingGateway::default()));
    fill_form(&mut session).await;

    session.handle_message(FeedbackClientMessage::FormSubmit).await;

    let state = session.form_state().await;
    assert_eq!(state.phase, FormPhase::Editing);
    assert_eq!(state.name, "Ada");
    assert_eq!(state.rating, 4);
    assert!(!session.has_pending_reset());
}

#[tokio::test(start_paused = true)]
async fn test_close_stops_timers_and_reset_task() {
    let mut session = session(DisplayVariant::Tree);
    session.set_entry_count(4);
    session.start();
    fill_form(&mut session).await;
    session.handle_message(FeedbackClientMessage::FormSubmit).await;
    assert!(session.has_pending_reset());

    session.close();

    assert!(!session.is_rotating());
    assert!(!session.has_pending_reset());

    sleep(Duration::from_secs(30)).await;
    assert_eq!(index(&session), 0);
    assert!(!session.is_rotating());
}
