use std::time::Duration;

use guest_book_be::{
    guestbook::{AutoAdvance, Carousel},
    models::display::{CAROUSEL_ADVANCE_PERIOD, INTERACTION_COOLDOWN},
};
use tokio::time::sleep;

fn driver(len: usize) -> AutoAdvance {
    let rotation = AutoAdvance::new(CAROUSEL_ADVANCE_PERIOD, INTERACTION_COOLDOWN);
    rotation.set_len(len);
    rotation
}

#[test]
fn test_carousel_wraps_both_ways() {
    let mut carousel = Carousel::new(3);

    assert_eq!(carousel.advance(), Some(1));
    assert_eq!(carousel.advance(), Some(2));
    assert_eq!(carousel.advance(), Some(0));
    assert_eq!(carousel.previous(), Some(2));
    assert_eq!(carousel.focus().label, "03 / 03");
}

#[test]
fn test_empty_carousel_does_nothing() {
    let mut carousel = Carousel::new(0);

    assert_eq!(carousel.advance(), None);
    assert_eq!(carousel.previous(), None);
    assert_eq!(carousel.select(0), None);
    assert_eq!(carousel.index(), 0);
}

#[test]
fn test_select_and_shrink() {
    let mut carousel = Carousel::new(5);

    assert_eq!(carousel.select(4), Some(4));
    assert_eq!(carousel.select(5), None);
    assert_eq!(carousel.index(), 4);

    carousel.set_len(3);
    assert_eq!(carousel.index(), 0);

    carousel.select(2);
    carousel.set_len(4);
    assert_eq!(carousel.index(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_advances_every_period() {
    let rotation = driver(3);
    rotation.start();

    sleep(Duration::from_millis(4400)).await;
    assert_eq!(rotation.focus().index, 0);

    sleep(Duration::from_millis(200)).await;
    assert_eq!(rotation.focus().index, 1);

    sleep(CAROUSEL_ADVANCE_PERIOD).await;
    assert_eq!(rotation.focus().index, 2);

    sleep(CAROUSEL_ADVANCE_PERIOD).await;
    assert_eq!(rotation.focus().index, 0);
}

#[tokio::test(start_paused = true)]
async fn test_double_start_keeps_one_timer() {
    let rotation = driver(5);
    rotation.start();
    rotation.start();

    sleep(Duration::from_millis(4600)).await;
    assert_eq!(rotation.focus().index, 1);
    assert!(rotation.is_running());
}

#[tokio::test(start_paused = true)]
async fn test_pause_and_resume() {
    let rotation = driver(3);
    rotation.start();

    sleep(Duration::from_secs(2)).await;
    rotation.pause();
    assert!(!rotation.is_running());

    sleep(Duration::from_secs(20)).await;
    assert_eq!(rotation.focus().index, 0);

    rotation.resume();
    sleep(Duration::from_millis(4400)).await;
    assert_eq!(rotation.focus().index, 0);

    sleep(Duration::from_millis(200)).await;
    assert_eq!(rotation.focus().index, 1);
}

#[tokio::test(start_paused = true)]
async fn test_interaction_cooldown() {
    let rotation = driver(4);
    rotation.start();

    assert_eq!(rotation.next(), Some(1));
    rotation.pause_for_interaction();
    assert!(!rotation.is_running());

    sleep(Duration::from_millis(9900)).await;
    assert_eq!(rotation.focus().index, 1);

    // resumes at 10s, next advance one period later
    sleep(Duration::from_millis(4400)).await;
    assert!(rotation.is_running());
    assert_eq!(rotation.focus().index, 1);

    sleep(Duration::from_millis(300)).await;
    assert_eq!(rotation.focus().index, 2);
}

#[tokio::test(start_paused = true)]
async fn test_repeated_interaction_pushes_resume_out() {
    let rotation = driver(4);
    rotation.start();

    rotation.pause_for_interaction();
    sleep(Duration::from_secs(8)).await;
    rotation.pause_for_interaction();

    sleep(Duration::from_secs(8)).await;
    assert!(!rotation.is_running());

    sleep(Duration::from_secs(3)).await;
    assert!(rotation.is_running());
}

#[tokio::test(start_paused = true)]
async fn test_focus_updates_are_published() {
    let rotation = driver(3);
    let mut rx = rotation.subscribe();

    rotation.select(2);
    rx.changed().await.unwrap();
    assert_eq!(rx.borrow_and_update().label, "03 / 03");

    rotation.stop();
    rotation.next();
    rx.changed().await.unwrap();
    assert_eq!(rx.borrow_and_update().index, 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_stop_wins_over_cooldown_resume() {
    for round in 0..50 {
        let rotation = AutoAdvance::new(Duration::from_millis(1), Duration::from_millis(1));
        rotation.set_len(10);
        rotation.start();
        rotation.pause_for_interaction();

        // land the stop on either side of the resume
        sleep(Duration::from_micros(900 + (round % 5) * 50)).await;
        rotation.stop();
        sleep(Duration::from_millis(2)).await;

        let settled = rotation.focus();
        sleep(Duration::from_millis(15)).await;
        assert!(!rotation.is_running());
        assert_eq!(rotation.focus(), settled);
    }
}
