mod common;

use chrono::{Duration, TimeZone, Utc};
use guest_book_be::guestbook::{
    avatar::{avatar_color, avatar_hue, initials, name_hash},
    cards::display_cards,
    pagination::paginate,
    stars::{Star, average_stars, render_stars, star_glyphs},
    time::time_ago,
};

#[test]
fn test_stars_fill_up_to_rating() {
    assert_eq!(render_stars(3, 5), "★★★☆☆");
    assert_eq!(render_stars(5, 5), "★★★★★");
    assert_eq!(render_stars(0, 5), "☆☆☆☆☆");
    assert_eq!(
        star_glyphs(2, 3),
        vec![Star::Filled, Star::Filled, Star::Empty]
    );
}

#[test]
fn test_stars_out_of_range() {
    assert_eq!(render_stars(-2, 5), "☆☆☆☆☆");
    assert_eq!(render_stars(9, 5), "★★★★★");
    assert_eq!(render_stars(3, 0), "");
}

#[test]
fn test_average_stars_rounds() {
    assert_eq!(average_stars(4.4), "★★★★☆");
    assert_eq!(average_stars(4.5), "★★★★★");
    assert_eq!(average_stars(0.0), "☆☆☆☆☆");
}

#[test]
fn test_time_ago_boundaries() {
    let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();

    assert_eq!(time_ago(now - Duration::seconds(59), now), "just now");
    assert_eq!(time_ago(now - Duration::seconds(60), now), "1 minute ago");
    assert_eq!(time_ago(now - Duration::minutes(45), now), "45 minutes ago");
    assert_eq!(time_ago(now - Duration::minutes(60), now), "1 hour ago");
    assert_eq!(time_ago(now - Duration::minutes(125), now), "2 hours ago");
    assert_eq!(time_ago(now - Duration::hours(24), now), "1 day ago");
    assert_eq!(time_ago(now - Duration::days(10), now), "10 days ago");
}

#[test]
fn test_time_ago_in_the_future_is_just_now() {
    let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    assert_eq!(time_ago(now + Duration::hours(3), now), "just now");
}

#[test]
fn test_name_hash() {
    assert_eq!(name_hash(""), 0);
    assert_eq!(name_hash("A"), 65);
    assert_eq!(name_hash("AB"), 2081);
    assert_eq!(avatar_hue("AB"), 281);
    assert_eq!(avatar_color("A"), "hsl(65, 70%, 60%)");
}

#[test]
fn test_name_hash_wraps_for_long_names() {
    let name = "A very long guest name that overflows thirty two bits easily";
    assert!(avatar_hue(name) < 360);
    assert_eq!(avatar_hue(name), avatar_hue(name));
}

#[test]
fn test_initials() {
    assert_eq!(initials("ada lovelace"), "AL");
    assert_eq!(initials("Grace Brewster Hopper"), "GB");
    assert_eq!(initials("  plato "), "P");
    assert_eq!(initials("   "), "?");
}

#[test]
fn test_paginate() {
    let items: Vec<u32> = (1..=7).collect();

    let first = paginate(&items, 1, 3);
    assert_eq!(first.items, vec![1, 2, 3]);
    assert_eq!(first.total, 7);
    assert_eq!(first.total_pages, 3);

    let last = paginate(&items, 3, 3);
    assert_eq!(last.items, vec![7]);

    let past = paginate(&items, 5, 3);
    assert!(past.items.is_empty());
    assert_eq!(past.page, 5);
}

#[test]
fn test_paginate_clamps_zero_values() {
    let items = vec!["a", "b"];
    let page = paginate(&items, 0, 0);

    assert_eq!(page.page, 1);
    assert_eq!(page.per_page, 1);
    assert_eq!(page.items, vec!["a"]);
    assert_eq!(page.total_pages, 2);
}

#[test]
fn test_display_cards_escape_markup() {
    let now = Utc::now();
    let mut entry = common::entry(1, 4);
    entry.name = "Mallory <script>".to_string();
    entry.comment = "<b>Hi</b> & bye".to_string();
    entry.created_at = now - Duration::minutes(2);

    let cards = display_cards(&[entry, common::entry(2, 5)], now);

    assert_eq!(cards.len(), 2);
    let card = &cards[0];
    assert_eq!(card.name, "Mallory &lt;script&gt;");
    assert_eq!(card.comment, "&lt;b&gt;Hi&lt;/b&gt; &amp; bye");
    assert_eq!(card.rating_label, "4.0 / 5");
    assert_eq!(card.stars, "★★★★☆");
    assert_eq!(card.time_ago, "2 minutes ago");
    assert_eq!(card.initials, "M<");
    assert_eq!(card.position, "01 / 02");
    assert_eq!(cards[1].position, "02 / 02");
}
