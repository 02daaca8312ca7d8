//! Location across markup generations, dedup, and the skip policy.

use crate::common::{bare_options, export_fixture, fixture};
use chatmd_export::dom::parse_html;
use chatmd_export::locate::{default_matchers, locate_messages};

#[test]
fn old_generation_markup_exports() {
    let doc = export_fixture("thread_old_gen.html", &bare_options());
    let expected = "### user\n\nfirst question\n\n\
                    ### assistant\n\nfirst answer\n\n\
                    ### user\n\nsecond question\n";
    assert_eq!(doc, expected);
}

#[test]
fn new_generation_markup_exports() {
    let doc = export_fixture("thread_new_gen.html", &bare_options());
    assert!(doc.contains("ping"));
    assert!(doc.contains("pong"));
    assert!(doc.contains("still there?"));
}

#[test]
fn nodes_matching_several_patterns_locate_once() {
    // every old-gen node carries both a message id and an author role
    let dom = parse_html(&fixture("thread_old_gen.html")).unwrap();
    let located = locate_messages(&dom, &default_matchers());
    let keys: Vec<&str> = located.iter().map(|m| m.key.as_str()).collect();
    assert_eq!(keys, vec!["old-1", "old-2", "old-3"]);
}

#[test]
fn unconvertible_turn_is_skipped_without_losing_the_rest() {
    // turn 3 of the new-gen fixture holds nothing but chrome
    let doc = export_fixture("thread_new_gen.html", &bare_options());
    assert_eq!(doc.matches("### ").count(), 3, "empty turn skipped");
    let ping = doc.find("ping").unwrap();
    let pong = doc.find("pong").unwrap();
    let still = doc.find("still there?").unwrap();
    assert!(ping < pong && pong < still, "surviving turns keep their order");
}
