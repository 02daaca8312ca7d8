//! End-to-end export tests over the kitchensink fixture.

use crate::common::{bare_options, export_fixture, fast_config};
use chatmd_export::assemble::assemble_with_config;
use chatmd_export::options::ConversionOptions;
use chatmd_export::page::StaticPage;
use once_cell::sync::Lazy;
use regex::Regex;

static KITCHENSINK: Lazy<String> = Lazy::new(|| export_fixture("kitchensink.html", &bare_options()));

#[test]
fn turns_appear_in_thread_order() {
    let user = KITCHENSINK.find("### user").expect("user turn present");
    let assistant = KITCHENSINK
        .find("### assistant")
        .expect("assistant turn present");
    assert!(user < assistant);
}

#[test]
fn inline_code_and_links_convert() {
    assert!(KITCHENSINK.contains("Show me `print` and a link to [Go](https://x)."));
}

#[test]
fn code_fence_keeps_language_and_body() {
    let fence = Regex::new(r"```py\nprint\(1\)\n```").unwrap();
    assert!(fence.is_match(&KITCHENSINK), "fence missing in:\n{}", *KITCHENSINK);
}

#[test]
fn code_header_chrome_stays_out_of_the_fence() {
    assert!(!KITCHENSINK.contains("Copy code"));
    assert!(!KITCHENSINK.contains("python\nprint"));
}

#[test]
fn lists_render_with_markers_in_source_order() {
    assert!(KITCHENSINK.contains("1. install\n2. run\n3. profit"));
    assert!(KITCHENSINK.contains("- alpha\n- beta"));
}

#[test]
fn blockquote_is_prefixed() {
    assert!(KITCHENSINK.contains("> quoted wisdom"));
}

#[test]
fn display_math_recovers_the_tex_source() {
    assert!(KITCHENSINK.contains("$$\ne=mc^2\n$$"));
    assert!(!KITCHENSINK.contains("e=mc2"), "rendered glyphs must not leak");
}

#[test]
fn images_embed_by_default_and_collapse_on_request() {
    assert!(KITCHENSINK.contains("An image: ![cat](cat.png)"));

    let collapsed = export_fixture(
        "kitchensink.html",
        &ConversionOptions {
            include_meta: false,
            collapse_images: true,
            ..ConversionOptions::default()
        },
    );
    assert!(collapsed.contains("An image: [image: cat](cat.png)"));
    assert!(!collapsed.contains("![cat]"));
}

#[test]
fn chrome_never_leaks_into_the_document() {
    for leaked in ["Edit message", "Regenerate", "Good", "Bad", "Saved!", "Home / Threads"] {
        assert!(
            !KITCHENSINK.contains(leaked),
            "chrome text {leaked:?} leaked into:\n{}",
            *KITCHENSINK
        );
    }
}

#[test]
fn timestamps_attach_only_on_request() {
    assert!(!KITCHENSINK.contains("### user — "));

    let stamped = export_fixture(
        "kitchensink.html",
        &ConversionOptions {
            include_meta: false,
            include_timestamps: true,
            ..ConversionOptions::default()
        },
    );
    assert!(stamped.contains("### user — 2025-08-07T09:58:00Z"));
    assert!(stamped.contains("### assistant — 2025-08-07T10:00:00Z"));
}

#[test]
fn meta_preamble_is_emitted_when_enabled() {
    let mut page =
        StaticPage::new(crate::common::fixture("kitchensink.html")).with_url("https://chat.example/c/7");
    let options = ConversionOptions {
        include_title: Some("Rust intro".to_string()),
        ..ConversionOptions::default()
    };
    let doc = assemble_with_config(&mut page, &options, &fast_config()).unwrap();
    assert!(doc.starts_with("# Rust intro\n\n**Source:** https://chat.example/c/7\n\n**Exported:** "));
    let separator = Regex::new(r"\n\n---\n\n### user\n").unwrap();
    assert!(separator.is_match(&doc));
}
