//! Integration tests for the edit session on the built-in catalog

use std::time::Duration;

use pretty_assertions::assert_eq;
use tokio::time::Instant;

use popup_studio::config::ConfigValue;
use popup_studio::interaction::TriggerOutcome;
use popup_studio::template::CLAIM_RESET;
use popup_studio::{
    builtin_catalog, parse_config, EditSession, EditState, ExternalSheet, SessionEvent,
    StudioSettings, StyleMode, StylesheetAssembler,
};

const BASE_SHEET: &str = ".popup-overlay { display: none; }";

fn session(mode: StyleMode) -> EditSession {
    EditSession::new(
        builtin_catalog(mode),
        StylesheetAssembler::new(ExternalSheet::loaded("popup.css", BASE_SHEET)),
        &StudioSettings::default(),
    )
    .expect("built-in catalog should open")
}

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

#[test]
fn test_every_default_renders() {
    for mode in [StyleMode::Inline, StyleMode::External, StyleMode::Editable] {
        let mut session = session(mode);
        for index in 0..session.catalog().len() {
            session.select_template(index).unwrap();
            assert!(
                !session.outputs().preview.is_failed(),
                "template {} failed in {} mode",
                index,
                mode
            );
        }
    }
}

#[test]
fn test_config_text_is_pretty_default() {
    let mut session = session(StyleMode::Editable);
    session.select_template(1).unwrap();
    let default = session.template().default_config().clone();
    assert_eq!(session.config_text(), default.to_pretty_string());
    assert_eq!(parse_config(session.config_text()).unwrap(), default);
    assert!(session.config_text().starts_with("{\n  \"heroImage\""));
}

#[test]
fn test_switching_templates_discards_edits() {
    let mut session = session(StyleMode::Editable);
    let t0 = Instant::now();
    session.edit_config(
        r#"{"amounts": [], "title": "Changed", "cta": {"text": "x"}}"#,
        t0,
    );
    session.poll(t0 + ms(300));
    assert!(session.outputs().export.contains("Changed"));

    session.select_template(2).unwrap();
    session.select_template(0).unwrap();

    let template = session.template();
    assert_eq!(session.config(), template.default_config());
    assert!(!session.outputs().export.contains("Changed"));
    assert!(session.outputs().export.contains("Special Offer! 🎁"));
}

#[test]
fn test_burst_of_edits_applies_last() {
    let mut session = session(StyleMode::Editable);
    let t0 = Instant::now();
    let mut events = Vec::new();
    for (i, title) in ["one", "two", "three"].iter().enumerate() {
        let now = t0 + ms(100 * i as u64);
        events.extend(session.poll(now));
        session.edit_config(
            format!(r#"{{"amounts": [], "title": "{title}", "cta": {{}}}}"#),
            now,
        );
    }
    events.extend(session.poll(t0 + ms(499)));
    assert!(events.is_empty());

    events.extend(session.poll(t0 + ms(500)));
    assert_eq!(events, vec![SessionEvent::ConfigApplied { render_failed: false }]);
    assert_eq!(session.apply_count(), 1);
    assert_eq!(
        session.config().get("title"),
        Some(&ConfigValue::str("three"))
    );
}

#[test]
fn test_parse_error_rolls_back_exactly() {
    let mut session = session(StyleMode::Inline);
    let before = session.snapshot();
    let t0 = Instant::now();

    session.edit_config(r#"{"a":"#, t0);
    let events = session.poll(t0 + ms(300));

    assert_eq!(events.len(), 1);
    let SessionEvent::ConfigRejected(err) = &events[0] else {
        panic!("expected a rejection, got {:?}", events[0]);
    };
    assert_eq!(err.span(), 5..5);
    assert_eq!(session.state(), EditState::Rejected);
    assert_eq!(session.config(), &before.config);
    assert_eq!(session.outputs(), &before.outputs);
    assert_eq!(session.error(), Some(err));
}

#[test]
fn test_deep_nesting_leaves_session_usable() {
    let mut session = session(StyleMode::Editable);
    let before = session.snapshot();
    let deep = format!(
        r#"{{"amounts": [], "cta": {{}}, "x": {}{}}}"#,
        "[".repeat(8000),
        "]".repeat(8000)
    );
    session.edit_config(deep, Instant::now());
    let events = session.flush();

    assert_eq!(events.len(), 1);
    assert!(matches!(&events[0], SessionEvent::ConfigRejected(_)));
    assert_eq!(session.state(), EditState::Rejected);
    assert_eq!(session.snapshot().config, before.config);
    session.select_template(1).unwrap();
    assert!(!session.outputs().preview.is_failed());
}

#[test]
fn test_render_fault_then_recovery() {
    let mut session = session(StyleMode::Editable);
    let t0 = Instant::now();

    session.edit_config(r#"{"title": "No amounts"}"#, t0);
    session.poll(t0 + ms(300));
    let outputs = session.outputs().clone();
    assert!(session.error().is_none());
    assert_eq!(session.state(), EditState::Applied);
    assert!(outputs
        .preview
        .preview_html()
        .starts_with(r#"<p style="color:#fca5a5;font-size:13px;">Render error: "#));
    assert!(outputs
        .export
        .contains("<!-- HTML -->\n<!-- Render error: missing required field 'amounts' -->"));
    assert_eq!(session.config().get("title"), Some(&ConfigValue::str("No amounts")));

    session.edit_config(r#"{"amounts": [], "cta": {"text": "Buy"}}"#, t0 + ms(400));
    session.poll(t0 + ms(700));
    assert!(!session.outputs().preview.is_failed());
    assert!(session.outputs().export.contains(r#"<button class="popup-cta">Buy</button>"#));
}

#[test]
fn test_export_never_diverges_from_preview() {
    for mode in [StyleMode::Inline, StyleMode::External, StyleMode::Editable] {
        let mut session = session(mode);
        let t0 = Instant::now();
        session.select_template(1).unwrap();
        session.edit_config(r#"{"cta": {"text": "Grab"}, "subtitle": "Hi"}"#, t0);
        session.poll(t0 + ms(300));

        let outputs = session.outputs();
        let markup = outputs.preview.code_markup();
        assert!(markup.contains("<span>Grab</span>"));
        assert!(outputs.export.contains(&markup));
        assert!(outputs
            .export
            .ends_with(&format!("<style>\n{}\n</style>", outputs.stylesheet)));
    }
}

#[test]
fn test_stylesheet_per_mode() {
    let inline = session(StyleMode::Inline);
    assert!(inline.outputs().stylesheet.starts_with("/* Popup base */"));
    assert_eq!(inline.stylesheet_text(), None);

    let external = session(StyleMode::External);
    assert_eq!(external.outputs().stylesheet, BASE_SHEET);
    assert_eq!(external.stylesheet_text(), None);

    let editable = session(StyleMode::Editable);
    assert_eq!(editable.outputs().stylesheet, BASE_SHEET);
    assert_eq!(editable.stylesheet_text(), Some(BASE_SHEET));
}

#[test]
fn test_stylesheet_edit_survives_template_switch() {
    let mut session = session(StyleMode::Editable);
    let t0 = Instant::now();
    session.edit_stylesheet(".mine {}", t0).unwrap();
    session.select_template(2).unwrap();
    session.poll(t0 + ms(200));

    assert_eq!(session.outputs().stylesheet, ".mine {}");
    session.select_template(0).unwrap();
    assert_eq!(session.outputs().stylesheet, ".mine {}");
}

#[test]
fn test_claim_cycle() {
    let mut session = session(StyleMode::Editable);
    session.select_template(2).unwrap();
    let t0 = Instant::now();

    assert_eq!(session.trigger("cta-v2", t0), TriggerOutcome::Claimed);
    assert!(session.interactions().is_claimed("cta-v2"));
    assert_eq!(session.next_deadline(), Some(t0 + CLAIM_RESET));
    assert_eq!(session.trigger("cta-v2", t0 + ms(600)), TriggerOutcome::Ignored);

    session.poll(t0 + CLAIM_RESET);
    assert!(!session.interactions().is_claimed("cta-v2"));
    assert_eq!(session.next_deadline(), None);
}

#[test]
fn test_rerender_drops_claimed_state() {
    let mut session = session(StyleMode::Editable);
    session.select_template(1).unwrap();
    let t0 = Instant::now();
    session.trigger("cta-v1", t0);

    session.edit_config(r#"{"cta": {"text": "Again"}}"#, t0 + ms(10));
    session.poll(t0 + ms(310));
    assert!(!session.interactions().is_claimed("cta-v1"));

    // Old reset timer has nothing left to touch
    session.poll(t0 + CLAIM_RESET);
    assert_eq!(session.trigger("cta-v1", t0 + ms(1300)), TriggerOutcome::Claimed);
}

#[test]
fn test_render_fault_unmounts_interactions() {
    let mut session = session(StyleMode::Editable);
    session.select_template(1).unwrap();
    let t0 = Instant::now();
    session.edit_config(r#"{"cta": "not an object"}"#, t0);
    session.poll(t0 + ms(300));

    assert!(session.outputs().preview.is_failed());
    assert_eq!(session.trigger("cta-v1", t0 + ms(400)), TriggerOutcome::Unknown);
}
