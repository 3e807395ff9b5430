use poll_core::{update, ElementContent, JobKey, JobKind, Msg, PollerState, StatusReport};
use poll_engine::{scan_page, SkipReason, SkippedElement};
use pretty_assertions::assert_eq;

const SCENE_PAGE: &str = r#"<!DOCTYPE html>
<html><head><title>Scene LC80470272015005LGN00</title></head>
<body>
  <section class="previews">
    <div class="preview js-nopreview" id="42">Waiting for preview</div>
    <div class="preview" id="41"><a href="/img/41.png"><img src="/img/41.png"></a></div>
  </section>
  <section class="renders">
    <div class="js-nofull" id="7"><p>Bands 4, 3, 2</p><p>Status: <span id="js-fullstatus">Submitted</span></p></div>
  </section>
</body></html>"#;

#[test]
fn finds_preview_and_full_render_elements_in_document_order() {
    let outcome = scan_page(SCENE_PAGE);

    let keys: Vec<_> = outcome.elements.iter().map(|e| e.key().clone()).collect();
    assert_eq!(keys, vec![JobKey::preview("42"), JobKey::full_render("7")]);
    assert!(outcome.skipped.is_empty());
}

#[test]
fn preview_element_keeps_its_markup() {
    let outcome = scan_page(SCENE_PAGE);
    let preview = &outcome.elements[0];

    assert_eq!(
        preview.content(),
        &ElementContent::Original("Waiting for preview".to_string())
    );
    assert_eq!(
        preview.render_outer_html(),
        r#"<div class="preview js-nopreview" id="42">Waiting for preview</div>"#
    );
}

#[test]
fn full_render_element_is_split_around_status_node() {
    let outcome = scan_page(SCENE_PAGE);
    let full = &outcome.elements[1];

    assert_eq!(
        full.content(),
        &ElementContent::StatusSlot {
            before: r#"<p>Bands 4, 3, 2</p><p>Status: <span id="js-fullstatus">"#.to_string(),
            status: "Submitted".to_string(),
            after: "</span></p>".to_string(),
        }
    );
    // Unchanged content renders back to the served markup.
    assert_eq!(
        full.inner_html(),
        r#"<p>Bands 4, 3, 2</p><p>Status: <span id="js-fullstatus">Submitted</span></p>"#
    );
}

#[test]
fn full_render_without_status_node_keeps_original_markup() {
    let outcome = scan_page(r#"<div class="js-nofull" id="8"><p>Rendering</p></div>"#);

    assert_eq!(
        outcome.elements[0].content(),
        &ElementContent::Original("<p>Rendering</p>".to_string())
    );
}

#[test]
fn void_status_node_keeps_original_markup() {
    let outcome =
        scan_page(r#"<div class="js-nofull" id="7"><input id="js-fullstatus" value="x"></div>"#);
    let full = &outcome.elements[0];

    assert_eq!(
        full.content(),
        &ElementContent::Original(r#"<input id="js-fullstatus" value="x">"#.to_string())
    );

    // A pending answer then has no status text to rewrite.
    let (state, _) = update(PollerState::new(), Msg::Initialize(outcome.elements.clone()));
    let (state, _) = update(
        state,
        Msg::StatusReceived {
            key: JobKey::full_render("7"),
            tick: 1,
            report: StatusReport::in_progress("Queued"),
        },
    );
    assert_eq!(
        state.element(&JobKey::full_render("7")).unwrap().inner_html(),
        r#"<input id="js-fullstatus" value="x">"#
    );
}

#[test]
fn elements_without_id_or_with_repeated_id_are_skipped() {
    let outcome = scan_page(
        r#"<div class="js-nofull"></div>
           <div class="js-nopreview" id="  "></div>
           <div class="js-nopreview" id="3"></div>
           <div class="js-nopreview" id="3"></div>"#,
    );

    assert_eq!(outcome.elements.len(), 1);
    assert_eq!(
        outcome.skipped,
        vec![
            SkippedElement {
                kind: JobKind::FullRender,
                reason: SkipReason::MissingId,
            },
            SkippedElement {
                kind: JobKind::Preview,
                reason: SkipReason::MissingId,
            },
            SkippedElement {
                kind: JobKind::Preview,
                reason: SkipReason::DuplicateId("3".to_string()),
            },
        ]
    );
}

#[test]
fn element_with_both_markers_yields_both_jobs() {
    let outcome = scan_page(r#"<div class="js-nopreview js-nofull" id="9"></div>"#);

    let keys: Vec<_> = outcome.elements.iter().map(|e| e.key().clone()).collect();
    assert_eq!(keys, vec![JobKey::preview("9"), JobKey::full_render("9")]);
}

#[test]
fn page_without_jobs_is_empty() {
    let outcome = scan_page("<html><body><p>No renders yet.</p></body></html>");
    assert!(outcome.elements.is_empty());
    assert!(outcome.skipped.is_empty());
}
