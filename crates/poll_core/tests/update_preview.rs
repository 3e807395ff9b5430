use std::time::Duration;

use poll_core::{
    update, Effect, ElementContent, JobElement, JobKey, Msg, Phase, PollerState, StatusReport,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    poll_logging::initialize_for_tests();
}

fn preview_page(ids: &[&str]) -> (PollerState, Vec<Effect>) {
    let elements = ids
        .iter()
        .map(|id| {
            JobElement::div(
                JobKey::preview(*id),
                ElementContent::Original("Waiting for preview".to_string()),
            )
        })
        .collect();
    update(PollerState::new(), Msg::Initialize(elements))
}

fn receive(
    state: PollerState,
    key: &JobKey,
    tick: u64,
    report: StatusReport,
) -> (PollerState, Vec<Effect>) {
    update(
        state,
        Msg::StatusReceived {
            key: key.clone(),
            tick,
            report,
        },
    )
}

#[test]
fn initialize_starts_one_second_poll_per_preview() {
    init_logging();
    let (state, effects) = preview_page(&["42", "43"]);

    assert_eq!(
        effects,
        vec![
            Effect::StartPolling {
                key: JobKey::preview("42"),
                interval: Duration::from_millis(1_000),
            },
            Effect::StartPolling {
                key: JobKey::preview("43"),
                interval: Duration::from_millis(1_000),
            },
        ]
    );
    assert!(!state.view().all_terminal);
}

#[test]
fn rendering_then_done_shows_loading_then_linked_image() {
    init_logging();
    let key = JobKey::preview("42");
    let (state, _) = preview_page(&["42"]);

    let (mut state, effects) = receive(state, &key, 1, StatusReport::in_progress("Rendering"));
    assert!(effects.is_empty(), "pending keeps the timer running");
    assert_eq!(
        state.element(&key).unwrap().inner_html(),
        "<div class='loading'><img src='/static/img/loading.gif'></div>"
    );
    assert!(state.consume_dirty());

    let (mut state, effects) = receive(state, &key, 2, StatusReport::done("/img/42.png"));
    assert_eq!(effects, vec![Effect::StopPolling { key: key.clone() }]);
    assert_eq!(
        state.element(&key).unwrap().render_outer_html(),
        "<div id=\"42\" class=\"js-nopreview\"><a href=\"/img/42.png\"><img src=\"/img/42.png\"></a></div>"
    );
    assert_eq!(
        state.phase(&key),
        Some(&Phase::Succeeded {
            render_url: "/img/42.png".to_string()
        })
    );
    assert!(state.consume_dirty());
    assert!(state.view().all_terminal);
}

#[test]
fn failed_preview_shows_failure_message_and_stops() {
    init_logging();
    let key = JobKey::preview("9");
    let (state, _) = preview_page(&["9"]);

    let (state, effects) = receive(state, &key, 1, StatusReport::failed());

    assert_eq!(effects, vec![Effect::StopPolling { key: key.clone() }]);
    assert_eq!(
        state.element(&key).unwrap().inner_html(),
        "<p><strong class='red'>Preview Failure</strong></p>"
    );
    assert_eq!(state.phase(&key), Some(&Phase::Failed));
}

#[test]
fn terminal_session_ignores_later_responses() {
    init_logging();
    let key = JobKey::preview("42");
    let (state, _) = preview_page(&["42"]);
    let (mut state, _) = receive(state, &key, 1, StatusReport::done("/img/42.png"));
    assert!(state.consume_dirty());
    let settled = state.element(&key).unwrap().clone();

    let (state, effects) = receive(state, &key, 2, StatusReport::in_progress("Rendering"));
    assert!(effects.is_empty());
    let (mut state, effects) = receive(state, &key, 3, StatusReport::failed());
    assert!(effects.is_empty());

    assert_eq!(state.element(&key).unwrap(), &settled);
    assert!(!state.consume_dirty());
}

#[test]
fn done_without_render_url_still_terminates() {
    init_logging();
    let key = JobKey::preview("5");
    let (state, _) = preview_page(&["5"]);

    let (state, effects) = receive(state, &key, 1, StatusReport::new(poll_core::JobStatus::Done));

    assert_eq!(effects, vec![Effect::StopPolling { key: key.clone() }]);
    assert_eq!(
        state.element(&key).unwrap().inner_html(),
        "<a href=\"\"><img src=\"\"></a>"
    );
}

#[test]
fn sessions_are_independent() {
    init_logging();
    let a = JobKey::preview("1");
    let b = JobKey::preview("2");
    let (state, _) = preview_page(&["1", "2"]);

    let (state, _) = receive(state, &a, 1, StatusReport::done("/img/1.png"));

    assert_eq!(
        state.element(&b).unwrap().content(),
        &ElementContent::Original("Waiting for preview".to_string())
    );
    let view = state.view();
    assert_eq!(view.pending_count(), 1);
    assert!(!view.all_terminal);
}
