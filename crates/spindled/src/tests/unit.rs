//! Cross-module unit tests for message dispatch against daemon state.

use rstest::rstest;

use crate::message::{ResponseSink, handle_message};
use crate::state::{BarConfig, DaemonState, MockBarRenderer, SettingsStore, StatusBar};

fn dispatch(state: &mut DaemonState, message: &[u8]) -> String {
    let mut output = Vec::new();
    let mut sink = ResponseSink::new(&mut output);
    handle_message(state, &mut sink, message);
    drop(sink);
    String::from_utf8(output).expect("utf8 response")
}

fn state_with_renders(expected: usize) -> DaemonState {
    let mut renderer = MockBarRenderer::new();
    renderer.expect_update().times(expected).return_const(());
    renderer.expect_flush().times(expected).return_const(());
    DaemonState::new(false, StatusBar::new(Box::new(renderer)))
}

#[rstest]
#[case(b"config\0status_bar_text_font\0Iosevka:Regular:12.0\0\0".as_slice())]
#[case(b"config\0status_bar_icon_font\0Symbols:Regular:12.0\0\0".as_slice())]
#[case(b"config\0status_bar_background_color\0ff101010\0\0".as_slice())]
#[case(b"config\0status_bar_foreground_color\00xffeeeeee\0\0".as_slice())]
#[case(b"config\0status_bar_space_icon_strip\0I\0II\0\0".as_slice())]
#[case(b"config\0status_bar_power_icon_strip\0+\0-\0\0".as_slice())]
#[case(b"config\0status_bar_space_icon\0*\0\0".as_slice())]
#[case(b"config\0status_bar_clock_icon\0@\0\0".as_slice())]
fn bar_mutations_render_once(#[case] message: &[u8]) {
    let mut state = state_with_renders(1);
    assert_eq!(dispatch(&mut state, message), "");
}

#[rstest]
#[case(b"config\0status_bar_text_font\0\0".as_slice())]
#[case(b"config\0status_bar_background_color\0\0".as_slice())]
#[case(b"config\0status_bar_clock_icon\0\0".as_slice())]
#[case(b"config\0debug_output\0on\0\0".as_slice())]
#[case(b"config\0status_bar_background_color\0zz\0\0".as_slice())]
#[case(b"bar\0status_bar_clock_icon\0@\0\0".as_slice())]
fn queries_and_rejections_do_not_render(#[case] message: &[u8]) {
    let mut state = state_with_renders(0);
    dispatch(&mut state, message);
}

#[test]
fn queries_never_mutate() {
    let mut state = DaemonState::default();
    let before = state.bar().config().clone();
    for message in [
        b"config\0status_bar_text_font\0\0".as_slice(),
        b"config\0status_bar_icon_font\0\0",
        b"config\0status_bar_background_color\0\0",
        b"config\0status_bar_foreground_color\0\0",
        b"config\0status_bar_space_icon\0\0",
        b"config\0status_bar_clock_icon\0\0",
        b"config\0debug_output\0\0",
    ] {
        dispatch(&mut state, message);
    }
    assert_eq!(state.bar().config(), &before);
    assert_eq!(before, BarConfig::default());
    assert!(!state.debug_output());
}

#[test]
fn queries_report_defaults() {
    let mut state = DaemonState::default();
    assert_eq!(
        dispatch(&mut state, b"config\0status_bar_text_font\0\0"),
        "Helvetica Neue:Bold:12.0\n"
    );
    assert_eq!(
        dispatch(&mut state, b"config\0status_bar_icon_font\0\0"),
        "Font Awesome 5 Free:Solid:12.0\n"
    );
    assert_eq!(
        dispatch(&mut state, b"config\0status_bar_foreground_color\0\0"),
        "0xffa8a8a8\n"
    );
}

#[test]
fn unterminated_messages_end_at_the_buffer() {
    let mut state = DaemonState::default();
    assert_eq!(dispatch(&mut state, b"config\0status_bar_space_icon\0#"), "");
    assert_eq!(state.space_icon(), Some("#"));
}

#[test]
fn empty_space_strip_clears_the_list() {
    let mut state = DaemonState::default();
    dispatch(&mut state, b"config\0status_bar_space_icon_strip\0a\0b\0\0");
    assert_eq!(dispatch(&mut state, b"config\0status_bar_space_icon_strip\0\0"), "");
    assert!(state.space_icon_strip().is_empty());
}
