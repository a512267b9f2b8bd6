mod common;

use std::sync::atomic::Ordering;
use std::sync::Arc;

use common::MockSurface;
use flo::clock::NullClock;
use flo::grammar::color::ColorToken;
use flo::parser::types::AfterReply;
use flo::parser::{Parser, EMPTY_INPUT, NOT_RECOGNIZED, RESET_PROMPT};

fn parser_over(surface: MockSurface) -> (Parser, Arc<MockSurface>) {
    let surface = Arc::new(surface);
    let parser = Parser::new(Arc::clone(&surface) as _, Arc::new(NullClock));
    (parser, surface)
}

#[tokio::test]
async fn whitespace_input_skips_the_grammar_and_capabilities() {
    let (parser, surface) = parser_over(MockSurface::full());
    let result = parser.parse("   \t  ").unwrap();
    assert!(!result.handled);
    assert_eq!(result.response, EMPTY_INPUT);
    assert_eq!(surface.total_calls(), 0);
}

#[tokio::test]
async fn unknown_vocabulary_never_invokes_a_capability() {
    let (parser, surface) = parser_over(MockSurface::full());
    for input in ["open the pod bay doors", "sudo make me a sandwich", "42"] {
        let result = parser.parse(input).unwrap();
        assert!(!result.handled, "{input:?} should not be handled");
        assert_eq!(result.response, NOT_RECOGNIZED);
    }
    assert_eq!(surface.total_calls(), 0);
}

#[tokio::test]
async fn turning_the_lamp_on_calls_the_setter_once() {
    let (parser, surface) = parser_over(MockSurface::full());
    let result = parser.parse("turn on the lamp").unwrap();
    assert!(result.handled);
    assert!(result.response.contains("on"));
    assert!(result.after.is_none());
    assert_eq!(surface.room_ref().set_calls.load(Ordering::SeqCst), 1);
    assert!(surface.room_ref().lamp_on.load(Ordering::SeqCst));
}

#[tokio::test]
async fn lamp_already_in_requested_state_is_a_no_op() {
    let (parser, surface) = parser_over(MockSurface::full());
    surface.room_ref().lamp_on.store(true, Ordering::SeqCst);
    let result = parser.parse("turn on the lamp").unwrap();
    assert!(result.handled);
    assert!(result.response.contains("already"));
    assert_eq!(surface.room_ref().set_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn missing_capability_degrades_to_not_understood() {
    let (parser, surface) = parser_over(MockSurface::office_only());
    let result = parser.parse("paint it green").unwrap();
    assert!(!result.handled);
    assert_eq!(result.response, NOT_RECOGNIZED);
    assert_eq!(surface.total_calls(), 0);
}

#[tokio::test]
async fn paint_acknowledges_then_follows_up() {
    let (parser, surface) = parser_over(MockSurface::full());
    let result = parser.parse("paint it green").unwrap();
    assert!(result.handled);
    assert!(result.response.contains("green"));
    assert_eq!(
        surface.lab_ref().colors.lock().unwrap().as_slice(),
        &[ColorToken::Green]
    );

    let Some(AfterReply::FollowUp(follow_up)) = result.after else {
        panic!("paint should carry a follow-up");
    };
    let second = follow_up.resolve().await.unwrap();
    assert!(second.contains("green"));
    // The follow-up is commentary, not a second capability call.
    assert_eq!(surface.lab_ref().colors.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn reset_asks_first_and_fires_only_on_confirm() {
    let (parser, surface) = parser_over(MockSurface::full());
    let result = parser.parse("reset everything").unwrap();
    assert!(result.handled);
    assert_eq!(surface.lab_ref().reset_calls.load(Ordering::SeqCst), 0);

    let Some(AfterReply::Confirm(confirmation)) = result.after else {
        panic!("reset should require confirmation");
    };
    assert_eq!(confirmation.prompt, RESET_PROMPT);

    let reply = (confirmation.on_confirm)().await.unwrap();
    assert!(!reply.is_empty());
    assert_eq!(surface.lab_ref().reset_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn reset_denial_never_touches_the_capability() {
    let (parser, surface) = parser_over(MockSurface::full());
    let result = parser.parse("reset everything").unwrap();
    let Some(AfterReply::Confirm(confirmation)) = result.after else {
        panic!("reset should require confirmation");
    };
    let reply = (confirmation.on_deny)();
    assert!(!reply.is_empty());
    assert_eq!(surface.lab_ref().reset_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn capability_failure_surfaces_as_an_error() {
    let mut surface = MockSurface::full();
    surface.lab.as_mut().unwrap().fail_shader = true;
    let (parser, _surface) = parser_over(surface);
    assert!(parser.parse("show the waves").is_err());
}

#[tokio::test]
async fn parsing_never_panics_on_arbitrary_text() {
    let (parser, _surface) = parser_over(MockSurface::full());
    let long = "a".repeat(4096);
    for input in ["", "🤖🤖🤖", "paint", "yes", "\0", "ハロー", long.as_str()] {
        assert!(parser.parse(input).is_ok());
    }
}
