//! Property-based tests for the state machine
//!
//! These tests verify key invariants hold across all possible inputs.

use super::transition::*;
use super::*;
use crate::content::Catalog;
use proptest::prelude::*;

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_state() -> impl Strategy<Value = ConvState> {
    prop_oneof![
        Just(ConvState::Idle),
        Just(ConvState::MainMenu),
        Just(ConvState::ContinueOrExit),
        Just(ConvState::ServiceMenu),
    ]
}

/// Tokens the menus know about, with random casing and padding
fn arb_known_token() -> impl Strategy<Value = String> {
    (
        prop_oneof![
            Just("rabu"),
            Just("ya"),
            Just("tidak"),
            Just("0"),
            Just("1"),
            Just("2"),
            Just("3"),
            Just("4"),
            Just("5"),
            Just("6"),
        ],
        any::<bool>(),
        "[ \t]{0,3}",
        "[ \t\n]{0,3}",
    )
        .prop_map(|(token, upper, lead, trail)| {
            let token = if upper {
                token.to_uppercase()
            } else {
                token.to_string()
            };
            format!("{lead}{token}{trail}")
        })
}

fn arb_input() -> impl Strategy<Value = String> {
    prop_oneof![arb_known_token(), "[a-zA-Z0-9 ]{0,12}"]
}

/// Inputs no menu in any state recognizes
fn arb_unrecognized_input() -> impl Strategy<Value = String> {
    "[a-z]{2,10}|[7-9][0-9]?".prop_filter("must not be a menu token", |s| {
        !matches!(s.as_str(), "rabu" | "ya" | "tidak")
    })
}

fn outbound_count(effects: &[Effect]) -> usize {
    effects.iter().filter(|e| e.is_outbound()).count()
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    // Invariant 1: every message gets one or two replies
    #[test]
    fn prop_every_input_gets_a_reply(
        inputs in proptest::collection::vec(arb_input(), 0..20)
    ) {
        let catalog = Catalog::default();
        let mut state = ConvState::Idle;

        for input in inputs {
            let result = transition(state, &catalog, Event::user_message(&input));
            let sent = outbound_count(&result.effects);
            prop_assert!((1..=2).contains(&sent), "{} replies for {:?}", sent, input);
            state = result.new_state;
        }
    }

    // Invariant 2: unrecognized input never changes the step and always
    // produces the same guidance
    #[test]
    fn prop_invalid_input_is_idempotent(
        state in arb_state(),
        inputs in proptest::collection::vec(arb_unrecognized_input(), 1..6)
    ) {
        let catalog = Catalog::default();
        let first = transition(state, &catalog, Event::user_message(&inputs[0]));
        prop_assert_eq!(first.new_state, state);
        prop_assert_eq!(first.effects.len(), 1);

        for input in &inputs[1..] {
            let again = transition(state, &catalog, Event::user_message(input));
            prop_assert_eq!(again.new_state, state);
            prop_assert_eq!(&again.effects, &first.effects);
        }
    }

    // Invariant 3: matching ignores case and surrounding whitespace
    #[test]
    fn prop_normalization_is_transparent(state in arb_state(), input in arb_known_token()) {
        let catalog = Catalog::default();
        let raw = transition(state, &catalog, Event::user_message(&input));
        let clean = transition(
            state,
            &catalog,
            Event::UserMessage { text: input.trim().to_lowercase() },
        );
        prop_assert_eq!(raw, clean);
    }

    // Invariant 4: the welcome image only accompanies entering the main menu
    #[test]
    fn prop_welcome_image_enters_main_menu(state in arb_state(), input in arb_input()) {
        let catalog = Catalog::default();
        let result = transition(state, &catalog, Event::user_message(&input));
        let media = result
            .effects
            .iter()
            .filter(|e| matches!(e, Effect::SendWelcome { .. }))
            .count();

        prop_assert!(media <= 1);
        if media == 1 {
            prop_assert_eq!(result.new_state, ConvState::MainMenu);
            prop_assert_eq!(result.effects.len(), 1);
        }
    }

    // Invariant 5: the continue prompt is always the last of two messages
    // and only when moving to ContinueOrExit
    #[test]
    fn prop_continue_prompt_follows_info(state in arb_state(), input in arb_input()) {
        let catalog = Catalog::default();
        let result = transition(state, &catalog, Event::user_message(&input));
        let prompt = Effect::prompt(&catalog.continue_prompt);

        if let Some(pos) = result.effects.iter().position(|e| *e == prompt) {
            prop_assert_eq!(pos, 1);
            prop_assert_eq!(result.effects.len(), 2);
            prop_assert_eq!(result.new_state, ConvState::ContinueOrExit);
        }
    }
}
