//! Pure state transition function
//!
//! Given the current step, the content catalog and an event, decide the next
//! step and the ordered list of replies. No I/O happens here; the runtime
//! executes the returned effects.

use super::{ConvState, Effect, Event};
use crate::content::{Catalog, MenuOption};
use std::collections::BTreeMap;

/// Result of a state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionResult {
    pub new_state: ConvState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: ConvState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Pure transition function
///
/// Every input produces at least one outbound reply, so the user always gets
/// an answer. Unrecognized input never changes the step.
pub fn transition(state: ConvState, catalog: &Catalog, event: Event) -> TransitionResult {
    let Event::UserMessage { text } = event;

    match state {
        ConvState::Idle if text == catalog.start_keyword => {
            TransitionResult::new(ConvState::MainMenu).with_effect(Effect::welcome(&catalog.welcome))
        }
        ConvState::Idle => {
            TransitionResult::new(ConvState::Idle).with_effect(Effect::reply(&catalog.start_hint))
        }

        ConvState::MainMenu => select_option(&catalog.main_menu, catalog, &text, state),

        ConvState::ContinueOrExit if text == catalog.continue_keyword => {
            TransitionResult::new(ConvState::MainMenu).with_effect(Effect::welcome(&catalog.welcome))
        }
        ConvState::ContinueOrExit if text == catalog.exit_keyword => {
            TransitionResult::new(ConvState::Idle).with_effect(Effect::reply(&catalog.farewell))
        }
        ConvState::ContinueOrExit => TransitionResult::new(ConvState::ContinueOrExit)
            .with_effect(Effect::reply(&catalog.invalid_continue)),

        ConvState::ServiceMenu => select_option(&catalog.service_menu, catalog, &text, state),
    }
}

/// Look up `text` in a menu table.
///
/// An option leading to `ContinueOrExit` is followed by the continue prompt
/// as a second, separate message.
fn select_option(
    menu: &BTreeMap<String, MenuOption>,
    catalog: &Catalog,
    text: &str,
    current: ConvState,
) -> TransitionResult {
    let Some(option) = menu.get(text) else {
        return TransitionResult::new(current).with_effect(Effect::reply(&catalog.invalid_number));
    };

    let Some(next) = ConvState::from_code(option.next_step) else {
        return TransitionResult::new(ConvState::Idle)
            .with_effect(Effect::ReportInvalidStep {
                code: option.next_step,
            })
            .with_effect(Effect::reply(&catalog.restart_apology));
    };

    let result = TransitionResult::new(next).with_effect(Effect::reply(catalog.reply_for(option)));
    if next == ConvState::ContinueOrExit {
        result.with_effect(Effect::prompt(&catalog.continue_prompt))
    } else {
        result
    }
}
