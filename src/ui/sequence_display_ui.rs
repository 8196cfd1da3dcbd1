use std::{cell::RefCell, rc::Rc};

use gtk4::{prelude::WidgetExt, Label};

use crate::{
    destroyable::Destroyable,
    events::{EventObserver, Unsubscriber},
    model::{SessionEvent, SessionPhase},
};

const IDLE_PROMPT: &str = "Click 'Start' to begin the game";

/// The big label that flashes the sequence.
pub struct SequenceDisplayUI {
    pub label: Label,
    subscription: Option<Unsubscriber<SessionEvent>>,
}

impl Destroyable for SequenceDisplayUI {
    fn destroy(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
    }
}

impl SequenceDisplayUI {
    pub fn new(session_event_observer: EventObserver<SessionEvent>) -> Rc<RefCell<Self>> {
        let label = Label::builder()
            .label(IDLE_PROMPT)
            .css_classes(["sequence-label"])
            .hexpand(true)
            .vexpand(true)
            .build();

        let display = Rc::new(RefCell::new(Self {
            label,
            subscription: None,
        }));

        let display_moved = display.clone();
        let subscription = session_event_observer.subscribe(move |event| {
            display_moved.borrow().handle_session_event(event);
        });
        display.borrow_mut().subscription = Some(subscription);
        display
    }

    fn handle_session_event(&self, event: &SessionEvent) {
        match event {
            SessionEvent::DisplaySequence(sequence) => {
                self.label.remove_css_class("prompt");
                self.label.set_text(&sequence.to_string());
            }
            SessionEvent::ClearSequence => self.label.set_text(""),
            SessionEvent::PhaseChanged(SessionPhase::Idle) => {
                self.label.add_css_class("prompt");
                self.label.set_text(IDLE_PROMPT);
            }
            _ => (),
        }
    }
}
