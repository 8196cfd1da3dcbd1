use std::{cell::RefCell, rc::Rc};

use gtk4::{prelude::*, Button, Entry, Orientation};

use crate::{
    destroyable::Destroyable,
    events::{EventEmitter, EventObserver, Unsubscriber},
    model::{SessionCommand, SessionEvent, SessionPhase},
};

/// One entry per sequence value plus the submit button.
pub struct AnswerInputUI {
    pub fields_box: gtk4::Box,
    pub submit_button: Button,
    entries: Rc<RefCell<Vec<Entry>>>,
    session_command_emitter: EventEmitter<SessionCommand>,
    subscription: Option<Unsubscriber<SessionEvent>>,
}

impl Destroyable for AnswerInputUI {
    fn destroy(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
    }
}

impl AnswerInputUI {
    pub fn new(
        session_event_observer: EventObserver<SessionEvent>,
        session_command_emitter: EventEmitter<SessionCommand>,
        initial_count: usize,
    ) -> Rc<RefCell<Self>> {
        let fields_box = gtk4::Box::builder()
            .name("answer-fields")
            .orientation(Orientation::Horizontal)
            .spacing(5)
            .homogeneous(true)
            .build();

        let submit_button = Button::with_label("Submit");
        submit_button.set_sensitive(false);
        let entries = Rc::new(RefCell::new(Vec::new()));
        submit_button.connect_clicked({
            let submit = AnswerInputUI::submit_handler(&entries, &session_command_emitter);
            move |_| submit()
        });

        let input_ui = Rc::new(RefCell::new(Self {
            fields_box,
            submit_button,
            entries,
            session_command_emitter,
            subscription: None,
        }));
        input_ui.borrow().rebuild_fields(initial_count);

        let input_ui_moved = input_ui.clone();
        let subscription = session_event_observer.subscribe(move |event| {
            input_ui_moved.borrow().handle_session_event(event);
        });
        input_ui.borrow_mut().subscription = Some(subscription);
        input_ui
    }

    // entries are read and released before emitting; the submit will re-enter this UI
    fn submit_handler(
        entries: &Rc<RefCell<Vec<Entry>>>,
        session_command_emitter: &EventEmitter<SessionCommand>,
    ) -> impl Fn() + 'static {
        let entries = Rc::clone(entries);
        let session_command_emitter = session_command_emitter.clone();
        move || {
            let answers: Vec<String> = entries
                .borrow()
                .iter()
                .map(|entry| entry.text().to_string())
                .collect();
            log::trace!(target: "answer_input_ui", "Submitting {:?}", answers);
            session_command_emitter.emit(SessionCommand::Submit(answers));
        }
    }

    fn handle_session_event(&self, event: &SessionEvent) {
        match event {
            SessionEvent::InputFieldsChanged { count, .. } => self.rebuild_fields(*count),
            SessionEvent::DisplaySequence(sequence) => self.rebuild_fields(sequence.len()),
            SessionEvent::PhaseChanged(phase) => {
                let awaiting = *phase == SessionPhase::Awaiting;
                self.submit_button.set_sensitive(awaiting);
                if awaiting {
                    if let Some(first) = self.entries.borrow().first() {
                        first.grab_focus();
                    }
                }
            }
            _ => (),
        }
    }

    fn rebuild_fields(&self, count: usize) {
        while let Some(child) = self.fields_box.first_child() {
            self.fields_box.remove(&child);
        }
        let mut entries = self.entries.borrow_mut();
        entries.clear();
        for _ in 0..count {
            let entry = Entry::builder()
                .width_chars(3)
                .max_length(6)
                .input_purpose(gtk4::InputPurpose::Digits)
                .build();
            entry.connect_activate({
                let submit = AnswerInputUI::submit_handler(&self.entries, &self.session_command_emitter);
                let submit_button = self.submit_button.clone();
                move |_| {
                    if submit_button.is_sensitive() {
                        submit();
                    }
                }
            });
            self.fields_box.append(&entry);
            entries.push(entry);
        }
    }
}
