use std::{cell::RefCell, rc::Rc};

use gtk4::{prelude::*, Button, DropDown};

use crate::{
    destroyable::Destroyable,
    events::{EventEmitter, EventObserver, Unsubscriber},
    game::settings::Settings,
    model::{Difficulty, SessionCommand, SessionEvent},
};

/// Difficulty selector and start button. Both are locked while a session runs.
pub struct GameControlsUI {
    pub difficulty_selector: DropDown,
    pub start_button: Button,
    subscription: Option<Unsubscriber<SessionEvent>>,
}

impl Destroyable for GameControlsUI {
    fn destroy(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
    }
}

impl GameControlsUI {
    pub fn new(
        session_event_observer: EventObserver<SessionEvent>,
        session_command_emitter: EventEmitter<SessionCommand>,
        settings: &Rc<RefCell<Settings>>,
    ) -> Rc<RefCell<Self>> {
        let all_difficulties = Difficulty::all()
            .iter()
            .map(|d| d.label())
            .collect::<Vec<&str>>();
        let difficulty_selector = DropDown::from_strings(all_difficulties.as_slice());
        difficulty_selector.set_tooltip_text(Some("Select Difficulty"));
        difficulty_selector.set_selected(settings.borrow().difficulty.index() as u32);

        difficulty_selector.connect_selected_notify({
            let settings = Rc::clone(settings);
            let session_command_emitter = session_command_emitter.clone();
            move |selector| {
                let new_difficulty = Difficulty::from_index(selector.selected() as usize);
                settings.borrow_mut().difficulty = new_difficulty;
                if let Err(e) = settings.borrow().save() {
                    log::error!(target: "game_controls_ui", "Failed to save settings: {}", e);
                }
                session_command_emitter.emit(SessionCommand::ChangeDifficulty(new_difficulty));
            }
        });

        let start_button = Button::with_label("Start");
        start_button.connect_clicked({
            let selector = difficulty_selector.clone();
            move |_| {
                let difficulty = Difficulty::from_index(selector.selected() as usize);
                session_command_emitter.emit(SessionCommand::Start(difficulty));
            }
        });

        let controls = Rc::new(RefCell::new(Self {
            difficulty_selector,
            start_button,
            subscription: None,
        }));

        let controls_moved = controls.clone();
        let subscription = session_event_observer.subscribe(move |event| {
            if let SessionEvent::StartEnabled(enabled) = event {
                let controls = controls_moved.borrow();
                controls.start_button.set_sensitive(*enabled);
                controls.difficulty_selector.set_sensitive(*enabled);
            }
        });
        controls.borrow_mut().subscription = Some(subscription);
        controls
    }
}
