// handles score and elapsed time for the running session

use std::{cell::RefCell, rc::Rc, time::Duration};

use glib::{timeout_add_local, ControlFlow, SourceId};
use gtk4::{prelude::WidgetExt, Label};

use crate::{
    destroyable::Destroyable,
    events::{EventObserver, Unsubscriber},
    model::{SessionEvent, TimerState},
};

pub struct ScoreUI {
    pub score_label: Label,
    pub timer_label: Label,
    timer_state: Option<TimerState>,
    timer: Option<SourceId>,
    session_event_subscription: Option<Unsubscriber<SessionEvent>>,
}

impl Destroyable for ScoreUI {
    fn destroy(&mut self) {
        self.stop_timer_label_handler();
        if let Some(subscription) = self.session_event_subscription.take() {
            subscription.unsubscribe();
        }
    }
}

impl ScoreUI {
    pub fn new(session_event_observer: EventObserver<SessionEvent>) -> Rc<RefCell<Self>> {
        let score_label = Label::new(None);
        score_label.set_css_classes(&["score"]);
        ScoreUI::update_score_label(&score_label, 0);

        let timer_label = Label::new(None);
        timer_label.set_css_classes(&["timer"]);
        ScoreUI::update_timer_label(&timer_label, None);

        let score_ui = Rc::new(RefCell::new(Self {
            score_label,
            timer_label,
            timer_state: None,
            timer: None,
            session_event_subscription: None,
        }));

        ScoreUI::bind_observer(Rc::clone(&score_ui), session_event_observer);
        score_ui
    }

    fn bind_observer(
        score_ui: Rc<RefCell<Self>>,
        session_event_observer: EventObserver<SessionEvent>,
    ) {
        let subscription = {
            let score_ui = score_ui.clone();
            session_event_observer.subscribe(move |event| {
                score_ui
                    .borrow_mut()
                    .handle_session_event(score_ui.clone(), event);
            })
        };
        score_ui.borrow_mut().session_event_subscription = Some(subscription);
    }

    fn handle_session_event(&mut self, score_ui: Rc<RefCell<Self>>, event: &SessionEvent) {
        match event {
            SessionEvent::ScoreChanged(score) => {
                ScoreUI::update_score_label(&self.score_label, *score);
            }
            SessionEvent::TimerStateChanged(timer_state) => {
                self.update_timer_state(score_ui, timer_state);
            }
            _ => {}
        }
    }

    fn update_timer_state(&mut self, score_ui: Rc<RefCell<Self>>, timer_state: &TimerState) {
        self.timer_state = Some(timer_state.clone());
        ScoreUI::update_timer_label(&self.timer_label, self.timer_state.as_ref());
        if timer_state.is_running() {
            self.start_timer_label_handler(score_ui);
        } else {
            self.stop_timer_label_handler();
        }
    }

    fn start_timer_label_handler(&mut self, score_ui: Rc<RefCell<Self>>) {
        // already ticking
        if self.timer.is_some() {
            return;
        }
        let score_ui_weak = Rc::downgrade(&score_ui);
        let timer = timeout_add_local(Duration::from_secs(1), move || {
            match score_ui_weak.upgrade() {
                Some(score_ui) => {
                    let score_ui = score_ui.borrow();
                    ScoreUI::update_timer_label(&score_ui.timer_label, score_ui.timer_state.as_ref());
                    ControlFlow::Continue
                }
                None => ControlFlow::Break,
            }
        });
        self.timer = Some(timer);
    }

    fn stop_timer_label_handler(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.remove();
        }
    }

    fn update_score_label(score_label: &Label, score: u32) {
        score_label.set_text(&format!("Score: {}", score));
    }

    fn update_timer_label(timer_label: &Label, timer_state: Option<&TimerState>) {
        let elapsed = timer_state.map(|t| t.elapsed()).unwrap_or_default();
        let minutes = elapsed.as_secs() / 60;
        let seconds = elapsed.as_secs() % 60;
        timer_label.set_text(&format!("{:02}:{:02}", minutes, seconds));
    }
}

impl Drop for ScoreUI {
    fn drop(&mut self) {
        log::trace!(target: "score_ui", "Dropping ScoreUI");
        self.stop_timer_label_handler();
    }
}
