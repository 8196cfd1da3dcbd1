use log::trace;
use std::cell::RefCell;
use std::rc::Rc;

use super::clock::Clock;
use super::leaderboard::Leaderboard;
use super::scheduler::Scheduler;
use super::session::{GameSession, SessionConfig};
use crate::destroyable::Destroyable;
use crate::events::{EventEmitter, EventHandler, EventObserver, Unsubscriber};
use crate::model::{GlobalEvent, SessionCommand, SessionEvent};

/// Connects a `GameSession` to the command and event channels and owns the
/// hide timer through the injected scheduler.
pub struct SessionEngine {
    session: GameSession,
    leaderboard: Rc<RefCell<Leaderboard>>,
    scheduler: Rc<dyn Scheduler>,
    session_command_emitter: EventEmitter<SessionCommand>,
    session_event_emitter: EventEmitter<SessionEvent>,
    subscription: Option<Unsubscriber<SessionCommand>>,
    global_subscription: Option<Unsubscriber<GlobalEvent>>,
}

impl Destroyable for SessionEngine {
    fn destroy(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
        if let Some(subscription) = self.global_subscription.take() {
            subscription.unsubscribe();
        }
    }
}

impl SessionEngine {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        session_command_observer: EventObserver<SessionCommand>,
        session_command_emitter: EventEmitter<SessionCommand>,
        session_event_emitter: EventEmitter<SessionEvent>,
        global_event_observer: EventObserver<GlobalEvent>,
        leaderboard: Rc<RefCell<Leaderboard>>,
        scheduler: Rc<dyn Scheduler>,
        clock: Rc<dyn Clock>,
        config: SessionConfig,
    ) -> Rc<RefCell<Self>> {
        let engine = Rc::new(RefCell::new(Self {
            session: GameSession::new(config, clock),
            leaderboard,
            scheduler,
            session_command_emitter,
            session_event_emitter,
            subscription: None,
            global_subscription: None,
        }));
        SessionEngine::wire_subscription(engine.clone(), session_command_observer);
        SessionEngine::wire_global_subscription(engine.clone(), global_event_observer);
        engine
    }

    fn wire_subscription(
        engine: Rc<RefCell<Self>>,
        session_command_observer: EventObserver<SessionCommand>,
    ) {
        let engine_weak = Rc::downgrade(&engine);
        let subscription = session_command_observer.subscribe(move |command| {
            if let Some(engine) = engine_weak.upgrade() {
                SessionEngine::dispatch(&engine, command.clone());
            }
        });
        engine.borrow_mut().subscription = Some(subscription);
    }

    fn wire_global_subscription(
        engine: Rc<RefCell<Self>>,
        global_event_observer: EventObserver<GlobalEvent>,
    ) {
        let engine_weak = Rc::downgrade(&engine);
        let subscription = global_event_observer.subscribe(move |event| {
            if let Some(engine) = engine_weak.upgrade() {
                engine.borrow_mut().handle_global_event(event);
            }
        });
        engine.borrow_mut().global_subscription = Some(subscription);
    }

    /// Runs the command against the session, then publishes its effects with
    /// no borrow held so listeners may read the engine.
    fn dispatch(engine: &Rc<RefCell<Self>>, command: SessionCommand) {
        let (events, emitter) = {
            let mut engine = engine.borrow_mut();
            let events = engine.session.handle(command);
            engine.apply_effects(&events);
            (events, engine.session_event_emitter.clone())
        };
        for event in events {
            if !matches!(event, SessionEvent::ScheduleHide { .. }) {
                emitter.emit(event);
            }
        }
    }

    fn apply_effects(&mut self, events: &[SessionEvent]) {
        for event in events {
            match event {
                SessionEvent::ScheduleHide { round, after } => {
                    trace!(target: "session_engine", "Hiding round {} in {:?}", round, after);
                    let round = *round;
                    let session_command_emitter = self.session_command_emitter.clone();
                    self.scheduler.schedule_once(
                        *after,
                        Box::new(move || {
                            session_command_emitter.emit(SessionCommand::HideSequence { round });
                        }),
                    );
                }
                SessionEvent::LeaderboardUpdated(_) => {
                    self.leaderboard.borrow_mut().handle_event(event);
                }
                _ => (),
            }
        }
    }

    fn handle_global_event(&mut self, event: &GlobalEvent) {
        match event {
            GlobalEvent::SettingsChanged(settings) => self.session.apply_settings(settings),
        }
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }
}
