use crate::destroyable::Destroyable;
use crate::events::Channel;
use crate::game::clock::SystemClock;
use crate::game::leaderboard::Leaderboard;
use crate::game::session::SessionConfig;
use crate::game::session_engine::SessionEngine;
use crate::game::settings::Settings;
use crate::model::{GlobalEvent, SessionCommand, SessionEvent};
use crate::ui::answer_input_ui::AnswerInputUI;
use crate::ui::game_controls_ui::GameControlsUI;
use crate::ui::glib_scheduler::GlibScheduler;
use crate::ui::leaderboard_ui::LeaderboardUI;
use crate::ui::notice_dialog::NoticeDialog;
use crate::ui::player_name_dialog::PlayerNameDialog;
use crate::ui::score_ui::ScoreUI;
use crate::ui::sequence_display_ui::SequenceDisplayUI;
use gtk4::gdk::Display;
use gtk4::{
    prelude::*, Application, ApplicationWindow, CssProvider, HeaderBar, Label, Orientation,
    STYLE_PROVIDER_PRIORITY_APPLICATION,
};
use std::cell::RefCell;
use std::rc::Rc;

const STYLE: &str = "
.sequence-label { font-size: 20pt; font-weight: bold; }
.sequence-label.prompt { font-size: 14pt; font-weight: normal; }
.score { font-size: 16pt; font-weight: bold; }
.timer { font-family: monospace; }
";

fn install_css() {
    let Some(display) = Display::default() else {
        log::error!(target: "window", "No display available; skipping CSS");
        return;
    };
    let provider = CssProvider::new();
    provider.load_from_string(STYLE);
    gtk4::style_context_add_provider_for_display(
        &display,
        &provider,
        STYLE_PROVIDER_PRIORITY_APPLICATION,
    );
}

pub fn build_ui(app: &Application) {
    let (session_command_emitter, session_command_observer) = Channel::<SessionCommand>::new();
    let (session_event_emitter, session_event_observer) = Channel::<SessionEvent>::new();
    let (global_event_emitter, global_event_observer) = Channel::<GlobalEvent>::new();

    let settings = Rc::new(RefCell::new(Settings::load()));
    log::info!(target: "window", "Loaded settings: {:?}", settings.borrow());

    let window = Rc::new(
        ApplicationWindow::builder()
            .application(app)
            .title("Memory Game")
            .resizable(true)
            .default_width(800)
            .default_height(400)
            .build(),
    );
    install_css();

    let leaderboard = Rc::new(RefCell::new(Leaderboard::new()));
    let session_engine = SessionEngine::new(
        session_command_observer.clone(),
        session_command_emitter.clone(),
        session_event_emitter.clone(),
        global_event_observer.clone(),
        leaderboard.clone(),
        Rc::new(GlibScheduler),
        Rc::new(SystemClock),
        SessionConfig::from_settings(&settings.borrow()),
    );

    let game_controls_ui = GameControlsUI::new(
        session_event_observer.clone(),
        session_command_emitter.clone(),
        &settings,
    );
    let score_ui = ScoreUI::new(session_event_observer.clone());
    let sequence_display_ui = SequenceDisplayUI::new(session_event_observer.clone());
    let answer_input_ui = AnswerInputUI::new(
        session_event_observer.clone(),
        session_command_emitter.clone(),
        settings.borrow().difficulty.field_count(),
    );
    let leaderboard_ui = LeaderboardUI::new(session_event_observer.clone(), &leaderboard);
    let notice_dialog = NoticeDialog::new(
        &window,
        session_event_observer.clone(),
        session_command_emitter.clone(),
    );

    let header_bar = HeaderBar::new();
    let difficulty_box = gtk4::Box::builder()
        .name("difficulty-box")
        .orientation(Orientation::Horizontal)
        .spacing(5)
        .build();
    difficulty_box.append(&Label::new(Some("Difficulty:")));
    difficulty_box.append(&game_controls_ui.borrow().difficulty_selector);
    header_bar.pack_start(&difficulty_box);
    header_bar.pack_end(&score_ui.borrow().timer_label);
    window.set_titlebar(Some(&header_bar));

    let game_box = gtk4::Box::builder()
        .name("game-box")
        .orientation(Orientation::Vertical)
        .spacing(10)
        .hexpand(true)
        .margin_start(10)
        .margin_end(10)
        .margin_top(10)
        .margin_bottom(10)
        .build();
    game_box.append(&score_ui.borrow().score_label);
    game_box.append(&sequence_display_ui.borrow().label);
    game_box.append(&answer_input_ui.borrow().fields_box);
    game_box.append(&game_controls_ui.borrow().start_button);
    game_box.append(&answer_input_ui.borrow().submit_button);

    let top_level_box = gtk4::Box::builder()
        .name("top-level-box")
        .orientation(Orientation::Horizontal)
        .hexpand(true)
        .vexpand(true)
        .build();
    top_level_box.append(&game_box);
    top_level_box.append(&gtk4::Separator::new(Orientation::Vertical));
    top_level_box.append(&leaderboard_ui.borrow().panel);

    window.set_child(Some(&top_level_box));
    window.present();

    global_event_emitter.emit(GlobalEvent::SettingsChanged(settings.borrow().clone()));
    PlayerNameDialog::new(&window, session_command_emitter.clone(), &settings).show();

    window.connect_close_request(move |_| {
        log::trace!(target: "window", "Destroying window");
        if let Err(e) = settings.borrow().save() {
            log::error!(target: "window", "Failed to save settings: {}", e);
        }
        session_engine.borrow_mut().destroy();
        game_controls_ui.borrow_mut().destroy();
        score_ui.borrow_mut().destroy();
        sequence_display_ui.borrow_mut().destroy();
        answer_input_ui.borrow_mut().destroy();
        leaderboard_ui.borrow_mut().destroy();
        notice_dialog.borrow_mut().destroy();
        glib::signal::Propagation::Proceed
    });
}
