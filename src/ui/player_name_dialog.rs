use std::{cell::Cell, cell::RefCell, rc::Rc};

use glib::Propagation;
use gtk4::prelude::*;
use gtk4::{ApplicationWindow, Entry, Label};

use crate::{
    events::EventEmitter,
    game::settings::Settings,
    model::{normalize_player_name, SessionCommand},
};

/// Asks for the player's name at startup. Cancelling plays as the default player.
pub struct PlayerNameDialog {
    window: Rc<ApplicationWindow>,
    session_command_emitter: EventEmitter<SessionCommand>,
    settings: Rc<RefCell<Settings>>,
}

impl PlayerNameDialog {
    pub fn new(
        window: &Rc<ApplicationWindow>,
        session_command_emitter: EventEmitter<SessionCommand>,
        settings: &Rc<RefCell<Settings>>,
    ) -> Self {
        Self {
            window: window.clone(),
            session_command_emitter,
            settings: settings.clone(),
        }
    }

    pub fn show(&self) {
        let content_area = gtk4::Box::builder()
            .orientation(gtk4::Orientation::Vertical)
            .spacing(10)
            .margin_bottom(10)
            .margin_top(10)
            .margin_start(20)
            .margin_end(20)
            .build();
        let dialog = gtk4::Window::builder()
            .title("Player")
            .transient_for(self.window.as_ref())
            .child(&content_area)
            .modal(true)
            .build();

        content_area.append(&Label::new(Some("Enter your name:")));
        let entry = Entry::builder()
            .text(self.settings.borrow().player_name.clone().unwrap_or_default())
            .activates_default(true)
            .build();
        content_area.append(&entry);

        let buttons = gtk4::Box::builder()
            .orientation(gtk4::Orientation::Horizontal)
            .halign(gtk4::Align::End)
            .spacing(10)
            .build();
        content_area.append(&buttons);

        let cancel_button = gtk4::Button::builder().label("Cancel").build();
        buttons.append(&cancel_button);
        let ok_button = gtk4::Button::builder().label("OK").build();
        buttons.append(&ok_button);
        dialog.set_default_widget(Some(&ok_button));

        let ok_clicked = Rc::new(Cell::new(false));

        cancel_button.connect_clicked({
            let dialog = dialog.clone();
            move |_| {
                dialog.close();
            }
        });

        ok_button.connect_clicked({
            let dialog = dialog.clone();
            let ok_clicked = ok_clicked.clone();
            move |_| {
                ok_clicked.set(true);
                dialog.close();
            }
        });

        dialog.connect_close_request({
            let session_command_emitter = self.session_command_emitter.clone();
            let settings = self.settings.clone();
            move |_| {
                if ok_clicked.get() {
                    let name = normalize_player_name(entry.text().as_str());
                    settings.borrow_mut().player_name = Some(name.clone());
                    if let Err(e) = settings.borrow().save() {
                        log::error!(target: "player_name_dialog", "Failed to save settings: {}", e);
                    }
                    session_command_emitter.emit(SessionCommand::SetPlayerName(name));
                } else {
                    session_command_emitter.emit(SessionCommand::SetPlayerName(String::new()));
                }
                Propagation::Proceed
            }
        });

        dialog.present();
    }
}
