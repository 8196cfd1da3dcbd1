use std::{cell::RefCell, collections::VecDeque, rc::Rc};

use glib::Propagation;
use gtk4::{
    gdk::Key,
    prelude::{BoxExt, ButtonExt, GtkWindowExt, WidgetExt},
    ApplicationWindow, EventControllerKey, Label,
};

use crate::{
    destroyable::Destroyable,
    events::{EventEmitter, EventObserver, Unsubscriber},
    model::{Notice, SessionCommand, SessionEvent},
};

/// Shows session notices one modal message at a time, in arrival order.
/// Dismissing the correct-answer notice lets the session move on.
pub struct NoticeDialog {
    window: Rc<ApplicationWindow>,
    session_command_emitter: EventEmitter<SessionCommand>,
    queue: VecDeque<Notice>,
    showing: bool,
    subscription: Option<Unsubscriber<SessionEvent>>,
}

impl Destroyable for NoticeDialog {
    fn destroy(&mut self) {
        self.queue.clear();
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
    }
}

impl NoticeDialog {
    pub fn new(
        window: &Rc<ApplicationWindow>,
        session_event_observer: EventObserver<SessionEvent>,
        session_command_emitter: EventEmitter<SessionCommand>,
    ) -> Rc<RefCell<Self>> {
        let notice_dialog = Rc::new(RefCell::new(Self {
            window: window.clone(),
            session_command_emitter,
            queue: VecDeque::new(),
            showing: false,
            subscription: None,
        }));

        let notice_dialog_moved = notice_dialog.clone();
        let subscription = session_event_observer.subscribe(move |event| {
            if let SessionEvent::Notice(notice) = event {
                let mut dialog = notice_dialog_moved.borrow_mut();
                dialog.queue.push_back(*notice);
                dialog.show_next(&notice_dialog_moved);
            }
        });
        notice_dialog.borrow_mut().subscription = Some(subscription);
        notice_dialog
    }

    fn show_next(&mut self, notice_dialog: &Rc<RefCell<Self>>) {
        if self.showing {
            return;
        }
        let Some(notice) = self.queue.pop_front() else {
            return;
        };
        self.showing = true;

        let content_area = gtk4::Box::builder()
            .orientation(gtk4::Orientation::Vertical)
            .spacing(10)
            .margin_bottom(10)
            .margin_top(10)
            .margin_start(20)
            .margin_end(20)
            .build();
        let dialog = gtk4::Window::builder()
            .title("Message")
            .transient_for(self.window.as_ref())
            .child(&content_area)
            .modal(true)
            .build();

        content_area.append(&Label::new(Some(notice.message())));

        let ok_button = gtk4::Button::builder()
            .label("OK")
            .halign(gtk4::Align::End)
            .build();
        content_area.append(&ok_button);

        ok_button.connect_clicked({
            let dialog = dialog.clone();
            move |_| {
                dialog.close();
            }
        });

        let key_controller = EventControllerKey::new();
        key_controller.connect_key_pressed({
            let dialog = dialog.clone();
            move |_, keyval, _, _| {
                if keyval == Key::Escape {
                    dialog.close();
                    return Propagation::Stop;
                }
                Propagation::Proceed
            }
        });
        dialog.add_controller(key_controller);

        dialog.connect_close_request({
            let notice_dialog_weak = Rc::downgrade(notice_dialog);
            move |_| {
                if let Some(notice_dialog) = notice_dialog_weak.upgrade() {
                    let session_command_emitter = {
                        let mut this = notice_dialog.borrow_mut();
                        this.showing = false;
                        this.session_command_emitter.clone()
                    };
                    if notice == Notice::Correct {
                        session_command_emitter.emit(SessionCommand::ContinueRound);
                    }
                    notice_dialog.borrow_mut().show_next(&notice_dialog);
                }
                Propagation::Proceed
            }
        });

        dialog.present();
        ok_button.grab_focus();
    }
}
