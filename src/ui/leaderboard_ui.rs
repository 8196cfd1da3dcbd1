use chrono::{Local, TimeZone};
use gtk4::prelude::*;
use gtk4::{Grid, Label, Orientation};
use std::{cell::RefCell, rc::Rc};

use crate::destroyable::Destroyable;
use crate::events::{EventObserver, Unsubscriber};
use crate::game::leaderboard::Leaderboard;
use crate::model::{LeaderboardEntry, SessionEvent};

const HEADERS: [&str; 3] = ["Player", "Highest Score", "Time"];

/// Right-hand panel rendering the single leaderboard row.
pub struct LeaderboardUI {
    pub panel: gtk4::Box,
    player_label: Label,
    score_label: Label,
    time_label: Label,
    recorded_label: Label,
    subscription: Option<Unsubscriber<SessionEvent>>,
}

impl Destroyable for LeaderboardUI {
    fn destroy(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
    }
}

impl LeaderboardUI {
    pub fn new(
        session_event_observer: EventObserver<SessionEvent>,
        leaderboard: &Rc<RefCell<Leaderboard>>,
    ) -> Rc<RefCell<Self>> {
        let panel = gtk4::Box::builder()
            .name("leaderboard-panel")
            .orientation(Orientation::Vertical)
            .spacing(10)
            .margin_start(10)
            .margin_end(10)
            .margin_top(10)
            .build();

        let title = Label::new(Some("Leaderboard"));
        title.set_markup("<b>Leaderboard</b>");
        panel.append(&title);

        let grid = Grid::new();
        grid.set_row_spacing(5);
        grid.set_column_spacing(10);
        for (i, header) in HEADERS.iter().enumerate() {
            let label = Label::new(Some(*header));
            label.set_markup(&format!("<b>{}</b>", header));
            grid.attach(&label, i as i32, 0, 1, 1);
        }

        let player_label = Label::new(None);
        player_label.set_halign(gtk4::Align::Start);
        grid.attach(&player_label, 0, 1, 1, 1);
        let score_label = Label::new(None);
        score_label.set_halign(gtk4::Align::End);
        grid.attach(&score_label, 1, 1, 1, 1);
        let time_label = Label::new(None);
        time_label.set_halign(gtk4::Align::End);
        grid.attach(&time_label, 2, 1, 1, 1);
        panel.append(&grid);

        let recorded_label = Label::new(None);
        recorded_label.set_css_classes(&["dim-label"]);
        panel.append(&recorded_label);

        let leaderboard_ui = Rc::new(RefCell::new(Self {
            panel,
            player_label,
            score_label,
            time_label,
            recorded_label,
            subscription: None,
        }));
        leaderboard_ui
            .borrow()
            .render(leaderboard.borrow().latest());

        let leaderboard_ui_moved = leaderboard_ui.clone();
        let leaderboard = leaderboard.clone();
        let subscription = session_event_observer.subscribe(move |event| {
            if let SessionEvent::LeaderboardUpdated(_) = event {
                leaderboard_ui_moved
                    .borrow()
                    .render(leaderboard.borrow().latest());
            }
        });
        leaderboard_ui.borrow_mut().subscription = Some(subscription);
        leaderboard_ui
    }

    fn render(&self, entry: Option<&LeaderboardEntry>) {
        match entry {
            Some(entry) => {
                self.player_label.set_text(&entry.player_name);
                self.score_label.set_text(&entry.score.to_string());
                self.time_label.set_text(&entry.time_label());
                let recorded = Local
                    .timestamp_opt(entry.timestamp, 0)
                    .single()
                    .map(|dt| dt.format("%H:%M:%S").to_string())
                    .unwrap_or_else(|| "Unknown".to_string());
                self.recorded_label.set_text(&format!(
                    "{} difficulty, recorded at {}",
                    entry.difficulty, recorded
                ));
            }
            None => {
                self.player_label.set_text("");
                self.score_label.set_text("");
                self.time_label.set_text("");
                self.recorded_label.set_text("No games finished yet");
            }
        }
    }
}
