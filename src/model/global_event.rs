use crate::game::settings::Settings;

/// Events that are not specific to any one component of the game.
#[derive(Debug)]
pub enum GlobalEvent {
    SettingsChanged(Settings),
}
