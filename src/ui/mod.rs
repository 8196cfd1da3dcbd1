pub mod answer_input_ui;
pub mod game_controls_ui;
pub mod glib_scheduler;
pub mod leaderboard_ui;
pub mod notice_dialog;
pub mod player_name_dialog;
pub mod score_ui;
pub mod sequence_display_ui;
pub mod window;
