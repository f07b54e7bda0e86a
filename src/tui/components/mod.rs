// Components module - reusable UI building blocks
//
// Shell components are rendered in every view:
// - Title bar: app name, session, like spinner
// - Status bar: key hints
// - Side panels: leaderboard and logs

pub mod formatters;
pub mod leaderboard_panel;
pub mod logs_panel;
pub mod status_bar;
pub mod title_bar;
pub mod toast;

pub use toast::Toast;
