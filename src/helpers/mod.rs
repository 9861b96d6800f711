pub mod record_helpers;
pub mod song_helpers;
