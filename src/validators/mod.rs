pub mod artist_request_form;
pub mod multipart;
pub mod song_form;
pub mod user_validator;
