use crate::{
    error::{Error, Result},
    models::artist_request::ArtistApplication,
    validators::{
        multipart::{MultipartForm, UploadedFile},
        song_form::parse_genre,
        user_validator::{is_valid_email, normalize_email},
    },
};

const MAX_BIO_LEN: usize = 2000;

/// Typed artist-request body. The image is mandatory on creation only.
#[derive(Debug, Clone)]
pub struct ArtistRequestForm {
    pub application: ArtistApplication,
    pub profile_image: Option<UploadedFile>,
}

impl ArtistRequestForm {
    pub fn from_multipart(mut form: MultipartForm, require_image: bool) -> Result<Self> {
        let mut messages = Vec::new();

        let full_name = form.text("fullName");
        if full_name.is_none() {
            messages.push("Full name is required".to_string());
        }

        let stage_name = form.text("stageName");
        match &stage_name {
            None => messages.push("Stage name is required".to_string()),
            Some(name) if !(2..=50).contains(&name.chars().count()) => {
                messages.push("Stage name must be 2 to 50 characters".to_string())
            }
            Some(_) => {}
        }

        let email = form.text("email").map(|e| normalize_email(&e));
        match &email {
            None => messages.push("Email is required".to_string()),
            Some(e) if !is_valid_email(e) => messages.push("Email is invalid".to_string()),
            Some(_) => {}
        }

        let bio = form.text("bio");
        if bio.as_ref().is_some_and(|b| b.chars().count() > MAX_BIO_LEN) {
            messages.push(format!("Bio must be at most {MAX_BIO_LEN} characters"));
        }

        let genre = match form.text("genre") {
            None => None,
            Some(raw) => match parse_genre(&raw) {
                Ok(genre) => Some(genre),
                Err(message) => {
                    messages.push(message);
                    None
                }
            },
        };

        let profile_image = form.take_file("profileImage");
        match &profile_image {
            None if require_image => messages.push("Profile image is required".to_string()),
            Some(f) if !f.is_image() => messages.push("Profile image must be an image".to_string()),
            _ => {}
        }

        match (full_name, stage_name, email) {
            (Some(full_name), Some(stage_name), Some(email)) if messages.is_empty() => Ok(Self {
                application: ArtistApplication {
                    full_name,
                    stage_name,
                    email,
                    phone: form.text("phone"),
                    bio,
                    genre,
                    social_links: form.text("socialLinks"),
                },
                profile_image,
            }),
            _ => Err(Error::Validation { messages }),
        }
    }
}
