//! Registration draft and response types.

use secrecy::{ExposeSecret, SecretString};
use std::fmt;

/// MIME type of captured photos.
pub const PHOTO_MIME_TYPE: &str = "image/png";

/// File name attached to the photo part of the upload.
pub const PHOTO_FILE_NAME: &str = "photo.png";

/// One of the text inputs of the registration form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DraftField {
    FirstName,
    LastName,
    Username,
    PassPhrase,
}

impl DraftField {
    /// All text fields, in form order.
    pub const ALL: [DraftField; 4] = [
        DraftField::FirstName,
        DraftField::LastName,
        DraftField::Username,
        DraftField::PassPhrase,
    ];

    /// Name of the multipart part carrying this field.
    pub fn name(&self) -> &'static str {
        match self {
            DraftField::FirstName => "first_name",
            DraftField::LastName => "last_name",
            DraftField::Username => "username",
            DraftField::PassPhrase => "pass_phrase",
        }
    }

    /// Human readable label, used as input placeholder.
    pub fn label(&self) -> &'static str {
        match self {
            DraftField::FirstName => "First Name",
            DraftField::LastName => "Last Name",
            DraftField::Username => "Username",
            DraftField::PassPhrase => "Pass Phrase",
        }
    }

    /// Look up a field by its input name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }

    /// Whether the input should be masked.
    pub fn is_secret(&self) -> bool {
        matches!(self, DraftField::PassPhrase)
    }
}

impl fmt::Display for DraftField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A captured PNG image.
#[derive(Clone, PartialEq, Eq)]
pub struct Photo {
    bytes: Vec<u8>,
    width: u32,
    height: u32,
}

impl Photo {
    pub fn new(bytes: Vec<u8>, width: u32, height: u32) -> Self {
        Self {
            bytes,
            width,
            height,
        }
    }

    /// Encoded PNG bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn mime_type(&self) -> &'static str {
        PHOTO_MIME_TYPE
    }
}

impl fmt::Debug for Photo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Photo")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("png_bytes", &self.bytes.len())
            .finish()
    }
}

/// The not-yet-submitted registration record.
///
/// Every text field starts empty and the photo stays absent until a
/// capture completes. Edits are last-write-wins per field.
pub struct RegistrationDraft {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub pass_phrase: SecretString,
    pub photo: Option<Photo>,
}

impl RegistrationDraft {
    pub fn new() -> Self {
        Self {
            first_name: String::new(),
            last_name: String::new(),
            username: String::new(),
            pass_phrase: SecretString::new(String::new()),
            photo: None,
        }
    }

    /// Overwrite a single text field.
    pub fn set(&mut self, field: DraftField, value: impl Into<String>) {
        let value = value.into();
        match field {
            DraftField::FirstName => self.first_name = value,
            DraftField::LastName => self.last_name = value,
            DraftField::Username => self.username = value,
            DraftField::PassPhrase => self.pass_phrase = SecretString::new(value),
        }
    }

    /// Current value of a text field.
    pub fn get(&self, field: DraftField) -> &str {
        match field {
            DraftField::FirstName => &self.first_name,
            DraftField::LastName => &self.last_name,
            DraftField::Username => &self.username,
            DraftField::PassPhrase => self.pass_phrase.expose_secret(),
        }
    }

    /// Replace the photo with a new capture.
    pub fn set_photo(&mut self, photo: Photo) {
        self.photo = Some(photo);
    }

    /// Required text fields that are still empty or blank.
    pub fn missing_fields(&self) -> Vec<DraftField> {
        DraftField::ALL
            .into_iter()
            .filter(|f| self.get(*f).trim().is_empty())
            .collect()
    }
}

impl Default for RegistrationDraft {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for RegistrationDraft {
    fn clone(&self) -> Self {
        Self {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            username: self.username.clone(),
            pass_phrase: SecretString::new(self.pass_phrase.expose_secret().clone()),
            photo: self.photo.clone(),
        }
    }
}

impl fmt::Debug for RegistrationDraft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationDraft")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("username", &self.username)
            .field("pass_phrase", &"[REDACTED]")
            .field("photo", &self.photo)
            .finish()
    }
}

/// Server reply to a registration attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationResponse {
    /// HTTP status code.
    pub status: u16,
    /// Full response body, shown to the user as is.
    pub message: String,
}

impl RegistrationResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_defaults_empty() {
        let draft = RegistrationDraft::new();
        for field in DraftField::ALL {
            assert_eq!(draft.get(field), "");
        }
        assert!(draft.photo.is_none());
        assert_eq!(draft.missing_fields().len(), 4);
    }

    #[test]
    fn test_last_write_wins() {
        let mut draft = RegistrationDraft::new();
        draft.set(DraftField::FirstName, "A");
        draft.set(DraftField::Username, "alice");
        draft.set(DraftField::FirstName, "Alice");
        draft.set(DraftField::PassPhrase, "one");
        draft.set(DraftField::PassPhrase, "two words");

        assert_eq!(draft.get(DraftField::FirstName), "Alice");
        assert_eq!(draft.get(DraftField::LastName), "");
        assert_eq!(draft.get(DraftField::Username), "alice");
        assert_eq!(draft.get(DraftField::PassPhrase), "two words");
        assert_eq!(draft.missing_fields(), vec![DraftField::LastName]);
    }

    #[test]
    fn test_blank_field_counts_as_missing() {
        let mut draft = RegistrationDraft::new();
        draft.set(DraftField::FirstName, "Ada");
        draft.set(DraftField::LastName, "Lovelace");
        draft.set(DraftField::Username, "   ");
        draft.set(DraftField::PassPhrase, "words");

        assert_eq!(draft.missing_fields(), vec![DraftField::Username]);
    }

    #[test]
    fn test_set_photo_overwrites() {
        let mut draft = RegistrationDraft::new();
        draft.set_photo(Photo::new(vec![1], 1, 1));
        draft.set_photo(Photo::new(vec![2, 2], 2, 1));

        let photo = draft.photo.as_ref().unwrap();
        assert_eq!(photo.bytes(), &[2, 2]);
        assert_eq!(photo.width(), 2);
    }

    #[test]
    fn test_field_names_round_trip() {
        assert_eq!(DraftField::from_name("pass_phrase"), Some(DraftField::PassPhrase));
        assert_eq!(DraftField::from_name("first_name"), Some(DraftField::FirstName));
        assert_eq!(DraftField::from_name("email"), None);
    }

    #[test]
    fn test_debug_redacts_pass_phrase() {
        let mut draft = RegistrationDraft::new();
        draft.set(DraftField::PassPhrase, "hunter2");

        let printed = format!("{:?}", draft);
        assert!(!printed.contains("hunter2"));
        assert!(printed.contains("REDACTED"));
    }

    #[test]
    fn test_response_success_range() {
        let ok = RegistrationResponse {
            status: 201,
            message: "Welcome!".into(),
        };
        let conflict = RegistrationResponse {
            status: 409,
            message: "Username taken".into(),
        };
        assert!(ok.is_success());
        assert!(!conflict.is_success());
    }
}
