use thiserror::Error;

use crate::{email_address::EmailAddress, macros::nutype_string};

/// The contact form exactly as it was posted. Absent fields are empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedbackForm {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

/// A contact form submission that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackSubmission {
    pub author: FeedbackAuthor,
    pub subject: FeedbackSubject,
    pub content: FeedbackContent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackAuthor {
    pub name: FeedbackAuthorName,
    pub email: EmailAddress,
}

// Upper bounds keep a single notification email well below common relay
// size limits.
nutype_string!(FeedbackAuthorName(
    sanitize(trim),
    validate(not_empty, len_char_max = 1024)
));

nutype_string!(FeedbackSubject(
    sanitize(trim),
    validate(not_empty, len_char_max = 1024)
));

nutype_string!(FeedbackContent(
    sanitize(trim),
    validate(not_empty, len_char_max = 65536)
));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackField {
    Name,
    Email,
    Subject,
    Message,
}

impl std::fmt::Display for FeedbackField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Subject => "subject",
            Self::Message => "message",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FeedbackValidationError {
    #[error("The {0} field is empty.")]
    Empty(FeedbackField),
    #[error("The {0} field is too long.")]
    TooLong(FeedbackField),
    #[error("The email address is invalid.")]
    InvalidEmail,
}

impl TryFrom<FeedbackForm> for FeedbackSubmission {
    type Error = FeedbackValidationError;

    fn try_from(form: FeedbackForm) -> Result<Self, Self::Error> {
        let name = required(FeedbackField::Name, form.name, FeedbackAuthorName::try_new)?;
        let email = required(FeedbackField::Email, form.email, |email| {
            email.trim().parse::<EmailAddress>()
        })
        .map_err(|err| match err {
            FeedbackValidationError::TooLong(_) => FeedbackValidationError::InvalidEmail,
            err => err,
        })?;
        let subject = required(FeedbackField::Subject, form.subject, FeedbackSubject::try_new)?;
        let content = required(FeedbackField::Message, form.message, FeedbackContent::try_new)?;

        Ok(Self {
            author: FeedbackAuthor { name, email },
            subject,
            content,
        })
    }
}

/// Any error other than an empty value is reported as [`FeedbackValidationError::TooLong`].
fn required<T, E>(
    field: FeedbackField,
    value: String,
    parse: impl FnOnce(String) -> Result<T, E>,
) -> Result<T, FeedbackValidationError> {
    if value.trim().is_empty() {
        return Err(FeedbackValidationError::Empty(field));
    }
    parse(value).map_err(|_| FeedbackValidationError::TooLong(field))
}
