mod comment;
mod post;

pub use comment::*;
pub use post::*;

use validator::{ValidationError, ValidationErrors, ValidationErrorsKind};

/// Reject strings that are empty once surrounding whitespace is stripped.
pub fn not_blank(text: &str) -> Result<(), ValidationError> {
    if text.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }

    Ok(())
}

/// Flatten field errors into the message list the form templates render.
pub fn error_messages(validation: ValidationErrors) -> Vec<String> {
    let mut messages = Vec::new();
    for (_, info) in validation.into_errors() {
        if let ValidationErrorsKind::Field(errors) = info {
            for error in errors {
                messages.push(error.to_string());
            }
        }
    }

    messages
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn blank_text_is_rejected() {
        assert!(not_blank("").is_err());
        assert!(not_blank("   \n\t ").is_err());
        assert!(not_blank("hello").is_ok());
        assert!(not_blank("  padded  ").is_ok());
    }

    #[test]
    fn post_form_surfaces_the_blank_message() {
        let form = PostForm {
            text: "   ".to_string(),
            group: None,
        };
        let errors = error_messages(form.validate().unwrap_err());
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("must not be blank"));
    }

    #[test]
    fn comment_form_accepts_real_text() {
        let form = CommentForm {
            text: "nice post".to_string(),
        };
        assert!(form.validate().is_ok());
    }
}
