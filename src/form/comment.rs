use serde::Deserialize;
use validator::Validate;

#[derive(Clone, Debug, Default, Deserialize, Validate)]
pub struct CommentForm {
    #[validate(custom(
        function = crate::form::not_blank,
        message = "The comment text must not be blank"
    ))]
    pub text: String,
}
