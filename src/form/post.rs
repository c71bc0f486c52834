use std::path::Path;

use axum::body::Bytes;
use axum::extract::Multipart;
use uuid::Uuid;
use validator::Validate;

use crate::error::Error;

/// The text/group parts of a post submission, shared by create and edit.
#[derive(Clone, Debug, Default, Validate)]
pub struct PostForm {
    #[validate(custom(
        function = crate::form::not_blank,
        message = "The post text must not be blank"
    ))]
    pub text: String,

    pub group: Option<i32>,
}

impl PostForm {
    /// Whether the given group is the one picked in this submission, for
    /// the select box in the form template.
    pub fn is_selected(&self, group_id: i32) -> bool {
        self.group == Some(group_id)
    }
}

/// An image file attached to a post submission, held in memory until the
/// rest of the form validates.
#[derive(Clone, Debug)]
pub struct ImageUpload {
    pub original_name: String,
    pub data: Bytes,
}

impl ImageUpload {
    /// Write the file under `media_dir` and return the stored file name.
    pub async fn persist(&self, media_dir: &Path) -> anyhow::Result<String> {
        let file_name = match Path::new(&self.original_name)
            .extension()
            .and_then(|ext| ext.to_str())
        {
            Some(ext) => format!("{}.{}", Uuid::new_v4(), ext),
            None => Uuid::new_v4().to_string(),
        };

        tokio::fs::create_dir_all(media_dir).await?;
        tokio::fs::write(media_dir.join(&file_name), &self.data).await?;

        Ok(file_name)
    }
}

/// A parsed multipart post submission.
#[derive(Clone, Debug, Default)]
pub struct PostSubmission {
    pub form: PostForm,
    pub image: Option<ImageUpload>,
}

impl PostSubmission {
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, Error> {
        let mut submission = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|_| Error::BadRequest)?
        {
            match field.name() {
                Some("text") => {
                    submission.form.text = field.text().await.map_err(|_| Error::BadRequest)?;
                }
                Some("group") => {
                    let value = field.text().await.map_err(|_| Error::BadRequest)?;
                    // The form's "no group" option submits an empty value.
                    submission.form.group = value.trim().parse().ok();
                }
                Some("image") => {
                    let original_name = field.file_name().map(str::to_owned);
                    let data = field.bytes().await.map_err(|_| Error::BadRequest)?;
                    if let Some(original_name) = original_name {
                        if !data.is_empty() {
                            submission.image = Some(ImageUpload {
                                original_name,
                                data,
                            });
                        }
                    }
                }
                _ => {}
            }
        }

        Ok(submission)
    }
}
