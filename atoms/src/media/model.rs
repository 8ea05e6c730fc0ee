use serde::{Deserialize, Serialize};

/// Image captured at a marker. The binary lives in S3; this only points at it.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Image {
    #[serde(rename = "dateTaken")]
    pub date_taken: String,
    #[serde(rename = "imageURL", alias = "imageUrl")]
    pub image_url: String,
    #[serde(rename = "s3_key", alias = "s3Key")]
    pub s3_key: String,
    #[serde(rename = "s3_bucket_name", alias = "s3BucketName")]
    pub s3_bucket_name: String,
}

impl Image {
    pub fn new(
        date_taken: impl Into<String>,
        image_url: impl Into<String>,
        s3_key: impl Into<String>,
        s3_bucket_name: impl Into<String>,
    ) -> Self {
        Self {
            date_taken: date_taken.into(),
            image_url: image_url.into(),
            s3_key: s3_key.into(),
            s3_bucket_name: s3_bucket_name.into(),
        }
    }
}
