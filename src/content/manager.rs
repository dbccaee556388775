use std::path::{Path, PathBuf};

use tracing::{error, info};
use uuid::Uuid;

use crate::database::Database;
use crate::error::Error;

use super::Content;

const MAX_EXTENSION_LEN: usize = 10;

/// The current content, or `None` when it was never saved or cannot be read.
/// Read faults are logged rather than returned.
#[tracing::instrument(skip(db))]
pub async fn get_content(db: &dyn Database) -> Option<Content> {
    match db.content().load().await {
        Ok(content) => content,
        Err(err) => {
            error!(error = %err, "failed to load content, treating as absent");
            None
        }
    }
}

#[tracing::instrument(skip(db))]
pub async fn put_content(db: &dyn Database, content: Content) -> Result<(), Error> {
    db.content().save(&content).await?;

    Ok(())
}

/// Stores an uploaded image under a fresh name that keeps the original
/// extension and returns its public url.
#[tracing::instrument(skip(bytes), fields(size = bytes.len()))]
pub async fn upload_image(
    upload_dir: &Path,
    public_base_url: &str,
    file_name: &str,
    bytes: &[u8],
) -> Result<String, Error> {
    if bytes.is_empty() {
        return Err(Error::EmptyUpload);
    }

    let extension = upload_extension(file_name).ok_or_else(|| Error::InvalidFileName {
        file_name: file_name.to_string(),
    })?;
    let stored_name = format!("{}.{}", Uuid::new_v4(), extension);

    tokio::fs::create_dir_all(upload_dir).await?;
    tokio::fs::write(upload_dir.join(&stored_name), bytes).await?;

    let url = format!(
        "{}/uploads/{}",
        public_base_url.trim_end_matches('/'),
        stored_name
    );
    info!(%url, "image uploaded");

    Ok(url)
}

/// Resolves a stored upload name to its path, refusing anything that could
/// point outside the upload directory.
pub fn upload_path(upload_dir: &Path, file_name: &str) -> Result<PathBuf, Error> {
    let is_plain = !file_name.is_empty()
        && !file_name.starts_with('.')
        && file_name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.');

    if !is_plain || file_name.contains("..") {
        return Err(Error::InvalidFileName {
            file_name: file_name.to_string(),
        });
    }

    Ok(upload_dir.join(file_name))
}

fn upload_extension(file_name: &str) -> Option<String> {
    let extension = Path::new(file_name).extension()?.to_str()?;

    if extension.is_empty()
        || extension.len() > MAX_EXTENSION_LEN
        || !extension.chars().all(|c| c.is_ascii_alphanumeric())
    {
        return None;
    }

    Some(extension.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ImageData;
    use crate::database::test::MemoryDatabase;
    use crate::database::FileDatabase;

    fn content() -> Content {
        Content {
            shop_name: "居酒屋「高橋」".to_string(),
            message: "Help us open our doors this summer.".to_string(),
            deadline: "2024-06-30".to_string(),
            images: vec![ImageData {
                id: "1".to_string(),
                url: "http://localhost:8080/uploads/a.jpg".to_string(),
            }],
            line_qr_code: "http://localhost:8080/uploads/qr.png".to_string(),
            line_friend_url: "https://lin.ee/abcdefg".to_string(),
        }
    }

    fn temp_dir() -> PathBuf {
        std::env::temp_dir().join(format!("pledge-content-{}", Uuid::new_v4()))
    }

    #[tokio::test]
    async fn absent_content_is_none() {
        let db = MemoryDatabase::new();

        assert_eq!(get_content(&db).await, None);
    }

    #[tokio::test]
    async fn put_replaces_everything() {
        let db = MemoryDatabase::new();
        put_content(&db, content()).await.unwrap();

        let replacement = Content {
            shop_name: "Takahashi".to_string(),
            ..Content::default()
        };
        put_content(&db, replacement.clone()).await.unwrap();

        assert_eq!(get_content(&db).await, Some(replacement));
    }

    #[tokio::test]
    async fn corrupt_content_is_none() {
        let dir = temp_dir();
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("content.json"), "{ \"shopName\": ").unwrap();
        let db = FileDatabase::new(&dir);

        assert_eq!(get_content(&db).await, None);
    }

    #[tokio::test]
    async fn older_documents_without_line_fields_load() {
        let dir = temp_dir();
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join("content.json"),
            r#"{"shopName": "Takahashi", "message": "Hello", "deadline": "2024-06-30", "imageUrl": "/a.jpg"}"#,
        )
        .unwrap();
        let db = FileDatabase::new(&dir);

        let content = get_content(&db).await.unwrap();

        assert_eq!(content.shop_name, "Takahashi");
        assert!(content.images.is_empty());
        assert_eq!(content.line_friend_url, "");
    }

    #[tokio::test]
    async fn uploads_keep_extension_and_return_public_url() {
        let dir = temp_dir();

        let url = upload_image(&dir, "http://example.com/", "Shop Front.JPG", b"jpeg bytes")
            .await
            .unwrap();

        assert!(url.starts_with("http://example.com/uploads/"));
        assert!(url.ends_with(".jpg"));
        let stored_name = url.rsplit('/').next().unwrap();
        assert_eq!(std::fs::read(dir.join(stored_name)).unwrap(), b"jpeg bytes");
    }

    #[tokio::test]
    async fn uploads_need_content_and_extension() {
        let dir = temp_dir();

        assert_eq!(
            upload_image(&dir, "http://example.com", "a.png", b"").await,
            Err(Error::EmptyUpload)
        );
        assert_eq!(
            upload_image(&dir, "http://example.com", "noextension", b"x").await,
            Err(Error::InvalidFileName {
                file_name: "noextension".to_string()
            })
        );
    }

    #[test]
    fn upload_paths_stay_inside_the_directory() {
        let dir = Path::new("/srv/uploads");

        assert_eq!(
            upload_path(dir, "3f2a.png").unwrap(),
            PathBuf::from("/srv/uploads/3f2a.png")
        );
        for name in ["../secret", "a/b.png", ".hidden", "", "a..png"] {
            assert!(upload_path(dir, name).is_err(), "{:?}", name);
        }
    }
}
