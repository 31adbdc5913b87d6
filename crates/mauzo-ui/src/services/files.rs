//! Browser file plumbing: triggering downloads and reading picked files.

use gloo::file::{Blob, ObjectUrl};
use wasm_bindgen::JsCast;

/// Errors raised by the browser file APIs.
#[derive(Debug, thiserror::Error)]
pub enum FilesError {
    /// No window or document to work with.
    #[error("browser window unavailable")]
    NoWindow,
    /// The download anchor could not be created.
    #[error("could not create download link")]
    Dom,
    /// The picked file could not be read as text.
    #[error("could not read file")]
    Read,
}

/// Offer text to the user as a named download.
///
/// # Errors
/// Returns a [`FilesError`] when the document or anchor element is
/// unavailable.
pub fn download_text(filename: &str, text: &str, mime: &str) -> Result<(), FilesError> {
    let blob = Blob::new_with_options(text, Some(mime));
    let url = ObjectUrl::from(blob);
    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or(FilesError::NoWindow)?;
    let anchor: web_sys::HtmlAnchorElement = document
        .create_element("a")
        .map_err(|_| FilesError::Dom)?
        .dyn_into()
        .map_err(|_| FilesError::Dom)?;
    anchor.set_href(&url);
    anchor.set_download(filename);
    anchor.click();
    Ok(())
}

/// Read a picked file as UTF-8 text.
///
/// # Errors
/// Returns [`FilesError::Read`] when the read fails or the content is not
/// text.
pub async fn read_file_text(file: &web_sys::File) -> Result<String, FilesError> {
    let value = wasm_bindgen_futures::JsFuture::from(file.text())
        .await
        .map_err(|_| FilesError::Read)?;
    value.as_string().ok_or(FilesError::Read)
}
