//! Browser-native saving of stylized images and their descriptions.
//!
//! On the web everything goes through a transient anchor over a blob URL; on
//! native targets (used by the test harness and any future desktop shell)
//! payloads land in a per-user export directory instead.

use crate::core::occasion::Occasion;

/// Strips the final extension: `look.jpg` -> `look`. Names without a dot are
/// returned unchanged.
pub fn base_name(name: &str) -> &str {
    match name.rsplit_once('.') {
        Some((base, _)) if !base.is_empty() => base,
        _ => name,
    }
}

/// `{base-name}-{occasion}.jpg` for a saved stylized image.
pub fn image_filename(image_name: &str, occasion: Occasion) -> String {
    format!("{}-{}.jpg", base_name(image_name), occasion.slug())
}

/// `{image-name}-{occasion}-description.txt` for a saved description.
pub fn description_filename(image_name: &str, occasion: Occasion) -> String {
    format!("{image_name}-{}-description.txt", occasion.slug())
}

/// Fetches a stylized image and hands it to the browser as a download. When
/// the fetch fails the anchor falls back to the remote URL directly — best
/// effort, no integrity check.
pub async fn download_image(url: &str, filename: &str) -> Result<(), String> {
    #[cfg(target_arch = "wasm32")]
    {
        use gloo_net::http::Request;

        let fetched: Result<Vec<u8>, String> = async {
            let response = Request::get(url)
                .send()
                .await
                .map_err(|err| err.to_string())?;
            if !response.ok() {
                return Err(format!("fetch returned {}", response.status()));
            }
            response.binary().await.map_err(|err| err.to_string())
        }
        .await;

        match fetched {
            Ok(bytes) => download_bytes(filename, "image/jpeg", bytes).map(|_| ()),
            Err(err) => {
                tracing::warn!(%err, "image fetch failed, falling back to direct link");
                trigger_anchor(url, filename)
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let response = reqwest::get(url).await.map_err(|err| err.to_string())?;
        if !response.status().is_success() {
            return Err(format!("fetch returned {}", response.status()));
        }
        let bytes = response.bytes().await.map_err(|err| err.to_string())?;
        download_bytes(filename, "image/jpeg", bytes.to_vec()).map(|_| ())
    }
}

/// Saves a description as a plain-text file. Purely local, no network; two
/// calls with the same arguments trigger two independent downloads.
pub fn download_text(text: &str, filename: &str) -> Result<(), String> {
    download_bytes(filename, "text/plain", text.as_bytes().to_vec()).map(|_| ())
}

/// Opens a result at full size. No-op off the web.
pub fn open_in_new_tab(url: &str) {
    #[cfg(target_arch = "wasm32")]
    {
        if let Some(window) = web_sys::window() {
            let _ = window.open_with_url_and_target(url, "_blank");
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = url;
    }
}

fn download_bytes(filename: &str, mime: &str, bytes: Vec<u8>) -> Result<Option<String>, String> {
    #[cfg(target_arch = "wasm32")]
    {
        use web_sys::{Blob, BlobPropertyBag, Url};

        let array = js_sys::Uint8Array::from(bytes.as_slice());
        let parts = js_sys::Array::new();
        parts.push(&array.buffer());

        let mut opts = BlobPropertyBag::new();
        opts.type_(mime);
        let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &opts)
            .map_err(|_| "Failed to create blob".to_string())?;
        let url = Url::create_object_url_with_blob(&blob)
            .map_err(|_| "Unable to create download".to_string())?;

        let result = trigger_anchor(&url, filename);
        Url::revoke_object_url(&url).ok();
        result.map(|_| None)
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        use std::fs;
        use std::io::Write;

        let _ = mime;
        let dir = native_export_dir()?;
        fs::create_dir_all(&dir).map_err(|err| err.to_string())?;
        let path = dir.join(filename);
        let mut file = fs::File::create(&path).map_err(|err| err.to_string())?;
        file.write_all(&bytes).map_err(|err| err.to_string())?;
        Ok(Some(path.to_string_lossy().to_string()))
    }
}

#[cfg(target_arch = "wasm32")]
fn trigger_anchor(href: &str, filename: &str) -> Result<(), String> {
    use wasm_bindgen::JsCast;
    use web_sys::HtmlAnchorElement;

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or("Document unavailable")?;
    let anchor: HtmlAnchorElement = document
        .create_element("a")
        .map_err(|_| "Unable to create anchor")?
        .dyn_into()
        .map_err(|_| "Anchor cast failed")?;
    anchor.set_href(href);
    anchor.set_download(filename);
    anchor.style().set_property("display", "none").ok();

    document
        .body()
        .ok_or("Missing body")?
        .append_child(&anchor)
        .ok();
    anchor.click();
    anchor.remove();
    Ok(())
}

#[cfg(not(target_arch = "wasm32"))]
fn native_export_dir() -> Result<std::path::PathBuf, String> {
    let dirs = directories::ProjectDirs::from("com", "Styleshift", "Styleshift")
        .ok_or("Unable to determine export directory")?;
    Ok(dirs.data_dir().join("exports"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_name_strips_only_the_final_extension() {
        assert_eq!(base_name("look.jpg"), "look");
        assert_eq!(base_name("summer.look.png"), "summer.look");
        assert_eq!(base_name("noextension"), "noextension");
        assert_eq!(base_name(".hidden"), ".hidden");
    }

    #[test]
    fn image_filename_lowercases_the_occasion() {
        assert_eq!(
            image_filename("Beach Fit.png", Occasion::Vacation),
            "Beach Fit-vacation.jpg"
        );
        assert_eq!(image_filename("look", Occasion::Office), "look-office.jpg");
    }

    #[test]
    fn description_filename_keeps_the_full_image_name() {
        assert_eq!(
            description_filename("look.jpg", Occasion::Party),
            "look.jpg-party-description.txt"
        );
    }

    #[test]
    fn download_text_is_repeatable() {
        // Identical calls are independent; both either succeed or fail the
        // same way with no shared state in between.
        let first = download_text("A sharp blazer.", "look-office-description.txt");
        let second = download_text("A sharp blazer.", "look-office-description.txt");
        assert_eq!(first.is_ok(), second.is_ok());
    }
}
