//! Outfit picker card. Drag-and-drop niceties are left to the browser's
//! native file input; the interesting part is reading the picked files in
//! submission order before handing them to the studio.

use dioxus::prelude::*;

use crate::core::uploads::MAX_OUTFITS;

/// A picked file, read fully into memory, not yet validated.
#[derive(Debug, Clone, PartialEq)]
pub struct PickedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

#[component]
pub fn OutfitUploader(disabled: bool, on_files: EventHandler<Vec<PickedFile>>) -> Element {
    let read_files = move |evt: FormEvent| {
        let Some(file_engine) = evt.files() else {
            return;
        };
        spawn(async move {
            let mut picked = Vec::new();
            // Sequential reads keep the resulting list in submission order.
            for name in file_engine.files() {
                if let Some(bytes) = file_engine.read_file(&name).await {
                    picked.push(PickedFile { name, bytes });
                }
            }
            if !picked.is_empty() {
                on_files.call(picked);
            }
        });
    };

    rsx! {
        label { class: "uploader",
            class: if disabled { "uploader--disabled" },
            input {
                r#type: "file",
                class: "uploader__input",
                accept: "image/*,.jpg,.jpeg,.png,.webp",
                multiple: true,
                disabled,
                onchange: read_files,
            }
            p { class: "uploader__headline", "Drop your outfit image here" }
            p { class: "uploader__hint", "or click to browse files" }
            p { class: "uploader__formats",
                "Accepted formats: JPG, PNG, WebP · up to {MAX_OUTFITS} outfits"
            }
        }
    }
}
