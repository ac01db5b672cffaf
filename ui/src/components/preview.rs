//! Live preview strip: the selected outfit next to whichever stylized looks
//! have arrived so far.

use dioxus::prelude::*;

use crate::core::occasion::Occasion;
use crate::core::predictions::{PreviewEntry, PreviewSet};
use crate::core::uploads::UploadedImage;

#[component]
pub fn StylePreviewPanel(
    original: UploadedImage,
    preview: PreviewSet,
    on_download: EventHandler<(String, Occasion)>,
) -> Element {
    rsx! {
        section { class: "preview",
            h2 { class: "preview__title", "Style Preview" }
            div { class: "preview__grid",
                figure { class: "preview__cell",
                    figcaption { "Original" }
                    img {
                        src: "{original.preview_uri}",
                        alt: "Original outfit",
                    }
                }
                for entry in preview.entries().iter().cloned() {
                    {render_preview_cell(entry, on_download)}
                }
            }
        }
    }
}

fn render_preview_cell(entry: PreviewEntry, on_download: EventHandler<(String, Occasion)>) -> Element {
    let PreviewEntry {
        url,
        occasion,
        description,
    } = entry;
    let download_url = url.clone();

    rsx! {
        figure { class: "preview__cell",
            figcaption { "{occasion.label()} Style" }
            img {
                src: "{url}",
                alt: "{occasion.label()} style",
            }
            p { class: "preview__description", "{description}" }
            button {
                r#type: "button",
                class: "button",
                onclick: move |_| on_download.call((download_url.clone(), occasion)),
                "Download"
            }
        }
    }
}
