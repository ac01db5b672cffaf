//! Stylized results grid with the occasion filter tabs.

use dioxus::prelude::*;

use crate::core::occasion::{FilterTab, Occasion};
use crate::core::platform;
use crate::core::predictions::{ResultsIndex, StyledResult};
use crate::results::export;

#[component]
pub fn StyledResultsPanel(index: Signal<ResultsIndex>, tab: Signal<FilterTab>) -> Element {
    let snapshot = index();
    let counts = snapshot.counts();
    let filtered = snapshot.filtered_results(tab());
    let active = tab();

    rsx! {
        section { class: "results",
            div { class: "results__header",
                h2 { "Stylized Results" }
                div { class: "results__tabs",
                    button {
                        r#type: "button",
                        class: "results__tab",
                        class: if active == FilterTab::All { "results__tab--active" },
                        onclick: move |_| tab.set(FilterTab::All),
                        "All ({counts.total()})"
                    }
                    for occasion in Occasion::ALL {
                        button {
                            r#type: "button",
                            class: "results__tab",
                            class: if active == FilterTab::Occasion(occasion) { "results__tab--active" },
                            onclick: move |_| tab.set(FilterTab::Occasion(occasion)),
                            "{occasion.label()} ({counts.get(occasion)})"
                        }
                    }
                }
            }

            if filtered.is_empty() {
                p { class: "results__placeholder",
                    "Nothing to show for this filter yet."
                }
            } else {
                div { class: "results__grid",
                    for result in filtered.into_iter() {
                        {render_result_card(result)}
                    }
                }
            }
        }
    }
}

fn render_result_card(result: StyledResult) -> Element {
    let StyledResult {
        image_name,
        original_preview,
        stylized_url,
        occasion,
        description,
        ..
    } = result;

    let view_url = stylized_url.clone();
    let download_url = stylized_url.clone();
    let download_name = image_name.clone();
    let text_description = description.clone();
    let text_name = image_name.clone();

    rsx! {
        article { class: "result-card",
            header { class: "result-card__header",
                h3 { "{occasion.label()} Style" }
                p { class: "result-card__name", "{image_name}" }
            }

            div { class: "result-card__images",
                figure {
                    figcaption { "Original" }
                    img { src: "{original_preview}", alt: "Original outfit" }
                }
                figure {
                    figcaption { "Stylized" }
                    img { src: "{stylized_url}", alt: "{occasion.label()} style" }
                }
            }

            div { class: "result-card__description",
                div { class: "result-card__description-header",
                    h4 { "Outfit Description:" }
                    button {
                        r#type: "button",
                        class: "button button--link",
                        onclick: move |_| {
                            let filename = export::description_filename(&text_name, occasion);
                            if let Err(err) = export::download_text(&text_description, &filename) {
                                tracing::warn!(%err, "description download failed");
                            }
                        },
                        "Download text"
                    }
                }
                p { "{description}" }
            }

            footer { class: "result-card__actions",
                button {
                    r#type: "button",
                    class: "button",
                    onclick: move |_| export::open_in_new_tab(&view_url),
                    "View Full Size"
                }
                button {
                    r#type: "button",
                    class: "button button--primary",
                    onclick: move |_| {
                        let url = download_url.clone();
                        let filename = export::image_filename(&download_name, occasion);
                        platform::spawn_future(async move {
                            if let Err(err) = export::download_image(&url, &filename).await {
                                tracing::warn!(%err, "image download failed");
                            }
                        });
                    },
                    "Download Image"
                }
            }
        }
    }
}
