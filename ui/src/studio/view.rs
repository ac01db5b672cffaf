use std::cell::RefCell;
use std::rc::Rc;

use dioxus::prelude::*;
use futures_channel::mpsc::UnboundedSender;
use futures_util::StreamExt;

use crate::api::types::{PredictionStatus, StatusResponse};
use crate::api::{self, ApiConfig, ClientError};
use crate::components::{OutfitUploader, PickedFile, StylePreviewPanel};
use crate::core::occasion::{FilterTab, Occasion};
use crate::core::predictions::{PollOutcome, PreviewSet, ResultsIndex};
use crate::core::uploads::{Gallery, IntakeError, UploadedImage, MAX_OUTFITS};
use crate::core::{platform, timing};
use crate::results::{export, StyledResultsPanel};

use super::poller::{PollSupervisor, POLL_INTERVAL_MS};

type SenderSlot = Rc<RefCell<Option<UnboundedSender<StudioEvent>>>>;

#[component]
pub fn StudioView() -> Element {
    let gallery = use_signal(Gallery::new);
    let index = use_signal(ResultsIndex::new);
    let preview = use_signal(PreviewSet::default);
    let supervisor = use_signal(PollSupervisor::new);
    let tab = use_signal(FilterTab::default);
    let processing = use_signal(|| false);
    let banner = use_signal(|| Option::<String>::None);
    let intake_alert = use_signal(|| Option::<String>::None);
    let config = use_hook(ApiConfig::default);

    let sender_slot: SenderSlot = Rc::new(RefCell::new(None));
    let sender_slot_for_loop = sender_slot.clone();

    let coroutine = {
        let gallery_ref = gallery.clone();
        let index_ref = index.clone();
        let preview_ref = preview.clone();
        let supervisor_ref = supervisor.clone();
        let processing_ref = processing.clone();
        let banner_ref = banner.clone();
        let config = config.clone();

        use_coroutine(move |mut rx: UnboundedReceiver<StudioEvent>| {
            let sender_slot = sender_slot_for_loop.clone();
            let mut gallery_signal = gallery_ref.clone();
            let mut index_signal = index_ref.clone();
            let mut preview_signal = preview_ref.clone();
            let mut supervisor_signal = supervisor_ref.clone();
            let mut processing_signal = processing_ref.clone();
            let mut banner_signal = banner_ref.clone();
            let config = config.clone();

            async move {
                while let Some(event) = rx.next().await {
                    match event {
                        StudioEvent::GenerateAll => {
                            if gallery_signal().is_empty() {
                                banner_signal.set(Some(
                                    "Please upload at least one image first".to_string(),
                                ));
                                continue;
                            }

                            processing_signal.set(true);
                            banner_signal.set(None);
                            preview_signal.with_mut(PreviewSet::clear);

                            submit_all(
                                &config,
                                &gallery_signal,
                                &mut index_signal,
                                &mut preview_signal,
                                &mut supervisor_signal,
                                &mut banner_signal,
                                &sender_slot,
                            )
                            .await;

                            processing_signal.set(false);
                        }
                        StudioEvent::RemoveImage { image_id } => {
                            gallery_signal.with_mut(|gallery| {
                                gallery.remove(&image_id);
                            });
                            index_signal.with_mut(|idx| idx.remove_image(&image_id));

                            let snapshot = index_signal();
                            let selected =
                                gallery_signal.with(|g| g.selected_id().map(str::to_string));
                            preview_signal.with_mut(|strip| {
                                rebuild_preview(&snapshot, selected.as_deref(), strip)
                            });

                            // Stale timers for the removed batch die by generation.
                            reschedule_polls(&index_signal, &mut supervisor_signal, &sender_slot);
                        }
                        StudioEvent::SelectImage { image_id } => {
                            gallery_signal.with_mut(|gallery| gallery.select(&image_id));
                            let snapshot = index_signal();
                            preview_signal.with_mut(|strip| {
                                rebuild_preview(&snapshot, Some(&image_id), strip)
                            });
                        }
                        StudioEvent::PollDue {
                            generation,
                            prediction_id,
                        } => {
                            let current = supervisor_signal
                                .with(|s| s.is_current(generation, &prediction_id));
                            if current {
                                spawn_status_fetch(
                                    sender_slot.clone(),
                                    config.clone(),
                                    generation,
                                    prediction_id,
                                );
                            }
                        }
                        StudioEvent::PollResolved {
                            generation,
                            prediction_id,
                            outcome,
                        } => {
                            let current = supervisor_signal
                                .with(|s| s.is_current(generation, &prediction_id));
                            if !current {
                                continue;
                            }

                            match outcome {
                                Err(err) => {
                                    // Transient; the next tick retries it.
                                    tracing::warn!(%err, %prediction_id, "status poll failed");
                                    queue_poll(sender_slot.clone(), generation, prediction_id);
                                }
                                Ok(response) => {
                                    let merged = index_signal.with_mut(|idx| {
                                        idx.apply_poll_result(&prediction_id, &response)
                                    });
                                    match merged {
                                        PollOutcome::Applied(update) => {
                                            supervisor_signal
                                                .with_mut(|s| s.retire(&prediction_id));
                                            let selected = gallery_signal.with(|g| {
                                                g.selected_id() == Some(update.image_id.as_str())
                                            });
                                            if selected
                                                && update.status == PredictionStatus::Succeeded
                                            {
                                                if let Some(url) = update.output.clone() {
                                                    preview_signal.with_mut(|strip| {
                                                        strip.upsert(
                                                            update.occasion,
                                                            url,
                                                            update.description.clone(),
                                                        )
                                                    });
                                                }
                                            }
                                        }
                                        PollOutcome::StillPending => queue_poll(
                                            sender_slot.clone(),
                                            generation,
                                            prediction_id,
                                        ),
                                        PollOutcome::Ignored => {
                                            supervisor_signal
                                                .with_mut(|s| s.retire(&prediction_id));
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        })
    };

    sender_slot.borrow_mut().replace(coroutine.tx());

    {
        let mut supervisor_signal = supervisor.clone();
        use_drop(move || supervisor_signal.with_mut(PollSupervisor::clear));
    }

    let send_event = {
        let coroutine = coroutine.clone();
        move |event: StudioEvent| {
            coroutine.send(event);
        }
    };

    let on_files = {
        let mut gallery_signal = gallery.clone();
        let mut alert_signal = intake_alert.clone();
        move |picked: Vec<PickedFile>| {
            alert_signal.set(None);
            for file in picked {
                let outcome = gallery_signal
                    .with_mut(|gallery| gallery.add(&file.name, file.bytes).map(|_| ()));
                match outcome {
                    Ok(()) => {}
                    Err(IntakeError::GalleryFull) => {
                        alert_signal.set(Some(IntakeError::GalleryFull.to_string()));
                        break;
                    }
                    Err(err) => alert_signal.set(Some(err.to_string())),
                }
            }
        }
    };

    let on_preview_download = {
        let gallery_ref = gallery.clone();
        move |(url, occasion): (String, Occasion)| {
            let image_name = gallery_ref
                .with(|g| g.selected().map(|image| image.name.clone()))
                .unwrap_or_else(|| "image".to_string());
            let filename = export::image_filename(&image_name, occasion);
            platform::spawn_future(async move {
                if let Err(err) = export::download_image(&url, &filename).await {
                    tracing::warn!(%err, "preview download failed");
                }
            });
        }
    };

    let gallery_snapshot = gallery();
    let selected_id = gallery_snapshot.selected_id().map(str::to_string);
    let counts = index().counts();
    let completed = counts.total();
    let total_expected = gallery_snapshot.len() * 3;
    let is_processing = processing();
    let banner_message = banner();
    let alert_message = intake_alert();
    let preview_snapshot = preview();
    let selected_image = gallery_snapshot.selected().cloned();

    rsx! {
        section { class: "page page-studio",
            header { class: "studio__header",
                h1 { "Styleshift" }
                p { "Transform your outfit photos into styled variations for different occasions." }
            }

            section { class: "studio-card studio-uploads",
                h2 { "Upload Your Outfits (Max {MAX_OUTFITS})" }

                if !gallery_snapshot.is_full() {
                    OutfitUploader {
                        disabled: gallery_snapshot.is_full(),
                        on_files,
                    }
                }

                if let Some(alert) = alert_message {
                    p { class: "studio__alert", "⚠️ {alert}" }
                }

                if !gallery_snapshot.is_empty() {
                    h3 { class: "studio-uploads__count",
                        "Selected Images ({gallery_snapshot.len()}/{MAX_OUTFITS}):"
                    }
                    div { class: "studio-uploads__grid",
                        for image in gallery_snapshot.images().iter().cloned() {
                            {render_gallery_item(
                                image,
                                selected_id.as_deref(),
                                send_event.clone(),
                            )}
                        }
                    }

                    div { class: "studio__generate",
                        button {
                            r#type: "button",
                            class: "button button--primary",
                            disabled: is_processing || gallery_snapshot.is_empty(),
                            onclick: {
                                let send_event = send_event.clone();
                                move |_| send_event(StudioEvent::GenerateAll)
                            },
                            if is_processing { "Processing…" } else { "Generate All Style Variants" }
                        }
                    }
                }

                if let Some(message) = banner_message {
                    div { class: "studio__banner", "{message}" }
                }

                if total_expected > 0 {
                    div { class: "studio-progress",
                        p { "Progress: {completed} of {total_expected} images completed" }
                        div { class: "studio-progress__occasions",
                            for occasion in Occasion::ALL {
                                span { class: "studio-progress__occasion",
                                    "{occasion.label()}: {counts.get(occasion)}/{gallery_snapshot.len()}"
                                }
                            }
                        }
                    }
                }
            }

            if is_processing {
                div { class: "studio__spinner",
                    p { "Generating stylized images… This may take a few minutes." }
                }
            }

            if let Some(original) = selected_image {
                if !preview_snapshot.is_empty() {
                    StylePreviewPanel {
                        original,
                        preview: preview_snapshot.clone(),
                        on_download: on_preview_download,
                    }
                }
            }

            if completed > 0 {
                StyledResultsPanel { index, tab }
            }

            section { class: "studio-card studio-about",
                h3 { "About these styles:" }
                ul {
                    for occasion in Occasion::ALL {
                        li {
                            strong { "{occasion.label()} Style: " }
                            "{occasion.blurb()}"
                        }
                    }
                }
            }
        }
    }
}

/// Submits every not-yet-submitted outfit, strictly in gallery order, one
/// request in flight at a time. Each batch's polls are armed as soon as it
/// lands, so earlier images start polling while later submits are still in
/// flight. The first failure aborts the remainder of the batch; batches
/// already recorded keep polling regardless.
async fn submit_all(
    config: &ApiConfig,
    gallery: &Signal<Gallery>,
    index: &mut Signal<ResultsIndex>,
    preview: &mut Signal<PreviewSet>,
    supervisor: &mut Signal<PollSupervisor>,
    banner: &mut Signal<Option<String>>,
    sender_slot: &SenderSlot,
) {
    let images: Vec<UploadedImage> = gallery.with(|g| g.images().to_vec());

    for image in images {
        if index.with(|idx| idx.has_batch(&image.id)) {
            continue;
        }

        match api::submit_outfit(config, &image).await {
            Ok(response) => {
                let selected = gallery.with(|g| g.selected_id() == Some(image.id.as_str()));
                if selected {
                    preview.with_mut(|strip| strip.seed_from_batch(&response.predictions));
                }
                index.with_mut(|idx| idx.insert_batch(image.clone(), response.predictions));
                reschedule_polls(index, supervisor, sender_slot);
            }
            Err(err) => {
                tracing::warn!(%err, image = %image.name, "stylize submit failed");
                banner.set(Some("Error processing images. Please try again.".to_string()));
                break;
            }
        }
    }
}

/// Replaces the supervised timer set with the index's current pending set
/// and arms one fresh one-shot timer per pending prediction.
fn reschedule_polls(
    index: &Signal<ResultsIndex>,
    supervisor: &mut Signal<PollSupervisor>,
    sender_slot: &SenderSlot,
) {
    let pending = index.with(|idx| idx.pending());
    let generation = supervisor.with_mut(|s| {
        s.reschedule(pending.iter().map(|p| p.prediction_id.clone()))
    });
    for prediction in pending {
        queue_poll(sender_slot.clone(), generation, prediction.prediction_id);
    }
}

fn queue_poll(sender_slot: SenderSlot, generation: u64, prediction_id: String) {
    if let Some(sender) = sender_slot.borrow().as_ref().cloned() {
        platform::spawn_future(async move {
            timing::sleep_ms(POLL_INTERVAL_MS).await;
            let _ = sender.unbounded_send(StudioEvent::PollDue {
                generation,
                prediction_id,
            });
        });
    }
}

fn spawn_status_fetch(
    sender_slot: SenderSlot,
    config: ApiConfig,
    generation: u64,
    prediction_id: String,
) {
    if let Some(sender) = sender_slot.borrow().as_ref().cloned() {
        platform::spawn_future(async move {
            let outcome = api::prediction_status(&config, &prediction_id).await;
            let _ = sender.unbounded_send(StudioEvent::PollResolved {
                generation,
                prediction_id,
                outcome,
            });
        });
    }
}

/// Rebuilds the preview strip for the selected image from the authoritative
/// index.
fn rebuild_preview(index: &ResultsIndex, selected_id: Option<&str>, preview: &mut PreviewSet) {
    preview.clear();
    let Some(selected_id) = selected_id else {
        return;
    };
    let Some(entry) = index
        .entries()
        .iter()
        .find(|entry| entry.image.id == selected_id)
    else {
        return;
    };

    for record in &entry.predictions {
        if record.status != PredictionStatus::Succeeded {
            continue;
        }
        if let Some(url) = record.output.clone() {
            preview.upsert(record.occasion, url, record.description.clone());
        }
    }
}

fn render_gallery_item(
    image: UploadedImage,
    selected_id: Option<&str>,
    send_event: impl Fn(StudioEvent) + Clone + 'static,
) -> Element {
    let is_selected = selected_id == Some(image.id.as_str());
    let select_id = image.id.clone();
    let remove_id = image.id.clone();
    let select = send_event.clone();
    let remove = send_event;

    rsx! {
        div { class: "studio-uploads__item",
            class: if is_selected { "studio-uploads__item--selected" },
            img {
                src: "{image.preview_uri}",
                alt: "Outfit {image.name}",
                onclick: move |_| select(StudioEvent::SelectImage {
                    image_id: select_id.clone(),
                }),
            }
            button {
                r#type: "button",
                class: "studio-uploads__remove",
                aria_label: "Remove image",
                onclick: move |_| remove(StudioEvent::RemoveImage {
                    image_id: remove_id.clone(),
                }),
                "×"
            }
            p { class: "studio-uploads__name", "{image.name}" }
        }
    }
}

#[derive(Debug, Clone)]
enum StudioEvent {
    GenerateAll,
    RemoveImage {
        image_id: String,
    },
    SelectImage {
        image_id: String,
    },
    PollDue {
        generation: u64,
        prediction_id: String,
    },
    PollResolved {
        generation: u64,
        prediction_id: String,
        outcome: Result<StatusResponse, ClientError>,
    },
}
