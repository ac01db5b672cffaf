//! Reconciliation state for stylization jobs.
//!
//! `ResultsIndex` is the single authoritative owner of every prediction the
//! session knows about. All mutation happens through its explicit update API;
//! components only ever read projections derived from it.

use crate::api::types::{PredictionPayload, PredictionStatus, StatusResponse};
use crate::core::occasion::{FilterTab, Occasion};
use crate::core::uploads::UploadedImage;

/// Shown when a succeeded job arrives without a description.
pub const DEFAULT_DESCRIPTION: &str = "Style transformation complete.";

/// Stored error for a failed job that did not explain itself.
pub const DEFAULT_FAILURE: &str = "Generation failed";

/// One stylization job. Status only ever moves `Pending -> Succeeded` or
/// `Pending -> Failed`; terminal records are never touched again.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionRecord {
    pub prediction_id: String,
    pub occasion: Occasion,
    pub status: PredictionStatus,
    pub output: Option<String>,
    pub description: Option<String>,
    pub error: Option<String>,
}

impl PredictionRecord {
    fn from_payload(payload: PredictionPayload) -> Self {
        let mut status = payload
            .status
            .as_deref()
            .map(PredictionStatus::parse)
            .unwrap_or(PredictionStatus::Pending);
        // A submit response that already carries an output is done even if
        // the status field lags behind.
        if status != PredictionStatus::Failed && payload.output.is_some() {
            status = PredictionStatus::Succeeded;
        }

        Self {
            prediction_id: payload.prediction_id,
            occasion: payload.occasion,
            status,
            output: payload.output,
            description: payload.description,
            error: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == PredictionStatus::Pending
    }
}

/// All predictions for one uploaded outfit, in service order.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageResult {
    pub image: UploadedImage,
    pub predictions: Vec<PredictionRecord>,
}

/// A still-running job and the image it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingPrediction {
    pub image_id: String,
    pub prediction_id: String,
}

/// What a merge changed, so callers can refresh display projections.
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedUpdate {
    pub image_id: String,
    pub occasion: Occasion,
    pub status: PredictionStatus,
    pub output: Option<String>,
    pub description: Option<String>,
}

/// Result of feeding one poll response into the index.
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    /// The record reached a terminal state; polling for it stops.
    Applied(AppliedUpdate),
    /// The job is still running; poll again next tick.
    StillPending,
    /// Unknown or already-terminal prediction id; drop the timer.
    Ignored,
}

/// Ordered map from uploaded image to its prediction batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultsIndex {
    entries: Vec<ImageResult>,
}

impl ResultsIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[ImageResult] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether a submit response has already been recorded for this image.
    /// Re-generation skips such images instead of resubmitting them.
    pub fn has_batch(&self, image_id: &str) -> bool {
        self.entries.iter().any(|entry| entry.image.id == image_id)
    }

    /// Records the submit response for one image.
    ///
    /// Enforces the index invariants: one batch per image, each occasion at
    /// most once per image, prediction ids unique across the whole index.
    /// Offending payloads are dropped, not errors; the service is expected to
    /// send exactly one job per occasion.
    pub fn insert_batch(&mut self, image: UploadedImage, payloads: Vec<PredictionPayload>) {
        if self.has_batch(&image.id) {
            return;
        }

        let mut predictions: Vec<PredictionRecord> = Vec::with_capacity(payloads.len());
        for payload in payloads {
            if self.find(&payload.prediction_id).is_some()
                || predictions
                    .iter()
                    .any(|record| record.prediction_id == payload.prediction_id)
            {
                continue;
            }
            if predictions
                .iter()
                .any(|record| record.occasion == payload.occasion)
            {
                continue;
            }
            predictions.push(PredictionRecord::from_payload(payload));
        }

        self.entries.push(ImageResult { image, predictions });
    }

    /// Drops an image and its whole batch. Pending polls for the removed
    /// predictions become `Ignored` no-ops from here on.
    pub fn remove_image(&mut self, image_id: &str) {
        self.entries.retain(|entry| entry.image.id != image_id);
    }

    fn find(&self, prediction_id: &str) -> Option<(&UploadedImage, &PredictionRecord)> {
        self.entries.iter().find_map(|entry| {
            entry
                .predictions
                .iter()
                .find(|record| record.prediction_id == prediction_id)
                .map(|record| (&entry.image, record))
        })
    }

    /// Merges one poll response into the record it belongs to.
    ///
    /// A response counts as success when it says so or when it already
    /// carries an output. Descriptions fall back to whatever the record held
    /// before. Terminal records and unknown ids are left untouched.
    pub fn apply_poll_result(
        &mut self,
        prediction_id: &str,
        response: &StatusResponse,
    ) -> PollOutcome {
        for entry in &mut self.entries {
            let image_id = entry.image.id.clone();
            for record in &mut entry.predictions {
                if record.prediction_id != prediction_id {
                    continue;
                }
                if record.status.is_terminal() {
                    return PollOutcome::Ignored;
                }

                let status = response.status();
                if status == PredictionStatus::Succeeded || response.output.is_some() {
                    record.status = PredictionStatus::Succeeded;
                    if response.output.is_some() {
                        record.output = response.output.clone();
                    }
                    if response.description.is_some() {
                        record.description = response.description.clone();
                    }
                    return PollOutcome::Applied(AppliedUpdate {
                        image_id,
                        occasion: record.occasion,
                        status: PredictionStatus::Succeeded,
                        output: record.output.clone(),
                        description: record.description.clone(),
                    });
                }

                if status == PredictionStatus::Failed {
                    record.status = PredictionStatus::Failed;
                    record.error = Some(
                        response
                            .error
                            .clone()
                            .unwrap_or_else(|| DEFAULT_FAILURE.to_string()),
                    );
                    return PollOutcome::Applied(AppliedUpdate {
                        image_id,
                        occasion: record.occasion,
                        status: PredictionStatus::Failed,
                        output: None,
                        description: record.description.clone(),
                    });
                }

                return PollOutcome::StillPending;
            }
        }

        PollOutcome::Ignored
    }

    /// Every still-running job, in image-then-occasion order.
    pub fn pending(&self) -> Vec<PendingPrediction> {
        self.entries
            .iter()
            .flat_map(|entry| {
                entry
                    .predictions
                    .iter()
                    .filter(|record| record.is_pending())
                    .map(|record| PendingPrediction {
                        image_id: entry.image.id.clone(),
                        prediction_id: record.prediction_id.clone(),
                    })
            })
            .collect()
    }

    /// Succeeded results matching the tab, in image-then-occasion order.
    pub fn filtered_results(&self, tab: FilterTab) -> Vec<StyledResult> {
        let mut results = Vec::new();
        for entry in &self.entries {
            for record in &entry.predictions {
                if record.status != PredictionStatus::Succeeded {
                    continue;
                }
                let Some(stylized_url) = record.output.clone() else {
                    continue;
                };
                if !tab.matches(record.occasion) {
                    continue;
                }
                results.push(StyledResult {
                    image_id: entry.image.id.clone(),
                    image_name: entry.image.name.clone(),
                    original_preview: entry.image.preview_uri.clone(),
                    stylized_url,
                    occasion: record.occasion,
                    description: record
                        .description
                        .clone()
                        .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
                });
            }
        }
        results
    }

    /// Succeeded-per-occasion tallies, recomputed on every read.
    pub fn counts(&self) -> OccasionCounts {
        let mut counts = OccasionCounts::default();
        for entry in &self.entries {
            for record in &entry.predictions {
                if record.status == PredictionStatus::Succeeded && record.output.is_some() {
                    counts.bump(record.occasion);
                }
            }
        }
        counts
    }
}

/// One view-ready stylized result.
#[derive(Debug, Clone, PartialEq)]
pub struct StyledResult {
    pub image_id: String,
    pub image_name: String,
    pub original_preview: String,
    pub stylized_url: String,
    pub occasion: Occasion,
    pub description: String,
}

/// Completed-result tallies, zero-initialized for all three occasions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OccasionCounts {
    counts: [usize; 3],
}

impl OccasionCounts {
    fn slot(occasion: Occasion) -> usize {
        match occasion {
            Occasion::Office => 0,
            Occasion::Party => 1,
            Occasion::Vacation => 2,
        }
    }

    fn bump(&mut self, occasion: Occasion) {
        self.counts[Self::slot(occasion)] += 1;
    }

    pub fn get(&self, occasion: Occasion) -> usize {
        self.counts[Self::slot(occasion)]
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

/// Display-only strip of stylized looks for the currently selected image.
/// Purely a projection; the index stays authoritative.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreviewSet {
    entries: Vec<PreviewEntry>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PreviewEntry {
    pub url: String,
    pub occasion: Occasion,
    pub description: String,
}

impl PreviewSet {
    pub fn entries(&self) -> &[PreviewEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Replaces the entry for a matching occasion, appends otherwise.
    pub fn upsert(&mut self, occasion: Occasion, url: String, description: Option<String>) {
        if let Some(existing) = self
            .entries
            .iter_mut()
            .find(|entry| entry.occasion == occasion)
        {
            existing.url = url;
            if let Some(description) = description {
                existing.description = description;
            }
        } else {
            self.entries.push(PreviewEntry {
                url,
                occasion,
                description: description.unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
            });
        }
    }

    /// Seeds the strip from submit payloads that already carry outputs.
    pub fn seed_from_batch(&mut self, payloads: &[PredictionPayload]) {
        self.clear();
        for payload in payloads {
            if let Some(url) = payload.output.clone() {
                self.upsert(payload.occasion, url, payload.description.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::uploads::Gallery;

    fn image(name: &str) -> UploadedImage {
        let mut gallery = Gallery::new();
        gallery.add(name, vec![1, 2, 3]).unwrap().clone()
    }

    fn payload(id: &str, occasion: Occasion) -> PredictionPayload {
        serde_json::from_value(serde_json::json!({
            "predictionId": id,
            "occasion": occasion.label(),
        }))
        .unwrap()
    }

    fn succeeded(output: &str, description: Option<&str>) -> StatusResponse {
        StatusResponse {
            status: Some("succeeded".into()),
            output: Some(output.into()),
            description: description.map(str::to_string),
            error: None,
        }
    }

    fn full_batch(index: &mut ResultsIndex, name: &str) -> (String, Vec<String>) {
        let image = image(name);
        let image_id = image.id.clone();
        let ids: Vec<String> = Occasion::ALL
            .iter()
            .enumerate()
            .map(|(n, _)| format!("{name}-p{n}"))
            .collect();
        let payloads = ids
            .iter()
            .zip(Occasion::ALL)
            .map(|(id, occasion)| payload(id, occasion))
            .collect();
        index.insert_batch(image, payloads);
        (image_id, ids)
    }

    #[test]
    fn batch_records_start_pending() {
        let mut index = ResultsIndex::new();
        let (image_id, ids) = full_batch(&mut index, "look.jpg");

        assert!(index.has_batch(&image_id));
        assert_eq!(index.pending().len(), 3);
        assert_eq!(index.counts().total(), 0);
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn submit_payload_with_output_is_already_succeeded() {
        let mut index = ResultsIndex::new();
        let mut early = payload("p-early", Occasion::Party);
        early.output = Some("https://cdn.example/early.jpg".into());
        index.insert_batch(image("look.jpg"), vec![early]);

        assert!(index.pending().is_empty());
        assert_eq!(index.counts().get(Occasion::Party), 1);
    }

    #[test]
    fn duplicate_occasions_and_ids_are_dropped() {
        let mut index = ResultsIndex::new();
        index.insert_batch(
            image("a.jpg"),
            vec![
                payload("p-1", Occasion::Office),
                payload("p-2", Occasion::Office),
                payload("p-1", Occasion::Party),
            ],
        );
        // Second image reusing an existing prediction id.
        index.insert_batch(image("b.jpg"), vec![payload("p-1", Occasion::Vacation)]);

        let pending = index.pending();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].prediction_id, "p-1");
    }

    #[test]
    fn reinserting_a_batch_is_a_no_op() {
        let mut index = ResultsIndex::new();
        let uploaded = image("look.jpg");
        index.insert_batch(uploaded.clone(), vec![payload("p-1", Occasion::Office)]);
        index.insert_batch(uploaded, vec![payload("p-9", Occasion::Party)]);
        assert_eq!(index.pending().len(), 1);
    }

    #[test]
    fn success_merge_carries_output_and_description() {
        let mut index = ResultsIndex::new();
        let (image_id, ids) = full_batch(&mut index, "look.jpg");

        let outcome =
            index.apply_poll_result(&ids[0], &succeeded("https://cdn/office.jpg", Some("Tailored.")));
        match outcome {
            PollOutcome::Applied(update) => {
                assert_eq!(update.image_id, image_id);
                assert_eq!(update.occasion, Occasion::Office);
                assert_eq!(update.status, PredictionStatus::Succeeded);
                assert_eq!(update.output.as_deref(), Some("https://cdn/office.jpg"));
            }
            other => panic!("expected applied update, got {other:?}"),
        }
        assert_eq!(index.counts().get(Occasion::Office), 1);
        assert_eq!(index.pending().len(), 2);
    }

    #[test]
    fn output_without_status_counts_as_success() {
        let mut index = ResultsIndex::new();
        let (_, ids) = full_batch(&mut index, "look.jpg");

        let response = StatusResponse {
            output: Some("https://cdn/party.jpg".into()),
            ..StatusResponse::default()
        };
        assert!(matches!(
            index.apply_poll_result(&ids[1], &response),
            PollOutcome::Applied(_)
        ));
        assert_eq!(index.counts().get(Occasion::Party), 1);
    }

    #[test]
    fn description_falls_back_to_the_prior_value() {
        let mut index = ResultsIndex::new();
        let mut described = payload("p-1", Occasion::Office);
        described.description = Some("From the submit response.".into());
        index.insert_batch(image("look.jpg"), vec![described]);

        let response = StatusResponse {
            status: Some("succeeded".into()),
            output: Some("https://cdn/office.jpg".into()),
            ..StatusResponse::default()
        };
        index.apply_poll_result("p-1", &response);

        let results = index.filtered_results(FilterTab::All);
        assert_eq!(results[0].description, "From the submit response.");
    }

    #[test]
    fn failure_stores_the_error_and_stops_polling() {
        let mut index = ResultsIndex::new();
        let (_, ids) = full_batch(&mut index, "look.jpg");

        let response = StatusResponse {
            status: Some("failed".into()),
            error: Some("Generation failed".into()),
            ..StatusResponse::default()
        };
        let outcome = index.apply_poll_result(&ids[2], &response);
        assert!(
            matches!(outcome, PollOutcome::Applied(ref update) if update.status == PredictionStatus::Failed)
        );

        assert_eq!(index.counts().get(Occasion::Vacation), 0);
        assert!(index
            .filtered_results(FilterTab::Occasion(Occasion::Vacation))
            .is_empty());
        assert_eq!(index.pending().len(), 2);
    }

    #[test]
    fn failure_without_a_message_gets_the_default() {
        let mut index = ResultsIndex::new();
        let (_, ids) = full_batch(&mut index, "look.jpg");

        let response = StatusResponse {
            status: Some("failed".into()),
            ..StatusResponse::default()
        };
        index.apply_poll_result(&ids[0], &response);

        let record = &index.entries()[0].predictions[0];
        assert_eq!(record.error.as_deref(), Some(DEFAULT_FAILURE));
    }

    #[test]
    fn terminal_records_never_transition_again() {
        let mut index = ResultsIndex::new();
        let (_, ids) = full_batch(&mut index, "look.jpg");

        index.apply_poll_result(&ids[0], &succeeded("https://cdn/first.jpg", None));

        // A later failure for the same id must not un-succeed it.
        let failure = StatusResponse {
            status: Some("failed".into()),
            error: Some("late failure".into()),
            ..StatusResponse::default()
        };
        assert_eq!(
            index.apply_poll_result(&ids[0], &failure),
            PollOutcome::Ignored
        );

        let record = &index.entries()[0].predictions[0];
        assert_eq!(record.status, PredictionStatus::Succeeded);
        assert_eq!(record.output.as_deref(), Some("https://cdn/first.jpg"));
        assert!(record.error.is_none());
    }

    #[test]
    fn pending_status_reports_still_pending() {
        let mut index = ResultsIndex::new();
        let (_, ids) = full_batch(&mut index, "look.jpg");

        let response = StatusResponse {
            status: Some("processing".into()),
            ..StatusResponse::default()
        };
        assert_eq!(
            index.apply_poll_result(&ids[0], &response),
            PollOutcome::StillPending
        );
        assert_eq!(index.pending().len(), 3);
    }

    #[test]
    fn unknown_prediction_ids_are_ignored() {
        let mut index = ResultsIndex::new();
        full_batch(&mut index, "look.jpg");
        assert_eq!(
            index.apply_poll_result("nope", &succeeded("https://cdn/x.jpg", None)),
            PollOutcome::Ignored
        );
    }

    #[test]
    fn removal_makes_later_polls_no_ops() {
        let mut index = ResultsIndex::new();
        let (image_id, ids) = full_batch(&mut index, "look.jpg");

        index.remove_image(&image_id);
        assert!(index.pending().is_empty());
        assert_eq!(
            index.apply_poll_result(&ids[0], &succeeded("https://cdn/x.jpg", None)),
            PollOutcome::Ignored
        );
        assert_eq!(index.counts().total(), 0);
    }

    #[test]
    fn all_filter_is_the_union_of_occasion_filters() {
        let mut index = ResultsIndex::new();
        let (_, first) = full_batch(&mut index, "a.jpg");
        let (_, second) = full_batch(&mut index, "b.jpg");

        for (n, id) in first.iter().chain(second.iter()).enumerate() {
            index.apply_poll_result(id, &succeeded(&format!("https://cdn/{n}.jpg"), None));
        }

        let all = index.filtered_results(FilterTab::All);
        assert_eq!(all.len(), 6);

        let mut union: Vec<StyledResult> = Vec::new();
        for occasion in Occasion::ALL {
            union.extend(index.filtered_results(FilterTab::Occasion(occasion)));
        }
        // Same elements; `All` keeps image-then-occasion order.
        assert_eq!(union.len(), all.len());
        for result in &all {
            assert!(union.contains(result));
        }
        let actual_order: Vec<(String, Occasion)> = all
            .iter()
            .map(|result| (result.image_id.clone(), result.occasion))
            .collect();
        let expected_order: Vec<(String, Occasion)> = index
            .entries()
            .iter()
            .flat_map(|entry| {
                Occasion::ALL
                    .iter()
                    .map(|occasion| (entry.image.id.clone(), *occasion))
            })
            .collect();
        assert_eq!(actual_order, expected_order);
    }

    #[test]
    fn counts_are_bounded_by_the_image_count() {
        let mut index = ResultsIndex::new();
        let (_, first) = full_batch(&mut index, "a.jpg");
        let (_, second) = full_batch(&mut index, "b.jpg");

        for id in first.iter().chain(second.iter()) {
            index.apply_poll_result(id, &succeeded("https://cdn/done.jpg", None));
        }

        let counts = index.counts();
        for occasion in Occasion::ALL {
            assert_eq!(counts.get(occasion), 2);
        }
        assert_eq!(counts.total(), 6);
    }

    #[test]
    fn preview_upsert_replaces_on_occasion_match() {
        let mut preview = PreviewSet::default();
        preview.upsert(Occasion::Office, "https://cdn/v1.jpg".into(), None);
        preview.upsert(
            Occasion::Office,
            "https://cdn/v2.jpg".into(),
            Some("Refined cut.".into()),
        );
        preview.upsert(Occasion::Party, "https://cdn/party.jpg".into(), None);

        assert_eq!(preview.entries().len(), 2);
        assert_eq!(preview.entries()[0].url, "https://cdn/v2.jpg");
        assert_eq!(preview.entries()[0].description, "Refined cut.");
        assert_eq!(preview.entries()[1].description, DEFAULT_DESCRIPTION);
    }
}
