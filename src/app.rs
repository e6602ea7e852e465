use serde::{Deserialize, Serialize};

use crate::capabilities::{Capabilities, DistanceOutput, Page, StorageOutput};
use crate::event::Event;
use crate::model::{
    Feedback, FeedbackKind, FormPhase, ImageBlob, Model, PendingSubmit, TrailRecord,
};
use crate::{
    distance_label, success_message, FEEDBACK_DURATION_MS, FORM_TITLE, FROM_PLACEHOLDER,
    MAP_IMAGE_URL, MSG_MISSING_FIELDS, MSG_SAVE_FAILED, NAME_PLACEHOLDER, SUBMIT_TIMEOUT_MS,
    TO_PLACEHOLDER,
};

#[derive(Default)]
pub struct App;

/// Everything the shell needs to rebuild the add-trail page from scratch.
/// Rendering is a pure projection of the model, so repeated renders are
/// idempotent by construction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewModel {
    pub title: String,
    pub name: String,
    pub name_placeholder: String,
    pub from_location: String,
    pub from_placeholder: String,
    pub to_location: String,
    pub to_placeholder: String,
    pub image_preview: Option<ImageBlob>,
    pub distance_label: String,
    pub feedback: Option<FeedbackView>,
    pub submitting: bool,
    pub map_image_url: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackView {
    pub text: String,
    pub kind: FeedbackKind,
}

impl crux_core::App for App {
    type Event = Event;
    type Model = Model;
    type ViewModel = ViewModel;
    type Capabilities = Capabilities;

    #[allow(clippy::too_many_lines)]
    fn update(&self, event: Event, model: &mut Model, caps: &Capabilities) {
        match event {
            Event::NameChanged { value } => {
                model.draft.name = value;
                Self::refresh_editing_phase(model);
            }

            Event::FromLocationChanged { value } => {
                model.draft.from_location = value;
                Self::refresh_editing_phase(model);
            }

            Event::ToLocationChanged { value } => {
                model.draft.to_location = value;
                Self::refresh_editing_phase(model);
            }

            Event::ImageSelected { file } => {
                // No file picked: no state change at all.
                let Some(file) = file else { return };
                let generation = model.image_reads.issue();
                caps.media.read_file(file, move |result| Event::ImageRead {
                    generation,
                    result: Box::new(result),
                });
                return;
            }

            Event::ImageRead { generation, result } => {
                if !model.image_reads.is_current(generation) {
                    tracing::debug!(generation, "dropping stale image read");
                    return;
                }
                match *result {
                    Ok(blob) => {
                        model.draft.image = Some(blob);
                        Self::refresh_editing_phase(model);
                    }
                    Err(err) => {
                        // Keep whatever image was already staged.
                        tracing::warn!(error = %err, "image read failed");
                        return;
                    }
                }
            }

            Event::CalculateDistanceRequested => {
                let generation = model.distance_previews.issue();
                if !model.phase.is_submitting() {
                    Self::transition(model, FormPhase::Previewing);
                }
                caps.distance.compute(
                    model.draft.from_location.clone(),
                    model.draft.to_location.clone(),
                    move |result| Event::DistancePreviewComputed { generation, result },
                );
            }

            Event::DistancePreviewComputed { generation, result } => {
                if !model.distance_previews.is_current(generation) {
                    tracing::debug!(generation, "dropping stale distance preview");
                    return;
                }
                match result {
                    Ok(DistanceOutput::Computed { distance }) => {
                        model.draft.preview_distance = Some(distance);
                    }
                    Err(err) => {
                        tracing::warn!(error = %err, "distance preview failed");
                        return;
                    }
                }
            }

            Event::SubmitRequested => match model.draft.validate() {
                Err(err) => {
                    tracing::debug!(error = %err, "submit rejected by validation");
                    Self::show_feedback(model, caps, MSG_MISSING_FIELDS.into(), FeedbackKind::Error);
                }
                Ok(snapshot) => {
                    // A re-submit supersedes any submission still in flight;
                    // its timeout timer must not be left running in the shell.
                    if let Some(superseded) = model.pending_submit.take() {
                        caps.timer.cancel(superseded.timeout_timer);
                    }
                    let generation = model.submits.issue();
                    let timeout_timer = model.next_timer_id();
                    Self::transition(model, FormPhase::Submitting);

                    caps.timer
                        .start(timeout_timer, SUBMIT_TIMEOUT_MS, |timer| {
                            Event::SubmitTimedOut { timer }
                        });

                    // Always a fresh computation; any preview value is ignored.
                    caps.distance.compute(
                        snapshot.from_location().to_owned(),
                        snapshot.to_location().to_owned(),
                        move |result| Event::SubmitDistanceComputed { generation, result },
                    );

                    model.pending_submit = Some(PendingSubmit {
                        generation,
                        draft: snapshot,
                        record: None,
                        timeout_timer,
                    });
                }
            },

            Event::SubmitDistanceComputed { generation, result } => {
                let Some(pending) = model.pending_submit.as_mut() else {
                    tracing::debug!(generation, "distance completed with no submit in flight");
                    return;
                };
                if pending.generation != generation {
                    tracing::debug!(generation, "dropping stale submit distance");
                    return;
                }
                match result {
                    Ok(DistanceOutput::Computed { distance }) => {
                        let record = TrailRecord::new(&pending.draft, distance);
                        pending.record = Some(record.clone());
                        caps.storage.store_trail(record, move |result| Event::TrailStored {
                            generation,
                            result,
                        });
                        return;
                    }
                    Err(err) => {
                        tracing::error!(error = %err, "distance computation failed during submit");
                        Self::fail_submit(model, caps);
                    }
                }
            }

            Event::TrailStored { generation, result } => {
                let Some(pending) = model.pending_submit.take() else {
                    tracing::debug!(generation, "storage completed with no submit in flight");
                    return;
                };
                if pending.generation != generation {
                    tracing::debug!(generation, "dropping stale storage completion");
                    model.pending_submit = Some(pending);
                    return;
                }

                caps.timer.cancel(pending.timeout_timer);

                match result {
                    Ok(StorageOutput::Stored) => {
                        let Some(record) = pending.record else {
                            tracing::error!("storage completed without a pending record");
                            return;
                        };
                        Self::transition(model, FormPhase::Succeeded);
                        caps.bus.publish_trail_stored(record);
                        Self::show_feedback(
                            model,
                            caps,
                            success_message(pending.draft.name()),
                            FeedbackKind::Success,
                        );
                        model.draft.clear();
                        Self::transition(model, FormPhase::Empty);
                    }
                    Err(err) => {
                        tracing::error!(error = %err, "failed to store trail");
                        Self::fail_submit(model, caps);
                    }
                }
            }

            Event::SubmitTimedOut { timer } => {
                let timed_out = model
                    .pending_submit
                    .as_ref()
                    .is_some_and(|pending| pending.timeout_timer == timer);
                if !timed_out {
                    tracing::debug!(?timer, "ignoring stale submit timeout");
                    return;
                }
                tracing::error!("submission timed out waiting for collaborators");
                Self::fail_submit(model, caps);
            }

            Event::FeedbackExpired { timer } => {
                let expired = model
                    .feedback
                    .as_ref()
                    .is_some_and(|feedback| feedback.timer == timer);
                if !expired {
                    tracing::debug!(?timer, "ignoring stale feedback timer");
                    return;
                }
                model.feedback = None;
            }

            Event::BackToMainRequested => {
                caps.nav.show(Page::Main);
                return;
            }
        }

        caps.render.render();
    }

    fn view(&self, model: &Model) -> ViewModel {
        ViewModel {
            title: FORM_TITLE.into(),
            name: model.draft.name.clone(),
            name_placeholder: NAME_PLACEHOLDER.into(),
            from_location: model.draft.from_location.clone(),
            from_placeholder: FROM_PLACEHOLDER.into(),
            to_location: model.draft.to_location.clone(),
            to_placeholder: TO_PLACEHOLDER.into(),
            image_preview: model.draft.image.clone(),
            distance_label: model
                .draft
                .preview_distance
                .as_deref()
                .map(distance_label)
                .unwrap_or_default(),
            feedback: model.feedback.as_ref().map(|feedback| FeedbackView {
                text: feedback.text.clone(),
                kind: feedback.kind,
            }),
            submitting: model.phase.is_submitting(),
            map_image_url: MAP_IMAGE_URL.into(),
        }
    }
}

impl App {
    fn transition(model: &mut Model, to: FormPhase) {
        if model.phase == to {
            return;
        }
        debug_assert!(
            model.phase.can_transition_to(to),
            "invalid phase transition {:?} -> {to:?}",
            model.phase
        );
        tracing::debug!(from = ?model.phase, to = ?to, "form phase transition");
        model.phase = to;
    }

    /// Field or image edits move the form between `Empty` and `Editing`.
    /// While a submit is in flight the phase is owned by the submit flow.
    fn refresh_editing_phase(model: &mut Model) {
        if model.phase.is_submitting() {
            return;
        }
        let next = if model.draft.is_empty() {
            FormPhase::Empty
        } else {
            FormPhase::Editing
        };
        Self::transition(model, next);
    }

    /// Every submit failure funnels through here: draft preserved, generic
    /// message shown, detail already logged by the caller.
    fn fail_submit(model: &mut Model, caps: &Capabilities) {
        if let Some(pending) = model.pending_submit.take() {
            caps.timer.cancel(pending.timeout_timer);
        }
        Self::transition(model, FormPhase::Failed);
        Self::show_feedback(model, caps, MSG_SAVE_FAILED.into(), FeedbackKind::Error);
        Self::transition(model, FormPhase::Editing);
    }

    /// One live expiry timer per component instance: a new message cancels
    /// the previous timer before scheduling its own.
    fn show_feedback(model: &mut Model, caps: &Capabilities, text: String, kind: FeedbackKind) {
        if let Some(previous) = model.feedback.take() {
            caps.timer.cancel(previous.timer);
        }
        let timer = model.next_timer_id();
        caps.timer
            .start(timer, FEEDBACK_DURATION_MS, |timer| Event::FeedbackExpired {
                timer,
            });
        model.feedback = Some(Feedback { text, kind, timer });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crux_core::App as _;

    #[test]
    fn view_of_default_model_is_blank() {
        let model = Model::default();
        let view = App.view(&model);
        assert_eq!(view.title, FORM_TITLE);
        assert!(view.name.is_empty());
        assert!(view.distance_label.is_empty());
        assert!(view.image_preview.is_none());
        assert!(view.feedback.is_none());
        assert!(!view.submitting);
    }

    #[test]
    fn view_projects_draft_and_preview() {
        let mut model = Model::default();
        model.draft.name = "Ridge Trail".into();
        model.draft.preview_distance = Some("10 km".into());
        let view = App.view(&model);
        assert_eq!(view.name, "Ridge Trail");
        assert_eq!(view.distance_label, "Distance: 10 km");
    }
}
