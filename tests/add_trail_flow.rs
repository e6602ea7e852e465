use crux_core::testing::AppTester;
use crux_core::App as _;
use traillog_core::capabilities::{
    BusOperation, DistanceOutput, StorageError, StorageOperation, StorageOutput, Topic,
};
use traillog_core::{
    success_message, App, DraftTrail, Effect, Event, FeedbackKind, FormPhase, Model,
    MSG_MISSING_FIELDS, MSG_SAVE_FAILED,
};

fn tester() -> AppTester<App, Effect> {
    AppTester::default()
}

fn fill_form(app: &AppTester<App, Effect>, model: &mut Model) {
    app.update(
        Event::NameChanged {
            value: "Ridge Trail".into(),
        },
        model,
    );
    app.update(
        Event::FromLocationChanged {
            value: "Camp A".into(),
        },
        model,
    );
    app.update(
        Event::ToLocationChanged {
            value: "Camp B".into(),
        },
        model,
    );
}

fn storage_ops(effects: &[Effect]) -> Vec<StorageOperation> {
    effects
        .iter()
        .filter_map(|effect| match effect {
            Effect::Storage(request) => Some(request.operation.clone()),
            _ => None,
        })
        .collect()
}

fn publish_ops(effects: &[Effect]) -> Vec<BusOperation> {
    effects
        .iter()
        .filter_map(|effect| match effect {
            Effect::Bus(request) => Some(request.operation.clone()),
            _ => None,
        })
        .collect()
}

fn count_distance_requests(effects: &[Effect]) -> usize {
    effects
        .iter()
        .filter(|effect| matches!(effect, Effect::Distance(_)))
        .count()
}

#[test]
fn submit_with_empty_name_contacts_no_collaborator() {
    let app = tester();
    let mut model = Model::default();

    app.update(
        Event::FromLocationChanged {
            value: "Camp A".into(),
        },
        &mut model,
    );
    app.update(
        Event::ToLocationChanged {
            value: "Camp B".into(),
        },
        &mut model,
    );

    let update = app.update(Event::SubmitRequested, &mut model);

    assert_eq!(count_distance_requests(&update.effects), 0);
    assert!(storage_ops(&update.effects).is_empty());
    assert!(model.pending_submit.is_none());
    assert_eq!(model.phase, FormPhase::Editing);

    let feedback = model.feedback.as_ref().expect("validation feedback shown");
    assert_eq!(feedback.kind, FeedbackKind::Error);
    assert_eq!(feedback.text, MSG_MISSING_FIELDS);

    // The draft the user typed is untouched.
    assert_eq!(model.draft.from_location, "Camp A");
    assert_eq!(model.draft.to_location, "Camp B");
}

#[test]
fn valid_submit_computes_distance_before_storing() {
    let app = tester();
    let mut model = Model::default();
    fill_form(&app, &mut model);

    let update = app.update(Event::SubmitRequested, &mut model);
    assert_eq!(model.phase, FormPhase::Submitting);

    // Exactly one distance lookup, and storage is not contacted until it
    // completes.
    assert_eq!(count_distance_requests(&update.effects), 1);
    assert!(storage_ops(&update.effects).is_empty());

    let generation = model.pending_submit.as_ref().unwrap().generation;
    let update = app.update(
        Event::SubmitDistanceComputed {
            generation,
            result: Ok(DistanceOutput::Computed {
                distance: "10 km".into(),
            }),
        },
        &mut model,
    );

    let ops = storage_ops(&update.effects);
    assert_eq!(ops.len(), 1);
    let StorageOperation::StoreTrail { record } = &ops[0];
    assert_eq!(record.name(), "Ridge Trail");
    assert_eq!(record.distance(), "10 km");
    assert_eq!(count_distance_requests(&update.effects), 0);
}

#[test]
fn storage_success_publishes_resets_and_reports() {
    let app = tester();
    let mut model = Model::default();
    fill_form(&app, &mut model);

    app.update(Event::SubmitRequested, &mut model);
    let generation = model.pending_submit.as_ref().unwrap().generation;
    app.update(
        Event::SubmitDistanceComputed {
            generation,
            result: Ok(DistanceOutput::Computed {
                distance: "10 km".into(),
            }),
        },
        &mut model,
    );

    let update = app.update(
        Event::TrailStored {
            generation,
            result: Ok(StorageOutput::Stored),
        },
        &mut model,
    );

    let publishes = publish_ops(&update.effects);
    assert_eq!(publishes.len(), 1);
    let BusOperation::Publish { topic, record } = &publishes[0];
    assert_eq!(*topic, Topic::TrailStored);
    assert_eq!(topic.as_str(), "trail_stored");
    assert_eq!(record.name(), "Ridge Trail");
    assert_eq!(record.distance(), "10 km");

    let feedback = model.feedback.as_ref().expect("success feedback shown");
    assert_eq!(feedback.kind, FeedbackKind::Success);
    assert_eq!(feedback.text, success_message("Ridge Trail"));

    // Full reset: draft back to its initial empty state.
    assert_eq!(model.draft, DraftTrail::default());
    assert_eq!(model.phase, FormPhase::Empty);
    assert!(model.pending_submit.is_none());
}

#[test]
fn edits_during_an_in_flight_submit_do_not_leak_into_the_record() {
    let app = tester();
    let mut model = Model::default();
    fill_form(&app, &mut model);

    app.update(Event::SubmitRequested, &mut model);
    let generation = model.pending_submit.as_ref().unwrap().generation;

    // Rename while the distance lookup is still out.
    app.update(
        Event::NameChanged {
            value: "Hacked".into(),
        },
        &mut model,
    );

    let update = app.update(
        Event::SubmitDistanceComputed {
            generation,
            result: Ok(DistanceOutput::Computed {
                distance: "10 km".into(),
            }),
        },
        &mut model,
    );

    // The stored record carries the snapshot taken at submit time.
    let ops = storage_ops(&update.effects);
    assert_eq!(ops.len(), 1);
    let StorageOperation::StoreTrail { record } = &ops[0];
    assert_eq!(record.name(), "Ridge Trail");

    // The edit is not lost; it just belongs to the next submission.
    assert_eq!(model.draft.name, "Hacked");
}

#[test]
fn storage_failure_preserves_draft_and_publishes_nothing() {
    let app = tester();
    let mut model = Model::default();
    fill_form(&app, &mut model);
    app.update(Event::CalculateDistanceRequested, &mut model);
    app.update(
        Event::DistancePreviewComputed {
            generation: model.distance_previews.latest(),
            result: Ok(DistanceOutput::Computed {
                distance: "10 km".into(),
            }),
        },
        &mut model,
    );

    let draft_before = model.draft.clone();

    app.update(Event::SubmitRequested, &mut model);
    let generation = model.pending_submit.as_ref().unwrap().generation;
    app.update(
        Event::SubmitDistanceComputed {
            generation,
            result: Ok(DistanceOutput::Computed {
                distance: "10 km".into(),
            }),
        },
        &mut model,
    );

    let update = app.update(
        Event::TrailStored {
            generation,
            result: Err(StorageError::Unavailable {
                reason: "disk full".into(),
            }),
        },
        &mut model,
    );

    assert!(publish_ops(&update.effects).is_empty());
    assert_eq!(model.draft, draft_before);
    assert_eq!(model.phase, FormPhase::Editing);

    let feedback = model.feedback.as_ref().expect("error feedback shown");
    assert_eq!(feedback.kind, FeedbackKind::Error);
    assert_eq!(feedback.text, MSG_SAVE_FAILED);
}

#[test]
fn distance_failure_during_submit_reads_as_save_failure() {
    let app = tester();
    let mut model = Model::default();
    fill_form(&app, &mut model);

    app.update(Event::SubmitRequested, &mut model);
    let generation = model.pending_submit.as_ref().unwrap().generation;
    let update = app.update(
        Event::SubmitDistanceComputed {
            generation,
            result: Err(traillog_core::capabilities::DistanceError::Unavailable {
                reason: "geocoder offline".into(),
            }),
        },
        &mut model,
    );

    assert!(storage_ops(&update.effects).is_empty());
    assert_eq!(model.phase, FormPhase::Editing);
    assert_eq!(model.draft.name, "Ridge Trail");
    let feedback = model.feedback.as_ref().expect("error feedback shown");
    assert_eq!(feedback.text, MSG_SAVE_FAILED);
}

#[test]
fn distance_preview_updates_label_without_submitting() {
    let app = tester();
    let mut model = Model::default();

    // Preview with empty fields must not error.
    let update = app.update(Event::CalculateDistanceRequested, &mut model);
    assert_eq!(count_distance_requests(&update.effects), 1);
    assert_eq!(model.phase, FormPhase::Previewing);
    assert!(model.pending_submit.is_none());

    app.update(
        Event::DistancePreviewComputed {
            generation: model.distance_previews.latest(),
            result: Ok(DistanceOutput::Computed {
                distance: "10 km".into(),
            }),
        },
        &mut model,
    );

    assert_eq!(model.draft.preview_distance.as_deref(), Some("10 km"));
    let view = App.view(&model);
    assert_eq!(view.distance_label, "Distance: 10 km");
}
