use super::*;
use futures::executor::block_on;
use futures::future::{self, AbortRegistration, Abortable};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Clone, Default)]
struct RecordingDispatcher {
    jobs: Rc<RefCell<Vec<UploadJob>>>,
}

impl RecordingDispatcher {
    fn take_job(&self) -> UploadJob {
        self.jobs.borrow_mut().remove(0)
    }

    fn job_count(&self) -> usize {
        self.jobs.borrow().len()
    }
}

impl UploadDispatcher for RecordingDispatcher {
    fn dispatch(&self, job: UploadJob) {
        self.jobs.borrow_mut().push(job);
    }
}

fn controller() -> (UploadController, RecordingDispatcher) {
    let dispatcher = RecordingDispatcher::default();
    let controller = UploadController::new(Box::new(dispatcher.clone()));
    (controller, dispatcher)
}

fn file(name: &str) -> FileHandle {
    FileHandle::new(format!("/data/{name}"), 10)
}

fn filled_controller() -> (UploadController, RecordingDispatcher) {
    let (mut controller, dispatcher) = controller();
    controller.edit_field(Field::UserName, "Ada".to_string());
    controller.edit_field(Field::Description, "Quarterly receipts".to_string());
    controller.add_files(vec![file("a.pdf"), file("b.pdf")]);
    (controller, dispatcher)
}

fn names(controller: &UploadController) -> Vec<&str> {
    controller.files().iter().map(|f| f.name()).collect()
}

fn is_aborted(registration: AbortRegistration) -> bool {
    block_on(Abortable::new(future::pending::<()>(), registration)).is_err()
}

fn is_live(registration: AbortRegistration) -> bool {
    block_on(Abortable::new(future::ready(()), registration)).is_ok()
}

#[test]
fn added_files_keep_order_and_duplicates() {
    let (mut controller, _) = controller();
    controller.add_files(vec![file("a.pdf"), file("b.pdf")]);
    controller.add_files(vec![file("a.pdf")]);

    assert_eq!(names(&controller), ["a.pdf", "b.pdf", "a.pdf"]);
    assert_eq!(controller.live_previews(), 3);
}

#[test]
fn remove_file_drops_first_match_only() {
    let (mut controller, _) = controller();
    controller.add_files(vec![file("a.pdf"), file("b.pdf"), file("a.pdf")]);
    let second_a = controller.files()[2].preview;

    controller.remove_file("a.pdf");

    assert_eq!(names(&controller), ["b.pdf", "a.pdf"]);
    assert_eq!(controller.files()[1].preview, second_a);
    assert_eq!(controller.live_previews(), 2);
}

#[test]
fn remove_unknown_name_is_a_no_op() {
    let (mut controller, _) = controller();
    controller.add_files(vec![file("a.pdf")]);
    controller.remove_file("missing.pdf");
    controller.remove_file_at(7);
    assert_eq!(names(&controller), ["a.pdf"]);
}

#[test]
fn remove_after_clear_is_a_no_op() {
    let (mut controller, _) = controller();
    controller.add_files(vec![file("a.pdf"), file("b.pdf")]);
    controller.clear_files();
    controller.remove_file("a.pdf");

    assert!(controller.files().is_empty());
    assert_eq!(controller.live_previews(), 0);
}

#[test]
fn preview_resolves_until_file_is_removed() {
    let (mut controller, _) = controller();
    controller.add_files(vec![file("a.pdf")]);
    let preview = controller.files()[0].preview;
    assert_eq!(
        controller.preview_path(preview),
        Some(Path::new("/data/a.pdf"))
    );

    controller.remove_file_at(0);
    assert_eq!(controller.preview_path(preview), None);
}

#[test]
fn incomplete_form_cannot_be_submitted() {
    let (mut controller, dispatcher) = controller();
    assert!(!controller.start_upload());

    controller.add_files(vec![file("a.pdf")]);
    assert!(!controller.start_upload());

    controller.edit_field(Field::UserName, "Ada".to_string());
    assert!(!controller.can_submit());
    assert!(!controller.start_upload());

    controller.edit_field(Field::Description, "Receipts".to_string());
    controller.clear_files();
    assert!(!controller.start_upload());

    assert_eq!(dispatcher.job_count(), 0);
    assert_eq!(controller.status(), UploadStatus::Idle);
}

#[test]
fn start_upload_dispatches_the_whole_form() {
    let (mut controller, dispatcher) = filled_controller();
    assert!(controller.start_upload());

    assert_eq!(controller.status(), UploadStatus::Uploading);
    assert_eq!(controller.progress(), 0);
    assert!(!controller.can_submit());
    assert!(!controller.start_upload());
    assert_eq!(dispatcher.job_count(), 1);

    let job = dispatcher.take_job();
    assert_eq!(job.request.user_name, "Ada");
    assert_eq!(job.request.description, "Quarterly receipts");
    let sent: Vec<_> = job.request.files.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(sent, ["a.pdf", "b.pdf"]);
}

#[test]
fn success_clears_form_and_reports_server_message() {
    let (mut controller, dispatcher) = filled_controller();
    controller.start_upload();
    let job = dispatcher.take_job();

    job.events.send(UploadEvent::Progress(40)).unwrap();
    job.events
        .send(UploadEvent::Finished(Ok(UploadReceipt {
            message: "ok".to_string(),
        })))
        .unwrap();
    assert!(controller.poll_events());

    assert_eq!(controller.status(), UploadStatus::Succeeded);
    assert!(controller.files().is_empty());
    assert_eq!(controller.fields(), &FormFields::default());
    assert_eq!(
        controller.notification(),
        Some(&Notification::new("ok", Severity::Success))
    );
    assert_eq!(controller.progress(), 0);
    assert_eq!(controller.live_previews(), 0);
}

#[test]
fn rejection_keeps_form_and_reports_server_message() {
    let (mut controller, dispatcher) = filled_controller();
    let fields_before = controller.fields().clone();
    controller.start_upload();
    let job = dispatcher.take_job();

    job.events
        .send(UploadEvent::Finished(Err(UploadError::Rejected {
            status: 400,
            error: "bad".to_string(),
            message: "Invalid description".to_string(),
        })))
        .unwrap();
    controller.poll_events();

    assert_eq!(controller.status(), UploadStatus::Failed);
    assert_eq!(
        controller.notification(),
        Some(&Notification::new("Invalid description", Severity::Error))
    );
    assert_eq!(controller.progress(), 0);
    assert_eq!(controller.fields(), &fields_before);
    assert_eq!(names(&controller), ["a.pdf", "b.pdf"]);
    assert!(controller.can_submit());
}

#[test]
fn malformed_error_body_is_reported_as_failure() {
    let (mut controller, dispatcher) = filled_controller();
    controller.start_upload();
    let job = dispatcher.take_job();

    let source = serde_json::from_str::<serde_json::Value>("<html>").unwrap_err();
    job.events
        .send(UploadEvent::Finished(Err(UploadError::MalformedResponse {
            status: 502,
            source,
        })))
        .unwrap();
    controller.poll_events();

    assert_eq!(controller.status(), UploadStatus::Failed);
    assert_eq!(
        controller.notification(),
        Some(&Notification::new(
            "Upload failed with status 502",
            Severity::Error
        ))
    );
}

#[test]
fn cancel_resets_immediately_and_next_upload_gets_fresh_token() {
    let (mut controller, dispatcher) = filled_controller();
    controller.start_upload();
    let first = dispatcher.take_job();
    first.events.send(UploadEvent::Progress(55)).unwrap();
    controller.poll_events();
    assert_eq!(controller.progress(), 55);

    controller.cancel_upload();

    assert_eq!(controller.status(), UploadStatus::Cancelled);
    assert!(controller.files().is_empty());
    assert_eq!(controller.progress(), 0);
    assert_eq!(
        controller.notification(),
        Some(&Notification::new(CANCELLED_MESSAGE, Severity::Info))
    );
    assert!(is_aborted(first.registration));

    // Late events from the aborted worker are ignored.
    let _ = first.events.send(UploadEvent::Progress(90));
    assert!(!controller.poll_events());
    assert_eq!(controller.progress(), 0);

    controller.add_files(vec![file("c.pdf")]);
    assert!(controller.start_upload());
    let second = dispatcher.take_job();
    second
        .events
        .send(UploadEvent::Finished(Ok(UploadReceipt {
            message: "stored".to_string(),
        })))
        .unwrap();
    controller.poll_events();

    assert_eq!(controller.status(), UploadStatus::Succeeded);
    assert!(is_live(second.registration));
}

#[test]
fn worker_reported_cancellation_settles_like_a_cancel() {
    let (mut controller, dispatcher) = filled_controller();
    controller.start_upload();
    let job = dispatcher.take_job();

    job.events
        .send(UploadEvent::Finished(Err(UploadError::Cancelled)))
        .unwrap();
    controller.poll_events();

    assert_eq!(controller.status(), UploadStatus::Cancelled);
    assert!(controller.files().is_empty());
    assert_eq!(
        controller.notification().map(|n| n.severity),
        Some(Severity::Info)
    );
}

#[test]
fn cancel_without_upload_does_nothing() {
    let (mut controller, _) = filled_controller();
    controller.cancel_upload();
    assert_eq!(controller.status(), UploadStatus::Idle);
    assert_eq!(controller.files().len(), 2);
    assert!(controller.notification().is_none());
}

#[test]
fn progress_never_decreases_and_stays_in_range() {
    let (mut controller, dispatcher) = filled_controller();
    controller.start_upload();
    let job = dispatcher.take_job();

    let mut seen = Vec::new();
    for percent in [10, 30, 20, 250, 60] {
        job.events.send(UploadEvent::Progress(percent)).unwrap();
        controller.poll_events();
        seen.push(controller.progress());
    }

    assert_eq!(seen, [10, 30, 30, 100, 100]);
}

#[test]
fn vanished_worker_fails_the_upload() {
    let (mut controller, dispatcher) = filled_controller();
    controller.start_upload();
    drop(dispatcher.take_job());

    assert!(controller.poll_events());
    assert_eq!(controller.status(), UploadStatus::Failed);
    assert_eq!(controller.progress(), 0);
}

#[test]
fn dismissing_notification_returns_to_idle() {
    let (mut controller, dispatcher) = filled_controller();
    controller.start_upload();
    controller.cancel_upload();
    drop(dispatcher.take_job());

    assert!(!controller.dismiss_expired(Duration::from_secs(3600)));
    assert!(controller.dismiss_expired(Duration::ZERO));
    assert!(controller.notification().is_none());
    assert_eq!(controller.status(), UploadStatus::Idle);
}

#[test]
fn file_list_is_locked_while_uploading() {
    let (mut controller, dispatcher) = filled_controller();
    controller.start_upload();
    let job = dispatcher.take_job();

    controller.remove_file_at(0);
    controller.remove_file("b.pdf");
    controller.clear_files();
    controller.add_files(vec![file("z.pdf")]);
    assert_eq!(names(&controller), ["a.pdf", "b.pdf"]);
    assert_eq!(
        controller.notification(),
        Some(&Notification::new(BUSY_MESSAGE, Severity::Info))
    );

    job.events
        .send(UploadEvent::Finished(Err(UploadError::Rejected {
            status: 400,
            error: "bad".to_string(),
            message: "Invalid description".to_string(),
        })))
        .unwrap();
    controller.poll_events();

    let sent: Vec<_> = job.request.files.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names(&controller), sent);
    assert_eq!(controller.live_previews(), 2);

    controller.add_files(vec![file("z.pdf")]);
    assert_eq!(names(&controller), ["a.pdf", "b.pdf", "z.pdf"]);
}
