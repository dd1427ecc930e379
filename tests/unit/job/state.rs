use super::*;

#[test]
fn lifecycle_moves_through_running_to_one_terminal_state() {
    let s = RenderJobState::new(3);
    assert_eq!(s.status(), JobStatus::Idle);
    s.start().unwrap();
    assert_eq!(s.status(), JobStatus::Running);
    assert!(matches!(s.start(), Err(HomeshotError::IllegalState(_))));

    assert!(s.finish(JobStatus::Completed));
    assert!(!s.finish(JobStatus::Cancelled));
    assert_eq!(s.status(), JobStatus::Completed);
}

#[test]
fn cancel_is_idempotent_and_ignored_after_termination() {
    let s = RenderJobState::new(1);
    s.start().unwrap();
    assert!(s.request_cancel());
    assert!(s.request_cancel());
    assert!(s.cancel_requested());

    let done = RenderJobState::new(1);
    done.start().unwrap();
    done.finish(JobStatus::Completed);
    assert!(!done.request_cancel());
    assert!(!done.cancel_requested());
}

#[test]
fn failure_keeps_first_cause_and_clears_preview() {
    let s = RenderJobState::new(2);
    s.start().unwrap();
    s.begin_frame(0);
    s.frame_written(Arc::new(FrameBuffer::new(1, 1).unwrap()));
    assert!(s.preview().is_some());
    assert_eq!(s.written(), 1);

    assert!(s.fail(Arc::new(HomeshotError::render("first"))));
    assert!(!s.fail(Arc::new(HomeshotError::render("second"))));
    assert_eq!(s.status(), JobStatus::Failed);
    assert!(s.preview().is_none());
    assert!(s.failure().unwrap().to_string().contains("first"));
}

#[test]
fn snapshot_reflects_counters() {
    let s = RenderJobState::new(4);
    s.start().unwrap();
    s.begin_frame(2);
    s.set_frame_progress(0.25);
    s.set_frame_progress(f32::NAN);
    let snap = s.snapshot();
    assert_eq!(snap.current, 2);
    assert_eq!(snap.total, 4);
    assert_eq!(snap.frame_progress, 0.0);
    assert_eq!(snap.status, JobStatus::Running);
    assert!(JobStatus::Failed.is_terminal());
    assert!(!JobStatus::Running.is_terminal());
}
