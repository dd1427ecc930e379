use super::*;
use std::sync::atomic::{AtomicUsize, Ordering};

fn progress(index: usize) -> JobEvent {
    JobEvent::Progress {
        index,
        total: 2,
        path: PathBuf::from(format!("{index}.png")),
    }
}

#[test]
fn late_subscriber_gets_history_in_order() {
    let hub = EventHub::default();
    hub.publish(progress(0));

    let (tx, rx) = mpsc::channel();
    hub.subscribe(Arc::new(ChannelObserver(tx)));
    hub.publish(progress(1));
    hub.publish(JobEvent::Completed { written: 2 });

    let got: Vec<JobEvent> = rx.try_iter().collect();
    assert_eq!(got.len(), 3);
    assert!(matches!(got[0], JobEvent::Progress { index: 0, .. }));
    assert!(matches!(got[1], JobEvent::Progress { index: 1, .. }));
    assert!(got[2].is_terminal());
    assert_eq!(hub.history().len(), 3);
}

#[test]
fn closure_observer_routes_terminal_states() {
    let progress_calls = Arc::new(AtomicUsize::new(0));
    let finished = Arc::new(Mutex::new(Vec::new()));
    let failures = Arc::new(AtomicUsize::new(0));

    let observer = FnObserver::new(
        {
            let p = Arc::clone(&progress_calls);
            move |_, _| {
                p.fetch_add(1, Ordering::SeqCst);
            }
        },
        {
            let f = Arc::clone(&finished);
            move |status, written| f.lock().unwrap().push((status, written))
        },
        {
            let f = Arc::clone(&failures);
            move |_: &HomeshotError| {
                f.fetch_add(1, Ordering::SeqCst);
            }
        },
    );

    observer.on_event(&progress(0));
    observer.on_event(&JobEvent::Cancelled { written: 1 });
    observer.on_event(&JobEvent::Completed { written: 2 });
    observer.on_event(&JobEvent::Failed(Arc::new(HomeshotError::render("x"))));

    assert_eq!(progress_calls.load(Ordering::SeqCst), 1);
    assert_eq!(
        *finished.lock().unwrap(),
        vec![(JobStatus::Cancelled, 1), (JobStatus::Completed, 2)]
    );
    assert_eq!(failures.load(Ordering::SeqCst), 1);
}

#[test]
fn channel_observer_shares_the_original_error() {
    let (tx, rx) = mpsc::channel();
    let hub = EventHub::default();
    hub.subscribe(Arc::new(ChannelObserver(tx)));
    let err = Arc::new(HomeshotError::io(
        "x.png",
        std::io::Error::other("disk full"),
    ));
    hub.publish(JobEvent::Failed(Arc::clone(&err)));

    match rx.recv().unwrap() {
        JobEvent::Failed(got) => {
            assert!(Arc::ptr_eq(&got, &err));
            assert!(matches!(*got, HomeshotError::Io { .. }));
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[test]
fn panicking_observer_does_not_block_others() {
    struct Boom;
    impl JobObserver for Boom {
        fn on_progress(&self, _: usize, _: usize, _: &Path) {
            panic!("observer bug");
        }
    }

    let hub = EventHub::default();
    let (tx, rx) = mpsc::channel();
    hub.subscribe(Arc::new(Boom));
    hub.subscribe(Arc::new(ChannelObserver(tx)));
    hub.publish(progress(0));
    assert!(matches!(rx.recv().unwrap(), JobEvent::Progress { index: 0, .. }));
}
