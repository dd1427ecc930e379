use super::*;
use crate::render::frame::FrameBuffer;
use crate::scene::camera::Viewpoint;
use std::sync::Mutex;
use std::time::Instant;

/// Presents a frame filled with the staged background after `delay`, from another thread.
struct DelayedView {
    background: Rgba8,
    presented: Arc<Mutex<Option<FrameBuffer>>>,
    listener: Option<SwapListener>,
    delay: Option<Duration>,
    redraws: usize,
}

impl DelayedView {
    fn new(delay: Option<Duration>) -> Self {
        Self {
            background: [10, 20, 30, 255],
            presented: Arc::new(Mutex::new(None)),
            listener: None,
            delay,
            redraws: 0,
        }
    }
}

impl LiveView<()> for DelayedView {
    fn bounds(&self) -> ViewBounds {
        ViewBounds::at_origin(4, 3)
    }

    fn background(&self) -> Rgba8 {
        self.background
    }

    fn set_background(&mut self, rgba: Rgba8) {
        self.background = rgba;
    }

    fn show(&mut self, _: &(), _: &Viewpoint, _: u32, _: u32, _: bool) -> HomeshotResult<()> {
        Ok(())
    }

    fn request_redraw(&mut self) {
        self.redraws += 1;
        let Some(delay) = self.delay else {
            return;
        };
        let bg = self.background;
        let presented = Arc::clone(&self.presented);
        let listener = self.listener.clone();
        std::thread::spawn(move || {
            std::thread::sleep(delay);
            *presented.lock().unwrap() = Some(FrameBuffer::filled(4, 3, bg).unwrap());
            if let Some(l) = listener {
                l();
            }
        });
    }

    fn set_swap_listener(&mut self, listener: Option<SwapListener>) {
        self.listener = listener;
    }

    fn capture_region(&self, region: ViewBounds) -> HomeshotResult<FrameBuffer> {
        match self.presented.lock().unwrap().as_ref() {
            Some(f) => f.crop(0, 0, region.width, region.height),
            None => FrameBuffer::filled(region.width, region.height, [1, 1, 1, 255]),
        }
    }
}

#[test]
fn signal_does_not_lose_early_swaps() {
    let signal = SwapSignal::new();
    let seen = signal.generation();
    signal.listener()();
    assert!(signal.wait_past(seen, Duration::from_millis(1)));
    assert!(!signal.wait_past(signal.generation(), Duration::from_millis(5)));
}

#[test]
fn capture_waits_for_the_asynchronous_swap() {
    let mut view = DelayedView::new(Some(Duration::from_millis(30)));
    let live: &mut dyn LiveView<()> = &mut view;
    let cap = capture_frame(live, CaptureOpts::default()).unwrap();
    assert!(cap.swap_observed);
    assert_eq!(cap.frame.pixel(3, 2), Some([10, 20, 30, 255]));
    assert!(view.listener.is_none());
}

#[test]
fn pair_uses_white_then_black_and_restores_background() {
    let mut view = DelayedView::new(Some(Duration::from_millis(5)));
    let live: &mut dyn LiveView<()> = &mut view;
    let pair = capture_pair(live, CaptureOpts::default()).unwrap();
    assert!(pair.on_white.swap_observed && pair.on_black.swap_observed);
    assert_eq!(pair.on_white.frame.pixel(0, 0), Some(OPAQUE_WHITE));
    assert_eq!(pair.on_black.frame.pixel(0, 0), Some(OPAQUE_BLACK));
    assert_eq!(view.background, [10, 20, 30, 255]);
    assert_eq!(view.redraws, 2);
    assert!(view.listener.is_none());
}

#[test]
fn stalled_view_times_out_best_effort() {
    let mut view = DelayedView::new(None);
    let live: &mut dyn LiveView<()> = &mut view;
    let start = Instant::now();
    let pair = capture_pair(
        live,
        CaptureOpts {
            swap_timeout: Duration::from_millis(40),
        },
    )
    .unwrap();
    assert!(start.elapsed() >= Duration::from_millis(40));
    assert!(!pair.on_white.swap_observed);
    assert!(!pair.on_black.swap_observed);
    assert_eq!(pair.on_white.frame.pixel(0, 0), Some([1, 1, 1, 255]));
    assert_eq!(view.background, [10, 20, 30, 255]);
}
