use super::*;
use crate::foundation::core::{Rgba8, ViewBounds};
use crate::render::backend::SwapListener;

/// Draws a 2x2 opaque red square in the middle of the view, synchronously.
#[derive(Default)]
struct SquareView {
    background: Rgba8,
    size: u32,
    presented: Option<FrameBuffer>,
    listener: Option<SwapListener>,
}

impl LiveView<&'static str> for SquareView {
    fn bounds(&self) -> ViewBounds {
        ViewBounds::at_origin(self.size, self.size)
    }

    fn background(&self) -> Rgba8 {
        self.background
    }

    fn set_background(&mut self, rgba: Rgba8) {
        self.background = rgba;
    }

    fn show(&mut self, _: &&'static str, _: &Viewpoint, w: u32, _: u32, aa: bool) -> HomeshotResult<()> {
        assert!(aa, "icons are antialiased");
        self.size = w;
        Ok(())
    }

    fn request_redraw(&mut self) {
        let mut f = FrameBuffer::filled(self.size, self.size, self.background).unwrap();
        let mid = self.size / 2;
        for (x, y) in [(mid - 1, mid - 1), (mid, mid - 1), (mid - 1, mid), (mid, mid)] {
            f.set_pixel(x, y, [220, 0, 0, 255]);
        }
        self.presented = Some(f);
        if let Some(l) = &self.listener {
            l();
        }
    }

    fn set_swap_listener(&mut self, listener: Option<SwapListener>) {
        self.listener = listener;
    }

    fn capture_region(&self, region: ViewBounds) -> HomeshotResult<FrameBuffer> {
        self.presented
            .as_ref()
            .ok_or_else(|| HomeshotError::render("nothing presented"))?
            .crop(0, 0, region.width, region.height)
    }
}

#[test]
fn icon_background_is_transparent_and_model_opaque() {
    let mut view = SquareView {
        background: [1, 2, 3, 255],
        ..SquareView::default()
    };
    let vp = Viewpoint::new("Front", [0.0, 0.0, 0.0], 0.0, 0.0);
    let icon = generate_icon::<&'static str>(&mut view, &"scene", &vp, 6, CaptureOpts::default()).unwrap();

    assert_eq!((icon.width(), icon.height()), (6, 6));
    assert_eq!(icon.pixel(0, 0), Some([0, 0, 0, 0]));
    assert_eq!(icon.pixel(3, 3), Some([220, 0, 0, 255]));
    let opaque = icon.data().chunks_exact(4).filter(|p| p[3] == 255).count();
    assert_eq!(opaque, 4);
    assert_eq!(view.background, [1, 2, 3, 255]);
}

#[test]
fn zero_size_is_rejected() {
    let mut view = SquareView::default();
    let vp = Viewpoint::new("Front", [0.0, 0.0, 0.0], 0.0, 0.0);
    let err = generate_icon::<&'static str>(&mut view, &"scene", &vp, 0, CaptureOpts::default()).unwrap_err();
    assert!(matches!(err, HomeshotError::Configuration(_)));
}
