use std::io::Cursor;

use image_particles::error::AppError;
use image_particles::window::App;
use image_particles::{ImageSource, Settings};
use winit::event_loop::{ControlFlow, EventLoop};

const DEMO_SIZE: u32 = 320;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

/// `image-particles [IMAGE] [SETTINGS.json]`
fn run() -> Result<(), AppError> {
    let mut args = std::env::args().skip(1);
    let image = args.next();
    let settings = match args.next() {
        Some(path) => {
            log::info!("Loading settings from {}", path);
            Settings::load(path)?
        }
        None => Settings::default(),
    };

    let source = match image {
        Some(reference) => Some(ImageSource::parse(&reference)),
        None => {
            log::info!("No image given, showing the built-in demo");
            demo_image()
        }
    };

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(settings, source);
    event_loop.run_app(&mut app)?;
    app.into_result()
}

/// A hue wheel on a transparent background, PNG encoded.
fn demo_image() -> Option<ImageSource> {
    let center = DEMO_SIZE as f32 / 2.0;
    let img = image::RgbaImage::from_fn(DEMO_SIZE, DEMO_SIZE, |x, y| {
        let dx = x as f32 - center;
        let dy = y as f32 - center;
        let r = (dx * dx + dy * dy).sqrt() / center;
        if r > 1.0 || r < 0.35 {
            return image::Rgba([0, 0, 0, 0]);
        }
        let hue = (dy.atan2(dx) / std::f32::consts::TAU + 0.5) * 6.0;
        let channel = |offset: f32| {
            let t = ((hue + offset) % 6.0 - 3.0).abs() - 1.0;
            (t.clamp(0.0, 1.0) * 255.0) as u8
        };
        image::Rgba([channel(0.0), channel(4.0), channel(2.0), 255])
    });

    let mut bytes = Vec::new();
    match img.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png) {
        Ok(()) => Some(ImageSource::Bytes(bytes)),
        Err(e) => {
            log::warn!("Could not encode demo image: {}", e);
            None
        }
    }
}
