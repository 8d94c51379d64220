//! Background image loading.
//!
//! Decoding an image and sampling it into particles can take longer than a
//! frame, so [`ImageLoader`] does both on a worker thread and hands back a
//! finished [`ParticleField`]. The render loop polls once per frame and
//! swaps the field in whole; a failed load never touches the running field.
//!
//! When several requests overlap only the most recent one is delivered.

use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;

use crate::error::LoadError;
use crate::field::ParticleField;
use crate::pixels::{ImageSource, PixelBuffer};
use crate::settings::Settings;

/// A successfully loaded image, ready to swap in.
#[derive(Debug)]
pub struct LoadedImage {
    /// Where the pixels came from.
    pub source: ImageSource,
    /// Source image size in pixels; the output area follows it.
    pub size: (u32, u32),
    /// The freshly built field.
    pub field: ParticleField,
}

/// Load `source` and build its field on the calling thread.
pub fn load_field(source: &ImageSource, settings: &Settings) -> Result<LoadedImage, LoadError> {
    let pixels = PixelBuffer::load(source)?;
    let layout = settings.layout_for(&pixels);
    let field = ParticleField::build(&pixels, &layout)?
        .with_parallel_threshold(settings.parallel_threshold);
    Ok(LoadedImage {
        source: source.clone(),
        size: (pixels.width(), pixels.height()),
        field,
    })
}

struct Completed {
    generation: u64,
    source: ImageSource,
    result: Result<LoadedImage, LoadError>,
}

/// Loads images off the render thread.
pub struct ImageLoader {
    settings: Settings,
    tx: Sender<Completed>,
    rx: Receiver<Completed>,
    requested: u64,
    in_flight: usize,
}

impl ImageLoader {
    pub fn new(settings: Settings) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            settings,
            tx,
            rx,
            requested: 0,
            in_flight: 0,
        }
    }

    /// Whether any request has not been collected yet.
    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    /// Start loading `source` in the background.
    pub fn request(&mut self, source: ImageSource) {
        self.spawn(source, load_field);
    }

    /// Run `job` on a worker thread. A panicking job still reports back, so
    /// [`wait`](Self::wait) cannot hang on it.
    fn spawn<F>(&mut self, source: ImageSource, job: F)
    where
        F: FnOnce(&ImageSource, &Settings) -> Result<LoadedImage, LoadError> + Send + 'static,
    {
        self.requested += 1;
        self.in_flight += 1;
        let generation = self.requested;
        let settings = self.settings.clone();
        let tx = self.tx.clone();

        log::info!("Loading image {}", source.describe());
        thread::spawn(move || {
            let result = panic::catch_unwind(AssertUnwindSafe(|| job(&source, &settings)))
                .unwrap_or(Err(LoadError::WorkerPanicked));
            // Ignore send errors - the loader may have been dropped
            let _ = tx.send(Completed {
                generation,
                source,
                result,
            });
        });
    }

    /// Collect the latest finished request, if any, without blocking.
    pub fn poll(&mut self) -> Option<Result<LoadedImage, LoadError>> {
        loop {
            match self.rx.try_recv() {
                Ok(completed) => {
                    if let Some(result) = self.accept(completed) {
                        return Some(result);
                    }
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => return None,
            }
        }
    }

    /// Block until the latest request finishes.
    ///
    /// Returns `None` immediately when nothing is in flight.
    pub fn wait(&mut self) -> Option<Result<LoadedImage, LoadError>> {
        while self.in_flight > 0 {
            let completed = self.rx.recv().ok()?;
            if let Some(result) = self.accept(completed) {
                return Some(result);
            }
        }
        None
    }

    fn accept(&mut self, completed: Completed) -> Option<Result<LoadedImage, LoadError>> {
        self.in_flight -= 1;
        if completed.generation < self.requested {
            log::debug!(
                "Discarding superseded load of {}",
                completed.source.describe()
            );
            return None;
        }
        if let Err(e) = &completed.result {
            log::error!("Failed to load {}: {}", completed.source.describe(), e);
        }
        Some(completed.result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ImageError;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(width, height, image::Rgba([1, 2, 3, 255]));
        let mut bytes = Vec::new();
        img.write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_load_field_sync() {
        let loaded = load_field(&ImageSource::Bytes(png_bytes(30, 24)), &Settings::default()).unwrap();
        assert_eq!(loaded.size, (30, 24));
        assert_eq!(loaded.field.len(), 10 * 8);
    }

    #[test]
    fn test_background_load() {
        let mut loader = ImageLoader::new(Settings::default());
        assert!(!loader.is_loading());
        loader.request(ImageSource::Bytes(png_bytes(36, 36)));
        assert!(loader.is_loading());

        let loaded = loader.wait().unwrap().unwrap();
        assert_eq!(loaded.field.len(), 144);
        assert!(!loader.is_loading());
        assert!(loader.poll().is_none());
    }

    #[test]
    fn test_failure_is_reported() {
        let mut loader = ImageLoader::new(Settings::default());
        loader.request(ImageSource::Bytes(b"nope".to_vec()));
        match loader.wait() {
            Some(Err(LoadError::Image(ImageError::Decode(_)))) => {}
            other => panic!("unexpected result: {:?}", other.map(|r| r.map(|l| l.size))),
        }
    }

    #[test]
    fn test_only_latest_request_is_delivered() {
        let mut loader = ImageLoader::new(Settings::default());
        loader.request(ImageSource::Bytes(png_bytes(30, 30)));
        loader.request(ImageSource::Bytes(png_bytes(60, 30)));

        let loaded = loader.wait().unwrap().unwrap();
        assert_eq!(loaded.size, (60, 30));
        assert!(loader.wait().is_none());
    }

    #[test]
    fn test_layout_error_is_reported() {
        // default padding leaves nothing of a 12px-wide image
        let mut loader = ImageLoader::new(Settings::default());
        loader.request(ImageSource::Bytes(png_bytes(12, 40)));
        assert!(matches!(loader.wait(), Some(Err(LoadError::Field(_)))));
    }

    #[test]
    fn test_panicking_worker_still_reports() {
        let mut loader = ImageLoader::new(Settings::default());
        loader.spawn(ImageSource::Bytes(Vec::new()), |_, _| panic!("decoder blew up"));
        assert!(matches!(loader.wait(), Some(Err(LoadError::WorkerPanicked))));
        assert!(!loader.is_loading());
    }
}
