//! Slideshow mode: every bitmap in a directory, centred, one at a time.

use alloc::string::String;

use embassy_time::Instant;
use embedded_graphics::prelude::*;

use crate::{
    Config,
    DirEntry,
    ImageReader,
    MAX_NAME_LEN,
    ModeSignal,
    Storage,
    wait_until,
};

/// Top-left corner that centres an `image` on a `screen`. Negative when
/// the image is larger than the screen.
pub fn centered(screen: Size, image: Size) -> Point {
    Point::new(
        (screen.width as i32 - image.width as i32) / 2,
        (screen.height as i32 - image.height as i32) / 2,
    )
}

/// Show each bitmap in `config.image_dir` for `config.slideshow_interval`.
///
/// The first image goes up immediately, the last one also gets its full
/// interval before returning. Returns early, leaving the signal raised,
/// as soon as `signal` is seen.
pub async fn run_slideshow<C, D>(card: &mut C, target: &mut D, signal: &ModeSignal, config: &Config)
where
    C: Storage + ImageReader<D>,
    D: DrawTarget,
{
    let mut cursor = match card.open_dir(config.image_dir) {
        Ok(cursor) => cursor,
        Err(e) => {
            error!("Failed to open {}: {}", config.image_dir, e);
            wait_until(
                Instant::now() + config.slideshow_interval,
                signal,
                config.poll_quantum,
            )
            .await;
            return;
        }
    };

    let mut shown_at: Option<Instant> = None;
    while let Some(entry) = next_bitmap(card, &mut cursor) {
        if let Some(previous) = shown_at {
            let deadline = previous + config.slideshow_interval;
            if wait_until(deadline, signal, config.poll_quantum)
                .await
                .is_cancelled()
            {
                return;
            }
        } else if signal.is_raised() {
            return;
        }

        let path = join(config.image_dir, &entry);
        show_centered(card, target, &path, config.screen);
        shown_at = Some(Instant::now());
    }

    let last = shown_at.unwrap_or_else(|| {
        warn!("No bitmaps in {}", config.image_dir);
        Instant::now()
    });
    wait_until(last + config.slideshow_interval, signal, config.poll_quantum).await;
}

/// Next bitmap entry, skipping directories and other files. A scan error
/// ends the scan.
fn next_bitmap<S: Storage>(storage: &mut S, cursor: &mut S::Cursor) -> Option<DirEntry> {
    loop {
        match storage.next_entry(cursor) {
            Ok(Some(entry)) if entry.is_bitmap() => return Some(entry),
            Ok(Some(entry)) => debug!("Skipping {}", entry.name(MAX_NAME_LEN)),
            Ok(None) => return None,
            Err(e) => {
                error!("Directory scan failed: {}", e);
                return None;
            }
        }
    }
}

fn join(dir: &str, entry: &DirEntry) -> String {
    let mut path = String::from(dir);
    if !path.ends_with('/') {
        path.push('/');
    }
    path.push_str(entry.name(MAX_NAME_LEN));
    path
}

fn show_centered<I, D>(images: &mut I, target: &mut D, path: &str, screen: Size)
where
    I: ImageReader<D>,
    D: DrawTarget,
{
    let size = match images.dimensions(path) {
        Ok(size) => size,
        Err(e) => {
            error!("Failed to read {}: {}", path, e);
            return;
        }
    };
    info!("Showing {} ({}x{})", path, size.width, size.height);
    if let Err(e) = images.draw(path, target, centered(screen, size)) {
        error!("Failed to draw {}: {}", path, e);
    }
}

#[cfg(test)]
mod tests {
    use embassy_futures::{
        block_on,
        select::{
            Either,
            select,
        },
    };
    use embassy_time::{
        Duration,
        Timer,
    };

    use super::*;
    use crate::{
        ImageError,
        testing::{
            FakeCard,
            NullDisplay,
        },
    };

    const T: Duration = Duration::from_millis(60);

    fn config() -> Config {
        Config::new()
            .with_slideshow_interval(T)
            .with_poll_quantum(Duration::from_millis(2))
    }

    fn abc() -> FakeCard {
        FakeCard::new().with_dir(
            "/",
            [
                DirEntry::file("A.BMP"),
                DirEntry::file("B.BMP"),
                DirEntry::file("C.BMP"),
            ],
        )
    }

    fn near(actual: Duration, expected: Duration) -> bool {
        actual >= expected && actual < expected + Duration::from_millis(40)
    }

    #[test]
    fn centering_uses_image_size() {
        let screen = Size::new(240, 320);
        assert_eq!(centered(screen, Size::new(100, 80)), Point::new(70, 120));
        assert_eq!(centered(screen, screen), Point::zero());
        assert_eq!(centered(screen, Size::new(320, 240)), Point::new(-40, 40));
    }

    #[test]
    fn shows_each_image_for_one_interval() {
        let config = config();
        let mut card = abc().with_size("/B.BMP", Size::new(240, 320));
        let mut display = NullDisplay::new(config.screen);
        let signal = ModeSignal::new();

        let start = Instant::now();
        block_on(run_slideshow(&mut card, &mut display, &signal, &config));
        let finished = start.elapsed();

        assert_eq!(card.drawn_paths(), ["/A.BMP", "/B.BMP", "/C.BMP"]);
        assert_eq!(card.scans, 1, "one pass walks the directory once");
        let offsets: alloc::vec::Vec<_> = card.draws.iter().map(|d| d.at - start).collect();
        assert!(offsets[0] < Duration::from_millis(20));
        assert!(near(offsets[1], T));
        assert!(near(offsets[2], T * 2));
        assert!(near(finished, T * 3));

        assert_eq!(card.draws[0].origin, Point::new(70, 120));
        assert_eq!(card.draws[1].origin, Point::zero());
    }

    #[test]
    fn signal_ends_the_show_early() {
        let config = config();
        let mut card = abc();
        let mut display = NullDisplay::new(config.screen);
        let signal = ModeSignal::new();

        let start = Instant::now();
        let show = run_slideshow(&mut card, &mut display, &signal, &config);
        let press = async {
            Timer::after(Duration::from_millis(80)).await;
            signal.raise();
            core::future::pending::<()>().await;
        };
        match block_on(select(show, press)) {
            Either::First(()) => {}
            Either::Second(()) => unreachable!(),
        }

        assert!(start.elapsed() < Duration::from_millis(110));
        assert_eq!(card.drawn_paths(), ["/A.BMP", "/B.BMP"]);
        assert!(signal.is_raised());
    }

    #[test]
    fn raised_signal_skips_the_first_image() {
        let config = config();
        let mut card = abc();
        let mut display = NullDisplay::new(config.screen);
        let signal = ModeSignal::new();
        signal.raise();

        block_on(run_slideshow(&mut card, &mut display, &signal, &config));
        assert!(card.draws.is_empty());
    }

    #[test]
    fn non_bitmaps_and_directories_are_skipped() {
        let config = config().with_slideshow_interval(Duration::from_millis(5));
        let mut card = FakeCard::new().with_dir(
            "/",
            [
                DirEntry::dir("PATTERN"),
                DirEntry::file("README.TXT"),
                DirEntry::file("cat.bmp"),
            ],
        );
        let mut display = NullDisplay::new(config.screen);
        let signal = ModeSignal::new();

        block_on(run_slideshow(&mut card, &mut display, &signal, &config));
        assert_eq!(card.drawn_paths(), ["/cat.bmp"]);
    }

    #[test]
    fn broken_images_keep_their_slot() {
        let config = config();
        let mut card = abc().with_broken("/B.BMP", ImageError::Truncated);
        let mut display = NullDisplay::new(config.screen);
        let signal = ModeSignal::new();

        let start = Instant::now();
        block_on(run_slideshow(&mut card, &mut display, &signal, &config));

        assert_eq!(card.drawn_paths(), ["/A.BMP", "/C.BMP"]);
        assert!(near(card.draws[1].at - start, T * 2));
    }

    #[test]
    fn empty_or_missing_directory_waits_one_interval() {
        let config = config().with_image_dir("/PHOTOS");
        let signal = ModeSignal::new();
        let mut display = NullDisplay::new(config.screen);

        let mut missing = FakeCard::new();
        let start = Instant::now();
        block_on(run_slideshow(&mut missing, &mut display, &signal, &config));
        assert!(near(start.elapsed(), T));

        let mut empty = FakeCard::new().with_dir("/PHOTOS", []);
        let start = Instant::now();
        block_on(run_slideshow(&mut empty, &mut display, &signal, &config));
        assert!(near(start.elapsed(), T));
        assert!(empty.draws.is_empty());
    }

    #[test]
    fn paths_join_without_doubled_separators() {
        let entry = DirEntry::file("X.BMP");
        assert_eq!(join("/", &entry), "/X.BMP");
        assert_eq!(join("/PHOTOS", &entry), "/PHOTOS/X.BMP");
    }
}
