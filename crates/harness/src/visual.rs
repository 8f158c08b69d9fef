//! Screenshot baseline comparison
//!
//! Every screenshot a scenario takes can be compared against a stored
//! baseline. A SHA-256 match short-circuits the pixel walk; otherwise
//! pixels are compared with a small per-channel tolerance and the mismatch
//! percentage is held against the configured threshold. Mismatching pixels
//! are marked red in a diff image.

use std::path::{Path, PathBuf};

use image::{GenericImageView, Pixel, RgbaImage};
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use crate::error::{HarnessError, HarnessResult};

/// Anti-aliasing and compression wiggle room, per channel
const CHANNEL_TOLERANCE: i32 = 5;

/// Result of comparing one screenshot against its baseline
#[derive(Debug, Clone)]
pub struct VisualDiff {
    pub matches: bool,
    /// Percentage of pixels that differ
    pub diff_percent: f64,
    pub diff_pixels: u64,
    pub total_pixels: u64,
    /// Diff image written when pixels differ
    pub diff_image: Option<PathBuf>,
}

/// Configuration for visual comparison
#[derive(Debug, Clone)]
pub struct VisualConfig {
    pub baseline_dir: PathBuf,
    pub actual_dir: PathBuf,
    pub diff_dir: PathBuf,
    /// Allowed pixel difference, percent
    pub threshold: f64,
    /// Promote screenshots to baselines when a baseline is missing
    pub auto_update: bool,
}

impl Default for VisualConfig {
    fn default() -> Self {
        Self {
            baseline_dir: PathBuf::from("test-results/baselines"),
            actual_dir: PathBuf::from("test-results/screenshots"),
            diff_dir: PathBuf::from("test-results/diffs"),
            threshold: 0.5,
            auto_update: false,
        }
    }
}

/// Compares screenshots against stored baselines
pub struct VisualComparer {
    config: VisualConfig,
}

impl VisualComparer {
    pub fn new(config: VisualConfig) -> HarnessResult<Self> {
        std::fs::create_dir_all(&config.baseline_dir)?;
        std::fs::create_dir_all(&config.actual_dir)?;
        std::fs::create_dir_all(&config.diff_dir)?;
        Ok(Self { config })
    }

    /// Compare a named screenshot against its baseline.
    ///
    /// `name` is the file stem; both sides are `<dir>/<name>.png`.
    pub fn compare(&self, name: &str) -> HarnessResult<VisualDiff> {
        let actual_path = self.config.actual_dir.join(format!("{}.png", name));
        let baseline_path = self.config.baseline_dir.join(format!("{}.png", name));

        if !actual_path.exists() {
            return Err(HarnessError::Visual(format!(
                "screenshot not found: {}",
                actual_path.display()
            )));
        }

        if !baseline_path.exists() {
            if self.config.auto_update {
                info!("creating baseline for '{}'", name);
                std::fs::copy(&actual_path, &baseline_path)?;
                return Ok(VisualDiff {
                    matches: true,
                    diff_percent: 0.0,
                    diff_pixels: 0,
                    total_pixels: 0,
                    diff_image: None,
                });
            }
            return Err(HarnessError::BaselineNotFound(
                baseline_path.to_string_lossy().to_string(),
            ));
        }

        if hash_file(&actual_path)? == hash_file(&baseline_path)? {
            debug!("'{}' matches baseline exactly", name);
            let img = image::open(&actual_path)?;
            let total = (img.width() as u64) * (img.height() as u64);
            return Ok(VisualDiff {
                matches: true,
                diff_percent: 0.0,
                diff_pixels: 0,
                total_pixels: total,
                diff_image: None,
            });
        }

        let actual = image::open(&actual_path)?;
        let baseline = image::open(&baseline_path)?;

        if actual.dimensions() != baseline.dimensions() {
            warn!(
                "'{}' dimensions differ: actual {:?} vs baseline {:?}",
                name,
                actual.dimensions(),
                baseline.dimensions()
            );
        }

        let (width, height) = actual.dimensions();
        let actual_rgba = actual.to_rgba8();
        let baseline_rgba = baseline.to_rgba8();

        let mut diff_img = RgbaImage::new(width, height);
        let mut diff_pixels = 0u64;
        let total_pixels = (width as u64) * (height as u64);

        for y in 0..height.min(baseline.height()) {
            for x in 0..width.min(baseline.width()) {
                let a = actual_rgba.get_pixel(x, y);
                let b = baseline_rgba.get_pixel(x, y);

                if pixels_differ(a, b) {
                    diff_pixels += 1;
                    diff_img.put_pixel(x, y, image::Rgba([255, 0, 0, 255]));
                } else {
                    let channels = a.channels();
                    diff_img.put_pixel(
                        x,
                        y,
                        image::Rgba([channels[0] / 2, channels[1] / 2, channels[2] / 2, 128]),
                    );
                }
            }
        }

        let diff_percent = (diff_pixels as f64 / total_pixels as f64) * 100.0;
        let matches = diff_percent <= self.config.threshold;

        let diff_image = if diff_pixels > 0 {
            let path = self.config.diff_dir.join(format!("{}-diff.png", name));
            diff_img.save(&path)?;
            Some(path)
        } else {
            None
        };

        if !matches {
            warn!(
                "visual mismatch in '{}': {:.2}% pixels differ (threshold {:.2}%)",
                name, diff_percent, self.config.threshold
            );
        }

        Ok(VisualDiff {
            matches,
            diff_percent,
            diff_pixels,
            total_pixels,
            diff_image,
        })
    }

    /// Promote the current screenshot to be the baseline
    pub fn update_baseline(&self, name: &str) -> HarnessResult<()> {
        let actual_path = self.config.actual_dir.join(format!("{}.png", name));
        let baseline_path = self.config.baseline_dir.join(format!("{}.png", name));

        if !actual_path.exists() {
            return Err(HarnessError::Visual(format!(
                "cannot update baseline, screenshot not found: {}",
                actual_path.display()
            )));
        }

        std::fs::copy(&actual_path, &baseline_path)?;
        info!("updated baseline for '{}'", name);
        Ok(())
    }

    /// Promote every current screenshot to be a baseline
    pub fn update_all_baselines(&self) -> HarnessResult<usize> {
        let mut updated = 0;
        for name in png_stems(&self.config.actual_dir)? {
            self.update_baseline(&name)?;
            updated += 1;
        }
        Ok(updated)
    }

    /// Names of all stored baselines
    pub fn list_baselines(&self) -> HarnessResult<Vec<String>> {
        png_stems(&self.config.baseline_dir)
    }
}

fn png_stems(dir: &Path) -> HarnessResult<Vec<String>> {
    let mut stems = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().map(|e| e == "png").unwrap_or(false) {
            if let Some(stem) = path.file_stem() {
                stems.push(stem.to_string_lossy().to_string());
            }
        }
    }
    stems.sort();
    Ok(stems)
}

fn pixels_differ(a: &image::Rgba<u8>, b: &image::Rgba<u8>) -> bool {
    let a = a.channels();
    let b = b.channels();
    for i in 0..4 {
        if (a[i] as i32 - b[i] as i32).abs() > CHANNEL_TOLERANCE {
            return true;
        }
    }
    false
}

fn hash_file(path: &Path) -> HarnessResult<String> {
    let data = std::fs::read(path)?;
    let mut hasher = Sha256::new();
    hasher.update(&data);
    Ok(hex::encode(hasher.finalize()))
}
