//! Batch driver: finds before/after pairs on disk, runs the detector on each
//! and writes the results next to each other in an output folder.
//!
//! Naming convention:
//! - `X.jpg` is a before image, `X~2.jpg` its after image
//! - outputs are `X.jpg` (copy of the before file) and `X~3.jpg` (annotated after)

use anyhow::{Context, Result};
use log::{debug, info, warn};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

use crate::detection::ChangeDetector;
use crate::models::ImagePair;

const AFTER_SUFFIX: &str = "~2";
const ANNOTATED_SUFFIX: &str = "~3";
const PAIR_MARKER: char = '~';

/// Paths of one before/after pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairPaths {
    pub id: String,
    pub before: PathBuf,
    pub after: PathBuf,
}

impl PairPaths {
    /// File name the before image is copied to
    pub fn before_output_name(&self) -> String {
        self.before
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| format!("{}.jpg", self.id))
    }

    /// File name of the annotated after image
    pub fn annotated_output_name(&self) -> String {
        format!("{}{}.jpg", self.id, ANNOTATED_SUFFIX)
    }
}

/// What happened to a processed pair
#[derive(Debug, Clone)]
pub struct PairSummary {
    pub score: f64,
    pub regions: usize,
    pub degenerate: bool,
    pub before_output: PathBuf,
    pub annotated_output: PathBuf,
}

#[derive(Debug)]
pub struct PairOutcome {
    pub id: String,
    pub result: Result<PairSummary>,
}

impl PairOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// List the pairs in `input_dir`, sorted by id.
///
/// A before image is any `.jpg` (any case) without `~` in its name; it is
/// skipped when its `~2` partner is missing.
pub fn discover_pairs(input_dir: &Path) -> Result<Vec<PairPaths>> {
    let entries = fs::read_dir(input_dir)
        .with_context(|| format!("Failed to read input directory {}", input_dir.display()))?;

    let mut pairs = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if !path.is_file() || !is_jpg(&path) {
            continue;
        }

        let file_name = match path.file_name() {
            Some(name) => name.to_string_lossy().into_owned(),
            None => continue,
        };
        if file_name.contains(PAIR_MARKER) {
            continue;
        }

        let id = match path.file_stem() {
            Some(stem) => stem.to_string_lossy().into_owned(),
            None => continue,
        };
        let after = input_dir.join(format!("{}{}.jpg", id, AFTER_SUFFIX));
        if !after.exists() {
            warn!("Skipping {}: no after image {}", file_name, after.display());
            continue;
        }

        pairs.push(PairPaths {
            id,
            before: path,
            after,
        });
    }

    pairs.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(pairs)
}

fn is_jpg(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("jpg"))
        .unwrap_or(false)
}

/// Runs a [`ChangeDetector`] over every pair of a folder
pub struct Orchestrator {
    detector: ChangeDetector,
    output_dir: PathBuf,
    parallel: bool,
}

impl Orchestrator {
    pub fn new(detector: ChangeDetector, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            detector,
            output_dir: output_dir.into(),
            parallel: true,
        }
    }

    /// Process pairs one after another instead of on the rayon pool
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Discover and process every pair in `input_dir`.
    ///
    /// Fails only when the folders themselves are unusable; per-pair
    /// failures are reported in the returned outcomes.
    pub fn run(&self, input_dir: &Path) -> Result<Vec<PairOutcome>> {
        fs::create_dir_all(&self.output_dir).with_context(|| {
            format!("Failed to create output directory {}", self.output_dir.display())
        })?;

        let pairs = discover_pairs(input_dir)?;
        info!("Found {} image pairs in {}", pairs.len(), input_dir.display());

        Ok(self.process_pairs(&pairs))
    }

    pub fn process_pairs(&self, pairs: &[PairPaths]) -> Vec<PairOutcome> {
        let run_one = |pair: &PairPaths| {
            let result = self.process_pair(pair);
            match &result {
                Ok(summary) => {
                    info!(
                        "Processed: {} - Caught changes with similarity score: {:.4}",
                        pair.id, summary.score
                    );
                    debug!("  {} region(s) marked in {}", summary.regions, summary.annotated_output.display());
                    if summary.degenerate {
                        warn!("{}: images are structurally uniform, nothing to separate", pair.id);
                    }
                }
                Err(e) => warn!("Skipping {}: {:#}", pair.id, e),
            }
            PairOutcome {
                id: pair.id.clone(),
                result,
            }
        };

        if self.parallel {
            pairs.par_iter().map(run_one).collect()
        } else {
            pairs.iter().map(run_one).collect()
        }
    }

    /// Detect changes in one pair and write both outputs
    pub fn process_pair(&self, pair: &PairPaths) -> Result<PairSummary> {
        let images = ImagePair::open(&pair.id, &pair.before, &pair.after)?;
        let detection = self.detector.detect(images)?;

        // Annotated image first, so a failed save leaves no half-written pair
        let annotated_output = self.output_dir.join(pair.annotated_output_name());
        detection
            .annotated
            .save(&annotated_output)
            .with_context(|| format!("Failed to write {}", annotated_output.display()))?;

        let before_output = self.output_dir.join(pair.before_output_name());
        if !same_file(&pair.before, &before_output) {
            if let Err(e) = fs::copy(&pair.before, &before_output) {
                let _ = fs::remove_file(&annotated_output);
                return Err(e)
                    .with_context(|| format!("Failed to write {}", before_output.display()));
            }
        }

        Ok(PairSummary {
            score: detection.score,
            regions: detection.regions.len(),
            degenerate: detection.degenerate,
            before_output,
            annotated_output,
        })
    }
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
