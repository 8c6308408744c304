//! The streaming three-stage pipeline: Loader → Merger → Flattener/Writer.
//!
//! Three workers run on scoped threads over a ring of `W` scanline slots.
//! Slot ownership is decided entirely by the per-scanline [`RowStatus`]: the
//! loader may reuse slot `y % W` only once scanline `y - W` is `Flattened`,
//! the merger consumes `Loaded` rows, the flattener consumes `Merged` rows.
//! Live memory stays bounded by the window regardless of image height.

/// Per-scanline status handshake shared by the three workers.
pub mod status;

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::thread::ScopedJoinHandle;

use smallvec::SmallVec;

use crate::deep::row::DeepRow;
use crate::flatten::{FlatImage, flatten_row};
use crate::foundation::error::{DeepError, DeepResult};
use crate::merge::{PixelInput, PixelMerger};
use crate::options::Options;
use crate::output::sink::DeepSink;
use crate::source::DeepSource;
use status::{RowStatus, StatusBoard};

/// Pipeline tuning knobs, separate from the user-facing [`Options`].
#[derive(Clone, Copy, Debug)]
pub struct PipelineOpts {
    /// Sliding-window size in scanlines (ring length). Powers of two keep
    /// the slot arithmetic cheap but any value >= 1 works.
    pub window: usize,
}

impl Default for PipelineOpts {
    fn default() -> Self {
        Self { window: 32 }
    }
}

/// The volumetric split can at most double a row's sample count, so merged
/// slots reserve twice the summed input samples up front.
const SPLIT_RESERVE_FACTOR: usize = 2;

fn lock(slot: &Mutex<DeepRow>) -> MutexGuard<'_, DeepRow> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Raises the shared failure flag on drop, unless disarmed via
/// `std::mem::forget`. Shared by `with_fail_flag` and any worker that
/// cannot express its body as a plain closure (see the flattener spawn in
/// [`run`], where nested-closure borrows of `deep_sink` don't type-check).
struct FailFlagGuard<'a>(&'a StatusBoard);
impl Drop for FailFlagGuard<'_> {
    fn drop(&mut self) {
        self.0.fail();
    }
}

/// Run an erroring-worker body so that any `Err` (or unwind) raises the
/// shared failure flag before the thread exits, waking blocked peers.
fn with_fail_flag<T>(board: &StatusBoard, body: impl FnOnce() -> DeepResult<T>) -> DeepResult<T> {
    let guard = FailFlagGuard(board);
    let out = body();
    if out.is_ok() {
        std::mem::forget(guard);
    }
    out
}

fn join_worker<T>(handle: ScopedJoinHandle<'_, DeepResult<T>>, name: &str) -> DeepResult<T> {
    handle
        .join()
        .map_err(|_| DeepError::Other(anyhow::anyhow!("{name} worker panicked")))?
}

/// Composite `sources` into a flat raster, optionally streaming merged deep
/// rows into `deep_sink` (rows arrive in increasing `y` order).
///
/// Fail-fast: the first fatal error from any worker stops the pipeline; its
/// peers exit at their next wait point and the error is returned.
pub fn run(
    mut sources: Vec<Box<dyn DeepSource>>,
    options: &Options,
    opts: &PipelineOpts,
    deep_sink: Option<&mut dyn DeepSink>,
) -> DeepResult<FlatImage> {
    let Some(first) = sources.first() else {
        return Err(DeepError::invalid_config("pipeline needs at least one source"));
    };
    let (width, height) = first.dimensions();
    for (i, s) in sources.iter().enumerate() {
        let dims = s.dimensions();
        if dims != (width, height) {
            return Err(DeepError::dimension_mismatch(format!(
                "layer {i} is {}x{}, expected {width}x{height}",
                dims.0, dims.1
            )));
        }
    }

    let window = opts.window;
    if window == 0 {
        return Err(DeepError::invalid_config("pipeline window must be >= 1"));
    }

    let z_offsets: Vec<f32> = (0..sources.len()).map(|i| options.z_offset(i)).collect();
    // Validates the threshold before any thread starts.
    let merger = PixelMerger::new(options.merge_threshold)?;
    let flat = FlatImage::new(width, height)?;

    let board = StatusBoard::new(height as usize);
    let input_slots: Vec<Vec<Mutex<DeepRow>>> = sources
        .iter()
        .map(|_| (0..window).map(|_| Mutex::new(DeepRow::new())).collect())
        .collect();
    let merged_slots: Vec<Mutex<DeepRow>> =
        (0..window).map(|_| Mutex::new(DeepRow::new())).collect();

    tracing::debug!(width, height, window, layers = sources.len(), "pipeline start");

    std::thread::scope(|scope| {
        let board = &board;
        let input_slots = &input_slots;
        let merged_slots = &merged_slots;
        let z_offsets = &z_offsets;

        let loader = scope.spawn(move || {
            with_fail_flag(board, || {
                loader_loop(&mut sources, board, input_slots, window, height)
            })
        });

        let merge = scope.spawn(move || {
            with_fail_flag(board, || {
                merger_loop(
                    merger,
                    board,
                    input_slots,
                    merged_slots,
                    z_offsets,
                    width,
                    height,
                )
            })
        });

        let flatten = scope.spawn(move || {
            let guard = FailFlagGuard(board);
            let out = flattener_loop(
                flat,
                board,
                merged_slots,
                deep_sink,
                window,
                height,
            );
            if out.is_ok() {
                std::mem::forget(guard);
            }
            out
        });

        let loader_res = join_worker(loader, "loader");
        let merge_res = join_worker(merge, "merger");
        let flatten_res = join_worker(flatten, "flattener");

        loader_res?;
        merge_res?;
        let flat = flatten_res?;
        tracing::debug!(height, "pipeline complete");
        Ok(flat)
    })
}

/// Stage 1: pull every layer's scanline into the ring, reusing a slot only
/// once its previous occupant has been flattened.
fn loader_loop(
    sources: &mut [Box<dyn DeepSource>],
    board: &StatusBoard,
    input_slots: &[Vec<Mutex<DeepRow>>],
    window: usize,
    height: u32,
) -> DeepResult<()> {
    for y in 0..height as usize {
        if y >= window && !board.wait_at_least(y - window, RowStatus::Flattened) {
            return Ok(());
        }

        let slot = y % window;
        for (li, src) in sources.iter_mut().enumerate() {
            let mut row = lock(&input_slots[li][slot]);
            let counts = src.fetch_sample_counts(y as u32)?;
            row.prepare(counts)?;
            src.read_row(y as u32, &mut row)?;
        }

        board.publish(y, RowStatus::Loaded);
    }
    Ok(())
}

/// Stage 2: merge each loaded scanline pixel by pixel into the merged slot.
fn merger_loop(
    mut merger: PixelMerger,
    board: &StatusBoard,
    input_slots: &[Vec<Mutex<DeepRow>>],
    merged_slots: &[Mutex<DeepRow>],
    z_offsets: &[f32],
    width: u32,
    height: u32,
) -> DeepResult<()> {
    let window = merged_slots.len();
    let mut pixel_out = Vec::new();

    for y in 0..height as usize {
        if !board.wait_at_least(y, RowStatus::Loaded) {
            return Ok(());
        }

        let slot = y % window;
        let inputs: Vec<MutexGuard<'_, DeepRow>> =
            input_slots.iter().map(|layer| lock(&layer[slot])).collect();
        let total: usize = inputs.iter().map(|row| row.total_samples()).sum();

        let mut merged = lock(&merged_slots[slot]);
        merged.begin(width as usize, total * SPLIT_RESERVE_FACTOR)?;

        for x in 0..width as usize {
            let pixel_inputs: SmallVec<[PixelInput<'_>; 4]> = inputs
                .iter()
                .zip(z_offsets)
                .map(|(row, &z_offset)| PixelInput {
                    samples: row.pixel_samples(x),
                    z_offset,
                })
                .collect();
            merger.merge_pixel(&pixel_inputs, &mut pixel_out)?;
            merged.push_pixel(&pixel_out)?;
        }

        drop(merged);
        drop(inputs);
        board.publish(y, RowStatus::Merged);
    }
    Ok(())
}

/// Stage 3: flatten each merged scanline into the output raster, hand the
/// deep row to the sink, and release the slot.
fn flattener_loop(
    mut flat: FlatImage,
    board: &StatusBoard,
    merged_slots: &[Mutex<DeepRow>],
    mut deep_sink: Option<&mut dyn DeepSink>,
    window: usize,
    height: u32,
) -> DeepResult<FlatImage> {
    if let Some(sink) = deep_sink.as_deref_mut() {
        sink.begin(flat.width, flat.height)?;
    }

    for y in 0..height as usize {
        if !board.wait_at_least(y, RowStatus::Merged) {
            return Ok(flat);
        }

        let slot = y % window;
        let mut row = lock(&merged_slots[slot]);
        flatten_row(&row, flat.row_mut(y as u32));
        if let Some(sink) = deep_sink.as_deref_mut() {
            sink.push_row(y as u32, &row)?;
        }
        row.clear();
        drop(row);

        board.publish(y, RowStatus::Flattened);
    }

    if let Some(sink) = deep_sink.as_deref_mut() {
        sink.end()?;
    }
    Ok(flat)
}
