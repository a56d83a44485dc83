use std::{
    io,
    sync::{
        Arc, Mutex, PoisonError,
        atomic::{AtomicU8, AtomicUsize, Ordering},
    },
    thread::{self, JoinHandle},
};

use crossbeam_channel::{Receiver, Sender};
use log::{debug, info, trace, warn};
use thiserror::Error;

use crate::{
    camera::Camera,
    framebuffer::Framebuffer,
    geometry::{ScreenBlock, ScreenPoint, ScreenSize},
    renderer::{RenderSettings, worker::Worker},
    scene::{Object, Scene},
    screen_block::ScreenBlockExt,
};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Failed to spawn a render thread: {0}")]
    Spawn(#[from] io::Error),

    #[error("Worker {worker} panicked")]
    WorkerPanicked { worker: usize },

    #[error("Tile dispatcher panicked")]
    DispatcherPanicked,

    #[error("Only {received} of {expected} workers acknowledged shutdown")]
    MissingAcknowledgment { received: usize, expected: usize },
}

/// Number of finished and total tiles of a render.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TileProgress {
    pub finished: usize,
    pub total: usize,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum SchedulerState {
    /// Tiles are being handed out to the workers.
    Dispatching,
    /// All tiles were handed out, workers are being told to quit.
    Draining,
    /// All threads were joined.
    Joined,
}

impl SchedulerState {
    fn from_u8(value: u8) -> SchedulerState {
        match value {
            0 => SchedulerState::Dispatching,
            1 => SchedulerState::Draining,
            _ => SchedulerState::Joined,
        }
    }
}

enum Job {
    Render(ScreenBlock),
    Quit,
}

/// Starts rendering the scene on a pool of worker threads, returns immediately.
///
/// Tiles are handed to the workers in scan order through a bounded channel.
/// Callbacks get called from the worker threads, `finished_tile_callback` after the
/// tile was already written to the framebuffer.
pub fn render<
    O: Object + Send + Sync + 'static,
    F1: Fn(ScreenBlock) + Send + Sync + 'static,
    F2: Fn(ScreenBlock, TileProgress) + Send + Sync + 'static,
>(
    scene: Scene<O>,
    camera: Camera,
    settings: RenderSettings,
    started_tile_callback: F1,
    finished_tile_callback: F2,
) -> Result<RenderProgress<O>, RenderError> {
    let resolution = camera.get_resolution();
    let tiles: Vec<_> = whole_screen(resolution)
        .scan_tiles(settings.tile_size())
        .collect();
    let worker_count = settings.worker_count.resolve();

    info!(
        "Rendering {}x{} pixels in {} tiles with {} workers",
        resolution.x,
        resolution.y,
        tiles.len(),
        worker_count
    );

    let state = Arc::new(RenderState {
        scene,
        camera,
        settings,

        framebuffer: Mutex::new(Framebuffer::new(resolution)),

        tile_count: tiles.len(),
        finished_tiles: AtomicUsize::new(0),
        scheduler_state: AtomicU8::new(SchedulerState::Dispatching as u8),
    });
    let started_tile_callback = Arc::new(started_tile_callback);
    let finished_tile_callback = Arc::new(finished_tile_callback);

    let (job_sender, job_receiver) = crossbeam_channel::bounded(worker_count);
    let (ack_sender, ack_receiver) = crossbeam_channel::unbounded();

    let cores = settings
        .pin_workers
        .then(core_affinity::get_core_ids)
        .flatten()
        .unwrap_or_default();
    if settings.pin_workers && cores.is_empty() {
        warn!("CPU list is not available, workers will not be pinned");
    }

    let workers = (0..worker_count)
        .map(|worker_id| {
            let state = Arc::clone(&state);
            let started_tile_callback = Arc::clone(&started_tile_callback);
            let finished_tile_callback = Arc::clone(&finished_tile_callback);
            let jobs = job_receiver.clone();
            let acks = ack_sender.clone();
            let core = (!cores.is_empty()).then(|| cores[worker_id % cores.len()]);

            thread::Builder::new()
                .name(format!("worker{worker_id}"))
                .spawn(move || {
                    if let Some(core) = core {
                        if !core_affinity::set_for_current(core) {
                            warn!("Failed to pin worker {worker_id} to core {}", core.id);
                        }
                    }

                    let mut worker = Worker::new(worker_id, &state.settings, resolution);
                    while let Ok(job) = jobs.recv() {
                        match job {
                            Job::Render(tile) => {
                                (started_tile_callback)(tile);
                                let progress = state.render_tile(&mut worker, &tile);
                                (finished_tile_callback)(tile, progress);
                            }
                            Job::Quit => {
                                trace!("Worker {worker_id} quitting");
                                if acks.send(worker_id).is_err() {
                                    debug!("Nobody is waiting for worker {worker_id}");
                                }
                                break;
                            }
                        }
                    }
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    // Workers hold the only job receivers and ack senders
    drop(job_receiver);
    drop(ack_sender);

    let dispatcher = thread::Builder::new().name("dispatcher".to_string()).spawn({
        let state = Arc::clone(&state);
        move || dispatch(tiles, worker_count, job_sender, &state)
    })?;

    Ok(RenderProgress {
        render_state: state,
        workers,
        dispatcher,
        acks: ack_receiver,
    })
}

fn dispatch<O: Object>(
    tiles: Vec<ScreenBlock>,
    worker_count: usize,
    jobs: Sender<Job>,
    state: &RenderState<O>,
) {
    for tile in tiles {
        trace!("Dispatching tile {:?}-{:?}", tile.min, tile.max);
        if jobs.send(Job::Render(tile)).is_err() {
            warn!("All workers are gone, stopping dispatch");
            break;
        }
    }

    state.set_scheduler_state(SchedulerState::Draining);
    debug!("All tiles dispatched, stopping {worker_count} workers");

    for _ in 0..worker_count {
        if jobs.send(Job::Quit).is_err() {
            break;
        }
    }
}

/// Renders the scene tile by tile on the calling thread.
/// Produces the same image as `render` with the same settings.
pub fn render_sequential<O: Object>(
    scene: &Scene<O>,
    camera: &Camera,
    settings: &RenderSettings,
) -> Framebuffer {
    let resolution = camera.get_resolution();
    let mut framebuffer = Framebuffer::new(resolution);
    let mut worker = Worker::new(0, settings, resolution);

    for tile in whole_screen(resolution).scan_tiles(settings.tile_size()) {
        let buffer = worker.render_tile(scene, camera, settings, &tile);
        framebuffer.write_block(&tile.flipped_vertically(resolution.y), buffer);
    }

    framebuffer
}

fn whole_screen(resolution: ScreenSize) -> ScreenBlock {
    ScreenBlock::with_size(ScreenPoint::origin(), &resolution)
}

pub struct RenderProgress<O: Object> {
    render_state: Arc<RenderState<O>>,
    workers: Vec<JoinHandle<()>>,
    dispatcher: JoinHandle<()>,
    acks: Receiver<usize>,
}

impl<O: Object> RenderProgress<O> {
    pub fn progress(&self) -> TileProgress {
        self.render_state.progress()
    }

    pub fn progress_percent(&self) -> f32 {
        let progress = self.progress();
        100.0 * (progress.finished as f32) / (progress.total as f32)
    }

    pub fn is_finished(&self) -> bool {
        self.dispatcher.is_finished() && self.workers.iter().all(|handle| handle.is_finished())
    }

    pub fn scheduler_state(&self) -> SchedulerState {
        SchedulerState::from_u8(self.render_state.scheduler_state.load(Ordering::Acquire))
    }

    /// Image being rendered, for displaying partial results.
    pub fn framebuffer(&self) -> &Mutex<Framebuffer> {
        &self.render_state.framebuffer
    }

    /// Blocks until every worker acknowledged shutdown, joins all threads
    /// and returns the finished image.
    pub fn wait(self) -> Result<Framebuffer, RenderError> {
        let expected = self.workers.len();
        let mut received = 0;
        while received < expected {
            match self.acks.recv() {
                Ok(worker_id) => {
                    trace!("Worker {worker_id} acknowledged shutdown");
                    received += 1;
                }
                Err(_) => break,
            }
        }

        let mut panicked = None;
        for (worker_id, handle) in self.workers.into_iter().enumerate() {
            if handle.join().is_err() && panicked.is_none() {
                panicked = Some(worker_id);
            }
        }
        let dispatcher_result = self.dispatcher.join();
        self.render_state
            .set_scheduler_state(SchedulerState::Joined);

        if let Some(worker) = panicked {
            return Err(RenderError::WorkerPanicked { worker });
        }
        if dispatcher_result.is_err() {
            return Err(RenderError::DispatcherPanicked);
        }
        if received < expected {
            return Err(RenderError::MissingAcknowledgment { received, expected });
        }

        info!("Render finished");
        let mut framebuffer = self
            .render_state
            .framebuffer
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        Ok(std::mem::take(&mut *framebuffer))
    }
}

struct RenderState<O: Object> {
    scene: Scene<O>,
    camera: Camera,
    settings: RenderSettings,

    framebuffer: Mutex<Framebuffer>,

    tile_count: usize,
    finished_tiles: AtomicUsize,
    scheduler_state: AtomicU8,
}

impl<O: Object> RenderState<O> {
    fn render_tile(&self, worker: &mut Worker, tile: &ScreenBlock) -> TileProgress {
        trace!("Worker {} rendering tile {:?}-{:?}", worker.id(), tile.min, tile.max);

        let buffer = worker.render_tile(&self.scene, &self.camera, &self.settings, tile);
        let target = tile.flipped_vertically(self.camera.get_resolution().y);
        self.framebuffer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .write_block(&target, buffer);

        let finished = self.finished_tiles.fetch_add(1, Ordering::AcqRel) + 1;
        TileProgress {
            finished,
            total: self.tile_count,
        }
    }

    fn progress(&self) -> TileProgress {
        TileProgress {
            finished: self.finished_tiles.load(Ordering::Acquire),
            total: self.tile_count,
        }
    }

    fn set_scheduler_state(&self, scheduler_state: SchedulerState) {
        self.scheduler_state
            .store(scheduler_state as u8, Ordering::Release);
    }
}
