use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::sync::mpsc::{Receiver, Sender, TryRecvError};
use std::thread;

use polars::prelude::DataFrame;

use crate::training::{self, TrainingOptions, TrainingReport, TrainingStage};

/// Everything a background fit needs; owned so it can cross the thread boundary.
#[derive(Clone, Debug)]
pub(crate) struct TrainingJob {
    pub(crate) table: DataFrame,
    pub(crate) options: TrainingOptions,
    pub(crate) model_path: PathBuf,
}

#[derive(Debug)]
pub(crate) enum JobMessage {
    Progress(TrainingStage),
    Finished(Result<TrainingReport, String>),
}

/// Owns the worker channel and the single in-flight job flag.
pub(crate) struct ControllerJobs {
    message_tx: Sender<JobMessage>,
    message_rx: Receiver<JobMessage>,
    training_in_progress: bool,
}

impl ControllerJobs {
    pub(crate) fn new() -> Self {
        let (message_tx, message_rx) = std::sync::mpsc::channel();
        Self {
            message_tx,
            message_rx,
            training_in_progress: false,
        }
    }

    pub(crate) fn training_in_progress(&self) -> bool {
        self.training_in_progress
    }

    pub(crate) fn begin_training(&mut self, job: TrainingJob) {
        self.spawn_training(move |progress| {
            training::run_training_pipeline(&job.table, &job.options, &job.model_path, progress)
                .map(|(_, report)| report)
                .map_err(|err| err.to_string())
        });
    }

    /// Run `work` on a worker thread; a `Finished` message is always sent, even on panic.
    pub(crate) fn spawn_training<F>(&mut self, work: F)
    where
        F: FnOnce(&mut dyn FnMut(TrainingStage)) -> Result<TrainingReport, String>
            + Send
            + 'static,
    {
        self.training_in_progress = true;
        let tx = self.message_tx.clone();
        thread::spawn(move || {
            let progress_tx = tx.clone();
            let mut progress = move |stage: TrainingStage| {
                let _ = progress_tx.send(JobMessage::Progress(stage));
            };
            let result = panic::catch_unwind(AssertUnwindSafe(|| work(&mut progress)))
                .unwrap_or_else(|payload| Err(panic_message(payload.as_ref())));
            if let Err(err) = &result {
                tracing::error!("Error during training: {err}");
            }
            let _ = tx.send(JobMessage::Finished(result));
        });
    }

    pub(crate) fn try_recv_message(&self) -> Result<JobMessage, TryRecvError> {
        self.message_rx.try_recv()
    }

    pub(crate) fn clear_training(&mut self) {
        self.training_in_progress = false;
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    let detail = payload
        .downcast_ref::<&str>()
        .map(|text| text.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown cause".to_string());
    format!("training worker panicked: {detail}")
}
