use std::time::Duration;

use flume::{
    Receiver, RecvTimeoutError, Sender, TryRecvError,
    TrySendError as FlumeTrySendError,
};

use crate::affinity::{Affine, ThreadGuard, ThreadRole};
use crate::error::{ParamError, Result};
use crate::gui::GuiContext;

type GuiJob = Box<dyn FnOnce(&mut GuiContext) + Send>;

enum GuiRequest {
    Run(GuiJob),
    Shutdown,
}

/// Channel sizing options for interpreter-to-GUI dispatch.
#[derive(Default, Clone, Debug)]
pub struct ChannelConfig {
    /// Capacity for the job queue (`None` means unbounded).
    pub capacity: Option<usize>,
}

impl ChannelConfig {
    pub fn bounded(capacity: usize) -> Self {
        Self {
            capacity: Some(capacity),
        }
    }
}

/// Build the sending and receiving halves of the GUI job queue.
pub fn gui_channel(
    guard: ThreadGuard,
    config: &ChannelConfig,
) -> (GuiHandle, GuiQueue) {
    let (sender, receiver) = match config.capacity {
        Some(cap) => flume::bounded(cap),
        None => flume::unbounded(),
    };

    (
        GuiHandle {
            sender,
            guard: guard.clone(),
        },
        GuiQueue { receiver, guard },
    )
}

/// Cloneable handle for posting work onto the GUI thread.
///
/// Posting never blocks: a full or closed queue is reported immediately.
#[derive(Clone)]
pub struct GuiHandle {
    sender: Sender<GuiRequest>,
    guard: ThreadGuard,
}

impl GuiHandle {
    /// Queue an affine job for the GUI loop and return a handle to its
    /// result. The role check happens when the loop runs the job.
    pub fn post<F, T>(&self, job: Affine<F>) -> Result<Pending<T>>
    where
        F: FnOnce(&mut GuiContext) -> T + Send + 'static,
        T: Send + 'static,
    {
        let (reply_tx, reply_rx) = flume::bounded(1);
        let role = job.role();
        let request = GuiRequest::Run(Box::new(move |ctx: &mut GuiContext| {
            let outcome = job.call_once(ctx);
            if let Err(err) = &outcome {
                log::error!("gui job for the {role} thread was rejected: {err}");
            }
            // The caller may have dropped its handle; nothing to report then.
            let _ = reply_tx.send(outcome);
        }));

        self.sender.try_send(request).map_err(map_send_error)?;
        Ok(Pending {
            receiver: reply_rx,
        })
    }

    /// Queue `job` to run on the GUI thread.
    pub fn run_on_gui<F, T>(&self, job: F) -> Result<Pending<T>>
    where
        F: FnOnce(&mut GuiContext) -> T + Send + 'static,
        T: Send + 'static,
    {
        self.post(Affine::new(ThreadRole::Gui, self.guard.clone(), job))
    }

    /// Ask the GUI loop to stop after the jobs queued so far.
    pub fn shutdown(&self) -> Result<()> {
        self.sender
            .try_send(GuiRequest::Shutdown)
            .map_err(map_send_error)
    }

    pub fn guard(&self) -> &ThreadGuard {
        &self.guard
    }
}

impl std::fmt::Debug for GuiHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GuiHandle")
            .field("queued", &self.sender.len())
            .finish()
    }
}

/// Outcome of draining the queue without blocking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PumpReport {
    pub executed: usize,
    pub shutdown: bool,
}

/// Receiving half of the GUI job queue; lives on the GUI thread.
pub struct GuiQueue {
    receiver: Receiver<GuiRequest>,
    guard: ThreadGuard,
}

impl GuiQueue {
    /// Bind the calling thread as the GUI thread and run jobs until a
    /// shutdown request arrives or every handle is dropped.
    pub fn run(self, mut ctx: GuiContext) -> Result<()> {
        self.guard.bind(ThreadRole::Gui)?;
        log::debug!("gui queue running");

        while let Ok(request) = self.receiver.recv() {
            match request {
                GuiRequest::Run(job) => job(&mut ctx),
                GuiRequest::Shutdown => break,
            }
        }

        log::debug!("gui queue stopped");
        Ok(())
    }

    /// Run every job queued so far, for toolkits that own their loop and
    /// call in once per frame.
    pub fn pump(&self, ctx: &mut GuiContext) -> Result<PumpReport> {
        self.guard.bind(ThreadRole::Gui)?;

        let mut report = PumpReport::default();
        loop {
            match self.receiver.try_recv() {
                Ok(GuiRequest::Run(job)) => {
                    job(ctx);
                    report.executed += 1;
                },
                Ok(GuiRequest::Shutdown) => {
                    report.shutdown = true;
                    break;
                },
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    report.shutdown = true;
                    break;
                },
            }
        }

        Ok(report)
    }
}

/// Handle to a value produced on another thread.
#[derive(Debug)]
pub struct Pending<T> {
    receiver: Receiver<Result<T>>,
}

impl<T> Pending<T> {
    /// An already resolved handle.
    pub fn ready(value: T) -> Self {
        Self::resolved(Ok(value))
    }

    /// An already failed handle.
    pub fn failed(err: ParamError) -> Self {
        Self::resolved(Err(err))
    }

    fn resolved(outcome: Result<T>) -> Self {
        let (tx, rx) = flume::bounded(1);
        // Capacity is one and the receiver is alive, so this cannot fail.
        let _ = tx.send(outcome);
        Self { receiver: rx }
    }

    /// Take the result if it is already available.
    pub fn try_take(&self) -> Option<Result<T>> {
        match self.receiver.try_recv() {
            Ok(outcome) => Some(outcome),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                Some(Err(ParamError::DispatchClosed))
            },
        }
    }

    /// Block for at most `timeout` waiting for the result.
    ///
    /// Must not be called on the GUI thread for a job posted to itself.
    pub fn wait_timeout(self, timeout: Duration) -> Result<T> {
        match self.receiver.recv_timeout(timeout) {
            Ok(outcome) => outcome,
            Err(RecvTimeoutError::Timeout) => Err(ParamError::DispatchTimeout),
            Err(RecvTimeoutError::Disconnected) => {
                Err(ParamError::DispatchClosed)
            },
        }
    }
}

fn map_send_error<T>(err: FlumeTrySendError<T>) -> ParamError {
    match err {
        FlumeTrySendError::Full(_) => ParamError::DispatchFull,
        FlumeTrySendError::Disconnected(_) => ParamError::DispatchClosed,
    }
}
