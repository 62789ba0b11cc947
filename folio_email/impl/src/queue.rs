use std::{sync::Arc, time::Duration};

use folio_email_contracts::{
    queue::{EmailEnqueueError, EmailQueueService, EmailQueueStatus},
    Email, EmailService,
};
use tokio::{
    sync::{
        mpsc::{self, error::TrySendError},
        Mutex,
    },
    task::JoinSet,
};
use tracing::{debug, error, info};

/// Bounded email queue drained by a fixed number of worker tasks.
#[derive(Debug, Clone)]
pub struct EmailQueueServiceImpl {
    sender: mpsc::Sender<Email>,
    workers: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct EmailQueueConfig {
    pub workers: usize,
    /// Must be greater than zero.
    pub capacity: usize,
}

/// The worker tasks of an [`EmailQueueServiceImpl`].
///
/// Dropping this aborts the workers immediately. Use
/// [`shutdown`](Self::shutdown) to deliver the remaining emails first.
#[derive(Debug)]
pub struct EmailQueueWorkers {
    tasks: JoinSet<()>,
    /// `None` without workers, so that the queue reports itself closed.
    receiver: Option<Arc<Mutex<mpsc::Receiver<Email>>>>,
}

/// Emails that could not be delivered before the shutdown timeout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmailQueueDrain {
    /// Workers that were still busy when they were aborted.
    pub interrupted: usize,
    /// Emails still waiting in the queue.
    pub abandoned: usize,
}

impl EmailQueueServiceImpl {
    /// Spawn the worker tasks on the current tokio runtime.
    pub fn start<E: EmailService>(email: E, config: EmailQueueConfig) -> (Self, EmailQueueWorkers) {
        let (sender, receiver) = mpsc::channel(config.capacity);
        let receiver = Arc::new(Mutex::new(receiver));
        let email = Arc::new(email);

        let mut tasks = JoinSet::new();
        for id in 0..config.workers {
            tasks.spawn(worker(id, Arc::clone(&email), Arc::clone(&receiver)));
        }

        let queue = Self {
            sender,
            workers: config.workers,
        };
        let receiver = (config.workers > 0).then_some(receiver);
        (queue, EmailQueueWorkers { tasks, receiver })
    }
}

impl EmailQueueWorkers {
    /// Wait until the workers have delivered every queued email.
    ///
    /// The queue only closes once every [`EmailQueueServiceImpl`] handle has
    /// been dropped, so drop them before calling this. Workers still running
    /// after `timeout` are aborted and the lost emails are logged.
    pub async fn shutdown(mut self, timeout: Duration) -> EmailQueueDrain {
        let drained = tokio::time::timeout(timeout, async {
            while self.tasks.join_next().await.is_some() {}
        })
        .await
        .is_ok();
        if drained {
            debug!("email queue drained");
            return EmailQueueDrain::default();
        }

        let interrupted = self.tasks.len();
        self.tasks.shutdown().await;

        let mut abandoned = 0;
        if let Some(receiver) = &self.receiver {
            let mut receiver = receiver.lock().await;
            while receiver.try_recv().is_ok() {
                abandoned += 1;
            }
        }

        error!(
            interrupted,
            abandoned,
            "email queue did not drain within {timeout:?}, undelivered emails were dropped"
        );
        EmailQueueDrain {
            interrupted,
            abandoned,
        }
    }
}

impl EmailQueueService for EmailQueueServiceImpl {
    fn enqueue(&self, email: Email) -> Result<(), EmailEnqueueError> {
        self.sender.try_send(email).map_err(|err| match err {
            TrySendError::Full(_) => EmailEnqueueError::Full,
            TrySendError::Closed(_) => EmailEnqueueError::Closed,
        })
    }

    fn status(&self) -> EmailQueueStatus {
        let capacity = self.sender.max_capacity();
        EmailQueueStatus {
            workers: self.workers,
            capacity,
            queued: capacity - self.sender.capacity(),
        }
    }
}

async fn worker<E: EmailService>(
    id: usize,
    email: Arc<E>,
    receiver: Arc<Mutex<mpsc::Receiver<Email>>>,
) {
    debug!(worker = id, "email worker started");

    loop {
        let Some(message) = receiver.lock().await.recv().await else {
            break;
        };

        let subject = message.subject.clone();
        match email.send(message).await {
            Ok(()) => info!(worker = id, %subject, "delivered queued email"),
            Err(err) => {
                let transport = email.transport_info();
                error!(
                    worker = id,
                    %subject,
                    host = %transport.host,
                    port = transport.port,
                    security = %transport.security,
                    credentials = transport.credentials,
                    "failed to deliver queued email: {err}"
                );
            }
        }
    }

    debug!(worker = id, "email queue closed, stopping worker");
}
