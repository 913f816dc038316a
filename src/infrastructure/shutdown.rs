use tokio::{sync::watch, task::JoinHandle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    Interrupt,
    Terminate,
}

impl StopReason {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Interrupt => "interrupt",
            Self::Terminate => "terminate",
        }
    }
}

/// Stop flag for a running batch. Only the first reason is kept.
#[derive(Clone)]
pub struct Shutdown {
    sender: watch::Sender<Option<StopReason>>,
}

#[derive(Clone)]
pub struct ShutdownListener {
    receiver: watch::Receiver<Option<StopReason>>,
}

impl Shutdown {
    pub fn new() -> (Self, ShutdownListener) {
        let (sender, receiver) = watch::channel(None);
        (Self { sender }, ShutdownListener { receiver })
    }

    pub fn subscribe(&self) -> ShutdownListener {
        ShutdownListener {
            receiver: self.sender.subscribe(),
        }
    }

    pub fn trigger(&self, reason: StopReason) {
        self.sender.send_if_modified(|current| {
            if current.is_some() {
                return false;
            }
            *current = Some(reason);
            true
        });
    }
}

impl ShutdownListener {
    pub fn reason(&self) -> Option<StopReason> {
        *self.receiver.borrow()
    }

    pub fn is_triggered(&self) -> bool {
        self.reason().is_some()
    }
}

/// Watches for ctrl-c / SIGTERM; the caller aborts the task once the batch is done.
pub fn install_signal_handlers(shutdown: Shutdown) -> JoinHandle<()> {
    tokio::spawn(async move {
        if let Some(reason) = wait_for_signal().await {
            tracing::info!(
                target: "lifecycle",
                reason = reason.as_str(),
                "stop requested; finishing the current round"
            );
            shutdown.trigger(reason);
        }
    })
}

#[cfg(unix)]
async fn wait_for_signal() -> Option<StopReason> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut term = match signal(SignalKind::terminate()) {
        Ok(term) => term,
        Err(err) => {
            tracing::warn!(target: "lifecycle", error = %err, "SIGTERM handler unavailable");
            return tokio::signal::ctrl_c().await.ok().map(|_| StopReason::Interrupt);
        }
    };

    tokio::select! {
        res = tokio::signal::ctrl_c() => res.ok().map(|_| StopReason::Interrupt),
        _ = term.recv() => Some(StopReason::Terminate),
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() -> Option<StopReason> {
    tokio::signal::ctrl_c().await.ok().map(|_| StopReason::Interrupt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_reason_wins() {
        let (shutdown, first) = Shutdown::new();
        let second = shutdown.subscribe();
        assert!(!first.is_triggered());
        assert_eq!(first.reason(), None);

        shutdown.trigger(StopReason::Terminate);
        shutdown.trigger(StopReason::Interrupt);
        assert_eq!(first.reason(), Some(StopReason::Terminate));
        assert_eq!(second.reason(), Some(StopReason::Terminate));
    }

    #[test]
    fn late_subscribers_see_the_stop() {
        let (shutdown, _) = Shutdown::new();
        shutdown.trigger(StopReason::Interrupt);
        assert!(shutdown.subscribe().is_triggered());
    }
}
