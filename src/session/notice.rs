//! Timed dismissal of transient notices.
//!
//! Raising a notice starts a one-shot timer. A newer notice aborts the older
//! timer, and a timer only ever hides the notice it was started for.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::session::error::SessionError;
use crate::session::state::{Notice, SessionState};

pub(crate) struct NoticeBoard {
    state: Arc<watch::Sender<SessionState>>,
    display_for: Duration,
    timer: Mutex<Option<JoinHandle<()>>>,
}

impl NoticeBoard {
    pub(crate) fn new(state: Arc<watch::Sender<SessionState>>, display_for: Duration) -> Self {
        Self {
            state,
            display_for,
            timer: Mutex::new(None),
        }
    }

    /// Show `error` as the current transient notice.
    ///
    /// The timer lock is held across the state write and the timer swap, so
    /// the notice left in state is always the one whose timer survives.
    pub(crate) fn raise(&self, error: &SessionError) -> Notice {
        let notice = Notice::new(error);
        let id = notice.id;

        let mut timer = self.timer.lock().unwrap_or_else(|e| e.into_inner());
        self.state.send_modify(|s| s.notice = Some(notice.clone()));

        let state = self.state.clone();
        let display_for = self.display_for;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(display_for).await;
            state.send_if_modified(|s| match s.notice.as_mut() {
                Some(current) if current.id == id && current.visible => {
                    current.visible = false;
                    true
                }
                _ => false,
            });
        });

        if let Some(previous) = timer.replace(handle) {
            previous.abort();
        }
        drop(timer);

        tracing::debug!(notice_id = %id, kind = notice.kind.as_str(), "Notice raised");
        notice
    }
}

impl Drop for NoticeBoard {
    fn drop(&mut self) {
        let timer = self.timer.get_mut().unwrap_or_else(|e| e.into_inner());
        if let Some(handle) = timer.take() {
            handle.abort();
        }
    }
}
