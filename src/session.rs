use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::info;

use crate::client::BookingEndpoint;
use crate::controller::BookingController;
use crate::handlers::events::{run_form_driver, FormEvent};
use crate::services::clock::{ClockWidget, TimeSource};
use crate::view::{ClockView, FormView};

const EVENT_BUFFER: usize = 64;

/// Lifetime of one page load.
///
/// Both widgets run as independent tasks. Dropping the session is the page
/// unload: the clock and the form driver are aborted.
pub struct PageSession {
    events: mpsc::Sender<FormEvent>,
    form_task: Option<JoinHandle<()>>,
    clock_task: Option<JoinHandle<()>>,
}

impl PageSession {
    pub fn start<E, V, T, C>(
        controller: Option<BookingController<E, V>>,
        clock: Option<ClockWidget<T, C>>,
    ) -> Self
    where
        E: BookingEndpoint + 'static,
        V: FormView + 'static,
        T: TimeSource + 'static,
        C: ClockView + 'static,
    {
        let (events, receiver) = mpsc::channel(EVENT_BUFFER);

        let form_task = controller.map(|controller| {
            tokio::spawn(async move {
                run_form_driver(controller, receiver).await;
            })
        });

        let clock_task = clock.map(|clock| {
            tokio::spawn(async move {
                clock.run(None).await;
            })
        });

        info!(
            "Page session started (booking form: {}, clock: {})",
            form_task.is_some(),
            clock_task.is_some()
        );

        Self {
            events,
            form_task,
            clock_task,
        }
    }

    /// Handle used to deliver user interaction to the booking form.
    pub fn events(&self) -> mpsc::Sender<FormEvent> {
        self.events.clone()
    }

    pub fn is_running(&self) -> bool {
        [&self.form_task, &self.clock_task]
            .into_iter()
            .flatten()
            .any(|handle| !handle.is_finished())
    }

    /// Unload the page and wait for both widgets to stop.
    pub async fn close(mut self) {
        for task in [self.form_task.take(), self.clock_task.take()].into_iter().flatten() {
            task.abort();
            let _ = task.await;
        }
        info!("Page session closed");
    }
}

impl Drop for PageSession {
    fn drop(&mut self) {
        for task in [&self.form_task, &self.clock_task].into_iter().flatten() {
            task.abort();
        }
    }
}
