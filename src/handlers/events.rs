use std::future::Future;
use std::pin::Pin;
use tokio::sync::mpsc;
use tokio::time::sleep_until;
use tracing::{debug, info};

use crate::client::BookingEndpoint;
use crate::controller::{BookingController, SubmitOutcome, SubmitStart};
use crate::error::SubmissionError;
use crate::services::dropdown::DropdownKey;
use crate::view::FormView;

/// User interaction delivered to the booking form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEvent {
    Input { name: String, value: String },
    Change { name: String, value: String },
    Check { name: String, checked: bool },
    Next,
    Back,
    Submit,
    BookAnother,
    DismissBanner,
    DropdownClick,
    DropdownChoose(usize),
    DropdownToggleKey(String),
    DropdownMenuKey(String),
}

// Apply one event to the controller
pub async fn dispatch<E, V>(controller: &mut BookingController<E, V>, event: FormEvent)
where
    E: BookingEndpoint,
    V: FormView,
{
    debug!("Dispatching {:?}", event);

    match event {
        FormEvent::Input { name, value } => controller.on_input(&name, &value),
        FormEvent::Change { name, value } => controller.on_field_change(&name, &value),
        FormEvent::Check { name, checked } => controller.set_checked(&name, checked),
        FormEvent::Next => {
            controller.advance();
        }
        FormEvent::Back => {
            controller.retreat();
        }
        FormEvent::Submit => log_outcome(controller.submit().await),
        FormEvent::BookAnother => {
            controller.book_another();
        }
        FormEvent::DismissBanner => controller.dismiss_banner(),
        FormEvent::DropdownClick => controller.click_dropdown(),
        FormEvent::DropdownChoose(index) => {
            controller.choose_option(index);
        }
        FormEvent::DropdownToggleKey(key) => {
            controller.dropdown_toggle_key(DropdownKey::from_key(&key))
        }
        FormEvent::DropdownMenuKey(key) => controller.dropdown_menu_key(DropdownKey::from_key(&key)),
    }
}

fn log_outcome(outcome: SubmitOutcome) {
    match outcome {
        SubmitOutcome::Booked => info!("Booking confirmed"),
        SubmitOutcome::Failed(err) => info!("Booking not sent: {}", err),
        outcome => debug!("Submit finished: {:?}", outcome),
    }
}

type InFlight = Pin<Box<dyn Future<Output = Result<(), SubmissionError>> + Send>>;

// What woke the driver
enum Wake {
    Event(Option<FormEvent>),
    Deadline,
    Response(Result<(), SubmissionError>),
}

// Resolves with the in-flight request, or never when there is none
async fn response<F>(request: &mut Option<F>) -> F::Output
where
    F: Future + Unpin,
{
    match request.as_mut() {
        Some(request) => request.await,
        None => std::future::pending().await,
    }
}

/// Event loop of the booking form.
///
/// Waits for the next event, the next scheduled visual transition or the
/// response to an in-flight booking, whichever comes first. Events keep being
/// handled while a request is pending, so a second submit hits the locked
/// control and is dropped. Returns the controller once every sender is gone
/// and any in-flight request has settled.
pub async fn run_form_driver<E, V>(
    mut controller: BookingController<E, V>,
    mut events: mpsc::Receiver<FormEvent>,
) -> BookingController<E, V>
where
    E: BookingEndpoint + 'static,
    V: FormView,
{
    info!("Booking form driver started");

    let mut in_flight: Option<InFlight> = None;

    loop {
        let deadline = controller.next_deadline();
        let wake = tokio::select! {
            event = events.recv() => Wake::Event(event),
            _ = async {
                match deadline {
                    Some(deadline) => sleep_until(deadline).await,
                    None => std::future::pending::<()>().await,
                }
            } => Wake::Deadline,
            result = response(&mut in_flight) => Wake::Response(result),
        };

        match wake {
            Wake::Event(Some(FormEvent::Submit)) => match controller.begin_submit() {
                SubmitStart::Sending(request) => in_flight = Some(Box::pin(request.send())),
                SubmitStart::Settled(outcome) => log_outcome(outcome),
            },
            Wake::Event(Some(event)) => dispatch(&mut controller, event).await,
            Wake::Event(None) => {
                if let Some(request) = in_flight.take() {
                    let result = request.await;
                    log_outcome(controller.finish_submit(result));
                }
                break;
            }
            Wake::Deadline => controller.run_due(tokio::time::Instant::now()),
            Wake::Response(result) => {
                in_flight = None;
                log_outcome(controller.finish_submit(result));
            }
        }
    }

    info!("Booking form driver stopped");
    controller
}
