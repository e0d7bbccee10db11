/// End-to-end booking scenarios against a local form endpoint
#[cfg(test)]
mod workflow_tests {
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::Router;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::mpsc;
    use tokio::time::Instant;

    use async_trait::async_trait;

    use crate::client::{BookingEndpoint, HttpBookingEndpoint, MockBookingEndpoint};
    use crate::error::SubmissionError;
    use crate::models::submission::FormSubmission;
    use crate::config::SubmitLabels;
    use crate::controller::{BookingController, SubmitOutcome, BANNER_FADE, BANNER_LIFETIME};
    use crate::handlers::events::{run_form_driver, FormEvent};
    use crate::models::lifecycle::SubmissionLifecycle;
    use crate::tests::common::fixtures::{
        fill, session_dropdown, standard_form, standard_form_for, RecordingView,
    };
    use crate::view::ScrollTarget;

    // Local stand-in for the form endpoint; counts the POSTs it receives
    async fn spawn_form_endpoint(status: StatusCode) -> (String, Arc<AtomicUsize>) {
        let hits = Arc::new(AtomicUsize::new(0));
        let hits_ref = Arc::clone(&hits);

        let app = Router::new().route(
            "/book",
            post(move || {
                let hits = Arc::clone(&hits_ref);
                async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    (status, "{\"ok\":true}")
                }
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{}/book", addr), hits)
    }

    fn http_controller(
        action: &str,
    ) -> (BookingController<HttpBookingEndpoint, RecordingView>, RecordingView) {
        let view = RecordingView::default();
        let controller = BookingController::new(
            standard_form_for(action),
            Some(session_dropdown()),
            HttpBookingEndpoint::new(Some(Duration::from_secs(10))).unwrap(),
            view.clone(),
            SubmitLabels::default(),
        );
        (controller, view)
    }

    // Type the filled values in, step by step, the way a visitor would
    fn complete_steps<E, V>(controller: &mut BookingController<E, V>)
    where
        E: crate::client::BookingEndpoint,
        V: crate::view::FormView,
    {
        let filled = fill(standard_form());
        for step in 1..=filled.step_count() {
            for field in &filled.step(step).unwrap().fields {
                controller.on_input(&field.name, &field.value);
            }
            if step < filled.step_count() {
                assert!(controller.advance());
            }
        }
    }

    #[tokio::test]
    async fn test_booking_accepted_by_endpoint() {
        let (action, hits) = spawn_form_endpoint(StatusCode::OK).await;
        let (mut controller, view) = http_controller(&action);

        complete_steps(&mut controller);
        assert!(matches!(controller.submit().await, SubmitOutcome::Booked));
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        assert_eq!(
            view.lifecycle_history(),
            vec![
                SubmissionLifecycle::Idle,
                SubmissionLifecycle::Submitting,
                SubmissionLifecycle::Success
            ]
        );

        controller.run_due(Instant::now() + Duration::from_millis(500));
        let frame = view.last_frame().unwrap();
        assert!(!frame.form.displayed);
        assert!(frame.success.displayed);
        assert!(frame.fields.iter().all(|field| field.value.is_empty()));
        assert!(!frame.submit.disabled);
    }

    #[tokio::test]
    async fn test_booking_rejected_by_endpoint() {
        let (action, hits) = spawn_form_endpoint(StatusCode::INTERNAL_SERVER_ERROR).await;
        let (mut controller, view) = http_controller(&action);

        complete_steps(&mut controller);
        assert!(matches!(controller.submit().await, SubmitOutcome::Failed(_)));
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        assert_eq!(
            view.lifecycle_history(),
            vec![
                SubmissionLifecycle::Idle,
                SubmissionLifecycle::Submitting,
                SubmissionLifecycle::Failed,
                SubmissionLifecycle::Idle
            ]
        );

        let frame = view.last_frame().unwrap();
        assert!(frame.banner.is_some());
        assert!(!frame.submit.disabled);
        assert_eq!(frame.submit.label, "Submit Booking");
        assert!(!frame.submit.spinner_visible);

        controller.run_due(Instant::now() + BANNER_LIFETIME + BANNER_FADE);
        assert!(view.last_frame().unwrap().banner.is_none());
    }

    #[tokio::test]
    async fn test_invalid_email_never_reaches_endpoint() {
        let (action, hits) = spawn_form_endpoint(StatusCode::OK).await;
        let (mut controller, view) = http_controller(&action);

        controller.on_input("name", "Ada Lovelace");
        controller.on_input("email", "not-an-email");
        controller.on_input("phone", "+44 20 7946 0958");

        assert!(!controller.advance());
        assert!(matches!(controller.submit().await, SubmitOutcome::Rejected(_)));
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert_eq!(controller.lifecycle(), SubmissionLifecycle::Idle);
        assert_eq!(view.last_frame().unwrap().invalid_fields(), vec!["email"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_driver_runs_full_session() {
        let mut endpoint = MockBookingEndpoint::new();
        endpoint.expect_submit().times(1).returning(|_, _| Ok(()));

        let view = RecordingView::default();
        let controller = BookingController::new(
            standard_form(),
            Some(session_dropdown()),
            endpoint,
            view.clone(),
            SubmitLabels::default(),
        );

        let (events, receiver) = mpsc::channel(16);
        let driver = tokio::spawn(run_form_driver(controller, receiver));

        let filled = fill(standard_form());
        for field in filled.fields() {
            if field.name == "sessionType" {
                continue;
            }
            events
                .send(FormEvent::Input {
                    name: field.name.clone(),
                    value: field.value.clone(),
                })
                .await
                .unwrap();
        }
        events.send(FormEvent::DropdownClick).await.unwrap();
        events.send(FormEvent::DropdownChoose(0)).await.unwrap();
        events.send(FormEvent::Next).await.unwrap();
        events.send(FormEvent::Next).await.unwrap();
        events.send(FormEvent::Submit).await.unwrap();

        // Let the success panel appear
        tokio::time::sleep(Duration::from_millis(600)).await;
        let frame = view.last_frame().unwrap();
        assert_eq!(frame.lifecycle, SubmissionLifecycle::Success);
        assert!(frame.success.displayed);
        assert_eq!(view.last_scroll(), Some(ScrollTarget::SuccessPanel));

        events.send(FormEvent::BookAnother).await.unwrap();
        tokio::time::sleep(Duration::from_millis(400)).await;
        let frame = view.last_frame().unwrap();
        assert_eq!(frame.lifecycle, SubmissionLifecycle::Idle);
        assert!(frame.form.displayed);
        assert!(!frame.success.displayed);

        drop(events);
        let controller = driver.await.unwrap();
        assert_eq!(controller.current_step(), 1);
    }

    // Endpoint that answers 500 after a delay, counting requests
    struct SlowFailingEndpoint {
        delay: Duration,
        hits: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl BookingEndpoint for SlowFailingEndpoint {
        async fn submit(
            &self,
            _action: &str,
            _submission: &FormSubmission,
        ) -> Result<(), SubmissionError> {
            self.hits.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            Err(SubmissionError::Status(500))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_driver_drops_submit_while_request_pending() {
        let hits = Arc::new(AtomicUsize::new(0));
        let view = RecordingView::default();
        let mut controller = BookingController::new(
            fill(standard_form()),
            Some(session_dropdown()),
            SlowFailingEndpoint {
                delay: Duration::from_secs(2),
                hits: Arc::clone(&hits),
            },
            view.clone(),
            SubmitLabels::default(),
        );
        assert!(controller.advance());
        assert!(controller.advance());

        let (events, receiver) = mpsc::channel(16);
        let driver = tokio::spawn(run_form_driver(controller, receiver));

        events.send(FormEvent::Submit).await.unwrap();
        tokio::time::sleep(Duration::from_millis(500)).await;

        let frame = view.last_frame().unwrap();
        assert_eq!(frame.lifecycle, SubmissionLifecycle::Submitting);
        assert!(frame.submit.disabled);

        // Click on the locked control, then a dismissal that must not wait for the response
        events.send(FormEvent::Submit).await.unwrap();
        events.send(FormEvent::BookAnother).await.unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(view.last_frame().unwrap().lifecycle, SubmissionLifecycle::Submitting);

        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        let frame = view.last_frame().unwrap();
        assert_eq!(frame.lifecycle, SubmissionLifecycle::Idle);
        assert!(frame.banner.is_some());
        assert!(!frame.submit.disabled);

        // Banner timers keep running in the driver after the failure
        tokio::time::sleep(BANNER_LIFETIME + BANNER_FADE).await;
        assert!(view.last_frame().unwrap().banner.is_none());

        drop(events);
        let controller = driver.await.unwrap();
        assert_eq!(controller.lifecycle(), SubmissionLifecycle::Idle);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
