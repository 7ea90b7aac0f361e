// --- File: crates/inkwell_booking/src/handlers_test.rs ---
#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use chrono::{Datelike, Duration, NaiveDate, Utc, Weekday};
    use tower::ServiceExt; // for oneshot

    use crate::confirm::ConfirmOutcome;
    use crate::error::BookingError;
    use crate::fakes::{FakePayment, InMemoryRepo};
    use crate::handlers::{webhook_reply, BookingState};
    use crate::routes::routes;
    use inkwell_common::services::{
        BlobStore, BoxedError, Notifier, PaymentProvider, ServiceFactory,
    };
    use inkwell_config::{AppConfig, ServerConfig};
    use inkwell_db::BookingStatus;

    fn config() -> AppConfig {
        AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
            },
            use_stripe: true,
            use_notifications: false,
            studio: Default::default(),
            upload: Default::default(),
            database: None,
            stripe: None,
            notification: None,
        }
    }

    struct TestServices {
        payment: Arc<FakePayment>,
    }

    impl ServiceFactory for TestServices {
        fn payment_provider(&self) -> Option<Arc<dyn PaymentProvider<Error = BoxedError>>> {
            Some(self.payment.clone())
        }

        fn notifier(&self) -> Option<Arc<dyn Notifier<Error = BoxedError>>> {
            None
        }

        fn blob_store(&self) -> Option<Arc<dyn BlobStore<Error = BoxedError>>> {
            None
        }
    }

    fn app(repo: Arc<InMemoryRepo>, payment: Arc<FakePayment>) -> axum::Router {
        let state = Arc::new(BookingState {
            config: Arc::new(config()),
            repo,
            services: Arc::new(TestServices { payment }),
        });
        routes(state)
    }

    /// Hand-rolled multipart/form-data body with text fields only.
    fn multipart_body(fields: &[(&str, &str)]) -> (String, String) {
        let boundary = "booking-form-boundary";
        let mut body = String::new();
        for (name, value) in fields {
            body.push_str(&format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            ));
        }
        body.push_str(&format!("--{boundary}--\r\n"));
        (
            format!("multipart/form-data; boundary={boundary}"),
            body,
        )
    }

    fn post_booking(content_type: &str, body: String) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/bookings")
            .header("content-type", content_type)
            .body(Body::from(body))
            .unwrap()
    }

    /// A bookable open day relative to the real clock, since the handler
    /// derives `today` from it.
    fn open_day_next_week() -> NaiveDate {
        let mut date = Utc::now().date_naive() + Duration::days(7);
        if date.weekday() == Weekday::Sun {
            date += Duration::days(1);
        }
        date
    }

    #[tokio::test]
    async fn booking_form_round_trips_to_a_tentative_row() {
        let repo = Arc::new(InMemoryRepo::default());
        let payment = Arc::new(FakePayment::default());
        let app = app(repo.clone(), payment);

        let date = open_day_next_week().format("%Y-%m-%d").to_string();
        let (content_type, body) = multipart_body(&[
            ("name", "Jane Doe"),
            ("age", "29"),
            ("phone", "555-0100"),
            ("email", "jane@example.com"),
            ("description", "Half-sleeve outline"),
            ("date", &date),
            ("start_time", "13:00"),
            ("end_time", "15:00"),
        ]);

        let response = app.oneshot(post_booking(&content_type, body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let reply: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert!(reply["redirect_url"]
            .as_str()
            .unwrap()
            .starts_with("https://pay.example/"));

        let rows = repo.bookings();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, reply["booking_id"].as_str().unwrap());
        assert_eq!(rows[0].status, BookingStatus::Tentative);
    }

    #[tokio::test]
    async fn booking_form_without_age_is_rejected_as_missing() {
        let repo = Arc::new(InMemoryRepo::default());
        let payment = Arc::new(FakePayment::default());
        let app = app(repo.clone(), payment);

        let date = open_day_next_week().format("%Y-%m-%d").to_string();
        let (content_type, body) = multipart_body(&[
            ("name", "Jane Doe"),
            ("phone", "555-0100"),
            ("email", "jane@example.com"),
            ("description", "Half-sleeve outline"),
            ("date", &date),
            ("start_time", "13:00"),
            ("end_time", "15:00"),
        ]);

        let response = app.oneshot(post_booking(&content_type, body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(String::from_utf8_lossy(&bytes), "Missing age");
        assert!(repo.bookings().is_empty());
    }

    #[test]
    fn webhook_reply_asks_for_redelivery_when_not_paid() {
        let response = webhook_reply(Ok(ConfirmOutcome::NotPaid));
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn webhook_reply_acknowledges_terminal_outcomes() {
        let confirmed = webhook_reply(Ok(ConfirmOutcome::Confirmed {
            booking_id: "b-1".to_string(),
        }));
        assert_eq!(confirmed.status(), StatusCode::OK);

        let repeat = webhook_reply(Ok(ConfirmOutcome::AlreadyConfirmed));
        assert_eq!(repeat.status(), StatusCode::OK);

        // A retry can never win a lost slot; acknowledge and leave it to
        // the operator.
        let conflict = webhook_reply(Err(BookingError::ConflictAtConfirmation {
            booking_id: "b-1".to_string(),
        }));
        assert_eq!(conflict.status(), StatusCode::OK);
    }

    #[test]
    fn webhook_reply_surfaces_other_errors() {
        let response = webhook_reply(Err(BookingError::Internal("boom".to_string())));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
