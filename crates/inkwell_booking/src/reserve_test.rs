// --- File: crates/inkwell_booking/src/reserve_test.rs ---
#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};

    use crate::error::BookingError;
    use crate::fakes::{FakeBlobStore, FakePayment, InMemoryRepo};
    use crate::reserve::{reserve, ReservationRequest, UploadedFile};
    use crate::slot::SlotRejection;
    use inkwell_common::services::{BlobStore, BoxedError, PaymentProvider};
    use inkwell_config::{AppConfig, ServerConfig};
    use inkwell_db::{Booking, BookingRepository, BookingStatus, ClientInfo};

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

    // Monday; tomorrow (Tuesday 2026-09-01) is a regular open day.
    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 31).unwrap()
    }

    fn request(date: NaiveDate, start_h: u32, end_h: u32) -> ReservationRequest {
        ReservationRequest {
            name: "Jane Doe".to_string(),
            age: 29,
            phone: "555-0100".to_string(),
            email: "jane@example.com".to_string(),
            description: "Half-sleeve outline".to_string(),
            files: Vec::new(),
            date,
            start_time: NaiveTime::from_hms_opt(start_h, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(end_h, 0, 0).unwrap(),
        }
    }

    fn tomorrow() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 9, 1).unwrap()
    }

    fn payment(fake: &Arc<FakePayment>) -> Arc<dyn PaymentProvider<Error = BoxedError>> {
        fake.clone()
    }

    fn confirmed_booking(start_h: u32, end_h: u32) -> Booking {
        // Tuesday in EDT: local hour + 4 = UTC hour
        Booking {
            id: "existing".to_string(),
            client: ClientInfo {
                name: "Early Bird".to_string(),
                age: 30,
                phone: "555-0199".to_string(),
                email: "early@example.com".to_string(),
            },
            description: "prior work".to_string(),
            attached_files: Vec::new(),
            start: Utc.with_ymd_and_hms(2026, 9, 1, start_h + 4, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2026, 9, 1, end_h + 4, 0, 0).unwrap(),
            status: BookingStatus::Confirmed,
            payment_session_ref: "cs_existing".to_string(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn reserve_creates_a_tentative_booking_with_redirect() {
        let repo = InMemoryRepo::default();
        let fake = Arc::new(FakePayment::default());
        let provider = payment(&fake);

        let outcome = reserve(
            &config(),
            &repo,
            &provider,
            None,
            today(),
            request(tomorrow(), 13, 15),
        )
        .await
        .unwrap();

        assert!(outcome.redirect_url.starts_with("https://pay.example/"));
        let rows = repo.bookings();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, outcome.booking_id);
        assert_eq!(rows[0].status, BookingStatus::Tentative);
        // Tuesday 13:00 EDT is 17:00 UTC
        assert_eq!(rows[0].start, Utc.with_ymd_and_hms(2026, 9, 1, 17, 0, 0).unwrap());
        assert_eq!(rows[0].end, Utc.with_ymd_and_hms(2026, 9, 1, 19, 0, 0).unwrap());

        // Default deposit applied and metadata carries the booking id.
        let created = fake.created.lock().unwrap();
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].amount_cents, 15_000);
        assert_eq!(created[0].currency, "usd");
        assert_eq!(created[0].booking_id, outcome.booking_id);
    }

    #[tokio::test]
    async fn reserve_stores_files_before_payment() {
        let repo = InMemoryRepo::default();
        let fake = Arc::new(FakePayment::default());
        let provider = payment(&fake);
        let blobs = Arc::new(FakeBlobStore::default());
        let store: Arc<dyn BlobStore<Error = BoxedError>> = blobs.clone();

        let mut req = request(tomorrow(), 13, 15);
        req.files = vec![
            UploadedFile {
                filename: "sketch.png".to_string(),
                bytes: vec![1, 2, 3],
            },
            UploadedFile {
                filename: "placement.jpg".to_string(),
                bytes: vec![4, 5],
            },
        ];

        let outcome = reserve(&config(), &repo, &provider, Some(&store), today(), req)
            .await
            .unwrap();

        let rows = repo.bookings();
        assert_eq!(
            rows[0].attached_files,
            vec![
                format!("{}/sketch.png", outcome.booking_id),
                format!("{}/placement.jpg", outcome.booking_id),
            ]
        );
        assert_eq!(blobs.stored.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn closed_day_rejection_leaves_the_store_untouched() {
        let repo = InMemoryRepo::default();
        let fake = Arc::new(FakePayment::default());
        let provider = payment(&fake);

        // 2026-09-06 is a Sunday
        let result = reserve(
            &config(),
            &repo,
            &provider,
            None,
            today(),
            request(NaiveDate::from_ymd_opt(2026, 9, 6).unwrap(), 13, 15),
        )
        .await;

        assert!(matches!(
            result,
            Err(BookingError::SlotRejected(SlotRejection::ClosedDay))
        ));
        assert!(repo.bookings().is_empty());
        assert!(fake.created.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn outside_hours_is_rejected() {
        let repo = InMemoryRepo::default();
        let fake = Arc::new(FakePayment::default());
        let provider = payment(&fake);

        let result = reserve(
            &config(),
            &repo,
            &provider,
            None,
            today(),
            request(tomorrow(), 11, 13),
        )
        .await;

        assert!(matches!(
            result,
            Err(BookingError::SlotRejected(SlotRejection::OutsideBusinessHours))
        ));
    }

    #[tokio::test]
    async fn underage_clients_are_rejected_regardless_of_slot() {
        let repo = InMemoryRepo::default();
        let fake = Arc::new(FakePayment::default());
        let provider = payment(&fake);

        let mut req = request(tomorrow(), 13, 15);
        req.age = 17;
        let result = reserve(&config(), &repo, &provider, None, today(), req).await;

        assert!(matches!(result, Err(BookingError::Underage)));
        assert!(repo.bookings().is_empty());
    }

    #[tokio::test]
    async fn blank_fields_are_rejected_after_trimming() {
        let repo = InMemoryRepo::default();
        let fake = Arc::new(FakePayment::default());
        let provider = payment(&fake);

        let mut req = request(tomorrow(), 13, 15);
        req.phone = "   ".to_string();
        let result = reserve(&config(), &repo, &provider, None, today(), req).await;

        assert!(matches!(result, Err(BookingError::IncompleteForm("phone"))));
    }

    #[tokio::test]
    async fn confirmed_overlap_reports_the_holder() {
        let repo = InMemoryRepo::default();
        repo.insert_tentative(&confirmed_booking(13, 15)).await.unwrap();
        // insert_tentative stores it as given, including confirmed status

        let fake = Arc::new(FakePayment::default());
        let provider = payment(&fake);

        let result = reserve(
            &config(),
            &repo,
            &provider,
            None,
            today(),
            request(tomorrow(), 14, 16),
        )
        .await;

        match result {
            Err(BookingError::SlotTaken { taken_by }) => assert_eq!(taken_by, "Early Bird"),
            other => panic!("expected SlotTaken, got {:?}", other.map(|o| o.booking_id)),
        }
        assert!(fake.created.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn tentative_bookings_do_not_block_each_other() {
        let repo = InMemoryRepo::default();
        let fake = Arc::new(FakePayment::default());
        let provider = payment(&fake);

        reserve(
            &config(),
            &repo,
            &provider,
            None,
            today(),
            request(tomorrow(), 13, 15),
        )
        .await
        .unwrap();
        reserve(
            &config(),
            &repo,
            &provider,
            None,
            today(),
            request(tomorrow(), 14, 16),
        )
        .await
        .unwrap();

        assert_eq!(repo.bookings().len(), 2);
    }

    #[tokio::test]
    async fn payment_failure_aborts_before_the_insert() {
        let repo = InMemoryRepo::default();
        let fake = Arc::new(FakePayment {
            fail_create: true,
            ..Default::default()
        });
        let provider = payment(&fake);

        let result = reserve(
            &config(),
            &repo,
            &provider,
            None,
            today(),
            request(tomorrow(), 13, 15),
        )
        .await;

        assert!(matches!(result, Err(BookingError::External { .. })));
        assert!(repo.bookings().is_empty());
    }
}
