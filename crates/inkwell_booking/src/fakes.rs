// --- File: crates/inkwell_booking/src/fakes.rs ---
//! In-process fakes for the workflow tests: an in-memory booking
//! repository and scripted payment / notifier / blob collaborators.

use std::collections::HashSet;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use chrono::{DateTime, Utc};

use inkwell_common::services::{
    BlobStore, BookingNotice, BoxFuture, BoxedError, CreateSessionRequest, NotificationResult,
    Notifier, PaymentProvider, PaymentSession, PaymentStatus,
};
use inkwell_db::{Booking, BookingRepository, BookingStatus, ConfirmUpdate, DbError, TentativeInsert};

fn boxed(message: &str) -> BoxedError {
    BoxedError(message.to_string().into())
}

/// Mutex-backed repository with the same overlap and CAS semantics as the
/// SQL implementation.
#[derive(Default)]
pub struct InMemoryRepo {
    rows: Mutex<Vec<Booking>>,
}

impl InMemoryRepo {
    pub fn bookings(&self) -> Vec<Booking> {
        self.rows.lock().unwrap().clone()
    }

    fn overlapping_confirmed(
        rows: &[Booking],
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        exclude: Option<&str>,
    ) -> Option<Booking> {
        rows.iter()
            .find(|b| {
                b.status == BookingStatus::Confirmed
                    && exclude != Some(b.id.as_str())
                    && b.start < end
                    && b.end > start
            })
            .cloned()
    }

    /// Confirmed rows whose intervals overlap some other confirmed row.
    /// Empty in any store the workflows are allowed to produce.
    pub fn overlapping_confirmed_pairs(&self) -> Vec<(String, String)> {
        let rows = self.rows.lock().unwrap();
        let confirmed: Vec<&Booking> = rows
            .iter()
            .filter(|b| b.status == BookingStatus::Confirmed)
            .collect();
        let mut pairs = Vec::new();
        for a in &confirmed {
            for b in &confirmed {
                if a.id < b.id && a.start < b.end && a.end > b.start {
                    pairs.push((a.id.clone(), b.id.clone()));
                }
            }
        }
        pairs
    }
}

impl BookingRepository for InMemoryRepo {
    fn init_schema(&self) -> impl Future<Output = Result<(), DbError>> + Send {
        async { Ok(()) }
    }

    fn insert_tentative(
        &self,
        booking: &Booking,
    ) -> impl Future<Output = Result<TentativeInsert, DbError>> + Send {
        let booking = booking.clone();
        async move {
            let mut rows = self.rows.lock().unwrap();
            if let Some(winner) =
                Self::overlapping_confirmed(&rows, booking.start, booking.end, None)
            {
                return Ok(TentativeInsert::SlotTaken {
                    taken_by: winner.client.name,
                });
            }
            rows.push(booking);
            Ok(TentativeInsert::Inserted)
        }
    }

    fn find_by_id(&self, id: &str) -> impl Future<Output = Result<Option<Booking>, DbError>> + Send {
        let id = id.to_string();
        async move {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .find(|b| b.id == id)
                .cloned())
        }
    }

    fn find_by_payment_session(
        &self,
        session_ref: &str,
    ) -> impl Future<Output = Result<Option<Booking>, DbError>> + Send {
        let session_ref = session_ref.to_string();
        async move {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .find(|b| b.payment_session_ref == session_ref)
                .cloned())
        }
    }

    fn find_confirmed_overlapping(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> impl Future<Output = Result<Option<Booking>, DbError>> + Send {
        async move {
            let rows = self.rows.lock().unwrap();
            Ok(Self::overlapping_confirmed(&rows, start, end, None))
        }
    }

    fn confirm_if_no_overlap(
        &self,
        id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> impl Future<Output = Result<ConfirmUpdate, DbError>> + Send {
        let id = id.to_string();
        async move {
            // One lock across check and flip, matching the SQL
            // implementation's transaction.
            let mut rows = self.rows.lock().unwrap();
            if let Some(winner) = Self::overlapping_confirmed(&rows, start, end, Some(&id)) {
                return Ok(ConfirmUpdate::Overlap {
                    winner_id: winner.id,
                });
            }
            match rows
                .iter_mut()
                .find(|b| b.id == id && b.status == BookingStatus::Tentative)
            {
                Some(row) => {
                    row.status = BookingStatus::Confirmed;
                    Ok(ConfirmUpdate::Updated)
                }
                None => Ok(ConfirmUpdate::NotTentative),
            }
        }
    }

    fn list_from(
        &self,
        from: DateTime<Utc>,
    ) -> impl Future<Output = Result<Vec<Booking>, DbError>> + Send {
        async move {
            let mut rows: Vec<Booking> = self
                .rows
                .lock()
                .unwrap()
                .iter()
                .filter(|b| b.start >= from)
                .cloned()
                .collect();
            rows.sort_by_key(|b| b.start);
            Ok(rows)
        }
    }
}

/// Payment provider with scripted paid sessions and a session counter.
///
/// All fields are public so tests can build variants with functional
/// update syntax over `Default`.
#[derive(Default)]
pub struct FakePayment {
    pub counter: AtomicUsize,
    pub paid: Mutex<HashSet<String>>,
    pub created: Mutex<Vec<CreateSessionRequest>>,
    pub fail_create: bool,
}

impl FakePayment {
    pub fn mark_paid(&self, session_ref: &str) {
        self.paid.lock().unwrap().insert(session_ref.to_string());
    }
}

impl PaymentProvider for FakePayment {
    type Error = BoxedError;

    fn create_session(
        &self,
        request: CreateSessionRequest,
    ) -> BoxFuture<'_, PaymentSession, Self::Error> {
        Box::pin(async move {
            if self.fail_create {
                return Err(boxed("checkout unavailable"));
            }
            let n = self.counter.fetch_add(1, Ordering::SeqCst);
            self.created.lock().unwrap().push(request);
            Ok(PaymentSession {
                session_ref: format!("cs_test_{}", n),
                redirect_url: format!("https://pay.example/session/{}", n),
            })
        })
    }

    fn payment_status(&self, session_ref: &str) -> BoxFuture<'_, PaymentStatus, Self::Error> {
        let session_ref = session_ref.to_string();
        Box::pin(async move {
            if self.paid.lock().unwrap().contains(&session_ref) {
                Ok(PaymentStatus::Paid)
            } else {
                Ok(PaymentStatus::Unpaid)
            }
        })
    }
}

/// Records every notice; never fails unless told to.
#[derive(Default)]
pub struct FakeNotifier {
    pub notices: Mutex<Vec<BookingNotice>>,
    pub fail: bool,
}

impl Notifier for FakeNotifier {
    type Error = BoxedError;

    fn notify_confirmed(
        &self,
        notice: BookingNotice,
    ) -> BoxFuture<'_, NotificationResult, Self::Error> {
        Box::pin(async move {
            if self.fail {
                return Err(boxed("smtp down"));
            }
            self.notices.lock().unwrap().push(notice);
            Ok(NotificationResult {
                id: "note-1".to_string(),
                status: "sent".to_string(),
            })
        })
    }
}

/// Records stored files and hands back deterministic references.
#[derive(Default)]
pub struct FakeBlobStore {
    pub stored: Mutex<Vec<(String, String, usize)>>,
}

impl BlobStore for FakeBlobStore {
    type Error = BoxedError;

    fn store(
        &self,
        booking_id: &str,
        filename: &str,
        bytes: Vec<u8>,
    ) -> BoxFuture<'_, String, Self::Error> {
        let booking_id = booking_id.to_string();
        let filename = filename.to_string();
        Box::pin(async move {
            let reference = format!("{}/{}", booking_id, filename);
            self.stored
                .lock()
                .unwrap()
                .push((booking_id, filename, bytes.len()));
            Ok(reference)
        })
    }
}
