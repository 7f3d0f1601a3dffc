use studio_scheduler::{
    api::router::create_router,
    config::Config,
    domain::models::{
        appointment::Appointment,
        schedule::Occurrence,
        student::Student,
        subscription::{NewSubscriptionParams, Subscription},
    },
    domain::ports::AppointmentRepository,
    domain::services::subscription_binder::OverlapPolicy,
    infra::events::broadcast_sink::BroadcastEventSink,
    infra::factory::{run_sqlite_migrations, sqlite_repositories},
    state::AppState,
};
use sqlx::{sqlite::{SqliteConnectOptions, SqlitePoolOptions}, Pool, Sqlite};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;
use axum::{body::Body, http::{header, Request}, response::Response, Router};
use chrono::NaiveDate;
use serde_json::Value;
use tower::ServiceExt;

pub type AppointmentWrapper = Box<dyn FnOnce(Arc<dyn AppointmentRepository>) -> Arc<dyn AppointmentRepository>>;

pub struct TestOptions {
    pub overlap_policy: OverlapPolicy,
    pub slot_capacity: i64,
    /// Lets a test put a fault-injecting repository in front of the real one.
    pub wrap_appointments: Option<AppointmentWrapper>,
}

impl Default for TestOptions {
    fn default() -> Self {
        Self {
            overlap_policy: OverlapPolicy::Reject,
            slot_capacity: 5,
            wrap_appointments: None,
        }
    }
}

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
    pub events: Arc<BroadcastEventSink>,
}

#[allow(dead_code)]
impl TestApp {
    pub async fn new() -> Self {
        Self::with_options(TestOptions::default()).await
    }

    pub async fn with_options(options: TestOptions) -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        run_sqlite_migrations(&pool).await.expect("Failed to migrate test db");

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            slot_capacity: options.slot_capacity,
            opening_hour: 8,
            closing_hour: 21,
            subscription_days: 30,
            overlap_policy: options.overlap_policy,
        };

        let mut repos = sqlite_repositories(pool.clone());
        if let Some(wrap) = options.wrap_appointments {
            repos.appointments = wrap(repos.appointments);
        }

        let events = Arc::new(BroadcastEventSink::new());
        let state = Arc::new(AppState::new(config, repos, events.clone()));
        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
            events,
        }
    }

    pub async fn seed_student(&self, name: &str, dni: Option<&str>) -> Student {
        let student = Student::new(name.to_string(), dni.map(str::to_string), None, None);
        self.state.student_repo.create(&student).await.unwrap()
    }

    pub async fn seed_subscription(&self, student_id: &str, start: &str, end: &str, weekly_frequency: i32) -> Subscription {
        let subscription = Subscription::new(NewSubscriptionParams {
            student_id: student_id.to_string(),
            plan_id: None,
            start_date: date(start),
            end_date: date(end),
            weekly_frequency,
            amount: 0.0,
        });
        self.state.subscription_repo.create(&subscription).await.unwrap()
    }

    /// Inserts appointments directly, bypassing the allocator.
    pub async fn seed_appointment(&self, student_id: &str, subscription_id: Option<&str>, day: &str, hour: &str) -> Appointment {
        let appointment = Appointment::new(
            student_id.to_string(),
            subscription_id.map(str::to_string),
            &Occurrence::new(date(day), hour),
        );
        sqlx::query("INSERT INTO appointments (id, student_id, subscription_id, date, hour, created_at) VALUES (?, ?, ?, ?, ?, ?)")
            .bind(&appointment.id)
            .bind(&appointment.student_id)
            .bind(&appointment.subscription_id)
            .bind(appointment.date)
            .bind(&appointment.hour)
            .bind(appointment.created_at)
            .execute(&self.pool)
            .await
            .unwrap();
        appointment
    }

    /// Fills `(day, hour)` with `count` bookings from fresh students.
    pub async fn fill_slot(&self, day: &str, hour: &str, count: usize) {
        for i in 0..count {
            let student = self.seed_student(&format!("Filler {}", i), None).await;
            self.seed_appointment(&student.id, None, day, hour).await;
        }
    }

    pub async fn count_slot(&self, day: &str, hour: &str) -> i64 {
        self.state.appointment_repo.count_bookings(date(day), hour).await.unwrap()
    }

    pub async fn request(&self, method: &str, uri: &str, body: Option<Value>) -> Response {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.router.clone().oneshot(request).await.unwrap()
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
        let _ = std::fs::remove_file(format!("{}-wal", self.db_filename));
        let _ = std::fs::remove_file(format!("{}-shm", self.db_filename));
    }
}

#[allow(dead_code)]
pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

#[allow(dead_code)]
pub async fn parse_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
