//! Server initialization and routing

use crate::api;
use crate::config::Config;
use crate::jwt::JwtManager;
use crate::openapi::ApiDoc;
use crate::report::PdfRenderer;
use crate::repository::{
    account::AccountRepositoryImpl, course::CourseRepositoryImpl,
    enrollment::EnrollmentRepositoryImpl, student::StudentRepositoryImpl,
};
use crate::service::{
    AccountProvisioner, AuthService, CourseService, EnrollmentService, ReportService,
    StudentService,
};
use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use utoipa::OpenApi;
use utoipa_redoc::{Redoc, Servable};
use utoipa_swagger_ui::SwaggerUi;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db_pool: PgPool,
    pub student_service: Arc<StudentService<StudentRepositoryImpl>>,
    pub course_service: Arc<CourseService<CourseRepositoryImpl>>,
    pub enrollment_service: Arc<
        EnrollmentService<
            EnrollmentRepositoryImpl,
            StudentRepositoryImpl,
            CourseRepositoryImpl,
            AccountRepositoryImpl,
        >,
    >,
    pub report_service: Arc<
        ReportService<
            EnrollmentRepositoryImpl,
            StudentRepositoryImpl,
            CourseRepositoryImpl,
            PdfRenderer,
        >,
    >,
    pub auth_service: Arc<AuthService<AccountRepositoryImpl, StudentRepositoryImpl>>,
    pub jwt_manager: JwtManager,
}

/// Run the server
pub async fn run(config: Config) -> Result<()> {
    // Create database connection pool
    let db_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await?;

    info!("Connected to database");

    // Create repositories
    let student_repo = Arc::new(StudentRepositoryImpl::new(db_pool.clone()));
    let course_repo = Arc::new(CourseRepositoryImpl::new(db_pool.clone()));
    let enrollment_repo = Arc::new(EnrollmentRepositoryImpl::new(db_pool.clone()));
    let account_repo = Arc::new(AccountRepositoryImpl::new(db_pool.clone()));

    // Create JWT manager
    let jwt_manager = JwtManager::new(config.jwt.clone());

    // Load report fonts once at startup
    let renderer = Arc::new(PdfRenderer::new(&config.reports)?);

    // Create services
    let student_service = Arc::new(StudentService::new(student_repo.clone()));
    let course_service = Arc::new(CourseService::new(course_repo.clone()));
    let provisioner = Arc::new(AccountProvisioner::new(account_repo.clone()));
    let enrollment_service = Arc::new(EnrollmentService::new(
        enrollment_repo.clone(),
        student_repo.clone(),
        course_repo.clone(),
        account_repo.clone(),
        provisioner,
    ));
    let report_service = Arc::new(ReportService::new(
        enrollment_repo,
        student_repo.clone(),
        course_repo,
        renderer,
    ));
    let auth_service = Arc::new(AuthService::new(
        account_repo,
        student_repo,
        jwt_manager.clone(),
    ));

    // Create app state
    let state = AppState {
        config: Arc::new(config.clone()),
        db_pool,
        student_service,
        course_service,
        enrollment_service,
        report_service,
        auth_service,
        jwt_manager,
    };

    let app = build_router(state);

    let http_addr = config.http_addr();
    let listener = TcpListener::bind(&http_addr).await?;
    info!("HTTP server started on {}", http_addr);
    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the HTTP router
pub fn build_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health endpoints
        .route("/health", get(api::health::health))
        .route("/ready", get(api::health::ready))
        // Auth endpoints
        .route("/api/v1/auth/login", post(api::auth::login))
        .route("/api/v1/auth/refresh", post(api::auth::refresh))
        .route("/api/v1/auth/me", get(api::auth::me))
        // Student endpoints
        .route(
            "/api/v1/students",
            get(api::student::list).post(api::student::create),
        )
        .route(
            "/api/v1/students/{id}",
            get(api::student::get)
                .put(api::student::update)
                .delete(api::student::delete),
        )
        .route("/api/v1/students/{id}/courses", get(api::student::courses))
        .route(
            "/api/v1/students/{id}/report-pdf",
            get(api::student::report_pdf),
        )
        // Course endpoints
        .route(
            "/api/v1/courses",
            get(api::course::list).post(api::course::create),
        )
        .route(
            "/api/v1/courses/{id}",
            get(api::course::get)
                .put(api::course::update)
                .delete(api::course::delete),
        )
        .route("/api/v1/courses/{id}/students", get(api::course::students))
        .route(
            "/api/v1/courses/{id}/report-pdf",
            get(api::course::report_pdf),
        )
        // Enrollment endpoints
        .route(
            "/api/v1/enrollments",
            get(api::enrollment::list).post(api::enrollment::create),
        )
        .route(
            "/api/v1/enrollments/{id}",
            get(api::enrollment::get).delete(api::enrollment::delete),
        )
        // API documentation
        .merge(SwaggerUi::new("/api/docs").url("/api/openapi.json", ApiDoc::openapi()))
        .merge(Redoc::with_url("/api/redoc", ApiDoc::openapi()))
        // Add middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
