//! End-to-end API tests against the in-memory repositories

use axum::{
    body::Body,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        Method, Request, StatusCode,
    },
    Router,
};
use chrono::{Duration, Utc};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tempfile::TempDir;
use tokio::sync::mpsc::UnboundedReceiver;
use tower::ServiceExt;

use em_platform::api::{platform_router, PlatformServices};
use em_platform::config::PlatformConfig;
use em_platform::domain::{Organizer, Participant, TopicCategory, User};
use em_platform::notification::{Notification, NotificationQueue};
use em_platform::repository::Repositories;
use em_platform::seed::DevDataSeeder;

struct TestApp {
    router: Router,
    services: PlatformServices,
    notifications: UnboundedReceiver<Notification>,
    _media: TempDir,
}

impl TestApp {
    async fn new() -> Self {
        let media = TempDir::new().unwrap();
        let config = PlatformConfig {
            media_root: media.path().to_path_buf(),
            ..Default::default()
        };
        let repos = Repositories::in_memory();
        let (queue, notifications) = NotificationQueue::channel();
        let services = PlatformServices::new(repos.clone(), &config, queue);
        DevDataSeeder::new(repos, services.password_service.clone())
            .seed_topics()
            .await
            .unwrap();

        Self {
            router: platform_router(&services),
            services,
            notifications,
            _media: media,
        }
    }

    async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    /// Store a user directly and return it with an access token
    async fn user(&self, n: usize, superuser: bool) -> (User, String) {
        let mut user = User::new(format!("user{}@example.com", n), format!("+49{}", n), "unused")
            .with_names(format!("First{}", n), format!("Last{}", n));
        if superuser {
            user = user.as_superuser();
        }
        self.services.repos.users.insert(&user).await.unwrap();
        let token = self.services.auth_service.generate_access_token(&user).unwrap();
        (user, token)
    }

    async fn admin(&self) -> String {
        self.user(0, true).await.1
    }

    /// Participant profile id and token
    async fn participant(&self, n: usize) -> (String, String) {
        let (user, token) = self.user(n, false).await;
        let participant = Participant::new(&user.id);
        self.services.repos.participants.insert(&participant).await.unwrap();
        (participant.id, token)
    }

    /// Organizer profile id and token
    async fn organizer(&self, n: usize) -> (String, String) {
        let (user, token) = self.user(n, false).await;
        let organizer = Organizer::new(&user.id);
        self.services.repos.organizers.insert(&organizer).await.unwrap();
        (organizer.id, token)
    }

    async fn company(&self, admin: &str, name: &str) -> Value {
        let (status, body) = self
            .request(
                Method::POST,
                "/api/companies",
                Some(admin),
                Some(json!({ "name": name, "description": "Makes things" })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        body
    }

    async fn event(&self, token: &str, company_id: &str, title: &str, capacity: Option<u32>) -> Value {
        let (status, body) = self
            .request(
                Method::POST,
                "/api/events",
                Some(token),
                Some(event_body(company_id, title, capacity)),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        body
    }

    async fn register(&self, token: &str, event_id: &str) -> (StatusCode, Value) {
        self.request(
            Method::POST,
            "/api/registrations",
            Some(token),
            Some(json!({ "event": event_id })),
        )
        .await
    }
}

fn event_body(company_id: &str, title: &str, capacity: Option<u32>) -> Value {
    let start = (Utc::now() + Duration::days(14)).date_naive();
    json!({
        "title": title,
        "description": "An evening of talks",
        "event_start_date": start,
        "event_start_time": "18:30:00",
        "location": "Main hall",
        "capacity": capacity,
        "delivery_type": "OFFLINE",
        "status": "UPCOMING",
        "event_type": "MEETUP",
        "company": company_id,
    })
}

fn id_of(value: &Value) -> &str {
    value["id"].as_str().unwrap()
}

#[tokio::test]
async fn test_sign_up_login_and_refresh() {
    let app = TestApp::new().await;
    let (_, topics) = app.request(Method::GET, "/api/topics", Some(&app.admin().await), None).await;
    let technology = topics
        .as_array()
        .unwrap()
        .iter()
        .find(|t| t["name"] == json!(TopicCategory::Technology))
        .unwrap()["id"]
        .clone();

    let (status, body) = app
        .request(
            Method::POST,
            "/api/accounts/sign-up",
            None,
            Some(json!({
                "email": "jane@example.com",
                "password": "Tr1cky-Harbor",
                "confirm_password": "Tr1cky-Harbor",
                "first_name": "Jane",
                "last_name": "Doe",
                "phone": "+15550001",
                "interests": [technology],
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["message"], "User profile created successfully.");
    assert_eq!(body["user"]["role"], "PARTICIPANT");
    assert!(body["access"].is_string() && body["refresh"].is_string());

    let (status, login) = app
        .request(
            Method::POST,
            "/api/accounts/login",
            None,
            Some(json!({ "email": "jane@example.com", "password": "Tr1cky-Harbor" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(login["expires_in"], 300);

    let access = login["access"].as_str().unwrap();
    let (status, me) = app.request(Method::GET, "/api/accounts/me", Some(access), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["email"], "jane@example.com");
    assert_eq!(me["participant"]["interests"], json!([technology]));

    let (status, refreshed) = app
        .request(
            Method::POST,
            "/api/accounts/login/refresh",
            None,
            Some(json!({ "refresh": login["refresh"] })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(refreshed["access"].is_string());

    // A refresh token is not an access token
    let refresh = login["refresh"].as_str().unwrap();
    let (status, _) = app.request(Method::GET, "/api/accounts/me", Some(refresh), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .request(
            Method::POST,
            "/api/accounts/login",
            None,
            Some(json!({ "email": "jane@example.com", "password": "wrong-password" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_sign_up_validation_errors() {
    let app = TestApp::new().await;
    let (status, body) = app
        .request(
            Method::POST,
            "/api/accounts/sign-up",
            None,
            Some(json!({
                "email": "jane@example.com",
                "password": "Tr1cky-Harbor",
                "confirm_password": "Different-1",
                "phone": "+15550001",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["password"][0], "Passwords do not match.");

    app.user(1, false).await;
    let (status, body) = app
        .request(
            Method::POST,
            "/api/accounts/sign-up",
            None,
            Some(json!({
                "email": "user1@example.com",
                "password": "Tr1cky-Harbor",
                "confirm_password": "Tr1cky-Harbor",
                "phone": "+15550002",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["details"]["email"].is_array());
}

#[tokio::test]
async fn test_missing_token_is_rejected() {
    let app = TestApp::new().await;
    let (status, body) = app.request(Method::GET, "/api/events", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_staff_creates_organizer_and_credentials_are_mailed() {
    let mut app = TestApp::new().await;
    let admin = app.admin().await;
    let body = json!({
        "email": "org@example.com",
        "first_name": "Grace",
        "last_name": "Hopper",
        "phone": "+15550100",
        "bio": "Runs meetups",
    });

    let (_, participant) = app.participant(1).await;
    let (status, _) = app
        .request(Method::POST, "/api/accounts/organizers", Some(&participant), Some(body.clone()))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, created) = app
        .request(Method::POST, "/api/accounts/organizers", Some(&admin), Some(body))
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", created);
    assert_eq!(created["role"], "ORGANIZER");

    match app.notifications.recv().await.unwrap() {
        Notification::OrganizerCredentials { to, first_name, password } => {
            assert_eq!(to, "org@example.com");
            assert_eq!(first_name, "Grace");
            assert_eq!(password.len(), 14);
        }
        other => panic!("unexpected notification: {:?}", other),
    }
}

#[tokio::test]
async fn test_company_slugs_and_superuser_writes() {
    let app = TestApp::new().await;
    let admin = app.admin().await;

    let first = app.company(&admin, "Acme Events").await;
    let second = app.company(&admin, "Acme Events").await;
    assert_eq!(first["slug"], "acme-events");
    assert_eq!(second["slug"], "acme-events-1");

    let (_, organizer) = app.organizer(1).await;
    let (status, _) = app
        .request(
            Method::POST,
            "/api/companies",
            Some(&organizer),
            Some(json!({ "name": "Other" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, fetched) = app
        .request(Method::GET, "/api/companies/acme-events-1", Some(&organizer), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["id"], second["id"]);

    let doomed = app.event(&organizer, id_of(&first), "Launch", None).await;
    let kept = app.event(&organizer, id_of(&second), "Launch", None).await;
    let (_, participant) = app.participant(2).await;
    let (status, _) = app.register(&participant, id_of(&doomed)).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, kept_registration) = app.register(&participant, id_of(&kept)).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = app
        .request(Method::DELETE, "/api/companies/acme-events", Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = app
        .request(Method::GET, "/api/companies/acme-events", Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Events and registrations of the deleted company go with it
    let (_, events) = app.request(Method::GET, "/api/events", Some(&admin), None).await;
    let events = events.as_array().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["id"], kept["id"]);
    let (status, _) = app
        .request(Method::GET, &format!("/api/events/{}", id_of(&doomed)), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (_, registrations) = app.request(Method::GET, "/api/registrations", Some(&admin), None).await;
    let registrations = registrations.as_array().unwrap();
    assert_eq!(registrations.len(), 1);
    assert_eq!(registrations[0]["id"], kept_registration["id"]);
}

#[tokio::test]
async fn test_company_social_media_replaced_by_platform() {
    let app = TestApp::new().await;
    let admin = app.admin().await;
    app.company(&admin, "Acme").await;

    let (status, body) = app
        .request(
            Method::PATCH,
            "/api/companies/acme",
            Some(&admin),
            Some(json!({ "social_media": [
                { "platform": "twitter", "url": "https://twitter.com/acme" },
                { "platform": "telegram", "url": "https://t.me/acme" },
            ]})),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["social_media"].as_array().unwrap().len(), 2);

    let (_, body) = app
        .request(
            Method::PATCH,
            "/api/companies/acme",
            Some(&admin),
            Some(json!({ "social_media": [
                { "platform": "twitter", "url": "https://twitter.com/acme_new" },
                { "platform": "youtube", "url": "https://youtube.com/@acme" },
            ]})),
        )
        .await;
    let links = body["social_media"].as_array().unwrap();
    let platforms: Vec<&str> = links.iter().map(|l| l["platform"].as_str().unwrap()).collect();
    assert_eq!(platforms, ["twitter", "youtube"]);
    assert_eq!(links[0]["url"], "https://twitter.com/acme_new");

    let (status, body) = app
        .request(
            Method::PATCH,
            "/api/companies/acme",
            Some(&admin),
            Some(json!({ "social_media": [
                { "platform": "twitter", "url": "https://twitter.com/a" },
                { "platform": "twitter", "url": "https://twitter.com/b" },
            ]})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Ensure that all provided social media platforms are unique."
    );
}

#[tokio::test]
async fn test_event_slugs_and_ownership() {
    let app = TestApp::new().await;
    let admin = app.admin().await;
    let company = app.company(&admin, "Acme").await;
    let (organizer_id, organizer) = app.organizer(1).await;
    let (_, other_organizer) = app.organizer(2).await;

    let first = app.event(&organizer, id_of(&company), "Rust Night", Some(10)).await;
    let second = app.event(&organizer, id_of(&company), "Rust Night", Some(10)).await;
    let third = app.event(&organizer, id_of(&company), "Rust Night", Some(10)).await;
    assert_eq!(first["slug"], "rust-night");
    assert_eq!(second["slug"], "rust-night-1");
    assert_eq!(third["slug"], "rust-night-2");
    assert_eq!(first["organizer"], organizer_id.as_str());
    assert_eq!(first["available_capacity"], 10);

    let uri = format!("/api/events/{}", id_of(&first));
    let (status, body) = app
        .request(Method::PATCH, &uri, Some(&other_organizer), Some(json!({ "title": "Hijacked" })))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN, "{}", body);

    let (status, body) = app
        .request(Method::PATCH, &uri, Some(&organizer), Some(json!({ "capacity": null })))
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["available_capacity"], Value::Null);
    assert_eq!(body["slug"], "rust-night");

    let (_, participant) = app.participant(3).await;
    let (status, _) = app
        .request(
            Method::POST,
            "/api/events",
            Some(&participant),
            Some(event_body(id_of(&company), "Nope", None)),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.register(&participant, id_of(&first)).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, kept_registration) = app.register(&participant, id_of(&second)).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = app.request(Method::DELETE, &uri, Some(&organizer), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = app.request(Method::GET, &uri, Some(&organizer), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Only the registration for the surviving event is left
    let (_, registrations) = app.request(Method::GET, "/api/registrations", Some(&admin), None).await;
    let registrations = registrations.as_array().unwrap();
    assert_eq!(registrations.len(), 1);
    assert_eq!(registrations[0]["id"], kept_registration["id"]);
    assert_eq!(registrations[0]["event"], second["id"]);
}

#[tokio::test]
async fn test_event_list_filters() {
    let app = TestApp::new().await;
    let admin = app.admin().await;
    let acme = app.company(&admin, "Acme").await;
    let globex = app.company(&admin, "Globex").await;
    let (_, organizer) = app.organizer(1).await;

    app.event(&organizer, id_of(&acme), "One", None).await;
    app.event(&organizer, id_of(&globex), "Two", None).await;

    let (_, all) = app.request(Method::GET, "/api/events", Some(&organizer), None).await;
    assert_eq!(all.as_array().unwrap().len(), 2);

    let uri = format!("/api/events?company={}", id_of(&acme));
    let (_, filtered) = app.request(Method::GET, &uri, Some(&organizer), None).await;
    let filtered = filtered.as_array().unwrap();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0]["title"], "One");

    let (_, cancelled) = app
        .request(Method::GET, "/api/events?status=CANCELLED", Some(&organizer), None)
        .await;
    assert!(cancelled.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_full_event_puts_registrations_on_waitlist() {
    let mut app = TestApp::new().await;
    let admin = app.admin().await;
    let company = app.company(&admin, "Acme").await;
    let (_, organizer) = app.organizer(1).await;
    let event = app.event(&organizer, id_of(&company), "Small Room", Some(1)).await;
    let event_id = id_of(&event);

    let (first_id, first) = app.participant(2).await;
    let (_, second) = app.participant(3).await;

    let (status, registration) = app.register(&first, event_id).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(registration["status"], "PENDING");

    // The organizer confirms the first participant, filling the event
    let uri = format!("/api/registrations/{}", id_of(&registration));
    let (status, confirmed) = app
        .request(Method::PUT, &uri, Some(&organizer), Some(json!({ "status": "CONFIRMED" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(confirmed["status"], "CONFIRMED");
    assert_eq!(confirmed["participant"], first_id.as_str());

    let (_, event) = app
        .request(Method::GET, &format!("/api/events/{}", event_id), Some(&first), None)
        .await;
    assert_eq!(event["participants_count"], 1);
    assert_eq!(event["available_capacity"], 0);

    let (status, waitlisted) = app.register(&second, event_id).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(waitlisted["status"], "WAITLIST");

    let (status, body) = app.register(&first, event_id).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);

    // One email per successful registration, addressed to the participant
    for expected in ["PENDING", "WAITLIST"] {
        match app.notifications.recv().await.unwrap() {
            Notification::RegistrationCreated { status, event_title, organizer_name, .. } => {
                assert_eq!(status.as_str(), expected);
                assert_eq!(event_title, "Small Room");
                assert_eq!(organizer_name, "First1 Last1");
            }
            other => panic!("unexpected notification: {:?}", other),
        }
    }
}

#[tokio::test]
async fn test_concurrent_registrations_never_overbook() {
    let app = TestApp::new().await;
    let admin = app.admin().await;
    let company = app.company(&admin, "Acme").await;
    let (_, organizer) = app.organizer(1).await;
    let event = app.event(&organizer, id_of(&company), "Popular", Some(5)).await;
    let event_id = id_of(&event).to_string();

    let mut participants = Vec::new();
    for n in 10..40 {
        participants.push(app.participant(n).await.0);
    }

    let mut handles = Vec::new();
    for participant_id in participants {
        let router = app.router.clone();
        let body = json!({
            "event": event_id,
            "participant": participant_id,
            "status": "CONFIRMED",
        });
        let token = admin.clone();
        handles.push(tokio::spawn(async move {
            let request = Request::builder()
                .method(Method::POST)
                .uri("/api/registrations")
                .header(AUTHORIZATION, format!("Bearer {}", token))
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap();
            router.oneshot(request).await.unwrap().status()
        }));
    }
    for handle in handles {
        assert_eq!(handle.await.unwrap(), StatusCode::CREATED);
    }

    let (_, confirmed) = app
        .request(Method::GET, "/api/registrations?status=CONFIRMED", Some(&admin), None)
        .await;
    let (_, waitlisted) = app
        .request(Method::GET, "/api/registrations?status=WAITLIST", Some(&admin), None)
        .await;
    assert_eq!(confirmed.as_array().unwrap().len(), 5);
    assert_eq!(waitlisted.as_array().unwrap().len(), 25);
}

#[tokio::test]
async fn test_registration_visibility_and_update_permissions() {
    let app = TestApp::new().await;
    let admin = app.admin().await;
    let company = app.company(&admin, "Acme").await;
    let (_, owner) = app.organizer(1).await;
    let (_, stranger) = app.organizer(2).await;
    let owned = app.event(&owner, id_of(&company), "Owned", None).await;
    let foreign = app.event(&stranger, id_of(&company), "Foreign", None).await;

    let (_, alice) = app.participant(3).await;
    let (_, bob) = app.participant(4).await;
    let (_, registration) = app.register(&alice, id_of(&owned)).await;
    app.register(&bob, id_of(&owned)).await;
    app.register(&bob, id_of(&foreign)).await;

    let count = |body: Value| body.as_array().unwrap().len();
    assert_eq!(count(app.request(Method::GET, "/api/registrations", Some(&admin), None).await.1), 3);
    assert_eq!(count(app.request(Method::GET, "/api/registrations", Some(&alice), None).await.1), 1);
    assert_eq!(count(app.request(Method::GET, "/api/registrations", Some(&bob), None).await.1), 2);
    assert_eq!(count(app.request(Method::GET, "/api/registrations", Some(&owner), None).await.1), 2);
    assert_eq!(count(app.request(Method::GET, "/api/registrations", Some(&stranger), None).await.1), 1);

    let uri = format!("/api/registrations/{}", id_of(&registration));
    let (status, body) = app
        .request(Method::PUT, &uri, Some(&stranger), Some(json!({ "status": "REJECTED" })))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "You cannot modify registrations for this event.");

    let (status, _) = app
        .request(Method::PUT, &uri, Some(&alice), Some(json!({ "status": "CONFIRMED" })))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .request(
            Method::PUT,
            "/api/registrations/missing",
            Some(&admin),
            Some(json!({ "status": "CONFIRMED" })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, organizer_only) = app.organizer(5).await;
    let (status, _) = app.register(&organizer_only, id_of(&owned)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_event_image_upload() {
    let app = TestApp::new().await;
    let admin = app.admin().await;
    let company = app.company(&admin, "Acme").await;
    let (_, organizer) = app.organizer(1).await;
    let event = app.event(&organizer, id_of(&company), "Pictured", None).await;

    let boundary = "X-BOUNDARY";
    let payload = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"Poster.PNG\"\r\n\
         Content-Type: image/png\r\n\r\nnot-really-a-png\r\n--{b}--\r\n",
        b = boundary
    );
    let request = Request::builder()
        .method(Method::PUT)
        .uri(format!("/api/events/{}/image", id_of(&event)))
        .header(AUTHORIZATION, format!("Bearer {}", organizer))
        .header(CONTENT_TYPE, format!("multipart/form-data; boundary={}", boundary))
        .body(Body::from(payload))
        .unwrap();

    let (status, body) = app.send(request).await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    let image = body["image"].as_str().unwrap();
    assert!(image.starts_with("images/events/event-"));
    assert!(image.ends_with(".png"));
    assert!(app._media.path().join(image).exists());
}

#[tokio::test]
async fn test_malformed_bodies_and_queries_use_error_format() {
    let app = TestApp::new().await;
    let (_, participant) = app.participant(1).await;

    let (status, body) = app
        .request(Method::POST, "/api/registrations", Some(&participant), Some(json!({})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);
    assert_eq!(body["error"], "VALIDATION_ERROR");
    assert_eq!(body["details"]["event"][0], "This field is required.");

    let (status, body) = app
        .request(
            Method::POST,
            "/api/registrations",
            Some(&participant),
            Some(json!({ "event": 42 })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);
    assert_eq!(body["error"], "VALIDATION_ERROR");
    assert!(body["message"].as_str().unwrap().contains("invalid type"));

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/accounts/login")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = app.send(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);
    assert_eq!(body["error"], "VALIDATION_ERROR");

    let (status, body) = app
        .request(Method::GET, "/api/registrations?status=bogus", Some(&participant), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);
    assert_eq!(body["error"], "VALIDATION_ERROR");
    assert!(body["message"].as_str().unwrap().contains("bogus"));
}
