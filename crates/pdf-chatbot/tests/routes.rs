use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use rust_xlsxwriter::Workbook;
use serde_json::Value;
use tower::ServiceExt;

use pdf_chatbot::config::{AppConfig, SessionConfig};
use pdf_chatbot::error::{AuthError, CompletionError};
use pdf_chatbot::providers::{IdentityProvider, LlmProvider};
use pdf_chatbot::server::{state::AppState, ChatbotServer};
use pdf_chatbot::{Prompt, UserId};

const BOUNDARY: &str = "chatbot-test-boundary";

struct StubLlm {
    reply: Result<String, CompletionError>,
    calls: AtomicUsize,
    last_prompt: std::sync::Mutex<Option<String>>,
}

impl StubLlm {
    fn new(reply: Result<String, CompletionError>) -> Arc<Self> {
        Arc::new(Self {
            reply,
            calls: AtomicUsize::new(0),
            last_prompt: std::sync::Mutex::new(None),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LlmProvider for StubLlm {
    async fn complete(&self, prompt: &Prompt) -> Result<String, CompletionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_prompt.lock().unwrap() = Some(prompt.as_str().to_string());
        self.reply.clone()
    }

    fn name(&self) -> &str {
        "stub"
    }

    fn model(&self) -> &str {
        "stub-model"
    }
}

/// Accepts password "secret"; refuses sign-up for taken@example.com
struct StubIdentity;

#[async_trait]
impl IdentityProvider for StubIdentity {
    async fn sign_in(&self, _email: &str, password: &str) -> Result<UserId, AuthError> {
        if password == "secret" {
            Ok(UserId::new("uid-1"))
        } else {
            Err(AuthError::Rejected {
                status: 400,
                message: "INVALID_PASSWORD".to_string(),
            })
        }
    }

    async fn sign_up(&self, email: &str, _password: &str) -> Result<UserId, AuthError> {
        if email == "taken@example.com" {
            Err(AuthError::Rejected {
                status: 400,
                message: "EMAIL_EXISTS".to_string(),
            })
        } else {
            Ok(UserId::new("uid-2"))
        }
    }

    fn name(&self) -> &str {
        "stub"
    }
}

fn app(llm: Arc<StubLlm>) -> Router {
    let config = AppConfig {
        session: SessionConfig {
            secret: "integration-test-secret".to_string(),
            ..SessionConfig::default()
        },
        ..AppConfig::default()
    };
    let state = AppState::with_providers(config, llm, Arc::new(StubIdentity)).unwrap();
    ChatbotServer::with_state(state).router()
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    serde_json::from_str(&body_string(response).await).unwrap()
}

fn form(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Sign in through the login form and return the `name=value` cookie pair
async fn login(app: &Router) -> String {
    let response = app
        .clone()
        .oneshot(form("/", "user_email=a%40example.com&user_pwd=secret"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
    set_cookie.split(';').next().unwrap().to_string()
}

fn multipart(file: Option<(&str, Vec<u8>)>, query: Option<&str>) -> Vec<u8> {
    let mut body = Vec::new();
    if let Some((filename, content)) = file {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"pdf_file\"; filename=\"{}\"\r\n\
                 Content-Type: application/octet-stream\r\n\r\n",
                BOUNDARY, filename
            )
            .as_bytes(),
        );
        body.extend_from_slice(&content);
        body.extend_from_slice(b"\r\n");
    }
    if let Some(query) = query {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"query\"\r\n\r\n{}\r\n",
                BOUNDARY, query
            )
            .as_bytes(),
        );
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

fn ask(cookie: Option<&str>, body: Vec<u8>) -> Request<Body> {
    let mut request = Request::builder()
        .method("POST")
        .uri("/pdf_chatbot")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        );
    if let Some(cookie) = cookie {
        request = request.header(header::COOKIE, cookie);
    }
    request.body(Body::from(body)).unwrap()
}

fn pdf(text: &str) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });
    let content = Content {
        operations: vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 12.into()]),
            Operation::new("Td", vec![72.into(), 720.into()]),
            Operation::new("Tj", vec![Object::string_literal(text)]),
            Operation::new("ET", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
    });
    let kids: Vec<Object> = vec![page_id.into()];
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => 1,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

#[tokio::test]
async fn test_health() {
    let response = app(StubLlm::new(Ok(String::new())))
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "OK");
}

#[tokio::test]
async fn test_login_pages() {
    let app = app(StubLlm::new(Ok(String::new())));

    for uri in ["/", "/index"] {
        let response = app
            .clone()
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_string(response).await.contains(r#"name="user_pwd""#));
    }
}

#[tokio::test]
async fn test_login_sets_session_and_opens_chatbot() {
    let app = app(StubLlm::new(Ok(String::new())));

    let response = app
        .clone()
        .oneshot(form("/index", "user_email=a%40example.com&user_pwd=secret"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
    assert!(cookie.starts_with("session="));
    assert!(cookie.contains("HttpOnly"));
    assert!(body_string(response).await.contains(r#"name="pdf_file""#));
}

#[tokio::test]
async fn test_bad_credentials_show_message() {
    let response = app(StubLlm::new(Ok(String::new())))
        .oneshot(form("/", "user_email=a%40example.com&user_pwd=wrong"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get(header::SET_COOKIE).is_none());
    assert!(body_string(response)
        .await
        .contains("Por favor, verifica tus credenciales"));
}

#[tokio::test]
async fn test_incomplete_login_form_shows_message() {
    let app = app(StubLlm::new(Ok(String::new())));

    for body in ["user_email=a%40example.com", ""] {
        let response = app.clone().oneshot(form("/", body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(header::SET_COOKIE).is_none());
        assert!(body_string(response)
            .await
            .contains("Por favor, verifica tus credenciales"));
    }
}

#[tokio::test]
async fn test_create_account() {
    let app = app(StubLlm::new(Ok(String::new())));

    let response = app
        .clone()
        .oneshot(form(
            "/create_account",
            "user_email=new%40example.com&user_pwd0=abc123&user_pwd1=abc123",
        ))
        .await
        .unwrap();
    let html = body_string(response).await;
    assert!(html.contains("Cuenta creada con éxito. Inicia sesión."));
    assert!(html.contains(r#"name="user_pwd""#));

    let response = app
        .clone()
        .oneshot(form(
            "/create_account",
            "user_email=taken%40example.com&user_pwd0=abc123&user_pwd1=abc123",
        ))
        .await
        .unwrap();
    assert!(body_string(response).await.contains("Error: EMAIL_EXISTS"));

    let response = app
        .oneshot(form(
            "/create_account",
            "user_email=new%40example.com&user_pwd0=abc123&user_pwd1=abc124",
        ))
        .await
        .unwrap();
    let html = body_string(response).await;
    assert!(html.contains("Las contraseñas no coinciden."));
    assert!(html.contains(r#"name="user_pwd0""#));
}

#[tokio::test]
async fn test_chatbot_requires_session() {
    let llm = StubLlm::new(Ok("unused".to_string()));
    let app = app(llm.clone());

    let response = app
        .clone()
        .oneshot(Request::get("/pdf_chatbot").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert!(response.status().is_redirection());
    assert_eq!(response.headers()[header::LOCATION], "/");

    let response = app
        .clone()
        .oneshot(ask(
            None,
            multipart(Some(("doc.pdf", pdf("text"))), Some("q")),
        ))
        .await
        .unwrap();
    assert!(response.status().is_redirection());

    let response = app
        .oneshot(ask(
            Some("session=forged.00"),
            multipart(Some(("doc.pdf", pdf("text"))), Some("q")),
        ))
        .await
        .unwrap();
    assert!(response.status().is_redirection());
    assert_eq!(llm.calls(), 0);
}

#[tokio::test]
async fn test_missing_file_or_query() {
    let llm = StubLlm::new(Ok("unused".to_string()));
    let app = app(llm.clone());
    let cookie = login(&app).await;

    let bodies = [
        multipart(None, Some("¿Qué dice?")),
        multipart(Some(("", b"ignored".to_vec())), Some("¿Qué dice?")),
        multipart(Some(("doc.pdf", pdf("text"))), None),
        multipart(Some(("doc.pdf", pdf("text"))), Some("")),
    ];
    for body in bodies {
        let response = app.clone().oneshot(ask(Some(&cookie), body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await["error"],
            "Archivo o consulta faltante."
        );
    }
    assert_eq!(llm.calls(), 0);
}

#[tokio::test]
async fn test_non_multipart_question() {
    let llm = StubLlm::new(Ok("unused".to_string()));
    let app = app(llm.clone());

    // without a session the form is never read
    let response = app
        .clone()
        .oneshot(form("/pdf_chatbot", "query=hola"))
        .await
        .unwrap();
    assert!(response.status().is_redirection());
    assert_eq!(response.headers()[header::LOCATION], "/");

    let cookie = login(&app).await;
    let mut request = form("/pdf_chatbot", "query=hola");
    request
        .headers_mut()
        .insert(header::COOKIE, cookie.parse().unwrap());
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await,
        serde_json::json!({ "error": "Archivo o consulta faltante." })
    );
    assert_eq!(llm.calls(), 0);
}

#[tokio::test]
async fn test_unsupported_type() {
    let llm = StubLlm::new(Ok("unused".to_string()));
    let app = app(llm.clone());
    let cookie = login(&app).await;

    let response = app
        .oneshot(ask(
            Some(&cookie),
            multipart(Some(("notes.docx", b"PK\x03\x04".to_vec())), Some("q")),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["error"],
        "Tipo de archivo no soportado."
    );
    assert_eq!(llm.calls(), 0);
}

#[tokio::test]
async fn test_answer_is_formatted() {
    let llm = StubLlm::new(Ok("**Total**\n### Details\nAll good".to_string()));
    let app = app(llm.clone());
    let cookie = login(&app).await;

    let response = app
        .oneshot(ask(
            Some(&cookie),
            multipart(Some(("report.pdf", pdf("Revenue grew"))), Some("Summarize")),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await["response"],
        "<strong>Total</strong><br><strong>Details</strong><br>All good"
    );

    let prompt = llm.last_prompt.lock().unwrap().clone().unwrap();
    assert!(prompt.starts_with("Basado en la siguiente información: "));
    assert!(prompt.contains("Revenue grew"));
    assert!(prompt.ends_with(". Responde a la pregunta: Summarize"));
}

#[tokio::test]
async fn test_spreadsheet_question() {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.write_string(0, 0, "Producto").unwrap();
    sheet.write_string(0, 1, "Unidades").unwrap();
    sheet.write_string(1, 0, "Café").unwrap();
    sheet.write_number(1, 1, 42.0).unwrap();
    let xlsx = workbook.save_to_buffer().unwrap();

    let llm = StubLlm::new(Ok("Se vendieron **42** unidades".to_string()));
    let app = app(llm.clone());
    let cookie = login(&app).await;

    let response = app
        .oneshot(ask(
            Some(&cookie),
            multipart(Some(("ventas.XLSX", xlsx)), Some("¿Cuántos cafés?")),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await["response"],
        "Se vendieron <strong>42</strong> unidades"
    );
    assert_eq!(
        llm.last_prompt.lock().unwrap().as_deref(),
        Some(
            "Basado en la siguiente información: Producto  Unidades\n    Café        42. \
             Responde a la pregunta: ¿Cuántos cafés?"
        )
    );
}

#[tokio::test]
async fn test_provider_error_is_bad_request() {
    let llm = StubLlm::new(Err(CompletionError::ProviderError {
        status: 500,
        body: "server error".to_string(),
    }));
    let app = app(llm.clone());
    let cookie = login(&app).await;

    let response = app
        .oneshot(ask(
            Some(&cookie),
            multipart(Some(("report.pdf", pdf("Revenue grew"))), Some("q")),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await,
        serde_json::json!({ "error": "Error 500: server error" })
    );
    assert_eq!(llm.calls(), 1);
}

#[tokio::test]
async fn test_logout_clears_session() {
    let app = app(StubLlm::new(Ok(String::new())));

    let response = app
        .oneshot(Request::get("/logout").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert!(response.status().is_redirection());
    assert_eq!(response.headers()[header::LOCATION], "/");
    let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
    assert!(cookie.starts_with("session=;"));
    assert!(cookie.contains("Max-Age=0"));
}
