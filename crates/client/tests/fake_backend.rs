use anyhow::Result;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use pretty_assertions::assert_eq;
use report_address::{AddressResolutionController, DistrictLoadState};
use report_client::{ApiClient, ApiConfig, ClientError};
use report_protocol::{AddressDetails, AddressSuggestion};
use report_submission::{ReportForm, SubmissionOutcome, ViolationImage, ViolationPatch};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
struct ReceivedPart {
    name: String,
    file_name: Option<String>,
    content_type: Option<String>,
    bytes: Vec<u8>,
}

#[derive(Default)]
struct Backend {
    reports: Mutex<Vec<Vec<ReceivedPart>>>,
    reject_reports: bool,
}

async fn accounts(Path(district): Path<String>) -> Response {
    match district.as_str() {
        "ventana" => Json(json!([
            {"service_address": "12 Oak Ln", "city": "Fountain", "state": "CO", "zip": "80817", "account_id": 1001},
            {"service_address": "9 Birch Ct", "district": "ventana", "account_id": "A-2"},
        ]))
        .into_response(),
        "saddler_ridge" => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": "boom"})),
        )
            .into_response(),
        "garbled" => (StatusCode::OK, "<html>maintenance</html>").into_response(),
        "north/east side" => Json(json!([{"service_address": "1 Slash St"}])).into_response(),
        _ => Json(json!([])).into_response(),
    }
}

async fn autocomplete(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let q = params.get("q").cloned().unwrap_or_default();
    let limit = params.get("limit").cloned().unwrap_or_default();
    if q == "wrapped" {
        Json(json!({"suggestions": [{"address": "1 Wrapped Way", "account_number": "77"}]}))
    } else {
        Json(json!([{"address": format!("{q} St"), "zip": limit}]))
    }
}

async fn details(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let address = params.get("address").cloned().unwrap_or_default();
    Json(json!({"city": format!("City of {address}"), "state": "CO", "zip": "80817"}))
}

async fn health() -> Json<Value> {
    Json(json!({"status": "ok"}))
}

async fn violations(
    State(backend): State<Arc<Backend>>,
    mut multipart: Multipart,
) -> impl IntoResponse {
    let mut parts = Vec::new();
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.map(|b| b.to_vec()).unwrap_or_default();
        parts.push(ReceivedPart {
            name,
            file_name,
            content_type,
            bytes,
        });
    }
    backend.reports.lock().unwrap().push(parts);

    if backend.reject_reports {
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({"error": "Unknown district"})),
        )
    } else {
        (StatusCode::CREATED, Json(json!({"report_id": "R-100"})))
    }
}

async fn spawn_backend(backend: Arc<Backend>) -> Result<ApiClient> {
    let app = Router::new()
        .route("/api/district/:district/accounts", get(accounts))
        .route("/api/address/autocomplete", get(autocomplete))
        .route("/api/address/details", get(details))
        .route("/api/health", get(health))
        .route("/api/violations", post(violations))
        .with_state(backend);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    Ok(ApiClient::new(&ApiConfig::with_base_url(format!(
        "http://{addr}"
    )))?)
}

async fn wait_for_load(controller: &AddressResolutionController) {
    for _ in 0..200 {
        if controller.snapshot().district_load_state != DistrictLoadState::Loading {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

#[tokio::test]
async fn district_accounts_accept_string_or_numeric_ids() -> Result<()> {
    let client = spawn_backend(Arc::default()).await?;

    let accounts = client.district_accounts("ventana").await?;

    assert_eq!(accounts.len(), 2);
    assert_eq!(accounts[0].service_address, "12 Oak Ln");
    assert_eq!(accounts[0].zip.as_deref(), Some("80817"));
    assert_eq!(accounts[0].account_id.as_deref(), Some("1001"));
    assert_eq!(accounts[1].account_id.as_deref(), Some("A-2"));
    assert_eq!(accounts[1].city, None);
    Ok(())
}

#[tokio::test]
async fn district_accounts_failure_is_a_status_error() -> Result<()> {
    let client = spawn_backend(Arc::default()).await?;

    let err = client.district_accounts("saddler_ridge").await.unwrap_err();

    assert!(matches!(err, ClientError::Status { status: 500, .. }));
    Ok(())
}

#[tokio::test]
async fn district_accounts_reject_non_json_body() -> Result<()> {
    let client = spawn_backend(Arc::default()).await?;

    let err = client.district_accounts("garbled").await.unwrap_err();

    assert!(matches!(err, ClientError::Json(_)));
    Ok(())
}

#[tokio::test]
async fn district_key_with_reserved_characters_reaches_the_route() -> Result<()> {
    let client = spawn_backend(Arc::default()).await?;

    let accounts = client.district_accounts("north/east side").await?;

    assert_eq!(accounts, vec![AddressSuggestion::new("1 Slash St")]);
    Ok(())
}

#[tokio::test]
async fn legacy_autocomplete_accepts_both_shapes() -> Result<()> {
    let client = spawn_backend(Arc::default()).await?;

    let bare = client.autocomplete("Elm", 5).await?;
    assert_eq!(bare.len(), 1);
    assert_eq!(bare[0].service_address, "Elm St");
    assert_eq!(bare[0].zip.as_deref(), Some("5"));

    let wrapped = client.autocomplete("wrapped", 5).await?;
    assert_eq!(
        wrapped,
        vec![AddressSuggestion {
            account_id: Some("77".to_string()),
            ..AddressSuggestion::new("1 Wrapped Way")
        }]
    );
    Ok(())
}

#[tokio::test]
async fn address_details_and_health() -> Result<()> {
    let client = spawn_backend(Arc::default()).await?;

    let details = client.address_details("12 Oak Ln").await?;
    assert_eq!(
        details,
        AddressDetails {
            city: "City of 12 Oak Ln".to_string(),
            state: "CO".to_string(),
            zip: "80817".to_string(),
        }
    );

    assert!(client.health().await?.is_ok());
    Ok(())
}

#[tokio::test]
async fn controller_loads_accounts_through_client() -> Result<()> {
    let client = Arc::new(spawn_backend(Arc::default()).await?);
    let controller = AddressResolutionController::with_defaults(client);

    controller.set_district("ventana");
    wait_for_load(&controller).await;
    assert_eq!(controller.snapshot().district_account_count, 2);

    controller.set_district("saddler_ridge");
    wait_for_load(&controller).await;
    let snapshot = controller.snapshot();
    assert_eq!(snapshot.district_account_count, 0);
    assert!(matches!(
        snapshot.district_load_state,
        DistrictLoadState::Error(_)
    ));
    Ok(())
}

#[tokio::test]
async fn report_is_posted_as_multipart() -> Result<()> {
    let backend = Arc::new(Backend::default());
    let client = Arc::new(spawn_backend(Arc::clone(&backend)).await?);
    let form = ReportForm::new(
        AddressResolutionController::with_defaults(client.clone()),
        client,
    );

    form.address().set_district("ventana");
    wait_for_load(form.address()).await;
    form.address().set_address_line1("12 Oak Ln");
    form.update_violation(1, ViolationPatch::default().kind("fences").notes("leaning"));
    let second = form.add_violation();
    form.update_violation(
        second,
        ViolationPatch::default()
            .kind("weeds")
            .image(ViolationImage::new("weeds.png", "image/png", vec![1u8, 2, 3])),
    );

    let outcome = form.submit().await;

    assert_eq!(
        outcome,
        Some(SubmissionOutcome::Success {
            report_id: "R-100".to_string()
        })
    );

    let reports = backend.reports.lock().unwrap().clone();
    assert_eq!(reports.len(), 1);
    let parts = &reports[0];
    assert_eq!(parts.len(), 2);

    assert_eq!(parts[0].name, "data");
    let data: Value = serde_json::from_slice(&parts[0].bytes)?;
    assert_eq!(data["address"]["line1"], "12 Oak Ln");
    assert_eq!(data["address"]["zip"], "80817");
    assert_eq!(data["violations"][0]["type"], "fences");
    assert_eq!(data["violations"][0]["notes"], "leaning");
    assert_eq!(data["violations"][1]["id"], 2);

    assert_eq!(
        parts[1],
        ReceivedPart {
            name: "violation_1_image".to_string(),
            file_name: Some("weeds.png".to_string()),
            content_type: Some("image/png".to_string()),
            bytes: vec![1, 2, 3],
        }
    );
    Ok(())
}

#[tokio::test]
async fn rejected_report_surfaces_backend_error() -> Result<()> {
    let backend = Arc::new(Backend {
        reject_reports: true,
        ..Backend::default()
    });
    let client = Arc::new(spawn_backend(backend).await?);
    let form = ReportForm::new(
        AddressResolutionController::with_defaults(client.clone()),
        client,
    );

    form.address().set_district("ventana");
    wait_for_load(form.address()).await;
    form.address().set_address_line1("12 Oak Ln");
    form.update_violation(1, ViolationPatch::default().kind("fences"));

    let outcome = form.submit().await;

    assert_eq!(
        outcome,
        Some(SubmissionOutcome::TransportFailure {
            message: "Unknown district".to_string()
        })
    );
    assert_eq!(form.address().address().line1, "12 Oak Ln");
    Ok(())
}

#[tokio::test]
async fn unreachable_backend_is_a_transport_failure() -> Result<()> {
    let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
    let addr = listener.local_addr()?;
    drop(listener);

    let client = Arc::new(ApiClient::new(&ApiConfig::with_base_url(format!(
        "http://{addr}"
    )))?);
    let form = ReportForm::new(
        AddressResolutionController::with_defaults(client.clone()),
        client,
    );
    form.address().set_district("ventana");
    form.address().set_address_line1("12 Oak Ln");
    form.update_violation(1, ViolationPatch::default().kind("fences"));

    let outcome = form.submit().await;

    assert!(matches!(
        outcome,
        Some(SubmissionOutcome::TransportFailure { .. })
    ));
    Ok(())
}
