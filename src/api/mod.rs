use axum::{
    Router,
    extract::{Json, Query},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::core::{
    ChartPoint, DEFAULT_FUTURE_VALUE, DEFAULT_PV_RATE, DEFAULT_PV_YEARS, DrawdownProjection,
    OptionComparison, PensionProjection, PlannerError, RetirementInputs, compare_options,
    discount_lump_sum, format_grouped, present_value,
};

const INDEX_HTML: &str = include_str!("../../web/index.html");
const RETIREMENT_HTML: &str = include_str!("../../web/retirement.html");
const PV_HTML: &str = include_str!("../../web/pv.html");
const STYLES_CSS: &str = include_str!("../../web/styles.css");
const APP_JS: &str = include_str!("../../web/app.js");

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ComparePayload {
    payment_joint: Option<f64>,
    payment_single: Option<f64>,
    years_joint: Option<i32>,
    years_single: Option<i32>,
    starting_expense: Option<f64>,
    principal: Option<f64>,
    discount_rate: Option<f64>,
    inflation_rate: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct PresentValuePayload {
    future_value: Option<f64>,
    rate: Option<f64>,
    years: Option<i32>,
    cashflows: Option<Vec<f64>>,
}

#[derive(Debug, Clone, PartialEq)]
struct PresentValueRequest {
    future_value: f64,
    rate: f64,
    years: i32,
    cashflows: Option<Vec<f64>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareResponse {
    pub total_years: i32,
    pub pension_present_value: f64,
    pub pension_present_value_display: String,
    pub drawdown_present_value: f64,
    pub drawdown_present_value_display: String,
    pub drawdown_withdrawals_present_value: f64,
    pub drawdown_terminal_present_value: f64,
    pub pension: PensionProjection,
    pub drawdown: DrawdownProjection,
    pub chart: Vec<ChartPoint>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PresentValueResponse {
    future_value: f64,
    rate: f64,
    years: i32,
    present_value: f64,
    present_value_display: String,
    series_present_value: Option<f64>,
    series_present_value_display: Option<String>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "retirement planner HTTP API listening");
    info!("local access: http://127.0.0.1:{port}/");

    axum::serve(listener, router()).await
}

fn router() -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/index.html", get(index_handler))
        .route("/retirement.html", get(retirement_handler))
        .route("/pv.html", get(pv_handler))
        .route("/styles.css", get(styles_handler))
        .route("/app.js", get(app_js_handler))
        .route(
            "/api/compare",
            get(compare_get_handler).post(compare_post_handler),
        )
        .route(
            "/api/present-value",
            get(present_value_get_handler).post(present_value_post_handler),
        )
        .fallback(not_found_handler)
        .layer(TraceLayer::new_for_http())
}

async fn index_handler() -> impl IntoResponse {
    with_cache_control(Html(INDEX_HTML))
}

async fn retirement_handler() -> impl IntoResponse {
    with_cache_control(Html(RETIREMENT_HTML))
}

async fn pv_handler() -> impl IntoResponse {
    with_cache_control(Html(PV_HTML))
}

async fn styles_handler() -> impl IntoResponse {
    with_cache_control((
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        STYLES_CSS,
    ))
}

async fn app_js_handler() -> impl IntoResponse {
    with_cache_control((
        [(
            header::CONTENT_TYPE,
            "application/javascript; charset=utf-8",
        )],
        APP_JS,
    ))
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn compare_get_handler(Query(payload): Query<ComparePayload>) -> Response {
    compare_handler_impl(payload)
}

async fn compare_post_handler(Json(payload): Json<ComparePayload>) -> Response {
    compare_handler_impl(payload)
}

async fn present_value_get_handler(Query(payload): Query<PresentValuePayload>) -> Response {
    present_value_handler_impl(payload)
}

async fn present_value_post_handler(Json(payload): Json<PresentValuePayload>) -> Response {
    present_value_handler_impl(payload)
}

fn compare_handler_impl(payload: ComparePayload) -> Response {
    let inputs = inputs_from_payload(payload);
    match compare_options(&inputs) {
        Ok(comparison) => json_response(StatusCode::OK, build_compare_response(&comparison)),
        Err(err) => planner_error_response(err),
    }
}

fn present_value_handler_impl(payload: PresentValuePayload) -> Response {
    let request = present_value_request_from_payload(payload);
    match build_present_value_response(&request) {
        Ok(response) => json_response(StatusCode::OK, response),
        Err(err) => planner_error_response(err),
    }
}

fn inputs_from_payload(payload: ComparePayload) -> RetirementInputs {
    let defaults = RetirementInputs::default();
    RetirementInputs {
        payment_joint: payload.payment_joint.unwrap_or(defaults.payment_joint),
        payment_single: payload.payment_single.unwrap_or(defaults.payment_single),
        years_joint: payload.years_joint.unwrap_or(defaults.years_joint),
        years_single: payload.years_single.unwrap_or(defaults.years_single),
        starting_expense: payload.starting_expense.unwrap_or(defaults.starting_expense),
        principal: payload.principal.unwrap_or(defaults.principal),
        discount_rate: payload.discount_rate.unwrap_or(defaults.discount_rate),
        inflation_rate: payload.inflation_rate.unwrap_or(defaults.inflation_rate),
    }
}

fn present_value_request_from_payload(payload: PresentValuePayload) -> PresentValueRequest {
    PresentValueRequest {
        future_value: payload.future_value.unwrap_or(DEFAULT_FUTURE_VALUE),
        rate: payload.rate.unwrap_or(DEFAULT_PV_RATE),
        years: payload.years.unwrap_or(DEFAULT_PV_YEARS),
        cashflows: payload.cashflows,
    }
}

pub fn build_compare_response(comparison: &OptionComparison) -> CompareResponse {
    CompareResponse {
        total_years: comparison.total_years,
        pension_present_value: comparison.pension_present_value,
        pension_present_value_display: format_grouped(comparison.pension_present_value, 0),
        drawdown_present_value: comparison.drawdown_present_value,
        drawdown_present_value_display: format_grouped(comparison.drawdown_present_value, 0),
        drawdown_withdrawals_present_value: comparison.drawdown_withdrawals_present_value,
        drawdown_terminal_present_value: comparison.drawdown_terminal_present_value,
        pension: comparison.pension.clone(),
        drawdown: comparison.drawdown.clone(),
        chart: comparison.chart.clone(),
    }
}

fn build_present_value_response(
    request: &PresentValueRequest,
) -> Result<PresentValueResponse, PlannerError> {
    let pv = discount_lump_sum(request.future_value, request.rate, request.years)?;
    let series_pv = request
        .cashflows
        .as_deref()
        .map(|cashflows| present_value(cashflows, request.rate))
        .transpose()?;

    Ok(PresentValueResponse {
        future_value: request.future_value,
        rate: request.rate,
        years: request.years,
        present_value: pv,
        present_value_display: format_grouped(pv, 2),
        series_present_value: series_pv,
        series_present_value_display: series_pv.map(|value| format_grouped(value, 2)),
    })
}

fn planner_error_response(err: PlannerError) -> Response {
    warn!(error = %err, "calculation rejected");
    error_response(StatusCode::UNPROCESSABLE_ENTITY, &err.to_string())
}

fn with_cache_control<R: IntoResponse>(response: R) -> Response {
    let mut response = response.into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        "no-store".parse().expect("valid header"),
    );
    response
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    with_cache_control((status, Json(body)))
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    const EPS: f64 = 1e-6;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn compare_payload_from_json(json: &str) -> ComparePayload {
        serde_json::from_str(json).expect("valid compare payload")
    }

    async fn response_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("readable body");
        serde_json::from_slice(&bytes).expect("json body")
    }

    #[test]
    fn compare_payload_defaults_match_dashboard() {
        let inputs = inputs_from_payload(compare_payload_from_json("{}"));
        assert_eq!(inputs, RetirementInputs::default());
        assert_eq!(inputs.total_years(), 15);
    }

    #[test]
    fn compare_payload_parses_web_keys() {
        let payload = compare_payload_from_json(
            r#"{
                "paymentJoint": 500000,
                "paymentSingle": 250000,
                "yearsJoint": 10,
                "yearsSingle": 5,
                "startingExpense": 300000,
                "principal": 5000000,
                "discountRate": 0.06,
                "inflationRate": 0.04
            }"#,
        );
        let inputs = inputs_from_payload(payload);
        assert_approx(inputs.payment_joint, 500_000.0);
        assert_approx(inputs.payment_single, 250_000.0);
        assert_eq!(inputs.years_joint, 10);
        assert_eq!(inputs.years_single, 5);
        assert_approx(inputs.starting_expense, 300_000.0);
        assert_approx(inputs.principal, 5_000_000.0);
        assert_approx(inputs.discount_rate, 0.06);
        assert_approx(inputs.inflation_rate, 0.04);
    }

    #[test]
    fn present_value_payload_defaults_match_calculator() {
        let payload: PresentValuePayload = serde_json::from_str("{}").expect("valid payload");
        let request = present_value_request_from_payload(payload);
        assert_eq!(
            request,
            PresentValueRequest {
                future_value: 1_000_000.0,
                rate: 0.03,
                years: 10,
                cashflows: None,
            }
        );
    }

    #[test]
    fn compare_response_serialization_contains_expected_fields() {
        let comparison = compare_options(&RetirementInputs::default()).expect("valid inputs");
        let response = build_compare_response(&comparison);
        let json = serde_json::to_string(&response).expect("response should serialize");
        assert!(json.contains("\"totalYears\""));
        assert!(json.contains("\"pensionPresentValue\""));
        assert!(json.contains("\"pensionPresentValueDisplay\""));
        assert!(json.contains("\"drawdownPresentValue\""));
        assert!(json.contains("\"netCashflows\""));
        assert!(json.contains("\"savingsBalance\""));
        assert!(json.contains("\"withdrawals\""));
        assert!(json.contains("\"balanceHistory\""));
        assert!(json.contains("\"savingsLakhs\""));
        assert!(json.contains("\"balanceLakhs\""));
    }

    #[test]
    fn present_value_response_includes_series_when_given() {
        let request = PresentValueRequest {
            future_value: 110.0,
            rate: 0.1,
            years: 1,
            cashflows: Some(vec![110.0, 121.0]),
        };
        let response = build_present_value_response(&request).expect("valid rate");
        assert_approx(response.present_value, 100.0);
        assert_eq!(response.present_value_display, "100.00");
        assert_approx(response.series_present_value.expect("series pv"), 200.0);
        assert_eq!(response.series_present_value_display.as_deref(), Some("200.00"));
    }

    #[tokio::test]
    async fn compare_handler_returns_comparison_json() {
        let response = compare_handler_impl(compare_payload_from_json(
            r#"{"yearsJoint": 1, "yearsSingle": 0, "discountRate": 0.1, "inflationRate": 0.0,
                "startingExpense": 100, "paymentJoint": 150, "principal": 1000}"#,
        ));
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get(header::CACHE_CONTROL)
                .and_then(|v| v.to_str().ok()),
            Some("no-store")
        );

        let body = response_json(response).await;
        assert_eq!(body["totalYears"], 1);
        assert_approx(body["pension"]["netCashflows"][0].as_f64().expect("f64"), 50.0);
        assert_approx(body["pension"]["savingsBalance"][0].as_f64().expect("f64"), 55.0);
        assert_approx(body["drawdown"]["withdrawals"][0].as_f64().expect("f64"), 100.0);
        assert_approx(body["drawdown"]["balanceHistory"][0].as_f64().expect("f64"), 990.0);
        // 50 / 1.1 for the pension; 100 / 1.1 + 990 / 1.1 for the drawdown.
        assert_approx(
            body["pensionPresentValue"].as_f64().expect("f64"),
            50.0 / 1.1,
        );
        assert_approx(
            body["drawdownPresentValue"].as_f64().expect("f64"),
            1_090.0 / 1.1,
        );
        assert_eq!(body["drawdownPresentValueDisplay"], "991");
    }

    #[tokio::test]
    async fn compare_handler_maps_domain_error_to_422() {
        let response = compare_handler_impl(compare_payload_from_json(r#"{"discountRate": -1}"#));
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = response_json(response).await;
        assert!(
            body["error"]
                .as_str()
                .expect("error message")
                .contains("domain error")
        );
    }

    #[tokio::test]
    async fn present_value_handler_returns_defaults() {
        let response = present_value_handler_impl(PresentValuePayload::default());
        assert_eq!(response.status(), StatusCode::OK);
        let body = response_json(response).await;
        assert_eq!(body["presentValueDisplay"], "744,093.91");
        assert!(body["seriesPresentValue"].is_null());
    }

    #[tokio::test]
    async fn not_found_handler_returns_json_error() {
        let response = not_found_handler().await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = response_json(response).await;
        assert_eq!(body["error"], "Not found");
    }

    #[test]
    fn embedded_pages_link_to_each_other() {
        assert!(INDEX_HTML.contains("retirement.html"));
        assert!(INDEX_HTML.contains("pv.html"));
        assert!(RETIREMENT_HTML.contains("app.js"));
        assert!(PV_HTML.contains("app.js"));
        assert!(APP_JS.contains("/api/compare"));
        assert!(APP_JS.contains("/api/present-value"));
    }

    #[test]
    fn app_js_surfaces_plain_text_rejections() {
        // Extractor rejections are plain text, so the page must not rely on a JSON body.
        assert!(APP_JS.contains("await response.text()"));
        assert!(APP_JS.contains("JSON.parse(text)"));
        assert!(APP_JS.contains("error: text.trim() || response.statusText"));
    }
}
