//! Map markers, dashboard and crop analysis screens.

mod common;

use std::sync::Arc;

use common::{farm, photo, FakeBackend};
use serde_json::json;

use coffeefarm::models::{AnalysisUpload, GeoPoint};
use coffeefarm::screens::{
    AnalysisKind, AnalysisScreen, AnalysisView, DashboardScreen, MapScreen, MarkerColor,
    ScoreBand,
};

fn upload() -> AnalysisUpload {
    AnalysisUpload {
        farm_id: "default_farm".to_string(),
        field_id: "default_field".to_string(),
        notes: String::new(),
    }
}

#[tokio::test]
async fn markers_join_today_attendance() {
    let backend = Arc::new(FakeBackend::new());
    backend
        .reply(
            "list_farms",
            json!([
                farm("farm_1", "Cau Dat", 11.85, 108.45),
                farm("farm_2", "Buon Ma Thuot", 12.67, 108.04)
            ]),
        )
        .reply(
            "today_attendance",
            json!({ "total": 2, "attendances": [
                { "id": "a1", "farm_id": "farm_1", "status": "working" },
                { "id": "a2", "farm_id": "farm_1", "status": "completed" }
            ]}),
        );

    let from = GeoPoint::new(10.7769, 106.7009);
    let markers = MapScreen::new(backend.clone())
        .load("", Some(from))
        .await
        .unwrap();

    assert_eq!(markers.len(), 2);
    assert_eq!(markers[0].color, MarkerColor::Green);
    assert_eq!(markers[0].today_total, Some(2));
    assert_eq!(markers[1].color, MarkerColor::Red);
    assert!(markers[0].distance_text().unwrap().ends_with("km away"));
    assert_eq!(
        markers[1].maps_url().as_deref(),
        Some("https://www.google.com/maps/search/?api=1&query=12.67,108.04")
    );
}

#[tokio::test]
async fn missing_attendance_feed_leaves_markers_blue() {
    let backend = Arc::new(FakeBackend::new());
    backend
        .reply("list_farms", json!([farm("farm_1", "Cau Dat", 11.85, 108.45)]))
        .fail("today_attendance", "connection reset");

    let markers = MapScreen::new(backend.clone()).load("", None).await.unwrap();

    assert_eq!(markers[0].color, MarkerColor::Blue);
    assert_eq!(markers[0].distance_km, None);
}

#[tokio::test]
async fn farms_failure_is_an_error() {
    let backend = Arc::new(FakeBackend::new());
    backend
        .reject("list_farms", 503, "")
        .reply("today_attendance", json!({ "attendances": [] }));

    let err = MapScreen::new(backend.clone()).load("", None).await.unwrap_err();
    assert_eq!(err.to_string(), "Failed to load farms");
}

#[tokio::test]
async fn dashboard_refresh_invalidates_then_reloads() {
    let backend = Arc::new(FakeBackend::new());
    for _ in 0..2 {
        backend
            .reply(
                "dashboard_statistics",
                json!({ "farmers": { "total": 4, "with_face_enrolled": 2 },
                        "system": { "mode": "mock" } }),
            )
            .reply("today_attendance", json!({ "total": 0, "attendances": [] }));
    }

    let screen = DashboardScreen::new(backend.clone());
    let view = screen.load().await.unwrap();
    assert_eq!(view.enrollment_percent(), 50);
    assert!(view.banner().is_some());

    screen.refresh().await.unwrap();
    let invalidated = &backend.calls_to("invalidate")[0].args;
    assert_eq!(invalidated, &json!(["Statistics", "Attendance:TODAY"]));
    assert_eq!(backend.count("dashboard_statistics"), 2);
}

#[tokio::test]
async fn beans_analysis_uploads_defaults() {
    let backend = Arc::new(FakeBackend::new());
    backend.reply(
        "analyze_beans",
        json!({
            "id": "b1",
            "analysis": {
                "total_beans": 80, "good_beans": 60, "defect_beans": 20,
                "quality_score": 72.46, "defects_breakdown": { "insect_damage": 20 }
            }
        }),
    );

    let screen = AnalysisScreen::new(backend.clone(), AnalysisKind::Beans, upload(), 0.8);
    let view = screen.analyze(&photo("beans")).await.unwrap();

    assert!(matches!(view, AnalysisView::Beans(_)));
    assert_eq!(view.score_text(), "72.5%");
    assert_eq!(view.band(), ScoreBand::Fair);
    let call = &backend.calls_to("analyze_beans")[0];
    assert_eq!(call.args["farm_id"], "default_farm");
    assert_eq!(call.args["field_id"], "default_field");
}

#[tokio::test]
async fn unknown_analysis_is_inline_not_found() {
    let backend = Arc::new(FakeBackend::new());
    backend.reject("get_leaves_analysis", 404, "Analysis not found");

    let screen = AnalysisScreen::new(backend.clone(), AnalysisKind::Leaves, upload(), 0.8);
    assert_eq!(screen.get("missing").await.unwrap(), None);
}

#[tokio::test]
async fn analysis_failure_uses_kind_fallback() {
    let backend = Arc::new(FakeBackend::new());
    backend.fail("analyze_leaves", "");

    let screen = AnalysisScreen::new(backend.clone(), AnalysisKind::Leaves, upload(), 0.8);
    let err = screen.analyze(&photo("leaf")).await.unwrap_err();

    assert_eq!(err.to_string(), "Failed to analyze coffee leaves");
}
