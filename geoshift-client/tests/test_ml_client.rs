//! Integration tests for MlApiClient using wiremock

mod common;

use common::{http_client, test_image, unreachable_uri};
use geoshift_client::{ApiError, MlApi, MlApiClient};
use geoshift_core::domain::{
    AdvancedCompareRequest, AnalysisDetails, AnalysisType, DamageClass, DatasetType, ModelType,
};
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn create_client(mock_server: &MockServer) -> MlApiClient {
    MlApiClient::new(http_client(), format!("{}/api", mock_server.uri()))
}

#[tokio::test]
async fn test_advanced_compare_sends_form_fields() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/advanced-compare"))
        .and(body_string_contains("name=\"beforeImage\""))
        .and(body_string_contains("name=\"afterImage\""))
        .and(body_string_contains("name=\"modelType\"\r\n\r\nsiam_unet"))
        .and(body_string_contains("name=\"datasetType\"\r\n\r\nlandsat"))
        .and(body_string_contains("name=\"analysisType\"\r\n\r\nmulti_class"))
        .and(body_string_contains("name=\"confidenceThreshold\"\r\n\r\n0.7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "model_used": "siam_unet",
            "analysis_type": "multi_class",
            "change_percentage": 12.5,
            "change_map_base64": "iVBORw0KGgo=",
            "class_predictions": { "forest": 0.6, "urban": 0.4 },
            "confidence_score": 0.83,
            "processing_time": 1.9,
            "metadata": { "device": "cpu" }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let request = AdvancedCompareRequest::new(test_image("before.png"), test_image("after.png"))
        .with_model(ModelType::SiamUnet)
        .with_dataset(DatasetType::Landsat)
        .with_analysis(AnalysisType::MultiClass)
        .with_confidence_threshold(0.7);

    let analysis = create_client(&mock_server)
        .advanced_compare(&request)
        .await
        .unwrap();

    assert_eq!(analysis.model_used, ModelType::SiamUnet);
    assert_eq!(analysis.change_percentage, 12.5);
    assert_eq!(analysis.metadata["device"], "cpu");
    match analysis.details {
        AnalysisDetails::MultiClass { class_predictions } => {
            assert_eq!(class_predictions["forest"], 0.6);
        }
        other => panic!("expected multi-class details, got {:?}", other),
    }
}

#[tokio::test]
async fn test_advanced_compare_surfaces_error_field() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/advanced-compare"))
        .respond_with(ResponseTemplate::new(503).set_body_json(serde_json::json!({
            "success": false,
            "error": "Model changeformer not loaded",
            "message": "ignored"
        })))
        .mount(&mock_server)
        .await;

    let request = AdvancedCompareRequest::new(test_image("a.png"), test_image("b.png"));
    let error = create_client(&mock_server)
        .advanced_compare(&request)
        .await
        .unwrap_err();

    assert_eq!(error.status(), Some(503));
    assert_eq!(error.to_string(), "Model changeformer not loaded");
}

#[tokio::test]
async fn test_segment_land_cover() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/segment-land-cover"))
        .and(body_string_contains("name=\"image\"; filename=\"scene.tif\""))
        .and(body_string_contains("name=\"datasetType\"\r\n\r\nsentinel2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "segmentation_map_base64": "iVBORw0KGgo=",
            "land_cover_classes": ["water", "forest", "urban"],
            "class_percentages": { "water": 10.0, "forest": 70.0, "urban": 20.0 }
        })))
        .mount(&mock_server)
        .await;

    let segmentation = create_client(&mock_server)
        .segment_land_cover(&test_image("scene.tif"), DatasetType::Sentinel2)
        .await
        .unwrap();

    assert_eq!(segmentation.land_cover_classes.len(), 3);
    assert_eq!(segmentation.dominant_class(), Some(("forest", 70.0)));
}

#[tokio::test]
async fn test_assess_damage() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/assess-damage"))
        .and(body_string_contains("name=\"preDisaster\""))
        .and(body_string_contains("name=\"postDisaster\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "damage_map_base64": "iVBORw0KGgo=",
            "building_count": 1200,
            "damage_statistics": {
                "no-damage": { "pixels": 600, "percentage": 50.0 },
                "minor-damage": { "pixels": 300, "percentage": 25.0 },
                "major-damage": { "pixels": 180, "percentage": 15.0 },
                "destroyed": { "pixels": 120, "percentage": 10.0 }
            }
        })))
        .mount(&mock_server)
        .await;

    let assessment = create_client(&mock_server)
        .assess_damage(&test_image("pre.png"), &test_image("post.png"))
        .await
        .unwrap();

    assert_eq!(assessment.building_count, 1200);
    assert_eq!(assessment.damage_statistics.get(DamageClass::Destroyed).pixels, 120);
    assert_eq!(assessment.damage_statistics.dominant_class(), DamageClass::NoDamage);
}

#[tokio::test]
async fn test_model_status_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/ml-models"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "ml_backend_available": true,
            "models": {
                "changeformer": { "loaded": true, "device": "cuda", "model_type": "ChangeFormer" },
                "siam_unet": { "loaded": false },
                "xview2": { "loaded": true, "device": "cpu" }
            }
        })))
        .mount(&mock_server)
        .await;

    let status = create_client(&mock_server).model_status().await;

    assert!(status.success);
    assert!(status.ml_backend_available);
    assert_eq!(status.loaded_models(), vec![ModelType::ChangeFormer, ModelType::XView2]);
    assert!(!status.is_loaded(ModelType::DeepLabV3Plus));
}

#[tokio::test]
async fn test_model_status_unreachable_backend() {
    let client = MlApiClient::new(http_client(), unreachable_uri().await);

    // The same address fails at the transport level for a fallible call
    let error = client.health().await.unwrap_err();
    assert!(error.is_transport(), "expected transport error, got {:?}", error);

    let status = client.model_status().await;
    assert!(!status.success);
    assert!(!status.ml_backend_available);
    assert!(status.models.is_empty());
}

#[tokio::test]
async fn test_model_status_server_error_degrades() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/ml-models"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&mock_server)
        .await;

    let status = create_client(&mock_server).model_status().await;
    assert!(!status.success);
    assert!(!status.ml_backend_available);
}

#[tokio::test]
async fn test_health() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "message": "Change detection ML backend",
            "status": "healthy",
            "available_models": ["changeformer", "xview2"],
            "timestamp": "2024-05-01T12:00:00"
        })))
        .mount(&mock_server)
        .await;

    let health = create_client(&mock_server).health().await.unwrap();
    assert!(health.is_healthy());
    assert_eq!(health.available_models, vec!["changeformer", "xview2"]);
}

#[tokio::test]
async fn test_invalid_threshold_sends_nothing() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let request = AdvancedCompareRequest::new(test_image("a.png"), test_image("b.png"))
        .with_confidence_threshold(-0.1);
    let error = create_client(&mock_server)
        .advanced_compare(&request)
        .await
        .unwrap_err();

    assert!(matches!(error, ApiError::InvalidInput(_)));
}
