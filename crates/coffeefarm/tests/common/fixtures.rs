//! Canned records and images for integration tests.

#![allow(dead_code)]

use serde_json::{json, Value};

use coffeefarm::models::User;
use coffeefarm::ImagePayload;

const JPEG_HEADER: [u8; 4] = [0xFF, 0xD8, 0xFF, 0xE0];

/// A tiny payload the format sniffer accepts as JPEG.
pub fn photo(name: &str) -> ImagePayload {
    let mut bytes = JPEG_HEADER.to_vec();
    bytes.extend_from_slice(name.as_bytes());
    ImagePayload::from_bytes(bytes, Some(&format!("{}.jpg", name))).unwrap()
}

pub fn user() -> User {
    User {
        id: "u1".to_string(),
        email: "manager@farm.vn".to_string(),
        name: "Tran Thi Lan".to_string(),
        role: "manager".to_string(),
    }
}

pub fn login_reply() -> Value {
    json!({
        "access_token": "tok-123",
        "token_type": "bearer",
        "user": {
            "id": "u1",
            "email": "manager@farm.vn",
            "name": "Tran Thi Lan",
            "role": "manager"
        }
    })
}

pub fn farmer(id: &str, name: &str, enrolled: bool) -> Value {
    json!({
        "id": id,
        "farmer_code": format!("FC-{}", id),
        "full_name": name,
        "farm_id": "farm_1",
        "is_active": true,
        "face_enrolled": enrolled
    })
}

pub fn farm(id: &str, name: &str, lat: f64, lng: f64) -> Value {
    json!({
        "id": id,
        "farm_code": id.to_uppercase(),
        "farm_name": name,
        "location": { "lat": lat, "lng": lng },
        "is_active": true
    })
}

pub fn verified(farmer_id: &str, name: &str) -> Value {
    json!({
        "verified": true,
        "farmer_id": farmer_id,
        "farmer_name": name,
        "farm_id": "farm_1",
        "confidence": 0.94
    })
}

pub fn active(attendance_id: &str, farmer_id: &str) -> Value {
    json!({
        "id": attendance_id,
        "farmer_id": farmer_id,
        "farm_id": "farm_1",
        "check_in_time": "2026-10-19T07:02:00",
        "status": "working"
    })
}

pub fn receipt(attendance_id: &str) -> Value {
    json!({ "success": true, "attendance_id": attendance_id, "message": "ok" })
}

pub fn quality(detected: bool, score: f64) -> Value {
    let recommendations: Vec<&str> = if score < 0.7 {
        vec!["Move closer to the camera"]
    } else {
        Vec::new()
    };
    json!({
        "face_detected": detected,
        "quality_score": score,
        "quality_details": {
            "overall_score": score,
            "pose": { "pitch": 1.0, "yaw": -3.25, "roll": 0.5, "is_frontal": true }
        },
        "recommendations": recommendations
    })
}
