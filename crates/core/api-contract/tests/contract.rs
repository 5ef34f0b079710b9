use api_contract::{
    CameraDto, CreateCameraRequest, LoginResponse, RefDto, UpdateCameraRequest,
    UpdateNvrRequest, UserDto,
};
use serde_json::Value;

#[test]
fn login_response_is_camel_case() {
    let response = LoginResponse {
        token: "token".to_string(),
        expires: 1_700_000_000_000,
        user: UserDto {
            id: "user-1".to_string(),
            name: "Admin".to_string(),
            email: "admin@example.com".to_string(),
            role: "admin".to_string(),
            created_at: 1,
        },
    };
    let value = serde_json::to_value(response).expect("serialize");
    assert!(value["expires"].is_u64());
    assert_eq!(value["user"]["role"], "admin");
    assert!(value["user"].get("createdAt").is_some());
    assert!(value["user"].get("created_at").is_none());
}

#[test]
fn update_distinguishes_absent_and_null_references() {
    let absent: UpdateCameraRequest = serde_json::from_str(r#"{"name":"Gate"}"#).expect("parse");
    assert_eq!(absent.name.as_deref(), Some("Gate"));
    assert_eq!(absent.nvr, None);

    let cleared: UpdateCameraRequest =
        serde_json::from_str(r#"{"nvr":null,"project":"p-1"}"#).expect("parse");
    assert_eq!(cleared.nvr, Some(None));
    assert_eq!(cleared.project, Some(Some("p-1".to_string())));

    let nvr: UpdateNvrRequest = serde_json::from_str(r#"{"project":null}"#).expect("parse");
    assert_eq!(nvr.project, Some(None));
}

#[test]
fn create_request_tolerates_missing_fields() {
    let req: CreateCameraRequest =
        serde_json::from_str(r#"{"name":"Gate","ipAddress":"10.0.0.1","fps":25}"#).expect("parse");
    assert_eq!(req.ip_address, "10.0.0.1");
    assert_eq!(req.mac_address, "");
    assert_eq!(req.fps, Some(25));
}

#[test]
fn camera_dto_uses_camel_case_references() {
    let dto = CameraDto {
        id: "cam-1".to_string(),
        name: "Gate".to_string(),
        model: "X1".to_string(),
        ip_address: "10.0.0.1".to_string(),
        location: "North".to_string(),
        mac_address: "00:14:22:01:23:45".to_string(),
        serial_number: "SN1".to_string(),
        username: None,
        firmware: None,
        resolution: None,
        fps: Some(30),
        current_nvr: Some(RefDto {
            id: "nvr-1".to_string(),
            name: "NVR 1".to_string(),
        }),
        current_project: None,
        assigned_date: Some(5),
        reassignment_history: Vec::new(),
        change_log: Vec::new(),
        created_by: None,
        updated_by: None,
        created_at: 1,
        updated_at: 2,
    };
    let value = serde_json::to_value(dto).expect("serialize");
    assert_eq!(value["currentNvr"]["name"], "NVR 1");
    assert_eq!(value["currentProject"], Value::Null);
    assert!(value.get("password").is_none());
    assert!(value.get("macAddress").is_some());
}
