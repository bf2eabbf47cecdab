use actix_web::{get, post, put, web, HttpResponse};
use chrono::{Duration, Utc};
use mongodb::{bson::oid::ObjectId, Database};

use crate::{
    models::report::{
        Report, ReportDraft, ReportError, ReportListQuery, ReportQuery, ReportRequest,
        ReportResponse, ReportStatusRequest,
    },
    routes::ApiEnvelope,
};

/// GET /api/reports
#[get("/api/reports")]
pub async fn get_reports(
    db: web::Data<Database>,
    query: web::Query<ReportListQuery>,
) -> HttpResponse {
    let ReportListQuery {
        category,
        status,
        days,
    } = query.into_inner();

    let query = ReportQuery {
        category,
        status,
        created_since: days.map(|days| Utc::now() - Duration::days(days)),
    };

    match Report::find_many(&db, &query).await {
        Ok(reports) => {
            let reports: Vec<ReportResponse> =
                reports.into_iter().map(ReportResponse::from).collect();
            HttpResponse::Ok().json(ApiEnvelope::list(reports))
        }
        Err(error) => {
            log::error!("Error fetching reports: {error}");
            HttpResponse::InternalServerError().json(ApiEnvelope::server_error(error))
        }
    }
}

/// POST /api/report
#[post("/api/report")]
pub async fn create_report(
    db: web::Data<Database>,
    payload: web::Json<ReportRequest>,
) -> HttpResponse {
    let payload = payload.into_inner();

    let description = payload
        .description
        .as_deref()
        .map(str::trim)
        .filter(|description| !description.is_empty());

    // Checked here before the store sees the draft; the store validates again.
    let (description, latitude, longitude) =
        match (description, payload.latitude, payload.longitude) {
            (Some(description), Some(latitude), Some(longitude)) => {
                (description.to_string(), latitude, longitude)
            }
            _ => {
                return HttpResponse::BadRequest().json(ApiEnvelope::failure(
                    "Please provide description, latitude, and longitude",
                ))
            }
        };

    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        return HttpResponse::BadRequest().json(ApiEnvelope::failure("Invalid coordinates"));
    }

    let draft = ReportDraft {
        description,
        latitude,
        longitude,
        category: payload.category,
    };

    match Report::create(&db, draft).await {
        Ok(report) => HttpResponse::Created().json(ApiEnvelope::with_message(
            "Report created",
            ReportResponse::from(report),
        )),
        Err(ReportError::Validation(messages)) => {
            HttpResponse::BadRequest().json(ApiEnvelope::failure(messages.join(", ")))
        }
        Err(error) => {
            log::error!("Error creating report: {error}");
            HttpResponse::InternalServerError().json(ApiEnvelope::server_error(error))
        }
    }
}

/// GET /api/report/{id}
#[get("/api/report/{report_id}")]
pub async fn get_report(db: web::Data<Database>, report_id: web::Path<String>) -> HttpResponse {
    let report_id = match report_id.parse::<ObjectId>() {
        Ok(report_id) => report_id,
        Err(_) => return HttpResponse::NotFound().json(ApiEnvelope::failure("Report not found")),
    };

    match Report::find_by_id(&db, &report_id).await {
        Ok(Some(report)) => HttpResponse::Ok().json(ApiEnvelope::data(ReportResponse::from(report))),
        Ok(None) => HttpResponse::NotFound().json(ApiEnvelope::failure("Report not found")),
        Err(error) => {
            log::error!("Error fetching report: {error}");
            HttpResponse::InternalServerError().json(ApiEnvelope::server_error(error))
        }
    }
}

/// PUT /api/report/{id}
#[put("/api/report/{report_id}")]
pub async fn update_report_status(
    db: web::Data<Database>,
    report_id: web::Path<String>,
    payload: web::Json<ReportStatusRequest>,
) -> HttpResponse {
    let status = match payload.into_inner().status {
        Some(status) => status,
        None => {
            return HttpResponse::BadRequest().json(ApiEnvelope::failure("Please provide status"))
        }
    };

    let report_id = match report_id.parse::<ObjectId>() {
        Ok(report_id) => report_id,
        Err(_) => return HttpResponse::NotFound().json(ApiEnvelope::failure("Report not found")),
    };

    match Report::update_status(&db, &report_id, &status).await {
        Ok(Some(report)) => HttpResponse::Ok().json(ApiEnvelope::with_message(
            "Report status updated",
            ReportResponse::from(report),
        )),
        Ok(None) => HttpResponse::NotFound().json(ApiEnvelope::failure("Report not found")),
        Err(ReportError::Validation(messages)) => {
            HttpResponse::BadRequest().json(ApiEnvelope::failure(messages.join(", ")))
        }
        Err(error) => {
            log::error!("Error updating report: {error}");
            HttpResponse::InternalServerError().json(ApiEnvelope::server_error(error))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test, web, App};
    use mongodb::Client;
    use serde_json::json;

    // Parses connection options only; the handlers under test return before
    // any store I/O happens.
    async fn test_db() -> Database {
        Client::with_uri_str("mongodb://localhost:27017")
            .await
            .unwrap()
            .database("pulsepoint_test")
    }

    #[actix_web::test]
    async fn create_rejects_missing_required_fields() {
        let db = web::Data::new(test_db().await);
        let app = test::init_service(App::new().app_data(db).service(create_report)).await;

        let request = test::TestRequest::post()
            .uri("/api/report")
            .set_json(json!({ "description": "Flood on Main St" }))
            .to_request();
        let response = test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = test::read_body_json(response).await;
        assert_eq!(body["success"], json!(false));
        assert_eq!(
            body["message"],
            json!("Please provide description, latitude, and longitude")
        );
    }

    #[actix_web::test]
    async fn create_rejects_a_blank_description() {
        let db = web::Data::new(test_db().await);
        let app = test::init_service(App::new().app_data(db).service(create_report)).await;

        let request = test::TestRequest::post()
            .uri("/api/report")
            .set_json(json!({ "description": "   ", "latitude": 40.7, "longitude": -74.0 }))
            .to_request();
        let response = test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = test::read_body_json(response).await;
        assert_eq!(
            body["message"],
            json!("Please provide description, latitude, and longitude")
        );
    }

    #[actix_web::test]
    async fn create_rejects_out_of_range_coordinates() {
        let db = web::Data::new(test_db().await);
        let app = test::init_service(App::new().app_data(db).service(create_report)).await;

        let request = test::TestRequest::post()
            .uri("/api/report")
            .set_json(json!({ "description": "Flood on Main St", "latitude": 90.5, "longitude": -74.0 }))
            .to_request();
        let response = test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = test::read_body_json(response).await;
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["message"], json!("Invalid coordinates"));
    }

    #[actix_web::test]
    async fn update_requires_a_status() {
        let db = web::Data::new(test_db().await);
        let app = test::init_service(App::new().app_data(db).service(update_report_status)).await;

        let request = test::TestRequest::put()
            .uri("/api/report/645d7f2c8e1f4aa6c0e4b2a1")
            .set_json(json!({}))
            .to_request();
        let response = test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = test::read_body_json(response).await;
        assert_eq!(body["message"], json!("Please provide status"));
    }

    #[actix_web::test]
    async fn update_treats_an_unparseable_id_as_not_found() {
        let db = web::Data::new(test_db().await);
        let app = test::init_service(App::new().app_data(db).service(update_report_status)).await;

        let request = test::TestRequest::put()
            .uri("/api/report/not-an-id")
            .set_json(json!({ "status": "Resolved" }))
            .to_request();
        let response = test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body: serde_json::Value = test::read_body_json(response).await;
        assert_eq!(body["message"], json!("Report not found"));
    }

    #[actix_web::test]
    async fn get_treats_an_unparseable_id_as_not_found() {
        let db = web::Data::new(test_db().await);
        let app = test::init_service(App::new().app_data(db).service(get_report)).await;

        let request = test::TestRequest::get()
            .uri("/api/report/not-an-id")
            .to_request();
        let response = test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body: serde_json::Value = test::read_body_json(response).await;
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["message"], json!("Report not found"));
    }
}
