use chrono::{SecondsFormat, Utc};
use futures::stream::StreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, DateTime, Document},
    options::{FindOneAndUpdateOptions, FindOptions, ReturnDocument},
    Collection, Database, IndexModel,
};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use thiserror::Error;

const COLLECTION_NAME: &str = "reports";
const DESCRIPTION_MAX_LENGTH: usize = 500;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("{}", .0.join(", "))]
    Validation(Vec<String>),
    #[error(transparent)]
    Database(#[from] mongodb::error::Error),
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Display, EnumString, Eq, PartialEq, Serialize)]
pub enum ReportCategory {
    Fire,
    Medical,
    Police,
    #[serde(rename = "Natural Disaster")]
    #[strum(serialize = "Natural Disaster")]
    NaturalDisaster,
    Infrastructure,
    #[default]
    Other,
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Display, EnumString, Eq, PartialEq, Serialize)]
pub enum ReportStatus {
    #[default]
    Reported,
    Verified,
    #[serde(rename = "In Progress")]
    #[strum(serialize = "In Progress")]
    InProgress,
    Resolved,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Report {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,
    pub description: String,
    pub latitude: f64,
    pub longitude: f64,
    pub category: ReportCategory,
    pub status: ReportStatus,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime,
}

/// Report fields as received from a caller, before schema validation.
#[derive(Debug, Deserialize, Serialize)]
pub struct ReportDraft {
    pub description: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReportRequest {
    pub description: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub category: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ReportStatusRequest {
    pub status: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ReportListQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days: Option<i64>,
}

#[derive(Debug)]
pub struct ReportQuery {
    pub category: Option<String>,
    pub status: Option<String>,
    pub created_since: Option<chrono::DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ReportResponse {
    pub _id: String,
    pub description: String,
    pub latitude: f64,
    pub longitude: f64,
    pub category: ReportCategory,
    pub status: ReportStatus,
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

impl ReportDraft {
    fn validate(&self) -> Result<ReportCategory, ReportError> {
        let mut messages: Vec<String> = Vec::new();

        let description = self.description.trim();
        if description.is_empty() {
            messages.push("Description is required".to_string());
        } else if description.chars().count() > DESCRIPTION_MAX_LENGTH {
            messages.push(format!(
                "Description cannot be more than {DESCRIPTION_MAX_LENGTH} characters"
            ));
        }

        if !(-90.0..=90.0).contains(&self.latitude) {
            messages.push("Latitude must be between -90 and 90".to_string());
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            messages.push("Longitude must be between -180 and 180".to_string());
        }

        let category = match self.category.as_deref().map(str::trim) {
            None | Some("") => ReportCategory::default(),
            Some(raw) => match raw.parse() {
                Ok(category) => category,
                Err(_) => {
                    messages.push(format!(
                        "`{raw}` is not a valid enum value for path `category`"
                    ));
                    ReportCategory::default()
                }
            },
        };

        if messages.is_empty() {
            Ok(category)
        } else {
            Err(ReportError::Validation(messages))
        }
    }
}

impl ReportQuery {
    pub fn to_document(&self) -> Document {
        let mut filter = Document::new();

        if let Some(category) = &self.category {
            filter.insert("category", category.as_str());
        }
        if let Some(status) = &self.status {
            filter.insert("status", status.as_str());
        }
        if let Some(created_since) = self.created_since {
            filter.insert(
                "createdAt",
                doc! { "$gte": DateTime::from_chrono(created_since) },
            );
        }

        filter
    }
}

impl Report {
    pub async fn create(db: &Database, draft: ReportDraft) -> Result<Report, ReportError> {
        let category = draft.validate()?;
        let collection: Collection<Report> = db.collection::<Report>(COLLECTION_NAME);

        let report = Report {
            _id: Some(ObjectId::new()),
            description: draft.description.trim().to_string(),
            latitude: draft.latitude,
            longitude: draft.longitude,
            category,
            status: ReportStatus::default(),
            created_at: DateTime::now(),
        };

        collection.insert_one(&report, None).await?;

        Ok(report)
    }

    pub async fn find_many(db: &Database, query: &ReportQuery) -> Result<Vec<Report>, ReportError> {
        let collection: Collection<Report> = db.collection::<Report>(COLLECTION_NAME);

        let options = FindOptions::builder().sort(doc! { "createdAt": -1 }).build();
        let mut cursor = collection.find(query.to_document(), options).await?;

        let mut reports: Vec<Report> = Vec::new();
        while let Some(report) = cursor.next().await {
            reports.push(report?);
        }

        Ok(reports)
    }

    pub async fn find_by_id(db: &Database, _id: &ObjectId) -> Result<Option<Report>, ReportError> {
        let collection: Collection<Report> = db.collection::<Report>(COLLECTION_NAME);

        Ok(collection.find_one(doc! { "_id": _id }, None).await?)
    }

    pub async fn update_status(
        db: &Database,
        _id: &ObjectId,
        status: &str,
    ) -> Result<Option<Report>, ReportError> {
        let status: ReportStatus = status.parse().map_err(|_| {
            ReportError::Validation(vec![format!(
                "`{status}` is not a valid enum value for path `status`"
            )])
        })?;

        let collection: Collection<Report> = db.collection::<Report>(COLLECTION_NAME);
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        Ok(collection
            .find_one_and_update(
                doc! { "_id": _id },
                doc! { "$set": { "status": status.to_string() } },
                options,
            )
            .await?)
    }

    pub async fn ensure_indexes(db: &Database) -> Result<(), ReportError> {
        let collection: Collection<Report> = db.collection::<Report>(COLLECTION_NAME);

        // Compound index for coordinate lookups; duplicates allowed.
        let index = IndexModel::builder()
            .keys(doc! { "latitude": 1, "longitude": 1 })
            .build();
        collection.create_index(index, None).await?;

        Ok(())
    }
}

impl From<Report> for ReportResponse {
    fn from(report: Report) -> ReportResponse {
        ReportResponse {
            _id: report._id.map(|_id| _id.to_hex()).unwrap_or_default(),
            description: report.description,
            latitude: report.latitude,
            longitude: report.longitude,
            category: report.category,
            status: report.status,
            created_at: report
                .created_at
                .to_chrono()
                .to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}
