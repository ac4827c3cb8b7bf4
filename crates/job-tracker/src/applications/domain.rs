use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, SubsecRound};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A tracked job application as stored and returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobApplication {
    /// Store-assigned identifier, immutable once issued.
    pub id: i32,
    #[schema(example = "2024-01-01T00:00:00")]
    pub applied_date: NaiveDateTime,
    #[schema(example = "Acme")]
    pub company: String,
    #[schema(example = "Engineer")]
    pub role: String,
    #[schema(example = "LinkedIn")]
    pub applied_from_platform: String,
    #[schema(example = "Applied")]
    pub status: String,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub payment: Option<Decimal>,
    #[serde(default)]
    pub contact: Option<String>,
    #[serde(default)]
    pub observation: Option<String>,
}

impl JobApplication {
    pub fn from_parts(id: i32, details: NewJobApplication) -> Self {
        let NewJobApplication {
            applied_date,
            company,
            role,
            applied_from_platform,
            status,
            payment,
            contact,
            observation,
        } = details;

        Self {
            id,
            applied_date,
            company,
            role,
            applied_from_platform,
            status,
            payment,
            contact,
            observation,
        }
    }
}

/// Validated record content that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewJobApplication {
    pub applied_date: NaiveDateTime,
    pub company: String,
    pub role: String,
    pub applied_from_platform: String,
    pub status: String,
    pub payment: Option<Decimal>,
    pub contact: Option<String>,
    pub observation: Option<String>,
}

/// Request body for create and update.
///
/// Every field is optional so that absent required values surface as
/// validation failures instead of body rejections. Keys are accepted in
/// camelCase or PascalCase.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobApplicationRequest {
    /// Ignored on create; must match the path id on update.
    #[serde(default, alias = "Id", skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,
    /// `YYYY-MM-DD`, `YYYY-MM-DDTHH:MM:SS` or RFC 3339.
    #[serde(
        default,
        alias = "AppliedDate",
        deserialize_with = "deserialize_optional_applied_date"
    )]
    #[schema(value_type = Option<String>, example = "2024-01-01")]
    pub applied_date: Option<NaiveDateTime>,
    #[serde(default, alias = "Company")]
    pub company: Option<String>,
    #[serde(default, alias = "Role")]
    pub role: Option<String>,
    #[serde(default, alias = "AppliedFromPlatform")]
    pub applied_from_platform: Option<String>,
    #[serde(default, alias = "Status")]
    pub status: Option<String>,
    #[serde(
        default,
        alias = "Payment",
        with = "rust_decimal::serde::float_option"
    )]
    pub payment: Option<Decimal>,
    #[serde(default, alias = "Contact")]
    pub contact: Option<String>,
    #[serde(default, alias = "Observation")]
    pub observation: Option<String>,
}

impl From<JobApplication> for JobApplicationRequest {
    fn from(application: JobApplication) -> Self {
        Self {
            id: Some(application.id),
            applied_date: Some(application.applied_date),
            company: Some(application.company),
            role: Some(application.role),
            applied_from_platform: Some(application.applied_from_platform),
            status: Some(application.status),
            payment: application.payment,
            contact: application.contact,
            observation: application.observation,
        }
    }
}

/// Optional case-insensitive substring filters combined with AND.
///
/// Blank values are dropped on construction, so an empty filter matches
/// every record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilter {
    company: Option<String>,
    role: Option<String>,
}

impl SearchFilter {
    pub fn new(company: Option<String>, role: Option<String>) -> Self {
        Self {
            company: company.filter(|value| !value.trim().is_empty()),
            role: role.filter(|value| !value.trim().is_empty()),
        }
    }

    pub fn company(&self) -> Option<&str> {
        self.company.as_deref()
    }

    pub fn role(&self) -> Option<&str> {
        self.role.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.company.is_none() && self.role.is_none()
    }

    pub fn matches(&self, application: &JobApplication) -> bool {
        fn contains(haystack: &str, needle: Option<&str>) -> bool {
            needle.map_or(true, |needle| {
                haystack.to_lowercase().contains(&needle.to_lowercase())
            })
        }

        contains(&application.company, self.company())
            && contains(&application.role, self.role())
    }
}

/// Parse an applied date, keeping whole seconds only.
pub fn parse_applied_date(raw: &str) -> Result<NaiveDateTime, String> {
    let raw = raw.trim();

    let parsed = DateTime::parse_from_rfc3339(raw)
        .map(|timestamp| timestamp.naive_utc())
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f"))
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .or_else(|_| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d").map(|date| date.and_time(NaiveTime::default()))
        })
        .map_err(|err| format!("failed to parse '{raw}' as a date or date-time ({err})"))?;

    Ok(parsed.trunc_subsecs(0))
}

fn deserialize_optional_applied_date<'de, D>(
    deserializer: D,
) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    opt.map(|value| parse_applied_date(&value).map_err(serde::de::Error::custom))
        .transpose()
}
