use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// One job listing, decoded once at the source boundary.
///
/// Optional feed fields collapse to documented defaults: empty strings for
/// `description`, `location` and `url`, an empty tag list, and `None` for a
/// missing or blank `salary`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct JobPosting {
    pub id: String,
    pub title: String,
    pub description: String,
    pub location: String,
    pub salary: Option<String>,
    pub url: String,
    pub tags: Vec<String>,
}

/// Wire shape of a feed element. Field names differ between feeds, hence the aliases.
#[derive(Debug, Deserialize)]
pub struct RawPosting {
    #[serde(default, alias = "job_id", deserialize_with = "string_or_number")]
    pub id: Option<String>,
    #[serde(alias = "position", alias = "job_title")]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub candidate_required_location: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default, alias = "salary_range")]
    pub salary: Option<String>,
    #[serde(default, alias = "link", alias = "apply_url")]
    pub url: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

impl JobPosting {
    /// Converts a decoded feed element. Returns `None` when neither an id nor a
    /// url is available to identify the posting.
    pub fn from_raw(raw: RawPosting) -> Option<Self> {
        let url = raw.url.map(|u| u.trim().to_string()).unwrap_or_default();
        let id = raw
            .id
            .map(|i| i.trim().to_string())
            .filter(|i| !i.is_empty())
            .or_else(|| Some(url.clone()).filter(|u| !u.is_empty()))?;

        Some(JobPosting {
            id,
            title: raw.title.trim().to_string(),
            description: raw.description.unwrap_or_default(),
            // Remotive-style key wins; blank values fall through.
            location: raw
                .candidate_required_location
                .filter(|l| !l.trim().is_empty())
                .or(raw.location)
                .unwrap_or_default(),
            salary: raw.salary.filter(|s| !s.trim().is_empty()),
            url,
            tags: raw.tags.unwrap_or_default(),
        })
    }
}

// Feeds disagree on whether ids are strings or integers.
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}
