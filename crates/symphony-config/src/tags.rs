// Tagging policy
//
// Every stack carries a merged tag map: common tags first, then the
// environment-specific set, with environment keys winning on collision.
// Unrecognized environment names fall back to the dev tag set.

use chrono::Utc;
use std::collections::BTreeMap;

pub type Tags = BTreeMap<String, String>;

/// Derive the tag mapping for an environment name
pub fn tags_for(environment: &str) -> Tags {
    let mut tags = common_tags();
    tags.extend(environment_tags(environment));
    tags
}

fn common_tags() -> Tags {
    let mut tags = Tags::new();
    tags.insert("ManagedBy".to_string(), "symphony".to_string());
    tags.insert("Project".to_string(), "Symphony".to_string());
    tags.insert("Application".to_string(), "symphony".to_string());
    tags.insert("LastUpdated".to_string(), Utc::now().to_rfc3339());
    // Common default; environment sets override this on merge
    tags.insert("Environment".to_string(), "Unspecified".to_string());
    tags
}

fn environment_tags(environment: &str) -> Tags {
    let entries: &[(&str, &str)] = match environment {
        "staging" => &[
            ("Environment", "Staging"),
            ("CostCenter", "QATeam"),
            ("Owner", "QA"),
        ],
        "prod" => &[
            ("Environment", "Production"),
            ("CostCenter", "ProdTeam"),
            ("Owner", "Operations"),
        ],
        // dev, and the fallback for anything unrecognized
        _ => &[
            ("Environment", "Development"),
            ("CostCenter", "DevTeam"),
            ("Owner", "DevOps"),
        ],
    };
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
