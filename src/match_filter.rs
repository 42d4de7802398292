use regex::Regex;
use crate::config::FilterConfig;
use crate::posting::JobPosting;
use crate::salary::{parse_salary, SalaryRange};

/// Why a posting was turned down. Carried into debug logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    TitleMismatch,
    LocationMismatch,
    Excluded(String),
    ExperienceRequired(u32),
    ExperienceUnknown,
    SalaryOutOfRange(SalaryRange),
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rejection::TitleMismatch => write!(f, "no title keyword"),
            Rejection::LocationMismatch => write!(f, "no location keyword"),
            Rejection::Excluded(term) => write!(f, "excluded term '{}'", term),
            Rejection::ExperienceRequired(years) => write!(f, "asks for {} years of experience", years),
            Rejection::ExperienceUnknown => write!(f, "experience requirement unknown"),
            Rejection::SalaryOutOfRange(range) => {
                write!(f, "salary {}-{} INR outside target", range.min_inr, range.max_inr)
            }
        }
    }
}

/// Decides whether a posting is worth an alert.
///
/// Five gates, all of which must pass: title, location, exclusions,
/// experience, salary.
pub struct MatchFilter {
    title_keywords: Vec<String>,
    location_keywords: Vec<String>,
    zero_experience_terms: Vec<String>,
    exclusion_terms: Vec<String>,
    min_inr: u64,
    max_inr: u64,
    years_regex: Regex,
}

impl MatchFilter {
    pub fn new(config: FilterConfig) -> Self {
        MatchFilter {
            title_keywords: lowercase_all(config.title_keywords),
            location_keywords: lowercase_all(config.location_keywords),
            zero_experience_terms: lowercase_all(config.zero_experience_terms),
            exclusion_terms: lowercase_all(config.exclusion_terms),
            min_inr: config.min_inr,
            max_inr: config.max_inr,
            // "3 years", "+2 yrs", "5+ years", "-1 year"
            years_regex: Regex::new(r"(?i)[+-]?(\d+)\s*\+?\s*(?:years|yrs|year)").unwrap(),
        }
    }

    pub fn matches(&self, posting: &JobPosting) -> bool {
        self.evaluate(posting).is_ok()
    }

    pub fn evaluate(&self, posting: &JobPosting) -> Result<(), Rejection> {
        let title = posting.title.to_lowercase();
        let tags = posting.tags.join(" ").to_lowercase();
        if !contains_any(&title, &self.title_keywords) && !contains_any(&tags, &self.title_keywords) {
            return Err(Rejection::TitleMismatch);
        }

        let description = posting.description.to_lowercase();
        let location = posting.location.to_lowercase();
        let location_hit = [&location, &title, &description]
            .iter()
            .any(|field| contains_any(field, &self.location_keywords));
        if !location_hit {
            return Err(Rejection::LocationMismatch);
        }

        let text = format!("{} {}", title, description);
        if let Some(term) = self.exclusion_terms.iter().find(|t| text.contains(t.as_str())) {
            return Err(Rejection::Excluded(term.clone()));
        }

        self.check_experience(&text)?;

        if let Some(range) = posting.salary.as_deref().and_then(parse_salary) {
            if !range.overlaps(self.min_inr, self.max_inr) {
                return Err(Rejection::SalaryOutOfRange(range));
            }
        }

        Ok(())
    }

    fn check_experience(&self, text: &str) -> Result<(), Rejection> {
        if contains_any(text, &self.zero_experience_terms) {
            return Ok(());
        }
        let Some(caps) = self.years_regex.captures(text) else {
            return Err(Rejection::ExperienceUnknown);
        };
        // Digit strings too long for u32 are certainly not zero.
        let years = caps[1].parse::<u32>().unwrap_or(u32::MAX);
        if years == 0 {
            Ok(())
        } else {
            Err(Rejection::ExperienceRequired(years))
        }
    }
}

fn lowercase_all(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

fn contains_any(haystack: &str, needles: &[String]) -> bool {
    needles.iter().any(|n| haystack.contains(n.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter() -> MatchFilter {
        MatchFilter::new(FilterConfig {
            title_keywords: vec!["Project Coordinator".into(), "analyst".into()],
            location_keywords: vec!["remote".into(), "india".into()],
            zero_experience_terms: vec!["fresher".into(), "entry level".into()],
            exclusion_terms: vec!["senior".into(), "unpaid".into(), "intern".into()],
            min_inr: 300_000,
            max_inr: 800_000,
        })
    }

    fn posting(title: &str, description: &str, location: &str) -> JobPosting {
        JobPosting {
            id: "1".into(),
            title: title.into(),
            description: description.into(),
            location: location.into(),
            url: "https://jobs.example/1".into(),
            ..Default::default()
        }
    }

    #[test]
    fn accepts_fresher_role_in_location() {
        let p = posting("Project Coordinator", "Freshers welcome", "India");
        assert_eq!(filter().evaluate(&p), Ok(()));
    }

    #[test]
    fn title_can_match_through_tags() {
        let mut p = posting("Operations", "entry level role", "Remote");
        assert_eq!(filter().evaluate(&p), Err(Rejection::TitleMismatch));
        p.tags = vec!["Data".into(), "Analyst".into()];
        assert!(filter().matches(&p));
    }

    #[test]
    fn location_can_come_from_title_or_description() {
        let f = filter();
        assert_eq!(
            f.evaluate(&posting("Analyst", "fresher", "Berlin")),
            Err(Rejection::LocationMismatch)
        );
        assert!(f.matches(&posting("Analyst (Remote)", "fresher", "")));
        assert!(f.matches(&posting("Analyst", "fresher, based in India", "")));
    }

    #[test]
    fn exclusion_terms_reject_regardless_of_other_fields() {
        let f = filter();
        let senior = posting("Senior Analyst", "fresher", "Remote");
        assert_eq!(f.evaluate(&senior), Err(Rejection::Excluded("senior".into())));

        let unpaid = posting("Analyst", "Entry level, UNPAID for the first month", "Remote");
        assert!(!f.matches(&unpaid));
    }

    #[test]
    fn zero_years_is_accepted() {
        let p = posting("Analyst", "0 years experience required", "Remote");
        assert!(filter().matches(&p));
    }

    #[test]
    fn positive_years_are_rejected() {
        let p = posting("Analyst", "3+ years experience", "Remote");
        assert_eq!(filter().evaluate(&p), Err(Rejection::ExperienceRequired(3)));
        let p = posting("Analyst", "minimum 2 yrs in operations", "Remote");
        assert_eq!(filter().evaluate(&p), Err(Rejection::ExperienceRequired(2)));
    }

    #[test]
    fn default_config_rejects_multi_decade_experience() {
        let f = MatchFilter::new(FilterConfig::default());
        for years in ["10", "20", "30"] {
            let p = posting(
                "Project Coordinator",
                &format!("Requires {} years experience", years),
                "India",
            );
            assert_eq!(f.evaluate(&p), Err(Rejection::ExperienceRequired(years.parse().unwrap())));
        }
        let p = posting("Project Coordinator", "0 years experience required", "India");
        assert_eq!(f.evaluate(&p), Ok(()));
    }

    #[test]
    fn unknown_experience_is_rejected() {
        let p = posting("Analyst", "Great team, flexible hours", "Remote");
        assert_eq!(filter().evaluate(&p), Err(Rejection::ExperienceUnknown));
    }

    #[test]
    fn salary_gate() {
        let f = filter();
        let mut p = posting("Analyst", "fresher", "Remote");

        p.salary = Some("Competitive".into());
        assert!(f.matches(&p));

        p.salary = Some("3 lakh - 5 lakh".into());
        assert!(f.matches(&p));

        p.salary = Some("₹1,50,000".into());
        assert_eq!(
            f.evaluate(&p),
            Err(Rejection::SalaryOutOfRange(SalaryRange { min_inr: 150_000, max_inr: 150_000 }))
        );

        p.salary = Some("12 LPA".into());
        assert!(!f.matches(&p));
    }
}
