//! Test fixtures and data for orchestrator tests

use shared::{Fit, Judgement, NewLead};

/// Standard test data and fixtures
pub struct TestFixtures;

impl TestFixtures {
    /// Tokens charged per scored lead by the scripted scorer
    pub const TOKENS_PER_LEAD: u64 = 100;

    /// Ten leads across four named companies and one blank account name
    pub fn sample_leads() -> Vec<NewLead> {
        vec![
            Self::lead("Acme", "Ann", "VP of Sales", "201-500"),
            Self::lead("Acme", "Ben", "CFO", "201-500"),
            Self::lead("Acme", "Cal", "Sales Manager", "201-500"),
            Self::lead("Acme", "Dee", "Head of Sales Development", "201-500"),
            Self::lead("Globex", "Eve", "Software Engineer", "5001-10000"),
            Self::lead("Globex", "Fay", "VP of Sales", "5001-10000"),
            Self::lead("Initech", "Gus", "Sales Manager", "51-200"),
            Self::lead("Initech", "Hal", "Sales Manager", "51-200"),
            Self::lead("", "Ivy", "Head of Sales Development", "11-50"),
            Self::lead("Umbrella", "Jay", "CFO", "1001-5000"),
        ]
    }

    pub fn lead(company: &str, first_name: &str, title: &str, employee_range: &str) -> NewLead {
        NewLead {
            account_name: company.to_string(),
            lead_first_name: first_name.to_string(),
            lead_last_name: "Tester".to_string(),
            lead_job_title: title.to_string(),
            account_domain: format!("{}.example", company.to_lowercase()),
            account_employee_range: employee_range.to_string(),
            account_industry: "Manufacturing".to_string(),
        }
    }

    /// Deterministic verdict keyed on the job title
    pub fn judgement_for(title: &str) -> Judgement {
        let (score, relevant, fit) = match title {
            "VP of Sales" => (90, true, Fit::Excellent),
            "Head of Sales Development" => (85, true, Fit::Excellent),
            "Sales Manager" => (60, true, Fit::Good),
            "CFO" => (5, false, Fit::Disqualified),
            "Software Engineer" => (10, false, Fit::Disqualified),
            _ => (30, false, Fit::Moderate),
        };

        Judgement {
            relevance_score: score,
            is_relevant: relevant,
            reasoning: format!("{title} scored {score}"),
            department_fit: fit,
            seniority_fit: fit,
        }
    }
}
