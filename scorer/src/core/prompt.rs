//! Evaluation prompt construction

use shared::Lead;

use crate::config::{DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE};
use crate::core::persona::{PERSONA_SPEC, classify_company_size};
use crate::types::ChatPrompt;

const SYSTEM_PROMPT: &str = "You are a lead qualification AI. Always respond with valid JSON only. \
No markdown formatting, no code blocks, just the raw JSON object.";

/// Builds one evaluation request per lead
#[derive(Debug, Clone)]
pub struct PromptHandler {
    persona: String,
    temperature: f32,
    max_tokens: u32,
}

impl PromptHandler {
    /// Handler with the built-in persona and near-deterministic sampling
    pub fn new() -> Self {
        Self {
            persona: PERSONA_SPEC.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    pub fn with_sampling(mut self, temperature: f32, max_tokens: u32) -> Self {
        self.temperature = temperature;
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_persona(mut self, persona: impl Into<String>) -> Self {
        self.persona = persona.into();
        self
    }

    /// Build the chat prompt evaluating `lead` against the persona
    pub fn build_prompt(&self, lead: &Lead) -> ChatPrompt {
        let company_size = classify_company_size(&lead.account_employee_range);
        let persona = &self.persona;
        let name = lead.full_name();
        let job_title = or_unknown(&lead.lead_job_title);
        let company = &lead.account_name;
        let domain = &lead.account_domain;
        let employee_range = or_unknown(&lead.account_employee_range);
        let industry = or_unknown(&lead.account_industry);

        let user = format!(
            r#"You are an expert B2B sales lead qualification analyst.

Given the following persona specification and lead information, evaluate how well this lead matches the ideal customer persona.

{persona}

## Lead to Evaluate
- **Name:** {name}
- **Job Title:** {job_title}
- **Company:** {company}
- **Company Domain:** {domain}
- **Employee Range:** {employee_range}
- **Company Size Classification:** {company_size}
- **Industry:** {industry}

## Instructions
Evaluate this lead and respond with ONLY a valid JSON object (no markdown, no code blocks, no other text) with exactly these fields:

{{
  "relevance_score": <integer 0-100>,
  "is_relevant": <boolean>,
  "reasoning": "<2-3 sentence explanation of why this lead is or isn't a good fit>",
  "department_fit": "<one of: excellent, good, moderate, poor, disqualified>",
  "seniority_fit": "<one of: excellent, good, moderate, poor, disqualified>"
}}

Key evaluation criteria:
1. Is the job title aligned with the target personas for this company size?
2. Is the department relevant (Sales, Sales Development, Revenue Ops, BD, GTM)?
3. Is the seniority appropriate for the company size?
4. Does the lead fall under a hard or soft exclusion?
5. Does the company or industry suggest a likely customer?

If the lead falls under a hard exclusion (HR, Finance, Engineering, Legal, etc.) or has a clearly irrelevant role, set is_relevant to false and relevance_score below 20.
If the lead is a strong match, set relevance_score above 70.
A lead with no job title or very unclear information should score around 10-30."#
        );

        ChatPrompt {
            system: SYSTEM_PROMPT.to_string(),
            user,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }
}

impl Default for PromptHandler {
    fn default() -> Self {
        Self::new()
    }
}

fn or_unknown(value: &str) -> &str {
    if value.trim().is_empty() { "Unknown" } else { value }
}
