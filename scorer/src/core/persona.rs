//! Persona rubric and company-size classification

use shared::SizeBand;

/// Ideal-lead rubric embedded in every scoring prompt
pub const PERSONA_SPEC: &str = r#"
# Ideal Lead Profile

## Overview
Our ideal customers are B2B companies selling into complex verticals such as manufacturing,
education and healthcare. The right contact owns pipeline generation and is hands-on with
outbound execution. Who that person is depends heavily on company size.

## Targets by Company Size

### Startup (1-50 employees)
1. Founder / Co-Founder (5/5)
2. CEO / President (5/5)
3. Owner / Co-Owner (5/5)
4. Managing Director (4/5)
5. Head of Sales (4/5)

### SMB (51-200 employees)
1. VP of Sales (5/5)
2. Head of Sales (5/5)
3. Sales Director (5/5)
4. Director of Sales Development (5/5)
5. Chief Revenue Officer (4/5)
6. Head of Revenue Operations (4/5)
7. VP of Growth (4/5)

### Mid-Market (201-1,000 employees)
1. VP of Sales Development (5/5)
2. VP of Sales (5/5)
3. Head of Sales Development (5/5)
4. Director of Sales Development (5/5)
5. Chief Revenue Officer (4/5)
6. VP of Revenue Operations (4/5)
7. VP of GTM (4/5)
Champions: Sales Managers, BDR Managers, RevOps Managers

### Enterprise (1,000+ employees)
1. VP of Sales Development (5/5)
2. VP of Inside Sales (5/5)
3. Head of Sales Development (5/5)
4. Chief Revenue Officer (4/5)
5. VP of Revenue Operations (4/5)
6. Director of Sales Development (4/5)
7. VP of Field Sales (4/5)
Champions: BDR Managers, Directors of Sales Operations, RevOps Managers

## Department Priority
1. Sales Development (5/5)
2. Sales (5/5)
3. Revenue Operations (4/5)
4. Business Development (4/5)
5. GTM / Growth (4/5)
6. Executive (5/5 at startups, falling to 1/5 at enterprise)

## Seniority Relevance
| Seniority              | Startup | SMB | Mid-Market | Enterprise |
|------------------------|---------|-----|------------|------------|
| Founder / Owner        | 5/5     | 3/5 | 1/5        | 0/5        |
| C-Level                | 5/5     | 3/5 | 2/5        | 1/5        |
| Vice President         | 3/5     | 5/5 | 5/5        | 5/5        |
| Director               | 2/5     | 4/5 | 5/5        | 4/5        |
| Manager                | 1/5     | 2/5 | 3/5        | 3/5        |
| Individual Contributor | 0/5     | 0/5 | 1/5        | 1/5        |

## Exclusions

### Hard Exclusions
- CEO / President at Mid-Market and Enterprise companies
- CFO / Finance
- CTO / Engineering
- HR / Legal / Compliance
- Customer Success
- Product Management

### Soft Exclusions
- BDRs / SDRs (not decision makers)
- Account Executives (closers, not outbound owners)
- CMO / VP Marketing
- Board Members / Advisors

## Industry Considerations
Good fits sell into manufacturing, education or healthcare, for example:
- SaaS vendors selling to hospitals, school districts or manufacturers
- Professional services firms targeting traditional industries
- B2B technology vendors with long, enterprise-style sales cycles
- Any company running outbound into hard-to-reach buyers

## Negative Signals
- Sells to SMB or consumers (B2C)
- Product-led growth company
- Already runs a large SDR team (20+)
- Company in layoffs or cost-cutting mode
- "Advisor" or "Consultant" in the title
"#;

/// Employee-range tokens per band, checked in this order
const SIZE_TOKENS: &[(SizeBand, &[&str])] = &[
    (SizeBand::Startup, &["1-10", "2-10", "11-50", "1-50"]),
    (SizeBand::Smb, &["51-200"]),
    (SizeBand::MidMarket, &["201-500", "501-1000", "201-1000"]),
    (
        SizeBand::Enterprise,
        &["1001", "5001", "10001", "1000+", "5000+", "10000+"],
    ),
];

/// Bucket a free-text employee range into a size band.
///
/// Never fails: blank or unrecognized input yields [`SizeBand::Unknown`].
pub fn classify_company_size(employee_range: &str) -> SizeBand {
    let range: String = employee_range
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| *c != ',')
        .collect();

    if range.is_empty() {
        return SizeBand::Unknown;
    }

    SIZE_TOKENS
        .iter()
        .find(|(_, tokens)| tokens.iter().any(|token| contains_token(&range, token)))
        .map(|(band, _)| *band)
        .unwrap_or(SizeBand::Unknown)
}

/// Substring match that refuses occurrences embedded in a longer number
fn contains_token(haystack: &str, token: &str) -> bool {
    let bytes = haystack.as_bytes();
    haystack.match_indices(token).any(|(start, matched)| {
        let end = start + matched.len();
        let digit_before = start > 0 && bytes[start - 1].is_ascii_digit();
        let digit_after = end < bytes.len() && bytes[end].is_ascii_digit();
        !digit_before && !digit_after
    })
}
