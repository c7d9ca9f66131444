//! Ad generation: builds the ad-kit prompt from the job form, calls the
//! structured generator, then post-processes the kit.
//!
//! Flow: validate form → build prompt → generate_json(schema) → deserialize →
//!       attach Social image → clamp scores → stamp id/timestamp.

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::generation::models::{
    Channel, ContractType, GenerationResponse, JobDetailsSuggestion, JobFormData,
};
use crate::generation::prompts::{
    ad_kit_schema, suggestion_schema, AD_KIT_PROMPT_TEMPLATE, AD_KIT_SYSTEM,
    BENEFITS_SECTION_TEMPLATE, CONFIDENTIAL_COMPANY, DEFAULT_MARKET_REGION,
    INTERIM_SECTION_TEMPLATE, SUGGEST_PROMPT_TEMPLATE, SUGGEST_SYSTEM, URGENT_SECTION,
};
use crate::llm_client::{StructuredGenerator, StructuredPrompt};

// ────────────────────────────────────────────────────────────────────────────
// Stock imagery for the Social ad
// ────────────────────────────────────────────────────────────────────────────

const CONSTRUCTION_IMAGE: &str =
    "https://images.unsplash.com/photo-1504307651254-35680f356dfd?w=800&h=450&fit=crop";
const LOGISTICS_IMAGE: &str =
    "https://images.unsplash.com/photo-1586528116311-ad8dd3c8310d?w=800&h=450&fit=crop";
const INDUSTRY_IMAGE: &str =
    "https://images.unsplash.com/photo-1581091226825-a6a2a5aee158?w=800&h=450&fit=crop";
const RETAIL_IMAGE: &str =
    "https://images.unsplash.com/photo-1556742049-0cfed4f6a45d?w=800&h=450&fit=crop";
const RESTAURANT_IMAGE: &str =
    "https://images.unsplash.com/photo-1517248135467-4c7edcad34c4?w=800&h=450&fit=crop";
const HOTEL_IMAGE: &str =
    "https://images.unsplash.com/photo-1566073771259-6a8506099945?w=800&h=450&fit=crop";
const HEALTH_IMAGE: &str =
    "https://images.unsplash.com/photo-1519494026892-80bbd2d6fd0d?w=800&h=450&fit=crop";
const TECH_IMAGE: &str =
    "https://images.unsplash.com/photo-1517694712202-14dd9538aa97?w=800&h=450&fit=crop";
const AGRICULTURE_IMAGE: &str =
    "https://images.unsplash.com/photo-1500937386664-56d1dfef3854?w=800&h=450&fit=crop";
const CLEANING_IMAGE: &str =
    "https://images.unsplash.com/photo-1581578731548-c64695cc6952?w=800&h=450&fit=crop";
const SECURITY_IMAGE: &str =
    "https://images.unsplash.com/photo-1555817128-342e1c8b3101?w=800&h=450&fit=crop";
pub const DEFAULT_IMAGE: &str =
    "https://images.unsplash.com/photo-1497215728101-856f4ea42174?w=800&h=450&fit=crop";

/// Sector keyword → image. First match wins, so order matters.
const SECTOR_IMAGES: &[(&str, &str)] = &[
    ("btp", CONSTRUCTION_IMAGE),
    ("bâtiment", CONSTRUCTION_IMAGE),
    ("construction", CONSTRUCTION_IMAGE),
    ("logistique", LOGISTICS_IMAGE),
    ("transport", LOGISTICS_IMAGE),
    ("industrie", INDUSTRY_IMAGE),
    ("commerce", RETAIL_IMAGE),
    ("vente", RETAIL_IMAGE),
    ("restauration", RESTAURANT_IMAGE),
    ("hôtellerie", HOTEL_IMAGE),
    ("santé", HEALTH_IMAGE),
    ("médical", HEALTH_IMAGE),
    ("it", TECH_IMAGE),
    ("tech", TECH_IMAGE),
    ("informatique", TECH_IMAGE),
    ("agriculture", AGRICULTURE_IMAGE),
    ("nettoyage", CLEANING_IMAGE),
    ("sécurité", SECURITY_IMAGE),
];

/// Picks a stock image by case-insensitive keyword match on the sector.
/// Keywords of two letters or fewer ("it") must match a whole word.
pub fn select_job_image(sector: &str) -> &'static str {
    let sector = sector.to_lowercase();
    let words: Vec<&str> = sector.split(|c: char| !c.is_alphanumeric()).collect();
    SECTOR_IMAGES
        .iter()
        .find(|(keyword, _)| {
            if keyword.chars().count() <= 2 {
                words.contains(keyword)
            } else {
                sector.contains(keyword)
            }
        })
        .map(|(_, url)| *url)
        .unwrap_or(DEFAULT_IMAGE)
}

// ────────────────────────────────────────────────────────────────────────────
// Prompt building
// ────────────────────────────────────────────────────────────────────────────

/// Optional prompt sections driven by the form: interim, benefits, urgency.
fn context_sections(form: &JobFormData) -> String {
    let mut sections = Vec::new();

    if form.contract_type == ContractType::Interim && !form.interim_benefits.is_empty() {
        sections.push(
            INTERIM_SECTION_TEMPLATE.replace("{interim_benefits}", &form.interim_benefits.join(", ")),
        );
    }
    if !form.benefits.is_empty() {
        sections.push(BENEFITS_SECTION_TEMPLATE.replace("{benefits}", &form.benefits.join(", ")));
    }
    if form.is_urgent {
        sections.push(URGENT_SECTION.to_string());
    }

    if sections.is_empty() {
        String::new()
    } else {
        format!("\n{}\n", sections.join("\n\n"))
    }
}

/// The first comma-separated skill, or the whole field when there is no comma.
fn primary_skill(skills: &str) -> &str {
    skills
        .split(',')
        .map(str::trim)
        .find(|s| !s.is_empty())
        .unwrap_or(skills)
}

pub fn build_ad_kit_prompt(form: &JobFormData) -> String {
    let company = if form.is_confidential {
        CONFIDENTIAL_COMPANY
    } else {
        form.company_name.as_str()
    };
    let market_region = if form.location.trim().is_empty() {
        DEFAULT_MARKET_REGION
    } else {
        form.location.as_str()
    };

    AD_KIT_PROMPT_TEMPLATE
        .replace("{job_title}", &form.job_title)
        .replace("{company}", company)
        .replace("{contract_type}", form.contract_type.label())
        .replace("{experience_level}", &form.experience_level)
        .replace("{location}", &form.location)
        .replace("{remote_policy}", &form.remote_policy)
        .replace("{salary}", &form.salary)
        .replace("{sector}", &form.sector)
        .replace("{description}", &form.description)
        .replace("{skills}", &form.skills)
        .replace("{tone}", form.tone.label())
        .replace("{context_sections}", &context_sections(form))
        .replace("{primary_skill}", primary_skill(&form.skills))
        .replace("{market_region}", market_region)
}

// ────────────────────────────────────────────────────────────────────────────
// Pipelines
// ────────────────────────────────────────────────────────────────────────────

/// Generates the full recruiting kit for `form`.
pub async fn generate_job_ads(
    form: &JobFormData,
    generator: &dyn StructuredGenerator,
) -> Result<GenerationResponse, AppError> {
    if form.job_title.trim().is_empty() {
        return Err(AppError::Validation("jobTitle cannot be empty".to_string()));
    }

    let prompt = build_ad_kit_prompt(form);
    let schema = ad_kit_schema();

    info!("Generating ad kit for '{}'", form.job_title);
    let raw = generator
        .generate_json(StructuredPrompt {
            system: AD_KIT_SYSTEM,
            prompt: &prompt,
            schema: &schema,
        })
        .await
        .map_err(|e| AppError::Llm(format!("Ad generation failed: {e}")))?;

    let mut kit: GenerationResponse = serde_json::from_value(raw)
        .map_err(|e| AppError::Llm(format!("Ad kit did not match schema: {e}")))?;

    if let Some(social) = kit.ads.iter_mut().find(|ad| ad.channel == Channel::Social) {
        social.image_url = Some(select_job_image(&form.sector).to_string());
    }
    if let Some(analysis) = kit.analysis.as_mut() {
        analysis.clamp_scores();
    }
    kit.timestamp = Utc::now().timestamp_millis();
    kit.id = Uuid::new_v4().to_string();

    info!(
        "Ad kit {} generated: {} ads, {} interview questions",
        kit.id,
        kit.ads.len(),
        kit.interview_questions.len()
    );
    Ok(kit)
}

/// Infers likely form fields from a job title.
pub async fn suggest_job_details(
    job_title: &str,
    generator: &dyn StructuredGenerator,
) -> Result<JobDetailsSuggestion, AppError> {
    if job_title.trim().is_empty() {
        return Err(AppError::Validation("jobTitle cannot be empty".to_string()));
    }

    let prompt = SUGGEST_PROMPT_TEMPLATE.replace("{job_title}", job_title.trim());
    let schema = suggestion_schema();

    let raw = generator
        .generate_json(StructuredPrompt {
            system: SUGGEST_SYSTEM,
            prompt: &prompt,
            schema: &schema,
        })
        .await
        .map_err(|e| AppError::Llm(format!("Job details suggestion failed: {e}")))?;

    serde_json::from_value(raw)
        .map_err(|e| AppError::Llm(format!("Suggestion did not match schema: {e}")))
}
