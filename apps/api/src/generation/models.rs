//! Request and response types for ad generation.
//!
//! Field names are camelCase on the wire to match the job form client.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContractType {
    #[default]
    #[serde(rename = "CDI")]
    Cdi,
    #[serde(rename = "CDD")]
    Cdd,
    #[serde(rename = "Intérim")]
    Interim,
    Freelance,
    Alternance,
    Stage,
}

impl ContractType {
    pub fn label(self) -> &'static str {
        match self {
            ContractType::Cdi => "CDI",
            ContractType::Cdd => "CDD",
            ContractType::Interim => "Intérim",
            ContractType::Freelance => "Freelance",
            ContractType::Alternance => "Alternance",
            ContractType::Stage => "Stage",
        }
    }
}

/// Writing tone requested for the ads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tone {
    #[default]
    #[serde(rename = "Professionnel & Structuré")]
    Professional,
    #[serde(rename = "Amical & Dynamique")]
    Friendly,
    #[serde(rename = "Urgent & Direct")]
    Urgent,
    #[serde(rename = "Prestigieux & Exclusif")]
    Prestige,
    #[serde(rename = "Startup & Décalé")]
    Startup,
}

impl Tone {
    pub fn label(self) -> &'static str {
        match self {
            Tone::Professional => "Professionnel & Structuré",
            Tone::Friendly => "Amical & Dynamique",
            Tone::Urgent => "Urgent & Direct",
            Tone::Prestige => "Prestigieux & Exclusif",
            Tone::Startup => "Startup & Décalé",
        }
    }
}

/// The job-posting form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JobFormData {
    pub job_title: String,
    pub company_name: String,
    pub is_confidential: bool,
    pub contract_type: ContractType,
    pub location: String,
    pub remote_policy: String,
    pub salary: String,
    pub experience_level: String,
    pub sector: String,
    pub description: String,
    pub skills: String,
    pub tone: Tone,
    pub interim_benefits: Vec<String>,
    pub benefits: Vec<String>,
    pub is_urgent: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Channel {
    LinkedIn,
    Jobboard,
    Social,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedAd {
    pub channel: Channel,
    pub title: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hashtags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seo_keywords: Option<Vec<String>>,
    /// Stock illustration; only set on the Social ad.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestionCategory {
    Technique,
    #[serde(rename = "Soft Skills")]
    SoftSkills,
    #[serde(rename = "Culture & Motivation")]
    CultureMotivation,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewQuestion {
    pub category: QuestionCategory,
    pub question: String,
    /// The skill or mission the question probes.
    pub linked_to: String,
    pub evaluation_criteria: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub green_flags: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub red_flags: Option<String>,
}

/// Quality scores for the generated ads. Scores are 0 – 100.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdAnalysis {
    pub seo_score: f64,
    pub attractiveness_score: f64,
    pub market_salary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub competitor_comparison: Option<String>,
    #[serde(default)]
    pub improvements: Vec<String>,
}

impl AdAnalysis {
    pub fn clamp_scores(&mut self) {
        self.seo_score = self.seo_score.clamp(0.0, 100.0);
        self.attractiveness_score = self.attractiveness_score.clamp(0.0, 100.0);
    }
}

/// The full recruiting kit returned to the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResponse {
    /// Filled in server-side after parsing.
    #[serde(default)]
    pub id: String,
    /// Epoch millis, filled in server-side after parsing.
    #[serde(default)]
    pub timestamp: i64,
    pub ads: Vec<GeneratedAd>,
    pub boolean_search: String,
    pub hunting_email: String,
    pub interview_questions: Vec<InterviewQuestion>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<AdAnalysis>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sms_template: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voicemail_script: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestRequest {
    pub job_title: String,
}

/// Form fields inferred from a job title. Everything is optional: the model
/// may leave out what it cannot infer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDetailsSuggestion {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sector: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_type: Option<ContractType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_policy: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skills: Option<String>,
}
