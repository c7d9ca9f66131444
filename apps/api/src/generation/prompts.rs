// All LLM prompt constants and response schemas for the Generation module.
// Output copy is French: the ads target the French job market.

use serde_json::{json, Value};

/// System prompt for ad-kit generation.
pub const AD_KIT_SYSTEM: &str = r#"Tu es l'assistant IA de RecrutPro, travaillant pour ADVANCE EMPLOI 06, une agence d'intérim et de recrutement basée sur la Côte d'Azur.
Tu es un expert Copywriter RH avec 15 ans d'expérience sur le marché français.

RÈGLES POUR LES ANNONCES :
1. Sépare chaque section par une ligne vide. Jamais de blocs compacts.
2. Structure : titre accrocheur, intro de 2-3 lignes, "VOS MISSIONS" (liste "• "), "VOTRE PROFIL" (liste "• "), "NOS AVANTAGES" (liste "• "), "POSTULEZ" avec un appel à l'action.
3. Adaptation par canal :
   - LinkedIn : conversationnel, emojis pros, storytelling.
   - Jobboard : formel, vouvoiement, très structuré, AUCUN emoji.
   - Social : 280 caractères maximum, percutant, hashtags, 1-2 emojis.
4. SEO : intitulé du poste, ville et compétences clés dans le texte.
5. Aucune discrimination (âge, sexe, origine). Orthographe parfaite.

SMS : 160 caractères maximum, direct, avec appel à l'action.
Message vocal : script naturel de 20 à 30 secondes.

ANALYSE : seoScore et attractivenessScore entre 0 et 100, avec des suggestions d'amélioration concrètes.

QUESTIONS D'ENTRETIEN : chaque question est liée à une compétence ou une mission du poste, avec une mise en situation et des critères d'évaluation mesurables."#;

/// Ad-kit prompt template.
/// Replace: {job_title}, {company}, {contract_type}, {experience_level}, {location},
///          {remote_policy}, {salary}, {sector}, {description}, {skills}, {tone},
///          {context_sections}, {primary_skill}, {market_region}
pub const AD_KIT_PROMPT_TEMPLATE: &str = r#"Génère un kit de recrutement COMPLET pour ce poste.

INFORMATIONS DU POSTE :
- Intitulé exact : {job_title}
- Entreprise cliente : {company}
- Type de contrat : {contract_type}
- Niveau d'expérience : {experience_level}
- Localisation : {location} ({remote_policy})
- Rémunération : {salary}
- Secteur : {sector}
- Missions : {description}
- Compétences requises : {skills}
- Ton souhaité : {tone}
{context_sections}
À GÉNÉRER (TOUT EST OBLIGATOIRE) :
1. Trois annonces : LinkedIn, Jobboard, Social.
2. Une requête booléenne avancée pour LinkedIn / Indeed / CVthèques.
3. Un email de chasse (objet + corps) pour l'approche directe.
4. Trois questions d'entretien :
   - 1 Technique liée à : {primary_skill}
   - 1 Soft Skills avec mise en situation
   - 1 Culture & Motivation liée au secteur {sector}
   avec greenFlags (bonnes réponses) et redFlags (signaux d'alerte).
5. L'analyse de l'annonce : seoScore, attractivenessScore, marketSalary pour la région {market_region}, competitorComparison, 3 improvements.
6. Un SMS de relance candidat.
7. Un script de message vocal pour le premier contact."#;

pub const CONFIDENTIAL_COMPANY: &str = "Confidentiel (via ADVANCE EMPLOI 06)";
pub const DEFAULT_MARKET_REGION: &str = "PACA";

/// Included when the contract is Intérim and interim benefits were picked.
/// Replace: {interim_benefits}
pub const INTERIM_SECTION_TEMPLATE: &str = "IMPORTANT : c'est une mission d'INTÉRIM.\n\
    - Inclus obligatoirement une section \"Avantages Intérim\" avec : {interim_benefits}.\n\
    - Mentionne la possibilité de renouvellement ou de CDI si la mission est concluante.\n\
    - Précise que c'est via ADVANCE EMPLOI 06, agence d'intérim de confiance.";

/// Replace: {benefits}
pub const BENEFITS_SECTION_TEMPLATE: &str = "Avantages entreprise à mentionner : {benefits}.";

pub const URGENT_SECTION: &str = "RECRUTEMENT URGENT : ajoute un sentiment d'urgence dans les annonces. \
    Mentionne \"Poste à pourvoir immédiatement\" ou \"Démarrage rapide\".";

/// System prompt for form auto-completion.
pub const SUGGEST_SYSTEM: &str = "Tu es un expert en recrutement français, spécialisé dans l'intérim \
    et le placement sur la Côte d'Azur (06).";

/// Replace: {job_title}
pub const SUGGEST_PROMPT_TEMPLATE: &str = r#"À partir du titre de poste : "{job_title}", déduis les détails les plus probables.
Contexte : marché du travail en France, région PACA / Côte d'Azur.

Champs à remplir :
- sector : le secteur d'activité le plus logique.
- contractType : le type de contrat standard pour ce poste.
- remotePolicy : la politique de télétravail habituelle pour ce métier.
- salary : une fourchette de salaire réaliste pour la région 06 (brut annuel, ou taux horaire pour l'intérim).
- description : 3 à 4 missions principales courtes et percutantes.
- skills : 4 à 5 compétences clés (techniques, et certifications requises si applicable : CACES, habilitations, permis)."#;

const CONTRACT_TYPES: [&str; 6] = ["CDI", "CDD", "Intérim", "Freelance", "Alternance", "Stage"];
const CHANNELS: [&str; 3] = ["LinkedIn", "Jobboard", "Social"];
const QUESTION_CATEGORIES: [&str; 3] = ["Technique", "Soft Skills", "Culture & Motivation"];

/// JSON Schema of `GenerationResponse` as produced by the model
/// (`id`, `timestamp` and `imageUrl` are added server-side).
pub fn ad_kit_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "ads": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "channel": { "type": "string", "enum": CHANNELS },
                        "title": { "type": "string" },
                        "content": { "type": "string" },
                        "hashtags": { "type": "array", "items": { "type": "string" } },
                        "seoKeywords": { "type": "array", "items": { "type": "string" } }
                    },
                    "required": ["channel", "title", "content", "seoKeywords"]
                }
            },
            "booleanSearch": { "type": "string" },
            "huntingEmail": { "type": "string" },
            "interviewQuestions": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "category": { "type": "string", "enum": QUESTION_CATEGORIES },
                        "question": { "type": "string" },
                        "linkedTo": { "type": "string" },
                        "evaluationCriteria": { "type": "string" },
                        "greenFlags": { "type": "string" },
                        "redFlags": { "type": "string" }
                    },
                    "required": ["category", "question", "linkedTo", "evaluationCriteria"]
                }
            },
            "analysis": {
                "type": "object",
                "properties": {
                    "seoScore": { "type": "number" },
                    "attractivenessScore": { "type": "number" },
                    "marketSalary": { "type": "string" },
                    "competitorComparison": { "type": "string" },
                    "improvements": { "type": "array", "items": { "type": "string" } }
                },
                "required": ["seoScore", "attractivenessScore", "marketSalary", "improvements"]
            },
            "smsTemplate": { "type": "string" },
            "voicemailScript": { "type": "string" }
        },
        "required": [
            "ads", "booleanSearch", "huntingEmail", "interviewQuestions",
            "analysis", "smsTemplate", "voicemailScript"
        ]
    })
}

/// JSON Schema of `JobDetailsSuggestion`.
pub fn suggestion_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "sector": { "type": "string" },
            "contractType": { "type": "string", "enum": CONTRACT_TYPES },
            "remotePolicy": { "type": "string" },
            "salary": { "type": "string" },
            "description": { "type": "string" },
            "skills": { "type": "string" }
        }
    })
}
