//! Endpoint Router: maps a logical endpoint name and its query parameters to
//! the OAuth scopes it needs and the downstream URL to call.
//!
//! Pure: no I/O, no state. Adding an endpoint means adding a variant, a row in
//! `Endpoint::spec`, and its query rule in `Endpoint::query`.

use std::collections::HashMap;
use std::str::FromStr;

use reqwest::Url;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteError {
    #[error("Unknown endpoint")]
    UnknownEndpoint(String),

    #[error("Missing parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Invalid downstream URL: {0}")]
    InvalidUrl(String),
}

/// The labor-market endpoints the proxy exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Metiers,
    Competences,
    LaBonneBoite,
    Offres,
    Marche,
}

/// Static configuration record for one endpoint.
#[derive(Debug)]
pub struct EndpointSpec {
    pub name: &'static str,
    pub scopes: &'static [&'static str],
    /// Path relative to the API base URL.
    pub path: &'static str,
}

const METIERS: EndpointSpec = EndpointSpec {
    name: "metiers",
    scopes: &["scope_rome_metiers", "nomenclatureRome"],
    path: "rome-metiers/v1/metiers",
};

const COMPETENCES: EndpointSpec = EndpointSpec {
    name: "competences",
    scopes: &["scope_rome_competences", "nomenclatureRome"],
    path: "rome-competences/v1/competence",
};

const LA_BONNE_BOITE: EndpointSpec = EndpointSpec {
    name: "labonneboite",
    scopes: &["scope_labonneboite_v2", "labonneboite"],
    path: "labonneboite/v2/companies",
};

const OFFRES: EndpointSpec = EndpointSpec {
    name: "offres",
    scopes: &["scope_offresdemploi_v2", "o2dsoffre"],
    path: "offresdemploi/v2/offres/search",
};

const MARCHE: EndpointSpec = EndpointSpec {
    name: "marche",
    scopes: &["scope_infotravail", "offresdemploi"],
    path: "infotravail/v1/marche",
};

const DEFAULT_DISTANCE_KM: &str = "30";
const DEFAULT_OFFRES_RANGE: &str = "0-14";

impl Endpoint {
    pub const ALL: [Endpoint; 5] = [
        Endpoint::Metiers,
        Endpoint::Competences,
        Endpoint::LaBonneBoite,
        Endpoint::Offres,
        Endpoint::Marche,
    ];

    pub fn spec(self) -> &'static EndpointSpec {
        match self {
            Endpoint::Metiers => &METIERS,
            Endpoint::Competences => &COMPETENCES,
            Endpoint::LaBonneBoite => &LA_BONNE_BOITE,
            Endpoint::Offres => &OFFRES,
            Endpoint::Marche => &MARCHE,
        }
    }

    pub fn name(self) -> &'static str {
        self.spec().name
    }

    pub fn scopes(self) -> &'static [&'static str] {
        self.spec().scopes
    }

    /// Builds the downstream query pairs, in the order they are sent.
    fn query(self, params: &HashMap<String, String>) -> Result<Vec<(&'static str, String)>, RouteError> {
        let mut pairs = Vec::new();
        match self {
            Endpoint::Metiers => {
                pairs.push(("libelle", optional(params, "keyword").unwrap_or_default()));
            }
            Endpoint::Competences => {
                pairs.push(("code", required(params, "codeRome")?));
            }
            Endpoint::LaBonneBoite => {
                pairs.push(("rome_codes", required(params, "codeRome")?));
                pairs.push(("latitude", required(params, "lat")?));
                pairs.push(("longitude", required(params, "lon")?));
                pairs.push((
                    "distance",
                    optional(params, "distance").unwrap_or_else(|| DEFAULT_DISTANCE_KM.to_string()),
                ));
            }
            Endpoint::Offres => {
                for key in ["motsCles", "codeRome", "commune", "typeContrat"] {
                    if let Some(value) = optional(params, key) {
                        pairs.push((key, value));
                    }
                }
                pairs.push((
                    "range",
                    optional(params, "range").unwrap_or_else(|| DEFAULT_OFFRES_RANGE.to_string()),
                ));
            }
            Endpoint::Marche => {
                pairs.push(("codeRome", required(params, "codeRome")?));
                if let Some(region) = optional(params, "codeRegion") {
                    pairs.push(("codeRegion", region));
                }
            }
        }
        Ok(pairs)
    }
}

impl FromStr for Endpoint {
    type Err = RouteError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Endpoint::ALL
            .into_iter()
            .find(|endpoint| endpoint.name() == name)
            .ok_or_else(|| RouteError::UnknownEndpoint(name.to_string()))
    }
}

/// A fully resolved downstream call.
#[derive(Debug, Clone)]
pub struct ResolvedEndpoint {
    pub endpoint: Endpoint,
    pub scopes: &'static [&'static str],
    pub url: Url,
}

/// Resolves `name` + `params` against `base_url`.
pub fn resolve(
    base_url: &str,
    name: &str,
    params: &HashMap<String, String>,
) -> Result<ResolvedEndpoint, RouteError> {
    let endpoint: Endpoint = name.parse()?;
    let pairs = endpoint.query(params)?;

    let raw = format!("{}/{}", base_url.trim_end_matches('/'), endpoint.spec().path);
    let mut url = Url::parse(&raw).map_err(|e| RouteError::InvalidUrl(format!("{raw}: {e}")))?;
    url.query_pairs_mut().extend_pairs(pairs);

    Ok(ResolvedEndpoint {
        endpoint,
        scopes: endpoint.scopes(),
        url,
    })
}

/// Empty values count as absent.
fn optional(params: &HashMap<String, String>, key: &str) -> Option<String> {
    params
        .get(key)
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn required(params: &HashMap<String, String>, key: &'static str) -> Result<String, RouteError> {
    optional(params, key).ok_or(RouteError::MissingParameter(key))
}
