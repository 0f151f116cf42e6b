use serde::{Deserialize, Serialize};

/// Newtype wrapper for client profile IDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Employment {
    FullTime,
    PartTime,
    Unemployed,
    SelfEmployed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Schedule {
    Flexible,
    Rigid,
}

/// Availability of transportation or internet access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Access {
    Reliable,
    Limited,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageBarrier {
    None,
    Moderate,
    Significant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Literacy {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    pub chronic_conditions: Vec<String>,
    pub risk_level: RiskLevel,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lifestyle {
    pub employment: Employment,
    pub family_responsibilities: Vec<String>,
    pub schedule: Schedule,
    pub transportation: Access,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Barriers {
    pub language: LanguageBarrier,
    pub literacy: Literacy,
    pub internet_access: Access,
}

/// Narrative attributes of a client. Cosmetic: nothing here feeds scoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientAttributes {
    /// 30..=100
    pub technological_proficiency: u8,
    pub health_status: HealthStatus,
    pub lifestyle: Lifestyle,
    pub barriers: Barriers,
}

impl ClientAttributes {
    /// The client's first chronic condition, if it is a real one.
    pub fn chronic_condition(&self) -> Option<&str> {
        first_meaningful(&self.health_status.chronic_conditions)
    }

    /// The client's first family responsibility, if it is a real one.
    pub fn family_responsibility(&self) -> Option<&str> {
        first_meaningful(&self.lifestyle.family_responsibilities)
    }
}

fn first_meaningful(values: &[String]) -> Option<&str> {
    values
        .first()
        .map(String::as_str)
        .filter(|value| *value != "none")
}

/// The person the player is guiding through the insurance process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub id: ClientId,
    pub name: String,
    pub avatar: String,
    pub status: String,
    pub concerns: Vec<String>,
    pub attributes: ClientAttributes,
}
