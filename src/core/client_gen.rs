/// Client profile provider: builds the cosmetic profile of the person
/// being guided from a client id.

use crate::core::content::ClientPools;
use crate::core::random::{choose, RandomSource, StdRandom};
use crate::schema::client::{
    Access, Barriers, Client, ClientAttributes, ClientId, Employment, HealthStatus,
    LanguageBarrier, Lifestyle, Literacy, RiskLevel, Schedule,
};

const AVATAR_BASE: &str = "https://api.dicebear.com/7.x/avataaars/svg";
const NEW_CLIENT_STATUS: &str = "New Client";
const PROFICIENCY_MIN: u8 = 30;
const PROFICIENCY_MAX: u8 = 100;

pub struct ClientGenerator<'a> {
    pools: &'a ClientPools,
}

impl<'a> ClientGenerator<'a> {
    pub fn new(pools: &'a ClientPools) -> Self {
        Self { pools }
    }

    /// The profile for `id`. The same id always yields the same client, so
    /// a loaded game shows the person it was saved with.
    pub fn profile(&self, id: ClientId) -> Client {
        let mut rng = StdRandom::new(id.0 as u64);
        self.generate(id, &mut rng)
    }

    /// Build a profile drawing attributes first, then the name.
    pub fn generate(&self, id: ClientId, rng: &mut dyn RandomSource) -> Client {
        let attributes = self.attributes(rng);
        let first = choose(rng, &self.pools.first_names).map(String::as_str).unwrap_or("Alex");
        let last = choose(rng, &self.pools.last_names).map(String::as_str).unwrap_or("Morgan");
        let name = format!("{} {}", first, last);

        Client {
            id,
            avatar: avatar_url(&name, &attributes),
            status: NEW_CLIENT_STATUS.to_string(),
            concerns: concerns(&attributes),
            name,
            attributes,
        }
    }

    fn attributes(&self, rng: &mut dyn RandomSource) -> ClientAttributes {
        let span = (PROFICIENCY_MAX - PROFICIENCY_MIN) as usize + 1;
        let technological_proficiency = PROFICIENCY_MIN + rng.pick_index(span) as u8;
        let condition = pick_string(rng, &self.pools.chronic_conditions);
        let risk_level = pick(rng, &[RiskLevel::Low, RiskLevel::Medium, RiskLevel::High]);
        let employment = pick(
            rng,
            &[
                Employment::FullTime,
                Employment::PartTime,
                Employment::Unemployed,
                Employment::SelfEmployed,
            ],
        );
        let family = pick_string(rng, &self.pools.family_responsibilities);
        let schedule = pick(rng, &[Schedule::Flexible, Schedule::Rigid]);
        let transportation = pick(rng, &ACCESS);
        let language = pick(
            rng,
            &[
                LanguageBarrier::None,
                LanguageBarrier::Moderate,
                LanguageBarrier::Significant,
            ],
        );
        let literacy = pick(rng, &[Literacy::High, Literacy::Medium, Literacy::Low]);
        let internet_access = pick(rng, &ACCESS);

        ClientAttributes {
            technological_proficiency,
            health_status: HealthStatus {
                chronic_conditions: vec![condition],
                risk_level,
            },
            lifestyle: Lifestyle {
                employment,
                family_responsibilities: vec![family],
                schedule,
                transportation,
            },
            barriers: Barriers {
                language,
                literacy,
                internet_access,
            },
        }
    }
}

const ACCESS: [Access; 3] = [Access::Reliable, Access::Limited, Access::None];

fn pick<T: Copy>(rng: &mut dyn RandomSource, items: &[T]) -> T {
    items[rng.pick_index(items.len())]
}

// An empty pool reads as "none".
fn pick_string(rng: &mut dyn RandomSource, items: &[String]) -> String {
    choose(rng, items).cloned().unwrap_or_else(|| "none".to_string())
}

fn concerns(attributes: &ClientAttributes) -> Vec<String> {
    let mut concerns = Vec::new();
    if let Some(condition) = attributes.chronic_condition() {
        concerns.push(format!("I have {} and need regular medical care.", condition));
    }
    if attributes.barriers.language != LanguageBarrier::None {
        concerns.push("I sometimes have trouble understanding medical terms and forms.".to_string());
    }
    if let Some(family) = attributes.family_responsibility() {
        concerns.push(format!("I'm caring for {} and have limited time.", family));
    }
    if concerns.is_empty() {
        concerns.push("I'm worried about the cost of health insurance.".to_string());
    }
    concerns
}

/// Avatar background follows the client's situation: young children,
/// no chronic condition, or anything else.
fn avatar_url(name: &str, attributes: &ClientAttributes) -> String {
    let background = if attributes
        .lifestyle
        .family_responsibilities
        .iter()
        .any(|f| f == "young children")
    {
        "b6e3f4"
    } else if attributes
        .health_status
        .chronic_conditions
        .iter()
        .any(|c| c == "none")
    {
        "d1d4f9"
    } else {
        "ffdfbf"
    };
    format!(
        "{}?seed={}&backgroundColor={}&style=circle",
        AVATAR_BASE,
        encode_component(name),
        background
    )
}

/// Percent-encode everything except unreserved URI characters.
fn encode_component(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' => out.push(byte as char),
            b'-' | b'_' | b'.' | b'!' | b'~' | b'*' | b'\'' | b'(' | b')' => out.push(byte as char),
            other => out.push_str(&format!("%{:02X}", other)),
        }
    }
    out
}
