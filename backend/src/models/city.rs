//! City baselines and optional per-city input data
//!
//! A `CityBaseline` is the immutable starting configuration of one city.
//! History and microdata arrive pre-validated from ingestion; the core only
//! reads them.

use serde::{Deserialize, Serialize};

/// Immutable starting configuration for one city
///
/// Monetary units: `median_price` in dollars, `median_rent` in dollars per
/// week, `median_income` in dollars per household per year. Rates and
/// shares are fractions (0.05 = 5%).
///
/// # Example
///
/// ```rust
/// use housing_simulator_core_rs::CityBaseline;
///
/// let city = CityBaseline::new("SYD", "NSW");
/// assert_eq!(city.state, "NSW");
/// assert!(city.population > 0.0);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CityBaseline {
    /// Unique city identifier
    pub id: String,

    /// Display name
    #[serde(default)]
    pub name: String,

    /// State/territory code this city rolls into
    pub state: String,

    pub population: f64,
    pub dwelling_stock: f64,

    /// Dwellings completed in the baseline year
    pub annual_completions: f64,

    pub median_price: f64,

    /// Weekly rent
    pub median_rent: f64,

    /// Annual household income; the "wage" driving stress and migration
    pub median_income: f64,

    pub mortgage_rate: f64,

    /// Sensitivity of price growth to the demand/supply gap
    #[serde(default = "default_elasticity")]
    pub price_elasticity: f64,

    /// Sensitivity of rent growth to the demand/supply gap
    #[serde(default = "default_elasticity")]
    pub rent_elasticity: f64,

    /// Sensitivity of completions to excess price growth
    #[serde(default = "default_supply_elasticity")]
    pub supply_elasticity: f64,

    /// Baseline annual price growth
    #[serde(default)]
    pub price_growth: f64,

    /// Baseline annual rent growth
    #[serde(default)]
    pub rent_growth: f64,

    /// Baseline annual nominal wage growth
    #[serde(default = "default_wage_growth")]
    pub wage_growth: f64,

    /// Births minus deaths as a share of population
    #[serde(default)]
    pub natural_growth_rate: f64,

    /// Net migration as a share of population
    #[serde(default)]
    pub net_migration_rate: f64,

    /// Share of dwellings held by investors
    #[serde(default)]
    pub investor_share: f64,

    /// Share of stock demolished each year
    #[serde(default)]
    pub demolition_rate: f64,

    /// Non-housing attractiveness used by spatial equilibrium
    #[serde(default)]
    pub amenity: f64,

    /// Explicit aggregation weight; overrides population weighting
    #[serde(default)]
    pub aggregation_weight: Option<f64>,
}

fn default_elasticity() -> f64 {
    1.0
}

fn default_supply_elasticity() -> f64 {
    2.0
}

fn default_wage_growth() -> f64 {
    0.03
}

impl CityBaseline {
    /// Create a mid-sized city with plausible defaults
    ///
    /// Mostly useful for tests and examples; real baselines come from
    /// ingestion.
    pub fn new(id: impl Into<String>, state: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            state: state.into(),
            population: 1_000_000.0,
            dwelling_stock: 420_000.0,
            annual_completions: 8_000.0,
            median_price: 750_000.0,
            median_rent: 550.0,
            median_income: 95_000.0,
            mortgage_rate: 0.06,
            price_elasticity: default_elasticity(),
            rent_elasticity: default_elasticity(),
            supply_elasticity: default_supply_elasticity(),
            price_growth: 0.04,
            rent_growth: 0.035,
            wage_growth: default_wage_growth(),
            natural_growth_rate: 0.006,
            net_migration_rate: 0.008,
            investor_share: 0.30,
            demolition_rate: 0.002,
            amenity: 0.0,
            aggregation_weight: None,
        }
    }

    /// Baseline households implied by population
    pub fn households(&self, persons_per_household: f64) -> f64 {
        self.population / persons_per_household.max(f64::EPSILON)
    }

    /// Baseline policy-free net migration in persons per year
    pub fn baseline_net_migration(&self) -> f64 {
        self.population * self.net_migration_rate
    }

    /// Gross annual rental yield at baseline
    pub fn rental_yield(&self, weeks_per_year: f64) -> f64 {
        self.median_rent * weeks_per_year / self.median_price.max(1.0)
    }
}

/// Year-indexed history for one city
///
/// Arrays are aligned with `years`; shorter arrays are truncated to the
/// common length when estimating growth.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct HistoricalSeries {
    pub years: Vec<i32>,
    #[serde(default)]
    pub price: Vec<f64>,
    #[serde(default)]
    pub rent: Vec<f64>,
    #[serde(default)]
    pub wage: Vec<f64>,
}

/// Housing tenure of a microdata household
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Tenure {
    Renter,
    Mortgaged,
    OwnerOutright,
}

/// One household record from a survey sample
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MicrodataRecord {
    /// Annual household income at the baseline year
    pub income: f64,
    pub tenure: Tenure,
    /// Survey weight; absent means 1
    #[serde(default)]
    pub weight: Option<f64>,
}

impl MicrodataRecord {
    /// Effective weight, treating absent weights as 1
    pub fn effective_weight(&self) -> f64 {
        self.weight.unwrap_or(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_city_deserializes_with_defaults() {
        let json = r#"{
            "id": "PER",
            "state": "WA",
            "population": 2200000,
            "dwelling_stock": 900000,
            "annual_completions": 15000,
            "median_price": 650000,
            "median_rent": 600,
            "median_income": 105000,
            "mortgage_rate": 0.062
        }"#;
        let city: CityBaseline = serde_json::from_str(json).unwrap();
        assert_eq!(city.price_elasticity, 1.0);
        assert_eq!(city.wage_growth, 0.03);
        assert_eq!(city.aggregation_weight, None);
        assert_eq!(city.investor_share, 0.0);
    }

    #[test]
    fn test_rental_yield() {
        let city = CityBaseline::new("X", "NSW");
        let y = city.rental_yield(52.0);
        assert!((y - 550.0 * 52.0 / 750_000.0).abs() < 1e-12);
    }

    #[test]
    fn test_tenure_snake_case() {
        let rec: MicrodataRecord =
            serde_json::from_str(r#"{"income": 50000, "tenure": "owner_outright"}"#).unwrap();
        assert_eq!(rec.tenure, Tenure::OwnerOutright);
        assert_eq!(rec.effective_weight(), 1.0);
    }
}
