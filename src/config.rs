use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::domain::Side;

/// Name of the weight profile every configuration must carry
pub const DEFAULT_PROFILE: &str = "default";

/// Weight keys a profile must define explicitly
pub const REQUIRED_WEIGHT_KEYS: [&str; 12] = [
    "market_weight",
    "elo_weight",
    "home_advantage",
    "rest_weight",
    "weather_penalty_weight",
    "injury_penalty_weight",
    "elo_k_factor",
    "wind_threshold_mph",
    "precipitation_threshold",
    "qb_out_penalty",
    "oline_cluster_penalty",
    "secondary_cluster_penalty",
];

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Named weight profiles ("default" plus per-pool overrides)
    pub weights: HashMap<String, WeightConfig>,
    #[serde(default)]
    pub confidence: ConfidenceConfig,
    #[serde(default)]
    pub survivor: SurvivorConfig,
    #[serde(default)]
    pub diversification: DiversificationConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Factor weights for one scoring pass.
///
/// Spread-scale values (home advantage, penalties) are in points; the two
/// probability weights blend market and Elo estimates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightConfig {
    /// Weight of the no-vig market probability (e.g., 0.55)
    pub market_weight: f64,
    /// Weight of the Elo probability (e.g., 0.35)
    pub elo_weight: f64,
    /// Home-field edge in points
    pub home_advantage: f64,
    /// Points per day of rest differential
    pub rest_weight: f64,
    /// Multiplier on weather severity (points at severity 1.0)
    pub weather_penalty_weight: f64,
    /// Multiplier on the summed injury penalties
    pub injury_penalty_weight: f64,
    /// Elo K-factor used for post-game updates
    pub elo_k_factor: f64,
    /// Wind speed (mph) above which weather starts to matter
    pub wind_threshold_mph: f64,
    /// Precipitation probability (0-1) above which weather starts to matter
    pub precipitation_threshold: f64,
    /// Points lost when the starting quarterback is out
    pub qb_out_penalty: f64,
    /// Points lost with two or more offensive linemen out
    pub oline_cluster_penalty: f64,
    /// Points lost with two or more defensive backs out
    pub secondary_cluster_penalty: f64,
    /// Elo points added to the home rating
    #[serde(default = "default_elo_home_bonus")]
    pub elo_home_bonus: f64,
    /// Maximum rest differential counted, in days
    #[serde(default = "default_rest_cap_days")]
    pub rest_cap_days: f64,
    /// Points per unit of form score differential
    #[serde(default = "default_form_weight")]
    pub form_weight: f64,
    /// Number of recent games in the form window
    #[serde(default = "default_form_window")]
    pub form_window: usize,
    /// Points per unit of motivation differential (result capped at ±2)
    #[serde(default = "default_motivation_weight")]
    pub motivation_weight: f64,
    /// Points shaded toward the underdog in divisional games
    #[serde(default = "default_divisional_weight")]
    pub divisional_weight: f64,
    /// Points for the side seeking revenge
    #[serde(default = "default_revenge_weight")]
    pub revenge_weight: f64,
}

fn default_elo_home_bonus() -> f64 {
    55.0
}

fn default_rest_cap_days() -> f64 {
    3.0
}

fn default_form_weight() -> f64 {
    0.02
}

fn default_form_window() -> usize {
    4
}

fn default_motivation_weight() -> f64 {
    4.0
}

fn default_divisional_weight() -> f64 {
    0.75
}

fn default_revenge_weight() -> f64 {
    0.5
}

impl Default for WeightConfig {
    fn default() -> Self {
        Self {
            market_weight: 0.55,
            elo_weight: 0.35,
            home_advantage: 1.5,
            rest_weight: 0.4,
            weather_penalty_weight: 1.5,
            injury_penalty_weight: 1.0,
            elo_k_factor: 20.0,
            wind_threshold_mph: 15.0,
            precipitation_threshold: 0.6,
            qb_out_penalty: 6.0,
            oline_cluster_penalty: 1.5,
            secondary_cluster_penalty: 1.0,
            elo_home_bonus: default_elo_home_bonus(),
            rest_cap_days: default_rest_cap_days(),
            form_weight: default_form_weight(),
            form_window: default_form_window(),
            motivation_weight: default_motivation_weight(),
            divisional_weight: default_divisional_weight(),
            revenge_weight: default_revenge_weight(),
        }
    }
}

impl WeightConfig {
    /// Build a profile from a persisted key/value record.
    ///
    /// Every key in [`REQUIRED_WEIGHT_KEYS`] must be present; the first
    /// missing one is reported as `ConfigError::NotFound`.
    pub fn from_map(values: &HashMap<String, f64>) -> Result<Self, ConfigError> {
        if let Some(missing) = REQUIRED_WEIGHT_KEYS
            .iter()
            .find(|key| !values.contains_key(**key))
        {
            return Err(ConfigError::NotFound(format!("weights.{missing}")));
        }

        let get = |key: &str| values.get(key).copied().unwrap_or_default();
        let get_or = |key: &str, default: f64| values.get(key).copied().unwrap_or(default);

        let form_window = get_or("form_window", default_form_window() as f64);
        if form_window < 1.0 || form_window.fract() != 0.0 {
            return Err(ConfigError::Message(format!(
                "weights.form_window must be a positive integer, got {form_window}"
            )));
        }

        Ok(Self {
            market_weight: get("market_weight"),
            elo_weight: get("elo_weight"),
            home_advantage: get("home_advantage"),
            rest_weight: get("rest_weight"),
            weather_penalty_weight: get("weather_penalty_weight"),
            injury_penalty_weight: get("injury_penalty_weight"),
            elo_k_factor: get("elo_k_factor"),
            wind_threshold_mph: get("wind_threshold_mph"),
            precipitation_threshold: get("precipitation_threshold"),
            qb_out_penalty: get("qb_out_penalty"),
            oline_cluster_penalty: get("oline_cluster_penalty"),
            secondary_cluster_penalty: get("secondary_cluster_penalty"),
            elo_home_bonus: get_or("elo_home_bonus", default_elo_home_bonus()),
            rest_cap_days: get_or("rest_cap_days", default_rest_cap_days()),
            form_weight: get_or("form_weight", default_form_weight()),
            form_window: form_window as usize,
            motivation_weight: get_or("motivation_weight", default_motivation_weight()),
            divisional_weight: get_or("divisional_weight", default_divisional_weight()),
            revenge_weight: get_or("revenge_weight", default_revenge_weight()),
        })
    }

    fn validate_into(&self, profile: &str, errors: &mut Vec<String>) {
        let non_negative = [
            ("market_weight", self.market_weight),
            ("elo_weight", self.elo_weight),
            ("home_advantage", self.home_advantage),
            ("rest_weight", self.rest_weight),
            ("weather_penalty_weight", self.weather_penalty_weight),
            ("injury_penalty_weight", self.injury_penalty_weight),
            ("elo_k_factor", self.elo_k_factor),
            ("wind_threshold_mph", self.wind_threshold_mph),
            ("qb_out_penalty", self.qb_out_penalty),
            ("oline_cluster_penalty", self.oline_cluster_penalty),
            ("secondary_cluster_penalty", self.secondary_cluster_penalty),
            ("rest_cap_days", self.rest_cap_days),
            ("form_weight", self.form_weight),
            ("motivation_weight", self.motivation_weight),
            ("divisional_weight", self.divisional_weight),
            ("revenge_weight", self.revenge_weight),
        ];
        for (key, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                errors.push(format!("weights.{profile}.{key} must be non-negative"));
            }
        }

        if !(0.0..=1.0).contains(&self.precipitation_threshold) {
            errors.push(format!(
                "weights.{profile}.precipitation_threshold must be between 0 and 1"
            ));
        }

        if self.form_window == 0 {
            errors.push(format!("weights.{profile}.form_window must be at least 1"));
        }
    }
}

/// Which side wins an exact 50.0 confidence tie
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TieBreak {
    #[default]
    Home,
    Away,
}

impl TieBreak {
    pub fn side(&self) -> Side {
        match self {
            TieBreak::Home => Side::Home,
            TieBreak::Away => Side::Away,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfidenceConfig {
    /// News only applies when |home_confidence - 50| is at most this
    #[serde(default = "default_news_gap_threshold")]
    pub news_gap_threshold: f64,
    /// Largest confidence delta news may apply
    #[serde(default = "default_news_max_delta")]
    pub news_max_delta: f64,
    /// Confidence at or above which a pick is Strong
    #[serde(default = "default_strong_threshold")]
    pub strong_threshold: f64,
    /// Confidence at or above which a pick is Moderate
    #[serde(default = "default_moderate_threshold")]
    pub moderate_threshold: f64,
    #[serde(default)]
    pub tiebreak: TieBreak,
}

fn default_news_gap_threshold() -> f64 {
    5.0
}

fn default_news_max_delta() -> f64 {
    3.0
}

fn default_strong_threshold() -> f64 {
    60.0
}

fn default_moderate_threshold() -> f64 {
    55.0
}

impl Default for ConfidenceConfig {
    fn default() -> Self {
        Self {
            news_gap_threshold: default_news_gap_threshold(),
            news_max_delta: default_news_max_delta(),
            strong_threshold: default_strong_threshold(),
            moderate_threshold: default_moderate_threshold(),
            tiebreak: TieBreak::Home,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurvivorConfig {
    /// Floor for the public pick share in the EV denominator
    #[serde(default = "default_public_pick_epsilon")]
    pub public_pick_epsilon: f64,
    /// Floor for the pool survival rate
    #[serde(default = "default_survival_rate_floor")]
    pub survival_rate_floor: f64,
    /// Lifetime of cached EV values in seconds (0 disables the cache)
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
    /// Maximum cached EV values
    #[serde(default = "default_cache_max_entries")]
    pub cache_max_entries: usize,
}

fn default_public_pick_epsilon() -> f64 {
    0.005
}

fn default_survival_rate_floor() -> f64 {
    0.1
}

fn default_cache_ttl_secs() -> u64 {
    300
}

fn default_cache_max_entries() -> usize {
    10_000
}

impl Default for SurvivorConfig {
    fn default() -> Self {
        Self {
            public_pick_epsilon: default_public_pick_epsilon(),
            survival_rate_floor: default_survival_rate_floor(),
            cache_ttl_secs: default_cache_ttl_secs(),
            cache_max_entries: default_cache_max_entries(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiversificationConfig {
    /// Minimum win probability for CORRELATED picks
    #[serde(default = "default_correlated_floor")]
    pub correlated_floor: f64,
    /// Minimum win probability for the HEDGE safe tier
    #[serde(default = "default_hedge_safe_floor")]
    pub hedge_safe_floor: f64,
    /// Lower bound of the HEDGE contrarian band
    #[serde(default = "default_contrarian_min")]
    pub contrarian_min: f64,
    /// Upper bound of the HEDGE contrarian band
    #[serde(default = "default_contrarian_max")]
    pub contrarian_max: f64,
}

fn default_correlated_floor() -> f64 {
    0.65
}

fn default_hedge_safe_floor() -> f64 {
    0.55
}

fn default_contrarian_min() -> f64 {
    0.45
}

fn default_contrarian_max() -> f64 {
    0.65
}

impl Default for DiversificationConfig {
    fn default() -> Self {
        Self {
            correlated_floor: default_correlated_floor(),
            hedge_safe_floor: default_hedge_safe_floor(),
            contrarian_min: default_contrarian_min(),
            contrarian_max: default_contrarian_max(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Filter directives (e.g. "info" or "warn,pickem=debug")
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Enable JSON formatted logs
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info,pickem=debug".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from files and environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();

        let builder = Config::builder()
            // Start with default values
            .set_default("logging.level", "info,pickem=debug")?
            .set_default("logging.json", false)?
            // Load default config file
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            // Load environment-specific config (e.g., config/production.toml)
            .add_source(
                File::from(config_dir.join(
                    std::env::var("PICKEM_ENV").unwrap_or_else(|_| "development".to_string()),
                ))
                .required(false),
            )
            // Override with environment variables (PICKEM__WEIGHTS__DEFAULT__ELO_WEIGHT, etc.)
            .add_source(
                Environment::with_prefix("PICKEM")
                    .separator("__")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }

    /// Load and validate, so a bad configuration fails once at startup
    pub fn load_validated<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config = Self::load_from(config_dir)?;
        config
            .validate()
            .map_err(|errors| ConfigError::Message(errors.join("; ")))?;
        Ok(config)
    }

    /// Configuration with only the built-in default profile
    pub fn default_config() -> Self {
        let mut weights = HashMap::new();
        weights.insert(DEFAULT_PROFILE.to_string(), WeightConfig::default());

        Self {
            weights,
            confidence: ConfidenceConfig::default(),
            survivor: SurvivorConfig::default(),
            diversification: DiversificationConfig::default(),
            logging: LoggingConfig::default(),
        }
    }

    /// Look up a weight profile by name
    pub fn profile(&self, name: &str) -> Option<&WeightConfig> {
        self.weights.get(name)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if !self.weights.contains_key(DEFAULT_PROFILE) {
            errors.push(format!("weights.{DEFAULT_PROFILE} profile is required"));
        }

        let mut names: Vec<&String> = self.weights.keys().collect();
        names.sort();
        for name in names {
            self.weights[name].validate_into(name, &mut errors);
        }

        let c = &self.confidence;
        if !(0.0..=50.0).contains(&c.news_gap_threshold) || c.news_max_delta < 0.0 {
            errors.push(
                "news_gap_threshold must be between 0 and 50, news_max_delta non-negative"
                    .to_string(),
            );
        }
        if c.news_max_delta > c.news_gap_threshold {
            errors.push("news_max_delta must not exceed news_gap_threshold".to_string());
        }
        if !(50.0..=100.0).contains(&c.moderate_threshold)
            || !(50.0..=100.0).contains(&c.strong_threshold)
        {
            errors.push("label thresholds must be between 50 and 100".to_string());
        }
        if c.moderate_threshold > c.strong_threshold {
            errors.push("moderate_threshold must not exceed strong_threshold".to_string());
        }

        let s = &self.survivor;
        if s.public_pick_epsilon <= 0.0 {
            errors.push("public_pick_epsilon must be positive".to_string());
        }
        if s.survival_rate_floor <= 0.0 || s.survival_rate_floor > 1.0 {
            errors.push("survival_rate_floor must be in (0, 1]".to_string());
        }

        let d = &self.diversification;
        for (key, value) in [
            ("correlated_floor", d.correlated_floor),
            ("hedge_safe_floor", d.hedge_safe_floor),
            ("contrarian_min", d.contrarian_min),
            ("contrarian_max", d.contrarian_max),
        ] {
            if !(0.0..=1.0).contains(&value) {
                errors.push(format!("diversification.{key} must be between 0 and 1"));
            }
        }
        if d.contrarian_min > d.contrarian_max {
            errors.push("contrarian_min must not exceed contrarian_max".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn full_weight_map() -> HashMap<String, f64> {
        REQUIRED_WEIGHT_KEYS
            .iter()
            .map(|key| (key.to_string(), 1.0))
            .collect()
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default_config();
        assert!(config.validate().is_ok());
        assert!(config.profile(DEFAULT_PROFILE).is_some());
    }

    #[test]
    fn test_validate_caps_news_delta() {
        let mut config = AppConfig::default_config();
        config.confidence.news_max_delta = 60.0;
        let errors = config.validate().unwrap_err();
        assert!(
            errors.iter().any(|e| e.contains("news_max_delta")),
            "errors: {errors:?}"
        );

        config.confidence.news_max_delta = config.confidence.news_gap_threshold;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_map_reports_missing_key() {
        let mut values = full_weight_map();
        values.remove("qb_out_penalty");

        let err = WeightConfig::from_map(&values).unwrap_err();
        assert!(
            err.to_string().contains("qb_out_penalty"),
            "error should name the missing key: {err}"
        );
    }

    #[test]
    fn test_from_map_fills_optional_defaults() {
        let weights = WeightConfig::from_map(&full_weight_map()).unwrap();
        assert_eq!(weights.form_window, 4);
        assert_eq!(weights.elo_home_bonus, 55.0);
        assert_eq!(weights.market_weight, 1.0);
    }

    #[test]
    fn test_validate_flags_bad_values() {
        let mut config = AppConfig::default_config();
        config.weights.get_mut(DEFAULT_PROFILE).unwrap().market_weight = -0.1;
        config.diversification.contrarian_min = 0.9;

        let errors = config.validate().unwrap_err();
        assert!(errors.iter().any(|e| e.contains("market_weight")));
        assert!(errors.iter().any(|e| e.contains("contrarian_min")));
    }

    #[test]
    fn test_validate_requires_default_profile() {
        let mut config = AppConfig::default_config();
        let weights = config.weights.remove(DEFAULT_PROFILE).unwrap();
        config.weights.insert("office".to_string(), weights);

        let errors = config.validate().unwrap_err();
        assert!(errors.iter().any(|e| e.contains("default")));
    }

    #[test]
    fn test_load_from_missing_required_weight_fails() {
        let dir = std::env::temp_dir().join(format!("pickem-config-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let mut file = std::fs::File::create(dir.join("default.toml")).unwrap();
        writeln!(
            file,
            "[weights.default]\nmarket_weight = 0.5\nelo_weight = 0.3\n"
        )
        .unwrap();

        let result = AppConfig::load_from(&dir);
        assert!(result.is_err(), "a profile missing required keys must fail to load");

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_from_complete_file() {
        let dir = std::env::temp_dir().join(format!("pickem-config-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let mut body = String::from("[weights.default]\n");
        for key in REQUIRED_WEIGHT_KEYS {
            body.push_str(&format!("{key} = 0.5\n"));
        }
        std::fs::write(dir.join("default.toml"), body).unwrap();

        let config = AppConfig::load_validated(&dir).unwrap();
        let weights = config.profile(DEFAULT_PROFILE).unwrap();
        assert_eq!(weights.elo_k_factor, 0.5);
        assert_eq!(config.diversification.correlated_floor, 0.65);

        std::fs::remove_dir_all(&dir).ok();
    }
}
