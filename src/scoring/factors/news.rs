use tracing::debug;

use crate::config::ConfidenceConfig;
use crate::domain::NewsSignal;
use crate::scoring::probability::clamp_confidence;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewsOutcome {
    pub home_confidence: f64,
    pub applied: bool,
}

/// Fold an external news signal into the home confidence.
///
/// The full delta (bounded by `news_max_delta`) applies at an exact 50 and
/// tapers linearly to nothing at `news_gap_threshold` from 50, so confidence
/// stays continuous and non-decreasing in the statistical score as long as
/// `news_max_delta <= news_gap_threshold`.
pub fn apply_news(
    config: &ConfidenceConfig,
    home_confidence: f64,
    news: Option<&NewsSignal>,
) -> NewsOutcome {
    let unchanged = NewsOutcome {
        home_confidence,
        applied: false,
    };

    let news = match news {
        Some(news) if news.confidence_delta.is_finite() => news,
        _ => return unchanged,
    };

    let gap = (home_confidence - 50.0).abs();
    if config.news_gap_threshold <= 0.0 || gap >= config.news_gap_threshold {
        debug!(
            gap,
            threshold = config.news_gap_threshold,
            "news ignored, confidence gap too wide"
        );
        return unchanged;
    }

    let taper = 1.0 - gap / config.news_gap_threshold;
    let delta = news.confidence_delta.abs().min(config.news_max_delta) * taper;
    NewsOutcome {
        home_confidence: clamp_confidence(home_confidence + news.side.sign() * delta),
        applied: delta > 0.0,
    }
}
