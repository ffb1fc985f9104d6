use crate::config::WeightConfig;
use crate::domain::{Adjustment, Factor, RecentGame, Sides};

/// Record term at a perfect (or winless) window
const RECORD_SCALE: f64 = 50.0;

/// Average margin counted, in points either way
const MARGIN_CAP: f64 = 25.0;

/// Form score in [-75, 75] from the most recent games (newest first).
///
/// Record contributes up to ±50 and average margin up to ±25. With fewer
/// than `window` games the score shrinks proportionally toward zero.
pub fn form_score(recent: &[RecentGame], window: usize) -> f64 {
    let window = window.max(1);
    let games = &recent[..recent.len().min(window)];
    if games.is_empty() {
        return 0.0;
    }

    let n = games.len() as f64;
    let wins = games.iter().filter(|g| g.points_for > g.points_against).count();
    let losses = games.iter().filter(|g| g.points_for < g.points_against).count();
    let net_wins = wins as f64 - losses as f64;
    let record = net_wins / n * RECORD_SCALE;
    let margin = (games.iter().map(RecentGame::margin).sum::<f64>() / n)
        .clamp(-MARGIN_CAP, MARGIN_CAP);
    let sample_confidence = n / window as f64;

    (record + margin) * sample_confidence
}

/// Form differential converted to points
pub fn recent_form(weights: &WeightConfig, recent: &Sides<Vec<RecentGame>>) -> Adjustment {
    let home = form_score(&recent.home, weights.form_window);
    let away = form_score(&recent.away, weights.form_window);
    let points = (home - away) * weights.form_weight;

    if points == 0.0 {
        return Adjustment::none(Factor::RecentForm);
    }
    Adjustment::new(Factor::RecentForm, points)
        .with_detail(format!("form home {home:.1} / away {away:.1}"))
}
