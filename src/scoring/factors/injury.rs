use crate::config::WeightConfig;
use crate::domain::{Adjustment, Factor, InjuryReport, Input, Sides};

/// Absences at one position group before the cluster penalty applies
const CLUSTER_SIZE: u8 = 2;

/// Unweighted points one team loses to its injuries
pub fn injury_penalty(weights: &WeightConfig, report: &InjuryReport) -> f64 {
    let mut penalty = 0.0;
    if report.qb_out {
        penalty += weights.qb_out_penalty;
    }
    if report.oline_out >= CLUSTER_SIZE {
        penalty += weights.oline_cluster_penalty;
    }
    if report.secondary_out >= CLUSTER_SIZE {
        penalty += weights.secondary_cluster_penalty;
    }
    penalty
}

/// Penalty for a side, zero when its report is missing
fn side_penalty(weights: &WeightConfig, report: &Input<InjuryReport>) -> f64 {
    report
        .as_ref()
        .known()
        .map_or(0.0, |report| injury_penalty(weights, report))
}

/// Net injury adjustment: away penalties help home, home penalties hurt it
pub fn injuries(weights: &WeightConfig, reports: &Sides<Input<InjuryReport>>) -> Adjustment {
    let home = side_penalty(weights, &reports.home);
    let away = side_penalty(weights, &reports.away);
    let points = (away - home) * weights.injury_penalty_weight;

    if points == 0.0 {
        return Adjustment::none(Factor::Injury);
    }
    Adjustment::new(Factor::Injury, points)
        .with_detail(format!("home -{home:.1} / away -{away:.1}"))
}
