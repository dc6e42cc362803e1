//! Budget-constrained prioritization of retrofit measures.
//!
//! Every candidate measure is evaluated by re-running the full audit
//! pipeline on a cloned building state; the per-carrier cost delta
//! against the baseline is its annual saving. Selection maximizes total
//! annual savings with an exact 0-1 knapsack over whole-euro costs.
//! Candidates touching the same envelope element or system are rejected
//! up front; combination effects between such measures are undefined.

use std::collections::HashMap;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::climate::ClimateZone;
use crate::config::{
    CalcConfig, ClassThresholds, EnergyTariffs, FactorSet, FinanceDefaults,
};
use crate::engine::{evaluate, AuditEvaluation};
use crate::envelope::Envelope;
use crate::error::{EngineError, Result};
use crate::finance::{appraise, CashFlowSpec, FinancialResult};
use crate::measures::Measure;
use crate::systems::{DhwSystem, HeatingSystem};
use crate::uid::UID;

/// Score sheet for one candidate measure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasureScore {
    pub measure_id: UID,
    pub name: String,
    pub investment_cost_eur: f64,
    /// Annual energy cost saving against the baseline in EUR.
    pub annual_saving_eur: f64,
    /// Annual delivered-energy reduction in kWh (negative if the measure
    /// increases energy use).
    pub annual_energy_delta_kwh: f64,
    /// Annual saving per invested euro.
    pub cost_effectiveness: f64,
    pub financial: FinancialResult,
    /// Whether the optimizer picked this measure under the budget.
    pub selected: bool,
}

/// Ranked candidate measures with the selected subset's totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorityMatrix {
    /// All candidates in ranked order (payback ascending, then cost, then
    /// declaration order), each flagged selected or not.
    pub scores: Vec<MeasureScore>,
    /// Budget the selection ran under; `None` means unconstrained.
    pub budget_eur: Option<f64>,
    pub selected_investment_eur: f64,
    pub selected_annual_saving_eur: f64,
}

impl PriorityMatrix {
    pub fn selected(&self) -> impl Iterator<Item = &MeasureScore> {
        self.scores.iter().filter(|s| s.selected)
    }
}

/// Evaluates and ranks candidate measures against a baseline building
/// state, selecting the subset maximizing total annual savings within
/// the budget. Deterministic for identical inputs regardless of the
/// parallel evaluation order.
#[allow(clippy::too_many_arguments)]
pub fn prioritize(
    envelope: &Envelope,
    heating: &HeatingSystem,
    dhw: &DhwSystem,
    zone: &ClimateZone,
    config: &CalcConfig,
    factors: &FactorSet,
    thresholds: &ClassThresholds,
    tariffs: &EnergyTariffs,
    finance: &FinanceDefaults,
    measures: &[Measure],
    budget_eur: Option<f64>,
) -> Result<PriorityMatrix> {
    check_disjoint(measures)?;

    let baseline = evaluate(envelope, heating, dhw, zone, config, factors, thresholds)?;
    let baseline_cost = annual_energy_cost(&baseline, tariffs)?;

    // Each candidate re-runs the pipeline on its own cloned state;
    // par_iter keeps declaration order in the collected Vec.
    let evaluations: Vec<Result<(AuditEvaluation, f64)>> = measures
        .par_iter()
        .map(|measure| {
            let mut env = envelope.clone();
            let mut heat = heating.clone();
            let mut hot_water = dhw.clone();
            let mut cfg = config.clone();
            measure.apply(&mut env, &mut heat, &mut hot_water, &mut cfg)?;
            let evaluation =
                evaluate(&env, &heat, &hot_water, zone, &cfg, factors, thresholds)?;
            let cost = annual_energy_cost(&evaluation, tariffs)?;
            Ok((evaluation, cost))
        })
        .collect();

    let mut scores = Vec::with_capacity(measures.len());
    for (measure, outcome) in measures.iter().zip(evaluations) {
        let (evaluation, variant_cost) = outcome?;
        let annual_saving_eur = baseline_cost - variant_cost;
        let annual_energy_delta_kwh = total_delivered(&baseline) - total_delivered(&evaluation);
        let financial = appraise(
            &CashFlowSpec {
                investment_eur: measure.investment_cost_eur,
                annual_saving_eur,
                price_escalation: finance.price_escalation,
                horizon_years: measure.lifetime_years,
            },
            finance.discount_rate,
        );
        let cost_effectiveness = if measure.investment_cost_eur > 0.0 && annual_saving_eur > 0.0 {
            annual_saving_eur / measure.investment_cost_eur
        } else {
            0.0
        };
        scores.push(MeasureScore {
            measure_id: measure.id.clone(),
            name: measure.name.clone(),
            investment_cost_eur: measure.investment_cost_eur,
            annual_saving_eur,
            annual_energy_delta_kwh,
            cost_effectiveness,
            financial,
            selected: false,
        });
    }

    // Rank: payback ascending (absent last), then cost, then declaration
    // order. The knapsack runs over this order, so ties inside the DP
    // resolve toward the better-ranked measure.
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| {
        let pa = payback_key(&scores[a]);
        let pb = payback_key(&scores[b]);
        pa.cmp(&pb)
            .then_with(|| {
                scores[a]
                    .investment_cost_eur
                    .total_cmp(&scores[b].investment_cost_eur)
            })
            .then_with(|| a.cmp(&b))
    });

    let chosen = match budget_eur {
        Some(budget) => knapsack(&scores, &order, budget),
        // Unconstrained: every measure that actually saves money.
        None => order
            .iter()
            .copied()
            .filter(|&i| scores[i].annual_saving_eur > 0.0)
            .collect(),
    };
    for &i in &chosen {
        scores[i].selected = true;
    }

    let selected_investment_eur = chosen.iter().map(|&i| scores[i].investment_cost_eur).sum();
    let selected_annual_saving_eur = chosen.iter().map(|&i| scores[i].annual_saving_eur).sum();

    let ranked = order.into_iter().map(|i| scores[i].clone()).collect();
    Ok(PriorityMatrix {
        scores: ranked,
        budget_eur,
        selected_investment_eur,
        selected_annual_saving_eur,
    })
}

/// Rejects candidate sets in which two measures touch the same subject.
fn check_disjoint(measures: &[Measure]) -> Result<()> {
    let mut seen: HashMap<String, &str> = HashMap::new();
    for measure in measures {
        for subject in measure.subjects() {
            if let Some(first) = seen.get(&subject) {
                return Err(EngineError::OverlappingMeasures {
                    first: first.to_string(),
                    second: measure.name.clone(),
                    subject,
                });
            }
            seen.insert(subject, measure.name.as_str());
        }
    }
    Ok(())
}

/// Annual energy cost of an evaluation at the given tariffs.
fn annual_energy_cost(evaluation: &AuditEvaluation, tariffs: &EnergyTariffs) -> Result<f64> {
    let mut cost = 0.0;
    for (&carrier, &kwh) in &evaluation.delivered.by_carrier {
        if kwh == 0.0 {
            continue;
        }
        cost += kwh * tariffs.price(carrier)?;
    }
    Ok(cost)
}

fn total_delivered(evaluation: &AuditEvaluation) -> f64 {
    evaluation.delivered.by_carrier.values().sum()
}

/// Sort key: paybacks ascending, measures that never pay back last.
fn payback_key(score: &MeasureScore) -> u32 {
    score.financial.simple_payback_years.unwrap_or(u32::MAX)
}

/// Exact 0-1 knapsack over whole-euro investment costs, maximizing total
/// annual savings. Items are considered in ranked order and the DP only
/// replaces a solution on a strict improvement, so equal-value subsets
/// resolve to the better-ranked measures.
fn knapsack(scores: &[MeasureScore], order: &[usize], budget_eur: f64) -> Vec<usize> {
    // The DP axis never needs to exceed the combined cost of every
    // candidate worth selecting, so memory stays bounded by the measure
    // list even for an arbitrarily large (or infinite) budget.
    let combined_weight: usize = order
        .iter()
        .filter(|&&i| scores[i].annual_saving_eur > 0.0)
        .map(|&i| scores[i].investment_cost_eur.ceil() as usize)
        .sum();
    let capacity = if budget_eur >= combined_weight as f64 {
        combined_weight
    } else {
        budget_eur.max(0.0).floor() as usize
    };
    // (best saving, chosen original indices) per whole-euro budget level.
    let mut best: Vec<(f64, Vec<usize>)> = vec![(0.0, Vec::new()); capacity + 1];
    for &i in order {
        let score = &scores[i];
        if score.annual_saving_eur <= 0.0 {
            continue;
        }
        let weight = score.investment_cost_eur.ceil() as usize;
        if weight > capacity {
            continue;
        }
        for level in (weight..=capacity).rev() {
            let candidate = best[level - weight].0 + score.annual_saving_eur;
            if candidate > best[level].0 {
                let mut chosen = best[level - weight].1.clone();
                chosen.push(i);
                best[level] = (candidate, chosen);
            }
        }
    }
    let mut chosen = best[capacity].1.clone();
    chosen.sort_unstable();
    chosen
}
