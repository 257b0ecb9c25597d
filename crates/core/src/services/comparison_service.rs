use crate::models::backtest::BacktestResult;
use crate::models::comparison::{ComparisonMetric, ComparisonRow};
use crate::models::run::BacktestRun;

/// Builds side-by-side metric rows for several backtests.
pub struct ComparisonService;

impl ComparisonService {
    pub fn new() -> Self {
        Self
    }

    /// One row per result, in input order. Missing metrics read as 0 and
    /// unnamed results are labelled "Strategy N" (1-based).
    pub fn rows(&self, results: &[BacktestResult]) -> Vec<ComparisonRow> {
        results
            .iter()
            .enumerate()
            .map(|(index, result)| {
                let name = result
                    .strategy_name
                    .clone()
                    .unwrap_or_else(|| format!("Strategy {}", index + 1));
                row(name, result)
            })
            .collect()
    }

    /// Rows for stored runs, labelled by [`BacktestRun::label`].
    pub fn rows_for_runs(&self, runs: &[BacktestRun]) -> Vec<ComparisonRow> {
        runs.iter()
            .map(|run| row(run.label().to_string(), &run.result))
            .collect()
    }

    /// Leading row for `metric`; the first one wins a tie.
    pub fn best_by<'a>(
        &self,
        rows: &'a [ComparisonRow],
        metric: ComparisonMetric,
    ) -> Option<&'a ComparisonRow> {
        let mut best: Option<&ComparisonRow> = None;
        for candidate in rows {
            let value = metric.value_of(candidate);
            if value.is_nan() {
                continue;
            }
            let better = match best {
                None => true,
                Some(current) => {
                    let current = metric.value_of(current);
                    if metric.higher_is_better() {
                        value > current
                    } else {
                        value < current
                    }
                }
            };
            if better {
                best = Some(candidate);
            }
        }
        best
    }
}

impl Default for ComparisonService {
    fn default() -> Self {
        Self::new()
    }
}

fn row(strategy: String, result: &BacktestResult) -> ComparisonRow {
    ComparisonRow {
        strategy,
        total_return_pct: result.total_return_pct.unwrap_or(0.0),
        sharpe_ratio: result.sharpe_ratio.unwrap_or(0.0),
        max_drawdown_pct: result.max_drawdown.unwrap_or(0.0).abs(),
        win_rate: result.win_rate.unwrap_or(0.0),
        profit_factor: result.profit_factor.unwrap_or(0.0),
    }
}
