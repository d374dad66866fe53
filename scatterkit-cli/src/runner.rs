//! Loading inputs, running passes and writing plans

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use scatterkit::chart::{ChartPlan, ScatterplotChart};
use scatterkit::config::ChartConfig;
use scatterkit::core::DataPoint;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::config::KeyField;
use crate::error::{CliError, Result};

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| CliError::Json {
        path: path.to_path_buf(),
        source,
    })
}

pub fn load_config(path: Option<&Path>) -> Result<ChartConfig> {
    match path {
        Some(path) => read_json(path),
        None => Ok(ChartConfig::default()),
    }
}

pub fn load_passes(paths: &[PathBuf]) -> Result<Vec<Vec<DataPoint>>> {
    paths
        .iter()
        .map(|path| {
            let points: Vec<DataPoint> = read_json(path)?;
            debug!(path = %path.display(), points = points.len(), "loaded pass");
            Ok(points)
        })
        .collect()
}

/// Run every pass on one chart. Pass `i` happens at `i * interval`.
pub fn plan_passes(
    config: ChartConfig,
    passes: &[Vec<DataPoint>],
    interval: Duration,
    key_field: Option<KeyField>,
) -> Result<Vec<ChartPlan>> {
    let mut chart = ScatterplotChart::new(config)?;
    if let Some(KeyField::Type) = key_field {
        chart.set_key_fn(Arc::new(|p: &DataPoint| p.kind.clone().unwrap_or_default()));
    }

    let mut plans = Vec::with_capacity(passes.len());
    let mut now = Duration::ZERO;
    for (i, data) in passes.iter().enumerate() {
        chart.settle(now);
        let plan = chart.update(data, now)?;
        info!(
            pass = i,
            enter = plan.reconciliation.enter.len(),
            update = plan.reconciliation.update.len(),
            exit = plan.reconciliation.exit.len(),
            "planned pass"
        );
        plans.push(plan);
        now += interval;
    }
    Ok(plans)
}

pub fn write_plans(plans: &[ChartPlan], output: Option<&Path>, pretty: bool) -> Result<()> {
    let mut json = if pretty {
        serde_json::to_string_pretty(plans)?
    } else {
        serde_json::to_string(plans)?
    };
    json.push('\n');
    match output {
        Some(path) => fs::write(path, json).map_err(|source| CliError::Write {
            path: path.to_path_buf(),
            source,
        }),
        None => io::stdout()
            .lock()
            .write_all(json.as_bytes())
            .map_err(|source| CliError::Write {
                path: PathBuf::from("<stdout>"),
                source,
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points(json: &str) -> Vec<DataPoint> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn passes_run_on_one_chart() {
        let passes = vec![
            points(r#"[{"x": 0, "y": 0}, {"x": 1, "y": 1}, {"x": 2, "y": 2}]"#),
            points(r#"[{"x": 0, "y": 0}, {"x": 1, "y": 1}]"#),
        ];
        let plans = plan_passes(
            ChartConfig::default(),
            &passes,
            Duration::from_millis(1000),
            None,
        )
        .unwrap();
        assert_eq!(plans.len(), 2);
        assert_eq!(plans[0].handle, plans[1].handle);
        assert_eq!(plans[0].reconciliation.enter.len(), 3);
        assert_eq!(plans[1].reconciliation.update.len(), 2);
        assert_eq!(plans[1].reconciliation.exit.len(), 1);
        assert_eq!(plans[1].transition.timing.start, Duration::from_millis(1000));
    }

    #[test]
    fn key_field_matches_by_type() {
        let passes = vec![
            points(r#"[{"x": 0, "y": 0, "type": "a"}, {"x": 1, "y": 1, "type": "b"}]"#),
            points(r#"[{"x": 1, "y": 1, "type": "b"}]"#),
        ];
        let plans = plan_passes(
            ChartConfig::default(),
            &passes,
            Duration::from_millis(10),
            Some(KeyField::Type),
        )
        .unwrap();
        let second = &plans[1].reconciliation;
        assert_eq!(second.update.len(), 1);
        assert_eq!(second.update[0].element.key.to_string(), "b");
        assert_eq!(second.exit[0].key.to_string(), "a");
    }

    #[test]
    fn engine_errors_carry_the_report() {
        let passes = vec![points(r#"[{"x": "north", "y": 0}]"#)];
        let err = plan_passes(ChartConfig::default(), &passes, Duration::ZERO, None).unwrap_err();
        match err {
            CliError::Plan(report) => assert!(report.contains("invalid domain on x axis")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = load_passes(&[PathBuf::from("/nonexistent/pass.json")]).unwrap_err();
        assert!(matches!(err, CliError::Read { .. }));
        assert!(matches!(load_config(None), Ok(c) if c == ChartConfig::default()));
    }
}
