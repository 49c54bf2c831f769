use crate::report::model::DashboardModel;
use crate::workflow::runner::WorkflowResult;
use anyhow::Context;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

fn ensure_parent(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating directory {}", parent.display()))?;
    }
    Ok(())
}

pub fn write_dashboard(model: &DashboardModel, path: &Path) -> anyhow::Result<()> {
    ensure_parent(path)?;
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, model)
        .with_context(|| format!("writing dashboard model {}", path.display()))?;
    writer.flush()?;
    Ok(())
}

/// One-line `key=value` record of a run.
pub fn summary_line(source: &str, result: &WorkflowResult) -> String {
    let (bins, rate_points) = result
        .estimate
        .as_ref()
        .map(|e| (e.binned.len(), e.rate_of_change.len()))
        .unwrap_or((0, 0));
    let finding = result.estimate.as_ref().and_then(|e| e.finding);
    format!(
        "source={} rows={} rejected={} bins={} rate_points={} layer_found={} bin={} rate={}\n",
        source,
        result.rows.len(),
        result.rejected.len(),
        bins,
        rate_points,
        finding.map(|f| f.layer_found).unwrap_or(false),
        finding
            .map(|f| f.bin_index.to_string())
            .unwrap_or_else(|| "-".into()),
        finding
            .map(|f| format!("{:.4}", f.rate))
            .unwrap_or_else(|| "-".into()),
    )
}

pub fn append_history(path: &Path, line: &str) -> anyhow::Result<()> {
    ensure_parent(path)?;
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening history {}", path.display()))?;
    file.write_all(line.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::profile::build_flight;
    use crate::workflow::config::WorkflowConfig;
    use crate::workflow::runner::Runner;

    fn result() -> WorkflowResult {
        Runner::new(WorkflowConfig::default())
            .execute_samples(build_flight(0).unwrap())
            .unwrap()
    }

    #[test]
    fn summary_line_lists_finding() {
        let line = summary_line("synthetic", &result());
        assert!(line.starts_with("source=synthetic rows=600 rejected=0 bins=300"));
        assert!(line.contains("layer_found=true"));
        assert!(line.ends_with('\n'));
    }

    #[test]
    fn history_appends_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("history.log");
        append_history(&path, "a\n").unwrap();
        append_history(&path, "b\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "a\nb\n");
    }

    #[test]
    fn dashboard_is_written_as_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dashboard.json");
        let model = DashboardModel {
            status: "No inversion layer found".into(),
            ..Default::default()
        };
        write_dashboard(&model, &path).unwrap();
        let parsed: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed["status"], "No inversion layer found");
    }
}
