use posecore::annotation::ProgressReport;
use posecore::telemetry::EditMetrics;
use serde::Serialize;

#[derive(Serialize)]
struct SummaryDocument<'a> {
    save_path: String,
    progress: &'a ProgressReport,
    edits: EditMetrics,
}

pub fn render_progress(report: &ProgressReport) -> String {
    let mut lines = vec![format!(
        "Annotated frames: {} / {} ({:.1}%)",
        report.annotated_frames,
        report.frame_count,
        report.completion() * 100.0
    )];
    for keypoint in &report.keypoints {
        lines.push(format!("  {:<16} {:>6} placed", keypoint.name, keypoint.placed));
    }
    lines.join("\n")
}

pub fn render_json(
    save_path: &std::path::Path,
    report: &ProgressReport,
    edits: EditMetrics,
) -> anyhow::Result<String> {
    let document = SummaryDocument {
        save_path: save_path.display().to_string(),
        progress: report,
        edits,
    };
    Ok(serde_json::to_string_pretty(&document)?)
}
