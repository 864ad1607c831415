use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::error::ExportError;
use crate::results_view::ResultsView;

/// Render the results as a self-contained HTML document.
///
/// Row texts are already markup-stripped by the view, so they can be
/// embedded directly.
#[must_use]
pub fn render_results(view: &ResultsView) -> String {
    let mut html = String::from("<h2>Quiz Results</h2>");
    let _ = write!(
        html,
        "<p>Score: {}/{} ({}%)</p>",
        view.score, view.total, view.percent
    );

    html.push_str(
        "<table border=1 cellpadding=4>\
         <tr><th>#</th><th>Prompt</th><th>Your Answer</th><th>Correct Answer</th></tr>",
    );
    for row in &view.rows {
        let color = if row.passed { "#cfc" } else { "#fcc" };
        let _ = write!(
            html,
            "<tr style='background:{color}'><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            row.position, row.prompt, row.chosen, row.correct_answer
        );
    }
    html.push_str("</table>");
    html
}

/// Write the rendered results to `path`, overwriting any existing file.
///
/// Fire-and-forget: no retry. The view is untouched on failure and can
/// be exported again.
///
/// # Errors
///
/// Returns `ExportError::Write` when the file cannot be written.
pub fn export_results(view: &ResultsView, path: &Path) -> Result<(), ExportError> {
    let html = render_results(view);
    fs::write(path, html).map_err(|source| ExportError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::results_view::ResultRow;

    fn view() -> ResultsView {
        ResultsView {
            score: 1,
            total: 2,
            percent: 50,
            rows: vec![
                ResultRow {
                    position: 1,
                    prompt: "Q1".to_string(),
                    chosen: "A1".to_string(),
                    correct_answer: "A1".to_string(),
                    passed: true,
                },
                ResultRow {
                    position: 2,
                    prompt: "Q2".to_string(),
                    chosen: String::new(),
                    correct_answer: "A2".to_string(),
                    passed: false,
                },
            ],
        }
    }

    #[test]
    fn renders_summary_and_one_row_per_question() {
        let html = render_results(&view());
        assert!(html.contains("Score: 1/2 (50%)"));
        assert!(html.contains("background:#cfc"));
        assert!(html.contains("background:#fcc"));
        assert_eq!(html.matches("<tr style=").count(), 2);
    }

    #[test]
    fn export_writes_the_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quiz_results.html");

        export_results(&view(), &path).unwrap();
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("<h2>Quiz Results</h2>"));
    }

    #[test]
    fn export_failure_surfaces_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("quiz_results.html");

        let err = export_results(&view(), &path).unwrap_err();
        let ExportError::Write { path: reported, .. } = err;
        assert_eq!(reported, path);
    }
}
