use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use vnep_eval::FilterSpec;

// folder of the plots that are not heatmaps
const GENERAL_PLOTS: &str = "general_plots";

fn default_output_path() -> PathBuf {
    PathBuf::from("./")
}

fn default_output_filetype() -> String {
    String::from("png")
}

fn today() -> String {
    chrono::Utc::now().format("%Y-%m-%d").to_string()
}

fn yes() -> bool {
    true
}

/// Where and how artifacts are written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,
    #[serde(default = "default_output_filetype")]
    pub output_filetype: String,
    /// Date folder, `YYYY-MM-DD` in UTC by default.
    #[serde(default = "today")]
    pub date: String,
    #[serde(default)]
    pub show_plot: bool,
    #[serde(default = "yes")]
    pub save_plot: bool,
    #[serde(default = "yes")]
    pub overwrite_existing_files: bool,
    /// Paper mode drops statistics from titles.
    #[serde(default = "yes")]
    pub paper_mode: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_path: default_output_path(),
            output_filetype: default_output_filetype(),
            date: today(),
            show_plot: false,
            save_plot: true,
            overwrite_existing_files: true,
            paper_mode: true,
        }
    }
}

/// Location of one plot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub dir: PathBuf,
    pub file: PathBuf,
}

impl Artifact {
    /// The same file with a different extension.
    pub fn with_extension(&self, extension: &str) -> PathBuf {
        self.file.with_extension(extension)
    }
}

impl OutputConfig {
    /// Computes the location of the plot `stem` for `filter`: heatmaps are
    /// stored in their axes' `folder`, everything else in `general_plots`.
    pub fn artifact(
        &self,
        folder: Option<&str>,
        stem: &str,
        filter: Option<&FilterSpec>,
    ) -> Artifact {
        let (filter_path, filter_filename) = match filter {
            Some(filter) if !filter.is_empty() => {
                filter.path_and_filename(&self.output_filetype)
            }
            _ => (String::new(), format!("no_filter.{}", self.output_filetype)),
        };
        let mut dir = normalize(&self.output_path);
        dir.push(&self.date);
        dir.push(&self.output_filetype);
        dir.push(folder.unwrap_or(GENERAL_PLOTS));
        if !filter_path.is_empty() {
            dir.push(filter_path);
        }
        let file = dir.join(format!("{}_{}", stem, filter_filename));
        Artifact { dir, file }
    }

    /// Whether the file a renderer writes for an artifact already exists and
    /// should be kept as is.
    pub fn should_skip(&self, target: &Path) -> bool {
        if !self.overwrite_existing_files && target.exists() {
            tracing::info!(
                "[output] skipping generation of {} as this file already exists",
                target.display()
            );
            return true;
        }
        false
    }
}

// drops `.` components, e.g. `./plots/` becomes `plots`
fn normalize(path: &Path) -> PathBuf {
    let normalized: PathBuf = path
        .components()
        .filter(|component| !matches!(component, std::path::Component::CurDir))
        .collect();
    if normalized.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        normalized
    }
}
