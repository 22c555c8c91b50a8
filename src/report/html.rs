//! Dashboard page, generated from the artifact manifest.
use crate::report::{Artifact, Section, SECTIONS};

pub const PAGE_TITLE: &str = "Data Drift Dashboard";

/// Build `index.html`: one heading per section, then the section's images in
/// manifest order. Sections without artifacts are left out.
pub fn index_document(artifacts: &[Artifact], image_width: u32) -> String {
    let mut body = String::new();
    for section in SECTIONS {
        let images: Vec<&Artifact> = artifacts.iter().filter(|a| a.section() == section).collect();
        if images.is_empty() {
            continue;
        }
        body.push_str(&format!("    <h2>{}</h2>\n", section_heading(section)));
        for artifact in images {
            body.push_str(&format!("    {}\n", image_tag(&artifact.file_name, image_width)));
        }
        body.push('\n');
    }
    format!(
        "<html>\n<head><title>{}</title></head>\n<body>\n{}</body>\n</html>\n",
        PAGE_TITLE, body
    )
}

fn section_heading(section: Section) -> &'static str {
    match section {
        Section::RegressionPerformance => "Regression Performance",
        Section::TargetDrift => "Target Drift",
        Section::FeatureDrift => "Feature Drift",
    }
}

fn image_tag(file_name: &str, width: u32) -> String {
    format!("<img src=\"{}\" width=\"{}\"><br>", file_name, width)
}
